use std::future::Future;

use thiserror::Error;

use crate::feed::{BoundaryFeed, QuakeFeed};
use crate::layers::{boundary_paths, quake_markers};
use crate::map::{MapConfig, MapDocument, compose};
use crate::query::{BOUNDARY_URL, quake_query_url};

/// The single top-level failure path for initialization. There is no retry
/// and no partial rendering; any failure aborts the whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("malformed payload from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("missing imagery access token")]
    MissingToken,
}

/// Fetch the earthquake catalog, then the boundary dataset, strictly in
/// that order: the boundary request is not issued until the catalog fetch
/// has resolved.
pub async fn load_feeds<F, Fut>(mut fetch: F) -> Result<(QuakeFeed, BoundaryFeed), LoadError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<String, String>>,
{
    let url = quake_query_url();
    let body = fetch(url.clone()).await.map_err(|reason| LoadError::Fetch {
        url: url.clone(),
        reason,
    })?;
    let quakes: QuakeFeed =
        serde_json::from_str(&body).map_err(|e| LoadError::Malformed {
            url,
            reason: e.to_string(),
        })?;

    let url = BOUNDARY_URL.to_string();
    let body = fetch(url.clone()).await.map_err(|reason| LoadError::Fetch {
        url: url.clone(),
        reason,
    })?;
    let boundaries: BoundaryFeed =
        serde_json::from_str(&body).map_err(|e| LoadError::Malformed {
            url,
            reason: e.to_string(),
        })?;

    Ok((quakes, boundaries))
}

/// Load both feeds through `fetch`, run the feature transforms, and compose
/// the map document.
pub async fn initialize<F, Fut>(fetch: F, config: &MapConfig) -> Result<MapDocument, LoadError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<String, String>>,
{
    if config.access_token.is_empty() {
        return Err(LoadError::MissingToken);
    }
    let (quake_feed, boundary_feed) = load_feeds(fetch).await?;
    Ok(compose(
        quake_markers(&quake_feed),
        boundary_paths(&boundary_feed),
        config,
    ))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;

    use super::{LoadError, initialize, load_feeds};
    use crate::map::MapConfig;
    use crate::query::{BOUNDARY_URL, quake_query_url};

    const QUAKE_BODY: &str = r#"{
        "features": [
            {
                "properties": {"mag": 2.0, "place": "near A", "time": 1590343325000, "tsunami": 0},
                "geometry": {"type": "Point", "coordinates": [-117.5, 35.7, 8.2]}
            },
            {
                "properties": {"mag": 6.0, "place": "near B", "time": 1590343000000, "tsunami": 1},
                "geometry": {"type": "Point", "coordinates": [142.1, 38.3, 30.0]}
            }
        ]
    }"#;

    const BOUNDARY_BODY: &str = r#"{
        "features": [{
            "properties": {"PlateName": "Pacific"},
            "geometry": {"type": "LineString", "coordinates": [[150.0, 40.0], [151.0, 41.0]]}
        }]
    }"#;

    const EMPTY_QUAKES: &str = r#"{"features": []}"#;

    fn config() -> MapConfig {
        MapConfig {
            access_token: "pk.test-token".into(),
        }
    }

    #[test]
    fn loads_both_feeds_in_sequence() {
        let calls: RefCell<Vec<String>> = RefCell::new(Vec::new());
        let fetch = |url: String| {
            calls.borrow_mut().push(url.clone());
            async move {
                if url == quake_query_url() {
                    Ok(QUAKE_BODY.to_string())
                } else {
                    Ok(BOUNDARY_BODY.to_string())
                }
            }
        };

        let (quakes, boundaries) = block_on(load_feeds(fetch)).unwrap();
        assert_eq!(quakes.features.len(), 2);
        assert_eq!(boundaries.features.len(), 1);
        assert_eq!(*calls.borrow(), [quake_query_url(), BOUNDARY_URL.to_string()]);
    }

    #[test]
    fn initialize_builds_the_styled_markers() {
        let fetch = |url: String| async move {
            if url == quake_query_url() {
                Ok(QUAKE_BODY.to_string())
            } else {
                Ok(BOUNDARY_BODY.to_string())
            }
        };

        let doc = block_on(initialize(fetch, &config())).unwrap();
        assert_eq!(doc.quakes.len(), 2);
        assert_eq!(doc.quakes[0].fill_color, "#FFF176");
        assert_eq!(doc.quakes[0].radius, 6.0);
        assert_eq!(doc.quakes[1].fill_color, "red");
        assert_eq!(doc.quakes[1].radius, 18.0);
        assert_eq!(doc.boundaries.len(), 1);
    }

    #[test]
    fn empty_catalog_still_composes() {
        let fetch = |url: String| async move {
            if url == quake_query_url() {
                Ok(EMPTY_QUAKES.to_string())
            } else {
                Ok(BOUNDARY_BODY.to_string())
            }
        };

        let doc = block_on(initialize(fetch, &config())).unwrap();
        assert!(doc.quakes.is_empty());
        assert_eq!(doc.base_layers.len(), 3);
        assert_eq!(doc.legend.len(), 6);
    }

    #[test]
    fn boundary_failure_aborts_the_whole_load() {
        let calls: RefCell<Vec<String>> = RefCell::new(Vec::new());
        let fetch = |url: String| {
            calls.borrow_mut().push(url.clone());
            async move {
                if url == quake_query_url() {
                    Ok(QUAKE_BODY.to_string())
                } else {
                    Err("connection reset".to_string())
                }
            }
        };

        let err = block_on(initialize(fetch, &config())).unwrap_err();
        match err {
            LoadError::Fetch { url, reason } => {
                assert_eq!(url, BOUNDARY_URL);
                assert_eq!(reason, "connection reset");
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
        // The catalog fetch did run first; its result is still discarded.
        assert_eq!(*calls.borrow(), [quake_query_url(), BOUNDARY_URL.to_string()]);
    }

    #[test]
    fn catalog_failure_skips_the_boundary_fetch() {
        let calls: RefCell<Vec<String>> = RefCell::new(Vec::new());
        let fetch = |url: String| {
            calls.borrow_mut().push(url);
            async move { Err("HTTP 503".to_string()) }
        };

        let err = block_on(load_feeds(fetch)).unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
        assert_eq!(*calls.borrow(), [quake_query_url()]);
    }

    #[test]
    fn payload_without_features_is_malformed() {
        let fetch = |_url: String| async move { Ok(r#"{"type": "FeatureCollection"}"#.to_string()) };

        let err = block_on(load_feeds(fetch)).unwrap_err();
        match err {
            LoadError::Malformed { url, .. } => assert_eq!(url, quake_query_url()),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn missing_token_fails_before_any_fetch() {
        let calls: RefCell<Vec<String>> = RefCell::new(Vec::new());
        let fetch = |url: String| {
            calls.borrow_mut().push(url);
            async move { Ok(EMPTY_QUAKES.to_string()) }
        };

        let err = block_on(initialize(
            fetch,
            &MapConfig {
                access_token: String::new(),
            },
        ))
        .unwrap_err();
        assert!(matches!(err, LoadError::MissingToken));
        assert!(calls.borrow().is_empty());
    }
}
