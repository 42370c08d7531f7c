use serde::{Deserialize, Serialize};

use crate::layers::{BoundaryPath, QuakeMarker};
use crate::legend::{LegendRow, legend_rows};

/// Explicit map configuration. The imagery token is always passed in here;
/// it is never read from ambient scope by the composer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub access_token: String,
}

/// The three mutually exclusive base imagery styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseStyle {
    Streets,
    Outdoors,
    Satellite,
}

impl BaseStyle {
    pub const ALL: [BaseStyle; 3] = [BaseStyle::Streets, BaseStyle::Outdoors, BaseStyle::Satellite];

    pub fn label(self) -> &'static str {
        match self {
            BaseStyle::Streets => "Streets",
            BaseStyle::Outdoors => "Outdoors",
            BaseStyle::Satellite => "Satellite",
        }
    }

    /// Imagery-provider layer id injected into the tile URL template.
    pub fn tile_id(self) -> &'static str {
        match self {
            BaseStyle::Streets => "mapbox.streets",
            BaseStyle::Outdoors => "mapbox.outdoors",
            BaseStyle::Satellite => "mapbox.satellite",
        }
    }
}

pub const TILE_ATTRIBUTION: &str =
    "Map data © OpenStreetMap contributors, CC-BY-SA, Imagery © Mapbox";
pub const TILE_MAX_ZOOM: u8 = 18;

/// One selectable base imagery layer with its credentialed tile source.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseLayer {
    pub style: BaseStyle,
    pub access_token: String,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

impl BaseLayer {
    /// Concrete raster tile URL for a slippy-map coordinate.
    pub fn tile_url(&self, z: u8, x: u32, y: u32) -> String {
        format!(
            "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={token}",
            id = self.style.tile_id(),
            token = self.access_token,
        )
    }
}

/// Initial view: continental-US center at zoom 4.
pub const INITIAL_CENTER_LAT: f64 = 37.09;
pub const INITIAL_CENTER_LON: f64 = -95.71;
pub const INITIAL_ZOOM: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
}

/// The fully composed map: base imagery, overlays, legend and initial view.
/// Built once per load; never mutated afterwards. Layer visibility toggles
/// are presentation state, not document state.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    pub view: MapView,
    pub base_layers: Vec<BaseLayer>,
    /// Active by default; exactly one base layer is shown at a time.
    pub default_base: BaseStyle,
    pub quakes: Vec<QuakeMarker>,
    pub boundaries: Vec<BoundaryPath>,
    /// Overlay defaults: earthquakes on, boundaries opt-in.
    pub quakes_visible: bool,
    pub boundaries_visible: bool,
    pub legend: Vec<LegendRow>,
    /// The layer control starts expanded.
    pub control_expanded: bool,
}

/// Assemble base imagery layers, the two overlays and the legend into one
/// immutable document.
pub fn compose(
    quakes: Vec<QuakeMarker>,
    boundaries: Vec<BoundaryPath>,
    config: &MapConfig,
) -> MapDocument {
    let base_layers = BaseStyle::ALL
        .into_iter()
        .map(|style| BaseLayer {
            style,
            access_token: config.access_token.clone(),
            attribution: TILE_ATTRIBUTION,
            max_zoom: TILE_MAX_ZOOM,
        })
        .collect();

    MapDocument {
        view: MapView {
            center_lat: INITIAL_CENTER_LAT,
            center_lon: INITIAL_CENTER_LON,
            zoom: INITIAL_ZOOM,
        },
        base_layers,
        default_base: BaseStyle::Streets,
        quakes,
        boundaries,
        quakes_visible: true,
        boundaries_visible: false,
        legend: legend_rows(),
        control_expanded: true,
    }
}

#[cfg(test)]
mod tests {
    use super::{BaseStyle, MapConfig, compose};

    fn config() -> MapConfig {
        MapConfig {
            access_token: "pk.test-token".into(),
        }
    }

    #[test]
    fn composes_three_base_layers_with_the_token() {
        let doc = compose(Vec::new(), Vec::new(), &config());
        assert_eq!(doc.base_layers.len(), 3);
        for layer in &doc.base_layers {
            assert_eq!(layer.access_token, "pk.test-token");
            assert_eq!(layer.max_zoom, 18);
        }
        let styles: Vec<_> = doc.base_layers.iter().map(|l| l.style).collect();
        assert_eq!(styles, BaseStyle::ALL);
    }

    #[test]
    fn tile_url_injects_id_and_token() {
        let doc = compose(Vec::new(), Vec::new(), &config());
        let url = doc.base_layers[2].tile_url(4, 3, 6);
        assert_eq!(
            url,
            "https://api.tiles.mapbox.com/v4/mapbox.satellite/4/3/6.png?access_token=pk.test-token"
        );
    }

    #[test]
    fn defaults_are_streets_plus_earthquakes() {
        let doc = compose(Vec::new(), Vec::new(), &config());
        assert_eq!(doc.default_base, BaseStyle::Streets);
        assert!(doc.quakes_visible);
        assert!(!doc.boundaries_visible);
        assert!(doc.control_expanded);
    }

    #[test]
    fn empty_overlays_still_compose_with_legend_and_view() {
        let doc = compose(Vec::new(), Vec::new(), &config());
        assert!(doc.quakes.is_empty());
        assert!(doc.boundaries.is_empty());
        assert_eq!(doc.legend.len(), 6);
        assert_eq!(doc.view.center_lat, 37.09);
        assert_eq!(doc.view.center_lon, -95.71);
        assert_eq!(doc.view.zoom, 4.0);
    }
}
