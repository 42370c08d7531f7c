use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use tremor_shared::{MapConfig, MapDocument, initialize};

/// Initialization state of the map document.
#[derive(Clone)]
pub enum LoadState {
    Loading,
    Ready(MapDocument),
    Failed(String),
}

async fn fetch_text(url: String) -> Result<String, String> {
    let resp = gloo_net::http::Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.text().await.map_err(|e| format!("read error: {e}"))
}

/// One-shot load: catalog fetch, boundary fetch, transform, compose.
/// Failures land in the state signal so the UI can surface them.
pub fn start(state: RwSignal<LoadState>, config: MapConfig) {
    spawn_local(async move {
        match initialize(fetch_text, &config).await {
            Ok(doc) => state.set(LoadState::Ready(doc)),
            Err(e) => {
                web_sys::console::error_1(&format!("map load failed: {e}").into());
                state.set(LoadState::Failed(e.to_string()));
            }
        }
    });
}
