use wasm_bindgen::JsValue;

use tremor_shared::MapConfig;

/// The hosting page supplies the imagery token as `window.MAPBOX_TOKEN`.
/// This is the only ambient read; everything downstream takes the token
/// explicitly through `MapConfig`.
pub fn map_config() -> MapConfig {
    let access_token = web_sys::window()
        .and_then(|window| {
            js_sys::Reflect::get(window.as_ref(), &JsValue::from_str("MAPBOX_TOKEN")).ok()
        })
        .and_then(|value| value.as_string())
        .unwrap_or_default();

    MapConfig { access_token }
}
