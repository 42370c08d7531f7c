use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use gloo_storage::Storage;

use tremor_shared::BaseStyle;

use crate::canvas::MapCanvas;
use crate::config;
use crate::controls::LayerControl;
use crate::legend::Legend;
use crate::loader::{self, LoadState};
use crate::popup::QuakePopup;
use crate::tiles::LoadedTile;
use crate::viewport::Viewport;

pub(crate) fn canvas_dimensions() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (1200.0, 800.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1200.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    (w, h)
}

/// Newtype wrappers give same-typed signals distinct Leptos context
/// entries (two bare `RwSignal<bool>`s would overwrite each other).
#[derive(Clone, Copy)]
pub(crate) struct ActiveBase(pub RwSignal<BaseStyle>);
#[derive(Clone, Copy)]
pub(crate) struct ShowQuakes(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct ShowBoundaries(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct HoveredQuake(pub RwSignal<Option<usize>>);
#[derive(Clone, Copy)]
pub(crate) struct SelectedQuake(pub RwSignal<Option<usize>>);
#[derive(Clone, Copy)]
pub(crate) struct ResizeNonce(pub RwSignal<u64>);

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Settings {
    base_style: BaseStyle,
    show_quakes: bool,
    show_boundaries: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_style: BaseStyle::Streets,
            show_quakes: true,
            show_boundaries: false,
        }
    }
}

struct KeydownBinding {
    window: web_sys::Window,
    _handler: wasm_bindgen::closure::Closure<dyn Fn(web_sys::KeyboardEvent)>,
}

struct ResizeBinding {
    window: web_sys::Window,
    _handler: wasm_bindgen::closure::Closure<dyn Fn()>,
}

thread_local! {
    static KEYDOWN_BINDING: RefCell<Option<KeydownBinding>> = const { RefCell::new(None) };
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

/// Root application component. Provides global reactive signals via context
/// and drives the one-shot data load.
#[component]
pub fn App() -> impl IntoView {
    let load: RwSignal<LoadState> = RwSignal::new(LoadState::Loading);
    let viewport: RwSignal<Viewport> = RwSignal::new(Viewport::default());
    let loaded_tiles: RwSignal<Vec<LoadedTile>> = RwSignal::new(Vec::new());
    let saved: Settings = gloo_storage::LocalStorage::get("tremor_settings").unwrap_or_default();
    let active_base: RwSignal<BaseStyle> = RwSignal::new(saved.base_style);
    let show_quakes: RwSignal<bool> = RwSignal::new(saved.show_quakes);
    let show_boundaries: RwSignal<bool> = RwSignal::new(saved.show_boundaries);
    let hovered: RwSignal<Option<usize>> = RwSignal::new(None);
    let selected: RwSignal<Option<usize>> = RwSignal::new(None);
    let resize_nonce: RwSignal<u64> = RwSignal::new(0);

    provide_context(load);
    provide_context(viewport);
    provide_context(loaded_tiles);
    provide_context(ActiveBase(active_base));
    provide_context(ShowQuakes(show_quakes));
    provide_context(ShowBoundaries(show_boundaries));
    provide_context(HoveredQuake(hovered));
    provide_context(SelectedQuake(selected));
    provide_context(ResizeNonce(resize_nonce));

    // Kick off the data load once on mount.
    let load_started = RwSignal::new(false);
    Effect::new(move || {
        if load_started.get_untracked() {
            return;
        }
        load_started.set(true);
        loader::start(load, config::map_config());
    });

    // Persist display settings on any change.
    Effect::new(move || {
        let settings = Settings {
            base_style: active_base.get(),
            show_quakes: show_quakes.get(),
            show_boundaries: show_boundaries.get(),
        };
        let _ = gloo_storage::LocalStorage::set("tremor_settings", &settings);
    });

    // Hiding the earthquake overlay dismisses any open popup.
    Effect::new(move || {
        if !show_quakes.get() {
            selected.set(None);
            hovered.set(None);
        }
    });

    // Window resizes invalidate the canvas.
    Effect::new(move || {
        use wasm_bindgen::prelude::*;

        let Some(window) = web_sys::window() else {
            return;
        };

        RESIZE_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "resize",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });

        let handler = Closure::<dyn Fn()>::new(move || {
            resize_nonce.update(|n| *n = n.wrapping_add(1));
        });
        if window
            .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            RESIZE_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(ResizeBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    // Global keyboard shortcuts
    Effect::new(move || {
        use wasm_bindgen::prelude::*;

        let Some(window) = web_sys::window() else {
            return;
        };

        KEYDOWN_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "keydown",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });

        let handler =
            Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
                let key = e.key();
                let target_tag = e
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
                    .map(|el| el.tag_name())
                    .unwrap_or_default();

                // Don't intercept when typing in an input
                if target_tag == "INPUT" || target_tag == "TEXTAREA" {
                    return;
                }

                match key.as_str() {
                    "Escape" => {
                        selected.set(None);
                        hovered.set(None);
                    }
                    "e" => {
                        show_quakes.update(|v| *v = !*v);
                    }
                    "f" => {
                        show_boundaries.update(|v| *v = !*v);
                    }
                    "ArrowLeft" => {
                        e.prevent_default();
                        viewport.update(|vp| vp.pan(50.0, 0.0));
                    }
                    "ArrowRight" => {
                        e.prevent_default();
                        viewport.update(|vp| vp.pan(-50.0, 0.0));
                    }
                    "ArrowUp" => {
                        e.prevent_default();
                        viewport.update(|vp| vp.pan(0.0, 50.0));
                    }
                    "ArrowDown" => {
                        e.prevent_default();
                        viewport.update(|vp| vp.pan(0.0, -50.0));
                    }
                    "+" | "=" => {
                        e.prevent_default();
                        let (w, h) = canvas_dimensions();
                        viewport.update(|vp| vp.zoom_at(-120.0, w / 2.0, h / 2.0));
                    }
                    "-" => {
                        e.prevent_default();
                        let (w, h) = canvas_dimensions();
                        viewport.update(|vp| vp.zoom_at(120.0, w / 2.0, h / 2.0));
                    }
                    _ => {}
                }
            });

        if window
            .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            KEYDOWN_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(KeydownBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    view! {
        <div style="width: 100%; height: 100%; position: relative; overflow: hidden; background: #0c0e17;">
            <MapCanvas />
            <LayerControl />
            <Legend />
            <QuakePopup />
            <Attribution />
            <StatusOverlay />
        </div>
    }
}

/// Imagery attribution for the active base layer, bottom-left.
#[component]
fn Attribution() -> impl IntoView {
    let load: RwSignal<LoadState> = expect_context();
    let ActiveBase(active_base) = expect_context();

    view! {
        {move || {
            let style = active_base.get();
            load.with(|state| {
                let LoadState::Ready(doc) = state else {
                    return ().into_any();
                };
                let Some(layer) = doc.base_layers.iter().find(|l| l.style == style) else {
                    return ().into_any();
                };
                view! {
                    <div style="position: absolute; bottom: 4px; left: 8px; z-index: 10; color: #5a5860; font-family: 'Inter', system-ui, sans-serif; font-size: 0.6rem;">
                        {layer.attribution}
                    </div>
                }
                .into_any()
            })
        }}
    }
}

/// Loading pill / failure banner. A failure stays visible; there is no retry.
#[component]
fn StatusOverlay() -> impl IntoView {
    let load: RwSignal<LoadState> = expect_context();

    view! {
        {move || load.with(|state| match state {
            LoadState::Loading => view! {
                <div style="position: absolute; top: 12px; left: 50%; transform: translateX(-50%); z-index: 30; background: #13161f; border: 1px solid #282c3e; border-radius: 6px; padding: 6px 14px; color: #9a9590; font-family: 'JetBrains Mono', monospace; font-size: 0.72rem;">
                    "Loading earthquake data\u{2026}"
                </div>
            }
            .into_any(),
            LoadState::Failed(message) => view! {
                <div style="position: absolute; top: 12px; left: 50%; transform: translateX(-50%); z-index: 30; background: #2a1416; border: 1px solid #7c2d32; border-radius: 6px; padding: 6px 14px; color: #f0b4b8; font-family: 'JetBrains Mono', monospace; font-size: 0.72rem; max-width: 80%;">
                    {format!("Map failed to load: {message}")}
                </div>
            }
            .into_any(),
            LoadState::Ready(_) => ().into_any(),
        })}
    }
}
