use leptos::prelude::*;

use tremor_shared::QuakeMarker;

use crate::app::{SelectedQuake, canvas_dimensions};
use crate::loader::LoadState;
use crate::project::WORLD_SIZE;
use crate::viewport::Viewport;

/// Popup for the selected earthquake, anchored above its marker:
/// place, occurrence time, magnitude, tsunami flag.
#[component]
pub fn QuakePopup() -> impl IntoView {
    let load: RwSignal<LoadState> = expect_context();
    let viewport: RwSignal<Viewport> = expect_context();
    let SelectedQuake(selected) = expect_context();

    let marker = Memo::new(move |_| {
        let index = selected.get()?;
        load.with(|state| match state {
            LoadState::Ready(doc) => doc.quakes.get(index).cloned(),
            _ => None,
        })
    });

    view! {
        {move || {
            let Some(marker) = marker.get() else {
                return ().into_any();
            };
            let vp = viewport.get();
            let (x, y) = anchor(&marker, &vp);
            view! {
                <div
                    style:left=format!("{x}px")
                    style:top=format!("{y}px")
                    style="position: absolute; transform: translate(-50%, -100%); z-index: 20; background: #161921; border: 1px solid #282c3e; border-radius: 6px; padding: 10px 12px; max-width: 260px; color: #e2e0d8; font-family: 'Inter', system-ui, sans-serif; font-size: 0.75rem; box-shadow: 0 4px 16px rgba(0,0,0,0.5);"
                >
                    <button
                        style="position: absolute; top: 4px; right: 6px; background: none; border: none; color: #5a5860; cursor: pointer; font-size: 0.8rem;"
                        on:click=move |_| selected.set(None)
                    >
                        "\u{00D7}"
                    </button>
                    <div style="font-weight: 700; font-size: 0.85rem; margin-right: 14px;">
                        {marker.popup.place.clone()}
                    </div>
                    <div style="border-top: 1px solid #282c3e; margin: 6px 0;" />
                    <div>{marker.popup.time.clone()}</div>
                    <div style="border-top: 1px solid #282c3e; margin: 6px 0;" />
                    <div>"Magnitude: "<b>{marker.popup.magnitude}</b></div>
                    <div style="border-top: 1px solid #282c3e; margin: 6px 0;" />
                    <div>"Tsunami: "<b>{if marker.popup.tsunami { "yes" } else { "no" }}</b></div>
                </div>
            }
            .into_any()
        }}
    }
}

/// Screen anchor just above the marker, using the world copy nearest the
/// canvas midline.
fn anchor(marker: &QuakeMarker, vp: &Viewport) -> (f64, f64) {
    let (mut x, y) = vp.lon_lat_to_screen(marker.lon, marker.lat);
    let (w, _) = canvas_dimensions();
    let world_px = WORLD_SIZE * vp.scale;
    if world_px > 0.0 {
        x -= ((x - w / 2.0) / world_px).round() * world_px;
    }
    (x, y - marker.radius.max(0.0) - 6.0)
}
