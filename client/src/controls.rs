use leptos::prelude::*;

use tremor_shared::BaseStyle;

use crate::app::{ActiveBase, ShowBoundaries, ShowQuakes};
use crate::loader::LoadState;

/// Layer control: one exclusive base imagery pick plus two independently
/// toggleable overlays. Rendered expanded, top-right.
#[component]
pub fn LayerControl() -> impl IntoView {
    let load: RwSignal<LoadState> = expect_context();
    let ActiveBase(active_base) = expect_context();
    let ShowQuakes(show_quakes) = expect_context();
    let ShowBoundaries(show_boundaries) = expect_context();

    view! {
        {move || load.with(|state| {
            if !matches!(state, LoadState::Ready(_)) {
                return ().into_any();
            }
            let base_rows = BaseStyle::ALL
                .into_iter()
                .map(|style| {
                    view! {
                        <label style="display: flex; align-items: center; gap: 6px; cursor: pointer; line-height: 1.6;">
                            <input
                                type="radio"
                                name="base-style"
                                prop:checked=move || active_base.get() == style
                                on:change=move |_| active_base.set(style)
                            />
                            {style.label()}
                        </label>
                    }
                })
                .collect_view();
            view! {
                <div style="position: absolute; top: 12px; right: 12px; z-index: 10; background: #13161f; border: 1px solid #282c3e; border-radius: 6px; padding: 8px 12px; color: #e2e0d8; font-family: 'JetBrains Mono', monospace; font-size: 0.75rem; box-shadow: 0 4px 16px rgba(0,0,0,0.5);">
                    {base_rows}
                    <div style="border-top: 1px solid #282c3e; margin: 6px 0;" />
                    <label style="display: flex; align-items: center; gap: 6px; cursor: pointer; line-height: 1.6;">
                        <input
                            type="checkbox"
                            prop:checked=move || show_quakes.get()
                            on:change=move |_| show_quakes.update(|v| *v = !*v)
                        />
                        "Earthquakes"
                    </label>
                    <label style="display: flex; align-items: center; gap: 6px; cursor: pointer; line-height: 1.6;">
                        <input
                            type="checkbox"
                            prop:checked=move || show_boundaries.get()
                            on:change=move |_| show_boundaries.update(|v| *v = !*v)
                        />
                        "Fault Lines"
                    </label>
                </div>
            }
            .into_any()
        })}
    }
}
