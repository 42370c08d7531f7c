use leptos::prelude::*;

use crate::loader::LoadState;

/// Always-visible magnitude legend, anchored bottom-right.
#[component]
pub fn Legend() -> impl IntoView {
    let load: RwSignal<LoadState> = expect_context();

    view! {
        {move || load.with(|state| {
            let LoadState::Ready(doc) = state else {
                return ().into_any();
            };
            let rows = doc
                .legend
                .iter()
                .map(|row| {
                    let color = row.color;
                    let label = row.label.clone();
                    view! {
                        <div style="display: flex; align-items: center; gap: 6px; line-height: 1.5;">
                            <i style=format!(
                                "display: inline-block; width: 14px; height: 14px; border-radius: 3px; background: {color};"
                            ) />
                            <span>{label}</span>
                        </div>
                    }
                })
                .collect_view();
            view! {
                <div style="position: absolute; bottom: 24px; right: 12px; z-index: 10; background: #13161f; border: 1px solid #282c3e; border-radius: 6px; padding: 8px 12px; color: #e2e0d8; font-family: 'JetBrains Mono', monospace; font-size: 0.72rem; box-shadow: 0 4px 16px rgba(0,0,0,0.5);">
                    <div style="color: #9a9590; margin-bottom: 4px;">"Magnitude"</div>
                    {rows}
                </div>
            }
            .into_any()
        })}
    }
}
