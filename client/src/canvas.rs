use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent};

use tremor_shared::{
    BaseStyle, MARKER_FILL_OPACITY, MARKER_OUTLINE_COLOR, MARKER_OUTLINE_WEIGHT, MapDocument,
};

use crate::app::{
    ActiveBase, HoveredQuake, ResizeNonce, SelectedQuake, ShowBoundaries, ShowQuakes,
};
use crate::loader::LoadState;
use crate::project::WORLD_SIZE;
use crate::tiles::{self, LoadedTile};
use crate::viewport::Viewport;

const MAP_BACKGROUND: &str = "#d4dadc";
/// Extra screen pixels accepted around a marker for hover/click hits.
const HIT_SLOP: f64 = 2.0;

/// Canvas map renderer: raster base tiles below, boundary polylines and
/// quake markers above, all drawn in one 2D pass per invalidation.
#[component]
pub fn MapCanvas() -> impl IntoView {
    let load: RwSignal<LoadState> = expect_context();
    let viewport: RwSignal<Viewport> = expect_context();
    let loaded_tiles: RwSignal<Vec<LoadedTile>> = expect_context();
    let ActiveBase(active_base) = expect_context();
    let ShowQuakes(show_quakes) = expect_context();
    let ShowBoundaries(show_boundaries) = expect_context();
    let HoveredQuake(hovered) = expect_context();
    let SelectedQuake(selected) = expect_context();
    let ResizeNonce(resize_nonce) = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    // Drag / pinch state
    let is_dragging = Rc::new(Cell::new(false));
    let drag_start_x = Rc::new(Cell::new(0.0f64));
    let drag_start_y = Rc::new(Cell::new(0.0f64));
    let last_x = Rc::new(Cell::new(0.0f64));
    let last_y = Rc::new(Cell::new(0.0f64));
    let pinch_dist = Rc::new(Cell::new(0.0f64));

    // Center the initial view once the canvas and the document are ready.
    let centered = Rc::new(Cell::new(false));
    Effect::new({
        let centered = centered.clone();
        move || {
            if centered.get() {
                return;
            }
            let Some(canvas) = canvas_ref.get() else {
                return;
            };
            let canvas: &HtmlCanvasElement = &canvas;
            let (w, h) = canvas_css_size(canvas);
            if w <= 0.0 || h <= 0.0 {
                return;
            }
            load.with(|state| {
                let LoadState::Ready(doc) = state else {
                    return;
                };
                centered.set(true);
                let view = doc.view.clone();
                viewport.update(|vp| {
                    vp.center_on(view.center_lon, view.center_lat, view.zoom, w, h);
                });
            });
        }
    });

    // Fetch base tiles for the current view and style.
    Effect::new(move || {
        let vp = viewport.get();
        let style = active_base.get();
        resize_nonce.track();
        load.with(|state| {
            let LoadState::Ready(doc) = state else {
                return;
            };
            let Some(layer) = doc.base_layers.iter().find(|l| l.style == style) else {
                return;
            };
            let Some(canvas) = canvas_ref.get() else {
                return;
            };
            let canvas: &HtmlCanvasElement = &canvas;
            let (w, h) = canvas_css_size(canvas);
            let coords = tiles::visible_tiles(&vp, w, h, layer.max_zoom);
            tiles::request_tiles(loaded_tiles, layer, coords);
        });
    });

    // Repaint on any visual change.
    Effect::new(move || {
        let vp = viewport.get();
        let active = active_base.get();
        let show_q = show_quakes.get();
        let show_b = show_boundaries.get();
        let hov = hovered.get();
        let sel = selected.get();
        resize_nonce.track();
        loaded_tiles.track();

        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        let canvas: &HtmlCanvasElement = &canvas;
        let (w, h) = canvas_css_size(canvas);
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let dpr = web_sys::window()
            .map(|win| win.device_pixel_ratio())
            .unwrap_or(1.0);
        let pw = (w * dpr).round().max(1.0) as u32;
        let ph = (h * dpr).round().max(1.0) as u32;
        if canvas.width() != pw {
            canvas.set_width(pw);
        }
        if canvas.height() != ph {
            canvas.set_height(ph);
        }

        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            return;
        };
        let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);

        load.with(|state| {
            let LoadState::Ready(doc) = state else {
                ctx.set_fill_style_str(MAP_BACKGROUND);
                ctx.fill_rect(0.0, 0.0, w, h);
                return;
            };
            loaded_tiles.with_untracked(|tiles| {
                draw_map(DrawInput {
                    ctx: &ctx,
                    w,
                    h,
                    vp: &vp,
                    doc,
                    tiles,
                    active,
                    show_quakes: show_q,
                    show_boundaries: show_b,
                    hovered: hov,
                    selected: sel,
                });
            });
        });
    });

    // Pointer cursor over markers.
    Effect::new(move || {
        let pointer = hovered.get().is_some();
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        let canvas: &HtmlCanvasElement = &canvas;
        let el: &web_sys::HtmlElement = canvas.unchecked_ref();
        let _ = web_sys::HtmlElement::style(el)
            .set_property("cursor", if pointer { "pointer" } else { "grab" });
    });

    // --- Input handlers ---

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let delta = e.delta_y();
        let x = e.offset_x() as f64;
        let y = e.offset_y() as f64;
        viewport.update(|vp| vp.zoom_at(delta, x, y));
    };

    let on_pointer_down = {
        let is_dragging = is_dragging.clone();
        let drag_start_x = drag_start_x.clone();
        let drag_start_y = drag_start_y.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            is_dragging.set(true);
            hovered.set(None);
            drag_start_x.set(e.client_x() as f64);
            drag_start_y.set(e.client_y() as f64);
            last_x.set(e.client_x() as f64);
            last_y.set(e.client_y() as f64);

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
                el.style().set_property("cursor", "grabbing").ok();
            }
        }
    };

    let on_pointer_move = {
        let is_dragging = is_dragging.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            if is_dragging.get() {
                let dx = e.client_x() as f64 - last_x.get();
                let dy = e.client_y() as f64 - last_y.get();
                last_x.set(e.client_x() as f64);
                last_y.set(e.client_y() as f64);
                viewport.update(|vp| vp.pan(dx, dy));
            } else {
                let Some((local, w)) = canvas_local(canvas_ref, &e) else {
                    return;
                };
                let vp = viewport.get_untracked();
                let hit = if show_quakes.get_untracked() {
                    load.with_untracked(|state| match state {
                        LoadState::Ready(doc) => quake_at(doc, &vp, local.0, local.1, w),
                        _ => None,
                    })
                } else {
                    None
                };
                if hit != hovered.get_untracked() {
                    hovered.set(hit);
                }
            }
        }
    };

    let on_pointer_up = {
        let is_dragging = is_dragging.clone();
        move |e: PointerEvent| {
            is_dragging.set(false);
            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.style().set_property("cursor", "grab").ok();
            }
        }
    };

    let on_pointer_leave = move |_: PointerEvent| {
        if hovered.get_untracked().is_some() {
            hovered.set(None);
        }
    };

    let on_click = {
        let drag_start_x = drag_start_x.clone();
        let drag_start_y = drag_start_y.clone();
        move |e: MouseEvent| {
            let dx = (e.client_x() as f64 - drag_start_x.get()).abs();
            let dy = (e.client_y() as f64 - drag_start_y.get()).abs();
            if dx >= 5.0 || dy >= 5.0 {
                return;
            }
            let Some((local, w)) = canvas_local(canvas_ref, &e) else {
                return;
            };
            let vp = viewport.get_untracked();
            let hit = if show_quakes.get_untracked() {
                load.with_untracked(|state| match state {
                    LoadState::Ready(doc) => quake_at(doc, &vp, local.0, local.1, w),
                    _ => None,
                })
            } else {
                None
            };
            if hit != selected.get_untracked() {
                selected.set(hit);
            }
        }
    };

    let on_touch_start = {
        let pinch_dist = pinch_dist.clone();
        move |e: web_sys::TouchEvent| {
            let touches = e.touches();
            if touches.length() == 2 {
                e.prevent_default();
                let (Some(t0), Some(t1)) = (touches.get(0), touches.get(1)) else {
                    return;
                };
                let dx = (t1.client_x() - t0.client_x()) as f64;
                let dy = (t1.client_y() - t0.client_y()) as f64;
                pinch_dist.set((dx * dx + dy * dy).sqrt());
            }
        }
    };

    let on_touch_move = {
        let pinch_dist = pinch_dist.clone();
        move |e: web_sys::TouchEvent| {
            let touches = e.touches();
            if touches.length() == 2 {
                e.prevent_default();
                let (Some(t0), Some(t1)) = (touches.get(0), touches.get(1)) else {
                    return;
                };
                let dx = (t1.client_x() - t0.client_x()) as f64;
                let dy = (t1.client_y() - t0.client_y()) as f64;
                let new_dist = (dx * dx + dy * dy).sqrt();
                let old_dist = pinch_dist.get();

                if old_dist > 0.0 {
                    let mid_x = (t0.client_x() + t1.client_x()) as f64 / 2.0;
                    let mid_y = (t0.client_y() + t1.client_y()) as f64 / 2.0;
                    let delta = -(new_dist - old_dist) * 2.0;
                    viewport.update(|vp| vp.zoom_at(delta, mid_x, mid_y));
                }

                pinch_dist.set(new_dist);
            }
        }
    };

    view! {
        <div
            style="position: relative; width: 100%; height: 100%; overflow: hidden;"
            on:wheel=on_wheel
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointerleave=on_pointer_leave
            on:click=on_click
            on:touchstart=on_touch_start
            on:touchmove=on_touch_move
        >
            <canvas
                node_ref=canvas_ref
                style="position: absolute; inset: 0; width: 100%; height: 100%; touch-action: none; cursor: grab;"
            />
        </div>
    }
}

fn canvas_css_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
    canvas
        .parent_element()
        .map(|parent| {
            (
                f64::from(parent.client_width()),
                f64::from(parent.client_height()),
            )
        })
        .unwrap_or((0.0, 0.0))
}

/// Event position relative to the canvas, plus the canvas CSS width.
fn canvas_local(
    canvas_ref: NodeRef<leptos::html::Canvas>,
    e: &MouseEvent,
) -> Option<((f64, f64), f64)> {
    let canvas = canvas_ref.get_untracked()?;
    let canvas: &HtmlCanvasElement = &canvas;
    let rect = canvas.get_bounding_client_rect();
    Some((
        (
            e.client_x() as f64 - rect.left(),
            e.client_y() as f64 - rect.top(),
        ),
        rect.width(),
    ))
}

/// Horizontal world copies (as screen-x offsets) that intersect the screen.
fn wrap_offsets(vp: &Viewport, w: f64) -> Vec<f64> {
    let world_px = WORLD_SIZE * vp.scale;
    let k_min = ((-vp.offset_x) / world_px - 1.0).ceil() as i64;
    let k_max = ((w - vp.offset_x) / world_px).floor() as i64;
    (k_min..=k_max).map(|k| k as f64 * world_px).collect()
}

/// Nearest marker within reach of a screen point, across world copies.
fn quake_at(doc: &MapDocument, vp: &Viewport, sx: f64, sy: f64, canvas_w: f64) -> Option<usize> {
    let offsets = wrap_offsets(vp, canvas_w);
    let mut best: Option<(usize, f64)> = None;
    for (i, marker) in doc.quakes.iter().enumerate() {
        let radius = marker.radius;
        // Degenerate radii are rendered as nothing and cannot be hit.
        if radius <= 0.0 {
            continue;
        }
        let (mx, my) = vp.lon_lat_to_screen(marker.lon, marker.lat);
        for &off in &offsets {
            let x = mx + off;
            let d2 = (sx - x).powi(2) + (sy - my).powi(2);
            let reach = radius + HIT_SLOP;
            if d2 <= reach * reach && best.map_or(true, |(_, bd)| d2 < bd) {
                best = Some((i, d2));
            }
        }
    }
    best.map(|(i, _)| i)
}

struct DrawInput<'a> {
    ctx: &'a CanvasRenderingContext2d,
    w: f64,
    h: f64,
    vp: &'a Viewport,
    doc: &'a MapDocument,
    tiles: &'a [LoadedTile],
    active: BaseStyle,
    show_quakes: bool,
    show_boundaries: bool,
    hovered: Option<usize>,
    selected: Option<usize>,
}

fn draw_map(input: DrawInput<'_>) {
    let DrawInput {
        ctx,
        w,
        h,
        vp,
        doc,
        tiles,
        active,
        show_quakes,
        show_boundaries,
        hovered,
        selected,
    } = input;

    ctx.set_fill_style_str(MAP_BACKGROUND);
    ctx.fill_rect(0.0, 0.0, w, h);

    let offsets = wrap_offsets(vp, w);
    for &off in &offsets {
        draw_tiles(ctx, w, h, vp, tiles, active, off);
    }
    if show_boundaries {
        for &off in &offsets {
            draw_boundaries(ctx, vp, doc, off);
        }
    }
    if show_quakes {
        for &off in &offsets {
            draw_markers(ctx, w, h, vp, doc, hovered, selected, off);
        }
    }
}

fn draw_tiles(
    ctx: &CanvasRenderingContext2d,
    w: f64,
    h: f64,
    vp: &Viewport,
    tiles: &[LoadedTile],
    active: BaseStyle,
    off: f64,
) {
    // Tiles arrive sorted coarse-to-fine, so finer zoom levels draw on top.
    for tile in tiles.iter().filter(|t| t.style == active) {
        let n = 1u32 << tile.coord.z;
        let tile_world = WORLD_SIZE / f64::from(n);
        let (sx, sy) = vp.world_to_screen(
            f64::from(tile.coord.x) * tile_world,
            f64::from(tile.coord.y) * tile_world,
        );
        let sx = sx + off;
        let size = tile_world * vp.scale;
        if sx + size < 0.0 || sx > w || sy + size < 0.0 || sy > h {
            continue;
        }
        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(&tile.image, sx, sy, size, size);
    }
}

fn draw_boundaries(ctx: &CanvasRenderingContext2d, vp: &Viewport, doc: &MapDocument, off: f64) {
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    for path in &doc.boundaries {
        ctx.set_stroke_style_str(path.color);
        ctx.set_line_width(path.weight);
        ctx.begin_path();
        for (i, point) in path.points.iter().enumerate() {
            let (x, y) = vp.lon_lat_to_screen(point[0], point[1]);
            if i == 0 {
                ctx.move_to(x + off, y);
            } else {
                ctx.line_to(x + off, y);
            }
        }
        ctx.stroke();
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_markers(
    ctx: &CanvasRenderingContext2d,
    w: f64,
    h: f64,
    vp: &Viewport,
    doc: &MapDocument,
    hovered: Option<usize>,
    selected: Option<usize>,
    off: f64,
) {
    for (i, marker) in doc.quakes.iter().enumerate() {
        // Degenerate radii (zero/negative magnitude) have nothing to draw.
        let radius = marker.radius;
        if radius <= 0.0 {
            continue;
        }
        let (x, y) = vp.lon_lat_to_screen(marker.lon, marker.lat);
        let x = x + off;
        if x + radius < 0.0 || x - radius > w || y + radius < 0.0 || y - radius > h {
            continue;
        }

        ctx.begin_path();
        let _ = ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU);
        ctx.set_global_alpha(MARKER_FILL_OPACITY);
        ctx.set_fill_style_str(marker.fill_color);
        ctx.fill();
        ctx.set_global_alpha(1.0);
        ctx.set_stroke_style_str(MARKER_OUTLINE_COLOR);
        let emphasized = hovered == Some(i) || selected == Some(i);
        ctx.set_line_width(if emphasized {
            MARKER_OUTLINE_WEIGHT + 1.0
        } else {
            MARKER_OUTLINE_WEIGHT
        });
        ctx.stroke();
    }
}
