use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use js_sys::Reflect;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

use tremor_shared::{BaseLayer, BaseStyle};

use crate::project::WORLD_SIZE;
use crate::viewport::Viewport;

const TILE_CONCURRENCY: usize = 6;
/// Loaded tiles kept before distant zoom levels are evicted.
const TILE_CACHE_MAX: usize = 256;
const ONLOAD_HANDLE_KEY: &str = "__tremorTileOnload";
const ONERROR_HANDLE_KEY: &str = "__tremorTileOnerror";

/// Slippy-map tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// A loaded raster tile image for one base style.
#[derive(Clone)]
pub struct LoadedTile {
    pub style: BaseStyle,
    pub coord: TileCoord,
    pub image: HtmlImageElement,
}

#[derive(Clone)]
struct LoadJob {
    style: BaseStyle,
    coord: TileCoord,
    url: String,
}

thread_local! {
    // Tiles currently in flight, across all queues.
    static PENDING: RefCell<HashSet<(BaseStyle, TileCoord)>> = RefCell::new(HashSet::new());
}

/// Tiles covering the viewport at its nearest integer zoom level.
/// Columns wrap around the antimeridian; rows clamp at the poles.
pub fn visible_tiles(vp: &Viewport, canvas_w: f64, canvas_h: f64, max_zoom: u8) -> Vec<TileCoord> {
    if canvas_w <= 0.0 || canvas_h <= 0.0 {
        return Vec::new();
    }
    let z = vp.zoom_level().round().clamp(0.0, f64::from(max_zoom)) as u8;
    let n = 1i64 << z;
    let tile_world = WORLD_SIZE / n as f64;

    let (wx0, wy0) = vp.screen_to_world(0.0, 0.0);
    let (wx1, wy1) = vp.screen_to_world(canvas_w, canvas_h);

    let col0 = (wx0 / tile_world).floor() as i64;
    let col1 = (wx1 / tile_world).floor() as i64;
    let row0 = ((wy0 / tile_world).floor() as i64).clamp(0, n - 1);
    let row1 = ((wy1 / tile_world).floor() as i64).clamp(0, n - 1);

    let cols = (col1 - col0 + 1).clamp(0, n);
    let mut out = Vec::new();
    for row in row0..=row1 {
        for i in 0..cols {
            let x = (col0 + i).rem_euclid(n) as u32;
            out.push(TileCoord { z, x, y: row as u32 });
        }
    }
    out
}

/// Queue fetches for any of `coords` not already loaded or in flight.
/// Without an access token there is nothing to fetch.
pub fn request_tiles(
    tiles_signal: RwSignal<Vec<LoadedTile>>,
    layer: &BaseLayer,
    coords: Vec<TileCoord>,
) {
    if layer.access_token.is_empty() {
        return;
    }
    let loaded: HashSet<(BaseStyle, TileCoord)> =
        tiles_signal.with_untracked(|tiles| tiles.iter().map(|t| (t.style, t.coord)).collect());

    let jobs: VecDeque<LoadJob> = PENDING.with(|pending| {
        let mut pending = pending.borrow_mut();
        coords
            .into_iter()
            .filter(|&coord| !loaded.contains(&(layer.style, coord)))
            .filter(|&coord| pending.insert((layer.style, coord)))
            .map(|coord| LoadJob {
                style: layer.style,
                coord,
                url: layer.tile_url(coord.z, coord.x, coord.y),
            })
            .collect()
    });

    if jobs.is_empty() {
        return;
    }
    let queue = Rc::new(RefCell::new(jobs));
    let in_flight = Rc::new(Cell::new(0usize));
    pump_queue(tiles_signal, queue, in_flight);
}

fn pump_queue(
    tiles_signal: RwSignal<Vec<LoadedTile>>,
    queue: Rc<RefCell<VecDeque<LoadJob>>>,
    in_flight: Rc<Cell<usize>>,
) {
    while in_flight.get() < TILE_CONCURRENCY {
        let Some(job) = queue.borrow_mut().pop_front() else {
            break;
        };
        in_flight.set(in_flight.get() + 1);

        let queue_next = queue.clone();
        let in_flight_next = in_flight.clone();
        let on_done: Rc<dyn Fn()> = Rc::new(move || {
            in_flight_next.set(in_flight_next.get().saturating_sub(1));
            pump_queue(tiles_signal, queue_next.clone(), in_flight_next.clone());
        });

        load_tile_job(tiles_signal, job, on_done);
    }
}

fn load_tile_job(tiles_signal: RwSignal<Vec<LoadedTile>>, job: LoadJob, on_done: Rc<dyn Fn()>) {
    let img = match HtmlImageElement::new() {
        Ok(img) => img,
        Err(_) => {
            finish(job.style, job.coord);
            on_done();
            return;
        }
    };
    img.set_cross_origin(Some("anonymous"));

    let img_for_load = img.clone();
    let job_for_load = job.clone();
    let on_done_load = on_done.clone();
    let onload = Closure::<dyn FnMut()>::new(move || {
        clear_image_handlers(&img_for_load);

        let img_for_decode = img_for_load.clone();
        let job = job_for_load.clone();
        let on_done_load = on_done_load.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _ = JsFuture::from(img_for_decode.decode()).await;
            upsert_tile(
                tiles_signal,
                LoadedTile {
                    style: job.style,
                    coord: job.coord,
                    image: img_for_decode,
                },
            );
            finish(job.style, job.coord);
            on_done_load();
        });
    });

    let img_for_error = img.clone();
    let job_for_error = job.clone();
    let on_done_error = on_done.clone();
    let onerror = Closure::<dyn FnMut()>::new(move || {
        clear_image_handlers(&img_for_error);
        finish(job_for_error.style, job_for_error.coord);
        on_done_error();
    });

    let onload_js = onload.into_js_value();
    let onerror_js = onerror.into_js_value();
    img.set_onload(Some(onload_js.unchecked_ref()));
    img.set_onerror(Some(onerror_js.unchecked_ref()));
    let _ = Reflect::set(
        img.as_ref(),
        &JsValue::from_str(ONLOAD_HANDLE_KEY),
        &onload_js,
    );
    let _ = Reflect::set(
        img.as_ref(),
        &JsValue::from_str(ONERROR_HANDLE_KEY),
        &onerror_js,
    );
    img.set_src(&job.url);
}

fn finish(style: BaseStyle, coord: TileCoord) {
    PENDING.with(|pending| {
        pending.borrow_mut().remove(&(style, coord));
    });
}

fn clear_image_handlers(img: &HtmlImageElement) {
    img.set_onload(None);
    img.set_onerror(None);
    let _ = Reflect::delete_property(img.as_ref(), &JsValue::from_str(ONLOAD_HANDLE_KEY));
    let _ = Reflect::delete_property(img.as_ref(), &JsValue::from_str(ONERROR_HANDLE_KEY));
}

fn upsert_tile(tiles_signal: RwSignal<Vec<LoadedTile>>, incoming: LoadedTile) {
    tiles_signal.update(|loaded| {
        if loaded
            .iter()
            .any(|t| t.style == incoming.style && t.coord == incoming.coord)
        {
            return;
        }
        let z = incoming.coord.z;
        loaded.push(incoming);
        // Coarse tiles first so finer zoom levels draw over them.
        loaded.sort_by_key(|t| t.coord.z);
        if loaded.len() > TILE_CACHE_MAX {
            loaded.retain(|t| t.coord.z.abs_diff(z) <= 2);
        }
    });
}
