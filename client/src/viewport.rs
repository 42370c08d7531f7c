use crate::project::project;

/// Viewport manages the pan/zoom transformation from world coordinates
/// (zoom-0 Web Mercator pixels) to screen coordinates.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    /// Screen pixels per world pixel; `2^zoom` in slippy-map terms.
    pub scale: f64,
}

const MIN_SCALE: f64 = 1.0; // zoom 0
const MAX_SCALE: f64 = 262_144.0; // zoom 18
const ZOOM_SENSITIVITY: f64 = 0.002;

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 16.0, // zoom 4
        }
    }
}

impl Viewport {
    /// Convert world coordinates to screen coordinates.
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        (
            wx * self.scale + self.offset_x,
            wy * self.scale + self.offset_y,
        )
    }

    /// Convert screen coordinates to world coordinates.
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        )
    }

    /// Project a longitude/latitude straight to screen coordinates.
    pub fn lon_lat_to_screen(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (wx, wy) = project(lon, lat);
        self.world_to_screen(wx, wy)
    }

    /// Slippy-map zoom level currently displayed.
    pub fn zoom_level(&self) -> f64 {
        self.scale.log2()
    }

    /// Zoom toward a focus point (screen coordinates).
    pub fn zoom_at(&mut self, delta: f64, screen_x: f64, screen_y: f64) {
        let factor = (-delta * ZOOM_SENSITIVITY).exp();
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;

        // Adjust offset so the point under the cursor stays fixed
        self.offset_x = screen_x - (screen_x - self.offset_x) * ratio;
        self.offset_y = screen_y - (screen_y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    /// Pan by screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Center the view on a longitude/latitude at a slippy zoom level.
    pub fn center_on(&mut self, lon: f64, lat: f64, zoom: f64, canvas_w: f64, canvas_h: f64) {
        self.scale = 2f64.powf(zoom).clamp(MIN_SCALE, MAX_SCALE);
        let (wx, wy) = project(lon, lat);
        self.offset_x = canvas_w / 2.0 - wx * self.scale;
        self.offset_y = canvas_h / 2.0 - wy * self.scale;
    }
}
