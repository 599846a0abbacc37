//! A map without a screen.
//!
//! Tracks what a browser map would: the layer stack, the view center and
//! zoom, and the tiles that would be requested for the current view.
//! Clones share state, so the CLI can inspect a map owned by a session.

use std::sync::{Arc, Mutex, MutexGuard};

use cog_common::crs::WEB_MERCATOR_MAX_EXTENT;
use cog_common::{tiles_covering, BoundingBox, MAX_ZOOM};
use tracing::debug;
use viewer::{LayerId, MapHandle, Padding, TileTemplate};

/// OpenStreetMap raster tiles shown under the COG layer.
pub const BASEMAP_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Largest viewport side in pixels. Bounds a view to 33 × 33 tiles.
pub const MAX_VIEWPORT: u32 = 8192;

const TILE_SIZE: f64 = 256.0;

/// Meters per pixel at `zoom`.
pub fn resolution_at(zoom: u32) -> f64 {
    2.0 * WEB_MERCATOR_MAX_EXTENT / TILE_SIZE / 2f64.powi(zoom as i32)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub name: &'static str,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// EPSG:3857
    pub center: [f64; 2],
    pub zoom: u32,
    /// Pixels
    pub size: [u32; 2],
}

impl ViewState {
    /// EPSG:3857 extent currently on screen.
    pub fn extent(&self) -> BoundingBox {
        let res = resolution_at(self.zoom);
        let half_w = self.size[0] as f64 * res / 2.0;
        let half_h = self.size[1] as f64 * res / 2.0;
        BoundingBox::new(
            self.center[0] - half_w,
            self.center[1] - half_h,
            self.center[0] + half_w,
            self.center[1] + half_h,
        )
    }
}

#[derive(Debug)]
struct MapState {
    view: ViewState,
    layers: Vec<Layer>,
    attached: bool,
}

#[derive(Debug, Clone)]
pub struct HeadlessMap {
    state: Arc<Mutex<MapState>>,
}

impl HeadlessMap {
    /// A map showing the basemap at the given view. Each side of the view
    /// is clamped to `1..=MAX_VIEWPORT` pixels.
    pub fn new(view: ViewState) -> Self {
        let view = ViewState {
            size: view.size.map(|side| side.clamp(1, MAX_VIEWPORT)),
            ..view
        };
        let basemap = Layer {
            id: LayerId(0),
            name: "basemap",
            url: Some(BASEMAP_URL.to_string()),
        };
        Self {
            state: Arc::new(Mutex::new(MapState {
                view,
                layers: vec![basemap],
                attached: true,
            })),
        }
    }

    pub fn view(&self) -> ViewState {
        self.lock().view
    }

    pub fn layers(&self) -> Vec<Layer> {
        self.lock().layers.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.lock().attached
    }

    /// Concrete URLs of the COG tiles covering the current view.
    pub fn visible_tiles(&self) -> Vec<String> {
        let state = self.lock();
        let Some(template) = state
            .layers
            .iter()
            .filter(|l| l.id != LayerId(0))
            .find_map(|l| l.url.as_deref())
            .and_then(TileTemplate::from_url)
        else {
            return Vec::new();
        };

        tiles_covering(&state.view.extent(), state.view.zoom)
            .into_iter()
            .map(|coord| template.expand(coord))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MapState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MapHandle for HeadlessMap {
    fn add_tile_layer(&mut self) -> LayerId {
        let mut state = self.lock();
        let id = LayerId(state.layers.len() as u32);
        state.layers.push(Layer {
            id,
            name: "cog",
            url: None,
        });
        id
    }

    fn set_layer_url(&mut self, layer: LayerId, url: &str) {
        let mut state = self.lock();
        if let Some(target) = state.layers.iter_mut().find(|l| l.id == layer) {
            target.url = Some(url.to_string());
        }
    }

    /// Center on the extent and pick the deepest zoom that still shows all
    /// of it inside the padded viewport.
    fn fit_extent(&mut self, extent: BoundingBox, padding: Padding) {
        let mut state = self.lock();
        let [width, height] = state.view.size;
        let avail_w = width.saturating_sub(padding.horizontal()).max(1) as f64;
        let avail_h = height.saturating_sub(padding.vertical()).max(1) as f64;

        let needed = (extent.width() / avail_w).max(extent.height() / avail_h);
        let zoom = if needed > 0.0 {
            (resolution_at(0) / needed)
                .log2()
                .floor()
                .clamp(0.0, MAX_ZOOM as f64) as u32
        } else {
            MAX_ZOOM
        };

        // Keep the extent centered in the padded area, not the whole screen
        let res = resolution_at(zoom);
        let (cx, cy) = extent.center();
        let shift_x = (padding.right as f64 - padding.left as f64) / 2.0 * res;
        let shift_y = (padding.top as f64 - padding.bottom as f64) / 2.0 * res;

        state.view.center = [cx + shift_x, cy + shift_y];
        state.view.zoom = zoom;
        debug!(zoom, center = ?state.view.center, "Fit headless view");
    }

    fn detach(&mut self) {
        self.lock().attached = false;
    }
}
