//! The live map and its COG tile layer.
//!
//! The map engine itself is external. [`MapHandle`] is the only surface the
//! viewer needs from it; [`MapContext`] owns one handle for the lifetime of a
//! session and guarantees the tile layer exists before any URL is pushed.

use cog_common::BoundingBox;
use tracing::{debug, info};

use crate::synthesizer::TileTemplate;

/// Identifier of a layer created on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u32);

/// Viewport padding in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Padding {
    pub fn uniform(px: u32) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }

    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(20)
    }
}

/// Operations the viewer performs on the map engine.
pub trait MapHandle: Send + 'static {
    /// Add an XYZ tile layer with an empty source above the basemap.
    fn add_tile_layer(&mut self) -> LayerId;

    /// Replace a tile layer's URL template; visible tiles re-render.
    fn set_layer_url(&mut self, layer: LayerId, url: &str);

    /// Fit the view to an extent in the display projection.
    fn fit_extent(&mut self, extent: BoundingBox, padding: Padding);

    /// Release the map from its render target.
    fn detach(&mut self);
}

/// Long-lived owner of the map and its COG layer.
pub struct MapContext<M: MapHandle> {
    map: M,
    layer: LayerId,
    current_url: Option<String>,
}

impl<M: MapHandle> MapContext<M> {
    /// Take ownership of a map and create the COG tile layer on it.
    pub fn attach(mut map: M) -> Self {
        let layer = map.add_tile_layer();
        debug!(layer = layer.0, "Attached COG tile layer");
        Self {
            map,
            layer,
            current_url: None,
        }
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// Push a tile template to the layer. Returns false if it was already
    /// the layer's source.
    pub fn apply_tile_url(&mut self, template: &TileTemplate) -> bool {
        if self.current_url.as_deref() == Some(template.as_str()) {
            debug!("Tile URL unchanged");
            return false;
        }

        self.map.set_layer_url(self.layer, template.as_str());
        self.current_url = Some(template.as_str().to_string());
        info!(url = %template, "Updated tile source");
        true
    }

    pub fn fit(&mut self, extent: BoundingBox, padding: Padding) {
        self.map.fit_extent(extent, padding);
    }

    /// Detach the map and hand it back.
    pub fn detach(mut self) -> M {
        self.map.detach();
        debug!("Detached map");
        self.map
    }
}
