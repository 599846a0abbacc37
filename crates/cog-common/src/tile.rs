//! Tile coordinates and the tiling scheme used for tile requests.

use crate::crs::WEB_MERCATOR_MAX_EXTENT;
use crate::{BoundingBox, CrsCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deepest zoom level requested from the tile endpoint.
pub const MAX_ZOOM: u32 = 22;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level (TileMatrix identifier)
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Tile matrix set identifier placed in the tile URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TilingScheme {
    /// Google/OSM compatible Web Mercator quadtree
    #[default]
    WebMercatorQuad,
}

impl TilingScheme {
    pub fn identifier(&self) -> &'static str {
        match self {
            TilingScheme::WebMercatorQuad => "WebMercatorQuad",
        }
    }

    pub fn crs(&self) -> CrsCode {
        match self {
            TilingScheme::WebMercatorQuad => CrsCode::Epsg3857,
        }
    }
}

impl fmt::Display for TilingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for TilingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "WebMercatorQuad" => Ok(TilingScheme::WebMercatorQuad),
            other => Err(format!("unsupported tiling scheme: {}", other)),
        }
    }
}

/// Edge length of one Web Mercator tile at `zoom`, in meters.
pub fn mercator_tile_span(zoom: u32) -> f64 {
    2.0 * WEB_MERCATOR_MAX_EXTENT / 2u32.pow(zoom) as f64
}

/// All Web Mercator tiles at `zoom` touching an EPSG:3857 extent.
///
/// The extent is clipped to the valid Web Mercator square first; an extent
/// entirely outside it yields no tiles.
pub fn tiles_covering(extent: &BoundingBox, zoom: u32) -> Vec<TileCoord> {
    let Some(clipped) = extent.intersection(&CrsCode::Epsg3857.valid_bounds()) else {
        return Vec::new();
    };

    let n = 2u32.pow(zoom);
    let span = mercator_tile_span(zoom);
    let to_col = |x: f64| (((x + WEB_MERCATOR_MAX_EXTENT) / span).floor() as u32).min(n - 1);
    let to_row = |y: f64| (((WEB_MERCATOR_MAX_EXTENT - y) / span).floor() as u32).min(n - 1);

    let (min_col, max_col) = (to_col(clipped.min_x), to_col(clipped.max_x));
    let (min_row, max_row) = (to_row(clipped.max_y), to_row(clipped.min_y));

    (min_row..=max_row)
        .flat_map(|y| (min_col..=max_col).map(move |x| TileCoord::new(zoom, x, y)))
        .collect()
}
