//! Common types and utilities shared across the COG viewer crates.

pub mod bbox;
pub mod colormap;
pub mod crs;
pub mod error;
pub mod metadata;
pub mod tile;

pub use bbox::BoundingBox;
pub use colormap::Colormap;
pub use crs::{CrsCode, CrsParseError};
pub use error::{ViewerError, ViewerResult};
pub use metadata::{BandDescription, InfoPanel, RasterMetadata};
pub use tile::{tiles_covering, TileCoord, TilingScheme, MAX_ZOOM};
