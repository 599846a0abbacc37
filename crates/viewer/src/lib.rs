//! Core of the COG viewer.
//!
//! Raster metadata and user-chosen rendering parameters flow through a small
//! pipeline:
//!
//! - [`resolver`] decides which parameters apply to the raster at hand
//! - [`synthesizer`] turns that decision into a tile URL template
//! - [`map`] owns the live map and its COG tile layer
//! - [`viewport`] reprojects raster bounds and fits the map to them
//! - [`fetcher`] debounces locator edits into metadata requests
//! - [`session`] dispatches every state change to the pieces above

pub mod fetcher;
pub mod map;
pub mod params;
pub mod resolver;
pub mod session;
pub mod synthesizer;
pub mod viewport;

pub use fetcher::{FetchOutcome, LocatorChange, MetadataFetcher, DEFAULT_DEBOUNCE};
pub use map::{LayerId, MapContext, MapHandle, Padding};
pub use params::{parse_optional_number, BandType, RenderParameters, RescaleRange};
pub use resolver::{resolve, Controls, Resolution, StyledQuery};
pub use session::{SessionConfig, SessionHandle, SessionSnapshot, ViewerCommand, ViewerSession};
pub use synthesizer::{synthesize, TileEndpoint, TileTemplate};
pub use viewport::{display_extent, fit_viewport, FitOutcome, DISPLAY_CRS};
