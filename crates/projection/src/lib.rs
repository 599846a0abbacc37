//! Coordinate reference system transformations.
//!
//! Implements the WGS84 / Web Mercator pair from scratch without external
//! dependencies. That pair covers every source the viewer accepts and the
//! fixed display projection.

pub mod mercator;
pub mod transform;

pub use mercator::{lonlat_to_mercator, mercator_to_lonlat, EARTH_RADIUS, MAX_LATITUDE};
pub use transform::{transform_extent, ProjectionError};
