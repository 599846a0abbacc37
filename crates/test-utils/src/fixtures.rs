//! Common test fixtures for COG viewer tests.
//!
//! Metadata builders and raw service payloads for the raster shapes the
//! viewer treats differently: single band, true-color RGB, multi-band.

use cog_common::{BandDescription, RasterMetadata};

/// Locator used throughout the scenario tests.
pub const LOCATOR: &str = "https://x/test.tif";

/// Service root the fixtures assume.
pub const SERVICE_URL: &str = "http://127.0.0.1:8000";

/// Tile URL prefix for [`LOCATOR`] against [`SERVICE_URL`].
pub const TILE_PREFIX: &str =
    "http://127.0.0.1:8000/cog/tiles/WebMercatorQuad/{z}/{x}/{y}.png?url=https%3A%2F%2Fx%2Ftest.tif";

/// CRS identifiers as reported by the service.
pub mod crs {
    pub const EPSG_4326: &str = "http://www.opengis.net/def/crs/EPSG/0/4326";
    pub const EPSG_3857: &str = "http://www.opengis.net/def/crs/EPSG/0/3857";
    pub const UTM_33N: &str = "http://www.opengis.net/def/crs/EPSG/0/32633";
    pub const NO_CODE: &str = "http://www.opengis.net/def/crs/EPSG/0/";
}

/// Common bounding boxes as `[xmin, ymin, xmax, ymax]`.
pub mod bounds {
    /// Small square off the Gulf of Guinea
    pub const SQUARE_10: [f64; 4] = [0.0, 0.0, 10.0, 10.0];

    /// Continental United States
    pub const CONUS: [f64; 4] = [-130.0, 20.0, -60.0, 55.0];

    /// Whole world in degrees
    pub const GLOBAL: [f64; 4] = [-180.0, -90.0, 180.0, 90.0];
}

/// EPSG:4326 metadata with `count` bands over [`bounds::SQUARE_10`].
pub fn metadata(count: u32) -> RasterMetadata {
    RasterMetadata {
        count,
        band_descriptions: (1..=count)
            .map(|b| BandDescription::Named(format!("b{}", b), String::new()))
            .collect(),
        width: 1024,
        height: 1024,
        dtype: if count == 3 { "uint8" } else { "float32" }.to_string(),
        driver: "GTiff".to_string(),
        crs: Some(crs::EPSG_4326.to_string()),
        bounds: Some(bounds::SQUARE_10.to_vec()),
        nodata_type: Some("None".to_string()),
        nodata_value: None,
        colorinterp: None,
        minzoom: Some(5),
        maxzoom: Some(10),
    }
}

/// Metadata with a specific CRS identifier and bounds.
pub fn metadata_in(count: u32, crs: Option<&str>, bounds: Option<[f64; 4]>) -> RasterMetadata {
    RasterMetadata {
        crs: crs.map(str::to_string),
        bounds: bounds.map(|b| b.to_vec()),
        ..metadata(count)
    }
}
