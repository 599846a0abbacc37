//! Client for the raster tiling service's metadata endpoint.
//!
//! The viewer only needs one call from the service, `GET /cog/info`, so the
//! seam is a single-method trait. The HTTP implementation lives in [`http`];
//! tests substitute in-memory sources.

pub mod http;

use async_trait::async_trait;
use cog_common::{RasterMetadata, ViewerResult};

pub use http::{ClientConfig, HttpMetadataClient};

/// Anything that can describe a raster given its locator.
#[async_trait]
pub trait MetadataSource: Send + Sync + 'static {
    /// Fetch metadata for a local path or remote URL.
    async fn fetch_info(&self, locator: &str) -> ViewerResult<RasterMetadata>;
}

/// Percent-encode a value for use inside a query string.
pub fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
