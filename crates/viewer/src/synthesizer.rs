//! Tile query synthesis.
//!
//! Builds the `{z}/{x}/{y}` URL template handed to the map's COG layer.
//! Query parameters are appended in a fixed order so identical inputs always
//! produce byte-identical URLs.

use std::fmt;

use cog_client::encode_query_value;
use cog_common::{TileCoord, TilingScheme};

use crate::resolver::Resolution;

/// Rescale sent for three-band composites.
pub const TRUE_COLOR_RESCALE: &str = "0,255";

/// Where tiles are requested from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileEndpoint {
    base_url: String,
    scheme: TilingScheme,
}

impl TileEndpoint {
    pub fn new(base_url: impl Into<String>, scheme: TilingScheme) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, scheme }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn scheme(&self) -> TilingScheme {
        self.scheme
    }

    fn template_prefix(&self, locator: &str) -> String {
        format!(
            "{}/cog/tiles/{}/{{z}}/{{x}}/{{y}}.png?url={}",
            self.base_url,
            self.scheme.identifier(),
            encode_query_value(locator)
        )
    }
}

/// A tile URL template containing `{z}`, `{x}` and `{y}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileTemplate(String);

impl TileTemplate {
    /// Wrap a URL that already carries all three placeholders.
    pub fn from_url(url: &str) -> Option<Self> {
        ["{z}", "{x}", "{y}"]
            .iter()
            .all(|p| url.contains(p))
            .then(|| Self(url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Concrete URL for one tile.
    pub fn expand(&self, coord: TileCoord) -> String {
        self.0
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}

impl fmt::Display for TileTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TileTemplate> for String {
    fn from(template: TileTemplate) -> Self {
        template.0
    }
}

/// Build the tile URL template, or `None` when there is nothing to render
/// (blank locator or no metadata).
pub fn synthesize(
    endpoint: &TileEndpoint,
    locator: &str,
    resolution: &Resolution,
) -> Option<TileTemplate> {
    if locator.trim().is_empty() || !resolution.is_enabled() {
        return None;
    }

    let mut url = endpoint.template_prefix(locator);

    match resolution {
        Resolution::Disabled => {}
        Resolution::TrueColor => {
            url.push_str("&rescale=");
            url.push_str(TRUE_COLOR_RESCALE);
        }
        Resolution::Styled(q) => {
            url.push_str("&colormap_name=");
            url.push_str(q.colormap.as_str());

            if let Some(range) = q.rescale {
                url.push_str(&format!("&rescale={}", range));
            }
            if let Some(band) = q.band {
                url.push_str(&format!("&bidx={}", band));
            }
            if let Some(nodata) = q.nodata {
                url.push_str(&format!("&nodata={}", nodata));
            }
        }
    }

    Some(TileTemplate(url))
}
