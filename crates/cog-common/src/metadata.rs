//! Raster metadata as reported by the `/cog/info` endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{BoundingBox, ViewerError, ViewerResult};

/// Descriptive metadata for one raster.
///
/// Read-only once received. Bounds are only meaningful together with `crs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterMetadata {
    /// Band count
    pub count: u32,

    /// One entry per band
    #[serde(default)]
    pub band_descriptions: Vec<BandDescription>,

    pub width: u32,
    pub height: u32,

    /// Pixel data type label, e.g. "uint8"
    pub dtype: String,

    /// Driver label, e.g. "GTiff"
    pub driver: String,

    /// CRS identifier, e.g. "http://www.opengis.net/def/crs/EPSG/0/4326"
    #[serde(default)]
    pub crs: Option<String>,

    /// `[xmin, ymin, xmax, ymax]` in the raster's native CRS
    #[serde(default)]
    pub bounds: Option<Vec<f64>>,

    #[serde(default)]
    pub nodata_type: Option<String>,

    #[serde(default)]
    pub nodata_value: Option<f64>,

    #[serde(default)]
    pub colorinterp: Option<Vec<String>>,

    #[serde(default)]
    pub minzoom: Option<u8>,

    #[serde(default)]
    pub maxzoom: Option<u8>,
}

/// A band description, either `["b1", "red"]` or a bare string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BandDescription {
    Named(String, String),
    Plain(String),
}

impl BandDescription {
    /// Band name (`b1`, `b2`, ...) or the plain label.
    pub fn name(&self) -> &str {
        match self {
            BandDescription::Named(name, _) => name,
            BandDescription::Plain(label) => label,
        }
    }

    /// Free-text description, if any.
    pub fn description(&self) -> Option<&str> {
        match self {
            BandDescription::Named(_, desc) if !desc.is_empty() => Some(desc),
            _ => None,
        }
    }
}

impl RasterMetadata {
    /// Parse and validate a `/cog/info` response body.
    pub fn from_json(body: &str) -> ViewerResult<Self> {
        let metadata: RasterMetadata = serde_json::from_str(body)?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Reject responses that cannot drive rendering.
    pub fn validate(&self) -> ViewerResult<()> {
        if self.count == 0 {
            return Err(ViewerError::MalformedMetadata(
                "band count must be positive".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ViewerError::MalformedMetadata(format!(
                "invalid dimensions {}x{}",
                self.width, self.height
            )));
        }
        if !self.band_descriptions.is_empty() && self.band_descriptions.len() != self.count as usize
        {
            return Err(ViewerError::MalformedMetadata(format!(
                "{} band descriptions for {} bands",
                self.band_descriptions.len(),
                self.count
            )));
        }
        if let Some(bounds) = &self.bounds {
            BoundingBox::from_slice(bounds)
                .map_err(|e| ViewerError::MalformedMetadata(e.to_string()))?;
        }
        Ok(())
    }

    /// Native bounds, if reported.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounds
            .as_deref()
            .and_then(|b| BoundingBox::from_slice(b).ok())
    }

    /// CRS as shown to the user: the trailing `/` segment of the
    /// identifier, so an OGC URI reads `"4326"` and `"EPSG:4326"` is kept.
    pub fn crs_code_label(&self) -> Option<&str> {
        self.crs
            .as_deref()
            .and_then(|crs| crs.trim().rsplit('/').next())
            .filter(|label| !label.is_empty())
    }

    /// Three bands are treated as a true-color composite.
    pub fn is_true_color(&self) -> bool {
        self.count == 3
    }
}

/// Summary shown next to the map once metadata is available.
pub struct InfoPanel<'a>(pub &'a RasterMetadata);

impl fmt::Display for InfoPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        writeln!(f, "COG Information")?;
        writeln!(f, "  Dimensions: {} × {}", m.width, m.height)?;
        writeln!(f, "  Bands:      {}", m.count)?;
        writeln!(f, "  Data Type:  {}", m.dtype)?;
        writeln!(f, "  Driver:     {}", m.driver)?;
        write!(f, "  CRS:        {}", m.crs_code_label().unwrap_or("-"))
    }
}
