//! User-adjustable rendering parameters.

use cog_common::{Colormap, ViewerError, ViewerResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Single-band vs. RGB discriminant offered in the controls.
///
/// Kept as state only. Rendering decisions key off the band count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandType {
    #[default]
    Single,
    Rgb,
}

impl std::str::FromStr for BandType {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(BandType::Single),
            "rgb" => Ok(BandType::Rgb),
            other => Err(ViewerError::InvalidParameter {
                param: "band_type".to_string(),
                message: format!("expected 'single' or 'rgb', got '{}'", other),
            }),
        }
    }
}

/// Parameters that persist across rasters. A new raster may invalidate the
/// band selection; the resolver clamps it rather than rejecting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderParameters {
    pub band_type: BandType,

    /// 1-based band index
    pub selected_band: u32,

    pub colormap: Colormap,

    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub nodata_value: Option<f64>,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            band_type: BandType::Single,
            selected_band: 1,
            colormap: Colormap::Viridis,
            min_value: None,
            max_value: None,
            nodata_value: None,
        }
    }
}

impl RenderParameters {
    /// Rescale range, only when both bounds are set.
    pub fn rescale(&self) -> Option<RescaleRange> {
        match (self.min_value, self.max_value) {
            (Some(min), Some(max)) => Some(RescaleRange { min, max }),
            _ => None,
        }
    }

    /// Clamp `selected_band` into `[1, band_count]`. Returns true if it moved.
    pub fn clamp_band(&mut self, band_count: u32) -> bool {
        let clamped = self.selected_band.clamp(1, band_count.max(1));
        let changed = clamped != self.selected_band;
        self.selected_band = clamped;
        changed
    }
}

/// Input range mapped onto the full color range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RescaleRange {
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for RescaleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.min, self.max)
    }
}

/// Parse a numeric form field. Blank input means "not supplied".
pub fn parse_optional_number(param: &str, input: &str) -> ViewerResult<Option<f64>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ViewerError::InvalidParameter {
            param: param.to_string(),
            message: format!("'{}' is not a number", input),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_requires_both_bounds() {
        let mut params = RenderParameters {
            min_value: Some(0.0),
            ..Default::default()
        };
        assert_eq!(params.rescale(), None);

        params.max_value = Some(100.0);
        assert_eq!(params.rescale().unwrap().to_string(), "0,100");

        params.min_value = None;
        assert_eq!(params.rescale(), None);
    }

    #[test]
    fn test_clamp_band() {
        let mut params = RenderParameters {
            selected_band: 5,
            ..Default::default()
        };
        assert!(params.clamp_band(2));
        assert_eq!(params.selected_band, 2);
        assert!(!params.clamp_band(2));

        params.selected_band = 0;
        assert!(params.clamp_band(4));
        assert_eq!(params.selected_band, 1);
    }

    #[test]
    fn test_parse_optional_number() {
        assert_eq!(parse_optional_number("min", "").unwrap(), None);
        assert_eq!(parse_optional_number("min", "  ").unwrap(), None);
        assert_eq!(parse_optional_number("min", "0").unwrap(), Some(0.0));
        assert_eq!(parse_optional_number("max", "-12.5").unwrap(), Some(-12.5));
        assert!(parse_optional_number("nodata", "abc").is_err());
    }

    #[test]
    fn test_parse_band_type() {
        assert_eq!("RGB".parse::<BandType>().unwrap(), BandType::Rgb);
        assert!("multi".parse::<BandType>().is_err());
    }
}
