//! Coordinate Reference System types and utilities.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::BoundingBox;

/// Half the side of the Web Mercator square, in meters.
pub const WEB_MERCATOR_MAX_EXTENT: f64 = 20037508.342789244;

/// CRS codes the viewer can reproject from or display in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// Web Mercator (meters), the display projection
    Epsg3857,
}

impl CrsCode {
    /// Parse a projection label.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326"
    /// - "epsg:3857"
    /// - "CRS:84" (equivalent to EPSG:4326 with lon/lat axis order)
    pub fn from_wms_string(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "EPSG:4326" | "CRS:84" | "OGC:CRS84" => Ok(CrsCode::Epsg4326),
            "EPSG:3857" | "EPSG:900913" => Ok(CrsCode::Epsg3857),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// Resolve the CRS of a raster from the identifier reported by the
    /// raster info endpoint, e.g. `http://www.opengis.net/def/crs/EPSG/0/4326`.
    pub fn from_identifier(identifier: &str) -> Result<Self, CrsParseError> {
        let label = source_label(identifier)
            .ok_or_else(|| CrsParseError::MalformedIdentifier(identifier.to_string()))?;
        Self::from_wms_string(&label)
    }

    /// Numeric EPSG code.
    pub fn epsg(&self) -> u32 {
        match self {
            CrsCode::Epsg4326 => 4326,
            CrsCode::Epsg3857 => 3857,
        }
    }

    /// Get the valid bounds for this CRS.
    pub fn valid_bounds(&self) -> BoundingBox {
        match self {
            CrsCode::Epsg4326 => BoundingBox::new(-180.0, -90.0, 180.0, 90.0),
            CrsCode::Epsg3857 => BoundingBox::new(
                -WEB_MERCATOR_MAX_EXTENT,
                -WEB_MERCATOR_MAX_EXTENT,
                WEB_MERCATOR_MAX_EXTENT,
                WEB_MERCATOR_MAX_EXTENT,
            ),
        }
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/// Trailing segment of a CRS identifier: the authority code.
///
/// `".../EPSG/0/4326"` yields `"4326"`. A bare `"EPSG:4326"` label yields
/// `"4326"` as well. Returns `None` for blank identifiers.
pub fn authority_code(identifier: &str) -> Option<&str> {
    let segment = identifier.trim().rsplit('/').next()?;
    let code = segment.rsplit(':').next()?.trim();
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

/// Projection label built from the authority code, e.g. `"EPSG:4326"`.
///
/// Returns `None` when the trailing segment is not a usable code.
pub fn source_label(identifier: &str) -> Option<String> {
    let code = authority_code(identifier)?;
    if code.chars().all(|c| c.is_ascii_digit()) {
        Some(format!("EPSG:{}", code))
    } else if code.eq_ignore_ascii_case("CRS84") {
        Some("CRS:84".to_string())
    } else {
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("No authority code in CRS identifier: {0:?}")]
    MalformedIdentifier(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crs() {
        assert_eq!(
            CrsCode::from_wms_string("EPSG:4326").unwrap(),
            CrsCode::Epsg4326
        );
        assert_eq!(
            CrsCode::from_wms_string("epsg:3857").unwrap(),
            CrsCode::Epsg3857
        );
        assert_eq!(
            CrsCode::from_wms_string("CRS:84").unwrap(),
            CrsCode::Epsg4326
        );
        assert!(CrsCode::from_wms_string("EPSG:99999").is_err());
    }

    #[test]
    fn test_authority_code() {
        assert_eq!(
            authority_code("http://www.opengis.net/def/crs/EPSG/0/4326"),
            Some("4326")
        );
        assert_eq!(authority_code("EPSG:3857"), Some("3857"));
        assert_eq!(authority_code("https://example.com/crs/"), None);
        assert_eq!(authority_code("   "), None);
    }

    #[test]
    fn test_from_identifier() {
        assert_eq!(
            CrsCode::from_identifier("http://www.opengis.net/def/crs/EPSG/0/4326").unwrap(),
            CrsCode::Epsg4326
        );
        assert_eq!(
            CrsCode::from_identifier("http://www.opengis.net/def/crs/OGC/1.3/CRS84").unwrap(),
            CrsCode::Epsg4326
        );
        assert!(matches!(
            CrsCode::from_identifier("http://www.opengis.net/def/crs/EPSG/0/32633"),
            Err(CrsParseError::UnsupportedCrs(_))
        ));
        assert!(matches!(
            CrsCode::from_identifier("not-a-crs"),
            Err(CrsParseError::MalformedIdentifier(_))
        ));
    }
}
