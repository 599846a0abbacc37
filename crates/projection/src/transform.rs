//! Extent reprojection between supported CRSs.

use cog_common::{BoundingBox, CrsCode};
use thiserror::Error;

use crate::mercator::{lonlat_to_mercator, mercator_to_lonlat};

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Non-finite coordinate in extent: {0:?}")]
    NonFinite([f64; 4]),

    #[error("Extent collapses to zero area after reprojection to {0}")]
    Degenerate(CrsCode),
}

/// Reproject an extent by transforming its four corners and taking the
/// envelope of the results.
pub fn transform_extent(
    extent: &BoundingBox,
    from: CrsCode,
    to: CrsCode,
) -> Result<BoundingBox, ProjectionError> {
    let values = extent.to_array();
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ProjectionError::NonFinite(values));
    }

    let project: fn(f64, f64) -> (f64, f64) = match (from, to) {
        (CrsCode::Epsg4326, CrsCode::Epsg3857) => lonlat_to_mercator,
        (CrsCode::Epsg3857, CrsCode::Epsg4326) => mercator_to_lonlat,
        (CrsCode::Epsg4326, CrsCode::Epsg4326) | (CrsCode::Epsg3857, CrsCode::Epsg3857) => {
            |x, y| (x, y)
        }
    };

    let corners = [
        (extent.min_x, extent.min_y),
        (extent.min_x, extent.max_y),
        (extent.max_x, extent.min_y),
        (extent.max_x, extent.max_y),
    ];

    let mut out = BoundingBox::new(
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    );
    for (x, y) in corners {
        let (px, py) = project(x, y);
        out.min_x = out.min_x.min(px);
        out.min_y = out.min_y.min(py);
        out.max_x = out.max_x.max(px);
        out.max_y = out.max_y.max(py);
    }

    if out.width() <= 0.0 && out.height() <= 0.0 {
        return Err(ProjectionError::Degenerate(to));
    }

    Ok(out)
}
