//! Viewport synchronization: frame the map on the raster's footprint.

use cog_common::{BoundingBox, CrsCode, RasterMetadata, ViewerError, ViewerResult};
use projection::transform_extent;
use tracing::{info, warn};

use crate::map::{MapContext, MapHandle, Padding};

/// Projection the map displays in.
pub const DISPLAY_CRS: CrsCode = CrsCode::Epsg3857;

/// What happened when asked to frame the raster.
#[derive(Debug)]
pub enum FitOutcome {
    /// The map was fit to this display-projection extent.
    Fitted(BoundingBox),
    /// No metadata, or metadata without bounds; the view is unchanged.
    NoBounds,
    /// The bounds could not be reprojected; the view is unchanged.
    Skipped(ViewerError),
}

/// Raster bounds reprojected into the display projection.
///
/// `Ok(None)` when the metadata carries no bounds. The source projection is
/// derived from the trailing authority code of the CRS identifier; an
/// identifier without a usable code is an error.
pub fn display_extent(metadata: &RasterMetadata) -> ViewerResult<Option<BoundingBox>> {
    let Some(bounds) = metadata.bounding_box() else {
        return Ok(None);
    };

    let identifier = metadata
        .crs
        .as_deref()
        .ok_or_else(|| ViewerError::InvalidCrs("metadata has bounds but no CRS".to_string()))?;
    let source = CrsCode::from_identifier(identifier)?;

    transform_extent(&bounds, source, DISPLAY_CRS)
        .map(Some)
        .map_err(|e| ViewerError::ProjectionError(e.to_string()))
}

/// Fit the map to the raster's footprint.
///
/// Fails closed: anything that prevents a sensible extent leaves the view
/// where it is.
pub fn fit_viewport<M: MapHandle>(
    ctx: &mut MapContext<M>,
    metadata: Option<&RasterMetadata>,
    padding: Padding,
) -> FitOutcome {
    let Some(metadata) = metadata else {
        return FitOutcome::NoBounds;
    };

    match display_extent(metadata) {
        Ok(Some(extent)) => {
            ctx.fit(extent, padding);
            info!(extent = ?extent.to_array(), "Fit viewport to raster bounds");
            FitOutcome::Fitted(extent)
        }
        Ok(None) => FitOutcome::NoBounds,
        Err(e) => {
            warn!(crs = ?metadata.crs, error = %e, "Skipping viewport fit");
            FitOutcome::Skipped(e)
        }
    }
}
