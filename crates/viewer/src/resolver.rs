//! Rendering-parameter resolution.
//!
//! The band count alone decides which parameters reach the tile endpoint:
//!
//! | bands      | band select | colormap | rescale | nodata |
//! |------------|-------------|----------|---------|--------|
//! | none       | -           | -        | -       | -      |
//! | 1          | -           | yes      | yes     | yes    |
//! | 3          | -           | -        | fixed `0,255` | - |
//! | 2, 4+      | yes         | yes      | yes     | yes    |
//!
//! Three bands are presumed to be a true-color RGB composite.

use std::ops::RangeInclusive;

use cog_common::{Colormap, RasterMetadata};
use serde::Serialize;

use crate::params::{RenderParameters, RescaleRange};

/// Outcome of resolving parameters against the current metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Resolution {
    /// No metadata: nothing to render.
    Disabled,
    /// Three-band composite rendered with a fixed `0,255` rescale.
    TrueColor,
    /// Single-band rendering with the active parameters.
    Styled(StyledQuery),
}

/// Parameters active for a styled (non-RGB) raster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledQuery {
    pub band_count: u32,
    pub colormap: Colormap,
    /// Present only when both min and max were supplied.
    pub rescale: Option<RescaleRange>,
    /// Present only for multi-band, non-RGB rasters; always within `1..=band_count`.
    pub band: Option<u32>,
    pub nodata: Option<f64>,
}

/// Which inputs the user should be offered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Controls {
    pub band_options: Option<RangeInclusive<u32>>,
    pub rescale: bool,
    pub nodata: bool,
    pub colormap: bool,
}

impl Resolution {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Resolution::Disabled)
    }

    pub fn controls(&self) -> Controls {
        match self {
            Resolution::Disabled | Resolution::TrueColor => Controls::default(),
            Resolution::Styled(q) => Controls {
                band_options: q.band.map(|_| 1..=q.band_count),
                rescale: true,
                nodata: true,
                colormap: true,
            },
        }
    }
}

/// Decide which parameters apply given the current metadata.
///
/// Pure: an out-of-range band selection is clamped in the result, never
/// propagated.
pub fn resolve(metadata: Option<&RasterMetadata>, params: &RenderParameters) -> Resolution {
    let Some(metadata) = metadata else {
        return Resolution::Disabled;
    };

    match metadata.count {
        0 => Resolution::Disabled,
        3 => Resolution::TrueColor,
        count => Resolution::Styled(StyledQuery {
            band_count: count,
            colormap: params.colormap,
            rescale: params.rescale(),
            band: (count > 1).then(|| params.selected_band.clamp(1, count)),
            nodata: params.nodata_value,
        }),
    }
}
