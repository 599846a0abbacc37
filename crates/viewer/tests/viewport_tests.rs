//! Tests for viewport fitting through the session's show action.

use std::sync::Arc;

use test_utils::{
    assert_approx_eq, bounds, crs, metadata_in, RecordingMap, StaticMetadataSource, LOCATOR,
    SERVICE_URL,
};
use viewer::{display_extent, Padding, SessionConfig, ViewerCommand, ViewerSession};

async fn show(metadata: cog_common::RasterMetadata) -> RecordingMap {
    let source = StaticMetadataSource::new().with(LOCATOR, metadata);
    let map = RecordingMap::new();
    let mut session = ViewerSession::new(
        SessionConfig::new(SERVICE_URL),
        map.clone(),
        Arc::new(source),
    );
    session.dispatch(ViewerCommand::SetLocator(LOCATOR.to_string()));
    assert!(session.process_next_fetch().await);
    session.dispatch(ViewerCommand::Show);
    map
}

// ============================================================================
// Geographic sources
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_fit_geographic_bounds() {
    let map = show(metadata_in(1, Some(crs::EPSG_4326), Some(bounds::SQUARE_10))).await;

    let fits = map.fits();
    assert_eq!(fits.len(), 1);
    let extent = fits[0];
    assert_approx_eq!(extent.min_x, 0.0, 1e-6);
    assert_approx_eq!(extent.min_y, 0.0, 1e-6);
    assert_approx_eq!(extent.max_x, 1113194.9, 0.1);
    assert_approx_eq!(extent.max_y, 1118889.97, 0.1);
}

#[tokio::test(start_paused = true)]
async fn test_fit_uses_configured_padding() {
    let map = show(metadata_in(1, Some(crs::EPSG_4326), Some(bounds::CONUS))).await;

    let padding = map
        .calls()
        .into_iter()
        .find_map(|c| match c {
            test_utils::MapCall::FitExtent(_, padding) => Some(padding),
            _ => None,
        })
        .unwrap();
    assert_eq!(padding, Padding::uniform(20));
}

#[tokio::test(start_paused = true)]
async fn test_global_bounds_clamped_to_mercator_square() {
    let map = show(metadata_in(1, Some(crs::EPSG_4326), Some(bounds::GLOBAL))).await;

    let extent = map.fits()[0];
    assert_approx_eq!(extent.min_y, -20037508.342789244, 1e-3);
    assert_approx_eq!(extent.max_y, 20037508.342789244, 1e-3);
    assert_approx_eq!(extent.max_x, 20037508.342789244, 1e-3);
}

// ============================================================================
// Projected and unsupported sources
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_fit_web_mercator_bounds_unchanged() {
    let native = [1000.0, 2000.0, 3000.0, 4000.0];
    let map = show(metadata_in(1, Some(crs::EPSG_3857), Some(native))).await;

    assert_eq!(map.fits()[0].to_array(), native);
}

#[tokio::test(start_paused = true)]
async fn test_unsupported_crs_skips_fit_but_updates_layer() {
    let map = show(metadata_in(1, Some(crs::UTM_33N), Some([500000.0, 0.0, 600000.0, 1.0e5]))).await;

    assert!(map.fits().is_empty());
    assert_eq!(map.urls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_identifier_without_code_skips_fit() {
    let map = show(metadata_in(1, Some(crs::NO_CODE), Some(bounds::SQUARE_10))).await;

    assert!(map.fits().is_empty());
    assert_eq!(map.urls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_bounds_leaves_view() {
    let map = show(metadata_in(1, Some(crs::EPSG_4326), None)).await;

    assert!(map.fits().is_empty());
    assert_eq!(map.urls().len(), 1);
}

// ============================================================================
// display_extent
// ============================================================================

#[test]
fn test_display_extent_requires_crs_with_bounds() {
    assert!(display_extent(&metadata_in(1, None, Some(bounds::SQUARE_10))).is_err());
    assert!(display_extent(&metadata_in(1, None, None)).unwrap().is_none());
}
