//! Tests for BoundingBox operations.

use cog_common::bbox::{BboxParseError, BoundingBox};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
    assert_eq!(bbox.min_x, -180.0);
    assert_eq!(bbox.min_y, -90.0);
    assert_eq!(bbox.max_x, 180.0);
    assert_eq!(bbox.max_y, 90.0);
}

#[test]
fn test_bbox_array_order() {
    let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(bbox.to_array(), [1.0, 2.0, 3.0, 4.0]);
}

// ============================================================================
// from_slice tests
// ============================================================================

#[test]
fn test_from_slice_web_mercator() {
    let bbox =
        BoundingBox::from_slice(&[-20037508.34, -20037508.34, 20037508.34, 20037508.34]).unwrap();
    assert!((bbox.min_x - (-20037508.34)).abs() < 0.01);
    assert!((bbox.max_x - 20037508.34).abs() < 0.01);
}

#[test]
fn test_from_slice_too_few() {
    let result = BoundingBox::from_slice(&[0.0, 0.0, 100.0]);
    assert!(matches!(result, Err(BboxParseError::InvalidLength(3))));
}

#[test]
fn test_from_slice_too_many() {
    let result = BoundingBox::from_slice(&[0.0, 0.0, 100.0, 100.0, 200.0]);
    assert!(matches!(result, Err(BboxParseError::InvalidLength(5))));
}

#[test]
fn test_from_slice_empty() {
    let result = BoundingBox::from_slice(&[]);
    assert!(matches!(result, Err(BboxParseError::InvalidLength(0))));
}

#[test]
fn test_from_slice_nan() {
    let result = BoundingBox::from_slice(&[0.0, f64::NAN, 100.0, 100.0]);
    assert!(matches!(result, Err(BboxParseError::NonFinite(_))));
}

// ============================================================================
// Dimension tests
// ============================================================================

#[test]
fn test_bbox_width() {
    let bbox = BoundingBox::new(10.0, 0.0, 30.0, 10.0);
    assert_eq!(bbox.width(), 20.0);
}

#[test]
fn test_bbox_height() {
    let bbox = BoundingBox::new(0.0, 5.0, 10.0, 25.0);
    assert_eq!(bbox.height(), 20.0);
}

#[test]
fn test_bbox_center() {
    let bbox = BoundingBox::new(-10.0, -4.0, 10.0, 8.0);
    assert_eq!(bbox.center(), (0.0, 2.0));
}

// ============================================================================
// Intersection edge tests
// ============================================================================

#[test]
fn test_touching_boxes_do_not_intersect() {
    let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let b = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
    assert!(!a.intersects(&b));
    assert!(a.intersection(&b).is_none());
}
