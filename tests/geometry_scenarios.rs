//! End-to-end checks of the geometry core on small hand-worked cases.

use annobox::geom::{
    convert_segment_to_box, convert_segment_to_box_with, decode_axis_aligned_box,
    decode_rotated_box, decode_rotated_box_with, AxisAlignedBoxRecord, CanonicalBox, ClipPolicy,
    ImageBounds, PixelMode, RotatedBoxRecord, Segment, SegmentBoxOptions,
};
use annobox::AnnoboxError;

const SQUARE: ImageBounds = ImageBounds {
    width_px: 1000,
    height_px: 1000,
};

#[test]
fn axis_aligned_box_passes_through() {
    let bbox = decode_axis_aligned_box(AxisAlignedBoxRecord::new(10, 20, 110, 220)).unwrap();
    assert_eq!(
        bbox,
        CanonicalBox {
            class_id: 0,
            xmin: 10,
            ymin: 20,
            xmax: 110,
            ymax: 220,
        }
    );
}

#[test]
fn horizontal_segment_is_thickened_vertically() {
    let segment = Segment::from_coords(100.0, 100.0, 200.0, 100.0);
    let bbox = convert_segment_to_box(segment, 20.0, SQUARE).unwrap();
    assert_eq!(bbox, CanonicalBox::new(100, 90, 200, 110));
}

#[test]
fn unrotated_box_decodes_along_x_axis() {
    let record = RotatedBoxRecord::new(500.0, 500.0, 100.0, 20.0, 0.0);

    let segment = decode_rotated_box(record);
    assert_eq!(segment.p1.y, 500.0);
    assert_eq!(segment.p2.y, 500.0);
    assert_eq!(segment.midpoint().x, 500.0);
    assert_eq!(segment.length(), 100.0);

    let exact = decode_rotated_box_with(record, PixelMode::Subpixel);
    assert!((exact.length() - 100f64.hypot(20.0)).abs() < 1e-9);
    assert!((exact.midpoint().x - 500.0).abs() < 1e-9);
}

#[test]
fn negative_x_is_clamped_to_zero() {
    let segment = Segment::from_coords(-5.0, 300.0, 150.0, 300.0);
    let bbox = convert_segment_to_box(segment, 20.0, SQUARE).unwrap();
    assert_eq!(bbox.xmin, 0);
    assert_eq!(bbox, CanonicalBox::new(0, 290, 150, 310));
}

#[test]
fn upper_bounds_are_asymmetric_by_default() {
    let past_bottom = Segment::from_coords(500.0, 900.0, 500.0, 1005.0);
    let wide = ImageBounds::new(1200, 1000);
    let bbox = convert_segment_to_box(past_bottom, 20.0, wide).unwrap();
    assert_eq!(bbox.ymax, 999);
    assert_eq!(bbox, CanonicalBox::new(490, 900, 510, 999));

    // On a square image y is capped by the width first, so it stays at 1000
    // and never reaches the `height - 1` rule.
    let bbox = convert_segment_to_box(past_bottom, 20.0, SQUARE).unwrap();
    assert_eq!(bbox.ymax, 1000);

    let past_right = Segment::from_coords(900.0, 500.0, 1005.0, 500.0);
    let bbox = convert_segment_to_box(past_right, 20.0, SQUARE).unwrap();
    assert_eq!(bbox.xmax, 1000);
    assert_eq!(bbox, CanonicalBox::new(900, 490, 1000, 510));
}

#[test]
fn symmetric_policy_treats_both_axes_alike() {
    let options = SegmentBoxOptions {
        clip_policy: ClipPolicy::Symmetric,
        ..Default::default()
    };

    let past_bottom = Segment::from_coords(500.0, 900.0, 500.0, 1005.0);
    let bbox = convert_segment_to_box_with(past_bottom, &options, SQUARE).unwrap();
    assert_eq!(bbox.ymax, 1000);

    let past_right = Segment::from_coords(900.0, 500.0, 1005.0, 500.0);
    let bbox = convert_segment_to_box_with(past_right, &options, SQUARE).unwrap();
    assert_eq!(bbox.xmax, 1000);
}

#[test]
fn zero_length_segment_is_an_error_not_nan() {
    let segment = Segment::from_coords(400.0, 400.0, 400.0, 400.0);
    let err = convert_segment_to_box(segment, 20.0, SQUARE).unwrap_err();
    assert!(matches!(err, AnnoboxError::DegenerateInput { .. }));
}

#[test]
fn rotated_box_feeds_segment_pipeline() {
    let segment = decode_rotated_box(RotatedBoxRecord::new(200.0, 300.0, 60.0, 80.0, 0.0));
    assert_eq!(segment, Segment::from_coords(150.0, 300.0, 250.0, 300.0));

    let bbox = convert_segment_to_box(segment, 20.0, ImageBounds::new(1024, 1024)).unwrap();
    assert_eq!(bbox.to_string(), "0 150 290 250 310");
}
