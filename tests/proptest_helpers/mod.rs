#![allow(dead_code)]

use annobox::geom::{ImageBounds, Point2D, RotatedBoxRecord, Segment};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Relative tolerance for floating-point comparisons.
pub const EPS_REL: f64 = 1e-9;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(256);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn approx_eq(a: f64, b: f64, scale: f64) -> bool {
    (a - b).abs() <= EPS_REL * scale.max(1.0)
}

pub fn arb_bounds() -> BoxedStrategy<ImageBounds> {
    (1u32..=4096, 1u32..=4096)
        .prop_map(|(w, h)| ImageBounds::new(w, h))
        .boxed()
}

pub fn arb_angle_deg() -> BoxedStrategy<f64> {
    (-720.0f64..720.0).boxed()
}

/// Points anywhere on or off an image of up to 4096 pixels.
pub fn arb_point() -> BoxedStrategy<Point2D> {
    (-5000.0f64..5000.0, -5000.0f64..5000.0)
        .prop_map(|(x, y)| Point2D::new(x, y))
        .boxed()
}

/// Bounds together with a non-degenerate segment whose endpoints lie in
/// `[0, width] x [0, height]`.
pub fn arb_bounds_and_segment() -> BoxedStrategy<(ImageBounds, Segment)> {
    arb_bounds()
        .prop_flat_map(|bounds| {
            let w = bounds.width_px as f64;
            let h = bounds.height_px as f64;
            (
                Just(bounds),
                (0.0..=w, 0.0..=h, 0.0..=w, 0.0..=h)
                    .prop_map(|(x1, y1, x2, y2)| Segment::from_coords(x1, y1, x2, y2)),
            )
        })
        .prop_filter("segment must have a direction", |(_, s)| s.length() > 1e-6)
        .boxed()
}

/// Bounds together with an integer-valued, non-degenerate segment whose
/// endpoints stay clear of both the bottom row and the width cap on y.
pub fn arb_bounds_and_pixel_segment() -> BoxedStrategy<(ImageBounds, Segment)> {
    (2u32..=4096, 2u32..=4096)
        .prop_flat_map(|(w, h)| {
            let y_max = (h - 1).min(w);
            (
                Just(ImageBounds::new(w, h)),
                (0..=w, 0..=y_max, 0..=w, 0..=y_max).prop_map(|(x1, y1, x2, y2)| {
                    Segment::from_coords(x1 as f64, y1 as f64, x2 as f64, y2 as f64)
                }),
            )
        })
        .prop_filter("segment must have a direction", |(_, s)| s.length() > 0.0)
        .boxed()
}

pub fn arb_rotated_box() -> BoxedStrategy<RotatedBoxRecord> {
    (
        0.0f64..4096.0,
        0.0f64..4096.0,
        0.5f64..2000.0,
        0.5f64..2000.0,
        -std::f64::consts::TAU..std::f64::consts::TAU,
    )
        .prop_map(|(cx, cy, w, h, angle)| RotatedBoxRecord::new(cx, cy, w, h, angle))
        .boxed()
}

pub fn arb_width_px() -> BoxedStrategy<f64> {
    (0.0f64..200.0).boxed()
}
