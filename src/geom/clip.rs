//! Clamping points into image bounds.

use serde::{Deserialize, Serialize};

use super::point::Point2D;
use super::records::ImageBounds;

/// Which upper bounds the clipper applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClipPolicy {
    /// Bit-compatible with the labeling pipeline the boxes originally came from:
    ///
    /// 1. every coordinate below `0` becomes `0`;
    /// 2. every coordinate (x *and* y) above `width` becomes `width`;
    /// 3. every y above `height` becomes `height - 1`.
    ///
    /// The horizontal upper bound is inclusive while the vertical one is
    /// pulled in by one pixel, and y is also capped by the image width.
    #[default]
    #[serde(alias = "source")]
    SourceCompatible,
    /// `x` clamped into `[0, width]` and `y` into `[0, height]`.
    Symmetric,
}

impl ClipPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            ClipPolicy::SourceCompatible => "source-compatible",
            ClipPolicy::Symmetric => "symmetric",
        }
    }
}

/// Clamps points into `[0, width] x [0, height]` under a [`ClipPolicy`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundsClipper {
    bounds: ImageBounds,
    policy: ClipPolicy,
}

impl BoundsClipper {
    pub fn new(bounds: ImageBounds, policy: ClipPolicy) -> Self {
        Self { bounds, policy }
    }

    pub fn bounds(&self) -> ImageBounds {
        self.bounds
    }

    pub fn policy(&self) -> ClipPolicy {
        self.policy
    }

    /// Clips a single point.
    pub fn clip_point(&self, point: Point2D) -> Point2D {
        let width = self.bounds.width_px as f64;
        let height = self.bounds.height_px as f64;

        match self.policy {
            ClipPolicy::SourceCompatible => {
                let clamp_common = |v: f64| {
                    let v = if v < 0.0 { 0.0 } else { v };
                    if v > width {
                        width
                    } else {
                        v
                    }
                };
                let x = clamp_common(point.x);
                let mut y = clamp_common(point.y);
                if y > height {
                    y = height - 1.0;
                }
                Point2D::new(x, y)
            }
            ClipPolicy::Symmetric => {
                Point2D::new(point.x.clamp(0.0, width), point.y.clamp(0.0, height))
            }
        }
    }

    /// Clips every point in place.
    pub fn clip_points(&self, points: &mut [Point2D]) {
        for point in points.iter_mut() {
            *point = self.clip_point(*point);
        }
    }
}
