//! Raw annotation records and the canonical box they are converted into.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::point::{Point2D, Segment};

/// Class id written for every box (single-class detection convention).
pub const DEFAULT_CLASS_ID: u32 = 0;

/// A rectangle stored by center, size and rotation.
///
/// `angle` is the labeling tool's raw rotation parameter. The decoder
/// rescales it by `180 / π` before treating it as degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotatedBoxRecord {
    pub center: Point2D,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
}

impl RotatedBoxRecord {
    pub fn new(cx: f64, cy: f64, width: f64, height: f64, angle: f64) -> Self {
        Self {
            center: Point2D::new(cx, cy),
            width,
            height,
            angle,
        }
    }

    /// Returns true if every field is finite.
    pub fn is_finite(&self) -> bool {
        self.center.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.angle.is_finite()
    }
}

/// An axis-aligned rectangle as stored by the source format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisAlignedBoxRecord {
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
}

impl AxisAlignedBoxRecord {
    pub fn new(xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }
}

/// The universal output: an axis-aligned, integer pixel box with a class id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalBox {
    pub class_id: u32,
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
}

impl CanonicalBox {
    /// Creates a box with [`DEFAULT_CLASS_ID`].
    pub fn new(xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> Self {
        Self {
            class_id: DEFAULT_CLASS_ID,
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Returns the same box with a different class id.
    pub fn with_class_id(self, class_id: u32) -> Self {
        Self { class_id, ..self }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.ymax - self.ymin
    }

    /// Returns true if the point lies inside the box (edges included).
    pub fn contains(&self, point: Point2D) -> bool {
        point.x >= self.xmin as f64
            && point.x <= self.xmax as f64
            && point.y >= self.ymin as f64
            && point.y <= self.ymax as f64
    }

    /// Returns true if the box lies within `[0, width] x [0, height]`.
    pub fn is_within(&self, bounds: ImageBounds) -> bool {
        self.xmin <= self.xmax
            && self.ymin <= self.ymax
            && self.xmax <= bounds.width_px
            && self.ymax <= bounds.height_px
    }
}

/// Serialized as `class_id xmin ymin xmax ymax`.
impl fmt::Display for CanonicalBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.class_id, self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}

/// Pixel dimensions of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageBounds {
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageBounds {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
        }
    }
}

/// A raw numeric record as produced by an annotation reader.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawRecord {
    Segment(Segment),
    RotatedBox(RotatedBoxRecord),
    AxisAlignedBox(AxisAlignedBoxRecord),
}

impl RawRecord {
    /// Short name of the record kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            RawRecord::Segment(_) => "segment",
            RawRecord::RotatedBox(_) => "rotated_box",
            RawRecord::AxisAlignedBox(_) => "axis_aligned_box",
        }
    }
}
