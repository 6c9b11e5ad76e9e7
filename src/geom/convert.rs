//! Decoders from raw records to segments and canonical boxes.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::clip::{BoundsClipper, ClipPolicy};
use super::point::{Point2D, Segment};
use super::records::{AxisAlignedBoxRecord, CanonicalBox, ImageBounds, RotatedBoxRecord};
use super::rotation::rotate_yx;
use crate::error::AnnoboxError;

/// Perpendicular thickness (in pixels) given to a segment when none is configured.
pub const DEFAULT_SEGMENT_WIDTH_PX: f64 = 20.0;

/// How floating-point geometry is snapped onto the integer pixel grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PixelMode {
    /// Truncate toward zero at the same steps the source labeling pipeline
    /// does: rotated-box centers, half-lengths and offsets, segment endpoints
    /// and perpendicular offsets. Output is bit-compatible with that pipeline.
    #[default]
    Integer,
    /// Keep full precision; the final box is floored on its min corner and
    /// ceiled on its max corner.
    Subpixel,
}

impl PixelMode {
    pub fn name(&self) -> &'static str {
        match self {
            PixelMode::Integer => "integer",
            PixelMode::Subpixel => "subpixel",
        }
    }

    #[inline]
    fn snap(&self, point: Point2D) -> Point2D {
        match self {
            PixelMode::Integer => point.trunc(),
            PixelMode::Subpixel => point,
        }
    }
}

/// Options for [`convert_segment_to_box_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentBoxOptions {
    /// Full perpendicular thickness of the box around the segment.
    pub width_px: f64,
    pub clip_policy: ClipPolicy,
    pub pixel_mode: PixelMode,
}

impl Default for SegmentBoxOptions {
    fn default() -> Self {
        Self {
            width_px: DEFAULT_SEGMENT_WIDTH_PX,
            clip_policy: ClipPolicy::default(),
            pixel_mode: PixelMode::default(),
        }
    }
}

/// The four corners of a segment thickened by a perpendicular offset.
///
/// Corner order is `p1 + n, p1 - n, p2 + n, p2 - n`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedRectangle {
    pub corners: [Point2D; 4],
}

impl OrientedRectangle {
    /// Builds the rectangle around `segment` using the perpendicular offset `n`.
    pub fn from_segment(segment: Segment, n: Point2D) -> Self {
        Self {
            corners: [
                segment.p1 + n,
                segment.p1 - n,
                segment.p2 + n,
                segment.p2 - n,
            ],
        }
    }

    /// Axis-aligned envelope as `(min, max)`.
    pub fn envelope(&self) -> (Point2D, Point2D) {
        self.corners.iter().fold(
            (
                Point2D::new(f64::INFINITY, f64::INFINITY),
                Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(min, max), c| {
                (
                    Point2D::new(min.x.min(c.x), min.y.min(c.y)),
                    Point2D::new(max.x.max(c.x), max.y.max(c.y)),
                )
            },
        )
    }
}

/// Decodes a rotated box into its long-axis segment, snapping like the
/// source pipeline ([`PixelMode::Integer`]).
pub fn decode_rotated_box(record: RotatedBoxRecord) -> Segment {
    decode_rotated_box_with(record, PixelMode::Integer)
}

/// Decodes a rotated box into the segment along its diagonal-length axis,
/// centered on the box center.
///
/// The stored angle is rescaled by `180 / π` and negated before rotating, so
/// a positive angle turns the axis clockwise on screen.
pub fn decode_rotated_box_with(record: RotatedBoxRecord, mode: PixelMode) -> Segment {
    let angle_deg = 180.0 * record.angle / PI;
    let center = mode.snap(record.center);

    let mut half_length = record.width.hypot(record.height) / 2.0;
    if mode == PixelMode::Integer {
        half_length = half_length.trunc();
    }

    // The rotated pair comes back as (Y, X) but is applied to (cx, cy) as-is.
    let (a, b) = rotate_yx((half_length, 0.0), -angle_deg);
    let v = mode.snap(Point2D::new(a, b));

    Segment::new(center - v, center + v)
}

/// Thickens a segment into an oriented rectangle.
///
/// Fails with [`AnnoboxError::DegenerateInput`] when the segment has no
/// direction.
pub fn oriented_rectangle(
    segment: Segment,
    width_px: f64,
    mode: PixelMode,
) -> Result<OrientedRectangle, AnnoboxError> {
    let segment = match mode {
        PixelMode::Integer => segment.trunc(),
        PixelMode::Subpixel => segment,
    };

    let degenerate = |message: &str| AnnoboxError::DegenerateInput {
        x1: segment.p1.x,
        y1: segment.p1.y,
        x2: segment.p2.x,
        y2: segment.p2.y,
        message: message.to_string(),
    };

    if !segment.p1.is_finite() || !segment.p2.is_finite() {
        return Err(degenerate("endpoint is not finite"));
    }

    if segment.is_degenerate() {
        return Err(degenerate("endpoints coincide, direction is undefined"));
    }
    let direction = segment.direction();
    let length = segment.length();
    if !length.is_finite() {
        return Err(degenerate("segment length overflows"));
    }

    if !width_px.is_finite() || width_px < 0.0 {
        return Err(AnnoboxError::invalid_record(format!(
            "segment width must be a finite non-negative number, got {width_px}"
        )));
    }

    // Per-component division; `1.0 / length` overflows for subnormal lengths.
    let unit = Point2D::new(direction.x / length, direction.y / length);
    let n = mode.snap(Point2D::new(-unit.y, unit.x) * (width_px / 2.0));
    if !n.is_finite() {
        return Err(degenerate("perpendicular offset is not finite"));
    }

    let rect = OrientedRectangle::from_segment(segment, n);
    if !rect.corners.iter().all(Point2D::is_finite) {
        return Err(degenerate("rectangle corner is not finite"));
    }
    Ok(rect)
}

/// Converts a segment into a clipped axis-aligned box using the default
/// clip policy and pixel mode.
pub fn convert_segment_to_box(
    segment: Segment,
    width_px: f64,
    bounds: ImageBounds,
) -> Result<CanonicalBox, AnnoboxError> {
    let options = SegmentBoxOptions {
        width_px,
        ..Default::default()
    };
    convert_segment_to_box_with(segment, &options, bounds)
}

/// Converts a segment into a clipped axis-aligned box.
pub fn convert_segment_to_box_with(
    segment: Segment,
    options: &SegmentBoxOptions,
    bounds: ImageBounds,
) -> Result<CanonicalBox, AnnoboxError> {
    if bounds.width_px == 0 || bounds.height_px == 0 {
        return Err(AnnoboxError::invalid_record(format!(
            "image bounds {}x{} must be positive",
            bounds.width_px, bounds.height_px
        )));
    }

    let mut rect = oriented_rectangle(segment, options.width_px, options.pixel_mode)?;
    BoundsClipper::new(bounds, options.clip_policy).clip_points(&mut rect.corners);

    let (min, max) = rect.envelope();
    Ok(CanonicalBox::new(
        min.x.floor() as u32,
        min.y.floor() as u32,
        max.x.ceil() as u32,
        max.y.ceil() as u32,
    ))
}

/// Passes an axis-aligned record through as a canonical box.
///
/// No clipping is applied. A record with `xmin > xmax` or `ymin > ymax` is
/// rejected rather than repaired.
pub fn decode_axis_aligned_box(
    record: AxisAlignedBoxRecord,
) -> Result<CanonicalBox, AnnoboxError> {
    if record.xmin > record.xmax || record.ymin > record.ymax {
        return Err(AnnoboxError::invalid_record(format!(
            "axis-aligned box ({}, {}, {}, {}) has min greater than max",
            record.xmin, record.ymin, record.xmax, record.ymax
        )));
    }

    Ok(CanonicalBox::new(
        record.xmin,
        record.ymin,
        record.xmax,
        record.ymax,
    ))
}
