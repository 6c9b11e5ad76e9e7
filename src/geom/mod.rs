//! Annotation geometry: the pure core of annobox.
//!
//! Every labeling tool stores its shapes differently. This module turns each
//! raw shape into a single canonical form, an integer [`CanonicalBox`]
//! clipped to the image, without touching the filesystem.
//!
//! # Pipelines
//!
//! 1. **Segment**: [`convert_segment_to_box`] thickens a line segment by a
//!    perpendicular width into an [`OrientedRectangle`], clips its corners
//!    with a [`BoundsClipper`], and takes the axis-aligned envelope.
//! 2. **Rotated box**: [`decode_rotated_box`] reduces a rotated rectangle to
//!    the segment along its long axis (via [`rotate_yx`]), which then goes
//!    through the segment pipeline.
//! 3. **Axis-aligned box**: [`decode_axis_aligned_box`] checks ordering and
//!    passes the values through.
//!
//! # Example
//!
//! ```
//! use annobox::geom::{convert_segment_to_box, CanonicalBox, ImageBounds, Segment};
//!
//! let segment = Segment::from_coords(100.0, 100.0, 200.0, 100.0);
//! let bbox = convert_segment_to_box(segment, 20.0, ImageBounds::new(1000, 1000)).unwrap();
//! assert_eq!(bbox, CanonicalBox::new(100, 90, 200, 110));
//! assert_eq!(bbox.to_string(), "0 100 90 200 110");
//! ```

mod clip;
mod convert;
mod point;
mod records;
mod rotation;

pub use clip::{BoundsClipper, ClipPolicy};
pub use convert::{
    convert_segment_to_box, convert_segment_to_box_with, decode_axis_aligned_box,
    decode_rotated_box, decode_rotated_box_with, oriented_rectangle, OrientedRectangle, PixelMode,
    SegmentBoxOptions, DEFAULT_SEGMENT_WIDTH_PX,
};
pub use point::{Point2D, Segment};
pub use records::{
    AxisAlignedBoxRecord, CanonicalBox, ImageBounds, RawRecord, RotatedBoxRecord,
    DEFAULT_CLASS_ID,
};
pub use rotation::rotate_yx;
