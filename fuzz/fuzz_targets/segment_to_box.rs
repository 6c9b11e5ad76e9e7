//! Fuzz target for the segment-to-box pipeline.
//!
//! Reads endpoints, width and bounds straight from the input bytes, so NaN,
//! infinities and huge values all reach the converter. Any result other
//! than a box within bounds or an error is a bug.

#![no_main]

use annobox::geom::{
    convert_segment_to_box_with, ClipPolicy, ImageBounds, PixelMode, Segment, SegmentBoxOptions,
};
use libfuzzer_sys::fuzz_target;

fn f64_at(data: &[u8], idx: usize) -> f64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[idx * 8..idx * 8 + 8]);
    f64::from_le_bytes(bytes)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 * 8 + 9 {
        return;
    }

    let segment = Segment::from_coords(
        f64_at(data, 0),
        f64_at(data, 1),
        f64_at(data, 2),
        f64_at(data, 3),
    );
    let tail = &data[40..];
    let bounds = ImageBounds::new(
        u32::from_le_bytes([tail[8], tail[7], tail[6], 0]),
        u32::from_le_bytes([tail[5], tail[4], tail[3], 0]),
    );
    let options = SegmentBoxOptions {
        width_px: f64_at(data, 4),
        clip_policy: if tail[1] & 1 == 0 {
            ClipPolicy::SourceCompatible
        } else {
            ClipPolicy::Symmetric
        },
        pixel_mode: if tail[2] & 1 == 0 {
            PixelMode::Integer
        } else {
            PixelMode::Subpixel
        },
    };

    if let Ok(bbox) = convert_segment_to_box_with(segment, &options, bounds) {
        assert!(bbox.xmin <= bbox.xmax && bbox.ymin <= bbox.ymax);
        assert!(bbox.xmax <= bounds.width_px && bbox.ymax <= bounds.height_px);
    }
});
