//! Fuzz target for rotated-box XML parsing.
//!
//! Parses arbitrary bytes as `<robndbox>` markup and pushes every decoded
//! record through the segment pipeline.

#![no_main]

use annobox::conversion::{convert_record, ConvertOptions};
use annobox::formats::io_rotated_xml::from_rotated_xml_slice;
use annobox::geom::ImageBounds;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(file) = from_rotated_xml_slice(data) else {
        return;
    };
    let bounds = file.embedded_bounds.unwrap_or(ImageBounds::new(1024, 768));
    for record in file.records.iter().flatten() {
        let _ = convert_record(record, &ConvertOptions::default(), || Ok(bounds));
    }
});
