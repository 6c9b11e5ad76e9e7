//! Fuzz target for LabelMe JSON parsing.
//!
//! Feeds arbitrary bytes to the LabelMe reader and converts whatever records
//! come out, checking for panics, crashes, or hangs.
//!
//! Run with:
//!   cargo +nightly fuzz run labelme_json_parse

#![no_main]

use annobox::conversion::{convert_record, ConvertOptions};
use annobox::formats::io_labelme_json::from_labelme_slice;
use annobox::geom::ImageBounds;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid OOM on very large inputs.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(file) = from_labelme_slice(data) else {
        return;
    };
    let bounds = file.embedded_bounds.unwrap_or(ImageBounds::new(1000, 1000));
    for record in file.records.iter().flatten() {
        let _ = convert_record(record, &ConvertOptions::default(), || Ok(bounds));
    }
});
