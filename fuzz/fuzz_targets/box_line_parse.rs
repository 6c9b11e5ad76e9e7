//! Fuzz target for single-line box label parsing.

#![no_main]

use annobox::formats::io_box_txt::fuzz_parse_box_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_box_line(line);
});
