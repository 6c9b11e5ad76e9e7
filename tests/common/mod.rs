#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use annobox::geom::ImageBounds;

/// A 24-bit BMP file header plus DIB header for an image of `bounds`.
///
/// Only the headers are emitted; dimension probing never reads pixel data.
pub fn bmp_header(bounds: ImageBounds) -> Vec<u8> {
    let row_stride = (bounds.width_px * 3).div_ceil(4) * 4;
    let pixel_bytes = row_stride * bounds.height_px;
    let header_len = 14u32 + 40;

    let mut out = Vec::with_capacity(header_len as usize);
    // file header
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(header_len + pixel_bytes).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&header_len.to_le_bytes());
    // BITMAPINFOHEADER
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(bounds.width_px as i32).to_le_bytes());
    out.extend_from_slice(&(bounds.height_px as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&pixel_bytes.to_le_bytes());
    for _ in 0..4 {
        out.extend_from_slice(&0u32.to_le_bytes());
    }
    out
}

/// Writes `dir/name` holding only the headers of a BMP of `bounds`.
pub fn write_image_header(dir: &Path, name: &str, bounds: ImageBounds) -> PathBuf {
    fs::create_dir_all(dir).expect("create image dir");
    let path = dir.join(name);
    fs::write(&path, bmp_header(bounds)).expect("write image header");
    path
}
