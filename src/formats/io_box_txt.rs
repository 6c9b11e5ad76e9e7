//! Box label text writer.
//!
//! One `<image stem>.txt` per image, one line per box:
//! `class_id xmin ymin xmax ymax`, all integers separated by single spaces.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AnnoboxError;
use crate::geom::CanonicalBox;

/// Extension of the written label files.
pub const LABEL_EXTENSION: &str = "txt";

/// Renders boxes as label text, one line each, newline-terminated.
pub fn to_box_txt_string(boxes: &[CanonicalBox]) -> String {
    let mut out = String::with_capacity(boxes.len() * 24);
    for bbox in boxes {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{bbox}");
    }
    out
}

/// Name (without extension) of the label file written for `image_key`.
///
/// Images that differ only by extension share a label file.
pub fn label_stem(image_key: &str) -> String {
    Path::new(image_key)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| image_key.to_string())
}

/// Output path for an image's label file inside `output_dir`.
pub fn label_path_for(output_dir: &Path, image_key: &str) -> PathBuf {
    output_dir.join(format!("{}.{LABEL_EXTENSION}", label_stem(image_key)))
}

/// Writes the label file `<label_stem>.txt`, creating `output_dir` if needed.
///
/// An image with no boxes still gets an (empty) file, marking it as a
/// background image.
pub fn write_box_txt(
    output_dir: &Path,
    label_stem: &str,
    boxes: &[CanonicalBox],
) -> Result<PathBuf, AnnoboxError> {
    fs::create_dir_all(output_dir).map_err(AnnoboxError::Io)?;
    let path = output_dir.join(format!("{label_stem}.{LABEL_EXTENSION}"));
    fs::write(&path, to_box_txt_string(boxes)).map_err(AnnoboxError::Io)?;
    Ok(path)
}

/// Reads a label file back into boxes.
pub fn read_box_txt(path: &Path) -> Result<Vec<CanonicalBox>, AnnoboxError> {
    let text = fs::read_to_string(path).map_err(AnnoboxError::Io)?;
    from_box_txt_str(&text)
}

/// Parses label text.
pub fn from_box_txt_str(text: &str) -> Result<Vec<CanonicalBox>, AnnoboxError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(line, idx + 1))
        .collect()
}

fn parse_line(line: &str, line_num: usize) -> Result<CanonicalBox, AnnoboxError> {
    // At most 6 tokens so pathological lines do not allocate unbounded memory.
    let tokens: Vec<&str> = line.split_whitespace().take(6).collect();
    if tokens.len() != 5 {
        return Err(AnnoboxError::invalid_record(format!(
            "line {line_num}: expected exactly 5 integers (class_id xmin ymin xmax ymax)"
        )));
    }

    let mut values = [0u32; 5];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        *slot = token.parse::<u32>().map_err(|_| {
            AnnoboxError::invalid_record(format!(
                "line {line_num}: invalid value '{token}'; expected non-negative integer"
            ))
        })?;
    }

    let [class_id, xmin, ymin, xmax, ymax] = values;
    Ok(CanonicalBox::new(xmin, ymin, xmax, ymax).with_class_id(class_id))
}

/// Fuzz-only entrypoint for single-line label parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_box_line(input: &str) -> Result<(), AnnoboxError> {
    let _ = parse_line(input, 1)?;
    Ok(())
}
