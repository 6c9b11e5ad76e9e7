//! LabelMe JSON reader for line annotations.
//!
//! Each entry of `shapes` with exactly two points becomes a [`Segment`]
//! record. Shapes with any other point count are reported as invalid
//! records; they do not abort the rest of the file.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::AnnotationFile;
use crate::error::AnnoboxError;
use crate::geom::{ImageBounds, Point2D, RawRecord, Segment};

#[derive(Debug, Deserialize)]
struct LabelMeFile {
    shapes: Vec<LabelMeShape>,
    #[serde(rename = "imagePath", default)]
    image_path: Option<String>,
    #[serde(rename = "imageWidth", default)]
    image_width: Option<u32>,
    #[serde(rename = "imageHeight", default)]
    image_height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct LabelMeShape {
    #[serde(default)]
    label: String,
    points: Vec<[f64; 2]>,
    #[serde(default)]
    shape_type: Option<String>,
}

/// Read a LabelMe JSON file.
pub fn read_labelme_json(path: &Path) -> Result<AnnotationFile, AnnoboxError> {
    let file = File::open(path).map_err(AnnoboxError::Io)?;
    let reader = BufReader::new(file);

    let parsed: LabelMeFile =
        serde_json::from_reader(reader).map_err(|source| AnnoboxError::LabelMeJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    labelme_to_records(parsed, path)
}

/// Parse LabelMe JSON from a string.
pub fn from_labelme_str(json: &str) -> Result<AnnotationFile, AnnoboxError> {
    let path = Path::new("<memory>");
    let parsed: LabelMeFile =
        serde_json::from_str(json).map_err(|source| AnnoboxError::LabelMeJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    labelme_to_records(parsed, path)
}

/// Parse LabelMe JSON from bytes.
pub fn from_labelme_slice(bytes: &[u8]) -> Result<AnnotationFile, AnnoboxError> {
    let parsed: LabelMeFile =
        serde_json::from_slice(bytes).map_err(|source| AnnoboxError::LabelMeJsonParse {
            path: PathBuf::from("<memory>"),
            source,
        })?;
    labelme_to_records(parsed, Path::new("<memory>"))
}

fn labelme_to_records(parsed: LabelMeFile, path: &Path) -> Result<AnnotationFile, AnnoboxError> {
    let embedded_bounds = match (parsed.image_width, parsed.image_height) {
        (Some(0), _) | (_, Some(0)) => {
            return Err(AnnoboxError::LabelMeJsonInvalid {
                path: path.to_path_buf(),
                message: "imageWidth and imageHeight must be positive".to_string(),
            });
        }
        (Some(width), Some(height)) => Some(ImageBounds::new(width, height)),
        _ => None,
    };

    let image_ref = parsed
        .image_path
        .as_deref()
        .and_then(image_file_name)
        .map(ToOwned::to_owned);

    let records = parsed
        .shapes
        .into_iter()
        .enumerate()
        .map(|(idx, shape)| shape_to_segment(idx, &shape).map(RawRecord::Segment))
        .collect();

    Ok(AnnotationFile {
        source: path.to_path_buf(),
        image_ref,
        embedded_bounds,
        records,
    })
}

fn shape_to_segment(idx: usize, shape: &LabelMeShape) -> Result<Segment, AnnoboxError> {
    let describe = || {
        let kind = shape.shape_type.as_deref().unwrap_or("line");
        format!("shapes[{idx}] ('{}', {kind})", shape.label)
    };

    let [p1, p2] = shape.points.as_slice() else {
        return Err(AnnoboxError::invalid_record(format!(
            "{} has {} point(s); expected exactly 2",
            describe(),
            shape.points.len()
        )));
    };

    let segment = Segment::new(Point2D::new(p1[0], p1[1]), Point2D::new(p2[0], p2[1]));
    if !segment.p1.is_finite() || !segment.p2.is_finite() {
        return Err(AnnoboxError::invalid_record(format!(
            "{} has non-finite coordinates",
            describe()
        )));
    }
    Ok(segment)
}

/// LabelMe stores `imagePath` relative to the JSON file, often with
/// Windows separators. Only the file name is kept.
fn image_file_name(image_path: &str) -> Option<&str> {
    image_path
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
}
