//! Annotation readers, image-bounds providers and the box label writer.
//!
//! Readers turn one markup file into an [`AnnotationFile`]: the image it
//! belongs to, any dimensions embedded in the markup, and one raw record per
//! shape. A shape that cannot be parsed becomes an `Err` entry in
//! [`AnnotationFile::records`] so the remaining shapes still convert.

pub mod bounds;
pub mod io_box_txt;
pub mod io_labelme_json;
pub mod io_rotated_xml;
pub mod io_voc_xml;
mod xml;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::AnnoboxError;
use crate::geom::{ImageBounds, RawRecord};

/// Supported annotation input formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    /// LabelMe JSON with two-point line shapes.
    LabelMe,
    /// roLabelImg-style XML with `<robndbox>` rotated boxes.
    RotatedXml,
    /// Pascal VOC XML with `<bndbox>` axis-aligned boxes.
    VocXml,
}

impl InputFormat {
    /// Human-readable name for the format.
    pub fn name(&self) -> &'static str {
        match self {
            InputFormat::LabelMe => "labelme",
            InputFormat::RotatedXml => "rotated-xml",
            InputFormat::VocXml => "voc-xml",
        }
    }

    /// File extension of annotation files in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            InputFormat::LabelMe => "json",
            InputFormat::RotatedXml | InputFormat::VocXml => "xml",
        }
    }

    /// Reads one annotation file in this format.
    pub fn read(&self, path: &Path) -> Result<AnnotationFile, AnnoboxError> {
        match self {
            InputFormat::LabelMe => io_labelme_json::read_labelme_json(path),
            InputFormat::RotatedXml => io_rotated_xml::read_rotated_xml(path),
            InputFormat::VocXml => io_voc_xml::read_voc_xml(path),
        }
    }
}

impl std::str::FromStr for InputFormat {
    type Err = AnnoboxError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "labelme" | "labelme-json" => Ok(InputFormat::LabelMe),
            "rotated-xml" | "rolabelimg" => Ok(InputFormat::RotatedXml),
            "voc-xml" | "voc" => Ok(InputFormat::VocXml),
            other => Err(AnnoboxError::UnsupportedFormat(format!(
                "'{other}' (supported: labelme, rotated-xml, voc-xml)"
            ))),
        }
    }
}

/// The parsed contents of one annotation file.
#[derive(Debug)]
pub struct AnnotationFile {
    /// Path the file was read from (`<memory>` for in-memory parses).
    pub source: PathBuf,
    /// Image file name referenced by the markup, if any.
    pub image_ref: Option<String>,
    /// Image dimensions stored in the markup, if any.
    pub embedded_bounds: Option<ImageBounds>,
    /// One entry per shape, in document order.
    pub records: Vec<Result<RawRecord, AnnoboxError>>,
}

impl AnnotationFile {
    /// Key used to look up bounds and to name the output label file.
    ///
    /// Falls back to the annotation file's own name when the markup does not
    /// reference an image.
    pub fn image_key(&self) -> String {
        self.image_ref.clone().unwrap_or_else(|| {
            self.source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}

/// Collects annotation files for `format` under `input`.
///
/// A file path is returned as-is; a directory is walked recursively for files
/// with the format's extension. Results are sorted by relative path so batch
/// output is deterministic.
pub fn collect_annotation_files(
    input: &Path,
    format: InputFormat,
) -> Result<Vec<PathBuf>, AnnoboxError> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(AnnoboxError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input path {} does not exist", input.display()),
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).follow_links(true) {
        let entry = entry.map_err(|source| {
            AnnoboxError::Io(std::io::Error::other(format!(
                "failed while traversing {}: {source}",
                input.display()
            )))
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), format.extension()) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_by_cached_key(|path| rel_string(input, path));
    Ok(files)
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn format_parses_names_and_aliases() {
        assert_eq!("labelme".parse::<InputFormat>().unwrap(), InputFormat::LabelMe);
        assert_eq!("VOC".parse::<InputFormat>().unwrap(), InputFormat::VocXml);
        assert_eq!(
            "rotated-xml".parse::<InputFormat>().unwrap(),
            InputFormat::RotatedXml
        );
        assert!(matches!(
            "coco".parse::<InputFormat>(),
            Err(AnnoboxError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn collect_walks_directories_in_sorted_order() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(temp.path().join("b")).expect("create nested dir");
        fs::write(temp.path().join("b/one.json"), "{}").expect("write");
        fs::write(temp.path().join("a.JSON"), "{}").expect("write");
        fs::write(temp.path().join("c.xml"), "<a/>").expect("write");

        let files = collect_annotation_files(temp.path(), InputFormat::LabelMe).expect("collect");
        let rels: Vec<String> = files.iter().map(|p| rel_string(temp.path(), p)).collect();
        assert_eq!(rels, vec!["a.JSON", "b/one.json"]);

        let single =
            collect_annotation_files(&temp.path().join("c.xml"), InputFormat::VocXml).unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn collect_fails_for_missing_input() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = collect_annotation_files(&temp.path().join("nope"), InputFormat::VocXml);
        assert!(err.is_err());
    }

    #[test]
    fn image_key_falls_back_to_source_name() {
        let file = AnnotationFile {
            source: PathBuf::from("dir/plot_7.xml"),
            image_ref: None,
            embedded_bounds: None,
            records: vec![],
        };
        assert_eq!(file.image_key(), "plot_7.xml");
    }
}
