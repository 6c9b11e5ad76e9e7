//! Axis-aligned box XML reader (Pascal VOC layout).
//!
//! Every `<bndbox>` element with `xmin/ymin/xmax/ymax` children becomes one
//! [`AxisAlignedBoxRecord`]. Coordinates must be non-negative; fractional
//! values are truncated toward zero.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::xml::{descendants_named, parse_document, required_child_f64, root_filename, root_size};
use super::AnnotationFile;
use crate::error::AnnoboxError;
use crate::geom::{AxisAlignedBoxRecord, RawRecord};

/// Read an axis-aligned box XML file.
pub fn read_voc_xml(path: &Path) -> Result<AnnotationFile, AnnoboxError> {
    let xml = fs::read_to_string(path).map_err(AnnoboxError::Io)?;
    parse_voc_xml_str(&xml, path)
}

/// Parse VOC XML from a UTF-8 string.
pub fn from_voc_xml_str(xml: &str) -> Result<AnnotationFile, AnnoboxError> {
    parse_voc_xml_str(xml, Path::new("<memory>"))
}

/// Parse VOC XML from bytes.
///
/// The input must be valid UTF-8.
pub fn from_voc_xml_slice(bytes: &[u8]) -> Result<AnnotationFile, AnnoboxError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| AnnoboxError::XmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_voc_xml_str(xml)
}

fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<AnnotationFile, AnnoboxError> {
    let document = parse_document(xml, path)?;

    let records = descendants_named(&document, "bndbox")
        .enumerate()
        .map(|(idx, node)| {
            parse_bndbox(node, idx)
                .map(RawRecord::AxisAlignedBox)
                .map_err(AnnoboxError::invalid_record)
        })
        .collect();

    Ok(AnnotationFile {
        source: path.to_path_buf(),
        image_ref: root_filename(&document),
        embedded_bounds: root_size(&document, path)?,
        records,
    })
}

fn parse_bndbox(node: Node<'_, '_>, idx: usize) -> Result<AxisAlignedBoxRecord, String> {
    let context = format!("<bndbox> #{idx}");
    let xmin = pixel_coordinate(node, "xmin", &context)?;
    let ymin = pixel_coordinate(node, "ymin", &context)?;
    let xmax = pixel_coordinate(node, "xmax", &context)?;
    let ymax = pixel_coordinate(node, "ymax", &context)?;
    Ok(AxisAlignedBoxRecord::new(xmin, ymin, xmax, ymax))
}

fn pixel_coordinate(node: Node<'_, '_>, tag: &str, context: &str) -> Result<u32, String> {
    let value = required_child_f64(node, tag, context)?;
    if value < 0.0 || value > u32::MAX as f64 {
        return Err(format!(
            "<{tag}> value {value} in {context} is outside the pixel range"
        ));
    }
    Ok(value.trunc() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::ImageBounds;

    #[test]
    fn parse_voc_xml_extracts_boxes() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<annotation>
  <filename>img1.jpg</filename>
  <size>
    <width>640</width>
    <height>480</height>
    <depth>3</depth>
  </size>
  <object>
    <name>wheat_head</name>
    <bndbox>
      <xmin>10</xmin>
      <ymin>20</ymin>
      <xmax>30.9</xmax>
      <ymax>40</ymax>
    </bndbox>
  </object>
  <object>
    <name>wheat_head</name>
    <bndbox>
      <xmin>-4</xmin>
      <ymin>20</ymin>
      <xmax>30</xmax>
      <ymax>40</ymax>
    </bndbox>
  </object>
</annotation>"#;

        let file = from_voc_xml_str(xml).expect("parse xml");
        assert_eq!(file.image_ref.as_deref(), Some("img1.jpg"));
        assert_eq!(file.embedded_bounds, Some(ImageBounds::new(640, 480)));
        assert_eq!(file.records.len(), 2);
        assert_eq!(
            file.records[0].as_ref().ok(),
            Some(&RawRecord::AxisAlignedBox(AxisAlignedBoxRecord::new(
                10, 20, 30, 40
            )))
        );

        let err = file.records[1].as_ref().unwrap_err();
        assert!(err.to_string().contains("outside the pixel range"));
    }

    #[test]
    fn missing_size_leaves_bounds_empty() {
        let xml = "<annotation><object><bndbox><xmin>1</xmin><ymin>2</ymin><xmax>3</xmax><ymax>4</ymax></bndbox></object></annotation>";
        let file = from_voc_xml_str(xml).expect("parse xml");
        assert_eq!(file.embedded_bounds, None);
        assert_eq!(file.image_ref, None);
        assert_eq!(file.records.len(), 1);
    }

    #[test]
    fn bad_size_is_a_file_error() {
        let xml = "<annotation><size><width>wide</width><height>4</height></size></annotation>";
        let err = from_voc_xml_str(xml).unwrap_err();
        assert!(matches!(err, AnnoboxError::XmlParse { .. }));
    }
}
