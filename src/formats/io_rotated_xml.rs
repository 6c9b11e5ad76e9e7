//! Rotated-box XML reader (roLabelImg layout).
//!
//! Every `<robndbox>` element, wherever it sits in the document, becomes one
//! [`RotatedBoxRecord`]:
//!
//! ```xml
//! <annotation>
//!   <filename>plot_0001.png</filename>
//!   <size><width>1024</width><height>1024</height></size>
//!   <object>
//!     <type>robndbox</type>
//!     <name>wheat_head</name>
//!     <robndbox>
//!       <cx>512.5</cx><cy>300.0</cy><w>40.0</w><h>12.0</h><angle>0.5</angle>
//!     </robndbox>
//!   </object>
//! </annotation>
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::xml::{descendants_named, parse_document, required_child_f64, root_filename, root_size};
use super::AnnotationFile;
use crate::error::AnnoboxError;
use crate::geom::{RawRecord, RotatedBoxRecord};

/// Read a rotated-box XML file.
pub fn read_rotated_xml(path: &Path) -> Result<AnnotationFile, AnnoboxError> {
    let xml = fs::read_to_string(path).map_err(AnnoboxError::Io)?;
    parse_rotated_xml_str(&xml, path)
}

/// Parse rotated-box XML from a UTF-8 string.
pub fn from_rotated_xml_str(xml: &str) -> Result<AnnotationFile, AnnoboxError> {
    parse_rotated_xml_str(xml, Path::new("<memory>"))
}

/// Parse rotated-box XML from bytes.
///
/// The input must be valid UTF-8.
pub fn from_rotated_xml_slice(bytes: &[u8]) -> Result<AnnotationFile, AnnoboxError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| AnnoboxError::XmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_rotated_xml_str(xml)
}

fn parse_rotated_xml_str(xml: &str, path: &Path) -> Result<AnnotationFile, AnnoboxError> {
    let document = parse_document(xml, path)?;

    let records = descendants_named(&document, "robndbox")
        .enumerate()
        .map(|(idx, node)| {
            parse_robndbox(node, idx)
                .map(RawRecord::RotatedBox)
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

fn parse_robndbox(node: Node<'_, '_>, idx: usize) -> Result<RotatedBoxRecord, String> {
    let context = format!("<robndbox> #{idx}");
    let cx = required_child_f64(node, "cx", &context)?;
    let cy = required_child_f64(node, "cy", &context)?;
    let w = required_child_f64(node, "w", &context)?;
    let h = required_child_f64(node, "h", &context)?;
    let angle = required_child_f64(node, "angle", &context)?;
    Ok(RotatedBoxRecord::new(cx, cy, w, h, angle))
}
