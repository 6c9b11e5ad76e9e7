//! roxmltree helpers shared by the XML readers.

use std::path::Path;

use roxmltree::{Document, Node};

use crate::error::AnnoboxError;
use crate::geom::ImageBounds;

pub(super) fn parse_document<'input>(
    xml: &'input str,
    path: &Path,
) -> Result<Document<'input>, AnnoboxError> {
    Document::parse(xml).map_err(|source| AnnoboxError::XmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })
}

pub(super) fn child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

pub(super) fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

/// Parses a required finite `f64` child; errors are plain messages so the
/// caller can attach them to a single record.
pub(super) fn required_child_f64(
    node: Node<'_, '_>,
    tag: &str,
    context: &str,
) -> Result<f64, String> {
    let raw =
        optional_child_text(node, tag).ok_or_else(|| format!("missing <{tag}> in {context}"))?;
    let value = raw.parse::<f64>().map_err(|_| {
        format!("invalid <{tag}> value '{raw}' in {context}; expected floating-point number")
    })?;
    if !value.is_finite() {
        return Err(format!("<{tag}> value '{raw}' in {context} is not finite"));
    }
    Ok(value)
}

/// Iterates over every element named `tag`, at any depth, in document order.
pub(super) fn descendants_named<'a, 'input: 'a>(
    document: &'a Document<'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    document
        .descendants()
        .filter(move |node| node.is_element() && node.tag_name().name() == tag)
}

/// Reads `<filename>` from the root element, if present.
pub(super) fn root_filename(document: &Document<'_>) -> Option<String> {
    optional_child_text(document.root_element(), "filename")
}

/// Reads `<size><width/><height/></size>` from the root element, if present.
///
/// A `<size>` element with unparsable dimensions is a file-level error.
pub(super) fn root_size(
    document: &Document<'_>,
    path: &Path,
) -> Result<Option<ImageBounds>, AnnoboxError> {
    let Some(size) = child_element(document.root_element(), "size") else {
        return Ok(None);
    };

    let parse_dim = |tag: &str| -> Result<Option<u32>, AnnoboxError> {
        optional_child_text(size, tag)
            .map(|raw| {
                raw.parse::<u32>().map_err(|_| AnnoboxError::XmlParse {
                    path: path.to_path_buf(),
                    message: format!("invalid <{tag}> value '{raw}' in <size>; expected u32"),
                })
            })
            .transpose()
    };

    match (parse_dim("width")?, parse_dim("height")?) {
        (Some(width), Some(height)) if width > 0 && height > 0 => {
            Ok(Some(ImageBounds::new(width, height)))
        }
        _ => Ok(None),
    }
}
