use std::path::PathBuf;
use thiserror::Error;

use crate::conversion::ConversionReport;

/// The main error type for annobox operations.
#[derive(Debug, Error)]
pub enum AnnoboxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A segment whose endpoints coincide (or are not finite) has no direction,
    /// so no perpendicular offset can be derived from it.
    #[error("Degenerate segment ({x1}, {y1}) -> ({x2}, {y2}): {message}")]
    DegenerateInput {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        message: String,
    },

    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },

    #[error("Image bounds unavailable for '{image}': {message}")]
    BoundsUnavailable { image: String, message: String },

    #[error("Failed to parse LabelMe JSON from {path}: {source}")]
    LabelMeJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid LabelMe JSON in {path}: {message}")]
    LabelMeJsonInvalid { path: PathBuf, message: String },

    #[error("Failed to parse XML from {path}: {message}")]
    XmlParse { path: PathBuf, message: String },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write report as JSON: {source}")]
    ReportWrite {
        #[source]
        source: serde_json::Error,
    },

    #[error("Conversion failed for {failed} record(s)")]
    ConversionFailed {
        failed: usize,
        report: ConversionReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl AnnoboxError {
    /// Shorthand for an [`AnnoboxError::InvalidRecord`].
    pub(crate) fn invalid_record(message: impl Into<String>) -> Self {
        AnnoboxError::InvalidRecord {
            message: message.into(),
        }
    }
}
