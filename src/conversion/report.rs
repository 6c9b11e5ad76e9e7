//! Conversion report types for tracking per-record outcomes.
//!
//! A batch conversion never stops at the first bad record. Every failure is
//! recorded here with the file and record index it came from, so callers can
//! decide afterwards whether the batch as a whole is acceptable.

use serde::Serialize;
use std::fmt;

use crate::error::AnnoboxError;

/// A report generated during a batch conversion.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Input format name.
    pub format: String,
    /// Clip policy name.
    pub clip_policy: String,
    /// Pixel mode name.
    pub pixel_mode: String,
    pub counts: ConversionCounts,
    /// Issues discovered during conversion.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    /// Create a new empty report.
    pub fn new(
        format: impl Into<String>,
        clip_policy: impl Into<String>,
        pixel_mode: impl Into<String>,
    ) -> Self {
        Self {
            format: format.into(),
            clip_policy: clip_policy.into(),
            pixel_mode: pixel_mode.into(),
            ..Default::default()
        }
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    pub fn error_count(&self) -> usize {
        self.count(ConversionSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(ConversionSeverity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(ConversionSeverity::Info)
    }

    /// Returns true if any record or file failed to convert.
    pub fn has_failures(&self) -> bool {
        self.error_count() > 0
    }

    fn count(&self, severity: ConversionSeverity) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .count()
    }

    fn write_section(
        &self,
        f: &mut fmt::Formatter<'_>,
        title: &str,
        severity: ConversionSeverity,
    ) -> fmt::Result {
        let count = self.count(severity);
        if count == 0 {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "{title} ({count}):")?;
        for issue in self.issues.iter().filter(|i| i.severity == severity) {
            writeln!(f, "  - {issue}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Converted {} ({} clipping, {} pixels)",
            self.format, self.clip_policy, self.pixel_mode
        )?;
        writeln!(
            f,
            "  {} file(s), {} record(s), {} box(es), {} label file(s) written",
            self.counts.files, self.counts.records, self.counts.boxes, self.counts.label_files
        )?;

        self.write_section(f, "Errors", ConversionSeverity::Error)?;
        self.write_section(f, "Warnings", ConversionSeverity::Warning)?;
        self.write_section(f, "Notes", ConversionSeverity::Info)?;

        Ok(())
    }
}

/// Counts of processed elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    /// Annotation files read (including ones that failed to parse).
    pub files: usize,
    /// Records found across all parsed files.
    pub records: usize,
    /// Boxes successfully produced.
    pub boxes: usize,
    /// Label files written.
    pub label_files: usize,
}

/// A single issue discovered during conversion.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    /// Annotation file the issue belongs to.
    pub file: String,
    /// Zero-based record index within the file, when the issue is per-record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<usize>,
    pub message: String,
}

impl ConversionIssue {
    /// Create an error-level issue (a record or file produced no output).
    pub fn error(
        code: ConversionIssueCode,
        file: impl Into<String>,
        record: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: ConversionSeverity::Error,
            code,
            file: file.into(),
            record,
            message: message.into(),
        }
    }

    /// Create a warning-level issue.
    pub fn warning(
        code: ConversionIssueCode,
        file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            file: file.into(),
            record: None,
            message: message.into(),
        }
    }

    /// Create an info-level issue.
    pub fn info(
        code: ConversionIssueCode,
        file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            file: file.into(),
            record: None,
            message: message.into(),
        }
    }

    /// Create an error-level issue from a record or file failure.
    pub fn from_error(file: impl Into<String>, record: Option<usize>, err: &AnnoboxError) -> Self {
        Self::error(ConversionIssueCode::for_error(err), file, record, err.to_string())
    }
}

impl fmt::Display for ConversionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            Some(idx) => write!(f, "[{:?}] {} record {}: {}", self.code, self.file, idx, self.message),
            None => write!(f, "[{:?}] {}: {}", self.code, self.file, self.message),
        }
    }
}

/// Severity level for conversion issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionSeverity {
    /// Output was lost: a record or whole file produced no box.
    Error,
    /// Output was produced but may not be what the user expects.
    Warning,
    /// Informational note.
    Info,
}

/// Issue codes for conversion reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    /// The annotation file could not be read or parsed.
    FileUnreadable,
    /// A record was malformed.
    InvalidRecord,
    /// A segment had no direction.
    DegenerateInput,
    /// No image dimensions were available for a record that needs clipping.
    BoundsUnavailable,
    /// Dimensions embedded in the markup disagree with the image header.
    BoundsMismatch,
    /// Two annotation files refer to the same image; their boxes are merged.
    DuplicateImage,
    /// The file contained no shapes (a background image).
    EmptyFile,
}

impl ConversionIssueCode {
    /// Maps an error to the issue code reported for it.
    pub fn for_error(err: &AnnoboxError) -> Self {
        match err {
            AnnoboxError::DegenerateInput { .. } => ConversionIssueCode::DegenerateInput,
            AnnoboxError::InvalidRecord { .. } => ConversionIssueCode::InvalidRecord,
            AnnoboxError::BoundsUnavailable { .. } | AnnoboxError::ImageDimensionRead { .. } => {
                ConversionIssueCode::BoundsUnavailable
            }
            _ => ConversionIssueCode::FileUnreadable,
        }
    }
}
