//! Batch conversion of annotation files into label files.
//!
//! This is the driver around the pure [`geom`](crate::geom) core: it reads
//! annotation files, resolves image bounds, converts each record
//! independently, and collects every failure into a [`ConversionReport`]
//! instead of aborting.

pub mod report;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
};

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};

use crate::error::AnnoboxError;
use crate::formats::bounds::BoundsProvider;
use crate::formats::{io_box_txt, AnnotationFile, InputFormat};
use crate::geom::{
    convert_segment_to_box_with, decode_axis_aligned_box, decode_rotated_box_with, CanonicalBox,
    ImageBounds, RawRecord, SegmentBoxOptions, DEFAULT_CLASS_ID,
};

/// Options for converting records into canonical boxes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvertOptions {
    pub segment: SegmentBoxOptions,
    /// Class id written for every box.
    pub class_id: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            segment: SegmentBoxOptions::default(),
            class_id: DEFAULT_CLASS_ID,
        }
    }
}

/// Converts one raw record into a canonical box.
///
/// Segments and rotated boxes need `bounds` for clipping; axis-aligned boxes
/// pass through without it.
pub fn convert_record(
    record: &RawRecord,
    options: &ConvertOptions,
    bounds: impl FnOnce() -> Result<ImageBounds, AnnoboxError>,
) -> Result<CanonicalBox, AnnoboxError> {
    let bbox = match *record {
        RawRecord::AxisAlignedBox(aabb) => decode_axis_aligned_box(aabb)?,
        RawRecord::Segment(segment) => {
            convert_segment_to_box_with(segment, &options.segment, bounds()?)?
        }
        RawRecord::RotatedBox(rotated) => {
            if !rotated.is_finite() {
                return Err(AnnoboxError::invalid_record(
                    "rotated box has non-finite fields",
                ));
            }
            let segment = decode_rotated_box_with(rotated, options.segment.pixel_mode);
            convert_segment_to_box_with(segment, &options.segment, bounds()?)?
        }
    };
    Ok(bbox.with_class_id(options.class_id))
}

/// Boxes produced for one annotation file.
#[derive(Clone, Debug, PartialEq)]
pub struct FileOutcome {
    pub image_key: String,
    pub boxes: Vec<CanonicalBox>,
}

/// Converts every record in a parsed annotation file.
///
/// Failures are added to `report` and skipped.
pub fn convert_file(
    file: &AnnotationFile,
    options: &ConvertOptions,
    provider: &dyn BoundsProvider,
    report: &mut ConversionReport,
) -> FileOutcome {
    let file_label = file.source.display().to_string();
    let image_key = file.image_key();

    if file.records.is_empty() {
        report.add(ConversionIssue::info(
            ConversionIssueCode::EmptyFile,
            &file_label,
            "no shapes; an empty label file marks it as a background image",
        ));
    }

    let mut resolved: Option<Result<ImageBounds, String>> = None;
    let mut boxes = Vec::with_capacity(file.records.len());

    for (idx, record) in file.records.iter().enumerate() {
        report.counts.records += 1;

        let result = match record {
            Ok(record) => convert_record(record, options, || {
                resolved
                    .get_or_insert_with(|| resolve_bounds(file, &image_key, provider, report))
                    .clone()
                    .map_err(|message| AnnoboxError::BoundsUnavailable {
                        image: image_key.clone(),
                        message,
                    })
            }),
            Err(err) => {
                report.add(ConversionIssue::from_error(&file_label, Some(idx), err));
                warn!("{file_label}: record {idx} skipped: {err}");
                continue;
            }
        };

        match result {
            Ok(bbox) => boxes.push(bbox),
            Err(err) => {
                warn!("{file_label}: record {idx} skipped: {err}");
                report.add(ConversionIssue::from_error(&file_label, Some(idx), &err));
            }
        }
    }

    report.counts.boxes += boxes.len();
    debug!(
        "{file_label}: {} of {} record(s) converted for image '{image_key}'",
        boxes.len(),
        file.records.len()
    );

    FileOutcome { image_key, boxes }
}

/// Looks up bounds from the provider, falling back to dimensions embedded in
/// the markup. A disagreement between the two is reported as a warning and
/// the provider wins.
fn resolve_bounds(
    file: &AnnotationFile,
    image_key: &str,
    provider: &dyn BoundsProvider,
    report: &mut ConversionReport,
) -> Result<ImageBounds, String> {
    let file_label = file.source.display().to_string();

    match (provider.bounds(image_key), file.embedded_bounds) {
        (Ok(from_image), Some(embedded)) if from_image != embedded => {
            report.add(ConversionIssue::warning(
                ConversionIssueCode::BoundsMismatch,
                &file_label,
                format!(
                    "markup says {}x{} but image '{image_key}' is {}x{}; using the image",
                    embedded.width_px, embedded.height_px, from_image.width_px, from_image.height_px
                ),
            ));
            Ok(from_image)
        }
        (Ok(from_image), _) => Ok(from_image),
        (Err(AnnoboxError::BoundsUnavailable { .. }), Some(embedded)) => Ok(embedded),
        (Err(err), _) => Err(err.to_string()),
    }
}

/// Converts a batch of annotation files.
///
/// Boxes are grouped by label file stem, so images whose names differ only
/// by extension are merged (with a warning) rather than overwriting each
/// other. When `output_dir` is given, one label file per stem is written
/// there, including empty files for images whose records all failed or that
/// had no shapes. Files that cannot be parsed are reported and skipped.
pub fn convert_files(
    paths: &[impl AsRef<Path>],
    format: InputFormat,
    options: &ConvertOptions,
    provider: &dyn BoundsProvider,
    output_dir: Option<&Path>,
) -> Result<(ConversionReport, BTreeMap<String, Vec<CanonicalBox>>), AnnoboxError> {
    let mut report = ConversionReport::new(
        format.name(),
        options.segment.clip_policy.name(),
        options.segment.pixel_mode.name(),
    );
    let mut by_label: BTreeMap<String, Vec<CanonicalBox>> = BTreeMap::new();
    let mut first_image: BTreeMap<String, String> = BTreeMap::new();

    for path in paths {
        let path = path.as_ref();
        report.counts.files += 1;

        let file = match format.read(path) {
            Ok(file) => file,
            Err(err) => {
                warn!("{}: skipped: {err}", path.display());
                report.add(ConversionIssue::error(
                    ConversionIssueCode::FileUnreadable,
                    path.display().to_string(),
                    None,
                    err.to_string(),
                ));
                continue;
            }
        };

        let outcome = convert_file(&file, options, provider, &mut report);
        let stem = io_box_txt::label_stem(&outcome.image_key);
        match first_image.get(&stem) {
            Some(previous) => report.add(ConversionIssue::warning(
                ConversionIssueCode::DuplicateImage,
                path.display().to_string(),
                format!(
                    "image '{}' maps to label '{stem}' already used by image '{previous}'; boxes are merged",
                    outcome.image_key
                ),
            )),
            None => {
                first_image.insert(stem.clone(), outcome.image_key.clone());
            }
        }
        by_label.entry(stem).or_default().extend(outcome.boxes);
    }

    if let Some(output_dir) = output_dir {
        for (stem, boxes) in &by_label {
            let written = io_box_txt::write_box_txt(output_dir, stem, boxes)?;
            debug!("wrote {} box(es) to {}", boxes.len(), written.display());
            report.counts.label_files += 1;
        }
    }

    Ok((report, by_label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::bounds::{FixedBounds, NoBounds};
    use crate::geom::{AxisAlignedBoxRecord, ClipPolicy, RotatedBoxRecord, Segment};
    use std::path::PathBuf;

    fn file_with(records: Vec<Result<RawRecord, AnnoboxError>>) -> AnnotationFile {
        AnnotationFile {
            source: PathBuf::from("field/IMG_1.json"),
            image_ref: Some("IMG_1.JPG".to_string()),
            embedded_bounds: None,
            records,
        }
    }

    #[test]
    fn one_bad_record_does_not_stop_the_file() {
        let file = file_with(vec![
            Ok(RawRecord::Segment(Segment::from_coords(
                100.0, 100.0, 200.0, 100.0,
            ))),
            Ok(RawRecord::Segment(Segment::from_coords(5.0, 5.0, 5.0, 5.0))),
            Err(AnnoboxError::invalid_record("shape has 3 points")),
            Ok(RawRecord::AxisAlignedBox(AxisAlignedBoxRecord::new(
                10, 20, 110, 220,
            ))),
        ]);
        let provider = FixedBounds::new().with("IMG_1.JPG", ImageBounds::new(1000, 1000));
        let mut report = ConversionReport::default();

        let outcome = convert_file(&file, &ConvertOptions::default(), &provider, &mut report);

        assert_eq!(
            outcome.boxes,
            vec![
                CanonicalBox::new(100, 90, 200, 110),
                CanonicalBox::new(10, 20, 110, 220)
            ]
        );
        assert_eq!(report.counts.records, 4);
        assert_eq!(report.counts.boxes, 2);
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.issues[0].code, ConversionIssueCode::DegenerateInput);
        assert_eq!(report.issues[0].record, Some(1));
        assert_eq!(report.issues[1].code, ConversionIssueCode::InvalidRecord);
    }

    #[test]
    fn embedded_bounds_are_used_when_provider_has_none() {
        let mut file = file_with(vec![Ok(RawRecord::Segment(Segment::from_coords(
            10.0, 395.0, 50.0, 395.0,
        )))]);
        file.embedded_bounds = Some(ImageBounds::new(640, 400));
        let mut report = ConversionReport::default();

        let outcome = convert_file(&file, &ConvertOptions::default(), &NoBounds, &mut report);
        assert_eq!(outcome.boxes, vec![CanonicalBox::new(10, 385, 50, 399)]);
        assert!(!report.has_failures());
    }

    #[test]
    fn missing_bounds_fail_only_records_that_need_them() {
        let file = file_with(vec![
            Ok(RawRecord::Segment(Segment::from_coords(0.0, 0.0, 10.0, 0.0))),
            Ok(RawRecord::AxisAlignedBox(AxisAlignedBoxRecord::new(1, 2, 3, 4))),
        ]);
        let mut report = ConversionReport::default();

        let outcome = convert_file(&file, &ConvertOptions::default(), &NoBounds, &mut report);
        assert_eq!(outcome.boxes, vec![CanonicalBox::new(1, 2, 3, 4)]);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.issues[0].code, ConversionIssueCode::BoundsUnavailable);
    }

    #[test]
    fn provider_disagreeing_with_markup_is_a_warning() {
        let mut file = file_with(vec![Ok(RawRecord::Segment(Segment::from_coords(
            0.0, 50.0, 10.0, 50.0,
        )))]);
        file.embedded_bounds = Some(ImageBounds::new(640, 480));
        let provider = FixedBounds::new().with("IMG_1.JPG", ImageBounds::new(1280, 960));
        let mut report = ConversionReport::default();

        convert_file(&file, &ConvertOptions::default(), &provider, &mut report);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.issues[0].code, ConversionIssueCode::BoundsMismatch);
    }

    #[test]
    fn rotated_box_goes_through_segment_pipeline() {
        let record = RawRecord::RotatedBox(RotatedBoxRecord::new(500.0, 500.0, 100.0, 20.0, 0.0));
        let options = ConvertOptions {
            class_id: 1,
            ..Default::default()
        };
        let bbox = convert_record(&record, &options, || Ok(ImageBounds::new(1000, 1000))).unwrap();
        // long axis 450..550 on y=500, thickened by 10px each side
        assert_eq!(bbox, CanonicalBox::new(450, 490, 550, 510).with_class_id(1));
    }

    #[test]
    fn non_finite_rotated_box_is_invalid() {
        let record = RawRecord::RotatedBox(RotatedBoxRecord::new(f64::NAN, 0.0, 1.0, 1.0, 0.0));
        let err = convert_record(&record, &ConvertOptions::default(), || {
            Ok(ImageBounds::new(10, 10))
        })
        .unwrap_err();
        assert!(matches!(err, AnnoboxError::InvalidRecord { .. }));
    }

    #[test]
    fn symmetric_policy_is_threaded_through() {
        let record = RawRecord::Segment(Segment::from_coords(500.0, 900.0, 500.0, 1005.0));
        let mut options = ConvertOptions::default();
        options.segment.clip_policy = ClipPolicy::Symmetric;
        let bbox = convert_record(&record, &options, || Ok(ImageBounds::new(1200, 1000))).unwrap();
        assert_eq!(bbox.ymax, 1000);
    }
}
