//! annobox: turn segment, rotated-box and axis-aligned annotations into
//! clipped detection boxes.
//!
//! Labeling tools describe objects in different ways: a line drawn along a
//! crop row, a rotated rectangle around a wheat head, or an ordinary
//! axis-aligned box. annobox reduces all of them to one canonical form, an
//! integer axis-aligned box clipped to the image. That box is written as
//! `class_id xmin ymin xmax ymax`.
//!
//! # Modules
//!
//! - [`geom`]: the pure geometry core (rotation, decoders, clipping)
//! - [`formats`]: annotation readers, image-bounds providers, label writer
//! - [`conversion`]: batch driver and per-record conversion report
//! - [`config`]: YAML conversion settings
//! - [`error`]: error types for annobox operations

pub mod config;
pub mod conversion;
pub mod error;
pub mod formats;
pub mod geom;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{info, warn};

pub use error::AnnoboxError;

use config::ConvertConfig;
use formats::bounds::{BoundsProvider, ImageDirBounds, NoBounds};
use formats::InputFormat;
use geom::{decode_axis_aligned_box, decode_rotated_box_with, ClipPolicy, PixelMode, RawRecord};

/// The annobox CLI application.
#[derive(Parser)]
#[command(name = "annobox")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert annotation files into box label files.
    Convert(ConvertArgs),
    /// Print the decoded geometry of a single annotation file.
    Decode(DecodeArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Annotation file, or a directory searched recursively.
    input: PathBuf,

    /// Input format ('labelme', 'rotated-xml', or 'voc-xml').
    #[arg(long, default_value = "labelme")]
    format: String,

    /// Directory to write one label file per image into. Without it, only
    /// the report is produced.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory holding the images; their headers supply image bounds.
    #[arg(long, env = "ANNOBOX_IMAGES")]
    images: Option<PathBuf>,

    /// Perpendicular thickness, in pixels, given to line segments.
    #[arg(long, env = "ANNOBOX_WIDTH_PX")]
    width_px: Option<f64>,

    /// Clip policy ('source' for source-compatible, or 'symmetric').
    #[arg(long)]
    clip: Option<String>,

    /// Pixel mode ('integer' or 'subpixel').
    #[arg(long)]
    pixel_mode: Option<String>,

    /// Class id written for every box.
    #[arg(long)]
    class_id: Option<u32>,

    /// YAML file with conversion settings; flags take precedence.
    #[arg(long, env = "ANNOBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,

    /// Exit non-zero if any record failed to convert.
    #[arg(long)]
    strict: bool,
}

/// Arguments for the decode subcommand.
#[derive(clap::Args)]
struct DecodeArgs {
    /// Annotation file to decode.
    input: PathBuf,

    /// Input format ('labelme', 'rotated-xml', or 'voc-xml').
    #[arg(long, default_value = "rotated-xml")]
    format: String,

    /// Pixel mode ('integer' or 'subpixel').
    #[arg(long)]
    pixel_mode: Option<String>,
}

/// Run the annobox CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), AnnoboxError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Decode(args)) => run_decode(args),
        None => {
            println!("annobox {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert segment, rotated-box and axis-aligned annotations into detection boxes.");
            println!();
            println!("Run 'annobox --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), AnnoboxError> {
    let format: InputFormat = args.format.parse()?;

    let file_config = match &args.config {
        Some(path) => ConvertConfig::load(path)?,
        None => ConvertConfig::default(),
    };
    let flag_config = ConvertConfig {
        width_px: args.width_px,
        clip_policy: args.clip.as_deref().map(parse_clip_policy).transpose()?,
        pixel_mode: args.pixel_mode.as_deref().map(parse_pixel_mode).transpose()?,
        class_id: args.class_id,
    };
    let options = file_config.merge(flag_config).into_options();

    let provider: Box<dyn BoundsProvider> = match &args.images {
        Some(dir) => Box::new(ImageDirBounds::new(dir)),
        None => Box::new(NoBounds),
    };

    let paths = formats::collect_annotation_files(&args.input, format)?;
    info!(
        "converting {} {} file(s) from {}",
        paths.len(),
        format.name(),
        args.input.display()
    );

    let (report, _) = conversion::convert_files(
        &paths,
        format,
        &options,
        provider.as_ref(),
        args.output.as_deref(),
    )?;

    match args.report.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|source| AnnoboxError::ReportWrite { source })?;
            println!("{json}");
        }
        _ => print!("{report}"),
    }

    if report.has_failures() {
        if args.strict {
            return Err(AnnoboxError::ConversionFailed {
                failed: report.error_count(),
                report,
            });
        }
        warn!(
            "{} record(s) or file(s) failed to convert; rerun with --strict to fail the run",
            report.error_count()
        );
    }

    Ok(())
}

/// Execute the decode subcommand.
///
/// Rotated boxes print as `x1 y1 x2 y2` segments, segments print as-is, and
/// axis-aligned boxes print as canonical label lines.
fn run_decode(args: DecodeArgs) -> Result<(), AnnoboxError> {
    let format: InputFormat = args.format.parse()?;
    let mode = args
        .pixel_mode
        .as_deref()
        .map(parse_pixel_mode)
        .transpose()?
        .unwrap_or_default();

    let file = format.read(&args.input)?;
    for (idx, record) in file.records.iter().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!("record {idx} skipped: {err}");
                continue;
            }
        };

        match *record {
            RawRecord::RotatedBox(rotated) => {
                let seg = decode_rotated_box_with(rotated, mode);
                println!("{} {} {} {}", seg.p1.x, seg.p1.y, seg.p2.x, seg.p2.y);
            }
            RawRecord::Segment(seg) => {
                println!("{} {} {} {}", seg.p1.x, seg.p1.y, seg.p2.x, seg.p2.y);
            }
            RawRecord::AxisAlignedBox(aabb) => match decode_axis_aligned_box(aabb) {
                Ok(bbox) => println!("{bbox}"),
                Err(err) => warn!("record {idx} skipped: {err}"),
            },
        }
    }

    Ok(())
}

fn parse_clip_policy(raw: &str) -> Result<ClipPolicy, AnnoboxError> {
    match raw.to_ascii_lowercase().as_str() {
        "source" | "source-compatible" => Ok(ClipPolicy::SourceCompatible),
        "symmetric" => Ok(ClipPolicy::Symmetric),
        other => Err(AnnoboxError::UnsupportedFormat(format!(
            "clip policy '{other}' (supported: source, symmetric)"
        ))),
    }
}

fn parse_pixel_mode(raw: &str) -> Result<PixelMode, AnnoboxError> {
    match raw.to_ascii_lowercase().as_str() {
        "integer" => Ok(PixelMode::Integer),
        "subpixel" => Ok(PixelMode::Subpixel),
        other => Err(AnnoboxError::UnsupportedFormat(format!(
            "pixel mode '{other}' (supported: integer, subpixel)"
        ))),
    }
}
