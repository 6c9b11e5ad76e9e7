//! Image-bounds providers.
//!
//! The geometry core only needs `(width, height)` per image. Where those come
//! from is up to a [`BoundsProvider`]: image headers on disk, a fixed table,
//! or nothing at all (in which case dimensions embedded in the annotation
//! file are used by the batch driver).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::AnnoboxError;
use crate::geom::ImageBounds;

/// Image extensions tried, in order, when an annotation names only a stem.
pub const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "bmp", "webp", "tif", "tiff", "JPG"];

/// Supplies pixel dimensions for an image identifier.
///
/// Implementations are shared read-only across conversions.
pub trait BoundsProvider: Send + Sync {
    /// Returns the bounds of `image`, or [`AnnoboxError::BoundsUnavailable`].
    fn bounds(&self, image: &str) -> Result<ImageBounds, AnnoboxError>;
}

/// Reads dimensions from image headers under a directory.
///
/// Only the header is parsed (via `imagesize`); pixel data is never decoded.
#[derive(Clone, Debug)]
pub struct ImageDirBounds {
    dir: PathBuf,
}

impl ImageDirBounds {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Finds the image file for `image`: the exact name first, then the
    /// same stem with each of [`IMAGE_EXTENSIONS`].
    pub fn find_image(&self, image: &str) -> Option<PathBuf> {
        let exact = self.dir.join(image);
        if exact.is_file() {
            return Some(exact);
        }

        let stem = Path::new(image).with_extension("");
        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(&stem).with_extension(ext))
            .find(|candidate| candidate.is_file())
    }
}

impl BoundsProvider for ImageDirBounds {
    fn bounds(&self, image: &str) -> Result<ImageBounds, AnnoboxError> {
        let path = self
            .find_image(image)
            .ok_or_else(|| AnnoboxError::BoundsUnavailable {
                image: image.to_string(),
                message: format!("no matching image file in {}", self.dir.display()),
            })?;
        read_image_dimensions(&path)
    }
}

/// A fixed image-name to bounds table.
#[derive(Clone, Debug, Default)]
pub struct FixedBounds {
    table: BTreeMap<String, ImageBounds>,
}

impl FixedBounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an entry.
    pub fn with(mut self, image: impl Into<String>, bounds: ImageBounds) -> Self {
        self.table.insert(image.into(), bounds);
        self
    }
}

impl BoundsProvider for FixedBounds {
    fn bounds(&self, image: &str) -> Result<ImageBounds, AnnoboxError> {
        self.table
            .get(image)
            .copied()
            .ok_or_else(|| AnnoboxError::BoundsUnavailable {
                image: image.to_string(),
                message: "image not present in bounds table".to_string(),
            })
    }
}

/// A provider that never knows any bounds.
///
/// Used when the batch driver should rely only on dimensions embedded in
/// annotation files.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBounds;

impl BoundsProvider for NoBounds {
    fn bounds(&self, image: &str) -> Result<ImageBounds, AnnoboxError> {
        Err(AnnoboxError::BoundsUnavailable {
            image: image.to_string(),
            message: "no image directory configured".to_string(),
        })
    }
}

/// Reads `(width, height)` from an image header.
pub fn read_image_dimensions(path: &Path) -> Result<ImageBounds, AnnoboxError> {
    let size = imagesize::size(path).map_err(|source| AnnoboxError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let to_u32 = |value: usize, axis: &str| -> Result<u32, AnnoboxError> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| AnnoboxError::BoundsUnavailable {
                image: path.display().to_string(),
                message: format!("image {axis} {value} is not a positive u32"),
            })
    };

    Ok(ImageBounds::new(
        to_u32(size.width, "width")?,
        to_u32(size.height, "height")?,
    ))
}
