//! Image dimension validation.
//!
//! Checks an image's pixel size against per-axis `(operator, value)`
//! constraints. The image can be given as a plain path or as an upload
//! descriptor whose temporary file is measured.

use std::path::{Path, PathBuf};

use filevault_common::paths::is_image_file;
use filevault_common::{DimensionConstraints, Dimensions, Error, Result};
use serde::{Deserialize, Serialize};

/// An uploaded file as handed over by the host's request layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDescriptor {
    /// Where the upload was spooled to.
    pub tmp_name: PathBuf,
    /// Client-side file name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,
}

/// The subject of a size check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    Upload(UploadDescriptor),
}

impl ImageSource {
    /// The file to measure.
    pub fn path(&self) -> &Path {
        match self {
            Self::Path(path) => path,
            Self::Upload(upload) => &upload.tmp_name,
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<UploadDescriptor> for ImageSource {
    fn from(upload: UploadDescriptor) -> Self {
        Self::Upload(upload)
    }
}

/// Check measured dimensions against constraints.
///
/// An absent axis is satisfied. Fails with [`Error::InvalidArgument`] when
/// neither axis is constrained.
///
/// # Examples
///
/// ```
/// use filevault::validation::validate;
/// use filevault_common::{Comparison, DimensionConstraints, Dimensions, Operator};
///
/// let exactly_100_high = DimensionConstraints::height(Comparison::new(Operator::Eq, 100));
/// assert!(validate(Dimensions::new(100, 100), &exactly_100_high).unwrap());
/// assert!(!validate(Dimensions::new(100, 50), &exactly_100_high).unwrap());
/// ```
pub fn validate(dimensions: Dimensions, constraints: &DimensionConstraints) -> Result<bool> {
    require_constraints(constraints)?;

    let width_ok = constraints
        .width
        .map_or(true, |c| c.matches(dimensions.width));
    let height_ok = constraints
        .height
        .map_or(true, |c| c.matches(dimensions.height));

    Ok(width_ok && height_ok)
}

fn require_constraints(constraints: &DimensionConstraints) -> Result<()> {
    if constraints.is_empty() {
        return Err(Error::invalid_argument(
            "missing image size constraints: provide a width and/or height",
        ));
    }
    Ok(())
}

/// Read an image's pixel size from its header.
///
/// Spooled uploads often lack an extension, so the format is sniffed from
/// the content in that case.
pub fn measure(path: &Path) -> Result<Dimensions> {
    let (width, height) = if is_image_file(path) {
        image::image_dimensions(path).map_err(|e| unreadable(path, e))?
    } else {
        tracing::debug!("Sniffing format of {}", path.display());
        image::ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| unreadable(path, e))?
            .into_dimensions()
            .map_err(|e| unreadable(path, e))?
    };
    Ok(Dimensions::new(width, height))
}

fn unreadable(path: &Path, e: impl std::fmt::Display) -> Error {
    Error::image(format!("cannot read size of {}: {e}", path.display()))
}

/// Measure the source and validate it.
///
/// The constraint check runs first so a missing constraint is reported
/// without touching the file.
pub fn validate_file(
    source: impl Into<ImageSource>,
    constraints: &DimensionConstraints,
) -> Result<bool> {
    require_constraints(constraints)?;
    let source = source.into();
    let dimensions = measure(source.path())?;
    let valid = validate(dimensions, constraints)?;
    if !valid {
        tracing::debug!(
            "{} is {}x{}, outside {:?}",
            source.path().display(),
            dimensions.width,
            dimensions.height,
            constraints
        );
    }
    Ok(valid)
}
