//! Media type detection, decoding and JPEG export

use crate::io::configuration::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::io::error::{MosaicError, Result, file_system_error};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// How file extensions are compared against the supported lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtensionMatching {
    /// Case-sensitive comparison: `jpg`, `jpeg`, `png`, `mp4` and upper-case `MOV` only
    #[default]
    Exact,
    /// Any letter case is accepted for every supported extension
    CaseInsensitive,
}

impl ExtensionMatching {
    fn matches(self, extension: &str, candidates: &[&str]) -> bool {
        match self {
            Self::Exact => candidates.contains(&extension),
            Self::CaseInsensitive => candidates
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(extension)),
        }
    }
}

/// Kind of media a source path refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// A still JPEG or PNG image
    Image,
    /// A video container handed to the video pipeline
    Video,
}

/// Classify a path by its extension, `None` when the type is unsupported
pub fn classify(path: &Path, matching: ExtensionMatching) -> Option<MediaKind> {
    let extension = path.extension().and_then(|s| s.to_str())?;
    if matching.matches(extension, &IMAGE_EXTENSIONS) {
        Some(MediaKind::Image)
    } else if matching.matches(extension, &VIDEO_EXTENSIONS) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Check whether a path names a still image that can be decoded
pub fn is_supported_image(path: &Path, matching: ExtensionMatching) -> bool {
    classify(path, matching) == Some(MediaKind::Image)
}

/// Decode an image into 8-bit RGB
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|e| MosaicError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(img.to_rgb8())
}

/// Write an image as JPEG at the given quality
///
/// The parent directory must already exist.
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoding fails
pub fn save_jpeg(img: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    let file = File::create(path).map_err(|e| file_system_error(path, "create file", e))?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(img)
        .map_err(|e| MosaicError::ImageExport {
            path: path.to_path_buf(),
            source: e,
        })?;
    writer
        .flush()
        .map_err(|e| file_system_error(path, "flush file", e))
}

/// Build `<directory>/<name>.<extension>`
pub fn output_path(directory: &Path, name: &str, extension: &str) -> PathBuf {
    directory.join(format!("{name}.{extension}"))
}
