//! Error types for mosaic rendering operations

use std::fmt;
use std::path::PathBuf;

/// Precondition a render request failed before any work started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDefect {
    /// No donor image paths were supplied
    EmptyDonorSet,
    /// The source path is empty or does not exist
    MissingSource,
    /// The requested scale factor is zero
    NonPositiveScaleFactor,
    /// The output name is empty
    EmptyOutputName,
    /// The output directory is empty or does not exist
    MissingOutputDirectory,
}

impl fmt::Display for RequestDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::EmptyDonorSet => "no donor images were selected",
            Self::MissingSource => "the source file is missing",
            Self::NonPositiveScaleFactor => "the scale factor must be greater than zero",
            Self::EmptyOutputName => "the output name is empty",
            Self::MissingOutputDirectory => "the output directory is missing",
        };
        f.write_str(text)
    }
}

/// Main error type for all rendering operations
#[derive(Debug)]
pub enum MosaicError {
    /// Failed to decode an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to encode or save a rendered image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Render request rejected before execution
    InvalidRequest {
        /// The precondition that failed
        defect: RequestDefect,
    },

    /// Source file type is neither a supported image nor a supported video
    UnsupportedSource {
        /// Path of the rejected source
        path: PathBuf,
    },

    /// Target resolution admits no grid, even after rounding to multiples of ten
    UnresolvableResolution {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// Every donor image was rejected while building the tile library
    EmptyTileLibrary {
        /// Number of donor paths that were offered
        offered: usize,
    },

    /// External video decoder or encoder failed
    VideoPipeline {
        /// Stage that failed (extraction, probing, assembly)
        stage: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidRequest { defect } => {
                write!(f, "Render request rejected: {defect}")
            }
            Self::UnsupportedSource { path } => {
                write!(
                    f,
                    "Unsupported file type selected to render: '{}' (supported file types: mp4, mov, jpg, jpeg, png)",
                    path.display()
                )
            }
            Self::UnresolvableResolution { width, height } => {
                write!(
                    f,
                    "Resolution {width}x{height} has no common factor to use as a tile size"
                )
            }
            Self::EmptyTileLibrary { offered } => {
                write!(
                    f,
                    "None of the {offered} donor images could be turned into a tile"
                )
            }
            Self::VideoPipeline { stage, reason } => {
                write!(f, "Video pipeline failed during {stage}: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for rendering results
pub type Result<T> = std::result::Result<T, MosaicError>;

impl From<image::ImageError> for MosaicError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<RequestDefect> for MosaicError {
    fn from(defect: RequestDefect) -> Self {
        Self::InvalidRequest { defect }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a video pipeline error
pub fn video_error(stage: &'static str, reason: &impl ToString) -> MosaicError {
    MosaicError::VideoPipeline {
        stage,
        reason: reason.to_string(),
    }
}

/// Wrap an I/O error with the path and operation that produced it
pub fn file_system_error(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> MosaicError {
    MosaicError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
