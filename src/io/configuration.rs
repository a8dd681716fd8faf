//! Rendering constants and runtime configuration defaults

/// Tile side length used when none is requested
pub const DEFAULT_SCALE_FACTOR: u32 = 20;

/// Quality passed to the JPEG encoder for every rendered image
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Fixed seed for reproducible randomized matching
pub const DEFAULT_SEED: u64 = 42;

/// Fill colour for padding and freshly allocated canvases
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Pure black, the second colour remapped by the colour-swap strategy
pub const BLACK: [u8; 3] = [0, 0, 0];

/// Channel value at or above which a cell counts as near-white
pub const NEAR_WHITE_THRESHOLD: u8 = 250;

/// Default substitute for white cells in colour-swap matching
pub const DEFAULT_WHITE_SUBSTITUTE: [u8; 3] = [0, 0, 0];

/// Default substitute for black cells in colour-swap matching
pub const DEFAULT_BLACK_SUBSTITUTE: [u8; 3] = [0, 255, 0];

// Every second column is sampled, shifted by one on odd rows
/// Column stride of the sparse average sampler
pub const SAMPLE_STRIDE: u32 = 2;

/// Per-channel tolerance under which two averages are considered the same colour
pub const SIMILARITY_TOLERANCE: u8 = 5;

// Resolution rounding applied when a target has too few common factors
/// Multiple that degenerate dimensions are rounded down to
pub const RESOLUTION_ROUNDING: u32 = 10;

/// Minimum number of common factors before rounding kicks in
pub const MIN_COMMON_FACTORS: usize = 2;

/// Prefix of extracted and rendered frame file names
pub const FRAME_PREFIX: &str = "frame-";

/// Extension of extracted and rendered frame files
pub const FRAME_EXTENSION: &str = "jpg";

/// Extension of rendered still images
pub const IMAGE_OUTPUT_EXTENSION: &str = "jpg";

/// Extension of assembled videos
pub const VIDEO_OUTPUT_EXTENSION: &str = "mp4";

/// Still-image extensions, matched exactly
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

// `MOV` is only recognised in upper case unless case-insensitive matching is enabled
/// Video extensions, matched exactly
pub const VIDEO_EXTENSIONS: [&str; 2] = ["mp4", "MOV"];

/// Directory name for extracted frames under the working directory
pub const RAW_FRAMES_DIR: &str = "raw-frames";

/// Directory name for rendered frames under the working directory
pub const RENDERED_FRAMES_DIR: &str = "rendered-frames";

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Log filter used with `--verbose`
pub const VERBOSE_LOG_FILTER: &str = "info";

/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
