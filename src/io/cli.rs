//! Command-line interface that assembles a render request and runs one session

use crate::io::configuration::{
    DEFAULT_JPEG_QUALITY, DEFAULT_SCALE_FACTOR, DEFAULT_SEED, RAW_FRAMES_DIR, RENDERED_FRAMES_DIR,
};
use crate::io::error::{Result, file_system_error};
use crate::io::image::{ExtensionMatching, MediaKind, classify};
use crate::io::progress::{ProgressManager, SilentProgress};
use crate::mosaic::color::AverageColor;
use crate::mosaic::matching::MatchStrategy;
use crate::mosaic::session::{
    CanvasPolicy, RenderConfig, RenderOutcome, RenderRequest, RenderSession, VideoDirectories,
};
use crate::mosaic::tiles::SquareCrop;
use crate::video::pipeline::Ffmpeg;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Cell matching strategy selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Closest average colour
    Nearest,
    /// Random tiles, last tile for near-white cells
    Random,
    /// Closest colour after swapping pure white and pure black
    Swap,
}

#[derive(Parser)]
#[command(name = "photomosaic")]
#[command(
    author,
    version,
    about = "Rebuild an image or video out of donor photo tiles"
)]
/// Command-line arguments for the mosaic renderer
// Each behaviour switch is an independent opt-in flag
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Image (jpg, jpeg, png) or video (mp4, MOV) to rebuild
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Donor images, or directories containing them
    #[arg(short = 't', long = "tiles", value_name = "PATH", num_args = 1.., required = true)]
    pub tiles: Vec<PathBuf>,

    /// Requested tile side length in pixels
    #[arg(short, long, default_value_t = DEFAULT_SCALE_FACTOR)]
    pub scale: u32,

    /// Output width in pixels (0 keeps the source width)
    #[arg(short = 'w', long, default_value_t = 0)]
    pub width: u32,

    /// Output height in pixels (0 keeps the source height)
    #[arg(short = 'H', long, default_value_t = 0)]
    pub height: u32,

    /// Output file name without extension (defaults to <source>_mosaic)
    #[arg(short, long)]
    pub output_name: Option<String>,

    /// Existing directory to write the result to
    #[arg(short = 'd', long, default_value = ".")]
    pub output_dir: PathBuf,

    /// How cells are matched to tiles
    #[arg(long, value_enum, default_value_t = StrategyArg::Nearest)]
    pub strategy: StrategyArg,

    /// Colour matched in place of pure white with `--strategy swap` (r,g,b)
    #[arg(long, value_parser = parse_rgb, default_value = "0,0,0")]
    pub swap_white: [u8; 3],

    /// Colour matched in place of pure black with `--strategy swap` (r,g,b)
    #[arg(long, value_parser = parse_rgb, default_value = "0,255,0")]
    pub swap_black: [u8; 3],

    /// Start every video frame from a white canvas instead of the previous frame
    #[arg(long)]
    pub fresh_canvas: bool,

    /// Accept supported extensions in any letter case
    #[arg(long)]
    pub ignore_extension_case: bool,

    /// Crop non-square donors around their centre instead of the top-left corner
    #[arg(long)]
    pub centered_crop: bool,

    /// JPEG quality of the output
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Random seed for `--strategy random`
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Working directory for extracted and rendered video frames
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log pipeline steps to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse an `r,g,b` triple of channel values
///
/// # Errors
///
/// Returns a message if there are not exactly three values in `0..=255`
pub fn parse_rgb(text: &str) -> std::result::Result<[u8; 3], String> {
    let channels = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|e| format!("'{part}' is not a channel value: {e}"))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    <[u8; 3]>::try_from(channels)
        .map_err(|values| format!("expected r,g,b but got {} values", values.len()))
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Session configuration selected by the flags
    pub const fn render_config(&self) -> RenderConfig {
        let strategy = match self.strategy {
            StrategyArg::Nearest => MatchStrategy::Nearest,
            StrategyArg::Random => MatchStrategy::Randomized,
            StrategyArg::Swap => MatchStrategy::ColorSwap {
                white: AverageColor::from_array(self.swap_white),
                black: AverageColor::from_array(self.swap_black),
            },
        };
        RenderConfig {
            strategy,
            canvas_policy: if self.fresh_canvas {
                CanvasPolicy::Fresh
            } else {
                CanvasPolicy::Accumulate
            },
            extensions: if self.ignore_extension_case {
                ExtensionMatching::CaseInsensitive
            } else {
                ExtensionMatching::Exact
            },
            crop: if self.centered_crop {
                SquareCrop::Centered
            } else {
                SquareCrop::Origin
            },
            jpeg_quality: self.quality,
            seed: self.seed,
        }
    }

    /// Output name, falling back to `<source stem>_mosaic`
    pub fn output_name(&self) -> String {
        self.output_name.clone().unwrap_or_else(|| {
            let stem = self.source.file_stem().unwrap_or_default();
            format!("{}_mosaic", stem.to_string_lossy())
        })
    }

    /// Frame directories under the work directory
    pub fn video_directories(&self) -> VideoDirectories {
        let root = self
            .work_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("photomosaic"));
        VideoDirectories {
            raw_frames: root.join(RAW_FRAMES_DIR),
            rendered_frames: root.join(RENDERED_FRAMES_DIR),
        }
    }

    /// Expand directories in `--tiles` into their files, sorted by name
    ///
    /// # Errors
    ///
    /// Returns an error if a donor directory cannot be read
    pub fn collect_donors(&self) -> Result<Vec<PathBuf>> {
        let mut donors = Vec::new();
        for path in &self.tiles {
            if path.is_dir() {
                donors.extend(list_files(path)?);
            } else {
                donors.push(path.clone());
            }
        }
        Ok(donors)
    }

    /// Render request described by the arguments
    ///
    /// # Errors
    ///
    /// Returns an error if a donor directory cannot be read
    pub fn request(&self) -> Result<RenderRequest> {
        Ok(RenderRequest {
            source: self.source.clone(),
            scale_factor: self.scale,
            width: self.width,
            height: self.height,
            output_name: self.output_name(),
            output_dir: self.output_dir.clone(),
            donors: self.collect_donors()?,
        })
    }
}

fn list_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(directory)
        .map_err(|e| file_system_error(directory, "read directory", e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| file_system_error(directory, "read directory entry", e))?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Runs one render described by the command line, with optional progress bars
pub struct RenderCommand {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl RenderCommand {
    /// Create a command from parsed arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Build the request, prepare frame directories for videos and render
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or rendering fails
    pub fn run(&mut self) -> Result<RenderOutcome> {
        let request = self.cli.request()?;
        let config = self.cli.render_config();
        let mut session = RenderSession::new(config);

        if classify(&request.source, config.extensions) == Some(MediaKind::Video) {
            let directories = self.cli.video_directories();
            for directory in [&directories.raw_frames, &directories.rendered_frames] {
                std::fs::create_dir_all(directory)
                    .map_err(|e| file_system_error(directory, "create directory", e))?;
            }
            session = session.with_video(Ffmpeg::default(), directories);
        }

        let outcome = match self.progress_manager {
            Some(ref mut pm) => session.render(&request, pm),
            None => session.render(&request, &mut SilentProgress),
        };

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
            Self::announce(pm);
        }

        outcome
    }

    // Allow print for the final user-facing message
    #[allow(clippy::print_stderr)]
    fn announce(pm: &ProgressManager) {
        if let Some(message) = pm.last_message() {
            eprintln!("{message}");
        }
    }
}
