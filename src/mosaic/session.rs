//! Render requests and the session that owns the tile library and canvas
//!
//! A [`RenderSession`] is the single entry point for rendering. It builds the
//! tile library lazily on the first request and keeps it until the donor set
//! or tile size changes, or until [`RenderSession::invalidate`] is called.
//! It also keeps the canvas between renders so that video frames are drawn
//! over the previous frame; [`CanvasPolicy::Fresh`] or
//! [`RenderSession::reset_canvas`] opt out of that.

use crate::io::configuration::{
    DEFAULT_JPEG_QUALITY, DEFAULT_SEED, IMAGE_OUTPUT_EXTENSION, VIDEO_OUTPUT_EXTENSION,
};
use crate::io::error::{MosaicError, RequestDefect, Result, invalid_parameter};
use crate::io::image::{ExtensionMatching, MediaKind, classify, load_rgb, output_path, save_jpeg};
use crate::io::progress::{ProgressEvent, ProgressReporter};
use crate::mosaic::canvas::{Canvas, composite, fit_source};
use crate::mosaic::matching::{MatchStrategy, Matcher};
use crate::mosaic::scale::resolve;
use crate::mosaic::tiles::{SquareCrop, TileLibrary, TileOptions};
use crate::video::pipeline::{FrameRate, VideoPipeline, clear_frames, frame_path};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Whether consecutive renders share one canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CanvasPolicy {
    /// Reuse the previous render's canvas when its size matches
    #[default]
    Accumulate,
    /// Start every render from a white canvas
    Fresh,
}

/// Behaviour switches for a render session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Cell-to-tile matching strategy
    pub strategy: MatchStrategy,
    /// Canvas sharing between renders
    pub canvas_policy: CanvasPolicy,
    /// Extension matching for sources and donors
    pub extensions: ExtensionMatching,
    /// Crop anchor for non-square donors
    pub crop: SquareCrop,
    /// JPEG quality of rendered images and frames
    pub jpeg_quality: u8,
    /// Seed for randomized matching
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::default(),
            canvas_policy: CanvasPolicy::default(),
            extensions: ExtensionMatching::default(),
            crop: SquareCrop::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            seed: DEFAULT_SEED,
        }
    }
}

impl RenderConfig {
    /// Options used when building tiles
    pub const fn tile_options(&self) -> TileOptions {
        TileOptions {
            crop: self.crop,
            extensions: self.extensions,
        }
    }
}

/// Working directories for video renders, owned by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDirectories {
    /// Where extracted source frames are written
    pub raw_frames: PathBuf,
    /// Where rendered frames are written before assembly
    pub rendered_frames: PathBuf,
}

/// Everything needed to render one image or video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Image or video to rebuild
    pub source: PathBuf,
    /// Requested tile side length; the closest valid size is used
    pub scale_factor: u32,
    /// Output width, `0` for the source width
    pub width: u32,
    /// Output height, `0` for the source height
    pub height: u32,
    /// Output file name without extension
    pub output_name: String,
    /// Existing directory the output is written to
    pub output_dir: PathBuf,
    /// Donor images, in tie-break order
    pub donors: Vec<PathBuf>,
}

impl RenderRequest {
    /// Check every precondition, reporting the first that fails
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::InvalidRequest`] naming the failed precondition
    pub fn validate(&self) -> Result<()> {
        if self.donors.is_empty() {
            return Err(RequestDefect::EmptyDonorSet.into());
        }
        if self.source.as_os_str().is_empty() || !self.source.is_file() {
            return Err(RequestDefect::MissingSource.into());
        }
        if self.scale_factor == 0 {
            return Err(RequestDefect::NonPositiveScaleFactor.into());
        }
        if self.output_name.trim().is_empty() {
            return Err(RequestDefect::EmptyOutputName.into());
        }
        if self.output_dir.as_os_str().is_empty() || !self.output_dir.is_dir() {
            return Err(RequestDefect::MissingOutputDirectory.into());
        }
        Ok(())
    }
}

/// Result of rendering one still image or frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    /// File the frame was written to
    pub path: PathBuf,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Tile side length used
    pub scale_factor: u32,
    /// Number of tiles stamped
    pub cells: u32,
}

/// Result of a full render request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A still image was rendered
    Image(FrameReport),
    /// A video was rendered frame by frame and reassembled
    Video {
        /// Assembled video file
        path: PathBuf,
        /// Frames rendered
        frame_count: usize,
        /// Frame rate passed to assembly
        frame_rate: FrameRate,
    },
}

/// Owns the state shared between renders: tile library, canvas and matcher
pub struct RenderSession {
    config: RenderConfig,
    matcher: Matcher,
    library: Option<TileLibrary>,
    canvas: Option<Canvas>,
    video: Option<(Box<dyn VideoPipeline>, VideoDirectories)>,
}

impl RenderSession {
    /// Session for still images only
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            matcher: Matcher::new(config.strategy, config.seed),
            library: None,
            canvas: None,
            video: None,
        }
    }

    /// Enable video renders through `pipeline`, using `directories` for frames
    #[must_use]
    pub fn with_video(
        mut self,
        pipeline: impl VideoPipeline + 'static,
        directories: VideoDirectories,
    ) -> Self {
        self.video = Some((Box::new(pipeline), directories));
        self
    }

    /// Session configuration
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Cached tile library, if one has been built
    pub const fn library(&self) -> Option<&TileLibrary> {
        self.library.as_ref()
    }

    /// Canvas left by the last render
    pub const fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// Drop the cached tile library; the next render rebuilds it
    pub fn invalidate(&mut self) {
        self.library = None;
    }

    /// Drop the shared canvas; the next render starts from white
    pub fn reset_canvas(&mut self) {
        self.canvas = None;
    }

    /// Build the tile library now, replacing any cached one
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::EmptyTileLibrary`] if every donor was rejected
    pub fn rebuild(
        &mut self,
        donors: &[PathBuf],
        tile_size: u32,
        progress: &mut dyn ProgressReporter,
    ) -> Result<&TileLibrary> {
        let library = TileLibrary::build(donors, tile_size, self.config.tile_options(), progress);
        info!(
            tiles = library.len(),
            offered = donors.len(),
            tile_size,
            "tile library built"
        );
        let library = self.library.insert(library);
        if library.is_empty() {
            return Err(MosaicError::EmptyTileLibrary {
                offered: donors.len(),
            });
        }
        Ok(library)
    }

    /// Reuse the cached library when it matches, otherwise rebuild it
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::EmptyTileLibrary`] if the library has no tiles
    pub fn ensure_library(
        &mut self,
        donors: &[PathBuf],
        tile_size: u32,
        progress: &mut dyn ProgressReporter,
    ) -> Result<&TileLibrary> {
        match self.library {
            Some(ref library) if library.is_built_for(donors, tile_size) => {
                if library.is_empty() {
                    return Err(MosaicError::EmptyTileLibrary {
                        offered: donors.len(),
                    });
                }
                debug!(tiles = library.len(), "reusing tile library");
            }
            _ => {
                self.rebuild(donors, tile_size, progress)?;
            }
        }
        self.library
            .as_ref()
            .ok_or(MosaicError::EmptyTileLibrary {
                offered: donors.len(),
            })
    }

    /// Render a validated request into a JPEG image or an assembled video
    ///
    /// Images are written to `<output_dir>/<output_name>.jpg`, videos to
    /// `<output_dir>/<output_name>.mp4`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid, the source type is
    /// unsupported, the resolution admits no grid, no donor is usable, or any
    /// decode, encode or filesystem step fails
    pub fn render(
        &mut self,
        request: &RenderRequest,
        progress: &mut dyn ProgressReporter,
    ) -> Result<RenderOutcome> {
        request.validate()?;

        match classify(&request.source, self.config.extensions) {
            Some(MediaKind::Image) => {
                let output = output_path(
                    &request.output_dir,
                    &request.output_name,
                    IMAGE_OUTPUT_EXTENSION,
                );
                progress.report(&ProgressEvent::Analyzing);
                progress.report(&ProgressEvent::Rendering);
                let report = self.render_frame(&request.source, request, &output, progress)?;
                progress.report(&ProgressEvent::ImageExported {
                    directory: request.output_dir.clone(),
                });
                Ok(RenderOutcome::Image(report))
            }
            Some(MediaKind::Video) => self.render_video(request, progress),
            None => Err(MosaicError::UnsupportedSource {
                path: request.source.clone(),
            }),
        }
    }

    /// Render one decoded image file into `output`
    ///
    /// Resolution, tile size and donors come from `request`; its source path
    /// is ignored in favour of `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding, tile size resolution, library building or
    /// writing the output fails
    pub fn render_frame(
        &mut self,
        source: &Path,
        request: &RenderRequest,
        output: &Path,
        progress: &mut dyn ProgressReporter,
    ) -> Result<FrameReport> {
        let frame = load_rgb(source)?;
        let width = if request.width == 0 {
            frame.width()
        } else {
            request.width
        };
        let height = if request.height == 0 {
            frame.height()
        } else {
            request.height
        };

        let scale = resolve(request.scale_factor, width, height)?;
        info!(
            source_width = frame.width(),
            source_height = frame.height(),
            width = scale.width,
            height = scale.height,
            scale_factor = scale.factor,
            "resolved frame layout"
        );

        self.ensure_library(&request.donors, scale.factor, progress)?;
        let fitted = fit_source(&frame, scale.width, scale.height);

        let reusable = self.config.canvas_policy == CanvasPolicy::Accumulate
            && self
                .canvas
                .as_ref()
                .is_some_and(|canvas| canvas.dimensions() == (scale.width, scale.height));
        if !reusable {
            self.canvas = Some(Canvas::blank(scale.width, scale.height));
        }
        let canvas = self
            .canvas
            .get_or_insert_with(|| Canvas::blank(scale.width, scale.height));
        let library = self.library.as_ref().ok_or(MosaicError::EmptyTileLibrary {
            offered: request.donors.len(),
        })?;

        let summary = composite(&fitted, &scale, library, &mut self.matcher, canvas)?;
        save_jpeg(canvas.image(), output, self.config.jpeg_quality)?;
        debug!(path = %output.display(), cells = summary.cells(), "frame saved");

        Ok(FrameReport {
            path: output.to_path_buf(),
            width: scale.width,
            height: scale.height,
            scale_factor: scale.factor,
            cells: summary.cells(),
        })
    }

    fn render_video(
        &mut self,
        request: &RenderRequest,
        progress: &mut dyn ProgressReporter,
    ) -> Result<RenderOutcome> {
        let Some((mut pipeline, directories)) = self.video.take() else {
            return Err(invalid_parameter(
                "source",
                &request.source.display(),
                &"video rendering needs a video pipeline and frame directories",
            ));
        };
        let outcome = self.render_frames(pipeline.as_mut(), &directories, request, progress);
        self.video = Some((pipeline, directories));
        outcome
    }

    fn render_frames(
        &mut self,
        pipeline: &mut dyn VideoPipeline,
        directories: &VideoDirectories,
        request: &RenderRequest,
        progress: &mut dyn ProgressReporter,
    ) -> Result<RenderOutcome> {
        for directory in [&directories.raw_frames, &directories.rendered_frames] {
            if !directory.is_dir() {
                return Err(invalid_parameter(
                    "frame_directory",
                    &directory.display(),
                    &"frame directories must exist before rendering a video",
                ));
            }
        }

        clear_frames(&directories.raw_frames)?;
        clear_frames(&directories.rendered_frames)?;
        let extracted = pipeline.extract_frames(&request.source, &directories.raw_frames)?;
        info!(
            frames = extracted.frame_count,
            frame_rate = %extracted.frame_rate,
            "video decoded"
        );

        for index in 0..extracted.frame_count {
            self.render_frame(
                &frame_path(&directories.raw_frames, index),
                request,
                &frame_path(&directories.rendered_frames, index),
                progress,
            )?;
            progress.report(&ProgressEvent::FrameRendered {
                rendered: index + 1,
                total: extracted.frame_count,
            });
        }

        let output = output_path(
            &request.output_dir,
            &request.output_name,
            VIDEO_OUTPUT_EXTENSION,
        );
        pipeline.assemble_video(
            &output,
            &directories.rendered_frames,
            extracted.frame_rate,
            extracted.frame_count,
        )?;
        info!(path = %output.display(), "video assembled");
        progress.report(&ProgressEvent::VideoExported {
            directory: request.output_dir.clone(),
        });

        Ok(RenderOutcome::Video {
            path: output,
            frame_count: extracted.frame_count,
            frame_rate: extracted.frame_rate,
        })
    }
}
