//! Progress events emitted while rendering, and their terminal display

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

/// A step of the rendering pipeline worth telling the user about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A donor image was turned into a tile (or rejected, shrinking `total`)
    TileInstalled {
        /// Tiles accepted so far
        built: usize,
        /// Donors offered minus donors rejected so far
        total: usize,
    },
    /// A still image is about to be partitioned and matched
    Analyzing,
    /// Cells are being stamped onto the canvas
    Rendering,
    /// A video frame finished rendering
    FrameRendered {
        /// Frames rendered so far
        rendered: usize,
        /// Frames in the video
        total: usize,
    },
    /// A still image was written
    ImageExported {
        /// Directory the image was written to
        directory: PathBuf,
    },
    /// A video was assembled
    VideoExported {
        /// Directory the video was written to
        directory: PathBuf,
    },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TileInstalled { built, total } => write!(f, "{built}/{total} tiles installed"),
            Self::Analyzing => f.write_str("Analyzing image..."),
            Self::Rendering => f.write_str("Rendering..."),
            Self::FrameRendered { rendered, total } => {
                write!(f, "Rendering frames... {rendered}/{total} frames rendered")
            }
            Self::ImageExported { directory } => {
                write!(f, "Rendered image exported to {}", directory.display())
            }
            Self::VideoExported { directory } => {
                write!(f, "Rendered video exported to {}", directory.display())
            }
        }
    }
}

/// Receiver of progress events
pub trait ProgressReporter {
    /// Handle one event
    fn report(&mut self, event: &ProgressEvent);
}

impl<F: FnMut(&ProgressEvent)> ProgressReporter for F {
    fn report(&mut self, event: &ProgressEvent) {
        (self)(event);
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report(&mut self, _event: &ProgressEvent) {}
}

static BAR_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix:>8}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Terminal progress display with one bar for tiles and one for video frames
pub struct ProgressManager {
    multi_progress: MultiProgress,
    tile_bar: Option<ProgressBar>,
    frame_bar: Option<ProgressBar>,
    last_message: Option<String>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress manager with no bars yet
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            tile_bar: None,
            frame_bar: None,
            last_message: None,
        }
    }

    /// Most recent event text, as a UI would show it
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref bar) = self.tile_bar {
            bar.finish();
        }
        if let Some(ref bar) = self.frame_bar {
            bar.finish();
        }
        let _ = self.multi_progress.clear();
    }

    fn bar(
        multi_progress: &MultiProgress,
        slot: &mut Option<ProgressBar>,
        prefix: &'static str,
    ) -> ProgressBar {
        slot.get_or_insert_with(|| {
            let bar = ProgressBar::new(0);
            bar.set_style(BAR_STYLE.clone());
            bar.set_prefix(prefix);
            multi_progress.add(bar)
        })
        .clone()
    }
}

impl ProgressReporter for ProgressManager {
    fn report(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::TileInstalled { built, total } => {
                let bar = Self::bar(&self.multi_progress, &mut self.tile_bar, "tiles");
                bar.set_length(*total as u64);
                bar.set_position(*built as u64);
            }
            ProgressEvent::FrameRendered { rendered, total } => {
                let bar = Self::bar(&self.multi_progress, &mut self.frame_bar, "frames");
                bar.set_length(*total as u64);
                bar.set_position(*rendered as u64);
            }
            ProgressEvent::Analyzing
            | ProgressEvent::Rendering
            | ProgressEvent::ImageExported { .. }
            | ProgressEvent::VideoExported { .. } => {
                if let Some(ref bar) = self.frame_bar {
                    bar.set_message(event.to_string());
                } else if let Some(ref bar) = self.tile_bar {
                    bar.set_message(event.to_string());
                }
            }
        }
        self.last_message = Some(event.to_string());
    }
}
