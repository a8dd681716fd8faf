//! Contract with the external video decoder/encoder and an ffmpeg-backed implementation

use crate::io::configuration::{FRAME_EXTENSION, FRAME_PREFIX};
use crate::io::error::{Result, file_system_error, invalid_parameter, video_error};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use tracing::debug;

/// Frames per second as an exact rational, e.g. `30000/1001`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRate {
    /// Frames
    pub numerator: u32,
    /// Seconds
    pub denominator: u32,
}

impl FrameRate {
    /// Whole frames per second
    pub const fn per_second(frames: u32) -> Self {
        Self {
            numerator: frames,
            denominator: 1,
        }
    }

    /// Rate as a floating point value
    pub fn as_f64(self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for FrameRate {
    type Err = crate::io::error::MosaicError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let (numerator, denominator) = text.split_once('/').unwrap_or((text, "1"));
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|e| invalid_parameter("frame_rate", &text, &e))
        };
        let rate = Self {
            numerator: parse(numerator)?,
            denominator: parse(denominator)?,
        };
        if rate.numerator == 0 || rate.denominator == 0 {
            return Err(invalid_parameter(
                "frame_rate",
                &text,
                &"frame rate must be positive",
            ));
        }
        Ok(rate)
    }
}

/// What decoding a video produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedVideo {
    /// Number of numbered frame files written
    pub frame_count: usize,
    /// Frame rate of the source video
    pub frame_rate: FrameRate,
}

/// External collaborator that turns videos into numbered frames and back
///
/// Frames are named by [`frame_file_name`], numbered from zero.
pub trait VideoPipeline {
    /// Decode `video` into numbered frame images inside `output_dir`
    ///
    /// The reported frame count must match the frames written by this call,
    /// not frames an earlier run left in the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails
    fn extract_frames(&mut self, video: &Path, output_dir: &Path) -> Result<ExtractedVideo>;

    /// Encode the first `frame_count` numbered frames of `frame_dir` into `output`
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails
    fn assemble_video(
        &mut self,
        output: &Path,
        frame_dir: &Path,
        frame_rate: FrameRate,
        frame_count: usize,
    ) -> Result<()>;
}

/// File name of frame `index`, e.g. `frame-3.jpg`
pub fn frame_file_name(index: usize) -> String {
    format!("{FRAME_PREFIX}{index}.{FRAME_EXTENSION}")
}

/// Path of frame `index` inside `directory`
pub fn frame_path(directory: &Path, index: usize) -> PathBuf {
    directory.join(frame_file_name(index))
}

/// Number of consecutive numbered frames present in `directory`, starting at zero
pub fn count_frames(directory: &Path) -> usize {
    (0..)
        .take_while(|&index| frame_path(directory, index).is_file())
        .count()
}

/// Whether `path` names a numbered frame file such as `frame-12.jpg`
pub fn is_frame_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix(FRAME_PREFIX))
        .and_then(|rest| rest.strip_suffix(FRAME_EXTENSION))
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

/// Remove every numbered frame left in `directory` by an earlier run
///
/// Other files are kept. Returns the number of frames removed.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or a frame cannot be removed
pub fn clear_frames(directory: &Path) -> Result<usize> {
    let entries =
        fs::read_dir(directory).map_err(|e| file_system_error(directory, "read directory", e))?;
    let mut removed = 0;
    for entry in entries {
        let path = entry
            .map_err(|e| file_system_error(directory, "read directory entry", e))?
            .path();
        if path.is_file() && is_frame_file(&path) {
            fs::remove_file(&path).map_err(|e| file_system_error(&path, "remove frame", e))?;
            removed += 1;
        }
    }
    if removed > 0 {
        debug!(directory = %directory.display(), removed, "stale frames removed");
    }
    Ok(removed)
}

/// Video pipeline that shells out to `ffmpeg` and `ffprobe`
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

impl Ffmpeg {
    /// Use explicit executables for encoding and probing
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Read the frame rate of the first video stream
    ///
    /// # Errors
    ///
    /// Returns an error if `ffprobe` fails or reports an unreadable rate
    pub fn probe_frame_rate(&self, video: &Path) -> Result<FrameRate> {
        let args: Vec<OsString> = vec![
            "-v".into(),
            "error".into(),
            "-select_streams".into(),
            "v:0".into(),
            "-show_entries".into(),
            "stream=r_frame_rate".into(),
            "-of".into(),
            "default=noprint_wrappers=1:nokey=1".into(),
            video.into(),
        ];
        let stdout = run(&self.ffprobe, &args, "frame rate probe")?;
        let line = stdout.lines().next().unwrap_or_default();
        line.parse()
    }
}

impl VideoPipeline for Ffmpeg {
    fn extract_frames(&mut self, video: &Path, output_dir: &Path) -> Result<ExtractedVideo> {
        let frame_rate = self.probe_frame_rate(video)?;
        clear_frames(output_dir)?;
        let pattern = output_dir.join(format!("{FRAME_PREFIX}%d.{FRAME_EXTENSION}"));
        let args: Vec<OsString> = vec![
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-i".into(),
            video.into(),
            "-start_number".into(),
            "0".into(),
            pattern.into(),
        ];
        run(&self.ffmpeg, &args, "frame extraction")?;

        let frame_count = count_frames(output_dir);
        debug!(frame_count, %frame_rate, "frames extracted");
        Ok(ExtractedVideo {
            frame_count,
            frame_rate,
        })
    }

    fn assemble_video(
        &mut self,
        output: &Path,
        frame_dir: &Path,
        frame_rate: FrameRate,
        frame_count: usize,
    ) -> Result<()> {
        let pattern = frame_dir.join(format!("{FRAME_PREFIX}%d.{FRAME_EXTENSION}"));
        let args: Vec<OsString> = vec![
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-framerate".into(),
            frame_rate.to_string().into(),
            "-start_number".into(),
            "0".into(),
            "-i".into(),
            pattern.into(),
            "-frames:v".into(),
            frame_count.to_string().into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            output.into(),
        ];
        run(&self.ffmpeg, &args, "video assembly")?;
        Ok(())
    }
}

// Runs a tool to completion and returns its stdout
fn run(program: &Path, args: &[OsString], stage: &'static str) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| video_error(stage, &format!("could not start {}: {e}", program.display())))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(video_error(
            stage,
            &format!("{} exited with {}: {}", program.display(), output.status, stderr.trim()),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
