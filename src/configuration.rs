//! Player configuration.
//!
//! [`PlayerOptions`] is a builder that carries everything the pipeline needs
//! besides the media itself: the input path, the window title, an optional
//! frame-rate override, and the [`FrameOutputOptions`] that control how
//! decoded frames are converted for display.
//!
//! # Example
//!
//! ```
//! use frameplay::{FrameOutputOptions, PixelFormat, PlayerOptions};
//!
//! let options = PlayerOptions::new("clip.mkv")
//!     .with_window_title("Preview")
//!     .with_frame_rate(30.0)
//!     .with_output(FrameOutputOptions::default().with_width(640));
//! assert!(options.validate().is_ok());
//! assert_eq!(options.output.pixel_format, PixelFormat::Rgb8);
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ffmpeg_next::format::Pixel;

use crate::error::PlaybackError;
use crate::ffmpeg::FfmpegLogLevel;

/// Input played when none is given.
pub const DEFAULT_INPUT: &str = "video.mp4";

/// Interleaved pixel layout of converted frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 8-bit RGB (24 bpp). This is the default.
    #[default]
    Rgb8,
    /// 8-bit RGBA with opaque alpha (32 bpp).
    Rgba8,
    /// 8-bit grayscale (8 bpp).
    Gray8,
}

impl PixelFormat {
    pub(crate) fn to_ffmpeg_pixel(self) -> Pixel {
        match self {
            PixelFormat::Rgb8 => Pixel::RGB24,
            PixelFormat::Rgba8 => Pixel::RGBA,
            PixelFormat::Gray8 => Pixel::GRAY8,
        }
    }

    /// Bytes per pixel in the packed output buffer.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
            PixelFormat::Gray8 => 1,
        }
    }
}

impl FromStr for PixelFormat {
    type Err = PlaybackError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rgb8" | "rgb" | "rgb24" => Ok(PixelFormat::Rgb8),
            "rgba8" | "rgba" => Ok(PixelFormat::Rgba8),
            "gray8" | "gray" | "grey" | "grayscale" => Ok(PixelFormat::Gray8),
            _ => Err(PlaybackError::InvalidOption(format!(
                "unsupported pixel format: {value}"
            ))),
        }
    }
}

/// Pixel layout and resolution of converted frames.
///
/// When no dimensions are set the source resolution is kept. Setting one
/// dimension with [`maintain_aspect_ratio`](FrameOutputOptions::maintain_aspect_ratio)
/// derives the other from the source aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutputOptions {
    /// Output pixel layout.
    pub pixel_format: PixelFormat,
    /// Target width. `None` keeps the source width.
    pub width: Option<u32>,
    /// Target height. `None` keeps the source height.
    pub height: Option<u32>,
    /// Derive the missing dimension from the source aspect ratio.
    pub maintain_aspect_ratio: bool,
}

impl Default for FrameOutputOptions {
    fn default() -> Self {
        Self {
            pixel_format: PixelFormat::Rgb8,
            width: None,
            height: None,
            maintain_aspect_ratio: true,
        }
    }
}

impl FrameOutputOptions {
    /// Set the output pixel layout.
    pub fn with_pixel_format(mut self, pixel_format: PixelFormat) -> Self {
        self.pixel_format = pixel_format;
        self
    }

    /// Set the target width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the target height.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Toggle aspect-ratio preservation when only one dimension is given.
    pub fn with_maintain_aspect_ratio(mut self, maintain: bool) -> Self {
        self.maintain_aspect_ratio = maintain;
        self
    }

    /// Resolve the output `(width, height)` for a given source size.
    pub fn resolve_dimensions(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) if self.maintain_aspect_ratio && source_width > 0 => {
                let ratio = w as f64 / source_width as f64;
                let h = (source_height as f64 * ratio).round() as u32;
                (w, h.max(1))
            }
            (Some(w), None) => (w, source_height),
            (None, Some(h)) if self.maintain_aspect_ratio && source_height > 0 => {
                let ratio = h as f64 / source_height as f64;
                let w = (source_width as f64 * ratio).round() as u32;
                (w.max(1), h)
            }
            (None, Some(h)) => (source_width, h),
            (None, None) => (source_width, source_height),
        }
    }
}

/// Everything needed to open and play an input.
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    /// Media file to play.
    pub input: PathBuf,
    /// Window title. `None` uses the input's file name.
    pub window_title: Option<String>,
    /// Playback rate override in frames per second.
    pub frame_rate: Option<f64>,
    /// Conversion settings for displayed frames.
    pub output: FrameOutputOptions,
    /// FFmpeg's own console verbosity.
    pub ffmpeg_log_level: FfmpegLogLevel,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT)
    }
}

impl PlayerOptions {
    /// Options for playing `input` with default settings.
    pub fn new<P: AsRef<Path>>(input: P) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            window_title: None,
            frame_rate: None,
            output: FrameOutputOptions::default(),
            ffmpeg_log_level: FfmpegLogLevel::default(),
        }
    }

    /// Title shown on the playback window.
    pub fn with_window_title<S: Into<String>>(mut self, title: S) -> Self {
        self.window_title = Some(title.into());
        self
    }

    /// Override the stream's playback rate.
    pub fn with_frame_rate(mut self, frames_per_second: f64) -> Self {
        self.frame_rate = Some(frames_per_second);
        self
    }

    /// Set the output frame options.
    pub fn with_output(mut self, output: FrameOutputOptions) -> Self {
        self.output = output;
        self
    }

    /// Set FFmpeg's internal log level.
    pub fn with_ffmpeg_log_level(mut self, level: FfmpegLogLevel) -> Self {
        self.ffmpeg_log_level = level;
        self
    }

    /// The window title, falling back to the input's file name.
    pub fn resolved_title(&self) -> String {
        if let Some(title) = &self.window_title {
            return title.clone();
        }
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }

    /// Reject out-of-range values before any file is touched.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::InvalidOption`] for a non-finite or
    /// non-positive frame rate, or a zero output dimension.
    pub fn validate(&self) -> Result<(), PlaybackError> {
        if let Some(rate) = self.frame_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(PlaybackError::InvalidOption(format!(
                    "frame rate must be a positive number, got {rate}"
                )));
            }
        }
        if self.output.width == Some(0) || self.output.height == Some(0) {
            return Err(PlaybackError::InvalidOption(
                "output dimensions must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
