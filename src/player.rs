//! The decode-convert pipeline behind the window.
//!
//! [`Player`] owns the demuxer, decoder and converter for one input and
//! hands out displayable images one at a time. The window drives it from
//! its repaint callback; [`Player::run_to_end`] drives it without a window.
//!
//! # Example
//!
//! ```no_run
//! use frameplay::{Player, PlayerOptions};
//!
//! let player = Player::open(PlayerOptions::new("video.mp4"))?;
//! let summary = player.run_to_end(|index, image| {
//!     println!("frame {index}: {}x{}", image.width(), image.height());
//! })?;
//! println!("decoded {} frames", summary.frames_decoded);
//! # Ok::<(), frameplay::PlaybackError>(())
//! ```

use ffmpeg_next::frame::Video as VideoFrame;
use image::DynamicImage;

use crate::{
    configuration::PlayerOptions,
    conversion::FrameConverter,
    decode::FrameDecoder,
    error::PlaybackError,
    ffmpeg::set_ffmpeg_log_level,
    pacing::FramePacer,
    source::{VideoSource, VideoStreamInfo},
};

/// Why playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every frame of the stream was shown.
    EndOfStream,
    /// The user pressed Escape.
    Interrupted,
    /// The window was closed by the window manager.
    WindowClosed,
}

/// Counters reported when playback ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Frames produced by the decoder.
    pub frames_decoded: u64,
    /// Frames converted and handed out for display.
    pub frames_displayed: u64,
    /// Why playback ended.
    pub stop_reason: StopReason,
}

/// Decode-convert pipeline for one input.
pub struct Player {
    options: PlayerOptions,
    decoder: FrameDecoder,
    converter: FrameConverter,
    decoded_frame: VideoFrame,
    frames_displayed: u64,
}

impl Player {
    /// Validate `options`, open the input and prepare the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::InvalidOption`] for invalid options and any
    /// error from [`VideoSource::open`] or decoder setup.
    pub fn open(options: PlayerOptions) -> Result<Self, PlaybackError> {
        options.validate()?;
        set_ffmpeg_log_level(options.ffmpeg_log_level);

        let source = VideoSource::open(&options.input)?;
        let decoder = source.into_decoder()?;
        let converter = FrameConverter::new(options.output.clone());

        Ok(Self {
            options,
            decoder,
            converter,
            decoded_frame: VideoFrame::empty(),
            frames_displayed: 0,
        })
    }

    /// Options the player was opened with.
    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    /// The video stream being played.
    pub fn info(&self) -> &VideoStreamInfo {
        self.decoder.info()
    }

    /// Playback rate: the override if set, otherwise the stream's rate.
    pub fn frames_per_second(&self) -> f64 {
        self.options
            .frame_rate
            .unwrap_or(self.decoder.info().frames_per_second)
    }

    /// A pacer running at [`frames_per_second`](Player::frames_per_second).
    pub fn pacer(&self) -> FramePacer {
        FramePacer::new(self.frames_per_second())
    }

    /// Size of the images [`next_image`](Player::next_image) returns.
    pub fn output_dimensions(&self) -> (u32, u32) {
        let info = self.decoder.info();
        self.options
            .output
            .resolve_dimensions(info.width, info.height)
    }

    /// Frames the decoder has produced so far.
    pub fn frames_decoded(&self) -> u64 {
        self.decoder.frames_decoded()
    }

    /// Frames converted and handed out so far.
    pub fn frames_displayed(&self) -> u64 {
        self.frames_displayed
    }

    /// Counters so far, tagged with `stop_reason`.
    pub fn summary(&self, stop_reason: StopReason) -> PlaybackSummary {
        PlaybackSummary {
            frames_decoded: self.frames_decoded(),
            frames_displayed: self.frames_displayed,
            stop_reason,
        }
    }

    /// Decode and convert the next displayable frame.
    ///
    /// Frames without a picture are skipped. Returns `Ok(None)` at end of
    /// stream.
    ///
    /// # Errors
    ///
    /// Propagates decoding and conversion failures.
    pub fn next_image(&mut self) -> Result<Option<DynamicImage>, PlaybackError> {
        while self.decoder.next_frame(&mut self.decoded_frame)? {
            match self.converter.convert(&self.decoded_frame)? {
                Some(image) => {
                    self.frames_displayed += 1;
                    return Ok(Some(image));
                }
                None => log::debug!(
                    "Skipping empty frame {}",
                    self.decoder.frames_decoded()
                ),
            }
        }
        Ok(None)
    }

    /// Run the whole stream without a window, calling `on_frame` with the
    /// 0-based index of each displayable image.
    ///
    /// # Errors
    ///
    /// Propagates decoding and conversion failures.
    pub fn run_to_end<F>(mut self, mut on_frame: F) -> Result<PlaybackSummary, PlaybackError>
    where
        F: FnMut(u64, &DynamicImage),
    {
        while let Some(image) = self.next_image()? {
            on_frame(self.frames_displayed - 1, &image);
        }
        let summary = self.summary(StopReason::EndOfStream);
        log::debug!(
            "Headless run finished: {} decoded, {} displayed",
            summary.frames_decoded,
            summary.frames_displayed
        );
        Ok(summary)
    }
}
