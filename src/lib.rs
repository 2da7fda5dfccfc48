//! # frameplay
//!
//! Decode the first video stream of a media file with FFmpeg and play it in
//! a window.
//!
//! The pipeline is strictly sequential and single-threaded:
//!
//! 1. [`VideoSource`] opens the container, probes its streams and picks the
//!    first video stream.
//! 2. [`FrameDecoder`] reads packets and decodes frames, draining the codec
//!    at end of file.
//! 3. [`FrameConverter`] turns each frame into an interleaved
//!    [`image::DynamicImage`] through FFmpeg's software scaler.
//! 4. [`display::play`] shows the images in an `eframe` window, paced by
//!    [`FramePacer`], until the stream ends or Escape is pressed.
//!
//! [`Player`] glues steps 1–3 together and can also run without a window.
//!
//! ## Quick Start
//!
//! ```no_run
//! use frameplay::{Player, PlayerOptions};
//!
//! let player = Player::open(PlayerOptions::new("video.mp4"))?;
//! println!("Codec: {}", player.info().codec_long_name);
//! let summary = frameplay::display::play(player)?;
//! println!("{summary:?}");
//! # Ok::<(), frameplay::PlaybackError>(())
//! ```
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on the system, as required
//! by the [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.

pub mod configuration;
pub mod conversion;
pub mod decode;
pub mod display;
pub mod error;
pub mod ffmpeg;
pub mod pacing;
pub mod player;
pub mod source;

pub use configuration::{DEFAULT_INPUT, FrameOutputOptions, PixelFormat, PlayerOptions};
pub use conversion::FrameConverter;
pub use decode::FrameDecoder;
pub use error::PlaybackError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use pacing::{FALLBACK_FRAMES_PER_SECOND, FramePacer, frame_delay};
pub use player::{PlaybackSummary, Player, StopReason};
pub use source::{VideoSource, VideoStreamInfo};
