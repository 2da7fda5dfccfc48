//! Error types for the `frameplay` crate.
//!
//! This module defines [`PlaybackError`], the unified error type returned by
//! every fallible stage of the pipeline: opening and probing the container,
//! decoding, pixel-format conversion, and display. Variants carry the input
//! path or the upstream error message so the binary can print a useful
//! diagnostic without extra logging at the call site.

use std::path::PathBuf;

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `frameplay` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlaybackError {
    /// The input could not be opened by the demuxer.
    #[error("Couldn't open input file {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The input was opened but its streams could not be probed.
    #[error("Couldn't find stream information in {path}: {reason}")]
    StreamInfo {
        /// Path of the opened input.
        path: PathBuf,
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// The container holds no video stream.
    #[error("Didn't find a video stream in {path}")]
    NoVideoStream {
        /// Path of the opened input.
        path: PathBuf,
    },

    /// FFmpeg has no decoder for the video stream's codec.
    #[error("No decoder available for codec {0}")]
    DecoderNotFound(String),

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// A decoded frame could not be converted to an image buffer.
    #[error("Failed to convert video frame: {0}")]
    ConversionError(String),

    /// The display window failed.
    #[error("Display error: {0}")]
    DisplayError(String),

    /// A player option was out of range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),
}

impl From<FfmpegError> for PlaybackError {
    fn from(error: FfmpegError) -> Self {
        PlaybackError::FfmpegError(error.to_string())
    }
}

impl From<eframe::Error> for PlaybackError {
    fn from(error: eframe::Error) -> Self {
        PlaybackError::DisplayError(error.to_string())
    }
}
