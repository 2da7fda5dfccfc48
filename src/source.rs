//! Container opening and video stream selection.
//!
//! [`VideoSource`] opens a media file in two explicit stages, opening the
//! container and then probing its streams, so that each stage reports its own
//! failure. It then selects the first video stream in index order and caches
//! a [`VideoStreamInfo`] describing it.
//!
//! # Example
//!
//! ```no_run
//! use frameplay::VideoSource;
//!
//! let source = VideoSource::open("video.mp4")?;
//! let info = source.info();
//! println!("Codec: {}", info.codec_long_name);
//! println!("{}x{} @ {:.2} fps", info.width, info.height, info.frames_per_second);
//! # Ok::<(), frameplay::PlaybackError>(())
//! ```

use std::{
    ffi::CString,
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    ptr,
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Rational,
    codec::context::Context as CodecContext,
    format::{context::Input, stream::Stream},
    media::Type,
};
use ffmpeg_sys_next::AVFormatContext;

use crate::{decode::FrameDecoder, error::PlaybackError};

/// Description of the selected video stream.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoStreamInfo {
    /// Index of the stream inside the container.
    pub stream_index: usize,
    /// Coded frame width in pixels.
    pub width: u32,
    /// Coded frame height in pixels.
    pub height: u32,
    /// Average frame rate, falling back to the real base frame rate.
    /// `0.0` when the container declares neither.
    pub frames_per_second: f64,
    /// Frame count stored by the container for this stream, or an estimate
    /// from the stream duration when it stores none. `0` when unknown.
    pub reported_frame_count: u64,
    /// Short codec name (e.g. `"h264"`).
    pub codec_name: String,
    /// Human-readable codec name (e.g. `"H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10"`).
    pub codec_long_name: String,
    /// Time base of the stream's timestamps.
    pub time_base: Rational,
    /// Stream duration, [`Duration::ZERO`] when unknown.
    pub duration: Duration,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub container_format: String,
}

/// An opened container positioned on its first video stream.
pub struct VideoSource {
    pub(crate) input_context: Input,
    pub(crate) info: VideoStreamInfo,
    pub(crate) path: PathBuf,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("path", &self.path)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open `path`, probe its streams, and select the first video stream.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::FileOpen`] if the container cannot be opened.
    /// - [`PlaybackError::StreamInfo`] if its streams cannot be probed.
    /// - [`PlaybackError::NoVideoStream`] if no stream carries video.
    /// - [`PlaybackError::DecoderNotFound`] if FFmpeg cannot decode the
    ///   selected stream's codec.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PlaybackError> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Opening media file: {}", path.display());

        ffmpeg_next::init().map_err(|error| PlaybackError::FileOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context = open_and_probe(&path)?;

        let info = {
            let stream = input_context
                .streams()
                .find(|stream| stream.parameters().medium() == Type::Video)
                .ok_or_else(|| PlaybackError::NoVideoStream { path: path.clone() })?;
            describe_stream(&stream, &input_context)?
        };
        log::info!(
            "Selected video stream {} ({}): {}x{} @ {:.3} fps",
            info.stream_index,
            info.codec_name,
            info.width,
            info.height,
            info.frames_per_second,
        );

        Ok(Self {
            input_context,
            info,
            path,
        })
    }

    /// The selected video stream.
    pub fn info(&self) -> &VideoStreamInfo {
        &self.info
    }

    /// Path the source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a decoder for the selected stream, handing it the demuxer.
    ///
    /// # Errors
    ///
    /// Returns an error if the codec context cannot be built or opened.
    pub fn into_decoder(self) -> Result<FrameDecoder, PlaybackError> {
        FrameDecoder::new(self)
    }
}

/// Run `avformat_open_input` and `avformat_find_stream_info` separately so
/// the two failure modes stay distinguishable.
fn open_and_probe(path: &Path) -> Result<Input, PlaybackError> {
    let url = path
        .to_str()
        .and_then(|text| CString::new(text).ok())
        .ok_or_else(|| PlaybackError::FileOpen {
            path: path.to_path_buf(),
            reason: "path is not valid UTF-8 or contains a NUL byte".to_string(),
        })?;

    // SAFETY: `format_context` starts null so FFmpeg allocates it. On every
    // failure path it is either left null by FFmpeg or closed here before
    // returning; on success ownership moves into `Input`, whose drop closes it.
    unsafe {
        let mut format_context: *mut AVFormatContext = ptr::null_mut();

        let status = ffmpeg_sys_next::avformat_open_input(
            &mut format_context,
            url.as_ptr(),
            ptr::null_mut(),
            ptr::null_mut(),
        );
        if status < 0 {
            return Err(PlaybackError::FileOpen {
                path: path.to_path_buf(),
                reason: FfmpegError::from(status).to_string(),
            });
        }

        let status = ffmpeg_sys_next::avformat_find_stream_info(format_context, ptr::null_mut());
        if status < 0 {
            ffmpeg_sys_next::avformat_close_input(&mut format_context);
            return Err(PlaybackError::StreamInfo {
                path: path.to_path_buf(),
                reason: FfmpegError::from(status).to_string(),
            });
        }

        Ok(Input::wrap(format_context))
    }
}

fn describe_stream(stream: &Stream, input_context: &Input) -> Result<VideoStreamInfo, PlaybackError> {
    let index = stream.index();
    let parameters = stream.parameters();
    let codec_id = parameters.id();

    let codec = ffmpeg_next::decoder::find(codec_id)
        .ok_or_else(|| PlaybackError::DecoderNotFound(format!("{codec_id:?}")))?;

    let decoder_context = CodecContext::from_parameters(parameters)?;
    let video_decoder = decoder_context.decoder().video().map_err(|error| {
        PlaybackError::VideoDecodeError(format!(
            "Failed to open video decoder for stream {index}: {error}"
        ))
    })?;

    let frames_per_second = rational_to_f64(stream.avg_frame_rate())
        .or_else(|| rational_to_f64(stream.rate()))
        .unwrap_or(0.0);

    let time_base = stream.time_base();
    let duration = stream_duration(stream, input_context);

    let reported_frame_count = if stream.frames() > 0 {
        stream.frames() as u64
    } else if frames_per_second > 0.0 {
        (duration.as_secs_f64() * frames_per_second).round() as u64
    } else {
        0
    };

    Ok(VideoStreamInfo {
        stream_index: index,
        width: video_decoder.width(),
        height: video_decoder.height(),
        frames_per_second,
        reported_frame_count,
        codec_name: codec.name().to_string(),
        codec_long_name: codec.description().to_string(),
        time_base,
        duration,
        container_format: input_context.format().name().to_string(),
    })
}

/// Stream duration, falling back to the container duration.
fn stream_duration(stream: &Stream, input_context: &Input) -> Duration {
    let time_base = stream.time_base();
    if stream.duration() > 0 && time_base.denominator() != 0 {
        let seconds = stream.duration() as f64 * time_base.numerator() as f64
            / time_base.denominator() as f64;
        return Duration::from_secs_f64(seconds.max(0.0));
    }

    let microseconds = input_context.duration();
    if microseconds > 0 {
        Duration::from_micros(microseconds as u64)
    } else {
        Duration::ZERO
    }
}

fn rational_to_f64(rational: Rational) -> Option<f64> {
    if rational.numerator() > 0 && rational.denominator() > 0 {
        Some(rational.numerator() as f64 / rational.denominator() as f64)
    } else {
        None
    }
}
