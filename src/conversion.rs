//! Pixel-format conversion of decoded frames.
//!
//! Decoders hand out frames in whatever layout the codec produces, usually
//! planar YUV. [`FrameConverter`] runs them through FFmpeg's software scaler
//! to get a single interleaved plane (RGB, RGBA or grayscale) at the
//! requested size, then copies that plane into an [`image::DynamicImage`]
//! with the per-row padding removed.
//!
//! # Example
//!
//! ```no_run
//! use ffmpeg_next::frame::Video as VideoFrame;
//! use frameplay::{FrameConverter, FrameOutputOptions};
//!
//! let mut converter = FrameConverter::new(FrameOutputOptions::default());
//! let frame = VideoFrame::empty();
//! // A frame without a pixel format converts to nothing.
//! assert!(converter.convert(&frame)?.is_none());
//! # Ok::<(), frameplay::PlaybackError>(())
//! ```

use ffmpeg_next::{
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::configuration::{FrameOutputOptions, PixelFormat};
use crate::error::PlaybackError;

/// Source and target geometry a scaler context was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScalerKey {
    source_format: Pixel,
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
}

/// Converts decoded frames to interleaved images.
///
/// The scaler context is reused across frames and only rebuilt when the
/// incoming frame's pixel format or dimensions change.
pub struct FrameConverter {
    output: FrameOutputOptions,
    scaler: Option<(ScalerKey, ScalingContext)>,
    converted: VideoFrame,
    scaler_builds: u64,
}

impl FrameConverter {
    /// Create a converter; the scaler is built on the first frame.
    pub fn new(output: FrameOutputOptions) -> Self {
        Self {
            output,
            scaler: None,
            converted: VideoFrame::empty(),
            scaler_builds: 0,
        }
    }

    /// Output settings this converter applies.
    pub fn output(&self) -> &FrameOutputOptions {
        &self.output
    }

    /// How many scaler contexts have been built so far.
    pub fn scaler_builds(&self) -> u64 {
        self.scaler_builds
    }

    /// Convert `frame` to an image in the configured layout and size.
    ///
    /// Returns `Ok(None)` for a frame that carries no picture: no pixel
    /// format or a zero dimension.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::ConversionError`] if the scaler cannot be
    /// built for the frame's format or fails to run.
    pub fn convert(&mut self, frame: &VideoFrame) -> Result<Option<DynamicImage>, PlaybackError> {
        let source_format = frame.format();
        if source_format == Pixel::None || frame.width() == 0 || frame.height() == 0 {
            log::trace!("Frame has no picture, nothing to convert");
            return Ok(None);
        }

        let (target_width, target_height) =
            self.output.resolve_dimensions(frame.width(), frame.height());
        let key = ScalerKey {
            source_format,
            source_width: frame.width(),
            source_height: frame.height(),
            target_width,
            target_height,
        };

        let pixel_format = self.output.pixel_format;
        self.prepare_scaler(key)?;
        let Some((_, scaler)) = self.scaler.as_mut() else {
            return Err(PlaybackError::ConversionError(
                "scaler context missing".to_string(),
            ));
        };
        scaler
            .run(frame, &mut self.converted)
            .map_err(|error| PlaybackError::ConversionError(error.to_string()))?;

        let bytes_per_pixel = pixel_format.bytes_per_pixel();
        let buffer = packed_plane(&self.converted, target_width, target_height, bytes_per_pixel);
        let image = match pixel_format {
            PixelFormat::Rgb8 => {
                RgbImage::from_raw(target_width, target_height, buffer).map(DynamicImage::ImageRgb8)
            }
            PixelFormat::Rgba8 => RgbaImage::from_raw(target_width, target_height, buffer)
                .map(DynamicImage::ImageRgba8),
            PixelFormat::Gray8 => GrayImage::from_raw(target_width, target_height, buffer)
                .map(DynamicImage::ImageLuma8),
        };

        image.map(Some).ok_or_else(|| {
            PlaybackError::ConversionError(format!(
                "scaled plane too small for a {target_width}x{target_height} {pixel_format:?} image"
            ))
        })
    }

    fn prepare_scaler(&mut self, key: ScalerKey) -> Result<(), PlaybackError> {
        let stale = self
            .scaler
            .as_ref()
            .is_none_or(|(current, _)| *current != key);

        if stale {
            log::debug!(
                "Building scaler {:?} {}x{} -> {:?} {}x{}",
                key.source_format,
                key.source_width,
                key.source_height,
                self.output.pixel_format,
                key.target_width,
                key.target_height,
            );
            let context = ScalingContext::get(
                key.source_format,
                key.source_width,
                key.source_height,
                self.output.pixel_format.to_ffmpeg_pixel(),
                key.target_width,
                key.target_height,
                ScalingFlags::FAST_BILINEAR,
            )
            .map_err(|error| {
                PlaybackError::ConversionError(format!(
                    "cannot convert from {:?}: {error}",
                    key.source_format
                ))
            })?;
            // The previous output frame has the old geometry.
            self.converted = VideoFrame::empty();
            self.scaler = Some((key, context));
            self.scaler_builds += 1;
        }
        Ok(())
    }
}

/// Copy the first plane of `frame` into a buffer without row padding.
fn packed_plane(frame: &VideoFrame, width: u32, height: u32, bytes_per_pixel: usize) -> Vec<u8> {
    let stride = frame.stride(0);
    let row_bytes = width as usize * bytes_per_pixel;
    let rows = height as usize;
    let data = frame.data(0);

    if stride == row_bytes {
        return data[..row_bytes * rows].to_vec();
    }

    let mut buffer = Vec::with_capacity(row_bytes * rows);
    for row in data.chunks(stride).take(rows) {
        buffer.extend_from_slice(&row[..row_bytes]);
    }
    buffer
}
