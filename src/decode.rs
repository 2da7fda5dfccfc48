//! Packet-to-frame decoding for the selected video stream.
//!
//! [`FrameDecoder`] pulls packets from the demuxer one at a time, feeds the
//! ones belonging to the video stream to the codec, and hands back decoded
//! frames in presentation order. When the demuxer reaches end of file the
//! decoder is flushed and drained, so every frame the stream holds comes out.

use ffmpeg_next::{
    Error as FfmpegError, Packet, codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder, format::context::Input, frame::Video as VideoFrame,
};

use crate::{
    error::PlaybackError,
    source::{VideoSource, VideoStreamInfo},
};

/// Decodes the video stream of a [`VideoSource`] frame by frame.
pub struct FrameDecoder {
    input_context: Input,
    decoder: VideoDecoder,
    info: VideoStreamInfo,
    eof_sent: bool,
    done: bool,
    frames_decoded: u64,
    packets_skipped: u64,
}

impl FrameDecoder {
    pub(crate) fn new(source: VideoSource) -> Result<Self, PlaybackError> {
        let VideoSource {
            input_context,
            info,
            ..
        } = source;

        let decoder = {
            let stream = input_context.stream(info.stream_index).ok_or_else(|| {
                PlaybackError::VideoDecodeError(format!(
                    "stream {} disappeared from the container",
                    info.stream_index
                ))
            })?;
            let decoder_context = CodecContext::from_parameters(stream.parameters())?;
            decoder_context.decoder().video()?
        };

        log::debug!(
            "Opened {} decoder for stream {} ({:?})",
            info.codec_name,
            info.stream_index,
            decoder.format(),
        );

        Ok(Self {
            input_context,
            decoder,
            info,
            eof_sent: false,
            done: false,
            frames_decoded: 0,
            packets_skipped: 0,
        })
    }

    /// The stream being decoded.
    pub fn info(&self) -> &VideoStreamInfo {
        &self.info
    }

    /// Number of frames returned so far.
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Number of packets the codec rejected as invalid data.
    pub fn packets_skipped(&self) -> u64 {
        self.packets_skipped
    }

    /// Decode the next frame into `frame`.
    ///
    /// Returns `Ok(true)` when `frame` holds a new picture and `Ok(false)`
    /// once the stream is exhausted. Calling it again after `Ok(false)`
    /// keeps returning `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the demuxer fails for any reason other than end
    /// of file, or if the codec fails in a way other than rejecting a
    /// corrupt packet.
    pub fn next_frame(&mut self, frame: &mut VideoFrame) -> Result<bool, PlaybackError> {
        if self.done {
            return Ok(false);
        }

        loop {
            match self.decoder.receive_frame(frame) {
                Ok(()) => {
                    self.frames_decoded += 1;
                    log::trace!(
                        "Decoded frame {} (pts {:?})",
                        self.frames_decoded,
                        frame.pts()
                    );
                    return Ok(true);
                }
                Err(FfmpegError::Eof) => {
                    self.done = true;
                    log::debug!("Decoder drained after {} frames", self.frames_decoded);
                    return Ok(false);
                }
                Err(FfmpegError::Other { errno }) if errno == ffmpeg_next::error::EAGAIN => {}
                Err(error) => {
                    self.done = true;
                    return Err(PlaybackError::VideoDecodeError(error.to_string()));
                }
            }

            // The codec wants more input.
            if self.eof_sent {
                self.done = true;
                return Ok(false);
            }
            self.feed_packet()?;
        }
    }

    /// Read one packet and send it to the codec if it belongs to the video
    /// stream, or flush the codec at end of file.
    fn feed_packet(&mut self) -> Result<(), PlaybackError> {
        let mut packet = Packet::empty();
        match packet.read(&mut self.input_context) {
            Ok(()) => {
                if packet.stream() != self.info.stream_index {
                    return Ok(());
                }
                match self.decoder.send_packet(&packet) {
                    Ok(()) => Ok(()),
                    Err(FfmpegError::InvalidData) => {
                        self.packets_skipped += 1;
                        log::warn!(
                            "Skipping corrupt packet at pts {:?} in stream {}",
                            packet.pts(),
                            self.info.stream_index
                        );
                        Ok(())
                    }
                    Err(error) => {
                        self.done = true;
                        Err(PlaybackError::VideoDecodeError(error.to_string()))
                    }
                }
            }
            Err(FfmpegError::Eof) => {
                log::debug!("End of file reached, flushing decoder");
                self.decoder.send_eof()?;
                self.eof_sent = true;
                Ok(())
            }
            Err(error) => {
                self.done = true;
                Err(PlaybackError::from(error))
            }
        }
    }
}
