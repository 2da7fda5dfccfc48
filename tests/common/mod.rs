//! Fixture writers shared by the integration tests.
//!
//! Both formats are simple enough to write by hand, so the tests do not
//! depend on an `ffmpeg` binary being installed.

#![allow(dead_code)]

use std::{fs, path::Path};

/// Write a YUV4MPEG2 file of `frames` 4:2:0 frames. Frame `n` has luma
/// `base_luma + n` and neutral chroma, so every frame decodes to a grey.
pub fn write_y4m(path: &Path, width: u32, height: u32, frames: u32, fps: u32, base_luma: u8) {
    let luma_size = (width * height) as usize;
    let chroma_size = (width.div_ceil(2) * height.div_ceil(2)) as usize;

    let mut bytes = format!("YUV4MPEG2 W{width} H{height} F{fps}:1 Ip A1:1 C420jpeg\n").into_bytes();
    for index in 0..frames {
        bytes.extend_from_slice(b"FRAME\n");
        let luma = base_luma.wrapping_add(index as u8);
        bytes.extend(std::iter::repeat_n(luma, luma_size));
        bytes.extend(std::iter::repeat_n(128u8, chroma_size * 2));
    }
    fs::write(path, bytes).expect("Failed to write y4m fixture");
}

/// Write a mono 16-bit PCM WAV file of silence: a container with an audio
/// stream and no video.
pub fn write_wav(path: &Path, sample_rate: u32, samples: u32) {
    let data_len = samples * 2;
    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);
    fs::write(path, bytes).expect("Failed to write wav fixture");
}

/// Optional fixture produced by `tests/fixtures/generate_fixtures.sh`.
pub fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}
