//! Error handling integration tests.
//!
//! These tests verify that each checked failure point of opening an input
//! reports its own error.

mod common;

use std::path::Path;

use frameplay::{PlaybackError, Player, PlayerOptions, VideoSource};

#[test]
fn open_nonexistent_file() {
    let result = VideoSource::open("this_file_does_not_exist.mp4");
    let error = result.expect_err("Opening a missing file should fail");
    assert!(matches!(error, PlaybackError::FileOpen { .. }), "{error:?}");

    let error_message = error.to_string();
    assert!(
        error_message.contains("Couldn't open input file"),
        "Error message should mention the open failure: {error_message}",
    );
    assert!(error_message.contains("this_file_does_not_exist.mp4"));
}

#[test]
fn audio_only_file_has_no_video_stream() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("silence.wav");
    common::write_wav(&path, 8_000, 8_000);

    let error = VideoSource::open(&path).expect_err("A WAV file has no video");
    assert!(matches!(error, PlaybackError::NoVideoStream { .. }), "{error:?}");
    assert!(
        error.to_string().contains("Didn't find a video stream"),
        "Error should mention the missing video stream: {error}",
    );
}

#[test]
fn audio_only_fixture_has_no_video_stream() {
    let path = "tests/fixtures/sample_audio_only.m4a";
    if !Path::new(path).exists() {
        return;
    }

    let error = VideoSource::open(path).expect_err("Audio-only file has no video");
    assert!(matches!(error, PlaybackError::NoVideoStream { .. }), "{error:?}");
}

#[test]
fn options_are_checked_before_opening() {
    let options = PlayerOptions::new("this_file_does_not_exist.mp4").with_frame_rate(0.0);
    let error = Player::open(options).err().expect("Invalid options should fail");
    assert!(matches!(error, PlaybackError::InvalidOption(_)), "{error:?}");
}

#[test]
fn player_reports_open_failure() {
    let error = Player::open(PlayerOptions::new("this_file_does_not_exist.mp4"))
        .err()
        .expect("Opening a missing file should fail");
    assert!(matches!(error, PlaybackError::FileOpen { .. }), "{error:?}");
}

#[test]
fn library_errors_convert_to_playback_errors() {
    let ffmpeg = PlaybackError::from(ffmpeg_next::Error::InvalidData);
    assert!(matches!(ffmpeg, PlaybackError::FfmpegError(_)));
    assert!(ffmpeg.to_string().starts_with("FFmpeg error: "));

    let display = PlaybackError::from(eframe::Error::AppCreation("no window".into()));
    assert!(matches!(display, PlaybackError::DisplayError(_)));
    assert!(display.to_string().contains("no window"));
}
