//! End-to-end tests of the `frameplay` binary.
//!
//! Only paths that never open a window are exercised here.

mod common;

use std::process::{Command, Output};

fn frameplay(arguments: &[&str], working_directory: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_frameplay"))
        .args(arguments)
        .current_dir(working_directory)
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run frameplay")
}

#[test]
fn missing_input_exits_with_status_one() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = frameplay(&["nowhere.mp4"], directory.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Couldn't open input file"), "stderr: {stderr}");
}

#[test]
fn default_input_is_video_mp4() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = frameplay(&[], directory.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Couldn't open input file video.mp4"), "stderr: {stderr}");
}

#[test]
fn audio_only_input_exits_with_status_one() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    common::write_wav(&directory.path().join("tone.wav"), 8_000, 4_000);
    let output = frameplay(&["tone.wav"], directory.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Didn't find a video stream"), "stderr: {stderr}");
}

#[test]
fn invalid_option_exits_with_status_one() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = frameplay(&["--pixel-format", "cmyk"], directory.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported pixel format"), "stderr: {stderr}");
}

#[test]
fn headless_run_prints_codec_and_frame_count() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    common::write_y4m(&directory.path().join("clip.y4m"), 16, 16, 9, 25, 50);
    let output = frameplay(&["clip.y4m", "--headless"], directory.path());

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Codec: "), "stdout: {stdout}");
    assert!(stdout.contains("Decoded 9 frames"), "stdout: {stdout}");
}

#[test]
fn probe_prints_json() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    common::write_y4m(&directory.path().join("clip.y4m"), 48, 32, 2, 30, 50);
    let output = frameplay(&["clip.y4m", "--probe", "--json"], directory.path());

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Probe output should be JSON");
    assert_eq!(payload["width"], 48);
    assert_eq!(payload["height"], 32);
    assert_eq!(payload["codec"], "rawvideo");
    assert_eq!(payload["stream_index"], 0);
}

#[test]
fn json_requires_probe() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = frameplay(&["clip.y4m", "--json"], directory.path());

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--probe"), "stderr: {stderr}");
}

#[test]
fn progress_requires_headless() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = frameplay(&["clip.y4m", "--progress"], directory.path());

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--headless"), "stderr: {stderr}");
}

#[test]
fn failure_is_reported_once() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = frameplay(&["nowhere.mp4"], directory.path());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Couldn't open input file").count(), 1, "stderr: {stderr}");
}
