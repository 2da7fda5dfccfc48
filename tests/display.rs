//! Window-side logic that runs without opening a window.

use eframe::egui;
use frameplay::display::{TickAction, escape_pressed, fit_within, next_action, to_color_image};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};

fn key_event(key: egui::Key) -> egui::Event {
    egui::Event::Key {
        key,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers: egui::Modifiers::NONE,
    }
}

fn run_with_events(events: Vec<egui::Event>) -> bool {
    let ctx = egui::Context::default();
    let input = egui::RawInput {
        events,
        ..Default::default()
    };
    let mut pressed = false;
    let _ = ctx.run(input, |ctx| pressed = escape_pressed(ctx));
    pressed
}

// ── stopping ───────────────────────────────────────────────────────

#[test]
fn escape_key_is_detected() {
    assert!(run_with_events(vec![key_event(egui::Key::Escape)]));
}

#[test]
fn other_keys_do_not_stop() {
    assert!(!run_with_events(vec![key_event(egui::Key::Space)]));
    assert!(!run_with_events(Vec::new()));
}

#[test]
fn escape_stops_before_end_of_stream() {
    assert_eq!(next_action(true, true), TickAction::Stop);
    assert_eq!(next_action(true, false), TickAction::Stop);
    assert_eq!(next_action(false, true), TickAction::Advance);
    assert_eq!(next_action(false, false), TickAction::Wait);
}

// ── layout ─────────────────────────────────────────────────────────

#[test]
fn fit_preserves_aspect_ratio() {
    let wide = fit_within(egui::vec2(1920.0, 1080.0), egui::vec2(960.0, 960.0));
    assert_eq!(wide, egui::vec2(960.0, 540.0));

    let tall = fit_within(egui::vec2(100.0, 200.0), egui::vec2(400.0, 100.0));
    assert_eq!(tall, egui::vec2(50.0, 100.0));

    let upscale = fit_within(egui::vec2(320.0, 240.0), egui::vec2(640.0, 480.0));
    assert_eq!(upscale, egui::vec2(640.0, 480.0));
}

#[test]
fn fit_handles_empty_sizes() {
    assert_eq!(fit_within(egui::Vec2::ZERO, egui::vec2(10.0, 10.0)), egui::Vec2::ZERO);
    assert_eq!(fit_within(egui::vec2(10.0, 10.0), egui::Vec2::ZERO), egui::Vec2::ZERO);
}

// ── textures ───────────────────────────────────────────────────────

#[test]
fn rgb_frames_become_opaque_textures() {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 2, Rgb([10, 20, 30])));
    let color_image = to_color_image(&image);
    assert_eq!(color_image.size, [4, 2]);
    assert_eq!(color_image.pixels.len(), 8);
    assert!(
        color_image
            .pixels
            .iter()
            .all(|pixel| *pixel == egui::Color32::from_rgb(10, 20, 30))
    );
}

#[test]
fn gray_frames_keep_their_size() {
    let image = DynamicImage::ImageLuma8(GrayImage::new(3, 5));
    let color_image = to_color_image(&image);
    assert_eq!(color_image.size, [3, 5]);
    assert_eq!(color_image.pixels[0], egui::Color32::from_gray(0));
}
