//! The playback window.
//!
//! [`play`] opens a single native window through `eframe` and drives the
//! [`Player`] from the window's repaint callback: every repaint checks for
//! Escape, asks the [`FramePacer`] whether the next frame is due, and if so
//! decodes, converts and uploads it as a texture. The window closes itself
//! at end of stream.

use std::{cell::RefCell, rc::Rc, time::Instant};

use eframe::egui;
use image::DynamicImage;

use crate::{
    error::PlaybackError,
    pacing::FramePacer,
    player::{PlaybackSummary, Player, StopReason},
};

/// What a repaint should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Stop playback and close the window.
    Stop,
    /// Show the next frame.
    Advance,
    /// Keep the current frame and repaint later.
    Wait,
}

/// Decide a repaint's action. Escape wins over a due frame.
pub fn next_action(escape_pressed: bool, frame_due: bool) -> TickAction {
    if escape_pressed {
        TickAction::Stop
    } else if frame_due {
        TickAction::Advance
    } else {
        TickAction::Wait
    }
}

/// Whether Escape was pressed since the previous repaint.
pub fn escape_pressed(ctx: &egui::Context) -> bool {
    ctx.input(|input| input.key_pressed(egui::Key::Escape))
}

/// Largest size with `image`'s aspect ratio that fits inside `available`.
pub fn fit_within(image: egui::Vec2, available: egui::Vec2) -> egui::Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 || available.x <= 0.0 || available.y <= 0.0 {
        return egui::Vec2::ZERO;
    }
    let scale = (available.x / image.x).min(available.y / image.y);
    image * scale
}

/// Convert a frame to the texture layout `egui` uploads.
pub fn to_color_image(image: &DynamicImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    match image {
        DynamicImage::ImageRgb8(rgb) => egui::ColorImage::from_rgb(size, rgb.as_raw()),
        DynamicImage::ImageRgba8(rgba) => {
            egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
        }
        DynamicImage::ImageLuma8(gray) => egui::ColorImage::from_gray(size, gray.as_raw()),
        other => egui::ColorImage::from_rgba_unmultiplied(size, other.to_rgba8().as_raw()),
    }
}

/// State shared between the window and [`play`] once the event loop returns.
struct Outcome {
    summary: PlaybackSummary,
    error: Option<PlaybackError>,
}

/// `eframe` application showing one video.
pub struct PlayerWindow {
    player: Player,
    pacer: FramePacer,
    texture: Option<egui::TextureHandle>,
    outcome: Rc<RefCell<Outcome>>,
    stopped: bool,
}

impl PlayerWindow {
    fn new(player: Player, outcome: Rc<RefCell<Outcome>>) -> Self {
        let pacer = player.pacer();
        log::debug!("Pacing playback at {:?} per frame", pacer.delay());
        Self {
            player,
            pacer,
            texture: None,
            outcome,
            stopped: false,
        }
    }

    fn stop(&mut self, ctx: &egui::Context, reason: StopReason) {
        log::debug!("Stopping playback: {reason:?}");
        self.stopped = true;
        self.outcome.borrow_mut().summary = self.player.summary(reason);
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn advance(&mut self, ctx: &egui::Context, now: Instant) {
        match self.player.next_image() {
            Ok(Some(image)) => {
                let color_image = to_color_image(&image);
                match &mut self.texture {
                    Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
                    None => {
                        self.texture = Some(ctx.load_texture(
                            "video-frame",
                            color_image,
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                }
                self.pacer.frame_shown(now);
                self.outcome.borrow_mut().summary = self.player.summary(StopReason::WindowClosed);
            }
            Ok(None) => self.stop(ctx, StopReason::EndOfStream),
            Err(error) => {
                log::debug!("Playback failed: {error}");
                self.outcome.borrow_mut().error = Some(error);
                self.stop(ctx, StopReason::EndOfStream);
            }
        }
    }

    fn draw(&self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let Some(texture) = &self.texture else {
                    return;
                };
                let size = fit_within(texture.size_vec2(), ui.available_size());
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Image::from_texture(egui::load::SizedTexture::new(
                        texture.id(),
                        size,
                    )));
                });
            });
    }
}

impl eframe::App for PlayerWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.stopped {
            let now = Instant::now();
            match next_action(escape_pressed(ctx), self.pacer.is_due(now)) {
                TickAction::Stop => self.stop(ctx, StopReason::Interrupted),
                TickAction::Advance => self.advance(ctx, now),
                TickAction::Wait => {}
            }
        }

        self.draw(ctx);

        if !self.stopped {
            ctx.request_repaint_after(self.pacer.remaining(Instant::now()));
        }
    }
}

/// Play `player` in a window until end of stream, Escape, or window close.
///
/// # Errors
///
/// Returns [`PlaybackError::DisplayError`] if the window cannot be created,
/// or the pipeline error that ended playback.
pub fn play(player: Player) -> Result<PlaybackSummary, PlaybackError> {
    let title = player.options().resolved_title();
    let (width, height) = player.output_dimensions();

    let outcome = Rc::new(RefCell::new(Outcome {
        summary: player.summary(StopReason::WindowClosed),
        error: None,
    }));

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([width.max(1) as f32, height.max(1) as f32])
        .with_title(title.clone());
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    log::debug!("Opening window \"{title}\" at {width}x{height}");
    let window_outcome = Rc::clone(&outcome);
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(PlayerWindow::new(player, window_outcome)))),
    )?;

    let mut outcome = outcome.borrow_mut();
    match outcome.error.take() {
        Some(error) => Err(error),
        None => Ok(outcome.summary),
    }
}
