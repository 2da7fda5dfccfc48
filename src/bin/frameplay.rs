use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use frameplay::{
    DEFAULT_INPUT, FfmpegLogLevel, FrameOutputOptions, PixelFormat, PlaybackSummary, Player,
    PlayerOptions, VideoSource, VideoStreamInfo,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  frameplay\n  frameplay clip.mkv --title Preview --fps 12\n  frameplay clip.mkv --width 640 --pixel-format gray8\n  frameplay clip.mkv --headless --progress\n  frameplay clip.mkv --probe --json\n\nPress Escape in the window to stop playback.";

#[derive(Debug, Parser)]
#[command(
    name = "frameplay",
    version,
    about = "Decode the first video stream of a media file and play it in a window",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input media path.
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Window title (defaults to the input file name).
    #[arg(long)]
    title: Option<String>,

    /// Playback rate in frames per second (defaults to the stream's rate).
    #[arg(long)]
    fps: Option<f64>,

    /// Output width; the height follows the aspect ratio unless given.
    #[arg(long)]
    width: Option<u32>,

    /// Output height; the width follows the aspect ratio unless given.
    #[arg(long)]
    height: Option<u32>,

    /// Displayed pixel format (rgb8, rgba8, gray8).
    #[arg(long, default_value = "rgb8")]
    pixel_format: String,

    /// FFmpeg log level (quiet, fatal, error, warning, info, verbose, debug).
    #[arg(long)]
    log_level: Option<String>,

    /// Decode every frame without opening a window.
    #[arg(long)]
    headless: bool,

    /// Show a progress bar in headless mode.
    #[arg(long, requires = "headless")]
    progress: bool,

    /// Print video stream information and exit.
    #[arg(long)]
    probe: bool,

    /// Print probe output as JSON.
    #[arg(long, requires = "probe")]
    json: bool,

    /// Show debug logging.
    #[arg(long)]
    verbose: bool,
}

fn player_options(cli: &Cli) -> Result<PlayerOptions, Box<dyn std::error::Error>> {
    let pixel_format: PixelFormat = cli.pixel_format.parse()?;
    let mut output = FrameOutputOptions::default().with_pixel_format(pixel_format);
    if let Some(width) = cli.width {
        output = output.with_width(width);
    }
    if let Some(height) = cli.height {
        output = output.with_height(height);
    }

    let mut options = PlayerOptions::new(&cli.input).with_output(output);
    if let Some(title) = &cli.title {
        options = options.with_window_title(title.clone());
    }
    if let Some(fps) = cli.fps {
        options = options.with_frame_rate(fps);
    }
    if let Some(level) = &cli.log_level {
        let level: FfmpegLogLevel = level.parse()?;
        options = options.with_ffmpeg_log_level(level);
    }

    options.validate()?;
    Ok(options)
}

fn print_probe(info: &VideoStreamInfo, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if as_json {
        let payload = json!({
            "format": info.container_format,
            "stream_index": info.stream_index,
            "codec": info.codec_name,
            "codec_long_name": info.codec_long_name,
            "width": info.width,
            "height": info.height,
            "fps": info.frames_per_second,
            "frame_count": info.reported_frame_count,
            "duration_seconds": info.duration.as_secs_f64(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("Format: {}", info.container_format);
        println!("Codec: {} [{}]", info.codec_long_name, info.codec_name);
        println!(
            "Video: stream {} {}x{} @ {:.2} fps",
            info.stream_index, info.width, info.height, info.frames_per_second,
        );
        println!("Frames: {}", info.reported_frame_count);
        println!("Duration: {:?}", info.duration);
    }
    Ok(())
}

fn run_headless(player: Player, progress: bool) -> Result<PlaybackSummary, Box<dyn std::error::Error>> {
    let total = player.info().reported_frame_count;
    let bar = if progress && total > 0 {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} frames")?;
        bar.set_style(style.progress_chars("##-"));
        Some(bar)
    } else {
        None
    };

    let summary = player.run_to_end(|_, _| {
        if let Some(bar) = &bar {
            bar.inc(1);
        }
    })?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    println!(
        "Decoded {} frames ({} displayable)",
        summary.frames_decoded, summary.frames_displayed
    );
    Ok(summary)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let options = player_options(&cli)?;

    if cli.probe {
        frameplay::set_ffmpeg_log_level(options.ffmpeg_log_level);
        let source = VideoSource::open(&options.input)?;
        return print_probe(source.info(), cli.json);
    }

    let player = Player::open(options)?;
    println!("Codec: {}", player.info().codec_long_name);

    let summary = if cli.headless {
        run_headless(player, cli.progress)?
    } else {
        frameplay::display::play(player)?
    };

    log::info!(
        "Playback stopped ({:?}) after {} frames",
        summary.stop_reason,
        summary.frames_displayed
    );
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
