use std::path::PathBuf;

use clap::Parser;
use renderer::{DitherKind, Shape};

#[derive(Parser, Debug)]
#[command(
    name = "dithershade",
    author,
    version,
    about = "Real-time procedural dithering shader renderer",
    arg_required_else_help = false
)]
pub struct Args {
    /// Preset TOML file providing base parameter values.
    #[arg(long, value_name = "PATH")]
    pub preset: Option<PathBuf>,

    /// Procedural field: `simplex`, `warp`, `dots`, `wave`, `ripple`, `swirl`, or `sphere`.
    #[arg(long, value_name = "SHAPE", value_parser = parse_shape)]
    pub shape: Option<Shape>,

    /// Dithering kernel: `random`, `2x2`, `4x4`, or `8x8`.
    #[arg(long, value_name = "KERNEL", value_parser = parse_dither)]
    pub dither: Option<DitherKind>,

    /// Background color (`#RRGGBB[AA]` or `rgb()`/`rgba()` notation).
    #[arg(long, value_name = "COLOR")]
    pub background: Option<String>,

    /// Foreground color (`#RRGGBB[AA]` or `rgb()`/`rgba()` notation).
    #[arg(long, value_name = "COLOR")]
    pub foreground: Option<String>,

    /// Quantization granularity in device pixels.
    #[arg(long, value_name = "PIXELS")]
    pub pixel_size: Option<f32>,

    /// Animation speed multiplier (0 freezes the pattern).
    #[arg(long, value_name = "FACTOR")]
    pub speed: Option<f32>,

    /// Render the smoothed field directly instead of dithering it.
    #[arg(long)]
    pub only_shape: bool,

    /// Show the false-color diagnostic view.
    #[arg(long)]
    pub debug_heatmap: bool,

    /// Sphere pulse intensity in `[0, 1]`.
    #[arg(long, value_name = "AMOUNT")]
    pub pulse: Option<f32>,

    /// Explicit surface size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Ignore the display's pixel density when sizing the backing store.
    #[arg(long)]
    pub no_hidpi: bool,

    /// Keep animating while the window is occluded.
    #[arg(long)]
    pub no_pause_hidden: bool,

    /// Optional FPS cap for the animation loop.
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Present a single frame evaluated at the given timestamp (seconds).
    #[arg(long, value_name = "SECONDS", conflicts_with = "export")]
    pub still: Option<f32>,

    /// Write one frame to the given path as PNG, then exit.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Timestamp for `--export` (seconds).
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub time: f32,
}

pub fn parse() -> Args {
    Args::parse()
}

fn parse_shape(value: &str) -> Result<Shape, String> {
    value.parse()
}

fn parse_dither(value: &str) -> Result<DitherKind, String> {
    value.parse()
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{width}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{height}'"))?;
    if width == 0 || height == 0 {
        return Err("surface dimensions must be non-zero".to_string());
    }
    Ok((width, height))
}
