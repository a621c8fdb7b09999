//! Renderer configuration.

use std::path::PathBuf;

use crate::color::Rgba;
use crate::dither::DitherKind;
use crate::field::Shape;

/// Mutable parameter block owned by the pipeline.
///
/// Every field may change at any point during the pipeline's life; values
/// are read once per frame and uploaded as uniforms, so no change ever
/// forces a program recompile. Defaults mirror the documented host
/// contract: 8×8 Bayer dithering over an animated simplex field.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Background color, composited under the pattern.
    pub background: Rgba,
    /// Foreground color, scaled by the binarized (or raw) coverage.
    pub foreground: Rgba,
    /// Scalar field rendered each frame.
    pub shape: Shape,
    /// Binarization kernel.
    pub dither: DitherKind,
    /// Spatial quantization granularity in device pixels; larger is chunkier.
    pub pixel_size: f32,
    /// Multiplier applied to elapsed time; `0` freezes the animation.
    pub speed: f32,
    /// Skip dithering and alpha-blend the smoothed field directly.
    pub only_shape: bool,
    /// Output a false-color diagnostic view instead of final colors.
    pub debug_heatmap: bool,
    /// Sinusoidal brightness modulation in `[0, 1]`; sphere shape only.
    pub pulse: f32,
    /// Explicit surface size in logical pixels; `None` tracks the window.
    pub size: Option<(u32, u32)>,
    /// Scale the backing store by the display's pixel density.
    pub high_density: bool,
    /// Stop the animation loop while the surface is not visible.
    pub pause_when_hidden: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Rgba::parse("#000000"),
            foreground: Rgba::parse("#723131ff"),
            shape: Shape::Simplex,
            dither: DitherKind::Bayer8,
            pixel_size: 4.0,
            speed: 1.0,
            only_shape: false,
            debug_heatmap: false,
            pulse: 0.0,
            size: None,
            high_density: true,
            pause_when_hidden: true,
        }
    }
}

/// How frames should be produced.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderPolicy {
    /// Run the animation loop continuously, optionally capping the frame rate.
    Animate {
        /// Requested frames-per-second cap; `None` renders on every vsync.
        target_fps: Option<f32>,
    },
    /// Present a single frame evaluated at a fixed timestamp.
    Still {
        /// Timestamp to evaluate the animation at (seconds).
        time: f32,
    },
    /// Rasterize one frame at a fixed timestamp and write it to disk as PNG.
    Export {
        /// Timestamp to evaluate the animation at (seconds).
        time: f32,
        /// Destination file path.
        path: PathBuf,
    },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}
