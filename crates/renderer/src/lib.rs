//! Real-time procedural dithering renderer.
//!
//! The crate glues a `winit` window, a `wgpu` pipeline, and a small library
//! of procedural scalar fields together. The overall flow is:
//!
//! ```text
//!   CLI / dithershade
//!          │ RenderConfig + RenderPolicy
//!          ▼
//!   Renderer::run ──▶ window event loop ──▶ GpuState::render()
//!          │                                      │
//!          │                                      └─▶ DitherUniforms ─▶ GPU UBO
//!          └─▶ software::export_png (headless PNG path)
//! ```
//!
//! Every frame evaluates one of seven procedural fields, quantizes it onto a
//! pixel grid, and binarizes it through an ordered-dithering kernel; the
//! two-tone result is composited from configurable foreground and background
//! colors. The same math exists twice: as GLSL in [`shader`] for the GPU
//! path and as plain Rust in [`field`]/[`dither`]/[`software`] for headless
//! export and testing.

mod color;
mod config;
mod dither;
mod field;
mod gpu;
mod runtime;
mod shader;
mod software;
mod window;

pub use color::Rgba;
pub use config::{RenderConfig, RenderPolicy};
pub use dither::{binarize, DitherKind};
pub use field::{pixelize, PixelCoords, Shape};
pub use runtime::{AnimationClock, FrameScheduler};
pub use software::{export_png, render_frame, shade_pixel, ShadedPixel};
pub use window::run_windowed;

use anyhow::Result;

/// Surface size used when the config does not pin one.
const DEFAULT_EXPORT_SIZE: (u32, u32) = (800, 800);

/// Thin entry point dispatching between the windowed and headless paths.
pub struct Renderer {
    config: RenderConfig,
    policy: RenderPolicy,
}

impl Renderer {
    pub fn new(config: RenderConfig, policy: RenderPolicy) -> Self {
        Self { config, policy }
    }

    /// Runs until the window closes, or returns after writing the export.
    pub fn run(self) -> Result<()> {
        match self.policy {
            RenderPolicy::Export { time, ref path } => {
                let (width, height) = self.config.size.unwrap_or(DEFAULT_EXPORT_SIZE);
                software::export_png(&self.config, width, height, time, path)
            }
            policy => window::run_windowed(self.config, policy),
        }
    }
}
