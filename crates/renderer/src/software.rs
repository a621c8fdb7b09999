//! CPU rasterizer.
//!
//! Evaluates the same math as the fragment shader in `shader.rs`, one
//! pixel at a time, and backs the PNG export path plus the scenario tests
//! that pin the visual contract without a GPU. Rows iterate top-down the
//! way `image` stores them; the fragment coordinate is flipped to the
//! bottom-left origin the field math expects, matching the GPU stage.

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;
use tracing::info;

use crate::config::RenderConfig;
use crate::dither;
use crate::field::pixelize;

/// Computed color and coverage for one fragment, pre-composite encoding.
///
/// `color` carries the alpha-weighted contributions exactly as the shader
/// writes them, so an opaque background yields the final on-screen color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadedPixel {
    pub color: [f32; 3],
    pub opacity: f32,
}

/// Evaluates one fragment at a bottom-left-origin pixel coordinate.
pub fn shade_pixel(
    config: &RenderConfig,
    resolution: [f32; 2],
    frag: [f32; 2],
    time: f32,
) -> ShadedPixel {
    let t = 0.5 * time;
    // Same floor the GPU path applies before upload; a sub-pixel block size
    // would divide the quantization grid by zero.
    let pixel_size = config.pixel_size.max(1.0);
    let coords = pixelize(frag, resolution, pixel_size);
    let intensity = config
        .shape
        .intensity(coords.shape_uv, resolution, t, config.pulse);

    let res = if config.only_shape {
        intensity.clamp(0.0, 1.0)
    } else {
        let threshold = config.dither.threshold(&coords);
        dither::binarize(intensity, threshold)
    };

    if config.debug_heatmap {
        return ShadedPixel {
            color: [res, intensity, 0.5 + 0.5 * (res * 10.0).sin()],
            opacity: 1.0,
        };
    }

    let fg = config.foreground;
    let bg = config.background;
    let mut color = [fg.r * fg.a * res, fg.g * fg.a * res, fg.b * fg.a * res];
    let mut opacity = fg.a * res;

    if config.only_shape {
        opacity = res;
    } else {
        let remainder = 1.0 - opacity;
        color[0] += bg.r * bg.a * remainder;
        color[1] += bg.g * bg.a * remainder;
        color[2] += bg.b * bg.a * remainder;
        opacity += bg.a * remainder;
    }

    ShadedPixel { color, opacity }
}

/// Rasterizes a full frame at the given animation timestamp.
pub fn render_frame(config: &RenderConfig, width: u32, height: u32, time: f32) -> RgbaImage {
    let resolution = [width as f32, height as f32];
    RgbaImage::from_fn(width, height, |x, y| {
        // Flip to the bottom-left origin used by the shader math.
        let frag = [x as f32 + 0.5, height as f32 - y as f32 - 0.5];
        let shaded = shade_pixel(config, resolution, frag, time);
        let encode = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        image::Rgba([
            encode(shaded.color[0]),
            encode(shaded.color[1]),
            encode(shaded.color[2]),
            encode(shaded.opacity),
        ])
    })
}

/// Rasterizes one frame and writes it to `path` as PNG.
pub fn export_png(
    config: &RenderConfig,
    width: u32,
    height: u32,
    time: f32,
    path: &Path,
) -> Result<()> {
    let frame = render_frame(config, width, height, time);
    frame
        .save(path)
        .with_context(|| format!("writing {}x{} PNG to {}", width, height, path.display()))?;
    info!(
        path = %path.display(),
        width,
        height,
        time,
        "exported frame"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::dither::DitherKind;
    use crate::field::Shape;

    fn base_config() -> RenderConfig {
        RenderConfig {
            background: Rgba::parse("#000000"),
            foreground: Rgba::parse("#ffffff"),
            shape: Shape::Simplex,
            dither: DitherKind::Bayer4,
            pixel_size: 1.0,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn frozen_frame_is_bit_stable_across_renders() {
        let config = base_config();
        let first = render_frame(&config, 4, 4, 2.5);
        let second = render_frame(&config, 4, 4, 2.5);
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn dithered_output_is_two_tone() {
        let config = base_config();
        let frame = render_frame(&config, 32, 32, 1.0);
        let fg = config.foreground.to_bytes();
        let bg = config.background.to_bytes();
        for pixel in frame.pixels() {
            assert!(
                pixel.0 == fg || pixel.0 == bg,
                "pixel {:?} is neither foreground nor background",
                pixel.0
            );
        }
    }

    #[test]
    fn only_shape_skips_binarization() {
        let config = RenderConfig {
            only_shape: true,
            shape: Shape::Ripple,
            ..base_config()
        };
        let resolution = [64.0, 64.0];
        let mut continuous = 0usize;
        for x in 0..64 {
            let frag = [x as f32 + 0.5, 13.5];
            let shaded = shade_pixel(&config, resolution, frag, 0.7);
            // Alpha carries the raw field value directly.
            let intensity =
                config
                    .shape
                    .intensity_at_pixel(frag, resolution, config.pixel_size, 0.35, 0.0);
            assert!((shaded.opacity - intensity.clamp(0.0, 1.0)).abs() < 1e-6);
            if shaded.opacity > 0.0 && shaded.opacity < 1.0 {
                continuous += 1;
            }
        }
        assert!(continuous > 0, "ripple row never left the binary extremes");
    }

    #[test]
    fn heatmap_is_fully_opaque_and_encodes_the_field() {
        let config = RenderConfig {
            debug_heatmap: true,
            ..base_config()
        };
        let frame = render_frame(&config, 16, 16, 3.0);
        for pixel in frame.pixels() {
            assert_eq!(pixel.0[3], 255);
            // Binarized coverage lands in the red channel.
            assert!(pixel.0[0] == 0 || pixel.0[0] == 255);
        }
    }

    #[test]
    fn translucent_foreground_composites_over_the_background() {
        let config = RenderConfig {
            foreground: Rgba::parse("#ff000080"),
            background: Rgba::parse("#0000ff"),
            shape: Shape::Wave,
            ..base_config()
        };
        // Bottom row of the wave field saturates to full coverage at any
        // timestamp, so the binarized result is 1 regardless of threshold.
        let resolution = [16.0, 16.0];
        let covered = shade_pixel(&config, resolution, [0.5, 0.5], 1.0);
        let alpha = 128.0 / 255.0;
        // Half-opaque red over opaque blue.
        assert!((covered.color[0] - alpha).abs() < 1e-6);
        assert_eq!(covered.color[1], 0.0);
        assert!((covered.color[2] - (1.0 - alpha)).abs() < 1e-6);
        assert!((covered.opacity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sub_pixel_block_sizes_are_floored_to_one() {
        let degenerate = RenderConfig {
            pixel_size: 0.0,
            ..base_config()
        };
        let floored = RenderConfig {
            pixel_size: 1.0,
            ..base_config()
        };
        let resolution = [16.0, 16.0];
        for x in 0..16 {
            let frag = [x as f32 + 0.5, 7.5];
            let shaded = shade_pixel(&degenerate, resolution, frag, 1.0);
            assert!(
                shaded.color.iter().all(|c| c.is_finite()) && shaded.opacity.is_finite(),
                "pixel_size 0 produced a non-finite fragment at {frag:?}"
            );
            assert_eq!(shaded, shade_pixel(&floored, resolution, frag, 1.0));
        }
    }

    #[test]
    fn export_writes_a_readable_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("frame.png");
        let config = base_config();
        export_png(&config, 8, 8, 0.0, &path).expect("export");
        let loaded = image::open(&path).expect("reopen").to_rgba8();
        assert_eq!(loaded.dimensions(), (8, 8));
        assert_eq!(loaded.as_raw(), render_frame(&config, 8, 8, 0.0).as_raw());
    }
}
