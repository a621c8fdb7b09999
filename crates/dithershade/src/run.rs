use anyhow::{Context, Result};
use renderer::{RenderConfig, RenderPolicy, Renderer, Rgba};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::preset;

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();

    let config = build_config(&args)?;
    let policy = build_policy(&args);
    tracing::debug!(?policy, "resolved render policy");

    Renderer::new(config, policy).run()
}

fn initialise_tracing() {
    let default_filter = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn,winit=warn";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Preset values form the base; explicit flags override them.
fn build_config(args: &Args) -> Result<RenderConfig> {
    let mut config = RenderConfig::default();

    if let Some(path) = args.preset.as_deref() {
        let preset = preset::load(path)
            .with_context(|| format!("loading preset {}", path.display()))?;
        preset::apply(&preset, &mut config);
    }

    if let Some(shape) = args.shape {
        config.shape = shape;
    }
    if let Some(dither) = args.dither {
        config.dither = dither;
    }
    if let Some(spec) = args.background.as_deref() {
        config.background = Rgba::parse(spec);
    }
    if let Some(spec) = args.foreground.as_deref() {
        config.foreground = Rgba::parse(spec);
    }
    if let Some(pixel_size) = args.pixel_size {
        config.pixel_size = pixel_size;
    }
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    if args.only_shape {
        config.only_shape = true;
    }
    if args.debug_heatmap {
        config.debug_heatmap = true;
    }
    if let Some(pulse) = args.pulse {
        config.pulse = pulse;
    }
    if let Some(size) = args.size {
        config.size = Some(size);
    }
    if args.no_hidpi {
        config.high_density = false;
    }
    if args.no_pause_hidden {
        config.pause_when_hidden = false;
    }

    Ok(config)
}

fn build_policy(args: &Args) -> RenderPolicy {
    if let Some(path) = args.export.clone() {
        RenderPolicy::Export {
            time: args.time,
            path,
        }
    } else if let Some(time) = args.still {
        RenderPolicy::Still { time }
    } else {
        RenderPolicy::Animate {
            target_fps: args.fps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use renderer::{DitherKind, Shape};

    fn args_from(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("dithershade").chain(argv.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn flags_override_preset_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preset.toml");
        std::fs::write(&path, "shape = \"ripple\"\nspeed = 0.25\npixel_size = 8.0\n")
            .expect("write");

        let preset_arg = path.to_str().expect("utf8 path");
        let args = args_from(&["--preset", preset_arg, "--shape", "sphere"]);
        let config = build_config(&args).expect("config");

        assert_eq!(config.shape, Shape::Sphere);
        assert_eq!(config.speed, 0.25);
        assert_eq!(config.pixel_size, 8.0);
    }

    #[test]
    fn defaults_survive_an_empty_invocation() {
        let config = build_config(&args_from(&[])).expect("config");
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn export_takes_priority_in_policy_selection() {
        let args = args_from(&["--export", "/tmp/out.png", "--time", "2.5", "--fps", "30"]);
        match build_policy(&args) {
            RenderPolicy::Export { time, path } => {
                assert_eq!(time, 2.5);
                assert_eq!(path, std::path::PathBuf::from("/tmp/out.png"));
            }
            other => panic!("expected export policy, got {other:?}"),
        }
    }

    #[test]
    fn still_and_animate_policies_carry_their_parameters() {
        assert_eq!(
            build_policy(&args_from(&["--still", "1.5"])),
            RenderPolicy::Still { time: 1.5 }
        );
        assert_eq!(
            build_policy(&args_from(&["--fps", "24"])),
            RenderPolicy::Animate {
                target_fps: Some(24.0)
            }
        );
        let args = args_from(&["--dither", "random"]);
        assert_eq!(args.dither, Some(DitherKind::Random));
    }
}
