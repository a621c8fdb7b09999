use bytemuck::{Pod, Zeroable};

use crate::config::RenderConfig;

/// Uniform block uploaded once per frame.
///
/// Field order and padding must match the std140 `DitherParams` block in
/// `shader.rs`: a vec2 followed by two scalars packs into one 16-byte row,
/// the vec4 colors are naturally aligned, and the trailing scalars are
/// padded out to a 16-byte multiple.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct DitherUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub px_size: f32,
    pub color_back: [f32; 4],
    pub color_front: [f32; 4],
    pub shape: f32,
    pub dither_type: f32,
    pub only_shape: f32,
    pub debug: f32,
    pub pulse: f32,
    pub _padding: [f32; 3],
}

unsafe impl Zeroable for DitherUniforms {}
unsafe impl Pod for DitherUniforms {}

impl DitherUniforms {
    pub fn new(width: u32, height: u32, config: &RenderConfig) -> Self {
        let mut uniforms = Self {
            resolution: [width as f32, height as f32],
            time: 0.0,
            px_size: 1.0,
            color_back: [0.0; 4],
            color_front: [0.0; 4],
            shape: 1.0,
            dither_type: 1.0,
            only_shape: 0.0,
            debug: 0.0,
            pulse: 0.0,
            _padding: [0.0; 3],
        };
        uniforms.apply_config(config);
        uniforms
    }

    /// Pulls the current parameter values out of the config.
    pub fn apply_config(&mut self, config: &RenderConfig) {
        self.px_size = config.pixel_size.max(1.0);
        self.color_back = config.background.to_array();
        self.color_front = config.foreground.to_array();
        self.shape = config.shape.shader_index();
        self.dither_type = config.dither.shader_index();
        self.only_shape = if config.only_shape { 1.0 } else { 0.0 };
        self.debug = if config.debug_heatmap { 1.0 } else { 0.0 };
        self.pulse = config.pulse.clamp(0.0, 1.0);
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = [width, height];
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_size_matches_the_std140_layout() {
        // vec2 + 2 floats, 2 vec4s, 5 floats + 3 floats padding.
        assert_eq!(std::mem::size_of::<DitherUniforms>(), 80);
        assert_eq!(std::mem::size_of::<DitherUniforms>() % 16, 0);
    }

    #[test]
    fn config_values_land_in_the_block() {
        use crate::color::Rgba;
        use crate::dither::DitherKind;
        use crate::field::Shape;

        let config = RenderConfig {
            foreground: Rgba::parse("#ff0000"),
            shape: Shape::Sphere,
            dither: DitherKind::Random,
            pixel_size: 6.0,
            only_shape: true,
            pulse: 2.0,
            ..RenderConfig::default()
        };
        let uniforms = DitherUniforms::new(640, 480, &config);
        assert_eq!(uniforms.resolution, [640.0, 480.0]);
        assert_eq!(uniforms.shape, 7.0);
        assert_eq!(uniforms.dither_type, 1.0);
        assert_eq!(uniforms.px_size, 6.0);
        assert_eq!(uniforms.only_shape, 1.0);
        assert_eq!(uniforms.pulse, 1.0);
        assert_eq!(uniforms.color_front, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn sub_pixel_quantization_is_clamped() {
        let config = RenderConfig {
            pixel_size: 0.25,
            ..RenderConfig::default()
        };
        let uniforms = DitherUniforms::new(8, 8, &config);
        assert_eq!(uniforms.px_size, 1.0);
    }
}
