//! GLSL sources and shader module compilation.
//!
//! Both stages are static GLSL 450 strings handed to `wgpu`'s naga GLSL
//! frontend. The fragment stage is the whole visual algorithm: pixelize,
//! evaluate the selected field, threshold it through the selected dither
//! kernel, then composite foreground over background. The CPU rasterizer
//! in `software.rs` mirrors this source expression by expression; changes
//! here must land there too.

use std::borrow::Cow;

use anyhow::Result;
use wgpu::naga::ShaderStage;

/// Compiles the static full-screen quad vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen quad vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Compiles the dithering fragment shader.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("dithering fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FRAGMENT_SHADER),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

/// Number of vertices the pipeline draws per frame.
pub(crate) const QUAD_VERTEX_COUNT: u32 = 6;

/// Full-screen quad as two clip-space triangles, no vertex buffer.
pub(crate) const VERTEX_SHADER: &str = r"#version 450
const vec2 positions[6] = vec2[6](
    vec2(-1.0, -1.0),
    vec2(1.0, -1.0),
    vec2(-1.0, 1.0),
    vec2(-1.0, 1.0),
    vec2(1.0, -1.0),
    vec2(1.0, 1.0)
);

void main() {
    gl_Position = vec4(positions[gl_VertexIndex], 0.0, 1.0);
}
";

/// The uniform block layout must match [`DitherUniforms`] in `gpu/uniforms.rs`.
pub(crate) const FRAGMENT_SHADER: &str = r"#version 450
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform DitherParams {
    vec2 u_resolution;
    float u_time;
    float u_pxSize;
    vec4 u_colorBack;
    vec4 u_colorFront;
    float u_shape;
    float u_type;
    float u_onlyShape;
    float u_debug;
    float u_pulse;
    float _pad0;
    float _pad1;
    float _pad2;
};

#define TWO_PI 6.28318530718
#define PI 3.14159265358979323846

float hash11(float p) {
    p = fract(p * 0.3183099) + 0.1;
    p *= p + 19.19;
    return fract(p * p);
}

float hash21(vec2 p) {
    p = fract(p * vec2(0.3183099, 0.3678794)) + 0.1;
    p += dot(p, p + 19.19);
    return fract(p.x * p.y);
}

vec3 permute(vec3 x) { return mod(((x * 34.0) + 1.0) * x, 289.0); }

float snoise(vec2 v) {
    const vec4 C = vec4(0.211324865405187, 0.366025403784439,
        -0.577350269189626, 0.024390243902439);
    vec2 i = floor(v + dot(v, C.yy));
    vec2 x0 = v - i + dot(i, C.xx);
    vec2 i1;
    i1 = (x0.x > x0.y) ? vec2(1.0, 0.0) : vec2(0.0, 1.0);
    vec4 x12 = x0.xyxy + C.xxzz;
    x12.xy -= i1;
    i = mod(i, 289.0);
    vec3 p = permute(permute(i.y + vec3(0.0, i1.y, 1.0))
        + i.x + vec3(0.0, i1.x, 1.0));
    vec3 m = max(0.5 - vec3(dot(x0, x0), dot(x12.xy, x12.xy),
        dot(x12.zw, x12.zw)), 0.0);
    m = m * m;
    m = m * m;
    vec3 x = 2.0 * fract(p * C.www) - 1.0;
    vec3 h = abs(x) - 0.5;
    vec3 ox = floor(x + 0.5);
    vec3 a0 = x - ox;
    m *= 1.79284291400159 - 0.85373472095314 * (a0 * a0 + h * h);
    vec3 g;
    g.x = a0.x * x0.x + h.x * x0.y;
    g.yz = a0.yz * x12.xz + h.yz * x12.yw;
    return 130.0 * dot(m, g);
}

float layeredSimplex(vec2 uv, float t) {
    float noise = 0.5 * snoise(uv - vec2(0.0, 0.3 * t));
    noise += 0.5 * snoise(2.0 * uv + vec2(0.0, 0.32 * t));
    return noise;
}

const int bayer2x2[4] = int[4](0, 2, 3, 1);
const int bayer4x4[16] = int[16](
    0, 8, 2, 10,
    12, 4, 14, 6,
    3, 11, 1, 9,
    15, 7, 13, 5
);
const int bayer8x8[64] = int[64](
    0, 32, 8, 40, 2, 34, 10, 42,
    48, 16, 56, 24, 50, 18, 58, 26,
    12, 44, 4, 36, 14, 46, 6, 38,
    60, 28, 52, 20, 62, 30, 54, 22,
    3, 35, 11, 43, 1, 33, 9, 41,
    51, 19, 59, 27, 49, 17, 57, 25,
    15, 47, 7, 39, 13, 45, 5, 37,
    63, 31, 55, 23, 61, 29, 53, 21
);

float bayerThreshold(vec2 uv, int size) {
    ivec2 pos = ivec2(mod(uv, float(size)));
    int index = pos.y * size + pos.x;
    if (size == 2) {
        return float(bayer2x2[index]) / 4.0;
    } else if (size == 4) {
        return float(bayer4x4[index]) / 16.0;
    }
    return float(bayer8x8[index]) / 64.0;
}

void main() {
    float t = 0.5 * u_time;

    // Match the bottom-left fragment origin the field math was written for.
    vec2 fragCoord = vec2(gl_FragCoord.x, u_resolution.y - gl_FragCoord.y);
    vec2 uv = fragCoord / u_resolution - 0.5;

    // Quantize onto a pxSize grid centered on the surface.
    vec2 pxSizeUv = (fragCoord - 0.5 * u_resolution) / u_pxSize;
    vec2 shape_uv = floor(pxSizeUv) * u_pxSize / u_resolution;
    vec2 dithering_uv = pxSizeUv;
    vec2 ditheringNoise_uv = uv * u_resolution;

    float shape = 0.0;
    if (u_shape < 1.5) {
        // Simplex noise
        vec2 p = shape_uv * 0.001;
        shape = 0.5 + 0.5 * layeredSimplex(p, t);
        shape = smoothstep(0.3, 0.9, shape);

    } else if (u_shape < 2.5) {
        // Warp
        vec2 p = shape_uv * 0.003;
        for (float i = 1.0; i < 6.0; i++) {
            p.x += 0.6 / i * cos(i * 2.5 * p.y + t);
            p.y += 0.6 / i * cos(i * 1.5 * p.x + t);
        }
        shape = 0.15 / abs(sin(t - p.y - p.x));
        shape = smoothstep(0.02, 1.0, shape);

    } else if (u_shape < 3.5) {
        // Dots
        vec2 p = shape_uv * 0.05;
        float stripeIdx = floor(2.0 * p.x / TWO_PI);
        float rand = hash11(stripeIdx * 10.0);
        rand = sign(rand - 0.5) * pow(0.1 + abs(rand), 0.4);
        shape = sin(p.x) * cos(p.y - 5.0 * rand * t);
        shape = pow(abs(shape), 6.0);

    } else if (u_shape < 4.5) {
        // Sine wave
        vec2 p = shape_uv * 4.0;
        float wave = cos(0.5 * p.x - 2.0 * t) * sin(1.5 * p.x + t) * (0.75 + 0.25 * cos(3.0 * t));
        shape = 1.0 - smoothstep(-1.0, 1.0, p.y + wave);

    } else if (u_shape < 5.5) {
        // Ripple
        float dist = length(shape_uv);
        shape = sin(pow(dist, 1.7) * 7.0 - 3.0 * t) * 0.5 + 0.5;

    } else if (u_shape < 6.5) {
        // Swirl
        float l = length(shape_uv);
        float angle = 6.0 * atan(shape_uv.y, shape_uv.x) + 4.0 * t;
        float twist = 1.2;
        float offset = pow(l, -twist) + angle / TWO_PI;
        float mid = smoothstep(0.0, 1.0, pow(l, twist));
        shape = mix(0.0, fract(offset), mid);

    } else {
        // Sphere, aspect-corrected so it never renders as an ellipse.
        vec2 aspectUv = shape_uv;
        aspectUv.x *= u_resolution.x / u_resolution.y;
        aspectUv *= 2.0;

        float d = 1.0 - dot(aspectUv, aspectUv);
        float inside = step(0.0, d);
        vec3 pos = vec3(aspectUv, sqrt(max(d, 0.0)));

        vec3 lightPos = normalize(vec3(cos(1.5 * t), 0.8, sin(1.25 * t)));
        float ndl = clamp(dot(lightPos, pos), -1.0, 1.0);
        float lighting = pow(0.5 + 0.5 * ndl, 1.15);
        float rim = smoothstep(0.0, 0.22, d) * 0.55;

        float sphereVal = (lighting + rim) * inside;
        if (u_pulse > 0.001) {
            float puls = 0.5 + 0.5 * sin(t * 1.2);
            sphereVal *= mix(1.0, 0.85 + 0.3 * puls, clamp(u_pulse, 0.0, 1.0));
        }
        shape = smoothstep(0.05, 0.95, sphereVal);
    }

    int type = int(floor(u_type));
    float threshold = 0.5;
    if (type == 1) {
        threshold = hash21(ditheringNoise_uv);
    } else if (type == 2) {
        threshold = bayerThreshold(dithering_uv, 2);
    } else if (type == 3) {
        threshold = bayerThreshold(dithering_uv, 4);
    } else {
        threshold = bayerThreshold(dithering_uv, 8);
    }

    float res;
    if (u_onlyShape > 0.5) {
        res = clamp(shape, 0.0, 1.0);
    } else {
        res = step(0.5, shape + (threshold - 0.5));
    }

    vec3 color = u_colorFront.rgb * u_colorFront.a * res;
    float opacity = u_colorFront.a * res;

    if (u_onlyShape > 0.5) {
        opacity = res;
    } else {
        color += u_colorBack.rgb * u_colorBack.a * (1.0 - opacity);
        opacity += u_colorBack.a * (1.0 - opacity);
    }

    if (u_debug > 0.5) {
        outColor = vec4(res, shape, 0.5 + 0.5 * sin(res * 10.0), 1.0);
    } else {
        outColor = vec4(color, opacity);
    }
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_declares_every_uniform_the_pipeline_uploads() {
        for name in [
            "u_resolution",
            "u_time",
            "u_pxSize",
            "u_colorBack",
            "u_colorFront",
            "u_shape",
            "u_type",
            "u_onlyShape",
            "u_debug",
            "u_pulse",
        ] {
            assert!(FRAGMENT_SHADER.contains(name), "missing uniform {name}");
        }
    }

    #[test]
    fn vertex_shader_emits_two_triangles() {
        assert_eq!(QUAD_VERTEX_COUNT, 6);
        assert!(VERTEX_SHADER.contains("positions[6]"));
    }

    #[test]
    fn sources_declare_matching_glsl_version() {
        assert!(VERTEX_SHADER.starts_with("#version 450"));
        assert!(FRAGMENT_SHADER.starts_with("#version 450"));
    }
}
