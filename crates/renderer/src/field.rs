//! Procedural shape catalog.
//!
//! Each shape is a pure scalar field over (quantized coordinate, time):
//! the same inputs always produce the same intensity, which is what
//! keeps the animation stable frame to frame and lets the CPU
//! rasterizer in [`crate::software`] reproduce the GPU output exactly.
//! The math here mirrors the fragment program in [`crate::shader`]
//! branch for branch, including GLSL `fract`/`mod` semantics.

use std::fmt;
use std::str::FromStr;

pub const TWO_PI: f32 = std::f32::consts::TAU;

/// Procedural scalar field selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Simplex,
    Warp,
    Dots,
    Wave,
    Ripple,
    Swirl,
    Sphere,
}

impl Shape {
    /// Every catalog entry, in shader-index order.
    pub const ALL: [Shape; 7] = [
        Shape::Simplex,
        Shape::Warp,
        Shape::Dots,
        Shape::Wave,
        Shape::Ripple,
        Shape::Swirl,
        Shape::Sphere,
    ];

    /// Value uploaded through the `shape` uniform.
    pub fn shader_index(self) -> f32 {
        match self {
            Shape::Simplex => 1.0,
            Shape::Warp => 2.0,
            Shape::Dots => 3.0,
            Shape::Wave => 4.0,
            Shape::Ripple => 5.0,
            Shape::Swirl => 6.0,
            Shape::Sphere => 7.0,
        }
    }

    /// Evaluates the field at a pixelized, centered, resolution-normalized
    /// coordinate. `t` is the animation phase (already speed-scaled and
    /// halved by the frame function), `pulse` only affects [`Shape::Sphere`].
    ///
    /// The result lies in `[0, 1]`.
    pub fn intensity(self, uv: [f32; 2], resolution: [f32; 2], t: f32, pulse: f32) -> f32 {
        match self {
            Shape::Simplex => {
                let uv = scale(uv, 0.001);
                let noise = 0.5 + 0.5 * layered_simplex(uv, t);
                smoothstep(0.3, 0.9, noise)
            }
            Shape::Warp => {
                let mut uv = scale(uv, 0.003);
                for i in 1..6 {
                    let i = i as f32;
                    uv[0] += 0.6 / i * (i * 2.5 * uv[1] + t).cos();
                    uv[1] += 0.6 / i * (i * 1.5 * uv[0] + t).cos();
                }
                let shape = 0.15 / (t - uv[1] - uv[0]).sin().abs();
                smoothstep(0.02, 1.0, shape)
            }
            Shape::Dots => {
                let uv = scale(uv, 0.05);
                let stripe = (2.0 * uv[0] / TWO_PI).floor();
                let mut rand = hash11(stripe * 10.0);
                rand = (rand - 0.5).signum() * (0.1 + rand.abs()).powf(0.4);
                let shape = uv[0].sin() * (uv[1] - 5.0 * rand * t).cos();
                shape.abs().powf(6.0)
            }
            Shape::Wave => {
                let uv = scale(uv, 4.0);
                let wave = (0.5 * uv[0] - 2.0 * t).cos()
                    * (1.5 * uv[0] + t).sin()
                    * (0.75 + 0.25 * (3.0 * t).cos());
                1.0 - smoothstep(-1.0, 1.0, uv[1] + wave)
            }
            Shape::Ripple => {
                let dist = length(uv);
                (dist.powf(1.7) * 7.0 - 3.0 * t).sin() * 0.5 + 0.5
            }
            Shape::Swirl => {
                let l = length(uv);
                let angle = 6.0 * uv[1].atan2(uv[0]) + 4.0 * t;
                let twist = 1.2;
                let offset = l.powf(-twist) + angle / TWO_PI;
                let mid = smoothstep(0.0, 1.0, l.powf(twist));
                mix(0.0, fract(offset), mid)
            }
            Shape::Sphere => {
                // Aspect-corrected, zoomed planar coordinate.
                let aspect = resolution[0] / resolution[1].max(1.0);
                let p = [uv[0] * aspect * 2.0, uv[1] * 2.0];

                let len_sq = dot(p, p);
                let d = 1.0 - len_sq;
                let inside = step(0.0, d);
                let z = d.max(0.0).sqrt();

                let light = normalize3([(1.5 * t).cos(), 0.8, (1.25 * t).sin()]);
                let ndl = (light[0] * p[0] + light[1] * p[1] + light[2] * z).clamp(-1.0, 1.0);
                let lighting = (0.5 + 0.5 * ndl).powf(1.15);

                // Rim lifts the silhouette edge where d approaches zero.
                let rim = smoothstep(0.0, 0.22, d) * 0.55;

                let mut value = (lighting + rim) * inside;
                if pulse > 0.001 {
                    let beat = 0.5 + 0.5 * (t * 1.2).sin();
                    value *= mix(1.0, 0.85 + 0.3 * beat, pulse.clamp(0.0, 1.0));
                }
                smoothstep(0.05, 0.95, value)
            }
        }
    }

    /// Pixel-space variant: quantizes an unnormalized pixel coordinate by
    /// `pixel_size` first, then evaluates the field.
    pub fn intensity_at_pixel(
        self,
        frag: [f32; 2],
        resolution: [f32; 2],
        pixel_size: f32,
        t: f32,
        pulse: f32,
    ) -> f32 {
        let coords = pixelize(frag, resolution, pixel_size);
        self.intensity(coords.shape_uv, resolution, t, pulse)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Simplex => "simplex",
            Shape::Warp => "warp",
            Shape::Dots => "dots",
            Shape::Wave => "wave",
            Shape::Ripple => "ripple",
            Shape::Swirl => "swirl",
            Shape::Sphere => "sphere",
        };
        f.write_str(name)
    }
}

impl FromStr for Shape {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "simplex" => Ok(Shape::Simplex),
            "warp" => Ok(Shape::Warp),
            "dots" => Ok(Shape::Dots),
            "wave" => Ok(Shape::Wave),
            "ripple" => Ok(Shape::Ripple),
            "swirl" => Ok(Shape::Swirl),
            "sphere" => Ok(Shape::Sphere),
            other => Err(format!(
                "unknown shape '{other}' (expected one of simplex, warp, dots, wave, ripple, swirl, sphere)"
            )),
        }
    }
}

/// Coordinate frames derived from one fragment position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelCoords {
    /// Quantized, centered, resolution-normalized coordinate fed to shapes.
    pub shape_uv: [f32; 2],
    /// Centered pixel coordinate divided by `pixel_size`, pre-floor; indexes
    /// the Bayer matrices so threshold cells track the quantization grid.
    pub bayer_uv: [f32; 2],
    /// Centered, unquantized pixel coordinate; seeds the random dither hash.
    pub noise_uv: [f32; 2],
}

/// Spatial quantization applied before any shape is evaluated. Coordinates
/// are centered on the surface, divided by `pixel_size`, floored, and
/// re-scaled, which produces the characteristic blocky look.
pub fn pixelize(frag: [f32; 2], resolution: [f32; 2], pixel_size: f32) -> PixelCoords {
    let centered = [
        frag[0] - 0.5 * resolution[0],
        frag[1] - 0.5 * resolution[1],
    ];
    let bayer_uv = [centered[0] / pixel_size, centered[1] / pixel_size];
    let shape_uv = [
        bayer_uv[0].floor() * pixel_size / resolution[0],
        bayer_uv[1].floor() * pixel_size / resolution[1],
    ];
    PixelCoords {
        shape_uv,
        bayer_uv,
        noise_uv: centered,
    }
}

// --- GLSL-compatible scalar helpers -------------------------------------

/// GLSL `fract`: always in `[0, 1)`, including for negative inputs.
pub(crate) fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// GLSL `mod(x, y)` (floored, not truncated like `%`).
pub(crate) fn glsl_mod(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

pub(crate) fn step(edge: f32, x: f32) -> f32 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

pub(crate) fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub(crate) fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn scale(v: [f32; 2], factor: f32) -> [f32; 2] {
    [v[0] * factor, v[1] * factor]
}

fn dot(a: [f32; 2], b: [f32; 2]) -> f32 {
    a[0] * b[0] + a[1] * b[1]
}

fn length(v: [f32; 2]) -> f32 {
    dot(v, v).sqrt()
}

fn normalize3(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}

/// Irrational-multiplier hash of a scalar, as in the fragment program.
pub(crate) fn hash11(p: f32) -> f32 {
    let mut p = fract(p * 0.3183099) + 0.1;
    p *= p + 19.19;
    fract(p * p)
}

/// Irrational-multiplier hash of a 2-D coordinate.
pub(crate) fn hash21(p: [f32; 2]) -> f32 {
    let mut p = [fract(p[0] * 0.3183099) + 0.1, fract(p[1] * 0.3678794) + 0.1];
    let d = p[0] * (p[0] + 19.19) + p[1] * (p[1] + 19.19);
    p[0] += d;
    p[1] += d;
    fract(p[0] * p[1])
}

/// Two octaves of gradient noise at different scales and phases.
fn layered_simplex(uv: [f32; 2], t: f32) -> f32 {
    let a = simplex2([uv[0], uv[1] - 0.3 * t]);
    let b = simplex2([2.0 * uv[0], 2.0 * uv[1] + 0.32 * t]);
    0.5 * a + 0.5 * b
}

fn permute3(x: [f32; 3]) -> [f32; 3] {
    let p = |v: f32| glsl_mod(((v * 34.0) + 1.0) * v, 289.0);
    [p(x[0]), p(x[1]), p(x[2])]
}

/// Scalar port of 2-D simplex gradient noise (Ashima/McEwan variant),
/// matching the GLSL implementation embedded in the fragment program.
pub(crate) fn simplex2(v: [f32; 2]) -> f32 {
    const C: [f32; 4] = [
        0.211_324_87, // (3 - sqrt(3)) / 6
        0.366_025_4,  // (sqrt(3) - 1) / 2
        -0.577_350_26,
        0.024_390_243,
    ];

    let skew = (v[0] + v[1]) * C[1];
    let mut i = [(v[0] + skew).floor(), (v[1] + skew).floor()];
    let unskew = (i[0] + i[1]) * C[0];
    let x0 = [v[0] - i[0] + unskew, v[1] - i[1] + unskew];

    let i1 = if x0[0] > x0[1] { [1.0, 0.0] } else { [0.0, 1.0] };
    let x12 = [
        x0[0] + C[0] - i1[0],
        x0[1] + C[0] - i1[1],
        x0[0] + C[2],
        x0[1] + C[2],
    ];

    i = [glsl_mod(i[0], 289.0), glsl_mod(i[1], 289.0)];
    let p = permute3({
        let inner = permute3([i[1], i[1] + i1[1], i[1] + 1.0]);
        [inner[0] + i[0], inner[1] + i[0] + i1[0], inner[2] + i[0] + 1.0]
    });

    let mut m = [
        (0.5 - dot(x0, x0)).max(0.0),
        (0.5 - dot([x12[0], x12[1]], [x12[0], x12[1]])).max(0.0),
        (0.5 - dot([x12[2], x12[3]], [x12[2], x12[3]])).max(0.0),
    ];
    for value in &mut m {
        *value = *value * *value;
        *value = *value * *value;
    }

    let x = [
        2.0 * fract(p[0] * C[3]) - 1.0,
        2.0 * fract(p[1] * C[3]) - 1.0,
        2.0 * fract(p[2] * C[3]) - 1.0,
    ];
    let h = [x[0].abs() - 0.5, x[1].abs() - 0.5, x[2].abs() - 0.5];
    let ox = [(x[0] + 0.5).floor(), (x[1] + 0.5).floor(), (x[2] + 0.5).floor()];
    let a0 = [x[0] - ox[0], x[1] - ox[1], x[2] - ox[2]];

    for index in 0..3 {
        m[index] *= 1.792_842_9 - 0.853_734_7 * (a0[index] * a0[index] + h[index] * h[index]);
    }

    let g = [
        a0[0] * x0[0] + h[0] * x0[1],
        a0[1] * x12[0] + h[1] * x12[1],
        a0[2] * x12[2] + h[2] * x12[3],
    ];

    130.0 * (m[0] * g[0] + m[1] * g[1] + m[2] * g[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RES: [f32; 2] = [640.0, 480.0];

    #[test]
    fn every_shape_is_deterministic() {
        let samples = [
            [0.0, 0.0],
            [0.13, -0.27],
            [-0.49, 0.02],
            [0.5, 0.5],
            [-0.31, -0.44],
        ];
        for shape in Shape::ALL {
            for uv in samples {
                for t in [0.0, 0.77, 12.5] {
                    let first = shape.intensity(uv, RES, t, 0.25);
                    let second = shape.intensity(uv, RES, t, 0.25);
                    assert_eq!(
                        first.to_bits(),
                        second.to_bits(),
                        "{shape} not bit-stable at {uv:?} t={t}"
                    );
                }
            }
        }
    }

    #[test]
    fn intensities_stay_in_unit_range() {
        for shape in Shape::ALL {
            for step_x in -4..=4 {
                for step_y in -4..=4 {
                    let uv = [step_x as f32 * 0.12, step_y as f32 * 0.12];
                    if shape == Shape::Swirl && uv == [0.0, 0.0] {
                        // powf(0, -twist) is a singularity at the exact origin,
                        // matching the GPU behavior.
                        continue;
                    }
                    for t in [0.0, 1.3, 9.9] {
                        let value = shape.intensity(uv, RES, t, 1.0);
                        assert!(
                            (0.0..=1.0).contains(&value),
                            "{shape} produced {value} at {uv:?} t={t}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn sphere_masks_everything_outside_the_unit_disc() {
        // |aspect-corrected coord| > 1 must contribute nothing at any time.
        let aspect = RES[0] / RES[1];
        for t in [0.0, 0.5, 3.7, 42.0] {
            for raw in [[0.6, 0.6], [0.9, 0.0], [0.0, 0.9], [-0.7, 0.5]] {
                let p = [raw[0] * aspect * 2.0, raw[1] * 2.0];
                if p[0] * p[0] + p[1] * p[1] <= 1.0 {
                    continue;
                }
                let value = Shape::Sphere.intensity(raw, RES, t, 0.0);
                // smoothstep(0.05, 0.95, 0) == 0
                assert_eq!(value, 0.0, "outside point lit at t={t}, uv={raw:?}");
            }
        }
    }

    #[test]
    fn sphere_pulse_modulates_the_interior() {
        let interior = [0.05, 0.05];
        let mut pulsed = Vec::new();
        let mut any_difference = false;
        for step in 0..32 {
            let t = step as f32 * 0.4;
            let with_pulse = Shape::Sphere.intensity(interior, RES, t, 1.0);
            let without = Shape::Sphere.intensity(interior, RES, t, 0.0);
            if (with_pulse - without).abs() > 1e-4 {
                any_difference = true;
            }
            pulsed.push(with_pulse);
        }
        assert!(any_difference, "pulse=1 must diverge from pulse=0 somewhere");

        let min = pulsed.iter().copied().fold(f32::INFINITY, f32::min);
        let max = pulsed.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!(max - min > 0.01, "pulse=1 should oscillate over time");

        // Frozen time means frozen output, pulse or not.
        let frozen_a = Shape::Sphere.intensity(interior, RES, 1.25, 1.0);
        let frozen_b = Shape::Sphere.intensity(interior, RES, 1.25, 1.0);
        assert_eq!(frozen_a.to_bits(), frozen_b.to_bits());
    }

    #[test]
    fn pixelize_quantizes_to_pixel_size_blocks() {
        let res = [64.0, 64.0];
        // Fragments within one 4px block collapse onto the same shape_uv.
        let a = pixelize([33.0, 33.0], res, 4.0);
        let b = pixelize([35.0, 35.0], res, 4.0);
        assert_eq!(a.shape_uv, b.shape_uv);
        // But the next block over differs.
        let c = pixelize([37.0, 33.0], res, 4.0);
        assert_ne!(a.shape_uv, c.shape_uv);
        // The noise coordinate stays unquantized.
        assert_ne!(a.noise_uv, b.noise_uv);
    }

    #[test]
    fn glsl_fract_and_mod_handle_negatives() {
        assert_eq!(fract(-0.25), 0.75);
        assert_eq!(glsl_mod(-1.0, 8.0), 7.0);
        assert_eq!(glsl_mod(9.0, 8.0), 1.0);
    }

    #[test]
    fn shape_names_round_trip() {
        for shape in Shape::ALL {
            assert_eq!(shape.to_string().parse::<Shape>().unwrap(), shape);
        }
        assert!("cube".parse::<Shape>().is_err());
    }
}
