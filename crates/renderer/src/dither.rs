//! Ordered-dithering kernels.
//!
//! A kernel maps a pixel-space coordinate to a threshold in `[0, 1)`.
//! Binarization then perturbs the 0.5 decision boundary per pixel, so the
//! local density of the two-tone result tracks the continuous intensity
//! field.

use std::fmt;
use std::str::FromStr;

use crate::field::{self, PixelCoords};

/// Binarization kernel selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DitherKind {
    Random,
    Bayer2,
    Bayer4,
    Bayer8,
}

const BAYER_2: [u8; 4] = [0, 2, 3, 1];

const BAYER_4: [u8; 16] = [
    0, 8, 2, 10, //
    12, 4, 14, 6, //
    3, 11, 1, 9, //
    15, 7, 13, 5,
];

const BAYER_8: [u8; 64] = [
    0, 32, 8, 40, 2, 34, 10, 42, //
    48, 16, 56, 24, 50, 18, 58, 26, //
    12, 44, 4, 36, 14, 46, 6, 38, //
    60, 28, 52, 20, 62, 30, 54, 22, //
    3, 35, 11, 43, 1, 33, 9, 41, //
    51, 19, 59, 27, 49, 17, 57, 25, //
    15, 47, 7, 39, 13, 45, 5, 37, //
    63, 31, 55, 23, 61, 29, 53, 21,
];

impl DitherKind {
    /// Every catalog entry, in shader-index order.
    pub const ALL: [DitherKind; 4] = [
        DitherKind::Random,
        DitherKind::Bayer2,
        DitherKind::Bayer4,
        DitherKind::Bayer8,
    ];

    /// Value uploaded through the `dither_type` uniform.
    pub fn shader_index(self) -> f32 {
        match self {
            DitherKind::Random => 1.0,
            DitherKind::Bayer2 => 2.0,
            DitherKind::Bayer4 => 3.0,
            DitherKind::Bayer8 => 4.0,
        }
    }

    /// Per-pixel threshold in `[0, 1)`.
    ///
    /// Bayer kernels index their matrix by the quantization-grid coordinate;
    /// the random kernel hashes the raw pixel coordinate so grain stays at
    /// native resolution regardless of `pixel_size`.
    pub fn threshold(self, coords: &PixelCoords) -> f32 {
        match self {
            DitherKind::Random => field::hash21(coords.noise_uv),
            DitherKind::Bayer2 => bayer_lookup(&BAYER_2, 2, coords.bayer_uv),
            DitherKind::Bayer4 => bayer_lookup(&BAYER_4, 4, coords.bayer_uv),
            DitherKind::Bayer8 => bayer_lookup(&BAYER_8, 8, coords.bayer_uv),
        }
    }
}

impl fmt::Display for DitherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DitherKind::Random => "random",
            DitherKind::Bayer2 => "2x2",
            DitherKind::Bayer4 => "4x4",
            DitherKind::Bayer8 => "8x8",
        };
        f.write_str(name)
    }
}

impl FromStr for DitherKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "random" => Ok(DitherKind::Random),
            "2x2" => Ok(DitherKind::Bayer2),
            "4x4" => Ok(DitherKind::Bayer4),
            "8x8" => Ok(DitherKind::Bayer8),
            other => Err(format!(
                "unknown dither type '{other}' (expected one of random, 2x2, 4x4, 8x8)"
            )),
        }
    }
}

fn bayer_lookup(matrix: &[u8], size: usize, coord: [f32; 2]) -> f32 {
    let x = field::glsl_mod(coord[0], size as f32) as usize;
    let y = field::glsl_mod(coord[1], size as f32) as usize;
    let cell = matrix[y * size + x];
    cell as f32 / (size * size) as f32
}

/// Classic ordered binarization: the kernel threshold shifts the 0.5
/// decision boundary, yielding 0 or 1.
pub fn binarize(intensity: f32, threshold: f32) -> f32 {
    field::step(0.5, intensity + (threshold - 0.5))
}
