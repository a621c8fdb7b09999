//! Color specification parsing.
//!
//! Config colors arrive as CSS-style strings (hex or `rgb()`/`rgba()`
//! notation) and are normalized into four float channels before being
//! uploaded as uniforms. Parsing never fails: anything unrecognized
//! degrades to opaque black so a bad color can never break a frame.

/// Normalized RGBA color with every channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fallback for empty or malformed specifications.
    pub const OPAQUE_BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a color specification.
    ///
    /// Accepted forms:
    /// * `#RRGGBB` (alpha defaults to 1) and `#RRGGBBAA`
    /// * `rgb(r, g, b)` with components clamped to `[0, 255]`
    /// * `rgba(r, g, b, a)` with alpha clamped to `[0, 1]`
    ///
    /// Any other input yields [`Rgba::OPAQUE_BLACK`].
    pub fn parse(spec: &str) -> Self {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Self::OPAQUE_BLACK;
        }

        if let Some(rest) = trimmed
            .strip_prefix("rgba")
            .or_else(|| trimmed.strip_prefix("rgb"))
        {
            return parse_functional(rest).unwrap_or(Self::OPAQUE_BLACK);
        }

        parse_hex(trimmed.trim_start_matches('#')).unwrap_or(Self::OPAQUE_BLACK)
    }

    /// Channel values as an array, in uniform upload order.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Re-encodes the channels as 8-bit values (rounded).
    pub fn to_bytes(self) -> [u8; 4] {
        let encode = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            encode(self.r),
            encode(self.g),
            encode(self.b),
            encode(self.a),
        ]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::OPAQUE_BLACK
    }
}

impl From<&str> for Rgba {
    fn from(spec: &str) -> Self {
        Self::parse(spec)
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |index: usize| -> Option<f32> {
        let value = u8::from_str_radix(&hex[index * 2..index * 2 + 2], 16).ok()?;
        Some(value as f32 / 255.0)
    };
    Some(Rgba {
        r: channel(0)?,
        g: channel(1)?,
        b: channel(2)?,
        a: if hex.len() == 8 { channel(3)? } else { 1.0 },
    })
}

fn parse_functional(rest: &str) -> Option<Rgba> {
    let inner = rest
        .trim_start()
        .strip_prefix('(')?
        .trim_end()
        .strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);

    let mut byte_channel = || -> Option<f32> {
        let value: f32 = parts.next()?.parse().ok()?;
        Some(value.clamp(0.0, 255.0) / 255.0)
    };
    let r = byte_channel()?;
    let g = byte_channel()?;
    let b = byte_channel()?;
    let a = match parts.next() {
        Some(raw) => raw.parse::<f32>().ok()?.clamp(0.0, 1.0),
        None => 1.0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(Rgba { r, g, b, a })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digit_hex_round_trips_every_channel_value() {
        for value in 0u16..=255 {
            let spec = format!("#{value:02x}00ff");
            let color = Rgba::parse(&spec);
            let bytes = color.to_bytes();
            assert_eq!(bytes[0] as u16, value);
            assert_eq!(bytes[1], 0);
            assert_eq!(bytes[2], 255);
            assert_eq!(bytes[3], 255);
        }
    }

    #[test]
    fn eight_digit_hex_round_trips_alpha() {
        for value in 0u16..=255 {
            let spec = format!("#10e0a0{value:02X}");
            let bytes = Rgba::parse(&spec).to_bytes();
            assert_eq!(bytes, [0x10, 0xe0, 0xa0, value as u8]);
        }
    }

    #[test]
    fn functional_notation_matches_equivalent_hex() {
        let from_rgba = Rgba::parse("rgba(114, 49, 49, 1)");
        let from_hex = Rgba::parse("#723131ff");
        assert_eq!(from_rgba, from_hex);

        let from_rgb = Rgba::parse("rgb(0, 128, 255)");
        let from_hex = Rgba::parse("#0080ff");
        assert_eq!(from_rgb, from_hex);
    }

    #[test]
    fn functional_notation_clamps_out_of_range_components() {
        let color = Rgba::parse("rgba(300, -20, 128, 2.5)");
        assert_eq!(color.to_bytes(), [255, 0, 128, 255]);
    }

    #[test]
    fn missing_alpha_defaults_to_opaque() {
        assert_eq!(Rgba::parse("#123456").a, 1.0);
        assert_eq!(Rgba::parse("rgb(1, 2, 3)").a, 1.0);
    }

    #[test]
    fn unrecognized_input_degrades_to_opaque_black() {
        for bad in ["", "   ", "#12345", "#gghhii", "rgb(1,2)", "hsl(1,2,3)", "blue"] {
            assert_eq!(Rgba::parse(bad), Rgba::OPAQUE_BLACK, "input {bad:?}");
        }
    }
}
