//! HSV → RGB colour model.
//!
//! Pure math, no I/O. The RGB controller feeds it hue in degrees and
//! saturation/value as fractions, then scales the normalised result into
//! per-channel duty cycles with [`RgbDuty::from_color`].
//!
//! ## Sector table
//!
//! | Sector | Hue range   | (r', g', b') |
//! |--------|-------------|--------------|
//! | 0      | 0°–60°      | (c, x, 0)    |
//! | 1      | 60°–120°    | (x, c, 0)    |
//! | 2      | 120°–180°   | (0, c, x)    |
//! | 3      | 180°–240°   | (0, x, c)    |
//! | 4      | 240°–300°   | (x, 0, c)    |
//! | 5      | 300°–360°   | (c, 0, x)    |

/// Normalised colour, each component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::grey(0.0);

    pub const fn grey(level: f32) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }
}

/// Convert HSV to normalised RGB.
///
/// * `h` — hue in degrees; wrapped into `[0, 360)`.
/// * `s` — saturation in `[0, 1]`.
/// * `v` — value in `[0, 1]`.
///
/// `s` and `v` are clamped so that every output component stays in `[0, 1]`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let c = v * s;
    let h60 = h / 60.0;
    let x = c * (1.0 - ((h60 % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h60 as u32) % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb {
        r: r + m,
        g: g + m,
        b: b + m,
    }
}

/// Per-channel duty cycles (0–100 %) for a three-channel LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RgbDuty {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbDuty {
    pub const OFF: Self = Self { r: 0, g: 0, b: 0 };

    /// Scale a normalised colour into duty percent, gated by `power`.
    ///
    /// Each channel is `power * component * 100` truncated toward zero,
    /// never rounded.
    pub fn from_color(rgb: Rgb, power: bool) -> Self {
        let p = if power { 1.0 } else { 0.0 };
        Self {
            r: (p * rgb.r * 100.0) as u8,
            g: (p * rgb.g * 100.0) as u8,
            b: (p * rgb.b * 100.0) as u8,
        }
    }
}

impl From<(u8, u8, u8)> for RgbDuty {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}
