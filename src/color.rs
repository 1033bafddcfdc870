//! Color type and the small color-math helpers the animations are built from.
//!
//! ## Rust concepts
//! - `Copy` types: a `Color` is three bytes, passing it by value is free
//! - `From` conversions at crate boundaries (tuples, `smart_leds::RGB8`)
//! - Widening to `u16`/`f32` before arithmetic so channels never overflow

use smart_leds::RGB8;

/// Our own color type, decoupled from any hardware crate.
///
/// This lets us test color logic on any machine. At the hardware boundary
/// we convert via `Into<RGB8>` or `Into<LedColor>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Divide every channel by `divisor`, truncating.
    ///
    /// The scanner uses `dimmed(10)` for the two glow pixels around its block.
    pub fn dimmed(self, divisor: u8) -> Self {
        let divisor = divisor.max(1);
        Self::new(self.r / divisor, self.g / divisor, self.b / divisor)
    }

    /// Apply `f` to each channel.
    pub fn map(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for (u8, u8, u8) {
    fn from(c: Color) -> Self {
        (c.r, c.g, c.b)
    }
}

impl From<Color> for RGB8 {
    fn from(c: Color) -> Self {
        RGB8::new(c.r, c.g, c.b)
    }
}

impl From<RGB8> for Color {
    fn from(c: RGB8) -> Self {
        Self::new(c.r, c.g, c.b)
    }
}

/// Convert our Color to the matrix crate's LedColor at the boundary.
#[cfg(feature = "hardware")]
impl From<Color> for rpi_led_matrix::LedColor {
    fn from(c: Color) -> Self {
        rpi_led_matrix::LedColor {
            red: c.r,
            green: c.g,
            blue: c.b,
        }
    }
}

impl std::str::FromStr for Color {
    type Err = String;

    /// Parse `"r,g,b"` (decimal) or `"#rrggbb"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(format!("expected #rrggbb, got {s:?}"));
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|e| format!("{s:?}: {e}"))
            };
            return Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(format!("expected r,g,b, got {s:?}"));
        };
        let channel = |v: &str| v.parse::<u8>().map_err(|e| format!("{v:?}: {e}"));
        Ok(Self::new(channel(r)?, channel(g)?, channel(b)?))
    }
}

// ── Color math ─────────────────────────────────────────────────────

/// Scale each channel by `percent` and truncate toward zero.
///
/// `percent` is expected in `0.0..=1.0` but is not clamped; the float to
/// `u8` cast saturates anything outside the channel range.
pub fn calculate_color_percent(color: Color, percent: f32) -> Color {
    color.map(|c| (percent * f32::from(c)) as u8)
}

/// Map a position on a 256-step hue ring to an RGB color.
///
/// Three linear segments of 85 steps each: red→green, green→blue,
/// blue→red. Sweeping 0..=255 gives a continuous rainbow.
pub fn wheel(position: u8) -> Color {
    match position {
        0..85 => Color::new(position * 3, 255 - position * 3, 0),
        85..170 => {
            let p = position - 85;
            Color::new(255 - p * 3, 0, p * 3)
        }
        _ => {
            let p = position - 170;
            Color::new(0, p * 3, 255 - p * 3)
        }
    }
}

/// Convert hue/saturation/value (each `0.0..=1.0`) to RGB.
///
/// Hue wraps around, saturation and value are clamped. Each channel is
/// rounded to the nearest integer.
pub fn hsv2rgb(h: f32, s: f32, v: f32) -> Color {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    let to_channel = |x: f32| (x * 255.0).round() as u8;

    if s == 0.0 {
        let grey = to_channel(v);
        return Color::new(grey, grey, grey);
    }

    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    // A tiny negative hue can wrap to exactly 1.0, giving sector 6.
    let (r, g, b) = match (sector as u8) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Color::new(to_channel(r), to_channel(g), to_channel(b))
}

/// Index half a ring away from `i` on a ring of `count` positions.
pub fn antipodal_index(count: usize, i: usize) -> usize {
    let half = count / 2;
    if i < half { i + half } else { i - half }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn max_channel_delta(a: Color, b: Color) -> u8 {
        a.r.abs_diff(b.r).max(a.g.abs_diff(b.g)).max(a.b.abs_diff(b.b))
    }

    #[test]
    fn color_percent_truncates() {
        let c = calculate_color_percent(Color::new(200, 100, 50), 0.5);
        assert_eq!(c, Color::new(100, 50, 25));
    }

    #[rstest]
    #[case(0.0, Color::BLACK)]
    #[case(1.0, Color::new(201, 99, 7))]
    #[case(0.33, Color::new(66, 32, 2))]
    fn color_percent_cases(#[case] percent: f32, #[case] expected: Color) {
        assert_eq!(calculate_color_percent(Color::new(201, 99, 7), percent), expected);
    }

    #[test]
    fn wheel_starts_green() {
        assert_eq!(wheel(0), Color::new(0, 255, 0));
    }

    #[test]
    fn wheel_last_position_uses_third_segment() {
        // 255 - 170 = 85
        assert_eq!(wheel(255), Color::new(0, 255, 0));
        assert_eq!(wheel(170), Color::new(0, 0, 255));
    }

    #[rstest]
    #[case(84, 85)]
    #[case(169, 170)]
    #[case(255, 0)]
    fn wheel_is_continuous_at_boundaries(#[case] a: u8, #[case] b: u8) {
        assert!(max_channel_delta(wheel(a), wheel(b)) <= 3);
    }

    #[test]
    fn wheel_segments() {
        assert_eq!(wheel(85), Color::new(255, 0, 0));
        assert_eq!(wheel(100), Color::new(210, 0, 45));
        assert_eq!(wheel(200), Color::new(0, 90, 165));
    }

    #[rstest]
    #[case(0.0, Color::new(255, 0, 0))]
    #[case(1.0 / 3.0, Color::new(0, 255, 0))]
    #[case(2.0 / 3.0, Color::new(0, 0, 255))]
    #[case(1.0 / 6.0, Color::new(255, 255, 0))]
    #[case(0.5, Color::new(0, 255, 255))]
    #[case(5.0 / 6.0, Color::new(255, 0, 255))]
    #[case(1.0, Color::new(255, 0, 0))]
    #[case(-1e-9, Color::new(255, 0, 0))]
    #[case(-0.5, Color::new(0, 255, 255))]
    fn hsv2rgb_primaries(#[case] h: f32, #[case] expected: Color) {
        assert_eq!(hsv2rgb(h, 1.0, 1.0), expected);
    }

    #[test]
    fn hsv2rgb_rounds_and_handles_grey() {
        assert_eq!(hsv2rgb(0.3, 0.0, 0.5), Color::new(128, 128, 128));
        assert_eq!(hsv2rgb(0.0, 1.0, 0.5), Color::new(128, 0, 0));
        assert_eq!(hsv2rgb(0.0, 0.5, 1.0), Color::new(255, 128, 128));
    }

    #[rstest]
    #[case(10, 2, 7)]
    #[case(10, 7, 2)]
    #[case(10, 0, 5)]
    #[case(10, 5, 0)]
    #[case(10, 9, 4)]
    #[case(7, 1, 4)]
    #[case(7, 6, 3)]
    fn antipodal_cases(#[case] count: usize, #[case] i: usize, #[case] expected: usize) {
        assert_eq!(antipodal_index(count, i), expected);
    }

    #[test]
    fn antipodal_is_involution_on_even_rings() {
        for i in 0..12 {
            assert_eq!(antipodal_index(12, antipodal_index(12, i)), i);
        }
    }

    #[test]
    fn dimmed_divides_channels() {
        assert_eq!(Color::new(255, 99, 5).dimmed(10), Color::new(25, 9, 0));
    }

    #[rstest]
    #[case("10,20,30", Color::new(10, 20, 30))]
    #[case(" 255 , 0, 7 ", Color::new(255, 0, 7))]
    #[case("#ff8000", Color::new(255, 128, 0))]
    fn parse_color(#[case] input: &str, #[case] expected: Color) {
        assert_eq!(input.parse::<Color>().unwrap(), expected);
    }

    #[rstest]
    #[case("1,2")]
    #[case("256,0,0")]
    #[case("#12345")]
    #[case("red")]
    fn parse_color_rejects(#[case] input: &str) {
        assert!(input.parse::<Color>().is_err());
    }

    #[test]
    fn rgb8_roundtrip_preserves_channels() {
        let rgb: RGB8 = Color::new(1, 2, 3).into();
        assert_eq!((rgb.r, rgb.g, rgb.b), (1, 2, 3));
    }
}
