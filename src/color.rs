//! RGB color value used by the rasterizer and the terminal surface.

use std::fmt;
use std::ops::{Add, Div};

/// An RGB triple.
///
/// Channels are conventionally in `0..=255` but are not clamped, so sums
/// of several samples can be accumulated before dividing back down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorSample {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl ColorSample {
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Build a sample from three bytes in red, green, blue order.
    pub fn from_rgb(px: [u8; 3]) -> Self {
        Self::new(px[0] as i32, px[1] as i32, px[2] as i32)
    }

    /// Channels clamped into the displayable byte range.
    pub fn to_bytes(self) -> [u8; 3] {
        [clamp_channel(self.r), clamp_channel(self.g), clamp_channel(self.b)]
    }
}

fn clamp_channel(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Integer division rounding half away from zero.
fn div_round(value: i32, divisor: i32) -> i32 {
    (value as f64 / divisor as f64).round() as i32
}

impl Add for ColorSample {
    type Output = ColorSample;

    fn add(self, rhs: ColorSample) -> ColorSample {
        ColorSample::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Div<i32> for ColorSample {
    type Output = ColorSample;

    /// Divide each channel, rounding to the nearest integer.
    ///
    /// # Panics
    /// Panics when `div` is zero, like integer division.
    fn div(self, div: i32) -> ColorSample {
        assert!(div != 0, "attempt to divide a ColorSample by zero");
        ColorSample::new(
            div_round(self.r, div),
            div_round(self.g, div),
            div_round(self.b, div),
        )
    }
}

impl fmt::Display for ColorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R: {} G: {} B: {}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_component_wise() {
        let sum = ColorSample::new(10, 20, 30) + ColorSample::new(5, 5, 5);
        assert_eq!(sum, ColorSample::new(15, 25, 35));
    }

    #[test]
    fn test_div_exact() {
        assert_eq!(ColorSample::new(15, 25, 35) / 5, ColorSample::new(3, 5, 7));
    }

    #[test]
    fn test_div_rounds_to_nearest() {
        // 10/4 = 2.5 -> 3, 9/4 = 2.25 -> 2, 11/4 = 2.75 -> 3
        assert_eq!(ColorSample::new(10, 9, 11) / 4, ColorSample::new(3, 2, 3));
    }

    #[test]
    #[should_panic(expected = "divide a ColorSample by zero")]
    fn test_div_by_zero_panics() {
        let _ = ColorSample::new(1, 2, 3) / 0;
    }

    #[test]
    fn test_sum_is_not_clamped() {
        let sum = ColorSample::new(200, 200, 200) + ColorSample::new(100, 100, 100);
        assert_eq!(sum.r, 300);
        assert_eq!(sum.to_bytes(), [255, 255, 255]);
    }

    #[test]
    fn test_display() {
        assert_eq!(ColorSample::new(1, 2, 3).to_string(), "R: 1 G: 2 B: 3");
    }
}
