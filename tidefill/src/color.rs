// color.rs
//
// Copyright (c) 2024  tidefill developers
//
//! Hue / saturation / lightness color model
use pix::el::Pixel;
use pix::rgb::{Rgb, SRgba8};

/// Chroma (or maximum channel) below this is achromatic
const ACHROMATIC: f64 = 1e-4;

/// Saturation at or below this converts back to gray
const GRAY_SATURATION: f64 = 0.001;

/// Color in hue / saturation / lightness space
///
/// Hue is in degrees `[0, 360)`; saturation and lightness are in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hsl {
    /// Hue (degrees)
    hue: f64,
    /// Saturation
    saturation: f64,
    /// Lightness
    lightness: f64,
}

/// Split a pixel into its red, green, blue and alpha channels.
pub(crate) fn channels(clr: SRgba8) -> [u8; 4] {
    [
        u8::from(Rgb::red(clr)),
        u8::from(Rgb::green(clr)),
        u8::from(Rgb::blue(clr)),
        u8::from(clr.alpha()),
    ]
}

/// Scale a unit value to a rounded 8-bit channel
fn unit_to_u8(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

impl From<SRgba8> for Hsl {
    fn from(clr: SRgba8) -> Self {
        let [r, g, b, _] = channels(clr);
        let r = f64::from(r) / 255.0;
        let g = f64::from(g) / 255.0;
        let b = f64::from(b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;
        let lightness = 0.5 * (max + min);
        if chroma < ACHROMATIC || max < ACHROMATIC {
            return Hsl::new(0.0, 0.0, lightness);
        }
        let saturation = chroma / (1.0 - (2.0 * lightness - 1.0).abs());
        let sextant = if max == r {
            ((g - b) / chroma) % 6.0
        } else if max == g {
            (b - r) / chroma + 2.0
        } else {
            (r - g) / chroma + 4.0
        };
        let mut hue = sextant * 60.0;
        if hue < 0.0 {
            hue += 360.0;
        }
        Hsl::new(hue, saturation, lightness)
    }
}

impl Hsl {
    /// Create a new HSL color
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Hsl {
            hue,
            saturation,
            lightness,
        }
    }

    /// Get the hue, in degrees
    pub fn hue(self) -> f64 {
        self.hue
    }

    /// Get the saturation
    pub fn saturation(self) -> f64 {
        self.saturation
    }

    /// Get the lightness
    pub fn lightness(self) -> f64 {
        self.lightness
    }

    /// Adjust lightness, clamped to `[0, 1]`
    pub fn with_lightness(mut self, lightness: f64) -> Self {
        self.lightness = lightness.clamp(0.0, 1.0);
        self
    }

    /// Convert to an RGBA pixel with the given alpha.
    pub fn to_rgba(self, alpha: u8) -> SRgba8 {
        if self.saturation <= GRAY_SATURATION {
            let v = unit_to_u8(self.lightness);
            return SRgba8::new(v, v, v, alpha);
        }
        let c = (1.0 - (2.0 * self.lightness - 1.0).abs()) * self.saturation;
        let h = self.hue / 60.0;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let (r, g, b) = if h <= 1.0 {
            (c, x, 0.0)
        } else if h <= 2.0 {
            (x, c, 0.0)
        } else if h <= 3.0 {
            (0.0, c, x)
        } else if h <= 4.0 {
            (0.0, x, c)
        } else if h <= 5.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };
        let m = self.lightness - 0.5 * c;
        SRgba8::new(
            unit_to_u8(r + m),
            unit_to_u8(g + m),
            unit_to_u8(b + m),
            alpha,
        )
    }
}

/// Calculate perceptual distance between two colors.
///
/// This is the Euclidean norm of the hue (shortest arc, scaled to `[0, 1]`),
/// saturation and lightness differences.  Alpha is ignored.  The result is
/// in the range `[0, ~1.22]`.
pub fn distance(a: SRgba8, b: SRgba8) -> f64 {
    let a = Hsl::from(a);
    let b = Hsl::from(b);
    let mut dh = (a.hue - b.hue).abs() / 360.0;
    if dh > 0.5 {
        dh = 1.0 - dh;
    }
    let ds = a.saturation - b.saturation;
    let dl = a.lightness - b.lightness;
    (dh * dh + ds * ds + dl * dl).sqrt()
}

/// Shift the lightness of a color, preserving its alpha.
pub fn adjust_luminance(clr: SRgba8, delta: f64) -> SRgba8 {
    let hsl = Hsl::from(clr);
    hsl.with_lightness(hsl.lightness + delta)
        .to_rgba(channels(clr)[3])
}
