// picker.rs
//
// Copyright (c) 2024  tidefill developers
//
//! Region pickers choose the replacement color of each filled pixel
use crate::color::adjust_luminance;
use crate::error::{Error, Result};
use crate::fill::{Point, Visited};
use pix::rgb::SRgba8;

/// Replacement color selection for a fill.
///
/// This only carries parameters; it is [resolved] into a [ColorPicker] at
/// the start of each run.
///
/// [resolved]: enum.Picker.html#method.resolve
/// [ColorPicker]: struct.ColorPicker.html
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Picker {
    /// One fixed color
    Solid(SRgba8),
    /// Diagonal stripes `width` pixels wide, alternating two colors
    Stripe {
        color1: SRgba8,
        color2: SRgba8,
        width: u32,
    },
    /// Four quadrants around `center`, each `brightness / 255` lighter than
    /// the previous one (top-left, top-right, bottom-left, bottom-right).
    ///
    /// A center at the origin is replaced with the raster midpoint.
    Quarter {
        color: SRgba8,
        brightness: i32,
        center: Point,
    },
    /// `fill` color, except `border` color within `width` pixels of the
    /// region edge
    Border {
        fill: SRgba8,
        border: SRgba8,
        width: u32,
    },
}

impl Default for Picker {
    fn default() -> Self {
        Picker::Solid(SRgba8::new(255, 0, 0, 255))
    }
}

impl Picker {
    /// Default stripe width
    pub const STRIPE_WIDTH: u32 = 10;

    /// Default quadrant brightness step
    pub const BRIGHTNESS: i32 = 40;

    /// Default border width
    pub const BORDER_WIDTH: u32 = 3;

    /// Create a stripe picker
    pub fn stripe(color1: SRgba8, color2: SRgba8, width: u32) -> Self {
        Picker::Stripe {
            color1,
            color2,
            width,
        }
    }

    /// Create a quarter picker centered on the raster
    pub fn quarter(color: SRgba8, brightness: i32) -> Self {
        Picker::Quarter {
            color,
            brightness,
            center: Point::default(),
        }
    }

    /// Create a border picker
    pub fn border(fill: SRgba8, border: SRgba8, width: u32) -> Self {
        Picker::Border {
            fill,
            border,
            width,
        }
    }

    /// Check parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            Picker::Stripe { width: 0, .. } => Err(Error::InvalidStripeWidth),
            _ => Ok(()),
        }
    }

    /// Resolve into a color picker for a raster of the given size.
    pub fn resolve(&self, width: u32, height: u32) -> Result<ColorPicker> {
        self.validate()?;
        let resolved = match *self {
            Picker::Solid(color) => Resolved::Solid(color),
            Picker::Stripe {
                color1,
                color2,
                width,
            } => Resolved::Stripe {
                colors: [color1, color2],
                width: i64::from(width),
            },
            Picker::Quarter {
                color,
                brightness,
                center,
            } => {
                let center = if center == Point::default() {
                    Point::new((width / 2) as i32, (height / 2) as i32)
                } else {
                    center
                };
                let step = f64::from(brightness) / 255.0;
                let colors = [0.0, 1.0, 2.0, 3.0]
                    .map(|quadrant| adjust_luminance(color, quadrant * step));
                Resolved::Quarter { center, colors }
            }
            Picker::Border {
                fill,
                border,
                width,
            } => Resolved::Border {
                fill,
                border,
                width: width.min(i32::MAX as u32) as i32,
            },
        };
        Ok(ColorPicker(resolved))
    }
}

/// Picker with all per-run values computed
#[derive(Clone, Copy, Debug, PartialEq)]
enum Resolved {
    Solid(SRgba8),
    Stripe {
        colors: [SRgba8; 2],
        width: i64,
    },
    Quarter {
        center: Point,
        colors: [SRgba8; 4],
    },
    Border {
        fill: SRgba8,
        border: SRgba8,
        width: i32,
    },
}

/// Color picker resolved for one fill run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorPicker(Resolved);

impl ColorPicker {
    /// Get the replacement color for a pixel.
    ///
    /// * `pt` Position of the pixel.
    /// * `original` Color of the pixel before filling.
    /// * `visited` Live fill state (only used by border pickers).
    pub fn color_for(
        &self,
        pt: Point,
        _original: SRgba8,
        visited: &Visited,
    ) -> SRgba8 {
        match self.0 {
            Resolved::Solid(color) => color,
            Resolved::Stripe { colors, width } => {
                let sum = i64::from(pt.x) + i64::from(pt.y);
                let band = sum.div_euclid(width);
                colors[band.rem_euclid(2) as usize]
            }
            Resolved::Quarter { center, colors } => {
                let right = usize::from(pt.x >= center.x);
                let below = usize::from(pt.y >= center.y);
                colors[right + below * 2]
            }
            Resolved::Border {
                fill,
                border,
                width,
            } => {
                if near_edge(pt, width, visited) {
                    border
                } else {
                    fill
                }
            }
        }
    }
}

/// Check whether a point is within `width` steps of an unfilled cell.
///
/// Cells out of bounds count as unfilled.
fn near_edge(pt: Point, width: i32, visited: &Visited) -> bool {
    (1..=width).any(|d| {
        [
            pt.offset(0, -d),
            pt.offset(d, 0),
            pt.offset(0, d),
            pt.offset(-d, 0),
        ]
        .iter()
        .any(|p| !visited.contains(*p))
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn red() -> SRgba8 {
        SRgba8::new(255, 0, 0, 255)
    }

    fn blue() -> SRgba8 {
        SRgba8::new(0, 0, 255, 255)
    }

    fn green() -> SRgba8 {
        SRgba8::new(0, 255, 0, 255)
    }

    fn no_visits() -> Visited {
        Visited::new(1, 1).unwrap()
    }

    #[test]
    fn solid() {
        let p = Picker::Solid(SRgba8::new(42, 128, 200, 255))
            .resolve(10, 10)
            .unwrap();
        let v = no_visits();
        let gray = SRgba8::new(1, 2, 3, 4);
        let clr = SRgba8::new(42, 128, 200, 255);
        assert_eq!(p.color_for(Point::new(0, 0), gray, &v), clr);
        assert_eq!(p.color_for(Point::new(999, 123), gray, &v), clr);
    }

    #[test]
    fn stripe() {
        let p = Picker::stripe(red(), blue(), 10).resolve(40, 40).unwrap();
        let v = no_visits();
        let c = SRgba8::default();
        assert_eq!(p.color_for(Point::new(0, 0), c, &v), red());
        assert_eq!(p.color_for(Point::new(3, 4), c, &v), red());
        assert_eq!(p.color_for(Point::new(5, 5), c, &v), blue());
        assert_eq!(p.color_for(Point::new(10, 10), c, &v), red());
        for x in 0..40 {
            for y in 0..40 {
                let expected = if (x + y) / 10 % 2 == 0 { red() } else { blue() };
                assert_eq!(p.color_for(Point::new(x, y), c, &v), expected);
            }
        }
    }

    #[test]
    fn stripe_checkerboard() {
        let p = Picker::stripe(red(), blue(), 1).resolve(2, 2).unwrap();
        let v = no_visits();
        let c = SRgba8::default();
        assert_eq!(p.color_for(Point::new(0, 0), c, &v), red());
        assert_eq!(p.color_for(Point::new(1, 0), c, &v), blue());
        assert_eq!(p.color_for(Point::new(0, 1), c, &v), blue());
        assert_eq!(p.color_for(Point::new(1, 1), c, &v), red());
    }

    #[test]
    fn stripe_zero_width() {
        let p = Picker::stripe(red(), blue(), 0);
        assert!(matches!(p.resolve(4, 4), Err(Error::InvalidStripeWidth)));
    }

    #[test]
    fn quarter() {
        let base = SRgba8::new(128, 128, 128, 255);
        let p = Picker::Quarter {
            color: base,
            brightness: 40,
            center: Point::new(50, 50),
        }
        .resolve(100, 100)
        .unwrap();
        let v = no_visits();
        let c = SRgba8::default();
        let tl = p.color_for(Point::new(10, 10), c, &v);
        let tr = p.color_for(Point::new(60, 10), c, &v);
        let bl = p.color_for(Point::new(10, 60), c, &v);
        let br = p.color_for(Point::new(60, 60), c, &v);
        assert_eq!(tl, base);
        assert_ne!(tl, tr);
        assert_ne!(tr, bl);
        assert_ne!(bl, br);
        assert_eq!(tr, adjust_luminance(base, 40.0 / 255.0));
        assert_eq!(br, adjust_luminance(base, 120.0 / 255.0));
        // center point belongs to the bottom-right quadrant
        assert_eq!(p.color_for(Point::new(50, 50), c, &v), br);
    }

    #[test]
    fn quarter_auto_center() {
        let base = SRgba8::new(100, 50, 50, 255);
        let p = Picker::quarter(base, 30).resolve(20, 10).unwrap();
        let v = no_visits();
        let c = SRgba8::default();
        assert_eq!(
            p.color_for(Point::new(9, 4), c, &v),
            adjust_luminance(base, 0.0)
        );
        assert_eq!(
            p.color_for(Point::new(10, 5), c, &v),
            adjust_luminance(base, 90.0 / 255.0)
        );
    }

    #[test]
    fn border() {
        let mut v = Visited::new(10, 10).unwrap();
        for y in 3..8 {
            for x in 3..8 {
                v.insert(Point::new(x, y));
            }
        }
        let c = SRgba8::default();
        let p = Picker::border(green(), red(), 1).resolve(10, 10).unwrap();
        assert_eq!(p.color_for(Point::new(5, 5), c, &v), green());
        assert_eq!(p.color_for(Point::new(3, 5), c, &v), red());
        let p = Picker::border(green(), red(), 2).resolve(10, 10).unwrap();
        assert_eq!(p.color_for(Point::new(5, 5), c, &v), green());
        assert_eq!(p.color_for(Point::new(4, 5), c, &v), red());
        let p = Picker::border(green(), red(), 3).resolve(10, 10).unwrap();
        assert_eq!(p.color_for(Point::new(5, 5), c, &v), red());
        let p = Picker::border(green(), red(), 0).resolve(10, 10).unwrap();
        assert_eq!(p.color_for(Point::new(3, 3), c, &v), green());
    }

    #[test]
    fn border_raster_edge() {
        let mut v = Visited::new(3, 3).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                v.insert(Point::new(x, y));
            }
        }
        let c = SRgba8::default();
        let p = Picker::border(green(), red(), 1).resolve(3, 3).unwrap();
        assert_eq!(p.color_for(Point::new(1, 1), c, &v), green());
        assert_eq!(p.color_for(Point::new(0, 1), c, &v), red());
        assert_eq!(p.color_for(Point::new(2, 2), c, &v), red());
    }
}
