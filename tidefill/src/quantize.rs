// quantize.rs
//
// Copyright (c) 2024  tidefill developers
//
//! Median-cut palette quantization
use crate::color::channels;
use crate::error::Result;
use pix::rgb::{Rgb, SRgb8, SRgba8};

/// Maximum number of palette entries
pub const MAX_COLORS: usize = 256;

/// Color sample, tagged with its position in the source frame
#[derive(Clone, Copy, Debug)]
struct Sample {
    /// Red, green and blue channels
    rgb: [u8; 3],
    /// Index of pixel in source frame
    pos: usize,
}

/// Box of samples in RGB space
#[derive(Clone, Copy, Debug)]
struct ColorBox {
    /// First sample
    start: usize,
    /// Number of samples
    count: usize,
    /// Minimum value of each channel
    min: [u8; 3],
    /// Maximum value of each channel
    max: [u8; 3],
}

impl ColorBox {
    /// Create a box bounding a run of samples
    fn new(samples: &[Sample], start: usize, count: usize) -> Self {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for s in &samples[start..start + count] {
            for ch in 0..3 {
                min[ch] = min[ch].min(s.rgb[ch]);
                max[ch] = max[ch].max(s.rgb[ch]);
            }
        }
        ColorBox {
            start,
            count,
            min,
            max,
        }
    }

    /// Get the range of one channel
    fn range(&self, ch: usize) -> u8 {
        self.max[ch].saturating_sub(self.min[ch])
    }

    /// Get the largest channel range
    fn max_range(&self) -> u8 {
        self.range(0).max(self.range(1)).max(self.range(2))
    }

    /// Get the channel with the widest range (red wins ties, then green)
    fn widest_channel(&self) -> usize {
        let (r, g, b) = (self.range(0), self.range(1), self.range(2));
        if r >= g && r >= b {
            0
        } else if g >= b {
            1
        } else {
            2
        }
    }

    /// Get the samples in the box
    fn samples<'a>(&self, samples: &'a [Sample]) -> &'a [Sample] {
        &samples[self.start..self.start + self.count]
    }

    /// Get the truncated mean color
    fn mean(&self, samples: &[Sample]) -> SRgb8 {
        let mut sum = [0u64; 3];
        for s in self.samples(samples) {
            for ch in 0..3 {
                sum[ch] += u64::from(s.rgb[ch]);
            }
        }
        let n = self.count.max(1) as u64;
        SRgb8::new((sum[0] / n) as u8, (sum[1] / n) as u8, (sum[2] / n) as u8)
    }
}

/// Palette of up to 256 colors
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    /// Color entries, padded with black to 256
    colors: Vec<SRgb8>,
    /// Number of entries in use
    used: usize,
}

impl Palette {
    /// Get the number of entries in use
    pub fn len(&self) -> usize {
        self.used
    }

    /// Check if no entries are in use
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Get an entry
    pub fn entry(&self, i: usize) -> Option<SRgb8> {
        self.colors.get(i).copied()
    }

    /// Get all entries, including black padding
    pub fn colors(&self) -> &[SRgb8] {
        &self.colors
    }

    /// Get the full table as packed RGB bytes (768 bytes)
    pub fn to_table(&self) -> Vec<u8> {
        self.colors
            .iter()
            .flat_map(|c| {
                [
                    u8::from(Rgb::red(*c)),
                    u8::from(Rgb::green(*c)),
                    u8::from(Rgb::blue(*c)),
                ]
            })
            .collect()
    }
}

/// Frame reduced to a palette plus one index per pixel
#[derive(Clone, Debug)]
pub struct Quantized {
    palette: Palette,
    indices: Vec<u8>,
}

impl Quantized {
    /// Get the palette
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Get the color indices, in pixel order
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Split into palette and indices
    pub fn into_parts(self) -> (Palette, Vec<u8>) {
        (self.palette, self.indices)
    }
}

/// Select the box to split next, if any.
///
/// Only boxes with at least two samples and a non-zero range qualify; the
/// first box with the strictly largest range wins.
fn splittable(boxes: &[ColorBox]) -> Option<usize> {
    let mut best = None;
    let mut best_range = 0;
    for (i, b) in boxes.iter().enumerate() {
        if b.count < 2 {
            continue;
        }
        let range = b.max_range();
        if range > best_range {
            best_range = range;
            best = Some(i);
        }
    }
    best
}

/// Quantize a frame with median-cut.
///
/// Each pixel's index is the box it ended up in; it is not remapped to the
/// nearest averaged color.  Alpha is ignored.
pub fn quantize(pixels: &[SRgba8]) -> Result<Quantized> {
    let mut samples = Vec::new();
    samples.try_reserve_exact(pixels.len())?;
    samples.extend(pixels.iter().enumerate().map(|(pos, p)| {
        let [r, g, b, _] = channels(*p);
        Sample { rgb: [r, g, b], pos }
    }));
    let mut boxes = Vec::with_capacity(MAX_COLORS);
    if !samples.is_empty() {
        boxes.push(ColorBox::new(&samples, 0, samples.len()));
    }
    while boxes.len() < MAX_COLORS {
        let Some(best) = splittable(&boxes) else {
            break;
        };
        let b = boxes[best];
        let ch = b.widest_channel();
        samples[b.start..b.start + b.count].sort_by_key(|s| s.rgb[ch]);
        let half = b.count / 2;
        boxes[best] = ColorBox::new(&samples, b.start, half);
        boxes.push(ColorBox::new(&samples, b.start + half, b.count - half));
    }
    let mut colors = Vec::with_capacity(MAX_COLORS);
    colors.extend(boxes.iter().map(|b| b.mean(&samples)));
    colors.resize(MAX_COLORS, SRgb8::new(0, 0, 0));
    let mut indices = Vec::new();
    indices.try_reserve_exact(pixels.len())?;
    indices.resize(pixels.len(), 0);
    for (i, b) in boxes.iter().enumerate() {
        for s in b.samples(&samples) {
            indices[s.pos] = i as u8;
        }
    }
    let palette = Palette {
        colors,
        used: boxes.len(),
    };
    Ok(Quantized { palette, indices })
}
