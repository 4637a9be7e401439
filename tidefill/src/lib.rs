// lib.rs      tidefill crate.
//
// Copyright (c) 2024  tidefill developers
//
//! Color-tolerant flood fill, with animated GIF output.
//!
//! A fill starts at a seed pixel and spreads to every 4-connected pixel whose
//! color is within a tolerance of the seed color.  Replacement colors come
//! from a [Picker].  Snapshots of the fill in progress are captured into an
//! [Animation], which can be encoded as a GIF.
//!
//! ## Example
//! ```
//! use pix::{rgb::SRgba8, Raster};
//! use tidefill::{flood_fill, FillConfig, Order, Picker, Point};
//!
//! # fn main() -> tidefill::Result<()> {
//! let raster = Raster::with_color(8, 8, SRgba8::new(90, 90, 90, 255));
//! let config = FillConfig::default()
//!     .with_seed(Point::new(3, 3))
//!     .with_order(Order::DepthFirst)
//!     .with_frame_freq(16)
//!     .with_picker(Picker::Solid(SRgba8::new(0, 0, 255, 255)));
//! let animation = flood_fill(&raster, &config)?;
//! assert_eq!(animation.len(), 5);
//! let gif = animation.encode_gif(Vec::new(), 4)?;
//! assert_eq!(&gif[..6], b"GIF89a");
//! # Ok(())
//! # }
//! ```
//!
//! [Animation]: struct.Animation.html
//! [Picker]: enum.Picker.html
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

mod animation;
pub mod block;
mod color;
mod encode;
mod error;
mod fill;
pub mod lzw;
mod picker;
mod quantize;

pub use crate::animation::Animation;
pub use crate::color::{adjust_luminance, distance, Hsl};
pub use crate::encode::{BlockEnc, Encoder};
pub use crate::error::{Error, Result};
pub use crate::fill::{
    fill_rgba, flood_fill, FillConfig, FloodFill, Order, Point, Visited,
    MAX_DIMENSION,
};
pub use crate::picker::{ColorPicker, Picker};
pub use crate::quantize::{quantize, Palette, Quantized, MAX_COLORS};
