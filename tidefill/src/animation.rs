// animation.rs
//
// Copyright (c) 2024  tidefill developers
//
//! Captured fill frames
use crate::encode::Encoder;
use crate::error::{Error, Result};
use crate::fill::copy_raster;
use pix::rgb::SRgba8;
use pix::Raster;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Ordered sequence of raster snapshots.
///
/// Frames are copies, in capture order; the last one is the completed fill.
#[derive(Default)]
pub struct Animation {
    frames: Vec<Raster<SRgba8>>,
}

impl Animation {
    /// Append a copy of a raster
    pub fn push(&mut self, raster: &Raster<SRgba8>) -> Result<()> {
        self.frames.try_reserve(1)?;
        self.frames.push(copy_raster(raster)?);
        Ok(())
    }

    /// Get the number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if there are no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get one frame
    pub fn frame(&self, index: usize) -> Result<&Raster<SRgba8>> {
        self.frames.get(index).ok_or(Error::FrameOutOfRange)
    }

    /// Get the final frame
    pub fn final_frame(&self) -> Result<&Raster<SRgba8>> {
        self.frames.last().ok_or(Error::NoFrames)
    }

    /// Get an iterator of all frames
    pub fn frames(&self) -> impl Iterator<Item = &Raster<SRgba8>> {
        self.frames.iter()
    }

    /// Encode all frames as a looping GIF.
    ///
    /// * `delay_cs` Delay between frames, in centiseconds.
    pub fn encode_gif<W: Write>(&self, writer: W, delay_cs: u16) -> Result<W> {
        let mut enc = Encoder::new(writer);
        self.encode_frames(&mut enc, delay_cs)?;
        Ok(enc.into_inner())
    }

    /// Write all frames to a GIF file.
    ///
    /// A partially written file is removed on error.  Nothing is removed
    /// if the file could not be created.
    pub fn write_gif<P: AsRef<Path>>(&self, path: P, delay_cs: u16) -> Result<()> {
        let path = path.as_ref();
        if self.is_empty() {
            return Err(Error::NoFrames);
        }
        let mut enc = Encoder::create(path)?;
        let res = self.encode_frames(&mut enc, delay_cs);
        drop(enc);
        if res.is_err() {
            if let Err(e) = fs::remove_file(path) {
                warn!("removing {:?}: {}", path, e);
            }
        }
        res
    }

    /// Encode all frames with an encoder
    fn encode_frames<W: Write>(
        &self,
        enc: &mut Encoder<W>,
        delay_cs: u16,
    ) -> Result<()> {
        let first = self.frames.first().ok_or(Error::NoFrames)?;
        enc.begin(first.width(), first.height())?;
        for frame in &self.frames {
            enc.write_frame(
                frame.pixels(),
                frame.width(),
                frame.height(),
                delay_cs,
            )?;
        }
        enc.end()?;
        debug!("encoded {} frames", enc.frames());
        Ok(())
    }
}
