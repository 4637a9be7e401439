// encode.rs
//
// Copyright (c) 2024  tidefill developers
//
//! Animated GIF encoding
use crate::block::*;
use crate::error::{Error, Result};
use crate::quantize::{quantize, MAX_COLORS};
use pix::rgb::SRgba8;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Block encoder
pub struct BlockEnc<W: Write> {
    /// Writer for output data
    writer: W,
}

impl<W: Write> BlockEnc<W> {
    /// Create a new block encoder
    pub fn new(writer: W) -> Self {
        BlockEnc { writer }
    }

    /// Encode one block
    pub fn encode<B>(&mut self, block: B) -> Result<()>
    where
        B: Into<Block>,
    {
        block.into().format(&mut self.writer)
    }

    /// Flush the writer
    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Encoder state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Nothing written yet
    NotStarted,
    /// Header written; frames may follow
    Started,
    /// Trailer written
    Finished,
    /// A write failed; the output is incomplete
    Failed,
}

/// Animated GIF encoder
///
/// Calls must follow the order `begin`, `write_frame` (any number of times),
/// then `end`; anything else fails with `InvalidBlockSequence`.  After a
/// write error, every later call fails the same way.
///
/// ```
/// use pix::rgb::SRgba8;
/// use tidefill::Encoder;
///
/// # fn main() -> tidefill::Result<()> {
/// let mut enc = Encoder::new(Vec::new());
/// enc.begin(2, 1)?;
/// let red = SRgba8::new(255, 0, 0, 255);
/// enc.write_frame(&[red, red], 2, 1, 4)?;
/// enc.end()?;
/// let bytes = enc.into_inner();
/// assert_eq!(&bytes[..6], b"GIF89a");
/// # Ok(())
/// # }
/// ```
pub struct Encoder<W: Write> {
    /// Block encoder
    block_enc: BlockEnc<W>,
    /// Current state
    state: State,
    /// Number of frames written
    frames: usize,
}

impl Encoder<BufWriter<File>> {
    /// Create an encoder writing to a new file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Encoder::new(BufWriter::new(file)))
    }
}

impl<W: Write> Encoder<W> {
    /// Create a new GIF encoder.
    pub fn new(writer: W) -> Self {
        Encoder {
            block_enc: BlockEnc::new(writer),
            state: State::NotStarted,
            frames: 0,
        }
    }

    /// Get the number of frames written
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Write the header, screen descriptor and looping extension.
    pub fn begin(&mut self, width: u32, height: u32) -> Result<()> {
        if self.state != State::NotStarted {
            return Err(Error::InvalidBlockSequence);
        }
        let width = u16::try_from(width)?;
        let height = u16::try_from(height)?;
        debug!("screen: {}x{}", width, height);
        let res = self.write_screen(width, height);
        self.state = self.next_state(&res, State::Started);
        res
    }

    /// Write the header blocks
    fn write_screen(&mut self, width: u16, height: u16) -> Result<()> {
        self.block_enc.encode(Header::default())?;
        self.block_enc.encode(
            LogicalScreenDesc::default()
                .with_screen_width(width)
                .with_screen_height(height)
                .with_color_table_config(&ColorTableConfig::default()),
        )?;
        self.block_enc.encode(Application::with_loop_count(0))
    }

    /// Get the state following a block write
    fn next_state(&self, res: &Result<()>, ok: State) -> State {
        match res {
            Ok(()) => ok,
            Err(e) => {
                warn!("encoder failed: {}", e);
                State::Failed
            }
        }
    }

    /// Quantize and write one frame.
    ///
    /// * `pixels` Frame pixels in row-major order.
    /// * `delay_cs` Delay after the frame, in centiseconds.
    pub fn write_frame(
        &mut self,
        pixels: &[SRgba8],
        width: u32,
        height: u32,
        delay_cs: u16,
    ) -> Result<()> {
        if self.state != State::Started {
            return Err(Error::InvalidBlockSequence);
        }
        if width == 0
            || height == 0
            || pixels.len() != width as usize * height as usize
        {
            return Err(Error::InvalidRasterDimensions);
        }
        let width = u16::try_from(width)?;
        let height = u16::try_from(height)?;
        let (palette, indices) = quantize(pixels)?.into_parts();
        debug!(
            "frame {}: {}x{}, {} palette boxes",
            self.frames,
            width,
            height,
            palette.len()
        );
        let tbl =
            ColorTableConfig::new(ColorTableExistence::Present, MAX_COLORS as u16);
        let mut control = GraphicControl::default();
        control.set_delay_time_cs(delay_cs);
        let desc = ImageDesc::default()
            .with_width(width)
            .with_height(height)
            .with_color_table_config(&tbl);
        let table = LocalColorTable::with_colors(&palette.to_table());
        let data = ImageData::new(indices, tbl.bits_per_pixel());
        let res = self.write_image(control, desc, table, data);
        self.state = self.next_state(&res, State::Started);
        if res.is_ok() {
            self.frames += 1;
        }
        res
    }

    /// Write the blocks of one image
    fn write_image(
        &mut self,
        control: GraphicControl,
        desc: ImageDesc,
        table: LocalColorTable,
        data: ImageData,
    ) -> Result<()> {
        self.block_enc.encode(control)?;
        self.block_enc.encode(desc)?;
        self.block_enc.encode(table)?;
        self.block_enc.encode(data)
    }

    /// Write the trailer and flush the output.
    pub fn end(&mut self) -> Result<()> {
        if self.state != State::Started {
            return Err(Error::InvalidBlockSequence);
        }
        let res = self
            .block_enc
            .encode(Trailer::default())
            .and_then(|_| self.block_enc.flush());
        self.state = self.next_state(&res, State::Finished);
        res
    }

    /// Get the underlying writer
    pub fn into_inner(self) -> W {
        self.block_enc.writer
    }
}
