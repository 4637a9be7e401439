// block.rs
//
// Copyright (c) 2024  tidefill developers
//
//! GIF file blocks written by the encoder
use crate::error::Result;
use crate::lzw::Compressor;
use std::io::Write;

/// Number of channels in a color table entry
const CHANNELS: usize = 3;

/// Maximum length of one data sub-block
const SUB_BLOCK_SZ: usize = 0xFF;

/// Color table existence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTableExistence {
    Absent,
    Present,
}

/// Color table configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTableConfig {
    existence: ColorTableExistence,
    table_len: usize, // must be between 2...256
}

impl Default for ColorTableConfig {
    fn default() -> Self {
        ColorTableConfig {
            existence: ColorTableExistence::Absent,
            table_len: 2,
        }
    }
}

impl ColorTableConfig {
    /// Create a new color table configuration.
    ///
    /// Length is rounded up to a power of two between 2 and 256.
    pub fn new(existence: ColorTableExistence, table_len: u16) -> Self {
        let table_len =
            (table_len as usize).max(2).next_power_of_two().min(256);
        ColorTableConfig {
            existence,
            table_len,
        }
    }

    /// Get the table size field (log2 of length, minus one)
    fn len_bits(&self) -> u8 {
        let sz = self.table_len;
        for b in 0..7 {
            if (sz >> (b + 1)) == 1 {
                return b;
            }
        }
        7
    }

    /// Get the number of bits per pixel index
    pub fn bits_per_pixel(&self) -> u8 {
        self.len_bits() + 1
    }
}

/// Block codes (signatures)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BlockCode {
    Extension_,
    ImageDesc_,
    Trailer_,
}

impl BlockCode {
    pub fn signature(&self) -> &'static [u8] {
        use self::BlockCode::*;
        match self {
            ImageDesc_ => b",", // (0x2C) Image separator
            Extension_ => b"!", // (0x21) Extension introducer
            Trailer_ => b";",   // (0x3B) GIF trailer
        }
    }
}

/// Extension codes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ExtensionCode {
    GraphicControl_,
    Application_,
}

impl From<ExtensionCode> for u8 {
    fn from(t: ExtensionCode) -> Self {
        use self::ExtensionCode::*;
        match t {
            GraphicControl_ => 0xF9,
            Application_ => 0xFF,
        }
    }
}

/// Write one little-endian 16-bit value
fn push_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Write data as length-prefixed sub-blocks, then a terminator
fn write_sub_blocks<W: Write>(w: &mut W, data: &[u8]) -> Result<()> {
    for b in data.chunks(SUB_BLOCK_SZ) {
        w.write_all(&[b.len() as u8])?; // block size
        w.write_all(b)?;
    }
    w.write_all(&[0])?; // block size
    Ok(())
}

/// File header
#[derive(Debug)]
pub struct Header {
    version: [u8; 3],
}

impl Default for Header {
    fn default() -> Self {
        Header { version: *b"89a" }
    }
}

impl Header {
    /// Get the version
    pub fn version(&self) -> [u8; 3] {
        self.version
    }

    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(b"GIF")?;
        w.write_all(&self.version())?;
        Ok(())
    }
}

/// Logical screen descriptor
#[derive(Debug, Default)]
pub struct LogicalScreenDesc {
    screen_width: u16,
    screen_height: u16,
    flags: u8,
}

impl LogicalScreenDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_RESOLUTION: u8 = 0b0111_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    pub fn with_screen_width(mut self, screen_width: u16) -> Self {
        self.screen_width = screen_width;
        self
    }
    pub fn screen_width(&self) -> u16 {
        self.screen_width
    }
    pub fn with_screen_height(mut self, screen_height: u16) -> Self {
        self.screen_height = screen_height;
        self
    }
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }
    pub fn flags(&self) -> u8 {
        self.flags
    }
    /// Set the global color table config, with full color resolution.
    pub fn with_color_table_config(mut self, tbl: &ColorTableConfig) -> Self {
        let mut flags = Self::COLOR_RESOLUTION;
        if tbl.existence == ColorTableExistence::Present {
            flags |= Self::COLOR_TABLE_PRESENT;
            flags |= tbl.len_bits() & Self::COLOR_TABLE_SIZE;
        }
        self.flags = flags;
        self
    }

    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        let mut buf = Vec::with_capacity(7);
        push_u16(&mut buf, self.screen_width());
        push_u16(&mut buf, self.screen_height());
        buf.push(self.flags());
        buf.push(0); // background color index
        buf.push(0); // pixel aspect ratio
        w.write_all(&buf)?;
        Ok(())
    }
}

/// Graphic control extension
///
/// Written with no disposal method and no transparent color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GraphicControl {
    delay_time_cs: u16, // delay in centiseconds (hundredths of a second)
}

impl GraphicControl {
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }
    pub fn set_delay_time_cs(&mut self, delay_time_cs: u16) {
        self.delay_time_cs = delay_time_cs;
    }

    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(BlockCode::Extension_.signature())?;
        let mut buf = Vec::with_capacity(7);
        buf.push(ExtensionCode::GraphicControl_.into());
        buf.push(4); // block size
        buf.push(0); // flags
        push_u16(&mut buf, self.delay_time_cs());
        buf.push(0); // transparent color index
        buf.push(0); // block size
        w.write_all(&buf)?;
        Ok(())
    }
}

/// Application extension
#[derive(Debug, Default)]
pub struct Application {
    app_data: Vec<Vec<u8>>, // sequence of sub-blocks
}

impl Application {
    /// Create a looping extension (zero means loop forever).
    pub fn with_loop_count(loop_count: u16) -> Self {
        let mut v = vec![1];
        v.extend_from_slice(&loop_count.to_le_bytes());
        let app_data = vec![b"NETSCAPE2.0".to_vec(), v];
        Application { app_data }
    }
    pub fn app_data(&self) -> &[Vec<u8>] {
        &self.app_data
    }
    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(BlockCode::Extension_.signature())?;
        w.write_all(&[ExtensionCode::Application_.into()])?;
        for c in self.app_data() {
            debug_assert!(c.len() < 256);
            w.write_all(&[c.len() as u8])?; // block size
            w.write_all(c)?;
        }
        w.write_all(&[0])?; // block size
        Ok(())
    }
}

/// Image descriptor
#[derive(Debug, Default)]
pub struct ImageDesc {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    flags: u8,
}

impl ImageDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    pub fn left(&self) -> u16 {
        self.left
    }
    pub fn top(&self) -> u16 {
        self.top
    }
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }
    pub fn width(&self) -> u16 {
        self.width
    }
    pub fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }
    pub fn height(&self) -> u16 {
        self.height
    }
    pub fn flags(&self) -> u8 {
        self.flags
    }
    pub fn with_color_table_config(mut self, tbl: &ColorTableConfig) -> Self {
        let mut flags = tbl.len_bits() & Self::COLOR_TABLE_SIZE;
        if tbl.existence == ColorTableExistence::Present {
            flags |= Self::COLOR_TABLE_PRESENT;
        }
        self.flags = flags;
        self
    }

    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(BlockCode::ImageDesc_.signature())?;
        let mut buf = Vec::with_capacity(9);
        push_u16(&mut buf, self.left());
        push_u16(&mut buf, self.top());
        push_u16(&mut buf, self.width());
        push_u16(&mut buf, self.height());
        buf.push(self.flags());
        w.write_all(&buf)?;
        Ok(())
    }
}

/// Local color table
#[derive(Debug, Default)]
pub struct LocalColorTable {
    colors: Vec<u8>,
}

impl LocalColorTable {
    pub fn with_colors(colors: &[u8]) -> Self {
        debug_assert_eq!(colors.len() % CHANNELS, 0);
        let colors = colors.to_vec();
        LocalColorTable { colors }
    }
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }

    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(self.colors())?;
        Ok(())
    }
}

/// Image data (uncompressed color indices)
#[derive(Debug)]
pub struct ImageData {
    min_code_size: u8,
    data: Vec<u8>,
}

impl ImageData {
    /// Create image data from color indices
    pub fn new(data: Vec<u8>, bits_per_pixel: u8) -> Self {
        let min_code_size = bits_per_pixel.clamp(2, 8);
        ImageData {
            min_code_size,
            data,
        }
    }
    /// Get the LZW minimum code size
    pub fn min_code_size(&self) -> u8 {
        self.min_code_size
    }
    /// Get the color indices
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        let mut compressed = Vec::new();
        let mut compressor = Compressor::new(self.min_code_size());
        compressor.compress(self.data(), &mut compressed)?;
        debug!(
            "  image data: {} indices -> {} bytes, {} table resets",
            self.data.len(),
            compressed.len(),
            compressor.resets()
        );
        w.write_all(&[self.min_code_size()])?;
        write_sub_blocks(w, &compressed)
    }
}

/// File trailer
#[derive(Debug, Default)]
pub struct Trailer {}

impl Trailer {
    fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(BlockCode::Trailer_.signature())?;
        Ok(())
    }
}

/// A block within a GIF file
#[derive(Debug)]
pub enum Block {
    Header(Header),
    LogicalScreenDesc(LogicalScreenDesc),
    GraphicControl(GraphicControl),
    Application(Application),
    ImageDesc(ImageDesc),
    LocalColorTable(LocalColorTable),
    ImageData(ImageData),
    Trailer(Trailer),
}

impl Block {
    /// Format the block to a writer
    pub(crate) fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        use self::Block::*;
        match self {
            Header(b) => b.format(w),
            LogicalScreenDesc(b) => b.format(w),
            GraphicControl(b) => b.format(w),
            Application(b) => b.format(w),
            ImageDesc(b) => b.format(w),
            LocalColorTable(b) => b.format(w),
            ImageData(b) => b.format(w),
            Trailer(b) => b.format(w),
        }
    }
}

impl From<Header> for Block {
    fn from(b: Header) -> Self {
        Block::Header(b)
    }
}

impl From<LogicalScreenDesc> for Block {
    fn from(b: LogicalScreenDesc) -> Self {
        Block::LogicalScreenDesc(b)
    }
}

impl From<GraphicControl> for Block {
    fn from(b: GraphicControl) -> Self {
        Block::GraphicControl(b)
    }
}

impl From<Application> for Block {
    fn from(b: Application) -> Self {
        Block::Application(b)
    }
}

impl From<ImageDesc> for Block {
    fn from(b: ImageDesc) -> Self {
        Block::ImageDesc(b)
    }
}

impl From<LocalColorTable> for Block {
    fn from(b: LocalColorTable) -> Self {
        Block::LocalColorTable(b)
    }
}

impl From<ImageData> for Block {
    fn from(b: ImageData) -> Self {
        Block::ImageData(b)
    }
}

impl From<Trailer> for Block {
    fn from(b: Trailer) -> Self {
        Block::Trailer(b)
    }
}
