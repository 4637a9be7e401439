// image.rs
//
// Copyright (c) 2024  tidefill developers
//
//! PNG loading and saving
use pix::rgb::SRgba8;
use pix::Raster;
use png::{BitDepth, ColorType, Transformations};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// PNG error, with the path of the file
#[derive(Debug)]
pub struct Error {
    path: PathBuf,
    kind: ErrorKind,
}

/// Kind of PNG error
#[derive(Debug)]
pub enum ErrorKind {
    /// I/O error
    Io(io::Error),
    /// Decoding error
    Decode(png::DecodingError),
    /// Encoding error
    Encode(png::EncodingError),
    /// Color type with no RGBA conversion
    UnsupportedColor(ColorType),
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let path = self.path.display();
        match &self.kind {
            ErrorKind::Io(e) => write!(fmt, "{path}: {e}"),
            ErrorKind::Decode(e) => write!(fmt, "{path}: {e}"),
            ErrorKind::Encode(e) => write!(fmt, "{path}: {e}"),
            ErrorKind::UnsupportedColor(c) => {
                write!(fmt, "{path}: unsupported color type {c:?}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(e) => Some(e),
            ErrorKind::Decode(e) => Some(e),
            ErrorKind::Encode(e) => Some(e),
            ErrorKind::UnsupportedColor(_) => None,
        }
    }
}

impl Error {
    fn new<K: Into<ErrorKind>>(path: &Path, kind: K) -> Self {
        Error {
            path: path.to_path_buf(),
            kind: kind.into(),
        }
    }
}

impl From<io::Error> for ErrorKind {
    fn from(e: io::Error) -> Self {
        ErrorKind::Io(e)
    }
}

impl From<png::DecodingError> for ErrorKind {
    fn from(e: png::DecodingError) -> Self {
        ErrorKind::Decode(e)
    }
}

impl From<png::EncodingError> for ErrorKind {
    fn from(e: png::EncodingError) -> Self {
        ErrorKind::Encode(e)
    }
}

/// Load a PNG file as an RGBA raster.
///
/// Palette, gray and 16-bit images are converted to 8-bit RGBA.
pub fn load(path: &Path) -> Result<Raster<SRgba8>, Error> {
    load_rgba(path).map_err(|kind| Error::new(path, kind))
}

fn load_rgba(path: &Path) -> Result<Raster<SRgba8>, ErrorKind> {
    let file = File::open(path)?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let bytes = &buf[..info.buffer_size()];
    let pixels: Vec<SRgba8> = match info.color_type {
        ColorType::Rgba => bytes
            .chunks_exact(4)
            .map(|c| SRgba8::new(c[0], c[1], c[2], c[3]))
            .collect(),
        ColorType::Rgb => bytes
            .chunks_exact(3)
            .map(|c| SRgba8::new(c[0], c[1], c[2], 255))
            .collect(),
        ColorType::GrayscaleAlpha => bytes
            .chunks_exact(2)
            .map(|c| SRgba8::new(c[0], c[0], c[0], c[1]))
            .collect(),
        ColorType::Grayscale => {
            bytes.iter().map(|v| SRgba8::new(*v, *v, *v, 255)).collect()
        }
        ct => return Err(ErrorKind::UnsupportedColor(ct)),
    };
    debug!(
        "{:?}: {}x{} {:?}",
        path, info.width, info.height, info.color_type
    );
    Ok(Raster::with_pixels(info.width, info.height, pixels))
}

/// Save an RGBA raster as a PNG file.
pub fn save(path: &Path, raster: &Raster<SRgba8>) -> Result<(), Error> {
    save_rgba(path, raster).map_err(|kind| Error::new(path, kind))
}

fn save_rgba(path: &Path, raster: &Raster<SRgba8>) -> Result<(), ErrorKind> {
    let file = File::create(path)?;
    let mut encoder =
        png::Encoder::new(BufWriter::new(file), raster.width(), raster.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(raster.as_u8_slice())?;
    writer.finish()?;
    Ok(())
}
