// error.rs
//
// Copyright (c) 2024  tidefill developers
//
use std::collections::TryReserveError;
use std::fmt;
use std::io;
use std::num::TryFromIntError;

/// Errors encountered while filling or encoding
#[derive(Debug)]
pub enum Error {
    /// A wrapped I/O error.
    Io(io::Error),
    /// Integer out of bounds (dimension does not fit a 16-bit GIF field).
    TryFromInt(TryFromIntError),
    /// Allocation of a raster, palette or compressed buffer failed.
    OutOfMemory(TryReserveError),
    /// Tolerance is negative or not a finite number.
    InvalidTolerance,
    /// Stripe width must be at least one pixel.
    InvalidStripeWidth,
    /// Raster dimensions are zero, too large, or do not match the buffer.
    InvalidRasterDimensions,
    /// Encoder calls made in an invalid sequence.
    InvalidBlockSequence,
    /// Frame index past the end of an
    /// [Animation](struct.Animation.html).
    FrameOutOfRange,
    /// [Animation](struct.Animation.html) contains no frames.
    NoFrames,
}

/// Tidefill result type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(fmt),
            Error::TryFromInt(err) => err.fmt(fmt),
            Error::OutOfMemory(err) => err.fmt(fmt),
            Error::InvalidTolerance => {
                write!(fmt, "tolerance must be a non-negative number")
            }
            Error::InvalidStripeWidth => {
                write!(fmt, "stripe width must be at least 1")
            }
            Error::InvalidRasterDimensions => {
                write!(fmt, "invalid raster dimensions")
            }
            Error::InvalidBlockSequence => {
                write!(fmt, "encoder calls out of sequence")
            }
            Error::FrameOutOfRange => write!(fmt, "frame index out of range"),
            Error::NoFrames => write!(fmt, "animation has no frames"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::TryFromInt(ref err) => Some(err),
            Error::OutOfMemory(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<TryFromIntError> for Error {
    fn from(err: TryFromIntError) -> Self {
        Error::TryFromInt(err)
    }
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Self {
        Error::OutOfMemory(err)
    }
}

impl Error {
    /// Check whether the error was caused by the caller's input.
    ///
    /// Resource and I/O failures may succeed on retry; configuration
    /// errors will not.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::TryFromInt(_)
                | Error::InvalidTolerance
                | Error::InvalidStripeWidth
                | Error::InvalidRasterDimensions
        )
    }
}
