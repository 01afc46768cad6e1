use nom::error::{ErrorKind as NomErrorKind, ParseError};
use thiserror::Error;

use std::io;

/// Errors produced while decoding or encoding a FLAC stream.
///
/// Errors raised inside a single frame are recoverable: the stream decoder
/// skips the frame and searches for the next sync code. Use
/// [`Error::is_fatal`] to tell the two groups apart.
#[derive(Debug, Error)]
pub enum Error {
  #[error("stream doesn't start with the `fLaC` marker")]
  InvalidMagic,
  #[error("stream has no StreamInfo metadata block")]
  MissingStreamInfo,
  #[error("StreamInfo block is malformed")]
  InvalidStreamInfo,
  #[error("unexpected end of data")]
  UnexpectedEndOfData,
  #[error("invalid frame sync code")]
  InvalidSyncCode,
  #[error("frame header CRC-8 mismatch: expected {expected:#04x}, got {actual:#04x}")]
  HeaderCrcMismatch { expected: u8, actual: u8 },
  #[error("frame CRC-16 mismatch: expected {expected:#06x}, got {actual:#06x}")]
  FrameCrcMismatch { expected: u16, actual: u16 },
  #[error("reserved block size code")]
  ReservedBlockSize,
  #[error("reserved sample rate code")]
  ReservedSampleRate,
  #[error("reserved sample size code")]
  ReservedSampleSize,
  #[error("reserved channel assignment code {0}")]
  ReservedChannelAssignment(u8),
  #[error("frame has {found} channels, stream has {expected}")]
  ChannelMismatch { expected: u8, found: u8 },
  #[error("malformed frame or sample number")]
  InvalidNumber,
  #[error("subframe padding bit isn't zero")]
  InvalidSubframePadding,
  #[error("{wasted_bits} wasted bits with only {bits_per_sample} bits per sample")]
  InvalidWastedBits { wasted_bits: u32, bits_per_sample: usize },
  #[error("invalid subframe type {0:#08b}")]
  InvalidSubframeType(u8),
  #[error("invalid quantized coefficient precision")]
  InvalidLpcPrecision,
  #[error("negative quantized coefficient shift {0}")]
  InvalidLpcShift(i8),
  #[error("invalid residual coding method {0}")]
  InvalidResidualMethod(u8),
  #[error("partition order {order} doesn't fit a block of {block_size} samples")]
  InvalidPartitionOrder { order: u32, block_size: usize },
  #[error("residual doesn't fit in 64 bits")]
  ResidualOverflow,
  #[error("invalid parameter: {0}")]
  InvalidParameter(String),
  #[error("no samples to encode")]
  EmptyInput,
  #[error("channels don't have the same number of samples")]
  MismatchedChannelLengths,
  #[error("decoded samples don't match the encoder input")]
  VerifyFailed,
  #[error("parser error: {0:?}")]
  Parser(NomErrorKind),
  #[error("IO error: {0}")]
  Io(#[from] io::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
  /// Returns true when the error prevents any further decoding of the
  /// stream, as opposed to errors that only invalidate the current frame.
  pub fn is_fatal(&self) -> bool {
    match *self {
      Error::InvalidMagic             |
      Error::MissingStreamInfo        |
      Error::InvalidStreamInfo        |
      Error::InvalidParameter(_)      |
      Error::EmptyInput               |
      Error::MismatchedChannelLengths |
      Error::VerifyFailed             |
      Error::Io(_)                    => true,
      _                               => false,
    }
  }
}

impl<I> ParseError<I> for Error {
  fn from_error_kind(_: I, kind: NomErrorKind) -> Self {
    match kind {
      NomErrorKind::Eof => Error::UnexpectedEndOfData,
      _                 => Error::Parser(kind),
    }
  }

  fn append(_: I, _: NomErrorKind, other: Self) -> Self {
    other
  }
}

impl From<nom::Err<Error>> for Error {
  fn from(error: nom::Err<Error>) -> Self {
    match error {
      nom::Err::Error(e) | nom::Err::Failure(e) => e,
      nom::Err::Incomplete(_)                   => Error::UnexpectedEndOfData,
    }
  }
}
