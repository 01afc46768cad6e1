mod bits;
mod crc;

pub use self::bits::{
  take_bits, take_signed_bits, leading_zeros, count_slice, skip_to_byte,
  BitWriter,
};
pub use self::crc::{crc8, crc16};

use nom::IResult;

use crate::error::Error;

/// Fails a nom parser with an unrecoverable crate error.
pub fn failure<I, O>(error: Error) -> IResult<I, O, Error> {
  Err(nom::Err::Failure(error))
}

// Sign extend the lowest `bit_count` bits of `value` into a 64-bit signed
// number. A `bit_count` of zero always results in zero.
pub fn extend_sign(value: u64, bit_count: usize) -> i64 {
  debug_assert!(bit_count <= 64);

  if bit_count == 0 {
    0
  } else if bit_count >= 64 {
    value as i64
  } else {
    let shift = 64 - bit_count;

    ((value << shift) as i64) >> shift
  }
}

/// Maps a signed integer onto an unsigned one so that small magnitudes,
/// positive or negative, stay small: `0, -1, 1, -2, 2` become `0, 1, 2, 3, 4`.
#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
  ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of `zigzag_encode`.
#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
  ((value >> 1) as i64) ^ -((value & 1) as i64)
}

// Number of bits needed to store `value` as a two's complement number.
pub fn signed_bit_width(value: i64) -> usize {
  if value >= 0 {
    65 - value.leading_zeros() as usize
  } else {
    65 - (!value).leading_zeros() as usize
  }
}

/// MD5 of the interleaved samples, each stored little-endian in the
/// smallest number of whole bytes that holds `bits_per_sample` bits.
pub fn md5_signature<C>(channels: &[C], bits_per_sample: usize) -> [u8; 16]
 where C: AsRef<[i32]> {
  let bytes_per_sample = (bits_per_sample + 7) / 8;
  let samples          = channels.first().map_or(0, |c| c.as_ref().len());
  let mut context      = md5::Context::new();
  let mut interleaved  =
    Vec::with_capacity(samples * channels.len() * bytes_per_sample);

  for index in 0..samples {
    for channel in channels {
      let bytes = channel.as_ref()[index].to_le_bytes();

      interleaved.extend_from_slice(&bytes[0..bytes_per_sample]);
    }
  }

  context.consume(&interleaved);

  context.compute().0
}
