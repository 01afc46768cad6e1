use nom::bits::complete::take;
use nom::IResult;

use crate::error::Error;
use crate::utility::extend_sign;

/// Takes `bit_count` bits, up to 64, most significant bit first, as an
/// unsigned number.
pub fn take_bits(input: (&[u8], usize), bit_count: usize)
                 -> IResult<(&[u8], usize), u64, Error> {
  debug_assert!(bit_count <= 64);

  take(bit_count)(input)
}

/// Takes `bit_count` bits as a two's complement number.
pub fn take_signed_bits(input: (&[u8], usize), bit_count: usize)
                        -> IResult<(&[u8], usize), i64, Error> {
  let (i, value) = take_bits(input, bit_count)?;

  Ok((i, extend_sign(value, bit_count)))
}

// Counts the zero bits before the next one bit, consuming both.
pub fn leading_zeros(input: (&[u8], usize))
                     -> IResult<(&[u8], usize), u64, Error> {
  let (bytes, mut offset) = input;

  let mut count = 0;

  for (index, byte) in bytes.iter().enumerate() {
    // Clear the number of offset bits
    let byte = byte << offset;

    if byte == 0 {
      count  += (8 - offset) as u64;
      offset  = 0;
    } else {
      let zeros = byte.leading_zeros() as usize;
      let end   = offset + zeros + 1;

      count += zeros as u64;

      return Ok(((&bytes[index + end / 8..], end % 8), count));
    }
  }

  Err(nom::Err::Error(Error::UnexpectedEndOfData))
}

/// Fills every item of `output` by running `parser` over `input`, one after
/// another.
pub fn count_slice<'a, T, F>(mut parser: F,
                             input: (&'a [u8], usize),
                             output: &mut [T])
                             -> IResult<(&'a [u8], usize), (), Error>
 where F: FnMut((&'a [u8], usize)) -> IResult<(&'a [u8], usize), T, Error> {
  let mut input = input;

  for item in output {
    let (i, value) = parser(input)?;

    *item = value;
    input = i;
  }

  Ok((input, ()))
}

/// Skips what is left of a partially read byte, returning the remaining
/// whole bytes.
#[inline]
pub fn skip_to_byte(input: (&[u8], usize)) -> &[u8] {
  match input {
    (bytes, 0)                      => bytes,
    (bytes, _) if bytes.is_empty()  => bytes,
    (bytes, _)                      => &bytes[1..],
  }
}

/// Growable buffer that writes bits, most significant bit first.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
  bytes: Vec<u8>,
  // Bits in the last byte of `bytes` that are already used, zero when the
  // writer is byte aligned.
  used: usize,
}

impl BitWriter {
  pub fn new() -> Self {
    BitWriter::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    BitWriter {
      bytes: Vec::with_capacity(capacity),
      used: 0,
    }
  }

  /// Total number of bits written.
  #[inline]
  pub fn len_bits(&self) -> usize {
    if self.used == 0 {
      self.bytes.len() * 8
    } else {
      (self.bytes.len() - 1) * 8 + self.used
    }
  }

  #[inline]
  pub fn is_aligned(&self) -> bool {
    self.used == 0
  }

  /// Appends the lowest `bit_count` bits of `value`.
  pub fn write_bits(&mut self, value: u64, bit_count: usize) {
    debug_assert!(bit_count <= 64);

    let mut left = bit_count;

    while left > 0 {
      if self.used == 0 {
        self.bytes.push(0);
      }

      let available = 8 - self.used;
      let taken     = if left < available { left } else { available };
      let shift     = left - taken;
      let mask      = (1u16 << taken) - 1;
      let bits      = ((value >> shift) as u16 & mask) as u8;

      if let Some(last) = self.bytes.last_mut() {
        *last |= bits << (available - taken);
      }

      left      -= taken;
      self.used  = (self.used + taken) % 8;
    }
  }

  /// Appends `value` as a `bit_count` wide two's complement number.
  #[inline]
  pub fn write_signed_bits(&mut self, value: i64, bit_count: usize) {
    self.write_bits(value as u64, bit_count)
  }

  /// Appends `zeros` zero bits followed by a single one bit.
  pub fn write_unary(&mut self, zeros: u64) {
    let mut left = zeros;

    while left >= 32 {
      self.write_bits(0, 32);
      left -= 32;
    }

    self.write_bits(1, left as usize + 1);
  }

  /// Pads the current byte with zero bits.
  pub fn align_to_byte(&mut self) {
    self.used = 0;
  }

  /// Bytes written so far; a partially written byte is zero padded.
  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.bytes
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::collection::vec;
  use proptest::prelude::*;

  // Bits left in a bit level input.
  fn remaining_bits(input: (&[u8], usize)) -> usize {
    input.0.len() * 8 - input.1
  }

  #[test]
  fn test_take_bits() {
    let bytes = [0b10110011, 0b01010101, 0xff, 0x00];
    let input = (&bytes[..], 0);

    let (input, first)  = take_bits(input, 1).unwrap();
    let (input, second) = take_bits(input, 3).unwrap();
    let (input, third)  = take_bits(input, 8).unwrap();
    let (input, fourth) = take_bits(input, 12).unwrap();

    assert_eq!([first, second, third, fourth],
               [1, 0b011, 0b00110101, 0b010111111111]);
    assert_eq!(remaining_bits(input), 8);

    let (input, zero) = take_bits(input, 0).unwrap();

    assert_eq!(zero, 0);
    assert_eq!(take_bits(input, 8).unwrap(), ((&[][..], 0), 0));
    assert!(matches!(take_bits(input, 9),
                     Err(nom::Err::Error(Error::UnexpectedEndOfData))));
  }

  #[test]
  fn test_take_signed_bits() {
    let bytes = [0b11111000, 0b01111111];
    let input = (&bytes[..], 0);

    let (input, first)  = take_signed_bits(input, 5).unwrap();
    let (input, second) = take_signed_bits(input, 3).unwrap();
    let (input, third)  = take_signed_bits(input, 8).unwrap();

    assert_eq!([first, second, third], [-1, 0, 127]);
    assert_eq!(remaining_bits(input), 0);
  }

  #[test]
  fn test_leading_zeros() {
    let inputs  = [ (&[0b10000000][..], 0)
                  , (&[0b00000001][..], 0)
                  , (&[0b00000000, 0b10000000][..], 0)
                  , (&[0b00000000, 0b00000001][..], 0)
                  , (&[0b11000000, 0b00100000][..], 2)
                  ];
    let results = [(0, 7), (7, 0), (8, 7), (15, 0), (8, 5)];

    for (input, result) in inputs.iter().zip(&results) {
      let (remaining, zeros) = leading_zeros(*input).unwrap();

      assert_eq!((zeros, remaining_bits(remaining)), *result);
    }

    assert!(matches!(leading_zeros((&[0b00000000][..], 0)),
                     Err(nom::Err::Error(Error::UnexpectedEndOfData))));
    assert!(matches!(leading_zeros((&[0b11100000][..], 3)),
                     Err(nom::Err::Error(Error::UnexpectedEndOfData))));
  }

  #[test]
  fn test_count_slice() {
    let bytes      = [0b11100101, 0b10000000];
    let mut output = [0; 3];

    let (input, _) = count_slice(|i| take_signed_bits(i, 3),
                                 (&bytes[..], 0), &mut output).unwrap();

    assert_eq!(output, [-1, 1, 3]);
    assert_eq!(input, (&bytes[1..], 1));
    assert!(count_slice(|i| take_bits(i, 5), input, &mut [0; 2]).is_err());
  }

  #[test]
  fn test_skip_to_byte() {
    let bytes = [1, 2, 3];

    assert_eq!(skip_to_byte((&bytes[..], 0)), &[1, 2, 3]);
    assert_eq!(skip_to_byte((&bytes[..], 5)), &[2, 3]);
    assert_eq!(skip_to_byte((&[][..], 0)), &[]);
  }

  #[test]
  fn test_write_bits() {
    let mut writer = BitWriter::new();

    writer.write_bits(1, 1);
    writer.write_bits(0b011, 3);
    writer.write_bits(0b00110101, 8);
    writer.write_bits(0b0101, 4);

    assert_eq!(writer.len_bits(), 16);
    assert_eq!(writer.as_bytes(), &[0b10110011, 0b01010101]);

    writer.write_bits(0b1, 1);
    writer.align_to_byte();

    assert_eq!(writer.into_bytes(), vec![0b10110011, 0b01010101, 0x80]);
  }

  #[test]
  fn test_write_signed_and_unary() {
    let mut writer = BitWriter::new();

    writer.write_signed_bits(-1, 5);
    writer.write_unary(2);
    writer.write_unary(40);
    writer.align_to_byte();

    let bytes = writer.into_bytes();

    let (input, sample) = take_signed_bits((&bytes[..], 0), 5).unwrap();
    let (input, first)  = leading_zeros(input).unwrap();
    let (_, second)     = leading_zeros(input).unwrap();

    assert_eq!((sample, first, second), (-1, 2, 40));
  }

  #[test]
  fn test_wide_values() {
    let mut writer = BitWriter::new();

    writer.write_signed_bits(-4294967296, 33);
    writer.write_bits(0xdeadbeefcafe, 48);

    let bytes = writer.into_bytes();

    let (input, wide) = take_signed_bits((&bytes[..], 0), 33).unwrap();
    let (_, value)    = take_bits(input, 48).unwrap();

    assert_eq!(wide, -4294967296);
    assert_eq!(value, 0xdeadbeefcafe);
  }

  proptest! {
    #[test]
    fn bits_round_trip(fields in vec((any::<u64>(), 0usize..=64), 1..50)) {
      let mut writer = BitWriter::new();

      for &(value, bit_count) in &fields {
        writer.write_bits(value, bit_count);
      }

      let total = writer.len_bits();

      writer.align_to_byte();

      let bytes     = writer.into_bytes();
      let mut input = (&bytes[..], 0);

      prop_assert_eq!(total, fields.iter().map(|field| field.1).sum::<usize>());

      for &(value, bit_count) in &fields {
        let mask = if bit_count == 64 { !0 } else { (1u64 << bit_count) - 1 };

        let (i, read) = take_bits(input, bit_count).unwrap();

        prop_assert_eq!(read, value & mask);

        input = i;
      }

      prop_assert!(remaining_bits(input) < 8);
    }

    #[test]
    fn signed_bits_round_trip(value in any::<i32>(), extra in 0usize..=32) {
      let bit_count  = 32 + extra;
      let mut writer = BitWriter::new();

      writer.write_signed_bits(value as i64, bit_count);
      writer.align_to_byte();

      let bytes = writer.into_bytes();

      prop_assert_eq!(take_signed_bits((&bytes[..], 0), bit_count).unwrap().1,
                      value as i64);
    }
  }
}
