use nom::bytes::complete::take;
use nom::number::complete::{be_u8, be_u16};
use nom::IResult;

use crate::error::Error;
use crate::frame::{
  SYNC_CODE,
  ChannelAssignment, NumberType,
  Frame,
  Header, Footer,
};
use crate::metadata::StreamInfo;
use crate::subframe::subframe_parser;
use crate::utility::{crc8, crc16, failure, skip_to_byte};

/// Returns true when `bytes` starts with a frame sync code: `0xff` followed
/// by `0b1111100x`.
#[inline]
pub fn is_sync_code(bytes: &[u8]) -> bool {
  bytes.len() >= 2 && bytes[0] == 0xff && (bytes[1] & 0xfe) == 0xf8
}

/// Parses an audio frame, checking both the header's CRC-8 and the frame's
/// CRC-16.
pub fn frame_parser<'a>(input: &'a [u8], stream_info: &StreamInfo)
                        -> IResult<&'a [u8], Frame, Error> {
  let (i, frame_header) = header(input, stream_info)?;

  let channels      = frame_header.channels as usize;
  let mut subframes = Vec::with_capacity(channels);
  let mut bits      = (i, 0);

  for channel in 0..channels {
    let (rest, subframe) = subframe_parser(bits, &frame_header, channel)?;

    subframes.push(subframe);

    bits = rest;
  }

  // Subframes are padded to a whole byte before the footer.
  let (i, frame_footer) = footer(skip_to_byte(bits))?;

  // All frame bytes before the crc-16
  let end         = (input.len() - i.len()) - 2;
  let Footer(crc) = frame_footer;
  let actual      = crc16(&input[0..end]);

  if actual != crc {
    return failure(Error::FrameCrcMismatch {
      expected: crc,
      actual: actual,
    });
  }

  Ok((i, Frame {
    header: frame_header,
    subframes: subframes,
    footer: frame_footer,
  }))
}

// Parses the first two bytes of a frame header. There are two things that
// need to be valid inside these two bytes, the 14 bit sync code and the
// following bit must be zero. The last bit is whether or not the block size
// is fixed or varied.
pub fn blocking_strategy(input: &[u8]) -> IResult<&[u8], bool, Error> {
  let (i, bytes) = take(2usize)(input)?;

  let sync_code = ((bytes[0] as u16) << 6) | ((bytes[1] as u16) >> 2);
  let is_valid  = sync_code == SYNC_CODE && ((bytes[1] >> 1) & 0b01) == 0;

  if is_valid {
    let is_variable_block_size = (bytes[1] & 0b01) == 1;

    Ok((i, is_variable_block_size))
  } else {
    failure(Error::InvalidSyncCode)
  }
}

// Parses the third byte of a frame header. There are two four bit values
// that can't be a certain value. For block size bits, it can't be zero
// because that value is reserved. And sample rate bits can't be 0b1111 to
// prevent sync code fooling.
pub fn block_sample(input: &[u8]) -> IResult<&[u8], (u8, u8), Error> {
  let (i, byte) = be_u8(input)?;

  let block_byte  = byte >> 4;
  let sample_byte = byte & 0b1111;

  if block_byte == 0b0000 {
    failure(Error::ReservedBlockSize)
  } else if sample_byte == 0b1111 {
    failure(Error::ReservedSampleRate)
  } else {
    Ok((i, (block_byte, sample_byte)))
  }
}

// Parses the fourth byte of a frame header. There are three values that
// need validation within the byte. First is the channel assignment bits
// which can't be more than 0b1010. Second is the sample size bits that
// can't equal 0b011. Last is the final bit must be a zero.
pub fn channel_bits(input: &[u8])
                    -> IResult<&[u8], (ChannelAssignment, u8, u8), Error> {
  let (i, byte) = be_u8(input)?;

  let mut channels       = 2;
  let channel_byte       = byte >> 4;
  let channel_assignment = match channel_byte {
    0b0000..=0b0111 => {
      channels = channel_byte + 1;

      ChannelAssignment::Independent
    }
    0b1000          => ChannelAssignment::LeftSide,
    0b1001          => ChannelAssignment::RightSide,
    0b1010          => ChannelAssignment::MidpointSide,
    _               => {
      return failure(Error::ReservedChannelAssignment(channel_byte));
    }
  };
  let size_byte = (byte >> 1) & 0b0111;

  if size_byte == 0b0011 || (byte & 0b01) != 0 {
    failure(Error::ReservedSampleSize)
  } else {
    Ok((i, (channel_assignment, channels, size_byte)))
  }
}

// Similar to the way UTF-8 strings are parsed, only extends to UCS-2 when
// it is a larger sized header. When we hit the branch that check for the
// boolean `is_u64` is when the UCS-2 extension happens and all other
// branches are valid UTF-8 headers.
pub fn utf8_header(input: &[u8], is_u64: bool)
                   -> IResult<&[u8], (usize, u8), Error> {
  let (i, byte) = be_u8(input)?;

  let header = match byte {
    0b00000000..=0b01111111 => Some((0, byte)),
    0b11000000..=0b11011111 => Some((1, byte & 0b00011111)),
    0b11100000..=0b11101111 => Some((2, byte & 0b00001111)),
    0b11110000..=0b11110111 => Some((3, byte & 0b00000111)),
    0b11111000..=0b11111011 => Some((4, byte & 0b00000011)),
    0b11111100..=0b11111101 => Some((5, byte & 0b00000001)),
    0b11111110              => if is_u64 { Some((6, 0)) } else { None },
    _                       => None,
  };

  match header {
    Some(header) => Ok((i, header)),
    None         => failure(Error::InvalidNumber),
  }
}

// Calculates the value of UTF-8 the next bytes after it's header. The
// header holds both the size and part of this parsers returning value.
pub fn number_type(input: &[u8], is_sample: bool,
                   (size, value): (usize, u8))
                   -> IResult<&[u8], NumberType, Error> {
  let (i, bytes) = take(size)(input)?;

  let mut result = value as u64;

  for &byte in bytes {
    if byte & 0b11000000 != 0b10000000 {
      return failure(Error::InvalidNumber);
    }

    result = (result << 6) | (byte & 0b00111111) as u64;
  }

  if is_sample {
    Ok((i, NumberType::Sample(result)))
  } else {
    Ok((i, NumberType::Frame(result as u32)))
  }
}

pub fn secondary_block_size(input: &[u8], block_byte: u8)
                            -> IResult<&[u8], Option<u32>, Error> {
  match block_byte {
    0b0110 => be_u8(input).map(|(i, size)| (i, Some(size as u32))),
    0b0111 => be_u16(input).map(|(i, size)| (i, Some(size as u32))),
    _      => Ok((input, None)),
  }
}

pub fn secondary_sample_rate(input: &[u8], sample_byte: u8)
                             -> IResult<&[u8], Option<u32>, Error> {
  match sample_byte {
    0b1100          => be_u8(input).map(|(i, rate)| (i, Some(rate as u32))),
    0b1101 | 0b1110 => be_u16(input).map(|(i, rate)| (i, Some(rate as u32))),
    _               => Ok((input, None)),
  }
}

/// Parses a frame header, using `stream_info` for the sample rate and
/// sample size when the header defers to it.
pub fn header<'a>(input: &'a [u8], stream_info: &StreamInfo)
                  -> IResult<&'a [u8], Header, Error> {
  let (i, is_variable_block_size) = blocking_strategy(input)?;
  let (i, (block_byte, sample_byte)) = block_sample(i)?;
  let (i, (channel_assignment, channels, size_byte)) = channel_bits(i)?;
  let (i, utf8_header_val) = utf8_header(i, is_variable_block_size)?;
  let (i, number)          = number_type(i, is_variable_block_size,
                                         utf8_header_val)?;
  let (i, alt_block_size)  = secondary_block_size(i, block_byte)?;
  let (i, alt_sample_rate) = secondary_sample_rate(i, sample_byte)?;
  let (i, crc)             = be_u8(i)?;

  let block_size = match (block_byte, alt_block_size) {
    (0b0001, _)                   => 192,
    (0b0010..=0b0101, _)          => 576 << (block_byte - 2),
    (0b0110..=0b0111, Some(size)) => size + 1,
    (0b1000..=0b1111, _)          => 256 << (block_byte - 8),
    _                             => return failure(Error::ReservedBlockSize),
  };

  let sample_rate = match (sample_byte, alt_sample_rate) {
    (0b0000, _)          => stream_info.sample_rate,
    (0b0001, _)          => 88200,
    (0b0010, _)          => 176400,
    (0b0011, _)          => 192000,
    (0b0100, _)          => 8000,
    (0b0101, _)          => 16000,
    (0b0110, _)          => 22050,
    (0b0111, _)          => 24000,
    (0b1000, _)          => 32000,
    (0b1001, _)          => 44100,
    (0b1010, _)          => 48000,
    (0b1011, _)          => 96000,
    (0b1100, Some(rate)) => rate * 1000,
    (0b1101, Some(rate)) => rate,
    (0b1110, Some(rate)) => rate * 10,
    _                    => return failure(Error::ReservedSampleRate),
  };

  let bits_per_sample = match size_byte {
    0b0000 => stream_info.bits_per_sample as usize,
    0b0001 => 8,
    0b0010 => 12,
    0b0100 => 16,
    0b0101 => 20,
    0b0110 => 24,
    0b0111 => 32,
    _      => return failure(Error::ReservedSampleSize),
  };

  // All header bytes before the crc-8
  let end    = (input.len() - i.len()) - 1;
  let actual = crc8(&input[0..end]);

  if actual != crc {
    return failure(Error::HeaderCrcMismatch {
      expected: crc,
      actual: actual,
    });
  }

  Ok((i, Header {
    block_size: block_size,
    sample_rate: sample_rate,
    channels: channels,
    channel_assignment: channel_assignment,
    bits_per_sample: bits_per_sample,
    number: number,
    crc: crc,
  }))
}

pub fn footer(input: &[u8]) -> IResult<&[u8], Footer, Error> {
  be_u16(input).map(|(i, crc)| (i, Footer(crc)))
}
