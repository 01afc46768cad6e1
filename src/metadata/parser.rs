use log::{trace, warn};
use nom::bytes::complete::{tag, take};
use nom::multi::count;
use nom::number::complete::{be_u8, be_u16, be_u24, be_u64, le_u32};
use nom::IResult;

use crate::error::Error;
use crate::utility::failure;
use crate::metadata::{
  STREAM_INFO, SEEK_TABLE, VORBIS_COMMENT,
  STREAM_INFO_SIZE, SEEK_POINT_SIZE, PLACEHOLDER_SEEK_POINT,
  Block, BlockData,
  StreamInfo, SeekPoint, VorbisComment,
};

/// Parses the `fLaC` stream marker.
pub fn marker(input: &[u8]) -> IResult<&[u8], &[u8], Error> {
  tag::<_, _, Error>(&b"fLaC"[..])(input)
    .map_err(|_| nom::Err::Failure(Error::InvalidMagic))
}

/// Parses a metadata block header, returning the block type, whether it is
/// the last block, and the block length in bytes.
pub fn header(input: &[u8]) -> IResult<&[u8], (u8, bool, u32), Error> {
  let (i, block_byte) = be_u8(input)?;
  let (i, length)     = be_u24(i)?;

  let is_last    = (block_byte >> 7) == 1;
  let block_type = block_byte & 0b01111111;

  Ok((i, (block_type, is_last, length)))
}

/// Parses the 34 bytes of a `StreamInfo` block.
pub fn stream_info(input: &[u8]) -> IResult<&[u8], StreamInfo, Error> {
  let (i, min_block_size) = be_u16(input)?;
  let (i, max_block_size) = be_u16(i)?;
  let (i, min_frame_size) = be_u24(i)?;
  let (i, max_frame_size) = be_u24(i)?;
  let (i, packed)         = be_u64(i)?;
  let (i, md5)            = take(16usize)(i)?;

  // Sample rate, channels, bits per sample, and total samples are packed
  // into 20, 3, 5, and 36 bits respectively.
  let sample_rate     = (packed >> 44) as u32;
  let channels        = ((packed >> 41) & 0b111) as u8 + 1;
  let bits_per_sample = ((packed >> 36) & 0b11111) as u8 + 1;
  let total_samples   = packed & 0x0fffffffff;

  let is_valid = min_block_size <= max_block_size &&
                 sample_rate > 0 &&
                 bits_per_sample >= 4;

  if !is_valid {
    return failure(Error::InvalidStreamInfo);
  }

  let mut md5_sum = [0; 16];

  md5_sum.copy_from_slice(md5);

  Ok((i, StreamInfo {
    min_block_size: min_block_size,
    max_block_size: max_block_size,
    min_frame_size: min_frame_size,
    max_frame_size: max_frame_size,
    sample_rate: sample_rate,
    channels: channels,
    bits_per_sample: bits_per_sample,
    total_samples: total_samples,
    md5_sum: md5_sum,
  }))
}

fn seek_point(input: &[u8]) -> IResult<&[u8], SeekPoint, Error> {
  let (i, sample_number) = be_u64(input)?;
  let (i, stream_offset) = be_u64(i)?;
  let (i, frame_samples) = be_u16(i)?;

  Ok((i, SeekPoint {
    sample_number: sample_number,
    stream_offset: stream_offset,
    frame_samples: frame_samples,
  }))
}

/// Parses a seek table, dropping placeholder seek points.
pub fn seek_table(input: &[u8]) -> IResult<&[u8], Vec<SeekPoint>, Error> {
  let (i, seek_points) = count(seek_point, input.len() / SEEK_POINT_SIZE)(input)?;

  let seek_points = seek_points.into_iter()
    .filter(|point| point.sample_number != PLACEHOLDER_SEEK_POINT)
    .collect();

  Ok((i, seek_points))
}

fn vorbis_string(input: &[u8]) -> IResult<&[u8], String, Error> {
  let (i, length) = le_u32(input)?;
  let (i, bytes)  = take(length)(i)?;

  Ok((i, String::from_utf8_lossy(bytes).into_owned()))
}

/// Parses a `VorbisComment` block. Comment names are upper-cased and
/// comments without a `=` separator are skipped.
pub fn vorbis_comment(input: &[u8]) -> IResult<&[u8], VorbisComment, Error> {
  let (i, vendor_string) = vorbis_string(input)?;
  let (i, length)        = le_u32(i)?;

  let mut input        = i;
  let mut vorbis_block = VorbisComment::new(&vendor_string);

  for _ in 0..length {
    let (i, comment) = vorbis_string(input)?;

    match comment.find('=') {
      Some(index) => vorbis_block.push(&comment[..index], &comment[index + 1..]),
      None        => trace!("skipping comment without a separator: {}", comment),
    }

    input = i;
  }

  Ok((input, vorbis_block))
}

// Keeps a block whose body doesn't parse as its raw bytes.
fn or_unknown<T, F>(block_type: u8, bytes: &[u8],
                    result: IResult<&[u8], T, Error>, wrap: F) -> BlockData
 where F: FnOnce(T) -> BlockData {
  match result {
    Ok((_, value)) => wrap(value),
    Err(error)     => {
      warn!("malformed metadata block of type {}, kept as raw bytes: {}",
            block_type, error);

      BlockData::Unknown {
        block_type: block_type,
        data: bytes.to_vec(),
      }
    }
  }
}

/// Parses a whole metadata block, header included.
pub fn block(input: &[u8]) -> IResult<&[u8], Block, Error> {
  let (i, (block_type, is_last, length)) = header(input)?;
  let (i, bytes)                         = take(length)(i)?;

  let data = match block_type {
    STREAM_INFO    => {
      if length != STREAM_INFO_SIZE {
        return failure(Error::InvalidStreamInfo);
      }

      BlockData::StreamInfo(stream_info(bytes)?.1)
    }
    SEEK_TABLE     => {
      or_unknown(block_type, bytes, seek_table(bytes), BlockData::SeekTable)
    }
    VORBIS_COMMENT => {
      or_unknown(block_type, bytes, vorbis_comment(bytes),
                 BlockData::VorbisComment)
    }
    _              => BlockData::Unknown {
      block_type: block_type,
      data: bytes.to_vec(),
    },
  };

  trace!("metadata block: type {}, {} bytes, last {}", block_type, length,
         is_last);

  Ok((i, Block {
    is_last: is_last,
    length: length,
    data: data,
  }))
}

/// Parses the stream marker followed by every metadata block, up to and
/// including the one marked as last.
///
/// The first block must be `StreamInfo`, otherwise this fails with
/// `Error::MissingStreamInfo`.
pub fn metadata_parser(input: &[u8]) -> IResult<&[u8], Vec<Block>, Error> {
  let (i, _) = marker(input)?;

  let mut input  = i;
  let mut blocks = Vec::new();

  loop {
    let (i, metadata) = block(input).map_err(|error| match error {
      nom::Err::Error(Error::UnexpectedEndOfData) if blocks.is_empty() =>
        nom::Err::Failure(Error::MissingStreamInfo),
      error => error,
    })?;

    let is_last = metadata.is_last;

    if blocks.is_empty() && !matches!(metadata.data, BlockData::StreamInfo(_)) {
      return failure(Error::MissingStreamInfo);
    }

    blocks.push(metadata);
    input = i;

    if is_last {
      break;
    }
  }

  Ok((input, blocks))
}
