use crate::metadata::{BlockData, StreamInfo, SeekPoint, VorbisComment};

/// Appends the `fLaC` stream marker.
pub fn write_marker(output: &mut Vec<u8>) {
  output.extend_from_slice(b"fLaC");
}

fn stream_info_bytes(info: &StreamInfo, output: &mut Vec<u8>) {
  let packed = (info.sample_rate as u64) << 44 |
               ((info.channels as u64).wrapping_sub(1) & 0b111) << 41 |
               ((info.bits_per_sample as u64).wrapping_sub(1) & 0b11111) << 36 |
               (info.total_samples & 0x0fffffffff);

  output.extend_from_slice(&info.min_block_size.to_be_bytes());
  output.extend_from_slice(&info.max_block_size.to_be_bytes());
  output.extend_from_slice(&info.min_frame_size.to_be_bytes()[1..]);
  output.extend_from_slice(&info.max_frame_size.to_be_bytes()[1..]);
  output.extend_from_slice(&packed.to_be_bytes());
  output.extend_from_slice(&info.md5_sum);
}

fn seek_table_bytes(seek_points: &[SeekPoint], output: &mut Vec<u8>) {
  for seek_point in seek_points {
    output.extend_from_slice(&seek_point.sample_number.to_be_bytes());
    output.extend_from_slice(&seek_point.stream_offset.to_be_bytes());
    output.extend_from_slice(&seek_point.frame_samples.to_be_bytes());
  }
}

fn vorbis_string(string: &str, output: &mut Vec<u8>) {
  output.extend_from_slice(&(string.len() as u32).to_le_bytes());
  output.extend_from_slice(string.as_bytes());
}

fn vorbis_comment_bytes(vorbis_comment: &VorbisComment, output: &mut Vec<u8>) {
  let length = vorbis_comment.comments.len() as u32;

  vorbis_string(&vorbis_comment.vendor_string, output);
  output.extend_from_slice(&length.to_le_bytes());

  for &(ref name, ref value) in &vorbis_comment.comments {
    let comment = format!("{}={}", name.to_uppercase(), value);

    vorbis_string(&comment, output);
  }
}

/// Returns the encoded body of a metadata block, without its header.
pub fn block_bytes(data: &BlockData) -> Vec<u8> {
  let mut output = Vec::new();

  match *data {
    BlockData::StreamInfo(ref info)       => stream_info_bytes(info, &mut output),
    BlockData::SeekTable(ref points)      => seek_table_bytes(points, &mut output),
    BlockData::VorbisComment(ref comment) =>
      vorbis_comment_bytes(comment, &mut output),
    BlockData::Unknown { ref data, .. }   => output.extend_from_slice(data),
  }

  output
}

/// Appends a metadata block, header included.
pub fn write_block(data: &BlockData, is_last: bool, output: &mut Vec<u8>) {
  let bytes      = block_bytes(data);
  let block_byte = ((is_last as u8) << 7) | (data.block_type() & 0b01111111);
  let length     = bytes.len() as u32;

  output.push(block_byte);
  output.extend_from_slice(&length.to_be_bytes()[1..]);
  output.extend_from_slice(&bytes);
}
