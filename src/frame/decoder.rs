use crate::frame::ChannelAssignment;

pub fn decode_left_side(buffer: &mut [i64]) {
  let block_size = buffer.len() / 2;

  for i in 0..block_size {
    let left = buffer[i];
    let side = buffer[i + block_size];

    // right channel
    buffer[i + block_size] = left.wrapping_sub(side);
  }
}

pub fn decode_right_side(buffer: &mut [i64]) {
  let block_size = buffer.len() / 2;

  for i in 0..block_size {
    let side  = buffer[i];
    let right = buffer[i + block_size];

    // left channel
    buffer[i] = side.wrapping_add(right);
  }
}

pub fn decode_midpoint_side(buffer: &mut [i64]) {
  let block_size = buffer.len() / 2;

  for i in 0..block_size {
    let mut midpoint = buffer[i];
    let side         = buffer[i + block_size];

    // The encoder drops the lowest bit of `left + right`, which always
    // matches the parity of `left - right`.
    midpoint = midpoint.wrapping_shl(1) | (side & 1);

    // left and right channel
    buffer[i]              = midpoint.wrapping_add(side) >> 1;
    buffer[i + block_size] = midpoint.wrapping_sub(side) >> 1;
  }
}

/// Restores left and right from the decorrelated channels of a stereo
/// frame. `buffer` holds the first channel's block followed by the
/// second's.
pub fn decode(channel_assignment: ChannelAssignment, buffer: &mut [i64]) {
  match channel_assignment {
    ChannelAssignment::Independent  => (),
    ChannelAssignment::LeftSide     => decode_left_side(buffer),
    ChannelAssignment::RightSide    => decode_right_side(buffer),
    ChannelAssignment::MidpointSide => decode_midpoint_side(buffer),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_decode() {
    // left [10, -3], right [4, 7]
    let inputs  = [ (ChannelAssignment::Independent, [10, -3, 4, 7])
                  , (ChannelAssignment::LeftSide, [10, -3, 6, -10])
                  , (ChannelAssignment::RightSide, [6, -10, 4, 7])
                  , (ChannelAssignment::MidpointSide, [7, 2, 6, -10])
                  ];

    for &(channel_assignment, input) in &inputs {
      let mut buffer = input;

      decode(channel_assignment, &mut buffer);

      assert_eq!(buffer, [10, -3, 4, 7]);
    }
  }

  #[test]
  fn test_decode_midpoint_side_extremes() {
    let left  = i32::MIN as i64;
    let right = i32::MAX as i64;

    let mut buffer = [(left + right) >> 1, (right + left) >> 1,
                      left - right, right - left];

    decode_midpoint_side(&mut buffer);

    assert_eq!(buffer, [left, right, right, left]);
  }

  #[test]
  fn test_decode_wraps() {
    let mut buffer = [i64::MIN, 1];

    decode_left_side(&mut buffer);

    assert_eq!(buffer, [i64::MIN, i64::MAX]);

    let mut buffer = [i64::MAX, 1];

    decode_right_side(&mut buffer);

    assert_eq!(buffer, [i64::MIN, 1]);

    let mut buffer = [i64::MAX, i64::MAX];

    decode_midpoint_side(&mut buffer);

    assert_eq!(buffer, [(1 << 62) - 1, -(1 << 62)]);
  }
}
