use log::debug;

use crate::encoder::EncoderConfig;
use crate::frame::{
  SYNC_CODE,
  ChannelAssignment, NumberType,
  Frame,
  Header, Footer,
};
use crate::subframe::{self, write_subframe, Subframe};
use crate::utility::{crc8, crc16, BitWriter};

fn block_size_code(block_size: u32) -> u8 {
  match block_size {
    192                    => 0b0001,
    576                    => 0b0010,
    1152                   => 0b0011,
    2304                   => 0b0100,
    4608                   => 0b0101,
    256                    => 0b1000,
    512                    => 0b1001,
    1024                   => 0b1010,
    2048                   => 0b1011,
    4096                   => 0b1100,
    8192                   => 0b1101,
    16384                  => 0b1110,
    32768                  => 0b1111,
    _ if block_size <= 256 => 0b0110,
    _                      => 0b0111,
  }
}

fn sample_rate_code(sample_rate: u32) -> u8 {
  match sample_rate {
    88200  => 0b0001,
    176400 => 0b0010,
    192000 => 0b0011,
    8000   => 0b0100,
    16000  => 0b0101,
    22050  => 0b0110,
    24000  => 0b0111,
    32000  => 0b1000,
    44100  => 0b1001,
    48000  => 0b1010,
    96000  => 0b1011,
    _      => {
      if sample_rate % 1000 == 0 && sample_rate / 1000 <= 0xff {
        0b1100
      } else if sample_rate <= 0xffff {
        0b1101
      } else if sample_rate % 10 == 0 && sample_rate / 10 <= 0xffff {
        0b1110
      } else {
        // Deferred to the stream's sample rate.
        0b0000
      }
    }
  }
}

fn channel_code(header: &Header) -> u8 {
  match header.channel_assignment {
    ChannelAssignment::Independent  => header.channels - 1,
    ChannelAssignment::LeftSide     => 0b1000,
    ChannelAssignment::RightSide    => 0b1001,
    ChannelAssignment::MidpointSide => 0b1010,
  }
}

fn sample_size_code(bits_per_sample: usize) -> u8 {
  match bits_per_sample {
    8  => 0b001,
    12 => 0b010,
    16 => 0b100,
    20 => 0b101,
    24 => 0b110,
    32 => 0b111,
    _  => 0b000,
  }
}

// Writes `value` with the same variable length scheme UTF-8 uses for code
// points, extended to seven bytes for 36-bit sample numbers.
fn write_number(writer: &mut BitWriter, value: u64) {
  if value < 0x80 {
    writer.write_bits(value, 8);

    return;
  }

  let length = match value {
    0..=0x7ff              => 2,
    0x800..=0xffff         => 3,
    0x10000..=0x1fffff     => 4,
    0x200000..=0x3ffffff   => 5,
    0x4000000..=0x7fffffff => 6,
    _                      => 7,
  };

  // Leading byte: `length` ones, a zero, then the highest bits.
  let continuation = 6 * (length - 1);
  let prefix       = (0xff00u64 >> length) & 0xff;

  writer.write_bits(prefix | (value >> continuation), 8);

  for i in (0..(length - 1)).rev() {
    writer.write_bits(0b10000000 | ((value >> (6 * i)) & 0b00111111), 8);
  }
}

/// Encodes a frame header, followed by its CRC-8. The header's own `crc`
/// field is ignored.
pub fn write_header(header: &Header) -> Vec<u8> {
  let mut writer = BitWriter::with_capacity(16);

  let block_code  = block_size_code(header.block_size);
  let sample_code = sample_rate_code(header.sample_rate);
  let (is_variable_block_size, number) = match header.number {
    NumberType::Frame(number)  => (false, number as u64),
    NumberType::Sample(number) => (true, number),
  };

  writer.write_bits(SYNC_CODE as u64, 14);
  writer.write_bits(0, 1);
  writer.write_bits(is_variable_block_size as u64, 1);
  writer.write_bits(block_code as u64, 4);
  writer.write_bits(sample_code as u64, 4);
  writer.write_bits(channel_code(header) as u64, 4);
  writer.write_bits(sample_size_code(header.bits_per_sample) as u64, 3);
  writer.write_bits(0, 1);

  write_number(&mut writer, number);

  match block_code {
    0b0110 => writer.write_bits(header.block_size as u64 - 1, 8),
    0b0111 => writer.write_bits(header.block_size as u64 - 1, 16),
    _      => (),
  }

  match sample_code {
    0b1100 => writer.write_bits(header.sample_rate as u64 / 1000, 8),
    0b1101 => writer.write_bits(header.sample_rate as u64, 16),
    0b1110 => writer.write_bits(header.sample_rate as u64 / 10, 16),
    _      => (),
  }

  let mut bytes = writer.into_bytes();
  let crc       = crc8(&bytes);

  bytes.push(crc);

  bytes
}

/// Encodes a whole frame: header, subframes and the CRC-16 footer. The
/// stored CRC values of `frame` are ignored and computed from the output.
pub fn write_frame(frame: &Frame) -> Vec<u8> {
  let header     = write_header(&frame.header);
  let capacity   = header.len() +
                   frame.header.block_size as usize * 2 * frame.subframes.len();
  let mut writer = BitWriter::with_capacity(capacity);

  for &byte in &header {
    writer.write_bits(byte as u64, 8);
  }

  for (channel, subframe) in frame.subframes.iter().enumerate() {
    write_subframe(&mut writer, subframe,
                   frame.header.channel_bits_per_sample(channel));
  }

  writer.align_to_byte();

  let mut bytes = writer.into_bytes();
  let crc       = crc16(&bytes);

  bytes.extend_from_slice(&crc.to_be_bytes());

  bytes
}

/// Transforms a left and right channel into the two channels stored for the
/// given assignment.
pub fn decorrelate(channel_assignment: ChannelAssignment,
                   left: &[i64], right: &[i64])
                   -> (Vec<i64>, Vec<i64>) {
  let side = || {
    left.iter().zip(right).map(|(l, r)| l - r).collect::<Vec<_>>()
  };

  match channel_assignment {
    ChannelAssignment::Independent  => (left.to_vec(), right.to_vec()),
    ChannelAssignment::LeftSide     => (left.to_vec(), side()),
    ChannelAssignment::RightSide    => (side(), right.to_vec()),
    ChannelAssignment::MidpointSide => {
      let midpoint = left.iter().zip(right).map(|(l, r)| (l + r) >> 1)
                       .collect::<Vec<_>>();

      (midpoint, side())
    }
  }
}

/// Encodes every channel's subframe and, for stereo input, picks the
/// channel assignment with the smallest total size. Ties resolve to the
/// first of independent, left side, right side and midpoint side.
pub fn choose_channel_assignment(channels: &[&[i64]],
                                 bits_per_sample: usize,
                                 config: &EncoderConfig)
                                 -> (ChannelAssignment, Vec<Subframe>) {
  let encode_subframe = |samples: &[i64], bits| {
    subframe::encode(samples, bits, config)
  };

  if channels.len() != 2 || !config.stereo_decorrelation {
    let subframes = channels.iter()
                      .map(|samples| {
                        encode_subframe(*samples, bits_per_sample).0
                      })
                      .collect();

    return (ChannelAssignment::Independent, subframes);
  }

  let (midpoint, side) = decorrelate(ChannelAssignment::MidpointSide,
                                     channels[0], channels[1]);

  let left     = encode_subframe(channels[0], bits_per_sample);
  let right    = encode_subframe(channels[1], bits_per_sample);
  let midpoint = encode_subframe(&midpoint, bits_per_sample);
  let side     = encode_subframe(&side, bits_per_sample + 1);

  let candidates = [
    (ChannelAssignment::Independent, left.1 + right.1),
    (ChannelAssignment::LeftSide, left.1 + side.1),
    (ChannelAssignment::RightSide, side.1 + right.1),
    (ChannelAssignment::MidpointSide, midpoint.1 + side.1),
  ];

  let mut best = candidates[0];

  for &candidate in &candidates[1..] {
    if candidate.1 < best.1 {
      best = candidate;
    }
  }

  let subframes = match best.0 {
    ChannelAssignment::Independent  => vec![left.0, right.0],
    ChannelAssignment::LeftSide     => vec![left.0, side.0],
    ChannelAssignment::RightSide    => vec![side.0, right.0],
    ChannelAssignment::MidpointSide => vec![midpoint.0, side.0],
  };

  (best.0, subframes)
}

/// Encodes one block of every channel into a complete frame.
pub fn encode(channels: &[&[i64]],
              number: NumberType,
              sample_rate: u32,
              bits_per_sample: usize,
              config: &EncoderConfig)
              -> Vec<u8> {
  let block_size = channels.first().map_or(0, |samples| samples.len());

  let (channel_assignment, subframes) =
    choose_channel_assignment(channels, bits_per_sample, config);

  debug!("frame {:?}: {} samples, {:?}, subframe types {:?}",
         number, block_size, channel_assignment,
         subframes.iter().map(|s| s.data.type_code()).collect::<Vec<_>>());

  let frame = Frame {
    header: Header {
      block_size: block_size as u32,
      sample_rate: sample_rate,
      channels: channels.len() as u8,
      channel_assignment: channel_assignment,
      bits_per_sample: bits_per_sample,
      number: number,
      crc: 0,
    },
    subframes: subframes,
    footer: Footer(0),
  };

  write_frame(&frame)
}
