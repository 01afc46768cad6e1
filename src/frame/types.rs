use crate::subframe::Subframe;

/// Maximum number of channels supported in the FLAC format.
pub const MAX_CHANNELS: usize = 8;

/// The 14-bit code every frame header starts with.
pub const SYNC_CODE: u16 = 0b11111111111110;

/// Audio frame that contains one subframe for each channel.
#[derive(Debug, PartialEq, Eq)]
pub struct Frame {
  /// Information regarding the current audio frame.
  pub header: Header,
  /// Data for each audio channel.
  pub subframes: Vec<Subframe>,
  /// CRC-16 of all frame bytes before this footer.
  pub footer: Footer,
}

/// Channel assignment order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelAssignment {
  /// Independent channels, from one up to eight.
  Independent,
  /// Left and side stereo.
  LeftSide,
  /// Right and side stereo.
  RightSide,
  /// Midpoint and side stereo.
  MidpointSide,
}

impl ChannelAssignment {
  /// Index of the channel that holds the difference between left and right,
  /// which needs one extra bit per sample.
  pub fn side_channel(&self) -> Option<usize> {
    match *self {
      ChannelAssignment::Independent  => None,
      ChannelAssignment::LeftSide     |
      ChannelAssignment::MidpointSide => Some(1),
      ChannelAssignment::RightSide    => Some(0),
    }
  }
}

/// Numbering scheme used from the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberType {
  /// Frame number of first sample in frame.
  Frame(u32),
  /// Sample number of first sample in frame.
  Sample(u64),
}

/// Information regarding the current audio frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
  /// Number of samples per subframe.
  pub block_size: u32,
  /// Sample rate in hertz (Hz).
  pub sample_rate: u32,
  /// Number of channels that also represent the number of subframes.
  pub channels: u8,
  /// Channel assignment order.
  pub channel_assignment: ChannelAssignment,
  /// Size, in bits, per sample.
  pub bits_per_sample: usize,
  /// Numbering scheme used from the frame.
  pub number: NumberType,
  /// CRC-8 of all header bytes before this crc.
  pub crc: u8,
}

impl Header {
  /// Size, in bits, of the samples stored in the given channel's subframe.
  pub fn channel_bits_per_sample(&self, channel: usize) -> usize {
    if self.channel_assignment.side_channel() == Some(channel) {
      self.bits_per_sample + 1
    } else {
      self.bits_per_sample
    }
  }
}

/// End of the audio frame.
///
/// Contains a value that represents the CRC-16 of everything inside the
/// frame before the footer.
#[derive(Debug, PartialEq, Eq)]
pub struct Footer(pub u16);
