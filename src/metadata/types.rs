/// Block type code of `StreamInfo`.
pub const STREAM_INFO: u8    = 0;
/// Block type code of `Padding`.
pub const PADDING: u8        = 1;
/// Block type code of a seek table.
pub const SEEK_TABLE: u8     = 3;
/// Block type code of `VorbisComment`.
pub const VORBIS_COMMENT: u8 = 4;

/// Size in bytes of a `StreamInfo` block.
pub const STREAM_INFO_SIZE: u32 = 34;
/// Size in bytes of a single seek point.
pub const SEEK_POINT_SIZE: usize = 18;

/// Sample number used by placeholder seek points.
pub const PLACEHOLDER_SEEK_POINT: u64 = 0xffffffffffffffff;

/// A metadata block and its header information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
  /// Marks the last metadata block before the audio frames.
  pub is_last: bool,
  /// Length in bytes of the block data.
  pub length: u32,
  /// Block data.
  pub data: BlockData,
}

/// The metadata blocks this crate understands, everything else is kept as
/// raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockData {
  StreamInfo(StreamInfo),
  SeekTable(Vec<SeekPoint>),
  VorbisComment(VorbisComment),
  Unknown {
    block_type: u8,
    data: Vec<u8>,
  },
}

impl BlockData {
  /// The 7-bit type code written in the block header.
  pub fn block_type(&self) -> u8 {
    match *self {
      BlockData::StreamInfo(_)                 => STREAM_INFO,
      BlockData::SeekTable(_)                  => SEEK_TABLE,
      BlockData::VorbisComment(_)              => VORBIS_COMMENT,
      BlockData::Unknown { block_type, .. }    => block_type,
    }
  }
}

/// Information regarding the entire audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamInfo {
  /// Minimum block size, in samples, used in the stream.
  pub min_block_size: u16,
  /// Maximum block size, in samples, used in the stream.
  pub max_block_size: u16,
  /// Minimum frame size in bytes, zero when unknown.
  pub min_frame_size: u32,
  /// Maximum frame size in bytes, zero when unknown.
  pub max_frame_size: u32,
  /// Sample rate in hertz (Hz).
  pub sample_rate: u32,
  /// Number of channels, from one to eight.
  pub channels: u8,
  /// Size, in bits, per sample, from four to thirty-two.
  pub bits_per_sample: u8,
  /// Number of samples per channel, zero when unknown.
  pub total_samples: u64,
  /// MD5 signature of the unencoded audio data.
  pub md5_sum: [u8; 16],
}

impl StreamInfo {
  pub fn new() -> StreamInfo {
    StreamInfo::default()
  }

  /// Returns true when every frame, except maybe the last one, has the same
  /// block size.
  pub fn is_fixed_block_size(&self) -> bool {
    self.min_block_size == self.max_block_size
  }
}

/// A single point within a seek table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekPoint {
  /// Sample number of the first sample in the target frame.
  pub sample_number: u64,
  /// Offset, in bytes, from the first frame header to the target frame.
  pub stream_offset: u64,
  /// Number of samples in the target frame.
  pub frame_samples: u16,
}

/// Vendor string and `NAME=value` comment pairs.
///
/// Comment names are stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VorbisComment {
  pub vendor_string: String,
  pub comments: Vec<(String, String)>,
}

impl VorbisComment {
  pub fn new(vendor_string: &str) -> VorbisComment {
    VorbisComment {
      vendor_string: vendor_string.to_owned(),
      comments: Vec::new(),
    }
  }

  /// Adds a comment, upper-casing its name.
  pub fn push(&mut self, name: &str, value: &str) {
    self.comments.push((name.to_uppercase(), value.to_owned()));
  }

  /// Returns the first value for the given name, compared case
  /// insensitively.
  pub fn get(&self, name: &str) -> Option<&str> {
    let name = name.to_uppercase();

    self.comments.iter()
      .find(|&&(ref key, _)| *key == name)
      .map(|&(_, ref value)| value.as_str())
  }
}
