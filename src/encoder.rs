//! Encoder front end: turns per-channel PCM into a complete FLAC stream.

use log::debug;

use crate::error::{Error, Result};
use crate::frame::{self, NumberType, MAX_CHANNELS};
use crate::metadata::{
  write_block, write_marker,
  BlockData, StreamInfo, VorbisComment,
};
use crate::stream::Stream;
use crate::subframe::{MAX_LPC_ORDER, MAX_PARTITION_ORDER};
use crate::utility::md5_signature;

/// Highest sample rate a frame header can describe.
pub const MAX_SAMPLE_RATE: u32 = 655350;

/// Settings that control how hard the encoder searches for a compact
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
  /// Number of samples per channel in every frame except the last.
  pub block_size: usize,
  /// Highest LPC order tried, zero limits the encoder to fixed predictors.
  pub max_lpc_order: usize,
  /// Precision, in bits, of the quantized LPC coefficients.
  pub qlp_precision: u8,
  /// Highest residual partition order tried.
  pub max_partition_order: u32,
  /// Try left-side, right-side and mid-side coding on stereo input.
  pub stereo_decorrelation: bool,
  /// Decode the encoded stream and compare it against the input.
  pub verify: bool,
  /// Vendor string of the `VorbisComment` block.
  pub vendor: String,
  /// `NAME=value` tags, a `VorbisComment` block is only written when this
  /// isn't empty.
  pub comments: Vec<(String, String)>,
}

impl Default for EncoderConfig {
  fn default() -> Self {
    EncoderConfig {
      block_size: 4096,
      max_lpc_order: 8,
      qlp_precision: 12,
      max_partition_order: 6,
      stereo_decorrelation: true,
      verify: false,
      vendor: concat!("flac ", env!("CARGO_PKG_VERSION")).to_owned(),
      comments: Vec::new(),
    }
  }
}

impl EncoderConfig {
  /// Checks every setting is within the range the format allows.
  ///
  /// # Failures
  ///
  /// * `Error::InvalidParameter` names the first setting out of range.
  pub fn validate(&self) -> Result<()> {
    if !(16..=65535).contains(&self.block_size) {
      return Err(invalid(format!("block size {} not in 16..=65535",
                                 self.block_size)));
    }

    if self.max_lpc_order > MAX_LPC_ORDER {
      return Err(invalid(format!("max LPC order {} above {}",
                                 self.max_lpc_order, MAX_LPC_ORDER)));
    }

    if !(5..=15).contains(&self.qlp_precision) {
      return Err(invalid(format!("LPC precision {} not in 5..=15",
                                 self.qlp_precision)));
    }

    if self.max_partition_order > MAX_PARTITION_ORDER {
      return Err(invalid(format!("max partition order {} above {}",
                                 self.max_partition_order,
                                 MAX_PARTITION_ORDER)));
    }

    Ok(())
  }

  /// Adds a tag to the `VorbisComment` block.
  pub fn comment(mut self, name: &str, value: &str) -> Self {
    self.comments.push((name.to_owned(), value.to_owned()));

    self
  }
}

/// Presets that trade encoding speed for a smaller output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
  /// Fixed predictors only and a single residual partition.
  Fastest,
  /// Low order LPC.
  Fast,
  Default,
  /// Highest LPC order and the deepest partition search.
  Best,
}

impl CompressionLevel {
  pub fn block_size(&self) -> usize {
    match *self {
      CompressionLevel::Fastest => 1152,
      CompressionLevel::Fast    => 2304,
      CompressionLevel::Default => 4096,
      CompressionLevel::Best    => 4096,
    }
  }

  pub fn max_lpc_order(&self) -> usize {
    match *self {
      CompressionLevel::Fastest => 0,
      CompressionLevel::Fast    => 4,
      CompressionLevel::Default => 8,
      CompressionLevel::Best    => 12,
    }
  }

  pub fn max_partition_order(&self) -> u32 {
    match *self {
      CompressionLevel::Fastest => 0,
      CompressionLevel::Fast    => 3,
      CompressionLevel::Default => 6,
      CompressionLevel::Best    => 8,
    }
  }
}

impl From<u8> for CompressionLevel {
  fn from(level: u8) -> Self {
    match level {
      0     => CompressionLevel::Fastest,
      1..=3 => CompressionLevel::Fast,
      4..=6 => CompressionLevel::Default,
      _     => CompressionLevel::Best,
    }
  }
}

impl From<CompressionLevel> for EncoderConfig {
  fn from(level: CompressionLevel) -> Self {
    EncoderConfig {
      block_size: level.block_size(),
      max_lpc_order: level.max_lpc_order(),
      max_partition_order: level.max_partition_order(),
      ..EncoderConfig::default()
    }
  }
}

fn invalid(message: String) -> Error {
  Error::InvalidParameter(message)
}

/// Encodes PCM samples into FLAC streams with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
  config: EncoderConfig,
}

impl Encoder {
  /// Constructs an encoder, validating the configuration first.
  pub fn new(config: EncoderConfig) -> Result<Encoder> {
    config.validate()?;

    Ok(Encoder {
      config: config,
    })
  }

  pub fn with_level(level: CompressionLevel) -> Encoder {
    Encoder {
      config: level.into(),
    }
  }

  pub fn config(&self) -> &EncoderConfig {
    &self.config
  }

  /// Encodes one slice of samples per channel into a complete stream,
  /// `fLaC` marker and metadata included.
  ///
  /// # Failures
  ///
  /// * `Error::EmptyInput` when there are no channels or no samples.
  /// * `Error::MismatchedChannelLengths` when channels differ in length.
  /// * `Error::InvalidParameter` for an unsupported sample rate, channel
  ///   count or sample size, or a sample that doesn't fit in
  ///   `bits_per_sample` bits.
  /// * `Error::VerifyFailed` when verification is on and the stream doesn't
  ///   decode back to the input.
  pub fn encode<C>(&self, channels: &[C], sample_rate: u32,
                   bits_per_sample: usize)
                   -> Result<Vec<u8>>
   where C: AsRef<[i32]> {
    let total_samples = check_input(channels, sample_rate, bits_per_sample)?;
    let config        = &self.config;

    let widened: Vec<Vec<i64>> = channels.iter()
      .map(|channel| channel.as_ref().iter().map(|&s| s as i64).collect())
      .collect();

    let mut info = StreamInfo {
      min_block_size: u16::MAX,
      max_block_size: 0,
      min_frame_size: u32::MAX,
      max_frame_size: 0,
      sample_rate: sample_rate,
      channels: channels.len() as u8,
      bits_per_sample: bits_per_sample as u8,
      total_samples: total_samples as u64,
      md5_sum: md5_signature(channels, bits_per_sample),
    };

    let mut frames = Vec::new();

    for (index, start) in (0..total_samples).step_by(config.block_size)
                                            .enumerate() {
      let end    = (start + config.block_size).min(total_samples);
      let blocks = widened.iter()
                          .map(|channel| &channel[start..end])
                          .collect::<Vec<_>>();
      let bytes  = frame::encode(&blocks, NumberType::Frame(index as u32),
                                 sample_rate, bits_per_sample, config);

      let block_size = (end - start) as u16;
      let frame_size = bytes.len() as u32;

      // A short final block doesn't count against the minimum.
      if end < total_samples || index == 0 {
        info.min_block_size = info.min_block_size.min(block_size);
      }

      info.max_block_size = info.max_block_size.max(block_size);
      info.min_frame_size = info.min_frame_size.min(frame_size);
      info.max_frame_size = info.max_frame_size.max(frame_size);

      frames.push(bytes);
    }

    debug!("{} frames, block sizes {}..={}, frame sizes {}..={} bytes",
           frames.len(), info.min_block_size, info.max_block_size,
           info.min_frame_size, info.max_frame_size);

    let mut output = Vec::with_capacity(
      frames.iter().map(|frame| frame.len()).sum::<usize>() + 1024);

    write_marker(&mut output);
    write_block(&BlockData::StreamInfo(info), config.comments.is_empty(),
                &mut output);

    if !config.comments.is_empty() {
      let mut comment = VorbisComment::new(&config.vendor);

      for &(ref name, ref value) in &config.comments {
        comment.push(name, value);
      }

      write_block(&BlockData::VorbisComment(comment), true, &mut output);
    }

    for bytes in &frames {
      output.extend_from_slice(bytes);
    }

    debug!("encoded {} samples in {} channels into {} bytes",
           total_samples, channels.len(), output.len());

    if config.verify {
      verify(&output, channels)?;
    }

    Ok(output)
  }
}

/// Encodes with the given configuration, see `Encoder::encode`.
pub fn encode<C>(channels: &[C], sample_rate: u32, bits_per_sample: usize,
                 config: &EncoderConfig)
                 -> Result<Vec<u8>>
 where C: AsRef<[i32]> {
  Encoder::new(config.clone())?.encode(channels, sample_rate, bits_per_sample)
}

// Returns the number of samples per channel.
fn check_input<C>(channels: &[C], sample_rate: u32, bits_per_sample: usize)
                  -> Result<usize>
 where C: AsRef<[i32]> {
  if channels.len() > MAX_CHANNELS {
    return Err(invalid(format!("{} channels, at most {} are supported",
                               channels.len(), MAX_CHANNELS)));
  }

  if !(1..=MAX_SAMPLE_RATE).contains(&sample_rate) {
    return Err(invalid(format!("sample rate {} not in 1..={}", sample_rate,
                               MAX_SAMPLE_RATE)));
  }

  if !(4..=32).contains(&bits_per_sample) {
    return Err(invalid(format!("{} bits per sample not in 4..=32",
                               bits_per_sample)));
  }

  let total_samples = match channels.first() {
    Some(channel) => channel.as_ref().len(),
    None          => return Err(Error::EmptyInput),
  };

  if total_samples == 0 {
    return Err(Error::EmptyInput);
  }

  if channels.iter().any(|channel| channel.as_ref().len() != total_samples) {
    return Err(Error::MismatchedChannelLengths);
  }

  if total_samples as u64 >= 1 << 36 {
    return Err(invalid(format!("{} samples per channel don't fit in 36 bits",
                               total_samples)));
  }

  let max = (1i64 << (bits_per_sample - 1)) - 1;
  let min = -(1i64 << (bits_per_sample - 1));

  for channel in channels {
    let out_of_range = channel.as_ref()
      .iter()
      .find(|&&sample| (sample as i64) < min || (sample as i64) > max);

    if let Some(sample) = out_of_range {
      return Err(invalid(format!("sample {} doesn't fit in {} bits", sample,
                                 bits_per_sample)));
    }
  }

  Ok(total_samples)
}

fn verify<C>(output: &[u8], channels: &[C]) -> Result<()>
 where C: AsRef<[i32]> {
  let stream = Stream::from_buffer(output)?;

  let matches = stream.frames_skipped() == 0 &&
    channels.iter().enumerate().all(|(index, channel)| {
      stream.channel(index) == Some(channel.as_ref())
    });

  if matches {
    Ok(())
  } else {
    Err(Error::VerifyFailed)
  }
}
