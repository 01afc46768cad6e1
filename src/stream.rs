use log::{debug, warn};

use crate::error::{Error, Result};
use crate::frame::{self, frame_parser, is_sync_code, Frame, NumberType};
use crate::metadata::{metadata_parser, Block, BlockData, StreamInfo};
use crate::subframe;
use crate::utility::md5_signature;

use std::fs;
use std::path::Path;

// Sync code and header fields, a constant subframe and the CRC-16.
const MIN_FRAME_SIZE: usize = 10;

// Largest block size a frame header can describe.
const MAX_BLOCK_SIZE: usize = 65535;

enum ParserState {
  Frame,
  Resync,
  Done,
}

/// FLAC stream that decodes and hold file information.
pub struct Stream {
  info: StreamInfo,
  metadata: Vec<Block>,
  channels: Vec<Vec<i32>>,
  frames_decoded: usize,
  frames_skipped: usize,
}

impl Stream {
  /// Returns information for the current stream.
  pub fn info(&self) -> StreamInfo {
    self.info
  }

  /// Returns a slice of metadata `Block`s.
  ///
  /// This slice excludes `StreamInfo`, which is located in `Stream::info`.
  /// Everything else is related to metadata for the FLAC stream is in the
  /// slice.
  pub fn metadata(&self) -> &[Block] {
    &self.metadata
  }

  /// Constructs a decoder with the given file name.
  ///
  /// # Failures
  ///
  /// * `Error::Io` is returned when the file can't be read.
  /// * Any fatal error of `Stream::from_buffer`.
  pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Stream> {
    let buffer = fs::read(filename)?;

    Stream::from_buffer(&buffer)
  }

  /// Constructs a decoder with the given buffer, decoding every frame.
  ///
  /// This constructor assumes that an entire FLAC file is in the buffer.
  /// Frames that fail to decode are skipped and leave silence in their
  /// place.
  ///
  /// # Failures
  ///
  /// * `Error::InvalidMagic` when the buffer doesn't start with `fLaC`.
  /// * `Error::MissingStreamInfo` or `Error::InvalidStreamInfo` when the
  ///   stream parameters can't be read.
  pub fn from_buffer(buffer: &[u8]) -> Result<Stream> {
    let (frames, blocks) = metadata_parser(buffer)?;

    let mut info     = None;
    let mut metadata = Vec::with_capacity(blocks.len());

    for block in blocks {
      match block.data {
        BlockData::StreamInfo(stream_info) if info.is_none() => {
          info = Some(stream_info);
        }
        _                                                    => {
          metadata.push(block)
        }
      }
    }

    let info = info.ok_or(Error::MissingStreamInfo)?;

    if info.channels == 0 || info.bits_per_sample < 4 {
      return Err(Error::InvalidStreamInfo);
    }

    let mut stream = Stream {
      info: info,
      metadata: metadata,
      channels: vec![Vec::new(); info.channels as usize],
      frames_decoded: 0,
      frames_skipped: 0,
    };

    stream.decode_frames(frames);

    Ok(stream)
  }

  fn decode_frames(&mut self, input: &[u8]) {
    let mut state     = ParserState::Frame;
    let mut offset    = 0;
    let mut frame_end = 0;

    loop {
      state = match state {
        ParserState::Frame  => {
          if offset >= input.len() {
            ParserState::Done
          } else {
            let skipped = offset - frame_end;

            match self.handle_frame(&input[offset..], skipped) {
              Ok(consumed) => {
                offset   += consumed;
                frame_end = offset;

                ParserState::Frame
              }
              Err(error)   => {
                warn!("skipping frame at byte {}: {}", offset, error);

                self.frames_skipped += 1;
                offset              += 1;

                ParserState::Resync
              }
            }
          }
        }
        ParserState::Resync => {
          let next_sync = input[offset..].windows(2).position(is_sync_code);

          match next_sync {
            Some(skipped) => {
              debug!("resynced after {} bytes", skipped);

              offset += skipped;

              ParserState::Frame
            }
            None          => ParserState::Done,
          }
        }
        ParserState::Done   => break,
      };
    }

    let total_samples = self.info.total_samples as usize;

    if total_samples > 0 {
      for channel in &mut self.channels {
        channel.truncate(total_samples);
      }
    }
  }

  // Parses one frame and writes its samples in place, returning the number
  // of bytes it took up. `skipped` is the number of bytes passed over since
  // the last decoded frame.
  fn handle_frame(&mut self, input: &[u8], skipped: usize) -> Result<usize> {
    let (i, frame) = frame_parser(input, &self.info)?;

    let header = &frame.header;

    if header.channels != self.info.channels {
      return Err(Error::ChannelMismatch {
        expected: self.info.channels,
        found: header.channels,
      });
    }

    let block_size = header.block_size as usize;
    let start      = match header.number {
      NumberType::Frame(number)  => {
        let stride = match self.info.max_block_size {
          0    => block_size,
          size => size as usize,
        };

        number as usize * stride
      }
      NumberType::Sample(number) => number as usize,
    };

    let total_samples  = self.info.total_samples as usize;
    let max_block_size = match self.info.max_block_size {
      0    => MAX_BLOCK_SIZE,
      size => size as usize,
    };

    // A frame can only start past the decoded samples by the blocks that
    // fit in the bytes skipped to reach it.
    let limit = self.len() + max_block_size * (1 + skipped / MIN_FRAME_SIZE);

    if start > limit || (total_samples > 0 && start >= total_samples) {
      return Err(Error::InvalidNumber);
    }

    self.place(&frame, start);

    self.frames_decoded += 1;

    Ok(input.len() - i.len())
  }

  fn place(&mut self, frame: &Frame, start: usize) {
    let header     = &frame.header;
    let block_size = header.block_size as usize;
    let end        = start + block_size;
    let mut buffer = vec![0i64; block_size * frame.subframes.len()];

    for (output, data) in buffer.chunks_mut(block_size)
                                .zip(&frame.subframes) {
      subframe::decode(data, output);
    }

    frame::decode(header.channel_assignment, &mut buffer);

    for (channel, samples) in self.channels.iter_mut()
                                           .zip(buffer.chunks(block_size)) {
      if channel.len() < end {
        channel.resize(end, 0);
      }

      for (output, &sample) in channel[start..end].iter_mut().zip(samples) {
        *output = sample as i32;
      }
    }
  }

  /// Returns the decoded samples of a single channel.
  pub fn channel(&self, index: usize) -> Option<&[i32]> {
    self.channels.get(index).map(|channel| channel.as_slice())
  }

  /// Number of decoded samples per channel.
  pub fn len(&self) -> usize {
    self.channels.first().map_or(0, |channel| channel.len())
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn frames_decoded(&self) -> usize {
    self.frames_decoded
  }

  /// Number of times decoding failed and the decoder had to look for the
  /// next frame.
  pub fn frames_skipped(&self) -> usize {
    self.frames_skipped
  }

  /// Compares the MD5 of the decoded samples against the one stored in
  /// `StreamInfo`.
  ///
  /// Returns `None` when the stream doesn't carry a signature.
  pub fn verify_md5(&self) -> Option<bool> {
    if self.info.md5_sum == [0; 16] {
      None
    } else {
      let bits_per_sample = self.info.bits_per_sample as usize;

      let signature       = md5_signature(&self.channels, bits_per_sample);

      Some(signature == self.info.md5_sum)
    }
  }

  /// Returns an iterator over the decoded samples, interleaved by channel.
  pub fn iter(&self) -> Iter {
    Iter {
      stream: self,
      channel: 0,
      sample_index: 0,
    }
  }
}

/// An iterator over a reference of the decoded FLAC stream.
pub struct Iter<'a> {
  stream: &'a Stream,
  channel: usize,
  sample_index: usize,
}

impl<'a> Iterator for Iter<'a> {
  type Item = i32;

  fn next(&mut self) -> Option<Self::Item> {
    let channels = &self.stream.channels;
    let sample   = channels[self.channel].get(self.sample_index).cloned();

    if sample.is_some() {
      self.channel += 1;

      // Reset current channel
      if self.channel == channels.len() {
        self.channel       = 0;
        self.sample_index += 1;
      }
    }

    sample
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let channels     = self.stream.channels.len();
    let samples_left = (self.stream.len() - self.sample_index) * channels -
                       self.channel;

    (samples_left, Some(samples_left))
  }
}

impl<'a> ExactSizeIterator for Iter<'a> {}

impl<'a> IntoIterator for &'a Stream {
  type Item     = i32;
  type IntoIter = Iter<'a>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
