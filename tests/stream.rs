use flac::frame::{
  write_frame, ChannelAssignment, Footer, Frame, Header, NumberType,
};
use flac::metadata::{write_block, write_marker};
use flac::subframe::{
  CodingMethod, Data, EntropyCodingMethod, Fixed, PartitionedRice,
  PartitionedRiceContents, Subframe,
};
use flac::{
  encode, frame_parser, metadata_parser, BlockData, EncoderConfig, Stream,
  StreamInfo,
};

fn sine(length: usize, period: f64, amplitude: f64) -> Vec<i32> {
  (0..length).map(|i| {
    let phase = 2.0 * std::f64::consts::PI * i as f64 / period;

    (phase.sin() * amplitude).round() as i32
  }).collect()
}

fn noise(length: usize, seed: u32, bits_per_sample: usize) -> Vec<i32> {
  let mut state = seed;
  let shift     = 32 - bits_per_sample as u32;

  (0..length).map(|_| {
    state = state.wrapping_mul(1664525).wrapping_add(1013904223);

    (state as i32) >> shift
  }).collect()
}

fn config(block_size: usize) -> EncoderConfig {
  EncoderConfig {
    block_size: block_size,
    ..EncoderConfig::default()
  }
}

// Byte offsets of every frame in an encoded stream.
fn frame_offsets(bytes: &[u8]) -> Vec<usize> {
  let (mut input, _) = metadata_parser(bytes).unwrap();
  let info           = Stream::from_buffer(bytes).unwrap().info();
  let mut offsets    = Vec::new();

  while !input.is_empty() {
    offsets.push(bytes.len() - input.len());

    input = frame_parser(input, &info).unwrap().0;
  }

  offsets
}

#[test]
fn test_decoded_md5_sum() {
  let inputs = [ (vec![noise(3000, 1, 8)], 8)
               , (vec![sine(5000, 100.0, 3000.0), noise(5000, 2, 16)], 16)
               , (vec![noise(2000, 3, 24), sine(2000, 37.5, 1e6),
                       noise(2000, 4, 24)], 24)
               ];

  for &(ref channels, bits_per_sample) in &inputs {
    let bytes  = encode(channels, 44100, bits_per_sample, &config(1152))
                   .unwrap();
    let stream = Stream::from_buffer(&bytes).unwrap();
    let info   = stream.info();
    let offset = (info.bits_per_sample as usize + 7) / 8;
    let mut md5 = md5::Context::new();

    for sample in stream.iter() {
      md5.consume(&sample.to_le_bytes()[0..offset]);
    }

    assert_eq!(md5.compute().0, info.md5_sum);
    assert_eq!(stream.verify_md5(), Some(true));
  }
}

#[test]
fn test_round_trip_stereo_modes() {
  let base   = sine(4096, 64.0, 20000.0);
  let inputs = [ (base.clone(), base.clone())
               , (base.clone(), base.iter().map(|s| s / 2).collect())
               , (noise(4096, 5, 16), base.clone())
               , (base.clone(), base.iter().map(|s| -s).collect())
               , (noise(4096, 6, 16), noise(4096, 7, 16))
               ];

  for &(ref left, ref right) in &inputs {
    for &decorrelation in &[true, false] {
      let config = EncoderConfig {
        block_size: 1024,
        stereo_decorrelation: decorrelation,
        ..EncoderConfig::default()
      };
      let bytes  = encode(&[left, right], 48000, 16, &config).unwrap();
      let stream = Stream::from_buffer(&bytes).unwrap();

      assert_eq!(stream.channel(0), Some(&left[..]));
      assert_eq!(stream.channel(1), Some(&right[..]));
      assert_eq!(stream.frames_decoded(), 4);
      assert_eq!(stream.frames_skipped(), 0);
    }
  }
}

#[test]
fn test_round_trip_extremes() {
  let loud  = (0..3000).map(|i| if i % 3 == 0 { i32::MAX } else { i32::MIN })
                       .collect::<Vec<_>>();
  let quiet = (0..3000).map(|i| (i % 7) - 3).collect::<Vec<_>>();
  let bytes = encode(&[&loud, &quiet], 96000, 32, &config(4096)).unwrap();

  let stream = Stream::from_buffer(&bytes).unwrap();

  assert_eq!(stream.channel(0), Some(&loud[..]));
  assert_eq!(stream.channel(1), Some(&quiet[..]));
}

#[test]
fn test_boundary_block_size() {
  let samples = sine(1000, 50.0, 1000.0);
  let bytes   = encode(&[&samples], 44100, 16, &config(256)).unwrap();
  let stream  = Stream::from_buffer(&bytes).unwrap();

  assert_eq!(stream.info().max_block_size, 256);
  assert_eq!(stream.frames_decoded(), 4);
  assert_eq!(stream.len(), 1000);
  assert_eq!(stream.iter().len(), 1000);
  assert_eq!(stream.channel(0), Some(&samples[..]));
}

#[test]
fn test_corruption_resilience() {
  let samples = sine(8 * 512, 80.0, 12000.0);
  let mut bytes = encode(&[&samples], 44100, 16, &config(512)).unwrap();

  let offsets = frame_offsets(&bytes);

  assert_eq!(offsets.len(), 8);

  // Scramble the middle of the fourth frame.
  let middle = (offsets[3] + offsets[4]) / 2;

  bytes[middle]     ^= 0xa5;
  bytes[middle + 1] ^= 0x3c;

  let stream  = Stream::from_buffer(&bytes).unwrap();
  let decoded = stream.channel(0).unwrap();

  assert_eq!(stream.frames_decoded(), 7);
  assert!(stream.frames_skipped() >= 1);
  assert_eq!(decoded.len(), samples.len());
  assert_eq!(&decoded[..1536], &samples[..1536]);
  assert!(decoded[1536..2048].iter().all(|&sample| sample == 0));
  assert_eq!(&decoded[2048..], &samples[2048..]);
}

#[test]
fn test_every_byte_corrupted() {
  let left  = sine(96, 20.0, 500.0);
  let right = noise(96, 8, 12);
  let bytes = encode(&[&left, &right], 22050, 12, &config(32)).unwrap();

  for index in 0..bytes.len() {
    let mut corrupted = bytes.clone();

    corrupted[index] ^= 0xff;

    // Fatal errors are fine, panics are not.
    if let Ok(stream) = Stream::from_buffer(&corrupted) {
      let _ = stream.iter().count();
      let _ = stream.verify_md5();
    }
  }
}

#[test]
fn test_prediction_overflow() {
  let mut info = StreamInfo::new();

  info.min_block_size  = 1024;
  info.max_block_size  = 1024;
  info.sample_rate     = 44100;
  info.channels        = 1;
  info.bits_per_sample = 32;
  info.total_samples   = 1024;

  // Escaped partition of 31 bit residuals, each as large as they go.
  let method = EntropyCodingMethod {
    method_type: CodingMethod::PartitionedRice,
    data: PartitionedRice {
      order: 0,
      contents: PartitionedRiceContents {
        parameters: vec![0b1111],
        raw_bits: vec![31],
      },
    },
  };

  let warmup = [i32::MAX as i64, i32::MIN as i64,
                i32::MAX as i64, i32::MIN as i64];

  let fixed = Fixed {
    entropy_coding_method: method,
    order: 4,
    warmup: warmup,
    residual: vec![(1 << 30) - 1; 1020],
  };

  let frame = Frame {
    header: Header {
      block_size: 1024,
      sample_rate: 44100,
      channels: 1,
      channel_assignment: ChannelAssignment::Independent,
      bits_per_sample: 32,
      number: NumberType::Frame(0),
      crc: 0,
    },
    subframes: vec![Subframe { data: Data::Fixed(fixed), wasted_bits: 0 }],
    footer: Footer(0),
  };

  let mut bytes = Vec::new();

  write_marker(&mut bytes);
  write_block(&BlockData::StreamInfo(info), true, &mut bytes);
  bytes.extend_from_slice(&write_frame(&frame));

  // The prediction leaves the 32 bit range after a few samples, which
  // wraps instead of aborting the decode.
  let stream  = Stream::from_buffer(&bytes).unwrap();
  let decoded = stream.channel(0).unwrap();

  assert_eq!(stream.frames_decoded(), 1);
  assert_eq!(decoded.len(), 1024);
  assert_eq!(&decoded[..4], &[i32::MAX, i32::MIN, i32::MAX, i32::MIN]);
}

#[test]
fn test_truncated_stream() {
  let samples = sine(2048, 30.0, 100.0);
  let bytes   = encode(&[&samples], 44100, 16, &config(512)).unwrap();
  let offsets = frame_offsets(&bytes);
  let stream  = Stream::from_buffer(&bytes[..offsets[3] + 10]).unwrap();

  assert_eq!(stream.frames_decoded(), 3);
  assert_eq!(stream.channel(0), Some(&samples[..1536]));
}

#[test]
fn test_iter() {
  let left   = vec![1, 2, 3];
  let right  = vec![-1, -2, -3];
  let bytes  = encode(&[&left, &right], 44100, 16, &config(16)).unwrap();
  let stream = Stream::from_buffer(&bytes).unwrap();

  let mut iter = stream.iter();

  assert_eq!(iter.size_hint(), (6, Some(6)));
  assert_eq!(iter.next(), Some(1));
  assert_eq!(iter.size_hint(), (5, Some(5)));
  assert_eq!(iter.collect::<Vec<_>>(), [-1, 2, -2, 3, -3]);

  let mut samples = Vec::new();

  for sample in &stream {
    samples.push(sample);
  }

  assert_eq!(samples, [1, -1, 2, -2, 3, -3]);
}
