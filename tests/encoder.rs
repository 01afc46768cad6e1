use flac::subframe::Data;
use flac::{
  encode, frame_parser, metadata_parser,
  BlockData, CompressionLevel, Encoder, EncoderConfig, Error, Stream,
};

fn ramp(length: usize) -> Vec<i32> {
  (0..length as i32).collect()
}

fn noise(length: usize, seed: u32, bits_per_sample: usize) -> Vec<i32> {
  let mut state = seed;
  let shift     = 32 - bits_per_sample as u32;

  (0..length).map(|_| {
    state = state.wrapping_mul(22695477).wrapping_add(1);

    (state as i32) >> shift
  }).collect()
}

// Decodes the first frame's subframes of an encoded stream.
fn first_frame_types(bytes: &[u8]) -> Vec<Data> {
  let (input, _) = metadata_parser(bytes).unwrap();
  let info       = Stream::from_buffer(bytes).unwrap().info();
  let (_, frame) = frame_parser(input, &info).unwrap();

  frame.subframes.into_iter().map(|subframe| subframe.data).collect()
}

#[test]
fn test_encode_silence() {
  let silence = vec![0i32; 1000];
  let bytes   = encode(&[&silence], 44100, 16, &EncoderConfig::default())
                  .unwrap();

  let data = first_frame_types(&bytes);

  assert_eq!(data, [Data::Constant(0)]);
  assert_eq!(data[0].type_code(), 0);

  let stream = Stream::from_buffer(&bytes).unwrap();

  assert_eq!(stream.channel(0), Some(&silence[..]));
}

#[test]
fn test_encode_ramp() {
  let samples = ramp(1000);
  let bytes   = encode(&[&samples], 44100, 16, &EncoderConfig::default())
                  .unwrap();

  match first_frame_types(&bytes)[0] {
    Data::Fixed(ref fixed) => assert!(fixed.order == 1 || fixed.order == 2),
    ref data               => panic!("expected a fixed subframe, got {:?}",
                                     data),
  }

  assert_eq!(Stream::from_buffer(&bytes).unwrap().channel(0),
             Some(&samples[..]));
}

#[test]
fn test_encode_errors() {
  let samples = ramp(100);
  let config  = EncoderConfig::default();
  let none    = Vec::<Vec<i32>>::new();

  assert!(matches!(encode(&none, 44100, 16, &config),
                   Err(Error::EmptyInput)));
  assert!(matches!(encode(&[Vec::<i32>::new()], 44100, 16, &config),
                   Err(Error::EmptyInput)));
  assert!(matches!(encode(&[ramp(10), ramp(11)], 44100, 16, &config),
                   Err(Error::MismatchedChannelLengths)));

  let inputs = [ (vec![samples.clone()], 0, 16)
               , (vec![samples.clone()], 700000, 16)
               , (vec![samples.clone(); 9], 44100, 16)
               , (vec![samples.clone()], 44100, 2)
               , (vec![samples.clone()], 44100, 40)
               , (vec![vec![128]], 44100, 8)
               , (vec![vec![-129]], 44100, 8)
               ];

  for &(ref channels, sample_rate, bits_per_sample) in &inputs {
    let result = encode(channels, sample_rate, bits_per_sample, &config);

    match result {
      Err(error) => assert!(error.is_fatal()),
      Ok(_)      => panic!("{} Hz, {} channels, {} bits should fail",
                           sample_rate, channels.len(), bits_per_sample),
    }
  }

  let invalid = EncoderConfig {
    block_size: 8,
    ..EncoderConfig::default()
  };

  assert!(matches!(Encoder::new(invalid), Err(Error::InvalidParameter(_))));
}

#[test]
fn test_encode_md5() {
  let left  = noise(3000, 1, 20);
  let right = noise(3000, 2, 20);
  let bytes = encode(&[&left, &right], 44100, 20, &EncoderConfig::default())
                .unwrap();

  let mut md5 = md5::Context::new();

  for (l, r) in left.iter().zip(&right) {
    md5.consume(&l.to_le_bytes()[0..3]);
    md5.consume(&r.to_le_bytes()[0..3]);
  }

  let info = Stream::from_buffer(&bytes).unwrap().info();

  assert_eq!(md5.compute().0, info.md5_sum);
  assert_eq!(info.bits_per_sample, 20);
  assert_eq!(info.total_samples, 3000);
}

#[test]
fn test_encode_comments() {
  let config = EncoderConfig::default()
    .comment("title", "Sunset")
    .comment("Artist", "Nobody");
  let bytes  = encode(&[ramp(50)], 44100, 16, &config).unwrap();

  let (_, blocks) = metadata_parser(&bytes).unwrap();

  assert_eq!(blocks.len(), 2);
  assert!(!blocks[0].is_last);
  assert!(blocks[1].is_last);

  let stream = Stream::from_buffer(&bytes).unwrap();

  match stream.metadata()[0].data {
    BlockData::VorbisComment(ref comment) => {
      assert_eq!(comment.vendor_string, config.vendor);
      assert_eq!(comment.get("TITLE"), Some("Sunset"));
      assert_eq!(comment.get("artist"), Some("Nobody"));
      assert_eq!(comment.comments[1].0, "ARTIST");
    }
    ref data                              => {
      panic!("expected a vorbis comment, got {:?}", data)
    }
  }

  let plain = encode(&[ramp(50)], 44100, 16, &EncoderConfig::default())
                .unwrap();

  assert!(Stream::from_buffer(&plain).unwrap().metadata().is_empty());
}

#[test]
fn test_compression_levels() {
  let left  = (0..6000).map(|i| ((i as f64 / 9.0).sin() * 9000.0) as i32)
                       .collect::<Vec<_>>();
  let right = left.iter().zip(noise(6000, 3, 8))
                  .map(|(sample, noise)| sample / 2 + noise)
                  .collect::<Vec<_>>();

  for level in 0..9u8 {
    let encoder = Encoder::with_level(CompressionLevel::from(level));
    let bytes   = encoder.encode(&[&left, &right], 44100, 16).unwrap();
    let stream  = Stream::from_buffer(&bytes).unwrap();

    assert_eq!(stream.channel(0), Some(&left[..]));
    assert_eq!(stream.channel(1), Some(&right[..]));
  }

  let fastest = EncoderConfig::from(CompressionLevel::Fastest);
  let default = EncoderConfig {
    block_size: fastest.block_size,
    ..EncoderConfig::from(CompressionLevel::Default)
  };

  let small = encode(&[&left, &right], 44100, 16, &default).unwrap();
  let large = encode(&[&left, &right], 44100, 16, &fastest).unwrap();

  assert!(small.len() <= large.len());
}

#[test]
fn test_sample_formats() {
  let inputs = [ (4, 8000)
               , (8, 11025)
               , (12, 22050)
               , (16, 100)
               , (20, 96000)
               , (24, 192000)
               , (24, 655350)
               , (32, 44100)
               ];

  for &(bits_per_sample, sample_rate) in &inputs {
    let channels = (0..3).map(|seed| noise(700, seed, bits_per_sample))
                         .collect::<Vec<_>>();
    let config   = EncoderConfig {
      block_size: 256,
      verify: true,
      ..EncoderConfig::default()
    };
    let bytes    = encode(&channels, sample_rate, bits_per_sample, &config)
                     .unwrap();
    let stream   = Stream::from_buffer(&bytes).unwrap();
    let info     = stream.info();

    assert_eq!(info.sample_rate, sample_rate);
    assert_eq!(info.bits_per_sample as usize, bits_per_sample);
    assert_eq!(info.channels, 3);

    for (index, channel) in channels.iter().enumerate() {
      assert_eq!(stream.channel(index), Some(&channel[..]));
    }
  }
}

#[test]
fn test_eight_channels() {
  let channels = (0..8).map(|seed| noise(300, seed, 16)).collect::<Vec<_>>();
  let bytes    = encode(&channels, 48000, 16, &EncoderConfig::default())
                   .unwrap();
  let stream   = Stream::from_buffer(&bytes).unwrap();
  let expected = (0..300).flat_map(|i| channels.iter().map(move |c| c[i]))
                         .collect::<Vec<_>>();

  assert_eq!(stream.iter().collect::<Vec<_>>(), expected);
}
