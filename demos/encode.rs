use docopt::Docopt;
use flac::{CompressionLevel, Encoder, EncoderConfig};
use serde::Deserialize;

use std::env;
use std::fs;
use std::process;

const USAGE: &'static str = "
Usage: encode [options] [--tag=<tag>...] <input> <output>
       encode --help

Options:
  --level=<n>         Compression level from 0 (fastest) to 8 (best).
                      [default: 5]
  --block-size=<n>    Samples per frame, overrides the level's block size.
  --tag=<tag>         Add a NAME=value comment.
  --no-decorrelation  Code stereo channels independently.
  --verify            Decode the result and compare it with the input.
  -h, --help          Show this message.
";

#[derive(Deserialize)]
struct Arguments {
  arg_input: String,
  arg_output: String,
  flag_level: u8,
  flag_block_size: Option<usize>,
  flag_tag: Vec<String>,
  flag_no_decorrelation: bool,
  flag_verify: bool,
}

fn config(args: &Arguments) -> EncoderConfig {
  let mut config = EncoderConfig::from(CompressionLevel::from(args.flag_level));

  if let Some(block_size) = args.flag_block_size {
    config.block_size = block_size;
  }

  for tag in &args.flag_tag {
    match tag.find('=') {
      Some(index) => config = config.comment(&tag[..index], &tag[index + 1..]),
      None        => eprintln!("ignoring tag without a `=`: {}", tag),
    }
  }

  config.stereo_decorrelation = !args.flag_no_decorrelation;
  config.verify               = args.flag_verify;

  config
}

fn encode_file(args: &Arguments) -> Result<usize, Box<dyn std::error::Error>> {
  let mut reader = hound::WavReader::open(&args.arg_input)?;
  let spec       = reader.spec();

  if spec.sample_format != hound::SampleFormat::Int {
    return Err("only integer WAV samples can be encoded".into());
  }

  let channels   = spec.channels as usize;
  let mut planar = vec![Vec::with_capacity(reader.duration() as usize);
                        channels];

  for (index, sample) in reader.samples::<i32>().enumerate() {
    planar[index % channels].push(sample?);
  }

  let encoder = Encoder::new(config(args))?;
  let bytes   = encoder.encode(&planar, spec.sample_rate,
                               spec.bits_per_sample as usize)?;

  fs::write(&args.arg_output, &bytes)?;

  Ok(bytes.len())
}

fn main() {
  let args: Arguments = Docopt::new(USAGE)
    .and_then(|d| d.argv(env::args()).deserialize())
    .unwrap_or_else(|e| e.exit());

  match encode_file(&args) {
    Ok(size)   => println!("encoded: {} -> {} ({} bytes)", args.arg_input,
                           args.arg_output, size),
    Err(error) => {
      eprintln!("encode: {}", error);

      process::exit(1);
    }
  }
}
