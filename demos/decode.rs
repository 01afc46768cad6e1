use docopt::Docopt;
use flac::Stream;
use serde::Deserialize;

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const USAGE: &'static str = "
Usage: decode <input> <output>
       decode <input>... --dir=<dir>
       decode --help

Options:
  --dir=<dir>  Decode every input into this directory.
  -h, --help   Show this message.
";

#[derive(Deserialize)]
struct Arguments {
  arg_input: Vec<String>,
  arg_output: Option<String>,
  flag_dir: Option<String>,
}

fn io_error(kind: io::ErrorKind, message: &str) -> hound::Error {
  hound::Error::IoError(io::Error::new(kind, message))
}

fn decode_file(input_file: &str, output_file: &str)
               -> Result<(), hound::Error> {
  let stream = Stream::from_file(input_file).map_err(|error| {
    io_error(io::ErrorKind::InvalidData, &error.to_string())
  })?;

  let info = stream.info();
  let spec = hound::WavSpec {
    channels: info.channels as u16,
    sample_rate: info.sample_rate,
    bits_per_sample: info.bits_per_sample as u16,
    sample_format: hound::SampleFormat::Int,
  };

  if stream.frames_skipped() > 0 {
    eprintln!("warning: {} skipped {} corrupted frames", input_file,
              stream.frames_skipped());
  }

  let mut output = hound::WavWriter::create(output_file, spec)?;

  for sample in &stream {
    output.write_sample(sample)?;
  }

  output.finalize()
}

fn to_output_file(buffer: &mut PathBuf, path: &Path, directory: &str)
                  -> Result<(), hound::Error> {
  buffer.push(directory);

  path.file_name().map(|name| {
    buffer.push(name);
    buffer.set_extension("wav");
  }).ok_or_else(|| io_error(io::ErrorKind::NotFound, "no file name found"))
}

fn decode_all_files(input_files: &[String], directory: &str)
                    -> Result<(), hound::Error> {
  let dir_path = Path::new(directory);

  if !dir_path.exists() {
    fs::create_dir(dir_path)?;
  }

  for input_file in input_files {
    let mut buffer = PathBuf::new();
    let path       = Path::new(input_file);

    to_output_file(&mut buffer, path, directory)?;

    let output_file = buffer.to_str().ok_or_else(|| {
      io_error(io::ErrorKind::InvalidInput, "invalid unicode with file path")
    })?;

    decode_file(input_file, output_file)?;

    println!("decoded: {} -> {}", input_file, output_file);
  }

  Ok(())
}

fn main() {
  let args: Arguments = Docopt::new(USAGE)
    .and_then(|d| d.argv(env::args()).deserialize())
    .unwrap_or_else(|e| e.exit());

  let result = if let Some(ref output_file) = args.arg_output {
    let input_file = &args.arg_input[0];

    decode_file(input_file, output_file).map(|_| {
      println!("decoded: {} -> {}", input_file, output_file);
    })
  } else if let Some(ref directory) = args.flag_dir {
    decode_all_files(&args.arg_input, directory)
  } else {
    Ok(())
  };

  if let Err(error) = result {
    eprintln!("decode: {}", error);
  }
}
