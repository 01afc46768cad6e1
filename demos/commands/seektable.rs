use flac::metadata::SeekPoint;
use flac::{BlockData, Stream};
use serde::Deserialize;

pub const USAGE: &'static str = "
Usage: metadata seektable <filename>
       metadata seektable --help

Options:
  -h, --help  Show this message.
";

#[derive(Debug, Deserialize)]
pub struct Arguments {
  arg_filename: String,
}

fn print_seek_table(seek_points: &[SeekPoint]) {
  println!("Number of Seek Points: {}", seek_points.len());

  for (count, seek_point) in seek_points.iter().enumerate() {
    println!("Seek Point #{}", count);
    println!("  Sample number: {}", seek_point.sample_number);
    println!("  Stream offset: {}", seek_point.stream_offset);
    println!("  Frame samples: {}", seek_point.frame_samples);
  }
}

pub fn run(args: &Arguments) -> Result<(), flac::Error> {
  let stream = Stream::from_file(&args.arg_filename)?;

  for block in stream.metadata() {
    match block.data {
      BlockData::SeekTable(ref seek_points) => print_seek_table(seek_points),
      _                                     => continue,
    }
  }

  Ok(())
}
