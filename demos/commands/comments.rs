use flac::metadata::VorbisComment;
use flac::{BlockData, Stream};
use serde::Deserialize;

use std::fs::File;
use std::io::{self, Write};

pub const USAGE: &'static str = "
Usage: metadata comments [options] <filename>
       metadata comments --help

Options:
  --vendor       Show the vendor string.
  --name=NAME    Show the comments matching the `NAME`.
  --export=FILE  Export to file.
  -h, --help     Show this message.
";

#[derive(Debug, Deserialize)]
pub struct Arguments {
  arg_filename: String,
  flag_vendor: bool,
  flag_name: Option<String>,
  flag_export: Option<String>,
}

fn print_vorbis_comments(vorbis_comment: &VorbisComment, args: &Arguments) {
  let no_flags = !(args.flag_vendor || args.flag_name.is_some());

  if no_flags || args.flag_vendor {
    format_print!("{}{}", "Vendor string: ", vorbis_comment.vendor_string,
                                             no_flags);
  }

  if no_flags {
    println!("Number of Comments: {}", vorbis_comment.comments.len());

    for (index, &(ref name, ref value)) in vorbis_comment.comments
                                                         .iter()
                                                         .enumerate() {
      println!("  {}: \"{}\" = {}", index + 1, name, value);
    }
  } else if let Some(ref name) = args.flag_name {
    if let Some(value) = vorbis_comment.get(name) {
      println!("{}", value);
    }
  }
}

fn export_vorbis_comments(vorbis_comment: &VorbisComment, filename: &str)
                          -> io::Result<()> {
  let mut file = File::create(filename)?;

  for &(ref name, ref value) in &vorbis_comment.comments {
    writeln!(file, "{}={}", name, value)?;
  }

  Ok(())
}

pub fn run(args: &Arguments) -> Result<(), flac::Error> {
  let stream = Stream::from_file(&args.arg_filename)?;

  for block in stream.metadata() {
    if let BlockData::VorbisComment(ref vorbis_comment) = block.data {
      if let Some(ref filename) = args.flag_export {
        export_vorbis_comments(vorbis_comment, filename)?;
      } else {
        print_vorbis_comments(vorbis_comment, args);
      }
    }
  }

  Ok(())
}
