mod commands;

use docopt::Docopt;
use serde::Deserialize;

use std::env;
use std::process;

const USAGE: &'static str = "
Usage: metadata <command> [<args>...]
       metadata [options]

Options:
  -h, --help  Show this message.

Commands:
  streaminfo  Display stream information.
  comments    Display or export the vorbis comments.
  seektable   Display seek points.
";

#[derive(Debug, Deserialize)]
struct Arguments {
  arg_command: Option<Command>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Command {
  StreamInfo,
  Comments,
  SeekTable,
}

fn handle_subcommand(command: Command) -> Result<(), flac::Error> {
  match command {
    Command::StreamInfo => {
      let args = commands::parse(commands::streaminfo::USAGE);

      commands::streaminfo::run(&args)
    }
    Command::Comments   => {
      let args = commands::parse(commands::comments::USAGE);

      commands::comments::run(&args)
    }
    Command::SeekTable  => {
      let args = commands::parse(commands::seektable::USAGE);

      commands::seektable::run(&args)
    }
  }
}

fn main() {
  let args: Arguments = Docopt::new(USAGE)
    .and_then(|d| d.options_first(true).argv(env::args()).deserialize())
    .unwrap_or_else(|e| e.exit());

  let command = match args.arg_command {
    Some(command) => command,
    None          => {
      println!("{}", USAGE.trim());

      return;
    }
  };

  if let Err(error) = handle_subcommand(command) {
    eprintln!("metadata: {}", error);

    process::exit(1);
  }
}
