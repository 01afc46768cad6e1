use docopt::Docopt;
use serde::de::DeserializeOwned;

use std::env;

macro_rules! format_print (
  ($format_str: literal, $opt_str: expr, $data: expr, $no_flag: expr) => (
    {
      println!($format_str, if $no_flag {
        $opt_str
      } else {
        ""
      }, $data);
    }
  );
);

/// Parses the process arguments against a subcommand's usage string.
pub fn parse<T: DeserializeOwned>(usage: &str) -> T {
  Docopt::new(usage)
    .and_then(|d| d.argv(env::args()).deserialize())
    .unwrap_or_else(|e| e.exit())
}

pub fn hex_string(bytes: &[u8]) -> String {
  bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}
