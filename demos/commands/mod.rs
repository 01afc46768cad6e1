#[macro_use]
mod utility;

pub mod streaminfo;
pub mod comments;
pub mod seektable;

pub use self::utility::{hex_string, parse};
