//! An implementation of [FLAC](https://xiph.org/flac), free lossless audio
//! codec, written in Rust.
//!
//! Decoding reads a whole stream into memory:
//!
//! ```no_run
//! use flac::Stream;
//!
//! let stream   = Stream::from_file("input.flac").unwrap();
//! let channels = stream.info().channels as usize;
//!
//! // Samples come interleaved, one per channel for each instant.
//! let peak = stream.iter().map(|sample| sample.abs()).max();
//!
//! println!("{} channels, peak {:?}", channels, peak);
//! ```
//!
//! Encoding takes one slice of samples per channel:
//!
//! ```
//! use flac::{encode, EncoderConfig, Stream};
//!
//! let left   = vec![0, 1, 2, 3];
//! let right  = vec![0, -1, -2, -3];
//! let bytes  = encode(&[left, right], 44100, 16, &EncoderConfig::default())
//!                .unwrap();
//! let stream = Stream::from_buffer(&bytes).unwrap();
//!
//! assert_eq!(stream.channel(1), Some(&[0, -1, -2, -3][..]));
//! ```

mod utility;
pub mod error;
pub mod metadata;
pub mod frame;
pub mod subframe;
pub mod stream;
pub mod encoder;

pub use error::{Error, Result};
pub use utility::BitWriter;
pub use metadata::{metadata_parser, Block, BlockData, StreamInfo};
pub use frame::{frame_parser, Frame};
pub use subframe::{subframe_parser, Subframe};
pub use stream::Stream;
pub use encoder::{encode, CompressionLevel, Encoder, EncoderConfig};
