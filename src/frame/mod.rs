mod types;
mod parser;
mod decoder;
mod encoder;

pub use self::types::{
  MAX_CHANNELS, SYNC_CODE,
  ChannelAssignment, NumberType,
  Frame,
  Header, Footer,
};

pub use self::parser::{frame_parser, header, is_sync_code};
pub use self::decoder::decode;
pub use self::encoder::{
  encode, decorrelate, write_header, write_frame, choose_channel_assignment,
};
