mod types;
mod parser;
mod encoder;

pub use self::types::{
  STREAM_INFO, PADDING, SEEK_TABLE, VORBIS_COMMENT,
  STREAM_INFO_SIZE, SEEK_POINT_SIZE, PLACEHOLDER_SEEK_POINT,
  Block, BlockData,
  StreamInfo, SeekPoint, VorbisComment,
};

pub use self::parser::{
  metadata_parser,
  marker, header, block, stream_info, seek_table, vorbis_comment,
};
pub use self::encoder::{write_marker, write_block, block_bytes};
