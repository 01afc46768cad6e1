mod types;
mod parser;
mod decoder;
mod encoder;
mod residual;

pub use self::types::{
  MAX_FIXED_ORDER, MAX_LPC_ORDER, MAX_PARTITION_ORDER,
  Subframe,
  Data,
  Fixed, LPC,
  EntropyCodingMethod, CodingMethod, PartitionedRice, PartitionedRiceContents,
};

pub use self::parser::subframe_parser;
pub use self::decoder::{
  decode, fixed_restore_signal, lpc_restore_signal,
  fixed_prediction, lpc_prediction,
};
pub use self::encoder::{
  encode, write_subframe,
  wasted_bits, fixed_residual, lpc_residual,
  autocorrelation, levinson_durbin, quantize_coefficients,
};
pub use self::residual::{
  residual_parser, write_residual, choose_partitions, partition_samples,
  rice_decode, rice_encode,
};
