/// Maximum order of the fixed predictors permitted by the format.
pub const MAX_FIXED_ORDER: usize = 4;

/// Maximum LPC order permitted by the format.
pub const MAX_LPC_ORDER: usize   = 32;

/// Maximum partition order of a Rice partitioned residual.
pub const MAX_PARTITION_ORDER: u32 = 15;

/// A single channel of audio data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subframe {
  /// Data containing one of the four different types of subframes.
  pub data: Data,
  /// Number of wasted bits within each sample.
  pub wasted_bits: u32,
}

/// General enum that holds all the different subframe data types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data {
  /// A single value that represents a constant subframe.
  Constant(i64),
  /// An uncompressed subframe.
  Verbatim(Vec<i64>),
  /// Fixed linear prediction subframe.
  Fixed(Fixed),
  /// FIR linear prediction subframe.
  LPC(LPC),
}

impl Data {
  /// The 6-bit type code written in the subframe header.
  pub fn type_code(&self) -> u8 {
    match *self {
      Data::Constant(_)      => 0b000000,
      Data::Verbatim(_)      => 0b000001,
      Data::Fixed(ref fixed) => 0b001000 | fixed.order,
      Data::LPC(ref lpc)     => 0b100000 | (lpc.order - 1),
    }
  }
}

/// Fixed linear prediction subframe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixed {
  /// Residual coding method.
  pub entropy_coding_method: EntropyCodingMethod,
  /// Polynomial order.
  pub order: u8,
  /// Samples used to warm up, or prime, the predictor.
  pub warmup: [i64; MAX_FIXED_ORDER],
  /// Remaining samples after the warm up samples.
  pub residual: Vec<i64>,
}

/// Finite Impulse Response (FIR) linear prediction subframe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LPC {
  /// Residual coding method.
  pub entropy_coding_method: EntropyCodingMethod,
  /// FIR order.
  pub order: u8,
  /// Quantized FIR filter coefficient precision in bits.
  pub qlp_coeff_precision: u8,
  /// Quantized linear predictor coefficient shift needed in bits.
  pub quantization_level: i8,
  /// FIR filter coefficients.
  pub qlp_coefficients: [i32; MAX_LPC_ORDER],
  /// Samples used to warm up, or prime, the predictor.
  pub warmup: [i64; MAX_LPC_ORDER],
  /// Remaining samples after the warm up samples.
  pub residual: Vec<i64>,
}

/// Header for the entropy coding method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntropyCodingMethod {
  /// The type of coding method being used.
  pub method_type: CodingMethod,
  /// Data for each entropy coding method partition.
  pub data: PartitionedRice,
}

/// The available entropy coding methods.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CodingMethod {
  /// Coding partition with a 4-bit Rice parameter.
  PartitionedRice,
  /// Coding partition with a 5-bit Rice parameter.
  PartitionedRice2,
}

impl CodingMethod {
  /// Size in bits of each partition's Rice parameter.
  pub fn parameter_size(&self) -> usize {
    match *self {
      CodingMethod::PartitionedRice  => 4,
      CodingMethod::PartitionedRice2 => 5,
    }
  }

  /// Parameter value that marks a partition as unencoded.
  pub fn escape_code(&self) -> u32 {
    match *self {
      CodingMethod::PartitionedRice  => 0b1111,
      CodingMethod::PartitionedRice2 => 0b11111,
    }
  }
}

/// Header for a Rice partitioned residual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionedRice {
  /// Partition order.
  pub order: u32,
  /// Rice parameters and/or raw bits.
  pub contents: PartitionedRiceContents,
}

/// Contents of a Rice partitioned residual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionedRiceContents {
  /// Rice parameter of each partition, the escape code for unencoded ones.
  pub parameters: Vec<u32>,
  /// Bits per residual of unencoded partitions, zero for Rice coded ones.
  pub raw_bits: Vec<u32>,
}

impl PartitionedRiceContents {
  pub fn new(capacity: usize) -> PartitionedRiceContents {
    PartitionedRiceContents {
      parameters: vec![0; capacity],
      raw_bits: vec![0; capacity],
    }
  }
}
