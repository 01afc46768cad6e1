use nom::IResult;

use crate::error::Error;
use crate::subframe::{
  MAX_PARTITION_ORDER,
  EntropyCodingMethod, CodingMethod, PartitionedRice, PartitionedRiceContents,
};
use crate::utility::{
  BitWriter,
  count_slice, failure, leading_zeros, take_bits, take_signed_bits,
  signed_bit_width, zigzag_decode, zigzag_encode,
};

// Largest Rice parameter for each coding method, one below the escape code.
const MAX_RICE_PARAMETER: u32  = 14;
const MAX_RICE2_PARAMETER: u32 = 30;

// Widest unencoded residual that fits the 5-bit size field.
const MAX_RAW_BITS: usize = 31;

// Number of residuals in the given partition. The first partition is
// shortened by the predictor's warm up samples.
#[inline]
fn partition_size(block_size: usize, partition_order: u32,
                  predictor_order: usize, partition: usize)
                  -> usize {
  let size = block_size >> partition_order;

  if partition == 0 { size - predictor_order } else { size }
}

/// Number of samples in a single Rice partition, or `None` when a block of
/// `block_size` samples can't be split into `2^partition_order` partitions.
pub fn partition_samples(block_size: usize, partition_order: u32,
                         predictor_order: usize)
                         -> Option<usize> {
  let partitions = 1 << partition_order;
  let size       = block_size >> partition_order;

  if partition_order > MAX_PARTITION_ORDER || block_size % partitions != 0 ||
     size < predictor_order {
    None
  } else {
    Some(size)
  }
}

// Parser for figuring out the partitioned Rice coding, which there are only
// two, and the parser fails when the value is greater than one.
fn coding_method(input: (&[u8], usize))
                 -> IResult<(&[u8], usize), CodingMethod, Error> {
  let (i, method) = take_bits(input, 2)?;

  match method {
    0 => Ok((i, CodingMethod::PartitionedRice)),
    1 => Ok((i, CodingMethod::PartitionedRice2)),
    _ => failure(Error::InvalidResidualMethod(method as u8)),
  }
}

/// Reads one Rice coded residual with the given parameter.
pub fn rice_decode(input: (&[u8], usize), parameter: u32)
                   -> IResult<(&[u8], usize), i64, Error> {
  let (i, quotient) = leading_zeros(input)?;

  if parameter > 0 && quotient >> (64 - parameter) != 0 {
    return failure(Error::ResidualOverflow);
  }

  let (i, remainder) = take_bits(i, parameter as usize)?;

  Ok((i, zigzag_decode((quotient << parameter) | remainder)))
}

/// Writes one residual Rice coded with the given parameter.
pub fn rice_encode(writer: &mut BitWriter, value: i64, parameter: u32) {
  let unsigned = zigzag_encode(value);

  writer.write_unary(unsigned >> parameter);
  writer.write_bits(unsigned, parameter as usize);
}

/// Reads a partitioned Rice residual into `residual`, which must hold
/// exactly `block_size - predictor_order` samples.
pub fn residual_parser<'a>(input: (&'a [u8], usize),
                           predictor_order: usize,
                           block_size: usize,
                           residual: &mut [i64])
                           -> IResult<(&'a [u8], usize), EntropyCodingMethod,
                                      Error> {
  debug_assert_eq!(residual.len() + predictor_order, block_size);

  let (i, method)          = coding_method(input)?;
  let (i, partition_order) = take_bits(i, 4)?;
  let partition_order      = partition_order as u32;

  if partition_samples(block_size, partition_order, predictor_order).is_none() {
    return failure(Error::InvalidPartitionOrder {
      order: partition_order,
      block_size: block_size,
    });
  }

  let param_size  = method.parameter_size();
  let escape_code = method.escape_code();
  let partitions  = 1 << partition_order;

  let mut input    = i;
  let mut start    = 0;
  let mut contents = PartitionedRiceContents::new(partitions);

  for partition in 0..partitions {
    let end     = start + partition_size(block_size, partition_order,
                                         predictor_order, partition);
    let samples = &mut residual[start..end];

    let (i, parameter) = take_bits(input, param_size)?;
    let parameter      = parameter as u32;

    let (i, _) = if parameter == escape_code {
      let (i, size) = take_bits(i, 5)?;
      let size      = size as usize;

      contents.raw_bits[partition] = size as u32;

      count_slice(|i| take_signed_bits(i, size), i, samples)?
    } else {
      count_slice(|i| rice_decode(i, parameter), i, samples)?
    };

    contents.parameters[partition] = parameter;

    input = i;
    start = end;
  }

  Ok((input, EntropyCodingMethod {
    method_type: method,
    data: PartitionedRice {
      order: partition_order,
      contents: contents,
    },
  }))
}

/// Writes a residual using the partitioning and parameters in `method`.
pub fn write_residual(writer: &mut BitWriter,
                      method: &EntropyCodingMethod,
                      predictor_order: usize,
                      residual: &[i64]) {
  let block_size      = residual.len() + predictor_order;
  let partition_order = method.data.order;
  let contents        = &method.data.contents;
  let param_size      = method.method_type.parameter_size();
  let escape_code     = method.method_type.escape_code();

  let method_bits = match method.method_type {
    CodingMethod::PartitionedRice  => 0,
    CodingMethod::PartitionedRice2 => 1,
  };

  writer.write_bits(method_bits, 2);
  writer.write_bits(partition_order as u64, 4);

  let mut start = 0;

  for (partition, &parameter) in contents.parameters.iter().enumerate() {
    let end     = start + partition_size(block_size, partition_order,
                                         predictor_order, partition);
    let samples = &residual[start..end];

    writer.write_bits(parameter as u64, param_size);

    if parameter == escape_code {
      let raw_bits = contents.raw_bits[partition] as usize;

      writer.write_bits(raw_bits as u64, 5);

      for &sample in samples {
        writer.write_signed_bits(sample, raw_bits);
      }
    } else {
      for &sample in samples {
        rice_encode(writer, sample, parameter);
      }
    }

    start = end;
  }
}

// Exact size in bits of the given zig-zag mapped residuals, Rice coded with
// `parameter`.
fn rice_bits(unsigned: &[u64], parameter: u32) -> u64 {
  unsigned.iter().fold(0u64, |bits, &value| {
    bits.saturating_add((value >> parameter) + 1 + parameter as u64)
  })
}

// Picks the cheapest Rice parameter for a partition. The starting estimate
// is `floor(log2(mean))` and its neighbours are checked exactly.
fn rice_parameter(unsigned: &[u64], max_parameter: u32) -> (u32, u64) {
  if unsigned.is_empty() {
    return (0, 0);
  }

  let sum  = unsigned.iter().fold(0u64, |sum, &value| sum.saturating_add(value));
  let mean = sum / unsigned.len() as u64;

  let estimate = if mean == 0 { 0 } else { 63 - mean.leading_zeros() };
  let estimate = estimate.min(max_parameter);
  let first    = estimate.saturating_sub(1);
  let last     = (estimate + 1).min(max_parameter);

  (first..last + 1)
    .map(|parameter| (parameter, rice_bits(unsigned, parameter)))
    .min_by_key(|&(parameter, bits)| (bits, parameter))
    .unwrap_or((0, 0))
}

// Bits per residual needed to store the partition unencoded.
fn raw_bits(samples: &[i64]) -> usize {
  if samples.iter().all(|&sample| sample == 0) {
    0
  } else {
    samples.iter().map(|&sample| signed_bit_width(sample)).max().unwrap_or(0)
  }
}

struct PartitionPlan {
  parameters: Vec<u32>,
  raw_bits: Vec<u32>,
  uses_rice2: bool,
  bits: u64,
}

fn plan_partitions(residual: &[i64], unsigned: &[u64],
                   partition_order: u32, predictor_order: usize)
                   -> PartitionPlan {
  let block_size = residual.len() + predictor_order;
  let partitions = 1 << partition_order;

  let mut plan = PartitionPlan {
    parameters: Vec::with_capacity(partitions),
    raw_bits: vec![0; partitions],
    uses_rice2: false,
    bits: 0,
  };

  let mut choices = Vec::with_capacity(partitions);
  let mut start   = 0;

  for partition in 0..partitions {
    let end = start + partition_size(block_size, partition_order,
                                     predictor_order, partition);

    let (parameter, rice) = rice_parameter(&unsigned[start..end],
                                           MAX_RICE2_PARAMETER);
    let raw               = raw_bits(&residual[start..end]);
    let escaped           = if raw <= MAX_RAW_BITS {
      Some(5 + (raw * (end - start)) as u64)
    } else {
      None
    };

    if parameter > MAX_RICE_PARAMETER {
      plan.uses_rice2 = true;
    }

    choices.push((parameter, rice, raw, escaped));
    start = end;
  }

  let param_size = if plan.uses_rice2 { 5 } else { 4 };
  let escape     = if plan.uses_rice2 { 0b11111 } else { 0b1111 };

  for (partition, (parameter, rice, raw, escaped)) in
      choices.into_iter().enumerate() {
    match escaped {
      Some(bits) if bits < rice => {
        plan.parameters.push(escape);
        plan.raw_bits[partition] = raw as u32;
        plan.bits = plan.bits.saturating_add(bits);
      }
      _                         => {
        plan.parameters.push(parameter);
        plan.bits = plan.bits.saturating_add(rice);
      }
    }

    plan.bits += param_size;
  }

  plan
}

/// Chooses the partition order and per partition Rice parameters that
/// minimize the size of `residual`, trying partition orders up to
/// `max_partition_order`. Returns the coding method and its size in bits,
/// including the method and partition order fields.
pub fn choose_partitions(residual: &[i64],
                         predictor_order: usize,
                         max_partition_order: u32)
                         -> (EntropyCodingMethod, u64) {
  let block_size = residual.len() + predictor_order;
  let unsigned   = residual.iter()
                     .map(|&sample| zigzag_encode(sample))
                     .collect::<Vec<_>>();

  let mut best: Option<(u32, PartitionPlan)> = None;

  for partition_order in 0..(max_partition_order.min(MAX_PARTITION_ORDER) + 1) {
    if partition_samples(block_size, partition_order,
                         predictor_order).is_none() {
      break;
    }

    let plan     = plan_partitions(residual, &unsigned, partition_order,
                                   predictor_order);
    let is_best  = best.as_ref().map_or(true, |&(_, ref current)| {
      plan.bits < current.bits
    });

    if is_best {
      best = Some((partition_order, plan));
    }
  }

  let (order, plan) = best.unwrap_or_else(|| {
    (0, plan_partitions(residual, &unsigned, 0, predictor_order))
  });

  let method_type = if plan.uses_rice2 {
    CodingMethod::PartitionedRice2
  } else {
    CodingMethod::PartitionedRice
  };

  let method = EntropyCodingMethod {
    method_type: method_type,
    data: PartitionedRice {
      order: order,
      contents: PartitionedRiceContents {
        parameters: plan.parameters,
        raw_bits: plan.raw_bits,
      },
    },
  };

  (method, plan.bits + 6)
}
