use nom::IResult;

use crate::error::Error;
use crate::frame;
use crate::subframe::{
  self, residual_parser,
  Subframe, MAX_FIXED_ORDER, MAX_LPC_ORDER,
};
use crate::utility::{
  count_slice, failure, leading_zeros, take_bits, take_signed_bits,
};

/// Parse a single channel of audio data.
pub fn subframe_parser<'a>(input: (&'a [u8], usize),
                           frame_header: &frame::Header,
                           channel: usize)
                           -> IResult<(&'a [u8], usize), Subframe, Error> {
  let block_size      = frame_header.block_size as usize;
  let bits_per_sample = frame_header.channel_bits_per_sample(channel);

  let (i, (subframe_type, has_wasted_bits)) = header(input)?;

  let (i, wasted_bits) = if has_wasted_bits {
    let (i, zeros) = leading_zeros(i)?;

    (i, zeros.saturating_add(1))
  } else {
    (i, 0)
  };

  if wasted_bits >= bits_per_sample as u64 {
    return failure(Error::InvalidWastedBits {
      wasted_bits: wasted_bits.min(u32::MAX as u64) as u32,
      bits_per_sample: bits_per_sample,
    });
  }

  let wasted_bits = wasted_bits as u32;

  let (i, subframe_data) = data(i, bits_per_sample - wasted_bits as usize,
                                block_size, subframe_type)?;

  Ok((i, Subframe {
    data: subframe_data,
    wasted_bits: wasted_bits,
  }))
}

// Parses the first byte of the subframe. The first bit must be zero to
// prevent sync-fooling, next six bits determines the subframe data type.
// Last bit is set when there are wasted bits per sample.
pub fn header(input: (&[u8], usize))
              -> IResult<(&[u8], usize), (u8, bool), Error> {
  let (i, byte) = take_bits(input, 8)?;
  let byte      = byte as u8;

  let is_valid        = (byte >> 7) == 0;
  let subframe_type   = (byte >> 1) & 0b111111;
  let has_wasted_bits = (byte & 0b01) == 1;

  if is_valid {
    Ok((i, (subframe_type, has_wasted_bits)))
  } else {
    failure(Error::InvalidSubframePadding)
  }
}

fn data(input: (&[u8], usize),
        bits_per_sample: usize,
        block_size: usize,
        subframe_type: u8)
        -> IResult<(&[u8], usize), subframe::Data, Error> {
  let order = match subframe_type {
    0b001000..=0b001100 => (subframe_type & 0b000111) as usize,
    0b100000..=0b111111 => (subframe_type & 0b011111) as usize + 1,
    _                   => 0,
  };

  if order > block_size {
    return failure(Error::InvalidSubframeType(subframe_type));
  }

  match subframe_type {
    0b000000            => constant(input, bits_per_sample),
    0b000001            => verbatim(input, bits_per_sample, block_size),
    0b001000..=0b001100 => fixed(input, order, bits_per_sample, block_size),
    0b100000..=0b111111 => lpc(input, order, bits_per_sample, block_size),
    _                   => failure(Error::InvalidSubframeType(subframe_type)),
  }
}

pub fn constant(input: (&[u8], usize), bits_per_sample: usize)
                -> IResult<(&[u8], usize), subframe::Data, Error> {
  let (i, value) = take_signed_bits(input, bits_per_sample)?;

  Ok((i, subframe::Data::Constant(value)))
}

pub fn verbatim(input: (&[u8], usize),
                bits_per_sample: usize,
                block_size: usize)
                -> IResult<(&[u8], usize), subframe::Data, Error> {
  let mut samples = vec![0; block_size];

  let (i, _) = count_slice(|i| take_signed_bits(i, bits_per_sample), input,
                           &mut samples)?;

  Ok((i, subframe::Data::Verbatim(samples)))
}

pub fn fixed(input: (&[u8], usize),
             order: usize,
             bits_per_sample: usize,
             block_size: usize)
             -> IResult<(&[u8], usize), subframe::Data, Error> {
  debug_assert!(order <= MAX_FIXED_ORDER);

  let mut warmup   = [0; MAX_FIXED_ORDER];
  let mut residual = vec![0; block_size - order];

  let (i, _) = count_slice(|i| take_signed_bits(i, bits_per_sample), input,
                           &mut warmup[0..order])?;

  let (i, entropy_coding_method) = residual_parser(i, order, block_size,
                                                   &mut residual)?;

  Ok((i, subframe::Data::Fixed(subframe::Fixed {
    entropy_coding_method: entropy_coding_method,
    order: order as u8,
    warmup: warmup,
    residual: residual,
  })))
}

// This parser finds the bit length for each quantized linear predictor
// coefficient. To prevent sync fooling, the four bit value can't be all ones.
fn qlp_coefficient_precision(input: (&[u8], usize))
                             -> IResult<(&[u8], usize), u8, Error> {
  let (i, precision) = take_bits(input, 4)?;

  if precision == 0b1111 {
    failure(Error::InvalidLpcPrecision)
  } else {
    Ok((i, precision as u8 + 1))
  }
}

pub fn lpc(input: (&[u8], usize),
           order: usize,
           bits_per_sample: usize,
           block_size: usize)
           -> IResult<(&[u8], usize), subframe::Data, Error> {
  debug_assert!(order >= 1 && order <= MAX_LPC_ORDER);

  let mut warmup           = [0; MAX_LPC_ORDER];
  let mut qlp_coefficients = [0; MAX_LPC_ORDER];
  let mut residual         = vec![0; block_size - order];

  let (i, _) = count_slice(|i| take_signed_bits(i, bits_per_sample), input,
                           &mut warmup[0..order])?;

  let (i, qlp_coeff_precision) = qlp_coefficient_precision(i)?;
  let (i, quantization_level)  = take_signed_bits(i, 5)?;
  let quantization_level       = quantization_level as i8;

  if quantization_level < 0 {
    return failure(Error::InvalidLpcShift(quantization_level));
  }

  let precision = qlp_coeff_precision as usize;

  let (i, _) = count_slice(|i| {
    take_signed_bits(i, precision).map(|(i, value)| (i, value as i32))
  }, i, &mut qlp_coefficients[0..order])?;

  let (i, entropy_coding_method) = residual_parser(i, order, block_size,
                                                   &mut residual)?;

  Ok((i, subframe::Data::LPC(subframe::LPC {
    entropy_coding_method: entropy_coding_method,
    order: order as u8,
    qlp_coeff_precision: qlp_coeff_precision,
    quantization_level: quantization_level,
    qlp_coefficients: qlp_coefficients,
    warmup: warmup,
    residual: residual,
  })))
}
