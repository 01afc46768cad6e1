use crate::encoder::EncoderConfig;
use crate::subframe::{
  self, choose_partitions, fixed_prediction, lpc_prediction, write_residual,
  Subframe, MAX_FIXED_ORDER, MAX_LPC_ORDER,
};
use crate::utility::BitWriter;

// Padding bit, type code and wasted bits flag.
const SUBFRAME_HEADER_BITS: u64 = 8;

// Largest quantized coefficient shift the 5-bit signed field can hold.
const MAX_QLP_SHIFT: i32 = 15;

#[inline]
fn fits_i32(value: i64) -> bool {
  value >= i32::MIN as i64 && value <= i32::MAX as i64
}

/// Number of trailing zero bits shared by every sample, zero when all
/// samples are zero.
pub fn wasted_bits(samples: &[i64]) -> u32 {
  let merged = samples.iter().fold(0, |merged, &sample| merged | sample);

  if merged == 0 { 0 } else { merged.trailing_zeros() }
}

/// Residual of the fixed polynomial predictor of the given order, or `None`
/// when a residual doesn't fit in 32 bits.
pub fn fixed_residual(samples: &[i64], order: usize) -> Option<Vec<i64>> {
  debug_assert!(order <= MAX_FIXED_ORDER && order <= samples.len());

  let mut residual = Vec::with_capacity(samples.len() - order);

  for i in order..samples.len() {
    let value = samples[i] - fixed_prediction(order, &samples[(i - order)..i]);

    if !fits_i32(value) {
      return None;
    }

    residual.push(value);
  }

  Some(residual)
}

/// Residual of a quantized linear predictor, or `None` when a residual
/// doesn't fit in 32 bits.
pub fn lpc_residual(samples: &[i64], coefficients: &[i32],
                    quantization_level: i8)
                    -> Option<Vec<i64>> {
  let order        = coefficients.len();
  let mut residual = Vec::with_capacity(samples.len() - order);

  for i in order..samples.len() {
    let prediction = lpc_prediction(quantization_level, coefficients,
                                    &samples[(i - order)..i]);
    let value      = samples[i].wrapping_sub(prediction);

    if !fits_i32(value) {
      return None;
    }

    residual.push(value);
  }

  Some(residual)
}

/// Autocorrelation of `samples` for lags `0..=max_lag`.
pub fn autocorrelation(samples: &[i64], max_lag: usize) -> Vec<f64> {
  (0..(max_lag + 1)).map(|lag| {
    samples.iter()
      .zip(&samples[lag.min(samples.len())..])
      .fold(0.0, |sum, (&a, &b)| sum + a as f64 * b as f64)
  }).collect()
}

/// Solves for the linear predictor coefficients of every order up to
/// `autocorrelation.len() - 1`, with the Levinson-Durbin recursion.
///
/// Element `n` of the result holds the `n + 1` coefficients of the order
/// `n + 1` predictor, newest sample first. The recursion stops early when
/// the prediction error vanishes.
pub fn levinson_durbin(autocorrelation: &[f64]) -> Vec<Vec<f64>> {
  let max_order = autocorrelation.len().saturating_sub(1);

  let mut error        = autocorrelation.first().cloned().unwrap_or(0.0);
  let mut coefficients = Vec::with_capacity(max_order);
  let mut current      = Vec::<f64>::with_capacity(max_order);

  for i in 0..max_order {
    if error <= 0.0 {
      break;
    }

    let accumulated = current.iter().enumerate()
                        .fold(autocorrelation[i + 1], |sum, (j, &a)| {
                          sum - a * autocorrelation[i - j]
                        });
    let reflection  = accumulated / error;

    let mut next = Vec::with_capacity(i + 1);

    for j in 0..i {
      next.push(current[j] - reflection * current[i - 1 - j]);
    }

    next.push(reflection);

    error  *= 1.0 - reflection * reflection;
    current = next;

    coefficients.push(current.clone());
  }

  coefficients
}

/// Quantizes predictor coefficients to `precision` bits. Returns the
/// quantized coefficients and the right shift that scales them back.
pub fn quantize_coefficients(coefficients: &[f64], precision: u8)
                             -> (Vec<i32>, i8) {
  let max_value = (1i64 << (precision - 1)) - 1;
  let min_value = -(1i64 << (precision - 1));
  let magnitude = coefficients.iter().fold(0.0f64, |max, c| max.max(c.abs()));

  if !(magnitude > 0.0) || !magnitude.is_finite() {
    return (vec![0; coefficients.len()], 0);
  }

  // Exponent of the largest coefficient, as `frexp` reports it.
  let exponent = magnitude.log2().floor() as i32 + 1;
  let shift    = (precision as i32 - 1 - exponent).max(0).min(MAX_QLP_SHIFT);
  let scale    = (1i64 << shift) as f64;

  let mut error     = 0.0;
  let mut quantized = Vec::with_capacity(coefficients.len());

  for &coefficient in coefficients {
    let scaled = coefficient * scale + error;
    let value  = (scaled.round() as i64).max(min_value).min(max_value);

    error = scaled - value as f64;
    quantized.push(value as i32);
  }

  (quantized, shift as i8)
}

fn header_bits(wasted_bits: u32) -> u64 {
  SUBFRAME_HEADER_BITS + wasted_bits as u64
}

fn verbatim(samples: &[i64], bits_per_sample: usize) -> (subframe::Data, u64) {
  let bits = (samples.len() * bits_per_sample) as u64;

  (subframe::Data::Verbatim(samples.to_vec()), bits)
}

fn fixed(samples: &[i64], order: usize, bits_per_sample: usize,
         config: &EncoderConfig)
         -> Option<(subframe::Data, u64)> {
  let residual = fixed_residual(samples, order)?;

  let (method, residual_bits) = choose_partitions(&residual, order,
                                                  config.max_partition_order);

  let mut warmup = [0; MAX_FIXED_ORDER];

  warmup[0..order].copy_from_slice(&samples[0..order]);

  let data = subframe::Data::Fixed(subframe::Fixed {
    entropy_coding_method: method,
    order: order as u8,
    warmup: warmup,
    residual: residual,
  });

  Some((data, (order * bits_per_sample) as u64 + residual_bits))
}

fn lpc(samples: &[i64], coefficients: &[f64], bits_per_sample: usize,
       config: &EncoderConfig)
       -> Option<(subframe::Data, u64)> {
  let order     = coefficients.len();
  let precision = config.qlp_precision;

  let (quantized, shift) = quantize_coefficients(coefficients, precision);

  let residual = lpc_residual(samples, &quantized, shift)?;

  let (method, residual_bits) = choose_partitions(&residual, order,
                                                  config.max_partition_order);

  let mut warmup           = [0; MAX_LPC_ORDER];
  let mut qlp_coefficients = [0; MAX_LPC_ORDER];

  warmup[0..order].copy_from_slice(&samples[0..order]);
  qlp_coefficients[0..order].copy_from_slice(&quantized);

  let data = subframe::Data::LPC(subframe::LPC {
    entropy_coding_method: method,
    order: order as u8,
    qlp_coeff_precision: precision,
    quantization_level: shift,
    qlp_coefficients: qlp_coefficients,
    warmup: warmup,
    residual: residual,
  });

  let bits = (order * bits_per_sample) as u64 + 4 + 5 +
             (order * precision as usize) as u64 + residual_bits;

  Some((data, bits))
}

/// Picks the smallest subframe for one channel's block of samples, each
/// fitting in `bits_per_sample` signed bits. Returns the subframe and its
/// exact encoded size in bits.
///
/// Constant is used whenever all samples are equal. Otherwise verbatim,
/// every fixed order and every LPC order up to `config.max_lpc_order` are
/// sized and the smallest wins, with ties going to the simpler subframe.
pub fn encode(samples: &[i64], bits_per_sample: usize, config: &EncoderConfig)
              -> (Subframe, u64) {
  let wasted   = wasted_bits(samples);
  let shifted  = samples.iter().map(|&sample| sample >> wasted)
                   .collect::<Vec<_>>();
  let bits     = bits_per_sample - wasted as usize;
  let overhead = header_bits(wasted);

  let first = shifted.first().cloned().unwrap_or(0);

  if shifted.iter().all(|&sample| sample == first) {
    let subframe = Subframe {
      data: subframe::Data::Constant(first),
      wasted_bits: wasted,
    };

    return (subframe, overhead + bits as u64);
  }

  let (mut best, mut best_bits) = verbatim(&shifted, bits);

  for order in 0..(MAX_FIXED_ORDER.min(shifted.len() - 1) + 1) {
    if let Some((data, size)) = fixed(&shifted, order, bits, config) {
      if size < best_bits {
        best      = data;
        best_bits = size;
      }
    }
  }

  let max_lpc_order = config.max_lpc_order.min(MAX_LPC_ORDER)
                        .min(shifted.len() - 1);

  if max_lpc_order > 0 {
    let correlation = autocorrelation(&shifted, max_lpc_order);

    for coefficients in levinson_durbin(&correlation) {
      if let Some((data, size)) = lpc(&shifted, &coefficients, bits, config) {
        if size < best_bits {
          best      = data;
          best_bits = size;
        }
      }
    }
  }

  let subframe = Subframe {
    data: best,
    wasted_bits: wasted,
  };

  (subframe, overhead + best_bits)
}

/// Writes a subframe whose samples, before removing wasted bits, are
/// `bits_per_sample` wide.
pub fn write_subframe(writer: &mut BitWriter, subframe: &Subframe,
                      bits_per_sample: usize) {
  let type_code = subframe.data.type_code() as u64;
  let bits      = bits_per_sample - subframe.wasted_bits as usize;

  writer.write_bits(type_code << 1 | (subframe.wasted_bits > 0) as u64, 8);

  if subframe.wasted_bits > 0 {
    writer.write_unary(subframe.wasted_bits as u64 - 1);
  }

  match subframe.data {
    subframe::Data::Constant(value)       => {
      writer.write_signed_bits(value, bits);
    }
    subframe::Data::Verbatim(ref samples) => {
      for &sample in samples {
        writer.write_signed_bits(sample, bits);
      }
    }
    subframe::Data::Fixed(ref fixed)      => {
      let order = fixed.order as usize;

      for &sample in &fixed.warmup[0..order] {
        writer.write_signed_bits(sample, bits);
      }

      write_residual(writer, &fixed.entropy_coding_method, order,
                     &fixed.residual);
    }
    subframe::Data::LPC(ref lpc)          => {
      let order     = lpc.order as usize;
      let precision = lpc.qlp_coeff_precision as usize;

      for &sample in &lpc.warmup[0..order] {
        writer.write_signed_bits(sample, bits);
      }

      writer.write_bits(precision as u64 - 1, 4);
      writer.write_signed_bits(lpc.quantization_level as i64, 5);

      for &coefficient in &lpc.qlp_coefficients[0..order] {
        writer.write_signed_bits(coefficient as i64, precision);
      }

      write_residual(writer, &lpc.entropy_coding_method, order,
                     &lpc.residual);
    }
  }
}
