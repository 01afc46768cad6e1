use crate::subframe::{self, Subframe, MAX_FIXED_ORDER, MAX_LPC_ORDER};

/// Fixed polynomial predictor coefficients, ordered from the oldest sample
/// to the newest.
pub const FIXED_COEFFICIENTS: [&[i64]; MAX_FIXED_ORDER + 1] = [
  &[],
  &[1],
  &[-1, 2],
  &[1, -3, 3],
  &[-1, 4, -6, 4],
];

/// Prediction of the fixed polynomial predictor for the sample following
/// `history`, where `history` holds exactly `order` samples.
#[inline]
pub fn fixed_prediction(order: usize, history: &[i64]) -> i64 {
  FIXED_COEFFICIENTS[order].iter()
    .zip(history)
    .fold(0i64, |result, (coefficient, signal)| {
      result.wrapping_add(coefficient.wrapping_mul(*signal))
    })
}

/// Prediction of a quantized linear predictor for the sample following
/// `history`, where `history` holds as many samples as there are
/// coefficients.
#[inline]
pub fn lpc_prediction(quantization_level: i8, coefficients: &[i32],
                      history: &[i64])
                      -> i64 {
  let sum = coefficients.iter().rev()
              .zip(history)
              .fold(0i64, |result, (&coefficient, &signal)|
                    result.wrapping_add((coefficient as i64)
                                          .wrapping_mul(signal)));

  sum >> quantization_level
}

pub fn fixed_restore_signal(order: usize,
                            residual: &[i64],
                            output: &mut [i64]) {
  debug_assert!(order <= MAX_FIXED_ORDER);

  for i in 0..residual.len() {
    let offset     = i + order;
    let prediction = fixed_prediction(order, &output[i..offset]);

    output[offset] = residual[i].wrapping_add(prediction);
  }
}

pub fn lpc_restore_signal(quantization_level: i8,
                          coefficients: &[i32],
                          residual: &[i64],
                          output: &mut [i64]) {
  let order = coefficients.len();

  debug_assert!(order <= MAX_LPC_ORDER);

  for i in 0..residual.len() {
    let offset     = i + order;
    let prediction = lpc_prediction(quantization_level, coefficients,
                                    &output[i..offset]);

    output[offset] = residual[i].wrapping_add(prediction);
  }
}

/// Reconstructs the samples of a subframe into `output`, which holds
/// exactly one block of samples.
pub fn decode(subframe: &Subframe, output: &mut [i64]) {
  match subframe.data {
    subframe::Data::Constant(constant)     => {
      for sample in output.iter_mut() {
        *sample = constant;
      }
    }
    subframe::Data::Verbatim(ref verbatim) => {
      output.copy_from_slice(verbatim);
    }
    subframe::Data::Fixed(ref fixed)       => {
      let order = fixed.order as usize;

      output[0..order].copy_from_slice(&fixed.warmup[0..order]);

      fixed_restore_signal(order, &fixed.residual, output);
    }
    subframe::Data::LPC(ref lpc)           => {
      let order        = lpc.order as usize;
      let coefficients = &lpc.qlp_coefficients[0..order];

      output[0..order].copy_from_slice(&lpc.warmup[0..order]);

      lpc_restore_signal(lpc.quantization_level, coefficients, &lpc.residual,
                         output);
    }
  }

  if subframe.wasted_bits > 0 {
    for value in output {
      *value <<= subframe.wasted_bits;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::subframe::{
    Data, Fixed, LPC,
    EntropyCodingMethod, CodingMethod, PartitionedRice,
    PartitionedRiceContents,
  };

  fn rice_method() -> EntropyCodingMethod {
    EntropyCodingMethod {
      method_type: CodingMethod::PartitionedRice,
      data: PartitionedRice {
        order: 0,
        contents: PartitionedRiceContents::new(1),
      },
    }
  }

  #[test]
  fn test_fixed_restore_signal() {
    let residuals   = [ &[-19, -16, 17, -23, -7, 16, -16, -5, 3
                         , -8, -13, -15, -1][..]
                      , &[-6513][..]
                      ];
    let mut outputs = [ &mut [-729, -722, -667, 0, 0, 0, 0, 0, 0
                             , 0, 0, 0, 0, 0, 0, 0][..]
                      , &mut [21877, 27482, 0][..]
                      ];

    fixed_restore_signal(3, &residuals[0], &mut outputs[0]);
    fixed_restore_signal(2, &residuals[1], &mut outputs[1]);

    assert_eq!(&outputs[0], &[-729, -722, -667, -583, -486, -359, -225, -91
                             , 59, 209, 354, 497, 630, 740, 812, 845]);
    assert_eq!(&outputs[1], &[21877, 27482, 26574]);
  }

  #[test]
  fn test_fixed_prediction_wraps() {
    // The order 4 coefficients sum to one, so the wrapped result is exact.
    let history = [i64::MAX; 4];

    assert_eq!(fixed_prediction(4, &history), i64::MAX);
    assert_eq!(fixed_prediction(2, &[i64::MIN, 1]), i64::MIN + 2);

    let residual   = [i64::MAX; 2];
    let mut output = [i64::MAX, i64::MAX, 0, 0];

    fixed_restore_signal(2, &residual, &mut output);

    assert_eq!(output, [i64::MAX, i64::MAX, -2, -4]);
  }

  #[test]
  fn test_lpc_restore_signal() {
    // Coefficients [2, -1] with no shift predict a straight line.
    let residual   = [0, 1, -1];
    let mut output = [10, 20, 0, 0, 0];

    lpc_restore_signal(0, &[2, -1], &residual, &mut output);

    assert_eq!(output, [10, 20, 30, 41, 51]);

    // Halving the prediction, arithmetic shift rounds towards negative
    // infinity.
    let residual   = [0, 0];
    let mut output = [-3, 0, 0];

    lpc_restore_signal(1, &[1], &residual, &mut output);

    assert_eq!(output, [-3, -2, -1]);
  }

  #[test]
  fn test_decode() {
    let mut output = [0; 4];

    decode(&Subframe { data: Data::Constant(-3), wasted_bits: 2 },
           &mut output);

    assert_eq!(output, [-12; 4]);

    decode(&Subframe { data: Data::Verbatim(vec![1, -2, 3, -4]),
                       wasted_bits: 0 },
           &mut output);

    assert_eq!(output, [1, -2, 3, -4]);

    let fixed = Fixed {
      entropy_coding_method: rice_method(),
      order: 1,
      warmup: [5, 0, 0, 0],
      residual: vec![1, 1, -4],
    };

    decode(&Subframe { data: Data::Fixed(fixed), wasted_bits: 1 },
           &mut output);

    assert_eq!(output, [10, 12, 14, 6]);

    let mut warmup       = [0; MAX_LPC_ORDER];
    let mut coefficients = [0; MAX_LPC_ORDER];

    warmup[0] = 8;
    coefficients[0] = 3;

    let lpc = LPC {
      entropy_coding_method: rice_method(),
      order: 1,
      qlp_coeff_precision: 3,
      quantization_level: 2,
      qlp_coefficients: coefficients,
      warmup: warmup,
      residual: vec![0, 1, 0],
    };

    decode(&Subframe { data: Data::LPC(lpc), wasted_bits: 0 }, &mut output);

    assert_eq!(output, [8, 6, 5, 3]);
  }
}
