//! Fixed point serialization and selection.
//!
//! The fixed point is the scaling factor that turns doubles into integers.
//! It is always stored as an 8-byte little-endian IEEE-754 double; byte order
//! is fixed at compile time, so there is no runtime endianness probe.

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use super::error::DecodeError;

/// Size of the serialized fixed point
pub const FIXED_POINT_SIZE: usize = 8;

const I32_LIMIT: f64 = i32::MAX as f64;
const U16_LIMIT: f64 = u16::MAX as f64;

/// Serialize a fixed point as 8 little-endian bytes
pub fn encode_fixed_point(fixed_point: f64) -> [u8; FIXED_POINT_SIZE] {
    let mut buf = [0u8; FIXED_POINT_SIZE];
    LittleEndian::write_f64(&mut buf, fixed_point);
    buf
}

/// Read the fixed point from the first 8 bytes of `data`
pub fn decode_fixed_point(data: &[u8]) -> Result<f64, DecodeError> {
    if data.len() < FIXED_POINT_SIZE {
        return Err(DecodeError::TruncatedHeader {
            expected: FIXED_POINT_SIZE,
            actual: data.len(),
        });
    }
    Ok(LittleEndian::read_f64(&data[..FIXED_POINT_SIZE]))
}

pub(crate) fn is_valid_fixed_point(fixed_point: f64) -> bool {
    fixed_point.is_finite() && fixed_point > 0.0
}

/// Largest fixed point that keeps `magnitude * fixed_point` within `i32`
fn fit_i32(magnitude: f64) -> f64 {
    if magnitude > 0.0 {
        (I32_LIMIT / magnitude).floor()
    } else {
        I32_LIMIT
    }
}

/// Largest fixed point for which linear encoding of `data` cannot overflow.
///
/// Both stored start values and every second-order prediction residual
/// (`d[i] - (2 * d[i-1] - d[i-2])`, plus one for rounding) must fit a signed
/// 32-bit integer once multiplied by the fixed point. Returns 0 for empty input.
pub fn optimal_linear_fixed_point(data: &[f64]) -> f64 {
    match data {
        [] => 0.0,
        [only] => fit_i32(only.abs()),
        [first, second, ..] => {
            let max_residual = data.windows(3).fold(
                first.abs().max(second.abs()),
                |acc, w| {
                    let extrapolated = w[1] + (w[1] - w[0]);
                    acc.max(((w[2] - extrapolated).abs() + 1.0).ceil())
                },
            );
            fit_i32(max_residual)
        }
    }
}

/// Fixed point that guarantees an absolute decoding error of at most
/// `mass_accuracy` (in the unit of the data, e.g. Thomson).
///
/// Rounding contributes at most half a quantization step, so the answer is
/// `0.5 / mass_accuracy`. Returns `None` when that fixed point would exceed
/// [`optimal_linear_fixed_point`] (the accuracy is unattainable without
/// integer overflow) or when `mass_accuracy` is not a positive finite number.
pub fn optimal_linear_fixed_point_mass(data: &[f64], mass_accuracy: f64) -> Option<f64> {
    if !is_valid_fixed_point(mass_accuracy) {
        return None;
    }

    let wanted = 0.5 / mass_accuracy;
    let limit = optimal_linear_fixed_point(data);
    if wanted > limit {
        debug!(
            "Mass accuracy {} needs fixed point {} above overflow limit {}",
            mass_accuracy, wanted, limit
        );
        return None;
    }
    Some(wanted)
}

/// Largest fixed point for which `ln(d + 1) * fixed_point` fits in `u16`.
/// Returns 0 for empty input.
pub fn optimal_slof_fixed_point(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let max_log = data.iter().fold(1.0f64, |acc, &v| acc.max((v + 1.0).ln()));
    (U16_LIMIT / max_log).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point_layout() {
        let bytes = encode_fixed_point(1000.0);
        // 1000.0 == 0x408F400000000000
        assert_eq!(bytes, [0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x8F, 0x40]);
        assert_eq!(decode_fixed_point(&bytes).unwrap(), 1000.0);
    }

    #[test]
    fn test_decode_fixed_point_truncated() {
        let err = decode_fixed_point(&[0u8; 5]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedHeader {
                expected: 8,
                actual: 5
            }
        );
    }

    #[test]
    fn test_optimal_linear_small_inputs() {
        assert_eq!(optimal_linear_fixed_point(&[]), 0.0);
        assert_eq!(optimal_linear_fixed_point(&[2.0]), (I32_LIMIT / 2.0).floor());
        assert_eq!(optimal_linear_fixed_point(&[0.0]), I32_LIMIT);
        assert_eq!(optimal_linear_fixed_point(&[100.0, 400.0]), (I32_LIMIT / 400.0).floor());
    }

    #[test]
    fn test_optimal_linear_uses_residuals() {
        // residual of the third point is 100 - (2 * 2 - 1) = 97 -> ceil(98) = 98
        let data = [1.0, 2.0, 100.0];
        assert_eq!(optimal_linear_fixed_point(&data), (I32_LIMIT / 98.0).floor());

        // a perfectly linear ramp is bounded by its start values
        let ramp: Vec<f64> = (0..100).map(|i| 500.0 + i as f64 * 0.01).collect();
        assert_eq!(optimal_linear_fixed_point(&ramp), (I32_LIMIT / ramp[1]).floor());
    }

    #[test]
    fn test_optimal_linear_mass() {
        let data: Vec<f64> = (0..50).map(|i| 300.0 + i as f64 * 0.5).collect();
        assert_eq!(optimal_linear_fixed_point_mass(&data, 1.0 / 1024.0), Some(512.0));
        assert_eq!(optimal_linear_fixed_point_mass(&data, 1e-12), None);
        assert_eq!(optimal_linear_fixed_point_mass(&data, 0.0), None);
        assert_eq!(optimal_linear_fixed_point_mass(&data, -1.0), None);
        assert_eq!(optimal_linear_fixed_point_mass(&[], 1e-4), None);
    }

    #[test]
    fn test_optimal_slof() {
        assert_eq!(optimal_slof_fixed_point(&[]), 0.0);
        // ln(x + 1) <= 1 keeps the divisor at 1
        assert_eq!(optimal_slof_fixed_point(&[0.0, 1.0]), 65535.0);

        let data = [10.0, 1e6, 3.0];
        let expected = (65535.0 / (1e6f64 + 1.0).ln()).floor();
        assert_eq!(optimal_slof_fixed_point(&data), expected);
        assert!(((1e6f64 + 1.0).ln() * expected) <= 65535.0);
    }
}
