//! Linear prediction codec for smooth sequences such as m/z or retention time.
//!
//! ## Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 8 | fixed point (little-endian f64) |
//! | 8 | 4 | first value, quantized (little-endian u32) |
//! | 12 | 4 | second value, quantized (little-endian u32) |
//! | 16 | .. | nibble-packed residuals of the remaining values |
//!
//! Each remaining value is stored as the difference between its quantized
//! form and the linear extrapolation of the two previous quantized values.
//! For typical m/z arrays the round trip is accurate to about 0.002 ppm.

use byteorder::{ByteOrder, LittleEndian};

use super::error::{DecodeError, EncodeError};
use super::fixed_point::{decode_fixed_point, encode_fixed_point, is_valid_fixed_point, FIXED_POINT_SIZE};
use super::nibble::{IntStream, NibbleCursor, NibbleWriter, MAX_NIBBLES};

const FIRST_VALUE_END: usize = FIXED_POINT_SIZE + 4;
const SECOND_VALUE_END: usize = FIRST_VALUE_END + 4;

/// Upper bound of the encoded size of `len` values
pub fn max_linear_encoded_len(len: usize) -> usize {
    match len {
        0 => FIXED_POINT_SIZE,
        1 => FIRST_VALUE_END,
        n => SECOND_VALUE_END + (n - 2) * ((MAX_NIBBLES + 1) / 2),
    }
}

/// Quantize with the codec's rounding rule: add one half, truncate toward zero
#[inline]
fn quantize(value: f64, fixed_point: f64) -> i64 {
    (value * fixed_point + 0.5) as i64
}

/// Linear extrapolation `2 * prev1 - prev2`, `None` on i64 overflow
#[inline]
fn extrapolate(prev2: i64, prev1: i64) -> Option<i64> {
    prev1.checked_sub(prev2).and_then(|step| prev1.checked_add(step))
}

/// Quantize one of the two start values, which are stored as raw u32
fn quantize_start(data: &[f64], index: usize, fixed_point: f64) -> Result<i64, EncodeError> {
    let value = data[index];
    if !value.is_finite() {
        return Err(EncodeError::InvalidDomain { index, value });
    }
    let quantized = quantize(value, fixed_point);
    if u32::try_from(quantized).is_err() {
        return Err(EncodeError::Overflow { index, value });
    }
    Ok(quantized)
}

/// Encode `data` with linear prediction at the given fixed point.
///
/// Pick the fixed point with
/// [`optimal_linear_fixed_point`](super::optimal_linear_fixed_point) to rule
/// out overflow, or with
/// [`optimal_linear_fixed_point_mass`](super::optimal_linear_fixed_point_mass)
/// to target an absolute accuracy.
///
/// # Errors
/// * [`EncodeError::InvalidFixedPoint`] if `fixed_point` is not finite and positive
/// * [`EncodeError::InvalidDomain`] for NaN or infinite values
/// * [`EncodeError::Overflow`] if a start value is negative or above `u32::MAX`
///   once quantized, or a residual does not fit in `i32`
pub fn encode_linear(data: &[f64], fixed_point: f64) -> Result<Vec<u8>, EncodeError> {
    if !is_valid_fixed_point(fixed_point) {
        return Err(EncodeError::InvalidFixedPoint(fixed_point));
    }

    let mut out = Vec::with_capacity(max_linear_encoded_len(data.len()));
    out.extend_from_slice(&encode_fixed_point(fixed_point));
    if data.is_empty() {
        return Ok(out);
    }

    let mut raw = [0u8; 4];
    let mut prev2 = quantize_start(data, 0, fixed_point)?;
    LittleEndian::write_u32(&mut raw, prev2 as u32);
    out.extend_from_slice(&raw);
    if data.len() == 1 {
        return Ok(out);
    }

    let mut prev1 = quantize_start(data, 1, fixed_point)?;
    LittleEndian::write_u32(&mut raw, prev1 as u32);
    out.extend_from_slice(&raw);

    let mut writer = NibbleWriter::new(out);
    for (index, &value) in data.iter().enumerate().skip(2) {
        if !value.is_finite() {
            return Err(EncodeError::InvalidDomain { index, value });
        }
        let current = quantize(value, fixed_point);
        let residual = extrapolate(prev2, prev1)
            .and_then(|extrapolated| current.checked_sub(extrapolated))
            .and_then(|diff| i32::try_from(diff).ok())
            .ok_or(EncodeError::Overflow { index, value })?;

        writer.write_int(residual);
        prev2 = prev1;
        prev1 = current;
    }

    let mut out = writer.finish();
    out.shrink_to_fit();
    Ok(out)
}

/// Decode a buffer produced by [`encode_linear`].
///
/// # Errors
/// * [`DecodeError::TruncatedHeader`] if the buffer ends inside the fixed
///   point or one of the two start values
/// * [`DecodeError::CorruptStream`] if the residual stream is malformed
/// * [`DecodeError::InvalidFixedPoint`] if values are present but the stored
///   fixed point cannot be divided out
pub fn decode_linear(data: &[u8]) -> Result<Vec<f64>, DecodeError> {
    let fixed_point = decode_fixed_point(data)?;
    if data.len() == FIXED_POINT_SIZE {
        return Ok(Vec::new());
    }
    if !is_valid_fixed_point(fixed_point) {
        return Err(DecodeError::InvalidFixedPoint(fixed_point));
    }
    if data.len() < FIRST_VALUE_END {
        return Err(DecodeError::TruncatedHeader {
            expected: FIRST_VALUE_END,
            actual: data.len(),
        });
    }

    let mut prev2 = i64::from(LittleEndian::read_u32(&data[FIXED_POINT_SIZE..FIRST_VALUE_END]));
    if data.len() == FIRST_VALUE_END {
        return Ok(vec![prev2 as f64 / fixed_point]);
    }
    if data.len() < SECOND_VALUE_END {
        return Err(DecodeError::TruncatedHeader {
            expected: SECOND_VALUE_END,
            actual: data.len(),
        });
    }

    let mut prev1 = i64::from(LittleEndian::read_u32(&data[FIRST_VALUE_END..SECOND_VALUE_END]));

    // each residual takes at least one nibble
    let mut result = Vec::with_capacity(2 + (data.len() - SECOND_VALUE_END) * 2);
    result.push(prev2 as f64 / fixed_point);
    result.push(prev1 as f64 / fixed_point);

    let mut stream = IntStream::with_cursor(data, NibbleCursor::new(SECOND_VALUE_END));
    while let Some(residual) = stream.next() {
        let residual = residual?;
        let current = extrapolate(prev2, prev1)
            .and_then(|extrapolated| extrapolated.checked_add(i64::from(residual)))
            .ok_or_else(|| {
                DecodeError::corrupt(stream.cursor().byte_index, "prediction overflows i64")
            })?;

        result.push(current as f64 / fixed_point);
        prev2 = prev1;
        prev1 = current;
    }

    Ok(result)
}
