//! Short logged float codec for intensities spanning a large dynamic range.
//!
//! Layout: the 8-byte fixed point, then one little-endian `u16` per value
//! holding `ln(v + 1) * fixed_point`, rounded.

use byteorder::{ByteOrder, LittleEndian};

use super::error::{DecodeError, EncodeError};
use super::fixed_point::{decode_fixed_point, encode_fixed_point, is_valid_fixed_point, FIXED_POINT_SIZE};

const U16_LIMIT: f64 = u16::MAX as f64;

/// Exact encoded size of `len` values
pub fn slof_encoded_len(len: usize) -> usize {
    FIXED_POINT_SIZE + 2 * len
}

/// Encode non-negative `data` in the log domain.
///
/// # Errors
/// * [`EncodeError::InvalidFixedPoint`] if `fixed_point` is not finite and positive
/// * [`EncodeError::InvalidDomain`] for negative, NaN or infinite values
/// * [`EncodeError::Overflow`] if `ln(v + 1) * fixed_point` exceeds `u16::MAX`;
///   [`optimal_slof_fixed_point`](super::optimal_slof_fixed_point) avoids this
pub fn encode_slof(data: &[f64], fixed_point: f64) -> Result<Vec<u8>, EncodeError> {
    if !is_valid_fixed_point(fixed_point) {
        return Err(EncodeError::InvalidFixedPoint(fixed_point));
    }

    let mut out = vec![0u8; slof_encoded_len(data.len())];
    out[..FIXED_POINT_SIZE].copy_from_slice(&encode_fixed_point(fixed_point));

    for (index, (&value, slot)) in data
        .iter()
        .zip(out[FIXED_POINT_SIZE..].chunks_exact_mut(2))
        .enumerate()
    {
        if !(value >= 0.0 && value.is_finite()) {
            return Err(EncodeError::InvalidDomain { index, value });
        }
        let scaled = (value + 1.0).ln() * fixed_point;
        if scaled > U16_LIMIT {
            return Err(EncodeError::Overflow { index, value });
        }
        LittleEndian::write_u16(slot, (scaled + 0.5) as u16);
    }

    Ok(out)
}

/// Decode a buffer produced by [`encode_slof`].
///
/// # Errors
/// * [`DecodeError::TruncatedHeader`] if the fixed point is incomplete
/// * [`DecodeError::CorruptStream`] if the body has an odd number of bytes
/// * [`DecodeError::InvalidFixedPoint`] if values are present but the stored
///   fixed point cannot be divided out
pub fn decode_slof(data: &[u8]) -> Result<Vec<f64>, DecodeError> {
    let fixed_point = decode_fixed_point(data)?;
    let body = &data[FIXED_POINT_SIZE..];
    if body.is_empty() {
        return Ok(Vec::new());
    }
    if body.len() % 2 != 0 {
        return Err(DecodeError::corrupt(data.len() - 1, "dangling byte after last value"));
    }
    if !is_valid_fixed_point(fixed_point) {
        return Err(DecodeError::InvalidFixedPoint(fixed_point));
    }

    Ok(body
        .chunks_exact(2)
        .map(|pair| (f64::from(LittleEndian::read_u16(pair)) / fixed_point).exp() - 1.0)
        .collect())
}
