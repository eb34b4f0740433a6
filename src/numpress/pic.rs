//! Positive integer count codec for ion-count intensities.
//!
//! There is no header: every value is rounded to the nearest non-negative
//! integer and written as a nibble-packed variable length integer. The only
//! loss is the initial rounding.

use super::error::{DecodeError, EncodeError};
use super::nibble::{IntStream, NibbleWriter, MAX_NIBBLES};

const U32_LIMIT: f64 = u32::MAX as f64;

/// Upper bound of the encoded size of `len` values
pub fn max_pic_encoded_len(len: usize) -> usize {
    len * ((MAX_NIBBLES + 1) / 2)
}

/// Encode `data` as rounded integer counts.
///
/// # Errors
/// [`EncodeError::InvalidDomain`] for negative, NaN or infinite values and for
/// counts above `u32::MAX`.
pub fn encode_pic(data: &[f64]) -> Result<Vec<u8>, EncodeError> {
    let mut writer = NibbleWriter::new(Vec::with_capacity(max_pic_encoded_len(data.len())));

    for (index, &value) in data.iter().enumerate() {
        if !(0.0..=U32_LIMIT).contains(&value) {
            return Err(EncodeError::InvalidDomain { index, value });
        }
        // u32 counts share the nibble format with i32 through their bit pattern
        let count = (value + 0.5) as u32;
        writer.write_int(count as i32);
    }

    let mut out = writer.finish();
    out.shrink_to_fit();
    Ok(out)
}

/// Decode a buffer produced by [`encode_pic`].
///
/// # Errors
/// [`DecodeError::CorruptStream`] if the last integer is cut off.
pub fn decode_pic(data: &[u8]) -> Result<Vec<f64>, DecodeError> {
    let mut result = Vec::with_capacity(data.len() * 2);
    for count in IntStream::new(data) {
        result.push(f64::from(count? as u32));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_nearest_count() {
        let encoded = encode_pic(&[0.0, 1.4, 2.6]).unwrap();
        // 0 -> [8], 1 -> [7, 1], 3 -> [7, 3], padded
        assert_eq!(encoded, vec![0x87, 0x17, 0x30]);
        assert_eq!(decode_pic(&encoded).unwrap(), vec![0.0, 1.0, 3.0]);
    }

    #[test]
    fn test_empty() {
        assert!(encode_pic(&[]).unwrap().is_empty());
        assert!(decode_pic(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_large_counts() {
        let data = [4_294_967_295.0, 2_147_483_648.0, 65_536.0, 123_456_789.0];
        let encoded = encode_pic(&data).unwrap();
        assert!(encoded.len() <= max_pic_encoded_len(data.len()));
        assert_eq!(decode_pic(&encoded).unwrap(), data.to_vec());
    }

    #[test]
    fn test_rejects_out_of_domain() {
        assert!(matches!(
            encode_pic(&[1.0, -0.6]),
            Err(EncodeError::InvalidDomain { index: 1, .. })
        ));
        assert!(matches!(
            encode_pic(&[f64::NAN]),
            Err(EncodeError::InvalidDomain { index: 0, .. })
        ));
        assert!(matches!(
            encode_pic(&[5e9]),
            Err(EncodeError::InvalidDomain { index: 0, .. })
        ));
    }

    #[test]
    fn test_truncated_stream() {
        let mut encoded = encode_pic(&[1_000_000.0, 2.0]).unwrap();
        encoded.truncate(2);
        assert!(matches!(
            decode_pic(&encoded),
            Err(DecodeError::CorruptStream { .. })
        ));
    }
}
