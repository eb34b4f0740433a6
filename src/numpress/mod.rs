//! MS-Numpress compression for mass spectrometry data arrays.
//!
//! Three independent codecs share one nibble-based variable length integer
//! primitive:
//!
//! - [`linear`]: second-order linear prediction for smooth, increasing
//!   sequences (m/z, retention time)
//! - [`pic`]: rounded integer counts (ion counts)
//! - [`slof`]: log-transformed 16-bit fixed point (intensities with a large
//!   dynamic range)
//!
//! All functions are pure: they take a slice and return an owned buffer, so
//! they may be called from any number of threads at once.
//!
//! ```rust
//! use mzpeak_numpress::numpress::{decode_linear, encode_linear, optimal_linear_fixed_point};
//!
//! let mz = vec![100.0, 100.5, 101.0, 101.25];
//! let fixed_point = optimal_linear_fixed_point(&mz);
//! let encoded = encode_linear(&mz, fixed_point)?;
//! let decoded = decode_linear(&encoded)?;
//! assert_eq!(decoded.len(), mz.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod fixed_point;
pub mod linear;
pub mod nibble;
pub mod pic;
pub mod slof;

pub use error::{DecodeError, EncodeError};
pub use fixed_point::{
    decode_fixed_point, encode_fixed_point, optimal_linear_fixed_point,
    optimal_linear_fixed_point_mass, optimal_slof_fixed_point, FIXED_POINT_SIZE,
};
pub use linear::{decode_linear, encode_linear, max_linear_encoded_len};
pub use nibble::{decode_int, encode_int, IntStream, NibbleCursor, NibbleWriter, Nibbles};
pub use pic::{decode_pic, encode_pic, max_pic_encoded_len};
pub use slof::{decode_slof, encode_slof, slof_encoded_len};

/// Numpress scheme applied to a data array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumpressCompression {
    /// No numpress; values are stored as plain little-endian doubles
    #[default]
    None,
    /// Linear prediction (m/z, retention time)
    Linear,
    /// Positive integer count (integral intensities)
    Pic,
    /// Short logged float (intensities)
    Slof,
}

impl NumpressCompression {
    /// All schemes, in declaration order
    pub const ALL: [NumpressCompression; 4] = [
        NumpressCompression::None,
        NumpressCompression::Linear,
        NumpressCompression::Pic,
        NumpressCompression::Slof,
    ];

    /// Short lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            NumpressCompression::None => "none",
            NumpressCompression::Linear => "linear",
            NumpressCompression::Pic => "pic",
            NumpressCompression::Slof => "slof",
        }
    }

    /// Whether the scheme stores a fixed point header
    pub fn uses_fixed_point(&self) -> bool {
        matches!(self, NumpressCompression::Linear | NumpressCompression::Slof)
    }

    /// Optimal fixed point for `data`, or `None` for schemes without one
    pub fn optimal_fixed_point(&self, data: &[f64]) -> Option<f64> {
        match self {
            NumpressCompression::Linear => Some(optimal_linear_fixed_point(data)),
            NumpressCompression::Slof => Some(optimal_slof_fixed_point(data)),
            NumpressCompression::None | NumpressCompression::Pic => None,
        }
    }
}

impl fmt::Display for NumpressCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown scheme name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown numpress compression: {0} (expected none, linear, pic or slof)")]
pub struct UnknownCompression(pub String);

impl FromStr for NumpressCompression {
    type Err = UnknownCompression;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(NumpressCompression::None),
            "linear" => Ok(NumpressCompression::Linear),
            "pic" => Ok(NumpressCompression::Pic),
            "slof" => Ok(NumpressCompression::Slof),
            _ => Err(UnknownCompression(s.to_string())),
        }
    }
}

/// Encode `data` with `compression`.
///
/// `fixed_point` is ignored by schemes without one. [`NumpressCompression::None`]
/// writes plain little-endian doubles.
pub fn encode(
    data: &[f64],
    compression: NumpressCompression,
    fixed_point: f64,
) -> Result<Vec<u8>, EncodeError> {
    match compression {
        NumpressCompression::None => Ok(data.iter().flat_map(|v| v.to_le_bytes()).collect()),
        NumpressCompression::Linear => encode_linear(data, fixed_point),
        NumpressCompression::Pic => encode_pic(data),
        NumpressCompression::Slof => encode_slof(data, fixed_point),
    }
}

/// Decode bytes produced by [`encode`] with the same `compression`
pub fn decode(data: &[u8], compression: NumpressCompression) -> Result<Vec<f64>, DecodeError> {
    match compression {
        NumpressCompression::None => {
            if data.len() % 8 != 0 {
                return Err(DecodeError::corrupt(
                    data.len() - data.len() % 8,
                    "length is not a multiple of 8",
                ));
            }
            Ok(data
                .chunks_exact(8)
                .map(|chunk| {
                    let mut raw = [0u8; 8];
                    raw.copy_from_slice(chunk);
                    f64::from_le_bytes(raw)
                })
                .collect())
        }
        NumpressCompression::Linear => decode_linear(data),
        NumpressCompression::Pic => decode_pic(data),
        NumpressCompression::Slof => decode_slof(data),
    }
}
