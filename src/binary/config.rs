//! Per-array numpress settings.
//!
//! Mirrors the knobs mzML writers expose for numpress: which scheme to use,
//! how to pick the fixed point and how much round-trip error to accept.
//!
//! ```toml
//! compression = "linear"
//! estimate_fixed_point = true
//! linear_mass_accuracy = 0.0001
//! error_tolerance = 0.0001
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::BinaryArrayError;
use crate::numpress::{self, NumpressCompression};

/// Default maximal absolute round-trip error
pub const DEFAULT_ERROR_TOLERANCE: f64 = 1e-4;

/// Mass accuracy used by [`NumpressConfig::mass_time_default`]
pub const DEFAULT_MASS_ACCURACY: f64 = 1e-4;

/// Numpress configuration for one kind of data array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumpressConfig {
    /// Scheme to apply
    pub compression: NumpressCompression,

    /// Fixed point used when `estimate_fixed_point` is false
    pub fixed_point: f64,

    /// Derive the fixed point from the data instead of using `fixed_point`
    pub estimate_fixed_point: bool,

    /// Maximal absolute error after a round trip; values <= 0 skip the check
    pub error_tolerance: f64,

    /// Target absolute accuracy for linear encoding; values <= 0 disable it
    pub linear_mass_accuracy: f64,
}

impl Default for NumpressConfig {
    fn default() -> Self {
        Self {
            compression: NumpressCompression::None,
            fixed_point: 0.0,
            estimate_fixed_point: true,
            error_tolerance: DEFAULT_ERROR_TOLERANCE,
            linear_mass_accuracy: -1.0,
        }
    }
}

impl NumpressConfig {
    /// Configuration for `compression` with default settings
    pub fn new(compression: NumpressCompression) -> Self {
        Self {
            compression,
            ..Self::default()
        }
    }

    /// Linear prediction, recommended for m/z and retention time
    pub fn linear() -> Self {
        Self::new(NumpressCompression::Linear)
    }

    /// Positive integer count, for integral intensities
    pub fn pic() -> Self {
        Self::new(NumpressCompression::Pic)
    }

    /// Short logged float, recommended for intensities
    pub fn slof() -> Self {
        Self::new(NumpressCompression::Slof)
    }

    /// Linear prediction at a given mass accuracy, without a round-trip check
    pub fn mass_time(mass_accuracy: f64) -> Self {
        Self::linear()
            .with_linear_mass_accuracy(mass_accuracy)
            .with_error_tolerance(-1.0)
    }

    /// [`mass_time`](Self::mass_time) at 0.1 mDa, the usual setting for m/z
    pub fn mass_time_default() -> Self {
        Self::mass_time(DEFAULT_MASS_ACCURACY)
    }

    /// Use a fixed, caller-chosen fixed point
    pub fn with_fixed_point(mut self, fixed_point: f64) -> Self {
        self.fixed_point = fixed_point;
        self.estimate_fixed_point = false;
        self
    }

    /// Set the maximal round-trip error (<= 0 disables the check)
    pub fn with_error_tolerance(mut self, tolerance: f64) -> Self {
        self.error_tolerance = tolerance;
        self
    }

    /// Set the linear mass accuracy (<= 0 disables it)
    pub fn with_linear_mass_accuracy(mut self, mass_accuracy: f64) -> Self {
        self.linear_mass_accuracy = mass_accuracy;
        self
    }

    /// Fixed point to use for `data`
    pub fn resolve_fixed_point(&self, data: &[f64]) -> f64 {
        if !self.estimate_fixed_point {
            return self.fixed_point;
        }

        let fixed_point = match self.compression {
            NumpressCompression::Linear if self.linear_mass_accuracy > 0.0 => {
                numpress::optimal_linear_fixed_point_mass(data, self.linear_mass_accuracy)
                    .unwrap_or_else(|| {
                        warn!(
                            "Linear mass accuracy {} unattainable for this array, using the overflow-safe fixed point",
                            self.linear_mass_accuracy
                        );
                        numpress::optimal_linear_fixed_point(data)
                    })
            }
            compression => compression.optimal_fixed_point(data).unwrap_or(0.0),
        };

        debug!(
            "Estimated {} fixed point {} for {} values",
            self.compression,
            fixed_point,
            data.len()
        );
        fixed_point
    }

    /// Encode `data` to raw numpress bytes, verifying the round-trip error.
    ///
    /// Empty input yields an empty buffer.
    ///
    /// # Errors
    /// * [`BinaryArrayError::Encode`] if the codec rejects the data
    /// * [`BinaryArrayError::ToleranceExceeded`] if a decoded value differs
    ///   from its original by more than `error_tolerance`
    pub fn encode_raw(&self, data: &[f64]) -> Result<Vec<u8>, BinaryArrayError> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let fixed_point = self.resolve_fixed_point(data);
        let encoded = numpress::encode(data, self.compression, fixed_point)?;

        if self.error_tolerance > 0.0 && self.compression != NumpressCompression::None {
            let decoded = numpress::decode(&encoded, self.compression)?;
            if decoded.len() != data.len() {
                return Err(BinaryArrayError::InvalidLength {
                    expected: data.len(),
                    actual: decoded.len(),
                });
            }
            if let Some((index, error)) = data
                .iter()
                .zip(&decoded)
                .map(|(original, restored)| (original - restored).abs())
                .enumerate()
                .find(|(_, error)| *error > self.error_tolerance)
            {
                return Err(BinaryArrayError::ToleranceExceeded {
                    index,
                    error,
                    tolerance: self.error_tolerance,
                });
            }
        }

        Ok(encoded)
    }

    /// Decode raw numpress bytes; empty input yields no values
    pub fn decode_raw(&self, data: &[u8]) -> Result<Vec<f64>, BinaryArrayError> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        Ok(numpress::decode(data, self.compression)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NumpressConfig::default();
        assert_eq!(config.compression, NumpressCompression::None);
        assert!(config.estimate_fixed_point);
        assert_eq!(config.error_tolerance, DEFAULT_ERROR_TOLERANCE);
        assert!(config.linear_mass_accuracy < 0.0);

        let preset = NumpressConfig::mass_time_default();
        assert_eq!(preset.compression, NumpressCompression::Linear);
        assert_eq!(preset.linear_mass_accuracy, DEFAULT_MASS_ACCURACY);
        assert!(preset.error_tolerance <= 0.0);
    }

    #[test]
    fn test_resolve_fixed_point() {
        let data: Vec<f64> = (0..20).map(|i| 200.0 + i as f64 * 0.25).collect();

        let explicit = NumpressConfig::linear().with_fixed_point(1234.0);
        assert_eq!(explicit.resolve_fixed_point(&data), 1234.0);

        let estimated = NumpressConfig::linear();
        assert_eq!(
            estimated.resolve_fixed_point(&data),
            numpress::optimal_linear_fixed_point(&data)
        );

        let accurate = NumpressConfig::mass_time(1.0 / 1024.0);
        assert_eq!(accurate.resolve_fixed_point(&data), 512.0);

        // unattainable accuracy falls back to the overflow-safe choice
        let too_accurate = NumpressConfig::mass_time(1e-15);
        assert_eq!(
            too_accurate.resolve_fixed_point(&data),
            numpress::optimal_linear_fixed_point(&data)
        );

        assert_eq!(NumpressConfig::pic().resolve_fixed_point(&data), 0.0);
    }

    #[test]
    fn test_encode_raw_within_tolerance() {
        let data: Vec<f64> = (0..100).map(|i| 500.0 + i as f64 * 0.011).collect();
        let config = NumpressConfig::linear();
        let encoded = config.encode_raw(&data).unwrap();
        let decoded = config.decode_raw(&encoded).unwrap();
        assert_eq!(decoded.len(), data.len());
    }

    #[test]
    fn test_encode_raw_tolerance_exceeded() {
        // pic rounds 2.4 to 2.0, far outside the default tolerance
        let err = NumpressConfig::pic().encode_raw(&[1.0, 2.4]).unwrap_err();
        match err {
            BinaryArrayError::ToleranceExceeded { index, error, .. } => {
                assert_eq!(index, 1);
                assert!((error - 0.4).abs() < 1e-12);
            }
            other => panic!("unexpected error: {other}"),
        }

        // a loose tolerance accepts the same data
        let loose = NumpressConfig::pic().with_error_tolerance(0.5);
        assert!(loose.encode_raw(&[1.0, 2.4]).is_ok());
    }

    #[test]
    fn test_empty_input() {
        let config = NumpressConfig::slof();
        assert!(config.encode_raw(&[]).unwrap().is_empty());
        assert!(config.decode_raw(&[]).unwrap().is_empty());
    }
}
