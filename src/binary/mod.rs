//! Binary data array encoding for mzML
//!
//! mzML stores numerical arrays (m/z, intensity) as Base64-encoded binary data,
//! optionally compressed. This module runs both directions of that pipeline:
//!
//! 1. Numpress encode, or plain little-endian floats
//! 2. zlib deflate if requested
//! 3. Base64 encode the bytes
//!
//! Decoding reverses the steps. Numpress settings live in [`NumpressConfig`],
//! and [`cv`] maps compressions to the accessions that describe them.

use std::io::{Read, Write};

use base64::prelude::*;
use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{debug, warn};

use crate::numpress::{self, DecodeError, EncodeError, NumpressCompression};

pub mod config;
pub mod cv;

pub use config::{NumpressConfig, DEFAULT_ERROR_TOLERANCE, DEFAULT_MASS_ACCURACY};
pub use cv::CvTerm;

/// Binary encoding precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryEncoding {
    /// 32-bit floating point (CV: MS:1000521)
    Float32,
    /// 64-bit floating point (CV: MS:1000523)
    #[default]
    Float64,
}

impl BinaryEncoding {
    /// Determine encoding from CV accession
    pub fn from_cv_accession(accession: &str) -> Option<Self> {
        match accession {
            cv::MS_CV_ACCESSIONS::FLOAT_32_BIT => Some(BinaryEncoding::Float32),
            cv::MS_CV_ACCESSIONS::FLOAT_64_BIT => Some(BinaryEncoding::Float64),
            _ => None,
        }
    }

    /// CV term describing this encoding
    pub fn cv_term(&self) -> CvTerm {
        match self {
            BinaryEncoding::Float32 => cv::FLOAT_32_BIT,
            BinaryEncoding::Float64 => cv::FLOAT_64_BIT,
        }
    }

    /// Get the byte size per value
    pub fn byte_size(&self) -> usize {
        match self {
            BinaryEncoding::Float32 => 4,
            BinaryEncoding::Float64 => 8,
        }
    }
}

/// Compression applied to a binary data array: an optional numpress scheme
/// followed by optional zlib
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ArrayCompression {
    /// Numpress scheme, applied first
    pub numpress: NumpressCompression,
    /// Whether the bytes are zlib-compressed afterwards
    pub zlib: bool,
}

impl ArrayCompression {
    /// Raw little-endian floats
    pub const NONE: ArrayCompression = ArrayCompression {
        numpress: NumpressCompression::None,
        zlib: false,
    };

    /// zlib over raw little-endian floats
    pub const ZLIB: ArrayCompression = ArrayCompression {
        numpress: NumpressCompression::None,
        zlib: true,
    };

    /// Construct from parts
    pub fn new(numpress: NumpressCompression, zlib: bool) -> Self {
        Self { numpress, zlib }
    }

    /// Determine compression from a single CV accession
    pub fn from_cv_accession(accession: &str) -> Option<Self> {
        use cv::MS_CV_ACCESSIONS as acc;
        use NumpressCompression as N;

        let (numpress, zlib) = match accession {
            acc::NO_COMPRESSION => (N::None, false),
            acc::ZLIB_COMPRESSION => (N::None, true),
            acc::NUMPRESS_LINEAR => (N::Linear, false),
            acc::NUMPRESS_PIC => (N::Pic, false),
            acc::NUMPRESS_SLOF => (N::Slof, false),
            acc::NUMPRESS_LINEAR_ZLIB => (N::Linear, true),
            acc::NUMPRESS_PIC_ZLIB => (N::Pic, true),
            acc::NUMPRESS_SLOF_ZLIB => (N::Slof, true),
            _ => return None,
        };
        Some(Self { numpress, zlib })
    }

    /// Combine with another term listed on the same array.
    ///
    /// Older files write numpress and zlib as two separate terms.
    pub fn merge(self, other: ArrayCompression) -> Self {
        Self {
            numpress: if other.numpress == NumpressCompression::None {
                self.numpress
            } else {
                other.numpress
            },
            zlib: self.zlib || other.zlib,
        }
    }

    /// The single CV term describing this compression
    pub fn cv_term(&self) -> CvTerm {
        match (self.numpress, self.zlib) {
            (NumpressCompression::None, false) => cv::NO_COMPRESSION,
            (NumpressCompression::None, true) => cv::ZLIB_COMPRESSION,
            (NumpressCompression::Linear, false) => cv::NUMPRESS_LINEAR,
            (NumpressCompression::Pic, false) => cv::NUMPRESS_PIC,
            (NumpressCompression::Slof, false) => cv::NUMPRESS_SLOF,
            (NumpressCompression::Linear, true) => cv::NUMPRESS_LINEAR_ZLIB,
            (NumpressCompression::Pic, true) => cv::NUMPRESS_PIC_ZLIB,
            (NumpressCompression::Slof, true) => cv::NUMPRESS_SLOF_ZLIB,
        }
    }

    /// Accession of [`cv_term`](Self::cv_term)
    pub fn cv_accession(&self) -> &'static str {
        self.cv_term().accession
    }
}

/// Errors that can occur while encoding or decoding binary arrays
#[derive(Debug, thiserror::Error)]
pub enum BinaryArrayError {
    /// The text is not valid Base64
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    /// zlib compression or decompression failed
    #[error("Compression error: {0}")]
    CompressionError(#[from] std::io::Error),

    /// The number of bytes or values does not match what was expected
    #[error("Invalid data length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected count
        expected: usize,
        /// Actual count
        actual: usize,
    },

    /// The numpress encoder rejected the data
    #[error("Numpress encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// The numpress payload is malformed
    #[error("Numpress decoding failed: {0}")]
    Decode(#[from] DecodeError),

    /// A decoded value drifted further from its original than allowed
    #[error("Round-trip error {error} at index {index} exceeds tolerance {tolerance}")]
    ToleranceExceeded {
        /// Position of the first offending value
        index: usize,
        /// Absolute error at that position
        error: f64,
        /// Configured tolerance
        tolerance: f64,
    },
}

/// A Base64 binary array ready to be written, with the parameters that
/// describe it
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedArray {
    /// Base64 text for the `<binary>` element
    pub text: String,
    /// Compression actually applied
    pub compression: ArrayCompression,
    /// Precision of the array
    pub encoding: BinaryEncoding,
}

impl EncodedArray {
    /// CV terms to attach to the `<binaryDataArray>`
    pub fn cv_terms(&self) -> [CvTerm; 2] {
        [self.encoding.cv_term(), self.compression.cv_term()]
    }
}

/// Codec for mzML binary data arrays
pub struct BinaryArrayCodec;

impl BinaryArrayCodec {
    /// Decode a Base64-encoded binary array
    ///
    /// # Arguments
    /// * `base64_data` - The Base64-encoded string from the `<binary>` element
    /// * `encoding` - The numerical precision of plain arrays (numpress arrays
    ///   always decode to 64-bit values)
    /// * `compression` - The compression applied before Base64
    /// * `expected_length` - Expected number of values (from defaultArrayLength)
    pub fn decode(
        base64_data: &str,
        encoding: BinaryEncoding,
        compression: ArrayCompression,
        expected_length: Option<usize>,
    ) -> Result<Vec<f64>, BinaryArrayError> {
        let trimmed = base64_data.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let decoded_bytes = BASE64_STANDARD.decode(trimmed)?;

        let uncompressed = if compression.zlib {
            Self::inflate(&decoded_bytes)?
        } else {
            decoded_bytes
        };

        let values = match compression.numpress {
            NumpressCompression::None => Self::bytes_to_floats(&uncompressed, encoding)?,
            scheme => numpress::decode(&uncompressed, scheme)?,
        };

        if let Some(expected) = expected_length {
            if values.len() != expected {
                return Err(BinaryArrayError::InvalidLength {
                    expected,
                    actual: values.len(),
                });
            }
        }

        Ok(values)
    }

    /// Decode with encoding and compression taken from the array's CV params
    pub fn decode_with_cv_params(
        base64_data: &str,
        cv_params: &[(String, Option<String>)],
        expected_length: Option<usize>,
    ) -> Result<(Vec<f64>, BinaryEncoding), BinaryArrayError> {
        let mut encoding = BinaryEncoding::Float64;
        let mut compression = ArrayCompression::NONE;

        for (accession, _value) in cv_params {
            if let Some(enc) = BinaryEncoding::from_cv_accession(accession) {
                encoding = enc;
            }
            if let Some(comp) = ArrayCompression::from_cv_accession(accession) {
                compression = compression.merge(comp);
            }
        }

        let values = Self::decode(base64_data, encoding, compression, expected_length)?;
        Ok((values, encoding))
    }

    /// Encode `data` with the numpress settings in `config`, then optionally
    /// zlib, then Base64.
    ///
    /// When numpress cannot encode the array within the configured tolerance
    /// the array is written as plain 64-bit floats instead; the returned
    /// [`EncodedArray::compression`] reflects what was actually used.
    pub fn encode(
        data: &[f64],
        config: &NumpressConfig,
        zlib: bool,
    ) -> Result<EncodedArray, BinaryArrayError> {
        let (bytes, numpress) = match config.encode_raw(data) {
            Ok(bytes) => (bytes, config.compression),
            Err(e) if config.compression != NumpressCompression::None => {
                warn!(
                    "{} numpress failed for {} values ({}), storing plain 64-bit floats",
                    config.compression,
                    data.len(),
                    e
                );
                (Self::floats_to_bytes(data), NumpressCompression::None)
            }
            Err(e) => return Err(e),
        };

        let payload = if zlib { Self::deflate(&bytes)? } else { bytes };

        debug!(
            "Encoded {} values into {} bytes ({}, zlib: {})",
            data.len(),
            payload.len(),
            numpress,
            zlib
        );

        Ok(EncodedArray {
            text: BASE64_STANDARD.encode(&payload),
            compression: ArrayCompression::new(numpress, zlib),
            encoding: BinaryEncoding::Float64,
        })
    }

    /// zlib-compress `bytes`
    pub fn deflate(bytes: &[u8]) -> Result<Vec<u8>, BinaryArrayError> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes)?;
        Ok(encoder.finish()?)
    }

    /// Decompress zlib `bytes`
    pub fn inflate(bytes: &[u8]) -> Result<Vec<u8>, BinaryArrayError> {
        let mut decoder = ZlibDecoder::new(bytes);
        let mut uncompressed = Vec::new();
        decoder.read_to_end(&mut uncompressed)?;
        Ok(uncompressed)
    }

    fn floats_to_bytes(data: &[f64]) -> Vec<u8> {
        data.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    /// Convert raw bytes to f64 values based on encoding
    fn bytes_to_floats(
        bytes: &[u8],
        encoding: BinaryEncoding,
    ) -> Result<Vec<f64>, BinaryArrayError> {
        let byte_size = encoding.byte_size();

        if bytes.len() % byte_size != 0 {
            return Err(BinaryArrayError::InvalidLength {
                expected: bytes.len() / byte_size * byte_size,
                actual: bytes.len(),
            });
        }

        let count = bytes.len() / byte_size;
        let mut values = Vec::with_capacity(count);
        let mut cursor = std::io::Cursor::new(bytes);

        match encoding {
            BinaryEncoding::Float32 => {
                for _ in 0..count {
                    values.push(f64::from(cursor.read_f32::<LittleEndian>()?));
                }
            }
            BinaryEncoding::Float64 => {
                for _ in 0..count {
                    values.push(cursor.read_f64::<LittleEndian>()?);
                }
            }
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mz_array() -> Vec<f64> {
        (0..200).map(|i| 400.0 + i as f64 * 0.0137).collect()
    }

    #[test]
    fn test_decode_float64_uncompressed() {
        // 100.0 = 0x4059000000000000, 200.0 = 0x4069000000000000
        let bytes: [u8; 16] = [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x59, 0x40, // 100.0
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x69, 0x40, // 200.0
        ];
        let base64_data = BASE64_STANDARD.encode(bytes);

        let result = BinaryArrayCodec::decode(
            &base64_data,
            BinaryEncoding::Float64,
            ArrayCompression::NONE,
            Some(2),
        )
        .unwrap();

        assert_eq!(result, vec![100.0, 200.0]);
    }

    #[test]
    fn test_decode_float32_uncompressed() {
        let bytes: [u8; 8] = [
            0x00, 0x00, 0xc8, 0x42, // 100.0
            0x00, 0x00, 0x48, 0x43, // 200.0
        ];
        let base64_data = BASE64_STANDARD.encode(bytes);

        let result = BinaryArrayCodec::decode(
            &base64_data,
            BinaryEncoding::Float32,
            ArrayCompression::NONE,
            Some(2),
        )
        .unwrap();

        assert_eq!(result, vec![100.0, 200.0]);
    }

    #[test]
    fn test_decode_empty() {
        let result = BinaryArrayCodec::decode(
            "  \n",
            BinaryEncoding::Float64,
            ArrayCompression::ZLIB,
            None,
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_decode_length_mismatch() {
        let encoded =
            BinaryArrayCodec::encode(&[1.0, 2.0, 3.0], &NumpressConfig::default(), false).unwrap();
        let err = BinaryArrayCodec::decode(
            &encoded.text,
            encoded.encoding,
            encoded.compression,
            Some(4),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BinaryArrayError::InvalidLength {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_decode_invalid_base64() {
        let err = BinaryArrayCodec::decode(
            "not base64!",
            BinaryEncoding::Float64,
            ArrayCompression::NONE,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, BinaryArrayError::Base64Error(_)));
    }

    #[test]
    fn test_plain_zlib_roundtrip() {
        let values = mz_array();
        let encoded = BinaryArrayCodec::encode(&values, &NumpressConfig::default(), true).unwrap();
        assert_eq!(encoded.compression, ArrayCompression::ZLIB);

        let decoded = BinaryArrayCodec::decode(
            &encoded.text,
            encoded.encoding,
            encoded.compression,
            Some(values.len()),
        )
        .unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_linear_roundtrip_with_and_without_zlib() {
        let values = mz_array();
        for zlib in [false, true] {
            let encoded = BinaryArrayCodec::encode(&values, &NumpressConfig::linear(), zlib).unwrap();
            assert_eq!(
                encoded.compression,
                ArrayCompression::new(NumpressCompression::Linear, zlib)
            );

            let decoded = BinaryArrayCodec::decode(
                &encoded.text,
                encoded.encoding,
                encoded.compression,
                Some(values.len()),
            )
            .unwrap();
            for (original, restored) in values.iter().zip(&decoded) {
                assert!((original - restored).abs() <= DEFAULT_ERROR_TOLERANCE);
            }
        }
    }

    #[test]
    fn test_slof_roundtrip() {
        let intensities = [0.0, 12.0, 1500.0, 2.5e5, 8.0e6];
        let config = NumpressConfig::slof().with_error_tolerance(-1.0);
        let encoded = BinaryArrayCodec::encode(&intensities, &config, true).unwrap();
        assert_eq!(encoded.compression.numpress, NumpressCompression::Slof);

        let decoded = BinaryArrayCodec::decode(
            &encoded.text,
            encoded.encoding,
            encoded.compression,
            Some(intensities.len()),
        )
        .unwrap();
        for (original, restored) in intensities.iter().zip(&decoded) {
            assert!((original - restored).abs() <= original * 1e-3 + 1e-3);
        }
    }

    #[test]
    fn test_fallback_to_plain_when_tolerance_exceeded() {
        let values = [1.0, 2.4, 3.7];
        let encoded = BinaryArrayCodec::encode(&values, &NumpressConfig::pic(), false).unwrap();
        assert_eq!(encoded.compression, ArrayCompression::NONE);

        let decoded = BinaryArrayCodec::decode(
            &encoded.text,
            encoded.encoding,
            encoded.compression,
            None,
        )
        .unwrap();
        assert_eq!(decoded, values.to_vec());
    }

    #[test]
    fn test_fallback_to_plain_on_codec_error() {
        let values = [5.0, -1.0];
        let encoded = BinaryArrayCodec::encode(&values, &NumpressConfig::pic(), true).unwrap();
        assert_eq!(encoded.compression, ArrayCompression::ZLIB);
    }

    #[test]
    fn test_decode_with_cv_params() {
        let values = mz_array();
        let encoded = BinaryArrayCodec::encode(&values, &NumpressConfig::linear(), true).unwrap();

        // combined term
        let combined = vec![
            (cv::MS_CV_ACCESSIONS::FLOAT_64_BIT.to_string(), None),
            (cv::MS_CV_ACCESSIONS::NUMPRESS_LINEAR_ZLIB.to_string(), None),
        ];
        let (decoded, encoding) =
            BinaryArrayCodec::decode_with_cv_params(&encoded.text, &combined, Some(values.len()))
                .unwrap();
        assert_eq!(encoding, BinaryEncoding::Float64);
        assert_eq!(decoded.len(), values.len());

        // numpress and zlib as separate terms
        let separate = vec![
            (cv::MS_CV_ACCESSIONS::NUMPRESS_LINEAR.to_string(), None),
            (cv::MS_CV_ACCESSIONS::ZLIB_COMPRESSION.to_string(), None),
        ];
        let (decoded_separate, _) =
            BinaryArrayCodec::decode_with_cv_params(&encoded.text, &separate, None).unwrap();
        assert_eq!(decoded_separate, decoded);
    }

    #[test]
    fn test_cv_accession_mapping() {
        for numpress in NumpressCompression::ALL {
            for zlib in [false, true] {
                let compression = ArrayCompression::new(numpress, zlib);
                assert_eq!(
                    ArrayCompression::from_cv_accession(compression.cv_accession()),
                    Some(compression)
                );
            }
        }
        assert_eq!(ArrayCompression::from_cv_accession("MS:1000515"), None);

        for encoding in [BinaryEncoding::Float32, BinaryEncoding::Float64] {
            assert_eq!(
                BinaryEncoding::from_cv_accession(encoding.cv_term().accession),
                Some(encoding)
            );
        }
    }

    #[test]
    fn test_encoded_array_cv_terms() {
        let encoded = BinaryArrayCodec::encode(&mz_array(), &NumpressConfig::linear(), false)
            .unwrap();
        let [encoding, compression] = encoded.cv_terms();
        assert_eq!(encoding.accession, "MS:1000523");
        assert_eq!(compression.accession, "MS:1002312");
    }
}
