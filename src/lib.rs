//! # mzpeak-numpress - MS-Numpress Compression for Mass Spectrometry Arrays
//!
//! `mzpeak_numpress` implements the MS-Numpress family of lossy codecs for the
//! numeric arrays found in mass spectrometry data (m/z, retention time,
//! intensities), together with the mzML binary array layer that carries them.
//!
//! ## Key Features
//!
//! - **Linear prediction** ([`numpress::linear`]): stores second-order
//!   prediction residuals of smooth, increasing sequences such as m/z values.
//!   Typical m/z arrays shrink to well under two bytes per value.
//!
//! - **Positive integer count** ([`numpress::pic`]): rounds ion counts to
//!   integers and stores them in a variable length nibble code.
//!
//! - **Short logged float** ([`numpress::slof`]): stores `ln(x + 1)` as a
//!   16-bit fixed point number, keeping relative precision across a large
//!   dynamic range.
//!
//! - **Fixed point selection**: helpers that pick the largest scaling factor
//!   that cannot overflow, or the smallest one that reaches a target accuracy.
//!
//! - **mzML binary arrays** (feature `mzml`, default): Base64 and zlib
//!   wrapping, HUPO-PSI CV accessions and a round-trip tolerance check that
//!   falls back to plain doubles when numpress would lose too much.
//!
//! ## Quick Start
//!
//! ```rust
//! use mzpeak_numpress::numpress::{decode_linear, encode_linear, optimal_linear_fixed_point};
//!
//! let mz: Vec<f64> = (0..100).map(|i| 400.0 + i as f64 * 0.013).collect();
//!
//! let fixed_point = optimal_linear_fixed_point(&mz);
//! let encoded = encode_linear(&mz, fixed_point)?;
//! assert!(encoded.len() < mz.len() * 8);
//!
//! let decoded = decode_linear(&encoded)?;
//! for (original, restored) in mz.iter().zip(&decoded) {
//!     assert!((original - restored).abs() < 1e-6);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## mzML Binary Arrays
//!
//! ```rust
//! # #[cfg(feature = "mzml")]
//! # {
//! use mzpeak_numpress::binary::{BinaryArrayCodec, NumpressConfig};
//!
//! let intensities = vec![0.0, 15.0, 230.0, 12_000.0];
//! let config = NumpressConfig::slof().with_error_tolerance(-1.0);
//!
//! let array = BinaryArrayCodec::encode(&intensities, &config, true)?;
//! println!("<binary>{}</binary>", array.text);
//! for term in array.cv_terms() {
//!     println!("{}", term.to_cv_param());
//! }
//!
//! let decoded = BinaryArrayCodec::decode(&array.text, array.encoding, array.compression, Some(4))?;
//! assert_eq!(decoded.len(), 4);
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Wire Compatibility
//!
//! Buffers are byte-compatible with other MS-Numpress implementations: fixed
//! points and integers are little-endian on every platform, and nibble packing
//! is high nibble first.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod numpress;

#[cfg(feature = "mzml")]
pub mod binary;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::numpress::{
        decode, decode_linear, decode_pic, decode_slof, encode, encode_linear, encode_pic,
        encode_slof, optimal_linear_fixed_point, optimal_linear_fixed_point_mass,
        optimal_slof_fixed_point, DecodeError, EncodeError, NumpressCompression,
    };

    #[cfg(feature = "mzml")]
    pub use crate::binary::{
        ArrayCompression, BinaryArrayCodec, BinaryArrayError, BinaryEncoding, EncodedArray,
        NumpressConfig,
    };
}
