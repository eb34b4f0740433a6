//! PSI-MS controlled vocabulary terms describing binary data arrays.
//!
//! mzML tags each `<binaryDataArray>` with one term for the numeric precision
//! and one for the compression applied before base64 encoding.

use serde::{Deserialize, Serialize};

/// A PSI-MS term: accession plus its preferred name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CvTerm {
    /// Accession (e.g. "MS:1002312")
    pub accession: &'static str,
    /// Preferred name
    pub name: &'static str,
}

impl CvTerm {
    const fn new(accession: &'static str, name: &'static str) -> Self {
        Self { accession, name }
    }

    /// Render as an mzML `<cvParam>` element
    pub fn to_cv_param(&self) -> String {
        format!(
            r#"<cvParam cvRef="MS" accession="{}" name="{}" />"#,
            self.accession, self.name
        )
    }
}

/// Binary data array accessions
#[allow(non_snake_case)]
pub mod MS_CV_ACCESSIONS {
    // =========================================================================
    // Binary data encoding
    // =========================================================================

    /// 32-bit float
    pub const FLOAT_32_BIT: &str = "MS:1000521";

    /// 64-bit float
    pub const FLOAT_64_BIT: &str = "MS:1000523";

    // =========================================================================
    // Compression
    // =========================================================================

    /// zlib compression
    pub const ZLIB_COMPRESSION: &str = "MS:1000574";

    /// No compression
    pub const NO_COMPRESSION: &str = "MS:1000576";

    /// MS-Numpress linear prediction
    pub const NUMPRESS_LINEAR: &str = "MS:1002312";

    /// MS-Numpress positive integer compression
    pub const NUMPRESS_PIC: &str = "MS:1002313";

    /// MS-Numpress short logged float compression
    pub const NUMPRESS_SLOF: &str = "MS:1002314";

    /// MS-Numpress linear prediction followed by zlib
    pub const NUMPRESS_LINEAR_ZLIB: &str = "MS:1002746";

    /// MS-Numpress positive integer compression followed by zlib
    pub const NUMPRESS_PIC_ZLIB: &str = "MS:1002747";

    /// MS-Numpress short logged float compression followed by zlib
    pub const NUMPRESS_SLOF_ZLIB: &str = "MS:1002748";
}

use MS_CV_ACCESSIONS as acc;

/// 32-bit float
pub const FLOAT_32_BIT: CvTerm = CvTerm::new(acc::FLOAT_32_BIT, "32-bit float");
/// 64-bit float
pub const FLOAT_64_BIT: CvTerm = CvTerm::new(acc::FLOAT_64_BIT, "64-bit float");
/// zlib compression
pub const ZLIB_COMPRESSION: CvTerm = CvTerm::new(acc::ZLIB_COMPRESSION, "zlib compression");
/// No compression
pub const NO_COMPRESSION: CvTerm = CvTerm::new(acc::NO_COMPRESSION, "no compression");
/// MS-Numpress linear prediction
pub const NUMPRESS_LINEAR: CvTerm = CvTerm::new(
    acc::NUMPRESS_LINEAR,
    "MS-Numpress linear prediction compression",
);
/// MS-Numpress positive integer compression
pub const NUMPRESS_PIC: CvTerm = CvTerm::new(
    acc::NUMPRESS_PIC,
    "MS-Numpress positive integer compression",
);
/// MS-Numpress short logged float compression
pub const NUMPRESS_SLOF: CvTerm = CvTerm::new(
    acc::NUMPRESS_SLOF,
    "MS-Numpress short logged float compression",
);
/// MS-Numpress linear prediction followed by zlib
pub const NUMPRESS_LINEAR_ZLIB: CvTerm = CvTerm::new(
    acc::NUMPRESS_LINEAR_ZLIB,
    "MS-Numpress linear prediction compression followed by zlib compression",
);
/// MS-Numpress positive integer compression followed by zlib
pub const NUMPRESS_PIC_ZLIB: CvTerm = CvTerm::new(
    acc::NUMPRESS_PIC_ZLIB,
    "MS-Numpress positive integer compression followed by zlib compression",
);
/// MS-Numpress short logged float compression followed by zlib
pub const NUMPRESS_SLOF_ZLIB: CvTerm = CvTerm::new(
    acc::NUMPRESS_SLOF_ZLIB,
    "MS-Numpress short logged float compression followed by zlib compression",
);
