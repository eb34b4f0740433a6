use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use mzpeak_numpress::binary::NumpressConfig;
use mzpeak_numpress::numpress::{self, NumpressCompression};

use super::decode::read_payload;

/// Summary of an encoded file
#[derive(Debug, Serialize)]
struct InfoReport {
    file: String,
    codec: NumpressCompression,
    /// Fixed point stored in the header, if the codec has one
    fixed_point: Option<f64>,
    value_count: usize,
    /// Size after removing Base64 and zlib
    encoded_bytes: usize,
    bytes_per_value: Option<f64>,
    /// Encoded size relative to plain 64-bit floats
    compression_ratio: Option<f64>,
}

/// Display information about an encoded file
pub fn run(
    input: PathBuf,
    codec: NumpressCompression,
    zlib: bool,
    base64: bool,
    json: bool,
) -> Result<()> {
    let payload = read_payload(&input, zlib, base64)?;

    let fixed_point = if codec.uses_fixed_point() && !payload.is_empty() {
        Some(numpress::decode_fixed_point(&payload).context("Failed to read fixed point header")?)
    } else {
        None
    };
    let values = NumpressConfig::new(codec)
        .decode_raw(&payload)
        .with_context(|| format!("Failed to decode {} as {}", input.display(), codec))?;

    let count = values.len();
    let report = InfoReport {
        file: input.display().to_string(),
        codec,
        fixed_point,
        value_count: count,
        encoded_bytes: payload.len(),
        bytes_per_value: (count > 0).then(|| payload.len() as f64 / count as f64),
        compression_ratio: (!payload.is_empty()).then(|| (count * 8) as f64 / payload.len() as f64),
    };

    if json {
        let text = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", text);
        return Ok(());
    }

    println!("Numpress File Information");
    println!("=========================");
    println!("File: {}", report.file);
    println!("Codec: {}", report.codec);
    if let Some(fixed_point) = report.fixed_point {
        println!("Fixed point: {}", fixed_point);
    }
    println!("Values: {}", report.value_count);
    println!("Encoded size: {} bytes", report.encoded_bytes);
    if let Some(bytes_per_value) = report.bytes_per_value {
        println!("Bytes per value: {:.3}", bytes_per_value);
    }
    if let Some(ratio) = report.compression_ratio {
        println!("Compression ratio: {:.2}x", ratio);
    }

    Ok(())
}
