use anyhow::{Context, Result};
use log::info;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use mzpeak_numpress::binary::{ArrayCompression, BinaryArrayCodec, BinaryEncoding, NumpressConfig};
use mzpeak_numpress::numpress::NumpressCompression;

/// Read an encoded file and return the uncompressed numpress bytes
pub(super) fn read_payload(path: &Path, zlib: bool, base64: bool) -> Result<Vec<u8>> {
    use base64::prelude::*;

    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }
    let raw = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let bytes = if base64 {
        let text = std::str::from_utf8(&raw).context("Base64 input is not valid UTF-8")?;
        BASE64_STANDARD
            .decode(text.trim())
            .context("Failed to decode Base64 input")?
    } else {
        raw
    };

    if zlib {
        Ok(BinaryArrayCodec::inflate(&bytes).context("Failed to inflate zlib input")?)
    } else {
        Ok(bytes)
    }
}

/// Decode an encoded file to one value per line
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    codec: NumpressCompression,
    zlib: bool,
    base64: bool,
) -> Result<()> {
    let values = if base64 {
        let text = fs::read_to_string(&input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        BinaryArrayCodec::decode(
            &text,
            BinaryEncoding::Float64,
            ArrayCompression::new(codec, zlib),
            None,
        )
        .with_context(|| format!("Failed to decode {}", input.display()))?
    } else {
        let payload = read_payload(&input, zlib, false)?;
        NumpressConfig::new(codec)
            .decode_raw(&payload)
            .with_context(|| format!("Failed to decode {} as {}", input.display(), codec))?
    };

    info!("Decoded {} values from {}", values.len(), input.display());

    let mut text = String::with_capacity(values.len() * 12);
    for value in &values {
        writeln!(text, "{}", value)?;
    }
    super::write_output(output.as_deref(), text.as_bytes())
}
