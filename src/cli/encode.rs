use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use mzpeak_numpress::binary::{BinaryArrayCodec, NumpressConfig};
use mzpeak_numpress::numpress::NumpressCompression;

use super::config::{Config, EncodeConfig};

/// Encode flags given on the command line
#[derive(Debug, Default)]
pub struct EncodeArgs {
    pub codec: Option<NumpressCompression>,
    pub fixed_point: Option<f64>,
    pub mass_accuracy: Option<f64>,
    pub tolerance: Option<f64>,
    pub zlib: bool,
    pub base64: bool,
}

/// Fully resolved encode settings
#[derive(Debug)]
struct EncodeSettings {
    numpress: NumpressConfig,
    zlib: bool,
    base64: bool,
}

/// Merge command line flags over config file values
fn resolve(args: EncodeArgs, file: EncodeConfig) -> Result<EncodeSettings> {
    let compression = args.codec.or(file.compression).context(
        "No codec given: pass --codec or set `compression` in the [encode] config table",
    )?;

    let mut numpress = NumpressConfig::new(compression);
    if let Some(fixed_point) = args.fixed_point.or(file.fixed_point) {
        numpress = numpress.with_fixed_point(fixed_point);
    }
    if let Some(mass_accuracy) = args.mass_accuracy.or(file.linear_mass_accuracy) {
        numpress = numpress.with_linear_mass_accuracy(mass_accuracy);
    }
    if let Some(tolerance) = args.tolerance.or(file.error_tolerance) {
        numpress = numpress.with_error_tolerance(tolerance);
    }

    Ok(EncodeSettings {
        numpress,
        zlib: args.zlib || file.zlib.unwrap_or(false),
        base64: args.base64 || file.base64.unwrap_or(false),
    })
}

/// Encode a text file of numbers
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    args: EncodeArgs,
    config: Option<PathBuf>,
) -> Result<()> {
    let file_config = match config {
        Some(path) => Config::from_file(&path)?.encode,
        None => EncodeConfig::default(),
    };
    let settings = resolve(args, file_config)?;
    let values = super::read_values(&input)?;

    info!("Input:  {} ({} values)", input.display(), values.len());
    info!(
        "Codec:  {} (zlib: {}, base64: {})",
        settings.numpress.compression, settings.zlib, settings.base64
    );

    let bytes = if settings.base64 {
        let array = BinaryArrayCodec::encode(&values, &settings.numpress, settings.zlib)?;
        if array.compression.numpress != settings.numpress.compression {
            warn!(
                "Stored as {} ({}); decode with --codec {}",
                array.compression.cv_term().name,
                array.compression.cv_accession(),
                array.compression.numpress
            );
        }
        let mut text = array.text.into_bytes();
        text.push(b'\n');
        text
    } else {
        let raw = settings
            .numpress
            .encode_raw(&values)
            .with_context(|| format!("Failed to encode {}", input.display()))?;
        if settings.zlib {
            BinaryArrayCodec::deflate(&raw)?
        } else {
            raw
        }
    };

    if !values.is_empty() {
        let plain_size = values.len() * 8;
        info!(
            "Encoded {} bytes -> {} bytes ({:.2} bytes/value, ratio {:.1}x)",
            plain_size,
            bytes.len(),
            bytes.len() as f64 / values.len() as f64,
            plain_size as f64 / bytes.len().max(1) as f64
        );
    }

    super::write_output(output.as_deref(), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let file = EncodeConfig {
            compression: Some(NumpressCompression::Slof),
            fixed_point: Some(100.0),
            error_tolerance: Some(0.5),
            zlib: Some(true),
            ..Default::default()
        };
        let args = EncodeArgs {
            codec: Some(NumpressCompression::Linear),
            tolerance: Some(-1.0),
            ..Default::default()
        };

        let settings = resolve(args, file).unwrap();
        assert_eq!(settings.numpress.compression, NumpressCompression::Linear);
        assert_eq!(settings.numpress.fixed_point, 100.0);
        assert!(!settings.numpress.estimate_fixed_point);
        assert_eq!(settings.numpress.error_tolerance, -1.0);
        assert!(settings.zlib);
        assert!(!settings.base64);
    }

    #[test]
    fn test_codec_required() {
        assert!(resolve(EncodeArgs::default(), EncodeConfig::default()).is_err());
    }
}
