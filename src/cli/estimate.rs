use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use mzpeak_numpress::numpress::{self, NumpressCompression};

/// Print the optimal fixed points and the encoded size per codec
pub fn run(input: PathBuf, mass_accuracy: Option<f64>) -> Result<()> {
    let values = super::read_values(&input)?;
    if values.is_empty() {
        anyhow::bail!("No values in {}", input.display());
    }

    println!("Values: {}", values.len());
    println!("Plain size: {} bytes", values.len() * 8);
    println!();

    println!("Fixed points:");
    println!("  linear: {}", numpress::optimal_linear_fixed_point(&values));
    if let Some(accuracy) = mass_accuracy {
        match numpress::optimal_linear_fixed_point_mass(&values, accuracy) {
            Some(fixed_point) => println!("  linear @ {}: {}", accuracy, fixed_point),
            None => println!("  linear @ {}: unattainable", accuracy),
        }
    }
    println!("  slof:   {}", numpress::optimal_slof_fixed_point(&values));
    println!();

    println!("Encoded sizes:");
    for codec in NumpressCompression::ALL {
        let fixed_point = match (codec, mass_accuracy) {
            (NumpressCompression::Linear, Some(accuracy)) => {
                numpress::optimal_linear_fixed_point_mass(&values, accuracy)
                    .unwrap_or_else(|| numpress::optimal_linear_fixed_point(&values))
            }
            _ => codec.optimal_fixed_point(&values).unwrap_or(0.0),
        };

        match numpress::encode(&values, codec, fixed_point) {
            Ok(encoded) => println!(
                "  {:<6} {:>10} bytes ({:.3} bytes/value)",
                codec.name(),
                encoded.len(),
                encoded.len() as f64 / values.len() as f64
            ),
            Err(e) => {
                debug!("{} encoding failed: {}", codec, e);
                println!("  {:<6} not applicable ({})", codec.name(), e);
            }
        }
    }

    Ok(())
}
