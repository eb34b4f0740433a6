use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use mzpeak_numpress::numpress::NumpressCompression;

mod config;
mod decode;
mod encode;
mod estimate;
mod info;

/// numpress - MS-Numpress encoder and decoder for mass spectrometry arrays
#[derive(Parser)]
#[command(name = "numpress")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a text file of numbers
    Encode {
        /// Input file with whitespace or comma separated numbers
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Numpress scheme: none, linear, pic or slof
        #[arg(long)]
        codec: Option<NumpressCompression>,

        /// Fixed point to use instead of estimating one
        #[arg(long)]
        fixed_point: Option<f64>,

        /// Target absolute accuracy for linear encoding
        #[arg(long)]
        mass_accuracy: Option<f64>,

        /// Maximal round-trip error (<= 0 disables the check)
        #[arg(long)]
        tolerance: Option<f64>,

        /// zlib-compress the numpress bytes
        #[arg(long)]
        zlib: bool,

        /// Write mzML-style Base64 text instead of raw bytes
        #[arg(long)]
        base64: bool,

        /// TOML config file with an [encode] table
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Decode an encoded file to one value per line
    Decode {
        /// Encoded input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Numpress scheme the input was written with
        #[arg(long)]
        codec: NumpressCompression,

        /// Input is zlib-compressed
        #[arg(long)]
        zlib: bool,

        /// Input is Base64 text
        #[arg(long)]
        base64: bool,
    },

    /// Show header and size information of an encoded file
    Info {
        /// Encoded input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Numpress scheme the input was written with
        #[arg(long)]
        codec: NumpressCompression,

        /// Input is zlib-compressed
        #[arg(long)]
        zlib: bool,

        /// Input is Base64 text
        #[arg(long)]
        base64: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the optimal fixed points and encoded sizes for a text file of numbers
    Estimate {
        /// Input file with whitespace or comma separated numbers
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Target absolute accuracy for linear encoding
        #[arg(long)]
        mass_accuracy: Option<f64>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Encode {
            input,
            output,
            codec,
            fixed_point,
            mass_accuracy,
            tolerance,
            zlib,
            base64,
            config,
        } => encode::run(
            input,
            output,
            encode::EncodeArgs {
                codec,
                fixed_point,
                mass_accuracy,
                tolerance,
                zlib,
                base64,
            },
            config,
        ),
        Commands::Decode {
            input,
            output,
            codec,
            zlib,
            base64,
        } => decode::run(input, output, codec, zlib, base64),
        Commands::Info {
            input,
            codec,
            zlib,
            base64,
            json,
        } => info::run(input, codec, zlib, base64, json),
        Commands::Estimate {
            input,
            mass_accuracy,
        } => estimate::run(input, mass_accuracy),
    }
}

/// Parse whitespace or comma separated numbers
fn parse_values(text: &str) -> Result<Vec<f64>> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(i, token)| {
            token
                .parse::<f64>()
                .with_context(|| format!("Invalid number {:?} at position {}", token, i + 1))
        })
        .collect()
}

fn read_values(path: &Path) -> Result<Vec<f64>> {
    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    parse_values(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write to `output`, or stdout when none is given
fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => fs::write(path, bytes)
            .with_context(|| format!("Failed to write output file: {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")
        }
    }
}
