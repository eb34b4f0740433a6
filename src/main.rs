//! # numpress
//!
//! A command-line tool for MS-Numpress encoding of mass spectrometry arrays.
//!
//! ## Usage
//!
//! ```bash
//! # Encode an m/z list with linear prediction, as mzML Base64 text
//! numpress encode mz.txt mz.b64 --codec linear --zlib --base64
//!
//! # Decode it back to one value per line
//! numpress decode mz.b64 --codec linear --zlib --base64
//!
//! # Inspect an encoded file
//! numpress info intensities.bin --codec slof --json
//!
//! # Compare codecs on a data file
//! numpress estimate intensities.txt
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
