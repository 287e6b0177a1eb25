// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Read and analyse HDF5 files.
//!
//! ```text
//! # Look at the structure and statistics of a file.
//! h5inspect episode_0.hdf5
//! # Also print samples of the data.
//! h5inspect episode_0.hdf5 --verbose
//! # Extract a dataset, optionally saving it as a numpy file.
//! h5inspect episode_0.hdf5 --extract /observations/qpos --save qpos_data.npy
//! # Compare the datasets in several files.
//! h5inspect episode_0.hdf5 --compare episode_0.hdf5 episode_1.hdf5 episode_2.hdf5
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use std::{io::Write, path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use h5inspect::{compare, explore, extract, save_extracted, InspectError, FILE_ENV_VAR};

#[derive(Parser, Debug)]
#[command(author, version, about = "Read and analyse HDF5 files", long_about = None)]
struct Args {
    /// Path to the HDF5 file.
    #[arg(env = FILE_ENV_VAR)]
    file: PathBuf,

    /// Show more detailed information, including data samples.
    #[arg(short, long)]
    verbose: bool,

    /// Extract a specific dataset (e.g. /observations/qpos).
    #[arg(long, value_name = "DATASET", conflicts_with = "extract_all")]
    extract: Option<String>,

    /// Extract every dataset in the file.
    #[arg(long)]
    extract_all: bool,

    /// Save extracted data to this file; .npy for a single dataset, .npz for
    /// all of them.
    #[arg(long, value_name = "OUTPUT")]
    save: Option<PathBuf>,

    /// Compare the dataset structure of these files. Everything else is
    /// ignored.
    #[arg(long, num_args = 1.., value_name = "FILE")]
    compare: Option<Vec<PathBuf>>,
}

#[derive(Debug, PartialEq)]
enum Mode {
    Compare,
    Extract,
    Explore,
}

impl Args {
    fn mode(&self) -> Mode {
        if self.compare.is_some() {
            Mode::Compare
        } else if self.extract.is_some() || self.extract_all {
            Mode::Extract
        } else {
            Mode::Explore
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), InspectError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.mode() {
        Mode::Compare => {
            let files = args.compare.unwrap_or_default();
            compare(&files, &mut out)?;
        }

        Mode::Extract => {
            // A missing dataset has already been reported; there's nothing
            // to save.
            let extracted = extract(&args.file, args.extract.as_deref(), &mut out)?;
            if let (Some(extracted), Some(save)) = (extracted, args.save) {
                let written = save_extracted(&extracted, save)?;
                writeln!(out, "Saved to {}", written.display())?;
            }
        }

        Mode::Explore => {
            explore(&args.file, args.verbose, &mut out)?;
            let file = args.file.display();
            writeln!(out, "\nTip: To extract specific data, use:")?;
            writeln!(out, "   h5inspect {file} --extract /path/to/dataset")?;
            writeln!(
                out,
                "   h5inspect {file} --extract /path/to/dataset --save output.npy"
            )?;
        }
    }
    Ok(())
}
