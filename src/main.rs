//! # echomerge CLI
//!
//! Command-line front end for combining converted echosounder containers.
//!
//! ## Usage
//!
//! ```bash
//! # Combine two converted legs into leg1__combined.nc
//! echomerge combine leg1.nc leg2.nc --model EK60
//!
//! # Combine into a directory-chunked store at an explicit path
//! echomerge combine leg1.zarr leg2.zarr --model EK80 -o survey.zarr
//!
//! # Show what a container holds
//! echomerge inspect survey.zarr
//!
//! # Delete a container
//! echomerge remove leg1.zarr
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    args.run()
}
