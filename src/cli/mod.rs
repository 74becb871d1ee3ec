use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod combine;
mod inspect;
mod remove;

/// echomerge - Multi-File Combination for Converted Echosounder Data
#[derive(Parser)]
#[command(name = "echomerge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine converted containers into a single output container
    Combine {
        /// Converted input containers, in survey order
        #[arg(value_name = "INPUTS", required = true)]
        inputs: Vec<PathBuf>,

        /// Sonar model the inputs were converted from (EK60, EK80, EA640, AZFP)
        #[arg(short, long)]
        model: String,

        /// Output path; defaults to the first input with a `__combined` marker
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delete the per-file inputs after a successful combine
        #[arg(long)]
        remove_inputs: bool,
    },

    /// Display the group layout of a container
    Inspect {
        /// Container file or store path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Delete a container (recursively for directory-chunked stores)
    Remove {
        /// Container file or store path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    /// Dispatch the parsed subcommand.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Combine {
                inputs,
                model,
                output,
                remove_inputs,
            } => combine::run(&model, inputs, output, remove_inputs),
            Commands::Inspect { file } => inspect::run(&file),
            Commands::Remove { file } => remove::run(&file),
        }
    }
}
