use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "face-compare")]
#[command(about = "Compare faces in two images and keep a reusable upload history", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Stage two images and run the comparator on them
    Compare {
        image_one: PathBuf,
        image_two: PathBuf,
    },
    /// List staged images, newest first
    History,
    /// Delete every staged image
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Interactive session: select history entries and reuse them as inputs
    Shell,
    /// Print configuration values
    PrintConfig,
}
