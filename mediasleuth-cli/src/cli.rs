// mediasleuth-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "MediaSleuth: Delivery media inspection tool",
    long_about = "Inspects delivery media files (slate, content bounds, OP48/OP59 audio) \
                  using ffmpeg, ffprobe and tesseract via the mediasleuth-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspects media files and prints one row per file
    Inspect(InspectArgs),
    /// Deletes every intermediate image under the scratch root
    Purge(PurgeArgs),
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Media files or directories; directories are scanned one level deep
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Number of files inspected at once (defaults to the CPU count)
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// Print the final records as JSON instead of the summary table
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Optional: Override the scratch root for intermediate images
    #[arg(long, value_name = "DIR", env = "MEDIASLEUTH_SCRATCH_ROOT")]
    pub scratch_root: Option<PathBuf>,

    /// Optional: Override the pixel strip tile edge (N in NxN)
    #[arg(long, value_name = "N")]
    pub tile_size: Option<u32>,
}

#[derive(Parser, Debug)]
pub struct PurgeArgs {
    /// Optional: Override the scratch root to purge
    #[arg(long, value_name = "DIR", env = "MEDIASLEUTH_SCRATCH_ROOT")]
    pub scratch_root: Option<PathBuf>,
}
