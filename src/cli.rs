// sizetailor/src/cli.rs
use crate::core::{Mode, Result, TailorError};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sizetailor")]
#[command(about = "Compress images under a size ceiling or pad files to an exact size", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Re-encode an image so it is at most the target size
    Compress {
        /// Input image (JPEG, PNG or WebP larger than 10 KB)
        input: PathBuf,

        /// Target size (e.g. 250KB, 1.5MB, 20000). Defaults to half the original
        #[arg(short, long)]
        target: Option<String>,

        /// Output file. Defaults to <name>-compressed.jpg next to the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the target range check
        #[arg(long)]
        unchecked: bool,
    },

    /// Pad a file with zero bytes up to exactly the target size
    Inflate {
        /// Input file of any type
        input: PathBuf,

        /// Target size (e.g. 2MB). Defaults to the original plus 100 KB
        #[arg(short, long)]
        target: Option<String>,

        /// Output file. Defaults to the input name next to the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the target range check
        #[arg(long)]
        unchecked: bool,
    },

    /// Apply one mode and target to every file in a directory
    Batch {
        /// Input directory
        input: PathBuf,

        /// Output directory
        output: PathBuf,

        /// Mode to apply. Defaults to compress for images that allow it, inflate otherwise
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Target size for every file. Defaults per file
        #[arg(short, long)]
        target: Option<String>,

        /// Number of threads (0 = auto)
        #[arg(long, default_value_t = 0)]
        threads: usize,

        /// Process subdirectories recursively
        #[arg(short, long)]
        recursive: bool,

        /// Skip the target range check
        #[arg(long)]
        unchecked: bool,
    },

    /// Show size, type and the target ranges offered for a file
    Info {
        /// Input file
        input: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Compress,
    Inflate,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Compress => Mode::Compress,
            ModeArg::Inflate => Mode::Inflate,
        }
    }
}

/// Parses a human size such as `250KB` or `1.5 MiB`. Decimal and binary
/// prefixes both count in powers of 1024.
pub fn parse_target_size(input: &str) -> Result<u64> {
    parse_size::Config::new()
        .with_binary()
        .parse_size(input.trim())
        .map_err(|e| {
            TailorError::InvalidParameter(format!("Invalid target size '{}': {}", input, e))
        })
}
