use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::alignment::Alignment;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a subtitle file for a video or audio file
    Process {
        /// Input media file
        #[arg(short, long)]
        input: PathBuf,

        /// Subtitle position (see `alignments`)
        #[arg(short, long)]
        alignment: Option<Alignment>,

        /// Output subtitle file (default: input with its extension replaced)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create subtitle files for all media files in a directory
    Batch {
        /// Input directory containing media files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Subtitle position (see `alignments`)
        #[arg(short, long)]
        alignment: Option<Alignment>,
    },

    /// Subtitle a WAV file already in the recognizer's format (16 kHz mono)
    Transcribe {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,

        /// Output subtitle file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Subtitle position (see `alignments`)
        #[arg(short, long)]
        alignment: Option<Alignment>,
    },

    /// Build subtitles from a recorded token stream (JSON array of {text, start_time})
    Render {
        /// Input token file
        #[arg(short, long)]
        input: PathBuf,

        /// Output subtitle file
        #[arg(short, long)]
        output: PathBuf,

        /// Subtitle position (see `alignments`)
        #[arg(short, long)]
        alignment: Option<Alignment>,
    },

    /// Extract audio from a media file
    Extract {
        /// Input media file
        #[arg(short, long)]
        input: PathBuf,

        /// Output audio file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List subtitle positions and the tags they produce
    Alignments,

    /// List available whisper models and their status
    Models {
        /// Download the named model
        #[arg(long)]
        download: Option<String>,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Destination path
        #[arg(short, long, default_value = crate::config::DEFAULT_CONFIG_FILE)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
