//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::archive::DEFAULT_ARCHIVE_NAME;
use crate::config::CONFIG_FILE_NAME;

/// Convert a Telegram chat export into a Mattermost bulk-import archive.
#[derive(Parser, Debug, Clone)]
#[command(name = "mattergram")]
#[command(version, about, long_about = None)]
#[command(after_help = "INPUT DIRECTORY REQUIREMENTS:
  The INPUT_DIR must contain:
  - A Telegram chat export (result.json and its media files), created with
    Telegram Desktop's \"Export Chat History\" feature in JSON format
  - config.toml: user mappings and import settings for the conversion
    (or the file named with --config-file)")]
pub struct Args {
    /// Directory containing the Telegram export and configuration file
    pub input_dir: PathBuf,

    /// Output ZIP file path
    #[arg(short, long, default_value = DEFAULT_ARCHIVE_NAME)]
    pub output_file: PathBuf,

    /// Configuration file name inside the input directory
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    pub config_file: String,

    /// Write a text-only log of the conversation to this file
    #[arg(long, value_name = "FILE")]
    pub conversation_log: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
