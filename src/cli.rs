//! Command-line interface definitions for dupesearch.
//!
//! All options are flat flags parsed with the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory and report what was found
//! dupesearch
//!
//! # Only images and PDFs, save the groups, then delete the copies
//! dupesearch -p ~/Pictures -f "photo, .pdf" -s -o ~/dupes.json -d
//!
//! # Ask for everything interactively
//! dupesearch -i
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Find files with identical content and optionally remove the copies.
///
/// Files are compared by size first and then by a BLAKE3 hash of their full
/// content. When deleting, the file with the shortest path in each group is
/// kept.
#[derive(Debug, Parser)]
#[command(name = "dupesearch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to search (defaults to the current directory)
    #[arg(short = 'p', long, value_name = "PATH")]
    pub search_path: Option<PathBuf>,

    /// Comma-separated extensions (.jpg) or groups (photo, video, audio, text, all)
    #[arg(short = 'f', long, value_name = "FORMATS")]
    pub file_formats: Option<String>,

    /// Save the duplicate groups as JSON
    #[arg(short = 's', long)]
    pub save_to_file: bool,

    /// Where to save the JSON file (default: ./duplicates.json)
    #[arg(short = 'o', long, value_name = "FILE", requires = "save_to_file")]
    pub save_path: Option<PathBuf>,

    /// Delete every duplicate except the one with the shortest path
    ///
    /// Warning: files are removed permanently.
    #[arg(short = 'd', long)]
    pub delete: bool,

    /// Prompt for the path, formats and follow-up action
    #[arg(
        short = 'i',
        long,
        conflicts_with_all = ["search_path", "file_formats", "save_to_file", "delete"]
    )]
    pub interactive: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Number of threads used for hashing
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub io_threads: Option<u16>,

    /// Read chunk size for hashing (e.g., 64KiB, 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub chunk_size: Option<u64>,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB.
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupesearch::cli::parse_size;
///
/// assert_eq!(parse_size("4096").unwrap(), 4096);
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// is zero, or has an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    let bytes = (num * multiplier as f64) as u64;
    if bytes == 0 {
        return Err("Size must be at least one byte".to_string());
    }
    Ok(bytes)
}
