//! dupesearch - find and remove duplicate files
//!
//! Files are bucketed by size, candidates are hashed with BLAKE3, and files
//! with identical content are reported as groups. The engine
//! ([`duplicates::DuplicateFinder`]) exposes its progress through atomics so
//! a terminal display can poll it while the scan runs on another thread.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod formats;
pub mod interactive;
pub mod logging;
pub mod monitor;
pub mod output;
pub mod progress;
pub mod scanner;

use std::collections::HashSet;
use std::env;
use std::io;
use std::path::Path;
use std::thread;

use anyhow::{anyhow, Context};
use bytesize::ByteSize;
use yansi::Paint;

use crate::cli::Cli;
use crate::config::{CliOverrides, Config};
use crate::duplicates::{DuplicateFinder, DuplicateGroup};
use crate::error::ExitCode;
use crate::formats::parse_file_formats;
use crate::interactive::{NextAction, Prompter, DEFAULT_SAVE_NAME};
use crate::monitor::Monitor;
use crate::output::JsonOutput;

/// Run the command line application.
///
/// Returns the exit code for a completed run. Input and configuration
/// problems are returned as errors; use [`ExitCode::from_error`] to
/// classify them.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the search path
/// or format filter is invalid, the scan cannot start, a prompt cannot be
/// answered, or the results cannot be saved.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }

    let overrides = CliOverrides {
        io_threads: cli.io_threads.map(usize::from),
        chunk_size: cli
            .chunk_size
            .map(|size| usize::try_from(size).unwrap_or(usize::MAX)),
        save_path: cli.save_path.clone(),
    };
    let config =
        Config::load(cli.config.as_deref(), &overrides).context("Failed to load configuration")?;
    log::debug!("Effective configuration: {config:?}");

    let cwd = env::current_dir().context("Failed to read the current directory")?;

    if cli.interactive {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        let search_path = prompter.search_path(&cwd)?;
        let formats = prompter.file_formats()?;

        let finder = scan(&search_path, formats, &config, cli.quiet)?;
        if finder.duplicates().is_empty() {
            return Ok(ExitCode::Success);
        }

        return match prompter.next_action()? {
            NextAction::Delete => delete(&finder, &config, cli.quiet),
            NextAction::Save => {
                let path = prompter.save_path(&cwd)?;
                save(&finder, &path, cli.quiet)?;
                Ok(ExitCode::Success)
            }
            NextAction::Exit => Ok(ExitCode::Success),
        };
    }

    let search_path = cli.search_path.clone().unwrap_or_else(|| cwd.clone());
    let formats = parse_file_formats(cli.file_formats.as_deref().unwrap_or(""))
        .context("Invalid --file-formats value")?;

    let finder = scan(&search_path, formats, &config, cli.quiet)?;
    if finder.duplicates().is_empty() {
        return Ok(ExitCode::Success);
    }

    if !cli.save_to_file && !cli.delete && !cli.quiet {
        print_groups(finder.duplicates());
    }

    if cli.save_to_file {
        let path = config
            .save_path
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_SAVE_NAME));
        save(&finder, &path, cli.quiet)?;
    }

    if cli.delete {
        return delete(&finder, &config, cli.quiet);
    }
    Ok(ExitCode::Success)
}

/// Build a finder and run its scan while the monitor draws progress.
fn scan(
    search_path: &Path,
    formats: Option<HashSet<String>>,
    config: &Config,
    quiet: bool,
) -> anyhow::Result<DuplicateFinder> {
    let finder = DuplicateFinder::new(search_path, formats)
        .with_context(|| format!("Cannot search {}", search_path.display()))?
        .with_config(config.finder_config());

    if !quiet {
        println!(
            "Searching for duplicate files at path: {}",
            finder.search_path().display().bold()
        );
    }

    let monitor = Monitor::new(config.refresh_interval(), quiet);
    thread::scope(|s| {
        let worker = s.spawn(|| finder.find_duplicates());
        monitor.watch_scan(finder.progress(), || worker.is_finished());
        worker
            .join()
            // Only reachable with panic = "unwind"; release builds abort
            .map_err(|_| anyhow!("The scan worker panicked"))?
            .context("Scan failed")
    })?;

    for err in finder.scan_errors() {
        log::warn!("Skipped {}: {}", err.path().display(), err);
    }

    if !quiet {
        let count = finder.duplicates().len();
        if count == 0 {
            println!("{}", "No duplicates found!".green());
        } else {
            println!(
                "{}",
                format!("{count} duplicate group{} found!", if count == 1 { "" } else { "s" })
                    .yellow()
                    .bold()
            );
        }

        if let Some(summary) = finder.summary() {
            println!(
                "Scanned {} files ({}) in {:.2?}; {} reclaimable ({:.1}%)",
                summary.total_files,
                summary.total_size_display(),
                summary.scan_duration,
                summary.reclaimable_display(),
                summary.wasted_percentage()
            );
            if !finder.scan_errors().is_empty() {
                println!(
                    "{}",
                    format!(
                        "{} file(s) could not be read and were skipped",
                        finder.scan_errors().len()
                    )
                    .yellow()
                );
            }
        }
    }

    Ok(finder)
}

/// Remove every duplicate while the monitor draws progress.
fn delete(finder: &DuplicateFinder, config: &Config, quiet: bool) -> anyhow::Result<ExitCode> {
    let total: usize = finder
        .duplicates()
        .iter()
        .map(DuplicateGroup::duplicate_count)
        .sum();

    let monitor = Monitor::new(config.refresh_interval(), quiet);
    let report = thread::scope(|s| {
        let worker = s.spawn(|| finder.delete_duplicates());
        monitor.watch_delete(finder.progress(), total, || worker.is_finished());
        worker
            .join()
            // Only reachable with panic = "unwind"; release builds abort
            .map_err(|_| anyhow!("The delete worker panicked"))?
            .context("Delete failed")
    })?;

    for (path, err) in &report.failures {
        log::warn!("Could not delete {}: {}", path.display(), err);
    }

    if !quiet {
        if report.all_succeeded() {
            println!("{}", "Duplicates have been deleted!".green());
        }
        println!("{}", report.summary());
    }

    if report.all_failed() {
        Ok(ExitCode::DeleteFailed)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Write the groups as JSON to `path`.
fn save(finder: &DuplicateFinder, path: &Path, quiet: bool) -> anyhow::Result<()> {
    JsonOutput::new(finder.duplicates())
        .save_to_file(path)
        .with_context(|| format!("Failed to save results to {}", path.display()))?;
    if !quiet {
        println!("Output saved to file: {}", path.display().bold());
    }
    Ok(())
}

fn print_groups(groups: &[DuplicateGroup]) {
    for (index, group) in groups.iter().enumerate() {
        println!(
            "\n{} {} x {}",
            format!("Group {}:", index + 1).cyan().bold(),
            group.len(),
            ByteSize::b(group.size)
        );
        for path in &group.paths {
            if group.keep_candidate() == Some(path.as_path()) {
                println!("  {} {}", "keep".green(), path.display());
            } else {
                println!("  {} {}", "dupe".red(), path.display());
            }
        }
    }
}
