//! Logging setup for dupesearch.
//!
//! The library only talks to the `log` facade; the binary installs an
//! `env_logger` backend once at startup. The effective level is chosen in
//! this order:
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. `--quiet` (errors only)
//! 3. `-v` (debug) or `-vv` (trace)
//! 4. info
//!
//! Debug builds prefix each line with a timestamp, and with the module
//! path once `-v` is given. Release builds print the level and message.
//!
//! # Example
//!
//! ```rust,no_run
//! use dupesearch::logging::init_logging;
//!
//! init_logging(1, false).expect("logger already installed");
//! log::debug!("visible with -v");
//! ```

use env_logger::Builder;
use log::{LevelFilter, SetLoggerError};
use std::env;
use std::io::Write;

/// Install the global logger for the given CLI flags.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by `RUST_LOG`)
///
/// # Errors
///
/// Returns an error if a logger has already been installed in this process.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<(), SetLoggerError> {
    let mut builder = Builder::new();

    let from_env = env::var_os("RUST_LOG").is_some();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder, verbose);
    builder.try_init()?;

    if from_env {
        log::debug!("Log filter taken from RUST_LOG");
    } else {
        log::debug!("Log level: {}", determine_level(verbose, quiet));
    }
    Ok(())
}

/// Map CLI flags to a level filter. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let timestamp = buf.timestamp_seconds();
            let level = record.level();
            let style = buf.default_level_style(level);

            if verbose >= 1 {
                writeln!(
                    buf,
                    "{timestamp} {style}{level:<5}{style:#} [{}] {}",
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            } else {
                writeln!(buf, "{timestamp} {style}{level:<5}{style:#} {}", record.args())
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let style = buf.default_level_style(level);
            writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
        });
    }
}
