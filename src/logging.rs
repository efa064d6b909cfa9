//! Logging setup on the `log` facade with an `env_logger` backend.
//!
//! Levels come from, in priority order:
//!
//! 1. `RUST_LOG` (if set)
//! 2. `--quiet` (errors only) or `-v` / `-vv` (debug / trace)
//! 3. Default: info
//!
//! The terminal UI owns stdout and stderr while it runs, so the binary points
//! the logger at a file under the data directory instead.

use crate::error::{PicPurgeError, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// `<data dir>/picpurge/picpurge.log`
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("picpurge").join("picpurge.log"))
}

/// Initialise the global logger. Logs go to `log_file` when given, stderr otherwise.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.format(move |buf, record| {
        let level = record.level();
        if verbose >= 1 {
            writeln!(
                buf,
                "{} {:<5} [{}] {}",
                buf.timestamp_seconds(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{} {:<5} {}", buf.timestamp_seconds(), level, record.args())
        }
    });

    builder
        .try_init()
        .map_err(|e| PicPurgeError::ConfigError(format!("Failed to initialise logging: {}", e)))?;

    log::debug!(
        "Logging initialised at {}",
        if use_env { "RUST_LOG" } else { current_level_name() }
    );
    Ok(())
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
