// CLI module for argument parsing and configuration

use crate::config::UserConfig;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// PicPurge - swipe through your photos and clear out the ones you don't want
///
/// Swipe right to mark a photo for deletion, left to keep it. Marked photos
/// wait in the trash until you confirm.
#[derive(Parser, Debug, Clone)]
#[command(name = "picpurge")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Photo folder to review
    ///
    /// If not specified, defaults to the current directory.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Dry run mode - nothing is moved to the system trash
    ///
    /// Marks are kept in memory only and confirmed deletions are just logged.
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Photos kept ready ahead of the one on screen
    #[arg(long = "queue-size")]
    pub queue_size: Option<usize>,

    /// Assets fetched per page while walking the folder
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,

    /// Storage file holding the pending trash (default: data dir)
    #[arg(long = "store")]
    pub store: Option<PathBuf>,

    /// Versions document consulted by the update check
    #[arg(long = "versions-file")]
    pub versions_file: Option<PathBuf>,

    /// Print the pending trash as JSON and exit
    #[arg(long = "list-trash", action = ArgAction::SetTrue)]
    pub list_trash: bool,

    /// Show the welcome dialog even if it was seen before
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub welcome: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if !self.list_trash {
            if !self.directory.exists() {
                return Err(format!(
                    "Directory does not exist: {}",
                    self.directory.display()
                ));
            }

            if !self.directory.is_dir() {
                return Err(format!(
                    "Path is not a directory: {}",
                    self.directory.display()
                ));
            }
        }

        if self.queue_size == Some(0) {
            return Err("queue-size must be at least 1".to_string());
        }

        if self.page_size == Some(0) {
            return Err("page-size must be at least 1".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments layered over the user config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub directory: PathBuf,
    pub dry_run: bool,
    pub queue_size: usize,
    pub page_size: usize,
    pub store: Option<PathBuf>,
    pub versions_file: Option<PathBuf>,
    pub list_trash: bool,
    pub show_welcome: bool,
    pub verbose: u8,
    pub quiet: bool,
}

impl AppConfig {
    /// Command-line flags win over the saved preferences
    pub fn from_args(args: Args, user: &UserConfig) -> Self {
        AppConfig {
            directory: args.directory,
            dry_run: args.dry_run,
            queue_size: args.queue_size.unwrap_or(user.queue_size),
            page_size: args.page_size.unwrap_or(user.page_size),
            store: args.store,
            versions_file: args.versions_file.or_else(|| user.versions_file.clone()),
            list_trash: args.list_trash,
            show_welcome: args.welcome || !user.welcome_shown,
            verbose: args.verbose,
            quiet: args.quiet,
        }
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig::from_args(args, &UserConfig::default())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::from_args(
            Args {
                directory: PathBuf::from("."),
                dry_run: false,
                queue_size: None,
                page_size: None,
                store: None,
                versions_file: None,
                list_trash: false,
                welcome: false,
                verbose: 0,
                quiet: false,
            },
            &UserConfig::default(),
        )
    }
}
