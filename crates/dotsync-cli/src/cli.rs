use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Dotfile Synchronization Tool
///
/// Publish tracked dotfiles from a repository into the home directory and pull local edits back
#[derive(Parser, Debug)]
#[command(name = "dotsync")]
#[command(long_about = None, version)]
pub struct Cli {
    /// Increase log verbosity (-d for debug, -dd for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Preview changes without executing (dry-run)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Repository root holding the manifest (default: current directory)
    #[arg(long, global = true, value_name = "PATH", env = "DOTSYNC_REPOSITORY")]
    pub repository: Option<PathBuf>,

    /// Home directory root (default: the user's home directory)
    #[arg(long, global = true, value_name = "PATH", env = "DOTSYNC_HOME")]
    pub home: Option<PathBuf>,

    /// Use specific config file
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish repository entries into the home directory
    Push {
        /// Overwrite destinations that are newer than the repository copy
        #[arg(short, long, conflicts_with = "skip_existing")]
        force: bool,

        /// Leave destinations that are newer than the repository copy untouched
        #[arg(short, long)]
        skip_existing: bool,
    },

    /// Capture home directory entries back into the repository
    Pull {
        /// Overwrite repository files that are newer than the home copy
        #[arg(short, long)]
        force: bool,
    },

    /// Show the state of every manifest entry without making changes
    Status {
        /// Inspect in the pull direction instead of push
        #[arg(long)]
        pull: bool,
    },

    /// Display detailed differences for entries that differ
    Diff {
        /// Diff in the pull direction instead of push
        #[arg(long)]
        pull: bool,
    },

    /// Show the resolved configuration
    Config,
}
