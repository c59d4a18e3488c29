use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn get_version() -> &'static str {
    const BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

    if let Some(tag) = option_env!("OCTOBER_GIT_TAG") {
        return tag;
    }

    let commit = option_env!("OCTOBER_GIT_COMMIT").unwrap_or("unknown");
    let branch = option_env!("OCTOBER_GIT_BRANCH").unwrap_or("unknown");

    // Leaked once at startup; clap wants a 'static str
    let version = format!("v{}-{} ({})", BASE_VERSION, commit, branch);
    Box::leak(version.into_boxed_str())
}

#[derive(Parser)]
#[command(name = "october")]
#[command(about = "Bootstrap a new October CMS project")]
#[command(version = get_version(), propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new October CMS project
    Init {
        /// Name of the working directory
        #[arg(default_value = ".")]
        directory: PathBuf,
    },

    /// Download and install October CMS into the working directory
    Install {
        /// Reinstall even if October is already present
        #[arg(long)]
        force: bool,

        /// Directory to install into (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Show the current version
    Version,
}
