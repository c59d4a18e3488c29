mod cli;
mod config;
mod download;
mod error;
mod init;
mod install;
mod templates;
mod types;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use console::style;
use download::HttpTransport;
use init::ProjectInitializer;
use install::ReleaseInstaller;
use std::env;
use std::path::PathBuf;
use types::InitOutcome;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(&cli) {
        eprintln!("Failed to set up logging: {}", e);
    }

    if let Err(e) = run(cli).await {
        tracing::debug!("Command failed: {:?}", e);
        eprintln!("{}", style(format!("{:#}", e)).red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let out = Output { quiet: cli.quiet };

    match cli.command {
        Commands::Version => {
            println!(
                "october {} (October CMS {})",
                env!("CARGO_PKG_VERSION"),
                types::PINNED_VERSION
            );
        }

        Commands::Init { directory } => {
            let dir = env::current_dir()?.join(directory);

            out.info("Creating project directory...");
            init::create_working_directory(&dir)?;

            out.info("Updating template files...");
            let initializer = ProjectInitializer::with_bundled_templates()?;

            out.info("Creating default october.yaml...");
            match initializer.init(&dir)? {
                InitOutcome::AlreadyExists(target) => {
                    out.comment(&format!("october.yaml already exists: {}", target.display()));
                }
                InitOutcome::Created(_) => {
                    out.comment("Done! Now edit your october.yaml and run october install.");
                }
            }
        }

        Commands::Install { force, dir } => {
            let dir = resolve_install_dir(dir)?;
            let settings = config::load_settings()?;
            let version = settings.release.version.clone();

            let transport = HttpTransport::new(!cli.quiet)?;
            let installer = ReleaseInstaller::new(transport, settings.release);

            out.info(&format!("Downloading October CMS {}...", version));
            let report = installer.install(&dir, force).await?;

            tracing::info!("Merged {} into {}", report.extracted_folder, report.directory.display());
            for warning in &report.warnings {
                eprintln!("{}", style(warning).yellow());
            }

            let done = format!(
                "October CMS {} installed in {}",
                report.version,
                report.directory.display()
            );
            if report.is_clean() {
                out.info(&done);
            } else {
                out.comment(&format!("{} (with warnings)", done));
            }
        }
    }

    Ok(())
}

fn resolve_install_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = env::current_dir()?;
    Ok(match dir {
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

struct Output {
    quiet: bool,
}

impl Output {
    fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    fn comment(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).yellow());
        }
    }
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "warn"
    } else if cli.verbose == 1 {
        "info"
    } else {
        "debug"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
