//! Command-line front end for the mod installer
//!
//! Thin shell over `modstorm-installer`: argument parsing, log setup, the
//! temporary-directory lifetime for the download cache, and exit codes.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use tempfile::TempDir;
use tracing::error;
use tracing_subscriber::EnvFilter;

use modstorm_installer::{Fetcher, InstallerConfig, ModList};

/// Thunderstore BepInEx mod downloader and installer.
#[derive(Debug, Parser)]
#[command(name = "modstorm", version, about)]
struct Args {
    /// Directory of the game to install mods for.
    game_dir: PathBuf,

    /// File to read mods from (publisher-name-version per line).
    #[arg(short = 'f', long, default_value = "mods.txt")]
    mods_file: PathBuf,

    /// Keep downloaded packages in this directory instead of a temporary one.
    #[arg(short = 'o', long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    if !args.game_dir.is_dir() {
        bail!("game directory '{}' does not exist", args.game_dir.display());
    }
    if let Some(out_dir) = &args.out_dir
        && !out_dir.is_dir()
    {
        bail!("out directory '{}' does not exist", out_dir.display());
    }

    let modlist = ModList::from_file(&args.mods_file)
        .await
        .with_context(|| format!("failed to read mods from '{}'", args.mods_file.display()))?;

    // Without --out-dir the cache lives in a temporary directory that is
    // deleted when this guard drops at the end of the run.
    let (cache_dir, _temp_dir) = match args.out_dir {
        Some(dir) => (dir, None),
        None => {
            let temp = TempDir::new().context("failed to create temporary download directory")?;
            (temp.path().to_path_buf(), Some(temp))
        }
    };

    let config = InstallerConfig::new(args.game_dir, cache_dir);
    let fetcher = Fetcher::from_config(&config)?;
    modstorm_installer::run(&config, &fetcher, &modlist).await?;
    Ok(())
}
