//! Download/install orchestration
//!
//! Installs the mod loader first when the game directory lacks it, then fans
//! the remaining packages out over a bounded worker pool. Tasks share no
//! mutable state; per-package tallies are folded into a report after the
//! pool drains.

use std::fmt;
use std::path::Path;

use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::config::InstallerConfig;
use crate::error::{InstallerError, Result};
use crate::fetch::{FetchOutcome, Fetcher};
use crate::install::{InstallOutcome, install};
use crate::modlist::ModList;
use crate::package::{LOADER_DIR, LOADER_PACKAGE_NAME, ModPackage};

/// Aggregate counts for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub total: usize,
    pub downloaded: usize,
    pub installed: usize,
    pub errors: usize,
}

impl InstallReport {
    fn record(&mut self, tally: PackageTally) {
        self.total += 1;
        self.downloaded += usize::from(tally.downloaded);
        self.installed += usize::from(tally.installed);
        self.errors += usize::from(tally.errored);
    }
}

impl fmt::Display for InstallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Downloaded {}/{}. Installed {}/{}. Errors: {}",
            self.downloaded, self.total, self.installed, self.total, self.errors
        )
    }
}

/// Per-package outcome tuple collected by the worker pool.
#[derive(Debug, Clone, Copy, Default)]
struct PackageTally {
    downloaded: bool,
    installed: bool,
    errored: bool,
}

/// Whether the mod loader is already installed under `game_dir`.
pub fn is_loader_installed(game_dir: &Path) -> bool {
    game_dir.join(LOADER_DIR).exists()
}

/// Run the whole download/install sequence described by `modlist`.
///
/// Fatal conditions (the loader is absent with no entry to install it, or
/// its installation fails) surface as errors; per-package download and
/// install failures are logged, counted, and never abort the batch.
pub async fn run(
    config: &InstallerConfig,
    fetcher: &Fetcher,
    modlist: &ModList,
) -> Result<InstallReport> {
    let mut report = InstallReport::default();

    if !is_loader_installed(&config.game_dir) {
        let Some(loader) = &modlist.loader else {
            warn!("{LOADER_PACKAGE_NAME} is not installed; add it to the mods list or install it manually");
            warn!("see https://thunderstore.io/package/bbepis/{LOADER_PACKAGE_NAME}");
            return Err(InstallerError::LoaderNotInstalled);
        };
        // Everything after this point assumes the loader's directory layout
        // exists, so a loader failure aborts the run.
        match install_loader(config, fetcher, loader).await {
            Ok(tally) => report.record(tally),
            Err(source) => {
                return Err(InstallerError::LoaderInstall {
                    package: loader.to_string(),
                    source: Box::new(source),
                });
            }
        }
    } else if let Some(loader) = &modlist.loader {
        info!("skipping {loader} (already installed)");
    }

    let tallies: Vec<PackageTally> = stream::iter(modlist.mods.iter())
        .map(|package| fetch_and_install(config, fetcher, package))
        .buffer_unordered(config.max_concurrent)
        .collect()
        .await;
    for tally in tallies {
        report.record(tally);
    }

    info!("{report}");
    Ok(report)
}

/// Fetch and install the loader synchronously, before the pool starts.
async fn install_loader(
    config: &InstallerConfig,
    fetcher: &Fetcher,
    loader: &ModPackage,
) -> Result<PackageTally> {
    let fetched = fetcher.fetch(loader, &config.cache_dir).await?;
    let outcome = install(loader, &config.cache_dir, &config.game_dir).await?;
    Ok(PackageTally {
        downloaded: fetched == FetchOutcome::Downloaded,
        installed: outcome == InstallOutcome::Installed,
        errored: false,
    })
}

/// One worker-pool task: fetch a package, then install it.
///
/// Failures are contained here so a bad package never poisons its siblings.
async fn fetch_and_install(
    config: &InstallerConfig,
    fetcher: &Fetcher,
    package: &ModPackage,
) -> PackageTally {
    let fetched = match fetcher.fetch(package, &config.cache_dir).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("failed to download {package}: {e}");
            return PackageTally {
                errored: true,
                ..PackageTally::default()
            };
        }
    };

    match install(package, &config.cache_dir, &config.game_dir).await {
        Ok(outcome) => PackageTally {
            downloaded: fetched == FetchOutcome::Downloaded,
            installed: outcome == InstallOutcome::Installed,
            errored: false,
        },
        Err(e) => {
            error!("failed to install {package}: {e}");
            PackageTally {
                downloaded: fetched == FetchOutcome::Downloaded,
                installed: false,
                errored: true,
            }
        }
    }
}
