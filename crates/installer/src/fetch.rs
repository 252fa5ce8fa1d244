//! Package fetching
//!
//! Downloads package archives over HTTP and extracts them into the local
//! cache. Fetching is idempotent: a package whose extraction directory is
//! already present is never requested again.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use reqwest::Client;
use tracing::{debug, info};
use url::Url;
use zip::ZipArchive;

use crate::config::InstallerConfig;
use crate::error::{InstallerError, Result};
use crate::package::ModPackage;

/// Outcome of fetching a single package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The archive was downloaded and extracted into the cache.
    Downloaded,
    /// The extraction directory was already present; no request was made.
    AlreadyPresent,
}

/// HTTP fetcher for package archives.
pub struct Fetcher {
    client: Client,
    base_url: Url,
}

impl Fetcher {
    /// Create a fetcher from the installer configuration.
    pub fn from_config(config: &InstallerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Download `package`'s archive and extract it into `cache_dir`.
    ///
    /// A non-success HTTP status or a malformed archive is an error for this
    /// package only; callers decide whether that aborts anything else.
    pub async fn fetch(&self, package: &ModPackage, cache_dir: &Path) -> Result<FetchOutcome> {
        let extract_dir = package.extract_dir(cache_dir);
        if extract_dir.exists() {
            debug!("{package} already present at {}", extract_dir.display());
            return Ok(FetchOutcome::AlreadyPresent);
        }

        let url = package.download_url(&self.base_url)?;
        debug!("downloading {package} from {url}");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;

        // Extract into a sibling .part directory and rename into place, so a
        // killed process never leaves a half-extracted directory that would
        // satisfy the idempotence check.
        let staging = staging_dir(&extract_dir);
        let blocking_dir = staging.clone();
        tokio::task::spawn_blocking(move || extract_archive(&body, &blocking_dir)).await??;
        tokio::fs::rename(&staging, &extract_dir).await?;

        info!("downloaded {package}");
        Ok(FetchOutcome::Downloaded)
    }
}

fn staging_dir(extract_dir: &Path) -> PathBuf {
    let mut name = extract_dir.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Unpack a zip archive into `dest`, rejecting entries that escape it.
fn extract_archive(bytes: &[u8], dest: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    // Staging left over from an interrupted run is discarded.
    if dest.exists() {
        std::fs::remove_dir_all(dest)?;
    }
    std::fs::create_dir_all(dest)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(InstallerError::UnsafeArchivePath {
                path: entry.name().to_string(),
            });
        };

        let out_path = dest.join(relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = std::fs::File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out)?;
    }

    Ok(())
}
