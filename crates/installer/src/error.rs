//! Error types for the installer

use thiserror::Error;
use url::Url;

/// Errors raised while parsing the mods list, fetching package archives, or
/// installing their files.
#[derive(Error, Debug)]
pub enum InstallerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid zip archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("invalid mod line '{line}': expected publisher-name-version")]
    InvalidModLine { line: String },

    #[error("multiple BepInExPack entries in mods list: [{entries}]")]
    MultipleLoaderEntries { entries: String },

    #[error("archive entry '{path}' escapes the extraction directory")]
    UnsafeArchivePath { path: String },

    #[error("repository URL '{0}' cannot hold path segments")]
    InvalidBaseUrl(Url),

    #[error("BepInEx is not installed and the mods list has no BepInExPack entry")]
    LoaderNotInstalled,

    #[error("failed to install {package}: {source}")]
    LoaderInstall {
        package: String,
        #[source]
        source: Box<InstallerError>,
    },
}

pub type Result<T> = std::result::Result<T, InstallerError>;
