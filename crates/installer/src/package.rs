//! Package descriptors and manifests
//!
//! A [`ModPackage`] identifies a Thunderstore package by publisher namespace,
//! name, and version, and derives its download URL and on-disk cache layout.
//! The cache directory is always passed in explicitly; descriptors carry no
//! path state of their own.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;
use walkdir::WalkDir;

use crate::error::{InstallerError, Result};

/// Field separator in `publisher-name-version` descriptors.
pub const SEP: char = '-';

/// Package name of the BepInEx mod loader on Thunderstore.
pub const LOADER_PACKAGE_NAME: &str = "BepInExPack";

/// Directory the mod loader occupies under the game directory.
pub const LOADER_DIR: &str = "BepInEx";

/// Identity of a downloadable package.
///
/// Two descriptors are equal iff namespace, name, and version all match;
/// duplicate mods-list entries collapse through this equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModPackage {
    pub namespace: String,
    pub name: String,
    pub version: String,
}

impl ModPackage {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse a `publisher-name-version` mods-list line.
    ///
    /// The line must split into exactly three non-empty fields; anything else
    /// is an input error.
    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(SEP).collect();
        match fields.as_slice() {
            [namespace, name, version]
                if !namespace.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(*namespace, *name, *version))
            }
            _ => Err(InstallerError::InvalidModLine {
                line: line.to_string(),
            }),
        }
    }

    /// Composite `namespace-name-version` identifier, used as the archive's
    /// directory name in the cache.
    pub fn full_name(&self) -> String {
        format!(
            "{}{SEP}{}{SEP}{}",
            self.namespace, self.name, self.version
        )
    }

    /// Canonical download URL under the repository's download endpoint.
    pub fn download_url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| InstallerError::InvalidBaseUrl(base.clone()))?
            .extend([&self.namespace, &self.name, &self.version]);
        Ok(url)
    }

    /// Directory the archive is extracted into.
    pub fn extract_dir(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(self.full_name())
    }

    /// Path of the package's `manifest.json` inside the extraction directory.
    pub fn manifest_path(&self, cache_dir: &Path) -> PathBuf {
        self.extract_dir(cache_dir).join("manifest.json")
    }

    /// Whether this package is the mod loader itself.
    pub fn is_loader(&self) -> bool {
        self.name.eq_ignore_ascii_case(LOADER_PACKAGE_NAME)
    }

    /// Whether the package has already been downloaded and extracted.
    pub fn is_fetched(&self, cache_dir: &Path) -> bool {
        self.extract_dir(cache_dir).exists()
    }

    /// Whether the extracted package appears to depend on the mod loader.
    ///
    /// Looks for a directory name containing `BepInEx` anywhere in the
    /// extracted tree, falling back to a substring match over the manifest's
    /// declared dependencies. This is a heuristic kept for compatibility with
    /// how packages are conventionally laid out, not a correctness guarantee.
    pub async fn depends_on_loader(&self, cache_dir: &Path) -> Result<bool> {
        let root = self.extract_dir(cache_dir);
        for entry in WalkDir::new(&root).min_depth(1) {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_dir()
                && entry.file_name().to_string_lossy().contains(LOADER_DIR)
            {
                return Ok(true);
            }
        }

        let manifest = PackageManifest::read(&self.manifest_path(cache_dir)).await?;
        Ok(manifest
            .dependencies
            .iter()
            .any(|dep| dep.contains(LOADER_DIR)))
    }
}

impl fmt::Display for ModPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// The subset of a package's `manifest.json` the installer consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    /// Declared dependencies as `namespace-name-version` strings.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl PackageManifest {
    /// Read and parse a manifest file.
    ///
    /// Thunderstore manifests are frequently written with a UTF-8 BOM, which
    /// is stripped before parsing.
    pub async fn read(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let json = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
        Ok(serde_json::from_str(json)?)
    }
}
