//! File installation
//!
//! Copies extracted package files into the game directory, never overwriting
//! anything already installed there.

use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::Result;
use crate::package::{LOADER_DIR, ModPackage};
use crate::resolve::{install_path, is_ignored};

/// Outcome of installing a single package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// At least one file was newly copied into the game directory.
    Installed,
    /// Every file was already present; nothing was copied.
    AlreadyInstalled,
    /// The package does not appear to depend on the mod loader and was left
    /// untouched.
    SkippedNoLoaderDep,
}

/// Install `package`'s extracted files under `game_dir`.
///
/// Enumerates every regular file in the extraction directory, drops
/// packaging metadata, resolves each install path, and copies only files
/// whose destination does not already exist.
pub async fn install(
    package: &ModPackage,
    cache_dir: &Path,
    game_dir: &Path,
) -> Result<InstallOutcome> {
    if !package.is_loader() && !package.depends_on_loader(cache_dir).await? {
        warn!("unable to install {package}: it doesn't depend on {LOADER_DIR}");
        return Ok(InstallOutcome::SkippedNoLoaderDep);
    }

    let extract_dir = package.extract_dir(cache_dir);
    let mut installed = false;
    for entry in WalkDir::new(&extract_dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if is_ignored(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&extract_dir) else {
            continue;
        };

        let destination = install_path(game_dir, relative, package.is_loader());
        if destination.exists() {
            continue;
        }
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(entry.path(), &destination).await?;
        installed = true;
    }

    if installed {
        info!("installed {package}");
        Ok(InstallOutcome::Installed)
    } else {
        info!("skipping {package} (already installed)");
        Ok(InstallOutcome::AlreadyInstalled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::{TempDir, tempdir};

    /// Lay out a fake extracted package in a fresh cache directory.
    async fn stage_package(package: &ModPackage, files: &[(&str, &str)]) -> TempDir {
        let cache_dir = tempdir().unwrap();
        let root = package.extract_dir(cache_dir.path());
        for (name, contents) in files {
            let path = root.join(name);
            tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
            tokio::fs::write(&path, contents).await.unwrap();
        }
        cache_dir
    }

    fn loader_manifest() -> (&'static str, &'static str) {
        ("manifest.json", "{\"dependencies\": [\"bbepis-BepInExPack-5.4.2100\"]}")
    }

    #[tokio::test]
    async fn installs_into_loader_layout() {
        let package = ModPackage::new("author", "CoolMod", "1.0.0");
        let cache_dir = stage_package(
            &package,
            &[
                ("plugins/Foo.dll", "assembly"),
                ("Bare.dll", "assembly"),
                loader_manifest(),
            ],
        )
        .await;
        let game_dir = tempdir().unwrap();

        let outcome = install(&package, cache_dir.path(), game_dir.path())
            .await
            .unwrap();
        assert_eq!(outcome, InstallOutcome::Installed);

        let loader_dir = game_dir.path().join("BepInEx");
        assert!(loader_dir.join("plugins/Foo.dll").exists());
        assert!(loader_dir.join("plugins/Bare.dll").exists());
    }

    #[tokio::test]
    async fn reinstall_copies_nothing() {
        let package = ModPackage::new("author", "CoolMod", "1.0.0");
        let cache_dir = stage_package(
            &package,
            &[("plugins/Foo.dll", "assembly"), loader_manifest()],
        )
        .await;
        let game_dir = tempdir().unwrap();

        let first = install(&package, cache_dir.path(), game_dir.path())
            .await
            .unwrap();
        assert_eq!(first, InstallOutcome::Installed);

        let second = install(&package, cache_dir.path(), game_dir.path())
            .await
            .unwrap();
        assert_eq!(second, InstallOutcome::AlreadyInstalled);
    }

    #[tokio::test]
    async fn existing_files_are_never_overwritten() {
        let package = ModPackage::new("author", "CoolMod", "1.0.0");
        let cache_dir = stage_package(
            &package,
            &[("config/settings.cfg", "fresh"), loader_manifest()],
        )
        .await;
        let game_dir = tempdir().unwrap();
        let existing = game_dir.path().join("BepInEx/config/settings.cfg");
        tokio::fs::create_dir_all(existing.parent().unwrap()).await.unwrap();
        tokio::fs::write(&existing, "user-edited").await.unwrap();

        let outcome = install(&package, cache_dir.path(), game_dir.path())
            .await
            .unwrap();
        assert_eq!(outcome, InstallOutcome::AlreadyInstalled);
        let contents = tokio::fs::read_to_string(&existing).await.unwrap();
        assert_eq!(contents, "user-edited");
    }

    #[tokio::test]
    async fn metadata_files_are_not_installed() {
        let package = ModPackage::new("author", "CoolMod", "1.0.0");
        let cache_dir = stage_package(
            &package,
            &[
                ("plugins/Foo.dll", "assembly"),
                ("README.md", "docs"),
                ("icon.png", "png"),
                ("CHANGELOG.md", "log"),
                ("LICENSE", "mit"),
                loader_manifest(),
            ],
        )
        .await;
        let game_dir = tempdir().unwrap();

        install(&package, cache_dir.path(), game_dir.path())
            .await
            .unwrap();

        let plugins = game_dir.path().join("BepInEx/plugins");
        assert!(plugins.join("Foo.dll").exists());
        for name in ["README.md", "icon.png", "CHANGELOG.md", "LICENSE", "manifest.json"] {
            assert!(!plugins.join(name).exists(), "{name} should not be installed");
        }
    }

    #[tokio::test]
    async fn packages_without_loader_dependency_are_skipped() {
        let package = ModPackage::new("author", "Standalone", "1.0.0");
        let cache_dir = stage_package(
            &package,
            &[
                ("plugins/Foo.dll", "assembly"),
                ("manifest.json", "{\"dependencies\": []}"),
            ],
        )
        .await;
        let game_dir = tempdir().unwrap();

        let outcome = install(&package, cache_dir.path(), game_dir.path())
            .await
            .unwrap();
        assert_eq!(outcome, InstallOutcome::SkippedNoLoaderDep);
        assert!(!game_dir.path().join("BepInEx").exists());
    }

    #[tokio::test]
    async fn loader_package_installs_at_game_root() {
        let package = ModPackage::new("bbepis", "BepInExPack", "5.4.2100");
        let cache_dir = stage_package(
            &package,
            &[
                ("BepInExPack/winhttp.dll", "shim"),
                ("BepInExPack/BepInEx/core/BepInEx.dll", "core"),
                ("manifest.json", "{\"dependencies\": []}"),
            ],
        )
        .await;
        let game_dir = tempdir().unwrap();

        let outcome = install(&package, cache_dir.path(), game_dir.path())
            .await
            .unwrap();
        assert_eq!(outcome, InstallOutcome::Installed);
        assert!(game_dir.path().join("winhttp.dll").exists());
        assert!(game_dir.path().join("BepInEx/core/BepInEx.dll").exists());
        assert!(!game_dir.path().join("BepInExPack").exists());
    }
}
