//! Install-path resolution
//!
//! Thunderstore packaging is inconsistent: some archives are rooted at a
//! `BepInEx/` directory, some at `plugins/`, and some dump files at the top
//! level. These rules map each archived file onto the loader's layout under
//! the game directory.

use std::path::{Path, PathBuf};

use crate::package::{LOADER_DIR, LOADER_PACKAGE_NAME};

/// Subdirectory for plugin assemblies.
pub const PLUGINS_DIR: &str = "plugins";
/// Subdirectory for preloader patchers.
pub const PATCHERS_DIR: &str = "patchers";
/// Subdirectory for plugin configuration files.
pub const CONFIG_DIR: &str = "config";

/// Packaging metadata that is never copied into the game directory.
const IGNORED_FILES: [&str; 5] = [
    "readme.md",
    "icon.png",
    "manifest.json",
    "changelog.md",
    "license",
];

/// Whether `file_name` is packaging metadata rather than mod content.
pub fn is_ignored(file_name: &str) -> bool {
    IGNORED_FILES
        .iter()
        .any(|ignored| file_name.eq_ignore_ascii_case(ignored))
}

/// Compute the absolute install path for `file`, a path relative to the
/// archive's extraction root.
///
/// The loader archive nests the real game-directory layout under a
/// `BepInExPack/` prefix, which is dropped. Everything else lands under
/// `<game_dir>/BepInEx/`; files whose first segment is not a recognized
/// subdirectory (including bare top-level files) default into `plugins/`.
pub fn install_path(game_dir: &Path, file: &Path, is_loader: bool) -> PathBuf {
    let normalized = normalize(file);

    if is_loader {
        let stripped = strip_segment(&normalized, LOADER_PACKAGE_NAME);
        return join_segments(game_dir, &stripped);
    }

    let stripped = strip_segment(&normalized, LOADER_DIR);
    let file = match stripped.split_once('/') {
        Some((first, _)) if [PLUGINS_DIR, PATCHERS_DIR, CONFIG_DIR].contains(&first) => stripped,
        _ => format!("{PLUGINS_DIR}/{stripped}"),
    };
    join_segments(&game_dir.join(LOADER_DIR), &file)
}

/// Render a relative path with forward slashes; archives built on Windows
/// ship backslash separators.
fn normalize(file: &Path) -> String {
    file.to_string_lossy().replace('\\', "/")
}

/// Drop every `{segment}/` occurrence from a normalized path.
fn strip_segment(path: &str, segment: &str) -> String {
    path.replace(&format!("{segment}/"), "")
}

fn join_segments(base: &Path, path: &str) -> PathBuf {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(base.to_path_buf(), |acc, segment| acc.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_dir() -> PathBuf {
        PathBuf::from("/game")
    }

    #[test]
    fn recognized_subdirectory_is_kept() {
        let path = install_path(&game_dir(), Path::new("plugins/Foo.dll"), false);
        assert_eq!(path, PathBuf::from("/game/BepInEx/plugins/Foo.dll"));
    }

    #[test]
    fn patchers_and_config_are_recognized() {
        let path = install_path(&game_dir(), Path::new("patchers/Patch.dll"), false);
        assert_eq!(path, PathBuf::from("/game/BepInEx/patchers/Patch.dll"));

        let path = install_path(&game_dir(), Path::new("config/foo.cfg"), false);
        assert_eq!(path, PathBuf::from("/game/BepInEx/config/foo.cfg"));
    }

    #[test]
    fn top_level_file_defaults_to_plugins() {
        let path = install_path(&game_dir(), Path::new("Foo.dll"), false);
        assert_eq!(path, PathBuf::from("/game/BepInEx/plugins/Foo.dll"));
    }

    #[test]
    fn unrecognized_subdirectory_is_nested_under_plugins() {
        let path = install_path(&game_dir(), Path::new("CoolMod/Foo.dll"), false);
        assert_eq!(path, PathBuf::from("/game/BepInEx/plugins/CoolMod/Foo.dll"));
    }

    #[test]
    fn leading_loader_directory_is_stripped() {
        let path = install_path(&game_dir(), Path::new("BepInEx/plugins/Foo.dll"), false);
        assert_eq!(path, PathBuf::from("/game/BepInEx/plugins/Foo.dll"));
    }

    #[test]
    fn backslash_separators_are_normalized() {
        let path = install_path(&game_dir(), Path::new("BepInEx\\plugins\\Foo.dll"), false);
        assert_eq!(path, PathBuf::from("/game/BepInEx/plugins/Foo.dll"));
    }

    #[test]
    fn loader_archive_installs_directly_under_game_dir() {
        let path = install_path(&game_dir(), Path::new("BepInExPack/core/x.dll"), true);
        assert_eq!(path, PathBuf::from("/game/core/x.dll"));
    }

    #[test]
    fn loader_archive_keeps_nested_layout() {
        let path = install_path(
            &game_dir(),
            Path::new("BepInExPack/BepInEx/core/BepInEx.dll"),
            true,
        );
        assert_eq!(path, PathBuf::from("/game/BepInEx/core/BepInEx.dll"));
    }

    #[test]
    fn ignore_list_is_case_insensitive() {
        assert!(is_ignored("manifest.json"));
        assert!(is_ignored("README.md"));
        assert!(is_ignored("Icon.PNG"));
        assert!(is_ignored("LICENSE"));
        assert!(is_ignored("CHANGELOG.md"));
        assert!(!is_ignored("Foo.dll"));
        assert!(!is_ignored("license.txt"));
    }
}
