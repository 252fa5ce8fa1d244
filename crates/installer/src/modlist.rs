//! Mods list parsing
//!
//! Reads the line-delimited `publisher-name-version` mods file and splits the
//! mod-loader entry off from the regular packages.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{InstallerError, Result};
use crate::package::ModPackage;

/// The parsed mods request set: regular packages plus an optional loader
/// entry.
#[derive(Debug, Clone, Default)]
pub struct ModList {
    pub mods: HashSet<ModPackage>,
    pub loader: Option<ModPackage>,
}

impl ModList {
    /// Parse mods-list text, one descriptor per line.
    ///
    /// Lines are right-trimmed and skipped when empty; duplicates collapse.
    /// More than one loader entry is a fatal input error.
    pub fn parse(input: &str) -> Result<Self> {
        let mut mods = HashSet::new();
        for line in input.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            mods.insert(ModPackage::parse(line)?);
        }

        let loaders: Vec<ModPackage> = mods.iter().filter(|m| m.is_loader()).cloned().collect();
        if loaders.len() > 1 {
            let mut entries: Vec<String> = loaders.iter().map(ToString::to_string).collect();
            entries.sort();
            return Err(InstallerError::MultipleLoaderEntries {
                entries: entries.join(", "),
            });
        }

        let loader = loaders.into_iter().next();
        if let Some(loader) = &loader {
            mods.remove(loader);
        }
        Ok(Self { mods, loader })
    }

    /// Read and parse a mods file.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await?;
        Self::parse(&contents)
    }
}
