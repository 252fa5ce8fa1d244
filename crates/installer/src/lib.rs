//! Mod download and installation library
//!
//! Downloads Thunderstore packages and installs their files into a BepInEx
//! directory layout under a game directory. The interesting parts are the
//! install-path resolution rules in [`resolve`] (Thunderstore archives are
//! packaged inconsistently) and the idempotent concurrent orchestration in
//! [`orchestrate`]; everything else is direct I/O.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use modstorm_installer::{Fetcher, InstallerConfig, ModList};
//!
//! # async fn example() -> modstorm_installer::Result<()> {
//! let modlist = ModList::parse("bbepis-BepInExPack-5.4.2100\nauthor-CoolMod-1.0.0\n")?;
//! let config = InstallerConfig::new("/path/to/game", "/path/to/cache");
//! let fetcher = Fetcher::from_config(&config)?;
//!
//! let report = modstorm_installer::run(&config, &fetcher, &modlist).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod install;
pub mod modlist;
pub mod orchestrate;
pub mod package;
pub mod resolve;

// Re-export commonly used types for convenience
pub use config::InstallerConfig;
pub use error::{InstallerError, Result};
pub use fetch::{FetchOutcome, Fetcher};
pub use install::{InstallOutcome, install};
pub use modlist::ModList;
pub use orchestrate::{InstallReport, is_loader_installed, run};
pub use package::{LOADER_DIR, LOADER_PACKAGE_NAME, ModPackage, PackageManifest};
