//! Example demonstrating a single-package fetch and install
//!
//! Downloads the BepInEx pack from Thunderstore into a temporary cache and
//! installs it into a temporary "game" directory.
//!
//! Run this example with:
//! ```
//! cargo run --example install_single_mod
//! ```

use modstorm_installer::{Fetcher, InstallerConfig, ModPackage, install};
use tempfile::tempdir;

#[tokio::main]
async fn main() -> modstorm_installer::Result<()> {
    tracing_subscriber::fmt::init();

    let game_dir = tempdir()?;
    let cache_dir = tempdir()?;
    println!("game directory: {}", game_dir.path().display());

    let config = InstallerConfig::new(game_dir.path(), cache_dir.path());
    let fetcher = Fetcher::from_config(&config)?;

    let package = ModPackage::parse("bbepis-BepInExPack-5.4.2100")?;
    let fetched = fetcher.fetch(&package, &config.cache_dir).await?;
    println!("fetch outcome: {fetched:?}");

    let outcome = install(&package, &config.cache_dir, &config.game_dir).await?;
    println!("install outcome: {outcome:?}");

    Ok(())
}
