//! Status command implementation

use anyhow::{bail, Context, Result};
use lmdbcols::{EnvConfig, EnvStat, Environment};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct StatusReport<'a> {
    /// Settings the store was opened with, not values read from the file.
    open_settings: &'a EnvConfig,
    file_size: u64,
    stat: EnvStat,
    collections: Vec<String>,
}

pub fn execute(db_path: PathBuf, json: bool) -> Result<()> {
    tracing::info!("Checking store status: {}", db_path.display());

    if !db_path.is_file() {
        bail!("No store file at {}", db_path.display());
    }

    let env = Environment::open(&db_path).context("Failed to open store")?;
    let stat = env.stat().context("Failed to read store statistics")?;
    let file_size = std::fs::metadata(&db_path)
        .with_context(|| format!("Failed to stat {}", db_path.display()))?
        .len();
    let collections = env.collection_names();

    if json {
        let report = StatusReport {
            open_settings: env.config(),
            file_size,
            stat,
            collections,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let config = env.config();
    println!("\nStore Status");
    println!("{}", "=".repeat(60));
    println!("Path: {}", db_path.display());
    println!("File Size: {} bytes", file_size);

    println!("\nOpened With (defaults, not read from the file):");
    println!("  Map Size Limit: {} bytes", config.rounded_map_size());
    println!("  Max Collections: {}", config.max_collections);
    println!("  Max Readers: {}", config.max_readers);
    println!("  Sync Mode: {:?}", config.sync_mode);

    println!("\nMain Database:");
    println!("  Page Size: {}", stat.page_size);
    println!("  Depth: {}", stat.depth);
    println!("  Branch Pages: {}", stat.branch_pages);
    println!("  Leaf Pages: {}", stat.leaf_pages);
    println!("  Overflow Pages: {}", stat.overflow_pages);
    println!("  Named Collections: {}", stat.entries);

    println!("\nCollections:");
    for name in &collections {
        println!("  {}", name);
    }

    Ok(())
}
