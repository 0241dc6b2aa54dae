//! Selftest command implementation

use anyhow::{Context, Result};
use lmdbcols::{selftest, TracingSink};
use std::path::PathBuf;

pub fn execute(db_path: PathBuf, keep: bool) -> Result<()> {
    tracing::info!("Running self test against {}", db_path.display());

    // Only remove a file this run created.
    let preexisting = db_path.exists();
    let result = selftest::run(&db_path, &TracingSink);

    if !keep && !preexisting && db_path.exists() {
        std::fs::remove_file(&db_path)
            .with_context(|| format!("Failed to remove {}", db_path.display()))?;
        let lock = lock_path(&db_path);
        if lock.exists() {
            std::fs::remove_file(&lock)
                .with_context(|| format!("Failed to remove {}", lock.display()))?;
        }
    }

    result?;
    println!("\n✓ Self test passed");
    Ok(())
}

/// LMDB keeps its reader table next to a bare store file.
fn lock_path(db_path: &std::path::Path) -> PathBuf {
    let mut name = db_path.as_os_str().to_owned();
    name.push("-lock");
    PathBuf::from(name)
}
