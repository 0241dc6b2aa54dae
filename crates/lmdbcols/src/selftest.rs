//! Library self test
//!
//! Exercises padding, both padded collection shapes and view construction
//! against a scratch store file, reporting progress to a [`LogSink`].

use anyhow::{bail, ensure, Context, Result};
use std::path::Path;

use crate::{emit, AlignedView, EightPadded, Environment, LogSink, PaddedPodArrayMap, PaddedPodMap};

/// Collection used for the scalar checks.
pub const SCALAR_COLLECTION: &str = "mdb_p_p";
/// Collection used for the array checks.
pub const ARRAY_COLLECTION: &str = "mdb_p_parr";

/// Run the self test against a new store file at `path`.
///
/// Refuses to touch an existing file.
pub fn run(path: &Path, sink: &dyn LogSink) -> Result<()> {
    if path.exists() {
        bail!("file exists at {}", path.display());
    }

    check_padding()?;
    emit!(sink, "Padding check passed");

    let env = Environment::open(path)
        .with_context(|| format!("failed to create store at {}", path.display()))?;

    check_scalar(&env, sink)?;
    check_array(&env, sink)?;
    check_missing(&env, sink)?;

    emit!(sink, "lmdbcols self test completed successfully");
    Ok(())
}

fn check_padding() -> Result<()> {
    let buf = EightPadded::encode(&b'c');
    let bytes = buf.as_bytes();
    ensure!(bytes.len() == 8, "padded byte is {} bytes", bytes.len());
    ensure!(bytes[0] == b'c', "padded value not at offset zero");
    ensure!(bytes[1..].iter().all(|&b| b == 0), "padding is not zeroed");
    Ok(())
}

fn check_scalar(env: &Environment, sink: &dyn LogSink) -> Result<()> {
    let map = PaddedPodMap::<i32, u8>::new(SCALAR_COLLECTION);

    let mut txn = env.write_txn()?;
    map.put(&mut txn, &123, &b'a')?;
    txn.commit()?;

    let txn = env.read_txn()?;
    let value = map.get(&txn, &123)?;
    ensure!(*value == b'a', "scalar get returned {:?}", *value as char);
    emit!(sink, "Did DB get, same came back");
    Ok(())
}

fn check_array(env: &Environment, sink: &dyn LogSink) -> Result<()> {
    let map = PaddedPodArrayMap::<i32, u8>::new(ARRAY_COLLECTION);

    let mut txn = env.write_txn()?;
    map.put(&mut txn, &22, b"abc")?;
    txn.commit()?;
    emit!(sink, "Did array db put");

    {
        let txn = env.read_txn()?;
        let view = map.get(&txn, &22)?;
        ensure!(view.size() == 3, "array get returned {} elements", view.size());
        ensure!(*view[1] == b'b', "array element 1 is {:?}", *view[1] as char);
        emit!(sink, "Did array fetch from DB, and was what we expected");
    }

    let txn = env.read_txn()?;
    let first = map.get(&txn, &22)?;
    // SAFETY: both pointers come from `first`, which borrows the live
    // transaction's mapped memory.
    let second = unsafe { AlignedView::from_ptr_range(first.begin(), first.end()) }?;
    ensure!(first.size() == second.size(), "view sizes differ");
    ensure!(first.begin() == second.begin(), "view starts differ");
    ensure!(first.end() == second.end(), "view ends differ");
    Ok(())
}

fn check_missing(env: &Environment, sink: &dyn LogSink) -> Result<()> {
    let map = PaddedPodMap::<i32, u8>::new(SCALAR_COLLECTION);

    let txn = env.read_txn()?;
    match map.get(&txn, &999) {
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e).context("unexpected error for a missing key"),
        Ok(value) => bail!("missing key returned {:?}", *value as char),
    }
    ensure!(!map.exists(&txn, &999)?, "exists() true for a missing key");
    emit!(sink, "Missing key reported as not found");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySink;
    use tempfile::TempDir;

    #[test]
    fn test_self_test_passes() {
        let temp_dir = TempDir::new().unwrap();
        let sink = MemorySink::new();
        run(&temp_dir.path().join("selftest.mdb"), &sink).unwrap();

        assert!(sink.contains("Did DB get"));
        assert!(sink.contains("Did array fetch"));
        assert_eq!(
            sink.messages().last().map(String::as_str),
            Some("lmdbcols self test completed successfully")
        );
    }

    #[test]
    fn test_self_test_refuses_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("taken.mdb");
        std::fs::write(&path, b"not a store").unwrap();

        let sink = MemorySink::new();
        let err = run(&path, &sink).unwrap_err();
        assert!(err.to_string().contains("file exists"));
        assert!(sink.messages().is_empty());
    }
}
