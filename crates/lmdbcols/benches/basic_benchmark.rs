use lmdbcols::prelude::*;
use std::time::Instant;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Quote {
    bid: f64,
    ask: f64,
    size: u32,
    venue: u16,
    _pad: u16,
}

fn quote(i: u64) -> Quote {
    Quote {
        bid: i as f64,
        ask: i as f64 + 0.5,
        size: (i % 1000) as u32,
        venue: (i % 16) as u16,
        _pad: 0,
    }
}

fn main() {
    println!("=== lmdbcols Performance Benchmark ===\n");

    let temp_dir = tempfile::tempdir().unwrap();
    let env = Environment::open_with_config(
        EnvConfig::new(temp_dir.path().join("bench.mdb"))
            .with_map_size(1 << 30)
            .with_sync_mode(SyncMode::NoSync),
    )
    .unwrap();

    // Benchmark 1: Scalar puts, one transaction each
    println!("1. Scalar Put Performance (one txn per put)");
    let quotes = PodMap::<u64, Quote>::new("quotes");
    let start = Instant::now();
    let count = 10_000u64;
    for i in 0..count {
        let mut txn = env.write_txn().unwrap();
        quotes.put(&mut txn, &i, &quote(i)).unwrap();
        txn.commit().unwrap();
    }
    let duration = start.elapsed();
    let tps = count as f64 / duration.as_secs_f64();
    println!("   {} transactions in {:?}", count, duration);
    println!("   {:.2} tx/sec\n", tps);

    // Benchmark 2: Scalar puts, batched
    println!("2. Batched Scalar Put Performance");
    let start = Instant::now();
    let batches = 100u64;
    let batch_size = 1_000u64;
    for b in 0..batches {
        let mut txn = env.write_txn().unwrap();
        for j in 0..batch_size {
            let key = count + b * batch_size + j;
            quotes.put(&mut txn, &key, &quote(key)).unwrap();
        }
        txn.commit().unwrap();
    }
    let total = batches * batch_size;
    let duration = start.elapsed();
    println!(
        "   {} puts ({} batches of {}) in {:?}",
        total, batches, batch_size, duration
    );
    println!("   {:.2} puts/sec\n", total as f64 / duration.as_secs_f64());

    // Benchmark 3: Scalar gets
    println!("3. Scalar Get Performance");
    let start = Instant::now();
    let mut checksum = 0.0;
    {
        let txn = env.read_txn().unwrap();
        for i in 0..count {
            checksum += quotes.get(&txn, &i).unwrap().bid;
        }
    }
    let duration = start.elapsed();
    println!("   {} gets in {:?} (checksum {})", count, duration, checksum);
    println!("   {:.2} gets/sec\n", count as f64 / duration.as_secs_f64());

    // Benchmark 4: Padded array round trip
    println!("4. Padded Array Performance");
    let series = PaddedPodArrayMap::<u32, u16>::new("series");
    let values: Vec<u16> = (0..4096).map(|v| v as u16).collect();
    let arrays = 1_000u32;
    let start = Instant::now();
    {
        let mut txn = env.write_txn().unwrap();
        for k in 0..arrays {
            series.put(&mut txn, &k, &values).unwrap();
        }
        txn.commit().unwrap();
    }
    let write = start.elapsed();

    let start = Instant::now();
    let mut elements = 0usize;
    {
        let txn = env.read_txn().unwrap();
        for k in 0..arrays {
            elements += series.get(&txn, &k).unwrap().unwrapped().count();
        }
    }
    let read = start.elapsed();
    println!(
        "   {} arrays of {} elements: write {:?}, read {:?}",
        arrays,
        values.len(),
        write,
        read
    );
    println!(
        "   {:.2} elements/sec read\n",
        elements as f64 / read.as_secs_f64()
    );

    let stat = env.stat().unwrap();
    println!(
        "Store: {} collections, main db depth {}, page size {}",
        stat.entries, stat.depth, stat.page_size
    );
}
