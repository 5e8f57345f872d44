/*!
 * Scan Benchmarks
 *
 * Full-pool scans at different occupancies, with and without a concurrent writer
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use stmt_monitor::{ExecutionSample, PoolConfig, ScanStep, Scanner, StmtPool};

fn full_scan(pool: &StmtPool) -> usize {
    let mut scanner = Scanner::new(pool);
    let mut rows = 0;
    while let ScanStep::Row { row, .. } = scanner.next() {
        rows += row.is_valid() as usize;
    }
    rows
}

fn bench_scan_occupancy(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_occupancy");

    for percent in [0usize, 10, 50, 100] {
        let pool = StmtPool::new(PoolConfig::default()).unwrap();
        let claimed = pool.size() * percent / 100;
        let _handles: Vec<_> = (0..claimed)
            .map(|i| pool.claim(format!("SELECT {i}").as_bytes()).unwrap())
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(percent), &pool, |b, pool| {
            b.iter(|| black_box(full_scan(pool)));
        });
    }

    group.finish();
}

fn bench_scan_with_writer(c: &mut Criterion) {
    let pool = Arc::new(StmtPool::new(PoolConfig::default().with_capacity(64)).unwrap());
    let running = Arc::new(AtomicBool::new(true));

    let writer = {
        let pool = pool.clone();
        let running = running.clone();
        thread::spawn(move || {
            let mut handle = pool.claim(b"SELECT 1").unwrap();
            while running.load(Ordering::Relaxed) {
                handle.record_execute(&ExecutionSample::new(100));
            }
        })
    };

    c.bench_function("scan_contended_64", |b| {
        b.iter(|| black_box(full_scan(&pool)));
    });

    running.store(false, Ordering::Relaxed);
    writer.join().unwrap();
}

criterion_group!(benches, bench_scan_occupancy, bench_scan_with_writer);
criterion_main!(benches);
