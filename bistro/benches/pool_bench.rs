use std::sync::Arc;
use std::thread;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tempfile::TempDir;

use bistro::database::{Database, DatabaseConfig};
use bistro::{ConnectionPool, PoolConfig};

const THREAD_COUNTS: &[usize] = &[1, 4, 8];

fn setup_pool(max_size: usize) -> (TempDir, ConnectionPool) {
    let temp_dir = TempDir::new().expect("failed to create temporary directory");
    let config = DatabaseConfig::new(temp_dir.path().join("bistro.db"));
    let pool = ConnectionPool::open(
        config,
        PoolConfig::default()
            .with_max_size(max_size)
            .with_acquire_timeout(Duration::from_secs(30))
            .without_reaper(),
    )
    .expect("failed to open pool");
    (temp_dir, pool)
}

fn bench_acquire_release(c: &mut Criterion) {
    let (_temp_dir, pool) = setup_pool(4);
    drop(pool.acquire().expect("warm-up acquire failed"));

    c.bench_function("acquire_release", |b| {
        b.iter(|| {
            let session = pool.acquire().expect("acquire failed");
            black_box(session.id());
        });
    });
}

fn bench_acquire_query(c: &mut Criterion) {
    let (_temp_dir, pool) = setup_pool(4);

    c.bench_function("acquire_query", |b| {
        b.iter(|| {
            let session = pool.acquire().expect("acquire failed");
            let tables = Database::list_tables(session.connection()).expect("query failed");
            black_box(tables);
        });
    });
}

fn bench_contended_acquire(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_acquire");
    group.sample_size(20);

    for &threads in THREAD_COUNTS {
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            &threads,
            |b, &threads| {
                let (_temp_dir, pool) = setup_pool(2);
                let pool = Arc::new(pool);
                b.iter(|| {
                    let handles: Vec<_> = (0..threads)
                        .map(|_| {
                            let pool = Arc::clone(&pool);
                            thread::spawn(move || {
                                for _ in 0..25 {
                                    let session = pool.acquire().expect("acquire failed");
                                    black_box(session.id());
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.join().expect("worker panicked");
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    pool_bench,
    bench_acquire_release,
    bench_acquire_query,
    bench_contended_acquire
);
criterion_main!(pool_bench);
