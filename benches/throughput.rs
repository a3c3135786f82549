//! Throughput Benchmark for kvmock
//!
//! Measures the emulator's command surface under various workloads.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use kvmock::{CommandHandler, Engine, RangeOptions, Registry, ScanOptions};
use std::sync::Arc;
use std::time::Duration;

fn create_engine() -> Engine {
    Engine::new(Arc::new(Registry::new()))
}

/// Benchmark SET operations
fn bench_set(c: &mut Criterion) {
    let mut engine = create_engine();

    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_small", |b| {
        let mut i = 0u64;
        b.iter(|| {
            engine.set(&format!("key:{}", i), "small_value");
            i += 1;
        });
    });

    group.bench_function("set_medium", |b| {
        let mut i = 0u64;
        let value = "x".repeat(1024);
        b.iter(|| {
            engine.set(&format!("key:{}", i), &value);
            i += 1;
        });
    });

    group.bench_function("set_integer", |b| {
        let mut i = 0u64;
        b.iter(|| {
            engine.set(&format!("key:{}", i), i as i64);
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark GET operations
fn bench_get(c: &mut Criterion) {
    let mut engine = create_engine();

    for i in 0..100_000 {
        engine.set(&format!("key:{}", i), format!("value:{}", i));
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            black_box(engine.get(&format!("key:{}", i % 100_000)));
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            black_box(engine.get(&format!("missing:{}", i)));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark INCR operations
fn bench_incr(c: &mut Criterion) {
    let mut engine = create_engine();

    let mut group = c.benchmark_group("incr");
    group.throughput(Throughput::Elements(1));

    group.bench_function("single_counter", |b| {
        b.iter(|| {
            black_box(engine.incr("counter"));
        });
    });

    group.bench_function("multiple_counters", |b| {
        let mut i = 0u64;
        b.iter(|| {
            black_box(engine.incr(&format!("counter:{}", i % 1000)));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark list push and range reads
fn bench_lists(c: &mut Criterion) {
    let mut engine = create_engine();

    let mut group = c.benchmark_group("lists");
    group.throughput(Throughput::Elements(1));

    group.bench_function("rpush", |b| {
        let mut i = 0u64;
        b.iter(|| {
            engine.rpush(&format!("queue:{}", i % 100), &["job"]);
            i += 1;
        });
    });

    engine.flushdb();
    let items: Vec<String> = (0..1_000).map(|i| format!("item:{}", i)).collect();
    engine.rpush("long", &items);

    group.bench_function("lrange_100", |b| {
        b.iter(|| {
            black_box(engine.lrange("long", 100, 199));
        });
    });

    group.finish();
}

/// Benchmark sorted-set inserts and range queries
fn bench_sorted_sets(c: &mut Criterion) {
    let mut engine = create_engine();

    let mut group = c.benchmark_group("sorted_sets");
    group.throughput(Throughput::Elements(1));

    group.bench_function("zadd", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let member = format!("player:{}", i % 10_000);
            black_box(engine.zadd("board", (i % 997) as f64, &member).unwrap());
            i += 1;
        });
    });

    let with_scores = RangeOptions::default().with_scores();
    let page = RangeOptions::default().limit(50, 10);

    group.bench_function("zrange_top_10", |b| {
        b.iter(|| {
            black_box(engine.zrevrange("board", 0, 9, true));
        });
    });

    group.bench_function("zrangebyscore_window", |b| {
        b.iter(|| {
            black_box(
                engine
                    .zrangebyscore("board", "100", "(200", &with_scores)
                    .unwrap(),
            );
        });
    });

    group.bench_function("zrangebyscore_limit", |b| {
        b.iter(|| {
            black_box(
                engine
                    .zrangebyscore("board", "-inf", "+inf", &page)
                    .unwrap(),
            );
        });
    });

    group.finish();
}

/// Benchmark expiry operations
fn bench_expiry(c: &mut Criterion) {
    let mut engine = create_engine();

    let mut group = c.benchmark_group("expiry");
    group.throughput(Throughput::Elements(1));

    group.bench_function("setex", |b| {
        let mut i = 0u64;
        b.iter(|| {
            engine.setex(&format!("key:{}", i), 3600, "value");
            i += 1;
        });
    });

    for i in 0..10_000 {
        engine.set(&format!("expire:{}", i), "value");
    }

    group.bench_function("expire_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            engine.expire(&format!("expire:{}", i % 10_000), 3600);
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark KEYS and SCAN pattern matching
fn bench_keys(c: &mut Criterion) {
    let mut engine = create_engine();

    for i in 0..1_000 {
        engine.set(&format!("user:{}", i), "user_data");
        engine.set(&format!("session:{}", i), "session_data");
        engine.set(&format!("cache:{}", i), "cache_data");
    }

    let mut group = c.benchmark_group("keys");

    group.bench_function("keys_pattern", |b| {
        b.iter(|| {
            black_box(engine.keys("user:*"));
        });
    });

    group.bench_function("keys_all", |b| {
        b.iter(|| {
            black_box(engine.keys("*"));
        });
    });

    let options = ScanOptions::default().matching("session:*").with_count(100);
    group.bench_function("scan_full_pass", |b| {
        b.iter(|| {
            let mut cursor = 0u64;
            loop {
                let reply = engine.scan(cursor, &options);
                cursor = reply
                    .as_array()
                    .and_then(|parts| parts.first())
                    .and_then(|c| c.as_str())
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(0);
                black_box(reply);
                if cursor == 0 {
                    break;
                }
            }
        });
    });

    group.finish();
}

/// Benchmark the textual front end
fn bench_handler(c: &mut Criterion) {
    let mut handler = CommandHandler::new(create_engine());

    let mut group = c.benchmark_group("handler");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_get_line", |b| {
        b.iter(|| {
            black_box(handler.execute_line("SET greeting \"hello world\"").unwrap());
            black_box(handler.execute_line("GET greeting").unwrap());
        });
    });

    group.bench_function("multi_exec", |b| {
        b.iter(|| {
            handler.execute_line("MULTI").unwrap();
            handler.execute_line("INCR hits").unwrap();
            handler.execute_line("RPUSH log hit").unwrap();
            black_box(handler.execute_line("EXEC").unwrap());
        });
    });

    group.finish();
}

/// Benchmark concurrent handles sharing one registry
fn bench_concurrent(c: &mut Criterion) {
    use std::thread;

    let mut group = c.benchmark_group("concurrent");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("4_threads_mixed", |b| {
        b.iter(|| {
            let registry = Arc::new(Registry::new());
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let registry = Arc::clone(&registry);
                    thread::spawn(move || {
                        let mut engine = Engine::new(registry);
                        for i in 0..10_000 {
                            let key = format!("key:{}:{}", t, i);
                            engine.set(&key, "value");
                            engine.get(&key);
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }

            black_box(Engine::new(registry).dbsize());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set,
    bench_get,
    bench_incr,
    bench_lists,
    bench_sorted_sets,
    bench_expiry,
    bench_keys,
    bench_handler,
    bench_concurrent,
);

criterion_main!(benches);
