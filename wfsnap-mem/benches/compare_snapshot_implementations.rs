use std::marker::{Send, Sync};
use std::sync::Arc;
use std::thread;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use wfsnap_mem::snapshot::{
    AtomicMrmwSnapshot, AtomicMrswSnapshot, MutexMrmwSnapshot, MutexMrswSnapshot, MutexSnapshot,
    Snapshot, SnapshotConfig,
};

const MIN_NUM_THREADS: usize = 2;
const MAX_NUM_THREADS: usize = 5;
const NUM_OPERATIONS: u8 = 100;

/// A snapshot that each benchmark thread can write to with its own ID.
trait Workload: Snapshot<Value = u8> + Send + Sync + 'static {
    fn create(num_threads: usize) -> Self;

    fn run(&self, i: usize);
}

impl Workload for MutexSnapshot<u8> {
    fn create(num_threads: usize) -> Self {
        MutexSnapshot::new(num_threads, 0).unwrap()
    }

    fn run(&self, i: usize) {
        for j in 0..NUM_OPERATIONS {
            self.update(i, j);
            self.scan();
        }
    }
}

macro_rules! impl_mrmw_workload {
    ($snapshot:ty) => {
        impl Workload for $snapshot {
            fn create(num_threads: usize) -> Self {
                <$snapshot>::new(SnapshotConfig::new(num_threads, num_threads), 0).unwrap()
            }

            fn run(&self, i: usize) {
                let mut writer = self.writer(i).unwrap();
                for j in 0..NUM_OPERATIONS {
                    writer.update(j as usize % self.capacity(), j);
                    self.snapshot();
                }
            }
        }
    };
}

macro_rules! impl_mrsw_workload {
    ($snapshot:ty) => {
        impl Workload for $snapshot {
            fn create(num_threads: usize) -> Self {
                <$snapshot>::new(SnapshotConfig::single_writer(num_threads), 0).unwrap()
            }

            fn run(&self, i: usize) {
                let mut writer = self.writer(i).unwrap();
                for j in 0..NUM_OPERATIONS {
                    writer.update(j);
                    <$snapshot>::scan(self);
                }
            }
        }
    };
}

impl_mrmw_workload!(AtomicMrmwSnapshot<u8>);
impl_mrmw_workload!(MutexMrmwSnapshot<u8>);
impl_mrsw_workload!(AtomicMrswSnapshot<u8>);
impl_mrsw_workload!(MutexMrswSnapshot<u8>);

fn do_updates_and_scans<S: Workload>(snapshot: &Arc<S>, num_threads: usize) {
    let mut handles = Vec::new();

    for i in 0..num_threads {
        let snapshot = snapshot.clone();
        handles.push(thread::spawn(move || snapshot.run(i)));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

fn bench_implementation<S: Workload>(c: &mut Criterion, name: &str) {
    let mut group = c.benchmark_group("Snapshots");
    for n in MIN_NUM_THREADS..MAX_NUM_THREADS + 1 {
        let snapshot: Arc<S> = Arc::new(S::create(n));
        group.bench_with_input(BenchmarkId::new(name, n), &n, |b, n| {
            b.iter(|| do_updates_and_scans(&snapshot, *n))
        });
    }
    group.finish();
}

fn criterion_benchmark(c: &mut Criterion) {
    bench_implementation::<MutexSnapshot<u8>>(c, "Mutex");
    bench_implementation::<AtomicMrmwSnapshot<u8>>(c, "MRMW/Atomic");
    bench_implementation::<MutexMrmwSnapshot<u8>>(c, "MRMW/Mutex");
    bench_implementation::<AtomicMrswSnapshot<u8>>(c, "MRSW/Atomic");
    bench_implementation::<MutexMrswSnapshot<u8>>(c, "MRSW/Mutex");
}

criterion_group! {
    all_snapshot_implementations,
    criterion_benchmark,
}
criterion_main! {
    all_snapshot_implementations
}
