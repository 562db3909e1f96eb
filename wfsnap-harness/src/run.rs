//! Writer and snapshot threads driven against a shared snapshot object.
//!
//! Writers update the object until every reader has taken its snapshots.
//! Each operation is recorded as a line of text, tagged with its offset from
//! the start of the run, so that the lines of all threads can be merged into
//! a single log.
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use wfsnap_mem::register::AtomicRegister;
use wfsnap_mem::snapshot::{
    AtomicMrmwSnapshot, AtomicMrswSnapshot, ConfigurationError, MrmwWriter, MrswWriter, Outcome,
    ProcessId, ScanReport, Slot, SnapshotConfig, Version, View,
};

use crate::params::Params;

/// Which snapshot object to drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
    /// Any writer may update any component.
    Mrmw,
    /// Writer `i` owns component `i`.
    Mrsw,
}

/// Everything needed to perform a run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub params: Params,
    pub variant: Variant,
    /// Number of snapshot threads.
    pub readers: usize,
    /// Seed for the per-thread random number generators, or `None` to seed
    /// them from the operating system.
    pub seed: Option<u64>,
}

/// A line of the log, and when it was recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub offset: Duration,
    pub line: String,
}

/// Timing of the snapshots taken during a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub snapshots: usize,
    pub total: Duration,
    pub worst: Duration,
    /// Snapshots that ended with two identical collects.
    pub clean: usize,
    /// Snapshots that returned a view computed by a writer.
    pub borrowed: usize,
}

impl Stats {
    fn record(&mut self, elapsed: Duration, outcome: Outcome) {
        self.snapshots += 1;
        self.total += elapsed;
        self.worst = self.worst.max(elapsed);
        match outcome {
            Outcome::Clean => self.clean += 1,
            Outcome::Borrowed(_) => self.borrowed += 1,
        }
    }

    fn merge(&mut self, other: Stats) {
        self.snapshots += other.snapshots;
        self.total += other.total;
        self.worst = self.worst.max(other.worst);
        self.clean += other.clean;
        self.borrowed += other.borrowed;
    }

    /// Returns the mean time taken by a snapshot.
    pub fn average(&self) -> Duration {
        if self.snapshots == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.total.as_secs_f64() / self.snapshots as f64)
    }
}

/// The outcome of a run.
#[derive(Debug)]
pub struct Report {
    /// Every recorded event, ordered by offset.
    pub events: Vec<Event>,
    pub stats: Stats,
}

impl Report {
    /// Writes every event, in order, to `out`.
    pub fn write_log(&self, mut out: impl Write) -> io::Result<()> {
        for event in &self.events {
            writeln!(out, "{}", event.line)?;
        }
        out.flush()
    }
}

/// A write performed by a writer thread.
struct Written {
    value: u32,
    location: Option<usize>,
}

/// A claimed writer of one of the supported snapshot objects.
enum Writer<'a> {
    Mrmw(MrmwWriter<'a, u32, AtomicRegister<Version<u32>>, AtomicRegister<View<u32>>>),
    Mrsw(MrswWriter<'a, u32, AtomicRegister<Slot<u32>>>),
}

impl Writer<'_> {
    fn write(&mut self, rng: &mut SmallRng, capacity: usize) -> Written {
        let value = rng.gen();
        match self {
            Writer::Mrmw(writer) => {
                let location = rng.gen_range(0..capacity);
                writer.update(location, value);
                Written {
                    value,
                    location: Some(location),
                }
            }
            Writer::Mrsw(writer) => {
                writer.update(value);
                Written {
                    value,
                    location: None,
                }
            }
        }
    }
}

/// The snapshot object being driven.
enum Target {
    Mrmw(AtomicMrmwSnapshot<u32>),
    Mrsw(AtomicMrswSnapshot<u32>),
}

impl Target {
    fn new(variant: Variant, params: &Params) -> Result<Self, ConfigurationError> {
        let config = SnapshotConfig::new(params.capacity, params.n_threads);
        Ok(match variant {
            Variant::Mrmw => Target::Mrmw(AtomicMrmwSnapshot::new(config, 0)?),
            Variant::Mrsw => Target::Mrsw(AtomicMrswSnapshot::new(config, 0)?),
        })
    }

    fn capacity(&self) -> usize {
        match self {
            Target::Mrmw(snapshot) => snapshot.capacity(),
            Target::Mrsw(snapshot) => snapshot.capacity(),
        }
    }

    fn writer(&self, id: ProcessId) -> Result<Writer<'_>, ConfigurationError> {
        Ok(match self {
            Target::Mrmw(snapshot) => Writer::Mrmw(snapshot.writer(id)?),
            Target::Mrsw(snapshot) => Writer::Mrsw(snapshot.writer(id)?),
        })
    }

    fn scan_report(&self) -> ScanReport<u32> {
        match self {
            Target::Mrmw(snapshot) => snapshot.snapshot_report(),
            Target::Mrsw(snapshot) => snapshot.scan_report(),
        }
    }
}

/// Returns an exponentially distributed delay with the given mean, in
/// milliseconds.
fn exponential_delay(rng: &mut SmallRng, mean: f64) -> Duration {
    // Inverse transform sampling; `1 - u` lies in (0, 1].
    let u: f64 = rng.gen();
    Duration::try_from_secs_f64(-mean * (1.0 - u).ln() / 1000.0).unwrap_or(Duration::MAX)
}

fn clock() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

fn thread_rng(seed: Option<u64>, index: u64) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(index)),
        None => SmallRng::from_entropy(),
    }
}

fn write_line(id: ProcessId, write: &Written) -> String {
    match write.location {
        Some(location) => format!(
            "Thr{id}'s write of {} on location {location} at {}",
            write.value,
            clock()
        ),
        None => format!("Thr{id}'s write of {} at {}", write.value, clock()),
    }
}

fn snapshot_line(view: &[u32]) -> String {
    let components: Vec<String> = view
        .iter()
        .enumerate()
        .map(|(i, v)| format!("l{i}-{v}"))
        .collect();
    format!(
        "Snapshot Thr's snapshot: {} which finished at {}",
        components.join(" "),
        clock()
    )
}

fn run_writer(
    writer: &mut Writer<'_>,
    id: ProcessId,
    params: &Params,
    mut rng: SmallRng,
    start: Instant,
    stop: &AtomicBool,
) -> Vec<Event> {
    let mut events = Vec::new();
    while !stop.load(Ordering::Acquire) {
        let write = writer.write(&mut rng, params.capacity);
        events.push(Event {
            offset: start.elapsed(),
            line: write_line(id, &write),
        });
        thread::sleep(exponential_delay(&mut rng, params.lambda_1));
    }
    debug!(writer = id, writes = events.len(), "writer finished");
    events
}

fn run_reader(
    target: &Target,
    params: &Params,
    mut rng: SmallRng,
    start: Instant,
) -> (Vec<Event>, Stats) {
    let mut events = Vec::with_capacity(params.n_snapshots);
    let mut stats = Stats::default();
    for _ in 0..params.n_snapshots {
        let began = Instant::now();
        let report = target.scan_report();
        let elapsed = began.elapsed();
        stats.record(elapsed, report.outcome);
        events.push(Event {
            offset: start.elapsed(),
            line: snapshot_line(&report.view),
        });
        thread::sleep(exponential_delay(&mut rng, params.lambda_2));
    }
    (events, stats)
}

/// Performs a run, returning the merged log and snapshot statistics.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] if the parameters do not describe a valid
/// snapshot object for the chosen variant.
pub fn run(config: &RunConfig) -> Result<Report, ConfigurationError> {
    let params = &config.params;
    let target = Target::new(config.variant, params)?;
    let capacity = target.capacity();
    let mut writers = (0..params.n_threads)
        .map(|id| target.writer(id))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        variant = ?config.variant,
        writers = params.n_threads,
        readers = config.readers,
        capacity,
        "starting run"
    );

    let stop = AtomicBool::new(false);
    let start = Instant::now();
    let mut events = Vec::new();
    let mut stats = Stats::default();

    thread::scope(|s| {
        let writer_handles: Vec<_> = writers
            .iter_mut()
            .enumerate()
            .map(|(id, writer)| {
                let rng = thread_rng(config.seed, id as u64);
                let stop = &stop;
                s.spawn(move || run_writer(writer, id, params, rng, start, stop))
            })
            .collect();

        let reader_handles: Vec<_> = (0..config.readers)
            .map(|r| {
                let rng = thread_rng(config.seed, (params.n_threads + r) as u64);
                let target = &target;
                s.spawn(move || run_reader(target, params, rng, start))
            })
            .collect();

        for handle in reader_handles {
            let (reader_events, reader_stats) = handle
                .join()
                .unwrap_or_else(|e| std::panic::resume_unwind(e));
            events.extend(reader_events);
            stats.merge(reader_stats);
        }
        stop.store(true, Ordering::Release);
        for handle in writer_handles {
            let writer_events = handle
                .join()
                .unwrap_or_else(|e| std::panic::resume_unwind(e));
            events.extend(writer_events);
        }
    });

    events.sort_by_key(|event| event.offset);
    info!(
        events = events.len(),
        clean = stats.clean,
        borrowed = stats.borrowed,
        "run finished"
    );
    Ok(Report { events, stats })
}
