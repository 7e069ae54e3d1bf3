use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tracing::debug;

use crate::tuple_space::{SpaceSnapshot, TupleSpace};

/// The kinds of requests the server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Read,
    Get,
    Put,
}

/// Process wide counters, shared by every connection.
///
/// Counters only ever grow. Each one is updated independently of the tuple
/// space lock.
#[derive(Debug, Default)]
pub struct Statistics {
    clients: AtomicU64,
    operations: AtomicU64,
    reads: AtomicU64,
    gets: AtomicU64,
    puts: AtomicU64,
    errors: AtomicU64,
}

/// A copy of every counter in [`Statistics`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    pub clients: u64,
    pub operations: u64,
    pub reads: u64,
    pub gets: u64,
    pub puts: u64,
    pub errors: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    pub fn record_client(&self) {
        self.clients.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one processed request. `kind` is `None` for unrecognized commands.
    pub fn record_operation(&self, kind: Option<OperationKind>) {
        self.operations.fetch_add(1, Ordering::Relaxed);

        let counter = match kind {
            Some(OperationKind::Read) => &self.reads,
            Some(OperationKind::Get) => &self.gets,
            Some(OperationKind::Put) => &self.puts,
            None => return,
        };

        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            clients: self.clients.load(Ordering::Relaxed),
            operations: self.operations.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
            gets: self.gets.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// One rendered statistics report.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsReport {
    pub space: SpaceSnapshot,
    pub counters: StatisticsSnapshot,
}

impl StatisticsReport {
    pub async fn collect(space: &TupleSpace, statistics: &Statistics) -> Self {
        StatisticsReport {
            space: space.snapshot().await,
            counters: statistics.snapshot(),
        }
    }
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- TupleSpace Statistics ---")?;
        writeln!(
            f,
            "Tuples: {}, Avg size: {:.1}, Avg key: {:.1}, Avg val: {:.1}",
            self.space.tuple_count,
            self.space.average_tuple_size(),
            self.space.average_key_size(),
            self.space.average_value_size()
        )?;
        write!(
            f,
            "Clients: {}, Operations: {} (READ:{} GET:{} PUT:{}), Errors: {}",
            self.counters.clients,
            self.counters.operations,
            self.counters.reads,
            self.counters.gets,
            self.counters.puts,
            self.counters.errors
        )
    }
}

/// Prints a statistics report to stdout every `interval`, forever.
///
/// The first report is printed after one full interval has elapsed.
pub async fn run_reporter(
    space: Arc<TupleSpace>,
    statistics: Arc<Statistics>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);

    loop {
        ticker.tick().await;

        let report = StatisticsReport::collect(&space, &statistics).await;
        debug!(tuples = report.space.tuple_count, "printing statistics report");

        println!("{}\n", report);
    }
}
