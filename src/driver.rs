use std::io::Write;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::config::LoadConfig;
use crate::core::BatchStats;
use crate::core::EventStore;
use crate::inspector::inspect;
use crate::producer::produce_batch;

pub const SEPARATOR_WIDTH: usize = 30;

/// Repeats produce-then-inspect against one store until cancelled.
#[derive(Debug)]
pub struct Driver<S> {
    store: S,
    config: LoadConfig,
}

#[derive(Debug)]
pub enum DriverError<E> {
    InvalidConfig(&'static str),
    Store(E),
    Output(std::io::Error),
}

impl<E: std::fmt::Display> std::fmt::Display for DriverError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(error) => write!(f, "invalid load config: {error}"),
            Self::Store(error) => write!(f, "store operation failed: {error}"),
            Self::Output(error) => write!(f, "failed to write report: {error}"),
        }
    }
}

impl<E> std::error::Error for DriverError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(_) => None,
            Self::Store(error) => Some(error),
            Self::Output(error) => Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationStats {
    pub batch: BatchStats,
    pub matched_keys: usize,
}

impl<S> Driver<S>
where
    S: EventStore,
{
    pub fn new(store: S, config: LoadConfig) -> Self { Self { store, config } }

    pub fn store(&self) -> &S { &self.store }

    /// Runs iterations until `cancellation` fires or `max_iterations` is reached.
    /// Cancellation is only observed between iterations. Returns the number of
    /// completed iterations.
    pub async fn run<W>(&self, out: &mut W, cancellation: CancellationToken) -> Result<u64, DriverError<S::Error>>
    where
        W: Write,
    {
        self.config.validate().map_err(DriverError::InvalidConfig)?;

        let mut completed = 0_u64;
        loop {
            if cancellation.is_cancelled() {
                tracing::info!(iterations = completed, "cancelled, stopping");
                return Ok(completed);
            }
            if self.config.max_iterations > 0 && completed >= self.config.max_iterations {
                tracing::info!(iterations = completed, "iteration limit reached, stopping");
                return Ok(completed);
            }

            let started = Instant::now();
            let stats = self.run_iteration(out).await?;
            completed += 1;

            tracing::info!(
                iteration = completed,
                events = stats.batch.events_written,
                events_per_sec = stats.batch.events_per_sec().round() as u64,
                queue_len = stats.batch.queue_len,
                matched_keys = stats.matched_keys,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "iteration complete"
            );
        }
    }

    /// One producer batch, one inspection pass, and the separator.
    pub async fn run_iteration<W>(&self, out: &mut W) -> Result<IterationStats, DriverError<S::Error>>
    where
        W: Write,
    {
        let batch = produce_batch(&self.store, &self.config).await.map_err(DriverError::Store)?;
        let reports = inspect(&self.store, &self.config.inspect_pattern).await.map_err(DriverError::Store)?;

        for report in &reports {
            for line in report.lines() {
                writeln!(out, "{line}").map_err(DriverError::Output)?;
            }
        }
        write!(out, "\n{}\n\n", "-".repeat(SEPARATOR_WIDTH)).map_err(DriverError::Output)?;
        out.flush().map_err(DriverError::Output)?;

        Ok(IterationStats { batch, matched_keys: reports.len() })
    }
}
