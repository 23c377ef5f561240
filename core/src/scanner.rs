//! The concurrent **scanning core**.
//!
//! A scan runs on two levels of concurrency:
//!
//! * **Outer**: the [`orchestrator`] starts one job per input range and runs
//!   them all at once, with no ceiling on the number of jobs.
//! * **Inner**: each job owns a [`pool`] of exactly `workers` tasks draining a
//!   bounded address queue, so at most `workers` lookups are in flight per job.
//!
//! Every job forwards surviving hostnames into one bounded result queue that is
//! drained by a single [`aggregator`], the only place where deduplication
//! happens.
//!
//! Total in-flight lookups are `workers * active jobs`. Callers that need a
//! hard ceiling across jobs set [`ScanConfig::max_in_flight`].

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use sweepr_common::config::ScanConfig;
use sweepr_common::error::ConfigError;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::lookup::Lookup;

pub mod aggregator;
pub mod orchestrator;
pub mod pool;

use aggregator::{AggregateReport, ResultAggregator};
use orchestrator::{JobOrchestrator, OrchestratorReport};

/// Live counters shared between the scan and whoever renders progress.
#[derive(Debug, Default)]
pub struct ScanProgress {
    active_jobs: AtomicUsize,
    queued: AtomicU64,
    addresses: AtomicU64,
    hostnames: AtomicU64,
}

impl ScanProgress {
    pub fn active_jobs(&self) -> usize {
        self.active_jobs.load(Ordering::Relaxed)
    }

    /// Addresses handed to a worker queue so far.
    pub fn queued(&self) -> u64 {
        self.queued.load(Ordering::Relaxed)
    }

    /// Addresses whose lookup has returned, successfully or not.
    pub fn addresses(&self) -> u64 {
        self.addresses.load(Ordering::Relaxed)
    }

    /// Unique hostnames written to the output so far.
    pub fn hostnames(&self) -> u64 {
        self.hostnames.load(Ordering::Relaxed)
    }

    pub(crate) fn job_started(&self) {
        self.active_jobs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn job_finished(&self) {
        self.active_jobs.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn address_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn address_done(&self) {
        self.addresses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn hostname_emitted(&self) {
        self.hostnames.fetch_add(1, Ordering::Relaxed);
    }
}

/// Totals of a finished scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub jobs: OrchestratorReport,
    pub output: AggregateReport,
}

/// Scans every range in `descriptors` and writes each unique hostname to `out`
/// as soon as it is found.
///
/// Malformed descriptors are skipped with a warning. The only hard failures are
/// configuration errors, reported before anything is scanned, and I/O errors
/// on `out`.
pub async fn perform_scan<W: Write>(
    descriptors: Vec<String>,
    cfg: Arc<ScanConfig>,
    lookup: Arc<dyn Lookup>,
    progress: Arc<ScanProgress>,
    out: &mut W,
) -> anyhow::Result<ScanReport> {
    if descriptors.is_empty() {
        return Err(ConfigError::NoInput.into());
    }
    cfg.validate()?;

    info!(
        "Scanning {} range(s) with {} workers each",
        descriptors.len(),
        cfg.workers
    );

    let (sink, results) = mpsc::channel::<String>(cfg.result_capacity());
    let orchestrator = JobOrchestrator::new(cfg, lookup, progress.clone());
    let jobs = tokio::spawn(orchestrator.run(descriptors, sink));

    let output = ResultAggregator::new(results, progress).run(out).await?;
    let jobs = jobs.await?;

    debug!("{jobs:?} {output:?}");
    Ok(ScanReport { jobs, output })
}
