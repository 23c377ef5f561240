//! Starts one worker pool per range and waits for all of them.
//!
//! Every pool runs concurrently with every other one. The orchestrator owns the
//! last handle to the result queue, so the queue closes exactly when the final
//! pool has drained.

use std::sync::Arc;

use sweepr_common::config::ScanConfig;
use sweepr_common::network::range::Ipv4Cidr;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use super::ScanProgress;
use super::pool::{JobReport, ScanWorkerPool};
use crate::lookup::Lookup;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrchestratorReport {
    /// Ranges that were scanned to completion.
    pub completed: usize,
    /// Descriptors that failed to parse.
    pub skipped: usize,
    pub totals: JobReport,
}

pub struct JobOrchestrator {
    cfg: Arc<ScanConfig>,
    lookup: Arc<dyn Lookup>,
    limiter: Option<Arc<Semaphore>>,
    progress: Arc<ScanProgress>,
}

impl JobOrchestrator {
    pub fn new(cfg: Arc<ScanConfig>, lookup: Arc<dyn Lookup>, progress: Arc<ScanProgress>) -> Self {
        let limiter = cfg.max_in_flight.map(|n| Arc::new(Semaphore::new(n)));
        Self {
            cfg,
            lookup,
            limiter,
            progress,
        }
    }

    /// Scans every parsable descriptor and closes `sink` once all jobs are done.
    pub async fn run(self, descriptors: Vec<String>, sink: mpsc::Sender<String>) -> OrchestratorReport {
        let mut report = OrchestratorReport::default();
        let mut jobs = JoinSet::new();

        for descriptor in descriptors {
            let range: Ipv4Cidr = match descriptor.parse() {
                Ok(range) => range,
                Err(e) => {
                    warn!("Skipping range '{}': {e}", descriptor.trim());
                    report.skipped += 1;
                    continue;
                }
            };

            info!("Queued {range} ({} addresses)", range.len());
            let pool = ScanWorkerPool::new(
                range,
                self.cfg.clone(),
                self.lookup.clone(),
                self.limiter.clone(),
                self.progress.clone(),
            );
            let progress = self.progress.clone();
            let job_sink = sink.clone();

            progress.job_started();
            jobs.spawn(async move {
                let job = pool.run(job_sink).await;
                progress.job_finished();
                (range, job)
            });
        }
        drop(sink);

        while let Some(joined) = jobs.join_next().await {
            match joined {
                Ok((range, job)) => {
                    info!(
                        "Finished {range}: {} addresses, {} failed lookups, {} hostnames",
                        job.addresses, job.lookup_failures, job.forwarded
                    );
                    report.completed += 1;
                    report.totals.merge(job);
                }
                Err(e) => error!("Scan job stopped unexpectedly: {e}"),
            }
        }

        report
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
