//! A fixed-size **worker pool** bound to a single range.
//!
//! One producer task walks the range and feeds a bounded address queue. The
//! queue holds a single pending address, so the producer stalls as soon as
//! every worker is busy. Each worker pulls one address, runs one lookup,
//! filters the hostnames and forwards the survivors to the shared result
//! queue. The pool is drained once the producer has queued the last address
//! and every worker has returned from its last pull.

use std::net::Ipv4Addr;
use std::sync::Arc;

use sweepr_common::config::ScanConfig;
use sweepr_common::network::range::Ipv4Cidr;
use tokio::sync::{Mutex, Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use super::ScanProgress;
use crate::lookup::Lookup;

pub(crate) const ADDRESS_QUEUE_DEPTH: usize = 1;

/// Counters collected by one pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobReport {
    /// Addresses taken off the queue and looked up.
    pub addresses: u64,
    pub lookup_failures: u64,
    /// Hostnames that passed the filters and reached the result queue.
    pub forwarded: u64,
    pub filtered: u64,
}

impl JobReport {
    pub fn merge(&mut self, other: JobReport) {
        self.addresses += other.addresses;
        self.lookup_failures += other.lookup_failures;
        self.forwarded += other.forwarded;
        self.filtered += other.filtered;
    }
}

pub struct ScanWorkerPool {
    range: Ipv4Cidr,
    cfg: Arc<ScanConfig>,
    lookup: Arc<dyn Lookup>,
    limiter: Option<Arc<Semaphore>>,
    progress: Arc<ScanProgress>,
}

impl ScanWorkerPool {
    pub fn new(
        range: Ipv4Cidr,
        cfg: Arc<ScanConfig>,
        lookup: Arc<dyn Lookup>,
        limiter: Option<Arc<Semaphore>>,
        progress: Arc<ScanProgress>,
    ) -> Self {
        Self {
            range,
            cfg,
            lookup,
            limiter,
            progress,
        }
    }

    /// Runs the pool to completion, forwarding hostnames into `sink`.
    pub async fn run(self, sink: mpsc::Sender<String>) -> JobReport {
        let range = self.range;
        let (addr_tx, addr_rx) = mpsc::channel::<Ipv4Addr>(ADDRESS_QUEUE_DEPTH);
        let queue = Arc::new(Mutex::new(addr_rx));

        let queued = self.progress.clone();
        let producer = tokio::spawn(async move {
            for addr in range.iter() {
                // Every worker is gone, nobody is left to scan the rest.
                if addr_tx.send(addr).await.is_err() {
                    break;
                }
                queued.address_queued();
            }
        });

        let mut workers = JoinSet::new();
        for id in 0..self.cfg.workers {
            let worker = Worker {
                id,
                queue: queue.clone(),
                cfg: self.cfg.clone(),
                lookup: self.lookup.clone(),
                limiter: self.limiter.clone(),
                progress: self.progress.clone(),
                sink: sink.clone(),
            };
            workers.spawn(worker.run());
        }
        drop(queue);
        drop(sink);

        let mut report = JobReport::default();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(worker_report) => report.merge(worker_report),
                Err(e) => error!("Worker for {range} stopped unexpectedly: {e}"),
            }
        }

        if let Err(e) = producer.await {
            error!("Address producer for {range} stopped unexpectedly: {e}");
        }

        report
    }
}

struct Worker {
    id: usize,
    queue: Arc<Mutex<mpsc::Receiver<Ipv4Addr>>>,
    cfg: Arc<ScanConfig>,
    lookup: Arc<dyn Lookup>,
    limiter: Option<Arc<Semaphore>>,
    progress: Arc<ScanProgress>,
    sink: mpsc::Sender<String>,
}

impl Worker {
    async fn run(self) -> JobReport {
        let mut report = JobReport::default();

        loop {
            // The lock is released before the lookup starts.
            let next = self.queue.lock().await.recv().await;
            let Some(addr) = next else {
                break;
            };

            let hostnames = self.lookup_one(addr, &mut report).await;
            report.addresses += 1;
            self.progress.address_done();

            for hostname in hostnames {
                let hostname = hostname.trim();
                if hostname.is_empty() {
                    continue;
                }
                if !self.cfg.filters.allows(hostname) {
                    report.filtered += 1;
                    continue;
                }
                if self.sink.send(hostname.to_string()).await.is_err() {
                    debug!("Worker {} stopping, result queue closed", self.id);
                    return report;
                }
                report.forwarded += 1;
            }
        }

        report
    }

    /// A failed lookup counts as an empty one. The lookup runs in its own task
    /// so a panicking adapter only loses this address, not the worker.
    async fn lookup_one(&self, addr: Ipv4Addr, report: &mut JobReport) -> Vec<String> {
        let _permit = match &self.limiter {
            Some(limiter) => limiter.acquire().await.ok(),
            None => None,
        };

        let lookup = self.lookup.clone();
        let outcome = tokio::spawn(async move { lookup.lookup(addr).await }).await;

        match outcome {
            Ok(Ok(hostnames)) => hostnames,
            Ok(Err(e)) => {
                debug!("Lookup for {addr} failed: {e:#}");
                report.lookup_failures += 1;
                Vec::new()
            }
            Err(e) => {
                warn!("Lookup for {addr} aborted: {e}");
                report.lookup_failures += 1;
                Vec::new()
            }
        }
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
