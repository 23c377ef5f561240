//! The single consumer of the result queue.
//!
//! Hostnames are written in arrival order, each one at most once. The set of
//! already written hostnames lives here and nowhere else. Each line reaches
//! the writer in a single `write_all` call, so a writer that pauses terminal
//! decorations around every write never sees half a line.

use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::ScanProgress;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub emitted: u64,
    pub duplicates: u64,
}

pub struct ResultAggregator {
    results: mpsc::Receiver<String>,
    seen: HashSet<String>,
    progress: Arc<ScanProgress>,
}

impl ResultAggregator {
    pub fn new(results: mpsc::Receiver<String>, progress: Arc<ScanProgress>) -> Self {
        Self {
            results,
            seen: HashSet::new(),
            progress,
        }
    }

    /// Writes one line per new hostname until the result queue is closed and
    /// empty. Each line is flushed immediately.
    pub async fn run<W: Write>(mut self, out: &mut W) -> io::Result<AggregateReport> {
        let mut report = AggregateReport::default();

        while let Some(hostname) = self.results.recv().await {
            if self.seen.contains(&hostname) {
                report.duplicates += 1;
                continue;
            }

            // One write per line so a line is never split around other output.
            let line = format!("{hostname}\n");
            out.write_all(line.as_bytes())?;
            out.flush()?;
            self.seen.insert(hostname);

            report.emitted += 1;
            self.progress.hostname_emitted();
        }

        Ok(report)
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
