use std::io;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use colored::*;
use sweepr_common::config::ScanConfig;
use sweepr_core::lookup::Lookup;
use sweepr_core::scanner::{self, ScanProgress, ScanReport};
use tracing::{info, warn};

use crate::terminal::spinner;

pub async fn scan(
    ranges: Vec<String>,
    cfg: Arc<ScanConfig>,
    lookup: Arc<dyn Lookup>,
) -> anyhow::Result<()> {
    let progress = Arc::new(ScanProgress::default());
    let running = Arc::new(AtomicBool::new(true));
    let spinner_handle = spinner::start_scan_spinner(progress.clone(), running.clone());

    let start_time = Instant::now();
    let mut stdout = spinner::SuspendedWriter::new(io::stdout());
    let result = scanner::perform_scan(ranges, cfg, lookup, progress, &mut stdout).await;

    if !spinner::stop_scan_spinner(&running, spinner_handle) {
        warn!("Progress spinner stopped unexpectedly");
    }

    let report = result?;
    print_summary(&report, start_time.elapsed());
    Ok(())
}

fn print_summary(report: &ScanReport, total_time: Duration) {
    if report.jobs.skipped > 0 {
        warn!("{} range(s) could not be parsed and were skipped", report.jobs.skipped);
    }

    let totals = &report.jobs.totals;
    if totals.lookup_failures > 0 {
        info!("{} lookups failed and were treated as empty", totals.lookup_failures);
    }

    let hostnames: ColoredString = format!("{} unique hostnames", report.output.emitted).bold().green();
    let addresses: ColoredString = format!("{} addresses", totals.addresses).bold();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    info!("Scan complete: {hostnames} from {addresses} in {total_time}");
}
