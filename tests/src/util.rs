use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::config::{Filters, ScanConfig};
use sweepr_core::lookup::Lookup;
use sweepr_core::scanner::{self, ScanProgress, ScanReport};

/// Answers from a fixed table. Unknown addresses yield no hostnames, listed
/// addresses in `failing` return an error.
#[derive(Default)]
pub struct TableLookup {
    pub answers: HashMap<Ipv4Addr, Vec<String>>,
    pub failing: HashSet<Ipv4Addr>,
    pub delay: Option<Duration>,
}

impl TableLookup {
    pub fn answer(mut self, addr: [u8; 4], hostnames: &[&str]) -> Self {
        self.answers.insert(
            Ipv4Addr::from(addr),
            hostnames.iter().map(|h| h.to_string()).collect(),
        );
        self
    }

    pub fn fail(mut self, addr: [u8; 4]) -> Self {
        self.failing.insert(Ipv4Addr::from(addr));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Lookup for TableLookup {
    async fn lookup(&self, addr: Ipv4Addr) -> anyhow::Result<Vec<String>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&addr) {
            anyhow::bail!("lookup for {addr} timed out");
        }
        Ok(self.answers.get(&addr).cloned().unwrap_or_default())
    }
}

pub fn config(workers: usize) -> ScanConfig {
    ScanConfig {
        workers,
        ..ScanConfig::default()
    }
}

pub fn with_filters(workers: usize, exclude: Option<&str>, include: Option<&str>) -> ScanConfig {
    ScanConfig {
        workers,
        filters: Filters::new(exclude, include).unwrap(),
        ..ScanConfig::default()
    }
}

/// Runs a whole scan and returns the output lines with the report.
pub async fn run_scan(
    ranges: &[&str],
    cfg: ScanConfig,
    lookup: impl Lookup + 'static,
) -> anyhow::Result<(Vec<String>, ScanReport)> {
    let mut out: Vec<u8> = Vec::new();
    let report = scanner::perform_scan(
        ranges.iter().map(|r| r.to_string()).collect(),
        Arc::new(cfg),
        Arc::new(lookup),
        Arc::new(ScanProgress::default()),
        &mut out,
    )
    .await?;

    let lines = String::from_utf8(out)?.lines().map(str::to_string).collect();
    Ok((lines, report))
}
