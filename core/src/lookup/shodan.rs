//! Hostname lookup against the public Shodan host page.
//!
//! Shodan renders the hostnames of an address as text split around a bold
//! registrable domain, e.g. `www.<b>example.com</b>`. The hostname is the
//! text node right before each `<b>` joined with the bold text.

use std::net::Ipv4Addr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use scraper::{Html, Selector};
use sweepr_common::config::{DEFAULT_LOOKUP_URL, ScanConfig};
use tracing::debug;

use super::{Lookup, LookupError};

const IDLE_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("sweepr/", env!("CARGO_PKG_VERSION"));

pub struct ShodanLookup {
    client: reqwest::Client,
    base_url: String,
}

impl ShodanLookup {
    /// Builds a client sized for `cfg.workers` concurrent requests per host.
    pub fn new(cfg: &ScanConfig) -> anyhow::Result<Self> {
        Self::with_base_url(cfg, DEFAULT_LOOKUP_URL)
    }

    pub fn with_base_url(cfg: &ScanConfig, base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(cfg.timeout)
            .pool_max_idle_per_host(cfg.workers)
            .pool_idle_timeout(IDLE_TIMEOUT)
            .build()
            .context("building lookup http client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn host_url(&self, addr: Ipv4Addr) -> String {
        format!("{}/host/{addr}", self.base_url)
    }
}

#[async_trait]
impl Lookup for ShodanLookup {
    async fn lookup(&self, addr: Ipv4Addr) -> anyhow::Result<Vec<String>> {
        debug!("Fetching data for {addr}");

        let response = self
            .client
            .get(self.host_url(addr))
            .send()
            .await
            .map_err(|source| LookupError::Request { addr, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status { addr, status }.into());
        }

        let body = response
            .text()
            .await
            .map_err(|source| LookupError::Body { addr, source })?;

        let hostnames = extract_hostnames(&body);
        if hostnames.is_empty() {
            debug!("No hostnames found for {addr}");
        }
        Ok(hostnames)
    }
}

/// Pulls every `prefix<b>domain</b>` pair out of a Shodan host page.
///
/// Bold elements without a non-blank text node in front of them are skipped.
pub fn extract_hostnames(html: &str) -> Vec<String> {
    let Ok(bold) = Selector::parse("b") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&bold)
        .filter_map(|element| {
            let prev = element.prev_sibling()?;
            let prefix = prev.value().as_text()?.trim();
            if prefix.is_empty() {
                return None;
            }
            let domain: String = element.text().collect();
            let hostname = format!("{prefix}{domain}").trim().to_string();
            (!hostname.is_empty()).then_some(hostname)
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
