//! The address-to-hostnames **lookup** seam.
//!
//! The scanner only depends on the [`Lookup`] trait. Concrete adapters (such
//! as the [`shodan`] scraper) decide how hostnames are found. Whatever an
//! adapter returns as an error is folded into an empty result by the worker
//! that called it.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use thiserror::Error;

pub mod shodan;

pub use shodan::ShodanLookup;

#[async_trait]
pub trait Lookup: Send + Sync {
    /// Returns every hostname associated with `addr`, possibly none.
    ///
    /// Implementations must bound their own run time; the scanner does not
    /// wrap calls in an extra timeout.
    async fn lookup(&self, addr: Ipv4Addr) -> anyhow::Result<Vec<String>>;
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request for {addr} failed: {source}")]
    Request {
        addr: Ipv4Addr,
        #[source]
        source: reqwest::Error,
    },

    #[error("lookup for {addr} returned status {status}")]
    Status {
        addr: Ipv4Addr,
        status: reqwest::StatusCode,
    },

    #[error("failed to read response body for {addr}: {source}")]
    Body {
        addr: Ipv4Addr,
        #[source]
        source: reqwest::Error,
    },
}
