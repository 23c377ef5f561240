//! Error taxonomy shared by every crate of the workspace.
//!
//! Only [`ConfigError`] is fatal. A [`RangeError`] skips a single range and
//! lookup failures never leave the worker that hit them.

use std::path::PathBuf;

use thiserror::Error;

/// Problems detected before the first range is scanned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no input ranges: provide a CIDR with -t, a list of CIDRs with -l, or pipe them via stdin")]
    NoInput,

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("worker count must be at least 1")]
    ZeroWorkers,

    #[error("lookup timeout must be greater than zero")]
    ZeroTimeout,

    #[error("global in-flight limit must be at least 1")]
    ZeroInFlight,

    #[error("failed to read range list {}: {source}", path.display())]
    ListFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single range descriptor that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("'{input}' is not in address/prefix form")]
    MissingPrefix { input: String },

    #[error("invalid IPv4 address '{addr}'")]
    InvalidAddress { addr: String },

    #[error("invalid prefix length '{prefix}', expected 0..=32")]
    InvalidPrefix { prefix: String },
}
