//! Immutable run configuration.
//!
//! Built once at startup and handed to the scanner by `Arc`. Nothing in here
//! changes after the first job starts.

use std::time::Duration;

use regex::Regex;

use crate::error::ConfigError;

pub const DEFAULT_WORKERS: usize = 100;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_LOOKUP_URL: &str = "https://www.shodan.io";

/// The exclude/include predicates applied to every discovered hostname.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    exclude: Option<Regex>,
    include: Option<Regex>,
}

impl Filters {
    /// Compiles both patterns. Empty strings count as absent.
    pub fn new(exclude: Option<&str>, include: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            exclude: compile(exclude)?,
            include: compile(include)?,
        })
    }

    /// `true` when `hostname` should reach the output.
    pub fn allows(&self, hostname: &str) -> bool {
        if self.exclude.as_ref().is_some_and(|re| re.is_match(hostname)) {
            return false;
        }
        self.include.as_ref().is_none_or(|re| re.is_match(hostname))
    }
}

fn compile(pattern: Option<&str>) -> Result<Option<Regex>, ConfigError> {
    match pattern {
        None | Some("") => Ok(None),
        Some(p) => Regex::new(p)
            .map(Some)
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: p.to_string(),
                source,
            }),
    }
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Workers per range. Every range gets its own pool of this size.
    pub workers: usize,
    /// Per-lookup timeout handed to the lookup adapter.
    pub timeout: Duration,
    pub filters: Filters,
    /// Optional cap on lookups in flight across all ranges at once.
    ///
    /// Unset by default: total concurrency is then `workers * active ranges`.
    pub max_in_flight: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            filters: Filters::default(),
            max_in_flight: None,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.max_in_flight == Some(0) {
            return Err(ConfigError::ZeroInFlight);
        }
        Ok(())
    }

    /// Capacity of the result queue shared by all ranges.
    pub fn result_capacity(&self) -> usize {
        self.workers.saturating_mul(10).max(1)
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
