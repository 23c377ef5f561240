pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sweepr_common::config::{DEFAULT_LOOKUP_URL, DEFAULT_WORKERS, Filters, ScanConfig};
use sweepr_common::error::ConfigError;

#[derive(Parser, Debug)]
#[command(name = "sweepr")]
#[command(version)]
#[command(about = "Find the hostnames behind every address of one or more CIDR ranges.")]
#[command(after_help = "Ranges are read from --list, then --target, then piped stdin.")]
pub struct CommandLine {
    /// CIDR to scan (example: 192.168.0.0/24)
    #[arg(short = 't', long)]
    pub target: Option<String>,

    /// File containing a list of CIDRs, one per line
    #[arg(short = 'l', long)]
    pub list: Option<PathBuf>,

    /// Number of concurrent lookups per range
    #[arg(short = 'c', long, default_value_t = DEFAULT_WORKERS)]
    pub concurrency: usize,

    /// Regex or string to filter out unwanted hostnames
    #[arg(short = 'f', long)]
    pub filter: Option<String>,

    /// Regex or string to display only hostnames matching the pattern
    #[arg(short = 'm', long = "match")]
    pub matcher: Option<String>,

    /// Per-lookup timeout in seconds
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    /// Cap on lookups in flight across all ranges at once
    #[arg(long)]
    pub max_in_flight: Option<usize>,

    /// Base URL of the lookup service
    #[arg(long, default_value = DEFAULT_LOOKUP_URL)]
    pub lookup_url: String,

    /// Show debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide the progress spinner and everything below warnings
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Compiles the filters and freezes every scan setting.
    pub fn to_config(&self) -> Result<ScanConfig, ConfigError> {
        let cfg = ScanConfig {
            workers: self.concurrency,
            timeout: Duration::from_secs(self.timeout),
            filters: Filters::new(self.filter.as_deref(), self.matcher.as_deref())?,
            max_in_flight: self.max_in_flight,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CommandLine::parse_from(["sweepr", "-t", "10.0.0.0/24"]);
        let cfg = cli.to_config().unwrap();

        assert_eq!(cli.target.as_deref(), Some("10.0.0.0/24"));
        assert_eq!(cfg.workers, DEFAULT_WORKERS);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.max_in_flight, None);
        assert_eq!(cli.lookup_url, DEFAULT_LOOKUP_URL);
    }

    #[test]
    fn short_flags() {
        let cli = CommandLine::parse_from([
            "sweepr", "-l", "ranges.txt", "-c", "5", "-f", "internal", "-m", "example", "-v",
        ]);
        let cfg = cli.to_config().unwrap();

        assert_eq!(cli.list, Some(PathBuf::from("ranges.txt")));
        assert_eq!(cfg.workers, 5);
        assert!(cli.verbose);
        assert!(!cfg.filters.allows("internal.example.com"));
        assert!(cfg.filters.allows("public.example.com"));
        assert!(!cfg.filters.allows("public.other.org"));
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let cli = CommandLine::parse_from(["sweepr", "-f", "[a-"]);
        assert!(matches!(cli.to_config(), Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let cli = CommandLine::parse_from(["sweepr", "-c", "0"]);
        assert!(matches!(cli.to_config(), Err(ConfigError::ZeroWorkers)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cli = CommandLine::parse_from(["sweepr", "-t", "10.0.0.0/24", "--timeout", "0"]);
        assert!(matches!(cli.to_config(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(CommandLine::try_parse_from(["sweepr", "-q", "-v"]).is_err());
    }
}
