//! Where the list of ranges comes from.
//!
//! `--list` wins over `--target`, which wins over piped stdin. Blank lines and
//! `#` comments are dropped; everything else is handed to the scanner as-is,
//! so malformed lines surface later as skipped ranges.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use sweepr_common::error::ConfigError;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    List(PathBuf),
    Target(String),
    Stdin,
}

/// Picks the highest-priority source that is present.
pub fn select_source(
    list: Option<PathBuf>,
    target: Option<String>,
    stdin_piped: bool,
) -> Result<InputSource, ConfigError> {
    match (list, target) {
        (Some(path), _) => Ok(InputSource::List(path)),
        (None, Some(target)) => Ok(InputSource::Target(target)),
        (None, None) if stdin_piped => Ok(InputSource::Stdin),
        (None, None) => Err(ConfigError::NoInput),
    }
}

pub fn read_ranges(source: InputSource) -> Result<Vec<String>, ConfigError> {
    let ranges = match source {
        InputSource::List(path) => {
            debug!("Reading ranges from {}", path.display());
            File::open(&path)
                .map(BufReader::new)
                .and_then(collect_lines)
                .map_err(|source| ConfigError::ListFile { path, source })?
        }
        InputSource::Target(target) => collect_lines(target.as_bytes()).unwrap_or_default(),
        InputSource::Stdin => {
            debug!("Reading ranges from stdin");
            collect_lines(io::stdin().lock()).map_err(|source| ConfigError::ListFile {
                path: PathBuf::from("<stdin>"),
                source,
            })?
        }
    };

    if ranges.is_empty() {
        return Err(ConfigError::NoInput);
    }
    Ok(ranges)
}

fn collect_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut ranges = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        ranges.push(line.to_string());
    }
    Ok(ranges)
}
