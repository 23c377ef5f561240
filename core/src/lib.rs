//! The concurrent scanning core of `sweepr`.
//!
//! * [`lookup`]: the per-address hostname lookup seam and its HTTP adapter.
//! * [`scanner`]: worker pools, job orchestration and result aggregation.

pub mod lookup;
pub mod scanner;
