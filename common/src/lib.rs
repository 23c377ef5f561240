//! Shared building blocks for `sweepr`: range descriptors, the immutable scan
//! configuration and the error taxonomy used across the workspace.

pub mod config;
pub mod error;
pub mod network;
