//! Configuration for pawnpm
//!
//! Per-project settings live in the package manifest ([`crate::manifest`]).
//! This module holds the user-wide settings: which registry to clone from,
//! how long git may take, and which platform to select resources for.

pub mod global;

pub use global::GlobalConfig;
