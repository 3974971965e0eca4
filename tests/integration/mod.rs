//! Integration test suite for pawnpm
//!
//! End-to-end tests that resolve real git repositories. Packages live in a
//! local registry directory served over `file://`, so the suite needs `git`
//! but no network access.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: the `pawnpm` binary, driven through `assert_cmd`
//! - **resolve**: library-level resolution against the git fetcher

mod cli;
mod common;
mod resolve;
