//! Cross-platform utilities and helpers
//!
//! - [`fs`] - atomic writes and directory helpers
//! - [`platform`] - platform names for resource selection and executable lookup

pub mod fs;
pub mod platform;

pub use fs::{atomic_write, ensure_dir};
pub use platform::{current_platform, get_git_command, is_windows};
