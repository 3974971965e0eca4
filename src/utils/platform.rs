//! Platform detection and executable lookup.
//!
//! Resource descriptors name their target platform the way the SA-MP and
//! open.mp ecosystems do (`windows`, `linux`, `darwin`), which is not always
//! what [`std::env::consts::OS`] reports. [`current_platform`] does the
//! translation.

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Platform name used to select resources on this host.
///
/// # Examples
///
/// ```rust
/// use pawnpm::utils::platform::current_platform;
///
/// let platform = current_platform();
/// assert!(!platform.is_empty());
/// assert_ne!(platform, "macos");
/// ```
#[must_use]
pub fn current_platform() -> &'static str {
    platform_name(std::env::consts::OS)
}

/// Map a Rust OS name onto the ecosystem's platform name.
#[must_use]
pub fn platform_name(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

/// Returns the appropriate Git command name for the current platform.
///
/// - `"git.exe"` on Windows
/// - `"git"` elsewhere
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() { "git.exe" } else { "git" }
}

/// Checks if a command is available in the system PATH.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}
