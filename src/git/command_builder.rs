//! Type-safe Git command builder for consistent command execution
//!
//! Every git invocation in pawnpm goes through [`GitCommand`], which runs the
//! system `git` binary with `-C <dir>`, captures output, enforces a timeout
//! and turns failures into [`PawnpmError`] variants that name the operation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::DEFAULT_GIT_TIMEOUT;
use crate::core::PawnpmError;
use crate::utils::platform::get_git_command;

/// Builder for a single `git` invocation.
///
/// # Examples
///
/// ```rust,no_run
/// use pawnpm::git::command_builder::GitCommand;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let head = GitCommand::current_commit()
///     .current_dir(Path::new("dependencies/Southclaws/samp-logger"))
///     .execute_stdout()
///     .await?;
/// println!("HEAD is {head}");
/// # Ok(())
/// # }
/// ```
///
/// New commands time out after [`DEFAULT_GIT_TIMEOUT`] and never prompt for
/// credentials (`GIT_TERMINAL_PROMPT=0`), so a missing repository fails fast
/// instead of hanging on a username prompt.
#[derive(Debug, Clone)]
pub struct GitCommand {
    /// Command arguments to pass to Git (e.g., ["clone", "url", "path"])
    args: Vec<String>,

    /// Working directory, passed as `-C <dir>`
    current_dir: Option<PathBuf>,

    /// Environment variables to set for the Git process
    env_vars: Vec<(String, String)>,

    /// Maximum duration to wait for command completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Optional context string for log messages (usually the dependency)
    context: Option<String>,

    /// For clone commands, the URL for error messages
    clone_url: Option<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            env_vars: vec![("GIT_TERMINAL_PROMPT".to_string(), "0".to_string())],
            timeout_duration: Some(DEFAULT_GIT_TIMEOUT),
            context: None,
            clone_url: None,
        }
    }
}

impl GitCommand {
    /// Creates a new Git command builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory the command runs in.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a single argument to the Git command.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments to the Git command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set a custom timeout for the command (None for no timeout)
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Set a context for logging (e.g., dependency name)
    ///
    /// ```text
    /// (Southclaws/samp-logger@1.1.0) Executing command: git -C ... fetch --tags --force origin
    /// ```
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Full argument list including the `-C <dir>` prefix.
    fn full_args(&self) -> Vec<String> {
        let mut full_args = Vec::with_capacity(self.args.len() + 2);
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.iter().cloned());
        full_args
    }

    /// Name of the git operation, e.g. `clone` or `rev-parse`.
    fn operation(&self) -> String {
        self.args.first().cloned().unwrap_or_else(|| "unknown".to_string())
    }

    pub(crate) fn log_prefix(&self) -> String {
        self.context.as_ref().map(|ctx| format!("({ctx}) ")).unwrap_or_default()
    }

    /// Execute the command and return the output
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let start = std::time::Instant::now();
        let git_command = get_git_command();
        let full_args = self.full_args();
        let prefix = self.log_prefix();

        let mut cmd = Command::new(git_command);
        cmd.args(&full_args);
        for (key, value) in &self.env_vars {
            tracing::trace!(target: "git", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        tracing::debug!(
            target: "git",
            "{}Executing command: {} {}",
            prefix,
            git_command,
            full_args.join(" ")
        );

        let output_future = cmd.output();
        let output = if let Some(duration) = self.timeout_duration {
            match timeout(duration, output_future).await {
                Ok(result) => {
                    result.with_context(|| format!("Failed to execute git {}", full_args.join(" ")))?
                }
                Err(_) => {
                    tracing::warn!(
                        target: "git",
                        "{}Command timed out after {} seconds: git {}",
                        prefix,
                        duration.as_secs(),
                        full_args.join(" ")
                    );
                    return Err(PawnpmError::GitCommandError {
                        operation: self.operation(),
                        stderr: format!(
                            "Git command timed out after {} seconds. This may indicate:\n\
                            - Network connectivity issues\n\
                            - Authentication prompts waiting for input\n\
                            - Large repository operations taking too long\n\
                            Try running the command manually: git {}",
                            duration.as_secs(),
                            full_args.join(" ")
                        ),
                    }
                    .into());
                }
            }
        } else {
            output_future
                .await
                .with_context(|| format!("Failed to execute git {}", full_args.join(" ")))?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "git",
                "{}Command failed with exit code: {:?}",
                prefix,
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "git", "{}Error: {}", prefix, stderr.trim());
            }

            let reason = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(self.failure(reason.trim().to_string()).into());
        }

        if !stdout.is_empty() {
            tracing::trace!(target: "git", "{}{}", prefix, stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::trace!(target: "git", "{}{}", prefix, stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(
                target: "git::perf",
                "{}Git {} took {:.2}s",
                prefix,
                self.operation(),
                elapsed.as_secs_f64()
            );
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(
                target: "git::perf",
                "{}Git {} took {}ms",
                prefix,
                self.operation(),
                elapsed.as_millis()
            );
        }

        Ok(GitCommandOutput {
            stdout,
            stderr,
        })
    }

    /// Map a failed invocation onto the matching error variant.
    fn failure(self, reason: String) -> PawnpmError {
        match self.args.first().map(String::as_str) {
            Some("clone") => PawnpmError::GitCloneFailed {
                url: self.clone_url.unwrap_or_else(|| "unknown".to_string()),
                reason,
            },
            Some("checkout") => PawnpmError::GitCheckoutFailed {
                reference: self.args.last().cloned().unwrap_or_default(),
                reason,
            },
            _ => PawnpmError::GitCommandError {
                operation: self.operation(),
                stderr: reason,
            },
        }
    }

    /// Execute the command and return only stdout as a trimmed string
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Execute the command, discarding its output
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

/// Output from a Git command
#[derive(Debug)]
pub struct GitCommandOutput {
    /// Standard output from the Git command
    pub stdout: String,
    /// Standard error output from the Git command
    pub stderr: String,
}

// Convenience builders for the operations vendoring needs

impl GitCommand {
    /// Create a clone command
    pub fn clone(url: &str, target: impl AsRef<Path>) -> Self {
        let mut cmd = Self::new().args([
            "clone".to_string(),
            "--quiet".to_string(),
            url.to_string(),
            target.as_ref().display().to_string(),
        ]);
        cmd.clone_url = Some(url.to_string());
        cmd
    }

    /// Fetch branches and tags from `origin`, moving tags that were re-pointed
    pub fn fetch() -> Self {
        Self::new().args(["fetch", "--tags", "--force", "--quiet", "origin"])
    }

    /// Check out a commit with a detached HEAD, discarding local changes
    pub fn checkout_detached(commit: &str) -> Self {
        Self::new().args(["checkout", "--quiet", "--force", "--detach", commit])
    }

    /// Create or reset `branch` to `remote_ref` and check it out
    pub fn checkout_branch(branch: &str, remote_ref: &str) -> Self {
        Self::new().args(["checkout", "--quiet", "--force", "-B", branch, remote_ref])
    }

    /// Create a reset command
    pub fn reset_hard() -> Self {
        Self::new().args(["reset", "--hard", "--quiet", "HEAD"])
    }

    /// Create a command to get the current commit hash
    pub fn current_commit() -> Self {
        Self::new().args(["rev-parse", "HEAD"])
    }

    /// Resolve `rev` to a commit hash, failing quietly if it does not exist
    pub fn verify_commit(rev: &str) -> Self {
        Self::new().args(["rev-parse", "--verify", "--quiet"]).arg(format!("{rev}^{{commit}}"))
    }

    /// Name of the remote default branch, as recorded by clone
    pub fn remote_head() -> Self {
        Self::new().args(["symbolic-ref", "--short", "refs/remotes/origin/HEAD"])
    }

    /// Ask the remote for its default branch and record it as `origin/HEAD`
    pub fn update_remote_head() -> Self {
        Self::new().args(["remote", "set-head", "origin", "--auto"])
    }
}
