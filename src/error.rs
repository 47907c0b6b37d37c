//! Error types for fatal bootstrap failures.
//!
//! Every variant carries a `fix` field with the next action the user can take
//! by hand, so a failed run never leaves them without an explicit command.

use semver::Version;
use thiserror::Error;

/// Fatal errors that stop a bootstrap run.
///
/// Steps 1-4 of a run (platform gate, package manager, interpreter, install)
/// fail with one of these. Discovery and PATH problems are not errors; they
/// degrade to [`InstallOutcome`](crate::InstallOutcome) variants instead.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::BootstrapError;
///
/// fn report(error: &BootstrapError) {
///     eprintln!("Bootstrap failed: {}", error);
///     eprintln!("To fix: {}", error.fix_suggestion());
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BootstrapError {
    /// The running operating system is not the supported one.
    #[error("Unsupported platform: {detected} (requires {supported})")]
    UnsupportedPlatform {
        /// OS identifier reported by the host.
        detected: String,
        /// The single supported OS identifier.
        supported: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// Neither the preferred nor a fallback package manager is available.
    #[error("No package manager available (tried {tried})")]
    NoPackageManager {
        /// Comma-separated executable names that were looked up.
        tried: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// No Python interpreter could be resolved.
    #[error("Python {required}+ is required but no interpreter was found")]
    InterpreterNotFound {
        /// Minimum interpreter version, as `major.minor`.
        required: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The interpreter ran but its version output could not be parsed.
    #[error("Could not read interpreter version from: {output}")]
    InterpreterVersionUnreadable {
        /// Raw `--version` output.
        output: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The interpreter is older than the required minimum.
    #[error("Python {} is too old (requires {}+)", short(.detected), short(.required))]
    VersionTooLow {
        /// Version that was found.
        detected: Version,
        /// Required minimum version.
        required: Version,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The package manager exited unsuccessfully or could not be spawned.
    #[error("Install command failed (exit code {}): {}", exit_label(.exit_code), .output.trim())]
    InstallCommandFailed {
        /// Exit code, `None` if the process was never started or was killed by a signal.
        exit_code: Option<i32>,
        /// Captured output, verbatim (stderr, or stdout when stderr was empty).
        output: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },
}

impl BootstrapError {
    /// Get an actionable suggestion for fixing this error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mcp_bootstrap::BootstrapError;
    ///
    /// let error = BootstrapError::NoPackageManager {
    ///     tried: "uv, pip3, pip".to_string(),
    ///     fix: "Install uv: curl -LsSf https://astral.sh/uv/install.sh | sh".to_string(),
    /// };
    /// assert!(error.fix_suggestion().contains("uv"));
    /// ```
    pub fn fix_suggestion(&self) -> &str {
        match self {
            Self::UnsupportedPlatform { fix, .. }
            | Self::NoPackageManager { fix, .. }
            | Self::InterpreterNotFound { fix, .. }
            | Self::InterpreterVersionUnreadable { fix, .. }
            | Self::VersionTooLow { fix, .. }
            | Self::InstallCommandFailed { fix, .. } => fix,
        }
    }
}

/// Render a version as `major.minor`, the granularity the interpreter gate uses.
pub(crate) fn short(version: &Version) -> String {
    format!("{}.{}", version.major, version.minor)
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}
