//! Outcome types returned by a bootstrap run.

use crate::BootstrapError;
use std::path::{Path, PathBuf};

/// Which discovery strategy located the executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverySource {
    /// Already resolvable on the search path.
    OnPath,
    /// Found in one of the candidate directory templates.
    Candidate,
    /// Found in a scripts directory reported by the interpreter.
    Interpreter,
    /// Found by the bounded filesystem walk.
    FilesystemSearch,
}

impl DiscoverySource {
    /// `true` when the directory must be registered on PATH.
    pub fn needs_registration(&self) -> bool {
        !matches!(self, Self::OnPath)
    }
}

/// Where the installed executable was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Full path to the executable.
    pub executable: PathBuf,
    /// Directory containing it.
    pub directory: PathBuf,
    /// How it was found.
    pub source: DiscoverySource,
}

impl Discovery {
    pub(crate) fn new(executable: PathBuf, source: DiscoverySource) -> Self {
        let directory = executable
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            executable,
            directory,
            source,
        }
    }
}

/// Result of [`Bootstrapper::run`](crate::Bootstrapper::run).
///
/// Only [`InstallOutcome::Failed`] is fatal. The other non-success variants
/// mean the package is probably installed but PATH could not be set up
/// automatically, and the user gets manual instructions instead.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::InstallOutcome;
///
/// fn exit_code(outcome: &InstallOutcome) -> i32 {
///     if outcome.is_fatal() { 1 } else { 0 }
/// }
///
/// let outcome = InstallOutcome::NotFoundAfterInstall { searched: vec![] };
/// assert_eq!(exit_code(&outcome), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InstallOutcome {
    /// The executable resolves and reported a version.
    Success {
        /// Resolved executable path.
        executable: PathBuf,
        /// Parsed self-reported version, or `"unknown"`.
        version: String,
    },

    /// The install ran but the executable was not found anywhere.
    NotFoundAfterInstall {
        /// Directories searched, in order.
        searched: Vec<PathBuf>,
    },

    /// The executable was found but did not resolve after PATH registration.
    Unverified {
        /// Where discovery found it.
        executable: PathBuf,
    },

    /// A fatal step failed.
    Failed(BootstrapError),
}

impl InstallOutcome {
    /// `true` only for [`InstallOutcome::Failed`].
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// `true` only for [`InstallOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The executable path, when one is known.
    pub fn executable(&self) -> Option<&Path> {
        match self {
            Self::Success { executable, .. } | Self::Unverified { executable } => Some(executable),
            _ => None,
        }
    }

    /// The fatal error, if any.
    pub fn error(&self) -> Option<&BootstrapError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl From<BootstrapError> for InstallOutcome {
    fn from(error: BootstrapError) -> Self {
        Self::Failed(error)
    }
}
