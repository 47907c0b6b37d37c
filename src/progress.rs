//! Progress reporting types for bootstrap runs.
//!
//! The [`BootstrapProgress`] enum represents discrete stages of a run that can
//! be reported to users via a callback registered with
//! [`Bootstrapper::on_progress`](crate::Bootstrapper::on_progress).

use crate::PackageManager;
use std::path::PathBuf;

/// Progress stages during a bootstrap run.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::BootstrapProgress;
///
/// fn on_progress(progress: BootstrapProgress) {
///     match &progress {
///         BootstrapProgress::Installing { package, manager } => {
///             println!("Installing {} with {}...", package, manager.display_name());
///         }
///         other => println!("{}", other.description()),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BootstrapProgress {
    /// Checking the operating system.
    CheckingPlatform,

    /// Looking for a package manager.
    ResolvingPackageManager,

    /// A package manager was chosen.
    PackageManagerResolved {
        /// Which manager.
        manager: PackageManager,
        /// Its executable.
        path: PathBuf,
    },

    /// Checking the interpreter version.
    CheckingInterpreter,

    /// Running the install command.
    Installing {
        /// Package specification being installed.
        package: String,
        /// Manager running the install.
        manager: PackageManager,
    },

    /// Searching for the installed executable.
    Discovering,

    /// A shell configuration file now exports the executable's directory.
    RegisteredPath {
        /// The file that was checked or edited.
        config_file: PathBuf,
        /// `true` if nothing had to be written.
        already_present: bool,
    },

    /// Re-resolving the executable and reading its version.
    Verifying,
}

impl BootstrapProgress {
    /// Get a human-readable description of the current progress stage.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mcp_bootstrap::BootstrapProgress;
    ///
    /// assert_eq!(BootstrapProgress::Discovering.description(), "Locating executable");
    /// ```
    pub fn description(&self) -> &'static str {
        match self {
            Self::CheckingPlatform => "Checking operating system",
            Self::ResolvingPackageManager => "Resolving package manager",
            Self::PackageManagerResolved { .. } => "Package manager ready",
            Self::CheckingInterpreter => "Checking Python version",
            Self::Installing { .. } => "Installing package",
            Self::Discovering => "Locating executable",
            Self::RegisteredPath { .. } => "Updating shell configuration",
            Self::Verifying => "Verifying installation",
        }
    }
}
