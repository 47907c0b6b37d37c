//! # mcp-bootstrap
//!
//! Idempotent installer for a Python-packaged MCP server.
//!
//! A run checks that it is on the supported OS, finds (or offers to install)
//! a package manager, gates on the Python version, installs one package,
//! finds the executable it produced, and records the executable's directory
//! in the user's shell configuration files so it stays on PATH. Running it
//! again changes nothing that is already in place.
//!
//! ## Features
//!
//! - [`Bootstrapper`] running the whole sequence and returning an [`InstallOutcome`]
//! - [`Host`] trait injecting OS, environment, subprocess and prompt capabilities
//! - [`SearchPath`] threading PATH changes through a run as a value
//! - [`register_path`] idempotent PATH export into a shell file
//! - [`manual_steps`] and [`client_config_snippet`] for printed guidance
//!
//! ## Example
//!
//! ```rust,no_run
//! use mcp_bootstrap::{BootstrapOptions, Bootstrapper, InstallOutcome, SystemHost};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bootstrapper = Bootstrapper::new(SystemHost::new(), BootstrapOptions::default());
//!     match bootstrapper.run("pyapple-mcp", "pyapple-mcp").await {
//!         InstallOutcome::Success { executable, version } => {
//!             println!("pyapple-mcp {} at {}", version, executable.display());
//!         }
//!         InstallOutcome::Failed(error) => {
//!             eprintln!("{}: {}", error, error.fix_suggestion());
//!         }
//!         other => println!("Finish by hand: {:?}", other),
//!     }
//! }
//! ```

mod bootstrap;
mod detection;
mod error;
mod guidance;
mod host;
mod options;
mod outcome;
mod package_manager;
mod platform;
mod progress;
mod registration;
mod search_path;

pub use bootstrap::{BootstrapReport, Bootstrapper};
pub use detection::{discover, expand_dirs, Placeholders, ToolPresence};
pub use error::BootstrapError;
pub use guidance::{
    client_config_path, client_config_snippet, manual_steps, permissions_notice,
    registration_steps, CLIENT_CONFIG_PATHS,
};
pub use host::{CommandOutput, Host, SystemHost};
pub use options::{
    BootstrapOptions, DEFAULT_CANDIDATE_DIRS, DEFAULT_SEARCH_ROOTS, DEFAULT_SHELL_CONFIGS,
};
pub use outcome::{Discovery, DiscoverySource, InstallOutcome};
pub use package_manager::PackageManager;
pub use platform::{OsKind, PlatformCheck};
pub use progress::BootstrapProgress;
pub use registration::{export_line, has_path_entry, register_path, PathEditRecord, MARKER};
pub use search_path::SearchPath;
