//! Bootstrap options configuration.
//!
//! [`BootstrapOptions`] collects every tunable of a run: the supported OS,
//! the interpreter floor, where to look for the installed executable, and
//! which shell files receive PATH exports. The defaults describe a macOS
//! user-level install.

use semver::Version;
use std::path::PathBuf;

/// Default candidate directory templates, highest priority first.
///
/// `{home}` expands to `HOME` and `{venv}` to `VIRTUAL_ENV`; a template whose
/// placeholder is unset is skipped. Glob metacharacters are expanded.
pub const DEFAULT_CANDIDATE_DIRS: &[&str] = &[
    "{home}/.local/bin",
    "{home}/Library/Python/*/bin",
    "/Library/Frameworks/Python.framework/Versions/*/bin",
    "{venv}/bin",
    "{home}/.cargo/bin",
    "{home}/.astral/uv/bin",
    "{home}/.uv/bin",
    "/opt/homebrew/bin",
    "/usr/local/bin",
];

/// Default roots for the last-resort filesystem walk.
pub const DEFAULT_SEARCH_ROOTS: &[&str] = &["{home}", "/opt/homebrew", "/usr/local"];

/// Default shell configuration files, relative to `HOME`.
pub const DEFAULT_SHELL_CONFIGS: &[&str] = &[".zshrc", ".bash_profile", ".bashrc"];

/// Configuration options for a bootstrap run.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::BootstrapOptions;
/// use semver::Version;
///
/// let opts = BootstrapOptions {
///     min_interpreter: Version::new(3, 10, 0),
///     ..Default::default()
/// };
/// assert_eq!(opts.supported_os, "macos");
/// ```
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// The single OS identifier the run accepts.
    ///
    /// Default: `"macos"`
    pub supported_os: String,

    /// Minimum interpreter version. Only major and minor are compared.
    ///
    /// Default: 3.9
    pub min_interpreter: Version,

    /// Explicit package manager executable, bypassing lookup.
    ///
    /// Default: `None`
    pub package_manager_override: Option<PathBuf>,

    /// Candidate directory templates, searched in order.
    ///
    /// Default: [`DEFAULT_CANDIDATE_DIRS`]
    pub candidate_dirs: Vec<String>,

    /// Roots of the bounded filesystem walk, searched in order.
    ///
    /// Default: [`DEFAULT_SEARCH_ROOTS`]
    pub search_roots: Vec<String>,

    /// Maximum directory depth of the filesystem walk.
    ///
    /// Default: 6
    pub search_depth: usize,

    /// Shell configuration files receiving PATH exports, relative to `HOME`
    /// unless absolute.
    ///
    /// Default: [`DEFAULT_SHELL_CONFIGS`]
    pub shell_configs: Vec<PathBuf>,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            supported_os: "macos".to_string(),
            min_interpreter: Version::new(3, 9, 0),
            package_manager_override: None,
            candidate_dirs: DEFAULT_CANDIDATE_DIRS.iter().map(|s| s.to_string()).collect(),
            search_roots: DEFAULT_SEARCH_ROOTS.iter().map(|s| s.to_string()).collect(),
            search_depth: 6,
            shell_configs: DEFAULT_SHELL_CONFIGS.iter().map(PathBuf::from).collect(),
        }
    }
}
