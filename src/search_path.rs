//! The executable search path, threaded through a run as a value.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Ordered list of directories searched for executables.
///
/// A run starts from the host's `PATH` and prepends directories as it
/// installs tools or registers new PATH entries. The process environment is
/// never mutated.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::SearchPath;
/// use std::path::Path;
///
/// let mut path = SearchPath::parse("/usr/bin:/bin");
/// path.prepend("/Users/me/.local/bin");
/// assert_eq!(path.dirs()[0], Path::new("/Users/me/.local/bin"));
/// assert!(path.contains(Path::new("/bin")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Build from an explicit list of directories.
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Split a `PATH`-style string.
    pub fn parse(value: &str) -> Self {
        Self {
            dirs: std::env::split_paths(value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
        }
    }

    /// Directories in search order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// `true` if `dir` is already searched.
    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.iter().any(|d| d == dir)
    }

    /// Put `dir` at the front. A directory already present is left where it is.
    pub fn prepend(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        if !self.contains(&dir) {
            self.dirs.insert(0, dir);
        }
    }

    /// Resolve an executable name against these directories.
    pub fn lookup(&self, name: &str) -> Option<PathBuf> {
        if self.dirs.is_empty() {
            return None;
        }
        let joined = self.to_os_string()?;
        which::which_in(name, Some(joined), Path::new("/")).ok()
    }

    /// Join back into a `PATH`-style value.
    pub fn to_os_string(&self) -> Option<OsString> {
        std::env::join_paths(&self.dirs).ok()
    }
}
