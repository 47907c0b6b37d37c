//! Detection implementation submodule.
//!
//! This module contains everything the bootstrapper uses to find tools on
//! the machine:
//!
//! - [`ToolPresence`]: one lookup of an executable on the search path
//! - version parsing for interpreters (`major.minor`) and tools (semver)
//! - candidate template expansion and the bounded filesystem walk
//! - [`discover`]: the ordered discovery strategies for the installed executable

mod candidates;
mod parser;
mod probe;

pub use candidates::{expand_dirs, Placeholders};
pub(crate) use parser::meets_minimum;
pub(crate) use probe::{probe_interpreter, probe_tool_version, InterpreterProbe};

use crate::host::Host;
use crate::outcome::{Discovery, DiscoverySource};
use crate::{BootstrapOptions, SearchPath};
pub(crate) use candidates::is_executable_file;
use candidates::{find_in_candidates, walk_for_executable};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Result of looking up a named executable.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::{SearchPath, ToolPresence};
///
/// let presence = ToolPresence::check("definitely-not-a-tool-xyz", &SearchPath::parse("/usr/bin"));
/// assert!(!presence.found);
/// assert!(presence.resolved_path.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPresence {
    /// Executable name that was looked up.
    pub name: String,
    /// Whether it resolved.
    pub found: bool,
    /// Where it resolved to.
    pub resolved_path: Option<PathBuf>,
}

impl ToolPresence {
    /// Look `name` up on `path`. Nothing is cached.
    pub fn check(name: &str, path: &SearchPath) -> Self {
        let resolved_path = path.lookup(name);
        tracing::debug!(name, resolved = ?resolved_path, "tool lookup");
        Self {
            name: name.to_string(),
            found: resolved_path.is_some(),
            resolved_path,
        }
    }

    /// Return the first of `names` that resolves.
    pub fn first_of(names: &[&str], path: &SearchPath) -> Option<Self> {
        names
            .iter()
            .map(|name| Self::check(name, path))
            .find(|presence| presence.found)
    }
}

/// Python snippet printing the interpreter's default and user scripts
/// directories, then the `bin` directory next to each site-packages root.
const SCRIPTS_DIR_SNIPPET: &str = "import os, site, sysconfig
print(sysconfig.get_path('scripts'))
try:
    print(sysconfig.get_path('scripts', sysconfig.get_preferred_scheme('user')))
except Exception:
    print(sysconfig.get_path('scripts', os.name + '_user'))
for root in getattr(site, 'getsitepackages', lambda: [])():
    print(os.path.join(root, 'bin'))";

/// Find the installed executable.
///
/// Strategies, in order, first hit wins:
///
/// 1. the current search path
/// 2. the candidate templates from [`BootstrapOptions::candidate_dirs`]
/// 3. the interpreter's own scripts directories and site-packages `bin` dirs
/// 4. a bounded walk under [`BootstrapOptions::search_roots`]
///
/// On a miss, returns every directory that was searched, in order.
pub async fn discover<H: Host>(
    host: &H,
    options: &BootstrapOptions,
    path: &SearchPath,
    interpreter: Option<&Path>,
    executable: &str,
) -> Result<Discovery, Vec<PathBuf>> {
    if let Some(found) = path.lookup(executable) {
        return Ok(Discovery::new(found, DiscoverySource::OnPath));
    }

    let mut searched: Vec<PathBuf> = path.dirs().to_vec();
    let values = Placeholders {
        home: host.home(),
        venv: host.var("VIRTUAL_ENV").map(PathBuf::from),
    };

    if let Some(found) =
        find_in_candidates(&options.candidate_dirs, &values, executable, &mut searched)
    {
        return Ok(Discovery::new(found, DiscoverySource::Candidate));
    }

    if let Some(interpreter) = interpreter {
        for dir in interpreter_scripts_dirs(host, interpreter).await {
            let candidate = dir.join(executable);
            searched.push(dir);
            if is_executable_file(&candidate) {
                return Ok(Discovery::new(candidate, DiscoverySource::Interpreter));
            }
        }
    }

    let roots: Vec<PathBuf> = options
        .search_roots
        .iter()
        .filter_map(|root| values.expand(root))
        .map(PathBuf::from)
        .collect();
    if let Some(found) =
        walk_for_executable(&roots, options.search_depth, executable, &mut searched)
    {
        return Ok(Discovery::new(found, DiscoverySource::FilesystemSearch));
    }

    let mut seen = HashSet::new();
    searched.retain(|dir| seen.insert(dir.clone()));
    Err(searched)
}

/// Ask the interpreter where it installs console scripts.
async fn interpreter_scripts_dirs<H: Host>(host: &H, interpreter: &Path) -> Vec<PathBuf> {
    let args = ["-c".to_string(), SCRIPTS_DIR_SNIPPET.to_string()];
    let output = match host.run(interpreter, &args).await {
        Ok(output) if output.success() => output,
        Ok(output) => {
            tracing::debug!(exit_code = ?output.exit_code, "interpreter scripts query failed");
            return Vec::new();
        }
        Err(e) => {
            tracing::debug!(error = %e, "interpreter scripts query failed");
            return Vec::new();
        }
    };

    let mut dirs: Vec<PathBuf> = Vec::new();
    for line in output.stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let dir = PathBuf::from(line);
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    dirs
}
