//! Candidate directory templates and their glob expansion.

use std::path::{Path, PathBuf};

/// Values substituted into candidate templates.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    /// Replaces `{home}`.
    pub home: Option<PathBuf>,
    /// Replaces `{venv}`.
    pub venv: Option<PathBuf>,
}

impl Placeholders {
    /// Substitute placeholders in `template`.
    ///
    /// Returns `None` when the template names a placeholder that is unset, so
    /// `{venv}/bin` never degrades into `/bin`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mcp_bootstrap::Placeholders;
    /// use std::path::PathBuf;
    ///
    /// let values = Placeholders { home: Some(PathBuf::from("/Users/me")), venv: None };
    /// assert_eq!(values.expand("{home}/.local/bin").as_deref(), Some("/Users/me/.local/bin"));
    /// assert_eq!(values.expand("{venv}/bin"), None);
    /// ```
    pub fn expand(&self, template: &str) -> Option<String> {
        let mut out = template.to_string();
        for (key, value) in [("{home}", &self.home), ("{venv}", &self.venv)] {
            if out.contains(key) {
                let value = value.as_ref()?;
                out = out.replace(key, &value.to_string_lossy());
            }
        }
        Some(out)
    }
}

/// Lazily expand a glob pattern into the directories it matches.
///
/// The returned iterator walks the filesystem as it is advanced, yields each
/// matching directory once in glob order, and cannot be restarted. A pattern
/// without metacharacters yields itself if it is an existing directory.
/// Invalid patterns and unreadable entries yield nothing.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::expand_dirs;
///
/// let mut dirs = expand_dirs("/definitely/not/here/*/bin");
/// assert!(dirs.next().is_none());
/// ```
pub fn expand_dirs(pattern: &str) -> impl Iterator<Item = PathBuf> {
    let paths = match glob::glob(pattern) {
        Ok(paths) => Some(paths),
        Err(e) => {
            tracing::debug!(pattern, error = %e, "invalid candidate pattern");
            None
        }
    };
    paths
        .into_iter()
        .flatten()
        .filter_map(Result::ok)
        .filter(|p| p.is_dir())
}

/// `true` if `path` is a regular file the user may execute.
pub(crate) fn is_executable_file(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Search candidate templates in order for a directory holding `executable`.
///
/// Every expanded directory is appended to `searched`, matched or not.
/// Returns the executable path inside the first matching directory.
pub(crate) fn find_in_candidates(
    templates: &[String],
    values: &Placeholders,
    executable: &str,
    searched: &mut Vec<PathBuf>,
) -> Option<PathBuf> {
    for template in templates {
        let Some(pattern) = values.expand(template) else {
            tracing::debug!(template, "skipping template with unset placeholder");
            continue;
        };
        for dir in expand_dirs(&pattern) {
            let candidate = dir.join(executable);
            searched.push(dir);
            if is_executable_file(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Walk `roots` up to `max_depth` levels looking for `executable`.
///
/// Roots are walked one after another; the first hit wins. Unreadable
/// directories are skipped silently. Symlinks are not followed.
pub(crate) fn walk_for_executable(
    roots: &[PathBuf],
    max_depth: usize,
    executable: &str,
    searched: &mut Vec<PathBuf>,
) -> Option<PathBuf> {
    for root in roots {
        if !root.is_dir() {
            continue;
        }
        searched.push(root.clone());
        tracing::debug!(root = %root.display(), max_depth, "walking for executable");
        let hit = walkdir::WalkDir::new(root)
            .max_depth(max_depth)
            .follow_links(false)
            .into_iter()
            .filter_map(Result::ok)
            .find(|entry| {
                entry.file_name() == executable
                    && !entry.file_type().is_dir()
                    && is_executable_file(entry.path())
            });
        if let Some(entry) = hit {
            return Some(entry.into_path());
        }
    }
    None
}
