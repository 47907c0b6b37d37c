//! PATH registration in shell configuration files.
//!
//! Each registration is a containment check followed by at most one appended
//! line. Both happen under a process-wide lock with a single file handle, so
//! repeated or overlapping calls never write the same export twice.

use std::fs::OpenOptions;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Trailing comment identifying lines written by this tool.
pub const MARKER: &str = "# added by mcp-bootstrap";

static REGISTRATION_LOCK: Mutex<()> = Mutex::new(());

/// What a registration did to one configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEditRecord {
    /// The shell configuration file.
    pub config_file_path: PathBuf,
    /// The directory registered.
    pub directory: PathBuf,
    /// `true` if an export for the directory already existed and nothing was written.
    pub already_present: bool,
}

/// The exact line appended for `directory`.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::export_line;
/// use std::path::Path;
///
/// assert_eq!(
///     export_line(Path::new("/Users/me/.local/bin")),
///     r#"export PATH="/Users/me/.local/bin:$PATH" # added by mcp-bootstrap"#
/// );
/// ```
pub fn export_line(directory: &Path) -> String {
    format!("export PATH=\"{}:$PATH\" {}", directory.display(), MARKER)
}

/// `true` if any line of `contents` is a PATH assignment referencing `directory`.
///
/// The directory must appear as a whole entry: `export PATH=$PATH:/dir`,
/// `PATH="/dir/:$PATH"` and the line written by [`register_path`] all count,
/// but `/dir2` or `/dir/sub` do not.
pub fn has_path_entry(contents: &str, directory: &Path) -> bool {
    let needle = directory.to_string_lossy();
    let needle = needle.trim_end_matches('/');
    if needle.is_empty() {
        return false;
    }
    contents
        .lines()
        .map(str::trim_start)
        .filter(|line| !line.starts_with('#'))
        .any(|line| line.contains("PATH") && references_entry(line, needle))
}

fn references_entry(line: &str, entry: &str) -> bool {
    line.match_indices(entry).any(|(start, _)| {
        let before = line[..start].chars().next_back();
        let after = line[start + entry.len()..]
            .trim_start_matches('/')
            .chars()
            .next();
        before.map_or(true, is_entry_boundary) && after.map_or(true, is_entry_boundary)
    })
}

fn is_entry_boundary(c: char) -> bool {
    matches!(c, ':' | '"' | '\'' | '=' | ';') || c.is_whitespace()
}

/// Ensure `config_file` exports `directory` on PATH.
///
/// Creates the file if it does not exist. Appends one [`export_line`] unless
/// [`has_path_entry`] already holds, making the call idempotent.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::register_path;
/// use std::path::Path;
///
/// let tmp = tempfile::tempdir().unwrap();
/// let rc = tmp.path().join(".zshrc");
/// let first = register_path(&rc, Path::new("/opt/tool/bin")).unwrap();
/// let second = register_path(&rc, Path::new("/opt/tool/bin")).unwrap();
/// assert!(!first.already_present);
/// assert!(second.already_present);
/// ```
pub fn register_path(config_file: &Path, directory: &Path) -> io::Result<PathEditRecord> {
    let _guard = REGISTRATION_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(parent) = config_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(config_file)?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let record = PathEditRecord {
        config_file_path: config_file.to_path_buf(),
        directory: directory.to_path_buf(),
        already_present: has_path_entry(&contents, directory),
    };
    if record.already_present {
        tracing::debug!(
            file = %config_file.display(),
            dir = %directory.display(),
            "PATH entry already present"
        );
        return Ok(record);
    }

    let mut addition = String::new();
    if !contents.is_empty() && !contents.ends_with('\n') {
        addition.push('\n');
    }
    addition.push_str(&export_line(directory));
    addition.push('\n');

    file.seek(SeekFrom::End(0))?;
    file.write_all(addition.as_bytes())?;
    file.flush()?;
    tracing::info!(
        file = %config_file.display(),
        dir = %directory.display(),
        "registered PATH entry"
    );
    Ok(record)
}
