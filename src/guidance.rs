//! Human-readable guidance printed after a run.
//!
//! A run that cannot finish on its own still ends with the exact commands the
//! user must type. This module renders those, plus the macOS permission notes
//! and the chat-client configuration snippet.

use crate::outcome::InstallOutcome;
use crate::registration::export_line;
use crate::PackageManager;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Client configuration file locations, relative to `HOME`, in preference order.
pub const CLIENT_CONFIG_PATHS: &[&str] = &[
    "Library/Application Support/Claude/claude_desktop_config.json",
    "Library/Application Support/Claude Desktop/claude_desktop_config.json",
];

/// Manual follow-up commands for a finished run.
///
/// Empty for [`InstallOutcome::Success`]. For failures the error's fix
/// suggestion comes first.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::{manual_steps, InstallOutcome, PackageManager};
///
/// let outcome = InstallOutcome::NotFoundAfterInstall { searched: vec![] };
/// let steps = manual_steps(&outcome, "pyapple-mcp", "pyapple-mcp", PackageManager::Uv);
/// assert!(steps.iter().any(|s| s.contains("uv tool install pyapple-mcp")));
/// ```
pub fn manual_steps(
    outcome: &InstallOutcome,
    package_spec: &str,
    executable: &str,
    manager: PackageManager,
) -> Vec<String> {
    match outcome {
        InstallOutcome::Success { .. } => Vec::new(),
        InstallOutcome::NotFoundAfterInstall { .. } => vec![
            format!(
                "Reinstall the package: {}",
                manager.manual_command(package_spec)
            ),
            format!(
                "Locate the executable: find ~ /usr/local /opt/homebrew -name {} -type f 2>/dev/null",
                executable
            ),
            format!(
                "Add its directory to PATH: echo '{}' >> ~/.zshrc",
                export_line(Path::new("<directory>"))
            ),
            "Open a new terminal, then run the command again".to_string(),
        ],
        InstallOutcome::Unverified { executable: path } => {
            let dir = path.parent().unwrap_or(Path::new("/"));
            vec![
                format!(
                    "Add its directory to PATH: echo '{}' >> ~/.zshrc",
                    export_line(dir)
                ),
                "Reload your shell: source ~/.zshrc".to_string(),
                format!("Check it runs: {} --version", executable),
            ]
        }
        InstallOutcome::Failed(error) => vec![
            error.fix_suggestion().to_string(),
            format!(
                "Then install by hand: {}",
                manager.manual_command(package_spec)
            ),
        ],
    }
}

/// Commands that add `directory` to each shell file the run could not update.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::registration_steps;
/// use std::path::{Path, PathBuf};
///
/// let steps = registration_steps(&[PathBuf::from("/Users/me/.bashrc")], Path::new("/opt/bin"));
/// assert!(steps[0].ends_with(">> /Users/me/.bashrc"));
/// ```
pub fn registration_steps(failed_files: &[PathBuf], directory: &Path) -> Vec<String> {
    failed_files
        .iter()
        .map(|file| {
            format!(
                "Add {} to PATH: echo '{}' >> {}",
                directory.display(),
                export_line(directory),
                file.display()
            )
        })
        .collect()
}

/// macOS privacy permissions the server asks for on first use.
pub fn permissions_notice() -> Vec<&'static str> {
    vec![
        "Accessibility: control applications",
        "Full Disk Access: read application data",
        "Contacts: read and write contact information",
        "Calendars: read calendar events",
        "Reminders: manage reminders",
        "Grant these when prompted, or later in System Settings > Privacy & Security",
    ]
}

/// Pretty-printed client configuration registering `command` under `server_name`.
///
/// The bootstrapper never writes this file; the user pastes the snippet.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::client_config_snippet;
///
/// let snippet = client_config_snippet("pyapple", "pyapple-mcp");
/// let value: serde_json::Value = serde_json::from_str(&snippet).unwrap();
/// assert_eq!(value["mcpServers"]["pyapple"]["command"], "pyapple-mcp");
/// ```
pub fn client_config_snippet(server_name: &str, command: &str) -> String {
    let value = json!({
        "mcpServers": {
            server_name: { "command": command }
        }
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

/// Where the chat client reads its configuration.
///
/// The first of [`CLIENT_CONFIG_PATHS`] that exists wins; otherwise the first
/// location is returned.
pub fn client_config_path(home: Option<&Path>) -> PathBuf {
    let base = home.map_or_else(|| PathBuf::from("~"), Path::to_path_buf);
    CLIENT_CONFIG_PATHS
        .iter()
        .map(|relative| base.join(relative))
        .find(|path| path.is_file())
        .unwrap_or_else(|| base.join(CLIENT_CONFIG_PATHS[0]))
}
