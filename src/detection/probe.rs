//! Running `--version` probes through the host.

use super::parser::{parse_interpreter_version, parse_tool_version};
use crate::host::Host;
use semver::Version;
use std::path::Path;

/// What an interpreter `--version` probe produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InterpreterProbe {
    /// A `major.minor` version was read.
    Version(Version),
    /// The command ran (or failed to) but printed nothing parseable.
    Unreadable(String),
}

/// Ask an interpreter for its version.
pub(crate) async fn probe_interpreter<H: Host>(host: &H, interpreter: &Path) -> InterpreterProbe {
    let output = match host.run(interpreter, &["--version".to_string()]).await {
        Ok(output) => output,
        Err(e) => return InterpreterProbe::Unreadable(e.to_string()),
    };
    let text = output.text();
    match parse_interpreter_version(text) {
        Some(version) => InterpreterProbe::Version(version),
        None => InterpreterProbe::Unreadable(text.trim().to_string()),
    }
}

/// Ask an installed tool for its version, `None` when it cannot say.
pub(crate) async fn probe_tool_version<H: Host>(host: &H, executable: &Path) -> Option<Version> {
    match host.run(executable, &["--version".to_string()]).await {
        Ok(output) if output.success() => parse_tool_version(output.text()),
        Ok(output) => {
            tracing::debug!(
                executable = %executable.display(),
                exit_code = ?output.exit_code,
                "version probe exited unsuccessfully"
            );
            None
        }
        Err(e) => {
            tracing::debug!(executable = %executable.display(), error = %e, "version probe failed");
            None
        }
    }
}
