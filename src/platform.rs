//! Platform gate.

/// Whether the running operating system is the supported one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    /// The host matches the single supported OS identifier.
    Supported,
    /// Any other OS.
    Unsupported,
}

/// Result of the platform gate, computed once at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCheck {
    /// Eligibility of the host.
    pub os_kind: OsKind,
    /// Human-readable explanation, suitable for display.
    pub reason: String,
}

impl PlatformCheck {
    /// Compare a host OS identifier against the supported one.
    ///
    /// Identifiers use the vocabulary of [`std::env::consts::OS`]
    /// (`"macos"`, `"linux"`, `"windows"`, ...). The comparison is exact.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mcp_bootstrap::{OsKind, PlatformCheck};
    ///
    /// let check = PlatformCheck::evaluate("linux", "macos");
    /// assert_eq!(check.os_kind, OsKind::Unsupported);
    /// assert!(!check.is_supported());
    /// ```
    pub fn evaluate(detected: &str, supported: &str) -> Self {
        if detected == supported {
            Self {
                os_kind: OsKind::Supported,
                reason: format!("{} detected, compatible system", display_os(detected)),
            }
        } else {
            Self {
                os_kind: OsKind::Unsupported,
                reason: format!(
                    "{} detected, but this tool only supports {}",
                    display_os(detected),
                    display_os(supported)
                ),
            }
        }
    }

    /// `true` if the run may proceed.
    pub fn is_supported(&self) -> bool {
        self.os_kind == OsKind::Supported
    }
}

/// Friendly name for an OS identifier.
pub(crate) fn display_os(id: &str) -> String {
    match id {
        "macos" => "macOS".to_string(),
        "linux" => "Linux".to_string(),
        "windows" => "Windows".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        "" => "unknown OS".to_string(),
        other => other.to_string(),
    }
}
