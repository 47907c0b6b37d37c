//! Version output parsing with regex extraction.

use regex::Regex;
use semver::Version;
use std::sync::OnceLock;

fn full_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("valid regex"))
}

fn short_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("valid regex"))
}

/// Parse a semantic version from a tool's `--version` output.
///
/// The first `major.minor.patch` triple wins; when none exists a
/// `major.minor` pair is accepted with patch 0.
///
/// - `pyapple-mcp 1.0.0` -> 1.0.0
/// - `uv 0.5.11 (c4d0caaee 2024-12-19)` -> 0.5.11
/// - `version 2.4` -> 2.4.0
pub(crate) fn parse_tool_version(output: &str) -> Option<Version> {
    if let Some(caps) = full_version_re().captures(output) {
        return Version::parse(caps.get(0)?.as_str()).ok();
    }
    parse_interpreter_version(output)
}

/// Parse an interpreter's `major.minor[.patch]` version.
///
/// Components are parsed as integers, so `3.10` orders after `3.9`.
///
/// - `Python 3.12.1` -> 3.12.1
/// - `Python 3.13.0rc1` -> 3.13.0
/// - `3.9` -> 3.9.0
pub(crate) fn parse_interpreter_version(output: &str) -> Option<Version> {
    let caps = short_version_re().captures(output)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = caps
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    Some(Version::new(major, minor, patch))
}

/// `true` if `found` meets `required`, comparing only major and minor.
pub(crate) fn meets_minimum(found: &Version, required: &Version) -> bool {
    (found.major, found.minor) >= (required.major, required.minor)
}
