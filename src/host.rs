//! Capabilities the bootstrapper needs from the machine it runs on.
//!
//! Everything with a side effect outside the filesystem goes through
//! [`Host`]: reading the OS identifier and environment variables, running
//! subprocesses, and asking the user a yes/no question. Tests supply a
//! scripted implementation; the binary uses [`SystemHost`].

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run that printed `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// `true` if the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout if non-empty, else stderr.
    ///
    /// Some tools (older Pythons among them) print `--version` to stderr.
    pub fn text(&self) -> &str {
        if self.stdout.is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }

    /// Stderr if non-empty, else stdout. Used to surface failures verbatim.
    pub fn diagnostics(&self) -> &str {
        if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Injected machine capabilities.
///
/// Calls are awaited one at a time; implementations do not need to be
/// thread-safe beyond `&self`.
#[allow(async_fn_in_trait)]
pub trait Host {
    /// Operating system identifier, in the vocabulary of [`std::env::consts::OS`].
    fn os(&self) -> String;

    /// Value of an environment variable, `None` if unset or empty.
    fn var(&self, key: &str) -> Option<String>;

    /// Run `program` with `args` to completion and capture its output.
    async fn run(&self, program: &Path, args: &[String]) -> io::Result<CommandOutput>;

    /// Ask a yes/no question. Implementations default to "no".
    fn confirm(&self, prompt: &str) -> bool;

    /// The user's home directory, from `HOME`.
    fn home(&self) -> Option<PathBuf> {
        self.var("HOME").map(PathBuf::from)
    }
}

/// The real machine: process environment, `tokio::process`, and stdin.
#[derive(Debug, Clone, Default)]
pub struct SystemHost {
    assume_yes: bool,
}

impl SystemHost {
    /// A host that prompts on stdin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation with "yes" without prompting.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }
}

impl Host for SystemHost {
    fn os(&self) -> String {
        std::env::consts::OS.to_string()
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }

    async fn run(&self, program: &Path, args: &[String]) -> io::Result<CommandOutput> {
        tracing::debug!(program = %program.display(), ?args, "running command");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => parse_answer(&answer),
            Err(_) => false,
        }
    }
}

/// Interpret a y/N answer. Anything other than an explicit yes is no.
pub(crate) fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
