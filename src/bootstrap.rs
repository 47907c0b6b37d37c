//! The bootstrap run.
//!
//! [`Bootstrapper::run`] walks seven steps in order:
//!
//! 1. platform gate
//! 2. package manager resolution (uv, optionally installed on request, then pip)
//! 3. interpreter version gate
//! 4. package install
//! 5. executable discovery
//! 6. PATH registration in shell configuration files
//! 7. verification
//!
//! Steps 1-4 are fatal and end the run with [`InstallOutcome::Failed`].
//! Steps 5-7 are best-effort and degrade to outcomes that carry enough
//! information for manual guidance.

use crate::detection::{
    discover, is_executable_file, meets_minimum, probe_interpreter, probe_tool_version,
    InterpreterProbe, ToolPresence,
};
use crate::error::short;
use crate::host::Host;
use crate::outcome::{Discovery, DiscoverySource, InstallOutcome};
use crate::package_manager::UV_INSTALLER_SCRIPT;
use crate::registration::{register_path, PathEditRecord};
use crate::{
    BootstrapError, BootstrapOptions, BootstrapProgress, PackageManager, PlatformCheck, SearchPath,
};
use std::path::{Path, PathBuf};

/// Interpreter executable names, in lookup order.
const INTERPRETER_NAMES: &[&str] = &["python3", "python"];

type ProgressFn = Box<dyn Fn(BootstrapProgress) + Send + Sync>;

/// Everything a run decided, alongside its outcome.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    /// How the run ended.
    pub outcome: InstallOutcome,
    /// The package manager used, once resolved.
    pub manager: Option<PackageManager>,
    /// The interpreter that passed the version gate.
    pub interpreter: Option<PathBuf>,
    /// One record per shell configuration file touched in step 6.
    pub registrations: Vec<PathEditRecord>,
    /// Shell configuration files step 6 could not update.
    pub registration_failures: Vec<PathBuf>,
}

impl BootstrapReport {
    fn new() -> Self {
        Self {
            outcome: InstallOutcome::NotFoundAfterInstall { searched: Vec::new() },
            manager: None,
            interpreter: None,
            registrations: Vec::new(),
            registration_failures: Vec::new(),
        }
    }
}

/// Installs one package and makes its executable resolvable on PATH.
///
/// # Example
///
/// ```rust,no_run
/// use mcp_bootstrap::{BootstrapOptions, Bootstrapper, SystemHost};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let bootstrapper = Bootstrapper::new(SystemHost::new(), BootstrapOptions::default())
///         .on_progress(|p| println!("{}", p.description()));
///
///     let outcome = bootstrapper.run("pyapple-mcp", "pyapple-mcp").await;
///     std::process::exit(if outcome.is_fatal() { 1 } else { 0 });
/// }
/// ```
pub struct Bootstrapper<H> {
    host: H,
    options: BootstrapOptions,
    on_progress: Option<ProgressFn>,
}

impl<H: Host> Bootstrapper<H> {
    /// A bootstrapper acting on `host`.
    pub fn new(host: H, options: BootstrapOptions) -> Self {
        Self {
            host,
            options,
            on_progress: None,
        }
    }

    /// Register a callback receiving every progress stage.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(BootstrapProgress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// The host this bootstrapper acts on.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The options of this bootstrapper.
    pub fn options(&self) -> &BootstrapOptions {
        &self.options
    }

    /// Install `package_spec` and make `executable` resolvable.
    pub async fn run(&self, package_spec: &str, executable: &str) -> InstallOutcome {
        self.run_with_report(package_spec, executable).await.outcome
    }

    /// Like [`Bootstrapper::run`], also returning the intermediate decisions.
    pub async fn run_with_report(&self, package_spec: &str, executable: &str) -> BootstrapReport {
        let mut report = BootstrapReport::new();
        let result = self.execute(package_spec, executable, &mut report).await;
        report.outcome = match result {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!(%error, "bootstrap failed");
                InstallOutcome::Failed(error)
            }
        };
        report
    }

    async fn execute(
        &self,
        package_spec: &str,
        executable: &str,
        report: &mut BootstrapReport,
    ) -> Result<InstallOutcome, BootstrapError> {
        // Step 1: nothing runs before the platform gate.
        self.emit(BootstrapProgress::CheckingPlatform);
        self.check_platform()?;

        let user_path = SearchPath::parse(&self.host.var("PATH").unwrap_or_default());
        let mut path = user_path.clone();

        // Step 2
        self.emit(BootstrapProgress::ResolvingPackageManager);
        let (manager, manager_path) = self.resolve_package_manager(&mut path).await?;
        report.manager = Some(manager);
        self.emit(BootstrapProgress::PackageManagerResolved {
            manager,
            path: manager_path.clone(),
        });

        // Step 3
        self.emit(BootstrapProgress::CheckingInterpreter);
        let interpreter = self.check_interpreter(&path).await?;
        report.interpreter = Some(interpreter.clone());

        // Step 4
        self.emit(BootstrapProgress::Installing {
            package: package_spec.to_string(),
            manager,
        });
        self.install(manager, &manager_path, &interpreter, package_spec).await?;

        // Step 5
        self.emit(BootstrapProgress::Discovering);
        let interpreter = Some(interpreter.as_path());
        let mut discovery =
            match discover(&self.host, &self.options, &path, interpreter, executable).await {
                Ok(discovery) => discovery,
                Err(searched) => {
                    tracing::warn!(
                        executable,
                        searched = searched.len(),
                        "installed executable not found"
                    );
                    return Ok(InstallOutcome::NotFoundAfterInstall { searched });
                }
            };
        // Directories this run added to the search path are not on the user's PATH.
        if discovery.source == DiscoverySource::OnPath
            && !user_path.contains(&discovery.directory)
        {
            discovery.source = DiscoverySource::Candidate;
        }
        tracing::info!(
            executable = %discovery.executable.display(),
            source = ?discovery.source,
            "executable located"
        );

        // Step 6
        if discovery.source.needs_registration() {
            let (records, failures) = self.register(&discovery.directory);
            report.registrations = records;
            report.registration_failures = failures;
            if report.registrations.is_empty() {
                tracing::warn!(
                    dir = %discovery.directory.display(),
                    "no shell configuration file could be updated"
                );
                return Ok(InstallOutcome::Unverified {
                    executable: discovery.executable,
                });
            }
            path.prepend(discovery.directory.clone());
        }

        // Step 7
        self.emit(BootstrapProgress::Verifying);
        Ok(self.verify(&path, executable, &discovery).await)
    }

    fn emit(&self, progress: BootstrapProgress) {
        tracing::debug!(stage = progress.description(), "progress");
        if let Some(callback) = &self.on_progress {
            callback(progress);
        }
    }

    fn check_platform(&self) -> Result<(), BootstrapError> {
        let detected = self.host.os();
        let check = PlatformCheck::evaluate(&detected, &self.options.supported_os);
        if check.is_supported() {
            tracing::info!(reason = %check.reason, "platform check passed");
            return Ok(());
        }
        Err(BootstrapError::UnsupportedPlatform {
            detected,
            supported: self.options.supported_os.clone(),
            fix: format!("{}; run this installer on that system instead", check.reason),
        })
    }

    async fn resolve_package_manager(
        &self,
        path: &mut SearchPath,
    ) -> Result<(PackageManager, PathBuf), BootstrapError> {
        if let Some(explicit) = &self.options.package_manager_override {
            if is_executable_file(explicit) {
                let manager = PackageManager::from_executable(explicit);
                tracing::info!(
                    path = %explicit.display(),
                    ?manager,
                    "using package manager override"
                );
                return Ok((manager, explicit.clone()));
            }
            tracing::warn!(
                path = %explicit.display(),
                "package manager override is not an executable file, ignoring"
            );
        }

        if let Some(found) = self.lookup_manager(PackageManager::Uv, path) {
            return Ok((PackageManager::Uv, found));
        }

        if self.host.confirm("uv is not installed. Install it now?") {
            if let Some(found) = self.install_uv(path).await {
                return Ok((PackageManager::Uv, found));
            }
        } else {
            tracing::info!("uv install declined");
        }

        if let Some(found) = self.lookup_manager(PackageManager::Pip, path) {
            tracing::info!(path = %found.display(), "falling back to pip");
            return Ok((PackageManager::Pip, found));
        }

        let tried: Vec<&str> = PackageManager::all()
            .flat_map(|m| m.executable_names().iter().copied())
            .collect();
        Err(BootstrapError::NoPackageManager {
            tried: tried.join(", "),
            fix: format!("Install uv first: {}", UV_INSTALLER_SCRIPT),
        })
    }

    fn lookup_manager(&self, manager: PackageManager, path: &SearchPath) -> Option<PathBuf> {
        ToolPresence::first_of(manager.executable_names(), path).and_then(|p| p.resolved_path)
    }

    /// Run the uv installer script, then look for uv where it puts it.
    async fn install_uv(&self, path: &mut SearchPath) -> Option<PathBuf> {
        let args = vec!["-c".to_string(), UV_INSTALLER_SCRIPT.to_string()];
        match self.host.run(Path::new("sh"), &args).await {
            Ok(output) if output.success() => {}
            Ok(output) => {
                tracing::warn!(
                    exit_code = ?output.exit_code,
                    output = output.diagnostics().trim(),
                    "uv installer failed"
                );
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not run uv installer");
                return None;
            }
        }

        if let Some(home) = self.host.home() {
            path.prepend(home.join(".cargo").join("bin"));
            path.prepend(home.join(".local").join("bin"));
        }
        let found = self.lookup_manager(PackageManager::Uv, path);
        if found.is_none() {
            tracing::warn!("uv installer succeeded but uv is not resolvable");
        }
        found
    }

    async fn check_interpreter(&self, path: &SearchPath) -> Result<PathBuf, BootstrapError> {
        let required = &self.options.min_interpreter;
        let Some(interpreter) =
            ToolPresence::first_of(INTERPRETER_NAMES, path).and_then(|p| p.resolved_path)
        else {
            return Err(BootstrapError::InterpreterNotFound {
                required: short(required),
                fix: format!(
                    "Install Python {}+ (for example: brew install python@3.12) and run again",
                    short(required)
                ),
            });
        };

        match probe_interpreter(&self.host, &interpreter).await {
            InterpreterProbe::Version(found) if meets_minimum(&found, required) => {
                tracing::info!(
                    interpreter = %interpreter.display(),
                    version = %found,
                    "interpreter accepted"
                );
                Ok(interpreter)
            }
            InterpreterProbe::Version(found) => Err(BootstrapError::VersionTooLow {
                fix: format!(
                    "Upgrade Python to {}+ (found {} at {})",
                    short(required),
                    short(&found),
                    interpreter.display()
                ),
                detected: found,
                required: required.clone(),
            }),
            InterpreterProbe::Unreadable(output) => {
                Err(BootstrapError::InterpreterVersionUnreadable {
                    output,
                    fix: format!(
                        "Check that `{} --version` prints a version",
                        interpreter.display()
                    ),
                })
            }
        }
    }

    async fn install(
        &self,
        manager: PackageManager,
        manager_path: &Path,
        interpreter: &Path,
        package_spec: &str,
    ) -> Result<(), BootstrapError> {
        // A looked-up pip runs as a module of the gated interpreter; an
        // explicit override runs as given.
        let explicit = self.options.package_manager_override.as_deref() == Some(manager_path);
        let module_args = if explicit {
            None
        } else {
            manager.module_install_args(package_spec)
        };
        let (program, args) = match module_args {
            Some(args) => (interpreter, args),
            None => (manager_path, manager.install_args(package_spec, interpreter)),
        };
        let manual = manager.manual_command(package_spec);

        let output = self
            .host
            .run(program, &args)
            .await
            .map_err(|e| BootstrapError::InstallCommandFailed {
                exit_code: None,
                output: e.to_string(),
                fix: format!(
                    "Could not start {}; run by hand: {}",
                    program.display(),
                    manual
                ),
            })?;

        if output.success() {
            tracing::info!(package = package_spec, "package installed");
            return Ok(());
        }

        let captured = output.diagnostics().to_string();
        let fix = if looks_like_network_error(&captured) {
            format!("Check your internet connection, then run: {}", manual)
        } else {
            format!("See the installer output above, then run: {}", manual)
        };
        Err(BootstrapError::InstallCommandFailed {
            exit_code: output.exit_code,
            output: captured,
            fix,
        })
    }

    /// Register `directory` in every shell file. Returns the records written
    /// and the files that could not be updated.
    fn register(&self, directory: &Path) -> (Vec<PathEditRecord>, Vec<PathBuf>) {
        let home = self.host.home();
        let mut records = Vec::new();
        let mut failures = Vec::new();
        for config in &self.options.shell_configs {
            let file = if config.is_absolute() {
                config.clone()
            } else if let Some(home) = &home {
                home.join(config)
            } else {
                tracing::warn!(file = %config.display(), "HOME is not set, skipping");
                failures.push(config.clone());
                continue;
            };
            match register_path(&file, directory) {
                Ok(record) => {
                    self.emit(BootstrapProgress::RegisteredPath {
                        config_file: record.config_file_path.clone(),
                        already_present: record.already_present,
                    });
                    records.push(record);
                }
                Err(e) => {
                    tracing::warn!(
                        file = %file.display(),
                        error = %e,
                        "could not update shell configuration"
                    );
                    failures.push(file);
                }
            }
        }
        (records, failures)
    }

    async fn verify(
        &self,
        path: &SearchPath,
        executable: &str,
        discovery: &Discovery,
    ) -> InstallOutcome {
        let Some(resolved) = path.lookup(executable) else {
            tracing::warn!(executable, "executable does not resolve after registration");
            return InstallOutcome::Unverified {
                executable: discovery.executable.clone(),
            };
        };
        let version = probe_tool_version(&self.host, &resolved)
            .await
            .map_or_else(|| "unknown".to_string(), |v| v.to_string());
        InstallOutcome::Success {
            executable: resolved,
            version,
        }
    }
}

fn looks_like_network_error(output: &str) -> bool {
    let lower = output.to_ascii_lowercase();
    ["network", "connection", "resolve", "timed out", "unreachable"]
        .iter()
        .any(|needle| lower.contains(needle))
}
