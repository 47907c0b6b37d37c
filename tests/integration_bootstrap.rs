//! End-to-end runs of the bootstrapper against a scripted host.

#![cfg(unix)]

use mcp_bootstrap::{
    manual_steps, registration_steps, BootstrapError, BootstrapOptions, BootstrapProgress,
    Bootstrapper, CommandOutput, DiscoverySource, Host, InstallOutcome, PackageManager, MARKER,
};
use std::collections::HashMap;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn(&str, &[String]) -> io::Result<CommandOutput> + Send + Sync>;

/// A host whose subprocesses are answered by a closure keyed on program name.
struct FakeHost {
    os: String,
    vars: HashMap<String, String>,
    answer: bool,
    responder: Responder,
    calls: Mutex<Vec<(String, Vec<String>)>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeHost {
    fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Host for FakeHost {
    fn os(&self) -> String {
        self.os.clone()
    }

    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    async fn run(&self, program: &Path, args: &[String]) -> io::Result<CommandOutput> {
        let name = program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls.lock().unwrap().push((name.clone(), args.to_vec()));
        (self.responder)(&name, args)
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

/// A temporary machine: a home directory and one directory on PATH.
struct Machine {
    _tmp: tempfile::TempDir,
    root: PathBuf,
    home: PathBuf,
    sysbin: PathBuf,
}

impl Machine {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let home = root.join("home");
        let sysbin = root.join("sysbin");
        std::fs::create_dir_all(&home).unwrap();
        std::fs::create_dir_all(&sysbin).unwrap();
        Self {
            _tmp: tmp,
            root,
            home,
            sysbin,
        }
    }

    fn host<F>(&self, os: &str, answer: bool, responder: F) -> FakeHost
    where
        F: Fn(&str, &[String]) -> io::Result<CommandOutput> + Send + Sync + 'static,
    {
        let mut vars = HashMap::new();
        vars.insert("HOME".to_string(), self.home.display().to_string());
        vars.insert("PATH".to_string(), self.sysbin.display().to_string());
        FakeHost {
            os: os.to_string(),
            vars,
            answer,
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn options(&self) -> BootstrapOptions {
        BootstrapOptions {
            candidate_dirs: vec![
                "{home}/.local/bin".to_string(),
                "{home}/Library/Python/*/bin".to_string(),
                "{venv}/bin".to_string(),
            ],
            search_roots: vec!["{home}".to_string()],
            search_depth: 6,
            ..Default::default()
        }
    }

    fn rc(&self, name: &str) -> PathBuf {
        self.home.join(name)
    }
}

fn make_executable(dir: &Path, name: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn line_count(path: &Path) -> usize {
    std::fs::read_to_string(path).unwrap().lines().count()
}

/// Python 3.12, a working install, and a tool that reports 1.0.0.
fn healthy(name: &str, args: &[String]) -> io::Result<CommandOutput> {
    match (name, args.first().map(String::as_str)) {
        ("python3", Some("--version")) => Ok(CommandOutput::ok("Python 3.12.1\n")),
        ("python3", Some("-c")) => Ok(CommandOutput::ok("")),
        ("pyapple-mcp", Some("--version")) => Ok(CommandOutput::ok("pyapple-mcp 1.0.0\n")),
        _ => Ok(CommandOutput::ok("")),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_unsupported_platform_runs_nothing() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");

    for os in ["linux", "windows", "freebsd", "android", ""] {
        let host = machine.host(os, true, healthy);
        let bootstrapper = Bootstrapper::new(host, machine.options());
        let outcome = bootstrapper.run("pyapple-mcp", "pyapple-mcp").await;

        assert!(
            matches!(
                outcome,
                InstallOutcome::Failed(BootstrapError::UnsupportedPlatform { .. })
            ),
            "{os:?}: {outcome:?}"
        );
        assert!(bootstrapper.host().calls().is_empty());
        assert!(bootstrapper.host().prompts().is_empty());
    }
    assert!(!machine.rc(".zshrc").exists());
}

#[tokio::test(flavor = "current_thread")]
async fn test_missing_interpreter_names_minimum() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");

    let bootstrapper = Bootstrapper::new(machine.host("macos", false, healthy), machine.options());
    let outcome = bootstrapper.run("pyapple-mcp", "pyapple-mcp").await;

    let error = outcome.error().expect("run should fail");
    assert!(matches!(error, BootstrapError::InterpreterNotFound { .. }));
    assert!(error.to_string().contains("3.9"));
    assert!(outcome.is_fatal());
    assert!(bootstrapper.host().calls().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn test_old_interpreter_is_rejected() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");

    let host = machine.host("macos", false, |name, args| match name {
        "python3" if args[0] == "--version" => Ok(CommandOutput::ok("Python 3.8.18")),
        _ => Ok(CommandOutput::ok("")),
    });
    let bootstrapper = Bootstrapper::new(host, machine.options());
    let outcome = bootstrapper.run("pyapple-mcp", "pyapple-mcp").await;

    match outcome {
        InstallOutcome::Failed(BootstrapError::VersionTooLow {
            detected, required, ..
        }) => {
            assert_eq!((detected.major, detected.minor), (3, 8));
            assert_eq!((required.major, required.minor), (3, 9));
        }
        other => panic!("expected VersionTooLow, got {other:?}"),
    }
    // Only the version probe ran, never the install.
    assert_eq!(bootstrapper.host().calls().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn test_python_3_10_passes_the_gate() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");

    let host = machine.host("macos", false, |name, args| match name {
        "python3" if args[0] == "--version" => Ok(CommandOutput::ok("Python 3.10.0")),
        "uv" => Ok(CommandOutput::failed(2, "stop here")),
        _ => Ok(CommandOutput::ok("")),
    });
    let bootstrapper = Bootstrapper::new(host, machine.options());
    let outcome = bootstrapper.run("pyapple-mcp", "pyapple-mcp").await;

    assert!(matches!(
        outcome,
        InstallOutcome::Failed(BootstrapError::InstallCommandFailed { exit_code: Some(2), .. })
    ));
}

#[tokio::test(flavor = "current_thread")]
async fn test_install_failure_is_surfaced_verbatim() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");

    let host = machine.host("macos", false, |name, args| match name {
        "uv" => Ok(CommandOutput::failed(1, "network error")),
        _ => healthy(name, args),
    });
    let bootstrapper = Bootstrapper::new(host, machine.options());
    let outcome = bootstrapper.run("pyapple-mcp", "pyapple-mcp").await;

    match &outcome {
        InstallOutcome::Failed(BootstrapError::InstallCommandFailed {
            exit_code, output, fix,
        }) => {
            assert_eq!(*exit_code, Some(1));
            assert_eq!(output, "network error");
            assert!(fix.contains("internet connection"));
        }
        other => panic!("expected InstallCommandFailed, got {other:?}"),
    }
    assert!(outcome.is_fatal());

    let installs: Vec<_> = bootstrapper
        .host()
        .calls()
        .into_iter()
        .filter(|(name, _)| name == "uv")
        .collect();
    assert_eq!(installs.len(), 1, "install must not be retried");
    assert_eq!(installs[0].1[..2], ["tool".to_string(), "install".to_string()]);
    assert_eq!(installs[0].1.last().map(String::as_str), Some("pyapple-mcp"));
}

#[tokio::test(flavor = "current_thread")]
async fn test_non_default_directory_is_registered_once() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");
    std::fs::write(machine.rc(".zshrc"), "alias g=git\n").unwrap();

    let target = machine.home.join("Library/Python/3.12/bin");
    let install_target = target.clone();
    let host = machine.host("macos", false, move |name, args| {
        if name == "uv" {
            make_executable(&install_target, "pyapple-mcp");
        }
        healthy(name, args)
    });
    let bootstrapper = Bootstrapper::new(host, machine.options());

    let report = bootstrapper.run_with_report("pyapple-mcp", "pyapple-mcp").await;
    assert_eq!(
        report.outcome,
        InstallOutcome::Success {
            executable: target.join("pyapple-mcp"),
            version: "1.0.0".to_string(),
        }
    );
    assert_eq!(report.manager, Some(PackageManager::Uv));
    assert_eq!(report.registrations.len(), 3);
    assert!(report.registrations.iter().all(|r| !r.already_present));

    assert_eq!(line_count(&machine.rc(".zshrc")), 2);
    assert_eq!(line_count(&machine.rc(".bash_profile")), 1);
    assert_eq!(line_count(&machine.rc(".bashrc")), 1);
    let zshrc = std::fs::read_to_string(machine.rc(".zshrc")).unwrap();
    assert!(zshrc.contains(&format!("export PATH=\"{}:$PATH\"", target.display())));
    assert!(zshrc.contains(MARKER));

    // A second run finds the same directory and writes nothing new.
    let report = bootstrapper.run_with_report("pyapple-mcp", "pyapple-mcp").await;
    assert!(report.outcome.is_success());
    assert!(report.registrations.iter().all(|r| r.already_present));
    assert_eq!(line_count(&machine.rc(".zshrc")), 2);
    assert_eq!(line_count(&machine.rc(".bash_profile")), 1);
    assert_eq!(line_count(&machine.rc(".bashrc")), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn test_first_candidate_directory_wins() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");
    make_executable(&machine.home.join("Library/Python/3.11/bin"), "pyapple-mcp");
    let expected = make_executable(&machine.home.join(".local/bin"), "pyapple-mcp");

    let bootstrapper = Bootstrapper::new(machine.host("macos", false, healthy), machine.options());
    let outcome = bootstrapper.run("pyapple-mcp", "pyapple-mcp").await;

    assert_eq!(outcome.executable(), Some(expected.as_path()));
}

#[tokio::test(flavor = "current_thread")]
async fn test_executable_already_on_path_skips_registration() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");
    let expected = make_executable(&machine.sysbin, "pyapple-mcp");

    let bootstrapper = Bootstrapper::new(machine.host("macos", false, healthy), machine.options());
    let report = bootstrapper.run_with_report("pyapple-mcp", "pyapple-mcp").await;

    assert_eq!(
        report.outcome,
        InstallOutcome::Success {
            executable: expected,
            version: "1.0.0".to_string(),
        }
    );
    assert!(report.registrations.is_empty());
    assert!(!machine.rc(".zshrc").exists());
}

#[tokio::test(flavor = "current_thread")]
async fn test_missing_executable_degrades_to_guidance() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");

    let bootstrapper = Bootstrapper::new(machine.host("macos", false, healthy), machine.options());
    let outcome = bootstrapper.run("pyapple-mcp", "pyapple-mcp").await;

    let InstallOutcome::NotFoundAfterInstall { searched } = &outcome else {
        panic!("expected NotFoundAfterInstall, got {outcome:?}");
    };
    assert!(searched.contains(&machine.sysbin));
    assert!(searched.contains(&machine.home));
    assert!(!outcome.is_fatal());

    let steps = manual_steps(&outcome, "pyapple-mcp", "pyapple-mcp", PackageManager::Uv);
    assert!(steps.iter().any(|s| s.contains("uv tool install pyapple-mcp")));
    assert!(steps.iter().any(|s| s.contains("export PATH=")));
    assert!(!machine.rc(".zshrc").exists());
}

#[tokio::test(flavor = "current_thread")]
async fn test_interpreter_scripts_directory_is_used() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");
    let framework = machine.root.join("Frameworks/Python.framework/Versions/3.12/bin");
    let expected = make_executable(&framework, "pyapple-mcp");

    let scripts = framework.display().to_string();
    let host = machine.host("macos", false, move |name, args| {
        match (name, args[0].as_str()) {
            ("python3", "-c") => Ok(CommandOutput::ok(format!("{scripts}\n{scripts}\n"))),
            _ => healthy(name, args),
        }
    });
    let bootstrapper = Bootstrapper::new(host, machine.options());
    let report = bootstrapper.run_with_report("pyapple-mcp", "pyapple-mcp").await;

    assert_eq!(report.outcome.executable(), Some(expected.as_path()));
    assert_eq!(report.registrations.len(), 3);
    assert!(report
        .registrations
        .iter()
        .all(|r| r.directory == framework));
}

#[tokio::test(flavor = "current_thread")]
async fn test_site_packages_bin_is_searched() {
    let machine = Machine::new();
    let scripts = machine.root.join("framework/bin");
    let user_scripts = machine.root.join("user/bin");
    let site_bin = machine.root.join("site-packages/bin");
    let expected = make_executable(&site_bin, "pyapple-mcp");

    let reply = format!(
        "{}\n{}\n{}\n",
        scripts.display(),
        user_scripts.display(),
        site_bin.display()
    );
    let host = machine.host("macos", false, move |_, _| Ok(CommandOutput::ok(reply.clone())));
    let options = BootstrapOptions {
        search_roots: Vec::new(),
        ..machine.options()
    };
    let path = mcp_bootstrap::SearchPath::new(vec![machine.sysbin.clone()]);
    let python = machine.sysbin.join("python3");
    let interpreter = Some(python.as_path());

    let discovery = mcp_bootstrap::discover(&host, &options, &path, interpreter, "pyapple-mcp")
        .await
        .unwrap();
    assert_eq!(discovery.executable, expected);
    assert_eq!(discovery.source, DiscoverySource::Interpreter);
    assert!(host.calls()[0].1[1].contains("getsitepackages"));
}

#[tokio::test(flavor = "current_thread")]
async fn test_filesystem_walk_is_last_resort() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");
    let hidden = machine.home.join("tools/mcp/bin");
    let expected = make_executable(&hidden, "pyapple-mcp");

    let bootstrapper = Bootstrapper::new(machine.host("macos", false, healthy), machine.options());
    let outcome = bootstrapper.run("pyapple-mcp", "pyapple-mcp").await;

    assert_eq!(outcome.executable(), Some(expected.as_path()));
    let zshrc = std::fs::read_to_string(machine.rc(".zshrc")).unwrap();
    assert!(zshrc.contains(&hidden.display().to_string()));
}

#[tokio::test(flavor = "current_thread")]
async fn test_unparseable_version_reports_unknown() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");
    make_executable(&machine.sysbin, "pyapple-mcp");

    let host = machine.host("macos", false, |name, args| match name {
        "pyapple-mcp" => Ok(CommandOutput::failed(2, "usage: pyapple-mcp [-h]")),
        _ => healthy(name, args),
    });
    let bootstrapper = Bootstrapper::new(host, machine.options());
    let outcome = bootstrapper.run("pyapple-mcp", "pyapple-mcp").await;

    assert!(matches!(
        outcome,
        InstallOutcome::Success { ref version, .. } if version == "unknown"
    ));
}

#[tokio::test(flavor = "current_thread")]
async fn test_declined_uv_falls_back_to_pip() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "pip3");
    make_executable(&machine.sysbin, "python3");
    make_executable(&machine.sysbin, "pyapple-mcp");

    let bootstrapper = Bootstrapper::new(machine.host("macos", false, healthy), machine.options());
    let report = bootstrapper.run_with_report("pyapple-mcp", "pyapple-mcp").await;

    assert!(report.outcome.is_success());
    assert_eq!(report.manager, Some(PackageManager::Pip));
    assert_eq!(bootstrapper.host().prompts().len(), 1);

    let calls = bootstrapper.host().calls();
    assert!(
        calls.iter().all(|(name, _)| name != "sh"),
        "declined prompt must not run the uv installer"
    );
    // pip runs as a module of the interpreter that passed the version gate.
    assert!(calls.iter().all(|(name, _)| name != "pip3"));
    let install = calls
        .iter()
        .find(|(name, args)| name == "python3" && args[0] == "-m")
        .unwrap();
    assert_eq!(install.1, vec!["-m", "pip", "install", "--user", "pyapple-mcp"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_no_package_manager_is_fatal() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "python3");

    let bootstrapper = Bootstrapper::new(machine.host("macos", false, healthy), machine.options());
    let outcome = bootstrapper.run("pyapple-mcp", "pyapple-mcp").await;

    match outcome {
        InstallOutcome::Failed(BootstrapError::NoPackageManager { tried, .. }) => {
            assert_eq!(tried, "uv, pip3, pip");
        }
        other => panic!("expected NoPackageManager, got {other:?}"),
    }
    assert!(bootstrapper.host().calls().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn test_accepted_uv_install_is_used() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "python3");
    make_executable(&machine.sysbin, "pyapple-mcp");

    let uv_home = machine.home.join(".local/bin");
    let host = machine.host("macos", true, move |name, args| {
        if name == "sh" {
            make_executable(&uv_home, "uv");
        }
        healthy(name, args)
    });
    let bootstrapper = Bootstrapper::new(host, machine.options());
    let report = bootstrapper.run_with_report("pyapple-mcp", "pyapple-mcp").await;

    assert!(report.outcome.is_success());
    assert_eq!(report.manager, Some(PackageManager::Uv));
    let calls = bootstrapper.host().calls();
    assert_eq!(calls[0].0, "sh");
    assert!(calls[0].1[1].contains("astral.sh/uv/install.sh"));
    assert!(calls.iter().any(|(name, _)| name == "uv"));
}

#[tokio::test(flavor = "current_thread")]
async fn test_tool_installed_next_to_fresh_uv_is_registered() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "python3");

    let local_bin = machine.home.join(".local/bin");
    let bin = local_bin.clone();
    let host = machine.host("macos", true, move |name, args| {
        match name {
            "sh" => {
                make_executable(&bin, "uv");
            }
            "uv" => {
                make_executable(&bin, "pyapple-mcp");
            }
            _ => {}
        }
        healthy(name, args)
    });
    let bootstrapper = Bootstrapper::new(host, machine.options());
    let report = bootstrapper.run_with_report("pyapple-mcp", "pyapple-mcp").await;

    assert_eq!(
        report.outcome,
        InstallOutcome::Success {
            executable: local_bin.join("pyapple-mcp"),
            version: "1.0.0".to_string(),
        }
    );
    assert_eq!(report.registrations.len(), 3);
    assert!(report.registrations.iter().all(|r| r.directory == local_bin));
    let zshrc = std::fs::read_to_string(machine.rc(".zshrc")).unwrap();
    assert!(zshrc.contains(&format!("export PATH=\"{}:$PATH\"", local_bin.display())));
}

#[tokio::test(flavor = "current_thread")]
async fn test_unwritable_shell_files_leave_run_unverified() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");
    for rc in [".zshrc", ".bash_profile", ".bashrc"] {
        std::fs::create_dir_all(machine.rc(rc)).unwrap();
    }

    let target = machine.home.join("Library/Python/3.12/bin");
    let install_target = target.clone();
    let host = machine.host("macos", false, move |name, args| {
        if name == "uv" {
            make_executable(&install_target, "pyapple-mcp");
        }
        healthy(name, args)
    });
    let bootstrapper = Bootstrapper::new(host, machine.options());
    let report = bootstrapper.run_with_report("pyapple-mcp", "pyapple-mcp").await;

    assert_eq!(
        report.outcome,
        InstallOutcome::Unverified {
            executable: target.join("pyapple-mcp"),
        }
    );
    assert!(!report.outcome.is_fatal());
    assert!(report.registrations.is_empty());
    assert_eq!(report.registration_failures.len(), 3);

    let steps = registration_steps(&report.registration_failures, &target);
    assert_eq!(steps.len(), 3);
    assert!(steps[0].ends_with(&format!(">> {}", machine.rc(".zshrc").display())));
    assert!(steps
        .iter()
        .all(|s| s.contains(&format!("export PATH=\"{}:$PATH\"", target.display()))));
}

#[tokio::test(flavor = "current_thread")]
async fn test_partial_registration_failure_is_reported() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");
    std::fs::create_dir_all(machine.rc(".bashrc")).unwrap();
    let target = machine.home.join(".local/bin");
    make_executable(&target, "pyapple-mcp");

    let bootstrapper = Bootstrapper::new(machine.host("macos", false, healthy), machine.options());
    let report = bootstrapper.run_with_report("pyapple-mcp", "pyapple-mcp").await;

    assert!(report.outcome.is_success());
    assert_eq!(report.registrations.len(), 2);
    assert_eq!(report.registration_failures, vec![machine.rc(".bashrc")]);
    assert_eq!(line_count(&machine.rc(".zshrc")), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn test_failed_uv_install_falls_back_to_pip() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "pip");
    make_executable(&machine.sysbin, "python3");
    make_executable(&machine.sysbin, "pyapple-mcp");

    let host = machine.host("macos", true, |name, args| match name {
        "sh" => Ok(CommandOutput::failed(7, "curl: (7) Failed to connect")),
        _ => healthy(name, args),
    });
    let bootstrapper = Bootstrapper::new(host, machine.options());
    let report = bootstrapper.run_with_report("pyapple-mcp", "pyapple-mcp").await;

    assert!(report.outcome.is_success());
    assert_eq!(report.manager, Some(PackageManager::Pip));
}

#[tokio::test(flavor = "current_thread")]
async fn test_package_manager_override() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");
    make_executable(&machine.sysbin, "pyapple-mcp");
    let custom_pip = make_executable(&machine.root.join("custom"), "pip3.12");

    let options = mcp_bootstrap::BootstrapOptions {
        package_manager_override: Some(custom_pip.clone()),
        ..machine.options()
    };
    let bootstrapper = Bootstrapper::new(machine.host("macos", false, healthy), options);
    let report = bootstrapper.run_with_report("pyapple-mcp", "pyapple-mcp").await;

    assert!(report.outcome.is_success());
    assert_eq!(report.manager, Some(PackageManager::Pip));
    assert!(bootstrapper.host().calls().iter().any(|(name, _)| name == "pip3.12"));
    assert!(bootstrapper.host().prompts().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn test_missing_override_is_ignored() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");
    make_executable(&machine.sysbin, "pyapple-mcp");

    let options = BootstrapOptions {
        package_manager_override: Some(machine.root.join("nope/uv")),
        ..machine.options()
    };
    let bootstrapper = Bootstrapper::new(machine.host("macos", false, healthy), options);
    let report = bootstrapper.run_with_report("pyapple-mcp", "pyapple-mcp").await;

    assert!(report.outcome.is_success());
    assert_eq!(report.manager, Some(PackageManager::Uv));
}

#[tokio::test(flavor = "current_thread")]
async fn test_progress_stages_order() {
    let machine = Machine::new();
    make_executable(&machine.sysbin, "uv");
    make_executable(&machine.sysbin, "python3");
    let target = machine.home.join(".local/bin");
    let install_target = target.clone();
    let host = machine.host("macos", false, move |name, args| {
        if name == "uv" {
            make_executable(&install_target, "pyapple-mcp");
        }
        healthy(name, args)
    });

    let stages = Arc::new(Mutex::new(Vec::new()));
    let sink = stages.clone();
    let bootstrapper = Bootstrapper::new(host, machine.options()).on_progress(move |p| {
        sink.lock().unwrap().push(p);
    });
    let outcome = bootstrapper.run("pyapple-mcp", "pyapple-mcp").await;
    assert!(outcome.is_success());

    let stages = stages.lock().unwrap();
    let names: Vec<_> = stages.iter().map(|p| p.description()).collect();
    assert_eq!(
        names,
        vec![
            "Checking operating system",
            "Resolving package manager",
            "Package manager ready",
            "Checking Python version",
            "Installing package",
            "Locating executable",
            "Updating shell configuration",
            "Updating shell configuration",
            "Updating shell configuration",
            "Verifying installation",
        ]
    );
    assert!(matches!(
        stages[2],
        BootstrapProgress::PackageManagerResolved { manager: PackageManager::Uv, .. }
    ));
}

#[tokio::test(flavor = "current_thread")]
async fn test_discover_reports_source() {
    let machine = Machine::new();
    let expected = make_executable(&machine.home.join(".local/bin"), "pyapple-mcp");
    let host = machine.host("macos", false, healthy);
    let path = mcp_bootstrap::SearchPath::new(vec![machine.sysbin.clone()]);

    let discovery =
        mcp_bootstrap::discover(&host, &machine.options(), &path, None, "pyapple-mcp")
            .await
            .unwrap();
    assert_eq!(discovery.executable, expected);
    assert_eq!(discovery.source, DiscoverySource::Candidate);
    assert!(host.calls().is_empty());
}
