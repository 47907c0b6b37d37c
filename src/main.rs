//! `mcp-bootstrap` command line entry point.

use clap::Parser;
use mcp_bootstrap::{
    client_config_path, client_config_snippet, manual_steps, permissions_notice,
    registration_steps, BootstrapOptions, BootstrapProgress, BootstrapReport, Bootstrapper, Host,
    InstallOutcome, PackageManager, SystemHost,
};
use owo_colors::OwoColorize;
use semver::Version;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Install a Python-packaged MCP server and put it on PATH.
#[derive(Debug, Parser)]
#[command(name = "mcp-bootstrap", version, about)]
struct Cli {
    /// Package specification handed to the package manager.
    #[arg(long, env = "MCP_BOOTSTRAP_PACKAGE", default_value = "pyapple-mcp")]
    package: String,

    /// Executable the package installs.
    #[arg(long, env = "MCP_BOOTSTRAP_EXECUTABLE", default_value = "pyapple-mcp")]
    executable: String,

    /// Use this package manager binary instead of looking one up.
    #[arg(long, env = "MCP_BOOTSTRAP_PACKAGE_MANAGER")]
    package_manager: Option<PathBuf>,

    /// Server name used in the printed client configuration.
    #[arg(long, default_value = "pyapple")]
    server_name: String,

    /// Minimum Python version, as MAJOR.MINOR.
    #[arg(long, default_value = "3.9", value_parser = parse_min_python)]
    min_python: Version,

    /// Answer yes to the package manager install prompt.
    #[arg(short = 'y', long)]
    yes: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_min_python(value: &str) -> Result<Version, String> {
    let (major, minor) = value
        .split_once('.')
        .ok_or_else(|| format!("expected MAJOR.MINOR, got {value:?}"))?;
    let major = major.parse().map_err(|_| format!("invalid major version in {value:?}"))?;
    let minor = minor.parse().map_err(|_| format!("invalid minor version in {value:?}"))?;
    Ok(Version::new(major, minor, 0))
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_progress(progress: BootstrapProgress) {
    match &progress {
        BootstrapProgress::PackageManagerResolved { manager, path } => println!(
            "{} Using {} at {}",
            "✓".green(),
            manager.display_name(),
            path.display()
        ),
        BootstrapProgress::Installing { package, manager } => println!(
            "{} Installing {} with {}...",
            "•".cyan(),
            package.bold(),
            manager.display_name()
        ),
        BootstrapProgress::RegisteredPath {
            config_file,
            already_present: true,
        } => println!(
            "{} PATH already configured in {}",
            "✓".green(),
            config_file.display()
        ),
        BootstrapProgress::RegisteredPath { config_file, .. } => println!(
            "{} Added PATH export to {}",
            "✓".green(),
            config_file.display()
        ),
        other => println!("{} {}...", "•".cyan(), other.description()),
    }
}

/// Process exit status for a finished run: only fatal outcomes fail.
fn exit_status(outcome: &InstallOutcome) -> u8 {
    if outcome.is_fatal() {
        1
    } else {
        0
    }
}

fn print_report(cli: &Cli, report: &BootstrapReport, home: Option<PathBuf>) {
    let manager = report.manager.unwrap_or(PackageManager::Uv);
    let steps = manual_steps(&report.outcome, &cli.package, &cli.executable, manager);

    match &report.outcome {
        InstallOutcome::Success { executable, version } => {
            println!();
            println!(
                "{} {} {} is ready at {}",
                "✓".green().bold(),
                cli.executable.bold(),
                version,
                executable.display()
            );
            if !report.registrations.is_empty() {
                println!(
                    "  Open a new terminal (or run {}) to pick up the PATH change.",
                    "source ~/.zshrc".bold()
                );
            }
            if let Some(directory) = executable.parent() {
                let missed = registration_steps(&report.registration_failures, directory);
                if !missed.is_empty() {
                    println!("{} Some shell files could not be updated.", "!".yellow().bold());
                    print_steps(&missed);
                }
            }
            print_integration(cli, home);
        }
        InstallOutcome::NotFoundAfterInstall { searched } => {
            println!();
            println!(
                "{} {} was installed but could not be found ({} directories searched).",
                "!".yellow().bold(),
                cli.executable,
                searched.len()
            );
            print_steps(&steps);
        }
        InstallOutcome::Unverified { executable } => {
            println!();
            println!(
                "{} Found {} but it is not on PATH yet.",
                "!".yellow().bold(),
                executable.display()
            );
            let directory = executable.parent().unwrap_or(Path::new("/"));
            let missed = registration_steps(&report.registration_failures, directory);
            print_steps(if missed.is_empty() { &steps } else { &missed });
        }
        InstallOutcome::Failed(error) => {
            eprintln!("{} {}", "✗".red().bold(), error.red());
            for step in &steps {
                eprintln!("  {}", step);
            }
        }
        other => {
            eprintln!("{} Unexpected outcome: {:?}", "✗".red().bold(), other);
        }
    }
}

fn print_steps(steps: &[String]) {
    println!("{}", "Finish the setup by hand:".bold());
    for (i, step) in steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}

fn print_integration(cli: &Cli, home: Option<PathBuf>) {
    println!();
    println!("{}", "macOS permissions".bold());
    for line in permissions_notice() {
        println!("  - {}", line);
    }
    println!();
    println!(
        "{} {}",
        "Add this to".bold(),
        client_config_path(home.as_deref()).display()
    );
    println!("{}", client_config_snippet(&cli.server_name, &cli.executable));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = BootstrapOptions {
        min_interpreter: cli.min_python.clone(),
        package_manager_override: cli.package_manager.clone(),
        ..Default::default()
    };
    let host = SystemHost::new().assume_yes(cli.yes);
    let home = host.home();

    let bootstrapper = Bootstrapper::new(host, options).on_progress(print_progress);
    let report = bootstrapper
        .run_with_report(&cli.package, &cli.executable)
        .await;

    print_report(&cli, &report, home);
    ExitCode::from(exit_status(&report.outcome))
}
