//! Package manager enum and the install commands each one runs.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::IntoEnumIterator;

/// A package manager that can install a Python package.
///
/// Variants are declared in priority order: [`PackageManager::all`] yields
/// the preferred manager first, then the fallback.
///
/// # Example
///
/// ```rust
/// use mcp_bootstrap::PackageManager;
///
/// for manager in PackageManager::all() {
///     println!("{}: {:?}", manager.display_name(), manager.executable_names());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
#[non_exhaustive]
pub enum PackageManager {
    /// Astral's uv (preferred). Installs the package as an isolated tool.
    Uv,
    /// pip (fallback). Installs into the user site.
    Pip,
}

impl PackageManager {
    /// Executable names to look up, in order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mcp_bootstrap::PackageManager;
    ///
    /// assert_eq!(PackageManager::Uv.executable_names(), &["uv"]);
    /// assert_eq!(PackageManager::Pip.executable_names(), &["pip3", "pip"]);
    /// ```
    pub fn executable_names(&self) -> &'static [&'static str] {
        match self {
            Self::Uv => &["uv"],
            Self::Pip => &["pip3", "pip"],
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Uv => "uv",
            Self::Pip => "pip",
        }
    }

    /// Iterator over all managers, preferred first.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }

    /// Infer the manager kind from an executable path.
    ///
    /// File names starting with `pip` are pip; anything else is treated as uv.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mcp_bootstrap::PackageManager;
    /// use std::path::Path;
    ///
    /// let pip = PackageManager::from_executable(Path::new("/opt/bin/pip3.12"));
    /// assert_eq!(pip, PackageManager::Pip);
    /// let uv = PackageManager::from_executable(Path::new("/opt/bin/uv"));
    /// assert_eq!(uv, PackageManager::Uv);
    /// ```
    pub fn from_executable(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if name.starts_with("pip") {
            Self::Pip
        } else {
            Self::Uv
        }
    }

    /// Arguments that install `package_spec` with this manager.
    ///
    /// uv pins the tool environment to the interpreter that passed the
    /// version gate.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mcp_bootstrap::PackageManager;
    /// use std::path::Path;
    ///
    /// let args = PackageManager::Pip.install_args("pyapple-mcp", Path::new("/usr/bin/python3"));
    /// assert_eq!(args, vec!["install", "--user", "pyapple-mcp"]);
    /// ```
    pub fn install_args(&self, package_spec: &str, interpreter: &Path) -> Vec<String> {
        match self {
            Self::Uv => vec![
                "tool".to_string(),
                "install".to_string(),
                "--python".to_string(),
                interpreter.display().to_string(),
                package_spec.to_string(),
            ],
            Self::Pip => vec![
                "install".to_string(),
                "--user".to_string(),
                package_spec.to_string(),
            ],
        }
    }

    /// Arguments that install `package_spec` through the interpreter's own
    /// module (`python -m <module>`), for managers that ship one.
    ///
    /// The package lands in that interpreter's user site, not in the site
    /// of whichever pip comes first on PATH.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mcp_bootstrap::PackageManager;
    ///
    /// let args = PackageManager::Pip.module_install_args("pyapple-mcp");
    /// assert_eq!(args.unwrap(), vec!["-m", "pip", "install", "--user", "pyapple-mcp"]);
    /// assert!(PackageManager::Uv.module_install_args("pyapple-mcp").is_none());
    /// ```
    pub fn module_install_args(&self, package_spec: &str) -> Option<Vec<String>> {
        match self {
            Self::Uv => None,
            Self::Pip => Some(
                ["-m", "pip", "install", "--user", package_spec]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        }
    }

    /// Copy-pasteable install command for manual guidance.
    pub fn manual_command(&self, package_spec: &str) -> String {
        match self {
            Self::Uv => format!("uv tool install {}", package_spec),
            Self::Pip => format!("python3 -m pip install --user {}", package_spec),
        }
    }
}

/// Shell command that installs uv via its official installer.
pub(crate) const UV_INSTALLER_SCRIPT: &str = "curl -LsSf https://astral.sh/uv/install.sh | sh";
