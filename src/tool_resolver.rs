//! # Optimizer Path Resolver
//!
//! This module finds the optimizer executable:
//! - Explicit path from `--optimizer`, `SSC_OPTIMIZER` or the settings file
//! - System `PATH`
//! - `~/.cargo/bin`, where `cargo install oxipng` puts it

use crate::error::CompressError;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the wrapped optimizer
pub const OPTIMIZER_NAME: &str = "oxipng";

/// Tool path resolver for the optimizer binary
pub struct ToolPathResolver {
    /// Path configured by the user, checked before any search
    explicit: Option<PathBuf>,
    /// Directories searched in order when no explicit path is set
    search_dirs: Vec<PathBuf>,
}

impl ToolPathResolver {
    /// Create a resolver searching `PATH` and `~/.cargo/bin`
    pub fn new(explicit: Option<PathBuf>) -> Self {
        let mut search_dirs: Vec<PathBuf> = env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();

        if let Some(home) = dirs::home_dir() {
            search_dirs.push(home.join(".cargo").join("bin"));
        }

        Self { explicit, search_dirs }
    }

    /// Create a resolver with a fixed search list
    pub fn with_search_dirs(explicit: Option<PathBuf>, search_dirs: Vec<PathBuf>) -> Self {
        Self { explicit, search_dirs }
    }

    /// Resolve the optimizer executable
    pub fn resolve(&self) -> Result<PathBuf, CompressError> {
        self.resolve_tool(OPTIMIZER_NAME)
    }

    /// Resolve the path to a specific tool
    pub fn resolve_tool(&self, tool_name: &str) -> Result<PathBuf, CompressError> {
        if let Some(ref explicit) = self.explicit {
            debug!("Checking configured tool path: {:?}", explicit);
            // A bare name like "oxipng" is looked up like any other tool
            if explicit.components().count() == 1 && !explicit.is_absolute() {
                return self.search(&explicit.to_string_lossy());
            }
            if is_executable(explicit) {
                return Ok(explicit.clone());
            }
            return Err(CompressError::MissingOptimizer(format!(
                "{} does not exist or is not executable",
                explicit.display()
            )));
        }

        self.search(tool_name)
    }

    fn search(&self, tool_name: &str) -> Result<PathBuf, CompressError> {
        let extension = if cfg!(windows) { ".exe" } else { "" };
        let tool_with_ext = format!("{}{}", tool_name, extension);

        for dir in &self.search_dirs {
            let candidate = dir.join(&tool_with_ext);
            if is_executable(&candidate) {
                debug!("Resolved {} -> {:?}", tool_name, candidate);
                return Ok(candidate);
            }
        }

        warn!("Tool not found: {}", tool_name);
        Err(CompressError::MissingOptimizer(install_instructions(tool_name)))
    }
}

impl Default for ToolPathResolver {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Installation hint for a missing tool
fn install_instructions(tool_name: &str) -> String {
    match tool_name {
        "oxipng" => "'oxipng' not found in PATH or ~/.cargo/bin.\n\
            Install it with:\n  cargo install oxipng\n\
            or download from: https://github.com/shssoichiro/oxipng/releases\n\
            or point --optimizer / SSC_OPTIMIZER at the executable"
            .to_string(),
        _ => format!("'{}' not found in PATH", tool_name),
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_search_dirs_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        make_executable(&second.path().join("oxipng"));

        let resolver = ToolPathResolver::with_search_dirs(
            None,
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
        );
        assert_eq!(resolver.resolve().unwrap(), second.path().join("oxipng"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("oxipng"), "not a program").unwrap();

        let resolver = ToolPathResolver::with_search_dirs(None, vec![dir.path().to_path_buf()]);
        assert!(matches!(resolver.resolve(), Err(CompressError::MissingOptimizer(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_explicit_path_wins() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("my-oxipng");
        make_executable(&custom);

        let resolver = ToolPathResolver::with_search_dirs(Some(custom.clone()), vec![]);
        assert_eq!(resolver.resolve().unwrap(), custom);
    }

    #[test]
    fn test_missing_explicit_path() {
        let resolver = ToolPathResolver::with_search_dirs(
            Some(PathBuf::from("/definitely/not/here/oxipng")),
            vec![],
        );
        let err = resolver.resolve().unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/oxipng"));
    }

    #[test]
    fn test_missing_tool_has_install_hint() {
        let resolver = ToolPathResolver::with_search_dirs(None, vec![]);
        let err = resolver.resolve().unwrap_err();
        assert!(err.to_string().contains("cargo install oxipng"));
    }
}
