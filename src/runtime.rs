use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::RuntimeError;

#[cfg(windows)]
const DOTNET_EXE: &str = "dotnet.exe";
#[cfg(not(windows))]
const DOTNET_EXE: &str = "dotnet";

/// Environment variable naming the root of a managed runtime installation.
pub const DOTNET_ROOT_VAR: &str = "DOTNET_ROOT";
/// Environment variable naming a directory of extra native dependencies for the runtime.
pub const DEPS_DIR_VAR: &str = "RTCONVERT_DEPS_DIR";

/// Resolves the managed runtime that executes the converter assemblies.
///
/// `ensure_dependencies` is idempotent and performs whatever first-run materialization
/// the host needs; a failure there is fatal to the invocation and is never retried.
pub trait RuntimeLocator {
    /// Directory of native dependencies to add to the child's library search path,
    /// or `None` when the runtime needs no extra libraries.
    fn ensure_dependencies(&self) -> Result<Option<PathBuf>, RuntimeError>;

    /// Path of the runtime executable that launches the tool assemblies.
    fn runtime_path(&self) -> Result<PathBuf, RuntimeError>;
}

/// Locates a host-installed dotnet runtime via `DOTNET_ROOT` or the `PATH`.
#[derive(Debug, Default, Clone)]
pub struct SystemDotnet;

impl RuntimeLocator for SystemDotnet {
    fn ensure_dependencies(&self) -> Result<Option<PathBuf>, RuntimeError> {
        deps_from_override(env::var_os(DEPS_DIR_VAR))
    }

    fn runtime_path(&self) -> Result<PathBuf, RuntimeError> {
        resolve_runtime(env::var_os(DOTNET_ROOT_VAR), env::var_os("PATH"))
    }
}

/// A runtime pinned to an explicit executable, for CLI overrides and tests.
#[derive(Debug, Clone)]
pub struct ExplicitRuntime {
    runtime: PathBuf,
    deps_dir: Option<PathBuf>,
}

impl ExplicitRuntime {
    pub fn new(runtime: impl Into<PathBuf>) -> Self {
        Self {
            runtime: runtime.into(),
            deps_dir: None,
        }
    }

    pub fn with_deps_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.deps_dir = Some(dir.into());
        self
    }
}

impl RuntimeLocator for ExplicitRuntime {
    fn ensure_dependencies(&self) -> Result<Option<PathBuf>, RuntimeError> {
        Ok(self.deps_dir.clone())
    }

    fn runtime_path(&self) -> Result<PathBuf, RuntimeError> {
        Ok(self.runtime.clone())
    }
}

fn deps_from_override(configured: Option<OsString>) -> Result<Option<PathBuf>, RuntimeError> {
    match configured {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            if dir.is_dir() {
                Ok(Some(dir))
            } else {
                Err(RuntimeError::MissingDependencies(dir))
            }
        }
        None => Ok(None),
    }
}

fn resolve_runtime(
    root: Option<OsString>,
    path_var: Option<OsString>,
) -> Result<PathBuf, RuntimeError> {
    if let Some(root) = root {
        let candidate = Path::new(&root).join(DOTNET_EXE);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    if let Some(path_var) = path_var {
        for dir in env::split_paths(&path_var) {
            let candidate = dir.join(DOTNET_EXE);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    Err(RuntimeError::RuntimeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn unset_override_means_no_extra_dependencies() {
        assert!(deps_from_override(None).expect("deps").is_none());
    }

    #[test]
    fn present_dependency_override_resolves() {
        let dir = tempdir().expect("tempdir");
        let deps = deps_from_override(Some(dir.path().as_os_str().to_os_string()))
            .expect("deps");
        assert_eq!(deps, Some(dir.path().to_path_buf()));
    }

    #[test]
    fn missing_dependency_override_is_a_provisioning_error() {
        let dir = tempdir().expect("tempdir");
        let gone = dir.path().join("not-there");
        let err = deps_from_override(Some(gone.clone().into_os_string())).unwrap_err();
        assert!(matches!(err, RuntimeError::MissingDependencies(p) if p == gone));
    }

    #[test]
    fn missing_runtime_everywhere_is_an_error() {
        let err = resolve_runtime(None, None).unwrap_err();
        assert!(matches!(err, RuntimeError::RuntimeNotFound));
    }

    #[test]
    fn dotnet_root_takes_precedence_over_path() {
        let root = tempdir().expect("root");
        let path_dir = tempdir().expect("path dir");
        fs::write(root.path().join(DOTNET_EXE), b"").expect("root runtime");
        fs::write(path_dir.path().join(DOTNET_EXE), b"").expect("path runtime");

        let path_var = env::join_paths([path_dir.path()]).expect("join paths");
        let found = resolve_runtime(
            Some(root.path().as_os_str().to_os_string()),
            Some(path_var),
        )
        .expect("resolve");
        assert_eq!(found, root.path().join(DOTNET_EXE));
    }

    #[test]
    fn path_scan_finds_the_runtime() {
        let empty = tempdir().expect("empty dir");
        let path_dir = tempdir().expect("path dir");
        fs::write(path_dir.path().join(DOTNET_EXE), b"").expect("path runtime");

        let path_var = env::join_paths([empty.path(), path_dir.path()]).expect("join paths");
        let found = resolve_runtime(None, Some(path_var)).expect("resolve");
        assert_eq!(found, path_dir.path().join(DOTNET_EXE));
    }
}
