//
// invoke.rs
// Dicom-RT-Convert-rs
//
// Spawns the managed runtime as a child process with an adjusted library search
// environment and returns its complete stdout/stderr and exit code.
//

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::error::InvokeError;
use crate::models::InvocationOutput;
use crate::runtime::RuntimeLocator;

/// Dynamic-library search-path variable adjusted for the child process.
#[cfg(windows)]
pub const LIBRARY_PATH_VAR: &str = "PATH";
#[cfg(not(windows))]
pub const LIBRARY_PATH_VAR: &str = "LD_LIBRARY_PATH";

/// Per-invocation knobs. The default matches the reference behavior: no timeout,
/// block until the child closes its output streams.
#[derive(Debug, Default, Clone)]
pub struct InvokeOptions {
    pub timeout: Option<Duration>,
}

/// Runs the managed runtime with the given arguments and returns its complete output.
///
/// Stdout and stderr are drained concurrently while waiting for the child; draining
/// one pipe to end-of-stream before touching the other deadlocks once the child fills
/// a kernel buffer on the undrained side.
pub async fn invoke(
    runtime: &dyn RuntimeLocator,
    args: &[String],
    options: &InvokeOptions,
) -> Result<InvocationOutput, InvokeError> {
    let dependencies = runtime.ensure_dependencies().map_err(|e| {
        error!(error = %e, "failed to ensure runtime dependencies");
        InvokeError::Provisioning(e)
    })?;
    let runtime_path = runtime.runtime_path().map_err(InvokeError::Provisioning)?;

    info!(runtime = %runtime_path.display(), ?args, "engine command");

    let env = environment_overlay(dependencies.as_deref());
    debug!(
        library_path = %env.get(LIBRARY_PATH_VAR).map(String::as_str).unwrap_or(""),
        "child library search path"
    );

    let mut command = Command::new(&runtime_path);
    command
        .args(args)
        .env_clear()
        .envs(&env)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command.spawn().map_err(|source| InvokeError::Spawn {
        command: runtime_path.clone(),
        source,
    })?;

    // wait_with_output drains both pipes concurrently and reaps the child. On timeout
    // the dropped child is killed (kill_on_drop), so no orphan keeps the pipes open.
    let output = match options.timeout {
        Some(limit) => timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| InvokeError::Timeout { timeout: limit })??,
        None => child.wait_with_output().await?,
    };

    Ok(InvocationOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code(),
    })
}

/// Copies the caller's environment and adjusts the dynamic-library search path for the
/// child. The ambient process environment is never mutated, so concurrent invocations
/// cannot race on shared state.
fn environment_overlay(dependencies: Option<&Path>) -> HashMap<String, String> {
    let mut env: HashMap<String, String> = env::vars().collect();

    // Windows resolves native libraries through PATH on its own; there the overlay
    // only guarantees the variable is defined.
    if !cfg!(windows) {
        if let Some(deps) = dependencies {
            let merged = append_search_path(env.get(LIBRARY_PATH_VAR).map(String::as_str), deps);
            env.insert(LIBRARY_PATH_VAR.to_string(), merged);
        }
    }

    // The variable must exist with a defined (possibly empty) value either way, so the
    // child never sees inherited-undefined state.
    env.entry(LIBRARY_PATH_VAR.to_string()).or_default();

    env
}

/// Appends a dependency directory to an existing search-path value, colon-separated.
fn append_search_path(existing: Option<&str>, deps: &Path) -> String {
    match existing {
        Some(current) => format!("{}:{}", current, deps.display()),
        None => deps.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_path_appends_to_existing_value() {
        let merged = append_search_path(Some("/usr/lib"), Path::new("/opt/deps"));
        assert_eq!(merged, "/usr/lib:/opt/deps");
    }

    #[test]
    fn search_path_is_set_when_absent() {
        let merged = append_search_path(None, Path::new("/opt/deps"));
        assert_eq!(merged, "/opt/deps");
    }

    #[test]
    fn overlay_always_defines_the_library_path_variable() {
        let env = environment_overlay(None);
        assert!(env.contains_key(LIBRARY_PATH_VAR));
    }

    #[cfg(not(windows))]
    #[test]
    fn overlay_appends_dependencies_for_the_child() {
        let env = environment_overlay(Some(Path::new("/opt/deps")));
        let value = env.get(LIBRARY_PATH_VAR).expect("library path");
        assert!(value.ends_with("/opt/deps"));
    }
}
