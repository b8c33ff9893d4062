use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures resolving the managed runtime or its native dependencies.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no dotnet executable found; set DOTNET_ROOT or add dotnet to PATH")]
    RuntimeNotFound,
    #[error("runtime dependency directory {0:?} does not exist")]
    MissingDependencies(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures raised by the invocation layer itself.
///
/// A tool that runs to completion with a nonzero status is not an error here: its exit
/// code and stderr text come back inside `InvocationOutput` for the caller to inspect.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The runtime or its dependencies could not be provisioned. Fatal, never retried.
    #[error("failed to provision the managed runtime")]
    Provisioning(#[source] RuntimeError),
    #[error("failed to spawn {command:?}")]
    Spawn {
        command: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The child was killed after exceeding the configured limit.
    #[error("external tool did not finish within {timeout:?}")]
    Timeout { timeout: Duration },
    #[error("failed reading the external tool's output")]
    Io(#[from] std::io::Error),
}
