use crate::convert::ToolLayout;
use crate::error::InvokeError;
use crate::invoke::{invoke, InvokeOptions};
use crate::models::InvocationOutput;
use crate::runtime::RuntimeLocator;

/// Runs the Echo assembly: `text` comes back on stdout and `error`, when given, on
/// stderr, each newline-terminated. Proves the invocation plumbing works without
/// touching any conversion logic.
pub async fn echo(
    runtime: &dyn RuntimeLocator,
    layout: &ToolLayout,
    text: &str,
    error: Option<&str>,
) -> Result<InvocationOutput, InvokeError> {
    let mut args = vec![layout.echo().display().to_string(), text.to_string()];
    if let Some(error) = error {
        args.push(error.to_string());
    }
    invoke(runtime, &args, &InvokeOptions::default()).await
}

/// Asks the managed runtime to describe itself (`--info`).
pub async fn runtime_version(
    runtime: &dyn RuntimeLocator,
) -> Result<InvocationOutput, InvokeError> {
    invoke(runtime, &["--info".to_string()], &InvokeOptions::default()).await
}
