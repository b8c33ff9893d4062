use std::path::PathBuf;

use crate::error::InvokeError;
use crate::invoke::{invoke, InvokeOptions};
use crate::marshal;
use crate::models::{ConversionRequest, InvocationOutput};
use crate::runtime::RuntimeLocator;

/// Assembly implementing the NIfTI to DICOM-RT conversion.
pub const CONVERTER_ASSEMBLY: &str = "Microsoft.RTConvert.Console.dll";
/// Assembly that echoes its arguments back, used to validate the invocation plumbing.
pub const ECHO_ASSEMBLY: &str = "Echo.dll";

/// Environment variable overriding the directory containing the managed assemblies.
pub const TOOL_DIR_VAR: &str = "RTCONVERT_TOOL_DIR";
/// Conventional assembly directory, relative to the working directory.
pub const DEFAULT_TOOL_DIR: &str = "bin/netcoreapp2.1";

/// Where the managed conversion assemblies live on disk.
#[derive(Debug, Clone)]
pub struct ToolLayout {
    bin_dir: PathBuf,
}

impl ToolLayout {
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
        }
    }

    /// Explicit directory if given, otherwise `RTCONVERT_TOOL_DIR`, otherwise the
    /// conventional `bin/netcoreapp2.1`.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        let bin_dir = explicit
            .or_else(|| std::env::var_os(TOOL_DIR_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOOL_DIR));
        Self { bin_dir }
    }

    pub fn converter(&self) -> PathBuf {
        self.bin_dir.join(CONVERTER_ASSEMBLY)
    }

    pub fn echo(&self) -> PathBuf {
        self.bin_dir.join(ECHO_ASSEMBLY)
    }
}

/// Converts a NIfTI segmentation into a DICOM-RT structure set by shelling out to the
/// managed converter.
///
/// Returns the tool's complete output without interpreting it; callers decide success
/// from `InvocationOutput::success` or from the "Successfully written" stdout marker,
/// and the written artifact appears at `request.out_file` as the tool's side effect.
pub async fn rtconvert(
    runtime: &dyn RuntimeLocator,
    layout: &ToolLayout,
    request: &ConversionRequest,
    options: &InvokeOptions,
) -> Result<InvocationOutput, InvokeError> {
    let mut args = vec![layout.converter().display().to_string()];
    args.extend(marshal::conversion_args(request));
    invoke(runtime, &args, options).await
}
