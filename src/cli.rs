//
// cli.rs
// Dicom-RT-Convert-rs
//
// Defines the CLI surface with Clap and dispatches user-selected commands to the
// conversion and diagnostics modules.
//

use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::convert::{self, ToolLayout};
use crate::diagnostics;
use crate::invoke::InvokeOptions;
use crate::models::{ConversionRequest, InvocationOutput, RoiInterpretedType};
use crate::runtime::{ExplicitRuntime, RuntimeLocator, SystemDotnet};

/// Command-line interface glue code: defines the available verbs and dispatches to modules.
#[derive(Parser)]
#[command(name = "dicom-rt-convert")]
#[command(about = "NIfTI to DICOM-RT conversion front-end", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a NIfTI segmentation into a DICOM-RT structure set
    Convert {
        /// Path to the input NIfTI file
        #[arg(long)]
        in_file: PathBuf,
        /// Directory containing the reference DICOM series
        #[arg(long)]
        reference_series: PathBuf,
        /// Path for the output DICOM-RT file
        #[arg(long)]
        out_file: PathBuf,
        /// Structure names, comma separated
        #[arg(long, value_delimiter = ',')]
        struct_names: Vec<String>,
        /// Structure colors as 6-hex-digit RGB tokens, comma separated
        #[arg(long, value_delimiter = ',')]
        struct_colors: Vec<String>,
        /// Fill-hole flags, comma separated
        #[arg(long, value_delimiter = ',')]
        fill_holes: Vec<bool>,
        /// ROI interpreted types, comma separated
        #[arg(long, value_delimiter = ',', value_enum, ignore_case = true)]
        roi_interpreted_types: Vec<RoiType>,
        /// Manufacturer for the DICOM-RT
        #[arg(long)]
        manufacturer: String,
        /// Interpreter for the DICOM-RT
        #[arg(long)]
        interpreter: String,
        /// Model name and version, e.g. Prostate:123
        #[arg(long)]
        model_id: String,
        /// Print the captured output as JSON instead of relaying the streams
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        host: HostArgs,
    },
    /// Echo text through the external tool to validate the invocation plumbing
    Echo {
        text: String,
        error: Option<String>,
        #[command(flatten)]
        host: HostArgs,
    },
    /// Print the managed runtime's version information
    Version {
        #[command(flatten)]
        host: HostArgs,
    },
}

/// Flags selecting which runtime and tool installation to use.
#[derive(Args)]
pub struct HostArgs {
    /// Explicit path to the managed runtime executable
    #[arg(long)]
    runtime: Option<PathBuf>,
    /// Directory of extra native dependencies for the runtime (with --runtime)
    #[arg(long)]
    deps_dir: Option<PathBuf>,
    /// Directory containing the converter assemblies
    #[arg(long)]
    tool_dir: Option<PathBuf>,
    /// Abort the invocation after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl HostArgs {
    fn runtime(&self) -> Box<dyn RuntimeLocator> {
        match &self.runtime {
            Some(path) => {
                let mut explicit = ExplicitRuntime::new(path);
                if let Some(deps) = &self.deps_dir {
                    explicit = explicit.with_deps_dir(deps);
                }
                Box::new(explicit)
            }
            None => Box::new(SystemDotnet),
        }
    }

    fn layout(&self) -> ToolLayout {
        ToolLayout::resolve(self.tool_dir.clone())
    }

    fn options(&self) -> InvokeOptions {
        InvokeOptions {
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum RoiType {
    None,
    Ctv,
    Organ,
    External,
}

impl From<RoiType> for RoiInterpretedType {
    fn from(value: RoiType) -> Self {
        match value {
            RoiType::None => RoiInterpretedType::None,
            RoiType::Ctv => RoiInterpretedType::Ctv,
            RoiType::Organ => RoiInterpretedType::Organ,
            RoiType::External => RoiInterpretedType::External,
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            in_file,
            reference_series,
            out_file,
            struct_names,
            struct_colors,
            fill_holes,
            roi_interpreted_types,
            manufacturer,
            interpreter,
            model_id,
            json,
            host,
        } => {
            let request = ConversionRequest {
                in_file,
                reference_series,
                out_file,
                struct_names,
                struct_colors,
                fill_holes,
                roi_interpreted_types: roi_interpreted_types
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                manufacturer,
                interpreter,
                model_id,
            };
            let runtime = host.runtime();
            let output =
                convert::rtconvert(runtime.as_ref(), &host.layout(), &request, &host.options())
                    .await?;
            report(&output, json)?;
            if !output.success() {
                bail!("converter exited with status {:?}", output.exit_code);
            }
        }
        Commands::Echo { text, error, host } => {
            let runtime = host.runtime();
            let output =
                diagnostics::echo(runtime.as_ref(), &host.layout(), &text, error.as_deref())
                    .await?;
            report(&output, false)?;
        }
        Commands::Version { host } => {
            let runtime = host.runtime();
            let output = diagnostics::runtime_version(runtime.as_ref()).await?;
            report(&output, false)?;
        }
    }

    Ok(())
}

fn report(output: &InvocationOutput, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }
    if !output.stdout.is_empty() {
        print!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        eprint!("{}", output.stderr);
    }
    Ok(())
}
