//
// main.rs
// Dicom-RT-Convert-rs
//
// Tokio entry point that hands off execution to the CLI layer so commands are resolved asynchronously.
//

use dicom_rt_convert::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Tokio runtime entry point: delegate all argument parsing and dispatching to the CLI module.
    cli::run().await
}
