//
// models.rs
// Dicom-RT-Convert-rs
//
// Defines serializable data structures for conversion requests and captured tool output.
//

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One NIfTI to DICOM-RT conversion request.
///
/// Built once and passed by reference; the parallel lists go to the external tool
/// exactly as given. Count mismatches between them are not reconciled here — the tool
/// applies its own defaults for short lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Path to the input NIfTI file.
    pub in_file: PathBuf,
    /// Directory containing the reference DICOM series.
    pub reference_series: PathBuf,
    /// Path the tool writes the DICOM-RT file to.
    pub out_file: PathBuf,
    pub struct_names: Vec<String>,
    /// 6-hex-digit RGB tokens such as "FF0080", passed through verbatim.
    pub struct_colors: Vec<String>,
    pub fill_holes: Vec<bool>,
    pub roi_interpreted_types: Vec<RoiInterpretedType>,
    pub manufacturer: String,
    pub interpreter: String,
    /// Model name and version, e.g. "Prostate:123"; ends up in SoftwareVersions.
    pub model_id: String,
}

/// Closed vocabulary for the RT ROI interpreted type of each structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoiInterpretedType {
    /// Sentinel meaning "unspecified"; the tool writes an empty interpreted-type field.
    None,
    Ctv,
    Organ,
    External,
}

impl RoiInterpretedType {
    /// The token the console tool accepts on its command line.
    pub fn as_token(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Ctv => "CTV",
            Self::Organ => "ORGAN",
            Self::External => "EXTERNAL",
        }
    }
}

/// Complete captured output of one finished tool process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code as reported by the OS, if the process exited normally.
    pub exit_code: Option<i32>,
}

impl InvocationOutput {
    /// True when the process exited with status zero. The converter also prints a
    /// "Successfully written" marker on stdout for callers that sniff content instead.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// The classic (stdout, stderr) pair.
    pub fn into_pair(self) -> (String, String) {
        (self.stdout, self.stderr)
    }
}
