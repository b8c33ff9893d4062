use crate::models::ConversionRequest;

/// Serializes a list parameter as the single token the converter expects: elements
/// comma-joined and wrapped in one pair of literal double quotes. The tool strips the
/// quotes and splits on commas itself, so nothing is escaped; elements containing
/// commas or quotes are not supported.
pub fn quoted_csv<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(",");
    format!("\"{}\"", joined)
}

/// Maps bools to the `true`/`false` tokens understood by the managed tool.
pub fn bool_tokens(flags: &[bool]) -> Vec<String> {
    flags
        .iter()
        .map(|b| if *b { "true" } else { "false" }.to_string())
        .collect()
}

/// Builds the full flag vector for one conversion, in the order the console tool
/// documents. List lengths are passed through untouched.
pub fn conversion_args(request: &ConversionRequest) -> Vec<String> {
    let roi_types: Vec<&str> = request
        .roi_interpreted_types
        .iter()
        .map(|t| t.as_token())
        .collect();

    vec![
        format!("--in-file={}", request.in_file.display()),
        format!("--reference-series={}", request.reference_series.display()),
        format!("--out-file={}", request.out_file.display()),
        format!("--struct-names={}", quoted_csv(&request.struct_names)),
        format!("--struct-colors={}", quoted_csv(&request.struct_colors)),
        format!("--fill-holes={}", quoted_csv(&bool_tokens(&request.fill_holes))),
        format!("--roi-interpreted-types={}", quoted_csv(&roi_types)),
        format!("--manufacturer={}", request.manufacturer),
        format!("--interpreter={}", request.interpreter),
        // The console tool spells this one flag in camelCase.
        format!("--modelId={}", request.model_id),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoiInterpretedType;
    use std::path::PathBuf;

    #[test]
    fn lists_serialize_as_one_quoted_token() {
        assert_eq!(quoted_csv(&["a", "b", "c"]), "\"a,b,c\"");
        assert_eq!(quoted_csv::<&str>(&[]), "\"\"");
    }

    #[test]
    fn bools_map_to_lowercase_tokens() {
        assert_eq!(bool_tokens(&[true, false]), vec!["true", "false"]);
        assert_eq!(quoted_csv(&bool_tokens(&[true, false])), "\"true,false\"");
    }

    #[test]
    fn embedded_commas_pass_through_unescaped() {
        // Pass-through is the contract; the tool would mis-split such an element.
        assert_eq!(quoted_csv(&["a,b"]), "\"a,b\"");
    }

    #[test]
    fn conversion_args_follow_the_console_contract() {
        let request = ConversionRequest {
            in_file: PathBuf::from("seg.nii.gz"),
            reference_series: PathBuf::from("series"),
            out_file: PathBuf::from("out.dcm"),
            struct_names: vec!["External".into(), "parotid_l".into()],
            struct_colors: vec!["FF0001".into(), "FF0002".into()],
            fill_holes: vec![true, false],
            roi_interpreted_types: vec![RoiInterpretedType::Organ, RoiInterpretedType::None],
            manufacturer: "Contosos".into(),
            interpreter: "Ai".into(),
            model_id: "XYZ:12".into(),
        };

        assert_eq!(
            conversion_args(&request),
            vec![
                "--in-file=seg.nii.gz",
                "--reference-series=series",
                "--out-file=out.dcm",
                "--struct-names=\"External,parotid_l\"",
                "--struct-colors=\"FF0001,FF0002\"",
                "--fill-holes=\"true,false\"",
                "--roi-interpreted-types=\"ORGAN,None\"",
                "--manufacturer=Contosos",
                "--interpreter=Ai",
                "--modelId=XYZ:12",
            ]
        );
    }
}
