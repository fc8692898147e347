use std::path::PathBuf;

use clap::Args;

use super::{format_blocking_errors, read_input, run_cli};

#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    #[arg(
        value_name = "INPUT",
        help = "Schema document to normalize, or - for stdin"
    )]
    pub input: PathBuf,

    #[arg(long, help = "Emit compact JSON on a single line")]
    pub compact: bool,
}

pub fn run(args: SchemaArgs) -> i32 {
    run_cli(|| run_inner(args))
}

fn run_inner(args: SchemaArgs) -> Result<(), String> {
    let text = read_input(&args.input)?;
    let report = erdforge_core::analyze(&text).map_err(|err| err.to_string())?;
    if !report.validation.valid {
        return Err(format_blocking_errors(&report.validation.errors));
    }

    let rendered = if args.compact {
        serde_json::to_string(&report.schema)
    } else {
        serde_json::to_string_pretty(&report.schema)
    }
    .map_err(|err| err.to_string())?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOC: &str = r#"{ "entities": [ { "name": "Invoice", "attributes": [
        { "name": "id", "dataType": "integer", "isPrimaryKey": true }
    ] } ] }"#;

    #[test]
    fn test_schema_prints_for_a_valid_document() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("schema.json");
        std::fs::write(&input, DOC).unwrap();
        assert_eq!(
            run(SchemaArgs {
                input: input.clone(),
                compact: false
            }),
            0
        );
        assert_eq!(
            run(SchemaArgs {
                input,
                compact: true
            }),
            0
        );
    }

    #[test]
    fn test_schema_refuses_an_invalid_document() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("schema.json");
        std::fs::write(&input, r#"{ "entities": [ { "name": "Ghost" } ] }"#).unwrap();
        assert_eq!(
            run(SchemaArgs {
                input,
                compact: false
            }),
            1
        );
    }

    #[test]
    fn test_normalized_schema_uses_the_wire_spelling() {
        let report = erdforge_core::analyze(DOC).unwrap();
        let rendered = serde_json::to_string(&report.schema).unwrap();
        assert!(rendered.contains("\"isPrimaryKey\":true"));
        assert!(rendered.contains("\"projectName\":null"));
    }
}
