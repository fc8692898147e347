pub mod check;
pub mod compile;
pub mod schema;

use std::path::Path;

/// Run a fallible command body, mapping the error side to stderr and exit code 1.
pub fn run_cli<F>(f: F) -> i32
where
    F: FnOnce() -> Result<(), String>,
{
    match f() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Read the schema document from a file path, or from stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String, String> {
    if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())
            .map_err(|err| format!("Failed to read stdin: {err}"))
    } else {
        std::fs::read_to_string(path)
            .map_err(|err| format!("Failed to read {}: {err}", path.display()))
    }
}

/// Format blocking validation errors as a multi-line message for stderr.
pub fn format_blocking_errors(errors: &[String]) -> String {
    let mut message = format!(
        "Schema failed validation with {} blocking error(s):",
        errors.len()
    );
    for error in errors {
        message.push_str("\n  - ");
        message.push_str(error);
    }
    message
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_run_cli_maps_results_to_exit_codes() {
        assert_eq!(run_cli(|| Ok(())), 0);
        assert_eq!(run_cli(|| Err("boom".to_string())), 1);
    }

    #[test]
    fn test_read_input_reports_missing_files() {
        let err = read_input(Path::new("/no/such/file.json")).unwrap_err();
        assert!(err.starts_with("Failed to read /no/such/file.json"));
    }

    #[test]
    fn test_format_blocking_errors_lists_each_finding() {
        let message = format_blocking_errors(&[
            "Entity 1: Name is required".to_string(),
            "Duplicate entity name: User".to_string(),
        ]);
        assert!(message.starts_with("Schema failed validation with 2 blocking error(s):"));
        assert!(message.contains("\n  - Entity 1: Name is required"));
        assert!(message.contains("\n  - Duplicate entity name: User"));
    }
}
