use std::path::{Path, PathBuf};

use clap::Args;
use erdforge_core::{CompileError, SynthesisOutput};
use tracing::debug;

use super::{format_blocking_errors, read_input, run_cli};

#[derive(Args, Debug, Clone)]
pub struct CompileArgs {
    #[arg(value_name = "INPUT", help = "Schema document to compile, or - for stdin")]
    pub input: PathBuf,

    #[arg(
        long,
        short = 'o',
        value_name = "DIR",
        help = "Directory to write the generated project into"
    )]
    pub out: PathBuf,

    #[arg(long, help = "Write into a non-empty output directory")]
    pub force: bool,
}

pub fn run(args: CompileArgs) -> i32 {
    run_cli(|| run_inner(args))
}

fn run_inner(args: CompileArgs) -> Result<(), String> {
    let text = read_input(&args.input)?;
    let compilation = match erdforge_core::compile(&text) {
        Ok(compilation) => compilation,
        Err(CompileError::Invalid { report }) => {
            return Err(format_blocking_errors(&report.validation.errors));
        }
        Err(err) => return Err(err.to_string()),
    };

    ensure_out_dir(&args.out, args.force)?;
    let written = write_tree(&args.out, &compilation.output)?;

    let report = &compilation.report;
    for warning in &report.validation.warnings {
        eprintln!("warning: {warning}");
    }
    for correction in &report.corrections {
        eprintln!(
            "note: {}.{} now references {}.{} (document said '{}')",
            correction.entity,
            correction.attribute,
            correction.references_table,
            correction.resolved_column,
            correction.declared_column
        );
    }
    println!(
        "Wrote {written} files for {} entities to {}",
        report.statistics.entities,
        args.out.display()
    );
    Ok(())
}

/// Create the output directory if missing; refuse a non-empty one unless forced.
fn ensure_out_dir(out: &Path, force: bool) -> Result<(), String> {
    match std::fs::read_dir(out) {
        Ok(mut entries) => {
            if !force && entries.next().is_some() {
                return Err(format!(
                    "Output directory {} is not empty; pass --force to write into it anyway",
                    out.display()
                ));
            }
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            std::fs::create_dir_all(out)
                .map_err(|err| format!("Failed to create {}: {err}", out.display()))
        }
        Err(err) => Err(format!("Failed to read {}: {err}", out.display())),
    }
}

/// Materialize every generated unit under `out`, creating parent directories as needed.
fn write_tree(out: &Path, output: &SynthesisOutput) -> Result<usize, String> {
    let mut written = 0;
    for (path, contents) in output.files() {
        let target = out.join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("Failed to create {}: {err}", parent.display()))?;
        }
        std::fs::write(&target, contents)
            .map_err(|err| format!("Failed to write {}: {err}", target.display()))?;
        debug!(path = %target.display(), "Wrote generated unit");
        written += 1;
    }
    Ok(written)
}
