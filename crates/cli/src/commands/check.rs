use std::path::PathBuf;

use clap::Args;
use erdforge_core::{MatchRule, SchemaReport};

use super::{read_input, run_cli};

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(value_name = "INPUT", help = "Schema document to analyze, or - for stdin")]
    pub input: PathBuf,

    #[arg(long, help = "Emit the full report as JSON instead of text")]
    pub json: bool,
}

pub fn run(args: CheckArgs) -> i32 {
    run_cli(|| run_inner(args))
}

fn run_inner(args: CheckArgs) -> Result<(), String> {
    let text = read_input(&args.input)?;
    let report = erdforge_core::analyze(&text).map_err(|err| err.to_string())?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&report).map_err(|err| err.to_string())?;
        println!("{rendered}");
    } else {
        print_report(&report);
    }

    if report.validation.valid {
        Ok(())
    } else {
        Err(format!(
            "Schema failed validation with {} blocking error(s)",
            report.validation.errors.len()
        ))
    }
}

fn print_report(report: &SchemaReport) {
    let statistics = &report.statistics;
    println!(
        "Schema: {} entities ({} with a primary key), {} relationships, {} attributes ({} foreign keys)",
        statistics.entities,
        statistics.entities_with_primary_key,
        statistics.relationships,
        statistics.attributes,
        statistics.foreign_keys
    );
    println!("Fingerprint: {}", report.fingerprint);

    if !report.corrections.is_empty() {
        println!();
        println!("Corrections ({}):", report.corrections.len());
        for correction in &report.corrections {
            println!(
                "  - {}.{}: '{}' -> '{}' on {} ({} match)",
                correction.entity,
                correction.attribute,
                correction.declared_column,
                correction.resolved_column,
                correction.references_table,
                rule_label(correction.rule)
            );
        }
    }

    let validation = &report.validation;
    if !validation.errors.is_empty() {
        println!();
        println!("Errors ({}):", validation.errors.len());
        for error in &validation.errors {
            println!("  - {error}");
        }
    }
    if !validation.warnings.is_empty() {
        println!();
        println!("Warnings ({}):", validation.warnings.len());
        for warning in &validation.warnings {
            println!("  - {warning}");
        }
    }
    if validation.valid {
        println!();
        println!("Schema is valid.");
    }
}

fn rule_label(rule: MatchRule) -> &'static str {
    match rule {
        MatchRule::Exact => "exact",
        MatchRule::Substring => "substring",
    }
}
