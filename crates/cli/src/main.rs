//! Command-line front end for the erdforge schema compiler.
//!
//! The binary wraps the `erdforge-core` pipeline in three subcommands:
//! `compile` writes a generated backend to disk, `check` reports on a
//! document without writing anything, and `schema` prints the normalized
//! schema as JSON.

mod commands;

use std::ffi::OsString;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Parser)]
#[command(
    name = "erdforge",
    version,
    about = "\x1b[33merdforge\x1b[0m turns rough entity-relationship sketches into a runnable Express + Sequelize backend"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a schema document and write the generated project to a directory
    Compile(commands::compile::CompileArgs),
    /// Analyze a schema document and report corrections, findings, and statistics
    Check(commands::check::CheckArgs),
    /// Print the normalized schema as canonical JSON
    Schema(commands::schema::SchemaArgs),
}

fn main() {
    init_tracing();
    let code = run(std::env::args_os().collect());
    std::process::exit(code);
}

fn run(args: Vec<OsString>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Compile(compile_args)) => commands::compile::run(compile_args),
            Some(Commands::Check(check_args)) => commands::check::run(check_args),
            Some(Commands::Schema(schema_args)) => commands::schema::run(schema_args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn init_tracing() {
    // ERDFORGE_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "erdforge_core=debug"
    let filter = match std::env::var("ERDFORGE_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("erdforge_core={level},erdforge_cli={level}")
        }
        Ok(spec) => spec,
        Err(_) => "erdforge_core=warn,erdforge_cli=warn".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(&filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
