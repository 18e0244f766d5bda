//! `inject-protovalidate`
//!
//! Post-process `.proto` files generated from a Smithy model and add
//! protovalidate field options derived from the model's traits.
//!
//! ```text
//! inject-protovalidate <SMITHY_ROOT> <PROTO_ROOT>
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use smithy_protovalidate::{inject, InjectOptions};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "inject-protovalidate")]
#[command(
    author,
    version,
    about = "Add protovalidate field options to Smithy-generated .proto files"
)]
struct Cli {
    /// Root directory of the Smithy model (searched recursively).
    smithy_root: PathBuf,
    /// Root directory of the generated .proto files (rewritten in place).
    proto_root: PathBuf,
    /// Report what would change without writing; exits 1 if anything would.
    #[arg(long)]
    check: bool,
    /// Extension of Smithy source files.
    #[arg(long, default_value = "smithy")]
    smithy_ext: String,
    /// Extension of protobuf files.
    #[arg(long, default_value = "proto")]
    proto_ext: String,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let smithy_root = cli
        .smithy_root
        .canonicalize()
        .with_context(|| format!("smithy root not found: {}", cli.smithy_root.display()))?;
    let proto_root = cli
        .proto_root
        .canonicalize()
        .with_context(|| format!("proto root not found: {}", cli.proto_root.display()))?;

    let options = InjectOptions {
        source_extension: cli.smithy_ext,
        target_extension: cli.proto_ext,
        dry_run: cli.check,
    };

    let summary = inject(&smithy_root, &proto_root, &options).with_context(|| {
        format!(
            "failed to inject protovalidate options ({} → {})",
            smithy_root.display(),
            proto_root.display()
        )
    })?;

    println!("{summary}");
    if cli.verbose > 0 {
        let verb = if cli.check { "would write" } else { "wrote" };
        for path in &summary.rewritten {
            println!("  {} {}", verb.cyan(), path.display());
        }
    }

    if cli.check {
        if summary.changed.is_empty() {
            println!("{}", "up to date".green());
        } else {
            for path in &summary.changed {
                println!("  {} {}", "would rewrite".yellow(), path.display());
            }
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
