//! Command-line interface for linefacts.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::analysis::{classify_lines, line_indents, SourceFile};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Per-line static analysis of a single Python source file.
///
/// linefacts parses one file and derives line-indexed views of it: the true
/// indentation of every line hosting a syntax node, and the declarations,
/// imports, variables, and calls appearing on each line.
#[derive(Parser)]
#[command(name = "linefacts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recover each line's indentation from the raw source
    Indent(IndentArgs),
    /// Classify every syntax node by source line
    Classify(ClassifyArgs),
    /// Bucket names into libraries, classes, functions, and variables
    Report(ReportArgs),
}

/// Arguments for the indent command.
#[derive(Parser)]
pub struct IndentArgs {
    /// Python file to analyze
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the classify command.
#[derive(Parser)]
pub struct ClassifyArgs {
    /// Python file to analyze
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the report command.
#[derive(Parser)]
pub struct ReportArgs {
    /// Python file to analyze
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

pub fn run_indent(args: &IndentArgs) -> anyhow::Result<i32> {
    let file = SourceFile::load(&args.path)?;
    let analysis = line_indents(&file);
    match args.format.as_str() {
        "json" => report::write_indent_json(&args.path, &analysis)?,
        "pretty" => report::write_indent_pretty(&args.path, &analysis),
        other => anyhow::bail!("unknown format: {} (expected pretty or json)", other),
    }
    Ok(EXIT_SUCCESS)
}

pub fn run_classify(args: &ClassifyArgs) -> anyhow::Result<i32> {
    let file = SourceFile::load(&args.path)?;
    let map = classify_lines(&file);
    match args.format.as_str() {
        "json" => report::write_classify_json(&args.path, &map)?,
        "pretty" => report::write_classify_pretty(&args.path, &map),
        other => anyhow::bail!("unknown format: {} (expected pretty or json)", other),
    }
    Ok(EXIT_SUCCESS)
}

pub fn run_report(args: &ReportArgs) -> anyhow::Result<i32> {
    let file = SourceFile::load(&args.path)?;
    let buckets = report::bucket_names(&classify_lines(&file));
    match args.format.as_str() {
        "json" => report::write_buckets_json(&args.path, &buckets)?,
        "pretty" => report::write_buckets_pretty(&args.path, &buckets),
        other => anyhow::bail!("unknown format: {} (expected pretty or json)", other),
    }
    Ok(EXIT_SUCCESS)
}
