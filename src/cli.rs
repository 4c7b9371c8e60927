//! CLI argument parsing for the x-specs corpus stages.
//!
//! The CLI stays thin: it names a stage and a corpus, and the workflow module
//! does the rest.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "xspecs",
    version,
    about = "Annotate x-specs scenarios with validation blocks and inferred error messages",
    after_help = "Commands:\n  annotate   Add placeholder validation blocks to unannotated scenarios\n  classify   Replace expectError: null placeholders with inferred messages\n  reconcile  Remove expectError from assertions that also have expected\n  pipeline   Run annotate, classify and reconcile in order\n  audit      Report unannotated scenarios, placeholders and conflicts\n\nExamples:\n  xspecs pipeline --corpus .\n  xspecs classify --corpus . --dry-run\n  xspecs audit --corpus . --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add placeholder validation blocks to scenarios that lack one
    Annotate(StageArgs),
    /// Replace undetermined expectError placeholders with inferred messages
    Classify(StageArgs),
    /// Remove expectError from assertions that also carry expected
    Reconcile(StageArgs),
    /// Run annotate, classify and reconcile in order
    Pipeline(StageArgs),
    /// Check the corpus without modifying it
    Audit(AuditArgs),
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Annotate(args)
            | Command::Classify(args)
            | Command::Reconcile(args)
            | Command::Pipeline(args) => args.verbose,
            Command::Audit(args) => args.verbose,
        }
    }
}

/// Inputs shared by the mutating stage commands.
#[derive(Parser, Debug)]
pub struct StageArgs {
    /// Corpus directory containing the spec roots
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub corpus: PathBuf,

    /// Config file (defaults to <corpus>/xspecs.json when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Compute the report without writing any document
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the machine-readable JSON report
    #[arg(long)]
    pub json: bool,

    /// Log each written document
    #[arg(long)]
    pub verbose: bool,
}

/// Audit command inputs.
#[derive(Parser, Debug)]
pub struct AuditArgs {
    /// Corpus directory containing the spec roots
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub corpus: PathBuf,

    /// Config file (defaults to <corpus>/xspecs.json when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit the machine-readable JSON report
    #[arg(long)]
    pub json: bool,

    /// Log discovery details
    #[arg(long)]
    pub verbose: bool,
}
