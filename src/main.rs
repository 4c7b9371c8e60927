use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod audit;
mod classifier;
mod cli;
mod config;
mod corpus;
mod report;
mod scenario;
mod stages;
mod workflow;

use cli::{Command, RootArgs};
use stages::Stage;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.command.verbose());

    match &args.command {
        Command::Annotate(stage_args) => workflow::run_stages(&[Stage::Annotate], stage_args),
        Command::Classify(stage_args) => workflow::run_stages(&[Stage::Classify], stage_args),
        Command::Reconcile(stage_args) => workflow::run_stages(&[Stage::Reconcile], stage_args),
        Command::Pipeline(stage_args) => workflow::run_stages(&Stage::PIPELINE, stage_args),
        Command::Audit(audit_args) => workflow::run_audit(audit_args),
    }
}

/// Logs go to stderr so stdout carries only the report. `RUST_LOG` wins over
/// the `--verbose` default.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
