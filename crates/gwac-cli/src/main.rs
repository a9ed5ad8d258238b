//! `gwac` CLI — reconcile calendar sharing against group-membership rules.
//!
//! ## Usage
//!
//! ```sh
//! # Apply the rules to a user's calendar ACL (rewrites acl.json)
//! gwac reconcile --user-email ana@example.com \
//!     --groups groups.json --rules rules.json --acl acl.json
//!
//! # Show what would change without writing anything
//! gwac plan --user-email ana@example.com \
//!     --groups groups.json --rules rules.json --acl acl.json
//!
//! # Full report as JSON
//! gwac reconcile ... --format json
//!
//! # Validate a rule table
//! gwac rules --rules rules.json
//! ```
//!
//! Exit status is 0 on success, 2 when some ACL writes failed, and 1 on a
//! fatal error (malformed rules, unreadable inputs).

mod files;
mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::process;
use tracing_subscriber::EnvFilter;

use acl_engine::{MemoryAclStore, ReconciliationReport, Reconciler, RuleSource, RuleTable};
use files::{GroupsFile, RulesFile};

/// Exit status when the run completed but some writes were rejected.
const EXIT_PARTIAL_FAILURE: i32 = 2;

#[derive(Parser)]
#[command(
    name = "gwac",
    version,
    about = "Calendar sharing administration from group-membership rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Converge the calendar ACL to the rules and rewrite the ACL file
    Reconcile {
        #[command(flatten)]
        inputs: RunInputs,
        /// Compute and print the plan without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Print what `reconcile` would do (never writes)
    Plan {
        #[command(flatten)]
        inputs: RunInputs,
    },
    /// Validate and print a rule table
    Rules {
        /// Rules file (Sheets `values` JSON)
        #[arg(short, long)]
        rules: String,
    },
}

#[derive(Args)]
struct RunInputs {
    /// Email address of the user whose calendar is managed
    #[arg(short, long)]
    user_email: String,
    /// Group membership file (Directory `groups` JSON)
    #[arg(short, long)]
    groups: String,
    /// Rules file (Sheets `values` JSON)
    #[arg(short, long)]
    rules: String,
    /// Calendar ACL file (Calendar `acl` JSON)
    #[arg(short, long)]
    acl: String,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Reconcile { inputs, dry_run } => {
            let report = reconcile(&inputs, dry_run)?;
            print_report(&report, inputs.format)?;
            if report.has_failures() {
                process::exit(EXIT_PARTIAL_FAILURE);
            }
        }
        Commands::Plan { inputs } => {
            let report = reconcile(&inputs, true)?;
            print_report(&report, inputs.format)?;
        }
        Commands::Rules { rules } => {
            let rows = RulesFile.list_rules(&rules)?;
            let table = RuleTable::load(rows)
                .with_context(|| format!("Invalid rule table: {}", rules))?;
            print!("{}", render::rules_table(&table));
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn reconcile(inputs: &RunInputs, dry_run: bool) -> Result<ReconciliationReport> {
    let subject = inputs.user_email.as_str();
    tracing::debug!(subject, acl = %inputs.acl, dry_run, "starting reconciliation");

    let acl_json = std::fs::read_to_string(&inputs.acl)
        .with_context(|| format!("Failed to read file: {}", inputs.acl))?;
    let mut store = MemoryAclStore::from_json(subject, &acl_json)
        .with_context(|| format!("Invalid ACL file: {}", inputs.acl))?;

    let groups = GroupsFile::new(&inputs.groups);

    let report = Reconciler::new()
        .dry_run(dry_run)
        .run(subject, &groups, &RulesFile, &inputs.rules, &mut store)
        .context("Reconciliation failed")?;

    if !dry_run {
        let updated = store.to_json(subject)?;
        std::fs::write(&inputs.acl, updated + "\n")
            .with_context(|| format!("Failed to write file: {}", inputs.acl))?;
        tracing::debug!(acl = %inputs.acl, "wrote reconciled ACL");
    }

    Ok(report)
}

fn print_report(report: &ReconciliationReport, format: Format) -> Result<()> {
    match format {
        Format::Table => print!("{}", render::report_table(report)),
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
