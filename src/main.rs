//! Premium Finance CLI
//!
//! Command-line interface for running premium finance projections

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use premium_finance::plan::{load_overrides, load_plan, load_rate_schedule};
use premium_finance::projection::{LedgerPolicy, ProjectionConfig, ProjectionEngine};
use premium_finance::report::{print_comparison, print_ledger, print_plan, print_summary, write_ledger_csv_file};
use premium_finance::scenario::{NamedPlan, ScenarioRunner};
use premium_finance::{OutOfPocketOverrides, PlanParameters};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "premium_finance", version, about = "Premium finance illustration ledger")]
struct Cli {
    /// Number of years to project
    #[arg(long, default_value_t = 30, global = true)]
    horizon: u32,

    /// Loan and cost accounting rules
    #[arg(long, value_enum, default_value_t = LedgerArg::Standard, global = true)]
    ledger: LedgerArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LedgerArg {
    Standard,
    Capitalized,
}

impl From<LedgerArg> for LedgerPolicy {
    fn from(arg: LedgerArg) -> Self {
        match arg {
            LedgerArg::Standard => LedgerPolicy::Standard,
            LedgerArg::Capitalized => LedgerPolicy::CapitalizedInterest,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project a single plan and print its ledger
    Project {
        /// Plan JSON file; the default illustration plan when omitted
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Rate schedule CSV (Year,RateOfReturn,BorrowRate) replacing the plan's rates
        #[arg(long)]
        rates: Option<PathBuf>,

        /// Out-of-pocket overrides CSV (Year,OutOfPocket)
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Write the full ledger to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compare the final year of several plans; the first is the baseline
    Compare {
        /// Plan JSON files
        #[arg(required = true)]
        plans: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = ProjectionConfig {
        horizon: cli.horizon,
        ledger: cli.ledger.into(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Project { plan, rates, overrides, output } => {
            let mut plan = match plan {
                Some(path) => load_plan(&path).with_context(|| format!("loading plan {}", path.display()))?,
                None => PlanParameters::default(),
            };
            if let Some(path) = rates {
                plan.yearly_rates = load_rate_schedule(&path)
                    .with_context(|| format!("loading rate schedule {}", path.display()))?;
            }
            let overrides = match overrides {
                Some(path) => load_overrides(&path, &plan)
                    .with_context(|| format!("loading overrides {}", path.display()))?,
                None => OutOfPocketOverrides::new(),
            };

            let engine = ProjectionEngine::new(config);
            let result = engine.project_with_overrides(&plan, &overrides);

            print_plan(&mut out, &plan)?;
            print_ledger(&mut out, &result.rows)?;
            print_summary(&mut out, &result.summary())?;

            if let Some(path) = output {
                write_ledger_csv_file(&path, &result.rows)
                    .with_context(|| format!("writing ledger {}", path.display()))?;
                writeln!(out, "\nFull ledger written to: {}", path.display())?;
            }
        }
        Command::Compare { plans } => {
            let scenarios = plans
                .iter()
                .map(|path| {
                    let plan = load_plan(path).with_context(|| format!("loading plan {}", path.display()))?;
                    let name = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    Ok(NamedPlan::new(name, plan))
                })
                .collect::<Result<Vec<_>>>()?;

            let comparison = ScenarioRunner::with_config(config).compare(&scenarios);
            print_comparison(&mut out, &comparison)?;
        }
    }

    Ok(())
}
