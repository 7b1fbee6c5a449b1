//! Ledger output: CSV export and console tables

use crate::error::Result;
use crate::plan::PlanParameters;
use crate::projection::{LedgerSummary, YearRow};
use crate::scenario::ScenarioComparison;
use std::io::Write;

/// Write the ledger as CSV, one column per row field
pub fn write_ledger_csv<W: Write>(writer: W, rows: &[YearRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the ledger to a CSV file at `path`
pub fn write_ledger_csv_file<P: AsRef<std::path::Path>>(path: P, rows: &[YearRow]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_ledger_csv(file, rows)
}

/// Input parameter block printed above a ledger
pub fn print_plan<W: Write>(out: &mut W, plan: &PlanParameters) -> std::io::Result<()> {
    writeln!(out, "Plan:")?;
    writeln!(out, "  Death Benefit:      ${:.2}", plan.death_benefit)?;
    writeln!(out, "  Annual Out of Pocket: ${:.2}", plan.out_of_pocket)?;
    writeln!(out, "  Payment Years:      {}", plan.payment_years)?;
    writeln!(out, "  Annual Premium:     ${:.2}", plan.annual_premium)?;
    writeln!(out, "  Premium Years:      {}", plan.premium_years)?;
    writeln!(out, "  First Year Fee:     ${:.2}", plan.first_year_fee)?;
    writeln!(out, "  Start Age:          {}", plan.start_age)?;
    writeln!(out, "  Initial Exposure:   ${:.2}", plan.initial_exposure)?;
    writeln!(out)
}

pub fn print_ledger<W: Write>(out: &mut W, rows: &[YearRow]) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>4} {:>4} {:>6} {:>6} {:>12} {:>12} {:>14} {:>14} {:>14} {:>14} {:>14} {:>12} {:>12}",
        "Year", "Age", "RoR%", "Brw%", "Premium", "OOP", "BOY Bal", "EOY Bal", "Withdrawal",
        "Cash Value", "Net DB", "Collateral", "Total Cost"
    )?;
    writeln!(out, "{}", "-".repeat(150))?;

    for row in rows {
        writeln!(
            out,
            "{:>4} {:>4} {:>6.2} {:>6.2} {:>12.0} {:>12.0} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>12.0} {:>12.0}",
            row.year,
            row.age,
            row.rate_of_return,
            row.borrow_rate,
            row.premium,
            row.oop,
            row.boy_bal,
            row.eoy_bal,
            row.withdrawal,
            row.cash_value,
            row.net_db,
            row.collateral,
            row.total_cost,
        )?;
    }
    Ok(())
}

pub fn print_summary<W: Write>(out: &mut W, summary: &LedgerSummary) -> std::io::Result<()> {
    writeln!(out, "\nSummary:")?;
    writeln!(out, "  Years:               {}", summary.total_years)?;
    writeln!(out, "  Final Cash Value:    ${:.2}", summary.final_cash_value)?;
    writeln!(out, "  Total Out of Pocket: ${:.2}", summary.total_out_of_pocket)?;
    writeln!(out, "  Final Net DB:        ${:.2}", summary.final_net_db)?;
    writeln!(out, "  Avg Annual Cost:     ${:.2}", summary.average_annual_cost)?;
    writeln!(out, "  Peak Loan Balance:   ${:.2}", summary.peak_loan_balance)?;
    match summary.payoff_year {
        Some(year) => writeln!(out, "  Loan Repaid:         year {}", year)?,
        None => writeln!(out, "  Loan Repaid:         never")?,
    }
    match summary.net_db_irr {
        Some(irr) => writeln!(out, "  Net DB IRR:          {:.4}%", irr * 100.0),
        None => writeln!(out, "  Net DB IRR:          n/a"),
    }
}

pub fn print_comparison<W: Write>(out: &mut W, comparison: &ScenarioComparison) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<24} {:>16} {:>16} {:>16} {:>16} {:>16}",
        "Scenario", "Final Cash Value", "Death Benefit", "Net DB", "Total Cost", "Net DB vs Base"
    )?;
    writeln!(out, "{}", "-".repeat(110))?;

    for outcome in &comparison.outcomes {
        let m = &outcome.final_year;
        writeln!(
            out,
            "{:<24} {:>16.0} {:>16.0} {:>16.0} {:>16.0} {:>+16.0}",
            outcome.name, m.cash_value, m.db, m.net_db, m.total_cost, outcome.vs_baseline.net_db,
        )?;
    }

    writeln!(out, "\nGenerated {}", comparison.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))
}
