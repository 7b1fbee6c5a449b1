//! Ledger output structures for projections

use serde::{Deserialize, Serialize};

use super::engine::LedgerPolicy;
use super::irr::net_death_benefit_irr;

/// A single row of projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRow {
    // Timing
    pub year: u32,
    pub age: u32,

    // Flows for the year
    pub premium: f64,
    pub fee: f64,
    pub oop: f64,
    pub withdrawal: f64,

    // Resolved rates (percent)
    pub rate_of_return: f64,
    pub borrow_rate: f64,

    // Loan ledger
    pub boy_bal: f64,
    pub interest_charge: f64,
    pub eoy_bal: f64,

    // Policy values
    pub cash_value: f64,
    pub db: f64,
    #[serde(rename = "netDB")]
    pub net_db: f64,
    pub collateral: f64,

    /// Cumulative contributions through this year
    pub total_cost: f64,
}

impl YearRow {
    /// Create a new row with zeroed amounts
    pub fn new(year: u32, age: u32) -> Self {
        Self {
            year,
            age,
            premium: 0.0,
            fee: 0.0,
            oop: 0.0,
            withdrawal: 0.0,
            rate_of_return: 0.0,
            borrow_rate: 0.0,
            boy_bal: 0.0,
            interest_charge: 0.0,
            eoy_bal: 0.0,
            cash_value: 0.0,
            db: 0.0,
            net_db: 0.0,
            collateral: 0.0,
            total_cost: 0.0,
        }
    }

    /// Whether the loan payoff fired in this year
    pub fn is_payoff(&self) -> bool {
        self.withdrawal > 0.0
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Ledger policy the rows were produced under
    pub ledger: LedgerPolicy,

    /// Yearly rows, year 1 first
    pub rows: Vec<YearRow>,
}

impl ProjectionResult {
    pub fn new(ledger: LedgerPolicy) -> Self {
        Self {
            ledger,
            rows: Vec::new(),
        }
    }

    /// Add a ledger row
    pub fn add_row(&mut self, row: YearRow) {
        self.rows.push(row);
    }

    pub fn final_row(&self) -> Option<&YearRow> {
        self.rows.last()
    }

    /// Get summary statistics
    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary::from_rows(&self.rows)
    }
}

/// Headline figures of a ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total_years: u32,
    pub final_cash_value: f64,
    pub total_out_of_pocket: f64,
    #[serde(rename = "finalNetDB")]
    pub final_net_db: f64,
    pub average_annual_cost: f64,
    pub payoff_year: Option<u32>,
    pub peak_loan_balance: f64,
    /// Annual IRR of contributions against the final net death benefit
    pub net_db_irr: Option<f64>,
}

impl LedgerSummary {
    pub fn from_rows(rows: &[YearRow]) -> Self {
        let Some(last) = rows.last() else {
            return Self {
                total_years: 0,
                final_cash_value: 0.0,
                total_out_of_pocket: 0.0,
                final_net_db: 0.0,
                average_annual_cost: 0.0,
                payoff_year: None,
                peak_loan_balance: 0.0,
                net_db_irr: None,
            };
        };

        let total_out_of_pocket = last.total_cost;
        let peak_loan_balance = rows.iter().map(|r| r.eoy_bal).fold(0.0, f64::max);

        Self {
            total_years: rows.len() as u32,
            final_cash_value: last.cash_value,
            total_out_of_pocket,
            final_net_db: last.net_db,
            average_annual_cost: total_out_of_pocket / rows.len() as f64,
            payoff_year: rows.iter().find(|r| r.is_payoff()).map(|r| r.year),
            peak_loan_balance,
            net_db_irr: net_death_benefit_irr(rows),
        }
    }
}
