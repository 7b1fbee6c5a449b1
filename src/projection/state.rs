//! Carry-forward state between projection years

use super::ledger::YearRow;

/// Balances carried from one year to the next
///
/// Only the immediately preceding year is kept, which makes the projection a
/// first-order recurrence.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    /// Current projection year (1-indexed, 0 before the first year)
    pub year: u32,

    /// Prior year's ending cash value
    pub prev_cash_value: f64,

    /// Prior year's reported ending loan balance (0 once paid off)
    pub prev_eoy_bal: f64,

    /// Running total of contributions
    pub total_cost: f64,

    /// Set in the payoff year; the loan ledger stays closed afterwards
    pub loan_retired: bool,
}

impl LedgerState {
    /// State before year 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to next year
    pub fn advance_year(&mut self) {
        self.year += 1;
    }

    /// Carry the finished row forward
    pub fn record(&mut self, row: &YearRow) {
        self.prev_cash_value = row.cash_value;
        self.prev_eoy_bal = row.eoy_bal;
        self.total_cost = row.total_cost;
        if row.is_payoff() {
            self.loan_retired = true;
        }
    }
}
