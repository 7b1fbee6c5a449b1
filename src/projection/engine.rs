//! Core projection engine for yearly premium finance ledgers

use log::debug;
use serde::{Deserialize, Serialize};

use super::ledger::{ProjectionResult, YearRow};
use super::state::LedgerState;
use crate::plan::{OutOfPocketOverrides, PlanParameters, DEFAULT_HORIZON};

/// Loan and cost accounting rules
///
/// The two policies are different recurrences; pick one explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerPolicy {
    /// BOY balance = prior EOY + premium - out-of-pocket, full interest accrues,
    /// fee is charged to cash value only and excluded from total cost
    #[default]
    Standard,
    /// BOY balance = prior EOY + premium + fee; out-of-pocket services the
    /// interest and only the unpaid remainder capitalizes; total cost
    /// includes the fee
    CapitalizedInterest,
}

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Number of years to project
    pub horizon: u32,

    /// Loan and cost accounting rules
    pub ledger: LedgerPolicy,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            ledger: LedgerPolicy::Standard,
        }
    }
}

impl ProjectionConfig {
    pub fn with_horizon(horizon: u32) -> Self {
        Self {
            horizon,
            ..Default::default()
        }
    }
}

/// Main projection engine
///
/// Holds no state between calls; every projection starts from zero balances.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project a plan using its scheduled out-of-pocket amounts
    pub fn project(&self, plan: &PlanParameters) -> ProjectionResult {
        self.project_with(plan, |year| plan.scheduled_out_of_pocket(year))
    }

    /// Project a plan with some years' out-of-pocket replaced
    ///
    /// Every later year is recomputed, so an early override cascades through
    /// the loan balance and total cost.
    pub fn project_with_overrides(
        &self,
        plan: &PlanParameters,
        overrides: &OutOfPocketOverrides,
    ) -> ProjectionResult {
        self.project_with(plan, |year| overrides.resolve(year, plan))
    }

    /// Run the yearly recurrence with an arbitrary out-of-pocket resolver
    pub fn project_with<F>(&self, plan: &PlanParameters, out_of_pocket: F) -> ProjectionResult
    where
        F: Fn(u32) -> f64,
    {
        let mut result = ProjectionResult::new(self.config.ledger);
        result.rows.reserve(self.config.horizon as usize);
        let mut state = LedgerState::new();

        for _ in 1..=self.config.horizon {
            state.advance_year();

            let oop = out_of_pocket(state.year);
            let row = self.calculate_year(plan, &state, oop);

            state.record(&row);
            result.add_row(row);
        }

        result
    }

    /// Calculate the ledger row for the state's current year
    fn calculate_year(&self, plan: &PlanParameters, state: &LedgerState, oop: f64) -> YearRow {
        let year = state.year;
        let rates = plan.yearly_rates.resolve(year);
        let growth = 1.0 + rates.rate_of_return / 100.0;

        let mut row = YearRow::new(year, plan.age_in_year(year));
        row.rate_of_return = rates.rate_of_return;
        row.borrow_rate = rates.borrow_rate;
        row.premium = plan.premium_in_year(year);
        row.fee = plan.fee_in_year(year);
        row.oop = oop;

        // Loan ledger
        let eoy_bal = if state.loan_retired {
            0.0
        } else {
            self.roll_loan(state, &mut row, rates.borrow_rate)
        };

        // Cash value; fee is zero outside year 1
        let mut cash_value = state.prev_cash_value * growth + row.premium - row.fee;

        // One-shot payoff at the target year
        if !state.loan_retired && year == plan.payment_years && cash_value >= eoy_bal {
            row.withdrawal = eoy_bal;
        }
        if year == plan.payment_years {
            if row.is_payoff() {
                debug!("year {}: loan of {:.2} repaid from cash value {:.2}", year, eoy_bal, cash_value);
            } else if !state.loan_retired {
                debug!("year {}: cash value {:.2} short of loan {:.2}, no payoff", year, cash_value, eoy_bal);
            }
        }
        cash_value -= row.withdrawal;
        row.cash_value = cash_value;

        let loan_closed = row.is_payoff() || state.loan_retired;
        let outstanding = if loan_closed { 0.0 } else { eoy_bal };

        // Death benefit
        let exposure_growth = plan.initial_exposure * growth.powi(year as i32 - 1);
        row.db = plan.death_benefit + exposure_growth;
        row.net_db = row.db - outstanding + cash_value;
        row.collateral = if loan_closed {
            0.0
        } else {
            (eoy_bal - cash_value).max(0.0)
        };

        row.total_cost = state.total_cost + oop;
        if self.config.ledger == LedgerPolicy::CapitalizedInterest {
            row.total_cost += row.fee;
        }

        row.eoy_bal = outstanding;
        row
    }

    /// Fill BOY balance and interest on `row`; returns the unreported EOY balance
    fn roll_loan(&self, state: &LedgerState, row: &mut YearRow, borrow_rate: f64) -> f64 {
        match self.config.ledger {
            LedgerPolicy::Standard => {
                row.boy_bal = state.prev_eoy_bal + row.premium - row.oop;
                row.interest_charge = row.boy_bal * (borrow_rate / 100.0);
                row.boy_bal + row.interest_charge
            }
            LedgerPolicy::CapitalizedInterest => {
                row.boy_bal = state.prev_eoy_bal + row.premium + row.fee;
                row.interest_charge = row.boy_bal * (borrow_rate / 100.0);
                row.boy_bal + (row.interest_charge - row.oop).max(0.0)
            }
        }
    }
}

/// Project `plan` over `horizon` years under the standard ledger
pub fn project(plan: &PlanParameters, horizon: u32) -> Vec<YearRow> {
    ProjectionEngine::new(ProjectionConfig::with_horizon(horizon))
        .project(plan)
        .rows
}

/// Project `plan` over `horizon` years with out-of-pocket overrides
pub fn project_with_overrides(
    plan: &PlanParameters,
    overrides: &OutOfPocketOverrides,
    horizon: u32,
) -> Vec<YearRow> {
    ProjectionEngine::new(ProjectionConfig::with_horizon(horizon))
        .project_with_overrides(plan, overrides)
        .rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{RateSchedule, YearRates};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn capitalized_engine() -> ProjectionEngine {
        ProjectionEngine::new(ProjectionConfig {
            ledger: LedgerPolicy::CapitalizedInterest,
            ..Default::default()
        })
    }

    #[test]
    fn test_projection_runs() {
        let rows = project(&PlanParameters::default(), 30);

        assert_eq!(rows.len(), 30);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.year, i as u32 + 1);
            assert_eq!(row.age, 45 + i as u32);
        }
    }

    #[test]
    fn test_first_year_default_plan() {
        let rows = project(&PlanParameters::default(), 30);
        let row = &rows[0];

        assert_eq!(row.premium, 2_400_000.0);
        assert_eq!(row.fee, 10_000.0);
        assert_eq!(row.oop, 700_000.0);
        assert_eq!(row.rate_of_return, 6.5);
        assert_eq!(row.borrow_rate, 5.5);
        assert_relative_eq!(row.boy_bal, 1_700_000.0);
        assert_relative_eq!(row.interest_charge, 93_500.0, epsilon = 1e-6);
        assert_relative_eq!(row.eoy_bal, 1_793_500.0, epsilon = 1e-6);
        assert_relative_eq!(row.cash_value, 2_390_000.0);
        assert_relative_eq!(row.db, 53_044_886.0);
        assert_relative_eq!(row.net_db, 53_641_386.0, epsilon = 1e-6);
        assert_eq!(row.collateral, 0.0);
        assert_eq!(row.total_cost, 700_000.0);
    }

    #[test]
    fn test_second_year_carries_prior_balances() {
        let rows = project(&PlanParameters::default(), 2);
        let row = &rows[1];

        assert_relative_eq!(row.boy_bal, 3_493_500.0, epsilon = 1e-6);
        assert_relative_eq!(row.eoy_bal, 3_685_642.5, epsilon = 1e-6);
        assert_relative_eq!(row.cash_value, 4_945_350.0, epsilon = 1e-6);
        assert_eq!(row.total_cost, 1_400_000.0);
    }

    #[test]
    fn test_default_plan_pays_off_at_payment_year() {
        let result = ProjectionEngine::default().project(&PlanParameters::default());
        let rows = &result.rows;

        assert!(rows[..14].iter().all(|r| r.withdrawal == 0.0));

        let payoff = &rows[14];
        assert_relative_eq!(payoff.withdrawal, 26_058_615.501822, epsilon = 1e-3);
        assert_relative_eq!(payoff.cash_value, 18_289_703.811018, epsilon = 1e-3);
        assert_eq!(payoff.eoy_bal, 0.0);
        assert_eq!(payoff.collateral, 0.0);
        assert_relative_eq!(payoff.net_db, payoff.db + payoff.cash_value);

        for row in &rows[15..] {
            assert_eq!(row.boy_bal, 0.0);
            assert_eq!(row.eoy_bal, 0.0);
            assert_eq!(row.oop, 0.0);
            assert_eq!(row.total_cost, 10_500_000.0);
        }
        assert_eq!(result.summary().payoff_year, Some(15));
    }

    #[test]
    fn test_no_premium_no_payment_plan() {
        let plan = PlanParameters {
            payment_years: 0,
            premium_years: 0,
            first_year_fee: 0.0,
            ..Default::default()
        };
        let rows = project(&plan, 30);

        for row in &rows {
            assert_eq!(row.premium, 0.0);
            assert_eq!(row.oop, 0.0);
            assert_eq!(row.boy_bal, 0.0);
            assert_eq!(row.eoy_bal, 0.0);
            assert_eq!(row.cash_value, 0.0);
            assert_eq!(row.withdrawal, 0.0);
        }
        assert_relative_eq!(rows[0].db, 50_000_000.0 + 3_044_886.0);
        assert_relative_eq!(rows[2].db, 50_000_000.0 + 3_044_886.0 * 1.065 * 1.065, epsilon = 1e-6);
    }

    #[test]
    fn test_short_cash_value_skips_payoff() {
        let mut plan = PlanParameters::default();
        plan.yearly_rates = RateSchedule::new();
        for year in 1..=30 {
            plan.yearly_rates.set(year, YearRates { rate_of_return: 0.0, borrow_rate: 10.0 });
        }
        let rows = project(&plan, 30);

        assert!(rows.iter().all(|r| r.withdrawal == 0.0));

        let at_target = &rows[14];
        assert!(at_target.cash_value < at_target.eoy_bal);
        assert!(at_target.collateral > 0.0);

        // Balance keeps compounding with nothing added or paid
        let next = &rows[15];
        assert_eq!(next.boy_bal, at_target.eoy_bal);
        assert_relative_eq!(next.eoy_bal, at_target.eoy_bal * 1.1, epsilon = 1e-4);
    }

    #[test]
    fn test_explicit_rates_per_year() {
        let mut plan = PlanParameters::default();
        plan.yearly_rates.set_borrow_rate(1, 4.0);
        plan.yearly_rates.set_rate_of_return(2, 8.0);
        let rows = project(&plan, 2);

        assert_relative_eq!(rows[0].interest_charge, 68_000.0, epsilon = 1e-6);
        assert_eq!(rows[1].rate_of_return, 8.0);
        assert_relative_eq!(rows[1].cash_value, 2_390_000.0 * 1.08 + 2_400_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_deterministic() {
        let plan = PlanParameters::default();
        let engine = ProjectionEngine::default();
        assert_eq!(engine.project(&plan), engine.project(&plan));
    }

    #[test]
    fn test_override_year_one_cascades() {
        let plan = PlanParameters::default();
        let mut overrides = OutOfPocketOverrides::new();
        overrides.set(1, 0.0, &plan);

        let base = project(&plan, 30);
        let edited = project_with_overrides(&plan, &overrides, 30);

        assert_eq!(edited[0].oop, 0.0);
        assert_relative_eq!(edited[0].boy_bal, 2_400_000.0);

        for year in 0..14 {
            assert_ne!(edited[year].boy_bal, base[year].boy_bal);
            assert_ne!(edited[year].eoy_bal, base[year].eoy_bal);
            assert_eq!(edited[year].cash_value, base[year].cash_value);
        }
        for year in 0..30 {
            assert_relative_eq!(edited[year].total_cost, base[year].total_cost - 700_000.0);
        }
    }

    #[test]
    fn test_empty_overrides_match_plain_projection() {
        let plan = PlanParameters::default();
        let engine = ProjectionEngine::default();

        assert_eq!(
            engine.project(&plan),
            engine.project_with_overrides(&plan, &OutOfPocketOverrides::new())
        );
    }

    #[test]
    fn test_override_after_payoff_keeps_loan_closed() {
        let plan = PlanParameters::default();
        let mut overrides = OutOfPocketOverrides::new();
        overrides.set(20, 100_000.0, &plan);

        let rows = project_with_overrides(&plan, &overrides, 30);
        let row = &rows[19];

        assert_eq!(row.oop, 100_000.0);
        assert_eq!(row.boy_bal, 0.0);
        assert_eq!(row.eoy_bal, 0.0);
        assert_eq!(row.total_cost, 10_600_000.0);
    }

    #[test]
    fn test_premium_after_payoff_does_not_reopen_loan() {
        let plan = PlanParameters {
            payment_years: 5,
            premium_years: 10,
            out_of_pocket: 2_000_000.0,
            ..Default::default()
        };
        let rows = project(&plan, 30);

        assert!(rows[4].is_payoff());
        for row in &rows[5..] {
            assert_eq!(row.eoy_bal, 0.0);
            assert_eq!(row.collateral, 0.0);
        }
        // Premium still credits the policy, unfunded
        assert_relative_eq!(rows[5].cash_value, rows[4].cash_value * 1.065 + 2_400_000.0, epsilon = 1e-6);
        for row in &rows[5..10] {
            assert_eq!(row.premium, 2_400_000.0);
            assert_eq!(row.oop, 0.0);
            assert_eq!(row.boy_bal, 0.0);
            assert_eq!(row.total_cost, rows[4].total_cost);
        }
    }

    #[test]
    fn test_capitalized_interest_first_year() {
        let result = capitalized_engine().project(&PlanParameters::default());
        let row = &result.rows[0];

        assert_relative_eq!(row.boy_bal, 2_410_000.0);
        assert_relative_eq!(row.interest_charge, 132_550.0, epsilon = 1e-6);
        // Out-of-pocket covers the interest, nothing capitalizes
        assert_relative_eq!(row.eoy_bal, 2_410_000.0);
        assert_eq!(row.total_cost, 710_000.0);
        assert_eq!(result.ledger, LedgerPolicy::CapitalizedInterest);
    }

    #[test]
    fn test_capitalized_interest_accrues_unpaid_remainder() {
        let rows = capitalized_engine().project(&PlanParameters::default()).rows;

        // Interest first exceeds the contribution in year 6
        assert_relative_eq!(rows[4].eoy_bal, 12_010_000.0, epsilon = 1e-6);
        assert_relative_eq!(rows[5].boy_bal, 14_410_000.0, epsilon = 1e-6);
        assert_relative_eq!(rows[5].eoy_bal, 14_502_550.0, epsilon = 1e-6);
        assert_eq!(rows[5].total_cost, 710_000.0 + 5.0 * 700_000.0);
    }

    #[test]
    fn test_horizon_controls_length() {
        let plan = PlanParameters::default();
        assert_eq!(project(&plan, 1).len(), 1);
        assert_eq!(project(&plan, 45).len(), 45);
        assert!(project(&plan, 0).is_empty());
    }

    fn arb_plan() -> impl Strategy<Value = PlanParameters> {
        (
            0u32..5_000_000,
            0u32..31,
            0u32..31,
            0u32..6_000_000,
            0u32..200_000,
            0u32..10_000_000,
            prop::collection::vec((1u32..31, -500i32..1500, 0i32..1500), 0..30),
        )
            .prop_map(|(oop, payment_years, premium_years, premium, fee, exposure, rates)| {
                let mut schedule = RateSchedule::new();
                for (year, ror_bp, borrow_bp) in rates {
                    schedule.set(
                        year,
                        YearRates {
                            rate_of_return: ror_bp as f64 / 100.0,
                            borrow_rate: borrow_bp as f64 / 100.0,
                        },
                    );
                }
                PlanParameters {
                    death_benefit: 10_000_000.0,
                    out_of_pocket: oop as f64,
                    payment_years,
                    premium_years,
                    annual_premium: premium as f64,
                    first_year_fee: fee as f64,
                    start_age: 40,
                    initial_exposure: exposure as f64,
                    yearly_rates: schedule,
                }
            })
    }

    fn arb_ledger() -> impl Strategy<Value = LedgerPolicy> {
        prop_oneof![
            Just(LedgerPolicy::Standard),
            Just(LedgerPolicy::CapitalizedInterest),
        ]
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_ledger_invariants_hold(
            plan in arb_plan(),
            ledger in arb_ledger(),
            horizon in 1u32..40,
            overrides in prop::collection::btree_map(1u32..40, 0u32..3_000_000, 0..5),
        ) {
            let engine = ProjectionEngine::new(ProjectionConfig { horizon, ledger });
            let overrides: OutOfPocketOverrides =
                overrides.into_iter().map(|(y, a)| (y, a as f64)).collect();
            let result = engine.project_with_overrides(&plan, &overrides);
            let rows = &result.rows;

            prop_assert_eq!(rows.len(), horizon as usize);

            let mut paid_off = false;
            let mut prior_cost = 0.0;
            for (i, row) in rows.iter().enumerate() {
                prop_assert_eq!(row.year, i as u32 + 1);
                prop_assert!(row.collateral >= 0.0);
                prop_assert!(row.total_cost >= prior_cost);
                prior_cost = row.total_cost;

                if paid_off {
                    prop_assert_eq!(row.eoy_bal, 0.0);
                    prop_assert_eq!(row.collateral, 0.0);
                    prop_assert_eq!(row.withdrawal, 0.0);
                }
                if row.is_payoff() {
                    prop_assert_eq!(row.year, plan.payment_years);
                    prop_assert_eq!(row.eoy_bal, 0.0);
                    paid_off = true;
                }
            }

            prop_assert_eq!(&result, &engine.project_with_overrides(&plan, &overrides));
        }

        #[test]
        fn prop_cash_value_ignores_out_of_pocket_before_payoff_year(
            plan in arb_plan(),
            year in 1u32..31,
            amount in 0u32..3_000_000,
        ) {
            let mut overrides = OutOfPocketOverrides::new();
            overrides.set(year, amount as f64, &plan);

            let base = project(&plan, 30);
            let edited = project_with_overrides(&plan, &overrides, 30);

            let first_payoff_year = plan.payment_years.max(1) as usize;
            for i in 0..first_payoff_year.min(30) - 1 {
                prop_assert_eq!(base[i].cash_value, edited[i].cash_value);
            }
        }
    }
}
