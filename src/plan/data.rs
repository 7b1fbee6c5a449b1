//! Plan parameters matching the saved session format

use serde::{Deserialize, Serialize};

use super::rates::{RateSchedule, DEFAULT_HORIZON};

/// Immutable inputs of a premium finance illustration
///
/// Money amounts are plain dollars. No validation is applied: negative or
/// otherwise unusual values flow straight through the projection arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanParameters {
    /// Face amount of the base policy
    pub death_benefit: f64,

    /// Default annual cash contribution from the insured
    pub out_of_pocket: f64,

    /// Last year out-of-pocket is paid; also the target loan payoff year
    pub payment_years: u32,

    /// Last year the financed annual premium is paid
    pub premium_years: u32,

    /// Premium financed into the policy each premium year
    pub annual_premium: f64,

    /// One-time load charged in year 1
    pub first_year_fee: f64,

    /// Insured's age in year 1
    pub start_age: u32,

    /// Extra death benefit exposure that compounds at the rate of return
    pub initial_exposure: f64,

    /// Per-year rate of return and borrow rate
    pub yearly_rates: RateSchedule,
}

impl PlanParameters {
    /// Attained age in projection year `year` (1-indexed)
    pub fn age_in_year(&self, year: u32) -> u32 {
        self.start_age + year - 1
    }

    /// Financed premium paid in `year`
    pub fn premium_in_year(&self, year: u32) -> f64 {
        if year <= self.premium_years {
            self.annual_premium
        } else {
            0.0
        }
    }

    /// Scheduled (non-overridden) out-of-pocket for `year`
    pub fn scheduled_out_of_pocket(&self, year: u32) -> f64 {
        if year <= self.payment_years {
            self.out_of_pocket
        } else {
            0.0
        }
    }

    /// First-year load, zero in every other year
    pub fn fee_in_year(&self, year: u32) -> f64 {
        if year == 1 {
            self.first_year_fee
        } else {
            0.0
        }
    }
}

impl Default for PlanParameters {
    /// Starting plan of the illustrator
    fn default() -> Self {
        Self {
            death_benefit: 50_000_000.0,
            out_of_pocket: 700_000.0,
            payment_years: 15,
            premium_years: 10,
            annual_premium: 2_400_000.0,
            first_year_fee: 10_000.0,
            start_age: 45,
            initial_exposure: 3_044_886.0,
            yearly_rates: RateSchedule::uniform(DEFAULT_HORIZON),
        }
    }
}
