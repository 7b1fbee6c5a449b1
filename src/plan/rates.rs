//! Per-year rate schedule
//!
//! Rates are percentages (6.5 means 6.5%). Years without an entry resolve to
//! the default pair.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default annual rate of return on cash value (percent)
pub const DEFAULT_RATE_OF_RETURN: f64 = 6.5;

/// Default annual borrow rate on the premium loan (percent)
pub const DEFAULT_BORROW_RATE: f64 = 5.5;

/// Standard illustration length in years
pub const DEFAULT_HORIZON: u32 = 30;

/// Resolved rates for a single year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRates {
    pub rate_of_return: f64,
    pub borrow_rate: f64,
}

impl Default for YearRates {
    fn default() -> Self {
        Self {
            rate_of_return: DEFAULT_RATE_OF_RETURN,
            borrow_rate: DEFAULT_BORROW_RATE,
        }
    }
}

/// Wire form of one schedule entry, as saved alongside a plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRate {
    pub year: u32,
    pub rate_of_return: f64,
    pub borrow_rate: f64,
}

/// Sparse mapping of year -> rates with a default pair
///
/// Serialized as the year-ordered list of [`YearlyRate`]. When the input list
/// repeats a year the last entry wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<YearlyRate>", into = "Vec<YearlyRate>")]
pub struct RateSchedule {
    rates: BTreeMap<u32, YearRates>,
}

impl RateSchedule {
    /// Empty schedule; every year uses the default pair
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit default entries for years 1..=horizon
    pub fn uniform(horizon: u32) -> Self {
        Self {
            rates: (1..=horizon).map(|year| (year, YearRates::default())).collect(),
        }
    }

    pub fn from_rates<I: IntoIterator<Item = YearlyRate>>(rates: I) -> Self {
        Self {
            rates: rates
                .into_iter()
                .map(|r| {
                    (
                        r.year,
                        YearRates {
                            rate_of_return: r.rate_of_return,
                            borrow_rate: r.borrow_rate,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Rates used for `year`, falling back to the defaults
    pub fn resolve(&self, year: u32) -> YearRates {
        self.rates.get(&year).copied().unwrap_or_default()
    }

    pub fn get(&self, year: u32) -> Option<YearRates> {
        self.rates.get(&year).copied()
    }

    pub fn set(&mut self, year: u32, rates: YearRates) {
        self.rates.insert(year, rates);
    }

    /// Edit the rate of return for one year, seeding a missing year with the defaults
    pub fn set_rate_of_return(&mut self, year: u32, rate_of_return: f64) {
        self.rates.entry(year).or_default().rate_of_return = rate_of_return;
    }

    /// Edit the borrow rate for one year, seeding a missing year with the defaults
    pub fn set_borrow_rate(&mut self, year: u32, borrow_rate: f64) {
        self.rates.entry(year).or_default().borrow_rate = borrow_rate;
    }

    pub fn remove(&mut self, year: u32) -> Option<YearRates> {
        self.rates.remove(&year)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Explicit entries in year order
    pub fn iter(&self) -> impl Iterator<Item = YearlyRate> + '_ {
        self.rates.iter().map(|(&year, r)| YearlyRate {
            year,
            rate_of_return: r.rate_of_return,
            borrow_rate: r.borrow_rate,
        })
    }
}

impl From<Vec<YearlyRate>> for RateSchedule {
    fn from(rates: Vec<YearlyRate>) -> Self {
        Self::from_rates(rates)
    }
}

impl From<RateSchedule> for Vec<YearlyRate> {
    fn from(schedule: RateSchedule) -> Self {
        schedule.iter().collect()
    }
}

impl FromIterator<YearlyRate> for RateSchedule {
    fn from_iter<I: IntoIterator<Item = YearlyRate>>(iter: I) -> Self {
        Self::from_rates(iter)
    }
}
