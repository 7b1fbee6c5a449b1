//! Sparse per-year out-of-pocket overrides

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::PlanParameters;

/// Year -> overridden out-of-pocket amount
///
/// An override equal to the year's scheduled amount is not stored; `set` and
/// `normalize` enforce that so stale entries cannot survive a plan edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutOfPocketOverrides {
    amounts: BTreeMap<u32, f64>,
}

impl OutOfPocketOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an override for `year`, or drop it if it matches the schedule
    pub fn set(&mut self, year: u32, amount: f64, plan: &PlanParameters) {
        if amount == plan.scheduled_out_of_pocket(year) {
            self.amounts.remove(&year);
        } else {
            self.amounts.insert(year, amount);
        }
    }

    pub fn clear(&mut self, year: u32) -> Option<f64> {
        self.amounts.remove(&year)
    }

    pub fn get(&self, year: u32) -> Option<f64> {
        self.amounts.get(&year).copied()
    }

    /// Out-of-pocket actually paid in `year`
    pub fn resolve(&self, year: u32, plan: &PlanParameters) -> f64 {
        self.get(year)
            .unwrap_or_else(|| plan.scheduled_out_of_pocket(year))
    }

    /// Drop every entry that now equals the plan's schedule
    pub fn normalize(&mut self, plan: &PlanParameters) {
        self.amounts
            .retain(|&year, amount| *amount != plan.scheduled_out_of_pocket(year));
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Entries in year order
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.amounts.iter().map(|(&year, &amount)| (year, amount))
    }
}

impl FromIterator<(u32, f64)> for OutOfPocketOverrides {
    fn from_iter<I: IntoIterator<Item = (u32, f64)>>(iter: I) -> Self {
        Self {
            amounts: iter.into_iter().collect(),
        }
    }
}
