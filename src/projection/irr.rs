//! Annual internal rate of return on a ledger
//!
//! Expresses a ledger as the yearly return the insured earns on their
//! contributions when the final net death benefit is paid.

use super::ledger::YearRow;

/// Rates searched, as annual decimals
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 10.0;

const MAX_STEPS: usize = 200;
const TOLERANCE: f64 = 1e-13;

/// Present value of `cashflows` at discount factor `v`, and its slope in `v`
///
/// `cashflows[t]` falls at the start of year `t + 1`, so the value is a
/// polynomial in `v` evaluated by Horner's rule.
fn present_value(cashflows: &[f64], v: f64) -> (f64, f64) {
    cashflows
        .iter()
        .rev()
        .fold((0.0, 0.0), |(pv, slope), &cf| (pv * v + cf, slope * v + pv))
}

/// Annual IRR of yearly cash flows (negative = paid in, positive = received)
///
/// Solves for the discount factor with Newton steps kept inside a sign
/// bracket, falling back to halving the bracket when a step leaves it.
/// Returns `None` when no rate in [-99%, 1000%] zeroes the present value.
pub fn annual_irr(cashflows: &[f64]) -> Option<f64> {
    let mut lo = 1.0 / (1.0 + MAX_RATE);
    let mut hi = 1.0 / (1.0 + MIN_RATE);

    let (pv_lo, _) = present_value(cashflows, lo);
    let (pv_hi, _) = present_value(cashflows, hi);
    if pv_lo.signum() == pv_hi.signum() {
        return None;
    }
    let negative_at_lo = pv_lo < 0.0;

    let mut v = 1.0 / 1.05;
    for _ in 0..MAX_STEPS {
        let (pv, slope) = present_value(cashflows, v);
        if pv == 0.0 {
            break;
        }
        if (pv < 0.0) == negative_at_lo {
            lo = v;
        } else {
            hi = v;
        }

        let newton = v - pv / slope;
        let next = if newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };

        let step = (next - v).abs();
        v = next;
        if step <= TOLERANCE * v || hi - lo <= TOLERANCE * v {
            break;
        }
    }

    Some(1.0 / v - 1.0)
}

/// Insured's cash flows: each year's contribution paid at the start of the
/// year, and the final net death benefit received one year after the last.
///
/// Contributions are taken from the `total_cost` increments so that fees
/// counted by the capitalized-interest ledger are included.
pub fn insured_cashflows(rows: &[YearRow]) -> Vec<f64> {
    let mut cashflows = Vec::with_capacity(rows.len() + 1);
    let mut prior_cost = 0.0;

    for row in rows {
        cashflows.push(-(row.total_cost - prior_cost));
        prior_cost = row.total_cost;
    }

    if let Some(last) = rows.last() {
        cashflows.push(last.net_db);
    }

    cashflows
}

pub fn net_death_benefit_irr(rows: &[YearRow]) -> Option<f64> {
    annual_irr(&insured_cashflows(rows))
}
