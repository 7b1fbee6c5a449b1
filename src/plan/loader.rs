//! Load plans, rate schedules and out-of-pocket overrides from disk
//!
//! Plans are JSON blobs in the saved-session shape. Schedules and overrides
//! are CSV files with a header row.

use super::{OutOfPocketOverrides, PlanParameters, RateSchedule, YearlyRate};
use crate::error::{PlanError, Result};
use csv::Reader;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Raw CSV row of a rate schedule file
#[derive(Debug, serde::Deserialize)]
struct RateCsvRow {
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "RateOfReturn")]
    rate_of_return: f64,
    #[serde(rename = "BorrowRate")]
    borrow_rate: f64,
}

impl RateCsvRow {
    fn to_rate(self, line: u64) -> Result<YearlyRate> {
        if self.year == 0 {
            return Err(PlanError::invalid_row(line, "year must be 1 or later"));
        }
        Ok(YearlyRate {
            year: self.year,
            rate_of_return: self.rate_of_return,
            borrow_rate: self.borrow_rate,
        })
    }
}

/// Raw CSV row of an override file
#[derive(Debug, serde::Deserialize)]
struct OverrideCsvRow {
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "OutOfPocket")]
    out_of_pocket: f64,
}

/// File line of the `index`-th data record (line 1 is the header)
fn data_line(index: usize) -> u64 {
    index as u64 + 2
}

/// Load a plan from a JSON file
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<PlanParameters> {
    let file = File::open(path)?;
    load_plan_from_reader(BufReader::new(file))
}

/// Load a plan from any reader; missing fields take the default plan's values
pub fn load_plan_from_reader<R: Read>(reader: R) -> Result<PlanParameters> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load a rate schedule from a CSV file
pub fn load_rate_schedule<P: AsRef<Path>>(path: P) -> Result<RateSchedule> {
    let file = File::open(path)?;
    load_rate_schedule_from_reader(file)
}

pub fn load_rate_schedule_from_reader<R: Read>(reader: R) -> Result<RateSchedule> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut rates = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: RateCsvRow = result?;
        rates.push(row.to_rate(data_line(index))?);
    }

    Ok(RateSchedule::from_rates(rates))
}

/// Load overrides from a CSV file, normalized against `plan`
pub fn load_overrides<P: AsRef<Path>>(path: P, plan: &PlanParameters) -> Result<OutOfPocketOverrides> {
    let file = File::open(path)?;
    load_overrides_from_reader(file, plan)
}

pub fn load_overrides_from_reader<R: Read>(reader: R, plan: &PlanParameters) -> Result<OutOfPocketOverrides> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut overrides = OutOfPocketOverrides::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: OverrideCsvRow = result?;
        if row.year == 0 {
            return Err(PlanError::invalid_row(data_line(index), "year must be 1 or later"));
        }
        overrides.set(row.year, row.out_of_pocket, plan);
    }

    Ok(overrides)
}
