//! Plan parameters, rate schedules and out-of-pocket overrides

mod data;
mod overrides;
mod rates;
pub mod loader;

pub use data::PlanParameters;
pub use overrides::OutOfPocketOverrides;
pub use rates::{
    RateSchedule, YearRates, YearlyRate, DEFAULT_BORROW_RATE, DEFAULT_HORIZON, DEFAULT_RATE_OF_RETURN,
};
pub use loader::{load_overrides, load_plan, load_plan_from_reader, load_rate_schedule};
