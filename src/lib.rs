//! Premium Finance - projection engine for premium-financed life insurance
//!
//! This library provides:
//! - Year-by-year ledger projection (loan balance, cash value, death benefit)
//! - Out-of-pocket override recalculation with full cascade to later years
//! - Sparse per-year rate schedules with documented defaults
//! - Ledger summaries, scenario comparison and CSV export

pub mod error;
pub mod plan;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use error::PlanError;
pub use plan::{OutOfPocketOverrides, PlanParameters, RateSchedule, YearlyRate};
pub use projection::{LedgerPolicy, LedgerSummary, ProjectionConfig, ProjectionEngine, ProjectionResult, YearRow};
pub use scenario::ScenarioRunner;
