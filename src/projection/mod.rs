//! Projection engine for yearly premium finance ledgers

mod state;
mod engine;
mod ledger;
mod irr;

pub use state::LedgerState;
pub use engine::{project, project_with_overrides, LedgerPolicy, ProjectionConfig, ProjectionEngine};
pub use ledger::{LedgerSummary, ProjectionResult, YearRow};
pub use irr::{annual_irr, insured_cashflows, net_death_benefit_irr};
