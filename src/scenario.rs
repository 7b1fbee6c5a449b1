//! Scenario runner for side-by-side plan comparisons
//!
//! Each scenario is an independent projection, so a batch runs in parallel
//! and the results are diffed on their final year.

use crate::plan::PlanParameters;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, YearRow};
use chrono::{DateTime, Utc};
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A plan under a display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedPlan {
    pub name: String,
    pub plan: PlanParameters,
}

impl NamedPlan {
    pub fn new(name: impl Into<String>, plan: PlanParameters) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Final-year figures used to compare scenarios
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalYearMetrics {
    pub cash_value: f64,
    pub db: f64,
    #[serde(rename = "netDB")]
    pub net_db: f64,
    pub total_cost: f64,
}

impl FinalYearMetrics {
    pub fn from_row(row: &YearRow) -> Self {
        Self {
            cash_value: row.cash_value,
            db: row.db,
            net_db: row.net_db,
            total_cost: row.total_cost,
        }
    }

    /// Field-wise `self - other`
    pub fn minus(&self, other: &Self) -> Self {
        Self {
            cash_value: self.cash_value - other.cash_value,
            db: self.db - other.db,
            net_db: self.net_db - other.net_db,
            total_cost: self.total_cost - other.total_cost,
        }
    }
}

/// One scenario's outcome within a comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: ProjectionResult,
    pub final_year: FinalYearMetrics,
    /// Difference against the first scenario
    pub vs_baseline: FinalYearMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub generated_at: DateTime<Utc>,
    pub config: ProjectionConfig,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl ScenarioComparison {
    pub fn baseline(&self) -> Option<&ScenarioOutcome> {
        self.outcomes.first()
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

/// Runs batches of projections under one configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let comparison = runner.compare(&[
///     NamedPlan::new("Base", PlanParameters::default()),
///     NamedPlan::new("Lower OOP", lower_oop_plan),
/// ]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: ProjectionConfig,
}

impl ScenarioRunner {
    /// Create runner with the default 30-year standard ledger
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run a single projection
    pub fn run(&self, plan: &PlanParameters) -> ProjectionResult {
        ProjectionEngine::new(self.config.clone()).project(plan)
    }

    /// Run projections for multiple plans, preserving input order
    pub fn run_batch(&self, plans: &[PlanParameters]) -> Vec<ProjectionResult> {
        let engine = ProjectionEngine::new(self.config.clone());
        plans.par_iter().map(|p| engine.project(p)).collect()
    }

    /// Project every scenario and diff final years against the first one
    pub fn compare(&self, scenarios: &[NamedPlan]) -> ScenarioComparison {
        info!("comparing {} scenarios over {} years", scenarios.len(), self.config.horizon);

        let engine = ProjectionEngine::new(self.config.clone());
        let results: Vec<(String, ProjectionResult)> = scenarios
            .par_iter()
            .map(|s| (s.name.clone(), engine.project(&s.plan)))
            .collect();

        let final_metrics = |result: &ProjectionResult| {
            result
                .final_row()
                .map(FinalYearMetrics::from_row)
                .unwrap_or_default()
        };
        let baseline = results.first().map(|(_, r)| final_metrics(r)).unwrap_or_default();

        let outcomes = results
            .into_iter()
            .map(|(name, result)| {
                let final_year = final_metrics(&result);
                ScenarioOutcome {
                    name,
                    vs_baseline: final_year.minus(&baseline),
                    final_year,
                    result,
                }
            })
            .collect();

        ScenarioComparison {
            generated_at: Utc::now(),
            config: self.config.clone(),
            outcomes,
        }
    }
}
