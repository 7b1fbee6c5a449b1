//! AWS Lambda handler for running premium finance projections
//!
//! Accepts a plan (and optional out-of-pocket overrides) as JSON and returns
//! the yearly ledger with its summary. Nothing is stored between requests.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::{info, warn};
use premium_finance::{
    LedgerPolicy, LedgerSummary, OutOfPocketOverrides, PlanParameters, ProjectionConfig, ProjectionEngine,
    YearRow,
};
use serde::{Deserialize, Serialize};

/// Input for one projection
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    /// Plan parameters; missing fields take the default illustration values
    #[serde(default)]
    pub plan: PlanParameters,

    /// Year -> out-of-pocket amount
    #[serde(default)]
    pub overrides: OutOfPocketOverrides,

    /// Number of years to project (default: 30)
    #[serde(default = "default_horizon")]
    pub horizon: u32,

    /// Ledger policy (default: standard)
    #[serde(default)]
    pub ledger: LedgerPolicy,
}

fn default_horizon() -> u32 { premium_finance::plan::DEFAULT_HORIZON }

/// Longest projection served
const MAX_HORIZON: u32 = 120;

/// Output from the projection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResponse {
    pub horizon: u32,
    pub ledger: LedgerPolicy,
    pub summary: LedgerSummary,
    pub rows: Vec<YearRow>,
    pub execution_time_ms: u64,
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message });
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(body.to_string()))?)
}

fn json_response(body: &ProjectionResponse) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

/// Parse and validate a request body; errors carry the HTTP status to return
fn parse_request(body: &str) -> Result<ProjectionRequest, (u16, String)> {
    let mut request: ProjectionRequest =
        serde_json::from_str(body).map_err(|e| (400, format!("Invalid JSON: {}", e)))?;

    if request.horizon == 0 || request.horizon > MAX_HORIZON {
        return Err((400, format!("horizon must be between 1 and {}", MAX_HORIZON)));
    }

    request.overrides.normalize(&request.plan);
    Ok(request)
}

fn run_projection(request: &ProjectionRequest) -> (LedgerSummary, Vec<YearRow>) {
    let config = ProjectionConfig {
        horizon: request.horizon,
        ledger: request.ledger,
    };
    let result = ProjectionEngine::new(config).project_with_overrides(&request.plan, &request.overrides);
    (result.summary(), result.rows)
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?);
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let request = match parse_request(&body_str) {
        Ok(r) => r,
        Err((status, message)) => {
            warn!("rejecting request: {}", message);
            return error_response(status, &message);
        }
    };

    let (summary, rows) = run_projection(&request);

    let execution_time_ms = start.elapsed().as_millis() as u64;
    info!(
        "projected {} years with {} overrides in {} ms",
        request.horizon,
        request.overrides.len(),
        execution_time_ms
    );

    let response = ProjectionResponse {
        horizon: request.horizon,
        ledger: request.ledger,
        summary,
        rows,
        execution_time_ms,
    };

    json_response(&response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
