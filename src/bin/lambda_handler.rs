//! AWS Lambda handler for buy-versus-rent comparisons
//!
//! Accepts model parameters as JSON and returns the comparison report with
//! the breakeven month and, optionally, the sweep tables and monthly series.
//!
//! Invoked directly the event is the request itself. Behind a Lambda
//! Function URL the request arrives as the `body` string of the event and
//! the response is wrapped in an HTTP envelope.

use home_ownership::{
    compare_ownership_to_renting, ComparisonReport, LoanTerms, MarketAssumptions, SweepConfig,
    SweepRunner,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use serde_json::{json, Value};

/// Input configuration for the comparison
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ComparisonRequest {
    pub market: MarketAssumptions,
    pub loan: LoanTerms,
    pub sweep: SweepConfig,

    /// Include the payment-by-term and breakeven-by-rent tables (default: true)
    pub include_sweeps: bool,

    /// Include the monthly rent/buy loss series (default: false)
    pub include_cashflows: bool,
}

impl Default for ComparisonRequest {
    fn default() -> Self {
        Self {
            market: MarketAssumptions::default(),
            loan: LoanTerms::default(),
            sweep: SweepConfig::default(),
            include_sweeps: true,
            include_cashflows: false,
        }
    }
}

fn error_body(message: &str) -> Value {
    json!({ "error": message })
}

/// Wrap a body in a Function URL response envelope
fn http_response(status: u16, body: &Value) -> Value {
    json!({
        "statusCode": status,
        "headers": {
            "Content-Type": "application/json",
            "Access-Control-Allow-Origin": "*",
            "Access-Control-Allow-Methods": "POST, OPTIONS",
            "Access-Control-Allow-Headers": "Content-Type",
        },
        "body": body.to_string(),
    })
}

/// Run the comparison; Err carries an HTTP status and message
fn evaluate(request: ComparisonRequest) -> Result<Value, (u16, String)> {
    let result = compare_ownership_to_renting(&request.market, &request.loan)
        .map_err(|e| (400, e.to_string()))?;

    let mut report = ComparisonReport::new(request.market, request.loan, &result);
    if request.include_sweeps {
        let runner = SweepRunner::new(request.market, request.loan);
        let (terms, rents) = runner.run(&request.sweep).map_err(|e| (400, e.to_string()))?;
        report = report.with_sweeps(terms, rents);
    }
    if request.include_cashflows {
        report = report.with_cashflows(&result);
    }

    serde_json::to_value(&report).map_err(|e| (500, e.to_string()))
}

/// Route one event: HTTP envelope or direct invocation
fn respond(payload: Value) -> Value {
    // Function URL events carry the request as a JSON string in `body`
    let body = match payload.get("body") {
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Null) => Some("{}".to_string()),
        _ => None,
    };
    let is_http = body.is_some() || payload.get("requestContext").is_some();

    if is_http {
        let method = payload
            .pointer("/requestContext/http/method")
            .and_then(Value::as_str)
            .unwrap_or("POST");
        if method == "OPTIONS" {
            return http_response(200, &Value::Null);
        }
    }

    let parsed = match &body {
        Some(text) => serde_json::from_str::<ComparisonRequest>(text),
        None => serde_json::from_value::<ComparisonRequest>(payload),
    };

    let outcome = match parsed {
        Ok(request) => evaluate(request),
        Err(e) => Err((400, format!("Invalid JSON: {}", e))),
    };

    let (status, body) = match outcome {
        Ok(report) => (200, report),
        Err((status, message)) => {
            log::warn!("Rejected request: {}", message);
            (status, error_body(&message))
        }
    };

    if is_http {
        http_response(status, &body)
    } else {
        body
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let start = std::time::Instant::now();
    let response = respond(event.payload);
    log::info!("Handled request in {:?}", start.elapsed());
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: ComparisonRequest = serde_json::from_str("{}").unwrap();
        assert!(request.include_sweeps);
        assert!(!request.include_cashflows);
        assert_eq!(request.loan, LoanTerms::default());
    }

    #[test]
    fn test_evaluate_report() {
        let request = ComparisonRequest {
            include_sweeps: false,
            ..ComparisonRequest::default()
        };
        let report = evaluate(request).unwrap();
        assert!(report["summary"]["breakeven_month"].is_u64());
        assert!(report.get("rent_sweep").is_none());
    }

    #[test]
    fn test_evaluate_invalid_parameters() {
        let mut request = ComparisonRequest::default();
        request.loan.term_years = 0;
        let (status, message) = evaluate(request).unwrap_err();
        assert_eq!(status, 400);
        assert!(message.contains("term_years"));
    }

    #[test]
    fn test_function_url_body() {
        let event = json!({
            "requestContext": { "http": { "method": "POST" } },
            "body": r#"{"include_sweeps": false, "loan": {"term_years": 20}}"#,
        });
        let response = respond(event);
        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");

        let report: Value = serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
        assert_eq!(report["loan"]["term_years"], 20);
        assert!(report["summary"]["breakeven_month"].is_u64());
    }

    #[test]
    fn test_options_preflight() {
        let event = json!({
            "requestContext": { "http": { "method": "OPTIONS" } },
        });
        let response = respond(event);
        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["body"], "null");
        assert_eq!(response["headers"]["Access-Control-Allow-Methods"], "POST, OPTIONS");
    }

    #[test]
    fn test_malformed_body() {
        let event = json!({
            "requestContext": { "http": { "method": "POST" } },
            "body": "{not json",
        });
        let response = respond(event);
        assert_eq!(response["statusCode"], 400);

        let body: Value = serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[test]
    fn test_direct_invocation_is_unwrapped() {
        let response = respond(json!({ "include_sweeps": false }));
        assert!(response.get("statusCode").is_none());
        assert!(response["summary"]["breakeven_month"].is_u64());
        assert!(response["generated_at"].is_string());
    }

    #[test]
    fn test_direct_invocation_invalid_parameters() {
        let response = respond(json!({ "loan": { "term_years": 0 } }));
        assert!(response.get("statusCode").is_none());
        assert!(response["error"].as_str().unwrap().contains("term_years"));
    }

    #[test]
    fn test_http_envelope() {
        let response = http_response(400, &error_body("bad"));
        assert_eq!(response["statusCode"], 400);
        assert_eq!(response["body"], r#"{"error":"bad"}"#);
    }
}
