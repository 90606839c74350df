use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::scenario::Scenario;
use crate::service::{CalculationOutcome, CalculatorService};
use crate::templates::{RawInputs, Template, ValidationResult};

/// Body of `POST /api/v1/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub template: String,
    #[serde(default)]
    pub inputs: RawInputs,
    #[serde(default)]
    pub scenario: Option<Scenario>,
}

/// Router builder exposing the template catalog and the calculator.
pub fn calculator_router(service: Arc<CalculatorService>) -> Router {
    Router::new()
        .route("/api/v1/templates", get(list_templates_handler))
        .route("/api/v1/templates/:template_id", get(template_handler))
        .route(
            "/api/v1/templates/:template_id/validate",
            post(validate_handler),
        )
        .route("/api/v1/calculate", post(calculate_handler))
        .with_state(service)
}

pub(crate) async fn list_templates_handler(
    State(service): State<Arc<CalculatorService>>,
) -> Json<Vec<Template>> {
    Json(service.registry().templates().to_vec())
}

pub(crate) async fn template_handler(
    State(service): State<Arc<CalculatorService>>,
    Path(template_id): Path<String>,
) -> Result<Json<Template>, AppError> {
    Ok(Json(service.template(&template_id)?.clone()))
}

pub(crate) async fn validate_handler(
    State(service): State<Arc<CalculatorService>>,
    Path(template_id): Path<String>,
    Json(raw): Json<RawInputs>,
) -> Result<Json<ValidationResult>, AppError> {
    Ok(Json(service.validate(&template_id, &raw)?))
}

pub(crate) async fn calculate_handler(
    State(service): State<Arc<CalculatorService>>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculationOutcome>, AppError> {
    let outcome = service.run(&request.template, &request.inputs, request.scenario.as_ref())?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        calculator_router(Arc::new(CalculatorService::standard()))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = router().oneshot(request).await.expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn lists_every_template() {
        let request = Request::get("/api/v1/templates")
            .body(Body::empty())
            .expect("request builds");
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|template| template["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["subscription", "one_time_sales", "projects", "commission"]);
    }

    #[tokio::test]
    async fn unknown_template_is_not_found() {
        let request = Request::get("/api/v1/templates/custom")
            .body(Body::empty())
            .expect("request builds");
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!(true));
    }

    #[tokio::test]
    async fn validate_reports_field_errors_without_failing() {
        let (status, body) = send(post_json(
            "/api/v1/templates/subscription/validate",
            json!({ "arpu": 5000, "variable_cost": 1500, "cac": 3000 }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], json!(false));
        assert_eq!(body["errors"][0]["field"], "avg_lifetime_months");
    }

    #[tokio::test]
    async fn calculate_returns_metrics_flags_and_verdict() {
        let (status, body) = send(post_json(
            "/api/v1/calculate",
            json!({
                "template": "subscription",
                "inputs": {
                    "arpu": 5000,
                    "variable_cost": 1500,
                    "cac": 3000,
                    "avg_lifetime_months": 12
                }
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["template_id"], "subscription");
        assert_eq!(body["metrics"]["contribution_margin"]["value"], 3500);
        assert_eq!(body["metrics"]["ltv_cac_ratio"]["benchmark"], "excellent");
        assert_eq!(body["flags"], json!([]));
        assert_eq!(body["verdict"]["status"], "healthy");
    }

    #[tokio::test]
    async fn guard_failures_use_the_error_wire_shape() {
        let (status, body) = send(post_json(
            "/api/v1/calculate",
            json!({
                "template": "subscription",
                "inputs": { "arpu": 1000, "variable_cost": 1200, "cac": 500, "churn_rate": 5 }
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            json!({
                "error": true,
                "message": "Margin is negative or zero; raise price or cut cost."
            })
        );
    }

    #[tokio::test]
    async fn validation_failures_list_every_field() {
        let (status, body) = send(post_json(
            "/api/v1/calculate",
            json!({ "template": "projects", "inputs": { "project_revenue": 100000 } }),
        ))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], json!(true));
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn scenario_overrides_apply_before_calculation() {
        let (status, body) = send(post_json(
            "/api/v1/calculate",
            json!({
                "template": "transaction",
                "inputs": {
                    "avg_check": 2000,
                    "variable_cost": 800,
                    "cac": 1000,
                    "repeat_frequency": 4
                },
                "scenario": {
                    "id": "price_up",
                    "name": "Price +25%",
                    "overrides": [
                        { "field": "avg_check", "value": 1.25, "operator": "multiply" }
                    ]
                }
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["template_id"], "one_time_sales");
        assert_eq!(body["inputs"]["revenue"], json!(2500.0));
    }
}
