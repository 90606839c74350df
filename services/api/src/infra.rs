use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use unit_economics::config::AppConfig;
use unit_economics::error::AppError;
use unit_economics::{CalculatorServiceError, TemplateId};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Template the CLI falls back to when `--template` is omitted.
pub(crate) fn load_default_template() -> Result<TemplateId, AppError> {
    Ok(AppConfig::load()?.calculator.default_template)
}

/// Same body the HTTP layer returns for a failed calculation.
pub(crate) fn error_payload(error: &CalculatorServiceError) -> Value {
    match error {
        CalculatorServiceError::Calculation(error) => json!(error),
        CalculatorServiceError::Validation(errors) => json!({
            "error": true,
            "message": errors.first_message(),
            "errors": errors.errors,
        }),
        CalculatorServiceError::UnknownTemplate(error) => json!({
            "error": true,
            "message": error.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unit_economics::templates::{FieldError, ValidationErrors};
    use unit_economics::CalculationError;

    #[test]
    fn error_payload_matches_the_wire_shapes() {
        let guard = CalculatorServiceError::Calculation(CalculationError::NonPositiveCac);
        assert_eq!(
            error_payload(&guard),
            json!({ "error": true, "message": "CAC must be greater than 0", "field": "cac" })
        );

        let validation = CalculatorServiceError::Validation(ValidationErrors {
            errors: vec![FieldError::new("arpu", "ARPU is required")],
        });
        let payload = error_payload(&validation);
        assert_eq!(payload["message"], "ARPU is required");
        assert_eq!(payload["errors"][0]["field"], "arpu");
    }
}
