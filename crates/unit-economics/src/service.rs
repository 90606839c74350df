use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::{calculate, CalculationError, CalculationResult, NormalizedInputs};
use crate::scenario::Scenario;
use crate::templates::{
    RawInputs, Template, TemplateId, TemplateRegistry, UnknownTemplateId, ValidationErrors,
    ValidationResult,
};

/// Normalized inputs and the engine's result for one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub template_id: TemplateId,
    pub inputs: NormalizedInputs,
    #[serde(flatten)]
    pub result: CalculationResult,
}

/// Service composing template lookup, scenario overrides, validation and the engine.
///
/// Holds only the immutable registry, so one instance can be shared across request handlers.
#[derive(Debug, Clone)]
pub struct CalculatorService {
    registry: Arc<TemplateRegistry>,
}

impl CalculatorService {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn standard() -> Self {
        Self::new(TemplateRegistry::standard())
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn template(&self, template_id: &str) -> Result<&Template, CalculatorServiceError> {
        Ok(self.registry.resolve(template_id)?)
    }

    pub fn validate(
        &self,
        template_id: &str,
        raw: &RawInputs,
    ) -> Result<ValidationResult, CalculatorServiceError> {
        Ok(self.template(template_id)?.validate(raw))
    }

    /// Resolve the template, apply the scenario, then validate, normalize and calculate.
    pub fn run(
        &self,
        template_id: &str,
        raw: &RawInputs,
        scenario: Option<&Scenario>,
    ) -> Result<CalculationOutcome, CalculatorServiceError> {
        let template = self.template(template_id)?;
        let adjusted;
        let raw = match scenario {
            Some(scenario) => {
                debug!(
                    template = %template.id,
                    scenario = %scenario.id,
                    overrides = scenario.overrides.len(),
                    "applying scenario overrides"
                );
                adjusted = scenario.apply(raw);
                &adjusted
            }
            None => raw,
        };

        if let Err(errors) = template.validate(raw).into_result() {
            debug!(
                template = %template.id,
                errors = errors.errors.len(),
                first = errors.first_message(),
                "inputs failed validation"
            );
            return Err(errors.into());
        }

        let outcome = template
            .normalize(raw)
            .and_then(|inputs| calculate(&inputs).map(|result| (inputs, result)));

        match outcome {
            Ok((inputs, result)) => {
                info!(
                    template = %template.id,
                    verdict = result.verdict.status.label(),
                    flags = result.flags.len(),
                    "calculation completed"
                );
                Ok(CalculationOutcome {
                    template_id: template.id,
                    inputs,
                    result,
                })
            }
            Err(error) => {
                warn!(
                    template = %template.id,
                    field = error.field().unwrap_or("-"),
                    %error,
                    "calculation rejected"
                );
                Err(error.into())
            }
        }
    }

    /// One independent outcome per row; a failing row does not stop the rest.
    pub fn run_batch(
        &self,
        template_id: &str,
        rows: &[RawInputs],
    ) -> Vec<Result<CalculationOutcome, CalculatorServiceError>> {
        rows.iter()
            .map(|raw| self.run(template_id, raw, None))
            .collect()
    }
}

impl Default for CalculatorService {
    fn default() -> Self {
        Self::standard()
    }
}

/// Error raised by the calculator service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalculatorServiceError {
    #[error(transparent)]
    UnknownTemplate(#[from] UnknownTemplateId),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Calculation(#[from] CalculationError),
}
