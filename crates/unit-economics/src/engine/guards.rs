use super::calculators::contribution_margin;
use super::domain::{CalculationError, NormalizedInputs};

/// Pre-flight checks, in fixed order; the first failure wins.
pub fn run_guards(inputs: &NormalizedInputs) -> Result<(), CalculationError> {
    let base = inputs.base();

    if !is_positive(base.cac) {
        return Err(CalculationError::NonPositiveCac);
    }

    if !is_positive(contribution_margin(base)) {
        return Err(CalculationError::NonPositiveMargin);
    }

    Ok(())
}

// NaN compares false, so it fails the guard instead of leaking downstream.
fn is_positive(value: f64) -> bool {
    value > 0.0
}
