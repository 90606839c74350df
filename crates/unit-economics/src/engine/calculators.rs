//! Arithmetic core. No guards run here: the orchestrator rejects non-positive CAC and margin
//! first, so the zero fallbacks below only matter when a calculator is called on its own.

use super::domain::UnitInputs;

pub fn contribution_margin(inputs: &UnitInputs) -> f64 {
    inputs.revenue - inputs.variable_cost
}

pub fn contribution_margin_percent(margin: f64, revenue: f64) -> f64 {
    if revenue > 0.0 {
        margin / revenue * 100.0
    } else {
        0.0
    }
}

pub fn lifetime_value(margin: f64, lifetime_months: f64) -> f64 {
    margin * lifetime_months
}

/// Repeat cycles needed for cumulative margin to recoup CAC.
pub fn payback(cac: f64, margin: f64) -> f64 {
    if margin > 0.0 {
        cac / margin
    } else {
        0.0
    }
}

/// Whole units needed per month to cover fixed costs; fractional sales are not deliverable.
pub fn break_even_units(fixed_costs_monthly: f64, margin: f64) -> u64 {
    if margin > 0.0 && fixed_costs_monthly > 0.0 {
        (fixed_costs_monthly / margin).ceil() as u64
    } else {
        0
    }
}

pub fn ltv_cac_ratio(ltv: f64, cac: f64) -> f64 {
    if cac > 0.0 {
        ltv / cac
    } else {
        0.0
    }
}

/// Rounds to a fixed number of decimals, the way reported metric values are stored.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
