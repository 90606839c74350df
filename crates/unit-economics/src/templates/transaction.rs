use super::field::{FieldConstraint, FieldDescriptor, FieldKind};
use super::{optional_volume, RawInputs, Template, TemplateCalculations, TemplateId};
use crate::engine::{CalculationError, NormalizedInputs, TransactionInputs, UnitInputs};

/// Horizon LTV is measured over for repeat-purchase models.
pub const REPEAT_HORIZON_MONTHS: f64 = 12.0;

pub(super) fn template() -> Template {
    Template {
        id: TemplateId::OneTimeSales,
        name: "One-time sales",
        description: "Marketplaces, e-commerce and retail with repeat purchases",
        icon: "💰",
        fields: vec![
            FieldDescriptor::required(
                "avg_check",
                "Average check",
                FieldKind::Money,
                FieldConstraint::Positive,
                "Revenue of one purchase",
            ),
            FieldDescriptor::required(
                "variable_cost",
                "Variable cost per purchase",
                FieldKind::Money,
                FieldConstraint::NonNegative,
                "Cost of goods and fulfilment for one purchase",
            ),
            FieldDescriptor::required(
                "cac",
                "CAC (acquisition cost)",
                FieldKind::Money,
                FieldConstraint::Positive,
                "What it costs to acquire one customer",
            ),
            FieldDescriptor::required(
                "repeat_frequency",
                "Purchases per year",
                FieldKind::PerYear,
                FieldConstraint::Positive,
                "How often one customer buys in a year",
            ),
            FieldDescriptor::optional(
                "fot_monthly",
                "Monthly payroll (optional)",
                FieldKind::Money,
                FieldConstraint::NonNegative,
                "Team salaries, used for break-even",
            ),
            FieldDescriptor::optional(
                "current_clients",
                "Current customers (optional)",
                FieldKind::Count,
                FieldConstraint::WholeNonNegative,
                "Size of the current customer base",
            ),
        ],
        calculations: TemplateCalculations {
            contribution_margin: true,
            ltv: true,
            payback: true,
            break_even: true,
        },
        refine: None,
        normalize,
    }
}

fn normalize(raw: &RawInputs) -> Result<NormalizedInputs, CalculationError> {
    let base = UnitInputs {
        lifetime: Some(REPEAT_HORIZON_MONTHS),
        repeat_frequency: Some(raw.require("repeat_frequency")?),
        fixed_costs_monthly: raw.get("fot_monthly"),
        current_volume: optional_volume(raw, "current_clients"),
        ..UnitInputs::new(
            raw.require("avg_check")?,
            raw.require("variable_cost")?,
            raw.require("cac")?,
        )
    };

    Ok(NormalizedInputs::OneTimeSales(TransactionInputs { base }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_check_and_frequency_over_a_fixed_horizon() {
        let raw = RawInputs::new()
            .with("avg_check", 2_000.0)
            .with("variable_cost", 800.0)
            .with("cac", 1_000.0)
            .with("repeat_frequency", 4.0);

        let inputs = normalize(&raw).expect("normalizes");
        let base = inputs.base();
        assert_eq!(base.revenue, 2_000.0);
        assert_eq!(base.lifetime, Some(REPEAT_HORIZON_MONTHS));
        assert_eq!(base.repeat_frequency, Some(4.0));
        assert_eq!(base.fixed_costs_monthly, None);
        assert_eq!(inputs.template_id(), TemplateId::OneTimeSales);
    }

    #[test]
    fn missing_frequency_is_reported_by_field() {
        let raw = RawInputs::new()
            .with("avg_check", 2_000.0)
            .with("variable_cost", 800.0)
            .with("cac", 1_000.0);

        assert_eq!(
            normalize(&raw),
            Err(CalculationError::MissingField {
                field: "repeat_frequency".to_string()
            })
        );
        let result = template().validate(&raw);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Purchases per year is required");
    }
}
