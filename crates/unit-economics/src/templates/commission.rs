use super::field::{FieldConstraint, FieldDescriptor, FieldKind};
use super::transaction::REPEAT_HORIZON_MONTHS;
use super::{optional_volume, RawInputs, Template, TemplateCalculations, TemplateId};
use crate::engine::{CalculationError, CommissionInputs, NormalizedInputs, UnitInputs};

pub(super) fn template() -> Template {
    Template {
        id: TemplateId::Commission,
        name: "Commission",
        description: "Brokers, real estate and recruiting agencies paid a share of each deal",
        icon: "🤝",
        fields: vec![
            FieldDescriptor::required(
                "avg_deal_size",
                "Average deal size",
                FieldKind::Money,
                FieldConstraint::Positive,
                "Value of one closed deal",
            ),
            FieldDescriptor::required(
                "commission_percent",
                "Commission",
                FieldKind::Percentage,
                FieldConstraint::Percent { allow_zero: false },
                "Share of the deal value you keep",
            ),
            FieldDescriptor::required(
                "variable_cost",
                "Variable cost per deal",
                FieldKind::Money,
                FieldConstraint::NonNegative,
                "Direct cost of closing one deal",
            ),
            FieldDescriptor::required(
                "cac",
                "CAC (acquisition cost)",
                FieldKind::Money,
                FieldConstraint::Positive,
                "What it costs to win one client",
            ),
            FieldDescriptor::required(
                "deals_per_year",
                "Deals per client per year",
                FieldKind::PerYear,
                FieldConstraint::Positive,
                "How many deals one client brings in a year",
            ),
            FieldDescriptor::optional(
                "fot_monthly",
                "Monthly payroll (optional)",
                FieldKind::Money,
                FieldConstraint::NonNegative,
                "Team salaries, used for break-even",
            ),
            FieldDescriptor::optional(
                "current_deals",
                "Deals per month now (optional)",
                FieldKind::Count,
                FieldConstraint::WholeNonNegative,
                "Deals currently closed per month",
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
    let avg_deal_size = raw.require("avg_deal_size")?;
    let commission_percent = raw.require("commission_percent")?;

    let base = UnitInputs {
        lifetime: Some(REPEAT_HORIZON_MONTHS),
        repeat_frequency: Some(raw.require("deals_per_year")?),
        fixed_costs_monthly: raw.get("fot_monthly"),
        current_volume: optional_volume(raw, "current_deals"),
        ..UnitInputs::new(
            avg_deal_size * commission_percent / 100.0,
            raw.require("variable_cost")?,
            raw.require("cac")?,
        )
    };

    Ok(NormalizedInputs::Commission(CommissionInputs {
        base,
        commission_percent,
        avg_deal_size,
    }))
}
