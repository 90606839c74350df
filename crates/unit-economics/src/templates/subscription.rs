use super::field::{FieldConstraint, FieldDescriptor, FieldKind};
use super::{optional_volume, RawInputs, Template, TemplateCalculations, TemplateId};
use crate::engine::{CalculationError, NormalizedInputs, SubscriptionInputs, UnitInputs};
use crate::templates::FieldError;

/// Lifetime assumed when churn is exactly zero, instead of an infinite one.
pub const ZERO_CHURN_LIFETIME_MONTHS: f64 = 60.0;

pub(super) fn template() -> Template {
    Template {
        id: TemplateId::Subscription,
        name: "Subscription",
        description: "Fitness clubs, online schools, SaaS, memberships",
        icon: "📅",
        fields: vec![
            FieldDescriptor::required(
                "arpu",
                "Average revenue per user (ARPU)",
                FieldKind::Money,
                FieldConstraint::Positive,
                "Monthly subscription or membership price",
            ),
            FieldDescriptor::required(
                "variable_cost",
                "Variable cost per client",
                FieldKind::Money,
                FieldConstraint::NonNegative,
                "Monthly cost of serving one client",
            ),
            FieldDescriptor::required(
                "cac",
                "CAC (acquisition cost)",
                FieldKind::Money,
                FieldConstraint::Positive,
                "What it costs to acquire one client",
            ),
            FieldDescriptor::optional(
                "avg_lifetime_months",
                "Average client lifetime",
                FieldKind::Months,
                FieldConstraint::Positive,
                "How many months a client stays on average",
            ),
            FieldDescriptor::optional(
                "churn_rate",
                "Churn rate",
                FieldKind::Percentage,
                FieldConstraint::Percent { allow_zero: true },
                "Share of clients leaving each month",
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
                "Current clients (optional)",
                FieldKind::Count,
                FieldConstraint::WholeNonNegative,
                "Size of the current client base",
            ),
        ],
        calculations: TemplateCalculations {
            contribution_margin: true,
            ltv: true,
            payback: true,
            break_even: true,
        },
        refine: Some(refine),
        normalize,
    }
}

fn has_lifetime(raw: &RawInputs) -> bool {
    raw.get("avg_lifetime_months")
        .is_some_and(|months| months != 0.0 && !months.is_nan())
}

fn refine(raw: &RawInputs) -> Vec<FieldError> {
    if has_lifetime(raw) || raw.get("churn_rate").is_some() {
        Vec::new()
    } else {
        vec![FieldError::new(
            "avg_lifetime_months",
            CalculationError::MissingLifetime.message(),
        )]
    }
}

/// A supplied lifetime wins; otherwise it is derived from monthly churn.
fn derive_lifetime(raw: &RawInputs) -> Result<f64, CalculationError> {
    if has_lifetime(raw) {
        return raw.require("avg_lifetime_months");
    }

    match raw.get("churn_rate") {
        Some(churn) if churn > 0.0 => Ok(100.0 / churn),
        Some(churn) if churn == 0.0 => Ok(ZERO_CHURN_LIFETIME_MONTHS),
        _ => Err(CalculationError::MissingLifetime),
    }
}

fn normalize(raw: &RawInputs) -> Result<NormalizedInputs, CalculationError> {
    let lifetime = derive_lifetime(raw)?;
    let base = UnitInputs {
        lifetime: Some(lifetime),
        fixed_costs_monthly: raw.get("fot_monthly"),
        current_volume: optional_volume(raw, "current_clients"),
        ..UnitInputs::new(
            raw.require("arpu")?,
            raw.require("variable_cost")?,
            raw.require("cac")?,
        )
    };

    Ok(NormalizedInputs::Subscription(SubscriptionInputs {
        base,
        churn_rate: raw.get("churn_rate"),
        original_lifetime: raw.get("avg_lifetime_months").filter(|_| has_lifetime(raw)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawInputs {
        RawInputs::new()
            .with("arpu", 5_000.0)
            .with("variable_cost", 1_500.0)
            .with("cac", 3_000.0)
    }

    fn lifetime_of(raw: &RawInputs) -> Option<f64> {
        normalize(raw).expect("normalizes").base().lifetime
    }

    #[test]
    fn supplied_lifetime_wins_over_churn() {
        let raw = raw().with("avg_lifetime_months", 12.0).with("churn_rate", 50.0);
        let inputs = normalize(&raw).expect("normalizes");

        assert_eq!(inputs.base().lifetime, Some(12.0));
        assert_eq!(inputs.churn_rate(), Some(50.0));
        match inputs {
            NormalizedInputs::Subscription(inputs) => {
                assert_eq!(inputs.original_lifetime, Some(12.0));
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn churn_derives_lifetime() {
        assert_eq!(lifetime_of(&raw().with("churn_rate", 5.0)), Some(20.0));
        assert_eq!(lifetime_of(&raw().with("churn_rate", 8.0)), Some(12.5));
    }

    #[test]
    fn zero_churn_is_capped_rather_than_infinite() {
        let raw = raw().with("churn_rate", 0.0);
        assert_eq!(lifetime_of(&raw), Some(ZERO_CHURN_LIFETIME_MONTHS));
    }

    #[test]
    fn zero_lifetime_falls_through_to_churn() {
        let raw = raw().with("avg_lifetime_months", 0.0).with("churn_rate", 10.0);
        assert_eq!(lifetime_of(&raw), Some(10.0));
    }

    #[test]
    fn neither_lifetime_nor_churn_is_a_typed_error() {
        assert_eq!(normalize(&raw()), Err(CalculationError::MissingLifetime));

        let template = template();
        let result = template.validate(&raw());
        assert!(!result.valid);
        assert_eq!(result.errors[0].field, "avg_lifetime_months");
    }

    #[test]
    fn optional_inputs_feed_break_even() {
        let raw = raw()
            .with("avg_lifetime_months", 12.0)
            .with("fot_monthly", 70_000.0)
            .with("current_clients", 15.0);
        let inputs = normalize(&raw).expect("normalizes");

        assert_eq!(inputs.base().fixed_costs_monthly, Some(70_000.0));
        assert_eq!(inputs.base().current_volume, Some(15.0));
    }

    #[test]
    fn validation_rejects_bad_bounds_before_refining() {
        let raw = raw().with("arpu", 0.0).with("churn_rate", 120.0);
        let result = template().validate(&raw);
        let fields: Vec<&str> = result.errors.iter().map(|error| error.field.as_str()).collect();
        assert_eq!(fields, vec!["arpu", "churn_rate"]);
    }
}
