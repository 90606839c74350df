use super::{FlagRule, Ladder, RuleContext, Severity};
use crate::engine::benchmarks::LtvCacBand;
use crate::engine::format::{format_money, format_percent};

fn ltv_cac_in(context: &RuleContext<'_>, band: LtvCacBand) -> bool {
    context.metrics.ltv_cac_band() == Some(band)
}

fn observed_ltv_cac(context: &RuleContext<'_>) -> String {
    context
        .metrics
        .ltv_cac_ratio
        .as_ref()
        .map(|ratio| ratio.formatted.clone())
        .unwrap_or_default()
}

fn observed_margin(context: &RuleContext<'_>) -> String {
    format_percent(context.metrics.margin_percent())
}

fn observed_churn(context: &RuleContext<'_>) -> String {
    format_percent(context.inputs.churn_rate().unwrap_or_default())
}

fn repeat_frequency(context: &RuleContext<'_>) -> f64 {
    context.inputs.base().repeat_frequency.unwrap_or(0.0)
}

fn observed_frequency(context: &RuleContext<'_>) -> String {
    format!("{:.1} per year", repeat_frequency(context))
}

fn observed_payback(context: &RuleContext<'_>) -> String {
    context.metrics.payback.unit.clone()
}

fn observed_cac_share(context: &RuleContext<'_>) -> String {
    let base = context.inputs.base();
    format!(
        "CAC {} vs check {}",
        format_money(base.cac),
        format_money(base.revenue)
    )
}

fn observed_capacity_gap(context: &RuleContext<'_>) -> String {
    let gap = context.metrics.break_even_gap().unwrap_or_default();
    format!("{gap} projects per month short of break-even")
}

pub(crate) fn universal_rules() -> Vec<FlagRule> {
    vec![
        FlagRule {
            id: "ltv_less_than_cac",
            ladder: Some(Ladder::LtvCac),
            severity: Severity::Critical,
            check: |context| ltv_cac_in(context, LtvCacBand::Loss),
            message: "Loss-making model: LTV is below CAC, every customer loses money",
            observed: Some(observed_ltv_cac),
            recommendation:
                "Urgent: at least double customer lifetime, cut CAC by 50% or more, or raise the price",
        },
        FlagRule {
            id: "ltv_cac_critical",
            ladder: Some(Ladder::LtvCac),
            severity: Severity::Critical,
            check: |context| ltv_cac_in(context, LtvCacBand::Critical),
            message: "LTV/CAC is critically low (1-2x): the model pays back, but poorly",
            observed: Some(observed_ltv_cac),
            recommendation: "Extend customer lifetime or cut CAC by 30-50%",
        },
        FlagRule {
            id: "ltv_cac_low",
            ladder: Some(Ladder::LtvCac),
            severity: Severity::Warning,
            check: |context| ltv_cac_in(context, LtvCacBand::BelowNorm),
            message: "LTV/CAC is below norm (target is above 3x)",
            observed: Some(observed_ltv_cac),
            recommendation: "Improve retention: reactivation campaigns and a loyalty programme",
        },
        FlagRule {
            id: "low_margin",
            ladder: Some(Ladder::Margin),
            severity: Severity::Warning,
            check: |context| (20.0..40.0).contains(&context.metrics.margin_percent()),
            message: "Low margin (<40%)",
            observed: Some(observed_margin),
            recommendation: "Raise the price or reduce unit cost",
        },
        FlagRule {
            id: "very_low_margin",
            ladder: Some(Ladder::Margin),
            severity: Severity::Critical,
            check: |context| context.metrics.margin_percent() < 20.0,
            message: "Critically low margin (<20%)",
            observed: Some(observed_margin),
            recommendation: "Urgent: revisit pricing or unit cost",
        },
    ]
}

pub(crate) fn subscription_rules() -> Vec<FlagRule> {
    vec![
        FlagRule {
            id: "churn_critical",
            ladder: Some(Ladder::Churn),
            severity: Severity::Critical,
            check: |context| context.inputs.churn_rate().is_some_and(|churn| churn > 10.0),
            message: "Critical churn (>10%)",
            observed: Some(observed_churn),
            recommendation: "Run exit interviews and build a reactivation funnel",
        },
        FlagRule {
            id: "churn_high",
            ladder: Some(Ladder::Churn),
            severity: Severity::Warning,
            check: |context| {
                context
                    .inputs
                    .churn_rate()
                    .is_some_and(|churn| churn > 5.0 && churn <= 10.0)
            },
            message: "Churn above norm (healthy is 2-5%)",
            observed: Some(observed_churn),
            recommendation: "Improve onboarding during the first 30 days",
        },
        FlagRule {
            id: "payback_long",
            ladder: None,
            severity: Severity::Warning,
            check: |context| context.metrics.payback.months.unwrap_or(0.0) > 12.0,
            message: "Long payback (>12 months)",
            observed: Some(observed_payback),
            recommendation: "Lower CAC or raise ARPU",
        },
    ]
}

pub(crate) fn transaction_rules() -> Vec<FlagRule> {
    vec![
        FlagRule {
            id: "low_repeat_frequency",
            ladder: Some(Ladder::RepeatFrequency),
            severity: Severity::Warning,
            check: |context| (1.0..3.0).contains(&repeat_frequency(context)),
            message: "Low repeat purchase frequency (<3 per year)",
            observed: Some(observed_frequency),
            recommendation: "Strengthen the loyalty programme and email marketing",
        },
        FlagRule {
            id: "very_low_repeat_frequency",
            ladder: Some(Ladder::RepeatFrequency),
            severity: Severity::Critical,
            check: |context| repeat_frequency(context) < 1.0,
            message: "Critically low purchase frequency (<1 per year)",
            observed: Some(observed_frequency),
            recommendation: "Rethink the business model: how can repeat purchases grow?",
        },
        FlagRule {
            id: "high_cac_for_transaction",
            ladder: None,
            severity: Severity::Warning,
            check: |context| {
                let base = context.inputs.base();
                base.cac > base.revenue * 0.5
            },
            message: "CAC is too high relative to the average check (>50%)",
            observed: Some(observed_cac_share),
            recommendation: "Optimise acquisition channels or raise the average check",
        },
    ]
}

pub(crate) fn project_rules() -> Vec<FlagRule> {
    vec![
        FlagRule {
            id: "capacity_low",
            ladder: None,
            severity: Severity::Critical,
            check: |context| context.metrics.break_even_gap().is_some_and(|gap| gap > 0),
            message: "Capacity does not cover fixed costs",
            observed: Some(observed_capacity_gap),
            recommendation: "Increase parallel projects or the project price",
        },
        FlagRule {
            id: "low_project_margin",
            ladder: Some(Ladder::ProjectMargin),
            severity: Severity::Warning,
            check: |context| (30.0..50.0).contains(&context.metrics.margin_percent()),
            message: "Low project margin (<50%)",
            observed: Some(observed_margin),
            recommendation: "Cut variable costs or raise the project fee",
        },
        FlagRule {
            id: "very_low_project_margin",
            ladder: Some(Ladder::ProjectMargin),
            severity: Severity::Critical,
            check: |context| context.metrics.margin_percent() < 30.0,
            message: "Critically low project margin (<30%)",
            observed: Some(observed_margin),
            recommendation: "Urgently revisit pricing or subcontracting",
        },
    ]
}
