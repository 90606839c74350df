use unit_economics::engine::{LtvCacBand, PaybackBand, Severity, VerdictStatus};
use unit_economics::{calculate, CalculationError, RawInputs, TemplateId, TemplateRegistry};

fn normalize(template: TemplateId, raw: &RawInputs) -> unit_economics::NormalizedInputs {
    let registry = TemplateRegistry::standard();
    let template = registry.get(template).expect("template registered");
    let validation = template.validate(raw);
    assert!(validation.valid, "unexpected errors: {:?}", validation.errors);
    template.normalize(raw).expect("inputs normalize")
}

fn flag_ids(flags: &[unit_economics::engine::Flag]) -> Vec<&str> {
    flags.iter().map(|flag| flag.id.as_str()).collect()
}

#[test]
fn scenario_a_healthy_subscription() {
    let raw = RawInputs::new()
        .with("arpu", 5_000.0)
        .with("variable_cost", 1_500.0)
        .with("cac", 3_000.0)
        .with("avg_lifetime_months", 12.0);

    let result = calculate(&normalize(TemplateId::Subscription, &raw)).expect("calculates");
    let metrics = &result.metrics;

    assert_eq!(metrics.contribution_margin.value, 3_500);
    assert_eq!(metrics.contribution_margin.percent, 70.0);
    assert_eq!(metrics.ltv.as_ref().map(|ltv| ltv.value), Some(42_000));
    assert_eq!(metrics.ltv_cac_value(), Some(14.0));
    assert_eq!(metrics.ltv_cac_band(), Some(LtvCacBand::Excellent));
    assert_eq!(metrics.payback.value, 0.86);
    assert_eq!(metrics.payback.benchmark, PaybackBand::Fast);
    assert!(result.flags.is_empty());
    assert_eq!(result.verdict.status, VerdictStatus::Healthy);
}

#[test]
fn scenario_b_loss_making_subscription() {
    let raw = RawInputs::new()
        .with("arpu", 1_000.0)
        .with("variable_cost", 900.0)
        .with("cac", 5_000.0)
        .with("avg_lifetime_months", 6.0);

    let result = calculate(&normalize(TemplateId::Subscription, &raw)).expect("calculates");

    assert_eq!(result.metrics.contribution_margin.value, 100);
    assert_eq!(result.metrics.ltv.as_ref().map(|ltv| ltv.value), Some(600));
    assert_eq!(result.metrics.ltv_cac_value(), Some(0.12));

    let loss = &result.flags[0];
    assert_eq!(loss.id, "ltv_less_than_cac");
    assert_eq!(loss.severity, Severity::Critical);
    assert!(loss.message.contains("0.12x"));
    assert_eq!(result.verdict.status, VerdictStatus::Critical);
}

#[test]
fn scenario_c_margin_guard_trips() {
    let raw = RawInputs::new()
        .with("arpu", 1_000.0)
        .with("variable_cost", 1_200.0)
        .with("cac", 500.0)
        .with("churn_rate", 5.0);

    let error = calculate(&normalize(TemplateId::Subscription, &raw)).unwrap_err();
    assert_eq!(error, CalculationError::NonPositiveMargin);
    assert!(error.message().contains("Margin"));
}

#[test]
fn scenario_d_project_capacity_gap() {
    let raw = RawInputs::new()
        .with("project_revenue", 100_000.0)
        .with("project_cost", 40_000.0)
        .with("cac", 10_000.0)
        .with("project_duration_days", 15.0)
        .with("parallel_projects", 2.0)
        .with("fot_monthly", 500_000.0)
        .with("current_projects", 5.0);

    let result = calculate(&normalize(TemplateId::Projects, &raw)).expect("calculates");
    let break_even = result.metrics.break_even.as_ref().expect("fixed costs present");

    assert_eq!(break_even.units_needed, 9);
    assert_eq!(break_even.gap, Some(4));
    assert!(result.metrics.ltv.is_none());
    assert_eq!(flag_ids(&result.flags), vec!["capacity_low"]);
    assert_eq!(result.flags[0].severity, Severity::Critical);
    assert_eq!(result.verdict.status, VerdictStatus::Critical);
}

#[test]
fn commission_deal_without_tier_rules() {
    let raw = RawInputs::new()
        .with("avg_deal_size", 400_000.0)
        .with("commission_percent", 3.0)
        .with("variable_cost", 2_000.0)
        .with("cac", 8_000.0)
        .with("deals_per_year", 3.0);

    let result = calculate(&normalize(TemplateId::Commission, &raw)).expect("calculates");

    assert_eq!(result.metrics.contribution_margin.value, 10_000);
    assert_eq!(result.metrics.ltv_cac_value(), Some(15.0));
    assert_eq!(result.metrics.payback.months, Some(3.2));
    assert!(result.flags.is_empty());
    assert_eq!(result.verdict.status, VerdictStatus::Healthy);
}
