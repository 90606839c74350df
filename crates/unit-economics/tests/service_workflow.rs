use unit_economics::engine::{UnitType, VerdictStatus};
use unit_economics::scenario::{OverrideOperator, Scenario, ScenarioOverride};
use unit_economics::templates::read_batch_csv;
use unit_economics::{
    CalculationError, CalculatorService, CalculatorServiceError, RawInputs, TemplateId,
};

fn healthy_subscription() -> RawInputs {
    RawInputs::new()
        .with("arpu", 5_000.0)
        .with("variable_cost", 1_500.0)
        .with("cac", 3_000.0)
        .with("avg_lifetime_months", 12.0)
}

#[test]
fn registry_lists_every_business_model_once() {
    let service = CalculatorService::standard();
    let ids: Vec<TemplateId> = service
        .registry()
        .templates()
        .iter()
        .map(|template| template.id)
        .collect();

    assert_eq!(ids, TemplateId::ordered().to_vec());

    let deal = service.template("deal").expect("alias resolves");
    assert_eq!(deal.id, TemplateId::Commission);
    assert_eq!(deal.unit_type(), UnitType::Deal);
    assert!(deal.fields.iter().any(|field| field.id == "commission_percent" && field.required));
}

#[test]
fn unknown_template_is_reported_before_inputs_are_read() {
    let service = CalculatorService::standard();
    let error = service
        .run("franchise", &RawInputs::new(), None)
        .unwrap_err();

    assert!(matches!(error, CalculatorServiceError::UnknownTemplate(_)));
    assert!(error.to_string().contains("franchise"));
}

#[test]
fn validation_collects_field_errors_without_calculating() {
    let service = CalculatorService::standard();
    let raw = RawInputs::new().with("variable_cost", -10.0).with("cac", 3_000.0);

    let report = service.validate("subscription", &raw).expect("template exists");
    assert!(!report.valid);
    assert!(report.errors.iter().any(|error| error.field == "arpu"));
    assert!(report.errors.iter().any(|error| error.field == "variable_cost"));

    match service.run("subscription", &raw, None).unwrap_err() {
        CalculatorServiceError::Validation(errors) => {
            assert_eq!(errors.errors.len(), report.errors.len());
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn subscription_without_lifetime_or_churn_is_rejected() {
    let service = CalculatorService::standard();
    let raw = RawInputs::new()
        .with("arpu", 5_000.0)
        .with("variable_cost", 1_500.0)
        .with("cac", 3_000.0);

    let error = service.run("subscription", &raw, None).unwrap_err();
    assert!(matches!(
        error,
        CalculatorServiceError::Validation(_)
            | CalculatorServiceError::Calculation(CalculationError::MissingLifetime)
    ));
}

#[test]
fn scenario_overrides_shift_the_verdict() {
    let service = CalculatorService::standard();
    let baseline = service
        .run("subscription", &healthy_subscription(), None)
        .expect("baseline calculates");
    assert_eq!(baseline.result.verdict.status, VerdictStatus::Healthy);

    let price_war = Scenario {
        id: "price_war".to_string(),
        name: "Price war".to_string(),
        overrides: vec![
            ScenarioOverride::new("arpu", 0.4, OverrideOperator::Multiply),
            ScenarioOverride::new("cac", 4_000.0, OverrideOperator::Add),
        ],
    };
    let stressed = service
        .run("subscription", &healthy_subscription(), Some(&price_war))
        .expect("stressed scenario calculates");

    assert_eq!(stressed.result.metrics.contribution_margin.value, 500);
    assert_eq!(stressed.result.metrics.ltv_cac_value(), Some(0.86));
    assert_eq!(stressed.result.verdict.status, VerdictStatus::Critical);
    assert_eq!(
        healthy_subscription().get("arpu"),
        Some(5_000.0),
        "scenario must not mutate the caller's inputs"
    );
}

#[test]
fn batch_rows_are_calculated_independently() {
    let csv = "\
avg_check,variable_cost,cac,repeat_frequency
2000,800,500,6
1000,1000,300,4
,400,200,2
";
    let rows = read_batch_csv(csv.as_bytes()).expect("csv parses");
    assert_eq!(rows.len(), 3);

    let service = CalculatorService::standard();
    let outcomes = service.run_batch("transaction", &rows);

    let first = outcomes[0].as_ref().expect("first row calculates");
    assert_eq!(first.template_id, TemplateId::OneTimeSales);
    assert_eq!(first.result.metrics.contribution_margin.value, 1_200);

    assert_eq!(
        outcomes[1].as_ref().unwrap_err(),
        &CalculatorServiceError::Calculation(CalculationError::NonPositiveMargin)
    );
    assert!(matches!(
        outcomes[2].as_ref().unwrap_err(),
        CalculatorServiceError::Validation(_)
    ));
}
