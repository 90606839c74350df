use crate::infra::{error_payload, load_default_template};
use chrono::Local;
use clap::Args;
use serde_json::json;
use std::fs::File;
use std::path::PathBuf;
use unit_economics::engine::Severity;
use unit_economics::error::AppError;
use unit_economics::templates::{read_batch_csv, Template, TemplateId};
use unit_economics::{CalculationOutcome, CalculatorService, RawInputs};

#[derive(Args, Debug, Default)]
pub(crate) struct TemplatesArgs {
    /// Show the fields of a single template
    #[arg(long)]
    pub(crate) template: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CalculateArgs {
    /// Template id or alias (defaults to APP_DEFAULT_TEMPLATE)
    #[arg(long)]
    pub(crate) template: Option<String>,
    /// Raw input as field=value; repeat for every field
    #[arg(long = "input", value_name = "FIELD=VALUE")]
    pub(crate) inputs: Vec<String>,
    /// Print the outcome as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Template id or alias (defaults to APP_DEFAULT_TEMPLATE)
    #[arg(long)]
    pub(crate) template: Option<String>,
    /// CSV file whose header row names the template's field ids
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print one JSON document per row instead of summary lines
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_templates(args: TemplatesArgs) -> Result<(), AppError> {
    let service = CalculatorService::standard();

    match args.template {
        Some(template_id) => {
            let template = service.template(&template_id)?;
            render_template(template);
        }
        None => {
            println!("Available templates");
            for template in service.registry().templates() {
                println!(
                    "- {} {} ({}): {}",
                    template.icon,
                    template.name,
                    template.id,
                    template.description
                );
            }
        }
    }

    Ok(())
}

pub(crate) fn run_calculate(args: CalculateArgs) -> Result<(), AppError> {
    let template_id = match args.template {
        Some(template_id) => template_id,
        None => load_default_template()?.to_string(),
    };
    let raw = RawInputs::from_assignments(args.inputs.iter().map(String::as_str))?;
    let service = CalculatorService::standard();

    match service.run(&template_id, &raw, None) {
        Ok(outcome) if args.json => {
            println!("{}", to_pretty_json(&outcome));
            Ok(())
        }
        Ok(outcome) => {
            render_outcome(&outcome);
            Ok(())
        }
        Err(error) => {
            if args.json {
                println!("{}", error_payload(&error));
            }
            Err(error.into())
        }
    }
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let template_id = match args.template {
        Some(template_id) => template_id,
        None => load_default_template()?.to_string(),
    };
    let service = CalculatorService::standard();
    let template = service.template(&template_id)?;
    let rows = read_batch_csv(File::open(&args.csv)?)?;
    let outcomes = service.run_batch(&template_id, &rows);

    if args.json {
        for (index, outcome) in outcomes.iter().enumerate() {
            let payload = match outcome {
                Ok(outcome) => json!({ "row": index + 1, "outcome": outcome }),
                Err(error) => json!({ "row": index + 1, "outcome": error_payload(error) }),
            };
            println!("{payload}");
        }
        return Ok(());
    }

    println!(
        "Batch: {} rows from {} as {} (generated {})",
        rows.len(),
        args.csv.display(),
        template.name,
        Local::now().format("%Y-%m-%d %H:%M")
    );

    let mut failed = 0;
    for (index, outcome) in outcomes.iter().enumerate() {
        match outcome {
            Ok(outcome) => println!("- row {}: {}", index + 1, summary_line(outcome)),
            Err(error) => {
                failed += 1;
                println!("- row {}: rejected: {}", index + 1, error);
            }
        }
    }
    println!(
        "{} calculated, {} rejected",
        outcomes.len() - failed,
        failed
    );

    Ok(())
}

struct ReferenceScenario {
    key: &'static str,
    title: &'static str,
    template: TemplateId,
    inputs: RawInputs,
}

fn reference_scenarios() -> Vec<ReferenceScenario> {
    vec![
        ReferenceScenario {
            key: "A",
            title: "Healthy subscription",
            template: TemplateId::Subscription,
            inputs: RawInputs::new()
                .with("arpu", 5_000.0)
                .with("variable_cost", 1_500.0)
                .with("cac", 3_000.0)
                .with("avg_lifetime_months", 12.0),
        },
        ReferenceScenario {
            key: "B",
            title: "Loss-making subscription",
            template: TemplateId::Subscription,
            inputs: RawInputs::new()
                .with("arpu", 1_000.0)
                .with("variable_cost", 900.0)
                .with("cac", 5_000.0)
                .with("avg_lifetime_months", 6.0),
        },
        ReferenceScenario {
            key: "C",
            title: "Subscription priced below cost",
            template: TemplateId::Subscription,
            inputs: RawInputs::new()
                .with("arpu", 1_000.0)
                .with("variable_cost", 1_200.0)
                .with("cac", 500.0)
                .with("churn_rate", 5.0),
        },
        ReferenceScenario {
            key: "D",
            title: "Agency short of capacity",
            template: TemplateId::Projects,
            inputs: RawInputs::new()
                .with("project_revenue", 100_000.0)
                .with("project_cost", 40_000.0)
                .with("cac", 10_000.0)
                .with("project_duration_days", 15.0)
                .with("parallel_projects", 2.0)
                .with("fot_monthly", 500_000.0)
                .with("current_projects", 5.0),
        },
    ]
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let service = CalculatorService::standard();
    println!("Unit economics demo");

    for scenario in reference_scenarios() {
        println!(
            "\nScenario {}: {} [{}]",
            scenario.key,
            scenario.title,
            scenario.template.label()
        );
        let inputs: Vec<String> = scenario
            .inputs
            .iter()
            .filter_map(|(field, value)| value.map(|value| format!("{field}={value}")))
            .collect();
        println!("Inputs: {}", inputs.join(", "));

        match service.run(scenario.template.as_str(), &scenario.inputs, None) {
            Ok(outcome) => render_outcome(&outcome),
            Err(error) => println!("Calculation stopped: {error}"),
        }
    }

    Ok(())
}

fn render_template(template: &Template) {
    println!("{} {} ({})", template.icon, template.name, template.id);
    println!("{}", template.description);
    println!("Priced per {}", template.unit_type().label());
    println!("\nFields");
    for field in &template.fields {
        let marker = if field.required { "*" } else { " " };
        println!(
            "{marker} {:<24} {} [{}] - {}",
            field.id, field.label, field.unit, field.hint
        );
    }
}

fn summary_line(outcome: &CalculationOutcome) -> String {
    let metrics = &outcome.result.metrics;
    let ltv_cac = metrics
        .ltv_cac_ratio
        .as_ref()
        .map(|ratio| ratio.formatted.as_str())
        .unwrap_or("n/a");
    format!(
        "{} | CM {} | LTV/CAC {} | payback {} | {} flags",
        outcome.result.verdict.status.label(),
        metrics.contribution_margin.formatted,
        ltv_cac,
        metrics.payback.unit,
        outcome.result.flags.len()
    )
}

pub(crate) fn render_outcome(outcome: &CalculationOutcome) {
    let metrics = &outcome.result.metrics;

    println!("\nMetrics");
    println!(
        "- Contribution margin: {}",
        metrics.contribution_margin.formatted
    );
    if let Some(ltv) = &metrics.ltv {
        println!("- LTV: {} ({})", ltv.formatted, ltv.formula);
    }
    if let Some(ratio) = &metrics.ltv_cac_ratio {
        println!("- LTV/CAC: {} ({})", ratio.formatted, ratio.benchmark_label);
    }
    println!(
        "- Payback: {} ({})",
        metrics.payback.unit, metrics.payback.benchmark_label
    );
    if let Some(break_even) = &metrics.break_even {
        println!(
            "- Break-even: {} units per month, {}",
            break_even.units_needed, break_even.status
        );
    }

    if outcome.result.flags.is_empty() {
        println!("\nFlags: none");
    } else {
        println!("\nFlags");
        for flag in &outcome.result.flags {
            let marker = match flag.severity {
                Severity::Critical => "!!",
                Severity::Warning => "!",
                Severity::Info => "i",
            };
            println!("{marker} [{}] {}", flag.severity.label(), flag.message);
            println!("   -> {}", flag.recommendation);
        }
    }

    println!(
        "\nVerdict: {} - {}",
        outcome.result.verdict.status.label(),
        outcome.result.verdict.message
    );
}

fn to_pretty_json(outcome: &CalculationOutcome) -> String {
    serde_json::to_string_pretty(outcome)
        .unwrap_or_else(|err| format!("{{\"error\":true,\"message\":\"{err}\"}}"))
}
