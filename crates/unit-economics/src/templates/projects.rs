use super::field::{FieldConstraint, FieldDescriptor, FieldKind};
use super::{optional_volume, RawInputs, Template, TemplateCalculations, TemplateId};
use crate::engine::{CalculationError, NormalizedInputs, ProjectInputs, UnitInputs};

const DAYS_PER_MONTH: f64 = 30.0;

pub(super) fn template() -> Template {
    Template {
        id: TemplateId::Projects,
        name: "Projects",
        description: "Agencies, consulting, design and development studios",
        icon: "📊",
        fields: vec![
            FieldDescriptor::required(
                "project_revenue",
                "Project revenue",
                FieldKind::Money,
                FieldConstraint::Positive,
                "What the client pays for one project",
            ),
            FieldDescriptor::required(
                "project_cost",
                "Project cost",
                FieldKind::Money,
                FieldConstraint::NonNegative,
                "Direct delivery cost of one project",
            ),
            FieldDescriptor::required(
                "cac",
                "CAC (acquisition cost)",
                FieldKind::Money,
                FieldConstraint::Positive,
                "What it costs to win one project",
            ),
            FieldDescriptor::required(
                "project_duration_days",
                "Project duration",
                FieldKind::Days,
                FieldConstraint::Positive,
                "Calendar days to deliver one project",
            ),
            FieldDescriptor::required(
                "parallel_projects",
                "Parallel projects",
                FieldKind::Count,
                FieldConstraint::Positive,
                "Projects the team runs at the same time",
            ),
            FieldDescriptor::optional(
                "fot_monthly",
                "Monthly payroll",
                FieldKind::Money,
                FieldConstraint::NonNegative,
                "Team salaries, used for break-even",
            ),
            FieldDescriptor::optional(
                "current_projects",
                "Projects per month now",
                FieldKind::Count,
                FieldConstraint::WholeNonNegative,
                "Projects currently closed per month",
            ),
        ],
        calculations: TemplateCalculations {
            contribution_margin: true,
            ltv: false,
            payback: true,
            break_even: true,
        },
        refine: None,
        normalize,
    }
}

/// Projects deliverable per month: `30 / duration × parallel`.
pub fn monthly_capacity(duration_days: f64, parallel_projects: f64) -> f64 {
    if duration_days > 0.0 {
        DAYS_PER_MONTH / duration_days * parallel_projects
    } else {
        0.0
    }
}

fn normalize(raw: &RawInputs) -> Result<NormalizedInputs, CalculationError> {
    let duration_days = raw.require("project_duration_days")?;
    let parallel_projects = raw.require("parallel_projects")?;
    let capacity = monthly_capacity(duration_days, parallel_projects);
    let current_volume =
        optional_volume(raw, "current_projects").or_else(|| Some(capacity.max(0.0).floor()));

    let base = UnitInputs {
        duration_days: Some(duration_days),
        parallel_units: Some(parallel_projects),
        fixed_costs_monthly: raw.get("fot_monthly"),
        current_volume,
        ..UnitInputs::new(
            raw.require("project_revenue")?,
            raw.require("project_cost")?,
            raw.require("cac")?,
        )
    };

    Ok(NormalizedInputs::Projects(ProjectInputs {
        base,
        monthly_capacity: capacity,
    }))
}
