//! Business-model catalog: the raw form each model collects, its validation and its mapping onto
//! the engine's normalized inputs.

mod batch;
mod commission;
mod field;
mod projects;
mod raw;
mod subscription;
mod transaction;
mod validation;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::{CalculationError, NormalizedInputs, UnitType};

pub use batch::read_batch_csv;
pub use field::{FieldConstraint, FieldDescriptor, FieldKind};
pub use raw::{parse_number_input, RawInputError, RawInputs};
pub use validation::{FieldError, ValidationErrors, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    Subscription,
    #[serde(alias = "transaction")]
    OneTimeSales,
    #[serde(alias = "project")]
    Projects,
    #[serde(alias = "deal")]
    Commission,
}

impl TemplateId {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Subscription,
            Self::OneTimeSales,
            Self::Projects,
            Self::Commission,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::OneTimeSales => "one_time_sales",
            Self::Projects => "projects",
            Self::Commission => "commission",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Subscription => "Subscription",
            Self::OneTimeSales => "One-time sales",
            Self::Projects => "Projects",
            Self::Commission => "Commission",
        }
    }

    pub const fn unit_type(self) -> UnitType {
        match self {
            Self::Subscription => UnitType::Subscription,
            Self::OneTimeSales => UnitType::Transaction,
            Self::Projects => UnitType::Project,
            Self::Commission => UnitType::Deal,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown template `{0}`")]
pub struct UnknownTemplateId(pub String);

impl FromStr for TemplateId {
    type Err = UnknownTemplateId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "subscription" => Ok(Self::Subscription),
            "one_time_sales" | "transaction" => Ok(Self::OneTimeSales),
            "projects" | "project" => Ok(Self::Projects),
            "commission" | "deal" => Ok(Self::Commission),
            _ => Err(UnknownTemplateId(value.to_string())),
        }
    }
}

/// Which metric blocks are meaningful for a business model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCalculations {
    pub contribution_margin: bool,
    pub ltv: bool,
    pub payback: bool,
    pub break_even: bool,
}

/// Cross-field checks run after every field passed on its own.
pub type RefineFn = fn(&RawInputs) -> Vec<FieldError>;
pub type NormalizeFn = fn(&RawInputs) -> Result<NormalizedInputs, CalculationError>;

#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub fields: Vec<FieldDescriptor>,
    pub calculations: TemplateCalculations,
    #[serde(skip)]
    refine: Option<RefineFn>,
    #[serde(skip)]
    normalize: NormalizeFn,
}

impl Template {
    pub fn validate(&self, raw: &RawInputs) -> ValidationResult {
        let mut errors = validation::check_fields(&self.fields, raw);
        if errors.is_empty() {
            if let Some(refine) = self.refine {
                errors = refine(raw);
            }
        }
        ValidationResult::from_errors(errors)
    }

    /// Pure mapping onto the engine's input. Still re-checks what can fail without validation.
    pub fn normalize(&self, raw: &RawInputs) -> Result<NormalizedInputs, CalculationError> {
        (self.normalize)(raw)
    }

    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn unit_type(&self) -> UnitType {
        self.id.unit_type()
    }
}

#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
}

impl TemplateRegistry {
    pub fn standard() -> Self {
        Self {
            templates: vec![
                subscription::template(),
                transaction::template(),
                projects::template(),
                commission::template(),
            ],
        }
    }

    pub fn get(&self, id: TemplateId) -> Option<&Template> {
        self.templates.iter().find(|template| template.id == id)
    }

    /// Looks a template up by id or alias.
    pub fn resolve(&self, id: &str) -> Result<&Template, UnknownTemplateId> {
        let parsed = id.parse::<TemplateId>()?;
        self.get(parsed)
            .ok_or_else(|| UnknownTemplateId(id.to_string()))
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Optional counts keep whole units; negative values count as none.
pub(crate) fn optional_volume(raw: &RawInputs, field: &str) -> Option<f64> {
    raw.get(field).map(|value| value.max(0.0).floor())
}
