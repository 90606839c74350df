use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::templates::TemplateId;

/// What one "repeat unit" means when payback is phrased for a business model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Subscription,
    Transaction,
    Project,
    Deal,
}

impl UnitType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Subscription => "month",
            Self::Transaction => "transaction",
            Self::Project => "project",
            Self::Deal => "deal",
        }
    }

    /// Plural noun used in payback phrasing.
    pub const fn repeat_noun(self) -> &'static str {
        match self {
            Self::Subscription => "mo",
            Self::Transaction => "purchases",
            Self::Project => "projects",
            Self::Deal => "deals",
        }
    }

    /// Plural noun used in break-even phrasing.
    pub const fn volume_noun(self) -> &'static str {
        match self {
            Self::Subscription => "clients",
            Self::Transaction => "customers",
            Self::Project => "projects",
            Self::Deal => "deals",
        }
    }
}

/// Fields shared by every business model after normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitInputs {
    /// Price of one unit.
    pub revenue: f64,
    /// Variable cost of one unit.
    pub variable_cost: f64,
    pub cac: f64,
    /// Months a customer persists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<f64>,
    /// Purchases or deals per year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_units: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_costs_monthly: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_volume: Option<f64>,
}

impl UnitInputs {
    pub fn new(revenue: f64, variable_cost: f64, cac: f64) -> Self {
        Self {
            revenue,
            variable_cost,
            cac,
            ..Self::default()
        }
    }

    /// Lifetime only counts when it is a positive number of months.
    pub fn effective_lifetime(&self) -> Option<f64> {
        self.lifetime.filter(|months| *months > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionInputs {
    #[serde(flatten)]
    pub base: UnitInputs,
    /// Monthly churn in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub churn_rate: Option<f64>,
    /// Lifetime exactly as supplied, before any churn derivation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_lifetime: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInputs {
    #[serde(flatten)]
    pub base: UnitInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInputs {
    #[serde(flatten)]
    pub base: UnitInputs,
    /// Projects the team can deliver per month.
    pub monthly_capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionInputs {
    #[serde(flatten)]
    pub base: UnitInputs,
    pub commission_percent: f64,
    pub avg_deal_size: f64,
}

/// Canonical engine input, tagged by the template that produced it.
///
/// Model-specific fields are reachable only after matching on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "template_id", rename_all = "snake_case")]
pub enum NormalizedInputs {
    Subscription(SubscriptionInputs),
    OneTimeSales(TransactionInputs),
    Projects(ProjectInputs),
    Commission(CommissionInputs),
}

impl NormalizedInputs {
    pub fn base(&self) -> &UnitInputs {
        match self {
            Self::Subscription(inputs) => &inputs.base,
            Self::OneTimeSales(inputs) => &inputs.base,
            Self::Projects(inputs) => &inputs.base,
            Self::Commission(inputs) => &inputs.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut UnitInputs {
        match self {
            Self::Subscription(inputs) => &mut inputs.base,
            Self::OneTimeSales(inputs) => &mut inputs.base,
            Self::Projects(inputs) => &mut inputs.base,
            Self::Commission(inputs) => &mut inputs.base,
        }
    }

    pub const fn template_id(&self) -> TemplateId {
        match self {
            Self::Subscription(_) => TemplateId::Subscription,
            Self::OneTimeSales(_) => TemplateId::OneTimeSales,
            Self::Projects(_) => TemplateId::Projects,
            Self::Commission(_) => TemplateId::Commission,
        }
    }

    pub const fn unit_type(&self) -> UnitType {
        self.template_id().unit_type()
    }

    pub fn churn_rate(&self) -> Option<f64> {
        match self {
            Self::Subscription(inputs) => inputs.churn_rate,
            _ => None,
        }
    }
}

/// Typed failure of `normalize` or of the guard layer. Terminal for the calculation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalculationError {
    #[error("CAC must be greater than 0")]
    NonPositiveCac,
    #[error("Margin is negative or zero; raise price or cut cost.")]
    NonPositiveMargin,
    #[error("Provide either the average customer lifetime or the churn rate")]
    MissingLifetime,
    #[error("{field} is required")]
    MissingField { field: String },
}

impl CalculationError {
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Offending raw field, when one can be named.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NonPositiveCac => Some("cac"),
            Self::NonPositiveMargin => None,
            Self::MissingLifetime => Some("avg_lifetime_months"),
            Self::MissingField { field } => Some(field),
        }
    }
}

impl Serialize for CalculationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field = self.field();
        let len = if field.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("CalculationError", len)?;
        state.serialize_field("error", &true)?;
        state.serialize_field("message", &self.message())?;
        if let Some(field) = field {
            state.serialize_field("field", field)?;
        }
        state.end()
    }
}
