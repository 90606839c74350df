mod rules;

use serde::{Deserialize, Serialize};

use super::domain::NormalizedInputs;
use super::metrics::Metrics;
use crate::templates::TemplateId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

/// Diagnostic produced by a matching rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub id: String,
    pub severity: Severity,
    pub message: String,
    pub recommendation: String,
}

/// Group of rules that express one severity ladder over a single metric. At most one rule of a
/// ladder may match for any input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ladder {
    LtvCac,
    Margin,
    Churn,
    RepeatFrequency,
    ProjectMargin,
}

/// Rule table a template's flags come from, evaluated after the universal tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleTier {
    Universal,
    Subscription,
    Transaction,
    Project,
}

impl RuleTier {
    pub const fn for_template(template_id: TemplateId) -> Option<Self> {
        match template_id {
            TemplateId::Subscription => Some(Self::Subscription),
            TemplateId::OneTimeSales => Some(Self::Transaction),
            TemplateId::Projects => Some(Self::Project),
            TemplateId::Commission => None,
        }
    }

    pub fn rules(self) -> Vec<FlagRule> {
        match self {
            Self::Universal => rules::universal_rules(),
            Self::Subscription => rules::subscription_rules(),
            Self::Transaction => rules::transaction_rules(),
            Self::Project => rules::project_rules(),
        }
    }
}

pub struct RuleContext<'a> {
    pub inputs: &'a NormalizedInputs,
    pub metrics: &'a Metrics,
}

/// One row of a rule table.
pub struct FlagRule {
    pub id: &'static str,
    pub ladder: Option<Ladder>,
    pub severity: Severity,
    pub check: fn(&RuleContext<'_>) -> bool,
    pub message: &'static str,
    /// Renders the observed value appended to the message.
    pub observed: Option<fn(&RuleContext<'_>) -> String>,
    pub recommendation: &'static str,
}

impl FlagRule {
    pub fn evaluate(&self, context: &RuleContext<'_>) -> Option<Flag> {
        if !(self.check)(context) {
            return None;
        }

        let message = match self.observed {
            Some(render) => format!("{}, now {}", self.message, render(context)),
            None => self.message.to_string(),
        };

        Some(Flag {
            id: self.id.to_string(),
            severity: self.severity,
            message,
            recommendation: self.recommendation.to_string(),
        })
    }
}

/// Every matching rule fires: universal tier first, then the template's tier, each in table
/// order.
pub fn generate_flags(inputs: &NormalizedInputs, metrics: &Metrics) -> Vec<Flag> {
    let context = RuleContext { inputs, metrics };
    let specific = RuleTier::for_template(inputs.template_id())
        .map(RuleTier::rules)
        .unwrap_or_default();

    RuleTier::Universal
        .rules()
        .iter()
        .chain(specific.iter())
        .filter_map(|rule| rule.evaluate(&context))
        .collect()
}
