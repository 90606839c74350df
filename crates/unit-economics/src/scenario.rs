//! What-if overrides applied to raw inputs before validation. The engine never sees scenarios.

use serde::{Deserialize, Serialize};

use crate::templates::RawInputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideOperator {
    #[default]
    Set,
    Multiply,
    Add,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOverride {
    pub field: String,
    pub value: f64,
    #[serde(default)]
    pub operator: OverrideOperator,
}

impl ScenarioOverride {
    pub fn new(field: impl Into<String>, value: f64, operator: OverrideOperator) -> Self {
        Self {
            field: field.into(),
            value,
            operator,
        }
    }

    fn apply_to(&self, raw: &mut RawInputs) {
        match self.operator {
            OverrideOperator::Set => raw.set(self.field.clone(), Some(self.value)),
            OverrideOperator::Multiply => {
                if let Some(current) = raw.get_mut(&self.field) {
                    *current *= self.value;
                }
            }
            OverrideOperator::Add => {
                if let Some(current) = raw.get_mut(&self.field) {
                    *current += self.value;
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub overrides: Vec<ScenarioOverride>,
}

impl Scenario {
    /// Applies overrides in order to a copy of the inputs. `multiply` and `add` leave absent
    /// fields absent.
    pub fn apply(&self, raw: &RawInputs) -> RawInputs {
        let mut adjusted = raw.clone();
        for entry in &self.overrides {
            entry.apply_to(&mut adjusted);
        }
        adjusted
    }
}
