use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::engine::CalculationError;

/// Field id to optional number, exactly as a form or request collected it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawInputs(BTreeMap<String, Option<f64>>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RawInputError {
    #[error("expected `field=value`, got `{0}`")]
    MissingSeparator(String),
    #[error("field name is empty in `{0}`")]
    EmptyField(String),
}

impl RawInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: f64) -> Self {
        self.set(field, Some(value));
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: Option<f64>) {
        self.0.insert(field.into(), value);
    }

    /// Present and numeric; explicit blanks read as absent.
    pub fn get(&self, field: &str) -> Option<f64> {
        self.0.get(field).copied().flatten()
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut f64> {
        self.0.get_mut(field).and_then(Option::as_mut)
    }

    pub fn require(&self, field: &str) -> Result<f64, CalculationError> {
        self.get(field).ok_or_else(|| CalculationError::MissingField {
            field: field.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.0.iter().map(|(field, value)| (field.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses one `field=value` pair; a blank or unparsable value yields an absent field.
    pub fn parse_assignment(text: &str) -> Result<(String, Option<f64>), RawInputError> {
        let (field, value) = text
            .split_once('=')
            .ok_or_else(|| RawInputError::MissingSeparator(text.to_string()))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(RawInputError::EmptyField(text.to_string()));
        }

        Ok((field.to_string(), parse_number_input(value)))
    }

    pub fn from_assignments<'a, I>(assignments: I) -> Result<Self, RawInputError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        assignments
            .into_iter()
            .map(Self::parse_assignment)
            .collect()
    }
}

impl FromIterator<(String, Option<f64>)> for RawInputs {
    fn from_iter<T: IntoIterator<Item = (String, Option<f64>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Blank or unparsable text is absent. A decimal comma is accepted.
pub fn parse_number_input(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
    Null,
}

impl RawValue {
    fn into_number(self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(value),
            Self::Text(text) => parse_number_input(&text),
            Self::Null => None,
        }
    }
}

impl<'de> Deserialize<'de> for RawInputs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = BTreeMap::<String, RawValue>::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .map(|(field, value)| (field, value.into_number()))
            .collect())
    }
}
