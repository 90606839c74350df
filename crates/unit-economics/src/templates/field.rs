use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Money,
    Percentage,
    Months,
    Days,
    PerYear,
    Count,
}

impl FieldKind {
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Money => "₽",
            Self::Percentage => "%",
            Self::Months => "mo",
            Self::Days => "days",
            Self::PerYear => "per year",
            Self::Count => "pcs",
        }
    }
}

/// Bound a supplied value must satisfy. Every constraint also rejects non-finite numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldConstraint {
    Positive,
    NonNegative,
    WholeNonNegative,
    /// Inclusive upper bound, with the lower bound open or closed at zero.
    Percent { allow_zero: bool },
}

impl FieldConstraint {
    /// Message for a violating value, or `None` when the value is acceptable.
    pub fn check(self, label: &str, value: f64) -> Option<String> {
        if !value.is_finite() {
            return Some(format!("{label} must be a finite number"));
        }

        match self {
            Self::Positive if value <= 0.0 => Some(format!("{label} must be greater than 0")),
            Self::NonNegative if value < 0.0 => Some(format!("{label} cannot be negative")),
            Self::WholeNonNegative if value < 0.0 || value.fract() != 0.0 => {
                Some(format!("{label} must be a whole number, 0 or more"))
            }
            Self::Percent { allow_zero: true } if !(0.0..=100.0).contains(&value) => {
                Some(format!("{label} must be between 0 and 100"))
            }
            Self::Percent { allow_zero: false } if value <= 0.0 || value > 100.0 => {
                Some(format!("{label} must be above 0 and at most 100"))
            }
            _ => None,
        }
    }
}

/// One input of a template form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub unit: &'static str,
    pub required: bool,
    pub constraint: FieldConstraint,
    pub hint: &'static str,
}

impl FieldDescriptor {
    pub const fn required(
        id: &'static str,
        label: &'static str,
        kind: FieldKind,
        constraint: FieldConstraint,
        hint: &'static str,
    ) -> Self {
        Self {
            id,
            label,
            kind,
            unit: kind.unit(),
            required: true,
            constraint,
            hint,
        }
    }

    pub const fn optional(
        id: &'static str,
        label: &'static str,
        kind: FieldKind,
        constraint: FieldConstraint,
        hint: &'static str,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(id, label, kind, constraint, hint)
        }
    }
}
