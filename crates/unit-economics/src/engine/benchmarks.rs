use serde::{Deserialize, Serialize};

/// Payback at or above this many months is slow.
pub const PAYBACK_SLOW_MONTHS: f64 = 12.0;
pub const PAYBACK_FAST_MONTHS: f64 = 6.0;
/// Raw repeat-cycle threshold used when no months-equivalent exists.
pub const PAYBACK_FAST_CYCLES: f64 = 2.0;

/// Healthy verdicts need LTV/CAC strictly above this.
pub const HEALTHY_LTV_CAC: f64 = 3.0;
/// Healthy verdicts need margin percent strictly above this.
pub const HEALTHY_MARGIN_PERCENT: f64 = 50.0;

/// Five-band LTV/CAC classification shared by metrics, flags and the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LtvCacBand {
    Loss,
    Critical,
    BelowNorm,
    Good,
    Excellent,
}

impl LtvCacBand {
    pub fn classify(ratio: f64) -> Self {
        if ratio < 1.0 {
            Self::Loss
        } else if ratio < 2.0 {
            Self::Critical
        } else if ratio < 3.0 {
            Self::BelowNorm
        } else if ratio < 5.0 {
            Self::Good
        } else {
            Self::Excellent
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Loss => "Loss-making",
            Self::Critical => "Critical",
            Self::BelowNorm => "Below norm",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaybackBand {
    Fast,
    Normal,
    Slow,
}

impl PaybackBand {
    /// Months-equivalent decides when known; otherwise the raw cycle count does, with no
    /// middle band.
    pub fn classify(value: f64, months: Option<f64>) -> Self {
        match months {
            Some(months) if months < PAYBACK_FAST_MONTHS => Self::Fast,
            Some(months) if months < PAYBACK_SLOW_MONTHS => Self::Normal,
            Some(_) => Self::Slow,
            None if value < PAYBACK_FAST_CYCLES => Self::Fast,
            None => Self::Slow,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::Normal => "Normal",
            Self::Slow => "Slow",
        }
    }
}
