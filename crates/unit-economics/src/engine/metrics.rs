use serde::{Deserialize, Serialize};

use super::benchmarks::{LtvCacBand, PaybackBand};
use super::flags::Flag;
use super::verdict::Verdict;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionMarginMetric {
    /// Margin per unit, rounded to a whole amount.
    pub value: i64,
    /// Margin share of revenue, one decimal.
    pub percent: f64,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtvMetric {
    pub value: i64,
    pub formula: String,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtvCacMetric {
    /// Ratio with two decimals.
    pub value: f64,
    pub benchmark: LtvCacBand,
    pub benchmark_label: String,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaybackMetric {
    /// Repeat cycles to recoup CAC, two decimals.
    pub value: f64,
    /// Months-equivalent, when the business model allows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months: Option<f64>,
    pub unit: String,
    pub benchmark: PaybackBand,
    pub benchmark_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenMetric {
    pub units_needed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_volume: Option<u64>,
    /// Units still missing; negative when current volume exceeds the requirement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<i64>,
    pub status: String,
}

/// Computed outputs. Optional blocks are absent when the model's inputs do not support them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub contribution_margin: ContributionMarginMetric,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ltv: Option<LtvMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ltv_cac_ratio: Option<LtvCacMetric>,
    pub payback: PaybackMetric,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_even: Option<BreakEvenMetric>,
}

impl Metrics {
    pub fn margin_percent(&self) -> f64 {
        self.contribution_margin.percent
    }

    pub fn ltv_cac_value(&self) -> Option<f64> {
        self.ltv_cac_ratio.as_ref().map(|ratio| ratio.value)
    }

    pub fn ltv_cac_band(&self) -> Option<LtvCacBand> {
        self.ltv_cac_ratio.as_ref().map(|ratio| ratio.benchmark)
    }

    pub fn break_even_gap(&self) -> Option<i64> {
        self.break_even.as_ref().and_then(|entry| entry.gap)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub metrics: Metrics,
    pub flags: Vec<Flag>,
    pub verdict: Verdict,
}
