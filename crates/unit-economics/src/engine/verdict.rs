use serde::{Deserialize, Serialize};

use super::benchmarks::{PaybackBand, HEALTHY_LTV_CAC, HEALTHY_MARGIN_PERCENT};
use super::flags::{Flag, Severity};
use super::metrics::Metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Healthy,
    Warning,
    Critical,
}

impl VerdictStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Warning => "Needs attention",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub message: String,
}

impl Verdict {
    fn new(status: VerdictStatus, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

const CRITICAL_MESSAGE: &str = "Model needs urgent improvement.";
const WARNING_MESSAGE: &str = "Model works, but has room for improvement.";
const HEALTHY_MESSAGE: &str = "Model is healthy: strong margin, LTV/CAC and payback.";
const MONITOR_MESSAGE: &str = "No red flags, but key metrics are not yet strong; monitor them.";

/// Flags decide first, by their worst severity; only a flag-free result is judged on the raw
/// metric thresholds.
pub fn generate_verdict(metrics: &Metrics, flags: &[Flag]) -> Verdict {
    let worst = flags.iter().map(|flag| flag.severity).max();

    match worst {
        Some(Severity::Critical) => Verdict::new(VerdictStatus::Critical, CRITICAL_MESSAGE),
        Some(Severity::Warning) => Verdict::new(VerdictStatus::Warning, WARNING_MESSAGE),
        _ if meets_healthy_thresholds(metrics) => {
            Verdict::new(VerdictStatus::Healthy, HEALTHY_MESSAGE)
        }
        _ => Verdict::new(VerdictStatus::Warning, MONITOR_MESSAGE),
    }
}

fn meets_healthy_thresholds(metrics: &Metrics) -> bool {
    let ltv_cac_strong = metrics
        .ltv_cac_value()
        .is_some_and(|ratio| ratio > HEALTHY_LTV_CAC);

    // Under 12 months, or under 2 cycles when there is no months figure.
    let payback_quick = metrics.payback.benchmark != PaybackBand::Slow;

    ltv_cac_strong && payback_quick && metrics.margin_percent() > HEALTHY_MARGIN_PERCENT
}
