//! Pure calculation pipeline: guards, metric calculators, flag rules and the verdict.

pub mod benchmarks;
pub mod calculators;
pub mod domain;
pub mod flags;
pub mod format;
pub mod guards;
pub mod metrics;
pub mod verdict;

pub use benchmarks::{LtvCacBand, PaybackBand};
pub use domain::{
    CalculationError, CommissionInputs, NormalizedInputs, ProjectInputs, SubscriptionInputs,
    TransactionInputs, UnitInputs, UnitType,
};
pub use flags::{generate_flags, Flag, Severity};
pub use metrics::{
    BreakEvenMetric, CalculationResult, ContributionMarginMetric, LtvCacMetric, LtvMetric, Metrics,
    PaybackMetric,
};
pub use verdict::{generate_verdict, Verdict, VerdictStatus};

use calculators::{
    break_even_units, contribution_margin, contribution_margin_percent, lifetime_value,
    ltv_cac_ratio, payback, round_to,
};
use format::{
    format_break_even, format_money, format_months, format_payback, format_percent, format_ratio,
};

/// Runs the whole pipeline for one set of normalized inputs.
///
/// The only failure is a guard trip, returned before any metric is computed. Identical inputs
/// always produce identical results.
pub fn calculate(inputs: &NormalizedInputs) -> Result<CalculationResult, CalculationError> {
    guards::run_guards(inputs)?;

    let base = inputs.base();
    let margin = contribution_margin(base);
    let percent = round_to(contribution_margin_percent(margin, base.revenue), 1);
    let contribution_margin = ContributionMarginMetric {
        value: margin.round() as i64,
        percent,
        formatted: format!("{} ({})", format_money(margin), format_percent(percent)),
    };

    let (ltv, ltv_cac_ratio) = match base.effective_lifetime() {
        Some(lifetime) => {
            let (ltv, ratio) = lifetime_metrics(margin, lifetime, base.cac);
            (Some(ltv), Some(ratio))
        }
        None => (None, None),
    };

    let metrics = Metrics {
        contribution_margin,
        ltv,
        ltv_cac_ratio,
        payback: payback_metric(inputs, margin),
        break_even: break_even_metric(inputs, margin),
    };

    let flags = generate_flags(inputs, &metrics);
    let verdict = generate_verdict(&metrics, &flags);

    Ok(CalculationResult {
        metrics,
        flags,
        verdict,
    })
}

fn lifetime_metrics(margin: f64, lifetime: f64, cac: f64) -> (LtvMetric, LtvCacMetric) {
    let ltv = lifetime_value(margin, lifetime);
    let ratio = round_to(ltv_cac_ratio(ltv, cac), 2);
    let band = LtvCacBand::classify(ratio);

    let ltv_metric = LtvMetric {
        value: ltv.round() as i64,
        formula: format!(
            "{} × {} = {}",
            format_money(margin),
            format_months(lifetime),
            format_money(ltv)
        ),
        formatted: format_money(ltv),
    };

    let ratio_metric = LtvCacMetric {
        value: ratio,
        benchmark: band,
        benchmark_label: band.label().to_string(),
        formatted: format_ratio(ratio),
    };

    (ltv_metric, ratio_metric)
}

/// Months it takes to recoup CAC, when the business model gives cycles a calendar length.
fn payback_months(inputs: &NormalizedInputs, cycles: f64) -> Option<f64> {
    let base = inputs.base();
    match inputs.unit_type() {
        UnitType::Subscription => Some(cycles),
        UnitType::Transaction | UnitType::Deal => base
            .repeat_frequency
            .filter(|per_year| *per_year > 0.0)
            .map(|per_year| cycles / (per_year / 12.0)),
        UnitType::Project => base
            .duration_days
            .filter(|days| *days > 0.0)
            .map(|days| cycles * (days / 30.0)),
    }
}

fn payback_metric(inputs: &NormalizedInputs, margin: f64) -> PaybackMetric {
    let cycles = payback(inputs.base().cac, margin);
    let exact_months = payback_months(inputs, cycles);
    let benchmark = PaybackBand::classify(cycles, exact_months);
    let value = round_to(cycles, 2);
    let months = exact_months.map(|months| round_to(months, 2));

    PaybackMetric {
        value,
        months,
        unit: format_payback(value, months, inputs.unit_type()),
        benchmark,
        benchmark_label: benchmark.label().to_string(),
    }
}

fn break_even_metric(inputs: &NormalizedInputs, margin: f64) -> Option<BreakEvenMetric> {
    let base = inputs.base();
    let fixed_costs = base.fixed_costs_monthly.filter(|costs| *costs > 0.0)?;
    let units_needed = break_even_units(fixed_costs, margin);
    let current_volume = base
        .current_volume
        .map(|volume| volume.max(0.0).round() as u64);
    let gap = current_volume.map(|current| volume_gap(units_needed, current));

    Some(BreakEvenMetric {
        units_needed,
        current_volume,
        gap,
        status: format_break_even(units_needed, current_volume, inputs.unit_type()),
    })
}

/// Signed shortfall of `current` against `needed`, saturating at the `i64` range.
fn volume_gap(needed: u64, current: u64) -> i64 {
    if needed >= current {
        i64::try_from(needed - current).unwrap_or(i64::MAX)
    } else {
        i64::try_from(current - needed).map_or(i64::MIN, |surplus| -surplus)
    }
}
