//! Rendering for the single supported locale: roubles grouped by three with no-break spaces.

use super::domain::UnitType;

const GROUP_SEPARATOR: char = '\u{a0}';
const CURRENCY_SUFFIX: &str = "\u{a0}₽";

pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let sign = if rounded < 0.0 { "-" } else { "" };

    format!("{sign}{}{CURRENCY_SUFFIX}", group_thousands(&digits))
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}x")
}

/// Payback in repeat cycles, with the months-equivalent appended when one exists.
pub fn format_payback(value: f64, months: Option<f64>, unit_type: UnitType) -> String {
    match (unit_type, months) {
        (UnitType::Subscription, _) | (_, None) => {
            format!("{value:.2} {}", unit_type.repeat_noun())
        }
        (_, Some(months)) => format!(
            "{value:.2} {} (≈ {months:.1} mo)",
            unit_type.repeat_noun()
        ),
    }
}

pub fn format_break_even(units_needed: u64, current: Option<u64>, unit_type: UnitType) -> String {
    let noun = unit_type.volume_noun();
    match current {
        None => format!("Need {units_needed} {noun} to cover fixed costs"),
        Some(current) if units_needed <= current => "Covered ✓".to_string(),
        Some(current) => format!("Need {} more {noun}", units_needed - current),
    }
}

/// Lifetime months as typed: whole numbers stay whole, derived ones keep one decimal.
pub fn format_months(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0} mo")
    } else {
        format!("{value:.1} mo")
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 * 2);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(ch);
    }
    grouped
}
