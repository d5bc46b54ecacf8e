//! Shared display formatting for trend, depletion, and identifier values

use crate::types::TrendResult;

/// Human-readable trend line, e.g. "Increasing (+12.3%)".
///
/// Changes under one percent render without the number.
pub fn format_trend(trend: &TrendResult) -> String {
    let direction = trend.direction.label();
    if trend.percent_change.abs() < 1.0 {
        format!("{} usage", direction)
    } else {
        let sign = if trend.percent_change > 0.0 { "+" } else { "" };
        format!("{} ({}{:.1}%)", direction, sign, trend.percent_change)
    }
}

/// Depletion estimate with tiered urgency.
///
/// Under seven days is the short-warning tier (marked with "!"); seven
/// through twenty-nine days is the mid tier; beyond that the estimate
/// renders in weeks.
pub fn format_days_remaining(days: Option<u32>) -> String {
    match days {
        None => "Unable to estimate".to_string(),
        Some(0) => "Running low!".to_string(),
        Some(1) => "~1 day remaining!".to_string(),
        Some(d) if d < 7 => format!("~{} days remaining!", d),
        Some(d) if d < 30 => format!("~{} days remaining", d),
        Some(d) => format!("~{} weeks remaining", d / 7),
    }
}

/// Shorten long ids to first-8...last-4 for display
pub fn truncate_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        id.to_string()
    }
}

/// Display label for an entry: its label when present, else its
/// truncated id
pub fn display_identifier(label: &str, id: &str) -> String {
    if label.trim().is_empty() {
        truncate_id(id)
    } else {
        label.to_string()
    }
}
