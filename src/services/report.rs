//! Per-key usage report generation

use chrono::{DateTime, Utc};

use crate::services::KeyHistoryStore;
use crate::types::{HistoryPoint, KeyUsage, RiskLevel, TrendDirection, UsageReport};

/// Mean days per month, used for spend projection
const DAYS_PER_MONTH: f64 = 30.44;
/// History points fed to the trend regression
const TREND_WINDOW: usize = 7;
/// Regression slope beyond which the trend is directional
const TREND_SLOPE_BAND: f64 = 0.1;

/// Generates per-key usage reports over an injected history store.
///
/// Generating a report records a fresh history point first, so the
/// operation is deliberately not idempotent: two calls for the same key
/// leave two points behind.
pub struct ReportGenerator {
    history: KeyHistoryStore,
}

impl ReportGenerator {
    pub fn new(history: KeyHistoryStore) -> Self {
        Self { history }
    }

    /// The backing history store
    pub fn history(&self) -> &KeyHistoryStore {
        &self.history
    }

    /// Build a report for `key`, recording its current usage as a side
    /// effect.
    pub fn generate(&mut self, key: &KeyUsage) -> UsageReport {
        self.history.record(key);
        let points = self.history.history(&key.id);

        let daily_average = daily_average(points);
        let monthly_projection = daily_average * DAYS_PER_MONTH;
        let trend = ols_trend(points);
        let risk_level = risk_level(monthly_projection);
        let recommendations = recommendations(key, risk_level, trend, Utc::now());

        UsageReport {
            key_id: key.id.clone(),
            key_name: key.name.clone(),
            total_diem: key.usage.diem,
            total_usd: key.usage.usd,
            daily_average_usd: daily_average,
            monthly_projection_usd: monthly_projection,
            trend,
            risk_level,
            recommendations,
            created_at: key.created_at,
            last_used_at: key.last_used_at,
        }
    }
}

/// Mean positive daily USD delta across the history.
///
/// Negative deltas are discarded: a drop in trailing usage is a window
/// artifact, not a refund. This deliberately differs from
/// [`TrendAnalyzer::daily_average`](crate::services::TrendAnalyzer::daily_average),
/// which uses absolute deltas; the two policies stay separate operations.
/// With fewer than two points the last reading spread over a week stands
/// in as the estimate.
fn daily_average(points: &[HistoryPoint]) -> f64 {
    if points.len() < 2 {
        return points.last().map(|p| p.usd / 7.0).unwrap_or(0.0);
    }

    let mut rates = Vec::new();
    for pair in points.windows(2) {
        let days = (pair[1].timestamp - pair[0].timestamp).num_seconds() as f64 / 86_400.0;
        if days > 0.0 {
            let delta = pair[1].usd - pair[0].usd;
            if delta >= 0.0 {
                rates.push(delta / days);
            }
        }
    }

    if rates.is_empty() {
        0.0
    } else {
        rates.iter().sum::<f64>() / rates.len() as f64
    }
}

/// Ordinary-least-squares slope over the most recent points (x = index,
/// y = USD), classified into a direction. Fewer than three points reads
/// as stable.
fn ols_trend(points: &[HistoryPoint]) -> TrendDirection {
    if points.len() < 3 {
        return TrendDirection::Stable;
    }
    let start = points.len().saturating_sub(TREND_WINDOW);
    let recent = &points[start..];
    if recent.len() < 3 {
        return TrendDirection::Stable;
    }

    let n = recent.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = recent.iter().map(|p| p.usd).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, point) in recent.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (point.usd - y_mean);
        denominator += dx * dx;
    }
    if denominator == 0.0 {
        return TrendDirection::Stable;
    }

    let slope = numerator / denominator;
    if slope > TREND_SLOPE_BAND {
        TrendDirection::Increasing
    } else if slope < -TREND_SLOPE_BAND {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Risk tier from the monthly spend projection
fn risk_level(monthly_projection: f64) -> RiskLevel {
    if monthly_projection < 5.0 {
        RiskLevel::Low
    } else if monthly_projection < 25.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Ordered, non-exclusive recommendation rules; every matching rule
/// fires. Rule order (magnitude, trend, inactivity, risk) is part of the
/// contract.
fn recommendations(
    key: &KeyUsage,
    risk: RiskLevel,
    trend: TrendDirection,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut recs = Vec::new();

    // Usage magnitude
    if key.usage.usd == 0.0 {
        recs.push(
            "No recent usage detected - consider removing this key if it is no longer needed"
                .to_string(),
        );
        recs.push("Verify the key is correctly wired into your applications".to_string());
    } else if key.usage.usd < 1.0 {
        recs.push("Low usage pattern - suitable for testing and development".to_string());
    } else if key.usage.usd < 10.0 {
        recs.push("Moderate usage - typical for active development".to_string());
    } else {
        recs.push("High usage detected - monitor this key closely".to_string());
    }

    // Trend direction
    match trend {
        TrendDirection::Increasing => {
            recs.push(
                "Usage is trending upward - review your application's call patterns".to_string(),
            );
            recs.push("Consider caching responses to reduce spend".to_string());
        }
        TrendDirection::Decreasing => {
            recs.push("Usage is trending downward - good cost optimization".to_string());
        }
        TrendDirection::Stable => {}
    }

    // Inactivity
    match key.last_used_at {
        Some(last_used) => {
            let idle_days = now.signed_duration_since(last_used).num_days();
            if idle_days > 30 {
                recs.push("Key has not been used in over 30 days - consider revoking it".to_string());
            } else if idle_days > 7 {
                recs.push(
                    "Key has been inactive recently - verify dependent applications".to_string(),
                );
            }
        }
        None => {
            recs.push("No usage history available - verify the key is active".to_string());
        }
    }

    // Risk tier
    if risk == RiskLevel::High {
        recs.push("High-risk usage pattern - set up strict monitoring".to_string());
        recs.push("Consider splitting workload across multiple keys".to_string());
    }

    recs
}
