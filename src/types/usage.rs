//! Core usage types for spend tracking and trend analysis

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Currency selector for dual-denominated usage values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Diem,
    Usd,
}

/// Usage over a trailing window, in platform credits and dollars
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageAmount {
    pub diem: f64,
    pub usd: f64,
}

impl UsageAmount {
    pub fn new(diem: f64, usd: f64) -> Self {
        Self { diem, usd }
    }

    pub fn value(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Diem => self.diem,
            Currency::Usd => self.usd,
        }
    }
}

/// Raw per-key usage record supplied by the acquisition layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyUsage {
    pub id: String,
    pub name: String,
    pub usage: UsageAmount,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Current account balance from the billing API
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Balance {
    pub diem: f64,
    pub usd: f64,
}

impl Balance {
    pub fn value(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Diem => self.diem,
            Currency::Usd => self.usd,
        }
    }
}

/// Aggregate usage captured at a point in time.
///
/// Owned exclusively by the snapshot store; the persisted field name for
/// `entity_count` keeps the on-disk document compatible with earlier
/// dashboard builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub total_diem: f64,
    pub total_usd: f64,
    #[serde(rename = "api_key_count")]
    pub entity_count: usize,
}

impl Snapshot {
    pub fn value(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Diem => self.total_diem,
            Currency::Usd => self.total_usd,
        }
    }
}

/// Direction of a usage trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    /// Capitalized label for display
    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "Increasing",
            TrendDirection::Decreasing => "Decreasing",
            TrendDirection::Stable => "Stable",
        }
    }
}

/// Trend analysis over a trailing window; derived, never persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    pub direction: TrendDirection,
    pub daily_average_diem: f64,
    pub daily_average_usd: f64,
    /// Filled by `days_remaining` once a balance is known
    pub days_remaining: Option<u32>,
    /// 0.0 to 1.0, scaled by data point count
    pub confidence: f64,
    /// Percent change over the analysis window
    pub percent_change: f64,
}

impl TrendResult {
    /// Defined result for windows with fewer than two data points.
    /// Callers must treat this as valid output, not an error.
    pub fn no_signal() -> Self {
        Self {
            direction: TrendDirection::Stable,
            daily_average_diem: 0.0,
            daily_average_usd: 0.0,
            days_remaining: None,
            confidence: 0.0,
            percent_change: 0.0,
        }
    }
}

/// Kind of usage anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    HighUsage,
    LowUsage,
}

/// A usage reading that deviates from the recent baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub timestamp: DateTime<Utc>,
    pub kind: AnomalyKind,
    pub observed: f64,
    pub baseline: f64,
    /// Deviation relative to the detection threshold, capped at 3.0
    pub severity: f64,
}

/// Dashboard-facing usage summary over a trailing window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub period_days: i64,
    pub total_diem: f64,
    pub total_usd: f64,
    pub daily_average_diem: f64,
    pub daily_average_usd: f64,
    pub direction: TrendDirection,
    pub percent_change: f64,
    pub confidence: f64,
    pub anomaly_count: usize,
    pub data_points: usize,
    pub generated_at: DateTime<Utc>,
}

/// Administrative operations the upstream billing API supports.
///
/// Rename and usage-limit changes are capability facts of the provider;
/// consumers query these flags instead of branching on provider identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpstreamCapabilities {
    #[serde(default)]
    pub rename_keys: bool,
    #[serde(default)]
    pub usage_limits: bool,
}
