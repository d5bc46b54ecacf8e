//! Per-key report types and text export

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TrendDirection;

/// One observation in a key's usage history.
///
/// Persisted field names (`key_name`, `is_active`) match the on-disk
/// per-key history document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub diem: f64,
    pub usd: f64,
    #[serde(rename = "key_name")]
    pub label: String,
    #[serde(rename = "is_active")]
    pub active: bool,
}

/// Projected-spend risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Capitalized label for display
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Comprehensive usage report for a single API key; derived, never
/// persisted (generating one records a history point instead)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageReport {
    pub key_id: String,
    pub key_name: String,
    pub total_diem: f64,
    pub total_usd: f64,
    pub daily_average_usd: f64,
    pub monthly_projection_usd: f64,
    pub trend: TrendDirection,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl UsageReport {
    /// Render the report as fixed-section export text: header, key
    /// information, current usage, analytics, numbered recommendations,
    /// and the generation timestamp.
    pub fn export_text(&self) -> String {
        let last_used = self
            .last_used_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "Never".to_string());

        let mut out = String::new();
        out.push_str("API KEY USAGE REPORT\n");
        out.push_str("====================\n\n");

        out.push_str("Key Information:\n");
        out.push_str(&format!("  Name: {}\n", self.key_name));
        out.push_str(&format!("  ID: {}\n", self.key_id));
        out.push_str(&format!("  Created: {}\n", self.created_at.to_rfc3339()));
        out.push_str(&format!("  Last Used: {}\n\n", last_used));

        out.push_str("Current Usage (7-day trailing):\n");
        out.push_str(&format!("  DIEM: {:.4}\n", self.total_diem));
        out.push_str(&format!("  USD: ${:.2}\n\n", self.total_usd));

        out.push_str("Usage Analytics:\n");
        out.push_str(&format!("  Daily Average: ${:.2}\n", self.daily_average_usd));
        out.push_str(&format!(
            "  Monthly Projection: ${:.2}\n",
            self.monthly_projection_usd
        ));
        out.push_str(&format!("  Usage Trend: {}\n", self.trend.label()));
        out.push_str(&format!("  Risk Level: {}\n\n", self.risk_level.label()));

        out.push_str("Recommendations:\n");
        for (i, rec) in self.recommendations.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, rec));
        }

        out.push_str(&format!("\nReport generated: {}\n", Utc::now().to_rfc3339()));
        out
    }
}
