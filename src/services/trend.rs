//! Trend analysis over aggregate usage snapshots

use chrono::{Duration, Utc};

use crate::types::{
    Anomaly, AnomalyKind, Currency, Snapshot, TrendDirection, TrendResult, UsageSummary,
};

/// Stored snapshots needed before anomaly detection engages
const ANOMALY_MIN_SNAPSHOTS: usize = 7;
/// Most-recent snapshots inspected for anomalies
const ANOMALY_WINDOW: usize = 14;
/// Trailing snapshots tested against the baseline
const ANOMALY_RECENT: usize = 3;
/// Default deviation multiplier for anomaly detection
pub const DEFAULT_ANOMALY_MULTIPLIER: f64 = 2.5;

/// Percent change below which a trend counts as stable
const STABLE_BAND_PERCENT: f64 = 5.0;

/// Analytics over a snapshot history.
///
/// Borrows the data; construct one per pass via
/// [`SnapshotStore::analyzer`](crate::services::SnapshotStore::analyzer).
pub struct TrendAnalyzer<'a> {
    snapshots: &'a [Snapshot],
}

impl<'a> TrendAnalyzer<'a> {
    pub fn new(snapshots: &'a [Snapshot]) -> Self {
        Self { snapshots }
    }

    /// Mean absolute daily rate of change over the trailing window.
    ///
    /// Fewer than two points in the window yields 0.0. Absolute deltas
    /// mean oscillating series overstate spend; that bias is part of the
    /// contract. The per-key report generator applies the
    /// positive-delta-only policy instead.
    pub fn daily_average(&self, window_days: i64, currency: Currency) -> f64 {
        if self.snapshots.len() < 2 {
            return 0.0;
        }
        let mut recent = self.window(window_days);
        if recent.len() < 2 {
            return 0.0;
        }
        recent.sort_by_key(|s| s.timestamp);

        let mut rates = Vec::new();
        for pair in recent.windows(2) {
            let days = (pair[1].timestamp - pair[0].timestamp).num_seconds() as f64 / 86_400.0;
            if days > 0.0 {
                let delta = pair[1].value(currency) - pair[0].value(currency);
                rates.push((delta / days).abs());
            }
        }
        mean(&rates)
    }

    /// Classify the usage trend over the trailing window.
    ///
    /// `days_remaining` is left unset here; it needs a balance and is
    /// computed separately.
    pub fn trend(&self, window_days: i64, currency: Currency) -> TrendResult {
        if self.snapshots.len() < 2 {
            return TrendResult::no_signal();
        }
        let mut recent = self.window(window_days);
        if recent.len() < 2 {
            return TrendResult::no_signal();
        }
        recent.sort_by_key(|s| s.timestamp);

        let start = recent[0].value(currency);
        let end = recent[recent.len() - 1].value(currency);

        let (percent_change, direction) = if start == 0.0 {
            (0.0, TrendDirection::Stable)
        } else {
            let pct = (end - start) / start * 100.0;
            let dir = if pct.abs() < STABLE_BAND_PERCENT {
                TrendDirection::Stable
            } else if pct > 0.0 {
                TrendDirection::Increasing
            } else {
                TrendDirection::Decreasing
            };
            (pct, dir)
        };

        TrendResult {
            direction,
            daily_average_diem: self.daily_average(window_days, Currency::Diem),
            daily_average_usd: self.daily_average(window_days, Currency::Usd),
            days_remaining: None,
            confidence: (recent.len() as f64 / 10.0).min(1.0),
            percent_change,
        }
    }

    /// Estimate days until the balance is depleted at the trailing 7-day
    /// spend rate. None when there is no spend signal or no balance.
    pub fn days_remaining(&self, balance: f64, currency: Currency) -> Option<u32> {
        let average = self.daily_average(7, currency);
        if average <= 0.0 || balance <= 0.0 {
            return None;
        }
        Some((balance / average).floor().max(0.0) as u32)
    }

    /// Anomalies at the default deviation multiplier
    pub fn default_anomalies(&self) -> Vec<Anomaly> {
        self.anomalies(DEFAULT_ANOMALY_MULTIPLIER)
    }

    /// Detect recent USD readings that deviate from the two-week baseline
    /// by more than `multiplier` standard deviations.
    ///
    /// Needs at least seven stored snapshots; the baseline excludes the
    /// last three readings, which are the ones under test. A flat
    /// baseline (zero deviation) yields no anomalies.
    pub fn anomalies(&self, multiplier: f64) -> Vec<Anomaly> {
        if self.snapshots.len() < ANOMALY_MIN_SNAPSHOTS {
            return Vec::new();
        }

        let window_start = self.snapshots.len().saturating_sub(ANOMALY_WINDOW);
        let recent = &self.snapshots[window_start..];
        if recent.len() <= ANOMALY_RECENT {
            return Vec::new();
        }

        let split = recent.len() - ANOMALY_RECENT;
        let baseline: Vec<f64> = recent[..split].iter().map(|s| s.total_usd).collect();
        if baseline.len() < 4 {
            return Vec::new();
        }

        let mean_usage = mean(&baseline);
        let std_usage = sample_stdev(&baseline, mean_usage);
        if std_usage == 0.0 {
            return Vec::new();
        }

        let mut anomalies = Vec::new();
        for snapshot in &recent[split..] {
            let z = (snapshot.total_usd - mean_usage).abs() / std_usage;
            if z > multiplier {
                anomalies.push(Anomaly {
                    timestamp: snapshot.timestamp,
                    kind: if snapshot.total_usd > mean_usage {
                        AnomalyKind::HighUsage
                    } else {
                        AnomalyKind::LowUsage
                    },
                    observed: snapshot.total_usd,
                    baseline: mean_usage,
                    severity: (z / multiplier).min(3.0),
                });
            }
        }
        anomalies
    }

    /// Comprehensive window summary for dashboard consumption
    pub fn summary(&self, window_days: i64) -> UsageSummary {
        let trend = self.trend(window_days, Currency::Usd);
        let anomalies = self.default_anomalies();
        let recent = self.window(window_days);

        UsageSummary {
            period_days: window_days,
            total_diem: recent.iter().map(|s| s.total_diem).sum(),
            total_usd: recent.iter().map(|s| s.total_usd).sum(),
            daily_average_diem: trend.daily_average_diem,
            daily_average_usd: trend.daily_average_usd,
            direction: trend.direction,
            percent_change: trend.percent_change,
            confidence: trend.confidence,
            anomaly_count: anomalies.len(),
            data_points: recent.len(),
            generated_at: Utc::now(),
        }
    }

    fn window(&self, window_days: i64) -> Vec<Snapshot> {
        let cutoff = Utc::now() - Duration::days(window_days);
        self.snapshots
            .iter()
            .filter(|s| s.timestamp >= cutoff)
            .cloned()
            .collect()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation (n - 1 denominator); 0.0 below two values
fn sample_stdev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
