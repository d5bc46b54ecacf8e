//! Per-key usage history store
//!
//! Tracks a rolling 30-day history for each API key, fully independent of
//! the aggregate snapshot store. The persisted document is a bare map of
//! key id to history points, overwritten wholesale on save.

use chrono::{Duration, Utc};
use directories::BaseDirs;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::services::storage;
use crate::types::{DiemtrackError, HistoryPoint, KeyUsage, Result};

/// Days of per-key history retained on every write
const RETENTION_DAYS: i64 = 30;

/// Persisted per-key usage history, keyed by key id
pub struct KeyHistoryStore {
    path: PathBuf,
    histories: HashMap<String, Vec<HistoryPoint>>,
}

impl KeyHistoryStore {
    /// Create a store backed by the default history file
    /// (`~/.diemtrack/usage_reports_history.json`)
    pub fn new() -> Result<Self> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| DiemtrackError::Config("Cannot determine home directory".into()))?;
        let dir = base_dirs.home_dir().join(".diemtrack");
        fs::create_dir_all(&dir)?;
        Ok(Self::with_path(dir.join("usage_reports_history.json")))
    }

    /// Create a store backed by a custom file (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        let mut store = Self {
            path,
            histories: HashMap::new(),
        };
        store.load();
        store
    }

    /// History for one key in append order; empty when unknown
    pub fn history(&self, key_id: &str) -> &[HistoryPoint] {
        self.histories
            .get(key_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Append the key's current usage as a history point, prune entries
    /// older than the retention window, and persist.
    ///
    /// A failed save degrades to a warning; the in-memory history stays
    /// authoritative for the session.
    pub fn record(&mut self, key: &KeyUsage) {
        let point = HistoryPoint {
            timestamp: Utc::now(),
            diem: key.usage.diem,
            usd: key.usage.usd,
            label: key.name.clone(),
            active: key.is_active,
        };

        let points = self.histories.entry(key.id.clone()).or_default();
        points.push(point);

        let cutoff = Utc::now() - Duration::days(RETENTION_DAYS);
        points.retain(|p| p.timestamp > cutoff);

        if let Err(e) = self.save() {
            eprintln!(
                "[diemtrack] Warning: Failed to save key usage history: {}",
                e
            );
        }
    }

    /// Persist the whole id-to-points document
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.histories)
            .map_err(|e| DiemtrackError::Storage(format!("Serialization failed: {}", e)))?;
        storage::write_document(&self.path, &content)
    }

    fn load(&mut self) {
        match storage::read_document(&self.path) {
            Ok(Some(content)) => {
                match serde_json::from_str::<HashMap<String, Vec<HistoryPoint>>>(&content) {
                    Ok(histories) => self.histories = histories,
                    Err(e) => {
                        eprintln!(
                            "[diemtrack] Warning: Corrupted key usage history, starting fresh: {}",
                            e
                        );
                        self.histories.clear();
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!(
                    "[diemtrack] Warning: Failed to read key usage history: {}",
                    e
                );
                self.histories.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UsageAmount;
    use tempfile::TempDir;

    fn make_key(id: &str, name: &str, diem: f64, usd: f64) -> KeyUsage {
        KeyUsage {
            id: id.to_string(),
            name: name.to_string(),
            usage: UsageAmount::new(diem, usd),
            created_at: Utc::now(),
            is_active: true,
            last_used_at: None,
        }
    }

    fn store_in(temp: &TempDir) -> KeyHistoryStore {
        KeyHistoryStore::with_path(temp.path().join("usage_reports_history.json"))
    }

    #[test]
    fn test_record_appends_point_with_label_and_status() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.record(&make_key("key-1", "production", 2.0, 0.2));

        let points = store.history("key-1");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].label, "production");
        assert!(points[0].active);
        assert!((points[0].usd - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_histories_are_isolated_per_key() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.record(&make_key("key-1", "one", 1.0, 0.1));
        store.record(&make_key("key-2", "two", 2.0, 0.2));
        store.record(&make_key("key-1", "one", 3.0, 0.3));

        assert_eq!(store.history("key-1").len(), 2);
        assert_eq!(store.history("key-2").len(), 1);
        assert!(store.history("key-3").is_empty());
    }

    #[test]
    fn test_record_prunes_points_older_than_retention() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.histories.insert(
            "key-1".to_string(),
            vec![HistoryPoint {
                timestamp: Utc::now() - Duration::days(31),
                diem: 1.0,
                usd: 0.1,
                label: "stale".to_string(),
                active: true,
            }],
        );
        store.record(&make_key("key-1", "fresh", 2.0, 0.2));

        let points = store.history("key-1");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].label, "fresh");
    }

    #[test]
    fn test_persists_and_reloads() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("usage_reports_history.json");

        let mut store = KeyHistoryStore::with_path(path.clone());
        store.record(&make_key("key-1", "production", 2.0, 0.2));

        let reloaded = KeyHistoryStore::with_path(path);
        assert_eq!(reloaded.history("key-1").len(), 1);
        assert_eq!(reloaded.history("key-1")[0].label, "production");
    }

    #[test]
    fn test_persisted_document_schema() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("usage_reports_history.json");

        let mut store = KeyHistoryStore::with_path(path.clone());
        store.record(&make_key("key-1", "production", 2.0, 0.2));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"key-1\""));
        assert!(content.contains("\"key_name\""));
        assert!(content.contains("\"is_active\""));
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert!(store.history("anything").is_empty());
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("usage_reports_history.json");
        fs::write(&path, "][ not json").unwrap();

        let store = KeyHistoryStore::with_path(path);
        assert!(store.history("key-1").is_empty());
    }
}
