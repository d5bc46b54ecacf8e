//! Rolling aggregate usage snapshot store
//!
//! Persists a 30-day window of whole-account usage snapshots so trend
//! analysis survives process restarts. The history degrades gracefully:
//! a missing or corrupted document resets to empty with a warning and
//! never blocks recording.

use chrono::{DateTime, Duration, Utc};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::services::{storage, TrendAnalyzer};
use crate::types::{DiemtrackError, KeyUsage, Result, Snapshot};

/// Days of history retained on every write
const RETENTION_DAYS: i64 = 30;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDocument {
    snapshots: Vec<Snapshot>,
    last_saved: DateTime<Utc>,
}

/// Persisted rolling window of aggregate usage snapshots
pub struct SnapshotStore {
    path: PathBuf,
    snapshots: Vec<Snapshot>,
}

impl SnapshotStore {
    /// Create a store backed by the default history file
    /// (`~/.diemtrack/usage_history.json`)
    pub fn new() -> Result<Self> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| DiemtrackError::Config("Cannot determine home directory".into()))?;
        let dir = base_dirs.home_dir().join(".diemtrack");
        fs::create_dir_all(&dir)?;
        Ok(Self::with_path(dir.join("usage_history.json")))
    }

    /// Create a store backed by a custom file (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        let mut store = Self {
            path,
            snapshots: Vec::new(),
        };
        store.load();
        store
    }

    /// Recorded snapshots in append order (oldest first)
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Trend analyzer over the current history
    pub fn analyzer(&self) -> TrendAnalyzer<'_> {
        TrendAnalyzer::new(&self.snapshots)
    }

    /// Record a snapshot of current aggregate usage across `keys`, evict
    /// entries older than the retention window, and persist.
    ///
    /// A failed save degrades to a warning; the snapshot is still
    /// retained in memory and returned.
    pub fn record(&mut self, keys: &[KeyUsage]) -> Snapshot {
        let snapshot = Snapshot {
            timestamp: Utc::now(),
            total_diem: keys.iter().map(|k| k.usage.diem).sum(),
            total_usd: keys.iter().map(|k| k.usage.usd).sum(),
            entity_count: keys.len(),
        };
        self.snapshots.push(snapshot.clone());

        let cutoff = Utc::now() - Duration::days(RETENTION_DAYS);
        self.snapshots.retain(|s| s.timestamp >= cutoff);

        if let Err(e) = self.save() {
            eprintln!("[diemtrack] Warning: Failed to save usage history: {}", e);
        }
        snapshot
    }

    /// Persist the whole document (`snapshots` + `last_saved`)
    pub fn save(&self) -> Result<()> {
        let doc = SnapshotDocument {
            snapshots: self.snapshots.clone(),
            last_saved: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&doc)
            .map_err(|e| DiemtrackError::Storage(format!("Serialization failed: {}", e)))?;
        storage::write_document(&self.path, &content)
    }

    fn load(&mut self) {
        match storage::read_document(&self.path) {
            Ok(Some(content)) => match serde_json::from_str::<SnapshotDocument>(&content) {
                Ok(doc) => self.snapshots = doc.snapshots,
                Err(e) => {
                    eprintln!(
                        "[diemtrack] Warning: Corrupted usage history, starting fresh: {}",
                        e
                    );
                    self.snapshots.clear();
                }
            },
            Ok(None) => {}
            Err(e) => {
                eprintln!("[diemtrack] Warning: Failed to read usage history: {}", e);
                self.snapshots.clear();
            }
        }
    }
}
