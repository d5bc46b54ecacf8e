//! Usage analytics and hierarchical leaderboard engine.
//!
//! Converts raw per-key and per-SKU spend records into trend
//! classifications, spend forecasts, anomaly flags, and a sortable,
//! filterable leaderboard projection with stable expand/collapse identity
//! across data refreshes.
//!
//! Data acquisition (billing API calls) and rendering live outside this
//! crate; it consumes pre-fetched usage records and a pre-assembled
//! [`UnifiedEntry`](types::UnifiedEntry) forest, and produces typed
//! results plus ordered, depth-tagged rows for presentation.

pub mod format;
pub mod leaderboard;
pub mod services;
pub mod types;
