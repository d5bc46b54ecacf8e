//! Services for usage persistence, trend analysis, and reporting

mod storage;

pub mod history_store;
pub mod report;
pub mod snapshot_store;
pub mod trend;

pub use history_store::KeyHistoryStore;
pub use report::ReportGenerator;
pub use snapshot_store::SnapshotStore;
pub use trend::TrendAnalyzer;
