//! Hierarchical leaderboard projection
//!
//! Flattens a unified usage forest into depth-tagged rows, preserves
//! expand/collapse state across wholesale forest rebuilds, and applies
//! search, status filtering, and hierarchy-preserving sorting.

pub mod engine;
pub mod flatten;

pub use engine::{LeaderboardEngine, SortMode, StatusFilter};
pub use flatten::{flatten, ExpandStates, LeaderboardRow};
