//! Search, filter, sort, and re-linearization over a flattened forest

use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;

use crate::leaderboard::{flatten, ExpandStates, LeaderboardRow};
use crate::types::UnifiedEntry;

/// Window within which a last-used timestamp still counts as active
const ACTIVE_WINDOW_DAYS: i64 = 7;

/// Ordering applied to top-level rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    UsageDesc,
    UsageAsc,
    NameAsc,
    LastActiveDesc,
}

/// Activity filter applied per row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Idle,
}

/// Leaderboard projection over a unified usage forest.
///
/// Owns the forest between refreshes. `set_forest` replaces it wholesale;
/// expand state survives the swap through an id-keyed side table. Each
/// `rows` call is one atomic pass over the current forest; consumers
/// never observe a half-rebuilt tree.
#[derive(Debug, Default)]
pub struct LeaderboardEngine {
    forest: Vec<UnifiedEntry>,
    expand: ExpandStates,
    search: String,
    status: StatusFilter,
    sort: SortMode,
    max_top_usage: f64,
}

impl LeaderboardEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the forest, carrying expand state across by entry id.
    ///
    /// Flags from the outgoing forest are captured first, then merged
    /// onto the incoming one; group ids never seen before keep their
    /// constructed default.
    pub fn set_forest(&mut self, mut forest: Vec<UnifiedEntry>) {
        self.expand.capture(&self.forest);
        self.expand.apply(&mut forest);
        self.max_top_usage = forest.iter().map(|e| e.usage.diem).fold(0.0, f64::max);
        self.forest = forest;
    }

    pub fn forest(&self) -> &[UnifiedEntry] {
        &self.forest
    }

    /// Toggle a group's expansion in place; returns the new state, or
    /// None when the id is unknown or not a group.
    pub fn toggle_expanded(&mut self, id: &str) -> Option<bool> {
        let entry = find_mut(&mut self.forest, id)?;
        if !entry.is_group {
            return None;
        }
        entry.toggle_expanded();
        let expanded = entry.is_expanded;
        self.expand.set(id, expanded);
        Some(expanded)
    }

    /// Case-insensitive substring filter on label or id; empty clears
    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_lowercase();
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.status = status;
    }

    pub fn set_sort_mode(&mut self, sort: SortMode) {
        self.sort = sort;
    }

    /// Flatten, filter, sort top-level rows, and re-linearize subtrees.
    pub fn rows(&self) -> Vec<LeaderboardRow> {
        let now = Utc::now();
        let mut rows = flatten(&self.forest);

        if !self.search.is_empty() {
            rows.retain(|row| {
                row.label.to_lowercase().contains(&self.search)
                    || row.id.to_lowercase().contains(&self.search)
            });
        }
        match self.status {
            StatusFilter::All => {}
            StatusFilter::Active => rows.retain(|row| is_active_at(row, now)),
            StatusFilter::Idle => rows.retain(|row| !is_active_at(row, now)),
        }

        relinearize(rows, self.sort, now)
    }

    /// Usage as a fraction of the largest top-level entry; 0.0 when there
    /// are no top-level rows or the maximum is zero.
    pub fn percentile(&self, row: &LeaderboardRow) -> f64 {
        if self.max_top_usage <= 0.0 {
            return 0.0;
        }
        row.usage.diem / self.max_top_usage
    }

    /// Log-compressed usage ratio for bar rendering, guarded against a
    /// zero denominator.
    pub fn log_scale_ratio(&self, row: &LeaderboardRow) -> f64 {
        let denom = (self.max_top_usage + 1.0).log10().max(1.0);
        (row.usage.diem + 1.0).log10() / denom
    }

    /// Whether a row counts as active: nonzero trailing usage, or last
    /// activity within the trailing window.
    pub fn is_active(row: &LeaderboardRow) -> bool {
        is_active_at(row, Utc::now())
    }
}

fn is_active_at(row: &LeaderboardRow, now: DateTime<Utc>) -> bool {
    if row.usage.diem > 0.0 {
        return true;
    }
    match row.last_used_at {
        Some(last_used) => now.signed_duration_since(last_used) < Duration::days(ACTIVE_WINDOW_DAYS),
        None => false,
    }
}

fn find_mut<'a>(forest: &'a mut [UnifiedEntry], id: &str) -> Option<&'a mut UnifiedEntry> {
    for entry in forest.iter_mut() {
        if entry.id == id {
            return Some(entry);
        }
        if let Some(found) = find_mut(&mut entry.children, id) {
            return Some(found);
        }
    }
    None
}

/// Reorder top-level rows with `sort`, keeping each one's contiguous run
/// of descendant rows attached behind it in unchanged relative order.
/// Rows whose ancestors were filtered away have no head to move with;
/// they keep their depth and their flatten-order position.
fn relinearize(
    rows: Vec<LeaderboardRow>,
    sort: SortMode,
    now: DateTime<Utc>,
) -> Vec<LeaderboardRow> {
    let mut orphans: Vec<LeaderboardRow> = Vec::new();
    let mut blocks: Vec<Vec<LeaderboardRow>> = Vec::new();

    for row in rows {
        if row.depth == 0 {
            blocks.push(vec![row]);
        } else if let Some(block) = blocks.last_mut() {
            block.push(row);
        } else {
            orphans.push(row);
        }
    }

    // Stable sort: only top-level heads move, subtrees ride along
    blocks.sort_by(|a, b| compare_rows(&a[0], &b[0], sort, now));

    orphans
        .into_iter()
        .chain(blocks.into_iter().flatten())
        .collect()
}

fn compare_rows(
    a: &LeaderboardRow,
    b: &LeaderboardRow,
    sort: SortMode,
    now: DateTime<Utc>,
) -> Ordering {
    match sort {
        SortMode::UsageDesc => {
            active_first(a, b, now).then_with(|| b.usage.diem.total_cmp(&a.usage.diem))
        }
        SortMode::UsageAsc => {
            active_first(a, b, now).then_with(|| a.usage.diem.total_cmp(&b.usage.diem))
        }
        SortMode::NameAsc => a.label.to_lowercase().cmp(&b.label.to_lowercase()),
        SortMode::LastActiveDesc => b.last_used_at.cmp(&a.last_used_at),
    }
}

/// Active rows sort ahead of idle rows in the usage modes
fn active_first(a: &LeaderboardRow, b: &LeaderboardRow, now: DateTime<Utc>) -> Ordering {
    is_active_at(b, now).cmp(&is_active_at(a, now))
}
