//! Forest flattening and expand-state preservation

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::types::{EntryKind, UnifiedEntry, UsageAmount};

/// One depth-tagged row of the flattened forest
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub usage: UsageAmount,
    pub kind: EntryKind,
    pub is_group: bool,
    pub is_expanded: bool,
    pub depth: usize,
    pub last_used_at: Option<DateTime<Utc>>,
    pub details: Option<String>,
}

impl LeaderboardRow {
    fn from_entry(entry: &UnifiedEntry, depth: usize) -> Self {
        Self {
            id: entry.id.clone(),
            label: entry.label.clone(),
            icon: entry.icon.clone(),
            usage: entry.usage,
            kind: entry.kind,
            is_group: entry.is_group,
            is_expanded: entry.is_expanded,
            depth,
            last_used_at: entry.last_used_at,
            details: entry.details.clone(),
        }
    }
}

/// Flatten a forest into display rows in pre-order.
///
/// Every node is emitted; its children are visited only when the node is
/// an expanded group. Expansion gates traversal, not just visibility, so
/// a collapsed subtree contributes exactly one row regardless of its
/// size, and sibling subtrees never interleave.
pub fn flatten(forest: &[UnifiedEntry]) -> Vec<LeaderboardRow> {
    let mut rows = Vec::new();
    for entry in forest {
        flatten_into(entry, 0, &mut rows);
    }
    rows
}

fn flatten_into(entry: &UnifiedEntry, depth: usize, rows: &mut Vec<LeaderboardRow>) {
    rows.push(LeaderboardRow::from_entry(entry, depth));
    if entry.is_group && entry.is_expanded {
        for child in &entry.children {
            flatten_into(child, depth + 1, rows);
        }
    }
}

/// Expand flags keyed by entry id, surviving wholesale forest rebuilds.
///
/// The forest is replaced on every refresh; this side table is the
/// durable record. Capture the outgoing forest, build the new one, then
/// apply: group nodes with a remembered id get their flag overwritten,
/// unknown ids keep their constructed default.
#[derive(Debug, Clone, Default)]
pub struct ExpandStates {
    states: HashMap<String, bool>,
}

impl ExpandStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembered flag for an id, if any
    pub fn get(&self, id: &str) -> Option<bool> {
        self.states.get(id).copied()
    }

    /// Record a flag directly (e.g. after a toggle)
    pub fn set(&mut self, id: &str, expanded: bool) {
        self.states.insert(id.to_string(), expanded);
    }

    /// Record the expand flag of every group node in the forest,
    /// recursively
    pub fn capture(&mut self, forest: &[UnifiedEntry]) {
        for entry in forest {
            if entry.is_group {
                self.states.insert(entry.id.clone(), entry.is_expanded);
            }
            self.capture(&entry.children);
        }
    }

    /// Overwrite the expand flag of every known group node in the forest
    pub fn apply(&self, forest: &mut [UnifiedEntry]) {
        for entry in forest.iter_mut() {
            if entry.is_group {
                if let Some(expanded) = self.states.get(&entry.id) {
                    entry.is_expanded = *expanded;
                }
            }
            self.apply(&mut entry.children);
        }
    }
}
