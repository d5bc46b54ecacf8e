//! Unified hierarchical usage entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{KeyUsage, UsageAmount};

/// Source of a unified entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    ApiKey,
    WebSku,
}

/// A node in the unified usage forest.
///
/// Groups own their children exclusively; leaves carry an empty child
/// list. Depth is not stored on the node; it is assigned when the forest
/// is flattened into leaderboard rows. Forests are rebuilt wholesale on
/// every refresh; cross-rebuild expand state lives in
/// [`ExpandStates`](crate::leaderboard::ExpandStates), keyed by entry id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedEntry {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub usage: UsageAmount,
    pub kind: EntryKind,
    pub is_group: bool,
    #[serde(default)]
    pub children: Vec<UnifiedEntry>,
    #[serde(default)]
    pub is_expanded: bool,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub details: Option<String>,
}

impl UnifiedEntry {
    /// Build a leaf entry from a raw API key record
    pub fn key(key: &KeyUsage) -> Self {
        Self {
            id: key.id.clone(),
            label: key.name.clone(),
            icon: "🔑".to_string(),
            usage: key.usage,
            kind: EntryKind::ApiKey,
            is_group: false,
            children: Vec::new(),
            is_expanded: false,
            last_used_at: key.last_used_at,
            details: None,
        }
    }

    /// Build a leaf entry for a single web SKU
    pub fn sku(id: &str, label: &str, usage: UsageAmount) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            icon: "🎬".to_string(),
            usage,
            kind: EntryKind::WebSku,
            is_group: false,
            children: Vec::new(),
            is_expanded: false,
            last_used_at: None,
            details: None,
        }
    }

    /// Build a collapsed group with aggregate usage
    pub fn group(id: &str, label: &str, usage: UsageAmount) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            icon: "🌐".to_string(),
            usage,
            kind: EntryKind::WebSku,
            is_group: true,
            children: Vec::new(),
            is_expanded: false,
            last_used_at: None,
            details: None,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Attach a child entry; only meaningful on groups
    pub fn add_child(&mut self, child: UnifiedEntry) {
        self.children.push(child);
    }

    /// Flip expansion; leaves are never expandable
    pub fn toggle_expanded(&mut self) {
        if self.is_group {
            self.is_expanded = !self.is_expanded;
        }
    }
}
