use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::{fmt, str::FromStr};

use crate::period::{Level, PeriodId};

/// Opaque, generator-assigned item identifier. Never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Whether an item is a one-off todo or a recurring routine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Todo,
    Routine,
}

impl ItemKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Routine => "routine",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an [`ItemKind`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid item kind: '{0}'")]
pub struct ParseKindError(pub String);

impl FromStr for ItemKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "routine" => Ok(Self::Routine),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

/// A commitment: a todo or a routine instance, possibly split into children.
///
/// The canonical store holds the authoritative value of every field.
/// Copies cached inside periods are rewritten by the resync routine after
/// every mutation and must never be edited directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub id: ItemId,
    /// Display text. For split items this is `"<parent content>: <sub_content>"`.
    pub content: String,
    /// Detail appended to the parent's content when this item was split off.
    ///
    /// Kept separately so the label can be rebuilt when the parent's content
    /// changes.
    pub sub_content: Option<String>,
    /// Authoritative for leaves; for items with children, the result of the
    /// last upward recomputation.
    pub is_completed: bool,
    pub parent_id: Option<ItemId>,
    pub child_ids: Vec<ItemId>,
    pub target_count: Option<u32>,
    pub current_count: Option<u32>,
    /// Reset bucket key of the last quota refresh.
    pub last_reset_date: Option<String>,
    pub source_level: Option<Level>,
    pub source_type: ItemKind,
    pub origin_period_id: Option<PeriodId>,
    pub note: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
}

impl Item {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.child_ids.is_empty()
    }

    /// Routines with a target count refresh their quota per reset bucket.
    #[must_use]
    pub fn is_quota_routine(&self) -> bool {
        self.source_type == ItemKind::Routine && self.target_count.is_some()
    }

    /// Spend one unit of quota, floored at zero. The item stays visible.
    pub fn consume_quota(&mut self) {
        if !self.is_quota_routine() {
            return;
        }
        let current = self.current_count.or(self.target_count).unwrap_or(0);
        self.current_count = Some(current.saturating_sub(1));
    }

    /// Refill the quota and remember the bucket it was refilled for.
    pub fn refill_quota(&mut self, bucket_key: String) {
        self.current_count = self.target_count;
        self.last_reset_date = Some(bucket_key);
    }

    /// Build a child copy of this item's display fields.
    ///
    /// The copy links back to `self` through `parent_id`, carries no children
    /// or quota of its own, and keeps the provenance of the original.
    #[must_use]
    pub fn split_copy(&self, id: ItemId, sub_content: Option<&str>) -> Self {
        let sub_content = sub_content
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self {
            id,
            content: compose_label(&self.content, sub_content.as_deref()),
            sub_content,
            is_completed: self.is_completed,
            parent_id: Some(self.id.clone()),
            child_ids: Vec::new(),
            target_count: None,
            current_count: None,
            last_reset_date: None,
            source_level: self.source_level,
            source_type: self.source_type,
            origin_period_id: self.origin_period_id.clone(),
            note: None,
            color: self.color.clone(),
            category: self.category.clone(),
        }
    }
}

/// `"parent: detail"` when a detail is present, otherwise the parent label.
#[must_use]
pub fn compose_label(parent_content: &str, sub_content: Option<&str>) -> String {
    match sub_content {
        Some(sub) => format!("{parent_content}: {sub}"),
        None => parent_content.to_string(),
    }
}

/// Caller-supplied fields for a new root item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewItem {
    pub content: String,
    pub kind: ItemKind,
    pub target_count: Option<u32>,
    pub note: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
}

impl NewItem {
    #[must_use]
    pub fn todo(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn routine(content: impl Into<String>, target_count: Option<u32>) -> Self {
        Self {
            content: content.into(),
            kind: ItemKind::Routine,
            target_count,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routine(target: u32) -> Item {
        Item {
            id: ItemId::new("r1"),
            content: "Run".to_string(),
            source_type: ItemKind::Routine,
            target_count: Some(target),
            current_count: Some(target),
            ..Item::default()
        }
    }

    #[test]
    fn consume_quota_floors_at_zero() {
        let mut item = routine(1);
        item.consume_quota();
        assert_eq!(item.current_count, Some(0));
        item.consume_quota();
        assert_eq!(item.current_count, Some(0));
    }

    #[test]
    fn consume_quota_ignores_plain_todos() {
        let mut item = Item {
            content: "Read".to_string(),
            ..Item::default()
        };
        item.consume_quota();
        assert_eq!(item.current_count, None);
    }

    #[test]
    fn refill_restores_target_and_records_key() {
        let mut item = routine(3);
        item.current_count = Some(0);
        item.refill_quota("2026-W14".to_string());
        assert_eq!(item.current_count, Some(3));
        assert_eq!(item.last_reset_date.as_deref(), Some("2026-W14"));
    }

    #[test]
    fn split_copy_composes_label_and_links_parent() {
        let mut source = routine(3);
        source.color = Some("teal".to_string());
        source.note = Some("private".to_string());
        source.child_ids.push(ItemId::new("older"));

        let child = source.split_copy(ItemId::new("c1"), Some(" laps "));
        assert_eq!(child.content, "Run: laps");
        assert_eq!(child.sub_content.as_deref(), Some("laps"));
        assert_eq!(child.parent_id, Some(ItemId::new("r1")));
        assert!(child.child_ids.is_empty());
        assert_eq!(child.target_count, None);
        assert_eq!(child.color.as_deref(), Some("teal"));
        assert_eq!(child.note, None);
        assert_eq!(child.source_type, ItemKind::Routine);
    }

    #[test]
    fn split_copy_without_detail_keeps_label() {
        let source = routine(2);
        let child = source.split_copy(ItemId::new("c1"), Some("   "));
        assert_eq!(child.content, "Run");
        assert_eq!(child.sub_content, None);
    }

    #[test]
    fn kind_parse_roundtrips() {
        for kind in [ItemKind::Todo, ItemKind::Routine] {
            assert_eq!(kind.to_string().parse::<ItemKind>().unwrap(), kind);
        }
        assert!("habit".parse::<ItemKind>().is_err());
    }

    #[test]
    fn item_deserializes_with_missing_fields() {
        let item: Item = serde_json::from_str(r#"{"id":"a","content":"x"}"#).unwrap();
        assert_eq!(item.id.as_str(), "a");
        assert!(!item.is_completed);
        assert!(item.child_ids.is_empty());
        assert_eq!(item.source_type, ItemKind::Todo);
    }
}
