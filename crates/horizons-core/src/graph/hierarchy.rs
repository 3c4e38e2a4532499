//! Parent-child item hierarchy and progress computation.
//!
//! The item graph is tree-shaped by convention only. Ids come from outside
//! and nothing validates the graph continuously, so every walk here carries
//! a visited set and silently stops at a repeat instead of looping.
//!
//! # Progress
//!
//! Progress is computed from **direct** children only and ignores the
//! item's own `is_completed` flag. It can therefore disagree with the cached
//! flag between mutations; callers that need the flag read the item.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashSet, VecDeque};
use std::fmt;

use crate::model::ItemId;
use crate::store::ItemStore;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Completed vs total direct children of one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub done: u32,
    pub total: u32,
}

impl Progress {
    /// Rounded percentage in `0..=100`; halves round up.
    ///
    /// An item with no children counts as `0` here; use [`progress`] for the
    /// leaf rule.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let done = u64::from(self.done.min(self.total));
        let total = u64::from(self.total);
        let rounded = (200 * done + total) / (2 * total);
        u8::try_from(rounded).unwrap_or(100)
    }

    /// True iff there is at least one child and the rounded percentage is 100.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.percent() == 100
    }

    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.done)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.done, self.total, self.percent())
    }
}

// ---------------------------------------------------------------------------
// Walks
// ---------------------------------------------------------------------------

/// Every id in the subtree rooted at `root`, including `root` itself.
///
/// BFS order: root first, then breadth by breadth. Child ids with no
/// canonical item are still reported (they are stale references that
/// callers may want to purge) but are not expanded. Returns an empty list
/// when `root` itself is unknown.
#[must_use]
pub fn descendant_ids(items: &ItemStore, root: &ItemId) -> Vec<ItemId> {
    if !items.contains(root) {
        return Vec::new();
    }

    let mut visited: HashSet<ItemId> = HashSet::new();
    let mut queue: VecDeque<ItemId> = VecDeque::new();
    let mut result: Vec<ItemId> = Vec::new();

    queue.push_back(root.clone());

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current.clone()) {
            tracing::warn!(item = %current, "cycle in item graph, skipping repeat");
            continue;
        }
        result.push(current.clone());

        let Some(item) = items.get(&current) else {
            continue;
        };
        for child in &item.child_ids {
            if !visited.contains(child) {
                queue.push_back(child.clone());
            }
        }
    }

    result
}

/// Ancestor chain of `id`, immediate parent first, root last.
///
/// The chain stops at a missing parent or at the first repeated id.
#[must_use]
pub fn ancestor_ids(items: &ItemStore, id: &ItemId) -> Vec<ItemId> {
    let mut ancestors = Vec::new();
    let mut visited: HashSet<ItemId> = HashSet::from([id.clone()]);

    let mut current = items.get(id).and_then(|item| item.parent_id.clone());
    while let Some(parent_id) = current {
        if !visited.insert(parent_id.clone()) {
            tracing::warn!(item = %id, repeat = %parent_id, "cycle in parent chain");
            break;
        }
        let Some(parent) = items.get(&parent_id) else {
            break;
        };
        current = parent.parent_id.clone();
        ancestors.push(parent_id);
    }

    ancestors
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Tally the direct children of `id`. Children missing from the store are
/// counted as not done.
#[must_use]
pub fn direct_progress(items: &ItemStore, id: &ItemId) -> Option<Progress> {
    let item = items.get(id)?;
    let mut tally = Progress::default();
    for child in &item.child_ids {
        tally.total += 1;
        if items.get(child).is_some_and(|c| c.is_completed) {
            tally.done += 1;
        }
    }
    Some(tally)
}

/// Progress percentage of one item.
///
/// Leaves report `100` when completed and `0` otherwise; items with
/// children report the rounded share of completed direct children.
#[must_use]
pub fn progress(items: &ItemStore, id: &ItemId) -> Option<u8> {
    let item = items.get(id)?;
    if item.is_leaf() {
        return Some(if item.is_completed { 100 } else { 0 });
    }
    direct_progress(items, id).map(|p| p.percent())
}
