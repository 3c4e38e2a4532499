use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use tracing::instrument;

use crate::engine::Planner;
use crate::graph;
use crate::model::ItemId;

/// What one completion write changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChange {
    pub item_id: ItemId,
    pub completed: bool,
    /// Descendants whose flag was forced to match.
    pub cascaded: Vec<ItemId>,
    /// Ancestors whose flag flipped after recomputing their progress.
    pub bubbled: Vec<ItemId>,
}

impl CompletionChange {
    /// The written item, then every descendant and ancestor that followed it.
    #[must_use]
    pub fn changed_ids(&self) -> impl Iterator<Item = &ItemId> {
        std::iter::once(&self.item_id)
            .chain(&self.cascaded)
            .chain(&self.bubbled)
    }
}

impl Planner {
    /// Flip an item's completion. See [`Planner::set_completed`].
    #[instrument(skip(self))]
    pub fn toggle_completion(&mut self, id: &ItemId) -> Option<CompletionChange> {
        let completed = !self.items.get(id)?.is_completed;
        self.set_completed(id, completed)
    }

    /// Write `completed` to the item, then propagate:
    ///
    /// - **down** (when `[completion] cascade_down`): every descendant is
    ///   forced to the same flag;
    /// - **up** (when `[completion] bubble_up`): each ancestor recomputes
    ///   its direct-child progress and is complete iff that rounds to 100.
    ///   The walk stops at the first ancestor whose flag does not change.
    ///
    /// Both walks are cycle-guarded. Every period holding a touched id is
    /// resynced before returning. `None` when the item does not exist.
    #[instrument(skip(self))]
    pub fn set_completed(&mut self, id: &ItemId, completed: bool) -> Option<CompletionChange> {
        if !self.items.contains(id) {
            return None;
        }

        let mut touched: HashSet<ItemId> = HashSet::new();
        self.items.update(id, |item| item.is_completed = completed);
        touched.insert(id.clone());

        let mut cascaded = Vec::new();
        if self.config.completion.cascade_down {
            for descendant in graph::descendant_ids(&self.items, id).into_iter().skip(1) {
                let flipped = self
                    .items
                    .get(&descendant)
                    .is_some_and(|item| item.is_completed != completed);
                if flipped {
                    self.items
                        .update(&descendant, |item| item.is_completed = completed);
                    touched.insert(descendant.clone());
                    cascaded.push(descendant);
                }
            }
        }

        let bubbled = if self.config.completion.bubble_up {
            self.bubble_up(id, &mut touched)
        } else {
            Vec::new()
        };

        let stats = self.sync(&touched);
        tracing::debug!(
            cascaded = cascaded.len(),
            bubbled = bubbled.len(),
            periods_resynced = stats.periods_changed,
            "completion updated"
        );
        Some(CompletionChange {
            item_id: id.clone(),
            completed,
            cascaded,
            bubbled,
        })
    }

    /// Recompute ancestors of `id` until one keeps its flag.
    fn bubble_up(&mut self, id: &ItemId, touched: &mut HashSet<ItemId>) -> Vec<ItemId> {
        let mut flipped = Vec::new();
        let mut visited: HashSet<ItemId> = HashSet::from([id.clone()]);
        let mut current = self.items.get(id).and_then(|item| item.parent_id.clone());

        while let Some(ancestor_id) = current {
            if !visited.insert(ancestor_id.clone()) {
                tracing::warn!(item = %ancestor_id, "cycle in parent chain during completion");
                break;
            }
            let Some(progress) = graph::direct_progress(&self.items, &ancestor_id) else {
                break;
            };
            if progress.total == 0 {
                break;
            }
            let complete = progress.is_complete();
            let Some(ancestor) = self.items.get(&ancestor_id) else {
                break;
            };
            if ancestor.is_completed == complete {
                break;
            }
            current = ancestor.parent_id.clone();
            self.items
                .update(&ancestor_id, |item| item.is_completed = complete);
            touched.insert(ancestor_id.clone());
            flipped.push(ancestor_id);
        }
        flipped
    }
}
