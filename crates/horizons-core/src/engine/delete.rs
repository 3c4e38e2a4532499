use std::collections::HashSet;

use tracing::instrument;

use crate::engine::Planner;
use crate::graph;
use crate::model::ItemId;

impl Planner {
    /// Delete an item and its whole subtree.
    ///
    /// Every id in the subtree is removed from the canonical store and from
    /// every period container. The deleted item is spliced out of its
    /// parent's `child_ids` and the parent's cached copies are resynced.
    /// The parent's completion is not recomputed and spent quota is not
    /// refunded.
    ///
    /// Returns the removed ids, root first; empty when the item is unknown.
    #[instrument(skip(self))]
    pub fn delete_item(&mut self, id: &ItemId) -> Vec<ItemId> {
        let Some(item) = self.items.get(id) else {
            return Vec::new();
        };
        let parent_id = item.parent_id.clone();

        let removed = graph::descendant_ids(&self.items, id);
        let mut touched: HashSet<ItemId> = removed.iter().cloned().collect();
        for gone in &removed {
            self.items.remove(gone);
        }

        if let Some(parent_id) = parent_id.filter(|p| !touched.contains(p)) {
            if self
                .items
                .update(&parent_id, |parent| parent.child_ids.retain(|c| c != id))
                .is_some()
            {
                touched.insert(parent_id);
            }
        }

        let stats = self.sync(&touched);
        tracing::debug!(
            removed = removed.len(),
            copies_dropped = stats.copies_dropped,
            periods_resynced = stats.periods_changed,
            "deleted subtree"
        );
        removed
    }
}
