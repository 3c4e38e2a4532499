use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use tracing::instrument;

use crate::engine::Planner;
use crate::model::{ItemId, Placement};
use crate::period::PeriodId;

/// Ids created by one slot assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The entry in the current period's slot for the target child.
    pub slot_item_id: ItemId,
    /// The todo created inside the target child period itself.
    pub propagated_item_id: ItemId,
}

impl Planner {
    /// Break `source_id` down into the child period `target`.
    ///
    /// Builds the chain `source → slot item → propagated todo`:
    ///
    /// - the slot item is a split copy of the source (label optionally
    ///   extended with `sub_content`) listed in `period_id`'s slot for
    ///   `target`;
    /// - the propagated todo copies the slot item and is listed in
    ///   `target`'s own todos.
    ///
    /// A quota routine source spends one unit of quota (floored at zero;
    /// it stays listed). All three items keep the source's provenance.
    ///
    /// No-op when `target` is not a child of `period_id` or the source does
    /// not exist.
    #[instrument(skip(self))]
    pub fn assign_to_slot(
        &mut self,
        period_id: &PeriodId,
        source_id: &ItemId,
        target: &PeriodId,
        sub_content: Option<&str>,
    ) -> Option<Assignment> {
        if !self.navigator.children_of(period_id).contains(target) {
            tracing::warn!("target is not a child of the period");
            return None;
        }
        let source = Arc::clone(self.items.get(source_id)?);

        let slot_id = self.fresh_id(&[])?;
        let propagated_id = self.fresh_id(std::slice::from_ref(&slot_id))?;

        let mut slot_item = source.split_copy(slot_id.clone(), sub_content);
        let propagated = slot_item.split_copy(propagated_id.clone(), None);
        slot_item.child_ids.push(propagated_id.clone());

        self.items.update(source_id, |src| {
            src.child_ids.push(slot_id.clone());
            src.consume_quota();
        });
        let slot_item = self.items.put(slot_item);
        let propagated = self.items.put(propagated);

        self.periods.modify(period_id, |period| {
            if let Some(list) = period.list_mut(&Placement::Slot(target.clone())) {
                list.push(slot_item);
            }
        });
        self.periods
            .modify(target, |child| child.todos.push(propagated));

        let stats = self.sync(&HashSet::from([source_id.clone()]));
        tracing::debug!(
            slot = %slot_id,
            propagated = %propagated_id,
            periods_resynced = stats.periods_changed,
            "assigned item to child slot"
        );
        Some(Assignment {
            slot_item_id: slot_id,
            propagated_item_id: propagated_id,
        })
    }

    /// Move `item_id` from one container of `period_id` to another.
    ///
    /// When both containers are child slots, the item's propagated todos
    /// move from the old child period's todos to the new child's todos;
    /// their provenance is unchanged. Returns `false` (and changes nothing)
    /// when the item is not in `from`, when `from == to`, or when `to` is not
    /// available in this period.
    #[instrument(skip(self))]
    pub fn move_between_slots(
        &mut self,
        period_id: &PeriodId,
        item_id: &ItemId,
        from: &Placement,
        to: &Placement,
    ) -> bool {
        if from == to || !self.placement_allowed(period_id, to) {
            return false;
        }
        let Some(period) = self.periods.get(period_id) else {
            return false;
        };
        let Some(moving) = period
            .list(from)
            .and_then(|list| list.iter().find(|it| &it.id == item_id))
            .map(Arc::clone)
        else {
            return false;
        };

        self.periods.modify(period_id, |period| {
            if let Some(list) = period.list_mut(from) {
                list.retain(|it| &it.id != item_id);
            }
            if let Some(list) = period.list_mut(to) {
                list.push(Arc::clone(&moving));
            }
        });

        if let (Placement::Slot(old_child), Placement::Slot(new_child)) = (from, to) {
            let moved = self.move_propagated(&moving.child_ids, old_child, new_child);
            tracing::debug!(moved, from = %old_child, to = %new_child, "moved propagated todos");
        }
        true
    }

    /// Move the listed ids from `old_child`'s todos to `new_child`'s todos.
    fn move_propagated(&mut self, ids: &[ItemId], old_child: &PeriodId, new_child: &PeriodId) -> usize {
        let Some(old) = self.periods.get(old_child) else {
            return 0;
        };
        let moving: Vec<_> = old
            .todos
            .iter()
            .filter(|it| ids.contains(&it.id))
            .map(Arc::clone)
            .collect();
        if moving.is_empty() {
            return 0;
        }

        self.periods
            .modify(old_child, |old| old.todos.retain(|it| !ids.contains(&it.id)));
        let count = moving.len();
        self.periods
            .modify(new_child, |new| new.todos.extend(moving));
        count
    }
}
