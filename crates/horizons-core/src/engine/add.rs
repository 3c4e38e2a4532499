use std::collections::HashSet;
use std::sync::Arc;

use tracing::instrument;

use crate::engine::Planner;
use crate::model::{Item, ItemId, ItemKind, NewItem, Placement};
use crate::period::PeriodId;
use crate::routine;

impl Planner {
    /// Create a root item in one container of `period_id`.
    ///
    /// The item's provenance is the period it was created in. Quota
    /// routines start full, stamped with the current reset bucket.
    ///
    /// No-op (`None`) when the content is blank, when a child slot does not
    /// name a child of the period, or when a time slot is requested on a
    /// period that is not a day.
    #[instrument(skip(self, new), fields(content = %new.content))]
    pub fn add_item(
        &mut self,
        period_id: &PeriodId,
        new: NewItem,
        placement: Placement,
    ) -> Option<ItemId> {
        let content = new.content.trim();
        if content.is_empty() {
            tracing::debug!("ignoring item with blank content");
            return None;
        }
        if !self.placement_allowed(period_id, &placement) {
            tracing::warn!(%placement, "placement not available in this period");
            return None;
        }

        let id = self.fresh_id(&[])?;
        let target_count = match new.kind {
            ItemKind::Routine => new.target_count,
            ItemKind::Todo => None,
        };
        let mut item = Item {
            id: id.clone(),
            content: content.to_string(),
            source_level: Some(period_id.level()),
            source_type: new.kind,
            origin_period_id: Some(period_id.clone()),
            target_count,
            current_count: target_count,
            note: new.note,
            color: new.color,
            category: new.category,
            ..Item::default()
        };
        if let Some(key) = routine::reset_key(&self.navigator, period_id, &item) {
            item.last_reset_date = Some(key);
        }

        let stored = self.items.put(item);
        self.periods.modify(period_id, |period| {
            if let Some(list) = period.list_mut(&placement) {
                list.push(stored);
            }
        });
        tracing::debug!(item = %id, "added item");
        Some(id)
    }

    /// Split `parent_id` into a new child item labelled
    /// `"<parent content>: <content>"`.
    ///
    /// The child is listed right after the parent in whichever container of
    /// `period_id` holds the parent, or in the period's todos when the
    /// period does not list the parent. The child starts open and the
    /// parent's completion flag is not recomputed.
    #[instrument(skip(self))]
    pub fn add_sub_item(
        &mut self,
        period_id: &PeriodId,
        parent_id: &ItemId,
        content: &str,
    ) -> Option<ItemId> {
        if content.trim().is_empty() {
            return None;
        }
        let parent = Arc::clone(self.items.get(parent_id)?);
        let id = self.fresh_id(&[])?;

        let mut child = parent.split_copy(id.clone(), Some(content));
        child.is_completed = false;
        let child = self.items.put(child);
        self.items.update(parent_id, |p| p.child_ids.push(id.clone()));

        self.periods.modify(period_id, |period| {
            let placement = period.placement_of(parent_id).unwrap_or(Placement::Todos);
            if let Some(list) = period.list_mut(&placement) {
                let at = list
                    .iter()
                    .position(|it| &it.id == parent_id)
                    .map_or(list.len(), |pos| pos + 1);
                list.insert(at, child);
            }
        });

        self.sync(&HashSet::from([parent_id.clone()]));
        tracing::debug!(item = %id, parent = %parent_id, "added sub-item");
        Some(id)
    }

    /// Child slots must name a child of the period; time slots need a day.
    pub(crate) fn placement_allowed(&self, period_id: &PeriodId, placement: &Placement) -> bool {
        match placement {
            Placement::Todos | Placement::Routines => true,
            Placement::Slot(child) => self.navigator.children_of(period_id).contains(child),
            Placement::Time(_) => period_id.level() == crate::period::Level::Day,
        }
    }
}
