//! The canonical item store and the period store.
//!
//! [`ItemStore`] is the single source of truth for every mutable item field.
//! [`PeriodStore`] holds read-optimized projections: each period caches
//! `Arc<Item>` copies in its lists. Cached copies are only ever patched by
//! [`resync`], never edited in place.
//!
//! Both stores hand out `Arc`s. A write replaces the `Arc` rather than
//! mutating through it, so a caller that kept an old `Arc<Item>` or
//! `Arc<Period>` can compare identities with [`Arc::ptr_eq`] to tell whether
//! anything it displays changed.

pub mod resync;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::{Item, ItemId, Period};
use crate::period::PeriodId;

/// Flat map from item id to the authoritative item value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStore {
    items: BTreeMap<ItemId, Arc<Item>>,
}

impl ItemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Arc<Item>> {
        self.items.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &Arc<Item>)> {
        self.items.iter()
    }

    /// Store `item`, replacing any previous value with the same id.
    pub fn put(&mut self, item: Item) -> Arc<Item> {
        let item = Arc::new(item);
        self.items.insert(item.id.clone(), Arc::clone(&item));
        item
    }

    /// Apply `edit` to a copy of the item and store the result.
    ///
    /// When the edit leaves every field unchanged the existing `Arc` is kept,
    /// so unaffected items preserve their identity. Returns `None` if the id
    /// is unknown.
    pub fn update(&mut self, id: &ItemId, edit: impl FnOnce(&mut Item)) -> Option<Arc<Item>> {
        let current = self.items.get(id)?;
        let mut next = Item::clone(current);
        edit(&mut next);
        if next == **current {
            return Some(Arc::clone(current));
        }
        Some(self.put(next))
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<Arc<Item>> {
        self.items.remove(id)
    }
}

impl FromIterator<Item> for ItemStore {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self {
            items: iter
                .into_iter()
                .map(|item| (item.id.clone(), Arc::new(item)))
                .collect(),
        }
    }
}

/// Flat map from period id to the period's cached view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodStore {
    periods: BTreeMap<PeriodId, Arc<Period>>,
}

impl PeriodStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a period without creating it.
    #[must_use]
    pub fn get(&self, id: &PeriodId) -> Option<&Arc<Period>> {
        self.periods.get(id)
    }

    /// Read-through-create: returns the period, creating an empty one first
    /// if it has never been referenced.
    pub fn get_or_create(&mut self, id: &PeriodId) -> Arc<Period> {
        Arc::clone(self.entry(id))
    }

    /// Mutate a period in place, creating it first if needed.
    ///
    /// Copy-on-write: if a caller still holds the old `Arc<Period>`, that
    /// snapshot is left untouched.
    pub fn modify<R>(&mut self, id: &PeriodId, edit: impl FnOnce(&mut Period) -> R) -> R {
        edit(Arc::make_mut(self.entry(id)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PeriodId, &Arc<Period>)> {
        self.periods.iter()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Arc<Period>> {
        self.periods.values_mut()
    }

    /// Ids of every period whose lists hold a copy of `item`.
    #[must_use]
    pub fn holding(&self, item: &ItemId) -> Vec<PeriodId> {
        self.periods
            .iter()
            .filter(|(_, period)| period.contains(item))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn entry(&mut self, id: &PeriodId) -> &mut Arc<Period> {
        self.periods.entry(id.clone()).or_insert_with(|| {
            tracing::debug!(period = %id, "creating period on first reference");
            Arc::new(Period::new(id.clone()))
        })
    }
}

impl FromIterator<Period> for PeriodStore {
    fn from_iter<T: IntoIterator<Item = Period>>(iter: T) -> Self {
        Self {
            periods: iter
                .into_iter()
                .map(|period| (period.id.clone(), Arc::new(period)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, content: &str) -> Item {
        Item {
            id: ItemId::new(id),
            content: content.to_string(),
            ..Item::default()
        }
    }

    fn pid(raw: &str) -> PeriodId {
        raw.parse().expect("valid period id")
    }

    #[test]
    fn update_replaces_arc_only_on_change() {
        let mut store = ItemStore::new();
        let original = store.put(item("a", "Read"));

        let same = store
            .update(&ItemId::new("a"), |it| it.content = "Read".to_string())
            .expect("exists");
        assert!(Arc::ptr_eq(&original, &same));

        let changed = store
            .update(&ItemId::new("a"), |it| it.content = "Write".to_string())
            .expect("exists");
        assert!(!Arc::ptr_eq(&original, &changed));
        assert_eq!(original.content, "Read", "old snapshot is untouched");
        assert_eq!(store.get(&ItemId::new("a")).map(|i| i.content.as_str()), Some("Write"));
    }

    #[test]
    fn update_unknown_id_is_none() {
        let mut store = ItemStore::new();
        assert!(store.update(&ItemId::new("ghost"), |_| {}).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn get_or_create_is_lazy_and_stable() {
        let mut periods = PeriodStore::new();
        let id = pid("m-2026-03");
        assert!(periods.get(&id).is_none());

        let first = periods.get_or_create(&id);
        let second = periods.get_or_create(&id);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(periods.len(), 1);
    }

    #[test]
    fn modify_is_copy_on_write() {
        let mut periods = PeriodStore::new();
        let id = pid("y-2026");
        let before = periods.get_or_create(&id);

        periods.modify(&id, |p| p.goal = "Ship".to_string());

        assert_eq!(before.goal, "");
        assert_eq!(periods.get(&id).map(|p| p.goal.as_str()), Some("Ship"));
    }

    #[test]
    fn holding_lists_periods_with_copies() {
        let mut items = ItemStore::new();
        let a = items.put(item("a", "Read"));
        let mut periods = PeriodStore::new();
        periods.modify(&pid("y-2026"), |p| p.todos.push(Arc::clone(&a)));
        periods.get_or_create(&pid("y-2027"));

        assert_eq!(periods.holding(&ItemId::new("a")), vec![pid("y-2026")]);
    }
}
