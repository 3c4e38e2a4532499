//! The resynchronization routine: the only place cached item copies inside
//! periods are patched.
//!
//! [`resync_periods`] visits every list of every period (todos, routines,
//! child slots, time slots) and asks a per-item transform what to do with
//! each cached copy. A list is rebuilt only when at least one element is
//! actually replaced by a *different* `Arc` or dropped; a period is
//! copied-on-write only when at least one of its lists was rebuilt.
//! Everything else keeps its identity.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::model::{Item, ItemId, ItemList, Period};
use crate::store::{ItemStore, PeriodStore};

/// What to do with one cached copy.
#[derive(Debug, Clone)]
pub enum Patch {
    Keep,
    Replace(Arc<Item>),
    Drop,
}

/// Counters describing what a resync pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResyncStats {
    pub periods_changed: usize,
    pub copies_replaced: usize,
    pub copies_dropped: usize,
}

impl ResyncStats {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.periods_changed == 0
    }
}

/// Apply `transform` to every cached copy in every period.
pub fn resync_periods(
    periods: &mut PeriodStore,
    mut transform: impl FnMut(&Arc<Item>) -> Patch,
) -> ResyncStats {
    let mut stats = ResyncStats::default();

    for slot in periods.values_mut() {
        let patched = patch_period(slot, &mut transform, &mut stats);
        if let Some(rebuilt) = patched {
            let period = Arc::make_mut(slot);
            rebuilt.apply(period);
            stats.periods_changed += 1;
        }
    }

    stats
}

/// Rewrite every cached copy of `touched` ids from the canonical store.
///
/// Ids that are no longer canonical are dropped from every period.
pub fn resync_from_canonical(
    periods: &mut PeriodStore,
    items: &ItemStore,
    touched: &HashSet<ItemId>,
) -> ResyncStats {
    if touched.is_empty() {
        return ResyncStats::default();
    }
    let stats = resync_periods(periods, |cached| {
        if !touched.contains(&cached.id) {
            return Patch::Keep;
        }
        items
            .get(&cached.id)
            .map_or(Patch::Drop, |canonical| Patch::Replace(Arc::clone(canonical)))
    });
    tracing::debug!(
        touched = touched.len(),
        periods = stats.periods_changed,
        replaced = stats.copies_replaced,
        dropped = stats.copies_dropped,
        "resynced period caches"
    );
    stats
}

/// Point every cached copy at the canonical `Arc` with the same id.
///
/// Used after loading a snapshot, where periods and the canonical store were
/// deserialized independently. Orphaned copies are kept as-is.
pub fn relink_all(periods: &mut PeriodStore, items: &ItemStore) -> ResyncStats {
    resync_periods(periods, |cached| {
        items
            .get(&cached.id)
            .map_or(Patch::Keep, |canonical| Patch::Replace(Arc::clone(canonical)))
    })
}

/// Rebuilt lists for one period; `None` entries were left untouched.
struct RebuiltPeriod {
    todos: Option<ItemList>,
    routines: Option<ItemList>,
    slots: Vec<(crate::period::PeriodId, ItemList)>,
    time_slots: Vec<(crate::model::TimeSlot, ItemList)>,
}

impl RebuiltPeriod {
    fn apply(self, period: &mut Period) {
        if let Some(todos) = self.todos {
            period.todos = todos;
        }
        if let Some(routines) = self.routines {
            period.routines = routines;
        }
        for (child, list) in self.slots {
            period.slots.insert(child, list);
        }
        if let Some(time_slots) = period.time_slots.as_mut() {
            for (slot, list) in self.time_slots {
                time_slots.insert(slot, list);
            }
        }
    }
}

fn patch_period(
    period: &Period,
    transform: &mut impl FnMut(&Arc<Item>) -> Patch,
    stats: &mut ResyncStats,
) -> Option<RebuiltPeriod> {
    let todos = patch_list(&period.todos, transform, stats);
    let routines = patch_list(&period.routines, transform, stats);
    let slots = patch_map(&period.slots, transform, stats);
    let time_slots = period
        .time_slots
        .as_ref()
        .map(|map| patch_map(map, transform, stats))
        .unwrap_or_default();

    if todos.is_none() && routines.is_none() && slots.is_empty() && time_slots.is_empty() {
        return None;
    }
    Some(RebuiltPeriod {
        todos,
        routines,
        slots,
        time_slots,
    })
}

fn patch_map<K: Clone + Ord>(
    map: &BTreeMap<K, ItemList>,
    transform: &mut impl FnMut(&Arc<Item>) -> Patch,
    stats: &mut ResyncStats,
) -> Vec<(K, ItemList)> {
    map.iter()
        .filter_map(|(key, list)| {
            patch_list(list, transform, stats).map(|rebuilt| (key.clone(), rebuilt))
        })
        .collect()
}

/// Returns a rebuilt list, or `None` when every element kept its identity.
fn patch_list(
    list: &[Arc<Item>],
    transform: &mut impl FnMut(&Arc<Item>) -> Patch,
    stats: &mut ResyncStats,
) -> Option<ItemList> {
    let mut rebuilt: Option<ItemList> = None;

    for (index, cached) in list.iter().enumerate() {
        match transform(cached) {
            Patch::Replace(next) if !Arc::ptr_eq(&next, cached) => {
                stats.copies_replaced += 1;
                rebuilt
                    .get_or_insert_with(|| list[..index].to_vec())
                    .push(next);
            }
            Patch::Drop => {
                stats.copies_dropped += 1;
                rebuilt.get_or_insert_with(|| list[..index].to_vec());
            }
            Patch::Keep | Patch::Replace(_) => {
                if let Some(out) = rebuilt.as_mut() {
                    out.push(Arc::clone(cached));
                }
            }
        }
    }

    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Placement, TimeSlot};
    use crate::period::PeriodId;

    fn pid(raw: &str) -> PeriodId {
        raw.parse().expect("valid period id")
    }

    fn seed() -> (ItemStore, PeriodStore) {
        let mut items = ItemStore::new();
        let a = items.put(Item {
            id: ItemId::new("a"),
            content: "A".to_string(),
            ..Item::default()
        });
        let b = items.put(Item {
            id: ItemId::new("b"),
            content: "B".to_string(),
            ..Item::default()
        });

        let mut periods = PeriodStore::new();
        periods.modify(&pid("m-2026-03"), |p| {
            p.todos.push(Arc::clone(&a));
            p.todos.push(Arc::clone(&b));
            p.slots
                .entry(pid("w-2026-03-02"))
                .or_default()
                .push(Arc::clone(&a));
        });
        periods.modify(&pid("d-2026-03-31"), |p| {
            p.list_mut(&Placement::Time(TimeSlot::Evening))
                .expect("day")
                .push(Arc::clone(&b));
        });
        (items, periods)
    }

    #[test]
    fn unrelated_items_and_periods_keep_identity() {
        let (mut items, mut periods) = seed();
        let month_before = Arc::clone(periods.get(&pid("m-2026-03")).expect("month"));
        let day_before = Arc::clone(periods.get(&pid("d-2026-03-31")).expect("day"));
        let b_before = Arc::clone(&month_before.todos[1]);

        items.update(&ItemId::new("a"), |it| it.is_completed = true);
        let touched = HashSet::from([ItemId::new("a")]);
        let stats = resync_from_canonical(&mut periods, &items, &touched);

        assert_eq!(stats.periods_changed, 1);
        assert_eq!(stats.copies_replaced, 2);

        let month_after = periods.get(&pid("m-2026-03")).expect("month");
        assert!(!Arc::ptr_eq(&month_before, month_after));
        assert!(month_after.todos[0].is_completed);
        assert!(month_after.slots[&pid("w-2026-03-02")][0].is_completed);
        assert!(Arc::ptr_eq(&b_before, &month_after.todos[1]));

        let day_after = periods.get(&pid("d-2026-03-31")).expect("day");
        assert!(Arc::ptr_eq(&day_before, day_after));
    }

    #[test]
    fn removed_canonical_items_are_dropped_everywhere() {
        let (mut items, mut periods) = seed();
        items.remove(&ItemId::new("b"));
        let touched = HashSet::from([ItemId::new("b")]);
        let stats = resync_from_canonical(&mut periods, &items, &touched);

        assert_eq!(stats.copies_dropped, 2);
        assert_eq!(stats.periods_changed, 2);
        for (_, period) in periods.iter() {
            assert!(!period.contains(&ItemId::new("b")));
        }
    }

    #[test]
    fn unchanged_canonical_value_is_a_noop() {
        let (items, mut periods) = seed();
        let touched = HashSet::from([ItemId::new("a"), ItemId::new("b")]);
        let stats = resync_from_canonical(&mut periods, &items, &touched);
        assert!(stats.is_noop());
    }

    #[test]
    fn relink_points_copies_at_canonical_arcs() {
        let (items, mut periods) = seed();
        // Simulate independent deserialization of a period.
        periods.modify(&pid("m-2026-03"), |p| {
            p.todos = p.todos.iter().map(|it| Arc::new(Item::clone(it))).collect();
        });

        let stats = relink_all(&mut periods, &items);
        assert_eq!(stats.copies_replaced, 2);
        let month = periods.get(&pid("m-2026-03")).expect("month");
        let canonical = items.get(&ItemId::new("a")).expect("a");
        assert!(Arc::ptr_eq(&month.todos[0], canonical));
    }
}
