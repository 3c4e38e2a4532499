//! The planner: mutation and query API over the two stores.
//!
//! Every mutation follows the same order:
//!
//! 1. write the authoritative values into the canonical [`ItemStore`];
//! 2. insert brand-new copies into the periods that should list them;
//! 3. run [`resync_from_canonical`] over the ids whose values changed, so
//!    every cached copy in every period matches the canonical value.
//!
//! Missing items or periods make an operation a no-op: the method returns
//! `None`, `false`, or an empty list and leaves all state untouched.
//!
//! ## Submodules
//!
//! - [`add`]: new root items and sub-items.
//! - [`assign`]: splitting an item into a child period's slot, and moving
//!   items between a period's containers.
//! - [`complete`]: completion with downward cascade and upward recompute.
//! - [`delete`]: subtree deletion.
//! - [`edit`]: item field edits and period header edits.
//! - [`reset`]: quota refills on period entry.

pub mod add;
pub mod assign;
pub mod complete;
pub mod delete;
pub mod edit;
pub mod reset;

pub use assign::Assignment;
pub use complete::CompletionChange;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::graph;
use crate::ids::{IdGenerator, RandomIds};
use crate::model::{Item, ItemId, MemoRecord, Period};
use crate::period::{Direction, Navigator, PeriodId};
use crate::snapshot::Snapshot;
use crate::store::resync::{ResyncStats, relink_all, resync_from_canonical};
use crate::store::{ItemStore, PeriodStore};

/// Attempts at drawing an unused id before an operation gives up.
const MAX_ID_ATTEMPTS: usize = 64;

#[derive(Debug)]
pub struct Planner {
    items: ItemStore,
    periods: PeriodStore,
    navigator: Navigator,
    config: PlannerConfig,
    ids: Box<dyn IdGenerator>,
    records: BTreeMap<String, serde_json::Value>,
    annual_events: Vec<serde_json::Value>,
}

impl Planner {
    /// An empty planner with random item ids.
    #[must_use]
    pub fn new(config: PlannerConfig) -> Self {
        Self::with_id_generator(config, Box::new(RandomIds))
    }

    #[must_use]
    pub fn with_id_generator(config: PlannerConfig, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            items: ItemStore::new(),
            periods: PeriodStore::new(),
            navigator: Navigator::new(config.calendar.base_year),
            config,
            ids,
            records: BTreeMap::new(),
            annual_events: Vec::new(),
        }
    }

    /// Rebuild a planner from a persisted snapshot.
    ///
    /// Periods and items were deserialized independently, so every cached
    /// copy is re-pointed at its canonical `Arc` before the planner is
    /// returned.
    #[must_use]
    pub fn restore(config: PlannerConfig, snapshot: Snapshot, ids: Box<dyn IdGenerator>) -> Self {
        let mut planner = Self::with_id_generator(config, ids);
        planner.items = snapshot.items.into_values().collect();
        planner.periods = snapshot.periods.into_values().collect();
        planner.records = snapshot.records;
        planner.annual_events = snapshot.annual_events;

        let stats = relink_all(&mut planner.periods, &planner.items);
        tracing::debug!(
            items = planner.items.len(),
            periods = planner.periods.len(),
            relinked = stats.copies_replaced,
            "restored planner from snapshot"
        );
        planner
    }

    /// Copy the full state out for the persistence collaborator.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            periods: self
                .periods
                .iter()
                .map(|(id, period)| (id.clone(), Period::clone(period)))
                .collect(),
            items: self
                .items
                .iter()
                .map(|(id, item)| (id.clone(), Item::clone(item)))
                .collect(),
            records: self.records.clone(),
            annual_events: self.annual_events.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub const fn items(&self) -> &ItemStore {
        &self.items
    }

    #[must_use]
    pub const fn periods(&self) -> &PeriodStore {
        &self.periods
    }

    #[must_use]
    pub const fn records(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut BTreeMap<String, serde_json::Value> {
        &mut self.records
    }

    #[must_use]
    pub fn annual_events(&self) -> &[serde_json::Value] {
        &self.annual_events
    }

    pub fn annual_events_mut(&mut self) -> &mut Vec<serde_json::Value> {
        &mut self.annual_events
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Read-through-create: the period, created empty on first reference.
    pub fn period(&mut self, id: &PeriodId) -> Arc<Period> {
        self.periods.get_or_create(id)
    }

    /// The period if it has ever been referenced.
    #[must_use]
    pub fn get_period(&self, id: &PeriodId) -> Option<&Arc<Period>> {
        self.periods.get(id)
    }

    /// Read-through-create, then refill quota routines shown in the period
    /// when `[routines] auto_reset` is on.
    pub fn enter_period(&mut self, id: &PeriodId) -> Arc<Period> {
        if self.config.routines.auto_reset {
            self.reset_routines_for_period(id);
        }
        self.period(id)
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Arc<Item>> {
        self.items.get(id)
    }

    /// Progress percentage; see [`graph::progress`].
    #[must_use]
    pub fn progress(&self, id: &ItemId) -> Option<u8> {
        graph::progress(&self.items, id)
    }

    #[must_use]
    pub fn children_of(&self, id: &PeriodId) -> Vec<PeriodId> {
        self.navigator.children_of(id)
    }

    #[must_use]
    pub fn parent_of(&self, id: &PeriodId) -> Option<PeriodId> {
        self.navigator.parent_of(id)
    }

    #[must_use]
    pub fn adjacent_of(&self, id: &PeriodId, direction: Direction) -> Option<PeriodId> {
        self.navigator.adjacent_of(id, direction)
    }

    /// Memos written at any ancestor of `id`, root first.
    ///
    /// Each ancestor contributes its free-text memo (when non-empty) followed
    /// by its appended memo records. Ancestors never referenced contribute
    /// nothing and are not created.
    #[must_use]
    pub fn inherited_memos(&self, id: &PeriodId) -> Vec<MemoRecord> {
        let mut ancestors = self.navigator.ancestors_of(id);
        ancestors.reverse();

        let mut out = Vec::new();
        for ancestor in ancestors {
            let Some(period) = self.periods.get(&ancestor) else {
                continue;
            };
            if !period.memo.trim().is_empty() {
                out.push(MemoRecord {
                    level: period.level,
                    period_id: period.id.clone(),
                    text: period.memo.clone(),
                });
            }
            out.extend(period.memos.iter().cloned());
        }
        out
    }

    // -----------------------------------------------------------------------
    // Internals shared by the mutation submodules
    // -----------------------------------------------------------------------

    /// Draw an id unused by the canonical store and not in `reserved`.
    fn fresh_id(&mut self, reserved: &[ItemId]) -> Option<ItemId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !self.items.contains(&id) && !reserved.contains(&id) {
                return Some(id);
            }
            tracing::debug!(id = %id, "generated id collides, retrying");
        }
        tracing::warn!(attempts = MAX_ID_ATTEMPTS, "id generator kept returning used ids");
        None
    }

    /// Rewrite every cached copy of `touched` from the canonical store.
    fn sync(&mut self, touched: &HashSet<ItemId>) -> ResyncStats {
        resync_from_canonical(&mut self.periods, &self.items, touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::model::{NewItem, Placement};

    pub(super) fn planner() -> Planner {
        let mut config = PlannerConfig::default();
        config.calendar.base_year = 2026;
        Planner::with_id_generator(config, Box::new(SequentialIds::new("t")))
    }

    pub(super) fn pid(raw: &str) -> PeriodId {
        raw.parse().expect("valid period id")
    }

    #[derive(Debug)]
    struct Stuck;

    impl IdGenerator for Stuck {
        fn next_id(&mut self) -> ItemId {
            ItemId::new("same")
        }
    }

    #[test]
    fn period_is_created_on_first_read() {
        let mut planner = planner();
        let id = pid("q-2026-2");
        assert!(planner.get_period(&id).is_none());
        let period = planner.period(&id);
        assert!(period.is_empty());
        assert!(planner.get_period(&id).is_some());
    }

    #[test]
    fn navigation_queries_use_base_year() {
        let planner = planner();
        assert_eq!(planner.children_of(&PeriodId::root()).len(), 6);
        assert_eq!(planner.parent_of(&pid("y-2031")), Some(pid("5y-1")));
        assert_eq!(
            planner.adjacent_of(&pid("q-2026-4"), Direction::Next),
            Some(pid("q-2027-1"))
        );
    }

    #[test]
    fn fresh_id_skips_used_ids_and_gives_up_when_stuck() {
        let mut planner = planner();
        let first = planner
            .add_item(&pid("y-2026"), NewItem::todo("A"), Placement::Todos)
            .expect("added");
        assert_eq!(first.as_str(), "t1");

        let mut stuck =
            Planner::with_id_generator(PlannerConfig::default(), Box::new(Stuck));
        assert!(stuck.fresh_id(&[]).is_some());
        assert!(stuck.fresh_id(&[ItemId::new("same")]).is_none());
    }

    #[test]
    fn inherited_memos_come_from_ancestors_root_first() {
        let mut planner = planner();
        planner.set_memo(&PeriodId::root(), "Stay curious");
        planner.add_memo(&pid("y-2026"), "Year of focus");
        planner.add_memo(&pid("m-2026-03"), "Spring push");
        planner.add_memo(&pid("d-2026-03-31"), "not inherited by itself");

        let memos = planner.inherited_memos(&pid("d-2026-03-31"));
        let texts: Vec<&str> = memos.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["Stay curious", "Year of focus", "Spring push"]);
        assert_eq!(memos[1].period_id, pid("y-2026"));
    }

    #[test]
    fn snapshot_restore_relinks_copies() {
        let mut planner = planner();
        let id = planner
            .add_item(&pid("m-2026-03"), NewItem::todo("Taxes"), Placement::Todos)
            .expect("added");

        let json = serde_json::to_string(&planner.snapshot()).expect("encode");
        let snapshot: Snapshot = serde_json::from_str(&json).expect("decode");
        let restored = Planner::restore(
            planner.config().clone(),
            snapshot,
            Box::new(SequentialIds::new("r")),
        );

        let canonical = restored.item(&id).expect("item restored");
        let period = restored.get_period(&pid("m-2026-03")).expect("period restored");
        assert!(Arc::ptr_eq(canonical, &period.todos[0]));
    }
}
