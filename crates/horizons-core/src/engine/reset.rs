use std::collections::HashSet;

use tracing::instrument;

use crate::engine::Planner;
use crate::model::ItemId;
use crate::period::PeriodId;
use crate::routine;

impl Planner {
    /// Refill every quota routine listed in `period_id` whose reset bucket
    /// differs from the one it last refilled under.
    ///
    /// The bucket is computed for the period being viewed (see
    /// [`routine::reset_key`]). Refilled routines get `current_count =
    /// target_count` and the new key, and every period holding them is
    /// resynced. Returns the refilled ids; empty when the period has never
    /// been referenced.
    #[instrument(skip(self))]
    pub fn reset_routines_for_period(&mut self, period_id: &PeriodId) -> Vec<ItemId> {
        let Some(period) = self.periods.get(period_id) else {
            return Vec::new();
        };
        let listed = period.item_ids();

        let mut seen: HashSet<ItemId> = HashSet::new();
        let mut refilled = Vec::new();
        for id in listed {
            if !seen.insert(id.clone()) {
                continue;
            }
            let Some(item) = self.items.get(&id) else {
                continue;
            };
            let Some(key) = routine::pending_reset(&self.navigator, period_id, item) else {
                continue;
            };
            tracing::debug!(item = %id, bucket = %key, "refilling routine quota");
            self.items.update(&id, |it| it.refill_quota(key));
            refilled.push(id);
        }

        if !refilled.is_empty() {
            let touched: HashSet<ItemId> = refilled.iter().cloned().collect();
            self.sync(&touched);
        }
        refilled
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::engine::tests::{pid, planner};
    use crate::model::{NewItem, Placement};

    #[test]
    fn stale_bucket_refills_quota() {
        let mut planner = planner();
        let week = pid("w-2026-03-02");
        let id = planner
            .add_item(&week, NewItem::routine("Gym", Some(3)), Placement::Routines)
            .expect("routine");
        planner.assign_to_slot(&week, &id, &pid("d-2026-03-02"), None);
        planner.assign_to_slot(&week, &id, &pid("d-2026-03-03"), None);
        assert_eq!(planner.item(&id).expect("routine").current_count, Some(1));

        // As if the snapshot was last saved the week before.
        planner
            .items
            .update(&id, |it| it.last_reset_date = Some("2026-W09".to_string()));

        assert_eq!(planner.reset_routines_for_period(&week), vec![id.clone()]);
        let routine = planner.item(&id).expect("routine");
        assert_eq!(routine.current_count, Some(3));
        assert_eq!(routine.last_reset_date.as_deref(), Some("2026-W10"));
        let view = planner.get_period(&week).expect("week");
        assert!(Arc::ptr_eq(&view.routines[0], routine));

        assert!(
            planner.reset_routines_for_period(&week).is_empty(),
            "same bucket is not refilled twice"
        );
    }

    #[test]
    fn bucket_follows_the_period_being_viewed() {
        let mut planner = planner();
        let week = pid("w-2026-03-02");
        let id = planner
            .add_item(&week, NewItem::routine("Read", Some(2)), Placement::Routines)
            .expect("routine");
        planner.assign_to_slot(&week, &id, &pid("d-2026-03-04"), None);

        // Listed in a day of the following week.
        let day = pid("d-2026-03-10");
        let canonical = Arc::clone(planner.item(&id).expect("routine"));
        planner
            .periods
            .modify(&day, |period| period.routines.push(canonical));

        assert_eq!(planner.reset_routines_for_period(&day), vec![id.clone()]);
        let routine = planner.item(&id).expect("routine");
        assert_eq!(routine.current_count, Some(2));
        assert_eq!(routine.last_reset_date.as_deref(), Some("2026-W11"));
    }

    #[test]
    fn enter_period_respects_auto_reset() {
        let mut planner = planner();
        let week = pid("w-2026-03-02");
        let id = planner
            .add_item(&week, NewItem::routine("Swim", Some(1)), Placement::Routines)
            .expect("routine");
        planner.assign_to_slot(&week, &id, &pid("d-2026-03-05"), None);
        planner
            .items
            .update(&id, |it| it.last_reset_date = Some("stale".to_string()));

        planner.config.routines.auto_reset = false;
        planner.enter_period(&week);
        assert_eq!(planner.item(&id).expect("routine").current_count, Some(0));

        planner.config.routines.auto_reset = true;
        let view = planner.enter_period(&week);
        assert_eq!(view.routines[0].current_count, Some(1));
    }

    #[test]
    fn todos_and_unknown_periods_are_ignored() {
        let mut planner = planner();
        let day = pid("d-2026-03-31");
        planner
            .add_item(&day, NewItem::todo("Laundry"), Placement::Todos)
            .expect("todo");
        planner
            .add_item(&day, NewItem::routine("Stretch", None), Placement::Routines)
            .expect("plain routine");

        assert!(planner.reset_routines_for_period(&day).is_empty());
        assert!(planner.reset_routines_for_period(&pid("d-2027-01-01")).is_empty());
        assert!(planner.get_period(&pid("d-2027-01-01")).is_none());
    }
}
