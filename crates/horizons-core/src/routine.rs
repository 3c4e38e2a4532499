//! Reset bucket keys for quota routines.
//!
//! A quota routine refills once per calendar bucket of its source level.
//! The bucket is identified by an opaque key string; a routine needs a
//! reset when the key of the period it is viewed in differs from the key it
//! last refilled under.
//!
//! | level       | key example  |
//! |-------------|--------------|
//! | day         | `2026-03-31` |
//! | week        | `2026-W14`   |
//! | month       | `2026-03`    |
//! | quarter     | `2026-Q1`    |
//! | year        | `2026`       |
//! | five-year   | `5y-2`       |
//! | thirty-year | `30y`        |
//!
//! Week keys are ISO weeks of the period's first day, so a week period and
//! each of its days (including days leaking in from a neighbouring month)
//! share one bucket.

use chrono::Datelike;

use crate::calendar;
use crate::model::Item;
use crate::period::{Level, Navigator, PeriodId, PeriodKey};

/// Bucket key of `level` for the period `key`.
///
/// `None` when `key` is coarser than `level` (a year does not pin down a
/// single week) or when the period has no calendar dates.
#[must_use]
pub fn bucket_key(nav: &Navigator, key: PeriodKey, level: Level) -> Option<String> {
    if level.is_finer_than(key.level()) {
        return None;
    }
    if level == Level::ThirtyYear {
        return Some(Level::ThirtyYear.prefix().to_string());
    }
    if let (Level::FiveYear, PeriodKey::FiveYear { index }) = (level, key) {
        return Some(format!("5y-{index}"));
    }

    let (first, _) = nav.date_range(key)?;
    // Weeks belong to the month they were generated for, even when their
    // Monday falls in the previous month.
    let (year, month) = match key {
        PeriodKey::Week { year, month, .. } => (year, month),
        _ => (first.year(), first.month()),
    };

    let out = match level {
        Level::Day => first.format("%Y-%m-%d").to_string(),
        Level::Week => calendar::iso_week(first).to_string(),
        Level::Month => format!("{year:04}-{month:02}"),
        Level::Quarter => format!("{year:04}-Q{}", calendar::quarter_of_month(month)),
        Level::Year => format!("{year:04}"),
        Level::FiveYear => format!("5y-{}", nav.bucket_of_year(year)),
        Level::ThirtyYear => Level::ThirtyYear.prefix().to_string(),
    };
    Some(out)
}

/// Reset key for `item` while it is shown in `containing`.
///
/// The containing period is used when it is at least as fine as the item's
/// source level; otherwise the item's origin period is used. Returns `None`
/// for items that are not quota routines or carry no source level.
#[must_use]
pub fn reset_key(nav: &Navigator, containing: &PeriodId, item: &Item) -> Option<String> {
    if !item.is_quota_routine() {
        return None;
    }
    let level = item.source_level?;
    bucket_key(nav, containing.key(), level).or_else(|| {
        let origin = item.origin_period_id.as_ref()?;
        bucket_key(nav, origin.key(), level)
    })
}

/// The new key when `item` should refill in `containing`, `None` otherwise.
#[must_use]
pub fn pending_reset(nav: &Navigator, containing: &PeriodId, item: &Item) -> Option<String> {
    let key = reset_key(nav, containing, item)?;
    (item.last_reset_date.as_deref() != Some(key.as_str())).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemId, ItemKind};

    fn nav() -> Navigator {
        Navigator::new(2026)
    }

    fn key(raw: &str) -> PeriodKey {
        raw.parse().expect("valid period id")
    }

    fn pid(raw: &str) -> PeriodId {
        raw.parse().expect("valid period id")
    }

    fn weekly_routine(origin: &str, last: Option<&str>) -> Item {
        Item {
            id: ItemId::new("r"),
            content: "Gym".to_string(),
            source_type: ItemKind::Routine,
            source_level: Some(Level::Week),
            origin_period_id: Some(pid(origin)),
            target_count: Some(3),
            current_count: Some(0),
            last_reset_date: last.map(str::to_string),
            ..Item::default()
        }
    }

    #[test]
    fn keys_per_level_from_a_day() {
        let day = key("d-2026-03-31");
        let expect = [
            (Level::Day, "2026-03-31"),
            (Level::Week, "2026-W14"),
            (Level::Month, "2026-03"),
            (Level::Quarter, "2026-Q1"),
            (Level::Year, "2026"),
            (Level::FiveYear, "5y-0"),
            (Level::ThirtyYear, "30y"),
        ];
        for (level, want) in expect {
            assert_eq!(bucket_key(&nav(), day, level).as_deref(), Some(want), "{level}");
        }
    }

    #[test]
    fn coarser_period_has_no_key_for_finer_level() {
        assert_eq!(bucket_key(&nav(), key("m-2026-03"), Level::Week), None);
        assert_eq!(bucket_key(&nav(), PeriodKey::ThirtyYear, Level::FiveYear), None);
    }

    #[test]
    fn week_and_its_foreign_days_share_a_bucket() {
        // Week 1 of May 2026 starts Monday 27 April.
        let week = key("w-2026-05-01");
        let foreign_day = key("d-2026-04-29");
        assert_eq!(
            bucket_key(&nav(), week, Level::Week),
            bucket_key(&nav(), foreign_day, Level::Week)
        );
        assert_eq!(bucket_key(&nav(), week, Level::Month).as_deref(), Some("2026-05"));
    }

    #[test]
    fn five_year_key_uses_bucket_index() {
        assert_eq!(
            bucket_key(&nav(), key("5y-3"), Level::FiveYear).as_deref(),
            Some("5y-3")
        );
        assert_eq!(
            bucket_key(&nav(), key("y-2037"), Level::FiveYear).as_deref(),
            Some("5y-2")
        );
    }

    #[test]
    fn reset_key_falls_back_to_origin_when_container_is_coarser() {
        let item = weekly_routine("w-2026-03-05", None);
        assert_eq!(
            reset_key(&nav(), &pid("m-2026-03"), &item).as_deref(),
            Some("2026-W13")
        );
        assert_eq!(
            reset_key(&nav(), &pid("d-2026-04-08"), &item).as_deref(),
            Some("2026-W15")
        );
    }

    #[test]
    fn pending_reset_only_when_key_changes() {
        let fresh = weekly_routine("w-2026-03-05", Some("2026-W14"));
        assert_eq!(pending_reset(&nav(), &pid("d-2026-03-31"), &fresh), None);
        assert_eq!(
            pending_reset(&nav(), &pid("d-2026-04-06"), &fresh).as_deref(),
            Some("2026-W15")
        );
    }

    #[test]
    fn plain_todos_never_reset() {
        let todo = Item {
            source_level: Some(Level::Day),
            ..Item::default()
        };
        assert_eq!(reset_key(&nav(), &pid("d-2026-03-31"), &todo), None);
    }
}
