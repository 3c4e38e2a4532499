//! Codec and navigator properties over arbitrary periods.

use chrono::{Datelike, Duration, Weekday};
use horizons_core::calendar;
use horizons_core::{Direction, Level, Navigator, PeriodId, PeriodKey};
use proptest::prelude::*;

use generators::*;

fn nav() -> Navigator {
    Navigator::new(BASE_YEAR)
}

fn expected_child_count(key: PeriodKey) -> usize {
    match key {
        PeriodKey::ThirtyYear => 6,
        PeriodKey::FiveYear { .. } => 5,
        PeriodKey::Year { .. } => 4,
        PeriodKey::Quarter { .. } => 3,
        PeriodKey::Month { year, month } => calendar::weeks_in_month(year, month).len(),
        PeriodKey::Week { .. } => 7,
        PeriodKey::Day { .. } => 0,
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(2000))]

    #[test]
    fn encode_parse_round_trip(key in arb_period_key()) {
        let id = key.encode();
        let parsed: PeriodKey = id.as_str().parse().expect("encoded ids parse");
        prop_assert_eq!(parsed, key);
        prop_assert_eq!(id.level(), key.level());
    }

    #[test]
    fn children_have_expected_count_and_level(key in arb_period_key()) {
        let nav = nav();
        let children = nav.children(key);
        prop_assert_eq!(children.len(), expected_child_count(key));
        for child in &children {
            prop_assert_eq!(Some(child.level()), key.level().child());
        }
    }

    #[test]
    fn every_child_resolves_back_to_its_parent(key in arb_period_key()) {
        let nav = nav();
        for child in nav.children(key) {
            let parent = nav.parent(child).expect("children have parents");
            if parent == key {
                continue;
            }
            // A day leaking in from a neighbouring month belongs to the
            // week of its own month that covers the same span.
            prop_assert!(matches!(key, PeriodKey::Week { .. }), "{child} -> {parent}, not {key}");
            prop_assert_eq!(
                nav.date_range(parent).map(|r| r.0),
                nav.date_range(key).map(|r| r.0)
            );
        }
    }

    #[test]
    fn next_then_previous_is_identity(key in arb_sibling_key()) {
        let nav = nav();
        let next = nav.adjacent(key, Direction::Next).expect("has next");
        prop_assert_eq!(nav.adjacent(next, Direction::Previous), Some(key));
        let prev = nav.adjacent(key, Direction::Previous);
        if let Some(prev) = prev {
            prop_assert_eq!(nav.adjacent(prev, Direction::Next), Some(key));
        }
    }

    #[test]
    fn weeks_in_month_cover_each_day_once((year, month) in arb_month()) {
        let spans = calendar::weeks_in_month(year, month);
        prop_assert!((4..=6).contains(&spans.len()));

        for (i, span) in spans.iter().enumerate() {
            prop_assert_eq!(span.number as usize, i + 1);
            prop_assert_eq!(span.start.weekday(), Weekday::Mon);
            prop_assert_eq!(span.end - span.start, Duration::days(6));
            if let Some(next) = spans.get(i + 1) {
                prop_assert_eq!(next.start, span.end + Duration::days(1));
            }
        }

        for day in 1..=calendar::days_in_month(year, month) {
            let date = chrono::NaiveDate::from_ymd_opt(year, month, day).expect("valid day");
            let covering = spans.iter().filter(|s| s.contains(date)).count();
            prop_assert_eq!(covering, 1);
        }
    }

    #[test]
    fn containing_day_is_a_descendant(offset in 0..(30 * 365_i64)) {
        let nav = nav();
        let date = chrono::NaiveDate::from_ymd_opt(BASE_YEAR, 1, 1).expect("valid") + Duration::days(offset);
        let mut key = nav.containing(date, Level::Day);
        let mut levels = vec![key.level()];
        while let Some(parent) = nav.parent(key) {
            prop_assert!(nav.children(parent).contains(&key));
            key = parent;
            levels.push(key.level());
        }
        prop_assert_eq!(levels.len(), 7);
    }
}

#[test]
fn lenient_parse_falls_back_to_root() {
    for raw in ["", "x-2026", "m-2026-13", "d-2026-02-30", "w-2026-03-07", "m-2026-3"] {
        assert_eq!(PeriodKey::parse_lenient(raw), PeriodKey::ThirtyYear, "{raw}");
        assert!(raw.parse::<PeriodId>().is_err(), "{raw}");
    }
}

#[test]
fn five_year_buckets_clamp_at_the_horizon_edges() {
    let nav = nav();
    let parent = |year: i32| nav.parent(PeriodKey::Year { year });
    assert_eq!(parent(2019), Some(PeriodKey::FiveYear { index: 0 }));
    assert_eq!(parent(2024), Some(PeriodKey::FiveYear { index: 0 }));
    assert_eq!(parent(2025), Some(PeriodKey::FiveYear { index: 1 }));
    assert_eq!(parent(2080), Some(PeriodKey::FiveYear { index: 5 }));
    assert_eq!(nav.adjacent(PeriodKey::FiveYear { index: 0 }, Direction::Previous), None);
    assert_eq!(nav.adjacent(PeriodKey::FiveYear { index: 5 }, Direction::Next), None);
    assert_eq!(nav.adjacent(PeriodKey::ThirtyYear, Direction::Next), None);
}

#[test]
fn quarter_and_week_rollover() {
    let nav = nav();
    let id = |raw: &str| -> PeriodId { raw.parse().expect("valid") };
    assert_eq!(
        nav.adjacent_of(&id("q-2026-4"), Direction::Next),
        Some(id("q-2027-1"))
    );
    assert_eq!(
        nav.adjacent_of(&id("w-2026-01-01"), Direction::Previous),
        Some(id("w-2025-12-05"))
    );
    assert_eq!(
        nav.adjacent_of(&id("d-2024-02-28"), Direction::Next),
        Some(id("d-2024-02-29"))
    );
}

#[test]
fn full_week_traversal_lands_one_week_later() {
    let nav = nav();
    let week: PeriodId = "w-2026-01-05".parse().expect("valid");
    let month = nav.parent_of(&week).expect("month");
    assert_eq!(month.as_str(), "m-2026-01");
    assert!(nav.children_of(&month).contains(&week));

    let days = nav.children_of(&week);
    assert_eq!(days.len(), 7);
    let start = days[4].clone();
    assert_eq!(start.as_str(), "d-2026-01-30");

    let mut day = start.clone();
    for _ in 0..7 {
        day = nav.adjacent_of(&day, Direction::Next).expect("next day");
    }
    assert_eq!(day.as_str(), "d-2026-02-06");
    let back = (0..7).try_fold(day, |d, _| nav.adjacent_of(&d, Direction::Previous));
    assert_eq!(back, Some(start));
}
