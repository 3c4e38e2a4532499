#![no_main]

use horizons_core::{Direction, Navigator, PeriodKey};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let nav = Navigator::new(2020);

    // Lenient parsing never panics, whatever the input.
    let _ = PeriodKey::parse_lenient(raw);

    let Ok(key) = raw.parse::<PeriodKey>() else {
        return;
    };
    let encoded = key.encode();
    assert_eq!(encoded.as_str().parse::<PeriodKey>().ok(), Some(key));

    for child in nav.children(key) {
        assert_eq!(child.level(), key.level().child().unwrap_or(key.level()));
    }
    let _ = nav.parent(key);
    let _ = nav.adjacent(key, Direction::Next);
    let _ = nav.adjacent(key, Direction::Previous);
    let _ = nav.date_range(key);
});
