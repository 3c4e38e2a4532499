#![no_main]

use horizons_core::ids::SequentialIds;
use horizons_core::{Planner, PlannerConfig, Snapshot};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(snapshot) = serde_json::from_slice::<Snapshot>(data) else {
        return;
    };
    let ids: Vec<_> = snapshot.items.keys().cloned().collect();
    let mut planner = Planner::restore(
        PlannerConfig::default(),
        snapshot,
        Box::new(SequentialIds::new("fz")),
    );

    // Arbitrary, possibly cyclic or dangling, link structure must not hang
    // or panic any engine operation.
    for id in &ids {
        let _ = planner.progress(id);
        let _ = planner.toggle_completion(id);
    }
    if let Some(first) = ids.first() {
        let _ = planner.edit_content(first, "fuzzed");
        let _ = planner.delete_item(first);
    }
    let _ = serde_json::to_vec(&planner.snapshot());
});
