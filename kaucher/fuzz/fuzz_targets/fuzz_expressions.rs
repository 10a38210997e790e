#![no_main]

use kaucher::{BoundsEstimator, Interval, IntervalCollection, ModalBoundsEstimator, Tree};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(tree) = s.parse::<Tree>() {
            let ranges: IntervalCollection = tree
                .variable_names()
                .into_iter()
                .map(|name| (name, Interval::unbounded()))
                .collect();

            let _ = ModalBoundsEstimator::new().get_model_bound(&tree, &ranges);
        }
    }
});
