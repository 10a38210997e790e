#![no_main]

use kaucher::{BoundsEstimator, Interval, IntervalCollection, ModalBoundsEstimator, Tree};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|depth: u8| {
    let depth = (depth as usize % 50) + 1;

    let mut expr = String::from("x");
    for _ in 0..depth {
        expr = format!("({} * x - 1)", expr);
    }

    if let Ok(tree) = expr.parse::<Tree>() {
        let ranges = IntervalCollection::new().with("x", Interval::point(0.5));
        let _ = ModalBoundsEstimator::new().get_model_bound(&tree, &ranges);
    }
});
