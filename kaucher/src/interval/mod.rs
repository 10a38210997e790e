//! Interval types
//!
//! `ModalInterval` is the Kaucher interval every computation runs on.
//! `Interval` is the proper interval callers hand in and get back.

pub mod modal;
pub mod plain;

pub use modal::ModalInterval;
pub use plain::{Interval, IntervalCollection};

use std::collections::HashMap;

/// Working ranges of one bound computation, keyed by variable name
pub type RangeMap = HashMap<String, ModalInterval>;

const ABSOLUTE_TOLERANCE: f64 = 1.0e-12;
const RELATIVE_TOLERANCE: f64 = 1.0e-12;

/// Whether two bounds are equal up to floating point noise
pub fn is_almost(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    let difference = (a - b).abs();
    difference <= ABSOLUTE_TOLERANCE || difference <= RELATIVE_TOLERANCE * a.abs().max(b.abs())
}

/// Collapse almost-equal bounds to an exact point; a near-point around zero
/// becomes exactly `[0, 0]`
pub(crate) fn collapse_bounds(lower: f64, upper: f64) -> (f64, f64) {
    if !is_almost(lower, upper) {
        return (lower, upper);
    }
    let straddles_zero = (lower <= 0.0 && upper >= 0.0) || (upper <= 0.0 && lower >= 0.0);
    if straddles_zero {
        (0.0, 0.0)
    } else {
        (lower, lower)
    }
}
