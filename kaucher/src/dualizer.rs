//! Monotonicity-based dualization of variable occurrences
//!
//! If the model is monotonic in `x` as a whole and also in every single
//! occurrence `x_i` of the K-tree, the occurrences whose sign disagrees with
//! the overall sign are evaluated over the dual of their range. In Kaucher
//! arithmetic that pins them to the opposite extremum and removes the
//! overestimation caused by treating the occurrences independently.
//!
//! Every step takes the current [`RangeState`] by value and returns the
//! updated one, so a bound computation is a fold over the model's variables.

use crate::derivative::derive;
use crate::evaluator::ModalIntervalEvaluator;
use crate::interval::{ModalInterval, RangeMap};
use crate::ktree::KTree;
use crate::tree::Tree;
use crate::BoundResult;
use tracing::{debug, trace};

/// Ranges of one bound computation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeState {
    /// Ranges of the original variables
    pub ranges: RangeMap,
    /// Ranges of the synthesized per-occurrence variables
    pub occurrences: RangeMap,
}

impl RangeState {
    /// Initial state: every occurrence starts with its variable's range
    pub fn seed(ktree: &KTree, ranges: RangeMap) -> BoundResult<Self> {
        let occurrences = ktree.seed_ranges(&ranges)?;
        Ok(Self {
            ranges,
            occurrences,
        })
    }

    /// Evaluate `tree`, resolving occurrence names before original names
    pub fn evaluate(&self, tree: &Tree) -> BoundResult<ModalInterval> {
        ModalIntervalEvaluator::compile(tree)?.evaluate(&self.ranges, Some(&self.occurrences), None)
    }
}

/// Whether `interval` lies entirely in `[0, ∞)` or entirely in `(-∞, 0]`
pub fn is_monotonic(interval: &ModalInterval) -> bool {
    monotonic_sign(interval) != 0
}

/// `1` for a non-negative derivative range, `-1` for a non-positive one and
/// `0` otherwise, undefined ranges included
pub fn monotonic_sign(interval: &ModalInterval) -> i8 {
    if interval.is_undefined() {
        return 0;
    }
    let proper = interval.proper();
    if proper.lower() >= 0.0 {
        1
    } else if proper.upper() <= 0.0 {
        -1
    } else {
        0
    }
}

/// Dualize the occurrences of `variable` where monotonicity allows it
///
/// Returns the updated state and whether the model was found fully
/// monotonic in `variable`. A variable with at most one occurrence is left
/// alone and counts as monotonic. When the model is not monotonic in the
/// variable, or in any single occurrence of it, the state is returned
/// unchanged: dualizing only some occurrences would not be sound.
pub fn dualize(
    original: &Tree,
    ktree: &KTree,
    variable: &str,
    state: RangeState,
) -> BoundResult<(RangeState, bool)> {
    let names = ktree.occurrence_names(variable);
    if names.len() <= 1 {
        return Ok((state, true));
    }

    let overall = state.evaluate(&derive(original, variable)?)?;
    let sign = monotonic_sign(&overall);
    if sign == 0 {
        debug!(variable, derivative = %overall, "Not monotonic, skipping dualization");
        return Ok((state, false));
    }

    let mut signs = Vec::with_capacity(names.len());
    for name in names {
        let derivative = state.evaluate(&derive(ktree.tree(), name)?)?;
        let occurrence_sign = monotonic_sign(&derivative);
        trace!(occurrence = %name, derivative = %derivative, sign = occurrence_sign);
        if occurrence_sign == 0 {
            debug!(variable, occurrence = %name, "Occurrence not monotonic, skipping dualization");
            return Ok((state, false));
        }
        signs.push(occurrence_sign);
    }

    let mut state = state;
    for (name, occurrence_sign) in names.iter().zip(signs) {
        if occurrence_sign != sign {
            if let Some(range) = state.occurrences.get_mut(name) {
                *range = range.dual();
            }
        }
    }
    debug!(variable, sign, occurrences = names.len(), "Dualized occurrences");
    Ok((state, true))
}

/// Collapse `variable` and all of its occurrences to the midpoint of its range
pub fn point_dual(ktree: &KTree, variable: &str, state: RangeState) -> RangeState {
    let Some(range) = state.ranges.get(variable).copied() else {
        return state;
    };
    let midpoint = ModalInterval::point(range.mid());

    let mut state = state;
    state.ranges.insert(variable.to_string(), midpoint);
    for name in ktree.occurrence_names(variable) {
        state.occurrences.insert(name.clone(), midpoint);
    }
    debug!(variable, midpoint = %midpoint, "Collapsed to midpoint");
    state
}
