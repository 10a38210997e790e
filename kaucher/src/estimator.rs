//! Model bound estimation
//!
//! [`outer_approximation`] and [`inner_approximation`] combine the K-tree,
//! the dualizer and the evaluator. [`ModalBoundsEstimator`] wraps them behind
//! the [`BoundsEstimator`] interface used by constraint checks.

use crate::ast::NodeId;
use crate::derivative::derive;
use crate::dualizer::{dualize, point_dual, RangeState};
use crate::evaluator::{self, ModalIntervalEvaluator};
use crate::interval::{Interval, IntervalCollection, ModalInterval, RangeMap};
use crate::ktree::KTree;
use crate::resource_limits::ResourceLimits;
use crate::shape_constraint::ShapeConstraint;
use crate::tree::Tree;
use crate::{BoundError, BoundResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// How to handle variables the model is not monotonic in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approximation {
    /// Keep their plain ranges: a guaranteed enclosure of the model's range
    #[default]
    Outer,
    /// Collapse them to the midpoint of their range
    Inner,
}

/// Tightest enclosure of the model's range the dualizer can certify
pub fn outer_approximation(tree: &Tree, ranges: &RangeMap) -> BoundResult<ModalInterval> {
    approximate(tree, ranges, Approximation::Outer, None)
}

/// Bound with every multi-occurrence, non-monotonic variable collapsed to the
/// midpoint of its range
pub fn inner_approximation(tree: &Tree, ranges: &RangeMap) -> BoundResult<ModalInterval> {
    approximate(tree, ranges, Approximation::Inner, None)
}

fn approximate(
    tree: &Tree,
    ranges: &RangeMap,
    approximation: Approximation,
    node_intervals: Option<&mut HashMap<NodeId, ModalInterval>>,
) -> BoundResult<ModalInterval> {
    let ktree = KTree::new(tree);
    let initial = RangeState::seed(&ktree, ranges.clone())?;

    let state = ktree.variables().try_fold(initial, |state, variable| {
        let (state, monotonic) = dualize(tree, &ktree, variable, state)?;
        let collapse = !monotonic && approximation == Approximation::Inner;
        Ok::<_, BoundError>(if collapse {
            point_dual(&ktree, variable, state)
        } else {
            state
        })
    })?;

    let bound = ModalIntervalEvaluator::compile(ktree.tree())?.evaluate(
        &state.ranges,
        Some(&state.occurrences),
        node_intervals,
    )?;
    debug!(model = %tree, ?approximation, bound = %bound, "Approximated model bound");
    Ok(bound)
}

/// Interface of a bound estimator shared by concurrent constraint checks
pub trait BoundsEstimator: Send + Sync {
    /// Reset the evaluation counter at the start of a run
    fn initialize_state(&self);

    /// Reset the evaluation counter between generations
    fn clear_state(&self);

    /// Number of bound computations since the last reset
    fn evaluated_solutions(&self) -> u64;

    fn get_model_bound(&self, tree: &Tree, ranges: &IntervalCollection) -> BoundResult<Interval>;

    fn get_constraint_violation(
        &self,
        tree: &Tree,
        ranges: &IntervalCollection,
        constraint: &ShapeConstraint,
    ) -> BoundResult<f64>;

    fn is_compatible(&self, tree: &Tree) -> bool;
}

/// Bound estimator based on Kaucher interval arithmetic
///
/// # Example
///
/// ```
/// use kaucher::{BoundsEstimator, Interval, IntervalCollection, ModalBoundsEstimator, Tree};
///
/// let estimator = ModalBoundsEstimator::new();
/// let tree: Tree = "x * x - x".parse()?;
/// let ranges = IntervalCollection::new().with("x", Interval::new(1.0, 5.0)?);
///
/// let bound = estimator.get_model_bound(&tree, &ranges)?;
/// assert_eq!((bound.lower(), bound.upper()), (0.0, 20.0));
/// # Ok::<(), kaucher::BoundError>(())
/// ```
#[derive(Debug, Default)]
pub struct ModalBoundsEstimator {
    evaluated_solutions: AtomicU64,
    approximation: Approximation,
    limits: ResourceLimits,
}

impl ModalBoundsEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_approximation(mut self, approximation: Approximation) -> Self {
        self.approximation = approximation;
        self
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn approximation(&self) -> Approximation {
        self.approximation
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Bound of every node of `tree`, keyed by node id
    pub fn get_model_node_bounds(
        &self,
        tree: &Tree,
        ranges: &IntervalCollection,
    ) -> BoundResult<BTreeMap<NodeId, Interval>> {
        self.limits.check_tree(tree)?;
        self.evaluated_solutions.fetch_add(1, Ordering::Relaxed);

        let mut node_intervals = HashMap::new();
        approximate(
            tree,
            &ranges.to_range_map(),
            self.approximation,
            Some(&mut node_intervals),
        )?;
        Ok(node_intervals
            .into_iter()
            .map(|(id, interval)| (id, interval.to_interval()))
            .collect())
    }

    /// Violation of each constraint, in order
    pub fn get_constraint_violations(
        &self,
        tree: &Tree,
        ranges: &IntervalCollection,
        constraints: &[ShapeConstraint],
    ) -> BoundResult<Vec<f64>> {
        constraints
            .iter()
            .map(|constraint| self.get_constraint_violation(tree, ranges, constraint))
            .collect()
    }

    fn constrained_model(tree: &Tree, constraint: &ShapeConstraint) -> BoundResult<Tree> {
        let mut model = tree.clone();
        if let Some(variable) = constraint.variable.as_deref() {
            for _ in 0..constraint.derivations {
                model = derive(&model, variable)?;
            }
        }
        Ok(model)
    }
}

impl BoundsEstimator for ModalBoundsEstimator {
    fn initialize_state(&self) {
        self.evaluated_solutions.store(0, Ordering::Relaxed);
    }

    fn clear_state(&self) {
        self.evaluated_solutions.store(0, Ordering::Relaxed);
    }

    fn evaluated_solutions(&self) -> u64 {
        self.evaluated_solutions.load(Ordering::Relaxed)
    }

    fn get_model_bound(&self, tree: &Tree, ranges: &IntervalCollection) -> BoundResult<Interval> {
        self.limits.check_tree(tree)?;
        self.evaluated_solutions.fetch_add(1, Ordering::Relaxed);

        let bound = approximate(tree, &ranges.to_range_map(), self.approximation, None)?;
        Ok(bound.to_interval())
    }

    fn get_constraint_violation(
        &self,
        tree: &Tree,
        ranges: &IntervalCollection,
        constraint: &ShapeConstraint,
    ) -> BoundResult<f64> {
        let model = Self::constrained_model(tree, constraint)?;
        let bound = match &constraint.regions {
            Some(regions) => self.get_model_bound(&model, &ranges.merged_with(regions))?,
            None => self.get_model_bound(&model, ranges)?,
        };
        let violation = constraint.violation(&bound);
        debug!(constraint = %constraint, bound = %bound, violation, "Checked shape constraint");
        Ok(violation)
    }

    fn is_compatible(&self, tree: &Tree) -> bool {
        evaluator::is_compatible(tree)
    }
}
