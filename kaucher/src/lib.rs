//! # Kaucher Engine
//!
//! **Certified output bounds for symbolic models**
//!
//! Kaucher computes the range a symbolic expression can take when its inputs
//! vary over given intervals, and measures how far that range strays from a
//! shape constraint such as "the output stays in `[0, 10]`" or "the model is
//! increasing in `x`".
//!
//! ## Quick Start
//!
//! ```rust
//! use kaucher::{BoundResult, BoundsEstimator, Interval, IntervalCollection};
//! use kaucher::{ModalBoundsEstimator, ShapeConstraint, Tree};
//!
//! fn main() -> BoundResult<()> {
//!     let estimator = ModalBoundsEstimator::new();
//!     let model: Tree = "x - x + 2 * y".parse()?;
//!     let ranges = IntervalCollection::new()
//!         .with("x", Interval::new(-3.0, 3.0)?)
//!         .with("y", Interval::new(0.0, 1.0)?);
//!
//!     // Both occurrences of x cancel exactly
//!     let bound = estimator.get_model_bound(&model, &ranges)?;
//!     assert_eq!((bound.lower(), bound.upper()), (0.0, 2.0));
//!
//!     let constraint = ShapeConstraint::new(Interval::new(0.0, 1.0)?);
//!     assert_eq!(estimator.get_constraint_violation(&model, &ranges, &constraint)?, 1.0);
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Modal intervals
//! A [`ModalInterval`] may have `lower > upper`. Such an *improper* interval
//! is the dual of a proper one and lets subtraction and division act as
//! true inverses of addition and multiplication.
//!
//! ### K-trees
//! Plain interval arithmetic overestimates whenever a variable occurs more
//! than once. The [`KTree`] gives each occurrence its own name so that it
//! can be bounded on its own.
//!
//! ### Dualization
//! When the model is monotonic in a variable and in each of its occurrences,
//! occurrences pulling in the opposite direction are evaluated over the dual
//! range, which yields the exact extremum for monotonic models.

pub mod ast;
pub mod derivative;
pub mod dualizer;
pub mod error;
pub mod estimator;
pub mod evaluator;
pub mod interval;
pub mod ktree;
pub mod parser;
pub mod resource_limits;
pub mod shape_constraint;
pub mod tree;

pub use ast::{NodeId, NodeIdGenerator, Span};
pub use derivative::derive;
pub use dualizer::{dualize, is_monotonic, monotonic_sign, point_dual, RangeState};
pub use error::BoundError;
pub use estimator::{
    inner_approximation, outer_approximation, Approximation, BoundsEstimator,
    ModalBoundsEstimator,
};
pub use evaluator::{is_compatible, ModalIntervalEvaluator, Opcode};
pub use interval::{Interval, IntervalCollection, ModalInterval, RangeMap};
pub use ktree::KTree;
pub use parser::{parse_constraint, parse_constraints, parse_expression};
pub use resource_limits::ResourceLimits;
pub use shape_constraint::ShapeConstraint;
pub use tree::{Instruction, Node, Symbol, Tree};

/// Result type for bound estimation
pub type BoundResult<T> = Result<T, BoundError>;

#[cfg(test)]
mod tests;
