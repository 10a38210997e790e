//! Proper intervals at the engine's boundary

use super::{collapse_bounds, ModalInterval, RangeMap};
use crate::{BoundError, BoundResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A proper interval `[lower, upper]` with `lower <= upper`
///
/// NaN bounds are allowed and mean "undefined": callers must treat an
/// interval with a NaN bound as unsound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    lower: f64,
    upper: f64,
}

#[derive(Deserialize)]
struct RawInterval {
    lower: f64,
    upper: f64,
}

impl TryFrom<RawInterval> for Interval {
    type Error = BoundError;

    fn try_from(raw: RawInterval) -> BoundResult<Self> {
        Interval::new(raw.lower, raw.upper)
    }
}

impl Interval {
    pub fn new(lower: f64, upper: f64) -> BoundResult<Self> {
        let (lower, upper) = collapse_bounds(lower, upper);
        if lower > upper {
            return Err(BoundError::InvalidInterval { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Build from bounds already known to be ordered
    pub(crate) fn from_ordered(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn point(value: f64) -> Self {
        let (lower, upper) = collapse_bounds(value, value);
        Self { lower, upper }
    }

    /// `(-∞, +∞)`
    pub fn unbounded() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn mid(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn is_undefined(&self) -> bool {
        self.lower.is_nan() || self.upper.is_nan()
    }

    pub fn is_inf_or_undefined(&self) -> bool {
        !self.lower.is_finite() || !self.upper.is_finite()
    }

    pub fn contains_value(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Whether `other` lies entirely within `self`
    pub fn contains(&self, other: &Interval) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }

    pub fn is_subset(&self, other: &Interval) -> bool {
        other.contains(self)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.lower, self.upper)
    }
}

/// Named input ranges, one per variable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalCollection {
    intervals: BTreeMap<String, Interval>,
}

impl IntervalCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, variable: impl Into<String>, interval: Interval) -> Self {
        self.set_interval(variable, interval);
        self
    }

    pub fn set_interval(&mut self, variable: impl Into<String>, interval: Interval) {
        self.intervals.insert(variable.into(), interval);
    }

    pub fn get_interval(&self, variable: &str) -> Option<Interval> {
        self.intervals.get(variable).copied()
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.intervals.contains_key(variable)
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.intervals.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Interval)> {
        self.intervals
            .iter()
            .map(|(name, interval)| (name.as_str(), *interval))
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// A copy of `self` where every range of `overrides` replaces or adds to
    /// the existing one
    pub fn merged_with(&self, overrides: &IntervalCollection) -> IntervalCollection {
        let mut merged = self.clone();
        for (name, interval) in overrides.iter() {
            merged.set_interval(name, interval);
        }
        merged
    }

    /// Convert to the modal ranges the evaluator works on
    pub fn to_range_map(&self) -> RangeMap {
        self.intervals
            .iter()
            .map(|(name, interval)| (name.clone(), ModalInterval::from(*interval)))
            .collect()
    }
}

impl FromIterator<(String, Interval)> for IntervalCollection {
    fn from_iter<I: IntoIterator<Item = (String, Interval)>>(iter: I) -> Self {
        Self {
            intervals: iter.into_iter().collect(),
        }
    }
}
