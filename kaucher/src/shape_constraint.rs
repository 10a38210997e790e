//! Shape constraints on model outputs and derivatives

use crate::{Interval, IntervalCollection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A target range the model (or one of its partial derivatives) must stay in
///
/// `f in [0 .. 10]` constrains the model output. With a variable and
/// `derivations > 0` the constraint applies to the corresponding partial
/// derivative instead, e.g. `∂f/∂x in [0 .. inf]` for "increasing in x".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeConstraint {
    pub target: Interval,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(default)]
    pub derivations: u32,
    /// Input ranges that replace the caller's ranges for this check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<IntervalCollection>,
}

fn default_weight() -> f64 {
    1.0
}

impl ShapeConstraint {
    /// Constrain the model output to `target`
    pub fn new(target: Interval) -> Self {
        Self {
            target,
            weight: default_weight(),
            variable: None,
            derivations: 0,
            regions: None,
        }
    }

    /// Constrain the `derivations`-th partial derivative with respect to
    /// `variable` to `target`
    pub fn derivative(target: Interval, variable: impl Into<String>, derivations: u32) -> Self {
        Self {
            variable: Some(variable.into()),
            derivations,
            ..Self::new(target)
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_regions(mut self, regions: IntervalCollection) -> Self {
        self.regions = Some(regions);
        self
    }

    pub fn is_derivative(&self) -> bool {
        self.variable.is_some() && self.derivations > 0
    }

    /// Distance by which `bound` sticks out of the target range
    ///
    /// Zero when the target contains the bound. Otherwise each side
    /// contributes on its own: `max(0, target.lower - bound.lower)` plus
    /// `max(0, bound.upper - target.upper)`. An undefined bound cannot be
    /// certified and yields an infinite violation.
    pub fn violation(&self, bound: &Interval) -> f64 {
        if bound.is_undefined() {
            return f64::INFINITY;
        }
        if self.target.contains(bound) {
            return 0.0;
        }

        let mut violation = 0.0;
        if bound.lower() < self.target.lower() {
            violation += self.target.lower() - bound.lower();
        }
        if bound.upper() > self.target.upper() {
            violation += bound.upper() - self.target.upper();
        }
        violation
    }

    pub fn weighted_violation(&self, bound: &Interval) -> f64 {
        self.weight * self.violation(bound)
    }
}

impl fmt::Display for ShapeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.variable, self.derivations) {
            (Some(variable), 1) => write!(f, "∂f/∂{}", variable)?,
            (Some(variable), 2) => write!(f, "∂²f/∂{}²", variable)?,
            (Some(variable), 3) => write!(f, "∂³f/∂{}³", variable)?,
            (Some(variable), n) if n > 3 => write!(f, "∂^{}f/∂{}^{}", n, variable, n)?,
            _ => write!(f, "f")?,
        }
        write!(f, " in {}", self.target)?;
        if let Some(regions) = &self.regions {
            for (name, interval) in regions.iter() {
                write!(f, ", {} in {}", name, interval)?;
            }
        }
        if self.weight != 1.0 {
            write!(f, ", weight: {}", self.weight)?;
        }
        Ok(())
    }
}
