//! Kaucher (modal) interval arithmetic
//!
//! A modal interval is a pair of bounds where `lower > upper` is a valid,
//! meaningful state: an *improper* interval. Proper intervals carry the usual
//! existential meaning ("some value in the range"), improper ones the
//! universal meaning. Allowing both makes `dual` available as a first-class
//! operation, which is what the bound tightening in `dualizer` relies on.
//!
//! Numerically undefined results never panic or error. They are reported as
//! NaN bounds and it is up to the caller to treat such an interval as unsound.

use super::{collapse_bounds, Interval};
use crate::{BoundError, BoundResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A Kaucher interval `[lower, upper]`, proper or improper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawModalInterval")]
pub struct ModalInterval {
    lower: f64,
    upper: f64,
}

#[derive(Deserialize)]
struct RawModalInterval {
    lower: f64,
    upper: f64,
}

impl From<RawModalInterval> for ModalInterval {
    fn from(raw: RawModalInterval) -> Self {
        ModalInterval::new(raw.lower, raw.upper)
    }
}

/// Sign pattern of a modal interval, used to pick the multiplication case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignClass {
    /// Both bounds non-negative
    Positive,
    /// lower < 0 <= upper, a proper interval around zero
    Zero,
    /// lower >= 0 > upper, the dual of an interval around zero
    DualZero,
    /// Both bounds negative
    Negative,
}

impl ModalInterval {
    /// Create a new modal interval
    ///
    /// Bounds that are almost equal collapse to an exact point, and a
    /// near-point straddling zero snaps to `[0, 0]`, so that floating point
    /// noise never produces an artificial improper interval.
    pub fn new(lower: f64, upper: f64) -> Self {
        let (lower, upper) = collapse_bounds(lower, upper);
        Self { lower, upper }
    }

    /// Create a degenerate interval `[value, value]`
    pub fn point(value: f64) -> Self {
        Self::new(value, value)
    }

    /// The interval with both bounds undefined
    pub fn undefined() -> Self {
        Self {
            lower: f64::NAN,
            upper: f64::NAN,
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// `lower <= upper`; degenerate intervals are proper
    pub fn is_proper(&self) -> bool {
        self.lower <= self.upper
    }

    pub fn is_improper(&self) -> bool {
        self.lower > self.upper
    }

    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper
    }

    /// Swap the bounds. `dual(dual(x)) == x` for every `x`.
    pub fn dual(&self) -> Self {
        Self {
            lower: self.upper,
            upper: self.lower,
        }
    }

    /// The proper interval spanning the same values
    pub fn proper(&self) -> Self {
        if self.is_improper() {
            self.dual()
        } else {
            *self
        }
    }

    pub fn mid(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// `upper - lower`, negative for improper intervals
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn is_undefined(&self) -> bool {
        self.lower.is_nan() || self.upper.is_nan()
    }

    pub fn is_inf_or_undefined(&self) -> bool {
        !self.lower.is_finite() || !self.upper.is_finite()
    }

    /// Kaucher inclusion: `self ⊆ other` iff `other.lower <= self.lower` and
    /// `self.upper <= other.upper`
    pub fn is_subset(&self, other: &ModalInterval) -> bool {
        other.lower <= self.lower && self.upper <= other.upper
    }

    /// Whether `value` lies within the proper form of this interval
    pub fn contains(&self, value: f64) -> bool {
        let proper = self.proper();
        proper.lower <= value && value <= proper.upper
    }

    /// Normalize to a plain interval, swapping the bounds of an improper one
    pub fn to_interval(&self) -> Interval {
        let proper = self.proper();
        Interval::from_ordered(proper.lower, proper.upper)
    }

    fn sign_class(&self) -> SignClass {
        match (self.lower >= 0.0, self.upper >= 0.0) {
            (true, true) => SignClass::Positive,
            (false, true) => SignClass::Zero,
            (true, false) => SignClass::DualZero,
            (false, false) => SignClass::Negative,
        }
    }

    /// Apply a proper-interval function to the proper form and give the
    /// result the modality of `self`
    fn map_proper(&self, f: impl FnOnce(f64, f64) -> (f64, f64)) -> Self {
        let proper = self.proper();
        let (lower, upper) = f(proper.lower, proper.upper);
        let result = Self::new(lower, upper);
        if self.is_improper() {
            result.dual()
        } else {
            result
        }
    }

    /// Kaucher multiplication
    ///
    /// Sixteen cases on the sign pattern of both factors. Any infinite or
    /// NaN bound on either side makes the product undefined.
    pub fn multiply(self, rhs: ModalInterval) -> Self {
        use SignClass::*;

        if self.is_inf_or_undefined() || rhs.is_inf_or_undefined() {
            return Self::undefined();
        }

        let (a1, a2) = (self.lower, self.upper);
        let (b1, b2) = (rhs.lower, rhs.upper);

        let (lower, upper) = match (self.sign_class(), rhs.sign_class()) {
            (Positive, Positive) => (a1 * b1, a2 * b2),
            (Positive, Zero) => (a2 * b1, a2 * b2),
            (Positive, Negative) => (a2 * b1, a1 * b2),
            (Positive, DualZero) => (a1 * b1, a1 * b2),

            (Zero, Positive) => (a1 * b2, a2 * b2),
            (Zero, Zero) => ((a1 * b2).min(a2 * b1), (a1 * b1).max(a2 * b2)),
            (Zero, Negative) => (a2 * b1, a1 * b1),
            (Zero, DualZero) => (0.0, 0.0),

            (Negative, Positive) => (a1 * b2, a2 * b1),
            (Negative, Zero) => (a1 * b2, a1 * b1),
            (Negative, Negative) => (a2 * b2, a1 * b1),
            (Negative, DualZero) => (a2 * b2, a2 * b1),

            (DualZero, Positive) => (a1 * b1, a2 * b1),
            (DualZero, Zero) => (0.0, 0.0),
            (DualZero, Negative) => (a2 * b2, a1 * b2),
            (DualZero, DualZero) => ((a1 * b1).max(a2 * b2), (a1 * b2).min(a2 * b1)),
        };

        Self::new(lower, upper)
    }

    /// Reciprocal `1 / self`
    ///
    /// Undefined when the proper form straddles zero or is the zero point. A
    /// bound that is exactly zero maps to an infinity signed like the other
    /// bound.
    pub fn recip(self) -> Self {
        let proper = self.proper();
        let straddles_zero = proper.lower < 0.0 && proper.upper > 0.0;
        let is_zero = proper.lower == 0.0 && proper.upper == 0.0;
        if straddles_zero || is_zero {
            return Self::undefined();
        }

        Self::new(
            reciprocal_bound(self.upper, self.lower),
            reciprocal_bound(self.lower, self.upper),
        )
    }

    /// True division `self * recip(rhs)`
    pub fn divide(self, rhs: ModalInterval) -> Self {
        self.multiply(rhs.recip())
    }

    /// Inner difference `self - dual(rhs)`
    ///
    /// The algebraic inverse of addition: `(a + b).inner_sub(b) == a` and
    /// `x.inner_sub(x)` is `[0, 0]` for every `x`.
    pub fn inner_sub(self, rhs: ModalInterval) -> Self {
        self - rhs.dual()
    }

    pub fn exp(self) -> Self {
        Self::new(self.lower.exp(), self.upper.exp())
    }

    /// Natural logarithm, undefined as soon as either bound is non-positive
    pub fn log(self) -> Self {
        if self.lower <= 0.0 || self.upper <= 0.0 {
            return Self::undefined();
        }
        Self::new(self.lower.ln(), self.upper.ln())
    }

    /// Square root, bound by bound: a negative bound becomes NaN on its own
    pub fn sqrt(self) -> Self {
        let root = |bound: f64| if bound < 0.0 { f64::NAN } else { bound.sqrt() };
        Self::new(root(self.lower), root(self.upper))
    }

    pub fn abs(self) -> Self {
        self.map_proper(|lower, upper| {
            if lower >= 0.0 {
                (lower, upper)
            } else if upper <= 0.0 {
                (-upper, -lower)
            } else {
                (0.0, (-lower).max(upper))
            }
        })
    }

    pub fn sin(self) -> Self {
        self.map_proper(sine_bounds)
    }

    /// `cos(x) = sin(x + π/2)`
    pub fn cos(self) -> Self {
        self.map_proper(|lower, upper| sine_bounds(lower + FRAC_PI_2, upper + FRAC_PI_2))
    }

    pub fn tan(self) -> Self {
        self.map_proper(tangent_bounds)
    }

    pub fn tanh(self) -> Self {
        Self::new(self.lower.tanh(), self.upper.tanh())
    }

    pub fn square(self) -> Self {
        self.powi(2)
    }

    /// Integer power
    ///
    /// Odd exponents are monotone and apply bound by bound. Even exponents
    /// fold the negative part of the range onto the positive one. Negative
    /// exponents go through `recip`.
    pub fn powi(self, exponent: i32) -> Self {
        if exponent < 0 {
            return self.pow_unsigned(exponent.unsigned_abs()).recip();
        }
        self.pow_unsigned(exponent.unsigned_abs())
    }

    fn pow_unsigned(self, exponent: u32) -> Self {
        if exponent == 0 {
            return Self::point(1.0);
        }

        let power = |bound: f64| bound.powf(f64::from(exponent));
        if exponent % 2 == 1 {
            return Self::new(power(self.lower), power(self.upper));
        }

        self.map_proper(|lower, upper| {
            if lower >= 0.0 {
                (power(lower), power(upper))
            } else if upper <= 0.0 {
                (power(upper), power(lower))
            } else {
                (0.0, power(lower).max(power(upper)))
            }
        })
    }

    /// Power with a real exponent, which must be an integer
    pub fn pow(self, exponent: f64) -> BoundResult<Self> {
        let in_range = exponent >= f64::from(i32::MIN) && exponent <= f64::from(i32::MAX);
        if !exponent.is_finite() || exponent.fract() != 0.0 || !in_range {
            return Err(BoundError::UnsupportedExponent {
                exponent: exponent.to_string(),
            });
        }
        Ok(self.powi(exponent as i32))
    }

    /// Analytic quotient `self / sqrt(1 + rhs²)`
    pub fn aq(self, rhs: ModalInterval) -> Self {
        self.multiply((1.0 + rhs.square()).sqrt().recip())
    }
}

fn reciprocal_bound(value: f64, other: f64) -> f64 {
    if value == 0.0 {
        if other > 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        }
    } else {
        1.0 / value
    }
}

/// Range of `sin` over the proper interval `[lower, upper]`
///
/// The range is scaled by π/2 so that the extrema sit on integers, moved to
/// a positive 4-cycle, and `sin` is sampled at both endpoints and at every
/// integer inside.
fn sine_bounds(lower: f64, upper: f64) -> (f64, f64) {
    if lower.is_nan() || upper.is_nan() {
        return (f64::NAN, f64::NAN);
    }
    if !lower.is_finite() || !upper.is_finite() || upper - lower >= 2.0 * PI {
        return (-1.0, 1.0);
    }

    let mut scaled_lower = lower / FRAC_PI_2;
    let mut scaled_upper = upper / FRAC_PI_2;
    if scaled_lower < 0.0 {
        let periods = (scaled_lower.abs() / 4.0).trunc() + 1.0;
        scaled_lower += periods * 4.0;
        scaled_upper += periods * 4.0;
    }

    let scaled_lower = scaled_lower % 4.0;
    let mut scaled_upper = scaled_upper % 4.0;
    if scaled_upper < scaled_lower {
        scaled_upper += 4.0;
    }

    let mut values = vec![
        (scaled_lower * FRAC_PI_2).sin(),
        (scaled_upper * FRAC_PI_2).sin(),
    ];
    let mut step = scaled_lower.ceil();
    while step <= scaled_upper.floor() {
        values.push((step * FRAC_PI_2).sin());
        step += 1.0;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

/// Range of `tan` over the proper interval `[lower, upper]`
///
/// Unbounded as soon as the range reaches a pole.
fn tangent_bounds(lower: f64, upper: f64) -> (f64, f64) {
    if lower.is_nan() || upper.is_nan() {
        return (f64::NAN, f64::NAN);
    }
    if !lower.is_finite() || !upper.is_finite() {
        return (f64::NEG_INFINITY, f64::INFINITY);
    }

    let periods = ((lower + FRAC_PI_2) / PI).floor();
    let shifted_lower = lower - periods * PI;
    let shifted_upper = upper - periods * PI;
    if shifted_lower <= -FRAC_PI_2 || shifted_upper >= FRAC_PI_2 {
        return (f64::NEG_INFINITY, f64::INFINITY);
    }

    (lower.tan(), upper.tan())
}

impl From<f64> for ModalInterval {
    fn from(value: f64) -> Self {
        ModalInterval::point(value)
    }
}

impl From<Interval> for ModalInterval {
    fn from(interval: Interval) -> Self {
        ModalInterval::new(interval.lower(), interval.upper())
    }
}

impl fmt::Display for ModalInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.lower, self.upper)
    }
}

// ---------------------------
// Operators
// ---------------------------

impl Neg for ModalInterval {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.upper, -self.lower)
    }
}

impl Add for ModalInterval {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.lower + rhs.lower, self.upper + rhs.upper)
    }
}

impl Sub for ModalInterval {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.lower - rhs.upper, self.upper - rhs.lower)
    }
}

impl Mul for ModalInterval {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(rhs)
    }
}

impl Div for ModalInterval {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self.divide(rhs)
    }
}

macro_rules! impl_scalar_ops {
    ($($trait:ident, $method:ident);* $(;)?) => {
        $(
            impl $trait<f64> for ModalInterval {
                type Output = ModalInterval;

                fn $method(self, rhs: f64) -> ModalInterval {
                    $trait::$method(self, ModalInterval::point(rhs))
                }
            }

            impl $trait<ModalInterval> for f64 {
                type Output = ModalInterval;

                fn $method(self, rhs: ModalInterval) -> ModalInterval {
                    $trait::$method(ModalInterval::point(self), rhs)
                }
            }
        )*
    };
}

impl_scalar_ops!(
    Add, add;
    Sub, sub;
    Mul, mul;
    Div, div;
);
