use crate::interval::is_almost;
use crate::{BoundError, Interval, ModalInterval};
use std::f64::consts::{E, PI};

fn bounds(interval: ModalInterval) -> (f64, f64) {
    (interval.lower(), interval.upper())
}

#[test]
fn test_dual_swaps_bounds_and_is_involution() {
    let interval = ModalInterval::new(1.0, 3.0);
    assert_eq!(bounds(interval.dual()), (3.0, 1.0));
    assert!(interval.dual().is_improper());
    assert_eq!(interval.dual().dual(), interval);
}

#[test]
fn test_almost_equal_bounds_collapse_to_point() {
    let interval = ModalInterval::new(2.5, 2.5 + 1e-14);
    assert!(interval.is_degenerate());
    assert!(interval.is_proper());
    assert_eq!(interval.width(), 0.0);
}

#[test]
fn test_near_zero_straddle_snaps_to_zero() {
    let interval = ModalInterval::new(-1e-13, 1e-13);
    assert_eq!(bounds(interval), (0.0, 0.0));

    let improper = ModalInterval::new(1e-13, -1e-13);
    assert_eq!(bounds(improper), (0.0, 0.0));
}

#[test]
fn test_is_almost() {
    assert!(is_almost(1.0, 1.0 + 1e-15));
    assert!(is_almost(1e9, 1e9 + 1e-4));
    assert!(!is_almost(1.0, 1.001));
    assert!(!is_almost(f64::NAN, f64::NAN));
    assert!(is_almost(f64::INFINITY, f64::INFINITY));
}

#[test]
fn test_classical_subtraction_does_not_cancel() {
    let x = ModalInterval::new(1.0, 3.0);
    assert_eq!(bounds(x - x), (-2.0, 2.0));
}

#[test]
fn test_inner_subtraction_cancels() {
    let x = ModalInterval::new(1.0, 3.0);
    assert_eq!(bounds(x.inner_sub(x)), (0.0, 0.0));
    assert_eq!(bounds(x - x.dual()), (0.0, 0.0));

    let a = ModalInterval::new(1.0, 2.0);
    let b = ModalInterval::new(3.0, 5.0);
    assert_eq!((a + b).inner_sub(b), a);
}

#[test]
fn test_multiplication_sign_cases() {
    let positive = ModalInterval::new(3.0, 4.0);
    assert_eq!(bounds(ModalInterval::new(1.0, 2.0) * positive), (3.0, 8.0));
    assert_eq!(bounds(ModalInterval::new(-1.0, 2.0) * positive), (-4.0, 8.0));
    assert_eq!(bounds(ModalInterval::new(-2.0, -1.0) * positive), (-8.0, -3.0));
    assert_eq!(
        bounds(ModalInterval::new(-1.0, 2.0) * ModalInterval::new(-3.0, 4.0)),
        (-6.0, 8.0)
    );
    assert_eq!(
        bounds(ModalInterval::new(-2.0, -1.0) * ModalInterval::new(-4.0, -3.0)),
        (3.0, 8.0)
    );
}

#[test]
fn test_multiplication_keeps_improper_modality() {
    let product = ModalInterval::new(2.0, 1.0) * ModalInterval::new(3.0, 4.0);
    assert_eq!(bounds(product), (6.0, 4.0));
    assert!(product.is_improper());
}

#[test]
fn test_multiplication_of_zero_and_dual_zero() {
    let zero = ModalInterval::new(-1.0, 2.0);
    let dual_zero = ModalInterval::new(2.0, -1.0);
    assert_eq!(bounds(zero * dual_zero), (0.0, 0.0));
    assert_eq!(bounds(dual_zero * zero), (0.0, 0.0));
}

#[test]
fn test_multiplication_with_infinite_bound_is_undefined() {
    let unbounded = ModalInterval::new(0.0, f64::INFINITY);
    assert!((unbounded * ModalInterval::new(1.0, 2.0)).is_undefined());
    assert!((ModalInterval::undefined() * ModalInterval::point(1.0)).is_undefined());
}

#[test]
fn test_reciprocal() {
    assert_eq!(bounds(ModalInterval::new(2.0, 4.0).recip()), (0.25, 0.5));
    assert!(ModalInterval::new(-1.0, 1.0).recip().is_undefined());
    assert!(ModalInterval::point(0.0).recip().is_undefined());

    let half_open = ModalInterval::new(0.0, 2.0).recip();
    assert_eq!(bounds(half_open), (0.5, f64::INFINITY));

    let negative = ModalInterval::new(-2.0, 0.0).recip();
    assert_eq!(bounds(negative), (f64::NEG_INFINITY, -0.5));
}

#[test]
fn test_division() {
    let quotient = ModalInterval::new(2.0, 4.0) / ModalInterval::point(2.0);
    assert_eq!(bounds(quotient), (1.0, 2.0));
    assert!((ModalInterval::new(1.0, 2.0) / ModalInterval::new(-1.0, 1.0)).is_undefined());
}

#[test]
fn test_log_of_non_positive_range_is_undefined() {
    assert!(ModalInterval::new(-1.0, 1.0).log().is_undefined());
    assert!(ModalInterval::new(0.0, 1.0).log().is_undefined());

    let log = ModalInterval::new(1.0, E).log();
    assert_eq!(log.lower(), 0.0);
    assert!((log.upper() - 1.0).abs() < 1e-12);
}

#[test]
fn test_sqrt_of_negative_lower_bound_keeps_upper_bound() {
    let root = ModalInterval::new(-4.0, 9.0).sqrt();
    assert!(root.lower().is_nan());
    assert_eq!(root.upper(), 3.0);
    assert!(root.is_undefined());
}

#[test]
fn test_abs() {
    assert_eq!(bounds(ModalInterval::new(-3.0, 2.0).abs()), (0.0, 3.0));
    assert_eq!(bounds(ModalInterval::new(-3.0, -1.0).abs()), (1.0, 3.0));
    assert_eq!(bounds(ModalInterval::new(2.0, -3.0).abs()), (3.0, 0.0));
}

#[test]
fn test_sin_samples_interior_extrema() {
    let sin = ModalInterval::new(0.0, PI).sin();
    assert!(sin.lower().abs() < 1e-12);
    assert_eq!(sin.upper(), 1.0);

    assert_eq!(bounds(ModalInterval::new(0.0, 10.0).sin()), (-1.0, 1.0));
}

#[test]
fn test_sin_of_negative_range() {
    let sin = ModalInterval::new(-PI / 2.0, 0.0).sin();
    assert!((sin.lower() + 1.0).abs() < 1e-12);
    assert!(sin.upper().abs() < 1e-12);
}

#[test]
fn test_cos() {
    let cos = ModalInterval::new(0.0, PI).cos();
    assert!((cos.lower() + 1.0).abs() < 1e-12);
    assert!((cos.upper() - 1.0).abs() < 1e-12);
}

#[test]
fn test_tan_crossing_pole_is_unbounded() {
    assert_eq!(
        bounds(ModalInterval::new(1.0, 2.0).tan()),
        (f64::NEG_INFINITY, f64::INFINITY)
    );

    let tan = ModalInterval::new(0.0, 1.0).tan();
    assert_eq!(tan.lower(), 0.0);
    assert_eq!(tan.upper(), 1.0_f64.tan());
}

#[test]
fn test_integer_powers() {
    assert_eq!(bounds(ModalInterval::new(-2.0, 3.0).powi(2)), (0.0, 9.0));
    assert_eq!(bounds(ModalInterval::new(-3.0, -2.0).powi(2)), (4.0, 9.0));
    assert_eq!(bounds(ModalInterval::new(-2.0, 3.0).powi(3)), (-8.0, 27.0));
    assert_eq!(bounds(ModalInterval::new(2.0, 4.0).powi(-1)), (0.25, 0.5));
    assert_eq!(bounds(ModalInterval::new(2.0, 4.0).powi(0)), (1.0, 1.0));
}

#[test]
fn test_non_integer_exponent_is_rejected() {
    let result = ModalInterval::new(1.0, 4.0).pow(0.5);
    assert!(matches!(result, Err(BoundError::UnsupportedExponent { .. })));

    let square = ModalInterval::new(1.0, 4.0).pow(2.0);
    assert_eq!(square.map(bounds), Ok((1.0, 16.0)));
}

#[test]
fn test_analytic_quotient() {
    let aq = ModalInterval::point(3.0).aq(ModalInterval::point(0.0));
    assert_eq!(bounds(aq), (3.0, 3.0));

    let aq = ModalInterval::point(1.0).aq(ModalInterval::point(1.0));
    assert!((aq.lower() - 1.0 / 2.0_f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_scalar_operators() {
    let x = ModalInterval::new(1.0, 2.0);
    assert_eq!(bounds(2.0 * x), (2.0, 4.0));
    assert_eq!(bounds(x + 1.0), (2.0, 3.0));
    assert_eq!(bounds(1.0 - x), (-1.0, 0.0));
    assert_eq!(bounds(x / 2.0), (0.5, 1.0));
}

#[test]
fn test_to_interval_normalizes_improper() {
    let interval = ModalInterval::new(3.0, 1.0).to_interval();
    assert_eq!((interval.lower(), interval.upper()), (1.0, 3.0));
}

#[test]
fn test_subset_and_contains() {
    let inner = ModalInterval::new(1.0, 2.0);
    let outer = ModalInterval::new(0.0, 3.0);
    assert!(inner.is_subset(&outer));
    assert!(!outer.is_subset(&inner));
    assert!(outer.contains(3.0));
    assert!(outer.dual().contains(1.5));
}

#[test]
fn test_plain_interval_rejects_reversed_bounds() {
    assert!(matches!(
        Interval::new(2.0, 1.0),
        Err(BoundError::InvalidInterval { .. })
    ));
    assert!(Interval::new(1.0, 2.0).is_ok());
    assert!(Interval::new(1.0, 1.0 - 1e-15).is_ok());
}

#[test]
fn test_plain_interval_serde_validates() {
    let parsed: Result<Interval, _> = serde_json::from_str(r#"{"lower": 0.0, "upper": 1.0}"#);
    assert!(parsed.is_ok());

    let reversed: Result<Interval, _> = serde_json::from_str(r#"{"lower": 2.0, "upper": 1.0}"#);
    assert!(reversed.is_err());
}

#[test]
fn test_modal_interval_serde_keeps_modality() {
    let improper = ModalInterval::new(3.0, 1.0);
    let json = serde_json::to_string(&improper).unwrap();
    let parsed: ModalInterval = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, improper);
    assert!(parsed.is_improper());
}

#[test]
fn test_modal_interval_deserialize_collapses_noise() {
    let parsed: ModalInterval =
        serde_json::from_str(r#"{"lower": 1.00000000000001, "upper": 1.0}"#).unwrap();
    assert!(parsed.is_proper());
    assert!(parsed.is_degenerate());
    assert_eq!(parsed, ModalInterval::new(1.00000000000001, 1.0));
}
