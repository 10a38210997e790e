use crate::{Interval, IntervalCollection, ShapeConstraint};

fn interval(lower: f64, upper: f64) -> Interval {
    Interval::new(lower, upper).unwrap()
}

#[test]
fn test_violation_is_zero_inside_target() {
    let constraint = ShapeConstraint::new(interval(0.0, 10.0));
    assert_eq!(constraint.violation(&interval(0.0, 10.0)), 0.0);
    assert_eq!(constraint.violation(&interval(2.0, 3.0)), 0.0);
}

#[test]
fn test_violation_sums_protruding_sides() {
    let constraint = ShapeConstraint::new(interval(0.0, 10.0));
    assert_eq!(constraint.violation(&interval(-2.0, 5.0)), 2.0);
    assert_eq!(constraint.violation(&interval(3.0, 15.0)), 5.0);
    assert_eq!(constraint.violation(&interval(12.0, 20.0)), 10.0);
    assert_eq!(constraint.violation(&interval(-1.0, 11.0)), 2.0);
}

#[test]
fn test_undefined_bound_is_infinitely_violating() {
    let constraint = ShapeConstraint::new(interval(0.0, 10.0));
    let undefined = crate::ModalInterval::undefined().to_interval();
    assert_eq!(constraint.violation(&undefined), f64::INFINITY);
}

#[test]
fn test_unbounded_target() {
    let constraint = ShapeConstraint::new(interval(0.0, f64::INFINITY));
    assert_eq!(constraint.violation(&interval(1.0, 1e300)), 0.0);
    assert_eq!(constraint.violation(&interval(-3.0, 1.0)), 3.0);
}

#[test]
fn test_weighted_violation() {
    let constraint = ShapeConstraint::new(interval(0.0, 10.0)).with_weight(2.0);
    assert_eq!(constraint.weighted_violation(&interval(-2.0, 5.0)), 4.0);
}

#[test]
fn test_display() {
    let constraint = ShapeConstraint::new(interval(0.0, 10.0));
    assert_eq!(constraint.to_string(), "f in [0 .. 10]");

    let constraint = ShapeConstraint::derivative(interval(f64::NEG_INFINITY, 0.0), "x", 2)
        .with_regions(IntervalCollection::new().with("x", interval(0.0, 1.0)))
        .with_weight(0.5);
    assert_eq!(
        constraint.to_string(),
        "∂²f/∂x² in [-inf .. 0], x in [0 .. 1], weight: 0.5"
    );
    assert!(constraint.is_derivative());
}

#[test]
fn test_serde_defaults() {
    let constraint: ShapeConstraint =
        serde_json::from_str(r#"{"target": {"lower": 0.0, "upper": 1.0}}"#).unwrap();
    assert_eq!(constraint.weight, 1.0);
    assert_eq!(constraint.derivations, 0);
    assert!(constraint.variable.is_none());
    assert!(!constraint.is_derivative());
}
