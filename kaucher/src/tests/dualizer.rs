use crate::dualizer::{dualize, is_monotonic, monotonic_sign, point_dual, RangeState};
use crate::{KTree, ModalInterval, RangeMap, Tree};

fn setup(source: &str, entries: &[(&str, f64, f64)]) -> (Tree, KTree, RangeState) {
    let tree: Tree = source.parse().unwrap();
    let ktree = KTree::new(&tree);
    let ranges: RangeMap = entries
        .iter()
        .map(|(name, lower, upper)| (name.to_string(), ModalInterval::new(*lower, *upper)))
        .collect();
    let state = RangeState::seed(&ktree, ranges).unwrap();
    (tree, ktree, state)
}

#[test]
fn test_monotonic_sign() {
    assert_eq!(monotonic_sign(&ModalInterval::new(0.0, 2.0)), 1);
    assert_eq!(monotonic_sign(&ModalInterval::new(-2.0, 0.0)), -1);
    assert_eq!(monotonic_sign(&ModalInterval::new(-1.0, 1.0)), 0);
    assert_eq!(monotonic_sign(&ModalInterval::new(2.0, 0.5)), 1);
    assert_eq!(monotonic_sign(&ModalInterval::point(0.0)), 1);
    assert_eq!(monotonic_sign(&ModalInterval::undefined()), 0);

    assert!(is_monotonic(&ModalInterval::new(-3.0, -1.0)));
    assert!(!is_monotonic(&ModalInterval::new(-3.0, 1.0)));
}

#[test]
fn test_disagreeing_occurrence_is_dualized() {
    let (tree, ktree, state) = setup("x - x", &[("x", 1.0, 3.0)]);
    let (state, monotonic) = dualize(&tree, &ktree, "x", state).unwrap();

    assert!(monotonic);
    assert_eq!(state.occurrences["x_1"], ModalInterval::new(1.0, 3.0));
    assert_eq!(state.occurrences["x_2"], ModalInterval::new(3.0, 1.0));
    assert_eq!(state.ranges["x"], ModalInterval::new(1.0, 3.0));
}

#[test]
fn test_agreeing_occurrences_keep_their_range() {
    let (tree, ktree, state) = setup("x * x - x", &[("x", 1.0, 5.0)]);
    let (state, monotonic) = dualize(&tree, &ktree, "x", state).unwrap();

    assert!(monotonic);
    assert_eq!(state.occurrences["x_1"], ModalInterval::new(1.0, 5.0));
    assert_eq!(state.occurrences["x_2"], ModalInterval::new(1.0, 5.0));
    assert_eq!(state.occurrences["x_3"], ModalInterval::new(5.0, 1.0));
}

#[test]
fn test_non_monotonic_variable_is_left_alone() {
    let (tree, ktree, state) = setup("x * x - x", &[("x", -1.0, 1.0)]);
    let before = state.clone();
    let (state, monotonic) = dualize(&tree, &ktree, "x", state).unwrap();

    assert!(!monotonic);
    assert_eq!(state, before);
}

#[test]
fn test_single_occurrence_is_a_no_op() {
    let (tree, ktree, state) = setup("x + sin(y)", &[("x", 0.0, 1.0), ("y", -5.0, 5.0)]);
    let before = state.clone();
    let (state, monotonic) = dualize(&tree, &ktree, "y", state).unwrap();

    assert!(monotonic);
    assert_eq!(state, before);
}

#[test]
fn test_point_dual_collapses_variable_and_occurrences() {
    let (_, ktree, state) = setup("x * x + y", &[("x", 0.0, 4.0), ("y", 1.0, 2.0)]);
    let state = point_dual(&ktree, "x", state);

    assert_eq!(state.ranges["x"], ModalInterval::point(2.0));
    assert_eq!(state.occurrences["x_1"], ModalInterval::point(2.0));
    assert_eq!(state.occurrences["x_2"], ModalInterval::point(2.0));
    assert_eq!(state.occurrences["y_1"], ModalInterval::new(1.0, 2.0));
}

#[test]
fn test_evaluate_resolves_occurrences_first() {
    let (_, ktree, state) = setup("x - x", &[("x", 1.0, 3.0)]);
    let naive = state.evaluate(ktree.tree()).unwrap();
    assert_eq!((naive.lower(), naive.upper()), (-2.0, 2.0));
}
