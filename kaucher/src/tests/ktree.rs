use crate::{outer_approximation, BoundError, KTree, ModalInterval, RangeMap, Tree};

fn tree(source: &str) -> Tree {
    source.parse().unwrap()
}

#[test]
fn test_occurrences_are_numbered_in_postfix_order() {
    let ktree = KTree::new(&tree("x * x - x + y"));
    assert_eq!(ktree.tree().to_string(), "(((x_1 * x_2) - x_3) + y_1)");
    assert_eq!(ktree.occurrence_names("x"), ["x_1", "x_2", "x_3"]);
    assert_eq!(ktree.occurrence_names("y"), ["y_1"]);
    assert!(ktree.occurrence_names("z").is_empty());
}

#[test]
fn test_variables_follow_first_postfix_appearance() {
    let ktree = KTree::new(&tree("sin(y) + x * y"));
    assert_eq!(ktree.variables().collect::<Vec<_>>(), vec!["y", "x"]);
    assert_eq!(ktree.tree().to_string(), "(sin(y_1) + (x_1 * y_2))");
}

#[test]
fn test_original_tree_is_not_modified() {
    let original = tree("x + x");
    let before = original.clone();
    let ktree = KTree::new(&original);
    assert_eq!(original, before);
    assert_ne!(ktree.tree(), &original);
}

#[test]
fn test_node_ids_are_preserved() {
    let original = tree("x * (x + y)");
    let ktree = KTree::new(&original);
    let original_ids: Vec<_> = original.iterate_postfix().iter().map(|n| n.id).collect();
    let ktree_ids: Vec<_> = ktree.tree().iterate_postfix().iter().map(|n| n.id).collect();
    assert_eq!(original_ids, ktree_ids);
}

#[test]
fn test_seeded_ranges_copy_variable_range() {
    let ktree = KTree::new(&tree("x * x + y"));
    let mut ranges = RangeMap::new();
    ranges.insert("x".to_string(), ModalInterval::new(1.0, 2.0));
    ranges.insert("y".to_string(), ModalInterval::new(-1.0, 0.0));

    let seeded = ktree.seed_ranges(&ranges).unwrap();
    assert_eq!(seeded.len(), 3);
    assert_eq!(seeded["x_1"], ModalInterval::new(1.0, 2.0));
    assert_eq!(seeded["x_2"], ModalInterval::new(1.0, 2.0));
    assert_eq!(seeded["y_1"], ModalInterval::new(-1.0, 0.0));
}

#[test]
fn test_seeding_requires_every_range() {
    let ktree = KTree::new(&tree("x + y"));
    let mut ranges = RangeMap::new();
    ranges.insert("x".to_string(), ModalInterval::new(1.0, 2.0));
    assert_eq!(
        ktree.seed_ranges(&ranges),
        Err(BoundError::MissingRange {
            variable: "y".to_string()
        })
    );
}

#[test]
fn test_occurrence_names_avoid_existing_variables() {
    let ktree = KTree::new(&tree("x + x_1 + x"));
    assert_eq!(ktree.occurrence_names("x"), ["x_1_", "x_2"]);
    assert_eq!(ktree.occurrence_names("x_1"), ["x_1_1"]);
    assert_eq!(ktree.tree().to_string(), "(x_1_ + x_1_1 + x_2)");
}

#[test]
fn test_variable_colliding_with_occurrence_name_is_bounded() {
    let mut ranges = RangeMap::new();
    ranges.insert("x".to_string(), ModalInterval::new(0.0, 1.0));
    ranges.insert("x_1".to_string(), ModalInterval::new(0.0, 1.0));

    let bound = outer_approximation(&tree("x + x_1"), &ranges).unwrap();
    assert_eq!(bound, ModalInterval::new(0.0, 2.0));

    // x occurs twice and cancels; x_1 keeps its own range
    let bound = outer_approximation(&tree("x - x + 3 * x_1"), &ranges).unwrap();
    assert_eq!(bound, ModalInterval::new(0.0, 3.0));
}
