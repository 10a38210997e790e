//! Per-occurrence variable renaming
//!
//! Interval arithmetic treats every textual occurrence of a variable as an
//! independent unknown. The K-tree makes that explicit: the i-th occurrence
//! of `x` (1-indexed, postfix order) becomes the variable `x_i`, which can
//! then be given its own range. When `x_i` is already taken by a variable of
//! the model, underscores are appended until the name is free.

use crate::interval::RangeMap;
use crate::tree::{Node, Symbol, Tree};
use crate::{BoundError, BoundResult};
use std::collections::HashSet;

/// A clone of a tree with every variable occurrence renamed
#[derive(Debug, Clone, PartialEq)]
pub struct KTree {
    tree: Tree,
    /// Synthesized names per original variable, in first postfix appearance
    occurrences: Vec<(String, Vec<String>)>,
}

impl KTree {
    /// Clone `original` and rename each variable occurrence to `name_i`
    ///
    /// Synthesized names never coincide with a variable of `original` or with
    /// each other. Renaming keeps the tree's shape, so node ids refer to the
    /// same positions in both trees.
    pub fn new(original: &Tree) -> Self {
        let existing = original.variable_names();
        let mut renamer = Renamer {
            used: existing.iter().cloned().collect(),
            occurrences: Vec::with_capacity(existing.len()),
        };
        let mut root = original.root().clone();
        renamer.rename(&mut root);

        Self {
            tree: Tree::new(root),
            occurrences: renamer.occurrences,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Original variable names in first postfix appearance
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.occurrences.iter().map(|(name, _)| name.as_str())
    }

    /// Synthesized names for `variable`; empty if it does not occur
    pub fn occurrence_names(&self, variable: &str) -> &[String] {
        self.occurrences
            .iter()
            .find(|(name, _)| name == variable)
            .map(|(_, names)| names.as_slice())
            .unwrap_or(&[])
    }

    /// Give every synthesized name the range of its original variable
    pub fn seed_ranges(&self, ranges: &RangeMap) -> BoundResult<RangeMap> {
        let mut seeded = RangeMap::new();
        for (variable, names) in &self.occurrences {
            let range = ranges
                .get(variable)
                .copied()
                .ok_or_else(|| BoundError::missing_range(variable.as_str()))?;
            for name in names {
                seeded.insert(name.clone(), range);
            }
        }
        Ok(seeded)
    }
}

struct Renamer {
    used: HashSet<String>,
    occurrences: Vec<(String, Vec<String>)>,
}

impl Renamer {
    fn rename(&mut self, node: &mut Node) {
        for child in &mut node.children {
            self.rename(child);
        }

        if let Symbol::Variable { name, .. } = &mut node.symbol {
            let index = match self.occurrences.iter().position(|(original, _)| original == name) {
                Some(index) => index,
                None => {
                    self.occurrences.push((name.clone(), Vec::new()));
                    self.occurrences.len() - 1
                }
            };

            let mut synthesized = format!("{}_{}", name, self.occurrences[index].1.len() + 1);
            while self.used.contains(&synthesized) {
                synthesized.push('_');
            }
            self.used.insert(synthesized.clone());
            self.occurrences[index].1.push(synthesized.clone());
            *name = synthesized;
        }
    }
}
