//! Tree infrastructure types
//!
//! Metadata types used by the parser, the tree and the evaluator:
//! - `Span` for tracking source code locations
//! - `NodeId` for uniquely identifying tree nodes
//! - `NodeIdGenerator` for numbering nodes when a tree is built

use serde::{Deserialize, Serialize};
use std::fmt;

/// Span representing a location in source code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn from_pest_span(span: pest::Span) -> Self {
        let (line, col) = span.start_pos().line_col();
        Self {
            start: span.start(),
            end: span.end(),
            line,
            col,
        }
    }
}

/// Unique identifier for each node of a tree
///
/// Ids are pre-order positions assigned by `Tree::new`, so they are stable
/// across clones and across renaming rewrites that keep the tree's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn index(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

/// Counter for generating unique node IDs
#[derive(Default)]
pub struct NodeIdGenerator {
    next_id: u64,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }
}
