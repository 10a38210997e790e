use crate::{BoundError, BoundResult, Tree};

/// Resource limits to keep bound computations predictable
///
/// Evaluation, differentiation and the K-tree transform all recurse once per
/// tree level, so the depth limit is what bounds stack usage.
#[derive(Debug, Clone)]
pub struct ResourceLimits {
    /// Maximum tree depth
    /// Real usage: ~10 levels, Limit: 200 (20x)
    pub max_tree_depth: usize,

    /// Maximum number of nodes in a tree
    /// Real usage: ~50 nodes, Limit: 10_000 (200x)
    pub max_tree_length: usize,

    /// Maximum size of an expression or constraint source in bytes
    /// Real usage: ~200 bytes, Limit: 1MB
    pub max_expression_bytes: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_tree_depth: 200,
            max_tree_length: 10_000,
            max_expression_bytes: 1024 * 1024, // 1 MB
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject trees that exceed the depth or length limit
    pub fn check_tree(&self, tree: &Tree) -> BoundResult<()> {
        let depth = tree.depth();
        if depth > self.max_tree_depth {
            return Err(BoundError::ResourceLimitExceeded {
                limit_name: "max_tree_depth".to_string(),
                limit_value: self.max_tree_depth.to_string(),
                actual_value: depth.to_string(),
                suggestion: "Simplify nested expressions to reduce depth".to_string(),
            });
        }

        let length = tree.length();
        if length > self.max_tree_length {
            return Err(BoundError::ResourceLimitExceeded {
                limit_name: "max_tree_length".to_string(),
                limit_value: self.max_tree_length.to_string(),
                actual_value: length.to_string(),
                suggestion: "Reduce the number of nodes in the model".to_string(),
            });
        }

        Ok(())
    }

    pub fn check_source(&self, source: &str) -> BoundResult<()> {
        if source.len() > self.max_expression_bytes {
            return Err(BoundError::ResourceLimitExceeded {
                limit_name: "max_expression_bytes".to_string(),
                limit_value: format!("{} bytes", self.max_expression_bytes),
                actual_value: format!("{} bytes", source.len()),
                suggestion: "Split the input into smaller expressions".to_string(),
            });
        }
        Ok(())
    }
}
