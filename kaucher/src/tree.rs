//! Symbolic expression trees
//!
//! A tree is an immutable value once built: `Tree::new` numbers its nodes in
//! pre-order and every transformation (K-tree renaming, differentiation)
//! works on a clone.

use crate::ast::{NodeId, NodeIdGenerator};
use std::fmt;

/// The operator or terminal a node stands for
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    /// Input variable with the linear weight symbolic regression bakes into
    /// each variable node
    Variable { name: String, weight: f64 },
    Constant(f64),
    Add,
    Sub,
    Mul,
    Div,
    Sin,
    Cos,
    Tan,
    Tanh,
    Log,
    Exp,
    Square,
    SquareRoot,
    Power,
    Absolute,
    AnalyticQuotient,
    /// Named wrapper around a single child
    SubFunction { name: String },
    Cube,
    CubeRoot,
    Root,
    Logistic,
    Erf,
    Min,
    Max,
}

impl Symbol {
    /// Name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Variable { .. } => "Variable",
            Symbol::Constant(_) => "Constant",
            Symbol::Add => "Addition",
            Symbol::Sub => "Subtraction",
            Symbol::Mul => "Multiplication",
            Symbol::Div => "Division",
            Symbol::Sin => "Sine",
            Symbol::Cos => "Cosine",
            Symbol::Tan => "Tangent",
            Symbol::Tanh => "HyperbolicTangent",
            Symbol::Log => "Logarithm",
            Symbol::Exp => "Exponential",
            Symbol::Square => "Square",
            Symbol::SquareRoot => "SquareRoot",
            Symbol::Power => "Power",
            Symbol::Absolute => "Absolute",
            Symbol::AnalyticQuotient => "AnalyticQuotient",
            Symbol::SubFunction { .. } => "SubFunction",
            Symbol::Cube => "Cube",
            Symbol::CubeRoot => "CubeRoot",
            Symbol::Root => "Root",
            Symbol::Logistic => "Logistic",
            Symbol::Erf => "Erf",
            Symbol::Min => "Min",
            Symbol::Max => "Max",
        }
    }

    /// Function name used by the infix syntax, for symbols written as calls
    fn function_name(&self) -> Option<&str> {
        let name = match self {
            Symbol::Sin => "sin",
            Symbol::Cos => "cos",
            Symbol::Tan => "tan",
            Symbol::Tanh => "tanh",
            Symbol::Log => "log",
            Symbol::Exp => "exp",
            Symbol::Square => "sqr",
            Symbol::SquareRoot => "sqrt",
            Symbol::Absolute => "abs",
            Symbol::AnalyticQuotient => "aq",
            Symbol::SubFunction { name } => name.as_str(),
            Symbol::Cube => "cube",
            Symbol::CubeRoot => "cbrt",
            Symbol::Root => "root",
            Symbol::Logistic => "logistic",
            Symbol::Erf => "erf",
            Symbol::Min => "min",
            Symbol::Max => "max",
            _ => return None,
        };
        Some(name)
    }
}

/// A node of a symbolic expression tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub symbol: Symbol,
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node; its id is assigned once the node becomes part of a `Tree`
    pub fn new(symbol: Symbol, children: Vec<Node>) -> Self {
        Self {
            id: NodeId::default(),
            symbol,
            children,
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::weighted_variable(name, 1.0)
    }

    pub fn weighted_variable(name: impl Into<String>, weight: f64) -> Self {
        Self::new(
            Symbol::Variable {
                name: name.into(),
                weight,
            },
            Vec::new(),
        )
    }

    pub fn constant(value: f64) -> Self {
        Self::new(Symbol::Constant(value), Vec::new())
    }

    pub fn unary(symbol: Symbol, child: Node) -> Self {
        Self::new(symbol, vec![child])
    }

    pub fn binary(symbol: Symbol, left: Node, right: Node) -> Self {
        Self::new(symbol, vec![left, right])
    }

    pub fn add(children: Vec<Node>) -> Self {
        Self::new(Symbol::Add, children)
    }

    pub fn sub(children: Vec<Node>) -> Self {
        Self::new(Symbol::Sub, children)
    }

    pub fn mul(children: Vec<Node>) -> Self {
        Self::new(Symbol::Mul, children)
    }

    pub fn div(children: Vec<Node>) -> Self {
        Self::new(Symbol::Div, children)
    }

    pub fn variable_name(&self) -> Option<&str> {
        match &self.symbol {
            Symbol::Variable { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn constant_value(&self) -> Option<f64> {
        match self.symbol {
            Symbol::Constant(value) => Some(value),
            _ => None,
        }
    }

    pub fn contains_variable(&self, variable: &str) -> bool {
        self.variable_name() == Some(variable)
            || self
                .children
                .iter()
                .any(|child| child.contains_variable(variable))
    }

    /// Nodes in postfix order: children left to right, then the node itself
    pub fn iterate_postfix(&self) -> Vec<&Node> {
        let mut nodes = Vec::new();
        collect_postfix(self, &mut nodes);
        nodes
    }

    /// Nodes in pre-order: the node itself, then its children left to right
    pub fn iterate_prefix(&self) -> Vec<&Node> {
        let mut nodes = Vec::new();
        collect_prefix(self, &mut nodes);
        nodes
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Node::depth).max().unwrap_or(0)
    }

    pub fn length(&self) -> usize {
        1 + self.children.iter().map(Node::length).sum::<usize>()
    }

    fn assign_ids(&mut self, ids: &mut NodeIdGenerator) {
        self.id = ids.next_id();
        for child in &mut self.children {
            child.assign_ids(ids);
        }
    }
}

fn collect_postfix<'a>(node: &'a Node, nodes: &mut Vec<&'a Node>) {
    for child in &node.children {
        collect_postfix(child, nodes);
    }
    nodes.push(node);
}

fn collect_prefix<'a>(node: &'a Node, nodes: &mut Vec<&'a Node>) {
    nodes.push(node);
    for child in &node.children {
        collect_prefix(child, nodes);
    }
}

/// One step of a compiled tree: the node and how many children it consumes
#[derive(Debug, Clone, Copy)]
pub struct Instruction<'a> {
    pub node: &'a Node,
    pub arg_count: usize,
}

/// A symbolic expression tree with pre-order node ids
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: Node,
}

impl Tree {
    pub fn new(mut root: Node) -> Self {
        let mut ids = NodeIdGenerator::new();
        root.assign_ids(&mut ids);
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Linearize the tree in pre-order
    pub fn compile(&self) -> Vec<Instruction<'_>> {
        self.root
            .iterate_prefix()
            .into_iter()
            .map(|node| Instruction {
                node,
                arg_count: node.children.len(),
            })
            .collect()
    }

    pub fn iterate_postfix(&self) -> Vec<&Node> {
        self.root.iterate_postfix()
    }

    /// Distinct variable names in order of first postfix appearance
    pub fn variable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for node in self.iterate_postfix() {
            if let Some(name) = node.variable_name() {
                if !names.iter().any(|existing| existing == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// How often `variable` occurs in the tree
    pub fn occurrences(&self, variable: &str) -> usize {
        self.iterate_postfix()
            .into_iter()
            .filter(|node| node.variable_name() == Some(variable))
            .count()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn length(&self) -> usize {
        self.root.length()
    }
}

impl std::str::FromStr for Tree {
    type Err = crate::BoundError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_expression(source, &crate::ResourceLimits::default())
    }
}

// ---------------------------
// Display implementations
// ---------------------------

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Symbol::Variable { name, weight } => {
                if *weight == 1.0 {
                    write_variable_name(f, name)
                } else {
                    write!(f, "({} * ", weight)?;
                    write_variable_name(f, name)?;
                    write!(f, ")")
                }
            }
            Symbol::Constant(value) => {
                if *value < 0.0 {
                    write!(f, "({})", value)
                } else {
                    write!(f, "{}", value)
                }
            }
            Symbol::Add => write_infix(f, " + ", &self.children),
            Symbol::Mul => write_infix(f, " * ", &self.children),
            Symbol::Power => write_infix(f, " ^ ", &self.children),
            Symbol::Sub if self.children.len() == 1 => write!(f, "(-{})", self.children[0]),
            Symbol::Sub => write_infix(f, " - ", &self.children),
            Symbol::Div if self.children.len() == 1 => write!(f, "(1 / {})", self.children[0]),
            Symbol::Div => write_infix(f, " / ", &self.children),
            symbol => {
                let name = symbol.function_name().unwrap_or("?");
                write!(f, "{}(", name)?;
                for (i, child) in self.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_infix(f: &mut fmt::Formatter<'_>, operator: &str, children: &[Node]) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", operator)?;
        }
        write!(f, "{}", child)?;
    }
    write!(f, ")")
}

fn write_variable_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        write!(f, "{}", name)
    } else {
        write!(f, "'{}'", name)
    }
}
