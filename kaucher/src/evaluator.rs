//! Modal interval interpreter for expression trees
//!
//! A tree is compiled once into its pre-order instruction sequence, each
//! instruction resolved to an [`Opcode`]. Evaluation walks that sequence with
//! an explicit cursor: every instruction consumes exactly `arg_count`
//! recursively evaluated operands.

use crate::ast::NodeId;
use crate::interval::{ModalInterval, RangeMap};
use crate::tree::{Node, Symbol, Tree};
use crate::{BoundError, BoundResult};
use std::collections::HashMap;

/// Operations the modal interpreter can evaluate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Variable,
    Constant,
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
    SubFunction,
}

impl Opcode {
    /// The opcode evaluating `symbol`, or `None` if the interpreter does not
    /// support it. Both compilation and [`is_compatible`] go through here.
    pub fn of(symbol: &Symbol) -> Option<Opcode> {
        let opcode = match symbol {
            Symbol::Variable { .. } => Opcode::Variable,
            Symbol::Constant(_) => Opcode::Constant,
            Symbol::Add => Opcode::Add,
            Symbol::Sub => Opcode::Sub,
            Symbol::Mul => Opcode::Mul,
            Symbol::Div => Opcode::Div,
            Symbol::Sin => Opcode::Sin,
            Symbol::Cos => Opcode::Cos,
            Symbol::Tan => Opcode::Tan,
            Symbol::Tanh => Opcode::Tanh,
            Symbol::Log => Opcode::Log,
            Symbol::Exp => Opcode::Exp,
            Symbol::Square => Opcode::Square,
            Symbol::SquareRoot => Opcode::SquareRoot,
            Symbol::Power => Opcode::Power,
            Symbol::Absolute => Opcode::Absolute,
            Symbol::AnalyticQuotient => Opcode::AnalyticQuotient,
            Symbol::SubFunction { .. } => Opcode::SubFunction,
            Symbol::Cube
            | Symbol::CubeRoot
            | Symbol::Root
            | Symbol::Logistic
            | Symbol::Erf
            | Symbol::Min
            | Symbol::Max => return None,
        };
        Some(opcode)
    }

    fn accepts(self, arg_count: usize) -> bool {
        match self {
            Opcode::Variable | Opcode::Constant => arg_count == 0,
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => arg_count >= 1,
            Opcode::Power | Opcode::AnalyticQuotient => arg_count == 2,
            _ => arg_count == 1,
        }
    }
}

/// Whether every node of `tree` can be evaluated by the modal interpreter
pub fn is_compatible(tree: &Tree) -> bool {
    tree.iterate_postfix()
        .into_iter()
        .all(|node| Opcode::of(&node.symbol).is_some())
}

#[derive(Debug, Clone, Copy)]
struct Step<'a> {
    opcode: Opcode,
    node: &'a Node,
    arg_count: usize,
}

/// A tree compiled for repeated modal interval evaluation
#[derive(Debug, Clone)]
pub struct ModalIntervalEvaluator<'a> {
    code: Vec<Step<'a>>,
}

impl<'a> ModalIntervalEvaluator<'a> {
    /// Compile `tree`, failing on the first node the interpreter cannot handle
    pub fn compile(tree: &'a Tree) -> BoundResult<Self> {
        let mut code = Vec::with_capacity(tree.length());
        for instruction in tree.compile() {
            let node = instruction.node;
            let opcode = Opcode::of(&node.symbol).ok_or_else(|| BoundError::UnsupportedSymbol {
                symbol: node.symbol.name().to_string(),
                node: node.id,
            })?;
            if !opcode.accepts(instruction.arg_count) {
                return Err(BoundError::malformed(
                    node.id,
                    format!(
                        "{} cannot take {} operand(s)",
                        node.symbol.name(),
                        instruction.arg_count
                    ),
                ));
            }
            code.push(Step {
                opcode,
                node,
                arg_count: instruction.arg_count,
            });
        }
        Ok(Self { code })
    }

    /// Evaluate the compiled tree
    ///
    /// Variables are looked up in `overrides` first, then in `ranges`. Every
    /// variable must resolve before evaluation starts. When `node_intervals`
    /// is given, the interval of each visited node is recorded there; a node
    /// that already has an entry keeps it.
    pub fn evaluate(
        &self,
        ranges: &RangeMap,
        overrides: Option<&RangeMap>,
        node_intervals: Option<&mut HashMap<NodeId, ModalInterval>>,
    ) -> BoundResult<ModalInterval> {
        for step in &self.code {
            if let Symbol::Variable { name, .. } = &step.node.symbol {
                let known = overrides.is_some_and(|map| map.contains_key(name))
                    || ranges.contains_key(name);
                if !known {
                    return Err(BoundError::missing_range(name.as_str()));
                }
            }
        }

        let mut evaluation = Evaluation {
            code: &self.code,
            ranges,
            overrides,
            node_intervals,
            cursor: 0,
        };
        evaluation.next()
    }
}

struct Evaluation<'e, 'a> {
    code: &'e [Step<'a>],
    ranges: &'e RangeMap,
    overrides: Option<&'e RangeMap>,
    node_intervals: Option<&'e mut HashMap<NodeId, ModalInterval>>,
    cursor: usize,
}

impl Evaluation<'_, '_> {
    fn next(&mut self) -> BoundResult<ModalInterval> {
        let step = *self
            .code
            .get(self.cursor)
            .ok_or_else(|| BoundError::malformed(NodeId::default(), "Instruction stream ended early"))?;
        self.cursor += 1;

        let result = match step.opcode {
            Opcode::Variable => self.variable(step.node)?,
            Opcode::Constant => ModalInterval::point(step.node.constant_value().unwrap_or(f64::NAN)),

            Opcode::Add => self.fold(step.arg_count, |a, b| a + b)?,
            Opcode::Sub if step.arg_count == 1 => -self.next()?,
            Opcode::Sub => self.fold(step.arg_count, |a, b| a - b)?,
            Opcode::Mul => self.fold(step.arg_count, ModalInterval::multiply)?,
            Opcode::Div if step.arg_count == 1 => self.next()?.recip(),
            Opcode::Div => self.fold(step.arg_count, ModalInterval::divide)?,

            Opcode::Sin => self.next()?.sin(),
            Opcode::Cos => self.next()?.cos(),
            Opcode::Tan => self.next()?.tan(),
            Opcode::Tanh => self.next()?.tanh(),
            Opcode::Log => self.next()?.log(),
            Opcode::Exp => self.next()?.exp(),
            Opcode::Square => self.next()?.square(),
            Opcode::SquareRoot => self.next()?.sqrt(),
            Opcode::Absolute => self.next()?.abs(),
            Opcode::SubFunction => self.next()?,

            Opcode::Power => {
                let base = self.next()?;
                let exponent = self.next()?;
                if !exponent.is_degenerate() {
                    return Err(BoundError::UnsupportedExponent {
                        exponent: exponent.to_string(),
                    });
                }
                base.pow(exponent.lower())?
            }
            Opcode::AnalyticQuotient => {
                let numerator = self.next()?;
                let denominator = self.next()?;
                numerator.aq(denominator)
            }
        };

        if let Some(intervals) = self.node_intervals.as_deref_mut() {
            intervals.entry(step.node.id).or_insert(result);
        }
        Ok(result)
    }

    fn fold(
        &mut self,
        arg_count: usize,
        op: impl Fn(ModalInterval, ModalInterval) -> ModalInterval,
    ) -> BoundResult<ModalInterval> {
        let mut accumulated = self.next()?;
        for _ in 1..arg_count {
            accumulated = op(accumulated, self.next()?);
        }
        Ok(accumulated)
    }

    fn variable(&self, node: &Node) -> BoundResult<ModalInterval> {
        let Symbol::Variable { name, weight } = &node.symbol else {
            return Err(BoundError::malformed(node.id, "Expected a variable"));
        };
        let range = self
            .overrides
            .and_then(|map| map.get(name))
            .or_else(|| self.ranges.get(name))
            .ok_or_else(|| BoundError::missing_range(name.as_str()))?;
        Ok(range.multiply(ModalInterval::point(*weight)))
    }
}
