//! Symbolic differentiation of expression trees
//!
//! `derive` builds a new tree for the partial derivative with respect to one
//! variable. Results are folded as they are built: zero terms vanish, unit
//! factors disappear and constant operands are combined, so the derivative
//! of a subtree that does not mention the variable is the constant `0`.

use crate::tree::{Node, Symbol, Tree};
use crate::{BoundError, BoundResult};

/// Partial derivative of `tree` with respect to `variable`
pub fn derive(tree: &Tree, variable: &str) -> BoundResult<Tree> {
    let root = derive_node(tree.root(), variable)?;
    Ok(Tree::new(root))
}

fn derive_node(node: &Node, variable: &str) -> BoundResult<Node> {
    if !node.contains_variable(variable) {
        return Ok(Node::constant(0.0));
    }

    match &node.symbol {
        Symbol::Variable { name, weight } => {
            if name == variable {
                Ok(Node::constant(*weight))
            } else {
                Ok(Node::constant(0.0))
            }
        }
        Symbol::Constant(_) => Ok(Node::constant(0.0)),

        Symbol::Add => {
            let terms = derive_all(&node.children, variable)?;
            Ok(sum(terms))
        }
        Symbol::Sub => {
            let mut terms = derive_all(&node.children, variable)?.into_iter();
            let first = terms
                .next()
                .ok_or_else(|| BoundError::malformed(node.id, "Subtraction without operands"))?;
            if node.children.len() == 1 {
                return Ok(negate(first));
            }
            Ok(difference(first, sum(terms.collect())))
        }
        Symbol::Mul => {
            // (f g h)' = f' g h + f g' h + f g h'
            let mut terms = Vec::with_capacity(node.children.len());
            for (i, child) in node.children.iter().enumerate() {
                let mut factors: Vec<Node> = node.children.clone();
                factors[i] = derive_node(child, variable)?;
                terms.push(product(factors));
            }
            Ok(sum(terms))
        }
        Symbol::Div => {
            let (first, rest) = node
                .children
                .split_first()
                .ok_or_else(|| BoundError::malformed(node.id, "Division without operands"))?;
            if rest.is_empty() {
                // (1/g)' = -g' / g²
                let derivative = derive_node(first, variable)?;
                return Ok(negate(quotient(derivative, square(first.clone()))));
            }

            let denominator = if rest.len() == 1 {
                rest[0].clone()
            } else {
                Node::mul(rest.to_vec())
            };
            let numerator_derivative = derive_node(first, variable)?;
            let denominator_derivative = derive_node(&denominator, variable)?;
            let numerator = difference(
                product(vec![numerator_derivative, denominator.clone()]),
                product(vec![first.clone(), denominator_derivative]),
            );
            Ok(quotient(numerator, square(denominator)))
        }

        Symbol::Sin => {
            let (f, df) = unary_parts(node, variable)?;
            Ok(product(vec![Node::unary(Symbol::Cos, f), df]))
        }
        Symbol::Cos => {
            let (f, df) = unary_parts(node, variable)?;
            Ok(negate(product(vec![Node::unary(Symbol::Sin, f), df])))
        }
        Symbol::Tan => {
            let (f, df) = unary_parts(node, variable)?;
            Ok(quotient(df, square(Node::unary(Symbol::Cos, f))))
        }
        Symbol::Tanh => {
            let (f, df) = unary_parts(node, variable)?;
            let sech_squared = difference(Node::constant(1.0), square(Node::unary(Symbol::Tanh, f)));
            Ok(product(vec![df, sech_squared]))
        }
        Symbol::Exp => {
            let (f, df) = unary_parts(node, variable)?;
            Ok(product(vec![Node::unary(Symbol::Exp, f), df]))
        }
        Symbol::Log => {
            let (f, df) = unary_parts(node, variable)?;
            Ok(quotient(df, f))
        }
        Symbol::Square => {
            let (f, df) = unary_parts(node, variable)?;
            Ok(product(vec![Node::constant(2.0), f, df]))
        }
        Symbol::SquareRoot => {
            let (f, df) = unary_parts(node, variable)?;
            let denominator = product(vec![Node::constant(2.0), Node::unary(Symbol::SquareRoot, f)]);
            Ok(quotient(df, denominator))
        }
        Symbol::Absolute => {
            // |f|' = f' * f / |f|
            let (f, df) = unary_parts(node, variable)?;
            let sign = quotient(f.clone(), Node::unary(Symbol::Absolute, f));
            Ok(product(vec![df, sign]))
        }
        Symbol::Power => derive_power(node, variable),
        Symbol::AnalyticQuotient => {
            // aq(a, b)' = aq(a', b) - a b b' / (1 + b²)^(3/2)
            let (a, b) = binary_children(node)?;
            let da = derive_node(a, variable)?;
            let db = derive_node(b, variable)?;
            let first = analytic_quotient(da, b.clone());
            let cross = product(vec![a.clone(), b.clone(), db]);
            let second = quotient(
                analytic_quotient(cross, b.clone()),
                sum(vec![Node::constant(1.0), square(b.clone())]),
            );
            Ok(difference(first, second))
        }
        Symbol::SubFunction { .. } => {
            let child = single_child(node)?;
            derive_node(child, variable)
        }

        Symbol::Cube
        | Symbol::CubeRoot
        | Symbol::Root
        | Symbol::Logistic
        | Symbol::Erf
        | Symbol::Min
        | Symbol::Max => Err(BoundError::UnsupportedSymbol {
            symbol: node.symbol.name().to_string(),
            node: node.id,
        }),
    }
}

fn derive_power(node: &Node, variable: &str) -> BoundResult<Node> {
    let (base, exponent) = binary_children(node)?;
    let n = match exponent.constant_value() {
        Some(value) if value.is_finite() && value.fract() == 0.0 => value,
        _ => {
            return Err(BoundError::UnsupportedExponent {
                exponent: exponent.to_string(),
            })
        }
    };

    let derivative = derive_node(base, variable)?;
    if n == 0.0 {
        return Ok(Node::constant(0.0));
    }
    let outer = if n == 1.0 {
        Node::constant(1.0)
    } else if n == 2.0 {
        product(vec![Node::constant(2.0), base.clone()])
    } else {
        product(vec![
            Node::constant(n),
            Node::binary(Symbol::Power, base.clone(), Node::constant(n - 1.0)),
        ])
    };
    Ok(product(vec![outer, derivative]))
}

fn derive_all(children: &[Node], variable: &str) -> BoundResult<Vec<Node>> {
    children
        .iter()
        .map(|child| derive_node(child, variable))
        .collect()
}

fn single_child(node: &Node) -> BoundResult<&Node> {
    match node.children.as_slice() {
        [child] => Ok(child),
        children => Err(BoundError::malformed(
            node.id,
            format!("{} expects 1 operand, found {}", node.symbol.name(), children.len()),
        )),
    }
}

fn binary_children(node: &Node) -> BoundResult<(&Node, &Node)> {
    match node.children.as_slice() {
        [left, right] => Ok((left, right)),
        children => Err(BoundError::malformed(
            node.id,
            format!("{} expects 2 operands, found {}", node.symbol.name(), children.len()),
        )),
    }
}

/// The operand of a unary function and its derivative
fn unary_parts(node: &Node, variable: &str) -> BoundResult<(Node, Node)> {
    let child = single_child(node)?;
    Ok((child.clone(), derive_node(child, variable)?))
}

// ---------------------------
// Folding constructors
// ---------------------------

fn is_constant(node: &Node, value: f64) -> bool {
    node.constant_value() == Some(value)
}

fn sum(terms: Vec<Node>) -> Node {
    let mut constant = 0.0;
    let mut rest = Vec::new();
    for term in terms {
        match term.constant_value() {
            Some(value) => constant += value,
            None => rest.push(term),
        }
    }
    if constant != 0.0 {
        rest.push(Node::constant(constant));
    }

    match rest.len() {
        0 => Node::constant(0.0),
        1 => rest.remove(0),
        _ => Node::add(rest),
    }
}

fn difference(minuend: Node, subtrahend: Node) -> Node {
    match (minuend.constant_value(), subtrahend.constant_value()) {
        (Some(a), Some(b)) => Node::constant(a - b),
        (_, Some(b)) if b == 0.0 => minuend,
        (Some(a), _) if a == 0.0 => negate(subtrahend),
        _ => Node::sub(vec![minuend, subtrahend]),
    }
}

fn negate(node: Node) -> Node {
    if let Some(value) = node.constant_value() {
        return Node::constant(-value);
    }
    if node.symbol == Symbol::Sub && node.children.len() == 1 {
        let mut node = node;
        return node.children.remove(0);
    }
    Node::sub(vec![node])
}

fn product(factors: Vec<Node>) -> Node {
    let mut constant = 1.0;
    let mut rest = Vec::new();
    for factor in factors {
        match factor.constant_value() {
            Some(value) => constant *= value,
            None => rest.push(factor),
        }
    }
    if constant == 0.0 {
        return Node::constant(0.0);
    }
    if rest.is_empty() {
        return Node::constant(constant);
    }
    if constant == -1.0 {
        return negate(product(rest));
    }
    if constant != 1.0 {
        rest.insert(0, Node::constant(constant));
    }

    match rest.len() {
        1 => rest.remove(0),
        _ => Node::mul(rest),
    }
}

fn quotient(numerator: Node, denominator: Node) -> Node {
    if is_constant(&numerator, 0.0) {
        return Node::constant(0.0);
    }
    if is_constant(&denominator, 1.0) {
        return numerator;
    }
    match (numerator.constant_value(), denominator.constant_value()) {
        (Some(a), Some(b)) if b != 0.0 => Node::constant(a / b),
        _ => Node::div(vec![numerator, denominator]),
    }
}

fn square(node: Node) -> Node {
    match node.constant_value() {
        Some(value) => Node::constant(value * value),
        None => Node::unary(Symbol::Square, node),
    }
}

fn analytic_quotient(numerator: Node, denominator: Node) -> Node {
    if is_constant(&numerator, 0.0) {
        return Node::constant(0.0);
    }
    Node::binary(Symbol::AnalyticQuotient, numerator, denominator)
}
