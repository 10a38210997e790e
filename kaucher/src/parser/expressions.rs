use crate::ast::Span;
use crate::error::BoundError;
use crate::parser::{from_pest_error, KaucherParser, Rule};
use crate::resource_limits::ResourceLimits;
use crate::tree::{Node, Symbol, Tree};
use crate::BoundResult;
use pest::iterators::Pair;
use pest::Parser;

/// Parse an infix model expression such as `2.5 * x + sin(y) ^ 2`
pub fn parse_expression(source: &str, limits: &ResourceLimits) -> BoundResult<Tree> {
    limits.check_source(source)?;

    let file = KaucherParser::parse(Rule::expression_file, source)
        .map_err(from_pest_error)?
        .next()
        .ok_or_else(|| BoundError::parse("Empty expression", Span::default()))?;

    let expression = file
        .into_inner()
        .find(|pair| pair.as_rule() == Rule::expression)
        .ok_or_else(|| BoundError::parse("Empty expression", Span::default()))?;

    let tree = Tree::new(parse_sum(expression)?);
    limits.check_tree(&tree)?;
    Ok(tree)
}

fn span_of(pair: &Pair<Rule>) -> Span {
    Span::from_pest_span(pair.as_span())
}

fn first_inner<'a>(pair: Pair<'a, Rule>, what: &str) -> BoundResult<Pair<'a, Rule>> {
    let span = span_of(&pair);
    pair.into_inner()
        .next()
        .ok_or_else(|| BoundError::parse(format!("Empty {}", what), span))
}

/// Append `operand` to a chain of the same n-ary operator, or start one.
/// Unary `-x` and `1/x` nodes are never extended.
fn extend_chain(accumulated: Node, symbol: Symbol, operand: Node) -> Node {
    if accumulated.symbol == symbol && accumulated.children.len() >= 2 {
        let mut chain = accumulated;
        chain.children.push(operand);
        chain
    } else {
        Node::binary(symbol, accumulated, operand)
    }
}

fn parse_sum(pair: Pair<Rule>) -> BoundResult<Node> {
    // expression = { term ~ (add_op ~ term)* }
    let span = span_of(&pair);
    let mut inner = pair.into_inner();
    let first = inner
        .next()
        .ok_or_else(|| BoundError::parse("Empty expression", span.clone()))?;
    let mut node = parse_term(first)?;

    while let Some(op) = inner.next() {
        let operand = inner
            .next()
            .ok_or_else(|| BoundError::parse("Missing operand", span_of(&op)))?;
        let symbol = match op.as_str() {
            "+" => Symbol::Add,
            _ => Symbol::Sub,
        };
        node = extend_chain(node, symbol, parse_term(operand)?);
    }

    Ok(node)
}

fn parse_term(pair: Pair<Rule>) -> BoundResult<Node> {
    // term = { unary ~ (mul_op ~ unary)* }
    let span = span_of(&pair);
    let mut inner = pair.into_inner();
    let first = inner
        .next()
        .ok_or_else(|| BoundError::parse("Empty term", span.clone()))?;
    let mut node = parse_unary(first)?;

    while let Some(op) = inner.next() {
        let operand = inner
            .next()
            .ok_or_else(|| BoundError::parse("Missing operand", span_of(&op)))?;
        let symbol = match op.as_str() {
            "*" => Symbol::Mul,
            _ => Symbol::Div,
        };
        node = extend_chain(node, symbol, parse_unary(operand)?);
    }

    Ok(node)
}

fn parse_unary(pair: Pair<Rule>) -> BoundResult<Node> {
    // unary = { negation ~ unary | power }
    let span = span_of(&pair);
    let mut inner = pair.into_inner();
    let first = inner
        .next()
        .ok_or_else(|| BoundError::parse("Empty operand", span.clone()))?;
    if first.as_rule() != Rule::negation {
        return parse_power(first);
    }

    let operand = inner
        .next()
        .ok_or_else(|| BoundError::parse("Missing operand after '-'", span))?;
    let node = parse_unary(operand)?;
    match node.constant_value() {
        Some(value) => Ok(Node::constant(-value)),
        None => Ok(Node::sub(vec![node])),
    }
}

fn parse_power(pair: Pair<Rule>) -> BoundResult<Node> {
    // power = { primary ~ ("^" ~ unary)? }
    let span = span_of(&pair);
    let mut inner = pair.into_inner();
    let base = inner
        .next()
        .ok_or_else(|| BoundError::parse("Empty power", span))?;
    let base = parse_primary(base)?;

    match inner.next() {
        Some(exponent) => Ok(Node::binary(Symbol::Power, base, parse_unary(exponent)?)),
        None => Ok(base),
    }
}

fn parse_primary(pair: Pair<Rule>) -> BoundResult<Node> {
    // primary = { number | call | variable | "(" ~ expression ~ ")" }
    let inner = first_inner(pair, "primary expression")?;
    match inner.as_rule() {
        Rule::number => parse_number(&inner).map(Node::constant),
        Rule::call => parse_call(inner),
        Rule::variable => parse_variable_name(inner).map(Node::variable),
        Rule::expression => parse_sum(inner),
        _ => Err(BoundError::parse(
            format!("Unexpected token '{}'", inner.as_str()),
            span_of(&inner),
        )),
    }
}

fn parse_number(pair: &Pair<Rule>) -> BoundResult<f64> {
    pair.as_str().parse::<f64>().map_err(|e| {
        BoundError::parse(
            format!("Invalid number '{}': {}", pair.as_str(), e),
            span_of(pair),
        )
    })
}

/// Name of a `variable` or `constraint_variable` pair, unquoted
pub(crate) fn parse_variable_name(pair: Pair<Rule>) -> BoundResult<String> {
    let inner = first_inner(pair, "variable")?;
    match inner.as_rule() {
        Rule::quoted_identifier => Ok(first_inner(inner, "quoted name")?.as_str().to_string()),
        _ => Ok(inner.as_str().to_string()),
    }
}

/// How many arguments a function accepts
enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

fn function_symbol(name: &str) -> Option<(Symbol, Arity)> {
    let entry = match name {
        "sin" => (Symbol::Sin, Arity::Exactly(1)),
        "cos" => (Symbol::Cos, Arity::Exactly(1)),
        "tan" => (Symbol::Tan, Arity::Exactly(1)),
        "tanh" => (Symbol::Tanh, Arity::Exactly(1)),
        "log" => (Symbol::Log, Arity::Exactly(1)),
        "exp" => (Symbol::Exp, Arity::Exactly(1)),
        "sqr" | "square" => (Symbol::Square, Arity::Exactly(1)),
        "sqrt" => (Symbol::SquareRoot, Arity::Exactly(1)),
        "abs" => (Symbol::Absolute, Arity::Exactly(1)),
        "aq" => (Symbol::AnalyticQuotient, Arity::Exactly(2)),
        "pow" => (Symbol::Power, Arity::Exactly(2)),
        "cube" => (Symbol::Cube, Arity::Exactly(1)),
        "cbrt" => (Symbol::CubeRoot, Arity::Exactly(1)),
        "root" => (Symbol::Root, Arity::Exactly(2)),
        "logistic" => (Symbol::Logistic, Arity::Exactly(1)),
        "erf" => (Symbol::Erf, Arity::Exactly(1)),
        "min" => (Symbol::Min, Arity::AtLeast(2)),
        "max" => (Symbol::Max, Arity::AtLeast(2)),
        _ => return None,
    };
    Some(entry)
}

fn parse_call(pair: Pair<Rule>) -> BoundResult<Node> {
    // call = { identifier ~ "(" ~ expression ~ ("," ~ expression)* ~ ")" }
    let span = span_of(&pair);
    let mut inner = pair.into_inner();
    let name = inner
        .next()
        .ok_or_else(|| BoundError::parse("Missing function name", span.clone()))?
        .as_str()
        .to_string();
    let arguments = inner.map(parse_sum).collect::<BoundResult<Vec<_>>>()?;

    let (symbol, arity) = function_symbol(&name)
        .ok_or_else(|| BoundError::parse(format!("Unknown function '{}'", name), span.clone()))?;

    let accepted = match arity {
        Arity::Exactly(n) => arguments.len() == n,
        Arity::AtLeast(n) => arguments.len() >= n,
    };
    if !accepted {
        return Err(BoundError::parse(
            format!(
                "Function '{}' does not take {} argument(s)",
                name,
                arguments.len()
            ),
            span,
        ));
    }

    Ok(Node::new(symbol, arguments))
}
