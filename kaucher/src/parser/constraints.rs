use crate::ast::Span;
use crate::error::BoundError;
use crate::parser::expressions::parse_variable_name;
use crate::parser::{from_pest_error, KaucherParser, Rule};
use crate::resource_limits::ResourceLimits;
use crate::{BoundResult, Interval, IntervalCollection, ShapeConstraint};
use pest::iterators::Pair;
use pest::Parser;

/// Parse a block of shape constraints, one per line
///
/// Blank lines and `#` comments are skipped. Parse errors report the line
/// within `source`.
///
/// ```text
/// # output stays positive
/// f in [0 .. inf]
/// ∂f/∂x in [0 .. inf], x in [0 .. 1], weight: 2
/// ```
pub fn parse_constraints(
    source: &str,
    limits: &ResourceLimits,
) -> BoundResult<Vec<ShapeConstraint>> {
    limits.check_source(source)?;

    let mut constraints = Vec::new();
    let mut offset = 0;
    for (index, raw_line) in source.split('\n').enumerate() {
        let line_start = offset + (raw_line.len() - raw_line.trim_start().len());
        offset += raw_line.len() + 1;

        let line = raw_line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let constraint = parse_constraint(line).map_err(|error| match error {
            BoundError::Parse { message, span } => BoundError::Parse {
                message,
                span: Span {
                    start: line_start + span.start,
                    end: line_start + span.end,
                    line: index + 1,
                    col: span.col,
                },
            },
            other => other,
        })?;
        constraints.push(constraint);
    }
    Ok(constraints)
}

/// Parse a single shape constraint such as `∂²f/∂x² in [-inf .. 0]`
pub fn parse_constraint(line: &str) -> BoundResult<ShapeConstraint> {
    let pair = KaucherParser::parse(Rule::constraint_line, line)
        .map_err(from_pest_error)?
        .next()
        .ok_or_else(|| BoundError::parse("Empty constraint", Span::default()))?;

    let mut target = None;
    let mut variable = None;
    let mut derivations = 0;
    let mut regions = None;
    let mut weight = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::constraint_target => {
                if let Some((name, order)) = parse_target(inner)? {
                    variable = Some(name);
                    derivations = order;
                }
            }
            Rule::bound_interval => target = Some(parse_interval(inner)?),
            Rule::region_list => regions = Some(parse_regions(inner)?),
            Rule::weight_clause => weight = Some(parse_weight(inner)?),
            _ => {}
        }
    }

    let target = target.ok_or_else(|| BoundError::parse("Missing target interval", Span::default()))?;
    let mut constraint = match variable {
        Some(name) => ShapeConstraint::derivative(target, name, derivations),
        None => ShapeConstraint::new(target),
    };
    if let Some(regions) = regions {
        constraint = constraint.with_regions(regions);
    }
    if let Some(weight) = weight {
        constraint = constraint.with_weight(weight);
    }
    Ok(constraint)
}

fn span_of(pair: &Pair<Rule>) -> Span {
    Span::from_pest_span(pair.as_span())
}

/// `None` for `f`, the variable and derivative order for `∂ⁿf/∂xⁿ`
fn parse_target(pair: Pair<Rule>) -> BoundResult<Option<(String, u32)>> {
    let span = span_of(&pair);
    let target = pair
        .into_inner()
        .next()
        .ok_or_else(|| BoundError::parse("Empty constraint target", span.clone()))?;
    if target.as_rule() == Rule::function_target {
        return Ok(None);
    }

    let mut orders = Vec::new();
    let mut variable = None;
    for inner in target.into_inner() {
        match inner.as_rule() {
            Rule::order => orders.push(order_of(inner.as_str())),
            Rule::constraint_variable => variable = Some(parse_variable_name(inner)?),
            _ => {}
        }
    }

    let variable =
        variable.ok_or_else(|| BoundError::parse("Missing derivative variable", span.clone()))?;
    let order = match orders.as_slice() {
        [] => 1,
        [numerator, denominator] if numerator == denominator => *numerator,
        _ => {
            return Err(BoundError::parse(
                "Derivative order must appear on both ∂f and ∂x",
                span,
            ))
        }
    };
    Ok(Some((variable, order)))
}

fn order_of(superscript: &str) -> u32 {
    match superscript {
        "³" => 3,
        _ => 2,
    }
}

fn parse_interval(pair: Pair<Rule>) -> BoundResult<Interval> {
    // bound_interval = { "[" ~ bound ~ ".." ~ bound ~ "]" }
    let span = span_of(&pair);
    let bounds = pair
        .into_inner()
        .map(|bound| parse_bound(&bound))
        .collect::<BoundResult<Vec<_>>>()?;
    match bounds.as_slice() {
        [lower, upper] => Interval::new(*lower, *upper).map_err(|e| BoundError::parse(e.to_string(), span)),
        _ => Err(BoundError::parse("Interval needs a lower and an upper bound", span)),
    }
}

fn parse_bound(pair: &Pair<Rule>) -> BoundResult<f64> {
    let text = pair.as_str();
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let value = match magnitude {
        "inf" | "∞" => f64::INFINITY,
        number => number.parse::<f64>().map_err(|e| {
            BoundError::parse(format!("Invalid bound '{}': {}", text, e), span_of(pair))
        })?,
    };
    Ok(if negative { -value } else { value })
}

fn parse_regions(pair: Pair<Rule>) -> BoundResult<IntervalCollection> {
    let mut regions = IntervalCollection::new();
    for region in pair.into_inner() {
        let span = span_of(&region);
        let mut inner = region.into_inner();
        let (Some(name), Some(interval)) = (inner.next(), inner.next()) else {
            return Err(BoundError::parse("Region needs a variable and an interval", span));
        };
        regions.set_interval(parse_variable_name(name)?, parse_interval(interval)?);
    }
    Ok(regions)
}

fn parse_weight(pair: Pair<Rule>) -> BoundResult<f64> {
    let span = span_of(&pair);
    let bound = pair
        .into_inner()
        .next()
        .ok_or_else(|| BoundError::parse("Missing weight", span))?;
    parse_bound(&bound)
}
