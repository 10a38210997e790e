use crate::ast::Span;
use crate::error::BoundError;
use pest_derive::Parser;

pub mod constraints;
pub mod expressions;

pub use constraints::{parse_constraint, parse_constraints};
pub use expressions::parse_expression;

#[derive(Parser)]
#[grammar = "src/parser/kaucher.pest"]
pub struct KaucherParser;

/// Convert a pest error into a parse error carrying its location
pub(crate) fn from_pest_error(error: pest::error::Error<Rule>) -> BoundError {
    let (start, end) = match error.location {
        pest::error::InputLocation::Pos(pos) => (pos, pos),
        pest::error::InputLocation::Span((start, end)) => (start, end),
    };
    let (line, col) = match error.line_col {
        pest::error::LineColLocation::Pos((line, col)) => (line, col),
        pest::error::LineColLocation::Span((line, col), _) => (line, col),
    };

    BoundError::parse(
        error.variant.message().to_string(),
        Span {
            start,
            end,
            line,
            col,
        },
    )
}
