use ariadne::{Color, Label, Report, ReportKind, Source};
use kaucher::BoundError;

/// Format a BoundError for the terminal
///
/// Parse errors are drawn against `source` (its id and text) with Ariadne
/// when it is available.
pub fn format_error(error: &BoundError, source: Option<(&str, &str)>) -> String {
    match (error, source) {
        (BoundError::Parse { message, span }, Some((source_id, source_text))) => {
            let mut output = Vec::new();
            let end = span.end.max(span.start + 1).min(source_text.len());
            let start = span.start.min(end);

            let report = Report::build(ReportKind::Error, source_id, start)
                .with_message(format!(
                    "Parse error: {} (in {} at line {})",
                    message, source_id, span.line
                ))
                .with_label(
                    Label::new((source_id, start..end))
                        .with_message(message)
                        .with_color(Color::Red),
                )
                .finish();

            match report.write((source_id, Source::from(source_text)), &mut output) {
                Ok(_) => String::from_utf8_lossy(&output).to_string(),
                Err(_) => {
                    // Fallback to simple format
                    format!("{}", error)
                }
            }
        }
        (
            BoundError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
                suggestion,
            },
            _,
        ) => {
            format!(
                "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            )
        }
        (BoundError::UnsupportedSymbol { symbol, .. }, _) => format!(
            "{}\n  The modal interval engine cannot evaluate '{}'; rewrite the model without it",
            error, symbol
        ),
        _ => format!("Error: {}", error),
    }
}
