//! Lint pass over the expressions of a template

use super::syntax::{is_directive, TOKEN};
use crate::error::ExpressionError;
use crate::expression::parse_expression;

/// Report every `{{expr}}` token whose expression does not parse
///
/// Spans point into `raw`. Such tokens still render (they stay as literal
/// placeholders unless the text happens to be a variable key), so this is
/// advisory only.
pub fn check_expressions(raw: &str) -> Vec<ExpressionError> {
    let mut errors = Vec::new();

    for caps in TOKEN.captures_iter(raw) {
        let Some(inner) = caps.get(1) else {
            continue;
        };
        if is_directive(inner.as_str()) {
            continue;
        }
        if let Err(errs) = parse_expression(inner.as_str()) {
            errors.extend(errs.into_iter().map(|e| e.offset(inner.start())));
        }
    }

    errors
}
