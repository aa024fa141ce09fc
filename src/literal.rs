//! Reduce attribute expressions to literal values.
//!
//! Evaluation runs with an empty [`Context`]: no variables, no functions. An
//! expression that needs either is not an error here, it is simply
//! [`Literal::Unevaluable`]. Callers decide whether that is fatal.

use hcl::eval::{Context, Evaluate};
use hcl_edit::expr::Expression;

use crate::document::parse_expression;
use crate::error::OverlayError;

/// Outcome of evaluating an expression without any variable context.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// The expression reduced to a plain value.
    Value(hcl::Value),
    /// The expression references variables or calls functions.
    Unevaluable(String),
}

/// Evaluate `expr` to a literal.
///
/// The expression is printed and re-parsed on its own first, so nothing from
/// the document it came from leaks into evaluation. Only a failure to re-parse
/// is an error.
pub fn evaluate(expr: &Expression, source_name: &str) -> Result<Literal, OverlayError> {
    let standalone = parse_expression(&expr.to_string(), source_name)?;
    let expr = hcl::Expression::from(standalone);
    Ok(match expr.evaluate(&Context::new()) {
        Ok(value) => Literal::Value(value),
        Err(errors) => Literal::Unevaluable(errors.to_string()),
    })
}
