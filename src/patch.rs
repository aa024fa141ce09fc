//! Attribute patching: copy overlay attributes onto a base body.
//!
//! There are two ways an attribute lands on the base:
//!
//! - **by value** ([`set_attribute_value`]): the overlay expression is reduced
//!   to a literal and printed back in canonical form. This is how overlay
//!   attributes overwrite base attributes.
//! - **by raw tokens** ([`set_attribute_raw`]): the overlay attribute is copied
//!   as written, references and function calls included. Only used for names
//!   the base does not have yet.

use hcl_edit::Decorate;
use hcl_edit::expr::Expression;
use hcl_edit::structure::{Attribute, Body};
use tracing::debug;

use crate::error::OverlayError;
use crate::literal::{self, Literal};

/// Overwrite or add every overlay attribute on `base`, by value.
///
/// The first overlay attribute that is not a literal fails the whole patch.
/// Attributes set before the failure stay set. Base blocks are not touched.
pub fn patch_attributes(
    base: &mut Body,
    overlay: &Body,
    source_name: &str,
) -> Result<(), OverlayError> {
    for attr in overlay.attributes() {
        match literal::evaluate(&attr.value, source_name)? {
            Literal::Value(value) => set_attribute_value(base, attr, value),
            Literal::Unevaluable(reason) => {
                return Err(OverlayError::Evaluation {
                    attribute: attr.key.as_str().to_string(),
                    source_name: source_name.into(),
                    reason,
                });
            }
        }
    }
    Ok(())
}

/// Like [`patch_attributes`], but non-literal attributes are skipped instead of
/// failing. Returns the skipped attributes with the evaluation failure reason.
pub fn patch_literal_attributes(
    base: &mut Body,
    overlay: &Body,
    source_name: &str,
) -> Result<Vec<(String, String)>, OverlayError> {
    let mut skipped = Vec::new();
    for attr in overlay.attributes() {
        match literal::evaluate(&attr.value, source_name)? {
            Literal::Value(value) => set_attribute_value(base, attr, value),
            Literal::Unevaluable(reason) => {
                debug!(attribute = %attr.key.as_str(), %reason, "skipping non-literal attribute");
                skipped.push((attr.key.as_str().to_string(), reason));
            }
        }
    }
    Ok(skipped)
}

/// Insert or overwrite `attribute` on `body` with the canonical form of `value`.
///
/// An existing attribute keeps its position and key formatting; only the
/// right-hand side is replaced. A new attribute is appended to the body,
/// indented the way the overlay attribute was.
pub fn set_attribute_value(body: &mut Body, attribute: &Attribute, value: hcl::Value) {
    let name = attribute.key.as_str();
    let expr = Expression::from(hcl::Expression::from(value));
    if let Some(mut existing) = body.get_attribute_mut(name) {
        debug!(attribute = %name, "overwriting attribute");
        *existing.value_mut() = expr;
    } else {
        debug!(attribute = %name, "adding attribute");
        let mut added = Attribute::new(attribute.key.clone(), expr);
        added.decor_mut().set_prefix(indentation(attribute));
        body.push(added);
    }
}

/// Leading whitespace of the line `attribute` starts on.
fn indentation(attribute: &Attribute) -> String {
    let prefix = attribute
        .decor()
        .prefix()
        .map(|prefix| prefix.to_string())
        .unwrap_or_default();
    let line = prefix.rsplit('\n').next().unwrap_or_default();
    line.chars().take_while(|c| *c == ' ' || *c == '\t').collect()
}

/// Add `attribute` to `body` exactly as written.
///
/// Callers only use this for names the body does not have yet, so the
/// attribute key stays unique within the body.
pub fn set_attribute_raw(body: &mut Body, attribute: &Attribute) {
    debug!(attribute = %attribute.key.as_str(), "copying attribute verbatim");
    body.push(attribute.clone());
}
