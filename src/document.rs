//! Thin wrappers around the HCL parser and printers.
//!
//! Documents are held as [`hcl_edit`] bodies so that untouched attributes and
//! blocks are printed back exactly as they were read. Canonical output goes
//! through [`hcl::format`] instead.

use hcl_edit::Decorate;
use hcl_edit::expr::Expression;
use hcl_edit::structure::{Block, Body};

use crate::error::OverlayError;
use crate::types::OutputStyle;

/// A parsed HCL document together with the name it was read from.
///
/// The name only shows up in error messages.
#[derive(Debug, Clone)]
pub struct Document {
    pub body: Body,
    pub source_name: String,
}

impl Document {
    /// Parse `text` into a document.
    pub fn parse(text: &str, source_name: &str) -> Result<Self, OverlayError> {
        let body = hcl_edit::parser::parse_body(text).map_err(|e| OverlayError::Parse {
            source_name: source_name.into(),
            source: e,
        })?;
        Ok(Document {
            body,
            source_name: source_name.into(),
        })
    }

    /// Render the document and normalize the end of the text.
    pub fn render(&self, style: OutputStyle) -> Result<String, OverlayError> {
        render_body(&self.body, style)
    }
}

/// Parse a standalone attribute right-hand side, detached from any document.
pub fn parse_expression(text: &str, source_name: &str) -> Result<Expression, OverlayError> {
    hcl_edit::parser::parse_expr(text.trim()).map_err(|e| OverlayError::Parse {
        source_name: source_name.into(),
        source: e,
    })
}

/// Print `body` in the requested style.
///
/// Trailing whitespace is dropped and a single newline terminates the text.
/// An empty body renders as an empty string.
pub fn render_body(body: &Body, style: OutputStyle) -> Result<String, OverlayError> {
    let text = match style {
        OutputStyle::Preserve => body.to_string(),
        OutputStyle::Canonical => hcl::format::to_string(&hcl::Body::from(body.clone()))?,
    };
    Ok(terminate(&text))
}

fn terminate(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}

/// Put one blank line in front of `block`, keeping any comment that leads it.
pub(crate) fn separate(block: &mut Block) {
    let decor = block.decor_mut();
    let leading: String = decor
        .prefix()
        .map(|prefix| prefix.to_string())
        .unwrap_or_default();
    if !leading.starts_with('\n') {
        decor.set_prefix(format!("\n{leading}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reports_source_name() {
        let err = Document::parse("resource \"a\" {", "broken.hcl").unwrap_err();
        match err {
            OverlayError::Parse { source_name, .. } => assert_eq!(source_name, "broken.hcl"),
            other => panic!("Expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn preserve_keeps_comments() {
        let doc = Document::parse("# keep me\na = 1\n", "base.hcl").unwrap();
        let out = doc.render(OutputStyle::Preserve).unwrap();
        assert!(out.contains("# keep me"));
        assert!(out.contains("a = 1"));
    }

    #[test]
    fn render_ends_with_single_newline() {
        let doc = Document::parse("a = 1\n\n\n\n", "base.hcl").unwrap();
        let out = doc.render(OutputStyle::Preserve).unwrap();
        assert!(out.ends_with("1\n"));
        assert!(!out.ends_with("\n\n"));
    }

    #[test]
    fn empty_document_renders_empty() {
        let doc = Document::parse("", "base.hcl").unwrap();
        assert_eq!(doc.render(OutputStyle::Preserve).unwrap(), "");
        assert_eq!(doc.render(OutputStyle::Canonical).unwrap(), "");
    }

    #[test]
    fn canonical_reparses_to_same_structure() {
        let src = "a = 1\nresource \"aws_instance\" \"web\" {\n    ami = \"x\"\n}\n";
        let doc = Document::parse(src, "base.hcl").unwrap();
        let out = doc.render(OutputStyle::Canonical).unwrap();
        assert_eq!(hcl::parse(&out).unwrap(), hcl::parse(src).unwrap());
    }

    #[test]
    fn parse_expression_accepts_surrounding_whitespace() {
        let expr = parse_expression("  \"hello\"  ", "overlay.hcl").unwrap();
        assert_eq!(hcl::Expression::from(expr), hcl::Expression::from("hello"));
    }

    #[test]
    fn parse_expression_rejects_garbage() {
        let err = parse_expression("= =", "overlay.hcl").unwrap_err();
        assert!(matches!(err, OverlayError::Parse { .. }));
    }

    #[test]
    fn separate_adds_blank_line_once() {
        let mut doc = Document::parse("resource \"a\" \"b\" {}\n", "base.hcl").unwrap();
        let mut block = doc.body.blocks().next().unwrap().clone();
        separate(&mut block);
        separate(&mut block);
        doc.body.push(block);
        let out = doc.body.to_string();
        assert!(out.contains("}\n\nresource"));
        assert!(!out.contains("\n\n\nresource"));
    }
}
