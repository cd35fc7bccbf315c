//! Entry points: parse a formula, or parse and lay it out

use crate::box_tree::{BoxStyle, Span, SymbolNode};
use crate::build_common::make_span;
use crate::build_tree::build_tree;
use crate::context::TypesetContext;
use crate::parser::Parser;
use crate::parser::parse_node::ParseNode;
use crate::types::{ParseError, Settings};

/// The raw source drawn in `error_color`, standing in for a formula that
/// failed. With `throw_on_error` the error is returned instead.
fn error_fallback(error: ParseError, expression: &str, settings: &Settings) -> Result<Span, ParseError> {
    if settings.throw_on_error {
        return Err(error);
    }
    log::debug!("typesetting {expression:?} failed, drawing the source: {error}");
    let source = SymbolNode::builder().text(expression).build();
    Ok(make_span(
        vec!["katex-error".to_owned()],
        vec![source.into()],
        None,
        Some(BoxStyle {
            color: Some(settings.error_color.clone()),
            ..BoxStyle::default()
        }),
    ))
}

/// Parse `expression` into its parse tree.
///
/// Each call gets a fresh parser, so a `\color` or macro defined by one
/// formula never leaks into the next.
pub fn parse(ctx: &TypesetContext, expression: &str, settings: &Settings) -> Result<Vec<ParseNode>, ParseError> {
    let mut parser = Parser::new(expression, settings, ctx);
    parser.parse()
}

/// Parse and lay out `expression`.
///
/// Returns the `katex` span (inside a `katex-display` span in display
/// mode), or with `throw_on_error` unset, a `katex-error` span holding the
/// source when parsing or layout fails.
pub fn typeset(ctx: &TypesetContext, expression: &str, settings: &Settings) -> Result<Span, ParseError> {
    match parse(ctx, expression, settings).and_then(|tree| build_tree(ctx, &tree, settings)) {
        Ok(span) => Ok(span),
        Err(error) => error_fallback(error, expression, settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_tree::RenderNode;

    #[test]
    fn errors_are_returned_by_default() {
        let ctx = TypesetContext::shared();
        let err = typeset(ctx, "x^2^3", &Settings::default()).unwrap_err();
        assert_eq!(err.message(), "Double superscript");
    }

    #[test]
    fn errors_can_fall_back_to_the_source() {
        let ctx = TypesetContext::shared();
        let settings = Settings::builder().throw_on_error(false).build();
        let span = typeset(ctx, "x^2^3", &settings).unwrap();
        assert_eq!(span.classes, ["katex-error"]);
        assert_eq!(span.style.color.as_deref(), Some("#cc0000"));
        let [RenderNode::Symbol(source)] = span.children.as_slice() else {
            panic!("expected the source text");
        };
        assert_eq!(source.text, "x^2^3");
    }
}
