//! Top-level box tree for a parsed formula

use crate::box_tree::Span;
use crate::build_common::make_span;
use crate::build_layout::build_layout;
use crate::context::TypesetContext;
use crate::options::Options;
use crate::parser::parse_node::ParseNode;
use crate::style::Style;
use crate::types::{ParseError, Settings};

/// Layout options a formula starts out with.
#[must_use]
pub fn options_from_settings(settings: &Settings) -> Options {
    let style = if settings.display_mode {
        Style::Display
    } else {
        Style::Text
    };
    Options::builder()
        .style(style)
        .max_size(settings.max_size)
        .min_rule_thickness(settings.min_rule_thickness)
        .build()
}

fn display_wrap(node: Span, settings: &Settings) -> Span {
    if settings.display_mode {
        make_span(vec!["katex-display".to_owned()], vec![node.into()], None, None)
    } else {
        node
    }
}

/// Lay out a parse tree into the box tree handed to renderers: a `katex`
/// span around the formula's lines, inside a `katex-display` span in
/// display mode.
pub fn build_tree(
    ctx: &TypesetContext,
    tree: &[ParseNode],
    settings: &Settings,
) -> Result<Span, ParseError> {
    let options = options_from_settings(settings);
    let layout = build_layout(ctx, tree, &options)?;
    let katex = make_span(vec!["katex".to_owned()], vec![layout.into()], None, None);
    Ok(display_wrap(katex, settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mode_starts_in_display_style() {
        let settings = Settings::builder().display_mode(true).max_size(5.0).build();
        let options = options_from_settings(&settings);
        assert_eq!(options.style, Style::Display);
        assert_eq!(options.max_size, 5.0);
        assert_eq!(options.size, Options::BASESIZE);
        assert_eq!(options_from_settings(&Settings::default()).style, Style::Text);
    }

    #[test]
    fn empty_formulas_still_get_the_wrappers() {
        let ctx = TypesetContext::shared();
        let inline = build_tree(ctx, &[], &Settings::default()).unwrap();
        assert_eq!(inline.classes, ["katex"]);
        assert!(inline.children[0].has_class("katex-html"));

        let display = Settings::builder().display_mode(true).build();
        let block = build_tree(ctx, &[], &display).unwrap();
        assert_eq!(block.classes, ["katex-display"]);
        assert!(block.children[0].has_class("katex"));
    }
}
