//! `\verb` literals, set in typewriter type. The parser reads the literal
//! itself, so only the builder is registered.

use crate::box_tree::RenderNode;
use crate::build_common::{make_span, make_symbol};
use crate::context::TypesetContext;
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeVerb, assert_node_type};
use crate::types::ParseError;

/// Registers `\verb`
pub fn define_verb(ctx: &mut TypesetContext) {
    ctx.define_builder(NodeType::Verb, builder);
}

/// The literal with its spaces made visible (`\verb*`) or unbreakable.
fn verb_text(group: &ParseNodeVerb) -> String {
    group
        .body
        .replace(' ', if group.star { "\u{2423}" } else { "\u{a0}" })
}

fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Verb(group) = node else {
        assert_node_type(node, NodeType::Verb)?;
        return Err(ParseError::new("Expected Verb node"));
    };

    let new_options = options.having_style(options.style.text());
    let body = verb_text(group)
        .chars()
        .map(|ch| {
            let classes = vec!["mord".to_owned(), "texttt".to_owned()];
            make_symbol(ctx, &ch.to_string(), "Typewriter-Regular", group.mode, Some(&new_options), classes)
                .map(RenderNode::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut classes = vec!["mord".to_owned(), "text".to_owned()];
    classes.extend(new_options.sizing_classes(options));
    Ok(make_span(classes, body, Some(&new_options), None).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;

    fn verb(body: &str, star: bool) -> ParseNodeVerb {
        ParseNodeVerb {
            mode: Mode::Text,
            loc: None,
            body: body.to_owned(),
            star,
        }
    }

    #[test]
    fn spaces_become_unbreakable_or_visible() {
        assert_eq!(verb_text(&verb("a b", false)), "a\u{a0}b");
        assert_eq!(verb_text(&verb("a b", true)), "a\u{2423}b");
        assert_eq!(verb_text(&verb("ab", true)), "ab");
    }

    #[test]
    fn one_typewriter_glyph_per_character() {
        let ctx = TypesetContext::shared();
        let built = builder(&ParseNode::Verb(verb("x+1", false)), &Options::default(), ctx).unwrap();
        assert_eq!(built.classes(), ["mord", "text"]);
        assert_eq!(built.children().len(), 3);
        assert!(built.children()[0].has_class("texttt"));
    }
}
