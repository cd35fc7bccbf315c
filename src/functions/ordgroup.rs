//! Layout of `{...}` groups

use crate::box_tree::RenderNode;
use crate::build_common::make_span;
use crate::build_layout::{GroupKind, build_expression};
use crate::context::TypesetContext;
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, assert_node_type};
use crate::types::ParseError;

/// Layout of braced groups
pub fn define_ordgroup(ctx: &mut TypesetContext) {
    ctx.define_builder(NodeType::OrdGroup, builder);
}

/// A group is an ordinary atom to its surroundings, with its own spacing
/// inside.
fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::OrdGroup(group) = node else {
        assert_node_type(node, NodeType::OrdGroup)?;
        return Err(ParseError::new("Expected OrdGroup node"));
    };
    let body = build_expression(ctx, &group.body, options, GroupKind::Real, (None, None))?;
    Ok(make_span(vec!["mord".to_owned()], body, Some(options), None).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_node::{ParseNodeAtom, ParseNodeSymbol};
    use crate::symbols::Atom;
    use crate::types::Mode;

    #[test]
    fn groups_are_ords_with_inner_spacing() {
        let ctx = TypesetContext::shared();
        let ord = |text: &str| {
            ParseNode::MathOrd(ParseNodeSymbol {
                mode: Mode::Math,
                loc: None,
                text: text.to_owned(),
            })
        };
        let plus = ParseNode::Atom(ParseNodeAtom {
            mode: Mode::Math,
            loc: None,
            family: Atom::Bin,
            text: "+".to_owned(),
        });
        let group = ParseNode::ord_group(Mode::Math, vec![ord("a"), plus, ord("b")]);
        let built = builder(&group, &Options::default(), ctx).unwrap();
        assert_eq!(built.classes(), ["mord"]);
        // a, glue, +, glue, b
        assert_eq!(built.children().len(), 5);
    }
}
