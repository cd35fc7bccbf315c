//! Layout of atoms: binary operators, relations, delimiters and punctuation
//! drawn as single symbols.

use crate::box_tree::RenderNode;
use crate::build_common::mathsym;
use crate::context::TypesetContext;
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, assert_node_type};
use crate::types::ParseError;

/// Layout of atom symbols: binary operators, relations, delimiters and punctuation
pub fn define_symbols_op(ctx: &mut TypesetContext) {
    ctx.define_builder(NodeType::Atom, atom_builder);
    ctx.define_builder(NodeType::OpToken, token_builder);
    ctx.define_builder(NodeType::AccentToken, token_builder);
}

fn atom_builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Atom(atom) = node else {
        assert_node_type(node, NodeType::Atom)?;
        return Err(ParseError::new("Expected Atom node"));
    };
    let class_name = format!("m{}", atom.family.as_ref());
    Ok(mathsym(ctx, &atom.text, atom.mode, options, vec![class_name])?.into())
}

/// Operator and accent characters used on their own.
fn token_builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let (symbol, class_name) = match node {
        ParseNode::OpToken(token) => (token, "mop"),
        ParseNode::AccentToken(token) => (token, "mord"),
        _ => {
            assert_node_type(node, NodeType::OpToken)?;
            return Err(ParseError::new("Expected OpToken node"));
        }
    };
    Ok(mathsym(ctx, &symbol.text, symbol.mode, options, vec![class_name.to_owned()])?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_node::ParseNodeAtom;
    use crate::symbols::Atom;
    use crate::types::Mode;

    fn atom(family: Atom, text: &str) -> ParseNode {
        ParseNode::Atom(ParseNodeAtom {
            mode: Mode::Math,
            loc: None,
            family,
            text: text.to_owned(),
        })
    }

    #[test]
    fn atoms_are_classed_by_family() {
        let ctx = TypesetContext::shared();
        let options = Options::default();
        for (family, text, class) in [
            (Atom::Bin, "+", "mbin"),
            (Atom::Rel, "=", "mrel"),
            (Atom::Open, "(", "mopen"),
            (Atom::Punct, ",", "mpunct"),
        ] {
            let built = atom_builder(&atom(family, text), &options, ctx).unwrap();
            assert_eq!(built.classes()[0], class);
            assert!(matches!(built, RenderNode::Symbol(_)));
        }
    }

    #[test]
    fn ams_relations_are_marked() {
        let ctx = TypesetContext::shared();
        let built = atom_builder(&atom(Atom::Rel, "\\leqslant"), &Options::default(), ctx).unwrap();
        assert_eq!(built.classes(), ["mrel", "amsrm"]);
    }
}
