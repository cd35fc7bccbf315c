//! Layout of ordinary symbols: letters, digits and text characters.

use crate::box_tree::RenderNode;
use crate::build_common::make_ord;
use crate::context::TypesetContext;
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode};
use crate::types::ParseError;

/// Layout of ordinary symbols
pub fn define_symbols_ord(ctx: &mut TypesetContext) {
    ctx.define_builder(NodeType::MathOrd, builder);
    ctx.define_builder(NodeType::TextOrd, builder);
}

fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    make_ord(ctx, node, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_node::ParseNodeSymbol;
    use crate::types::Mode;

    #[test]
    fn digits_are_upright_and_letters_italic() {
        let ctx = TypesetContext::shared();
        let options = Options::default();
        let digit = ParseNode::TextOrd(ParseNodeSymbol {
            mode: Mode::Math,
            loc: None,
            text: "2".to_owned(),
        });
        let built = builder(&digit, &options, ctx).unwrap();
        assert_eq!(built.classes(), ["mord"]);
        assert!((built.height() - 0.64444).abs() < 1e-9);

        let letter = ParseNode::MathOrd(ParseNodeSymbol {
            mode: Mode::Math,
            loc: None,
            text: "y".to_owned(),
        });
        let built = builder(&letter, &options, ctx).unwrap();
        assert_eq!(built.classes(), ["mord", "mathnormal"]);
    }
}
