//! Math font switches: `\mathbf{...}` and friends, and the old-style
//! declarations `\rm`, `\bf` and so on that run to the end of the group.

use crate::box_tree::RenderNode;
use crate::build_layout::build_group;
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec, normalize_argument};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeFont, assert_node_type};
use crate::types::ParseError;

/// Registers the math font commands
pub fn define_font(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Font),
        names: &[
            "\\mathrm",
            "\\mathit",
            "\\mathbf",
            "\\mathnormal",
            "\\mathbb",
            "\\mathcal",
            "\\mathsf",
            "\\mathtt",
        ],
        props: FunctionPropSpec {
            num_args: 1,
            greediness: 2,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let body = args
                .into_iter()
                .next()
                .ok_or_else(|| ParseError::new("Font command needs an argument"))?;
            Ok(ParseNode::Font(ParseNodeFont {
                mode: context.mode(),
                loc: context.loc(),
                font: context.func_name[1..].to_owned(),
                body: Box::new(normalize_argument(&body).clone()),
            }))
        }),
        builder: Some(builder),
    });

    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Font),
        names: &["\\rm", "\\sf", "\\tt", "\\bf", "\\it", "\\cal"],
        props: FunctionPropSpec {
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, _args, _opt_args| {
            let mode = context.mode();
            let loc = context.loc();
            let body = context.parser.parse_expression(true, context.break_on_token_text)?;
            Ok(ParseNode::Font(ParseNodeFont {
                mode,
                loc,
                font: format!("math{}", &context.func_name[1..]),
                body: Box::new(ParseNode::ord_group(mode, body)),
            }))
        }),
        builder: Some(builder),
    });
}

fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Font(group) = node else {
        assert_node_type(node, NodeType::Font)?;
        return Err(ParseError::new("Expected Font node"));
    };
    build_group(ctx, &group.body, &options.with_font(group.font.clone()), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_node::ParseNodeSymbol;
    use crate::types::Mode;

    #[test]
    fn bold_letters_come_from_the_bold_font() {
        let ctx = TypesetContext::shared();
        let node = ParseNode::Font(ParseNodeFont {
            mode: Mode::Math,
            loc: None,
            font: "mathbf".to_owned(),
            body: Box::new(ParseNode::MathOrd(ParseNodeSymbol {
                mode: Mode::Math,
                loc: None,
                text: "x".to_owned(),
            })),
        });
        let built = builder(&node, &Options::default(), ctx).unwrap();
        assert_eq!(built.classes(), ["mord", "mathbf"]);
    }
}
