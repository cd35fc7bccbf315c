//! `\overline`

use crate::box_tree::RenderNode;
use crate::build_common::{VListChild, VListElem, VListParam, make_line_span, make_span, make_v_list};
use crate::build_layout::build_group;
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeLine, assert_node_type};
use crate::types::ParseError;

/// Registers `\overline`
pub fn define_overline(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Overline),
        names: &["\\overline"],
        props: FunctionPropSpec {
            num_args: 1,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let body = args
                .into_iter()
                .next()
                .ok_or_else(|| ParseError::new("\\overline needs an argument"))?;
            Ok(ParseNode::Overline(ParseNodeLine {
                mode: context.mode(),
                loc: context.loc(),
                body: Box::new(body),
            }))
        }),
        builder: Some(builder),
    });
}

/// Rule 9 of Appendix G: the body is cramped, with a 3θ gap below the
/// line and θ above it.
fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Overline(group) = node else {
        assert_node_type(node, NodeType::Overline)?;
        return Err(ParseError::new("Expected Overline node"));
    };

    let inner = build_group(ctx, &group.body, &options.having_cramped_style(), None)?;
    let line = make_line_span("overline-line", options, None);
    let theta = options.font_metrics().default_rule_thickness;

    let vlist = make_v_list(VListParam::FirstBaseline(vec![
        VListElem::plain(inner).into(),
        VListChild::Kern(3.0 * theta),
        VListElem::plain(line).into(),
        VListChild::Kern(theta),
    ]));

    Ok(make_span(
        vec!["mord".to_owned(), "overline".to_owned()],
        vec![vlist.into()],
        Some(options),
        None,
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_node::ParseNodeSymbol;
    use crate::types::Mode;

    #[test]
    fn overlines_add_five_rule_thicknesses() {
        let ctx = TypesetContext::shared();
        let node = ParseNode::Overline(ParseNodeLine {
            mode: Mode::Math,
            loc: None,
            body: Box::new(ParseNode::MathOrd(ParseNodeSymbol {
                mode: Mode::Math,
                loc: None,
                text: "x".to_owned(),
            })),
        });
        let built = builder(&node, &Options::default(), ctx).unwrap();
        assert_eq!(built.classes(), ["mord", "overline"]);
        // 3θ gap, θ line, θ kern above
        assert!((built.height() - (0.43056 + 5.0 * 0.04)).abs() < 1e-9);
    }
}
