//! `\underline`

use crate::box_tree::RenderNode;
use crate::build_common::{VListChild, VListElem, VListParam, make_line_span, make_span, make_v_list};
use crate::build_layout::build_group;
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeLine, assert_node_type};
use crate::types::ParseError;

/// Registers `\underline`
pub fn define_underline(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Underline),
        names: &["\\underline"],
        props: FunctionPropSpec {
            num_args: 1,
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let body = args
                .into_iter()
                .next()
                .ok_or_else(|| ParseError::new("\\underline needs an argument"))?;
            Ok(ParseNode::Underline(ParseNodeLine {
                mode: context.mode(),
                loc: context.loc(),
                body: Box::new(body),
            }))
        }),
        builder: Some(builder),
    });
}

/// Rule 10 of Appendix G, the line hanging 3θ below the body.
fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Underline(group) = node else {
        assert_node_type(node, NodeType::Underline)?;
        return Err(ParseError::new("Expected Underline node"));
    };

    let inner = build_group(ctx, &group.body, options, None)?;
    let line = make_line_span("underline-line", options, None);
    let theta = options.font_metrics().default_rule_thickness;

    let vlist = make_v_list(VListParam::Top {
        position: inner.height(),
        children: vec![
            VListChild::Kern(theta),
            VListElem::plain(line).into(),
            VListChild::Kern(3.0 * theta),
            VListElem::plain(inner).into(),
        ],
    });

    Ok(make_span(
        vec!["mord".to_owned(), "underline".to_owned()],
        vec![vlist.into()],
        Some(options),
        None,
    )
    .into())
}
