//! Stretchy accents under a base, such as `\underrightarrow` and `\utilde`

use crate::box_tree::RenderNode;
use crate::build_common::{VListChild, VListElem, VListParam, make_span, make_v_list};
use crate::build_layout::build_group;
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeAccent, assert_node_type};
use crate::stretchy::svg_span;
use crate::types::ParseError;

/// Registers the stretchy accents set below the base
pub fn define_accentunder(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::AccentUnder),
        names: &["\\underleftarrow", "\\underrightarrow", "\\underleftrightarrow", "\\utilde"],
        props: FunctionPropSpec {
            num_args: 1,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let base = args
                .into_iter()
                .next()
                .ok_or_else(|| ParseError::new("Accent needs an argument"))?;
            Ok(ParseNode::AccentUnder(Box::new(ParseNodeAccent {
                mode: context.mode(),
                loc: context.loc(),
                label: context.func_name,
                is_stretchy: true,
                is_shifty: false,
                base,
            })))
        }),
        builder: Some(builder),
    });
}

fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::AccentUnder(group) = node else {
        assert_node_type(node, NodeType::AccentUnder)?;
        return Err(ParseError::new("Expected AccentUnder node"));
    };

    let inner = build_group(ctx, &group.base, options, None)?;
    let base_len = match &group.base {
        ParseNode::OrdGroup(ord) => ord.body.len(),
        _ => 1,
    };
    let accent = svg_span(&group.label, base_len, options)?;
    // The tilde image has no built-in gap.
    let kern = if group.label == "\\utilde" { 0.12 } else { 0.0 };

    let vlist = make_v_list(VListParam::Top {
        position: inner.height(),
        children: vec![
            VListElem::builder()
                .elem(accent.into())
                .wrapper_classes(vec!["svg-align".to_owned()])
                .build()
                .into(),
            VListChild::Kern(kern),
            VListElem::plain(inner).into(),
        ],
    });

    Ok(make_span(
        vec!["mord".to_owned(), "accentunder".to_owned()],
        vec![vlist.into()],
        Some(options),
        None,
    )
    .into())
}
