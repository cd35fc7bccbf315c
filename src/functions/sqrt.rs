//! `\sqrt`, with an optional index

use crate::box_tree::RenderNode;
use crate::build_common::{VListChild, VListElem, VListParam, make_span, make_v_list, wrap_fragment};
use crate::build_layout::build_group;
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::delimiter::make_sqrt_image;
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeSqrt, assert_node_type};
use crate::style::Style;
use crate::types::ParseError;

/// Registers `\sqrt`
pub fn define_sqrt(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Sqrt),
        names: &["\\sqrt"],
        props: FunctionPropSpec {
            num_args: 1,
            num_optional_args: 1,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, opt_args| {
            let body = args
                .into_iter()
                .next()
                .ok_or_else(|| ParseError::new("\\sqrt needs an argument"))?;
            let index = opt_args.into_iter().next().flatten();
            Ok(ParseNode::Sqrt(Box::new(ParseNodeSqrt {
                mode: context.mode(),
                loc: context.loc(),
                body,
                index,
            })))
        }),
        builder: Some(builder),
    });
}

/// Rule 11 of Appendix G, with the radical sign drawn as an image.
fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Sqrt(group) = node else {
        assert_node_type(node, NodeType::Sqrt)?;
        return Err(ParseError::new("Expected Sqrt node"));
    };

    let mut inner = build_group(ctx, &group.body, &options.having_cramped_style(), None)?;
    if inner.height() == 0.0 {
        // Empty radicands are as tall as an x.
        inner.set_height(options.font_metrics().x_height);
    }
    let mut inner = wrap_fragment(inner, options);

    let metrics = options.font_metrics();
    let theta = metrics.default_rule_thickness;
    let phi = if options.style.size() == Style::Display.size() {
        metrics.x_height
    } else {
        theta
    };
    let mut line_clearance = theta + phi / 4.0;
    let min_delimiter_height = inner.height() + inner.depth() + line_clearance + theta;

    let image = make_sqrt_image(ctx, min_delimiter_height, options)?;
    let delim_depth = image.span.height - image.rule_width;

    // Spread any extra room evenly above and below the radicand.
    if delim_depth > inner.height() + inner.depth() + line_clearance {
        line_clearance = (line_clearance + delim_depth - inner.height() - inner.depth()) / 2.0;
    }
    let img_shift = image.span.height - inner.height() - line_clearance - image.rule_width;

    if let Some(style) = inner.style_mut() {
        style.padding_left = Some(image.advance_width);
    }
    let inner_height = inner.height();

    let body = make_v_list(VListParam::FirstBaseline(vec![
        VListElem::builder()
            .elem(inner)
            .wrapper_classes(vec!["svg-align".to_owned()])
            .build()
            .into(),
        VListChild::Kern(-(inner_height + img_shift)),
        VListElem::plain(image.span).into(),
        VListChild::Kern(image.rule_width),
    ]));

    let classes = vec!["mord".to_owned(), "sqrt".to_owned()];
    let Some(index) = &group.index else {
        return Ok(make_span(classes, vec![body.into()], Some(options), None).into());
    };

    // The index is raised by 60% of the radical's total height, in
    // scriptscript style.
    let index_options = options.having_style(Style::ScriptScript);
    let root = build_group(ctx, index, &index_options, Some(options))?;
    let to_shift = 0.6 * (body.height - body.depth);
    let root_vlist = make_v_list(VListParam::Shift {
        position: -to_shift,
        children: vec![VListElem::plain(root).into()],
    });
    let root_wrap = make_span(vec!["root".to_owned()], vec![root_vlist.into()], Some(options), None);

    Ok(make_span(classes, vec![root_wrap.into(), body.into()], Some(options), None).into())
}
