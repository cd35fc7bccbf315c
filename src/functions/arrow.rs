//! Extensible arrows: `\xrightarrow[below]{above}` and friends

use crate::box_tree::RenderNode;
use crate::build_common::{VListElem, VListParam, make_span, make_v_list};
use crate::build_layout::build_group;
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeXArrow, assert_node_type};
use crate::stretchy::svg_span;
use crate::types::ParseError;

/// 2mu, between a label and the arrow
const LABEL_GAP: f64 = 0.111;

/// Registers the extensible arrows such as `\xrightarrow`
pub fn define_arrow(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::XArrow),
        names: &[
            "\\xleftarrow",
            "\\xrightarrow",
            "\\xLeftarrow",
            "\\xRightarrow",
            "\\xleftrightarrow",
            "\\xmapsto",
        ],
        props: FunctionPropSpec {
            num_args: 1,
            num_optional_args: 1,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, opt_args| {
            let body = args
                .into_iter()
                .next()
                .ok_or_else(|| ParseError::new("Arrow needs a label"))?;
            let below = opt_args.into_iter().next().flatten();
            Ok(ParseNode::XArrow(Box::new(ParseNodeXArrow {
                mode: context.mode(),
                loc: context.loc(),
                label: context.func_name,
                body,
                below,
            })))
        }),
        builder: Some(builder),
    });
}

fn padded(mut label: RenderNode) -> RenderNode {
    if let Some(classes) = label.classes_mut() {
        classes.push("x-arrow-pad".to_owned());
    }
    label
}

fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::XArrow(group) = node else {
        assert_node_type(node, NodeType::XArrow)?;
        return Err(ParseError::new("Expected XArrow node"));
    };
    let style = options.style;
    let axis_height = options.font_metrics().axis_height;

    let upper = padded(build_group(ctx, &group.body, &options.having_style(style.sup()), Some(options))?);
    let lower = match &group.below {
        Some(below) => Some(padded(build_group(
            ctx,
            below,
            &options.having_style(style.sub()),
            Some(options),
        )?)),
        None => None,
    };

    let arrow = svg_span(&group.label, 1, options)?;
    // Center the arrow on the math axis.
    let arrow_shift = 0.5f64.mul_add(arrow.height, -axis_height);
    let mut upper_shift = 0.5f64.mul_add(-arrow.height, -axis_height) - LABEL_GAP;
    if upper.depth() > 0.25 {
        upper_shift -= upper.depth();
    }

    let mut children = Vec::with_capacity(3);
    let lower_shift = lower
        .as_ref()
        .map(|lower| 0.5f64.mul_add(arrow.height, -axis_height + lower.height()) + LABEL_GAP);
    children.push(VListElem::plain(upper).shifted(upper_shift));
    children.push(
        VListElem::builder()
            .elem(arrow.into())
            .wrapper_classes(vec!["svg-align".to_owned()])
            .build()
            .shifted(arrow_shift),
    );
    if let (Some(lower), Some(shift)) = (lower, lower_shift) {
        children.push(VListElem::plain(lower).shifted(shift));
    }
    let vlist = make_v_list(VListParam::IndividualShift(children));

    Ok(make_span(
        vec!["mrel".to_owned(), "x-arrow".to_owned()],
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

    fn ord(text: &str) -> ParseNode {
        ParseNode::MathOrd(ParseNodeSymbol {
            mode: Mode::Math,
            loc: None,
            text: text.to_owned(),
        })
    }

    #[test]
    fn arrows_are_relations() {
        let ctx = TypesetContext::shared();
        let arrow = ParseNode::XArrow(Box::new(ParseNodeXArrow {
            mode: Mode::Math,
            loc: None,
            label: "\\xrightarrow".to_owned(),
            body: ord("f"),
            below: None,
        }));
        let built = builder(&arrow, &Options::default(), ctx).unwrap();
        assert_eq!(built.classes(), ["mrel", "x-arrow"]);
        let mut padded_labels = 0;
        built.walk(&mut |node, _| {
            if node.has_class("x-arrow-pad") {
                padded_labels += 1;
            }
        });
        assert_eq!(padded_labels, 1);
    }

    #[test]
    fn lower_labels_hang_below_the_baseline() {
        let ctx = TypesetContext::shared();
        let arrow = ParseNode::XArrow(Box::new(ParseNodeXArrow {
            mode: Mode::Math,
            loc: None,
            label: "\\xleftarrow".to_owned(),
            body: ord("f"),
            below: Some(ord("g")),
        }));
        let built = builder(&arrow, &Options::default(), ctx).unwrap();
        assert!(built.depth() > 0.3);
    }
}
