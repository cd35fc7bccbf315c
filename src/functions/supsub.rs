//! Superscripts and subscripts (Rules 18a-f)
//!
//! Most bases get their scripts attached to the right. Bases that lay
//! their scripts out themselves (operators with limits, accents over a
//! single character and horizontal braces) are handed the whole node.

use crate::box_tree::RenderNode;
use crate::build_common::{VListChild, VListElem, VListParam, make_span, make_v_list};
use crate::build_layout::{AtomClass, build_group, right_atom_class};
use crate::context::TypesetContext;
use crate::define_function::BoxBuilder;
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeSupSub, assert_node_type};
use crate::style::Style;
use crate::types::ParseError;

use super::{accent, horiz_brace, op};

/// Layout of scripts
pub fn define_supsub(ctx: &mut TypesetContext) {
    ctx.define_builder(NodeType::SupSub, builder);
}

/// The builder that places the scripts itself, if the base has one.
fn builder_delegate(group: &ParseNodeSupSub, options: &Options) -> Option<BoxBuilder> {
    match group.base.as_deref()? {
        ParseNode::Op(base) => {
            let delegate = base.limits
                && (options.style.size() == Style::Display.size() || base.always_handle_sup_sub);
            delegate.then_some(op::builder as BoxBuilder)
        }
        ParseNode::Accent(base) => base.base.is_character_box().then_some(accent::builder as BoxBuilder),
        ParseNode::HorizBrace(base) => {
            let is_sup = group.sub.is_none();
            (is_sup == base.is_over).then_some(horiz_brace::builder as BoxBuilder)
        }
        _ => None,
    }
}

fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::SupSub(group) = node else {
        assert_node_type(node, NodeType::SupSub)?;
        return Err(ParseError::new("Expected SupSub node"));
    };

    if let Some(delegate) = builder_delegate(group, options) {
        return delegate(node, options, ctx);
    }

    let base = match group.base.as_deref() {
        Some(base) => build_group(ctx, base, options, None)?,
        None => make_span(Vec::new(), Vec::new(), Some(options), None).into(),
    };
    let metrics = options.font_metrics();

    // Scripts of a single character sit at fixed heights; anything else
    // hangs off the base's own extent.
    let is_character_box = group.base.as_deref().is_some_and(ParseNode::is_character_box);
    let mut sup_shift = 0.0;
    let mut sub_shift = 0.0;

    let sup = match group.sup.as_deref() {
        Some(sup) => {
            let new_options = options.having_style(options.style.sup());
            let elem = build_group(ctx, sup, &new_options, Some(options))?;
            if !is_character_box {
                sup_shift = base.height()
                    - new_options.font_metrics().sup_drop * new_options.size_multiplier
                        / options.size_multiplier;
            }
            Some(elem)
        }
        None => None,
    };
    let sub = match group.sub.as_deref() {
        Some(sub) => {
            let new_options = options.having_style(options.style.sub());
            let elem = build_group(ctx, sub, &new_options, Some(options))?;
            if !is_character_box {
                sub_shift = base.depth()
                    + new_options.font_metrics().sub_drop * new_options.size_multiplier
                        / options.size_multiplier;
            }
            Some(elem)
        }
        None => None,
    };

    // Rule 18c
    let min_sup_shift = if options.style == Style::Display {
        metrics.sup1
    } else if options.style.cramped() {
        metrics.sup3
    } else {
        metrics.sup2
    };

    // \scriptspace, in the base's size
    let margin_right = (0.5 / metrics.pt_per_em) / options.size_multiplier;
    // Subscripts tuck under the italic overhang of a letter.
    let margin_left = match &base {
        RenderNode::Symbol(symbol) if sub.is_some() => Some(-symbol.italic),
        _ => None,
    };

    let script = |elem: RenderNode, margin_left: Option<f64>| {
        VListElem::builder()
            .elem(elem)
            .maybe_margin_left(margin_left)
            .margin_right(margin_right)
            .build()
    };

    let supsub = match (sup, sub) {
        (Some(sup), Some(sub)) => {
            // Rule 18e
            sup_shift = sup_shift
                .max(min_sup_shift)
                .max(0.25f64.mul_add(metrics.x_height, sup.depth()));
            sub_shift = sub_shift.max(metrics.sub2);

            let gap = 4.0 * metrics.default_rule_thickness;
            if (sup_shift - sup.depth()) - (sub.height() - sub_shift) < gap {
                sub_shift = gap - (sup_shift - sup.depth()) + sub.height();
                let psi = 0.8f64.mul_add(metrics.x_height, -(sup_shift - sup.depth()));
                if psi > 0.0 {
                    sup_shift += psi;
                    sub_shift -= psi;
                }
            }

            make_v_list(VListParam::IndividualShift(vec![
                script(sub, margin_left).shifted(sub_shift),
                script(sup, None).shifted(-sup_shift),
            ]))
        }
        (None, Some(sub)) => {
            // Rule 18b
            sub_shift = sub_shift
                .max(metrics.sub1)
                .max(0.8f64.mul_add(-metrics.x_height, sub.height()));
            make_v_list(VListParam::Shift {
                position: sub_shift,
                children: vec![VListChild::Elem(script(sub, margin_left))],
            })
        }
        (Some(sup), None) => {
            // Rules 18c and 18d
            sup_shift = sup_shift
                .max(min_sup_shift)
                .max(0.25f64.mul_add(metrics.x_height, sup.depth()));
            make_v_list(VListParam::Shift {
                position: -sup_shift,
                children: vec![VListChild::Elem(script(sup, None))],
            })
        }
        (None, None) => return Err(ParseError::new("supsub must have either sup or sub.")),
    };

    let class = right_atom_class(&base).unwrap_or(AtomClass::Mord);
    let msupsub = make_span(vec!["msupsub".to_owned()], vec![supsub.into()], None, None);
    Ok(make_span(
        vec![class.as_ref().to_owned()],
        vec![base, msupsub.into()],
        Some(options),
        None,
    )
    .into())
}
