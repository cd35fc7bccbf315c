//! Limits stacked above and below a big operator (Rule 13a).

use crate::box_tree::RenderNode;
use crate::build_common::{VListChild, VListElem, VListParam, make_span, make_v_list};
use crate::build_layout::build_group;
use crate::context::TypesetContext;
use crate::options::Options;
use crate::parser::parse_node::ParseNode;
use crate::style::Style;
use crate::types::ParseError;

/// A built limit and the kern between it and the operator.
struct Limit {
    elem: RenderNode,
    kern: f64,
}

/// Stack `sup_group` above and `sub_group` below `base`. `slant` is the
/// operator's italic correction: the upper limit moves right by it and the
/// lower one left. `base_shift` is how far the operator was lowered
/// to center it on the axis.
#[expect(clippy::too_many_arguments)]
pub fn assemble_sup_sub(
    ctx: &TypesetContext,
    base: RenderNode,
    sup_group: Option<&ParseNode>,
    sub_group: Option<&ParseNode>,
    options: &Options,
    style: Style,
    slant: f64,
    base_shift: f64,
) -> Result<RenderNode, ParseError> {
    let base = make_span(Vec::new(), vec![base], Some(options), None);
    let (base_height, base_depth) = (base.height, base.depth);
    let metrics = options.font_metrics();

    let sup = sup_group
        .map(|group| {
            let elem = build_group(ctx, group, &options.having_style(style.sup()), Some(options))?;
            let kern = metrics.big_op_spacing1.max(metrics.big_op_spacing3 - elem.depth());
            Ok::<_, ParseError>(Limit { elem, kern })
        })
        .transpose()?;
    let sub = sub_group
        .map(|group| {
            let elem = build_group(ctx, group, &options.having_style(style.sub()), Some(options))?;
            let kern = metrics.big_op_spacing2.max(metrics.big_op_spacing4 - elem.height());
            Ok::<_, ParseError>(Limit { elem, kern })
        })
        .transpose()?;

    let spacing5 = metrics.big_op_spacing5;
    let sub_elem = |elem: RenderNode| -> VListChild {
        VListElem::builder().elem(elem).margin_left(-slant).build().into()
    };
    let sup_elem = |elem: RenderNode| -> VListChild {
        VListElem::builder().elem(elem).margin_left(slant).build().into()
    };

    let needs_spacer = slant != 0.0 && sub_group.is_some_and(|sub| !sub.is_character_box());
    let stack = match (sup, sub) {
        (Some(sup), Some(sub)) => {
            let bottom = spacing5
                + sub.elem.height()
                + sub.elem.depth()
                + sub.kern
                + base_depth
                + base_shift;
            make_v_list(VListParam::Bottom {
                position: bottom,
                children: vec![
                    VListChild::Kern(spacing5),
                    sub_elem(sub.elem),
                    VListChild::Kern(sub.kern),
                    VListElem::plain(base).into(),
                    VListChild::Kern(sup.kern),
                    sup_elem(sup.elem),
                    VListChild::Kern(spacing5),
                ],
            })
        }
        (None, Some(sub)) => make_v_list(VListParam::Top {
            position: base_height - base_shift,
            children: vec![
                VListChild::Kern(spacing5),
                sub_elem(sub.elem),
                VListChild::Kern(sub.kern),
                VListElem::plain(base).into(),
            ],
        }),
        (Some(sup), None) => make_v_list(VListParam::Bottom {
            position: base_depth + base_shift,
            children: vec![
                VListElem::plain(base).into(),
                VListChild::Kern(sup.kern),
                sup_elem(sup.elem),
                VListChild::Kern(spacing5),
            ],
        }),
        (None, None) => return Ok(base.into()),
    };

    let mut parts: Vec<RenderNode> = vec![stack.into()];
    if needs_spacer {
        // A slanted operator pushes its lower limit left; keep it clear of
        // whatever comes before.
        let mut spacer = make_span(vec!["mspace".to_owned()], Vec::new(), Some(options), None);
        spacer.style.margin_right = Some(slant);
        parts.insert(0, spacer.into());
    }

    Ok(make_span(
        vec!["mop".to_owned(), "op-limits".to_owned()],
        parts,
        Some(options),
        None,
    )
    .into())
}
