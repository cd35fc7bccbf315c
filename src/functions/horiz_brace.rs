//! `\overbrace` and `\underbrace`
//!
//! A script on the brace's side becomes a note centered on the brace, so
//! the sup/sub builder hands such nodes here.

use crate::box_tree::RenderNode;
use crate::build_common::{VListChild, VListElem, VListParam, make_span, make_v_list};
use crate::build_layout::build_group;
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeHorizBrace};
use crate::stretchy::svg_span;
use crate::style::Style;
use crate::types::{ParseError, ParseErrorKind};

/// Gap between the base and the brace.
const BRACE_GAP: f64 = 0.1;
/// Gap between the brace and its note.
const NOTE_GAP: f64 = 0.2;

/// Registers `\overbrace` and `\underbrace`
pub fn define_horiz_brace(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::HorizBrace),
        names: &["\\overbrace", "\\underbrace"],
        props: FunctionPropSpec {
            num_args: 1,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let base = args
                .into_iter()
                .next()
                .ok_or_else(|| ParseError::new("Brace needs an argument"))?;
            Ok(ParseNode::HorizBrace(Box::new(ParseNodeHorizBrace {
                mode: context.mode(),
                loc: context.loc(),
                is_over: context.func_name.starts_with("\\over"),
                label: context.func_name,
                base,
            })))
        }),
        builder: Some(builder),
    });
}

fn expected_brace(node: &ParseNode) -> ParseError {
    ParseError::with_token(
        ParseErrorKind::ExpectedNode {
            expected: NodeType::HorizBrace,
        },
        node,
    )
}

/// Lay out a brace, or a sup/sub node whose base is a brace.
pub(super) fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let (group, note) = match node {
        ParseNode::HorizBrace(group) => (group.as_ref(), None),
        ParseNode::SupSub(supsub) => {
            let Some(ParseNode::HorizBrace(group)) = supsub.base.as_deref() else {
                return Err(expected_brace(node));
            };
            let note = match (supsub.sup.as_deref(), supsub.sub.as_deref()) {
                (Some(sup), _) => Some(build_group(ctx, sup, &options.having_style(options.style.sup()), Some(options))?),
                (None, Some(sub)) => Some(build_group(ctx, sub, &options.having_style(options.style.sub()), Some(options))?),
                (None, None) => None,
            };
            (group.as_ref(), note)
        }
        _ => return Err(expected_brace(node)),
    };

    let body = build_group(ctx, &group.base, &options.having_base_style(Some(Style::Display)), None)?;
    let brace = svg_span(&group.label, 1, options)?;
    let brace = VListElem::builder()
        .elem(brace.into())
        .wrapper_classes(vec!["svg-align".to_owned()])
        .build();

    let vlist = if group.is_over {
        make_v_list(VListParam::FirstBaseline(vec![
            VListElem::plain(body).into(),
            VListChild::Kern(BRACE_GAP),
            brace.into(),
        ]))
    } else {
        let position = body.depth() + BRACE_GAP + brace.elem.height();
        make_v_list(VListParam::Bottom {
            position,
            children: vec![brace.into(), VListChild::Kern(BRACE_GAP), VListElem::plain(body).into()],
        })
    };

    let classes = || vec!["mord".to_owned(), if group.is_over { "mover" } else { "munder" }.to_owned()];
    let braced = make_span(classes(), vec![vlist.into()], Some(options), None);
    let Some(note) = note else {
        return Ok(braced.into());
    };

    // The note sits in its own list so the braced content, not the note,
    // sets the brace's width.
    let vlist = if group.is_over {
        make_v_list(VListParam::FirstBaseline(vec![
            VListElem::plain(braced).into(),
            VListChild::Kern(NOTE_GAP),
            VListElem::plain(note).into(),
        ]))
    } else {
        let position = braced.depth + NOTE_GAP + note.height() + note.depth();
        make_v_list(VListParam::Bottom {
            position,
            children: vec![
                VListElem::plain(note).into(),
                VListChild::Kern(NOTE_GAP),
                VListElem::plain(braced).into(),
            ],
        })
    };
    Ok(make_span(classes(), vec![vlist.into()], Some(options), None).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_node::{ParseNodeSupSub, ParseNodeSymbol};
    use crate::types::Mode;

    fn brace(label: &str) -> ParseNode {
        ParseNode::HorizBrace(Box::new(ParseNodeHorizBrace {
            mode: Mode::Math,
            loc: None,
            label: label.to_owned(),
            is_over: label.starts_with("\\over"),
            base: ParseNode::MathOrd(ParseNodeSymbol {
                mode: Mode::Math,
                loc: None,
                text: "x".to_owned(),
            }),
        }))
    }

    #[test]
    fn overbraces_rise_above_the_base() {
        let ctx = TypesetContext::shared();
        let built = builder(&brace("\\overbrace"), &Options::default(), ctx).unwrap();
        assert_eq!(built.classes(), ["mord", "mover"]);
        // x, the gap and the brace image
        assert!((built.height() - (0.43056 + 0.1 + 0.548)).abs() < 1e-9);
    }

    #[test]
    fn underbrace_notes_hang_below() {
        let ctx = TypesetContext::shared();
        let plain = builder(&brace("\\underbrace"), &Options::default(), ctx).unwrap();
        let with_note = ParseNode::SupSub(ParseNodeSupSub {
            mode: Mode::Math,
            loc: None,
            base: Some(Box::new(brace("\\underbrace"))),
            sup: None,
            sub: Some(Box::new(ParseNode::MathOrd(ParseNodeSymbol {
                mode: Mode::Math,
                loc: None,
                text: "n".to_owned(),
            }))),
        });
        let noted = builder(&with_note, &Options::default(), ctx).unwrap();
        assert_eq!(noted.classes(), ["mord", "munder"]);
        assert!(noted.depth() > plain.depth() + NOTE_GAP);
    }
}
