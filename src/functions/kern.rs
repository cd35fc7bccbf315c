//! Explicit horizontal space: `\kern`, `\mkern`, `\hspace` and the named
//! spaces `\,`, `\quad` and friends.

use phf::phf_map;

use crate::box_tree::RenderNode;
use crate::build_common::make_glue;
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeKern, assert_node_type};
use crate::spacing_data::{MEDIUMSPACE, THICKSPACE, THINSPACE};
use crate::types::{ArgType, ErrorLocationProvider, Mode, ParseError};
use crate::units::{Measurement, Unit};

/// Widths of the named spaces in math mode.
static NAMED_SPACES: phf::Map<&'static str, Measurement> = phf_map! {
    "\\," => THINSPACE,
    "\\thinspace" => THINSPACE,
    "\\:" => MEDIUMSPACE,
    "\\medspace" => MEDIUMSPACE,
    "\\;" => THICKSPACE,
    "\\thickspace" => THICKSPACE,
    "\\!" => Measurement::new(-3.0, Unit::Mu),
    "\\enspace" => Measurement::new(0.5, Unit::Em),
    "\\quad" => Measurement::new(1.0, Unit::Em),
    "\\qquad" => Measurement::new(2.0, Unit::Em),
};

/// Text mode has no mu; 18mu make an em.
fn in_mode(size: Measurement, mode: Mode) -> Measurement {
    if mode == Mode::Text && size.unit == Unit::Mu {
        Measurement::new(size.number / 18.0, Unit::Em)
    } else {
        size
    }
}

/// Registers explicit kerns and the named spaces
pub fn define_kern(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Kern),
        names: &["\\kern", "\\mkern", "\\hspace"],
        props: FunctionPropSpec {
            num_args: 1,
            arg_types: Some(vec![ArgType::Size]),
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let Some(ParseNode::Size(size)) = args.into_iter().next() else {
                return Err(ParseError::new("Expected a size argument"));
            };
            let token = context.token.map(|token| token as &dyn ErrorLocationProvider);
            let settings = context.parser.settings;
            let is_mu = size.value.unit == Unit::Mu;
            if context.func_name == "\\mkern" {
                if !is_mu {
                    settings.report_nonstrict(
                        "mathVsTextUnits",
                        &format!("LaTeX's \\mkern supports only mu units, not {} units", size.value.unit),
                        token,
                    )?;
                }
                if context.mode() != Mode::Math {
                    settings.report_nonstrict("mathVsTextUnits", "LaTeX's \\mkern works only in math mode", token)?;
                }
            } else if is_mu {
                settings.report_nonstrict(
                    "mathVsTextUnits",
                    &format!("LaTeX's {} doesn't support mu units", context.func_name),
                    token,
                )?;
            }
            Ok(ParseNode::Kern(ParseNodeKern {
                mode: context.mode(),
                loc: context.loc(),
                dimension: size.value,
            }))
        }),
        builder: Some(builder),
    });

    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Kern),
        names: &[
            "\\,",
            "\\thinspace",
            "\\:",
            "\\medspace",
            "\\;",
            "\\thickspace",
            "\\!",
            "\\enspace",
            "\\quad",
            "\\qquad",
        ],
        props: FunctionPropSpec {
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, _args, _opt_args| {
            let size = NAMED_SPACES
                .get(context.func_name.as_str())
                .copied()
                .ok_or_else(|| ParseError::new("Unknown named space"))?;
            Ok(ParseNode::Kern(ParseNodeKern {
                mode: context.mode(),
                loc: context.loc(),
                dimension: in_mode(size, context.mode()),
            }))
        }),
        builder: Some(builder),
    });
}

fn builder(node: &ParseNode, options: &Options, _ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Kern(group) = node else {
        assert_node_type(node, NodeType::Kern)?;
        return Err(ParseError::new("Expected Kern node"));
    };
    Ok(make_glue(&group.dimension, options).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_spaces_convert_mu_in_text() {
        let thin = NAMED_SPACES["\\,"];
        assert_eq!(in_mode(thin, Mode::Math), thin);
        let text = in_mode(thin, Mode::Text);
        assert_eq!(text.unit, Unit::Em);
        assert!((text.number - 1.0 / 6.0).abs() < 1e-12);
        assert_eq!(in_mode(NAMED_SPACES["\\quad"], Mode::Text), Measurement::new(1.0, Unit::Em));
    }

    #[test]
    fn kerns_are_glue() {
        let ctx = TypesetContext::shared();
        let node = ParseNode::Kern(ParseNodeKern {
            mode: Mode::Math,
            loc: None,
            dimension: Measurement::new(18.0, Unit::Mu),
        });
        let built = builder(&node, &Options::default(), ctx).unwrap();
        assert!(built.is_space());
        assert_eq!(built.style().and_then(|s| s.margin_right), Some(1.0));
    }
}
