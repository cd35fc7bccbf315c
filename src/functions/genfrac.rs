//! Fractions and their relatives: `\frac`, `\binom`, `\cfrac` and the infix
//! primitives `\over`, `\choose`, `\atop`, `\brace` and `\brack`.

use phf::phf_map;

use crate::box_tree::RenderNode;
use crate::build_common::{VListElem, VListParam, make_line_span, make_null_delimiter, make_span, make_v_list};
use crate::build_layout::build_group;
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::delimiter::custom_sized_delim;
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeGenFrac, ParseNodeInfix, assert_node_type};
use crate::style::Style;
use crate::types::{ParseError, ParseErrorKind};

/// Infix operator to the fraction command it is rewritten into. The targets
/// with a doubled backslash can't be typed.
static INFIX_REPLACE_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "\\over" => "\\frac",
    "\\choose" => "\\binom",
    "\\atop" => "\\\\atopfrac",
    "\\brace" => "\\\\bracefrac",
    "\\brack" => "\\\\brackfrac",
};

/// Style a fraction is laid out in, given the style it forces (if any) and
/// the surrounding one.
const fn adjust_style(size: Option<Style>, original: Style) -> Style {
    match size {
        Some(Style::Display) => {
            // Scripts keep their size level, only switching to text style.
            if original.size() >= Style::Script.size() {
                original.text()
            } else {
                Style::Display
            }
        }
        Some(Style::Text) if original.size() == Style::Display.size() => Style::Text,
        Some(Style::Script) => Style::Script,
        Some(Style::ScriptScript) => Style::ScriptScript,
        _ => original,
    }
}

/// Registers fractions and binomials, including the infix forms
pub fn define_genfrac(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::GenFrac),
        names: &[
            "\\dfrac",
            "\\frac",
            "\\tfrac",
            "\\dbinom",
            "\\binom",
            "\\tbinom",
            "\\\\atopfrac",
            "\\\\bracefrac",
            "\\\\brackfrac",
        ],
        props: FunctionPropSpec {
            num_args: 2,
            greediness: 2,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let (left_delim, right_delim, has_bar_line) = match context.func_name.as_str() {
                "\\dfrac" | "\\frac" | "\\tfrac" => (None, None, true),
                "\\dbinom" | "\\binom" | "\\tbinom" => (Some("("), Some(")"), false),
                "\\\\atopfrac" => (None, None, false),
                "\\\\bracefrac" => (Some("\\{"), Some("\\}"), false),
                "\\\\brackfrac" => (Some("["), Some("]"), false),
                _ => {
                    return Err(ParseError::new(ParseErrorKind::NoFunctionHandler {
                        name: context.func_name.clone(),
                    }));
                }
            };
            let size = match context.func_name.as_str() {
                "\\dfrac" | "\\dbinom" => Some(Style::Display),
                "\\tfrac" | "\\tbinom" => Some(Style::Text),
                _ => None,
            };

            let mut args = args.into_iter();
            let (Some(numer), Some(denom)) = (args.next(), args.next()) else {
                return Err(ParseError::new("Fraction needs two arguments"));
            };
            Ok(ParseNode::GenFrac(Box::new(ParseNodeGenFrac {
                mode: context.mode(),
                loc: context.loc(),
                continued: false,
                numer,
                denom,
                has_bar_line,
                left_delim: left_delim.map(str::to_owned),
                right_delim: right_delim.map(str::to_owned),
                size,
            })))
        }),
        builder: Some(builder),
    });

    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::GenFrac),
        names: &["\\cfrac"],
        props: FunctionPropSpec {
            num_args: 2,
            greediness: 2,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let mut args = args.into_iter();
            let (Some(numer), Some(denom)) = (args.next(), args.next()) else {
                return Err(ParseError::new("Fraction needs two arguments"));
            };
            Ok(ParseNode::GenFrac(Box::new(ParseNodeGenFrac {
                mode: context.mode(),
                loc: context.loc(),
                continued: true,
                numer,
                denom,
                has_bar_line: true,
                left_delim: None,
                right_delim: None,
                size: Some(Style::Display),
            })))
        }),
        builder: Some(builder),
    });

    // Infix operators are not laid out; the parser rewrites them into the
    // fraction they stand for.
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Infix),
        names: &["\\over", "\\choose", "\\atop", "\\brace", "\\brack"],
        props: FunctionPropSpec {
            infix: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, _args, _opt_args| {
            let replace_with = INFIX_REPLACE_MAP.get(context.func_name.as_str()).ok_or_else(|| {
                ParseError::new(ParseErrorKind::NoFunctionHandler {
                    name: context.func_name.clone(),
                })
            })?;
            Ok(ParseNode::Infix(ParseNodeInfix {
                mode: context.mode(),
                loc: context.loc(),
                replace_with: (*replace_with).to_owned(),
                token: context.token.cloned(),
            }))
        }),
        builder: None,
    });
}

fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::GenFrac(group) = node else {
        assert_node_type(node, NodeType::GenFrac)?;
        return Err(ParseError::new("Expected GenFrac node"));
    };

    let style = adjust_style(group.size, options.style);
    let numer_options = options.having_style(style.frac_num());
    let denom_options = options.having_style(style.frac_den());

    let mut numer = build_group(ctx, &group.numer, &numer_options, Some(options))?;
    if group.continued {
        // \cfrac puts a \strut in the numerator (TeXbook p. 353).
        let pt_per_em = options.font_metrics().pt_per_em;
        numer.set_height(numer.height().max(8.5 / pt_per_em));
        numer.set_depth(numer.depth().max(3.5 / pt_per_em));
    }
    let denom = build_group(ctx, &group.denom, &denom_options, Some(options))?;

    let metrics = options.font_metrics();
    let axis_height = metrics.axis_height;
    let (rule, rule_width, rule_spacing) = if group.has_bar_line {
        let rule = make_line_span("frac-line", options, None);
        let height = rule.height;
        (Some(rule), height, height)
    } else {
        (None, 0.0, metrics.default_rule_thickness)
    };

    // Rule 15b
    let (mut num_shift, mut denom_shift, clearance) = if style.size() == Style::Display.size() {
        let clearance = if rule_width > 0.0 {
            3.0 * rule_spacing
        } else {
            7.0 * rule_spacing
        };
        (metrics.num1, metrics.denom1, clearance)
    } else if rule_width > 0.0 {
        (metrics.num2, metrics.denom2, rule_spacing)
    } else {
        (metrics.num3, metrics.denom2, 3.0 * rule_spacing)
    };

    if rule.is_some() {
        // Rule 15d
        let numer_gap = (num_shift - numer.depth()) - 0.5f64.mul_add(rule_width, axis_height);
        if numer_gap < clearance {
            num_shift += clearance - numer_gap;
        }
        let denom_gap = 0.5f64.mul_add(-rule_width, axis_height) - (denom.height() - denom_shift);
        if denom_gap < clearance {
            denom_shift += clearance - denom_gap;
        }
    } else {
        // Rule 15c
        let candidate = (num_shift - numer.depth()) - (denom.height() - denom_shift);
        if candidate < clearance {
            num_shift += 0.5 * (clearance - candidate);
            denom_shift += 0.5 * (clearance - candidate);
        }
    }

    let mut children = vec![VListElem::plain(denom).shifted(denom_shift)];
    if let Some(rule) = rule {
        let mid_shift = -0.5f64.mul_add(-rule_width, axis_height);
        children.push(VListElem::plain(rule).shifted(mid_shift));
    }
    children.push(VListElem::plain(numer).shifted(-num_shift));
    let mut frac = make_v_list(VListParam::IndividualShift(children));

    // \dfrac and \tfrac change the size of the whole fraction.
    let new_options = options.having_style(style);
    frac.height *= new_options.size_multiplier / options.size_multiplier;
    frac.depth *= new_options.size_multiplier / options.size_multiplier;

    let delim_size = if style.size() == Style::Display.size() {
        metrics.delim1
    } else if style.size() == Style::ScriptScript.size() {
        options.having_style(Style::Script).font_metrics().delim2
    } else {
        metrics.delim2
    };

    let delim = |delim: Option<&String>, class: &str| -> Result<RenderNode, ParseError> {
        Ok(match delim {
            Some(delim) => custom_sized_delim(
                ctx,
                delim,
                delim_size,
                true,
                &options.having_style(style),
                group.mode,
                &[class.to_owned()],
            )?
            .into(),
            None => make_null_delimiter(options, &[class]).into(),
        })
    };
    let left = delim(group.left_delim.as_ref(), "mopen")?;
    let right = if group.continued {
        make_span(Vec::new(), Vec::new(), None, None).into()
    } else {
        delim(group.right_delim.as_ref(), "mclose")?
    };

    let mut classes = vec!["mord".to_owned()];
    classes.extend(new_options.sizing_classes(options));
    let frac_span = make_span(vec!["mfrac".to_owned()], vec![frac.into()], None, None);
    Ok(make_span(classes, vec![left, frac_span.into(), right], Some(options), None).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_styles() {
        assert_eq!(adjust_style(Some(Style::Display), Style::Text), Style::Display);
        assert_eq!(adjust_style(Some(Style::Display), Style::ScriptCramped), Style::TextCramped);
        assert_eq!(adjust_style(Some(Style::Text), Style::DisplayCramped), Style::Text);
        assert_eq!(adjust_style(Some(Style::Text), Style::Script), Style::Script);
        assert_eq!(adjust_style(None, Style::TextCramped), Style::TextCramped);
    }

    #[test]
    fn infix_operators_map_to_fractions() {
        assert_eq!(INFIX_REPLACE_MAP.get("\\over"), Some(&"\\frac"));
        assert_eq!(INFIX_REPLACE_MAP.get("\\brack"), Some(&"\\\\brackfrac"));
    }
}
