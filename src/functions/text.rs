//! Text-mode content inside math: `\text{...}` and the text font commands

use phf::phf_map;

use crate::box_tree::RenderNode;
use crate::build_common::make_span;
use crate::build_layout::{GroupKind, build_expression};
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec, ord_argument};
use crate::options::{FontShape, FontWeight, Options};
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeText, assert_node_type};
use crate::types::{ArgType, Mode, ParseError};

static TEXT_FONT_FAMILIES: phf::Map<&'static str, &'static str> = phf_map! {
    "\\textrm" => "textrm",
    "\\textsf" => "textsf",
    "\\texttt" => "texttt",
    "\\textnormal" => "textrm",
};

static TEXT_FONT_WEIGHTS: phf::Map<&'static str, FontWeight> = phf_map! {
    "\\textbf" => FontWeight::TextBf,
    "\\textmd" => FontWeight::TextMd,
};

static TEXT_FONT_SHAPES: phf::Map<&'static str, FontShape> = phf_map! {
    "\\textit" => FontShape::TextIt,
    "\\textup" => FontShape::TextUp,
};

fn options_with_font(font: Option<&str>, options: &Options) -> Options {
    let Some(font) = font else {
        return options.clone();
    };
    if let Some(family) = TEXT_FONT_FAMILIES.get(font) {
        options.with_text_font_family((*family).to_owned())
    } else if let Some(weight) = TEXT_FONT_WEIGHTS.get(font) {
        options.with_text_font_weight(*weight)
    } else if let Some(shape) = TEXT_FONT_SHAPES.get(font) {
        options.with_text_font_shape(*shape)
    } else {
        options.clone()
    }
}

/// Registers `\text` and the text font commands
pub fn define_text(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Text),
        names: &[
            "\\text",
            "\\textrm",
            "\\textsf",
            "\\texttt",
            "\\textnormal",
            "\\textbf",
            "\\textmd",
            "\\textit",
            "\\textup",
        ],
        props: FunctionPropSpec {
            num_args: 1,
            arg_types: Some(vec![ArgType::Mode(Mode::Text)]),
            greediness: 2,
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let body = args
                .into_iter()
                .next()
                .ok_or_else(|| ParseError::new("Text command needs an argument"))?;
            let font = (context.func_name != "\\text").then_some(context.func_name.clone());
            Ok(ParseNode::Text(ParseNodeText {
                mode: context.mode(),
                loc: context.loc(),
                body: ord_argument(body),
                font,
            }))
        }),
        builder: Some(builder),
    });
}

fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Text(group) = node else {
        assert_node_type(node, NodeType::Text)?;
        return Err(ParseError::new("Expected Text node"));
    };
    let new_options = options_with_font(group.font.as_deref(), options);
    let inner = build_expression(ctx, &group.body, &new_options, GroupKind::Real, (None, None))?;
    Ok(make_span(
        vec!["mord".to_owned(), "text".to_owned()],
        inner,
        Some(&new_options),
        None,
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_commands_set_family_weight_or_shape() {
        let options = Options::default();
        assert_eq!(options_with_font(Some("\\texttt"), &options).font_family, "texttt");
        assert_eq!(
            options_with_font(Some("\\textbf"), &options).font_weight,
            FontWeight::TextBf
        );
        assert_eq!(
            options_with_font(Some("\\textit"), &options).font_shape,
            FontShape::TextIt
        );
        assert_eq!(options_with_font(None, &options), options);
    }
}
