//! Layout of space symbols and line-break controls.

use phf::phf_map;

use crate::box_tree::RenderNode;
use crate::build_common::{make_ord, make_span, mathsym};
use crate::context::TypesetContext;
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, assert_node_type};
use crate::types::{Mode, ParseError};

/// Invisible controls for line breaking, by the class they mark.
static CSS_SPACE: phf::Map<&'static str, &'static str> = phf_map! {
    "\\nobreak" => "nobreak",
    "\\allowbreak" => "allowbreak",
};

/// Spaces drawn as a space character, with the class of non-breaking ones.
static REGULAR_SPACE: phf::Map<&'static str, Option<&'static str>> = phf_map! {
    " " => None,
    "\\ " => None,
    "~" => Some("nobreak"),
    "\\space" => None,
    "\\nobreakspace" => Some("nobreak"),
};

/// Layout of space symbols
pub fn define_symbols_spacing(ctx: &mut TypesetContext) {
    ctx.define_builder(NodeType::Spacing, builder);
}

fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Spacing(space) = node else {
        assert_node_type(node, NodeType::Spacing)?;
        return Err(ParseError::new("Expected Spacing node"));
    };

    if let Some(class_name) = REGULAR_SPACE.get(space.text.as_str()) {
        // Text spaces are ordinary characters; math spaces are spans that
        // the spacing rules skip over.
        if space.mode == Mode::Text {
            let mut ord = make_ord(ctx, node, options)?;
            if let (Some(class_name), Some(classes)) = (class_name, ord.classes_mut()) {
                classes.push((*class_name).to_owned());
            }
            return Ok(ord);
        }
        let mut classes = vec!["mspace".to_owned()];
        classes.extend(class_name.map(str::to_owned));
        let symbol = mathsym(ctx, &space.text, Mode::Math, options, Vec::new())?;
        return Ok(make_span(classes, vec![symbol.into()], Some(options), None).into());
    }

    if let Some(class_name) = CSS_SPACE.get(space.text.as_str()) {
        let classes = vec!["mspace".to_owned(), (*class_name).to_owned()];
        return Ok(make_span(classes, Vec::new(), Some(options), None).into());
    }

    Err(ParseError::with_token("Unknown type of space", node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_node::ParseNodeSymbol;

    fn space(mode: Mode, text: &str) -> ParseNode {
        ParseNode::Spacing(ParseNodeSymbol {
            mode,
            loc: None,
            text: text.to_owned(),
        })
    }

    #[test]
    fn math_spaces_are_mspace_spans() {
        let ctx = TypesetContext::shared();
        let built = builder(&space(Mode::Math, "\\ "), &Options::default(), ctx).unwrap();
        assert_eq!(built.classes(), ["mspace"]);
        assert!(built.is_space());
        let tie = builder(&space(Mode::Math, "\\nobreakspace"), &Options::default(), ctx).unwrap();
        assert_eq!(tie.classes(), ["mspace", "nobreak"]);
    }

    #[test]
    fn break_controls_are_empty() {
        let ctx = TypesetContext::shared();
        let built = builder(&space(Mode::Math, "\\allowbreak"), &Options::default(), ctx).unwrap();
        assert_eq!(built.classes(), ["mspace", "allowbreak"]);
        assert!(built.children().is_empty());
    }

    #[test]
    fn text_spaces_are_ords() {
        let ctx = TypesetContext::shared();
        let built = builder(&space(Mode::Text, " "), &Options::default(), ctx).unwrap();
        assert_eq!(built.classes()[0], "mord");
    }
}
