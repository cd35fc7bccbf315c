//! Images that stretch to the width of their content
//!
//! Wide accents, extensible arrows and horizontal braces are drawn as named
//! paths in a box as wide as the content. Renderers own the path outlines;
//! the box tree only records names, view boxes and extents.

use phf::{phf_map, phf_set};

use crate::box_tree::{PathNode, RenderNode, Span, SvgNode};
use crate::build_common::make_span;
use crate::options::Options;
use crate::types::{ParseError, ParseErrorKind};

/// Paths, minimum width in ems, height in thousandths of an em, and the
/// alignment of a single path.
struct ImageData {
    paths: &'static [&'static str],
    min_width: f64,
    height: f64,
    align: &'static str,
}

const fn image(paths: &'static [&'static str], min_width: f64, height: f64, align: &'static str) -> ImageData {
    ImageData {
        paths,
        min_width,
        height,
        align,
    }
}

static IMAGES: phf::Map<&'static str, ImageData> = phf_map! {
    "overrightarrow" => image(&["rightarrow"], 0.888, 522.0, "xMaxYMin"),
    "overleftarrow" => image(&["leftarrow"], 0.888, 522.0, "xMinYMin"),
    "underrightarrow" => image(&["rightarrow"], 0.888, 522.0, "xMaxYMin"),
    "underleftarrow" => image(&["leftarrow"], 0.888, 522.0, "xMinYMin"),
    "xrightarrow" => image(&["rightarrow"], 1.469, 522.0, "xMaxYMin"),
    "xleftarrow" => image(&["leftarrow"], 1.469, 522.0, "xMinYMin"),
    "xRightarrow" => image(&["doublerightarrow"], 1.526, 560.0, "xMaxYMin"),
    "xLeftarrow" => image(&["doubleleftarrow"], 1.526, 560.0, "xMinYMin"),
    "overleftrightarrow" => image(&["leftarrow", "rightarrow"], 0.888, 522.0, ""),
    "underleftrightarrow" => image(&["leftarrow", "rightarrow"], 0.888, 522.0, ""),
    "xleftrightarrow" => image(&["leftarrow", "rightarrow"], 1.75, 522.0, ""),
    "xmapsto" => image(&["leftmapsto", "rightarrow"], 1.5, 522.0, ""),
    "overbrace" => image(&["leftbrace", "midbrace", "rightbrace"], 1.6, 548.0, ""),
    "underbrace" => image(&["leftbraceunder", "midbraceunder", "rightbraceunder"], 1.6, 548.0, ""),
};

/// Accents drawn from a family of fixed images picked by content length.
static WIDE_ACCENTS: phf::Set<&'static str> = phf_set!("widehat", "widetilde", "utilde");

fn single_svg(path: &str, height: f64, view_box: (f64, f64), preserve: &'static str) -> SvgNode {
    SvgNode {
        paths: vec![PathNode::named(path)],
        width: None,
        height,
        view_box: (0.0, 0.0, view_box.0, view_box.1),
        preserve_aspect_ratio: Some(preserve),
    }
}

/// A wide accent over (or under) `base_len` atoms. Longer bases get wider
/// images, up to the fifth.
fn wide_accent(label: &str, base_len: usize, options: &Options) -> Span {
    let is_hat = label == "widehat";
    let (width, view_box_height, height, path) = if base_len > 5 {
        if is_hat {
            (2364.0, 420.0, 0.42, format!("{label}4"))
        } else {
            (2340.0, 312.0, 0.34, "tilde4".to_owned())
        }
    } else {
        let index = [1, 1, 2, 2, 3, 3][base_len];
        if is_hat {
            let widths = [0.0, 1062.0, 2364.0, 2364.0, 2364.0];
            let heights = [0.0, 239.0, 300.0, 360.0, 420.0];
            let ems = [0.0, 0.24, 0.3, 0.3, 0.36, 0.42];
            (widths[index], heights[index], ems[index], format!("{label}{index}"))
        } else {
            let widths = [0.0, 600.0, 1033.0, 2339.0, 2340.0];
            let heights = [0.0, 260.0, 286.0, 306.0, 312.0];
            let ems = [0.0, 0.26, 0.286, 0.3, 0.306, 0.34];
            (widths[index], heights[index], ems[index], format!("tilde{index}"))
        }
    };

    let svg = single_svg(&path, height, (width, view_box_height), "none");
    let mut span = make_span(Vec::new(), vec![svg.into()], Some(options), None);
    span.height = height;
    span.style.height = Some(height);
    span.style.min_width = Some(0.0);
    span
}

/// A stretchy image for `label` (with or without backslash). `base_len` is
/// the number of atoms the image spans, which sizes wide accents.
pub fn svg_span(label: &str, base_len: usize, options: &Options) -> Result<Span, ParseError> {
    let name = label.trim_start_matches('\\');
    if WIDE_ACCENTS.contains(name) {
        return Ok(wide_accent(name, base_len, options));
    }

    let data = IMAGES.get(name).ok_or_else(|| {
        ParseError::new(ParseErrorKind::UnknownStretchyElement {
            label: label.to_owned(),
        })
    })?;
    let height = data.height / 1000.0;
    let view_box = (400_000.0, data.height);

    let mut span = if let [path] = data.paths {
        let svg = single_svg(path, height, view_box, slice_align(data.align));
        make_span(vec!["hide-tail".to_owned()], vec![svg.into()], Some(options), None)
    } else {
        let (classes, aligns): (&[&str], &[&'static str]) = if data.paths.len() == 2 {
            (
                &["halfarrow-left", "halfarrow-right"],
                &["xMinYMin slice", "xMaxYMin slice"],
            )
        } else {
            (
                &["brace-left", "brace-center", "brace-right"],
                &["xMinYMin slice", "xMidYMin slice", "xMaxYMin slice"],
            )
        };
        let parts: Vec<RenderNode> = data
            .paths
            .iter()
            .zip(classes.iter().zip(aligns))
            .map(|(path, (class, align))| {
                let svg = single_svg(path, height, view_box, align);
                let mut part = make_span(vec![(*class).to_owned()], vec![svg.into()], Some(options), None);
                part.style.height = Some(height);
                part.into()
            })
            .collect();
        make_span(vec!["stretchy".to_owned()], parts, Some(options), None)
    };

    span.height = height;
    span.style.height = Some(height);
    span.style.min_width = Some(data.min_width);
    Ok(span)
}

fn slice_align(align: &str) -> &'static str {
    if align == "xMaxYMin" {
        "xMaxYMin slice"
    } else {
        "xMinYMin slice"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_stretch_from_one_end() {
        let span = svg_span("\\overrightarrow", 1, &Options::default()).unwrap();
        assert_eq!(span.classes[0], "hide-tail");
        assert!((span.height - 0.522).abs() < 1e-12);
        assert_eq!(span.style.min_width, Some(0.888));
        let RenderNode::Svg(svg) = &span.children[0] else {
            panic!("expected an image");
        };
        assert_eq!(svg.paths[0].name, "rightarrow");
        assert_eq!(svg.preserve_aspect_ratio, Some("xMaxYMin slice"));
    }

    #[test]
    fn braces_are_three_images() {
        let span = svg_span("\\underbrace", 3, &Options::default()).unwrap();
        assert_eq!(span.classes[0], "stretchy");
        assert_eq!(span.children.len(), 3);
        assert!(span.children[1].has_class("brace-center"));
    }

    #[test]
    fn wide_accents_grow_with_their_base() {
        let options = Options::default();
        let short = svg_span("\\widehat", 1, &options).unwrap();
        let long = svg_span("\\widehat", 9, &options).unwrap();
        assert!((short.height - 0.24).abs() < 1e-12);
        assert!((long.height - 0.42).abs() < 1e-12);
        let RenderNode::Svg(svg) = &long.children[0] else {
            panic!("expected an image");
        };
        assert_eq!(svg.paths[0].name, "widehat4");
    }

    #[test]
    fn unknown_labels_fail() {
        let err = svg_span("\\overwhatever", 1, &Options::default()).unwrap_err();
        assert_eq!(err.message(), "Unknown stretchy element: \\overwhatever");
    }
}
