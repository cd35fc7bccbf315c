mod setup;

use setup::{
    approx_eq, default_ctx, display_settings, get_built, get_expression, get_parsed, get_span, it,
    nonstrict_settings, strict_settings,
};
use texbox::{
    ParseError, RenderNode, Settings, namespace::KeyMap, parser::parse_node::ParseNode,
    style::Style,
};

fn first_class(node: &RenderNode) -> &str {
    node.classes().first().map_or("", String::as_str)
}

#[test]
fn a_superscript() {
    it("lays out x^2 with TeX's shifts", || {
        let built = get_built("x^2", &Settings::default())?;
        assert_eq!(built.len(), 1);
        let node = &built[0];
        assert_eq!(node.classes(), ["mord"]);
        assert!(approx_eq(node.height(), 0.8141079999999999), "{}", node.height());
        assert!(approx_eq(node.depth(), 0.0));

        assert_let!(RenderNode::Symbol(x) = &node.children()[0]);
        assert_eq!(x.text, "x");
        assert!(approx_eq(x.height, 0.43056));
        assert!(approx_eq(x.depth, 0.0));
        assert!(approx_eq(x.skew, 0.02778));
        assert!(approx_eq(x.width, 0.57153));

        assert_let!(RenderNode::Span(msupsub) = &node.children()[1]);
        assert_eq!(msupsub.classes, ["msupsub"]);
        assert!(approx_eq(msupsub.height, 0.8141079999999999));
        assert!(approx_eq(msupsub.max_font_size, 0.7));
        Ok(())
    });
}

#[test]
fn a_fraction() {
    it("wraps \\frac in null delimiters", || {
        let built = get_built("\\frac{1}{2}", &Settings::default())?;
        assert_eq!(built.len(), 1);
        let frac = &built[0];
        let children = frac.children();
        assert_eq!(children.len(), 3);
        assert!(children[0].has_class("mopen") && children[0].has_class("nulldelimiter"));
        assert!(children[1].has_class("mfrac"));
        assert!(children[2].has_class("mclose") && children[2].has_class("nulldelimiter"));
        assert!(approx_eq(frac.height(), 0.845108), "{}", frac.height());
        assert!(approx_eq(frac.depth(), 0.345), "{}", frac.depth());
        Ok(())
    });
}

#[test]
fn a_display_radical() {
    it("raises the radicand image in display style", || {
        let span = get_span("\\sqrt{3}", &display_settings())?;
        assert_eq!(span.classes, ["katex-display"]);
        let mut tops = Vec::new();
        RenderNode::from(span).walk(&mut |node, _| {
            if let Some(top) = node.style().and_then(|style| style.top) {
                tops.push(top);
            }
        });
        assert!(
            tops.iter().any(|&top| approx_eq(top, -2.916095)),
            "no box at -2.916095em in {tops:?}"
        );
        Ok(())
    });
}

#[test]
fn explicit_spaces() {
    it("keeps a control space as its own box", || {
        let boxes = get_expression("x\\ b", &Settings::default())?;
        assert_eq!(boxes.len(), 3);
        assert!(boxes[1].has_class("mspace"));
        Ok(())
    });

    it("adds thin glue after punctuation", || {
        let boxes = get_expression("[h; c]", &Settings::default())?;
        assert_eq!(boxes.len(), 6, "{boxes:#?}");
        assert_eq!(first_class(&boxes[0]), "mopen");
        assert_eq!(first_class(&boxes[2]), "mpunct");
        assert_eq!(first_class(&boxes[3]), "mspace");
        assert_eq!(first_class(&boxes[5]), "mclose");
        Ok(())
    });
}

#[test]
fn binary_operator_cancellation() {
    it("turns a leading bin into an ord", || {
        let built = get_built("+x", &Settings::default())?;
        assert_eq!(first_class(&built[0]), "mord");
        Ok(())
    });

    it("keeps a bin between ords", || {
        let built = get_built("x+y", &Settings::default())?;
        let classes: Vec<_> = built.iter().map(first_class).collect();
        assert_eq!(classes, ["mord", "mspace", "mbin", "mspace", "mord"]);
        Ok(())
    });
}

#[test]
fn line_breaking_runs() {
    it("splits the formula after relations", || {
        let span = get_span("a=b", &Settings::default())?;
        assert_let!(RenderNode::Span(html) = &span.children[0]);
        assert!(html.classes.iter().any(|c| c == "katex-html"));
        assert_eq!(html.children.len(), 2);
        for base in &html.children {
            assert!(base.has_class("base"));
            assert!(base.children()[0].has_class("strut"));
        }
        Ok(())
    });
}

#[test]
fn left_right() {
    it("parses a \\left ... \\right pair", || {
        let tree = get_parsed("\\left( x \\right.", &Settings::default())?;
        assert_let!([ParseNode::LeftRight(group)] = tree.as_slice());
        assert_eq!(group.left, "(");
        assert_eq!(group.right, ".");
        assert_eq!(group.body.len(), 1);
        Ok(())
    });

    it("colors the right delimiter with the group's color", || {
        let tree = get_parsed("\\left( \\color{red} x \\right)", &Settings::default())?;
        assert_let!([ParseNode::LeftRight(group)] = tree.as_slice());
        assert_eq!(group.right_color.as_deref(), Some("red"));
        Ok(())
    });

    it("lays out an inner box between delimiters", || {
        let built = get_built("\\left(\\frac{a}{b}\\right)", &Settings::default())?;
        assert_eq!(built.len(), 1);
        let inner = &built[0];
        assert!(inner.has_class("minner"));
        let children = inner.children();
        assert!(children[0].has_class("mopen"));
        assert!(children[children.len() - 1].has_class("mclose"));
        Ok(())
    });

    it("rejects a missing \\right", || {
        expect!("\\left( x").not_to_parse(&Settings::default())
    });

    it("rejects delimiters that cannot be sized", || {
        let err = get_parsed("\\bigl x", &Settings::default()).unwrap_err();
        assert_eq!(err.message(), "Invalid delimiter: 'x' after '\\bigl'");
        Ok(())
    });

    it("sizes \\big delimiters", || {
        let tree = get_parsed("\\Bigr]", &Settings::default())?;
        assert_let!([ParseNode::DelimSizing(delim)] = tree.as_slice());
        assert_eq!(delim.size, 2);
        assert_eq!(delim.mclass, "mclose");
        expect!("\\bigl( x \\bigr)").to_build(&Settings::default())
    });
}

#[test]
fn styles_and_fonts() {
    it("parses style declarations to the end of the group", || {
        let tree = get_parsed("a{\\scriptstyle b c}d", &Settings::default())?;
        assert_eq!(tree.len(), 3);
        assert_let!(ParseNode::OrdGroup(group) = &tree[1]);
        assert_let!([ParseNode::Styling(styling)] = group.body.as_slice());
        assert_eq!(styling.style, Style::Script);
        assert_eq!(styling.body.len(), 2);
        Ok(())
    });

    it("marks script-size boxes with sizing classes", || {
        let built = get_built("\\scriptstyle x", &Settings::default())?;
        assert!(built[0].has_class("sizing"));
        Ok(())
    });

    it("treats old-style fonts like the new ones", || {
        let built = get_built("{\\bf x}", &Settings::default())?;
        let mut found = false;
        built[0].walk(&mut |node, _| found |= node.has_class("mathbf"));
        assert!(found);
        Ok(())
    });

    it("sets \\text in text mode", || {
        let built = get_built("\\text{a b}", &Settings::default())?;
        assert!(built[0].has_class("text"));
        Ok(())
    });
}

#[test]
fn user_macros() {
    it("expands macros from the settings", || {
        let mut macros = KeyMap::default();
        macros.insert("\\RR".to_owned(), "\\mathbb{R}".to_owned());
        let settings = Settings::builder().macros(macros).build();
        expect!("\\RR^n").to_parse_like("\\mathbb{R}^n", &settings)
    });

    it("stops runaway expansion", || {
        let mut macros = KeyMap::default();
        macros.insert("\\a".to_owned(), "\\a\\a".to_owned());
        let settings = Settings::builder().macros(macros).build();
        let err = texbox::parse(default_ctx(), "\\a", &settings).unwrap_err();
        assert!(err.message().starts_with("Too many expansions"));
        Ok(())
    });
}

#[test]
fn links_and_verbatim() {
    it("builds links as anchors", || {
        let built = get_built("\\href{https://example.org}{x}", &Settings::default())?;
        assert_let!(RenderNode::Anchor(anchor) = &built[0]);
        assert_eq!(anchor.href, "https://example.org");
        Ok(())
    });

    it("refuses forbidden protocols", || {
        expect!("\\href{javascript:alert(1)}{x}").not_to_parse(&Settings::default())
    });

    it("sees through disguised protocols", || {
        for url in [
            " javascript:alert(1)",
            "java\tscript:alert(1)",
            "java\nscript:alert(1)",
            "java script:alert(1)",
            "javascript&colon;alert(1)",
            "javascript&#58;alert(1)",
            "javascript&#x3A;alert(1)",
        ] {
            expect!(&format!("\\href{{{url}}}{{x}}")).not_to_parse(&Settings::default())?;
            expect!(&format!("\\url{{{url}}}")).not_to_parse(&Settings::default())?;
        }
        expect!("\\href{/docs?a=b&c=d}{x}").to_build(&Settings::default())
    });

    it("typesets \\verb in typewriter", || {
        let built = get_built("\\verb|a b|", &Settings::default())?;
        assert!(built[0].has_class("text"));
        Ok(())
    });
}

#[test]
fn spaces_and_kerns() {
    it("accepts every named space", || {
        for name in ["\\,", "\\:", "\\;", "\\!", "\\quad", "\\qquad", "\\enspace"] {
            expect!(&format!("a{name} b")).to_build(&Settings::default())?;
        }
        Ok(())
    });

    it("enforces math units under strict mode", || {
        expect!("\\kern1em").to_parse(&strict_settings())?;
        expect!("\\mkern1em").not_to_parse(&strict_settings())?;
        expect!("\\mkern1em").to_parse(&nonstrict_settings())
    });
}

#[test]
fn error_fallback() {
    it("renders the source when errors are not thrown", || {
        let settings = Settings::builder().throw_on_error(false).build();
        let span = get_span("\\frac{1}{", &settings)?;
        assert_eq!(span.classes, ["katex-error"]);
        assert_eq!(span.style.color.as_deref(), Some("#cc0000"));
        Ok(())
    });

    it("reports the error otherwise", || {
        let err: ParseError = get_span("x^2^3", &Settings::default()).unwrap_err();
        assert_eq!(err.message(), "Double superscript");
        Ok(())
    });
}

#[test]
fn accents_and_arrows() {
    it("builds every accent family", || {
        for expr in [
            "\\hat{x}",
            "\\vec{v}",
            "\\widehat{xyz}",
            "\\overrightarrow{AB}",
            "\\utilde{x}",
            "\\underleftarrow{AB}",
            "\\overbrace{a+b}^{n}",
            "\\underbrace{a+b}_{n}",
            "\\xrightarrow[below]{above}",
            "\\overline{x}",
            "\\underline{x}",
            "\\stackrel{def}{=}",
            "\\overset{a}{b}",
            "\\underset{a}{b}",
        ] {
            expect!(expr).to_build(&Settings::default())?;
        }
        Ok(())
    });

    it("classes \\xrightarrow as a relation", || {
        let built = get_built("\\xrightarrow{f}", &Settings::default())?;
        assert!(built[0].has_class("mrel") && built[0].has_class("x-arrow"));
        Ok(())
    });
}

#[test]
fn operators() {
    it("puts limits above and below in display style", || {
        let built = get_built("\\sum_{i=1}^n i", &display_settings())?;
        assert_eq!(first_class(&built[0]), "mop");
        assert!(built[0].has_class("op-limits"));
        Ok(())
    });

    it("attaches scripts to the side in text style", || {
        let built = get_built("\\sum_{i=1}^n i", &Settings::default())?;
        assert_eq!(first_class(&built[0]), "mop");
        assert!(!built[0].has_class("op-limits"));
        Ok(())
    });
}

#[test]
fn deep_nesting() {
    fn nested(open: &str, close: &str, levels: usize) -> String {
        format!("{}x{}", open.repeat(levels), close.repeat(levels))
    }
    let limit = Settings::default().max_nesting;

    // Spawned threads get the small default stack.
    let outcome = std::thread::spawn(move || {
        it("lays out nesting up to the limit", || {
            for expr in [
                nested("{", "}", limit - 1),
                nested("\\sqrt{", "}", limit / 2 - 1),
                nested("\\frac{1}{", "}", limit / 2 - 1),
                nested("x^{", "}", limit / 2 - 1),
                nested("\\left(", "\\right)", limit / 2 - 1),
            ] {
                expect!(&expr).to_build(&Settings::default())?;
            }
            Ok(())
        });

        it("fails cleanly past the limit", || {
            let err = get_parsed(&nested("{", "}", limit), &Settings::default()).unwrap_err();
            assert!(err.message().starts_with("Nesting too deep"), "{}", err.message());
            let err = get_parsed(&nested("\\sqrt{", "}", limit), &Settings::default()).unwrap_err();
            assert!(err.message().starts_with("Nesting too deep"), "{}", err.message());
            Ok(())
        });
    })
    .join();
    assert!(outcome.is_ok());
}
