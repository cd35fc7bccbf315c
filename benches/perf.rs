use criterion::{Criterion, black_box, criterion_group, criterion_main};
use texbox::{Settings, TypesetContext, parse, typeset};

/// A mix of everyday formulas, heavy on scripts, fractions and delimiters.
const CORPUS: &[&str] = &[
    r"x = \frac{-b \pm \sqrt{b^2 - 4ac}}{2a}",
    r"\sum_{i=1}^{n} i = \frac{n(n+1)}{2}",
    r"\int_0^\infty e^{-x^2}\,dx = \frac{\sqrt{\pi}}{2}",
    r"\left( \frac{a}{b} \right)^{\frac{1}{2}} \cdot \left[ x_1, x_2 \right]",
    r"\lim_{n \to \infty} \left(1 + \frac{1}{n}\right)^n = e",
    r"\hat{x} + \vec{v} + \widehat{abc} + \overbrace{a+b+c}^{3}",
    r"f(x) \xrightarrow[\text{below}]{\text{above}} g(x)",
    r"\mathbf{A}\mathbb{R}^n \mathcal{L} \text{ for all } \mathrm{d}t",
    r"\sqrt[3]{x^3 + y^3} \ne \binom{n}{k} \le \sqrt{\sqrt{\sqrt{2}}}",
    r"\bigl( \Big[ \biggl\{ x \biggr\} \Big] \bigr)",
];

fn bench_typeset(c: &mut Criterion) {
    let ctx = TypesetContext::shared();
    let inline = Settings::default();
    let display = Settings::builder().display_mode(true).build();

    c.bench_function("parse corpus", |b| {
        b.iter(|| {
            for expr in CORPUS {
                black_box(parse(ctx, black_box(expr), &inline).ok());
            }
        });
    });

    c.bench_function("typeset corpus inline", |b| {
        b.iter(|| {
            for expr in CORPUS {
                black_box(typeset(ctx, black_box(expr), &inline).ok());
            }
        });
    });

    c.bench_function("typeset corpus display", |b| {
        b.iter(|| {
            for expr in CORPUS {
                black_box(typeset(ctx, black_box(expr), &display).ok());
            }
        });
    });
}

fn bench_context(c: &mut Criterion) {
    c.bench_function("build registry", |b| b.iter(|| black_box(TypesetContext::default())));
}

criterion_group!(benches, bench_typeset, bench_context);
criterion_main!(benches);
