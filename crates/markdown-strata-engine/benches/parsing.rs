use criterion::{Criterion, criterion_group, criterion_main};
use markdown_strata_engine::{HtmlRenderer, Parser};
mod common;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let parser = Parser::commonmark();
    let content = common::generate_markdown_content(100);
    group.bench_function("mixed_document", |b| {
        b.iter(|| {
            let doc = parser.parse(std::hint::black_box(&content)).unwrap();
            std::hint::black_box(doc);
        });
    });

    let emphasis = common::generate_emphasis_heavy(200);
    group.bench_function("emphasis_heavy", |b| {
        b.iter(|| std::hint::black_box(parser.parse(std::hint::black_box(&emphasis)).unwrap()));
    });

    let quotes = common::generate_nested_quotes(200);
    group.bench_function("nested_quotes", |b| {
        b.iter(|| std::hint::black_box(parser.parse(std::hint::black_box(&quotes)).unwrap()));
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    group.sample_size(10);

    let doc = Parser::commonmark()
        .parse(&common::generate_markdown_content(100))
        .unwrap();
    let renderer = HtmlRenderer::default();
    group.bench_function("html", |b| {
        b.iter(|| std::hint::black_box(renderer.render(std::hint::black_box(&doc))));
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
