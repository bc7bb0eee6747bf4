use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pdx_script::{ScriptParser, ScriptWriter, Tokenizer};
use std::hint::black_box;

/// Build a focus tree with `count` focuses.
fn focus_tree(count: usize) -> String {
    let mut text = String::from("focus_tree = {\n\tid = bench_focus\n");
    for i in 0..count {
        text.push_str(&format!(
            "\tfocus = {{\n\t\tid = FOCUS_{i}\n\t\tx = {i} y = 0\n\t\tcost = 10\n\
             \t\tprerequisite = {{ focus = FOCUS_{prev} }}\n\
             \t\tsearch_filters = {{ FOCUS_FILTER_INDUSTRY FOCUS_FILTER_RESEARCH }}\n\
             \t\tavailable = {{ has_war = no num_of_factories > {i} }}\n\
             \t\tcompletion_reward = {{ add_political_power = 120 name = \"Focus {i}\" }}\n\t}}\n",
            i = i,
            prev = i.saturating_sub(1),
        ));
    }
    text.push_str("}\n");
    text
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    for count in [10, 100, 1000] {
        let input = focus_tree(count);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| black_box(Tokenizer::tokenize(input)));
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let parser = ScriptParser::new();
    let mut group = c.benchmark_group("parse");
    for count in [10, 100, 1000] {
        let input = focus_tree(count);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| black_box(parser.parse(input)));
        });
    }
    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let parser = ScriptParser::new();
    let writer = ScriptWriter::new();
    let mut group = c.benchmark_group("write");
    for count in [10, 100, 1000] {
        let Ok(script) = parser.parse(&focus_tree(count)) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(count), &script, |b, script| {
            b.iter(|| black_box(writer.write(script)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_write);
criterion_main!(benches);
