use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use sprig_text::TextChange;
use text_size::{TextRange, TextSize};

fn program(functions: usize) -> String {
    (0..functions)
        .map(|i| {
            format!(
                "fn f{i}(a, b) {{\n  var c = a * {i} + b;\n  if (c > 10) return c;\n  return f{i}(c, b - 1);\n}}\n\n"
            )
        })
        .collect()
}

fn benchmark_reparse(c: &mut Criterion) {
    let mut group = c.benchmark_group("Incremental Benchmark");

    for functions in [10, 100] {
        let text = program(functions);
        let tree = sprig_parse::parse(&text);

        // Rename one literal in the middle of the file.
        let needle = format!("a * {} ", functions / 2);
        let Some(start) = text.find(&needle) else { continue };
        let start = TextSize::try_from(start + 4).unwrap_or_default();
        let change = TextChange::new(TextRange::at(start, TextSize::of("1")), "7");

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("reparse", functions), &tree, |b, tree| {
            b.iter(|| black_box(tree.with_text_changes(std::slice::from_ref(&change))));
        });
        group.bench_with_input(BenchmarkId::new("full_parse", functions), &text, |b, text| {
            b.iter(|| black_box(sprig_parse::parse(text)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_reparse);
criterion_main!(benches);
