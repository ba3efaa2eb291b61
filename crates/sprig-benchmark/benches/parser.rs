use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};

static FILES: [(&str, &str); 3] = [
    (
        "Simple",
        r#"
        fn foo() {
            return 42;
        }
        "#,
    ),
    (
        "Medium",
        r#"
        fn foo(a, b) {
            if (a < b) { return a; }
            if (a == b) {} else { a = b; }
            while (a > 0) a = a - 1;
        }

        fn bar() {
            var x = foo(1, 2) * (3 + 4) || !false;
            print("done");
        }
        "#,
    ),
    (
        "Broken",
        r#"
        fn foo(a b {
            var = 1
            if (a { )) return
        }
        "#,
    ),
];

fn benchmark_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parser Benchmark");

    for (name, text) in FILES {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_code", name), &text, |b, &text| {
            b.iter(|| {
                let tree = sprig_parse::parse(text);
                black_box(tree);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);
