use criterion::{criterion_group, criterion_main, Criterion};
use kakko::Parser;

fn bench_expand(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let parser = Parser::default();

    let nested = (0..32).fold("1".to_string(), |inner, _| format!("{{add:{}|1}}", inner));
    c.bench_function("nested add 32 deep", |b| {
        b.to_async(&runtime).iter(|| parser.parse(&nested))
    });

    let flat = "{set:k|v}{get:k} {pi} plain text {repeat:ab|3} ".repeat(200);
    c.bench_function("flat 200 groups", |b| {
        b.to_async(&runtime).iter(|| parser.parse(&flat))
    });

    let prose = "no expressions, only {unknown} braces and \\{escapes} ".repeat(500);
    c.bench_function("passthrough prose", |b| {
        b.to_async(&runtime).iter(|| parser.parse(&prose))
    });
}

// ベンチマークグループの定義
criterion_group!(benches, bench_expand);
criterion_main!(benches);
