//! Transform Benchmark
//!
//! Measures end-to-end fragment rewriting: parse, analysis, rehoisting and
//! printing.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use wrap_await::{TransformOptions, transform, transform_batch, transform_with_options};

// =============================================================================
// Test Sources
// =============================================================================

/// A typical REPL line.
const SIMPLE_SOURCE: &str = "const response = await fetch(url)";

/// No top-level await; exercises the early `None` exit.
const PASSTHROUGH_SOURCE: &str = r#"
async function load(url) {
    const response = await fetch(url);
    return response.json();
}
load("/data").then(console.log);
"#;

const MEDIUM_SOURCE: &str = r#"
const { data, meta: [first, ...rest] } = await load("/items");
var total = 0, count;
for (var i = 0; i < data.length; i++) {
    total += data[i].value;
}
class Summary extends (await base()) {
    constructor(items) { super(); this.items = items; }
    get size() { return this.items.length; }
}
function describe(summary) {
    return `${summary.size} items, total ${total}`;
}
describe(new Summary(data))
"#;

/// Generate a fragment with many top-level declarations.
fn generate_large_source(declarations: usize) -> String {
    let mut source = String::with_capacity(declarations * 64);
    for d in 0..declarations {
        source.push_str(&format!("const v{d} = await f({d}), w{d} = v{d} * 2;\n"));
        if d % 10 == 0 {
            source.push_str(&format!("function g{d}(x) {{ return x + {d}; }}\n"));
        }
    }
    source.push_str("v0 + w0\n");
    source
}

// =============================================================================
// Transform Benchmarks
// =============================================================================

fn bench_transform_simple(c: &mut Criterion) {
    c.bench_function("transform_simple", |b| {
        b.iter(|| black_box(transform(black_box(SIMPLE_SOURCE))))
    });
}

fn bench_transform_passthrough(c: &mut Criterion) {
    c.bench_function("transform_passthrough", |b| {
        b.iter(|| black_box(transform(black_box(PASSTHROUGH_SOURCE))))
    });
}

fn bench_transform_medium(c: &mut Criterion) {
    c.bench_function("transform_medium", |b| {
        b.iter(|| black_box(transform(black_box(MEDIUM_SOURCE))))
    });
}

/// Bytes/sec for growing fragments, ambient and object binding scopes.
fn bench_transform_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform_throughput");
    let ambient = TransformOptions::default();
    let object = TransformOptions::with_object_scope("globalThis.__scope");

    for declarations in [10, 100, 1000] {
        let source = generate_large_source(declarations);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("ambient", declarations),
            &source,
            |b, source| b.iter(|| black_box(transform_with_options(source, &ambient))),
        );
        group.bench_with_input(
            BenchmarkId::new("object_scope", declarations),
            &source,
            |b, source| b.iter(|| black_box(transform_with_options(source, &object))),
        );
    }

    group.finish();
}

fn bench_transform_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform_batch");
    let options = TransformOptions::default();
    let fragments: Vec<String> = (0..256)
        .map(|i| format!("const r{i} = await fetch('/{i}'); r{i}.status"))
        .collect();
    let bytes: usize = fragments.iter().map(String::len).sum();

    group.throughput(Throughput::Bytes(bytes as u64));
    group.bench_function("parallel", |b| {
        b.iter(|| black_box(transform_batch(&fragments, &options)))
    });
    group.bench_function("sequential", |b| {
        b.iter(|| {
            let results: Vec<_> = fragments
                .iter()
                .map(|code| transform_with_options(code, &options))
                .collect();
            black_box(results)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_transform_simple,
    bench_transform_passthrough,
    bench_transform_medium,
    bench_transform_throughput,
    bench_transform_batch,
);
criterion_main!(benches);
