//! Benchmark suite for definition parsing, identifiers and resolution

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cxxdoc_core::domain::parse_declaration;
use cxxdoc_core::{CppDomain, DefExpr, DocContext, ObjectKind, RefRole};

const FUNCTIONS: &[&str] = &[
    "void foo(int x = 0) const",
    "explicit Foo(const std::string &s)",
    "int operator[](int i) const",
    "virtual void draw() const = 0",
    "static std::map<std::string, std::vector<int>> index(const char* path, size_t hint = 64)",
    "operator bool() const",
    "unsigned long long hash(const void* data, size_t len, unsigned int seed = 0x9747b28c)",
];

/// Build a domain with `classes` classes of four methods each
fn generate_domain(classes: usize) -> CppDomain {
    let mut domain = CppDomain::new();
    let ctx = DocContext::new("bench");
    for i in 0..classes {
        let class = domain
            .describe(&ctx, ObjectKind::Class, &format!("ns::Class{i}"))
            .expect("class signature parses");
        let inner = ctx.nested(&class);
        for method in ["void reset()", "int size() const", "bool empty() const", "void swap(Class& other)"] {
            domain
                .describe(&inner, ObjectKind::Function, method)
                .expect("method signature parses");
        }
    }
    domain
}

fn bench_parse_function(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_function");
    group.throughput(Throughput::Elements(FUNCTIONS.len() as u64));
    group.bench_function("mixed", |b| {
        b.iter(|| {
            for source in FUNCTIONS {
                black_box(parse_declaration(ObjectKind::Function, black_box(source)).ok());
            }
        });
    });
    group.finish();
}

fn bench_identifier(c: &mut Criterion) {
    let decls: Vec<_> = FUNCTIONS
        .iter()
        .filter_map(|source| parse_declaration(ObjectKind::Function, source).ok())
        .collect();

    c.bench_function("identifier", |b| {
        b.iter(|| {
            for decl in &decls {
                black_box(decl.identifier());
            }
        });
    });
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_xref");

    for size in [10, 100, 1_000] {
        let domain = generate_domain(size);
        let parent = DefExpr::path_of(["ns", "Class0"]);
        group.bench_with_input(BenchmarkId::from_parameter(size), &domain, |b, domain| {
            b.iter(|| {
                black_box(domain.resolve_xref(RefRole::Func, "size", Some(&parent)).ok());
                black_box(domain.resolve_xref(RefRole::Class, "ns::Missing", None).ok());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_function, bench_identifier, bench_resolve);
criterion_main!(benches);
