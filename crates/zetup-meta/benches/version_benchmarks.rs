use criterion::{Criterion, black_box, criterion_group, criterion_main};
use zetup_meta::{RequirementSet, Version};

const REQUIREMENTS: &str = "
PyYAML>=3.10 # yaml
six>=1.9
Jinja2 >= 2.7, < 3.0 # jinja2
requests[security]~=2.7 ; python_version < \"3\"
zope.interface==4.*
";

fn version_parse_benchmark(c: &mut Criterion) {
    c.bench_function("Version::new (pep440)", |b| {
        b.iter(|| Version::new(black_box("2!1.0.3rc2.post1.dev4+local.7")))
    });

    c.bench_function("Version::new (legacy)", |b| {
        b.iter(|| Version::new(black_box("2003-06-rev-foo")))
    });
}

fn version_compare_benchmark(c: &mut Criterion) {
    let versions: Vec<Version> = (0..100)
        .map(|i| Version::new(format!("1.{}.{}", i % 7, i % 13)))
        .collect();

    c.bench_function("Version sort (100)", |b| {
        b.iter(|| {
            let mut sorted = versions.clone();
            sorted.sort();
            sorted
        })
    });
}

fn requirements_benchmark(c: &mut Criterion) {
    c.bench_function("RequirementSet::from_text", |b| {
        b.iter(|| RequirementSet::from_text(black_box(REQUIREMENTS)).unwrap())
    });

    let set = RequirementSet::from_text(REQUIREMENTS).unwrap();
    c.bench_function("RequirementSet::combine", |b| {
        b.iter(|| set.combine(black_box("mock>=1.0 # mock")).unwrap())
    });
}

criterion_group!(
    benches,
    version_parse_benchmark,
    version_compare_benchmark,
    requirements_benchmark
);
criterion_main!(benches);
