use criterion::{criterion_group, criterion_main, Criterion};
use l10n_json_template::{collect_translation_map, merge_template, parse_relaxed_json};

fn build_template(entries: usize) -> String {
    let mut template = String::from("{\n");
    for index in 0..entries {
        if index % 10 == 0 {
            template.push_str(&format!("  // Section {index}\n"));
        }
        template.push_str(&format!(
            "  \"KEY_{index}\": \"Value number {index} with an \\\"escape\\\"\",\n"
        ));
    }
    template.push_str("  \"LAST\": \"done\"\n}\n");
    template
}

fn merge_comparison(c: &mut Criterion) {
    let template = build_template(5_000);
    let translated = template.replace("Value number", "翻訳された値");
    let translations =
        collect_translation_map(&parse_relaxed_json(&translated).expect("Invalid bench input"));

    let mut group = c.benchmark_group("merge");
    group.bench_function("relaxed-read", |b| {
        b.iter(|| {
            let _ = parse_relaxed_json(&translated);
        })
    });
    group.bench_function("template-merge", |b| {
        b.iter(|| {
            let _ = merge_template(&template, &translations);
        })
    });
}

criterion_group!(benches, merge_comparison);
criterion_main!(benches);
