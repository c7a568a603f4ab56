use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use section_template::{HtmlTemplate, MemoryLoader, TemplateConfig};
use serde_json::json;

fn session(config: TemplateConfig) -> HtmlTemplate {
    HtmlTemplate::from_loader(Box::new(MemoryLoader::new()), config)
}

fn deep_template(depth: usize) -> (String, String) {
    let names: Vec<String> = (0..depth).map(|i| format!("sect{}", i)).collect();
    let path = names.join(".");

    let mut body = format!("<b>{{{}.value}}</b>", path);
    for (i, name) in names.iter().enumerate().rev() {
        body = format!(
            "<!-- BEGIN {0} -->\n<div class=\"level{1}\">{2}</div>\n<!-- END {0} -->",
            name, i, body
        );
    }
    (body, path)
}

fn bench_deep_nesting(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_nesting");

    for depth in [2, 6, 11] {
        let (body, path) = deep_template(depth);
        let mut tpl = session(TemplateConfig::default());
        for i in 0..10 {
            tpl.assign_section(&path, &json!({"value": i})).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("render_str", depth), &body, |b, body| {
            b.iter(|| black_box(tpl.render_str(black_box(body))))
        });
    }

    group.finish();
}

fn bench_wide_loops(c: &mut Criterion) {
    let body = r#"<table>
<!-- BEGIN row -->
  <tr><td>{row.id}</td><td>{row.name}</td><!-- SWITCH flag --><td>*</td><!-- END flag --></tr>
<!-- END row -->
</table>
<p>{footer}</p>"#;
    let mut group = c.benchmark_group("wide_loops");

    for rows in [10, 100, 1000] {
        let mut tpl = session(TemplateConfig::default());
        tpl.assign_var("footer", "end");
        tpl.enable_switch("flag");
        for id in 0..rows {
            tpl.assign_section("row", &json!({"id": id, "name": format!("item {}", id)}))
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::new("rows", rows), &body, |b, body| {
            b.iter(|| black_box(tpl.render_str(black_box(body))))
        });
    }

    group.finish();
}

fn bench_segment_cache(c: &mut Criterion) {
    let (body, path) = deep_template(6);
    let mut group = c.benchmark_group("segment_cache");

    for (label, config) in [
        ("cached", TemplateConfig::default()),
        ("uncached", TemplateConfig::no_caching()),
    ] {
        let mut tpl = session(config);
        for i in 0..50 {
            tpl.assign_section(&path, &json!({"value": i})).unwrap();
        }
        group.bench_function(label, |b| b.iter(|| black_box(tpl.render_str(&body))));
    }

    group.finish();
}

criterion_group!(benches, bench_deep_nesting, bench_wide_loops, bench_segment_cache);
criterion_main!(benches);
