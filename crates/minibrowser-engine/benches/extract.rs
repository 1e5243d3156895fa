//! Benchmarks for markup extraction.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use minibrowser_engine::extract;

/// Generate a page mixing paragraphs, lists, links, entities and scripts.
fn generate_mixed_page(n: usize) -> String {
    let mut html = String::from(
        "<html><head><title>Benchmark &amp; Page</title>\n\
         <style>body { color: #333; }</style></head><body>\n",
    );
    for i in 0..n {
        match i % 4 {
            0 => html.push_str(&format!(
                "<div><p>Paragraph {i} with <b>bold</b> and &quot;quoted&quot; text.</p></div>\n"
            )),
            1 => html.push_str(&format!(
                "<ul><li>List item {i}</li><li>Another &lt;item&gt;</li></ul>\n"
            )),
            2 => html.push_str(&format!(
                "<a href=\"page{i}.html\">Link {i}</a> <i>italic text</i><br>\n"
            )),
            _ => html.push_str(&format!(
                "<script>var x{i} = '<p>not text</p>';</script><h2>Heading {i}</h2>\n"
            )),
        }
    }
    html.push_str("</body></html>");
    html
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for n_elements in [50, 200, 1000] {
        let html = generate_mixed_page(n_elements);
        let label = format!("{n_elements}_elements");

        group.bench_with_input(BenchmarkId::new("extract", &label), &html, |b, html| {
            b.iter(|| extract(html));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
