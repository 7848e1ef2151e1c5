use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use daily_arxiv_digest::common::parse_date;
use daily_arxiv_digest::feed::parse_feed;
use daily_arxiv_digest::index::{CategoryIndex, SortMode};
use daily_arxiv_digest::view::{filtered, view, FilterState};

const CATEGORIES: [&str; 6] = ["cs.AI", "cs.CL", "cs.CV", "cs.LG", "cs.RO", "stat.ML"];

fn sample_feed(n: usize) -> String {
    (0..n)
        .map(|i| {
            serde_json::json!({
                "title": format!("Paper {} on {}", i, if i % 7 == 0 { "transformers" } else { "optimization" }),
                "categories": [CATEGORIES[i % CATEGORIES.len()], "cs.AI"],
                "authors": [format!("Author {}", i % 50), "Grace Hopper"],
                "summary": "We study a problem and report results.",
                "id": format!("2501.{:05}", i),
                "AI": {"tldr": format!("Short summary {}", i)},
            })
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_parse_feed(c: &mut Criterion) {
    let date = parse_date("2025-01-10").unwrap();
    let text = sample_feed(200);

    let mut group = c.benchmark_group("feed");
    group.throughput(Throughput::Elements(200));

    group.bench_function("parse_feed", |b| b.iter(|| black_box(parse_feed(black_box(&text), date))));

    group.finish();
}

fn bench_view_pipeline(c: &mut Criterion) {
    let date = parse_date("2025-01-10").unwrap();
    let index = CategoryIndex::from_records(parse_feed(&sample_feed(200), date).records);

    let plain = FilterState::new();
    let mut tagged = FilterState::with_tags(["transformers"], ["Author 3"]);
    tagged.search_query = "summary 1".to_string();
    let mut category = tagged.clone();
    category.selected_category = Some("cs.CL".to_string());

    let mut group = c.benchmark_group("view");
    group.throughput(Throughput::Elements(index.len() as u64));

    group.bench_function("all_categories", |b| b.iter(|| black_box(view(&index, &plain))));
    group.bench_function("tags_and_search", |b| b.iter(|| black_box(filtered(&index, &tagged))));
    group.bench_function("single_category", |b| b.iter(|| black_box(filtered(&index, &category))));
    group.bench_function("resort_by_title", |b| b.iter(|| black_box(index.resorted(SortMode::Title))));

    group.finish();
}

criterion_group!(benches, bench_parse_feed, bench_view_pipeline);
criterion_main!(benches);
