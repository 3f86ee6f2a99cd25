use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use geostream::prelude::*;

fn payload(i: u64, geotagged: bool) -> String {
    let coordinates = if geotagged {
        r#"{"type":"Point","coordinates":[-122.4,37.7]}"#
    } else {
        "null"
    };
    format!(
        r#"{{"id":{i},"user":{{"id":{}}},"created_at":"Wed Oct 10 20:19:24 +0000 2018","coordinates":{coordinates},"lang":"en","text":"line one\nline\ttwo","retweeted_status":{{"id":{},"text":"short","extended_tweet":{{"full_text":"the\tfull\nreshared text"}}}}}}"#,
        i % 1_000,
        i + 1
    )
}

/// Parse, classify and normalize a mix of geotagged and plain posts
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for geotagged_ratio in [1, 10, 100] {
        let lines: Vec<String> = (0..1_000u64)
            .map(|i| payload(i, i % geotagged_ratio == 0))
            .collect();
        group.throughput(Throughput::Elements(lines.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("one_in", geotagged_ratio),
            &lines,
            |b, lines| {
                b.iter(|| {
                    let mut stored = 0usize;
                    for line in lines {
                        if let Ok(StreamMessage::Post(post)) = StreamMessage::parse(line) {
                            if let Ok(Some(record)) = normalize(&post) {
                                black_box(record.sanitized().to_line());
                                stored += 1;
                            }
                        }
                    }
                    stored
                })
            },
        );
    }

    group.finish();
}

fn bench_sanitize(c: &mut Criterion) {
    let clean = "a perfectly ordinary post without separators ".repeat(6);
    let dirty = "tab\there\nnewline\r\n".repeat(16);

    c.bench_function("sanitize_clean", |b| b.iter(|| black_box(sanitize(black_box(&clean)))));
    c.bench_function("sanitize_dirty", |b| b.iter(|| black_box(sanitize(black_box(&dirty)))));
}

criterion_group!(benches, bench_normalize, bench_sanitize);
criterion_main!(benches);
