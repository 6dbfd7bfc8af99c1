use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use s5p_downloader::models::{plan_days, plan_months, YearMonth};
use s5p_downloader::readers::GridReader;
use std::io::Cursor;

// TEMIS-like grid: `bands` latitude bands of 2880 four-character values, 20 per line
fn create_test_grid(bands: usize) -> String {
    let mut text = String::from("header 1\nheader 2\nheader 3\nheader 4\n");
    for band in 0..bands {
        let lat = -89.9375 + band as f64 * 0.125;
        text.push_str(&format!(" lat= {:.4}\n", lat));
        for row in 0..144 {
            for col in 0..20 {
                let value = (band + row + col) % 1000;
                if value % 17 == 0 {
                    text.push_str("-999");
                } else {
                    text.push_str(&format!("{:04}", value));
                }
            }
            text.push('\n');
        }
    }
    text
}

fn benchmark_grid_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_decode");
    let month = YearMonth { year: 2021, month: 5 };

    for bands in [10, 50, 100].iter() {
        let grid = create_test_grid(*bands);
        group.bench_with_input(BenchmarkId::new("decode_reader", bands), bands, |b, _| {
            b.iter(|| {
                let reader = GridReader::new();
                reader
                    .decode_reader(Cursor::new(black_box(grid.as_bytes())), month)
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn benchmark_period_planning(c: &mut Criterion) {
    let start = NaiveDate::from_ymd_opt(2018, 5, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();

    c.bench_function("plan_days", |b| b.iter(|| plan_days(black_box(start), black_box(end))));
    c.bench_function("plan_months", |b| {
        b.iter(|| plan_months(black_box(start), black_box(end)))
    });
}

criterion_group!(benches, benchmark_grid_decode, benchmark_period_planning);
criterion_main!(benches);
