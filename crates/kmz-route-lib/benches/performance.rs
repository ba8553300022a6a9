//! Performance benchmarks for kmz-route-lib
//!
//! Run with: cargo bench --package kmz-route-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geo::LineString;
use kmz_route_lib::{DocumentBuilder, KmlDocument, PolygonStyle, markup, ring, utils};
use std::hint::black_box;

/// Generate a realistic KML coordinate list with the specified number of points.
fn generate_coordinates(num_points: usize, base_lat: f64, base_lon: f64) -> String {
    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            let lat = base_lat + t * 0.1 + (t * 50.0).sin() * 0.001;
            let lon = base_lon + t * 0.1 + (t * 30.0).cos() * 0.001;
            format!("{lon:.6},{lat:.6},{:.1}", 20.0 + t * 100.0)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wrap coordinate lists into a KML document, one placemark each
fn generate_kml(tracks: &[String]) -> Vec<u8> {
    let placemarks: String = tracks
        .iter()
        .map(|c| format!("<Placemark><LineString><coordinates>{c}</coordinates></LineString></Placemark>"))
        .collect();
    format!(
        r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document><TimeStamp><when>2023-05-01T10:00:00Z</when></TimeStamp>{placemarks}</Document></kml>"#
    )
    .into_bytes()
}

fn bench_parse_coordinates(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_coordinates");
    for num_points in [1_000, 10_000, 100_000] {
        let text = generate_coordinates(num_points, 51.5, -0.1);
        group.throughput(Throughput::Elements(num_points as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_points), &text, |b, text| {
            b.iter(|| markup::parse_coordinates(black_box(text)))
        });
    }
    group.finish();
}

fn bench_parse_markup(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_markup");
    for num_tracks in [1, 10, 50] {
        let tracks: Vec<String> = (0..num_tracks)
            .map(|i| generate_coordinates(5_000, 51.5 + i as f64 * 0.1, -0.1))
            .collect();
        let data = generate_kml(&tracks);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_tracks), &data, |b, data| {
            b.iter(|| markup::parse_markup(black_box(data)))
        });
    }
    group.finish();
}

fn bench_natural_sort(c: &mut Criterion) {
    let names: Vec<String> = (0..10_000)
        .rev()
        .map(|i| format!("Activity_{}_{}", i % 97, i))
        .collect();
    c.bench_function("natural_sort_10k", |b| {
        b.iter(|| {
            let mut names = names.clone();
            utils::natural_sort(black_box(&mut names));
            names
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let style = PolygonStyle::highlight();
    let rings: Vec<LineString<f64>> = (0..100)
        .map(|i| {
            let (line, _) = markup::parse_coordinates(&generate_coordinates(1_000, 40.0, i as f64));
            ring::close_ring(&line)
        })
        .collect();
    c.bench_function("render_100x1000", |b| {
        b.iter(|| {
            let mut document = KmlDocument::with_name("bench");
            for (i, ring) in rings.iter().enumerate() {
                document.add_polygon(ring, &format!("route{i}"), &style);
            }
            document.render()
        })
    });
}

criterion_group!(
    benches,
    bench_parse_coordinates,
    bench_parse_markup,
    bench_natural_sort,
    bench_render
);
criterion_main!(benches);
