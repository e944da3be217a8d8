//! Criterion microbenches for ocr-synth hot paths.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - shelf packing of many small blocks
//! - text segmentation at word and sentence granularity
//! - VOC XML label writing and parsing
//! - augmentation enumeration over a small canvas

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use image::RgbaImage;
use ocr_synth::augment::{AugmentationPlan, Figure};
use ocr_synth::ir::io_voc_xml::{from_voc_xml_str, to_voc_xml_string};
use ocr_synth::ir::{Granularity, ImageAnnotation, Region, RegionPosition};
use ocr_synth::layout::{create_rectangles, pack, Canvas};
use ocr_synth::text::segment;

const CORPUS: &str = "The quick brown fox jumps over the lazy dog. Pack my box with five dozen \
liquor jugs? Sphinx of black quartz, judge my vow. E.g. this is not a break. \
How vexingly quick daft zebras jump.\nA second paragraph follows here.";

/// Benchmark shelf packing of 1000 blocks.
fn bench_pack(c: &mut Criterion) {
    let sized: Vec<(u32, u32, Option<&str>)> = (0..1000u32)
        .map(|i| (8 + i % 40, 12 + i % 7, None))
        .collect();
    let canvas = Canvas::new(1920, 1080);

    let mut group = c.benchmark_group("layout");
    group.throughput(Throughput::Elements(sized.len() as u64));
    group.bench_function("pack_1000", |b| {
        b.iter(|| {
            let placed = pack(black_box(&canvas), create_rectangles(black_box(&sized)));
            black_box(placed)
        })
    });
    group.finish();
}

/// Benchmark segmentation at word and sentence granularity.
fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    group.throughput(Throughput::Bytes(CORPUS.len() as u64));

    for granularity in [Granularity::Word, Granularity::Sentence] {
        group.bench_function(granularity.name(), |b| {
            b.iter(|| black_box(segment(black_box(CORPUS), granularity, true)))
        });
    }
    group.finish();
}

/// Benchmark label file writing and parsing.
fn bench_voc(c: &mut Criterion) {
    let mut annotation = ImageAnnotation {
        size: Some((640, 480)),
        ..ImageAnnotation::default()
    };
    for i in 0..200i64 {
        annotation.push(
            Granularity::Character,
            Region::new(RegionPosition::new(i, i, i + 10, i + 12), "x"),
        );
    }
    let xml = to_voc_xml_string("annotations", "image.png", &annotation);

    let mut group = c.benchmark_group("voc_xml");
    group.throughput(Throughput::Bytes(xml.len() as u64));
    group.bench_function("to_voc_xml_string", |b| {
        b.iter(|| black_box(to_voc_xml_string("annotations", "image.png", black_box(&annotation))))
    });
    group.bench_function("from_voc_xml_str", |b| {
        b.iter(|| black_box(from_voc_xml_str(black_box(&xml)).unwrap()))
    });
    group.finish();
}

/// Benchmark the full powerset enumeration of four point figures.
fn bench_augment(c: &mut Criterion) {
    let plan = AugmentationPlan::from_figures(
        (0..4).map(|x| Figure::Point { x, y: x }).collect(),
    );
    let source = RgbaImage::new(64, 64);

    c.bench_function("augment_draws_4_points", |b| {
        b.iter(|| black_box(plan.draws(black_box(&source)).count()))
    });
}

criterion_group!(benches, bench_pack, bench_segment, bench_voc, bench_augment);
criterion_main!(benches);
