//! Benchmarks for manifest creation, codec and verification.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use metatar_core::CreateConfig;
use metatar_core::NameFilter;
use metatar_core::VerifyConfig;
use metatar_core::codec::ExtendedFields;
use metatar_core::create_manifest;
use metatar_core::report::Diagnostic;
use metatar_core::report::NoopProgress;
use metatar_core::types::NanoTime;
use metatar_core::verify_manifest;
use std::fs;
use std::hint::black_box;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates `file_count` files of 4 KB each under a fresh directory.
fn create_test_directory(temp: &TempDir, file_count: usize) -> PathBuf {
    let dir = temp.path().join("bench_data");
    fs::create_dir_all(&dir).unwrap();
    let content = vec![b'x'; 4096];
    for i in 0..file_count {
        let sub = dir.join(format!("d{:02}", i % 16));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("file_{i:05}.txt")), &content).unwrap();
    }
    dir
}

fn build_manifest(root: &Path) -> Vec<u8> {
    let mut out = Vec::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    create_manifest(
        &mut out,
        &[root],
        &CreateConfig::default(),
        &mut diagnostics,
        &mut NoopProgress,
    )
    .unwrap();
    out
}

fn bench_codec(c: &mut Criterion) {
    let fields = ExtendedFields {
        size: 123_456_789,
        digest: Some("0123456789abcdef".repeat(4)),
        atime: NanoTime::from_parts(1_700_000_000, 123_456_789),
        mtime: NanoTime::from_parts(1_700_000_001, 987_654_321),
    };
    let records = fields.encode();

    let mut group = c.benchmark_group("codec");
    group.bench_function("encode", |b| b.iter(|| black_box(&fields).encode()));
    group.bench_function("decode", |b| {
        b.iter(|| {
            ExtendedFields::decode(
                Path::new("bench"),
                black_box(&records).iter().map(|(k, v)| (*k, v.as_bytes())),
            )
            .unwrap()
        });
    });
    group.finish();
}

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");
    for count in [100, 1000] {
        let temp = TempDir::new().unwrap();
        let root = create_test_directory(&temp, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &root, |b, root| {
            b.iter(|| build_manifest(black_box(root)));
        });
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");
    for count in [100, 1000] {
        let temp = TempDir::new().unwrap();
        let root = create_test_directory(&temp, count);
        let manifest = build_manifest(&root);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &manifest,
            |b, manifest| {
                b.iter(|| {
                    let mut diagnostics: Vec<Diagnostic> = Vec::new();
                    verify_manifest(
                        manifest.as_slice(),
                        &mut NameFilter::all(),
                        &VerifyConfig::default().with_check_atime(false),
                        &mut diagnostics,
                    )
                    .unwrap()
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_codec, bench_create, bench_verify);
criterion_main!(benches);
