use std::fmt::Write as _;
use std::fs;
use std::hint::black_box;
use std::path::Path;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode, Throughput};
use lexid::{Trainer, TrainerConfig};

fn write_synthetic_corpus(dir: &Path) -> usize {
    let mut total_bytes = 0usize;
    for (code, seed) in [("aa", 3usize), ("bb", 5), ("cc", 7)] {
        let mut body = String::new();
        for line in 0..512 {
            for position in 0..12 {
                let word = (line * seed + position * position) % 97;
                write!(body, "w{seed}{word} ").expect("write to string");
            }
            body.push('\n');
        }
        total_bytes += body.len();
        fs::write(dir.join(format!("lang-{code}.txt")), body).expect("write corpus file");
    }
    total_bytes
}

fn bench_training(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let total_bytes = write_synthetic_corpus(dir.path());
    let cfg = TrainerConfig::builder()
        .show_progress(false)
        .build()
        .expect("configuration");

    let mut group = c.benchmark_group("train_language_corpus");
    group.throughput(Throughput::Bytes(total_bytes as u64));
    group.sampling_mode(SamplingMode::Flat);
    group.bench_function(BenchmarkId::from_parameter("3_languages"), |b| {
        b.iter(|| {
            let trainer = Trainer::new(cfg.clone());
            let artifacts = trainer.train(dir.path()).expect("training");
            let _ = black_box(artifacts);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_training);
criterion_main!(benches);
