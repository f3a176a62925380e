use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pepnorm::design::{ExperimentDesign, SdrfRow};
use pepnorm::feature::{FeatureRecord, MemorySource, RawFeature};
use pepnorm::normalize::{NormalizedFeature, QuantileAccumulator};
use pepnorm::pipeline::{Pipeline, PipelineConfig};
use pepnorm::rollup::{rollup, PeptideIntensity, PeptidoformSelection};
use pepnorm::scratch::MemoryScratch;

const PEPTIDES: [&str; 8] = [
    "PEPTIDEAAK",
    "PEPTIDECCK",
    "PEPT(Oxidation)IDEDDK",
    "ELVISLIVESK",
    "SAMPLERPEPTIDE",
    "LVNELTEFAK",
    "AEFVEVTK",
    "QTALVELLK",
];

/// Generate features for `samples` LFQ runs, `rows` per run
fn generate_features(samples: usize, rows: usize) -> Vec<RawFeature> {
    let mut features = Vec::with_capacity(samples * rows);
    for s in 0..samples {
        for i in 0..rows {
            features.push(RawFeature {
                protein_accessions: format!("sp|P{:05}|PROT{}_HUMAN", i % 50, i % 50),
                peptidoform: format!("{}{}", PEPTIDES[i % PEPTIDES.len()], i % 97),
                charge: 2 + (i % 3) as i32,
                intensity: 1e5 + ((i * 7919 + s * 104_729) % 1_000_000) as f64,
                reference: format!("run{}.mzML", s),
                run: s.to_string(),
                condition: if s % 2 == 0 { "A" } else { "B" }.to_string(),
                bio_replicate: s.to_string(),
                ..Default::default()
            });
        }
    }
    features
}

fn design(samples: usize) -> ExperimentDesign {
    let rows = (0..samples)
        .map(|s| SdrfRow::new(&format!("PXD1-S{}", s), &format!("run{}.mzML", s), "label free sample"))
        .collect();
    ExperimentDesign::from_rows(rows).unwrap()
}

fn record(i: usize) -> FeatureRecord {
    FeatureRecord {
        protein: format!("PROT{}", i % 50),
        peptidoform: format!("{}{}", PEPTIDES[i % PEPTIDES.len()], i % 97),
        canonical: format!("{}{}", PEPTIDES[i % PEPTIDES.len()], i % 97),
        charge: 2 + (i % 3) as i32,
        intensity: 1e5 + ((i * 7919) % 1_000_000) as f64,
        run: "1".to_string(),
        condition: "A".to_string(),
        bio_replicate: (i % 2).to_string(),
        fraction: "1".to_string(),
        channel: None,
        sample: "PXD1-S1".to_string(),
        study: "PXD1".to_string(),
        score: None,
    }
}

/// Benchmark building the quantile reference
fn bench_quantile_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantile_reference");

    for size in [1_000, 10_000, 100_000] {
        let samples: Vec<Vec<f64>> = (0..8)
            .map(|s| (0..size).map(|i| ((i * 7919 + s * 31) % 1_000_000) as f64).collect())
            .collect();
        group.throughput(Throughput::Elements((size * samples.len()) as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &samples, |b, samples| {
            b.iter(|| {
                let mut acc = QuantileAccumulator::new();
                for sample in samples {
                    acc.observe(sample.iter().copied());
                }
                black_box(acc.freeze());
            });
        });
    }

    group.finish();
}

/// Benchmark the three-stage rollup of one sample
fn bench_rollup(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollup");

    for size in [1_000, 10_000, 100_000] {
        let rows: Vec<NormalizedFeature> = (0..size).map(|i| NormalizedFeature::new(record(i), false)).collect();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| black_box(rollup(rows.clone(), PeptidoformSelection::Intensity)));
        });
    }

    group.finish();
}

/// Benchmark a full in-memory run
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    for samples in [4, 16] {
        let rows = 5_000;
        let source = MemorySource::chunked(generate_features(samples, rows), 10_000);
        let design = design(samples);
        group.throughput(Throughput::Elements((samples * rows) as u64));

        group.bench_with_input(BenchmarkId::from_parameter(format!("{}samples", samples)), &samples, |b, _| {
            let pipeline = Pipeline::new(PipelineConfig {
                min_unique: 1,
                remove_low_frequency_peptides: true,
                ..Default::default()
            });
            b.iter(|| {
                let mut features: MemoryScratch<FeatureRecord> = MemoryScratch::new();
                let mut peptides: MemoryScratch<PeptideIntensity> = MemoryScratch::new();
                let mut out: Vec<PeptideIntensity> = Vec::new();
                let report = pipeline
                    .run_with_scratch(&source, &design, &mut features, &mut peptides, &mut out)
                    .unwrap();
                black_box(report);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_quantile_reference, bench_rollup, bench_pipeline);
criterion_main!(benches);
