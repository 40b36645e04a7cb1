use clap::Parser;
use hdrhistogram::Histogram;
use rand::Rng;
use scent_match::core::olfactory::{OlfactoryVector, DIMENSIONS};
use scent_match::core::ranker::SimilarityRanker;
use scent_match::core::synthesizer::VectorSynthesizer;
use scent_match::storage::catalog::{SimilarityMatrix, WeightRow};
use std::time::Instant;

/// Time top-k ranking over a synthetic catalog
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 5_000)]
    num_perfumes: usize,

    #[arg(short, long, default_value_t = 1_000)]
    queries: usize,

    #[arg(short, long, default_value_t = 5)]
    k: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    println!("=== Benchmark: N={}, Dim={} ===", args.num_perfumes, DIMENSIONS);

    // 1. Generate Data
    println!("Generating data...");
    let mut rng = rand::thread_rng();
    let rows = (0..args.num_perfumes)
        .map(|i| WeightRow {
            id: i.to_string(),
            weights: (0..DIMENSIONS).map(|_| rng.gen()).collect(),
        })
        .collect();
    let matrix = SimilarityMatrix::from_rows(rows);

    // 2. Benchmark ranking
    println!("Benchmarking ranking ({} queries)...", args.queries);
    let mut histogram = Histogram::<u64>::new(3)?;
    let start = Instant::now();
    for _ in 0..args.queries {
        let base = OlfactoryVector::new(std::array::from_fn(|_| rng.gen()));
        let query = VectorSynthesizer::finalize(&base);

        let t = Instant::now();
        let ranked = SimilarityRanker::rank(&query, &matrix, args.k);
        histogram.record(t.elapsed().as_micros() as u64)?;
        assert_eq!(ranked.len(), args.k.min(args.num_perfumes));
    }
    let duration = start.elapsed();

    println!("Total time: {:.2?}", duration);
    println!("QPS: {:.2}", args.queries as f64 / duration.as_secs_f64());
    println!(
        "Latency (us): p50={} p99={} max={}",
        histogram.value_at_quantile(0.5),
        histogram.value_at_quantile(0.99),
        histogram.max()
    );

    Ok(())
}
