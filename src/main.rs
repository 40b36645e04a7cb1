use clap::Parser;
use scent_match::core::pipeline::{Recommender, DEFAULT_TOP_K};
use scent_match::core::profile::{Answers, FixedClassifier, DEFAULT_PROFILE};
use scent_match::storage::catalog::Catalog;
use std::path::PathBuf;
use std::sync::Arc;

/// Run the quiz pipeline once and print the response JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Personality label to score
    #[arg(short, long, default_value = DEFAULT_PROFILE)]
    label: String,

    #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Quiz answers as a JSON object
    #[arg(short, long, default_value = "{}")]
    answers: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let args = Args::parse();

    let answers: Answers = serde_json::from_str(&args.answers)?;
    let catalog = Arc::new(Catalog::load_dir(&args.data_dir));
    let recommender = Recommender::new(catalog, Arc::new(FixedClassifier::new(args.label)), args.top_k);

    let recommendation = recommender.recommend(&answers);
    println!("{}", serde_json::to_string_pretty(&recommendation)?);

    Ok(())
}
