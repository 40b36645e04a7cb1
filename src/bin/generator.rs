use clap::Parser;
use rand::seq::SliceRandom;
use rand::Rng;
use scent_match::core::olfactory::OLFACTORY_FAMILIES;
use scent_match::storage::catalog::{ENCODING_STEM, MATRIX_STEM, METADATA_STEM, NARRATIVE_STEM};
use std::path::{Path, PathBuf};
use std::time::Instant;

const PROFILES: [&str; 16] = [
    "INTJ", "INTP", "ENTJ", "ENTP", "INFJ", "INFP", "ENFJ", "ENFP",
    "ISTJ", "ISFJ", "ESTJ", "ESFJ", "ISTP", "ISFP", "ESTP", "ESFP",
];

const BRANDS: [&str; 6] = ["Guerlain", "Chanel", "Dior", "Hermes", "Mugler", "Lancome"];

/// Write a synthetic catalog (four CSV tables) for local runs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 500)]
    num_perfumes: usize,

    #[arg(short, long, default_value = "data")]
    output: PathBuf,
}

fn family_header(key: &str) -> Vec<String> {
    std::iter::once(key.to_string())
        .chain(OLFACTORY_FAMILIES.iter().map(|f| f.to_string()))
        .collect()
}

fn random_row(id: String, rng: &mut impl Rng) -> Vec<String> {
    std::iter::once(id)
        .chain((0..OLFACTORY_FAMILIES.len()).map(|_| format!("{:.4}", rng.gen::<f32>())))
        .collect()
}

fn csv_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}.csv"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let start = Instant::now();
    let mut rng = rand::thread_rng();

    std::fs::create_dir_all(&args.output)?;

    let mut encoding = csv::Writer::from_path(csv_path(&args.output, ENCODING_STEM))?;
    encoding.write_record(family_header("MBTI"))?;
    for profile in PROFILES {
        encoding.write_record(random_row(profile.to_string(), &mut rng))?;
    }
    encoding.flush()?;

    let mut matrix = csv::Writer::from_path(csv_path(&args.output, MATRIX_STEM))?;
    matrix.write_record(family_header("id"))?;
    let mut metadata = csv::Writer::from_path(csv_path(&args.output, METADATA_STEM))?;
    metadata.write_record(["id", "Nom du Parfum", "Marque", "Image", "Lien Achat"])?;

    for i in 0..args.num_perfumes {
        let id = i.to_string();
        matrix.write_record(random_row(id.clone(), &mut rng))?;

        let brand = BRANDS.choose(&mut rng).copied().unwrap_or("Maison");
        metadata.write_record([
            id,
            format!("Parfum {i:04}"),
            brand.to_string(),
            format!("parfum_{i:04}.png"),
            format!("https://example.com/parfums/{i:04}"),
        ])?;
    }
    matrix.flush()?;
    metadata.flush()?;

    let mut narrative = csv::Writer::from_path(csv_path(&args.output, NARRATIVE_STEM))?;
    narrative.write_record(["MBTI", "Nom", "Citation"])?;
    for profile in PROFILES {
        narrative.write_record([
            profile.to_string(),
            format!("Profil {profile}"),
            "Chaque parfum raconte une histoire.".to_string(),
        ])?;
    }
    narrative.flush()?;

    println!(
        "Wrote {} perfumes and {} profiles to {:?} in {:.2?}",
        args.num_perfumes,
        PROFILES.len(),
        args.output,
        start.elapsed()
    );
    Ok(())
}
