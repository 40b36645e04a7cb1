use crate::core::olfactory::{family_index, DIMENSIONS};
use crate::storage::table::{parse_weight, read_table, RawTable, TableError};
use bitflags::bitflags;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File stems looked up in the data directory.
pub const ENCODING_STEM: &str = "encoding_perso";
pub const MATRIX_STEM: &str = "similarite_matrice";
pub const METADATA_STEM: &str = "parfums_enrichi";
pub const NARRATIVE_STEM: &str = "carte_identite_olfactive";

/// Extensions tried, in order, for each stem.
const EXTENSIONS: [&str; 4] = ["xlsx", "xls", "ods", "csv"];

const NAME_COLUMN: [&str; 2] = ["Nom du Parfum", "Nom"];
const BRAND_COLUMN: [&str; 1] = ["Marque"];
const IMAGE_COLUMN: [&str; 1] = ["Image"];
const LINK_COLUMN: [&str; 3] = ["Lien Achat", "lien_achat", "Lien"];
const PROFILE_NAME_COLUMN: [&str; 1] = ["Nom"];
const QUOTE_COLUMN: [&str; 1] = ["Citation"];

bitflags! {
    /// Tables that loaded successfully at startup.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LoadedTables: u8 {
        const ENCODING = 1 << 0;
        const MATRIX = 1 << 1;
        const METADATA = 1 << 2;
        const NARRATIVE = 1 << 3;
    }
}

#[derive(Debug, Clone)]
pub struct CatalogPaths {
    pub encoding: PathBuf,
    pub matrix: PathBuf,
    pub metadata: PathBuf,
    pub narrative: PathBuf,
}

impl CatalogPaths {
    /// Resolve the four sources inside `dir`, preferring spreadsheets over
    /// CSV when both exist.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            encoding: resolve_source(dir, ENCODING_STEM),
            matrix: resolve_source(dir, MATRIX_STEM),
            metadata: resolve_source(dir, METADATA_STEM),
            narrative: resolve_source(dir, NARRATIVE_STEM),
        }
    }
}

fn resolve_source(dir: &Path, stem: &str) -> PathBuf {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|path| path.exists())
        .unwrap_or_else(|| dir.join(format!("{stem}.csv")))
}

/// Personality label -> raw encoding row, already in family order when the
/// headers allowed it.
#[derive(Debug, Clone, Default)]
pub struct EncodingTable {
    rows: HashMap<String, Vec<f32>>,
}

impl EncodingTable {
    pub fn from_rows(rows: impl IntoIterator<Item = (String, Vec<f32>)>) -> Self {
        let mut table = Self::default();
        for (label, weights) in rows {
            table.rows.entry(label).or_insert(weights);
        }
        table
    }

    pub fn get(&self, label: &str) -> Option<&[f32]> {
        self.rows.get(label).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightRow {
    pub id: String,
    pub weights: Vec<f32>,
}

/// Perfume id -> weight vector, in source row order.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    rows: Vec<WeightRow>,
}

impl SimilarityMatrix {
    pub fn from_rows(rows: Vec<WeightRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[WeightRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerfumeMeta {
    pub name: String,
    pub brand: String,
    pub image: String,
    pub purchase_link: String,
}

#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    entries: HashMap<String, PerfumeMeta>,
}

impl MetadataTable {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, PerfumeMeta)>) -> Self {
        let mut table = Self::default();
        for (id, meta) in entries {
            table.entries.entry(id).or_insert(meta);
        }
        table
    }

    pub fn get(&self, id: &str) -> Option<&PerfumeMeta> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Narrative {
    pub name: String,
    pub quote: String,
}

#[derive(Debug, Clone, Default)]
pub struct NarrativeTable {
    entries: HashMap<String, Narrative>,
}

impl NarrativeTable {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Narrative)>) -> Self {
        let mut table = Self::default();
        for (label, narrative) in entries {
            table.entries.entry(label).or_insert(narrative);
        }
        table
    }

    pub fn get(&self, label: &str) -> Option<&Narrative> {
        self.entries.get(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The four reference tables. Built once before serving, read-only after.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub encodings: EncodingTable,
    pub matrix: SimilarityMatrix,
    pub metadata: MetadataTable,
    pub narratives: NarrativeTable,
    pub loaded: LoadedTables,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            encodings: EncodingTable::default(),
            matrix: SimilarityMatrix::default(),
            metadata: MetadataTable::default(),
            narratives: NarrativeTable::default(),
            loaded: LoadedTables::empty(),
        }
    }
}

impl Catalog {
    /// Load every table. A table that fails to load is logged and left
    /// empty; this never fails.
    pub fn load(paths: &CatalogPaths) -> Self {
        let mut loaded = LoadedTables::empty();

        let encodings = load_or_empty(&paths.encoding, LoadedTables::ENCODING, &mut loaded, |raw| {
            parse_encodings(raw).map(EncodingTable::from_rows)
        });
        let matrix = load_or_empty(&paths.matrix, LoadedTables::MATRIX, &mut loaded, |raw| {
            parse_matrix(raw).map(SimilarityMatrix::from_rows)
        });
        let metadata = load_or_empty(&paths.metadata, LoadedTables::METADATA, &mut loaded, |raw| {
            parse_metadata(raw).map(MetadataTable::from_entries)
        });
        let narratives = load_or_empty(&paths.narrative, LoadedTables::NARRATIVE, &mut loaded, |raw| {
            parse_narratives(raw).map(NarrativeTable::from_entries)
        });

        info!(
            encodings = encodings.len(),
            perfumes = matrix.len(),
            metadata = metadata.len(),
            narratives = narratives.len(),
            "Catalog ready"
        );

        Self {
            encodings,
            matrix,
            metadata,
            narratives,
            loaded,
        }
    }

    pub fn load_dir(dir: &Path) -> Self {
        Self::load(&CatalogPaths::in_dir(dir))
    }
}

fn load_or_empty<T, F>(path: &Path, flag: LoadedTables, loaded: &mut LoadedTables, parse: F) -> T
where
    T: Default,
    F: FnOnce(RawTable) -> Result<T, TableError>,
{
    match read_table(path).and_then(parse) {
        Ok(table) => {
            info!(path = %path.display(), "Loaded table");
            loaded.insert(flag);
            table
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Table unavailable, using empty placeholder");
            T::default()
        }
    }
}

/// Map each data column to its family slot. `Some` only when every family
/// is present, otherwise columns stay positional.
fn family_permutation(header: &[String]) -> Option<[usize; DIMENSIONS]> {
    let mut slots = [None; DIMENSIONS];
    for (column, label) in header.iter().enumerate() {
        if let Some(slot) = family_index(label) {
            slots[slot].get_or_insert(column);
        }
    }

    let mut permutation = [0; DIMENSIONS];
    for (slot, column) in slots.iter().enumerate() {
        permutation[slot] = (*column)?;
    }
    Some(permutation)
}

/// Numeric rows, reordered into family order when the header allows it.
/// A realigned table rejects rows whose width differs from the header;
/// positional tables keep them as-is and the ranker reports them.
fn parse_weight_rows(raw: RawTable) -> Result<Vec<(String, Vec<f32>)>, TableError> {
    let permutation = family_permutation(&raw.header);
    if permutation.is_none() {
        warn!(columns = raw.header.len(), "Family headers not recognised, keeping column order");
    }

    let mut rows = Vec::with_capacity(raw.rows.len());
    for row in raw.rows {
        if permutation.is_some() && row.cells.len() != raw.header.len() {
            return Err(TableError::RaggedRow {
                row: row.key,
                expected: raw.header.len(),
                actual: row.cells.len(),
            });
        }

        let mut weights = Vec::with_capacity(row.cells.len());
        for (column, cell) in row.cells.iter().enumerate() {
            let header = raw.header.get(column).map(String::as_str).unwrap_or("");
            weights.push(parse_weight(&row.key, header, cell)?);
        }

        let weights = match permutation {
            Some(perm) => perm.iter().map(|&c| weights[c]).collect(),
            None => weights,
        };
        rows.push((row.key, weights));
    }
    Ok(rows)
}

fn parse_encodings(raw: RawTable) -> Result<Vec<(String, Vec<f32>)>, TableError> {
    parse_weight_rows(raw)
}

fn parse_matrix(raw: RawTable) -> Result<Vec<WeightRow>, TableError> {
    Ok(parse_weight_rows(raw)?
        .into_iter()
        .map(|(id, weights)| WeightRow { id, weights })
        .collect())
}

fn parse_metadata(raw: RawTable) -> Result<Vec<(String, PerfumeMeta)>, TableError> {
    let name = raw.column(&NAME_COLUMN).ok_or(TableError::MissingColumn("Nom du Parfum"))?;
    let brand = raw.column(&BRAND_COLUMN).ok_or(TableError::MissingColumn("Marque"))?;
    let image = raw.column(&IMAGE_COLUMN);
    let link = raw.column(&LINK_COLUMN);

    let cell = |cells: &[String], column: Option<usize>| -> String {
        column
            .and_then(|c| cells.get(c))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    Ok(raw
        .rows
        .into_iter()
        .map(|row| {
            let meta = PerfumeMeta {
                name: cell(&row.cells, Some(name)),
                brand: cell(&row.cells, Some(brand)),
                image: cell(&row.cells, image),
                purchase_link: cell(&row.cells, link),
            };
            (row.key, meta)
        })
        .collect())
}

fn parse_narratives(raw: RawTable) -> Result<Vec<(String, Narrative)>, TableError> {
    let name = raw.column(&PROFILE_NAME_COLUMN).ok_or(TableError::MissingColumn("Nom"))?;
    let quote = raw.column(&QUOTE_COLUMN).ok_or(TableError::MissingColumn("Citation"))?;

    Ok(raw
        .rows
        .into_iter()
        .map(|row| {
            let narrative = Narrative {
                name: row.cells.get(name).map(|v| v.trim().to_string()).unwrap_or_default(),
                quote: row.cells.get(quote).map(|v| v.trim().to_string()).unwrap_or_default(),
            };
            (row.key, narrative)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::olfactory::OLFACTORY_FAMILIES;
    use std::fs;

    fn family_header() -> String {
        OLFACTORY_FAMILIES.join(",")
    }

    fn weights_csv(values: &[f32]) -> String {
        values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
    }

    #[test]
    fn loads_all_four_tables() {
        let dir = tempfile::tempdir().unwrap();
        let row: Vec<f32> = (0..DIMENSIONS).map(|i| i as f32 / 100.0).collect();

        fs::write(
            dir.path().join("encoding_perso.csv"),
            format!("MBTI,{}\nENFJ,{}\n", family_header(), weights_csv(&row)),
        )
        .unwrap();
        fs::write(
            dir.path().join("similarite_matrice.csv"),
            format!("id,{}\n1,{}\n2,{}\n", family_header(), weights_csv(&row), weights_csv(&row)),
        )
        .unwrap();
        fs::write(
            dir.path().join("parfums_enrichi.csv"),
            "id,Nom du Parfum,Marque,Image,Lien Achat\n1,Shalimar,Guerlain,1.png,https://example.com/1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("carte_identite_olfactive.csv"),
            "MBTI,Nom,Citation\nENFJ,Le Mentor,Inspirer les autres\n",
        )
        .unwrap();

        let catalog = Catalog::load_dir(dir.path());

        assert_eq!(catalog.loaded, LoadedTables::all());
        assert_eq!(catalog.encodings.get("ENFJ"), Some(row.as_slice()));
        assert_eq!(catalog.matrix.len(), 2);
        assert_eq!(catalog.matrix.rows()[0].id, "1");
        assert_eq!(catalog.metadata.get("1").unwrap().purchase_link, "https://example.com/1");
        assert_eq!(catalog.narratives.get("ENFJ").unwrap().name, "Le Mentor");
    }

    #[test]
    fn missing_sources_yield_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::load_dir(dir.path());

        assert_eq!(catalog.loaded, LoadedTables::empty());
        assert!(catalog.encodings.is_empty());
        assert!(catalog.matrix.is_empty());
        assert!(catalog.metadata.is_empty());
        assert!(catalog.narratives.is_empty());
    }

    #[test]
    fn accented_shuffled_headers_are_realigned() {
        let dir = tempfile::tempdir().unwrap();
        let mut header: Vec<String> = OLFACTORY_FAMILIES.iter().map(|s| s.to_uppercase()).collect();
        header[0] = "Ambrée".to_string();
        header.swap(0, 1);
        let mut values: Vec<f32> = (0..DIMENSIONS).map(|i| i as f32).collect();
        values.swap(0, 1);

        fs::write(
            dir.path().join("encoding_perso.csv"),
            format!("MBTI,{}\nENFJ,{}\n", header.join(","), weights_csv(&values)),
        )
        .unwrap();

        let catalog = Catalog::load_dir(dir.path());
        let expected: Vec<f32> = (0..DIMENSIONS).map(|i| i as f32).collect();
        assert_eq!(catalog.encodings.get("ENFJ"), Some(expected.as_slice()));
    }

    #[test]
    fn unknown_headers_keep_positional_order() {
        let raw = RawTable {
            header: vec!["x".into(), "y".into()],
            rows: vec![crate::storage::table::RawRow {
                key: "1".into(),
                cells: vec!["0.5".into(), "0.25".into()],
            }],
        };
        let rows = parse_matrix(raw).unwrap();
        assert_eq!(rows[0].weights, vec![0.5, 0.25]);
    }

    #[test]
    fn non_numeric_matrix_fails_the_table() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("similarite_matrice.csv"),
            format!("id,{}\n1,oops{}\n", family_header(), ",0".repeat(DIMENSIONS - 1)),
        )
        .unwrap();

        let catalog = Catalog::load_dir(dir.path());
        assert!(!catalog.loaded.contains(LoadedTables::MATRIX));
        assert!(catalog.matrix.is_empty());
    }

    #[test]
    fn metadata_without_brand_fails_the_table() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("parfums_enrichi.csv"), "id,Nom du Parfum\n1,Shalimar\n").unwrap();

        let catalog = Catalog::load_dir(dir.path());
        assert!(catalog.metadata.is_empty());
        assert!(!catalog.loaded.contains(LoadedTables::METADATA));
    }

    #[test]
    fn metadata_optional_columns_default_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("parfums_enrichi.csv"), "id,Nom du Parfum,Marque\n7,Angel,Mugler\n").unwrap();

        let catalog = Catalog::load_dir(dir.path());
        let meta = catalog.metadata.get("7").unwrap();
        assert_eq!(meta.brand, "Mugler");
        assert_eq!(meta.image, "");
        assert_eq!(meta.purchase_link, "");
    }

    #[test]
    fn first_duplicate_key_wins() {
        let table = NarrativeTable::from_entries(vec![
            ("ENFJ".to_string(), Narrative { name: "first".into(), quote: String::new() }),
            ("ENFJ".to_string(), Narrative { name: "second".into(), quote: String::new() }),
        ]);
        assert_eq!(table.get("ENFJ").unwrap().name, "first");
    }

    #[test]
    fn ragged_row_under_realigned_header_fails_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut header: Vec<&str> = OLFACTORY_FAMILIES.iter().rev().copied().collect();
        header.push("Total");
        let full: Vec<f32> = (0..=DIMENSIONS).map(|i| i as f32).collect();

        fs::write(
            dir.path().join("similarite_matrice.csv"),
            format!(
                "id,{}\n1,{}\n2,{}\n",
                header.join(","),
                weights_csv(&full),
                weights_csv(&full[..DIMENSIONS])
            ),
        )
        .unwrap();

        let raw = read_table(&dir.path().join("similarite_matrice.csv")).unwrap();
        assert!(matches!(
            parse_matrix(raw),
            Err(TableError::RaggedRow { expected: 19, actual: 18, .. })
        ));

        let catalog = Catalog::load_dir(dir.path());
        assert!(!catalog.loaded.contains(LoadedTables::MATRIX));
        assert!(catalog.matrix.is_empty());
    }

    #[test]
    fn realigned_header_with_extra_column_drops_it() {
        let mut header: Vec<String> = OLFACTORY_FAMILIES.iter().rev().map(|s| s.to_string()).collect();
        header.push("Total".into());
        let cells: Vec<String> = (0..DIMENSIONS).rev().map(|i| i.to_string()).chain(["99".to_string()]).collect();
        let raw = RawTable {
            header,
            rows: vec![crate::storage::table::RawRow { key: "1".into(), cells }],
        };

        let rows = parse_matrix(raw).unwrap();
        let expected: Vec<f32> = (0..DIMENSIONS).map(|i| i as f32).collect();
        assert_eq!(rows[0].weights, expected);
    }

    #[test]
    fn loads_matrix_from_xlsx_workbook() {
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/similarite_matrice.xlsx");
        let missing = tempfile::tempdir().unwrap();
        let paths = CatalogPaths {
            matrix: fixture,
            ..CatalogPaths::in_dir(missing.path())
        };

        let catalog = Catalog::load(&paths);

        assert_eq!(catalog.loaded, LoadedTables::MATRIX);
        let rows = catalog.matrix.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "1");
        assert_eq!(rows[1].id, "2");

        // Headers are reversed and accented in the workbook.
        let expected: Vec<f32> = (0..DIMENSIONS).map(|i| i as f32).collect();
        assert_eq!(rows[0].weights, expected);
        assert_eq!(rows[1].weights, vec![0.5; DIMENSIONS]);
    }

    #[test]
    fn narrative_cells_are_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("carte_identite_olfactive.csv"),
            "MBTI,Nom,Citation\nENFJ,  Le Mentor ,\" Inspirer les autres  \"\n",
        )
        .unwrap();

        let catalog = Catalog::load_dir(dir.path());
        let narrative = catalog.narratives.get("ENFJ").unwrap();
        assert_eq!(narrative.name, "Le Mentor");
        assert_eq!(narrative.quote, "Inspirer les autres");
    }

    #[test]
    fn spreadsheet_preferred_over_csv() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("encoding_perso.csv"), "").unwrap();
        fs::write(dir.path().join("encoding_perso.xlsx"), "").unwrap();

        let paths = CatalogPaths::in_dir(dir.path());
        assert_eq!(paths.encoding, dir.path().join("encoding_perso.xlsx"));
        assert_eq!(paths.matrix, dir.path().join("similarite_matrice.csv"));
    }
}
