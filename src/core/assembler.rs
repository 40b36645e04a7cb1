use crate::core::olfactory::{OlfactoryVector, OLFACTORY_FAMILIES};
use crate::core::ranker::RankedEntry;
use crate::storage::catalog::{MetadataTable, NarrativeTable};
use serde::Serialize;
use tracing::{debug, warn};

/// One recommended perfume, as sent to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerfumeMatch {
    pub nom: String,
    pub marque: String,
    pub score: f32,
    pub image: String,
    pub lien_achat: String,
}

/// Parallel label/value sequences for a radar chart, in family order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarData {
    pub labels: Vec<&'static str>,
    pub values: Vec<f32>,
}

impl From<&OlfactoryVector> for RadarData {
    fn from(vector: &OlfactoryVector) -> Self {
        Self {
            labels: OLFACTORY_FAMILIES.to_vec(),
            values: vector.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "MBTI")]
    pub mbti: String,
    pub profil_nom: String,
    pub citation: String,
    pub radar_data: RadarData,
    pub parfums: Vec<PerfumeMatch>,
}

pub struct ResponseAssembler;

impl ResponseAssembler {
    /// Join ranked ids with metadata. Ids without metadata are dropped.
    pub fn perfumes(ranked: &[RankedEntry], metadata: &MetadataTable) -> Vec<PerfumeMatch> {
        ranked
            .iter()
            .filter_map(|entry| {
                let Some(meta) = metadata.get(&entry.id) else {
                    debug!(id = %entry.id, "No metadata for ranked perfume, skipping");
                    return None;
                };
                Some(PerfumeMatch {
                    nom: meta.name.clone(),
                    marque: meta.brand.clone(),
                    score: entry.score,
                    image: meta.image.clone(),
                    lien_achat: meta.purchase_link.clone(),
                })
            })
            .collect()
    }

    /// Display name and quote for `label`; empty strings when unknown.
    pub fn narrative(label: &str, narratives: &NarrativeTable) -> (String, String) {
        match narratives.get(label) {
            Some(n) => (n.name.clone(), n.quote.clone()),
            None => {
                warn!(label, "No narrative for personality");
                (String::new(), String::new())
            }
        }
    }

    pub fn assemble(
        label: String,
        vector: &OlfactoryVector,
        ranked: &[RankedEntry],
        metadata: &MetadataTable,
        narratives: &NarrativeTable,
    ) -> Recommendation {
        let (profil_nom, citation) = Self::narrative(&label, narratives);
        Recommendation {
            mbti: label,
            profil_nom,
            citation,
            radar_data: RadarData::from(vector),
            parfums: Self::perfumes(ranked, metadata),
        }
    }
}
