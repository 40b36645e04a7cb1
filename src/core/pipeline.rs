use crate::core::assembler::{Recommendation, ResponseAssembler};
use crate::core::profile::{Answers, ProfileClassifier};
use crate::core::ranker::SimilarityRanker;
use crate::core::synthesizer::VectorSynthesizer;
use crate::storage::catalog::Catalog;
use std::sync::Arc;
use tracing::debug;

/// Default number of perfumes returned per quiz.
pub const DEFAULT_TOP_K: usize = 5;

/// Answers -> label -> preference vector -> ranked perfumes -> response.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    classifier: Arc<dyn ProfileClassifier>,
    top_k: usize,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>, classifier: Arc<dyn ProfileClassifier>, top_k: usize) -> Self {
        Self {
            catalog,
            classifier,
            top_k,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn recommend(&self, answers: &Answers) -> Recommendation {
        let catalog = &self.catalog;

        let label = self.classifier.classify(answers);
        let base = VectorSynthesizer::base_vector(&label, &catalog.encodings);
        let vector = VectorSynthesizer::finalize(&base);
        let ranked = SimilarityRanker::rank(&vector, &catalog.matrix, self.top_k);
        debug!(label = %label, matches = ranked.len(), "Scored catalog");

        ResponseAssembler::assemble(label, &vector, &ranked, &catalog.metadata, &catalog.narratives)
    }
}
