use crate::core::olfactory::{OlfactoryVector, DIMENSIONS};
use crate::simd::get_dot_product;
use crate::storage::catalog::SimilarityMatrix;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, PartialEq)]
pub enum ScoringError {
    #[error("Row {id:?} has {actual} weights, expected {expected}")]
    ShapeMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },
    #[error("Row {id:?} produced a non-finite score")]
    NonFinite { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub id: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    score: f32,
    row: usize,
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    // Greater == weaker match: lower score, then later row. The heap top is
    // the weakest candidate kept so far.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.row.cmp(&other.row))
    }
}

/// Brute-force dot product scoring over the whole matrix.
pub struct SimilarityRanker;

impl SimilarityRanker {
    /// Top `k` rows by raw dot product with `query`, best first. Equal scores
    /// keep source row order.
    pub fn try_rank(query: &OlfactoryVector, matrix: &SimilarityMatrix, k: usize) -> Result<Vec<RankedEntry>, ScoringError> {
        if matrix.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let dot = get_dot_product();
        let scores = matrix
            .rows()
            .par_iter()
            .map(|row| {
                if row.weights.len() != DIMENSIONS {
                    return Err(ScoringError::ShapeMismatch {
                        id: row.id.clone(),
                        expected: DIMENSIONS,
                        actual: row.weights.len(),
                    });
                }
                // Lengths checked above.
                let score = unsafe { dot(query.as_slice(), &row.weights) };
                if score.is_finite() {
                    Ok(score)
                } else {
                    Err(ScoringError::NonFinite { id: row.id.clone() })
                }
            })
            .collect::<Result<Vec<f32>, _>>()?;

        let mut heap = BinaryHeap::with_capacity(k + 1);
        for (row, score) in scores.into_iter().enumerate() {
            let candidate = Candidate { score, row };
            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().map_or(false, |worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        let rows = matrix.rows();
        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| RankedEntry {
                id: rows[c.row].id.clone(),
                score: c.score,
            })
            .collect())
    }

    /// Like [`Self::try_rank`], but any scoring failure yields no matches.
    pub fn rank(query: &OlfactoryVector, matrix: &SimilarityMatrix, k: usize) -> Vec<RankedEntry> {
        Self::try_rank(query, matrix, k).unwrap_or_else(|e| {
            warn!(error = %e, "Scoring failed, returning no matches");
            Vec::new()
        })
    }
}
