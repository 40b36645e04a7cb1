use crate::core::olfactory::{OlfactoryVector, DIMENSIONS};
use crate::storage::catalog::EncodingTable;
use rand::Rng;
use rand_distr::StandardNormal;
use thiserror::Error;
use tracing::warn;

/// Standard deviation of the per-dimension preference noise.
pub const NOISE_STD_DEV: f32 = 0.05;

#[derive(Error, Debug, PartialEq)]
pub enum LookupError {
    #[error("No encoding for personality {0:?}")]
    UnknownLabel(String),
    #[error("Encoding for {label:?} has {actual} dimensions, expected {expected}")]
    Malformed {
        label: String,
        expected: usize,
        actual: usize,
    },
}

/// Builds the per-request preference vector from a personality label.
pub struct VectorSynthesizer;

impl VectorSynthesizer {
    /// Encoded archetype for `label`, in family order.
    pub fn try_base_vector(label: &str, encodings: &EncodingTable) -> Result<OlfactoryVector, LookupError> {
        let row = encodings
            .get(label)
            .ok_or_else(|| LookupError::UnknownLabel(label.to_string()))?;

        OlfactoryVector::from_slice(row).ok_or_else(|| LookupError::Malformed {
            label: label.to_string(),
            expected: DIMENSIONS,
            actual: row.len(),
        })
    }

    /// Like [`Self::try_base_vector`], but an unresolved label yields the zero
    /// vector so the pipeline can still run end to end.
    pub fn base_vector(label: &str, encodings: &EncodingTable) -> OlfactoryVector {
        Self::try_base_vector(label, encodings).unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to zero preference vector");
            OlfactoryVector::zeros()
        })
    }

    /// Perturb with N(0, NOISE_STD_DEV) per dimension and clip into [0, 1].
    /// Uses the thread-local RNG, so concurrent requests never share state.
    pub fn finalize(base: &OlfactoryVector) -> OlfactoryVector {
        Self::finalize_with(base, &mut rand::thread_rng())
    }

    pub fn finalize_with<R: Rng + ?Sized>(base: &OlfactoryVector, rng: &mut R) -> OlfactoryVector {
        base.map(|v| {
            let noise: f32 = rng.sample(StandardNormal);
            (v + noise * NOISE_STD_DEV).clamp(0.0, 1.0)
        })
    }
}
