//! Personality-driven perfume recommendations.
//!
//! Quiz answers resolve to a personality label, the label maps to an
//! 18-dimension olfactory preference vector, and the (perturbed) vector is
//! scored against every row of a perfume similarity matrix.

pub mod api;
pub mod config;
pub mod core;
pub mod simd;
pub mod storage;
