pub mod assembler;
pub mod diagnostics;
pub mod olfactory;
pub mod pipeline;
pub mod profile;
pub mod ranker;
pub mod synthesizer;
