use serde_json::{Map, Value};

/// Raw quiz answers, keyed by question id.
pub type Answers = Map<String, Value>;

/// Label returned by [`FixedClassifier`] when none is configured.
pub const DEFAULT_PROFILE: &str = "ENFJ";

/// Turns quiz answers into a personality label.
///
/// Implementations must be shareable across request threads. The label is the
/// join key into the encoding and narrative tables; an unknown label is not an
/// error here, downstream lookups fall back on their own.
pub trait ProfileClassifier: Send + Sync {
    fn classify(&self, answers: &Answers) -> String;
}

/// Placeholder classifier: always answers with the same label and never
/// looks at the answers.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    label: String,
}

impl FixedClassifier {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl Default for FixedClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE)
    }
}

impl ProfileClassifier for FixedClassifier {
    fn classify(&self, _answers: &Answers) -> String {
        self.label.clone()
    }
}
