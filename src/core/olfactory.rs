use serde::Serialize;

/// Number of olfactory families every preference and weight vector carries.
pub const DIMENSIONS: usize = 18;

/// The fixed olfactory families, in the order shared by every table.
pub const OLFACTORY_FAMILIES: [&str; DIMENSIONS] = [
    "Ambree",
    "Boisee Mousse",
    "Cuir",
    "Aromatique",
    "Florale",
    "Hesperidee",
    "Boisee",
    "Florale Fraiche",
    "Balsamique",
    "Verte",
    "Florale Rosee",
    "Musquee",
    "Fruitee",
    "Florale Poudree",
    "Marine",
    "Fleur D'Oranger",
    "Conifere Terpenique",
    "Aldehydee",
];

/// Canonical form of a family label: ASCII-transliterated, whitespace
/// removed, lowercased. `"Boisée Mousse"` and `"BOISEE MOUSSE"` both map to
/// `"boiseemousse"`.
pub fn normalize_key(label: &str) -> String {
    deunicode::deunicode(label)
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Position of `label` in [`OLFACTORY_FAMILIES`], compared by normalized key.
pub fn family_index(label: &str) -> Option<usize> {
    let key = normalize_key(label);
    OLFACTORY_FAMILIES
        .iter()
        .position(|family| normalize_key(family) == key)
}

/// An 18-dimension olfactory preference (or weight) vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OlfactoryVector([f32; DIMENSIONS]);

impl OlfactoryVector {
    pub fn new(values: [f32; DIMENSIONS]) -> Self {
        Self(values)
    }

    pub fn zeros() -> Self {
        Self([0.0; DIMENSIONS])
    }

    /// Returns `None` unless `values` has exactly [`DIMENSIONS`] entries.
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        values.try_into().ok().map(Self)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.0.to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.0.iter()
    }

    pub fn map(&self, f: impl FnMut(f32) -> f32) -> Self {
        Self(self.0.map(f))
    }
}

impl Default for OlfactoryVector {
    fn default() -> Self {
        Self::zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_ignores_case_accents_and_spaces() {
        let expected = normalize_key("Boisée Mousse");
        assert_eq!(expected, "boiseemousse");
        assert_eq!(normalize_key("boiseemousse"), expected);
        assert_eq!(normalize_key("BOISEE MOUSSE"), expected);
        assert_eq!(normalize_key("  Boisee\tMousse\n"), expected);
    }

    #[test]
    fn normalize_is_idempotent() {
        for label in OLFACTORY_FAMILIES.iter().chain(["Ambrée", "Hespéridée", "Fleur d’Oranger", "Conifère Terpénique"].iter()) {
            let once = normalize_key(label);
            assert_eq!(normalize_key(&once), once, "label {label:?}");
        }
    }

    #[test]
    fn family_labels_stay_distinct_after_normalization() {
        let mut keys: Vec<String> = OLFACTORY_FAMILIES.iter().map(|l| normalize_key(l)).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), DIMENSIONS);
    }

    #[test]
    fn family_index_accepts_accented_headers() {
        assert_eq!(family_index("Ambrée"), Some(0));
        assert_eq!(family_index("aldehydee"), Some(DIMENSIONS - 1));
        assert_eq!(family_index("Fleur D'Oranger"), Some(15));
        assert_eq!(family_index("Gourmande"), None);
    }

    #[test]
    fn from_slice_requires_exact_dimension() {
        assert!(OlfactoryVector::from_slice(&[0.5; DIMENSIONS]).is_some());
        assert!(OlfactoryVector::from_slice(&[0.5; DIMENSIONS - 1]).is_none());
        assert!(OlfactoryVector::from_slice(&[]).is_none());
    }
}
