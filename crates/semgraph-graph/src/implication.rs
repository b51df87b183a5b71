//! Dependency-implication table.
//!
//! For each search-phrase dependency label, the document labels that satisfy
//! it under normal polarity and those that satisfy it only when the document
//! edge points the other way (reverse matching).

use crate::error::ImplicationError;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchImplication {
    pub search_phrase_dependency: String,
    pub document_dependencies: Vec<String>,
    #[serde(default)]
    pub reverse_document_dependencies: Vec<String>,
}

impl MatchImplication {
    pub fn new(search_phrase_dependency: &str, document_dependencies: &[&str]) -> Self {
        Self {
            search_phrase_dependency: search_phrase_dependency.to_string(),
            document_dependencies: document_dependencies.iter().map(|s| s.to_string()).collect(),
            reverse_document_dependencies: Vec::new(),
        }
    }

    pub fn with_reverse(mut self, reverse_document_dependencies: &[&str]) -> Self {
        self.reverse_document_dependencies = reverse_document_dependencies
            .iter()
            .map(|s| s.to_string())
            .collect();
        self
    }

    fn validate(&self) -> Result<(), ImplicationError> {
        let label = &self.search_phrase_dependency;
        for list in [&self.document_dependencies, &self.reverse_document_dependencies] {
            let mut seen = AHashSet::new();
            for dependency in list {
                if dependency == label {
                    return Err(ImplicationError::ContainsSelf(label.clone()));
                }
                if !seen.insert(dependency) {
                    return Err(ImplicationError::Duplicate {
                        label: label.clone(),
                        duplicate: dependency.clone(),
                    });
                }
            }
        }
        if let Some(overlap) = self
            .document_dependencies
            .iter()
            .find(|d| self.reverse_document_dependencies.contains(d))
        {
            return Err(ImplicationError::Overlap {
                label: label.clone(),
                overlap: overlap.clone(),
            });
        }
        Ok(())
    }
}

/// Validated set of implications keyed by search-phrase label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImplicationTable {
    implications: AHashMap<String, MatchImplication>,
}

impl ImplicationTable {
    pub fn new(
        implications: impl IntoIterator<Item = MatchImplication>,
    ) -> Result<Self, ImplicationError> {
        let mut map = AHashMap::new();
        for implication in implications {
            implication.validate()?;
            let key = implication.search_phrase_dependency.clone();
            if map.insert(key.clone(), implication).is_some() {
                return Err(ImplicationError::DuplicateKey(key));
            }
        }
        Ok(Self { implications: map })
    }

    pub fn get(&self, label: &str) -> Option<&MatchImplication> {
        self.implications.get(label)
    }

    pub fn len(&self) -> usize {
        self.implications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.implications.is_empty()
    }

    /// Whether a document edge label satisfies a search-phrase edge label.
    ///
    /// With `inverse_polarity` the two edges point in opposite directions and
    /// only the reverse list applies; identical labels do not match then.
    pub fn dependency_labels_match(
        &self,
        search_phrase_label: &str,
        document_label: &str,
        inverse_polarity: bool,
    ) -> bool {
        let implication = self.implications.get(search_phrase_label);
        if inverse_polarity {
            implication.is_some_and(|i| {
                i.reverse_document_dependencies
                    .iter()
                    .any(|d| d == document_label)
            })
        } else {
            search_phrase_label == document_label
                || implication.is_some_and(|i| {
                    i.document_dependencies.iter().any(|d| d == document_label)
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ImplicationTable {
        ImplicationTable::new([
            MatchImplication::new("nsubj", &["csubj", "pobjb"]).with_reverse(&["amod"]),
            MatchImplication::new("pobj", &["pcomp"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_normal_polarity() {
        let table = table();
        assert!(table.dependency_labels_match("nsubj", "nsubj", false));
        assert!(table.dependency_labels_match("nsubj", "pobjb", false));
        assert!(!table.dependency_labels_match("nsubj", "amod", false));
        assert!(table.dependency_labels_match("dobj", "dobj", false));
        assert!(!table.dependency_labels_match("dobj", "nsubj", false));
    }

    #[test]
    fn test_inverse_polarity() {
        let table = table();
        assert!(table.dependency_labels_match("nsubj", "amod", true));
        assert!(!table.dependency_labels_match("nsubj", "nsubj", true));
        assert!(!table.dependency_labels_match("pobj", "pcomp", true));
    }

    #[test]
    fn test_rejects_self_reference() {
        let result = ImplicationTable::new([MatchImplication::new("nsubj", &["nsubj"])]);
        assert_eq!(
            result.unwrap_err(),
            ImplicationError::ContainsSelf("nsubj".into())
        );
    }

    #[test]
    fn test_rejects_duplicates_and_overlap() {
        let result = ImplicationTable::new([MatchImplication::new("nsubj", &["csubj", "csubj"])]);
        assert!(matches!(
            result.unwrap_err(),
            ImplicationError::Duplicate { .. }
        ));
        let result = ImplicationTable::new([
            MatchImplication::new("amod", &["compound"]).with_reverse(&["compound"])
        ]);
        assert!(matches!(result.unwrap_err(), ImplicationError::Overlap { .. }));
        let result = ImplicationTable::new([
            MatchImplication::new("pobj", &["pcomp"]),
            MatchImplication::new("pobj", &["prep"]),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ImplicationError::DuplicateKey("pobj".into())
        );
    }
}
