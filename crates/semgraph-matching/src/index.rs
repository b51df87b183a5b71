//! Corpus reverse index.
//!
//! Maps lower-cased word representations (and `ENTITY<label>` keys) to the
//! positions at which they occur across registered documents. The
//! structural matcher uses it to find candidate document words for search
//! phrase roots; a roaring bitmap per key short-lists whole documents.

use crate::strategy::WordMatchingStrategy;
use ahash::{AHashMap, AHashSet};
use roaring::RoaringBitmap;
use semgraph_graph::{CorpusWordPosition, Index, SemanticDocument};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One occurrence of an index key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusOccurrence {
    pub position: CorpusWordPosition,
    /// Document word as it should be displayed.
    pub word: String,
    /// Whether the key is a derived form of the word rather than the word.
    pub is_derivation: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusIndex {
    entries: AHashMap<String, Vec<CorpusOccurrence>>,
    document_ids: BTreeMap<String, u32>,
    next_document_id: u32,
    documents_by_key: AHashMap<String, RoaringBitmap>,
}

impl CorpusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every representation the strategies derive from a document.
    pub fn index_document(
        &mut self,
        label: &str,
        doc: &SemanticDocument,
        strategies: &[Box<dyn WordMatchingStrategy>],
    ) {
        self.document_id_or_insert(label);
        for strategy in strategies {
            strategy.add_reverse_dict_entries(self, doc, label);
        }
        tracing::debug!(document = %label, keys = self.entries.len(), "indexed document");
    }

    fn document_id_or_insert(&mut self, label: &str) -> u32 {
        if let Some(&id) = self.document_ids.get(label) {
            return id;
        }
        let id = self.next_document_id;
        self.next_document_id += 1;
        self.document_ids.insert(label.to_string(), id);
        id
    }

    /// Records one occurrence; a position already recorded under the key is
    /// ignored.
    pub fn add_entry(
        &mut self,
        key: &str,
        document_label: &str,
        index: Index,
        word: &str,
        is_derivation: bool,
    ) {
        let id = self.document_id_or_insert(document_label);
        let position = CorpusWordPosition::new(document_label, index);
        let occurrences = self.entries.entry(key.to_string()).or_default();
        if !occurrences.iter().any(|o| o.position == position) {
            occurrences.push(CorpusOccurrence {
                position,
                word: word.to_string(),
                is_derivation,
            });
        }
        self.documents_by_key
            .entry(key.to_string())
            .or_default()
            .insert(id);
    }

    /// Drops every position of a document; keys left empty disappear.
    pub fn remove_document(&mut self, document_label: &str) -> bool {
        let Some(id) = self.document_ids.remove(document_label) else {
            return false;
        };
        self.entries.retain(|_, occurrences| {
            occurrences.retain(|o| o.position.document_label != document_label);
            !occurrences.is_empty()
        });
        self.documents_by_key.retain(|_, documents| {
            documents.remove(id);
            !documents.is_empty()
        });
        true
    }

    pub fn occurrences(&self, key: &str) -> &[CorpusOccurrence] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn positions(&self, key: &str) -> impl Iterator<Item = &CorpusWordPosition> {
        self.occurrences(key).iter().map(|o| &o.position)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CorpusOccurrence])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn document_labels(&self) -> impl Iterator<Item = &str> {
        self.document_ids.keys().map(String::as_str)
    }

    pub fn document_id(&self, label: &str) -> Option<u32> {
        self.document_ids.get(label).copied()
    }

    /// Documents in which any of `keys` occurs.
    pub fn candidate_documents<S: AsRef<str>>(&self, keys: &[S]) -> RoaringBitmap {
        let mut documents = RoaringBitmap::new();
        for key in keys {
            if let Some(found) = self.documents_by_key.get(key.as_ref()) {
                documents |= found;
            }
        }
        documents
    }

    pub fn labels_for_ids(&self, ids: &RoaringBitmap) -> Vec<&str> {
        self.document_ids
            .iter()
            .filter(|(_, id)| ids.contains(**id))
            .map(|(label, _)| label.as_str())
            .collect()
    }

    /// Number of distinct document words each key occurs on, across the
    /// corpus. Punctuation is skipped.
    pub fn words_to_corpus_frequencies(&self) -> AHashMap<String, usize> {
        let mut frequencies = AHashMap::new();
        for (key, occurrences) in &self.entries {
            if key.chars().all(|c| c.is_ascii_punctuation()) {
                continue;
            }
            let distinct: AHashSet<(&str, usize)> = occurrences
                .iter()
                .map(|o| (o.position.document_label.as_str(), o.position.index.token_index))
                .collect();
            frequencies.insert(key.clone(), distinct.len());
        }
        frequencies
    }
}

/// Highest value of a frequency table, if any.
pub fn maximum_corpus_frequency(frequencies: &AHashMap<String, usize>) -> Option<usize> {
    frequencies.values().copied().max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_deduplicated() {
        let mut index = CorpusIndex::new();
        index.add_entry("dog", "a", Index::word(1), "dog", false);
        index.add_entry("dog", "a", Index::word(1), "dogs", false);
        index.add_entry("dog", "a", Index::new(1, Some(0)), "dog", false);
        index.add_entry("dog", "b", Index::word(4), "dog", false);
        assert_eq!(index.positions("dog").count(), 3);
        assert_eq!(index.occurrences("dog")[0].word, "dog");
        assert_eq!(index.candidate_documents(&["dog"]).len(), 2);
    }

    #[test]
    fn test_remove_document() {
        let mut index = CorpusIndex::new();
        index.add_entry("dog", "a", Index::word(1), "dog", false);
        index.add_entry("cat", "a", Index::word(2), "cat", false);
        index.add_entry("dog", "b", Index::word(0), "dog", false);
        assert!(index.remove_document("a"));
        assert!(!index.remove_document("a"));
        assert!(!index.contains_key("cat"));
        assert_eq!(
            index.positions("dog").cloned().collect::<Vec<_>>(),
            vec![CorpusWordPosition::new("b", Index::word(0))]
        );
        let b = index.document_id("b").unwrap();
        assert!(index.candidate_documents(&["dog", "cat"]).contains(b));
        assert_eq!(index.candidate_documents(&["dog", "cat"]).len(), 1);
    }

    #[test]
    fn test_frequencies_count_distinct_words() {
        let mut index = CorpusIndex::new();
        index.add_entry("dog", "a", Index::word(1), "dog", false);
        index.add_entry("dog", "a", Index::new(1, Some(0)), "dog", false);
        index.add_entry("dog", "b", Index::word(3), "dog", true);
        index.add_entry(".", "a", Index::word(5), ".", false);
        let frequencies = index.words_to_corpus_frequencies();
        assert_eq!(frequencies.get("dog"), Some(&2));
        assert!(!frequencies.contains_key("."));
        assert_eq!(maximum_corpus_frequency(&frequencies), Some(2));
    }
}
