//! Compiled search phrases.

use semgraph_graph::{SemanticDocument, Word};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A normalized pattern ready for structural matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPhrase {
    pub doc: SemanticDocument,
    pub doc_text: String,
    pub label: String,
    /// Words that must all find a counterpart in a document.
    pub matchable_indexes: Vec<usize>,
    /// Word at which recursive matching starts.
    pub root_index: usize,
    /// Lexicon vectors of the matchable non-entity words; `None` where the
    /// lemma has no vector. Its length is the exponent applied to the
    /// embedding thresholds.
    pub vectors: BTreeMap<usize, Option<Vec<f32>>>,
    pub topic_match_phraselet: bool,
    pub topic_match_phraselet_created_without_matching_tags: bool,
    pub question_phraselet: bool,
    /// Only matched when approached from an already matched document word.
    pub reverse_only: bool,
    /// Skipped by a first forward sweep because the parent word is too
    /// frequent in the corpus; unlike `reverse_only` it does not affect
    /// how matches are weighted downstream.
    pub treat_as_reverse_only_during_initial_pass: bool,
    pub has_single_matchable_word: bool,
    /// Lower-cased forms a document word may take to match the root word,
    /// longest first.
    pub words_matching_root: Vec<String>,
}

impl SearchPhrase {
    pub fn root(&self) -> &Word {
        &self.doc.words[self.root_index]
    }

    pub fn word(&self, index: usize) -> &Word {
        &self.doc.words[index]
    }

    pub fn matchable_words(&self) -> impl Iterator<Item = &Word> {
        self.matchable_indexes.iter().map(|&i| &self.doc.words[i])
    }

    pub fn vector(&self, index: usize) -> Option<&[f32]> {
        self.vectors.get(&index).and_then(|v| v.as_deref())
    }

    /// Whether a word takes part in embedding matching at all.
    pub fn has_vector_slot(&self, index: usize) -> bool {
        self.vectors.contains_key(&index)
    }

    /// Number of words whose similarities make up the overall similarity.
    pub fn vector_count(&self) -> usize {
        self.vectors.len()
    }

    /// Records a root form under its index key (lower case).
    pub fn add_word_matching_root(&mut self, word: &str) {
        let word = word.to_lowercase();
        if !self.words_matching_root.contains(&word) {
            self.words_matching_root.push(word);
        }
    }

    /// Longer forms first, so that multiwords are tried before their parts.
    pub(crate) fn sort_words_matching_root(&mut self) {
        self.words_matching_root
            .sort_by_key(|word| std::cmp::Reverse(word.chars().count()));
    }
}
