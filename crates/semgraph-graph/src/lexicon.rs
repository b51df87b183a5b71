//! Embedding lexicon.
//!
//! Maps lemmas to vectors and records the vocabulary used by derived-lemma
//! heuristics. Entity labels map to a lexeme whose vector stands for the
//! whole category (e.g. `PERSON` -> `person`).

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    vectors: AHashMap<String, Vec<f32>>,
    vocabulary: AHashSet<String>,
    entity_lexemes: AHashMap<String, String>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vector(mut self, lemma: &str, vector: Vec<f32>) -> Self {
        self.insert_vector(lemma, vector);
        self
    }

    pub fn with_words<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.vocabulary
            .extend(words.into_iter().map(|w| w.to_string()));
        self
    }

    pub fn with_entity_lexeme(mut self, label: &str, lexeme: &str) -> Self {
        self.entity_lexemes
            .insert(label.to_string(), lexeme.to_string());
        self
    }

    pub fn insert_vector(&mut self, lemma: &str, vector: Vec<f32>) {
        self.vocabulary.insert(lemma.to_string());
        self.vectors.insert(lemma.to_string(), vector);
    }

    /// Vector of a lemma; zero vectors count as missing.
    pub fn vector(&self, lemma: &str) -> Option<&[f32]> {
        self.vectors
            .get(lemma)
            .map(Vec::as_slice)
            .filter(|v| norm(v) > 0.0)
    }

    pub fn has_vectors(&self) -> bool {
        !self.vectors.is_empty()
    }

    /// Whether the word is known to the lexicon.
    pub fn contains(&self, word: &str) -> bool {
        self.vocabulary.contains(word) || self.vectors.contains_key(word)
    }

    pub fn entity_labels(&self) -> impl Iterator<Item = &str> {
        self.entity_lexemes.keys().map(String::as_str)
    }

    /// Vector standing for an entity category.
    pub fn entity_vector(&self, label: &str) -> Option<&[f32]> {
        self.entity_lexemes
            .get(label)
            .and_then(|lexeme| self.vector(lexeme))
    }
}

fn norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity; 0 when either vector has no magnitude or lengths differ.
pub fn cosine_similarity(first: &[f32], second: &[f32]) -> f32 {
    if first.len() != second.len() {
        return 0.0;
    }
    let denominator = norm(first) * norm(second);
    if denominator == 0.0 {
        return 0.0;
    }
    let dot: f32 = first.iter().zip(second).map(|(a, b)| a * b).sum();
    dot / denominator
}
