//! Word-level match records.

use semgraph_graph::Index;
use serde::{Deserialize, Serialize};

/// How a search phrase word came to match a document word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordMatchType {
    Direct,
    Derivation,
    Entity,
    Question,
    Ontology,
    Embedding,
    EntityEmbedding,
}

impl WordMatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Derivation => "derivation",
            Self::Entity => "entity",
            Self::Question => "question",
            Self::Ontology => "ontology",
            Self::Embedding => "embedding",
            Self::EntityEmbedding => "entity_embedding",
        }
    }
}

impl std::fmt::Display for WordMatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subword of the matched document word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedSubword {
    pub index: usize,
    /// Word the subword is written on; differs from the matched word when
    /// the subword is shared through a conjunction.
    pub containing_token_index: usize,
}

/// A match between one search phrase word and one document word, subword
/// or multiword span.
///
/// Strategies fill in what was matched; negation, uncertainty and the
/// structurally matched word are set by the structural matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordMatch {
    pub search_phrase_index: usize,
    /// Representation of the search word that matched.
    pub search_phrase_word: String,
    pub document_index: usize,
    /// First and last words of a multiword match; both equal
    /// `document_index` otherwise.
    pub first_document_index: usize,
    pub last_document_index: usize,
    pub document_subword: Option<MatchedSubword>,
    pub document_word: String,
    pub word_match_type: WordMatchType,
    pub similarity_measure: f32,
    pub is_negated: bool,
    pub is_uncertain: bool,
    /// Document word whose edges matched the search phrase structure. With
    /// coreference this is a mention of `document_index`, not the word
    /// itself.
    pub structurally_matched_document_index: usize,
    /// Most specific term for the document word in its coreference chain.
    pub extracted_word: String,
    /// Ontology hops between the two words; 0 for other match types.
    pub depth: i32,
    pub explanation: String,
    pub search_phrase_initial_question_word: bool,
}

impl WordMatch {
    pub(crate) fn new(
        search_phrase_index: usize,
        search_phrase_word: &str,
        document_index: usize,
        document_word: &str,
        word_match_type: WordMatchType,
        explanation: String,
    ) -> Self {
        Self {
            search_phrase_index,
            search_phrase_word: search_phrase_word.to_string(),
            document_index,
            first_document_index: document_index,
            last_document_index: document_index,
            document_subword: None,
            document_word: document_word.to_string(),
            word_match_type,
            similarity_measure: 1.0,
            is_negated: false,
            is_uncertain: false,
            structurally_matched_document_index: document_index,
            extracted_word: document_word.to_string(),
            depth: 0,
            explanation,
            search_phrase_initial_question_word: false,
        }
    }

    pub(crate) fn with_span(mut self, first: usize, last: usize) -> Self {
        self.first_document_index = first;
        self.last_document_index = last;
        self
    }

    pub(crate) fn with_subword(mut self, index: usize, containing_token_index: usize) -> Self {
        self.document_subword = Some(MatchedSubword {
            index,
            containing_token_index,
        });
        self
    }

    pub(crate) fn with_extracted_word(mut self, extracted_word: String) -> Self {
        self.extracted_word = extracted_word;
        self
    }

    pub(crate) fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub(crate) fn with_similarity(mut self, similarity: f32) -> Self {
        self.similarity_measure = similarity;
        self
    }

    pub fn involves_coreference(&self) -> bool {
        self.document_index != self.structurally_matched_document_index
    }

    pub fn document_position(&self) -> Index {
        Index::new(self.document_index, self.document_subword.map(|s| s.index))
    }
}

// ============================================================================
// Explanations
// ============================================================================

const ONTOLOGY_DEPTH_NAMES: [&str; 9] = [
    "an ancestor",
    "a great-grandparent",
    "a grandparent",
    "a parent",
    "a synonym",
    "a child",
    "a grandchild",
    "a great-grandchild",
    "a descendant",
];

fn percent(similarity: f32) -> i32 {
    (similarity * 100.0) as i32
}

pub fn direct_explanation(search_word: &str) -> String {
    format!("Matches {} directly.", search_word.to_uppercase())
}

pub fn derivation_explanation(search_word: &str) -> String {
    format!("Has a common stem with {}.", search_word.to_uppercase())
}

pub fn entity_explanation(search_word: &str) -> String {
    format!("Has an entity label matching {}.", search_word.to_uppercase())
}

pub fn question_explanation(search_word: &str) -> String {
    format!("Matches the question word {}.", search_word.to_uppercase())
}

/// Depths beyond four hops in either direction share a name.
pub fn ontology_explanation(search_word: &str, depth: i32) -> String {
    let slot = (depth.clamp(-4, 4) + 4) as usize;
    format!(
        "Is {} of {} in the ontology.",
        ONTOLOGY_DEPTH_NAMES[slot],
        search_word.to_uppercase()
    )
}

pub fn embedding_explanation(similarity: f32, search_word: &str) -> String {
    format!(
        "Has a word embedding that is {}% similar to {}.",
        percent(similarity),
        search_word.to_uppercase()
    )
}

pub fn entity_embedding_explanation(similarity: f32, search_word: &str) -> String {
    format!(
        "Has an entity label that is {}% similar to the word embedding corresponding to {}.",
        percent(similarity),
        search_word.to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ontology_depth_names_clamp() {
        assert_eq!(
            ontology_explanation("vehicle", 1),
            "Is a child of VEHICLE in the ontology."
        );
        assert_eq!(
            ontology_explanation("animal", 0),
            "Is a synonym of ANIMAL in the ontology."
        );
        assert_eq!(
            ontology_explanation("animal", 7),
            "Is a descendant of ANIMAL in the ontology."
        );
        assert_eq!(
            ontology_explanation("animal", -9),
            "Is an ancestor of ANIMAL in the ontology."
        );
    }

    #[test]
    fn test_similarity_is_truncated() {
        assert_eq!(
            embedding_explanation(0.876, "dog"),
            "Has a word embedding that is 87% similar to DOG."
        );
        assert_eq!(
            entity_embedding_explanation(0.5, "person"),
            "Has an entity label that is 50% similar to the word embedding corresponding to PERSON."
        );
    }

    #[test]
    fn test_coreference_involvement() {
        let mut word_match = WordMatch::new(0, "dog", 3, "dog", WordMatchType::Direct, direct_explanation("dog"));
        assert!(!word_match.involves_coreference());
        word_match.structurally_matched_document_index = 7;
        assert!(word_match.involves_coreference());
        assert_eq!(word_match.document_position(), Index::word(3));
    }
}
