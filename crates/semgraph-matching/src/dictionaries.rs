//! Flat, serializable match records for callers outside the crate.

use crate::helper::MatchingHelper;
use crate::structural::Match;
use crate::word_match::WordMatchType;
use semgraph_graph::SemanticDocument;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDictionary {
    pub search_phrase_label: String,
    pub search_phrase_text: String,
    pub document: String,
    pub index_within_document: usize,
    /// Text of every sentence from the first to the last one touched by
    /// the match.
    pub sentences_within_document: String,
    pub negated: bool,
    pub uncertain: bool,
    pub involves_coreference: bool,
    pub overall_similarity_measure: f32,
    pub word_matches: Vec<WordMatchDictionary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordMatchDictionary {
    pub search_phrase_token_index: usize,
    pub search_phrase_word: String,
    pub document_token_index: usize,
    pub first_document_token_index: usize,
    pub last_document_token_index: usize,
    pub structurally_matched_document_token_index: usize,
    pub document_subword_index: Option<usize>,
    pub document_subword_containing_token_index: Option<usize>,
    pub document_word: String,
    pub document_phrase: String,
    pub match_type: WordMatchType,
    pub negated: bool,
    pub uncertain: bool,
    pub similarity_measure: f32,
    pub involves_coreference: bool,
    pub extracted_word: String,
    pub depth: i32,
    pub explanation: String,
}

/// Builds one dictionary per match, in the order given. Matches whose
/// document is not in `documents` are skipped.
pub fn build_match_dictionaries(
    helper: &MatchingHelper,
    documents: &BTreeMap<String, SemanticDocument>,
    matches: &[Match],
) -> Vec<MatchDictionary> {
    matches
        .iter()
        .filter_map(|m| {
            let Some(doc) = documents.get(&m.document_label) else {
                tracing::warn!(document = %m.document_label, "match refers to an unregistered document");
                return None;
            };
            Some(match_dictionary(helper, doc, m))
        })
        .collect()
}

fn match_dictionary(helper: &MatchingHelper, doc: &SemanticDocument, m: &Match) -> MatchDictionary {
    let sentences = m.word_matches.iter().map(|wm| doc.words[wm.document_index].sentence);
    let sentences_within_document = match (sentences.clone().min(), sentences.max()) {
        (Some(first), Some(last)) => (first..=last)
            .map(|sentence| doc.sentence_text(sentence).trim().to_string())
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    };
    let word_matches = m
        .word_matches
        .iter()
        .map(|wm| WordMatchDictionary {
            search_phrase_token_index: wm.search_phrase_index,
            search_phrase_word: wm.search_phrase_word.clone(),
            document_token_index: wm.document_index,
            first_document_token_index: wm.first_document_index,
            last_document_token_index: wm.last_document_index,
            structurally_matched_document_token_index: wm.structurally_matched_document_index,
            document_subword_index: wm.document_subword.map(|s| s.index),
            document_subword_containing_token_index: wm.document_subword.map(|s| s.containing_token_index),
            document_word: wm.document_word.clone(),
            document_phrase: helper.dependent_phrase(
                doc,
                wm.document_index,
                wm.document_subword.map(|s| s.index),
            ),
            match_type: wm.word_match_type,
            negated: wm.is_negated,
            uncertain: wm.is_uncertain,
            similarity_measure: wm.similarity_measure,
            involves_coreference: wm.involves_coreference(),
            extracted_word: wm.extracted_word.clone(),
            depth: wm.depth,
            explanation: wm.explanation.clone(),
        })
        .collect();
    MatchDictionary {
        search_phrase_label: m.search_phrase_label.clone(),
        search_phrase_text: m.search_phrase_text.clone(),
        document: m.document_label.clone(),
        index_within_document: m.index_within_document,
        sentences_within_document,
        negated: m.is_negated,
        uncertain: m.is_uncertain,
        involves_coreference: m.involves_coreference(),
        overall_similarity_measure: m.overall_similarity_measure,
        word_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CorpusIndex;
    use crate::strategy::testing;
    use crate::structural::{MatchOptions, StructuralMatcher};
    use semgraph_graph::{MatchingConfig, RawDocumentBuilder};
    use std::sync::Arc;

    #[test]
    fn test_dictionary_covers_matched_sentences() {
        let helper = testing::helper(MatchingConfig::default());
        let doc = testing::normalize(
            &helper,
            &RawDocumentBuilder::new()
                .token("It", "it", "PRON", "PRP", "nsubj", 1)
                .token("rained", "rain", "VERB", "VBD", "ROOT", 1)
                .no_space()
                .token(".", ".", "PUNCT", ".", "punct", 1)
                .token("The", "the", "DET", "DT", "det", 4)
                .token("dog", "dog", "NOUN", "NN", "nsubj", 5)
                .token("barked", "bark", "VERB", "VBD", "ROOT", 5)
                .no_space()
                .token(".", ".", "PUNCT", ".", "punct", 5)
                .build(),
        );
        let phrase = testing::phrase(
            &helper,
            &RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 1)
                .token("dog", "dog", "NOUN", "NN", "nsubj", 2)
                .token("barks", "bark", "VERB", "VBZ", "ROOT", 2)
                .build(),
        );
        let matcher = StructuralMatcher::new(Arc::clone(&helper));
        let mut index = CorpusIndex::new();
        index.index_document("d", &doc, matcher.strategies());
        let documents = BTreeMap::from([("d".to_string(), doc)]);
        let matches = matcher.match_documents(&documents, &index, &[phrase], &MatchOptions::new());
        assert_eq!(matches.len(), 1);

        let dictionaries = build_match_dictionaries(&helper, &documents, &matches);
        let dictionary = &dictionaries[0];
        assert_eq!(dictionary.document, "d");
        assert_eq!(dictionary.index_within_document, 5);
        assert_eq!(dictionary.sentences_within_document, "The dog barked.");
        assert!(!dictionary.negated);
        assert_eq!(dictionary.word_matches.len(), 2);
        let dog = &dictionary.word_matches[0];
        assert_eq!(dog.document_token_index, 4);
        assert_eq!(dog.document_phrase, "The dog");
        assert_eq!(dog.match_type, WordMatchType::Direct);
        assert_eq!(dog.explanation, "Matches DOG directly.");

        let json = serde_json::to_value(dictionary).unwrap();
        assert_eq!(json["word_matches"][0]["match_type"], "direct");
        assert!(build_match_dictionaries(&helper, &BTreeMap::new(), &matches).is_empty());
    }
}
