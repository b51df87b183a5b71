use super::{embedding_display_word, working_threshold, WordMatchingStrategy};
use crate::helper::MatchingHelper;
use crate::search_phrase::SearchPhrase;
use crate::word_match::{embedding_explanation, WordMatch, WordMatchType};
use semgraph_graph::{cosine_similarity, SemanticDocument, Subword};
use std::sync::Arc;

/// Cosine similarity of word vectors above the per-word threshold.
pub struct EmbeddingStrategy {
    helper: Arc<MatchingHelper>,
}

impl EmbeddingStrategy {
    pub fn new(helper: Arc<MatchingHelper>) -> Self {
        Self { helper }
    }

    /// The similarity must exceed the working threshold; a similarity equal
    /// to it is rejected.
    fn check(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
        subword: Option<&Subword>,
    ) -> Option<WordMatch> {
        let search_word = phrase.word(search_index);
        if !phrase.has_vector_slot(search_index) || !self.helper.embedding_matching_permitted(search_word) {
            return None;
        }
        let search_vector = phrase.vector(search_index)?;
        let (document_vector, document_word) = match subword {
            Some(subword) => {
                if !self.helper.embedding_matching_permitted_for_subword(subword) {
                    return None;
                }
                (subword.vector.as_deref(), subword.lemma.as_str())
            }
            None => {
                let word = &doc.words[document_index];
                if !self.helper.embedding_matching_permitted(word) {
                    return None;
                }
                (word.vector.as_deref(), word.raw_lemma.as_str())
            }
        };
        let similarity = cosine_similarity(search_vector, document_vector?);
        if similarity <= working_threshold(&self.helper, phrase, search_index) {
            return None;
        }
        let display_word = embedding_display_word(phrase, search_index);
        let word_match = WordMatch::new(
            search_index,
            &display_word,
            document_index,
            document_word,
            WordMatchType::Embedding,
            embedding_explanation(similarity, &display_word),
        )
        .with_similarity(similarity);
        Some(match subword {
            Some(subword) => word_match.with_subword(subword.index, subword.containing_token_index),
            None => word_match,
        })
    }
}

impl WordMatchingStrategy for EmbeddingStrategy {
    fn match_type(&self) -> WordMatchType {
        WordMatchType::Embedding
    }

    fn is_embedding_based(&self) -> bool {
        true
    }

    fn match_word(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
    ) -> Option<WordMatch> {
        self.check(phrase, search_index, doc, document_index, None)
    }

    fn match_subword(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
        subword: &Subword,
    ) -> Option<WordMatch> {
        self.check(phrase, search_index, doc, document_index, Some(subword))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;
    use crate::helper::MatchingHelper;
    use approx::assert_relative_eq;
    use semgraph_graph::{Lexicon, MatchingConfig, RawDocumentBuilder};
    use semgraph_lang_en::EnglishAdapter;

    fn helper(threshold: f32) -> Arc<MatchingHelper> {
        let lexicon = Lexicon::new()
            .with_vector("dog", vec![1.0, 0.2, 0.0])
            .with_vector("hound", vec![0.9, 0.3, 0.0])
            .with_vector("cat", vec![0.0, 0.1, 1.0]);
        Arc::new(MatchingHelper::new(
            Arc::new(EnglishAdapter::new().with_lexicon(lexicon)),
            MatchingConfig::default().with_overall_similarity_threshold(threshold),
        ))
    }

    fn document(helper: &MatchingHelper, noun: &str) -> SemanticDocument {
        testing::normalize(
            helper,
            &RawDocumentBuilder::new()
                .token("The", "the", "DET", "DT", "det", 1)
                .token(noun, noun, "NOUN", "NN", "ROOT", 1)
                .build(),
        )
    }

    #[test]
    fn test_similar_vectors_match_above_threshold() {
        let helper = helper(0.9);
        let phrase = testing::phrase(
            &helper,
            &RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 1)
                .token("dog", "dog", "NOUN", "NN", "ROOT", 1)
                .build(),
        );
        let strategy = EmbeddingStrategy::new(Arc::clone(&helper));
        let word_match = strategy.match_word(&phrase, 1, &document(&helper, "hound"), 1).unwrap();
        let expected = cosine_similarity(&[1.0, 0.2, 0.0], &[0.9, 0.3, 0.0]);
        assert_relative_eq!(word_match.similarity_measure, expected, epsilon = 1e-6);
        assert_eq!(word_match.document_word, "hound");
        assert!(strategy.match_word(&phrase, 1, &document(&helper, "cat"), 1).is_none());
    }

    #[test]
    fn test_similarity_equal_to_threshold_is_rejected() {
        let lexicon = Lexicon::new()
            .with_vector("puppy", vec![1.0, 0.0, 0.0])
            .with_vector("whelp", vec![1.0, 0.0, 0.0]);
        let adapter = Arc::new(EnglishAdapter::new().with_lexicon(lexicon));
        let raw_phrase = RawDocumentBuilder::new()
            .token("A", "a", "DET", "DT", "det", 1)
            .token("puppy", "puppy", "NOUN", "NN", "ROOT", 1)
            .build();
        for (threshold, matches) in [(1.0, false), (0.99, true)] {
            let helper = Arc::new(MatchingHelper::new(
                adapter.clone(),
                MatchingConfig::default().with_overall_similarity_threshold(threshold),
            ));
            let phrase = testing::phrase(&helper, &raw_phrase);
            let strategy = EmbeddingStrategy::new(Arc::clone(&helper));
            let word_match = strategy.match_word(&phrase, 1, &document(&helper, "whelp"), 1);
            assert_eq!(word_match.is_some(), matches, "threshold {threshold}");
        }
    }
}
