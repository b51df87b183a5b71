use super::{single_word_threshold, WordMatchingStrategy};
use crate::helper::MatchingHelper;
use crate::search_phrase::SearchPhrase;
use crate::word_match::{question_explanation, WordMatch, WordMatchType};
use semgraph_graph::{SemanticDocument, Subword};
use std::sync::Arc;

/// Initial question words ("who", "where", ...) against the phrases that
/// answer them. The decision itself belongs to the language adapter.
pub struct QuestionStrategy {
    helper: Arc<MatchingHelper>,
}

impl QuestionStrategy {
    pub fn new(helper: Arc<MatchingHelper>) -> Self {
        Self { helper }
    }

    fn answers(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
        subword: Option<usize>,
        vector: Option<&[f32]>,
    ) -> bool {
        let threshold = single_word_threshold(
            phrase,
            self.helper.config().initial_question_word_overall_similarity_threshold,
        );
        self.helper.adapter().question_word_matches(
            phrase.word(search_index),
            doc,
            document_index,
            subword,
            vector,
            threshold,
        )
    }

    /// Widens a named-entity noun to the run of nouns around it.
    fn answer_span(&self, doc: &SemanticDocument, document_index: usize) -> (usize, usize) {
        let profile = self.helper.profile();
        let word = &doc.words[document_index];
        let (mut first, mut last) = (document_index, document_index);
        if profile.is_noun_pos(&word.pos) && !word.ent_type.is_empty() {
            while first >= 1 && profile.is_noun_pos(&doc.words[first - 1].pos) {
                first -= 1;
            }
            while last + 1 < doc.len() && profile.is_noun_pos(&doc.words[last + 1].pos) {
                last += 1;
            }
        }
        (first, last)
    }
}

impl WordMatchingStrategy for QuestionStrategy {
    fn match_type(&self) -> WordMatchType {
        WordMatchType::Question
    }

    fn match_word(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
    ) -> Option<WordMatch> {
        let search_word = phrase.word(search_index);
        if !search_word.is_initial_question_word {
            return None;
        }
        let document_word = &doc.words[document_index];
        if !self.answers(
            phrase,
            search_index,
            doc,
            document_index,
            None,
            document_word.vector.as_deref(),
        ) {
            return None;
        }
        let (first, last) = self.answer_span(doc, document_index);
        Some(
            WordMatch::new(
                search_index,
                &search_word.lemma,
                document_index,
                &document_word.lemma,
                WordMatchType::Question,
                question_explanation(&search_word.lemma),
            )
            .with_span(first, last),
        )
    }

    fn match_subword(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
        subword: &Subword,
    ) -> Option<WordMatch> {
        // A head subword stands for its whole word.
        if subword.is_head() {
            return None;
        }
        let search_word = phrase.word(search_index);
        if !search_word.is_initial_question_word
            || !self.answers(
                phrase,
                search_index,
                doc,
                document_index,
                Some(subword.index),
                subword.vector.as_deref(),
            )
        {
            return None;
        }
        Some(
            WordMatch::new(
                search_index,
                &search_word.lemma,
                document_index,
                &subword.lemma,
                WordMatchType::Question,
                question_explanation(&subword.lemma),
            )
            .with_subword(subword.index, subword.containing_token_index),
        )
    }
}
