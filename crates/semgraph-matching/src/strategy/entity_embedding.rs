use super::{embedding_display_word, working_threshold, WordMatchingStrategy};
use crate::helper::MatchingHelper;
use crate::search_phrase::SearchPhrase;
use crate::word_match::{entity_embedding_explanation, WordMatch, WordMatchType};
use semgraph_graph::{MultiwordSpan, SemanticDocument};
use std::sync::Arc;

/// A search word's vector against the vector of the document word's entity
/// category, so that "person" can match a named person.
pub struct EntityEmbeddingStrategy {
    helper: Arc<MatchingHelper>,
}

impl EntityEmbeddingStrategy {
    pub fn new(helper: Arc<MatchingHelper>) -> Self {
        Self { helper }
    }

    /// Search vector, provided both words may be compared by embedding.
    fn search_vector<'a>(
        &self,
        phrase: &'a SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
    ) -> Option<&'a [f32]> {
        if !phrase.has_vector_slot(search_index)
            || !self.helper.embedding_matching_permitted(phrase.word(search_index))
        {
            return None;
        }
        let vector = phrase.vector(search_index)?;
        self.helper
            .embedding_matching_permitted(&doc.words[document_index])
            .then_some(vector)
    }

    fn check(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        search_vector: &[f32],
        doc: &SemanticDocument,
        document_index: usize,
        span: (usize, usize),
    ) -> Option<WordMatch> {
        let document_word = &doc.words[document_index];
        let similarity = self.helper.adapter().token_matches_ent_type(
            Some(search_vector),
            &[document_word.ent_type.as_str()],
            working_threshold(&self.helper, phrase, search_index),
        );
        if similarity <= 0.0 {
            return None;
        }
        let display_word = embedding_display_word(phrase, search_index);
        Some(
            WordMatch::new(
                search_index,
                &display_word,
                document_index,
                &document_word.raw_lemma,
                WordMatchType::EntityEmbedding,
                entity_embedding_explanation(similarity, &display_word),
            )
            .with_span(span.0, span.1)
            .with_similarity(similarity),
        )
    }
}

impl WordMatchingStrategy for EntityEmbeddingStrategy {
    fn match_type(&self) -> WordMatchType {
        WordMatchType::EntityEmbedding
    }

    fn is_embedding_based(&self) -> bool {
        true
    }

    fn match_multiwords(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
        spans: &[MultiwordSpan],
    ) -> Option<WordMatch> {
        let search_vector = self.search_vector(phrase, search_index, doc, document_index)?;
        let ent_type = &doc.words[document_index].ent_type;
        if ent_type.is_empty() {
            return None;
        }
        spans
            .iter()
            .filter(|span| span.token_indexes.iter().all(|&i| &doc.words[i].ent_type == ent_type))
            .find_map(|span| {
                let first = *span.token_indexes.first()?;
                let last = *span.token_indexes.last()?;
                self.check(phrase, search_index, search_vector, doc, document_index, (first, last))
            })
    }

    fn match_word(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
    ) -> Option<WordMatch> {
        let search_vector = self.search_vector(phrase, search_index, doc, document_index)?;
        if doc.words[document_index].ent_type.is_empty() {
            return None;
        }
        self.check(
            phrase,
            search_index,
            search_vector,
            doc,
            document_index,
            (document_index, document_index),
        )
    }
}
