use super::WordMatchingStrategy;
use crate::helper::MatchingHelper;
use crate::index::CorpusIndex;
use crate::search_phrase::SearchPhrase;
use crate::word_match::{entity_explanation, WordMatch, WordMatchType};
use semgraph_graph::{Index, MultiwordSpan, SemanticDocument};
use std::sync::Arc;

/// Search words such as `ENTITYPERSON` against named entities.
pub struct EntityStrategy {
    helper: Arc<MatchingHelper>,
}

impl EntityStrategy {
    pub fn new(helper: Arc<MatchingHelper>) -> Self {
        Self { helper }
    }
}

impl WordMatchingStrategy for EntityStrategy {
    fn match_type(&self) -> WordMatchType {
        WordMatchType::Entity
    }

    fn match_multiwords(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
        spans: &[MultiwordSpan],
    ) -> Option<WordMatch> {
        let placeholder = self.helper.entity_placeholder(phrase.word(search_index))?;
        let span = spans.iter().find(|span| {
            span.token_indexes
                .iter()
                .all(|&i| self.helper.entity_placeholder_matches(placeholder, &doc.words[i]))
        })?;
        let first = *span.token_indexes.first()?;
        let last = *span.token_indexes.last()?;
        Some(
            WordMatch::new(
                search_index,
                placeholder,
                document_index,
                &span.text,
                WordMatchType::Entity,
                entity_explanation(placeholder),
            )
            .with_span(first, last),
        )
    }

    fn match_word(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
    ) -> Option<WordMatch> {
        let placeholder = self.helper.entity_placeholder(phrase.word(search_index))?;
        let document_word = &doc.words[document_index];
        if !self.helper.entity_placeholder_matches(placeholder, document_word) {
            return None;
        }
        Some(WordMatch::new(
            search_index,
            placeholder,
            document_index,
            &document_word.lowercase_text(),
            WordMatchType::Entity,
            entity_explanation(placeholder),
        ))
    }

    fn add_reverse_dict_entries(&self, index: &mut CorpusIndex, doc: &SemanticDocument, label: &str) {
        let sibling_marker_deps = self.helper.profile().sibling_marker_deps;
        for word in &doc.words {
            // Only the outermost word of an entity is indexed, so that a
            // multiword entity is found once. Siblings count as outermost.
            if !word.ent_type.is_empty()
                && (word.is_root()
                    || sibling_marker_deps.contains(&word.dep.as_str())
                    || word.ent_type != doc.words[word.head].ent_type)
            {
                let key = format!("ENTITY{}", word.ent_type);
                index.add_entry(&key, label, Index::word(word.index), &word.text, false);
            }
            if let Some(span) = self.helper.entity_defined_multiword(doc, word.index) {
                index.add_entry(&span.text.to_lowercase(), label, Index::word(word.index), &span.text, false);
            }
        }
    }
}
