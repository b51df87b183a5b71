use super::WordMatchingStrategy;
use crate::helper::MatchingHelper;
use crate::index::CorpusIndex;
use crate::search_phrase::SearchPhrase;
use crate::word_match::{direct_explanation, WordMatch, WordMatchType};
use semgraph_graph::{Index, MultiwordSpan, SemanticDocument, Subword};
use std::sync::Arc;

/// Equality of direct representations (lemma, surface text, hyphen
/// normalized forms).
pub struct DirectStrategy {
    helper: Arc<MatchingHelper>,
}

impl DirectStrategy {
    pub fn new(helper: Arc<MatchingHelper>) -> Self {
        Self { helper }
    }
}

fn first_common<'a>(search_reprs: &'a [String], document_reprs: &'a [String]) -> Option<&'a str> {
    search_reprs
        .iter()
        .find(|repr| document_reprs.contains(*repr))
        .map(String::as_str)
}

impl WordMatchingStrategy for DirectStrategy {
    fn match_type(&self) -> WordMatchType {
        WordMatchType::Direct
    }

    fn match_multiwords(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        _doc: &SemanticDocument,
        document_index: usize,
        spans: &[MultiwordSpan],
    ) -> Option<WordMatch> {
        let search_word = phrase.word(search_index);
        if search_word.lemma.split_whitespace().count() == 1 {
            return None;
        }
        for repr in &search_word.direct_matching_reprs {
            for span in spans {
                if span.direct_matching_reprs.contains(repr) {
                    let first = *span.token_indexes.first()?;
                    let last = *span.token_indexes.last()?;
                    return Some(
                        WordMatch::new(
                            search_index,
                            repr,
                            document_index,
                            repr,
                            WordMatchType::Direct,
                            direct_explanation(&search_word.lemma),
                        )
                        .with_span(first, last),
                    );
                }
            }
        }
        None
    }

    fn match_word(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
    ) -> Option<WordMatch> {
        let search_word = phrase.word(search_index);
        let repr = first_common(
            &search_word.direct_matching_reprs,
            &doc.words[document_index].direct_matching_reprs,
        )?;
        Some(
            WordMatch::new(
                search_index,
                repr,
                document_index,
                repr,
                WordMatchType::Direct,
                direct_explanation(&search_word.lemma),
            )
            .with_extracted_word(self.helper.extracted_word(doc, document_index, repr)),
        )
    }

    fn match_subword(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        _doc: &SemanticDocument,
        document_index: usize,
        subword: &Subword,
    ) -> Option<WordMatch> {
        let search_word = phrase.word(search_index);
        let repr = first_common(&search_word.direct_matching_reprs, &subword.direct_matching_reprs)?;
        Some(
            WordMatch::new(
                search_index,
                repr,
                document_index,
                repr,
                WordMatchType::Direct,
                direct_explanation(&search_word.lemma),
            )
            .with_subword(subword.index, subword.containing_token_index),
        )
    }

    fn add_words_matching_root(&self, phrase: &mut SearchPhrase) {
        let reprs = phrase.root().direct_matching_reprs.clone();
        for repr in reprs {
            phrase.add_word_matching_root(&repr);
        }
    }

    fn add_reverse_dict_entries(&self, index: &mut CorpusIndex, doc: &SemanticDocument, label: &str) {
        for word in &doc.words {
            for repr in &word.direct_matching_reprs {
                index.add_entry(&repr.to_lowercase(), label, Index::word(word.index), repr, false);
            }
            for subword in &word.subwords {
                for repr in &subword.direct_matching_reprs {
                    index.add_entry(
                        &repr.to_lowercase(),
                        label,
                        Index::new(word.index, Some(subword.index)),
                        repr,
                        false,
                    );
                }
            }
        }
    }
}
