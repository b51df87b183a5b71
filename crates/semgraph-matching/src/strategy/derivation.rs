use super::WordMatchingStrategy;
use crate::helper::MatchingHelper;
use crate::index::CorpusIndex;
use crate::search_phrase::SearchPhrase;
use crate::word_match::{derivation_explanation, WordMatch, WordMatchType};
use semgraph_graph::{Index, MultiwordSpan, SemanticDocument, Subword};
use std::sync::Arc;

/// Words sharing a derived base form: "nationalization" and "nationalize".
pub struct DerivationStrategy {
    helper: Arc<MatchingHelper>,
}

impl DerivationStrategy {
    pub fn new(helper: Arc<MatchingHelper>) -> Self {
        Self { helper }
    }
}

/// Compares one side's derived forms with the other side's direct forms,
/// in both directions.
fn common_derivation(
    search_direct: &[String],
    search_derived: Option<&Vec<String>>,
    document_direct: &[String],
    document_derived: Option<&Vec<String>>,
) -> Option<String> {
    let mut search_reprs: Vec<&String> = Vec::new();
    let mut document_reprs: Vec<&String> = Vec::new();
    if let Some(derived) = search_derived {
        search_reprs.extend(derived);
        document_reprs.extend(document_direct);
    }
    if let Some(derived) = document_derived {
        document_reprs.extend(derived);
        search_reprs.extend(search_direct);
    }
    search_reprs
        .into_iter()
        .find(|repr| document_reprs.contains(repr))
        .cloned()
}

impl WordMatchingStrategy for DerivationStrategy {
    fn match_type(&self) -> WordMatchType {
        WordMatchType::Derivation
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
        if search_word.derivation_matching_reprs.is_none()
            && spans.iter().all(|span| span.derivation_matching_reprs.is_none())
        {
            return None;
        }
        for span in spans {
            if let Some(repr) = common_derivation(
                &search_word.direct_matching_reprs,
                search_word.derivation_matching_reprs.as_ref(),
                &span.direct_matching_reprs,
                span.derivation_matching_reprs.as_ref(),
            ) {
                let first = *span.token_indexes.first()?;
                let last = *span.token_indexes.last()?;
                return Some(
                    WordMatch::new(
                        search_index,
                        &repr,
                        document_index,
                        &repr,
                        WordMatchType::Derivation,
                        derivation_explanation(&search_word.lemma),
                    )
                    .with_span(first, last),
                );
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
        let document_word = &doc.words[document_index];
        let repr = common_derivation(
            &search_word.direct_matching_reprs,
            search_word.derivation_matching_reprs.as_ref(),
            &document_word.direct_matching_reprs,
            document_word.derivation_matching_reprs.as_ref(),
        )?;
        let extracted = self.helper.extracted_word(doc, document_index, &repr);
        Some(
            WordMatch::new(
                search_index,
                &repr,
                document_index,
                &repr,
                WordMatchType::Derivation,
                derivation_explanation(&search_word.lemma),
            )
            .with_extracted_word(extracted),
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
        let repr = common_derivation(
            &search_word.direct_matching_reprs,
            search_word.derivation_matching_reprs.as_ref(),
            &subword.direct_matching_reprs,
            subword.derivation_matching_reprs.as_ref(),
        )?;
        Some(
            WordMatch::new(
                search_index,
                &repr,
                document_index,
                &repr,
                WordMatchType::Derivation,
                derivation_explanation(&search_word.lemma),
            )
            .with_subword(subword.index, subword.containing_token_index),
        )
    }

    fn add_words_matching_root(&self, phrase: &mut SearchPhrase) {
        let root = phrase.root();
        if root.derived_lemma != root.lemma {
            let derived = root.derived_lemma.clone();
            phrase.add_word_matching_root(&derived);
        }
    }

    fn add_reverse_dict_entries(&self, index: &mut CorpusIndex, doc: &SemanticDocument, label: &str) {
        for word in &doc.words {
            if word.derived_lemma != word.lemma {
                index.add_entry(
                    &word.derived_lemma.to_lowercase(),
                    label,
                    Index::word(word.index),
                    &word.lemma,
                    true,
                );
            }
            for subword in &word.subwords {
                if subword.derived_lemma != subword.lemma {
                    index.add_entry(
                        &subword.derived_lemma.to_lowercase(),
                        label,
                        Index::new(word.index, Some(subword.index)),
                        &subword.lemma,
                        true,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reprs(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_derived_search_form_meets_direct_document_form() {
        let found = common_derivation(
            &reprs(&["nationalization"]),
            Some(&reprs(&["nationalize"])),
            &reprs(&["nationalize"]),
            None,
        );
        assert_eq!(found.as_deref(), Some("nationalize"));
    }

    #[test]
    fn test_direct_search_form_meets_derived_document_form() {
        let found = common_derivation(
            &reprs(&["nationalize"]),
            None,
            &reprs(&["nationalization"]),
            Some(&reprs(&["nationalize"])),
        );
        assert!(found.is_some());
        assert!(common_derivation(&reprs(&["dog"]), None, &reprs(&["dog"]), None).is_none());
    }
}
