use super::WordMatchingStrategy;
use crate::helper::MatchingHelper;
use crate::index::CorpusIndex;
use crate::search_phrase::SearchPhrase;
use crate::word_match::{ontology_explanation, WordMatch, WordMatchType};
use semgraph_graph::{Index, MultiwordSpan, SemanticDocument, Subword};
use semgraph_ontology::{Entry, Ontology};
use std::sync::Arc;

/// Synonyms, hyponyms and individuals of the search word in the ontology.
/// Only built when the helper carries an ontology.
pub struct OntologyStrategy {
    helper: Arc<MatchingHelper>,
}

impl OntologyStrategy {
    pub fn new(helper: Arc<MatchingHelper>) -> Self {
        Self { helper }
    }

    fn ontology(&self) -> Option<&Ontology> {
        self.helper.ontology().map(|o| o.as_ref())
    }

    /// Direct forms, plus derived forms when derivational morphology is on.
    fn reprs<'a>(&self, direct: &'a [String], derivation: Option<&'a Vec<String>>) -> Vec<&'a str> {
        let mut reprs: Vec<&str> = direct.iter().map(String::as_str).collect();
        if self.helper.config().analyze_derivational_morphology {
            reprs.extend(derivation.into_iter().flatten().map(String::as_str));
        }
        reprs
    }

    fn search_reprs<'a>(&self, phrase: &'a SearchPhrase, search_index: usize) -> Vec<&'a str> {
        let word = phrase.word(search_index);
        self.reprs(&word.direct_matching_reprs, word.derivation_matching_reprs.as_ref())
    }

    fn first_entry<'a>(&self, search_reprs: &[&'a str], document_reprs: &[&str]) -> Option<(&'a str, Entry)> {
        let ontology = self.ontology()?;
        search_reprs
            .iter()
            .find_map(|repr| ontology.matches(repr, document_reprs).map(|entry| (*repr, entry)))
    }
}

impl WordMatchingStrategy for OntologyStrategy {
    fn match_type(&self) -> WordMatchType {
        WordMatchType::Ontology
    }

    fn match_multiwords(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        _doc: &SemanticDocument,
        document_index: usize,
        spans: &[MultiwordSpan],
    ) -> Option<WordMatch> {
        let search_reprs = self.search_reprs(phrase, search_index);
        let ontology = self.ontology()?;
        for repr in &search_reprs {
            for span in spans {
                let document_reprs =
                    self.reprs(&span.direct_matching_reprs, span.derivation_matching_reprs.as_ref());
                if let Some(entry) = ontology.matches(repr, &document_reprs) {
                    let first = *span.token_indexes.first()?;
                    let last = *span.token_indexes.last()?;
                    return Some(
                        WordMatch::new(
                            search_index,
                            repr,
                            document_index,
                            &entry.word,
                            WordMatchType::Ontology,
                            ontology_explanation(&phrase.word(search_index).lemma, entry.depth),
                        )
                        .with_span(first, last)
                        .with_depth(entry.depth),
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
        let document_word = &doc.words[document_index];
        let document_reprs = self.reprs(
            &document_word.direct_matching_reprs,
            document_word.derivation_matching_reprs.as_ref(),
        );
        let (repr, entry) = self.first_entry(&self.search_reprs(phrase, search_index), &document_reprs)?;
        let extracted = self.helper.extracted_word(doc, document_index, &entry.word);
        Some(
            WordMatch::new(
                search_index,
                repr,
                document_index,
                &entry.word,
                WordMatchType::Ontology,
                ontology_explanation(&phrase.word(search_index).lemma, entry.depth),
            )
            .with_extracted_word(extracted)
            .with_depth(entry.depth),
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
        let document_reprs = self.reprs(&subword.direct_matching_reprs, subword.derivation_matching_reprs.as_ref());
        let (repr, entry) = self.first_entry(&self.search_reprs(phrase, search_index), &document_reprs)?;
        Some(
            WordMatch::new(
                search_index,
                repr,
                document_index,
                &entry.word,
                WordMatchType::Ontology,
                ontology_explanation(&phrase.word(search_index).lemma, entry.depth),
            )
            .with_subword(subword.index, subword.containing_token_index)
            .with_depth(entry.depth),
        )
    }

    /// Every representation of every entry matching a root form, each also
    /// taken back through the ontology words it is a derived form of.
    fn add_words_matching_root(&self, phrase: &mut SearchPhrase) {
        let Some(ontology) = self.helper.ontology() else {
            return;
        };
        let root = phrase.root();
        let mut root_reprs = root.direct_matching_reprs.clone();
        if self.helper.config().analyze_derivational_morphology {
            root_reprs.extend(root.derivation_matching_reprs.iter().flatten().cloned());
        }
        let mut words = Vec::new();
        for repr in &root_reprs {
            for entry in ontology.get_matching_entries(repr).iter() {
                for entry_repr in &entry.reprs {
                    words.push(entry_repr.clone());
                    words.extend(self.helper.ontology_words_for_derived_form(entry_repr).iter().cloned());
                }
            }
        }
        for word in words {
            phrase.add_word_matching_root(&word);
        }
    }

    fn add_reverse_dict_entries(&self, index: &mut CorpusIndex, doc: &SemanticDocument, label: &str) {
        for word in &doc.words {
            let Some(span) = self.helper.ontology_defined_multiword(doc, word.index) else {
                continue;
            };
            for repr in &span.direct_matching_reprs {
                index.add_entry(&repr.to_lowercase(), label, Index::word(word.index), &span.text, false);
            }
            if self.helper.config().analyze_derivational_morphology {
                for repr in span.derivation_matching_reprs.iter().flatten() {
                    index.add_entry(&repr.to_lowercase(), label, Index::word(word.index), &span.text, true);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;
    use crate::helper::MatchingHelper;
    use semgraph_graph::{MatchingConfig, RawDocumentBuilder};
    use semgraph_lang_en::EnglishAdapter;
    use semgraph_ontology::{OntologyConfig, OntologyFormat};

    const VEHICLES: &str = r#"
<http://example.org/vehicle> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .
<http://example.org/car> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .
<http://example.org/car> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.org/vehicle> .
"#;

    fn helper() -> Arc<MatchingHelper> {
        let ontology =
            Ontology::parse_str(VEHICLES, OntologyFormat::NTriples, OntologyConfig::default()).unwrap();
        Arc::new(
            MatchingHelper::new(Arc::new(EnglishAdapter::new()), MatchingConfig::default())
                .with_ontology(ontology),
        )
    }

    #[test]
    fn test_hyponym_matches_with_depth() {
        let helper = helper();
        let phrase = testing::phrase(
            &helper,
            &RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 1)
                .token("vehicle", "vehicle", "NOUN", "NN", "ROOT", 1)
                .build(),
        );
        assert!(phrase.words_matching_root.iter().any(|w| w == "car"));
        let doc = testing::normalize(
            &helper,
            &RawDocumentBuilder::new()
                .token("The", "the", "DET", "DT", "det", 1)
                .token("car", "car", "NOUN", "NN", "ROOT", 1)
                .build(),
        );
        let strategy = OntologyStrategy::new(Arc::clone(&helper));
        let word_match = strategy.match_word(&phrase, 1, &doc, 1).unwrap();
        assert_eq!(word_match.document_word, "car");
        assert_eq!(word_match.depth, 1);
        assert_eq!(word_match.explanation, "Is a child of VEHICLE in the ontology.");
    }
}
