//! A language adapter with the generic constant sets and no grammar
//! corrections, so that tests observe the normalizer's own passes.

#![allow(dead_code)]

use semgraph_graph::{
    AdapterProfile, DerivationalDictionary, ImplicationTable, LanguageAdapter, Lexicon,
    SemanticDocument, TemplateDefinition, Word,
};

pub static PLAIN_PROFILE: AdapterProfile = AdapterProfile {
    noun_pos: &["NOUN", "PROPN"],
    predicate_head_pos: &["VERB", "AUX"],
    matchable_pos: &["ADJ", "ADP", "ADV", "NOUN", "NUM", "PROPN", "VERB", "AUX", "X", "INTJ"],
    adjectival_predicate_head_pos: &["VERB", "AUX"],
    adjectival_predicate_subject_pos: &["NOUN", "PROPN", "PRON"],
    adjectival_predicate_subject_dep: "nsubj",
    adjectival_predicate_predicate_dep: "acomp",
    adjectival_predicate_predicate_pos: "ADJ",
    modifier_dep: "amod",
    parser_noun_to_preposition_dep: "prep",
    parser_verb_to_preposition_dep: "prep",
    semantic_noun_to_preposition_dep: "prepposs",
    semantic_verb_to_preposition_dep: "prepposs",
    conjunction_deps: &["conj", "appos", "cc"],
    sibling_marker_deps: &["conj", "appos"],
    or_lemma: "or",
    mark_child_dependencies_copied_to_siblings_as_uncertain: true,
    interrogative_pronoun_tags: &["WDT", "WP", "WRB"],
    semantic_dependency_excluded_tags: &["DT"],
    generic_pronoun_lemmas: &["something", "somebody", "someone"],
    whose_lemma: "whose",
    maximum_mentions_in_coreference_chain: 3,
    maximum_word_distance_in_coreference_chain: 300,
    preposition_deps: &["prep"],
    permissible_embedding_pos: &["NOUN", "PROPN", "ADJ", "ADV"],
    minimum_embedding_match_word_length: 3,
    noun_kernel_dep: &["nmod", "compound", "appos", "nummod"],
    preferred_phraselet_pos: &["NOUN", "PROPN"],
    entity_defined_multiword_pos: &["NOUN", "PROPN"],
    entity_defined_multiword_entity_types: &["PERSON", "ORG", "GPE", "WORK_OF_ART"],
    question_answer_blacklist_deps: &["conj", "appos", "cc", "punct"],
    question_answer_final_blacklist_deps: &["case"],
    topic_matching_phraselet_stop_lemmas: &["then"],
    topic_matching_phraselet_stop_tags: &["PRP"],
    topic_matching_reverse_only_parent_lemmas: &[("be", "AUX")],
};

#[derive(Default)]
pub struct PlainAdapter {
    lexicon: Lexicon,
    dictionary: DerivationalDictionary,
    implications: ImplicationTable,
}

impl PlainAdapter {
    pub fn with_dictionary(text: &str) -> Self {
        Self {
            dictionary: DerivationalDictionary::parse(text),
            ..Self::default()
        }
    }
}

impl LanguageAdapter for PlainAdapter {
    fn name(&self) -> &str {
        "plain_test"
    }

    fn profile(&self) -> &AdapterProfile {
        &PLAIN_PROFILE
    }

    fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn derivational_dictionary(&self) -> &DerivationalDictionary {
        &self.dictionary
    }

    fn match_implications(&self) -> &ImplicationTable {
        &self.implications
    }

    fn phraselet_templates(&self) -> &[TemplateDefinition] {
        &[]
    }

    fn lemma(&self, doc: &SemanticDocument, index: usize) -> String {
        doc.word(index).raw_lemma.to_lowercase()
    }

    fn language_specific_derived_lemma(&self, _word: Option<&Word>, lemma: &str) -> String {
        lemma.to_string()
    }

    fn normalize_hyphens(&self, word: &str) -> String {
        word.replace('-', " ")
    }

    fn is_negation_trigger(&self, doc: &SemanticDocument, child: usize) -> bool {
        let child = doc.word(child);
        child.dep == "neg" || child.raw_lemma == "not"
    }

    fn correct_auxiliaries_and_passives(&self, _doc: &mut SemanticDocument, _index: usize) {}

    fn handle_relative_constructions(&self, _doc: &mut SemanticDocument, _index: usize) {}

    fn perform_language_specific_tasks(&self, _doc: &mut SemanticDocument, _index: usize) {}

    fn question_word_matches(
        &self,
        _search_word: &Word,
        _doc: &SemanticDocument,
        _document_index: usize,
        _document_subword: Option<usize>,
        _document_vector: Option<&[f32]>,
        _threshold: f32,
    ) -> bool {
        false
    }
}
