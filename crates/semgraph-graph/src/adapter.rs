//! Language adapter capability interface.
//!
//! Everything language-specific the normalizer and the matcher need comes
//! through [`LanguageAdapter`]: constant label and tag sets (collected in an
//! [`AdapterProfile`]), lemma rules, and the grammar-correction hooks that
//! rewrite a document in place. Adding a language means implementing this
//! trait; the normalizer itself does not change.

use crate::derivation::DerivationalDictionary;
use crate::implication::ImplicationTable;
use crate::lexicon::{cosine_similarity, Lexicon};
use crate::model::{SemanticDocument, Subword, Word};
use crate::template::TemplateDefinition;
use ahash::AHashMap;

/// Per-document cache handed to [`LanguageAdapter::add_subwords`].
pub type SubwordCache = AHashMap<String, Vec<Subword>>;

/// Memo for negation resolution, one slot per word.
pub type NegationMemo = Vec<Option<bool>>;

/// Constant sets declared by a language adapter.
#[derive(Debug, Clone)]
pub struct AdapterProfile {
    pub noun_pos: &'static [&'static str],
    pub predicate_head_pos: &'static [&'static str],
    pub matchable_pos: &'static [&'static str],

    pub adjectival_predicate_head_pos: &'static [&'static str],
    pub adjectival_predicate_subject_pos: &'static [&'static str],
    pub adjectival_predicate_subject_dep: &'static str,
    pub adjectival_predicate_predicate_dep: &'static str,
    pub adjectival_predicate_predicate_pos: &'static str,
    pub modifier_dep: &'static str,

    pub parser_noun_to_preposition_dep: &'static str,
    pub parser_verb_to_preposition_dep: &'static str,
    pub semantic_noun_to_preposition_dep: &'static str,
    pub semantic_verb_to_preposition_dep: &'static str,

    pub conjunction_deps: &'static [&'static str],
    pub sibling_marker_deps: &'static [&'static str],
    pub or_lemma: &'static str,
    pub mark_child_dependencies_copied_to_siblings_as_uncertain: bool,

    pub interrogative_pronoun_tags: &'static [&'static str],
    pub semantic_dependency_excluded_tags: &'static [&'static str],
    pub generic_pronoun_lemmas: &'static [&'static str],
    pub whose_lemma: &'static str,

    pub maximum_mentions_in_coreference_chain: usize,
    pub maximum_word_distance_in_coreference_chain: usize,

    pub preposition_deps: &'static [&'static str],
    pub permissible_embedding_pos: &'static [&'static str],
    pub minimum_embedding_match_word_length: usize,
    pub noun_kernel_dep: &'static [&'static str],
    pub preferred_phraselet_pos: &'static [&'static str],
    pub entity_defined_multiword_pos: &'static [&'static str],
    pub entity_defined_multiword_entity_types: &'static [&'static str],
    pub question_answer_blacklist_deps: &'static [&'static str],
    pub question_answer_final_blacklist_deps: &'static [&'static str],
    pub topic_matching_phraselet_stop_lemmas: &'static [&'static str],
    pub topic_matching_phraselet_stop_tags: &'static [&'static str],
    pub topic_matching_reverse_only_parent_lemmas: &'static [(&'static str, &'static str)],
}

impl AdapterProfile {
    pub fn is_noun_pos(&self, pos: &str) -> bool {
        self.noun_pos.contains(&pos)
    }

    pub fn is_reverse_only_parent(&self, lemma: &str, pos: &str) -> bool {
        self.topic_matching_reverse_only_parent_lemmas
            .iter()
            .any(|(l, p)| *l == lemma && *p == pos)
    }
}

/// Language-specific behavior consumed by the normalizer and the matcher.
///
/// Hooks that take `&mut SemanticDocument` may rewrite edges of any word but
/// must go through [`SemanticDocument::add_edge`] / [`SemanticDocument::set_redirect`]
/// so that self-loops are never introduced. Hooks never fail: a correction
/// that does not apply is skipped.
pub trait LanguageAdapter: Send + Sync {
    /// Model name recorded on normalized documents and persisted artifacts.
    fn name(&self) -> &str;

    fn profile(&self) -> &AdapterProfile;

    fn lexicon(&self) -> &Lexicon;

    fn derivational_dictionary(&self) -> &DerivationalDictionary;

    fn match_implications(&self) -> &ImplicationTable;

    fn phraselet_templates(&self) -> &[TemplateDefinition];

    /// Semantic lemma of a word, given its syntactic context.
    fn lemma(&self, doc: &SemanticDocument, index: usize) -> String;

    /// Language heuristics for a derivationally related base form; returns
    /// `lemma` unchanged when none applies. `word` is `None` for bare lemmas.
    fn language_specific_derived_lemma(&self, word: Option<&Word>, lemma: &str) -> String;

    fn normalize_hyphens(&self, word: &str) -> String;

    /// Whether a syntactic child of a word makes that word negated.
    fn is_negation_trigger(&self, doc: &SemanticDocument, child: usize) -> bool;

    fn correct_auxiliaries_and_passives(&self, doc: &mut SemanticDocument, index: usize);

    fn handle_relative_constructions(&self, doc: &mut SemanticDocument, index: usize);

    fn perform_language_specific_tasks(&self, doc: &mut SemanticDocument, index: usize);

    /// Decides whether a document word answers an interrogative search word.
    fn question_word_matches(
        &self,
        search_word: &Word,
        doc: &SemanticDocument,
        document_index: usize,
        document_subword: Option<usize>,
        document_vector: Option<&[f32]>,
        threshold: f32,
    ) -> bool;

    /// Splits compound words into subwords. Languages without compounds keep
    /// the default.
    fn add_subwords(&self, _doc: &mut SemanticDocument, _index: usize, _cache: &mut SubwordCache) {}

    /// Derived lemma, consulting the derivational dictionary first.
    fn derived_lemma(&self, word: Option<&Word>, lemma: &str) -> String {
        match self.derivational_dictionary().get(lemma) {
            Some(derived) => derived.to_string(),
            None => self.language_specific_derived_lemma(word, lemma),
        }
    }

    /// Derived form of every word in a possibly multiword lemma.
    fn potential_derived_lemma(&self, lemma: &str) -> String {
        lemma
            .split_whitespace()
            .map(|word| self.derived_lemma(None, word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn is_interrogative_pronoun(&self, word: &Word) -> bool {
        self.profile()
            .interrogative_pronoun_tags
            .contains(&word.tag.as_str())
    }

    /// Resolves negation for a word: a trigger among its syntactic children,
    /// or else its head's negation; sentence roots default to not negated.
    ///
    /// The head chain is walked upwards until a resolved, triggered or root
    /// word, and the value found there is assigned to the whole chain.
    fn set_negation(&self, doc: &mut SemanticDocument, index: usize, memo: &mut NegationMemo) -> bool {
        let mut chain = Vec::new();
        let mut working = index;
        let negated = loop {
            if let Some(known) = memo[working] {
                break known;
            }
            // Provisional value so that a malformed head cycle terminates.
            memo[working] = Some(false);
            chain.push(working);
            let word = &doc.words[working];
            if word
                .syntactic_children
                .iter()
                .any(|&child| self.is_negation_trigger(doc, child))
            {
                break true;
            }
            if word.is_root() {
                break false;
            }
            working = word.head;
        };
        for index in chain {
            memo[index] = Some(negated);
            doc.words[index].is_negated = negated;
        }
        negated
    }

    /// Similarity of a vector to the first of the entity categories it
    /// resembles above `threshold`, or 0.
    fn token_matches_ent_type(
        &self,
        vector: Option<&[f32]>,
        entity_labels: &[&str],
        threshold: f32,
    ) -> f32 {
        let Some(vector) = vector else {
            return 0.0;
        };
        for label in entity_labels {
            if let Some(entity_vector) = self.lexicon().entity_vector(label) {
                let similarity = cosine_similarity(entity_vector, vector);
                if similarity > threshold {
                    return similarity;
                }
            }
        }
        0.0
    }
}
