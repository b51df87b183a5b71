//! English language adapter for Semgraph.
//!
//! [`EnglishAdapter`] supplies the English constant sets, lemma rules,
//! grammar corrections, question-word rules, dependency implications and
//! phraselet templates consumed by the normalizer and the matcher.
//!
//! ```
//! use semgraph_graph::{LanguageAdapter, Normalizer, RawDocumentBuilder};
//! use semgraph_lang_en::EnglishAdapter;
//! use std::sync::Arc;
//!
//! let normalizer = Normalizer::new(Arc::new(EnglishAdapter::new()));
//! let raw = RawDocumentBuilder::new()
//!     .token("Dogs", "dog", "NOUN", "NNS", "nsubj", 1)
//!     .token("bark", "bark", "VERB", "VBP", "ROOT", 1)
//!     .build();
//! let doc = normalizer.normalize(&raw).unwrap();
//! assert!(doc.word(1).has_dependency_with_child_index_and_label(0, "nsubj"));
//! ```

pub mod grammar;
pub mod implications;
pub mod morphology;
pub mod profile;
pub mod questions;
pub mod templates;

use ahash::AHashMap;
use parking_lot::RwLock;
use semgraph_graph::{
    AdapterProfile, DerivationalDictionary, ImplicationTable, LanguageAdapter, Lexicon,
    SemanticDocument, TemplateDefinition, Word,
};

pub use profile::ENGLISH_PROFILE;

/// Name recorded on documents normalized with the English adapter.
pub const MODEL_NAME: &str = "en_semgraph";

const DERIVATIONS: &str = include_str!("../data/derivation.csv");

const VOCABULARY: &str = include_str!("../data/vocabulary.txt");

fn bundled_vocabulary() -> impl Iterator<Item = &'static str> {
    VOCABULARY
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

fn with_bundled_entries(lexicon: Lexicon) -> Lexicon {
    let mut lexicon = lexicon.with_words(bundled_vocabulary());
    for (label, lexeme) in profile::ENTITY_LABELS_TO_LEXEMES {
        lexicon = lexicon.with_entity_lexeme(label, lexeme);
    }
    lexicon
}

/// Word class a derived lemma was computed for; `None` for bare lemmas.
type DerivedLemmaKey = (Option<(String, String)>, String);

pub struct EnglishAdapter {
    lexicon: Lexicon,
    dictionary: DerivationalDictionary,
    implications: ImplicationTable,
    templates: Vec<TemplateDefinition>,
    derived_lemma_cache: RwLock<AHashMap<DerivedLemmaKey, String>>,
}

impl Default for EnglishAdapter {
    fn default() -> Self {
        let implications = implications::english_implications().unwrap_or_else(|err| {
            tracing::error!(%err, "invalid English implication table");
            ImplicationTable::default()
        });
        Self {
            lexicon: with_bundled_entries(Lexicon::new()),
            dictionary: DerivationalDictionary::parse(DERIVATIONS),
            implications,
            templates: templates::english_templates(),
            derived_lemma_cache: RwLock::new(AHashMap::new()),
        }
    }
}

impl EnglishAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a lexicon with word vectors; the bundled vocabulary and entity
    /// lexemes are added to it.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = with_bundled_entries(lexicon);
        self.derived_lemma_cache.write().clear();
        self
    }

    pub fn with_derivational_dictionary(mut self, dictionary: DerivationalDictionary) -> Self {
        self.dictionary = dictionary;
        self
    }
}

impl std::fmt::Debug for EnglishAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnglishAdapter")
            .field("derivations", &self.dictionary.len())
            .field("implications", &self.implications.len())
            .field("templates", &self.templates.len())
            .finish()
    }
}

impl LanguageAdapter for EnglishAdapter {
    fn name(&self) -> &str {
        MODEL_NAME
    }

    fn profile(&self) -> &AdapterProfile {
        &ENGLISH_PROFILE
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
        &self.templates
    }

    fn lemma(&self, doc: &SemanticDocument, index: usize) -> String {
        morphology::semantic_lemma(doc, index)
    }

    fn language_specific_derived_lemma(&self, word: Option<&Word>, lemma: &str) -> String {
        let key = (
            word.map(|w| (w.pos.clone(), w.tag.clone())),
            lemma.to_string(),
        );
        if let Some(derived) = self.derived_lemma_cache.read().get(&key) {
            return derived.clone();
        }
        let derived = morphology::derived_lemma(&self.lexicon, word, lemma);
        self.derived_lemma_cache.write().insert(key, derived.clone());
        derived
    }

    fn normalize_hyphens(&self, word: &str) -> String {
        morphology::normalize_hyphens(word)
    }

    fn is_negation_trigger(&self, doc: &SemanticDocument, child: usize) -> bool {
        grammar::is_negation_trigger(doc, child)
    }

    fn correct_auxiliaries_and_passives(&self, doc: &mut SemanticDocument, index: usize) {
        grammar::correct_auxiliaries_and_passives(doc, index);
    }

    fn handle_relative_constructions(&self, doc: &mut SemanticDocument, index: usize) {
        grammar::handle_relative_constructions(doc, index);
    }

    fn perform_language_specific_tasks(&self, doc: &mut SemanticDocument, index: usize) {
        grammar::perform_language_specific_tasks(doc, index);
    }

    fn question_word_matches(
        &self,
        search_word: &Word,
        doc: &SemanticDocument,
        document_index: usize,
        _document_subword: Option<usize>,
        document_vector: Option<&[f32]>,
        threshold: f32,
    ) -> bool {
        questions::question_word_matches(
            self,
            search_word,
            doc,
            document_index,
            document_vector,
            threshold,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_takes_precedence() {
        let adapter = EnglishAdapter::new();
        assert_eq!(adapter.derived_lemma(None, "nationalisation"), "nationalize");
        assert_eq!(adapter.derived_lemma(None, "decision"), "decide");
        assert_eq!(adapter.derived_lemma(None, "happiness"), "happy");
        assert_eq!(adapter.potential_derived_lemma("strength sale"), "strong sell");
    }

    #[test]
    fn test_bundled_lexicon() {
        let adapter = EnglishAdapter::new();
        assert!(adapter.lexicon().contains("organize"));
        assert!(!adapter.lexicon().contains("# Base forms checked by the derived-lemma heuristics."));
        assert!(adapter.lexicon().entity_labels().any(|label| label == "PERSON"));
    }

    #[test]
    fn test_derived_lemma_cache_is_reset_with_lexicon() {
        let adapter = EnglishAdapter::new();
        assert_eq!(adapter.derived_lemma(None, "gladness"), "gladness");
        let adapter = adapter.with_lexicon(Lexicon::new().with_words(["glad"]));
        assert_eq!(adapter.derived_lemma(None, "gladness"), "glad");
    }
}
