//! Word matching strategies.
//!
//! A strategy decides whether one search phrase word matches one document
//! word, subword or multiword span. The structural matcher tries an ordered
//! list of strategies and keeps the first match; the same strategies also
//! contribute the index keys under which document words are found and the
//! words a search phrase root may take.

mod derivation;
mod direct;
mod embedding;
mod entity;
mod entity_embedding;
mod ontology;
mod question;

pub use derivation::DerivationStrategy;
pub use direct::DirectStrategy;
pub use embedding::EmbeddingStrategy;
pub use entity::EntityStrategy;
pub use entity_embedding::EntityEmbeddingStrategy;
pub use ontology::OntologyStrategy;
pub use question::QuestionStrategy;

use crate::helper::MatchingHelper;
use crate::index::CorpusIndex;
use crate::search_phrase::SearchPhrase;
use crate::word_match::{WordMatch, WordMatchType};
use semgraph_graph::{MultiwordSpan, SemanticDocument, Subword};
use std::sync::Arc;

pub trait WordMatchingStrategy: Send + Sync {
    fn match_type(&self) -> WordMatchType;

    /// Strategies comparing vectors are skipped for non-root search words
    /// when `compare_embeddings_on_non_root_words` is off.
    fn is_embedding_based(&self) -> bool {
        false
    }

    /// Tries the multiword spans headed by a document word.
    fn match_multiwords(
        &self,
        _phrase: &SearchPhrase,
        _search_index: usize,
        _doc: &SemanticDocument,
        _document_index: usize,
        _spans: &[MultiwordSpan],
    ) -> Option<WordMatch> {
        None
    }

    fn match_word(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
    ) -> Option<WordMatch>;

    fn match_subword(
        &self,
        _phrase: &SearchPhrase,
        _search_index: usize,
        _doc: &SemanticDocument,
        _document_index: usize,
        _subword: &Subword,
    ) -> Option<WordMatch> {
        None
    }

    /// Adds the forms a document word may take to match the root word.
    fn add_words_matching_root(&self, _phrase: &mut SearchPhrase) {}

    /// Adds the keys under which this strategy finds document words.
    fn add_reverse_dict_entries(&self, _index: &mut CorpusIndex, _doc: &SemanticDocument, _label: &str) {}
}

/// Strategies in the order they are tried. Derivation, ontology and
/// embedding strategies are only present when configured.
pub fn build_strategies(helper: &Arc<MatchingHelper>) -> Vec<Box<dyn WordMatchingStrategy>> {
    let config = helper.config();
    let mut strategies: Vec<Box<dyn WordMatchingStrategy>> =
        vec![Box::new(DirectStrategy::new(Arc::clone(helper)))];
    if config.analyze_derivational_morphology {
        strategies.push(Box::new(DerivationStrategy::new(Arc::clone(helper))));
    }
    strategies.push(Box::new(EntityStrategy::new(Arc::clone(helper))));
    strategies.push(Box::new(QuestionStrategy::new(Arc::clone(helper))));
    if helper.ontology().is_some() {
        strategies.push(Box::new(OntologyStrategy::new(Arc::clone(helper))));
    }
    if config.embeddings_enabled() {
        strategies.push(Box::new(EmbeddingStrategy::new(Arc::clone(helper))));
        strategies.push(Box::new(EntityEmbeddingStrategy::new(Arc::clone(helper))));
    }
    tracing::debug!(
        strategies = ?strategies.iter().map(|s| s.match_type().as_str()).collect::<Vec<_>>(),
        "built word matching strategies"
    );
    strategies
}

/// Exponent-adjusted threshold for one word of a phrase.
pub(crate) fn single_word_threshold(phrase: &SearchPhrase, overall: f32) -> f32 {
    overall.powi(phrase.vector_count() as i32)
}

/// Threshold applied to a search word, lowered for question words.
pub(crate) fn working_threshold(helper: &MatchingHelper, phrase: &SearchPhrase, search_index: usize) -> f32 {
    let word = phrase.word(search_index);
    let config = helper.config();
    let overall = if word.is_initial_question_word || word.has_initial_question_word_in_phrase {
        config.initial_question_word_overall_similarity_threshold
    } else {
        config.overall_similarity_threshold
    };
    single_word_threshold(phrase, overall)
}

/// Search word shown in embedding explanations.
pub(crate) fn embedding_display_word(phrase: &SearchPhrase, search_index: usize) -> String {
    let word = phrase.word(search_index);
    if !phrase.topic_match_phraselet && word.lemma.split_whitespace().count() > 1 {
        word.raw_lemma.clone()
    } else {
        word.lemma.clone()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::compiler::SearchPhraseCompiler;
    use crate::helper::MatchingHelper;
    use crate::search_phrase::SearchPhrase;
    use semgraph_graph::{MatchingConfig, Normalizer, RawDocument, SemanticDocument};
    use semgraph_lang_en::EnglishAdapter;
    use std::sync::Arc;

    pub fn helper(config: MatchingConfig) -> Arc<MatchingHelper> {
        Arc::new(MatchingHelper::new(Arc::new(EnglishAdapter::new()), config))
    }

    pub fn normalize(helper: &MatchingHelper, raw: &RawDocument) -> SemanticDocument {
        Normalizer::new(Arc::clone(helper.adapter()))
            .normalize(raw)
            .unwrap()
    }

    pub fn phrase(helper: &Arc<MatchingHelper>, raw: &RawDocument) -> SearchPhrase {
        let doc = normalize(helper, raw);
        SearchPhraseCompiler::new(Arc::clone(helper))
            .compile("test", &doc.text(), doc)
            .unwrap()
    }
}
