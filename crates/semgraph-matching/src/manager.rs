//! The `Matcher` facade: registered documents, their corpus index and the
//! registered search phrases, with the components that produce and match
//! them.

use crate::compiler::SearchPhraseCompiler;
use crate::dictionaries::{build_match_dictionaries, MatchDictionary};
use crate::error::{MatchError, Result};
use crate::helper::MatchingHelper;
use crate::index::{maximum_corpus_frequency, CorpusIndex};
use crate::phraselet::{CorpusFrequencies, PhraseletExtractor, PhraseletInfo};
use crate::search_phrase::SearchPhrase;
use crate::structural::{Match, MatchOptions, StructuralMatcher};
use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use semgraph_graph::{
    CorpusWordPosition, Index, LanguageAdapter, MatchingConfig, Normalizer, RawDocument, SemanticDocument,
};
use semgraph_ontology::Ontology;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Phraselet matches whose roots share one document word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicMatchHit {
    pub document_label: String,
    pub index_within_document: usize,
    pub matches: Vec<Match>,
}

pub struct Matcher {
    helper: Arc<MatchingHelper>,
    normalizer: Normalizer,
    compiler: SearchPhraseCompiler,
    structural_matcher: StructuralMatcher,
    phraselet_extractor: PhraseletExtractor,
    documents: BTreeMap<String, SemanticDocument>,
    index: CorpusIndex,
    search_phrases: Vec<SearchPhrase>,
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("helper", &self.helper)
            .field("documents", &self.documents.len())
            .field("search_phrases", &self.search_phrases.len())
            .finish()
    }
}

impl Matcher {
    pub fn new(adapter: Arc<dyn LanguageAdapter>, config: MatchingConfig) -> Result<Self> {
        config.validate()?;
        Self::from_helper(MatchingHelper::new(adapter, config))
    }

    pub fn with_ontology(
        adapter: Arc<dyn LanguageAdapter>,
        config: MatchingConfig,
        ontology: Ontology,
    ) -> Result<Self> {
        config.validate()?;
        Self::from_helper(MatchingHelper::new(adapter, config).with_ontology(ontology))
    }

    fn from_helper(helper: MatchingHelper) -> Result<Self> {
        let helper = Arc::new(helper);
        let normalizer = Normalizer::new(Arc::clone(helper.adapter()))
            .with_maximum_document_size(helper.config().maximum_document_size);
        let templates = normalizer.phraselet_templates()?;
        Ok(Self {
            compiler: SearchPhraseCompiler::new(Arc::clone(&helper)),
            structural_matcher: StructuralMatcher::new(Arc::clone(&helper)),
            phraselet_extractor: PhraseletExtractor::new(Arc::clone(&helper), templates),
            normalizer,
            helper,
            documents: BTreeMap::new(),
            index: CorpusIndex::new(),
            search_phrases: Vec::new(),
        })
    }

    pub fn helper(&self) -> &Arc<MatchingHelper> {
        &self.helper
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn compiler(&self) -> &SearchPhraseCompiler {
        &self.compiler
    }

    pub fn structural_matcher(&self) -> &StructuralMatcher {
        &self.structural_matcher
    }

    pub fn phraselet_extractor(&self) -> &PhraseletExtractor {
        &self.phraselet_extractor
    }

    // ========================================================================
    // Documents
    // ========================================================================

    pub fn register_document(&mut self, label: &str, raw: &RawDocument) -> Result<()> {
        if self.documents.contains_key(label) {
            return Err(MatchError::DuplicateDocumentLabel(label.to_string()));
        }
        let doc = self.normalizer.normalize(raw)?;
        self.register_normalized_document(label, doc)
    }

    /// Registers a document that was normalized earlier, e.g. one loaded
    /// from storage.
    pub fn register_normalized_document(&mut self, label: &str, doc: SemanticDocument) -> Result<()> {
        if self.documents.contains_key(label) {
            return Err(MatchError::DuplicateDocumentLabel(label.to_string()));
        }
        self.index.index_document(label, &doc, self.structural_matcher.strategies());
        tracing::debug!(document = %label, words = doc.len(), "registered document");
        self.documents.insert(label.to_string(), doc);
        Ok(())
    }

    /// Normalizes documents in parallel and registers them in order. Stops
    /// at the first failure; documents before it stay registered.
    pub fn register_documents(&mut self, documents: &[(String, RawDocument)]) -> Result<()> {
        if let Some((label, _)) = documents.iter().find(|(label, _)| self.documents.contains_key(label)) {
            return Err(MatchError::DuplicateDocumentLabel(label.clone()));
        }
        let normalized: Vec<_> = documents
            .par_iter()
            .map(|(label, raw)| (label, self.normalizer.normalize(raw)))
            .collect();
        for (label, doc) in normalized {
            self.register_normalized_document(label, doc?)?;
        }
        tracing::info!(documents = documents.len(), total = self.documents.len(), "registered documents");
        Ok(())
    }

    pub fn remove_document(&mut self, label: &str) -> Result<SemanticDocument> {
        let doc = self
            .documents
            .remove(label)
            .ok_or_else(|| MatchError::UnknownDocumentLabel(label.to_string()))?;
        self.index.remove_document(label);
        tracing::debug!(document = %label, "removed document");
        Ok(doc)
    }

    pub fn remove_all_documents(&mut self) {
        self.documents.clear();
        self.index = CorpusIndex::new();
    }

    pub fn document(&self, label: &str) -> Option<&SemanticDocument> {
        self.documents.get(label)
    }

    pub fn documents(&self) -> &BTreeMap<String, SemanticDocument> {
        &self.documents
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    // ========================================================================
    // Search phrases
    // ========================================================================

    pub fn register_search_phrase(&mut self, label: &str, raw: &RawDocument) -> Result<&SearchPhrase> {
        let doc = self.normalizer.normalize(raw)?;
        let phrase = self.compiler.compile(label, &doc.text(), doc)?;
        Ok(self.register_compiled_search_phrase(phrase))
    }

    pub fn register_compiled_search_phrase(&mut self, phrase: SearchPhrase) -> &SearchPhrase {
        tracing::debug!(phrase = %phrase.label, words = phrase.matchable_indexes.len(), "registered search phrase");
        self.search_phrases.push(phrase);
        &self.search_phrases[self.search_phrases.len() - 1]
    }

    /// Removes every search phrase with the label; returns how many.
    pub fn remove_search_phrases(&mut self, label: &str) -> usize {
        let before = self.search_phrases.len();
        self.search_phrases.retain(|phrase| phrase.label != label);
        before - self.search_phrases.len()
    }

    pub fn remove_all_search_phrases(&mut self) {
        self.search_phrases.clear();
    }

    pub fn search_phrases(&self) -> &[SearchPhrase] {
        &self.search_phrases
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Matches every registered search phrase against every registered
    /// document.
    pub fn match_all(&self) -> Result<Vec<Match>> {
        self.match_with_options(&MatchOptions::new())
    }

    pub fn match_with_options(&self, options: &MatchOptions) -> Result<Vec<Match>> {
        if self.search_phrases.is_empty() {
            return Err(MatchError::NoSearchPhrases);
        }
        Ok(self
            .structural_matcher
            .match_documents(&self.documents, &self.index, &self.search_phrases, options))
    }

    /// Matches arbitrary search phrases, e.g. phraselets, against the
    /// registered documents.
    pub fn match_search_phrases(&self, phrases: &[SearchPhrase], options: &MatchOptions) -> Vec<Match> {
        self.structural_matcher
            .match_documents(&self.documents, &self.index, phrases, options)
    }

    pub fn match_returning_dictionaries(&self) -> Result<Vec<MatchDictionary>> {
        let matches = self.match_all()?;
        Ok(build_match_dictionaries(&self.helper, &self.documents, &matches))
    }

    pub fn build_match_dictionaries(&self, matches: &[Match]) -> Vec<MatchDictionary> {
        build_match_dictionaries(&self.helper, &self.documents, matches)
    }

    // ========================================================================
    // Phraselets
    // ========================================================================

    /// Phraselets of a document; with `weight_by_corpus_frequency` each
    /// phraselet carries a factor from the registered documents' word
    /// frequencies.
    pub fn phraselet_infos(
        &self,
        doc: &SemanticDocument,
        weight_by_corpus_frequency: bool,
    ) -> BTreeMap<String, PhraseletInfo> {
        let frequencies = weight_by_corpus_frequency.then(|| self.index.words_to_corpus_frequencies());
        let corpus_frequencies = frequencies.as_ref().and_then(|words| {
            maximum_corpus_frequency(words).map(|maximum| CorpusFrequencies { words, maximum })
        });
        self.phraselet_extractor.phraselet_infos(
            doc,
            corpus_frequencies,
            self.helper.config().process_initial_question_words,
        )
    }

    pub fn document_phraselet_infos(
        &self,
        label: &str,
        weight_by_corpus_frequency: bool,
    ) -> Result<BTreeMap<String, PhraseletInfo>> {
        let doc = self
            .documents
            .get(label)
            .ok_or_else(|| MatchError::UnknownDocumentLabel(label.to_string()))?;
        Ok(self.phraselet_infos(doc, weight_by_corpus_frequency))
    }

    pub fn phraselet_search_phrases<'a>(
        &self,
        infos: impl IntoIterator<Item = &'a PhraseletInfo>,
        reverse_matching_frequency_threshold: Option<f32>,
    ) -> Result<BTreeMap<String, SearchPhrase>> {
        Ok(self
            .phraselet_extractor
            .search_phrases(&self.compiler, infos, reverse_matching_frequency_threshold)?)
    }

    // ========================================================================
    // Topic matching
    // ========================================================================

    /// Matches the phraselets of a query document against the registered
    /// documents and groups the matches by document position.
    pub fn topic_match(
        &self,
        query: &RawDocument,
        reverse_matching_frequency_threshold: Option<f32>,
    ) -> Result<Vec<TopicMatchHit>> {
        let doc = self.normalizer.normalize(query)?;
        self.topic_match_document(&doc, reverse_matching_frequency_threshold)
    }

    /// Forward sweep over all phraselets but the reverse-only ones, then a
    /// retry of the reverse-only ones at the parents of document words that
    /// matched their child word as a single-word phraselet.
    pub fn topic_match_document(
        &self,
        query: &SemanticDocument,
        reverse_matching_frequency_threshold: Option<f32>,
    ) -> Result<Vec<TopicMatchHit>> {
        let infos = self.phraselet_infos(query, true);
        let phrases = self.phraselet_search_phrases(infos.values(), reverse_matching_frequency_threshold)?;
        let all: Vec<SearchPhrase> = phrases.values().cloned().collect();
        let mut matches = self.match_search_phrases(&all, &MatchOptions::new());

        let retry_positions = self.reverse_retry_positions(&infos, &phrases, &matches);
        if !retry_positions.is_empty() {
            let reverse: Vec<SearchPhrase> = all
                .into_iter()
                .filter(|phrase| phrase.reverse_only || phrase.treat_as_reverse_only_during_initial_pass)
                .collect();
            let retried = self.match_search_phrases(
                &reverse,
                &MatchOptions::new().with_reverse_matching_positions(retry_positions),
            );
            tracing::debug!(phrases = reverse.len(), matches = retried.len(), "retried reverse-only phraselets");
            matches.extend(retried);
        }
        Ok(group_by_position(matches))
    }

    fn phraselet_child_index(&self, info: &PhraseletInfo) -> Option<usize> {
        self.phraselet_extractor
            .template(&info.template_label)
            .and_then(|template| template.child_index())
    }

    fn reverse_retry_positions(
        &self,
        infos: &BTreeMap<String, PhraseletInfo>,
        phrases: &BTreeMap<String, SearchPhrase>,
        matches: &[Match],
    ) -> AHashSet<CorpusWordPosition> {
        let mut single_word_positions: AHashMap<&str, BTreeSet<CorpusWordPosition>> = AHashMap::new();
        let mut child_positions: AHashMap<&str, BTreeSet<CorpusWordPosition>> = AHashMap::new();
        for found in matches {
            let Some(info) = infos.get(&found.search_phrase_label) else {
                continue;
            };
            if found.from_single_word_phraselet {
                if let Some(word_match) = found.word_matches.first() {
                    single_word_positions
                        .entry(info.parent.derived_lemma.as_str())
                        .or_default()
                        .insert(CorpusWordPosition::new(&found.document_label, word_match.document_position()));
                }
            } else if let Some(word_match) = found
                .word_matches
                .iter()
                .find(|word_match| Some(word_match.search_phrase_index) == self.phraselet_child_index(info))
            {
                child_positions
                    .entry(info.label.as_str())
                    .or_default()
                    .insert(CorpusWordPosition::new(&found.document_label, word_match.document_position()));
            }
        }

        let use_reverse_dependencies = self.helper.config().use_reverse_dependency_matching;
        let mut retry_positions = AHashSet::new();
        for phrase in phrases
            .values()
            .filter(|phrase| phrase.reverse_only || phrase.treat_as_reverse_only_during_initial_pass)
        {
            let Some(info) = infos.get(&phrase.label) else {
                continue;
            };
            let (Some(child), Some(child_index)) = (info.child.as_ref(), self.phraselet_child_index(info)) else {
                continue;
            };
            let Some(linking_label) = phrase
                .root()
                .labeled_children()
                .find(|edge| edge.child == child_index)
                .map(|edge| edge.label.to_string())
            else {
                continue;
            };
            let Some(positions) = single_word_positions.get(child.derived_lemma.as_str()) else {
                continue;
            };
            let already_matched = child_positions.get(phrase.label.as_str());
            for position in positions
                .iter()
                .filter(|position| already_matched.map_or(true, |matched| !matched.contains(*position)))
            {
                let Some(word) = self
                    .documents
                    .get(&position.document_label)
                    .map(|doc| doc.word(position.index.token_index))
                else {
                    continue;
                };
                if let Some(subword) = position.index.subword_index {
                    if !word.subwords.get(subword).is_some_and(|s| s.is_head()) {
                        continue;
                    }
                }
                for (parent, label) in &word.coreference_linked_parent_dependencies {
                    if self.helper.dependency_labels_match(&linking_label, label, false) {
                        retry_positions.insert(CorpusWordPosition::new(&position.document_label, Index::word(*parent)));
                    }
                }
                if use_reverse_dependencies {
                    for (linked_child, label) in &word.coreference_linked_child_dependencies {
                        if self.helper.dependency_labels_match(&linking_label, label, true) {
                            retry_positions
                                .insert(CorpusWordPosition::new(&position.document_label, Index::word(*linked_child)));
                        }
                    }
                }
            }
        }
        retry_positions
    }
}

/// Drops repeated matches and groups the rest by root position, in
/// document order.
fn group_by_position(matches: Vec<Match>) -> Vec<TopicMatchHit> {
    let mut seen = BTreeSet::new();
    let mut grouped: BTreeMap<(String, usize), Vec<Match>> = BTreeMap::new();
    for found in matches {
        let key = (
            found.search_phrase_label.clone(),
            found.document_label.clone(),
            found.word_matches.iter().map(|w| w.document_position()).collect::<Vec<_>>(),
        );
        if seen.insert(key) {
            grouped
                .entry((found.document_label.clone(), found.index_within_document))
                .or_default()
                .push(found);
        }
    }
    grouped
        .into_iter()
        .map(|((document_label, index_within_document), mut matches)| {
            // Relation phraselets first.
            matches.sort_by(|a, b| {
                (a.from_single_word_phraselet, &a.search_phrase_label)
                    .cmp(&(b.from_single_word_phraselet, &b.search_phrase_label))
            });
            TopicMatchHit {
                document_label,
                index_within_document,
                matches,
            }
        })
        .collect()
}
