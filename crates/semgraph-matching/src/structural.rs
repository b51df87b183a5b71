//! Structural matching of search phrases against documents.
//!
//! Candidate document words for a search phrase root come from the corpus
//! index (and, when configured, from embedding similarity over the index
//! keys). From each candidate the matcher walks the search phrase's
//! semantic edges recursively, pairing them with document edges whose
//! labels the implication table allows, and collects one word match per
//! matchable search phrase word.

use crate::helper::{MatchingHelper, ENTITY_NOUN};
use crate::index::CorpusIndex;
use crate::search_phrase::SearchPhrase;
use crate::strategy::{build_strategies, single_word_threshold, WordMatchingStrategy};
use crate::word_match::WordMatch;
use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use semgraph_graph::{cosine_similarity, CorpusWordPosition, Index, SemanticDocument};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Search phrase word index -> its match within one candidate subgraph.
type WordMatchDict = BTreeMap<usize, WordMatch>;

// ============================================================================
// Match
// ============================================================================

/// A match between a search phrase and a document location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub search_phrase_label: String,
    pub search_phrase_text: String,
    pub document_label: String,
    /// One entry per matchable search phrase word, in search phrase order.
    pub word_matches: Vec<WordMatch>,
    pub is_negated: bool,
    pub is_uncertain: bool,
    pub from_single_word_phraselet: bool,
    pub from_topic_match_phraselet_created_without_matching_tags: bool,
    pub from_reverse_only_topic_match_phraselet: bool,
    /// Document word matched by the search phrase root.
    pub index_within_document: usize,
    /// 1.0 unless embeddings contributed to the match.
    pub overall_similarity_measure: f32,
}

impl Match {
    pub fn involves_coreference(&self) -> bool {
        self.word_matches.iter().any(WordMatch::involves_coreference)
    }

    /// Subword of the document word matched by the root, if any.
    pub fn root_subword_index(&self, phrase_root_index: usize) -> Option<usize> {
        self.word_matches
            .iter()
            .find(|word_match| word_match.search_phrase_index == phrase_root_index)
            .and_then(|word_match| word_match.document_subword)
            .map(|subword| subword.index)
    }

    fn uncertainty_rank(&self) -> (bool, i32) {
        (
            self.is_uncertain,
            self.word_matches.iter().map(|word_match| word_match.depth.abs()).sum(),
        )
    }
}

// ============================================================================
// Options
// ============================================================================

/// Per-call settings of [`StructuralMatcher::match_documents`].
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    /// Restricts root candidates to these positions, for matching from words
    /// that already matched elsewhere. Setting either position set also
    /// admits reverse-only search phrases.
    pub reverse_matching_positions: Option<AHashSet<CorpusWordPosition>>,
    /// Like `reverse_matching_positions`, but embedding comparisons of the
    /// root word are permitted as well.
    pub embedding_reverse_matching_positions: Option<AHashSet<CorpusWordPosition>>,
    /// Only documents whose label starts with this prefix are matched.
    pub document_label_filter: Option<String>,
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reverse_matching_positions(mut self, positions: AHashSet<CorpusWordPosition>) -> Self {
        self.reverse_matching_positions = Some(positions);
        self
    }

    pub fn with_embedding_reverse_matching_positions(
        mut self,
        positions: AHashSet<CorpusWordPosition>,
    ) -> Self {
        self.embedding_reverse_matching_positions = Some(positions);
        self
    }

    pub fn with_document_label_filter(mut self, prefix: impl Into<String>) -> Self {
        self.document_label_filter = Some(prefix.into());
        self
    }

    fn matches_specific_positions(&self) -> bool {
        self.reverse_matching_positions.is_some() || self.embedding_reverse_matching_positions.is_some()
    }

    fn is_reverse(&self, position: &CorpusWordPosition) -> bool {
        self.reverse_matching_positions
            .as_ref()
            .is_some_and(|positions| positions.contains(position))
    }

    fn is_embedding_reverse(&self, position: &CorpusWordPosition) -> bool {
        self.embedding_reverse_matching_positions
            .as_ref()
            .is_some_and(|positions| positions.contains(position))
    }

    fn accepts_label(&self, label: &str) -> bool {
        self.document_label_filter
            .as_deref()
            .map_or(true, |prefix| label.starts_with(prefix))
    }
}

// ============================================================================
// Matcher
// ============================================================================

pub struct StructuralMatcher {
    helper: Arc<MatchingHelper>,
    strategies: Vec<Box<dyn WordMatchingStrategy>>,
}

impl std::fmt::Debug for StructuralMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuralMatcher")
            .field("helper", &self.helper)
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

/// One root candidate: a search phrase and the document position its root
/// word is tried against.
struct RootCandidate<'a> {
    phrase: &'a SearchPhrase,
    document_label: &'a str,
    doc: &'a SemanticDocument,
    index: Index,
}

/// State of one recursive match attempt.
struct Walk<'a> {
    phrase: &'a SearchPhrase,
    doc: &'a SemanticDocument,
    /// Document positions already tried, per search phrase word.
    visited: Vec<AHashSet<Index>>,
}

impl StructuralMatcher {
    pub fn new(helper: Arc<MatchingHelper>) -> Self {
        let strategies = build_strategies(&helper);
        Self { helper, strategies }
    }

    pub fn helper(&self) -> &Arc<MatchingHelper> {
        &self.helper
    }

    pub fn strategies(&self) -> &[Box<dyn WordMatchingStrategy>] {
        &self.strategies
    }

    /// Matches search phrases against indexed documents.
    ///
    /// Results are sorted by descending similarity, then document label,
    /// then the document index matched by the root.
    pub fn match_documents(
        &self,
        documents: &BTreeMap<String, SemanticDocument>,
        index: &CorpusIndex,
        phrases: &[SearchPhrase],
        options: &MatchOptions,
    ) -> Vec<Match> {
        let config = self.helper.config();
        let compare_embeddings_on_root_words =
            config.embeddings_enabled() && config.embedding_based_matching_on_root_words;
        let specific = options.matches_specific_positions();
        let mut root_embedding_cache: AHashMap<String, BTreeSet<CorpusWordPosition>> = AHashMap::new();
        let mut candidates = Vec::new();

        for phrase in phrases {
            match (config.match_depending_on_single_words, phrase.has_single_matchable_word) {
                (Some(true), false) | (Some(false), true) => continue,
                _ => {}
            }
            if !specific && (phrase.reverse_only || phrase.treat_as_reverse_only_during_initial_pass) {
                continue;
            }
            let placeholder = self.helper.entity_placeholder(phrase.root());
            if placeholder == Some(ENTITY_NOUN) {
                for (label, doc) in documents.iter().filter(|(label, _)| options.accepts_label(label)) {
                    for word in doc.words.iter().filter(|w| self.helper.profile().is_noun_pos(&w.pos)) {
                        candidates.push(RootCandidate {
                            phrase,
                            document_label: label,
                            doc,
                            index: Index::word(word.index),
                        });
                    }
                }
                continue;
            }

            let mut matched: BTreeSet<CorpusWordPosition> = BTreeSet::new();
            let mut direct: AHashSet<&CorpusWordPosition> = AHashSet::new();
            if let Some(placeholder) = placeholder {
                matched.extend(
                    index
                        .positions(placeholder)
                        .filter(|position| {
                            !specific
                                || options.is_reverse(position)
                                || (options.is_embedding_reverse(position) && !position.index.is_subword())
                        })
                        .cloned(),
                );
            } else {
                for word in &phrase.words_matching_root {
                    for position in index.positions(word) {
                        if !specific || options.is_reverse(position) || options.is_embedding_reverse(position) {
                            matched.insert(position.clone());
                            direct.insert(position);
                        }
                    }
                }
            }

            if compare_embeddings_on_root_words
                && placeholder.is_none()
                && !phrase.reverse_only
                && self.helper.embedding_matching_permitted(phrase.root())
            {
                let root = phrase.root();
                let lemma = if !phrase.topic_match_phraselet && root.lemma.split_whitespace().count() > 1 {
                    root.raw_lemma.as_str()
                } else {
                    root.lemma.as_str()
                };
                if let Some(cached) = root_embedding_cache.get(lemma) {
                    matched.extend(cached.iter().cloned());
                } else {
                    let found = self.root_embedding_matches(documents, index, phrase, options, &direct);
                    matched.extend(found.iter().cloned());
                    root_embedding_cache.insert(lemma.to_string(), found);
                }
            }

            for position in matched {
                if !options.accepts_label(&position.document_label) {
                    continue;
                }
                let Some((label, doc)) = documents.get_key_value(&position.document_label) else {
                    tracing::warn!(document = %position.document_label, "indexed document is not registered");
                    continue;
                };
                candidates.push(RootCandidate {
                    phrase,
                    document_label: label,
                    doc,
                    index: position.index,
                });
            }
        }

        tracing::debug!(
            phrases = phrases.len(),
            candidates = candidates.len(),
            "matching root candidates"
        );
        let mut matches: Vec<Match> = candidates
            .par_iter()
            .flat_map_iter(|candidate| self.matches_starting_at_root(candidate))
            .collect();
        matches.sort_by(|a, b| {
            (1.0 - a.overall_similarity_measure)
                .total_cmp(&(1.0 - b.overall_similarity_measure))
                .then_with(|| a.document_label.cmp(&b.document_label))
                .then_with(|| a.index_within_document.cmp(&b.index_within_document))
        });
        tracing::info!(phrases = phrases.len(), matches = matches.len(), "matched search phrases");
        matches
    }

    /// Index positions whose vector is close enough to the root word's.
    /// Positions sharing an index key share a verdict, so each key is
    /// checked once against its first position.
    fn root_embedding_matches(
        &self,
        documents: &BTreeMap<String, SemanticDocument>,
        index: &CorpusIndex,
        phrase: &SearchPhrase,
        options: &MatchOptions,
        direct: &AHashSet<&CorpusWordPosition>,
    ) -> BTreeSet<CorpusWordPosition> {
        let mut found = BTreeSet::new();
        let Some(search_vector) = phrase.vector(phrase.root_index) else {
            return found;
        };
        let config = self.helper.config();
        let overall = if config.process_initial_question_words && phrase.root().has_initial_question_word_in_phrase {
            config.initial_question_word_overall_similarity_threshold
        } else {
            config.overall_similarity_threshold
        };
        let threshold = single_word_threshold(phrase, overall);
        for (_, occurrences) in index.iter() {
            let positions: Vec<&CorpusWordPosition> = occurrences
                .iter()
                .map(|occurrence| &occurrence.position)
                .filter(|position| {
                    !options.matches_specific_positions()
                        || (options.is_embedding_reverse(position) && !direct.contains(position))
                })
                .collect();
            let Some(example) = positions.first() else {
                continue;
            };
            let Some(doc) = documents.get(&example.document_label) else {
                continue;
            };
            let word = &doc.words[example.index.token_index];
            let document_vector = match example.index.subword_index {
                Some(subword) => {
                    let Some(subword) = word.subwords.get(subword) else {
                        continue;
                    };
                    if !self.helper.embedding_matching_permitted_for_subword(subword) {
                        continue;
                    }
                    subword.vector.as_deref()
                }
                None => {
                    if !self.helper.embedding_matching_permitted(word) {
                        continue;
                    }
                    word.vector.as_deref()
                }
            };
            let Some(document_vector) = document_vector else {
                continue;
            };
            if cosine_similarity(search_vector, document_vector) >= threshold {
                found.extend(positions.into_iter().cloned());
            }
        }
        found
    }

    /// Matches one search phrase whose root word is tried against one
    /// document position.
    pub fn match_at(
        &self,
        phrase: &SearchPhrase,
        document_label: &str,
        doc: &SemanticDocument,
        index: Index,
    ) -> Vec<Match> {
        self.matches_starting_at_root(&RootCandidate {
            phrase,
            document_label,
            doc,
            index,
        })
    }

    fn matches_starting_at_root(&self, candidate: &RootCandidate<'_>) -> Vec<Match> {
        let RootCandidate {
            phrase,
            document_label,
            doc,
            index,
        } = *candidate;
        if index.token_index >= doc.len() {
            return Vec::new();
        }
        let mut walk = Walk {
            phrase,
            doc,
            visited: vec![AHashSet::new(); phrase.doc.len()],
        };
        let Some(dicts) = self.match_recursively(
            &mut walk,
            phrase.root_index,
            index.token_index,
            index.subword_index,
            doc.words[index.token_index].is_uncertain(),
            index.token_index,
        ) else {
            return Vec::new();
        };

        // Several subgraphs may pair every search word with the same document
        // positions; only the best of them is kept.
        let mut by_positions: BTreeMap<Vec<(usize, Index)>, Match> = BTreeMap::new();
        for dict in dicts {
            let Some(found) = self.build_match(phrase, document_label, &dict) else {
                continue;
            };
            let key = found
                .word_matches
                .iter()
                .map(|word_match| (word_match.search_phrase_index, word_match.document_position()))
                .collect::<Vec<_>>();
            match by_positions.get(&key) {
                Some(existing) if existing.uncertainty_rank() <= found.uncertainty_rank() => {}
                _ => {
                    by_positions.insert(key, found);
                }
            }
        }
        let mut matches: Vec<Match> = by_positions.into_values().collect();
        matches.sort_by_key(|found| found.index_within_document);
        matches
    }

    fn build_match(&self, phrase: &SearchPhrase, document_label: &str, dict: &WordMatchDict) -> Option<Match> {
        let mut found = Match {
            search_phrase_label: phrase.label.clone(),
            search_phrase_text: phrase.doc_text.clone(),
            document_label: document_label.to_string(),
            word_matches: Vec::with_capacity(phrase.matchable_indexes.len()),
            is_negated: false,
            is_uncertain: false,
            from_single_word_phraselet: phrase.topic_match_phraselet && phrase.has_single_matchable_word,
            from_topic_match_phraselet_created_without_matching_tags: phrase
                .topic_match_phraselet_created_without_matching_tags,
            from_reverse_only_topic_match_phraselet: phrase.reverse_only,
            index_within_document: 0,
            overall_similarity_measure: 1.0,
        };
        let mut similarity_product = 1.0_f32;
        for search_index in &phrase.matchable_indexes {
            let word_match = dict.get(search_index)?;
            // A subword shared through a conjunction only counts once: on
            // another word it needs a companion subword written on this word.
            if let Some(subword) = word_match.document_subword {
                if subword.containing_token_index != word_match.document_index
                    && !dict.values().any(|other| {
                        other
                            .document_subword
                            .is_some_and(|s| s.containing_token_index == word_match.document_index)
                    })
                {
                    return None;
                }
            }
            found.is_negated |= word_match.is_negated;
            found.is_uncertain |= word_match.is_uncertain;
            if word_match.search_phrase_index == phrase.root_index {
                found.index_within_document = word_match.document_index;
            }
            similarity_product *= word_match.similarity_measure;
            found.word_matches.push(word_match.clone());
        }
        if similarity_product < 1.0 && phrase.vector_count() > 0 {
            let normalized = similarity_product.powf(1.0 / phrase.vector_count() as f32);
            found.overall_similarity_measure = (normalized * 1e8).round() / 1e8;
        }
        Some(found)
    }

    fn strategy_applies(&self, strategy: &dyn WordMatchingStrategy, phrase: &SearchPhrase, search_index: usize) -> bool {
        !strategy.is_embedding_based()
            || search_index == phrase.root_index
            || self.helper.config().compare_embeddings_on_non_root_words
    }

    /// First strategy result for one search word against one document word
    /// or subword. Multiword spans headed by the document word are tried
    /// before the word itself.
    fn word_match(
        &self,
        phrase: &SearchPhrase,
        search_index: usize,
        doc: &SemanticDocument,
        document_index: usize,
        subword: Option<usize>,
    ) -> Option<WordMatch> {
        let word = &doc.words[document_index];
        let mut strategies = self
            .strategies
            .iter()
            .filter(|strategy| self.strategy_applies(strategy.as_ref(), phrase, search_index));
        match subword {
            None => strategies.find_map(|strategy| {
                let multiword = if word.multiword_spans.is_empty() {
                    None
                } else {
                    strategy.match_multiwords(phrase, search_index, doc, document_index, &word.multiword_spans)
                };
                multiword.or_else(|| strategy.match_word(phrase, search_index, doc, document_index))
            }),
            Some(subword) => {
                let subword = word.subwords.get(subword)?;
                strategies.find_map(|strategy| {
                    strategy.match_subword(phrase, search_index, doc, document_index, subword)
                })
            }
        }
    }

    /// Matches a search phrase word against a document position and, unless
    /// this pairing was already explored, its dependents against the
    /// document's related words. Returns every consistent combination.
    fn match_recursively(
        &self,
        walk: &mut Walk<'_>,
        search_index: usize,
        document_index: usize,
        subword: Option<usize>,
        is_uncertain: bool,
        structurally_matched: usize,
    ) -> Option<Vec<WordMatchDict>> {
        let phrase = walk.phrase;
        let doc = walk.doc;
        let mut word_match = self.word_match(phrase, search_index, doc, document_index, subword)?;
        let document_word = &doc.words[document_index];
        word_match.structurally_matched_document_index = structurally_matched;
        word_match.is_negated = document_word.is_negated;
        word_match.is_uncertain = is_uncertain || document_word.is_uncertain();
        word_match.search_phrase_initial_question_word = phrase.word(search_index).is_initial_question_word;

        let position = Index::new(document_index, subword);
        let already_recursed = !walk.visited[search_index].insert(position);
        let mut dicts = vec![WordMatchDict::from([(search_index, word_match)])];
        if phrase.has_single_matchable_word || already_recursed {
            return Some(dicts);
        }

        let config = self.helper.config();
        let search_edges: Vec<(usize, String, bool)> = phrase
            .word(search_index)
            .labeled_children()
            .filter(|edge| {
                let child = phrase.word(edge.child);
                child.is_matchable
                    || (phrase.topic_match_phraselet
                        && config.process_initial_question_words
                        && child.is_initial_question_word)
            })
            .map(|edge| (edge.child, edge.label.to_string(), edge.is_uncertain))
            .collect();

        for (search_child, search_label, search_edge_uncertain) in search_edges {
            let mut dependency_dicts: Vec<WordMatchDict> = Vec::new();
            let mut matched_for_parent: Vec<Index> = Vec::new();
            for parent in self.working_parent_indexes(doc, document_index, subword) {
                let parent_word = &doc.words[parent.token_index];
                let parent_subword = parent.subword_index.and_then(|s| parent_word.subwords.get(s));
                if parent_subword.map_or(true, |s| s.is_head()) {
                    let mut document_edges: Vec<(usize, bool, bool)> = parent_word
                        .labeled_children()
                        .filter(|edge| self.helper.dependency_labels_match(&search_label, edge.label, false))
                        .map(|edge| (edge.child, edge.is_uncertain, false))
                        .collect();
                    if config.use_reverse_dependency_matching {
                        document_edges.extend(
                            parent_word
                                .labeled_parents()
                                .filter(|edge| self.helper.dependency_labels_match(&search_label, edge.label, true))
                                .map(|edge| (edge.parent, edge.is_uncertain, true)),
                        );
                    }
                    for (document_child, edge_uncertain, inverse_polarity) in document_edges {
                        let child_uncertain = (edge_uncertain && !search_edge_uncertain) || inverse_polarity;
                        for mention in self.child_mentions(doc, document_child) {
                            if doc.words[mention[0]].pos == "PRON" {
                                continue;
                            }
                            let mut matched_within_mention = false;
                            for child in mention_indexes(doc, &mention) {
                                if phrase.question_phraselet
                                    && self
                                        .helper
                                        .subtree_for_question_answer(doc, child.token_index)
                                        .contains(&parent.token_index)
                                {
                                    continue;
                                }
                                if matched_for_parent.contains(&child) {
                                    continue;
                                }
                                if let Some(found) = self.match_recursively(
                                    walk,
                                    search_child,
                                    child.token_index,
                                    child.subword_index,
                                    child_uncertain,
                                    document_child,
                                ) {
                                    matched_within_mention = true;
                                    dependency_dicts.extend(found);
                                    matched_for_parent.push(child);
                                }
                            }
                            if matched_within_mention {
                                break;
                            }
                        }
                    }
                }
                let Some(parent_subword) = parent_subword else {
                    continue;
                };
                // Links between subwords of the same word.
                if let (Some(dependent), Some(label)) =
                    (parent_subword.dependent_index, parent_subword.dependency_label.as_deref())
                {
                    if self.helper.dependency_labels_match(&search_label, label, false) {
                        if let Some(found) =
                            self.match_recursively(walk, search_child, document_index, Some(dependent), false, document_index)
                        {
                            dependency_dicts.extend(found);
                        }
                    }
                }
                if let (Some(governor), Some(label)) = (
                    parent_subword.governor_index,
                    parent_subword.governing_dependency_label.as_deref(),
                ) {
                    if config.use_reverse_dependency_matching
                        && self.helper.dependency_labels_match(&search_label, label, true)
                    {
                        if let Some(found) =
                            self.match_recursively(walk, search_child, document_index, Some(governor), false, document_index)
                        {
                            dependency_dicts.extend(found);
                        }
                    }
                }
            }
            if dependency_dicts.is_empty() {
                return None;
            }
            let previous = std::mem::take(&mut dicts);
            dicts = dependency_dicts
                .iter()
                .flat_map(|dependency| previous.iter().filter_map(move |existing| merge(existing, dependency)))
                .collect();
        }
        Some(dicts)
    }

    /// The matched position plus, with coreference resolution, the other
    /// members of its coreference chain, nearest first.
    fn working_parent_indexes(&self, doc: &SemanticDocument, document_index: usize, subword: Option<usize>) -> Vec<Index> {
        let word = &doc.words[document_index];
        let mut indexes = vec![Index::new(document_index, subword)];
        let subword_is_head = subword
            .and_then(|s| word.subwords.get(s))
            .map_or(true, |s| s.is_head());
        if self.helper.config().perform_coreference_resolution && subword_is_head {
            indexes.extend(
                word.token_and_coreference_chain_indexes
                    .iter()
                    .filter(|&&i| i != document_index)
                    .map(|&i| Index::word(i)),
            );
            indexes.sort_by_key(|index| {
                (index.token_index.abs_diff(document_index), index.token_index > document_index)
            });
        }
        indexes
    }

    /// The document child itself, then the coreference mentions it does not
    /// belong to.
    fn child_mentions(&self, doc: &SemanticDocument, document_child: usize) -> Vec<Vec<usize>> {
        let mut mentions = vec![vec![document_child]];
        if self.helper.config().perform_coreference_resolution {
            mentions.extend(
                doc.words[document_child]
                    .mentions
                    .iter()
                    .filter(|mention| !mention.indexes.contains(&document_child) && !mention.indexes.is_empty())
                    .map(|mention| mention.indexes.clone()),
            );
        }
        mentions
    }
}

/// Every word of a mention, each followed by its head subwords.
fn mention_indexes(doc: &SemanticDocument, mention: &[usize]) -> Vec<Index> {
    let mut indexes = Vec::new();
    for &token_index in mention {
        indexes.push(Index::word(token_index));
        indexes.extend(
            doc.words[token_index]
                .subwords
                .iter()
                .filter(|subword| subword.is_head())
                .map(|subword| Index::new(token_index, Some(subword.index))),
        );
    }
    indexes
}

/// Combines the matches of two branches; a search word matched to different
/// document words in the two branches makes them incompatible.
fn merge(existing: &WordMatchDict, dependency: &WordMatchDict) -> Option<WordMatchDict> {
    let mut merged = existing.clone();
    for (search_index, word_match) in dependency {
        match merged.get(search_index) {
            None => {
                merged.insert(*search_index, word_match.clone());
            }
            Some(current) if current.document_index != word_match.document_index => return None,
            Some(_) => {}
        }
    }
    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::testing;
    use crate::word_match::WordMatchType;
    use semgraph_graph::{MatchingConfig, RawDocumentBuilder};

    fn indexed(
        matcher: &StructuralMatcher,
        documents: &[(&str, semgraph_graph::RawDocument)],
    ) -> (BTreeMap<String, SemanticDocument>, CorpusIndex) {
        let mut index = CorpusIndex::new();
        let mut docs = BTreeMap::new();
        for (label, raw) in documents {
            let doc = testing::normalize(matcher.helper(), raw);
            index.index_document(label, &doc, matcher.strategies());
            docs.insert(label.to_string(), doc);
        }
        (docs, index)
    }

    fn dog_chases_cat() -> semgraph_graph::RawDocument {
        RawDocumentBuilder::new()
            .token("The", "the", "DET", "DT", "det", 1)
            .token("dog", "dog", "NOUN", "NN", "nsubj", 2)
            .token("chased", "chase", "VERB", "VBD", "ROOT", 2)
            .token("the", "the", "DET", "DT", "det", 4)
            .token("cat", "cat", "NOUN", "NN", "dobj", 2)
            .build()
    }

    fn dog_chases_phrase(helper: &Arc<MatchingHelper>) -> SearchPhrase {
        testing::phrase(
            helper,
            &RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 1)
                .token("dog", "dog", "NOUN", "NN", "nsubj", 2)
                .token("chases", "chase", "VERB", "VBZ", "ROOT", 2)
                .token("a", "a", "DET", "DT", "det", 4)
                .token("cat", "cat", "NOUN", "NN", "dobj", 2)
                .build(),
        )
    }

    #[test]
    fn test_simple_structural_match() {
        let helper = testing::helper(MatchingConfig::default());
        let matcher = StructuralMatcher::new(Arc::clone(&helper));
        let (documents, index) = indexed(&matcher, &[("doc", dog_chases_cat())]);
        let phrase = dog_chases_phrase(&helper);
        let matches = matcher.match_documents(&documents, &index, &[phrase], &MatchOptions::new());
        assert_eq!(matches.len(), 1);
        let found = &matches[0];
        assert_eq!(found.index_within_document, 2);
        assert_eq!(found.word_matches.len(), 3);
        assert!(!found.is_negated);
        assert!(!found.is_uncertain);
        assert!(found
            .word_matches
            .iter()
            .all(|word_match| word_match.word_match_type == WordMatchType::Direct));
    }

    #[test]
    fn test_wrong_dependency_does_not_match() {
        let helper = testing::helper(MatchingConfig::default());
        let matcher = StructuralMatcher::new(Arc::clone(&helper));
        let (documents, index) = indexed(
            &matcher,
            &[(
                "doc",
                RawDocumentBuilder::new()
                    .token("The", "the", "DET", "DT", "det", 1)
                    .token("cat", "cat", "NOUN", "NN", "nsubj", 2)
                    .token("chased", "chase", "VERB", "VBD", "ROOT", 2)
                    .token("the", "the", "DET", "DT", "det", 4)
                    .token("dog", "dog", "NOUN", "NN", "dobj", 2)
                    .build(),
            )],
        );
        let matches =
            matcher.match_documents(&documents, &index, &[dog_chases_phrase(&helper)], &MatchOptions::new());
        assert!(matches.is_empty());
    }

    #[test]
    fn test_negated_document_gives_negated_match() {
        let helper = testing::helper(MatchingConfig::default());
        let matcher = StructuralMatcher::new(Arc::clone(&helper));
        let (documents, index) = indexed(
            &matcher,
            &[(
                "doc",
                RawDocumentBuilder::new()
                    .token("The", "the", "DET", "DT", "det", 1)
                    .token("dog", "dog", "NOUN", "NN", "nsubj", 4)
                    .token("did", "do", "AUX", "VBD", "aux", 4)
                    .token("not", "not", "PART", "RB", "neg", 4)
                    .token("chase", "chase", "VERB", "VB", "ROOT", 4)
                    .token("the", "the", "DET", "DT", "det", 6)
                    .token("cat", "cat", "NOUN", "NN", "dobj", 4)
                    .build(),
            )],
        );
        let matches =
            matcher.match_documents(&documents, &index, &[dog_chases_phrase(&helper)], &MatchOptions::new());
        assert_eq!(matches.len(), 1);
        assert!(matches[0].is_negated);
        assert!(!matches[0].is_uncertain);
    }

    #[test]
    fn test_label_filter_and_reverse_only_skip() {
        let helper = testing::helper(MatchingConfig::default());
        let matcher = StructuralMatcher::new(Arc::clone(&helper));
        let (documents, index) = indexed(&matcher, &[("a1", dog_chases_cat()), ("b1", dog_chases_cat())]);
        let phrase = dog_chases_phrase(&helper);
        let matches = matcher.match_documents(
            &documents,
            &index,
            std::slice::from_ref(&phrase),
            &MatchOptions::new().with_document_label_filter("b"),
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].document_label, "b1");

        let mut reverse_only = phrase;
        reverse_only.reverse_only = true;
        assert!(matcher
            .match_documents(&documents, &index, std::slice::from_ref(&reverse_only), &MatchOptions::new())
            .is_empty());
        let positions = AHashSet::from([CorpusWordPosition::new("a1", Index::word(2))]);
        let matches = matcher.match_documents(
            &documents,
            &index,
            &[reverse_only],
            &MatchOptions::new().with_reverse_matching_positions(positions),
        );
        assert_eq!(matches.len(), 1);
        assert!(matches[0].from_reverse_only_topic_match_phraselet);
    }

    #[test]
    fn test_merge_rejects_conflicting_branches() {
        let word_match = |document_index| {
            WordMatch::new(0, "dog", document_index, "dog", WordMatchType::Direct, String::new())
        };
        let existing = WordMatchDict::from([(0, word_match(1))]);
        assert!(merge(&existing, &WordMatchDict::from([(0, word_match(1))])).is_some());
        assert!(merge(&existing, &WordMatchDict::from([(0, word_match(2))])).is_none());
    }
}
