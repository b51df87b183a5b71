//! Graph normalizer.
//!
//! Turns a raw syntactic parse into the canonical semantic graph. The passes
//! run in a fixed order over the whole document; each later pass relies on
//! what the earlier ones established:
//!
//! 1. word initialization (lemmas, representations, vectors)
//! 2. negation
//! 3. semantic edges seeded from the syntactic tree
//! 4. initial question words
//! 5. righthand siblings
//! 6. sibling propagation
//! 7. subwords (adapter)
//! 8. coreference
//! 9. matchability and multiword spans
//! 10. auxiliaries and passives (adapter), then sibling propagation again
//! 11. relative clauses (adapter)
//! 12. predicative adjectives
//! 13. preposition attachment duplication
//! 14. language-specific tasks (adapter)
//! 15. parent links and coreference-expanded adjacency

use crate::adapter::{LanguageAdapter, NegationMemo, SubwordCache};
use crate::error::{GraphError, Result};
use crate::model::{Mention, MultiwordSpan, SemanticDocument, Word};
use crate::raw::RawDocument;
use crate::template::PhraseletTemplate;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct Normalizer {
    adapter: Arc<dyn LanguageAdapter>,
    maximum_document_size: usize,
}

impl Normalizer {
    pub fn new(adapter: Arc<dyn LanguageAdapter>) -> Self {
        Self {
            adapter,
            maximum_document_size: 1_000_000,
        }
    }

    pub fn with_maximum_document_size(mut self, maximum: usize) -> Self {
        self.maximum_document_size = maximum;
        self
    }

    pub fn adapter(&self) -> &Arc<dyn LanguageAdapter> {
        &self.adapter
    }

    /// Normalizes one document.
    pub fn normalize(&self, raw: &RawDocument) -> Result<SemanticDocument> {
        let length: usize = raw.tokens.iter().map(|t| t.text.chars().count() + 1).sum();
        if length > self.maximum_document_size {
            return Err(GraphError::DocumentTooLarge {
                length,
                maximum: self.maximum_document_size,
            });
        }
        let mut doc = SemanticDocument::from_raw(raw)?;
        doc.model = self.adapter.name().to_string();
        self.run_passes(&mut doc, raw);
        tracing::debug!(words = doc.len(), sentences = doc.sentences.len(), "normalized document");
        Ok(doc)
    }

    /// Normalizes documents in parallel; each result stands on its own.
    pub fn normalize_batch(&self, raws: &[RawDocument]) -> Vec<Result<SemanticDocument>> {
        let results: Vec<_> = raws.par_iter().map(|raw| self.normalize(raw)).collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(documents = raws.len(), failed, "normalized batch");
        results
    }

    /// Normalizes the example sentences of the adapter's phraselet templates.
    pub fn phraselet_templates(&self) -> Result<Vec<PhraseletTemplate>> {
        self.adapter
            .phraselet_templates()
            .iter()
            .map(|definition| {
                Ok(PhraseletTemplate {
                    definition: definition.clone(),
                    template_doc: self.normalize(&definition.raw)?,
                })
            })
            .collect()
    }

    fn run_passes(&self, doc: &mut SemanticDocument, raw: &RawDocument) {
        let adapter = self.adapter.as_ref();
        let len = doc.len();

        self.initialize_words(doc);
        tracing::trace!("initialized words");

        let mut memo: NegationMemo = vec![None; len];
        for index in 0..len {
            adapter.set_negation(doc, index, &mut memo);
        }

        for index in 0..len {
            self.initialize_semantic_dependencies(doc, index);
        }
        self.set_initial_question_words(doc);

        for index in 0..len {
            self.mark_if_righthand_sibling(doc, index);
            doc.words[index].token_or_lefthand_sibling_index = self.lefthand_sibling(doc, index);
        }
        for index in 0..len {
            self.copy_any_sibling_info(doc, index);
        }
        tracing::trace!("propagated sibling information");

        let mut subword_cache = SubwordCache::default();
        for index in 0..len {
            adapter.add_subwords(doc, index, &mut subword_cache);
        }
        let mentions_by_token = raw.mentions_by_token();
        for (index, mentions) in mentions_by_token.iter().enumerate() {
            self.set_coreference_information(doc, raw, index, mentions);
        }
        for index in 0..len {
            self.set_matchability(doc, index);
        }
        for index in 0..len {
            doc.words[index].multiword_spans = self.multiword_spans_with_head_token(doc, index);
        }

        for index in 0..len {
            adapter.correct_auxiliaries_and_passives(doc, index);
        }
        for index in 0..len {
            self.copy_any_sibling_info(doc, index);
        }
        for index in 0..len {
            adapter.handle_relative_constructions(doc, index);
        }
        for index in 0..len {
            self.normalize_predicative_adjectives(doc, index);
        }
        for index in 0..len {
            self.create_additional_preposition_phrase_semantic_dependencies(doc, index);
        }
        for index in 0..len {
            adapter.perform_language_specific_tasks(doc, index);
        }
        tracing::trace!("applied grammar corrections");

        for index in 0..len {
            self.create_convenience_dependencies(doc, index);
        }
    }

    // ------------------------------------------------------------------------
    // Word initialization
    // ------------------------------------------------------------------------

    fn initialize_words(&self, doc: &mut SemanticDocument) {
        let adapter = self.adapter.as_ref();
        for index in 0..doc.len() {
            let lemma = adapter.lemma(doc, index);
            let derived_lemma = adapter.derived_lemma(Some(&doc.words[index]), &lemma);
            let hyphen_normalized_lemma = adapter.normalize_hyphens(&lemma);
            let word = &mut doc.words[index];
            let mut direct_matching_reprs = vec![lemma.clone()];
            if hyphen_normalized_lemma != lemma {
                direct_matching_reprs.push(hyphen_normalized_lemma.clone());
            }
            let lowercase_text = word.text.to_lowercase();
            if lowercase_text != lemma {
                direct_matching_reprs.push(lowercase_text);
            }
            word.derivation_matching_reprs =
                (derived_lemma != lemma).then(|| vec![derived_lemma.clone()]);
            let vector_key = if lemma.split_whitespace().count() > 1 {
                word.raw_lemma.as_str()
            } else {
                lemma.as_str()
            };
            if let Some(vector) = adapter.lexicon().vector(vector_key) {
                word.vector = Some(vector.to_vec());
            }
            word.direct_matching_reprs = direct_matching_reprs;
            word.hyphen_normalized_lemma = hyphen_normalized_lemma;
            word.derived_lemma = derived_lemma;
            word.lemma = lemma;
        }
    }

    fn initialize_semantic_dependencies(&self, doc: &mut SemanticDocument, index: usize) {
        let excluded = self.adapter.profile().semantic_dependency_excluded_tags;
        let children: Vec<(usize, String)> = doc.words[index]
            .syntactic_children
            .iter()
            .map(|&child| &doc.words[child])
            .filter(|child| child.dep != "punct" && !excluded.contains(&child.tag.as_str()))
            .map(|child| (child.index, child.dep.clone()))
            .collect();
        for (child, label) in children {
            doc.add_edge(index, child, &label, false);
        }
    }

    fn set_initial_question_words(&self, doc: &mut SemanticDocument) {
        if doc.is_empty() {
            return;
        }
        let profile = self.adapter.profile();
        let mut visited = BTreeSet::new();
        let mut phrase_head = 0;
        loop {
            let head = doc.words[phrase_head].head;
            if profile.predicate_head_pos.contains(&doc.words[head].pos.as_str())
                || visited.contains(&head)
            {
                break;
            }
            visited.insert(phrase_head);
            phrase_head = head;
        }
        let first_sentence = doc.sentences[0];
        let subtree = doc.syntactic_subtree(phrase_head);
        for index in first_sentence.start..=first_sentence.end {
            if self.adapter.is_interrogative_pronoun(&doc.words[index])
                && subtree.binary_search(&index).is_ok()
            {
                doc.words[index].is_initial_question_word = true;
            }
        }
        for index in first_sentence.start..=first_sentence.end {
            let word = &doc.words[index];
            let governs_question_word = profile.is_noun_pos(&word.pos)
                && word.labeled_children().any(|edge| {
                    let child = &doc.words[edge.child];
                    self.adapter.is_interrogative_pronoun(child) && child.lemma != profile.whose_lemma
                });
            if governs_question_word {
                doc.words[index].has_initial_question_word_in_phrase = true;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Siblings
    // ------------------------------------------------------------------------

    fn mark_if_righthand_sibling(&self, doc: &mut SemanticDocument, index: usize) {
        let profile = self.adapter.profile();
        if !profile.sibling_marker_deps.contains(&doc.words[index].dep.as_str()) {
            return;
        }
        let mut working = index;
        let mut or_conjunction = false;
        while profile.conjunction_deps.contains(&doc.words[working].dep.as_str()) {
            let head = doc.words[working].head;
            if head == working {
                break;
            }
            working = head;
            if doc.words[working]
                .syntactic_children
                .iter()
                .any(|&child| doc.words[child].raw_lemma == profile.or_lemma)
            {
                or_conjunction = true;
            }
        }
        doc.words[working].righthand_siblings.push(index);
        if or_conjunction {
            doc.words[working].is_involved_in_or_conjunction = true;
        }
    }

    fn lefthand_sibling(&self, doc: &SemanticDocument, index: usize) -> usize {
        let conjunction_deps = self.adapter.profile().conjunction_deps;
        let mut working = index;
        while conjunction_deps.contains(&doc.words[working].dep.as_str()) {
            let head = doc.words[working].head;
            if head == working {
                break;
            }
            working = head;
        }
        working
    }

    /// Spreads the "or" flag to righthand siblings and copies edges across
    /// sibling groups. Edges appended while a word is processed are processed
    /// in turn.
    pub fn copy_any_sibling_info(&self, doc: &mut SemanticDocument, index: usize) {
        let profile = self.adapter.profile();
        if doc.words[index].is_involved_in_or_conjunction {
            for sibling in doc.words[index].righthand_siblings.clone() {
                doc.words[sibling].is_involved_in_or_conjunction = true;
            }
        }
        let mut position = 0;
        while position < doc.words[index].children.len() {
            let edge = doc.words[index].children[position].clone();
            position += 1;
            let (Some(child), Some(label)) = (edge.child(), edge.label().map(str::to_string)) else {
                continue;
            };
            let is_uncertain = edge.is_uncertain();

            // The parent also governs the righthand siblings of its child.
            for child_sibling in doc.words[child].righthand_siblings.clone() {
                if index != child_sibling
                    && !doc.words[index].has_dependency_with_child_index(child_sibling)
                {
                    doc.add_edge(index, child_sibling, &label, is_uncertain);
                }
            }

            // The righthand siblings of the parent also govern the child.
            if profile.conjunction_deps.contains(&label.as_str()) {
                continue;
            }
            for sibling in doc.words[index].righthand_siblings.clone() {
                if sibling == child || !(sibling < child || child < index) {
                    continue;
                }
                let sibling_word = &doc.words[sibling];
                let has_own_argument = sibling_word.labeled_children().any(|e| {
                    e.label == label && !doc.words[index].has_dependency_with_child_index(e.child)
                });
                if !has_own_argument && !sibling_word.has_dependency_with_child_index(child) {
                    doc.add_edge(
                        sibling,
                        child,
                        &label,
                        profile.mark_child_dependencies_copied_to_siblings_as_uncertain
                            || is_uncertain,
                    );
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Coreference and matchability
    // ------------------------------------------------------------------------

    /// `containing` holds `(chain, mention)` for the chains mentioning the word.
    fn set_coreference_information(
        &self,
        doc: &mut SemanticDocument,
        raw: &RawDocument,
        index: usize,
        containing: &[(usize, usize)],
    ) {
        let profile = self.adapter.profile();
        let maximum_mentions = profile.maximum_mentions_in_coreference_chain;
        let mut mentions = Vec::new();
        let mut most_specific = None;
        for &(chain_index, this_mention) in containing {
            let chain = &raw.coreference_chains[chain_index];
            let first = this_mention.saturating_sub(maximum_mentions);
            let last = (this_mention + maximum_mentions).min(chain.mentions.len() - 1);
            for mention in &chain.mentions[first..=last] {
                if mention.root_index.abs_diff(index) > profile.maximum_word_distance_in_coreference_chain {
                    continue;
                }
                let indexes = if mention.token_indexes.contains(&index) {
                    vec![index]
                } else {
                    mention.token_indexes.clone()
                };
                mentions.push(Mention {
                    root_index: mention.root_index,
                    indexes,
                });
            }
            // Chains whose first mention is coordinated do not name one term.
            if chain.mentions.first().is_some_and(|m| m.token_indexes.len() == 1) {
                most_specific = chain
                    .mentions
                    .get(chain.most_specific_mention_index)
                    .and_then(|m| m.token_indexes.first().copied());
            }
        }
        let others: BTreeSet<usize> = mentions
            .iter()
            .filter(|m| !m.indexes.contains(&index))
            .flat_map(|m| m.indexes.iter().copied())
            .collect();
        let word = &mut doc.words[index];
        word.token_and_coreference_chain_indexes = std::iter::once(index).chain(others).collect();
        word.mentions = mentions;
        word.most_specific_coreferring_term_index = most_specific;
    }

    fn set_matchability(&self, doc: &mut SemanticDocument, index: usize) {
        let profile = self.adapter.profile();
        let word = &doc.words[index];
        let matchable = (profile.matchable_pos.contains(&word.pos.as_str())
            || word.is_involved_in_coreference()
            || !word.subwords.is_empty())
            && !self.adapter.is_interrogative_pronoun(word)
            && !profile.generic_pronoun_lemmas.contains(&word.lemma.as_str());
        doc.words[index].is_matchable = matchable;
    }

    /// Every contiguous run of matchable words (hyphens skipped) of at least
    /// two words within a noun's subtree that contains the noun itself.
    fn multiword_spans_with_head_token(&self, doc: &SemanticDocument, index: usize) -> Vec<MultiwordSpan> {
        let head = &doc.words[index];
        if !self.adapter.profile().is_noun_pos(&head.pos) || !head.is_matchable || head.text == "-" {
            return Vec::new();
        }
        let in_run = |i: usize| doc.words[i].is_matchable || doc.words[i].text == "-";
        let mut start = index;
        while start > head.left_edge && in_run(start - 1) {
            start -= 1;
        }
        let mut end = index;
        while end < head.right_edge && in_run(end + 1) {
            end += 1;
        }
        let mut spans = Vec::new();
        for pointer in start..end.min(index + 1) {
            let members: Vec<usize> = (pointer..=end).filter(|&i| doc.words[i].text != "-").collect();
            let join = |field: fn(&Word) -> &str| {
                members
                    .iter()
                    .map(|&i| field(&doc.words[i]))
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            spans.push(MultiwordSpan::new(
                &join(|w| w.text.as_str()).to_lowercase(),
                &join(|w| w.hyphen_normalized_lemma.as_str()),
                &join(|w| w.lemma.as_str()),
                &join(|w| w.derived_lemma.as_str()),
                members,
            ));
        }
        spans
    }

    // ------------------------------------------------------------------------
    // Structural rewrites
    // ------------------------------------------------------------------------

    /// "The town is old" gets the same shape as "the old town".
    fn normalize_predicative_adjectives(&self, doc: &mut SemanticDocument, index: usize) {
        let profile = self.adapter.profile();
        if !profile
            .adjectival_predicate_head_pos
            .contains(&doc.words[index].pos.as_str())
        {
            return;
        }
        let adjectives: Vec<usize> = doc.words[index]
            .labeled_children()
            .filter(|e| {
                e.label == profile.adjectival_predicate_predicate_dep
                    && doc.words[e.child].pos == profile.adjectival_predicate_predicate_pos
            })
            .map(|e| e.child)
            .collect();
        let mut last_subject = None;
        for adjective in adjectives {
            let subjects: Vec<usize> = doc.words[index]
                .labeled_children()
                .filter(|e| {
                    e.label == profile.adjectival_predicate_subject_dep
                        && (profile
                            .adjectival_predicate_subject_pos
                            .contains(&doc.words[e.child].pos.as_str())
                            || doc.words[e.child].is_involved_in_coreference()
                                && e.child != adjective)
                })
                .map(|e| e.child)
                .collect();
            for subject in subjects {
                if doc.add_edge(subject, adjective, profile.modifier_dep, false) {
                    last_subject = Some(subject);
                }
            }
        }
        if let Some(subject) = last_subject {
            doc.set_redirect(index, subject);
        }
    }

    /// Adds the attachment a preposition lacks on either its preceding noun
    /// or that noun's governing verb.
    fn create_additional_preposition_phrase_semantic_dependencies(
        &self,
        doc: &mut SemanticDocument,
        index: usize,
    ) {
        let profile = self.adapter.profile();
        if doc.words[index].pos != "ADP" || index == 0 {
            return;
        }
        let preceding = index - 1;
        if !doc.same_sentence(preceding, index)
            || !matches!(doc.words[preceding].pos.as_str(), "NOUN" | "PROPN" | "PRON")
        {
            return;
        }
        let sentence = *doc.sentence_of(index);
        let governing_verbs: Vec<usize> = (sentence.start..=sentence.end)
            .filter(|&w| {
                doc.words[w].pos == "VERB" && doc.words[w].has_dependency_with_child_index(preceding)
            })
            .collect();
        let Some(&first_verb) = governing_verbs.first() else {
            return;
        };
        let prepositions = doc.token_and_righthand_siblings(index);
        for &verb in &governing_verbs {
            if doc.words[preceding]
                .has_dependency_with_child_index_and_label(index, profile.parser_noun_to_preposition_dep)
                && !doc.words[verb]
                    .has_dependency_with_child_index_and_label(index, profile.parser_verb_to_preposition_dep)
            {
                for &preposition in &prepositions {
                    doc.add_edge(verb, preposition, profile.semantic_verb_to_preposition_dep, true);
                }
            }
        }
        if doc.words[first_verb]
            .has_dependency_with_child_index_and_label(index, profile.parser_verb_to_preposition_dep)
            && !doc.words[preceding]
                .has_dependency_with_child_index_and_label(index, profile.parser_noun_to_preposition_dep)
        {
            let introduces_relative_clause = doc.words[index]
                .labeled_children()
                .any(|e| doc.words[e.child].has_dependency_with_label("relcl"));
            if introduces_relative_clause {
                return;
            }
            for &preposition in &prepositions {
                doc.add_edge(preceding, preposition, profile.semantic_noun_to_preposition_dep, true);
            }
        }
    }

    fn create_convenience_dependencies(&self, doc: &mut SemanticDocument, index: usize) {
        let edges: Vec<_> = doc.words[index]
            .children
            .iter()
            .filter(|e| !e.is_redirect())
            .cloned()
            .collect();
        for edge in edges {
            if let Some(child) = edge.child() {
                doc.words[child].parents.push(edge);
            }
        }
        let mut linked_children = Vec::new();
        for &linked_parent in &doc.words[index].token_and_coreference_chain_indexes {
            for edge in doc.words[linked_parent].labeled_children() {
                for &linked_child in &doc.words[edge.child].token_and_coreference_chain_indexes {
                    linked_children.push((linked_child, edge.label.to_string()));
                }
            }
        }
        for (linked_child, label) in linked_children {
            doc.words[index]
                .coreference_linked_child_dependencies
                .push((linked_child, label.clone()));
            doc.words[linked_child]
                .coreference_linked_parent_dependencies
                .push((index, label));
        }
    }
}
