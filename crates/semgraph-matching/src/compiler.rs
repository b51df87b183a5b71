//! Search phrase compiler.
//!
//! Validates a normalized pattern, decides which of its words must be
//! matched and where recursive matching starts, and precomputes the data
//! the structural matcher needs: vectors for embedding comparisons and the
//! forms under which the root word is looked up in the corpus index.

use crate::error::SearchPhraseError;
use crate::helper::MatchingHelper;
use crate::search_phrase::SearchPhrase;
use crate::strategy::{build_strategies, WordMatchingStrategy};
use semgraph_graph::{Edge, PhraseletTemplate, SemanticDocument};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Text recorded on search phrases generated from phraselets.
pub const PHRASELET_TEXT: &str = "topic match phraselet";

/// Settings of a phraselet search phrase that do not come from its template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhraseletFlags {
    pub created_without_matching_tags: bool,
    pub treat_as_reverse_only_during_initial_pass: bool,
    /// The parent lemma is on the adapter's reverse-only parent list.
    pub reverse_only_parent: bool,
    pub process_initial_question_words: bool,
}

pub struct SearchPhraseCompiler {
    helper: Arc<MatchingHelper>,
    strategies: Vec<Box<dyn WordMatchingStrategy>>,
}

impl std::fmt::Debug for SearchPhraseCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPhraseCompiler")
            .field("helper", &self.helper)
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

impl SearchPhraseCompiler {
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

    /// Compiles a hand-authored pattern. Question words in such patterns
    /// are matched like any other word, never as questions.
    pub fn compile(
        &self,
        label: &str,
        doc_text: &str,
        doc: SemanticDocument,
    ) -> Result<SearchPhrase, SearchPhraseError> {
        self.build(label, doc_text, doc, None, PhraseletFlags::default())
    }

    /// Compiles a copy of a template document whose parent and child words
    /// have been given a phraselet's lemmas.
    pub fn compile_phraselet(
        &self,
        label: &str,
        doc: SemanticDocument,
        template: &PhraseletTemplate,
        flags: PhraseletFlags,
    ) -> Result<SearchPhrase, SearchPhraseError> {
        self.build(label, PHRASELET_TEXT, doc, Some(template), flags)
    }

    fn build(
        &self,
        label: &str,
        doc_text: &str,
        mut doc: SemanticDocument,
        template: Option<&PhraseletTemplate>,
        flags: PhraseletFlags,
    ) -> Result<SearchPhrase, SearchPhraseError> {
        self.validate(doc_text, &doc, template)
            .inspect_err(|err| tracing::debug!(phrase = %label, %err, "rejected search phrase"))?;

        let mut ignored = Vec::new();
        if template.is_none()
            && self.helper.ontology().is_some()
            && self.helper.config().analyze_derivational_morphology
        {
            ignored = substitute_ontology_multiwords(&self.helper, &mut doc);
        }

        let lexicon = self.helper.adapter().lexicon();
        let mut matchable_indexes = Vec::new();
        let mut vectors = BTreeMap::new();
        let mut roots = Vec::new();
        for index in 0..doc.len() {
            if ignored.contains(&index) {
                doc.words[index].is_matchable = false;
                continue;
            }
            if let Some(template) = template {
                if template.parent_index() != index && template.child_index() != Some(index) {
                    doc.words[index].is_matchable = false;
                }
                if template.parent_index() == index {
                    if let (Some(child), Some(assigned)) = (
                        template.child_index(),
                        template.definition.assigned_dependency_label.as_deref(),
                    ) {
                        relabel_edge(&mut doc, index, child, assigned);
                    }
                }
            }
            let word = &doc.words[index];
            if word.is_matchable && word.redirect_target().is_none() {
                matchable_indexes.push(index);
                if self.helper.entity_placeholder(word).is_none() {
                    let key = if template.is_none() && word.lemma.split_whitespace().count() > 1 {
                        word.raw_lemma.as_str()
                    } else {
                        word.lemma.as_str()
                    };
                    vectors.insert(index, lexicon.vector(key).map(<[f32]>::to_vec));
                }
            }
            if flags.process_initial_question_words && self.helper.adapter().is_interrogative_pronoun(word) {
                if !matchable_indexes.contains(&index) {
                    matchable_indexes.push(index);
                }
                vectors.insert(index, None);
            }
            if word.is_root() {
                roots.push(replace_grammatical_root(&doc, index, &mut Vec::new()));
            }
        }
        if matchable_indexes.is_empty() {
            return Err(SearchPhraseError::WithoutMatchableWords(doc_text.to_string()));
        }
        if roots.len() > 1 {
            return Err(SearchPhraseError::ContainsMultipleClauses(doc_text.to_string()));
        }
        let root_index = match (template, roots.first()) {
            (Some(template), _) => template.parent_index(),
            (None, Some(&root)) => root,
            (None, None) => return Err(SearchPhraseError::WithoutMatchableWords(doc_text.to_string())),
        };
        let question = template.is_some_and(PhraseletTemplate::question);
        let reverse_only = template
            .is_some_and(|t| !t.question() && (flags.reverse_only_parent || t.reverse_only()));

        let mut phrase = SearchPhrase {
            has_single_matchable_word: matchable_indexes.len() == 1 && !question,
            doc,
            doc_text: doc_text.to_string(),
            label: label.to_string(),
            matchable_indexes,
            root_index,
            vectors,
            topic_match_phraselet: template.is_some(),
            topic_match_phraselet_created_without_matching_tags: flags.created_without_matching_tags,
            question_phraselet: question,
            reverse_only,
            treat_as_reverse_only_during_initial_pass: flags.treat_as_reverse_only_during_initial_pass,
            words_matching_root: Vec::new(),
        };
        for strategy in &self.strategies {
            strategy.add_words_matching_root(&mut phrase);
        }
        phrase.sort_words_matching_root();
        tracing::debug!(
            phrase = %label,
            root = phrase.root_index,
            matchable = phrase.matchable_indexes.len(),
            reverse_only,
            "compiled search phrase"
        );
        Ok(phrase)
    }

    fn validate(
        &self,
        doc_text: &str,
        doc: &SemanticDocument,
        template: Option<&PhraseletTemplate>,
    ) -> Result<(), SearchPhraseError> {
        let coreference = self.helper.config().perform_coreference_resolution;
        for word in &doc.words {
            if !word.righthand_siblings.is_empty() {
                return Err(SearchPhraseError::ContainsConjunction(doc_text.to_string()));
            }
            if coreference && word.pos == "PRON" && word.is_involved_in_coreference() {
                return Err(SearchPhraseError::ContainsCoreferringPronoun(doc_text.to_string()));
            }
            // Phraselets may carry negation so that callers can search for it.
            if word.is_negated && template.is_none() {
                return Err(SearchPhraseError::ContainsNegation(doc_text.to_string()));
            }
        }
        Ok(())
    }
}

/// Gives the head of each ontology-defined multiword the multiword's forms
/// and returns the other members, which stop being matched on their own.
fn substitute_ontology_multiwords(helper: &MatchingHelper, doc: &mut SemanticDocument) -> Vec<usize> {
    let mut ignored = Vec::new();
    for index in 0..doc.len() {
        let Some(span) = helper.ontology_defined_multiword(doc, index).cloned() else {
            continue;
        };
        for &member in &span.token_indexes {
            if member == index {
                let word = &mut doc.words[index];
                word.lemma = span.lemma.clone();
                word.derived_lemma = span.derived_lemma.clone();
                word.direct_matching_reprs = span.direct_matching_reprs.clone();
                word.derivation_matching_reprs = span.derivation_matching_reprs.clone();
            } else {
                ignored.push(member);
            }
        }
    }
    ignored
}

fn relabel_edge(doc: &mut SemanticDocument, parent: usize, child: usize, new_label: &str) {
    for edge in &mut doc.words[parent].children {
        if let Edge::Labeled { child: c, label, .. } = edge {
            if *c == child {
                *label = new_label.to_string();
            }
        }
    }
    for edge in &mut doc.words[child].parents {
        if let Edge::Labeled { parent: p, label, .. } = edge {
            if *p == parent {
                *label = new_label.to_string();
            }
        }
    }
}

/// The semantic root behind a syntactic root: redirects are followed, and
/// a non-matchable word hands over to its first matchable child.
fn replace_grammatical_root(doc: &SemanticDocument, index: usize, visited: &mut Vec<usize>) -> usize {
    if visited.contains(&index) {
        return index;
    }
    visited.push(index);
    let word = &doc.words[index];
    if let Some(target) = word.children.iter().find_map(Edge::redirect_target) {
        return replace_grammatical_root(doc, target, visited);
    }
    if !word.is_matchable {
        if let Some(child) = word
            .labeled_children()
            .map(|edge| edge.child)
            .find(|&child| doc.words[child].is_matchable)
        {
            return replace_grammatical_root(doc, child, visited);
        }
    }
    index
}
