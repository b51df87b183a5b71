//! Phraselet extraction.
//!
//! Phraselets are the small relations ("predicate-actor: chase-dog") and
//! single words a document is made of, keyed by template label and derived
//! lemmas so that different surface forms of the same meaning collapse to
//! one entry. They become search phrases by substituting their lemmas into
//! the parse of their template's example sentence.

use crate::compiler::{PhraseletFlags, SearchPhraseCompiler};
use crate::error::SearchPhraseError;
use crate::helper::{MatchingHelper, ENTITY_NOUN};
use crate::search_phrase::SearchPhrase;
use ahash::AHashMap;
use semgraph_graph::{Index, PhraseletTemplate, SemanticDocument, Word};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

// ============================================================================
// Phraselet info
// ============================================================================

/// One end of a phraselet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseletPole {
    pub lemma: String,
    pub hyphen_normalized_lemma: String,
    pub derived_lemma: String,
    pub pos: String,
    pub ent_type: String,
    pub is_initial_question_word: bool,
    pub has_initial_question_word_in_phrase: bool,
    /// Between 0 and 1, lower the more frequent the pole's words are in
    /// the corpus. `None` when no frequency table was supplied.
    pub frequency_factor: Option<f32>,
}

impl PhraseletPole {
    pub fn direct_matching_reprs(&self) -> Vec<String> {
        let mut reprs = vec![self.lemma.clone()];
        if self.hyphen_normalized_lemma != self.lemma {
            reprs.push(self.hyphen_normalized_lemma.clone());
        }
        reprs
    }

    pub fn derivation_matching_reprs(&self) -> Option<Vec<String>> {
        (self.derived_lemma != self.lemma).then(|| vec![self.derived_lemma.clone()])
    }

    fn apply_to(&self, word: &mut Word) {
        word.lemma = self.lemma.clone();
        word.hyphen_normalized_lemma = self.hyphen_normalized_lemma.clone();
        word.derived_lemma = self.derived_lemma.clone();
        word.direct_matching_reprs = self.direct_matching_reprs();
        word.derivation_matching_reprs = self.derivation_matching_reprs();
        word.ent_type = self.ent_type.clone();
        word.is_initial_question_word = self.is_initial_question_word;
        word.has_initial_question_word_in_phrase = self.has_initial_question_word_in_phrase;
    }
}

/// One extracted phraselet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseletInfo {
    /// e.g. `predicate-patient: open-door`
    pub label: String,
    pub template_label: String,
    pub parent: PhraseletPole,
    /// `None` for single-word phraselets.
    pub child: Option<PhraseletPole>,
    pub created_without_matching_tags: bool,
    pub reverse_only_parent_lemma: bool,
    /// Product of the pole factors.
    pub frequency_factor: Option<f32>,
}

impl PhraseletInfo {
    pub fn is_single_word(&self) -> bool {
        self.child.is_none()
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// How one extraction pass treats a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionOptions {
    pub replace_with_hypernym_ancestors: bool,
    /// Single-word phraselets for every matchable word and subword,
    /// regardless of template tags.
    pub match_all_words: bool,
    pub ignore_relation_phraselets: bool,
    /// Whether relation phraselets that are only reverse-matched are kept.
    pub include_reverse_only: bool,
    /// Whether initial question words may be phraselet children.
    pub process_initial_question_words: bool,
}

/// Corpus word frequencies used to weight phraselets.
#[derive(Debug, Clone, Copy)]
pub struct CorpusFrequencies<'a> {
    pub words: &'a AHashMap<String, usize>,
    pub maximum: usize,
}

pub struct PhraseletExtractor {
    helper: Arc<MatchingHelper>,
    templates: Vec<PhraseletTemplate>,
}

impl std::fmt::Debug for PhraseletExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhraseletExtractor")
            .field("templates", &self.templates.iter().map(|t| t.label()).collect::<Vec<_>>())
            .finish()
    }
}

/// Words and subwords of one document, resolved once.
struct DocumentView<'a> {
    doc: &'a SemanticDocument,
    lemmas: AHashMap<Index, (String, String)>,
    /// Head word of a multiword -> the multiword's text.
    multiwords: BTreeMap<usize, String>,
    /// Non-head members of multiwords.
    within_multiwords: BTreeSet<usize>,
}

impl PhraseletExtractor {
    pub fn new(helper: Arc<MatchingHelper>, templates: Vec<PhraseletTemplate>) -> Self {
        Self { helper, templates }
    }

    pub fn templates(&self) -> &[PhraseletTemplate] {
        &self.templates
    }

    pub fn template(&self, label: &str) -> Option<&PhraseletTemplate> {
        self.templates.iter().find(|template| template.label() == label)
    }

    /// Phraselets for topic matching: a pass over the templates, then
    /// single-word phraselets for the words whose tags matched no template.
    pub fn phraselet_infos(
        &self,
        doc: &SemanticDocument,
        frequencies: Option<CorpusFrequencies<'_>>,
        process_initial_question_words: bool,
    ) -> BTreeMap<String, PhraseletInfo> {
        let mut infos = BTreeMap::new();
        self.add_phraselets(
            doc,
            &mut infos,
            &ExtractionOptions {
                include_reverse_only: true,
                process_initial_question_words,
                ..ExtractionOptions::default()
            },
            frequencies,
        );
        self.add_phraselets(
            doc,
            &mut infos,
            &ExtractionOptions {
                match_all_words: true,
                ignore_relation_phraselets: true,
                ..ExtractionOptions::default()
            },
            frequencies,
        );
        tracing::debug!(
            phraselets = infos.len(),
            relations = infos.values().filter(|info| !info.is_single_word()).count(),
            "extracted phraselets"
        );
        infos
    }

    /// Adds the phraselets of one document to `infos`. An existing entry
    /// under the same label keeps its label but may take over the new
    /// lemmas when they come from a preferred part of speech.
    pub fn add_phraselets(
        &self,
        doc: &SemanticDocument,
        infos: &mut BTreeMap<String, PhraseletInfo>,
        options: &ExtractionOptions,
        frequencies: Option<CorpusFrequencies<'_>>,
    ) {
        let mut view = self.document_view(doc);
        for word in &doc.words {
            let token = word.index;
            if view.within_multiwords.contains(&token) {
                if options.match_all_words {
                    self.add_single_word(&mut view, infos, options, frequencies, token, None, false);
                }
                continue;
            }
            // Words holding subwords of conjoined words are only fragments.
            if !has_foreign_subwords(word) {
                self.add_single_word(
                    &mut view,
                    infos,
                    options,
                    frequencies,
                    token,
                    None,
                    !options.match_all_words,
                );
            }
            if options.match_all_words {
                for subword in word.subwords.iter().filter(|s| s.containing_token_index == token) {
                    self.add_single_word(&mut view, infos, options, frequencies, token, Some(subword.index), false);
                }
            }
            if options.ignore_relation_phraselets {
                continue;
            }
            self.add_relations(&mut view, infos, options, frequencies, word);
            self.add_subword_relations(&mut view, infos, options, frequencies, word);
        }
        if infos.is_empty() && !options.match_all_words {
            for word in &doc.words {
                self.add_single_word(&mut view, infos, options, frequencies, word.index, None, false);
            }
        }
    }

    fn document_view<'a>(&self, doc: &'a SemanticDocument) -> DocumentView<'a> {
        let mut view = DocumentView {
            doc,
            lemmas: AHashMap::new(),
            multiwords: BTreeMap::new(),
            within_multiwords: BTreeSet::new(),
        };
        for word in doc.words.iter().filter(|w| w.lemma.split_whitespace().count() == 1) {
            let (span, text) = match self.helper.ontology_defined_multiword(doc, word.index) {
                Some(span) => {
                    let text = span.text.to_lowercase();
                    let text = self
                        .helper
                        .ontology_word_for_derived_form(&text)
                        .map(str::to_string)
                        .unwrap_or(text);
                    (span.token_indexes.clone(), text)
                }
                None => match self.helper.entity_defined_multiword(doc, word.index) {
                    Some(span) => (span.token_indexes, span.text.to_lowercase()),
                    None => continue,
                },
            };
            for member in span {
                if member == word.index {
                    view.multiwords.insert(member, text.clone());
                } else {
                    view.within_multiwords.insert(member);
                }
            }
        }
        view
    }

    /// Lemma and derived lemma used for a word or subword in phraselets.
    fn lemmas(&self, view: &mut DocumentView<'_>, index: Index) -> (String, String) {
        if let Some(cached) = view.lemmas.get(&index) {
            return cached.clone();
        }
        let doc = view.doc;
        let word = &doc.words[index.token_index];
        let analyze = self.helper.config().analyze_derivational_morphology;
        let ontology = self.helper.ontology();
        let resolved = if self.helper.entity_placeholder(word).is_some() {
            // The placeholder's text keeps its case.
            (word.text.clone(), word.text.clone())
        } else {
            let (lemma, derived, text) = match index.subword_index.and_then(|s| word.subwords.get(s)) {
                Some(subword) => (&subword.lemma, &subword.derived_lemma, &subword.text),
                None => (&word.lemma, &word.derived_lemma, &word.text),
            };
            let mut lemma = lemma.clone();
            let mut derived = if analyze { derived.clone() } else { lemma.clone() };
            if let Some(ontology) = ontology {
                let lowercase = text.to_lowercase();
                if !ontology.contains_word(&lemma) && ontology.contains_word(&lowercase) {
                    lemma = lowercase.clone();
                    derived = lowercase;
                }
                if analyze {
                    if let Some(word) = self.helper.ontology_word_for_derived_form(&derived) {
                        derived = word.to_string();
                    }
                }
            }
            (lemma, derived)
        };
        view.lemmas.insert(index, resolved.clone());
        resolved
    }

    fn pole_lemmas(
        &self,
        view: &mut DocumentView<'_>,
        options: &ExtractionOptions,
        index: Index,
        use_multiword: bool,
    ) -> (String, String) {
        let (lemma, derived) = match view.multiwords.get(&index.token_index) {
            Some(multiword) if use_multiword && !index.is_subword() => (multiword.clone(), multiword.clone()),
            _ => self.lemmas(view, index),
        };
        match self.helper.ontology() {
            Some(ontology) if options.replace_with_hypernym_ancestors => {
                let ancestor = ontology.get_most_general_hypernym_ancestor(&derived).to_lowercase();
                if ancestor != derived {
                    (ancestor.clone(), ancestor)
                } else {
                    (lemma, derived)
                }
            }
            _ => (lemma, derived),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_single_word(
        &self,
        view: &mut DocumentView<'_>,
        infos: &mut BTreeMap<String, PhraseletInfo>,
        options: &ExtractionOptions,
        frequencies: Option<CorpusFrequencies<'_>>,
        token: usize,
        subword: Option<usize>,
        checking_tags: bool,
    ) {
        let profile = self.helper.profile();
        let doc = view.doc;
        let word = &doc.words[token];
        if !(word.is_matchable || subword.is_some())
            || profile.topic_matching_phraselet_stop_tags.contains(&word.tag.as_str())
        {
            return;
        }
        for template in self.templates.iter().filter(|t| t.is_single_word()) {
            if checking_tags && !template.accepts_parent_tag(&word.tag) {
                continue;
            }
            let (lemma, derived) = self.pole_lemmas(
                view,
                options,
                Index::new(token, subword),
                !options.match_all_words,
            );
            if profile.topic_matching_phraselet_stop_lemmas.contains(&derived.as_str()) || derived == ENTITY_NOUN {
                continue;
            }
            let parent = self.pole(word, lemma, derived, frequencies);
            self.insert(infos, template, options.match_all_words, false, parent, None);
        }
    }

    fn add_relations(
        &self,
        view: &mut DocumentView<'_>,
        infos: &mut BTreeMap<String, PhraseletInfo>,
        options: &ExtractionOptions,
        frequencies: Option<CorpusFrequencies<'_>>,
        word: &Word,
    ) {
        let doc = view.doc;
        let profile = self.helper.profile();
        let coreference = self.helper.config().perform_coreference_resolution;
        let mut parents = if coreference {
            word.token_and_coreference_chain_indexes.iter().map(|&i| Index::word(i)).collect()
        } else {
            vec![Index::word(word.index)]
        };
        add_head_subwords_and_drop_fragments(doc, &mut parents);
        for parent in parents {
            let parent_word = &doc.words[parent.token_index];
            let edges: Vec<(usize, &str)> = parent_word
                .labeled_children()
                .filter(|edge| !view.within_multiwords.contains(&edge.child))
                .map(|edge| (edge.child, edge.label))
                .collect();
            for (edge_child, edge_label) in edges {
                let child_word = &doc.words[edge_child];
                let mut children = if coreference {
                    child_word
                        .token_and_coreference_chain_indexes
                        .iter()
                        .map(|&i| Index::word(i))
                        .collect()
                } else {
                    vec![Index::word(edge_child)]
                };
                add_head_subwords_and_drop_fragments(doc, &mut children);
                for child in children {
                    let child_word = &doc.words[child.token_index];
                    for template in self
                        .templates
                        .iter()
                        .filter(|t| !t.is_single_word() && (!t.reverse_only() || options.include_reverse_only))
                    {
                        if !template.accepts_dependency(edge_label)
                            || !template.accepts_parent_tag(&parent_word.tag)
                            || !template.accepts_child_tag(&child_word.tag)
                            || !parent_word.is_matchable
                            || !(child_word.is_matchable
                                || (options.process_initial_question_words && child_word.is_initial_question_word))
                        {
                            continue;
                        }
                        let (parent_lemma, parent_derived) = self.pole_lemmas(view, options, parent, true);
                        let (child_lemma, child_derived) = self.pole_lemmas(view, options, child, true);
                        let reverse_only_parent = profile.is_reverse_only_parent(&parent_word.lemma, &parent_word.pos);
                        if profile.topic_matching_phraselet_stop_lemmas.contains(&parent_lemma.as_str())
                            || profile.topic_matching_phraselet_stop_lemmas.contains(&child_lemma.as_str())
                            || (reverse_only_parent && !options.include_reverse_only)
                        {
                            continue;
                        }
                        let parent_pole = self.pole(parent_word, parent_lemma, parent_derived, frequencies);
                        let child_pole = self.pole(child_word, child_lemma, child_derived, frequencies);
                        self.insert(
                            infos,
                            template,
                            options.match_all_words,
                            reverse_only_parent,
                            parent_pole,
                            Some(child_pole),
                        );
                    }
                }
            }
        }
    }

    /// Relations between subwords of one word, e.g. the parts of a
    /// compound noun.
    fn add_subword_relations(
        &self,
        view: &mut DocumentView<'_>,
        infos: &mut BTreeMap<String, PhraseletInfo>,
        options: &ExtractionOptions,
        frequencies: Option<CorpusFrequencies<'_>>,
        word: &Word,
    ) {
        for subword in &word.subwords {
            let (Some(dependent), Some(label)) = (subword.dependent_index, subword.dependency_label.as_deref()) else {
                continue;
            };
            let Some(dependent_subword) = word.subwords.get(dependent) else {
                continue;
            };
            if subword.containing_token_index != word.index && dependent_subword.containing_token_index != word.index {
                continue;
            }
            for template in self.templates.iter().filter(|t| {
                !t.is_single_word()
                    && (!t.reverse_only() || options.include_reverse_only)
                    && t.accepts_dependency(label)
                    && t.accepts_parent_tag(&word.tag)
            }) {
                let (parent_lemma, parent_derived) =
                    self.pole_lemmas(view, options, Index::new(word.index, Some(subword.index)), false);
                let (child_lemma, child_derived) =
                    self.pole_lemmas(view, options, Index::new(word.index, Some(dependent)), false);
                let parent_pole = self.pole(word, parent_lemma, parent_derived, frequencies);
                let child_pole = self.pole(word, child_lemma, child_derived, frequencies);
                self.insert(infos, template, options.match_all_words, false, parent_pole, Some(child_pole));
            }
        }
    }

    fn pole(
        &self,
        word: &Word,
        lemma: String,
        derived_lemma: String,
        frequencies: Option<CorpusFrequencies<'_>>,
    ) -> PhraseletPole {
        let frequency_factor = frequencies.map(|f| self.frequency_factor(&lemma, &derived_lemma, f));
        PhraseletPole {
            hyphen_normalized_lemma: self.helper.adapter().normalize_hyphens(&lemma),
            lemma,
            derived_lemma,
            pos: word.pos.clone(),
            ent_type: word.ent_type.clone(),
            is_initial_question_word: word.is_initial_question_word,
            has_initial_question_word_in_phrase: word.has_initial_question_word_in_phrase,
            frequency_factor,
        }
    }

    /// `1 - ln(f - 1) / ln(max)` for the highest frequency `f` among the
    /// pole's words and their ontology variants; 1.0 without data.
    fn frequency_factor(&self, lemma: &str, derived_lemma: &str, frequencies: CorpusFrequencies<'_>) -> f32 {
        let mut words: BTreeSet<String> = [lemma.to_string(), derived_lemma.to_string()].into();
        if let Some(ontology) = self.helper.ontology() {
            for word in [lemma, derived_lemma] {
                for entry in ontology.get_matching_entries(word).iter() {
                    words.extend(entry.reprs.iter().cloned());
                }
            }
        }
        let Some(highest) = words.iter().filter_map(|w| frequencies.words.get(w)).copied().max() else {
            return 1.0;
        };
        let adjusted = highest as f64 - 1.0;
        if adjusted <= 0.0 || frequencies.maximum <= 1 {
            return 1.0;
        }
        (1.0 - adjusted.ln() / (frequencies.maximum as f64).ln()) as f32
    }

    fn insert(
        &self,
        infos: &mut BTreeMap<String, PhraseletInfo>,
        template: &PhraseletTemplate,
        created_without_matching_tags: bool,
        reverse_only_parent_lemma: bool,
        parent: PhraseletPole,
        child: Option<PhraseletPole>,
    ) {
        let label = match &child {
            Some(child) => format!("{}: {}-{}", template.label(), parent.derived_lemma, child.derived_lemma),
            None => format!("{}: {}", template.label(), parent.derived_lemma),
        };
        if let Some(existing) = infos.get_mut(&label) {
            let preferred = self.helper.profile().preferred_phraselet_pos;
            if lemma_replacement_indicated(preferred, &existing.parent, &parent) {
                existing.parent.lemma = parent.lemma;
                existing.parent.hyphen_normalized_lemma = parent.hyphen_normalized_lemma;
                existing.parent.pos = parent.pos;
            }
            if let (Some(existing_child), Some(child)) = (existing.child.as_mut(), child) {
                if lemma_replacement_indicated(preferred, existing_child, &child) {
                    existing_child.lemma = child.lemma;
                    existing_child.hyphen_normalized_lemma = child.hyphen_normalized_lemma;
                    existing_child.pos = child.pos;
                }
            }
            return;
        }
        let frequency_factor = match (&parent.frequency_factor, child.as_ref().map(|c| c.frequency_factor)) {
            (Some(parent), Some(Some(child))) => Some(parent * child),
            (Some(parent), _) => Some(*parent),
            _ => None,
        };
        infos.insert(
            label.clone(),
            PhraseletInfo {
                label,
                template_label: template.label().to_string(),
                parent,
                child,
                created_without_matching_tags,
                reverse_only_parent_lemma,
                frequency_factor,
            },
        );
    }

    // ------------------------------------------------------------------------
    // Search phrases
    // ------------------------------------------------------------------------

    /// Compiles phraselets into search phrases keyed by phraselet label.
    ///
    /// Relation phraselets whose parent frequency factor is below
    /// `reverse_matching_frequency_threshold` are skipped by the first
    /// forward sweep of a match run.
    pub fn search_phrases<'a>(
        &self,
        compiler: &SearchPhraseCompiler,
        infos: impl IntoIterator<Item = &'a PhraseletInfo>,
        reverse_matching_frequency_threshold: Option<f32>,
    ) -> Result<BTreeMap<String, SearchPhrase>, SearchPhraseError> {
        let mut phrases = BTreeMap::new();
        for info in infos {
            let template = self
                .template(&info.template_label)
                .ok_or_else(|| SearchPhraseError::UnknownTemplate(info.template_label.clone()))?;
            let mut doc = template.template_doc.clone();
            info.parent.apply_to(&mut doc.words[template.parent_index()]);
            if let (Some(child), Some(child_index)) = (&info.child, template.child_index()) {
                child.apply_to(&mut doc.words[child_index]);
            }
            let infrequent_parent = reverse_matching_frequency_threshold.is_some_and(|threshold| {
                info.parent.frequency_factor.unwrap_or(1.0) < threshold
            });
            let flags = PhraseletFlags {
                created_without_matching_tags: info.created_without_matching_tags,
                treat_as_reverse_only_during_initial_pass: (infrequent_parent
                    && info.child.is_some()
                    && !template.question())
                    || info.parent.lemma == ENTITY_NOUN,
                reverse_only_parent: info.reverse_only_parent_lemma,
                process_initial_question_words: true,
            };
            let phrase = compiler.compile_phraselet(&info.label, doc, template, flags)?;
            phrases.insert(info.label.clone(), phrase);
        }
        Ok(phrases)
    }
}

fn has_foreign_subwords(word: &Word) -> bool {
    word.subwords.iter().any(|s| s.containing_token_index != word.index)
}

/// Adds each word's own head subwords; words carrying subwords of other
/// words are dropped.
fn add_head_subwords_and_drop_fragments(doc: &SemanticDocument, indexes: &mut Vec<Index>) {
    let words: Vec<Index> = std::mem::take(indexes);
    for index in words {
        let word = &doc.words[index.token_index];
        if !has_foreign_subwords(word) {
            indexes.push(index);
        }
        indexes.extend(
            word.subwords
                .iter()
                .filter(|s| s.is_head() && s.containing_token_index == word.index)
                .map(|s| Index::new(word.index, Some(s.index))),
        );
    }
}

/// Nominal lemmas win over others; otherwise the shorter lemma wins.
fn lemma_replacement_indicated(preferred_pos: &[&str], existing: &PhraseletPole, new: &PhraseletPole) -> bool {
    let existing_preferred = preferred_pos.contains(&existing.pos.as_str());
    let new_preferred = preferred_pos.contains(&new.pos.as_str());
    match (existing_preferred, new_preferred) {
        (false, true) => true,
        (true, false) => false,
        _ => new.lemma.chars().count() < existing.lemma.chars().count(),
    }
}
