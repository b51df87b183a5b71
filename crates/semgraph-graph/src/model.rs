//! Semantic graph model.
//!
//! A [`SemanticDocument`] is an arena of [`Word`]s addressed by their index.
//! Edges refer to words by index only, so the graph can contain cycles
//! (coreference, relative clauses) without any shared ownership.
//!
//! Notes:
//! - A word carries both the syntactic parse it was built from and the
//!   semantic annotations added by the normalizer.
//! - After normalization the document is treated as read-only.

use crate::error::{GraphError, Result};
use crate::raw::RawDocument;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Edges
// ============================================================================

/// A semantic dependency edge.
///
/// A `Redirect` means that matching through `parent` should be resolved
/// through `target` instead; it never carries a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Labeled {
        parent: usize,
        child: usize,
        label: String,
        is_uncertain: bool,
    },
    Redirect {
        parent: usize,
        target: usize,
    },
}

impl Edge {
    pub fn labeled(
        parent: usize,
        child: usize,
        label: impl Into<String>,
        is_uncertain: bool,
    ) -> Result<Self> {
        if parent == child {
            return Err(GraphError::SelfLoop(parent));
        }
        Ok(Self::Labeled {
            parent,
            child,
            label: label.into(),
            is_uncertain,
        })
    }

    pub fn redirect(parent: usize, target: usize) -> Result<Self> {
        if parent == target {
            return Err(GraphError::SelfLoop(parent));
        }
        Ok(Self::Redirect { parent, target })
    }

    pub fn parent(&self) -> usize {
        match self {
            Self::Labeled { parent, .. } | Self::Redirect { parent, .. } => *parent,
        }
    }

    /// Child of a labeled edge; redirects have no child.
    pub fn child(&self) -> Option<usize> {
        match self {
            Self::Labeled { child, .. } => Some(*child),
            Self::Redirect { .. } => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Labeled { label, .. } => Some(label),
            Self::Redirect { .. } => None,
        }
    }

    pub fn is_uncertain(&self) -> bool {
        matches!(
            self,
            Self::Labeled {
                is_uncertain: true,
                ..
            }
        )
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    pub fn redirect_target(&self) -> Option<usize> {
        match self {
            Self::Redirect { target, .. } => Some(*target),
            Self::Labeled { .. } => None,
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Labeled {
                child,
                label,
                is_uncertain,
                ..
            } => {
                write!(f, "{child}:{label}")?;
                if *is_uncertain {
                    write!(f, "(U)")?;
                }
                Ok(())
            }
            Self::Redirect { target, .. } => write!(f, "->{target}"),
        }
    }
}

/// A labeled edge viewed as plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabeledEdge<'a> {
    pub parent: usize,
    pub child: usize,
    pub label: &'a str,
    pub is_uncertain: bool,
}

// ============================================================================
// Positions
// ============================================================================

/// Position of a word, or of a subword within a word.
///
/// Ordering is by word, then subword; a bare word sorts before its subwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Index {
    pub token_index: usize,
    pub subword_index: Option<usize>,
}

impl Index {
    pub fn new(token_index: usize, subword_index: Option<usize>) -> Self {
        Self {
            token_index,
            subword_index,
        }
    }

    pub fn word(token_index: usize) -> Self {
        Self::new(token_index, None)
    }

    pub fn is_subword(&self) -> bool {
        self.subword_index.is_some()
    }
}

impl std::fmt::Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.subword_index {
            Some(subword) => write!(f, "{}:{}", self.token_index, subword),
            None => write!(f, "{}", self.token_index),
        }
    }
}

/// A lexical occurrence within an indexed corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorpusWordPosition {
    pub document_label: String,
    pub index: Index,
}

impl CorpusWordPosition {
    pub fn new(document_label: impl Into<String>, index: Index) -> Self {
        Self {
            document_label: document_label.into(),
            index,
        }
    }
}

// ============================================================================
// Word parts
// ============================================================================

/// A coreference mention as seen from one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub root_index: usize,
    pub indexes: Vec<usize>,
}

/// A semantically atomic fragment of a compound word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subword {
    pub containing_token_index: usize,
    pub index: usize,
    pub text: String,
    pub lemma: String,
    pub derived_lemma: String,
    pub vector: Option<Vec<f32>>,
    pub char_start_index: usize,
    pub dependent_index: Option<usize>,
    pub dependency_label: Option<String>,
    pub governor_index: Option<usize>,
    pub governing_dependency_label: Option<String>,
    pub direct_matching_reprs: Vec<String>,
    pub derivation_matching_reprs: Option<Vec<String>>,
}

impl Subword {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        containing_token_index: usize,
        index: usize,
        text: &str,
        lemma: &str,
        derived_lemma: &str,
        vector: Option<Vec<f32>>,
        char_start_index: usize,
        dependent: Option<(usize, String)>,
        governor: Option<(usize, String)>,
    ) -> Self {
        let mut direct_matching_reprs = vec![lemma.to_string()];
        if text != lemma {
            direct_matching_reprs.push(text.to_string());
        }
        let derivation_matching_reprs =
            (derived_lemma != lemma).then(|| vec![derived_lemma.to_string()]);
        let (dependent_index, dependency_label) = dependent.unzip();
        let (governor_index, governing_dependency_label) = governor.unzip();
        Self {
            containing_token_index,
            index,
            text: text.to_string(),
            lemma: lemma.to_string(),
            derived_lemma: derived_lemma.to_string(),
            vector,
            char_start_index,
            dependent_index,
            dependency_label,
            governor_index,
            governing_dependency_label,
            direct_matching_reprs,
            derivation_matching_reprs,
        }
    }

    /// The head subword is the one with no governor.
    pub fn is_head(&self) -> bool {
        self.governor_index.is_none()
    }
}

/// A contiguous run of matchable words headed by a noun.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiwordSpan {
    pub text: String,
    pub lemma: String,
    pub derived_lemma: String,
    pub token_indexes: Vec<usize>,
    pub direct_matching_reprs: Vec<String>,
    pub derivation_matching_reprs: Option<Vec<String>>,
}

impl MultiwordSpan {
    pub fn new(
        text: &str,
        hyphen_normalized_lemma: &str,
        lemma: &str,
        derived_lemma: &str,
        token_indexes: Vec<usize>,
    ) -> Self {
        let mut direct_matching_reprs = vec![lemma.to_string()];
        if hyphen_normalized_lemma != lemma {
            direct_matching_reprs.push(hyphen_normalized_lemma.to_string());
        }
        if lemma != text.to_lowercase() {
            direct_matching_reprs.push(text.to_lowercase());
        }
        let derivation_matching_reprs =
            (derived_lemma != lemma).then(|| vec![derived_lemma.to_string()]);
        Self {
            text: text.to_string(),
            lemma: lemma.to_string(),
            derived_lemma: derived_lemma.to_string(),
            token_indexes,
            direct_matching_reprs,
            derivation_matching_reprs,
        }
    }
}

// ============================================================================
// Word
// ============================================================================

/// A word node: syntactic parse data plus semantic annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub index: usize,
    pub text: String,
    pub space_after: bool,
    /// Pipeline lemma.
    pub raw_lemma: String,
    /// Semantic lemma produced by the language adapter.
    pub lemma: String,
    pub hyphen_normalized_lemma: String,
    /// Derivationally related base form; equals `lemma` when there is none.
    pub derived_lemma: String,
    pub pos: String,
    pub tag: String,
    pub dep: String,
    pub head: usize,
    pub ent_type: String,
    pub morph: BTreeMap<String, String>,
    pub sentence: usize,
    pub left_edge: usize,
    pub right_edge: usize,
    pub syntactic_children: Vec<usize>,

    pub vector: Option<Vec<f32>>,
    pub direct_matching_reprs: Vec<String>,
    pub derivation_matching_reprs: Option<Vec<String>>,

    pub children: Vec<Edge>,
    pub parents: Vec<Edge>,
    pub righthand_siblings: Vec<usize>,
    pub token_or_lefthand_sibling_index: usize,
    pub is_involved_in_or_conjunction: bool,
    pub is_negated: bool,
    pub is_matchable: bool,
    pub is_initial_question_word: bool,
    pub has_initial_question_word_in_phrase: bool,

    pub mentions: Vec<Mention>,
    pub token_and_coreference_chain_indexes: Vec<usize>,
    pub most_specific_coreferring_term_index: Option<usize>,
    pub coreference_linked_child_dependencies: Vec<(usize, String)>,
    pub coreference_linked_parent_dependencies: Vec<(usize, String)>,

    pub subwords: Vec<Subword>,
    pub multiword_spans: Vec<MultiwordSpan>,
}

impl Word {
    /// A word with parse data only; semantic fields hold neutral values.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parse(
        index: usize,
        text: &str,
        raw_lemma: &str,
        pos: &str,
        tag: &str,
        dep: &str,
        head: usize,
    ) -> Self {
        Self {
            index,
            text: text.to_string(),
            space_after: true,
            raw_lemma: raw_lemma.to_string(),
            lemma: raw_lemma.to_lowercase(),
            hyphen_normalized_lemma: raw_lemma.to_lowercase(),
            derived_lemma: raw_lemma.to_lowercase(),
            pos: pos.to_string(),
            tag: tag.to_string(),
            dep: dep.to_string(),
            head,
            ent_type: String::new(),
            morph: BTreeMap::new(),
            sentence: 0,
            left_edge: index,
            right_edge: index,
            syntactic_children: Vec::new(),
            vector: None,
            direct_matching_reprs: vec![raw_lemma.to_lowercase()],
            derivation_matching_reprs: None,
            children: Vec::new(),
            parents: Vec::new(),
            righthand_siblings: Vec::new(),
            token_or_lefthand_sibling_index: index,
            is_involved_in_or_conjunction: false,
            is_negated: false,
            is_matchable: false,
            is_initial_question_word: false,
            has_initial_question_word_in_phrase: false,
            mentions: Vec::new(),
            token_and_coreference_chain_indexes: vec![index],
            most_specific_coreferring_term_index: None,
            coreference_linked_child_dependencies: Vec::new(),
            coreference_linked_parent_dependencies: Vec::new(),
            subwords: Vec::new(),
            multiword_spans: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.head == self.index
    }

    /// Set when the word is part of an "or" conjunction.
    pub fn is_uncertain(&self) -> bool {
        self.is_involved_in_or_conjunction
    }

    pub fn is_involved_in_coreference(&self) -> bool {
        !self.mentions.is_empty()
    }

    pub fn lowercase_text(&self) -> String {
        self.text.to_lowercase()
    }

    /// Labeled outgoing edges.
    pub fn labeled_children(&self) -> impl Iterator<Item = LabeledEdge<'_>> {
        self.children.iter().filter_map(|edge| match edge {
            Edge::Labeled {
                parent,
                child,
                label,
                is_uncertain,
            } => Some(LabeledEdge {
                parent: *parent,
                child: *child,
                label,
                is_uncertain: *is_uncertain,
            }),
            Edge::Redirect { .. } => None,
        })
    }

    /// Labeled incoming edges.
    pub fn labeled_parents(&self) -> impl Iterator<Item = LabeledEdge<'_>> {
        self.parents.iter().filter_map(|edge| match edge {
            Edge::Labeled {
                parent,
                child,
                label,
                is_uncertain,
            } => Some(LabeledEdge {
                parent: *parent,
                child: *child,
                label,
                is_uncertain: *is_uncertain,
            }),
            Edge::Redirect { .. } => None,
        })
    }

    /// Target of the word's redirect, if its first edge is one.
    pub fn redirect_target(&self) -> Option<usize> {
        self.children.first().and_then(Edge::redirect_target)
    }

    pub fn has_dependency_with_child_index(&self, index: usize) -> bool {
        self.children.iter().any(|edge| edge.child() == Some(index))
    }

    pub fn label_of_dependency_with_child_index(&self, index: usize) -> Option<&str> {
        self.children
            .iter()
            .find(|edge| edge.child() == Some(index))
            .and_then(Edge::label)
    }

    pub fn has_dependency_with_label(&self, label: &str) -> bool {
        self.children.iter().any(|edge| edge.label() == Some(label))
    }

    pub fn has_dependency_with_child_index_and_label(&self, index: usize, label: &str) -> bool {
        self.children
            .iter()
            .any(|edge| edge.child() == Some(index) && edge.label() == Some(label))
    }

    pub fn remove_dependency_with_child_index(&mut self, index: usize) {
        self.children.retain(|edge| edge.child() != Some(index));
    }

    /// Marks every labeled outgoing edge uncertain.
    pub fn mark_children_uncertain(&mut self) {
        for edge in &mut self.children {
            if let Edge::Labeled { is_uncertain, .. } = edge {
                *is_uncertain = true;
            }
        }
    }

    pub fn head_subword(&self) -> Option<&Subword> {
        self.subwords.iter().find(|s| s.is_head())
    }

    /// Compact debug line: index, text, lemma, flags, edges.
    pub fn describe(&self) -> String {
        let lemma = if self.derived_lemma != self.lemma {
            format!("{}({})", self.lemma, self.derived_lemma)
        } else {
            self.lemma.clone()
        };
        let mut children: Vec<&Edge> = self.children.iter().collect();
        children.sort_by_key(|edge| edge.child().or(edge.redirect_target()));
        let children = children
            .iter()
            .map(|edge| edge.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        format!(
            "{}: {} {} {} {} {} [{}]",
            self.index,
            self.text,
            lemma,
            self.pos,
            if self.is_negated { "negative" } else { "positive" },
            if self.is_matchable { "matchable" } else { "unmatchable" },
            children
        )
    }
}

// ============================================================================
// Document
// ============================================================================

/// A contiguous sentence span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub root: usize,
    pub start: usize,
    pub end: usize,
}

impl Sentence {
    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }
}

/// A normalized (or being normalized) semantic graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticDocument {
    pub words: Vec<Word>,
    pub sentences: Vec<Sentence>,
    /// Name of the language adapter that produced the graph.
    pub model: String,
}

impl SemanticDocument {
    /// Builds the parse layer from a validated raw document: words, syntactic
    /// children, subtree edges and sentences.
    pub fn from_raw(raw: &RawDocument) -> Result<Self> {
        raw.validate()?;
        let mut words: Vec<Word> = raw
            .tokens
            .iter()
            .map(|token| {
                let mut word = Word::from_parse(
                    token.index,
                    &token.text,
                    &token.lemma,
                    &token.pos,
                    &token.tag,
                    &token.dep,
                    token.head,
                );
                word.space_after = token.space_after;
                word.ent_type = token.ent_type.clone();
                word.morph = token.morph.clone();
                word.vector = token.vector.clone();
                word
            })
            .collect();
        for (word, children) in words.iter_mut().zip(raw.children_by_token()) {
            word.syntactic_children = children;
        }

        let roots = raw.roots()?;
        let mut sentences = Vec::new();
        let mut root_to_sentence = BTreeMap::new();
        for (index, &root) in roots.iter().enumerate() {
            let next = root_to_sentence.len();
            let sentence = *root_to_sentence.entry(root).or_insert(next);
            if sentence == sentences.len() {
                sentences.push(Sentence {
                    root,
                    start: index,
                    end: index,
                });
            }
            let span = &mut sentences[sentence];
            span.start = span.start.min(index);
            span.end = span.end.max(index);
            words[index].sentence = sentence;
        }

        let mut doc = Self {
            words,
            sentences,
            model: String::new(),
        };
        for sentence in doc.sentences.clone() {
            doc.compute_edges(sentence.root);
        }
        Ok(doc)
    }

    fn compute_edges(&mut self, root: usize) {
        // Post-order over the syntactic tree without recursion.
        let mut stack = vec![(root, false)];
        while let Some((index, expanded)) = stack.pop() {
            if expanded {
                let (mut left, mut right) = (index, index);
                for &child in &self.words[index].syntactic_children {
                    left = left.min(self.words[child].left_edge);
                    right = right.max(self.words[child].right_edge);
                }
                self.words[index].left_edge = left;
                self.words[index].right_edge = right;
            } else {
                stack.push((index, true));
                for &child in &self.words[index].syntactic_children {
                    stack.push((child, false));
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, index: usize) -> &Word {
        &self.words[index]
    }

    pub fn text(&self) -> String {
        self.span_text(0, self.words.len().saturating_sub(1))
    }

    /// Surface text of the words `start..=end`.
    pub fn span_text(&self, start: usize, end: usize) -> String {
        let mut text = String::new();
        if start > end || end >= self.words.len() {
            return text;
        }
        for word in &self.words[start..=end] {
            text.push_str(&word.text);
            if word.space_after {
                text.push(' ');
            }
        }
        text.trim_end().to_string()
    }

    pub fn sentence_of(&self, index: usize) -> &Sentence {
        &self.sentences[self.words[index].sentence]
    }

    pub fn sentence_text(&self, sentence: usize) -> String {
        let span = self.sentences[sentence];
        self.span_text(span.start, span.end)
    }

    pub fn same_sentence(&self, first: usize, second: usize) -> bool {
        self.words[first].sentence == self.words[second].sentence
    }

    /// Indexes of a word's syntactic subtree in document order.
    pub fn syntactic_subtree(&self, index: usize) -> Vec<usize> {
        let mut result = Vec::new();
        let mut stack = vec![index];
        while let Some(working) = stack.pop() {
            result.push(working);
            stack.extend(self.words[working].syntactic_children.iter().copied());
        }
        result.sort_unstable();
        result
    }

    /// The word and its righthand siblings, left to right.
    pub fn token_and_righthand_siblings(&self, index: usize) -> Vec<usize> {
        let mut indexes = vec![index];
        indexes.extend(self.words[index].righthand_siblings.iter().copied());
        indexes.sort_unstable();
        indexes
    }

    /// All members of the word's sibling group, left to right.
    pub fn sibling_indexes(&self, index: usize) -> Vec<usize> {
        self.token_and_righthand_siblings(self.words[index].token_or_lefthand_sibling_index)
    }

    /// Adds a labeled edge; self-loops are skipped.
    pub fn add_edge(&mut self, parent: usize, child: usize, label: &str, is_uncertain: bool) -> bool {
        match Edge::labeled(parent, child, label, is_uncertain) {
            Ok(edge) => {
                self.words[parent].children.push(edge);
                true
            }
            Err(err) => {
                tracing::trace!(%err, label, "skipped semantic edge");
                false
            }
        }
    }

    /// Replaces all of a word's outgoing edges with a redirect.
    pub fn set_redirect(&mut self, parent: usize, target: usize) -> bool {
        match Edge::redirect(parent, target) {
            Ok(edge) => {
                self.words[parent].children = vec![edge];
                true
            }
            Err(err) => {
                tracing::trace!(%err, "skipped grammatical redirect");
                false
            }
        }
    }

    /// Moves semantic children and sibling information from one word to
    /// another and turns the source into a redirect onto the destination.
    pub fn move_information_between_tokens(&mut self, from: usize, to: usize) {
        if !self.words[from].has_dependency_with_child_index(to) {
            return;
        }
        let moved: Vec<(usize, String, bool)> = self.words[from]
            .labeled_children()
            .filter(|edge| {
                !self.words[to].has_dependency_with_child_index(edge.child)
                    && edge.child != to
                    && !self.words[edge.child].righthand_siblings.contains(&to)
                    && !self.words[to].righthand_siblings.contains(&edge.child)
            })
            .map(|edge| (edge.child, edge.label.to_string(), edge.is_uncertain))
            .collect();
        for (child, label, is_uncertain) in moved {
            self.add_edge(to, child, &label, is_uncertain);
        }
        self.set_redirect(from, to);
        let siblings = std::mem::take(&mut self.words[from].righthand_siblings);
        self.words[to].righthand_siblings.extend(siblings);
        if self.words[from].is_involved_in_or_conjunction {
            self.words[to].is_involved_in_or_conjunction = true;
        }
        if self.words[from].is_negated {
            self.words[to].is_negated = true;
        }
        let sentence = *self.sentence_of(from);
        for index in sentence.start..=sentence.end {
            let siblings = &mut self.words[index].righthand_siblings;
            if let Some(position) = siblings.iter().position(|&s| s == from) {
                siblings.remove(position);
                if index != to {
                    siblings.push(to);
                }
            }
        }
    }

    /// One line per word, for debugging.
    pub fn describe(&self) -> String {
        self.words
            .iter()
            .map(Word::describe)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
