//! Phraselet templates.
//!
//! A template names a relation shape ("predicate-actor", "word", ...) and
//! carries a parse of an example sentence. Extracted phraselets are turned
//! into search phrases by copying that parse and substituting the lemmas of
//! its parent and child words.

use crate::model::SemanticDocument;
use crate::raw::RawDocument;
use serde::{Deserialize, Serialize};

/// Template as declared by a language adapter, with the raw parse of its
/// example sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    pub label: String,
    pub template_sentence: String,
    pub raw: RawDocument,
    pub parent_index: usize,
    pub child_index: Option<usize>,
    pub dependency_labels: Vec<String>,
    pub parent_tags: Vec<String>,
    pub child_tags: Vec<String>,
    pub reverse_only: bool,
    pub question: bool,
    /// Label the matched edge is given in the generated search phrase.
    pub assigned_dependency_label: Option<String>,
}

impl TemplateDefinition {
    pub fn new(label: &str, template_sentence: &str, raw: RawDocument, parent_index: usize) -> Self {
        Self {
            label: label.to_string(),
            template_sentence: template_sentence.to_string(),
            raw,
            parent_index,
            child_index: None,
            dependency_labels: Vec::new(),
            parent_tags: Vec::new(),
            child_tags: Vec::new(),
            reverse_only: false,
            question: false,
            assigned_dependency_label: None,
        }
    }

    pub fn with_child(mut self, child_index: usize) -> Self {
        self.child_index = Some(child_index);
        self
    }

    pub fn with_dependency_labels(mut self, labels: &[&str]) -> Self {
        self.dependency_labels = labels.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_parent_tags(mut self, tags: &[&str]) -> Self {
        self.parent_tags = tags.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_child_tags(mut self, tags: &[&str]) -> Self {
        self.child_tags = tags.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn reverse_only(mut self) -> Self {
        self.reverse_only = true;
        self
    }

    pub fn question(mut self) -> Self {
        self.question = true;
        self
    }

    pub fn with_assigned_dependency_label(mut self, label: &str) -> Self {
        self.assigned_dependency_label = Some(label.to_string());
        self
    }
}

/// A template whose example sentence has been normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseletTemplate {
    pub definition: TemplateDefinition,
    pub template_doc: SemanticDocument,
}

impl PhraseletTemplate {
    pub fn label(&self) -> &str {
        &self.definition.label
    }

    pub fn parent_index(&self) -> usize {
        self.definition.parent_index
    }

    pub fn child_index(&self) -> Option<usize> {
        self.definition.child_index
    }

    pub fn is_single_word(&self) -> bool {
        self.definition.child_index.is_none()
    }

    pub fn reverse_only(&self) -> bool {
        self.definition.reverse_only
    }

    pub fn question(&self) -> bool {
        self.definition.question
    }

    pub fn accepts_dependency(&self, label: &str) -> bool {
        self.definition.dependency_labels.iter().any(|l| l == label)
    }

    pub fn accepts_parent_tag(&self, tag: &str) -> bool {
        self.definition.parent_tags.iter().any(|t| t == tag)
    }

    pub fn accepts_child_tag(&self, tag: &str) -> bool {
        self.definition.child_tags.iter().any(|t| t == tag)
    }
}
