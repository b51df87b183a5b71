//! Raw parse input.
//!
//! The external linguistic pipeline (tokenizer, tagger, dependency parser,
//! entity recognizer, coreference resolver) is not part of this crate. Its
//! output arrives as a [`RawDocument`]: a flat token list with head pointers,
//! plus document-level coreference chains. The JSON form is what the CLI
//! reads; [`RawDocumentBuilder`] builds the same structure in code.

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_true() -> bool {
    true
}

/// One token as produced by the linguistic pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawToken {
    pub index: usize,
    pub text: String,
    #[serde(default = "default_true")]
    pub space_after: bool,
    /// Pipeline lemma, before any semantic lemma rules are applied.
    pub lemma: String,
    pub pos: String,
    pub tag: String,
    pub dep: String,
    /// Index of the syntactic head; sentence roots point at themselves.
    pub head: usize,
    #[serde(default)]
    pub ent_type: String,
    #[serde(default)]
    pub morph: BTreeMap<String, String>,
    #[serde(default)]
    pub vector: Option<Vec<f32>>,
}

/// One mention within a coreference chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMention {
    /// Syntactic head of a coordinated mention, or its only token.
    pub root_index: usize,
    pub token_indexes: Vec<usize>,
}

/// A coreference chain, mentions in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCorefChain {
    pub mentions: Vec<RawMention>,
    #[serde(default)]
    pub most_specific_mention_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub tokens: Vec<RawToken>,
    #[serde(default)]
    pub coreference_chains: Vec<RawCorefChain>,
}

impl RawDocument {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Reconstructed surface text.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for token in &self.tokens {
            text.push_str(&token.text);
            if token.space_after {
                text.push(' ');
            }
        }
        text.trim_end().to_string()
    }

    pub fn is_root(&self, index: usize) -> bool {
        self.tokens[index].head == index
    }

    /// Syntactic children of one token in index order. Use
    /// [`RawDocument::children_by_token`] for every token.
    pub fn children(&self, index: usize) -> Vec<usize> {
        self.tokens
            .iter()
            .filter(|t| t.head == index && t.index != index)
            .map(|t| t.index)
            .collect()
    }

    /// Syntactic children of every token in one pass, each list in index
    /// order. Heads must be in range (see [`RawDocument::validate`]).
    pub fn children_by_token(&self) -> Vec<Vec<usize>> {
        let mut children = vec![Vec::new(); self.tokens.len()];
        for token in &self.tokens {
            if token.head != token.index {
                children[token.head].push(token.index);
            }
        }
        children
    }

    /// Sentence root of every token. Each head chain is followed only until
    /// it meets a token whose root is already known, so the whole document
    /// is resolved in linear time. Heads must be in range.
    pub fn roots(&self) -> Result<Vec<usize>> {
        let len = self.tokens.len();
        let mut roots: Vec<Option<usize>> = vec![None; len];
        let mut on_path = vec![false; len];
        let mut path = Vec::new();
        for start in 0..len {
            let mut working = start;
            let root = loop {
                if let Some(root) = roots[working] {
                    break root;
                }
                if on_path[working] {
                    return Err(GraphError::RootlessWord { word: start });
                }
                let head = self.tokens[working].head;
                if head == working {
                    roots[working] = Some(working);
                    break working;
                }
                on_path[working] = true;
                path.push(working);
                working = head;
            };
            for index in path.drain(..) {
                on_path[index] = false;
                roots[index] = Some(root);
            }
        }
        Ok(roots.into_iter().flatten().collect())
    }

    /// Checks indexes, head ranges and that every head chain reaches a root.
    pub fn validate(&self) -> Result<()> {
        let len = self.tokens.len();
        for (position, token) in self.tokens.iter().enumerate() {
            if token.index != position {
                return Err(GraphError::NonContiguousIndex {
                    position,
                    found: token.index,
                });
            }
            if token.head >= len {
                return Err(GraphError::HeadOutOfRange {
                    word: position,
                    head: token.head,
                    len,
                });
            }
        }
        self.roots()?;
        for chain in &self.coreference_chains {
            for mention in &chain.mentions {
                for &index in mention.token_indexes.iter().chain([&mention.root_index]) {
                    if index >= len {
                        return Err(GraphError::MentionOutOfRange(index));
                    }
                }
            }
        }
        Ok(())
    }

    /// Follows head pointers to the sentence root of one token, bounded by
    /// the document length. Use [`RawDocument::roots`] for every token.
    pub fn root_of(&self, index: usize) -> Result<usize> {
        let mut working = index;
        for _ in 0..=self.tokens.len() {
            let head = self.tokens[working].head;
            if head == working {
                return Ok(working);
            }
            working = head;
        }
        Err(GraphError::RootlessWord { word: index })
    }

    /// For every token, `(chain, mention)` for the first mention of each
    /// chain that contains it, in chain order. Mention indexes must be in
    /// range (see [`RawDocument::validate`]).
    pub fn mentions_by_token(&self) -> Vec<Vec<(usize, usize)>> {
        let mut lookup = vec![Vec::new(); self.tokens.len()];
        for (chain_index, chain) in self.coreference_chains.iter().enumerate() {
            for (mention_index, mention) in chain.mentions.iter().enumerate() {
                for &token in &mention.token_indexes {
                    let entries: &mut Vec<(usize, usize)> = &mut lookup[token];
                    if entries.last().map(|&(chain, _)| chain) != Some(chain_index) {
                        entries.push((chain_index, mention_index));
                    }
                }
            }
        }
        lookup
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds raw parses in code, mainly for tests and template sentences.
///
/// ```
/// use semgraph_graph::RawDocumentBuilder;
///
/// let doc = RawDocumentBuilder::new()
///     .token("Dogs", "dog", "NOUN", "NNS", "nsubj", 1)
///     .token("bark", "bark", "VERB", "VBP", "ROOT", 1)
///     .build();
/// assert_eq!(doc.text(), "Dogs bark");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RawDocumentBuilder {
    doc: RawDocument,
}

impl RawDocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(
        mut self,
        text: &str,
        lemma: &str,
        pos: &str,
        tag: &str,
        dep: &str,
        head: usize,
    ) -> Self {
        let index = self.doc.tokens.len();
        self.doc.tokens.push(RawToken {
            index,
            text: text.to_string(),
            space_after: true,
            lemma: lemma.to_string(),
            pos: pos.to_string(),
            tag: tag.to_string(),
            dep: dep.to_string(),
            head,
            ent_type: String::new(),
            morph: BTreeMap::new(),
            vector: None,
        });
        self
    }

    /// Sets the entity type of the most recently added token.
    pub fn entity(mut self, ent_type: &str) -> Self {
        if let Some(token) = self.doc.tokens.last_mut() {
            token.ent_type = ent_type.to_string();
        }
        self
    }

    pub fn morph(mut self, key: &str, value: &str) -> Self {
        if let Some(token) = self.doc.tokens.last_mut() {
            token.morph.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn vector(mut self, vector: Vec<f32>) -> Self {
        if let Some(token) = self.doc.tokens.last_mut() {
            token.vector = Some(vector);
        }
        self
    }

    pub fn no_space(mut self) -> Self {
        if let Some(token) = self.doc.tokens.last_mut() {
            token.space_after = false;
        }
        self
    }

    /// Adds a chain whose mentions are given as token index lists; each
    /// mention's root is its first index.
    pub fn coreference_chain(mut self, mentions: &[&[usize]], most_specific: usize) -> Self {
        self.doc.coreference_chains.push(RawCorefChain {
            mentions: mentions
                .iter()
                .map(|indexes| RawMention {
                    root_index: indexes.first().copied().unwrap_or_default(),
                    token_indexes: indexes.to_vec(),
                })
                .collect(),
            most_specific_mention_index: most_specific,
        });
        self
    }

    pub fn build(self) -> RawDocument {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawDocument {
        RawDocumentBuilder::new()
            .token("The", "the", "DET", "DT", "det", 1)
            .token("dog", "dog", "NOUN", "NN", "nsubj", 2)
            .token("barked", "bark", "VERB", "VBD", "ROOT", 2)
            .no_space()
            .token(".", ".", "PUNCT", ".", "punct", 2)
            .build()
    }

    #[test]
    fn test_text_respects_spacing() {
        assert_eq!(sample().text(), "The dog barked.");
    }

    #[test]
    fn test_children_and_root() {
        let doc = sample();
        assert_eq!(doc.children(2), vec![1, 3]);
        assert_eq!(doc.root_of(0).unwrap(), 2);
        assert!(doc.validate().is_ok());
        let children: Vec<Vec<usize>> = vec![vec![], vec![0], vec![1, 3], vec![]];
        assert_eq!(doc.children_by_token(), children);
        assert_eq!(doc.roots().unwrap(), vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_roots_of_long_chain_and_several_sentences() {
        let mut builder = RawDocumentBuilder::new();
        for index in 0..10_000 {
            builder = builder.token("w", "w", "X", "X", "dep", index + 1);
        }
        builder = builder
            .token("end", "end", "VERB", "VB", "ROOT", 10_000)
            .token("Go", "go", "VERB", "VB", "ROOT", 10_001);
        let doc = builder.build();
        let roots = doc.roots().unwrap();
        assert!(roots[..=10_000].iter().all(|&root| root == 10_000));
        assert_eq!(roots[10_001], 10_001);
        assert_eq!(doc.children_by_token()[10_000], vec![9_999]);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let doc = RawDocumentBuilder::new()
            .token("a", "a", "X", "X", "dep", 1)
            .token("b", "b", "X", "X", "dep", 0)
            .build();
        assert_eq!(doc.validate(), Err(GraphError::RootlessWord { word: 0 }));
    }

    #[test]
    fn test_head_out_of_range() {
        let doc = RawDocumentBuilder::new()
            .token("a", "a", "X", "X", "dep", 4)
            .build();
        assert!(matches!(
            doc.validate(),
            Err(GraphError::HeadOutOfRange { head: 4, .. })
        ));
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{"tokens":[{"index":0,"text":"Hi","lemma":"hi","pos":"INTJ","tag":"UH","dep":"ROOT","head":0}]}"#;
        let doc: RawDocument = serde_json::from_str(json).unwrap();
        assert!(doc.tokens[0].space_after);
        assert!(doc.coreference_chains.is_empty());
    }
}
