//! Matching configuration.
//!
//! Shared by the normalizer (document size ceiling) and the matching crate
//! (thresholds and feature switches). Loaded from JSON by the CLI.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Runtime switches and thresholds for normalization and matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Similarity threshold for embedding-based matching; 1.0 switches it off.
    pub overall_similarity_threshold: f32,
    /// Threshold used when the search word is an initial question word.
    pub initial_question_word_overall_similarity_threshold: f32,
    pub embedding_based_matching_on_root_words: bool,
    pub analyze_derivational_morphology: bool,
    pub perform_coreference_resolution: bool,
    pub use_reverse_dependency_matching: bool,
    pub process_initial_question_words: bool,
    /// `Some(true)` restricts matching to single-word search phrases,
    /// `Some(false)` to multi-word ones.
    pub match_depending_on_single_words: Option<bool>,
    pub compare_embeddings_on_non_root_words: bool,
    /// Maximum document length in characters.
    pub maximum_document_size: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            overall_similarity_threshold: 1.0,
            initial_question_word_overall_similarity_threshold: 1.0,
            embedding_based_matching_on_root_words: false,
            analyze_derivational_morphology: true,
            perform_coreference_resolution: true,
            use_reverse_dependency_matching: true,
            process_initial_question_words: false,
            match_depending_on_single_words: None,
            compare_embeddings_on_non_root_words: true,
            maximum_document_size: 1_000_000,
        }
    }
}

impl MatchingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overall_similarity_threshold(mut self, threshold: f32) -> Self {
        self.overall_similarity_threshold = threshold;
        self
    }

    pub fn with_initial_question_word_threshold(mut self, threshold: f32) -> Self {
        self.initial_question_word_overall_similarity_threshold = threshold;
        self
    }

    pub fn with_embedding_matching_on_root_words(mut self, on: bool) -> Self {
        self.embedding_based_matching_on_root_words = on;
        self
    }

    pub fn with_derivational_morphology(mut self, on: bool) -> Self {
        self.analyze_derivational_morphology = on;
        self
    }

    pub fn with_coreference_resolution(mut self, on: bool) -> Self {
        self.perform_coreference_resolution = on;
        self
    }

    pub fn with_reverse_dependency_matching(mut self, on: bool) -> Self {
        self.use_reverse_dependency_matching = on;
        self
    }

    pub fn with_initial_question_words(mut self, on: bool) -> Self {
        self.process_initial_question_words = on;
        self
    }

    pub fn with_single_word_filter(mut self, filter: Option<bool>) -> Self {
        self.match_depending_on_single_words = filter;
        self
    }

    pub fn with_maximum_document_size(mut self, size: usize) -> Self {
        self.maximum_document_size = size;
        self
    }

    /// Embedding comparisons happen at all only below a threshold of 1.
    pub fn embeddings_enabled(&self) -> bool {
        self.overall_similarity_threshold < 1.0
            || self.initial_question_word_overall_similarity_threshold < 1.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            (
                "overall_similarity_threshold",
                self.overall_similarity_threshold,
            ),
            (
                "initial_question_word_overall_similarity_threshold",
                self.initial_question_word_overall_similarity_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.overall_similarity_threshold == 1.0 && self.embedding_based_matching_on_root_words
        {
            return Err(ConfigError::RootEmbeddingsWithoutThreshold);
        }
        Ok(())
    }
}
