//! Error types for graph construction and normalization.

/// Errors raised while building or normalizing a semantic graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("semantic edge from word {0} to itself")]
    SelfLoop(usize),

    #[error("document has {length} characters, more than the maximum of {maximum}")]
    DocumentTooLarge { length: usize, maximum: usize },

    #[error("word {word} has head {head}, outside the document of {len} words")]
    HeadOutOfRange { word: usize, head: usize, len: usize },

    #[error("word {word} does not reach a sentence root through its heads")]
    RootlessWord { word: usize },

    #[error("word indexes must be contiguous from 0: found {found} at position {position}")]
    NonContiguousIndex { position: usize, found: usize },

    #[error("coreference mention refers to word {0}, outside the document")]
    MentionOutOfRange(usize),
}

/// Errors raised when a match implication table breaks its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImplicationError {
    #[error("implication for '{0}' lists the label itself")]
    ContainsSelf(String),

    #[error("implication for '{label}' lists '{duplicate}' more than once")]
    Duplicate { label: String, duplicate: String },

    #[error("implication for '{label}' lists '{overlap}' under both normal and reverse polarity")]
    Overlap { label: String, overlap: String },

    #[error("implication for '{0}' is defined more than once")]
    DuplicateKey(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised when a [`crate::MatchingConfig`] is inconsistent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be between 0 and 1, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    #[error("overall_similarity_threshold is 1; embedding_based_matching_on_root_words must be false")]
    RootEmbeddingsWithoutThreshold,
}
