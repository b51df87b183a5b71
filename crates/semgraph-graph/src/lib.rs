//! Semgraph: semantic dependency graphs
//!
//! This crate holds the data model shared by every other Semgraph crate and
//! the pipeline that produces it:
//!
//! - `raw`: the parse delivered by an external linguistic pipeline
//! - `model`: words, edges, subwords, mentions, multiword spans
//! - `adapter`: the [`LanguageAdapter`] capability interface
//! - `normalizer`: the fixed pass sequence turning a raw parse into a
//!   semantic graph
//! - `implication`: which document dependency labels satisfy which
//!   search-phrase labels
//! - `template`: phraselet templates
//!
//! Graph nodes live in an arena (`SemanticDocument::words`) and refer to
//! each other by index only.

pub mod adapter;
pub mod config;
pub mod derivation;
pub mod error;
pub mod implication;
pub mod lexicon;
pub mod model;
pub mod normalizer;
pub mod raw;
pub mod template;

pub use adapter::{AdapterProfile, LanguageAdapter, NegationMemo, SubwordCache};
pub use config::MatchingConfig;
pub use derivation::DerivationalDictionary;
pub use error::{ConfigError, GraphError, ImplicationError, Result};
pub use implication::{ImplicationTable, MatchImplication};
pub use lexicon::{cosine_similarity, Lexicon};
pub use model::{
    CorpusWordPosition, Edge, Index, LabeledEdge, Mention, MultiwordSpan, SemanticDocument,
    Sentence, Subword, Word,
};
pub use normalizer::Normalizer;
pub use raw::{RawCorefChain, RawDocument, RawDocumentBuilder, RawMention, RawToken};
pub use template::{PhraseletTemplate, TemplateDefinition};
