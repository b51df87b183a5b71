//! Semgraph matching
//!
//! Finds occurrences of search phrases in normalized documents. A search
//! phrase is itself a small normalized document; a match maps every
//! matchable search phrase word to a document word such that the search
//! phrase's semantic dependencies are all present in the document.
//!
//! ## Module Organization
//!
//! - `strategy`: the ordered word matching strategies (direct, derivation,
//!   entity, question, ontology, embedding, entity embedding)
//! - `index`: the corpus reverse index of word representations
//! - `compiler`: validation and compilation of search phrases
//! - `phraselet`: phraselet extraction and phraselet search phrases
//! - `structural`: recursive structural matching
//! - `dictionaries`: serializable match records
//! - `manager`: the [`Matcher`] facade owning documents and search phrases

pub mod compiler;
pub mod dictionaries;
pub mod error;
pub mod helper;
pub mod index;
pub mod manager;
pub mod phraselet;
pub mod search_phrase;
pub mod strategy;
pub mod structural;
pub mod word_match;

pub use compiler::{PhraseletFlags, SearchPhraseCompiler, PHRASELET_TEXT};
pub use dictionaries::{build_match_dictionaries, MatchDictionary, WordMatchDictionary};
pub use error::{MatchError, Result, SearchPhraseError};
pub use helper::{MatchingHelper, ENTITY_NOUN};
pub use index::{maximum_corpus_frequency, CorpusIndex, CorpusOccurrence};
pub use manager::{Matcher, TopicMatchHit};
pub use phraselet::{
    CorpusFrequencies, ExtractionOptions, PhraseletExtractor, PhraseletInfo, PhraseletPole,
};
pub use search_phrase::SearchPhrase;
pub use strategy::{build_strategies, WordMatchingStrategy};
pub use structural::{Match, MatchOptions, StructuralMatcher};
pub use word_match::{MatchedSubword, WordMatch, WordMatchType};
