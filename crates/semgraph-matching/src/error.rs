use semgraph_graph::{ConfigError, GraphError};

/// Reasons a pattern cannot become a search phrase. Each names the phrase.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchPhraseError {
    #[error("search phrase '{0}' contains a conjunction")]
    ContainsConjunction(String),

    #[error("search phrase '{0}' contains a negation")]
    ContainsNegation(String),

    #[error("search phrase '{0}' contains more than one clause")]
    ContainsMultipleClauses(String),

    #[error("search phrase '{0}' contains no matchable words")]
    WithoutMatchableWords(String),

    #[error("search phrase '{0}' contains a pronoun that corefers within the phrase")]
    ContainsCoreferringPronoun(String),

    #[error("no phraselet template is labelled '{0}'")]
    UnknownTemplate(String),
}

/// Errors raised by the [`crate::Matcher`] facade.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("a document labelled '{0}' is already registered")]
    DuplicateDocumentLabel(String),

    #[error("no document labelled '{0}' is registered")]
    UnknownDocumentLabel(String),

    #[error("no search phrases are registered")]
    NoSearchPhrases,

    #[error(transparent)]
    SearchPhrase(#[from] SearchPhraseError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, MatchError>;
