use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Unsupported ontology format: {0}")]
    UnsupportedFormat(String),
    #[error("RDF feature not enabled. Compile with --features rdf")]
    FeatureNotEnabled,
}

pub type Result<T> = std::result::Result<T, OntologyError>;
