//! Semgraph storage
//!
//! Persists normalized documents, compiled search phrases and corpus
//! indexes so that the linguistic pipeline does not have to run again.
//!
//! Every stored value is wrapped in an envelope naming the format version
//! and the model that produced it; data from another version or model is
//! rejected rather than silently reinterpreted. Payloads are bincode by
//! default, CBOR on request.

pub mod archive;
pub mod envelope;
pub mod error;

pub use archive::{
    deserialize_document, deserialize_index, deserialize_search_phrase, load_documents, read_archive,
    read_file, save_documents, serialize_document, serialize_index, serialize_search_phrase, write_file,
    ArchiveWriter, LabeledDocument,
};
pub use envelope::{open, peek_header, seal, Encoding, Header, PayloadKind, FORMAT_VERSION};
pub use error::{Result, StorageError};
