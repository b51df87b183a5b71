use crate::envelope::PayloadKind;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding failed: {0}")]
    Encode(String),

    #[error("decoding failed: {0}")]
    Decode(String),

    /// The data was written by an incompatible version of the format and
    /// has to be regenerated from its source.
    #[error("stored data has format version {found}, expected {expected}; regenerate it")]
    WrongVersion { found: String, expected: String },

    #[error("stored data was produced with model '{found}', expected '{expected}'")]
    WrongModel { found: String, expected: String },

    #[error("stored data holds a {found}, expected a {expected}")]
    WrongKind { found: PayloadKind, expected: PayloadKind },

    #[error("payload checksum does not match")]
    ChecksumMismatch,
}

pub type Result<T> = std::result::Result<T, StorageError>;
