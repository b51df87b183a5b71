//! Self-describing binary envelopes.
//!
//! Layout (integers little-endian):
//!
//! ```text
//! "SGRF" | encoding: u8 | header_len: u32 | header (bincode) | payload_len: u64 | payload
//! ```
//!
//! The header names the format version, the model that produced the
//! payload, the payload kind and the SHA-256 digest of the payload bytes.

use crate::error::{Result, StorageError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Version written into every envelope. Data with any other version is
/// rejected.
pub const FORMAT_VERSION: &str = "4.0";

const MAGIC: &[u8; 4] = b"SGRF";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    Bincode,
    Cbor,
}

impl Encoding {
    fn tag(self) -> u8 {
        match self {
            Self::Bincode => 0,
            Self::Cbor => 1,
        }
    }

    fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Self::Bincode),
            1 => Ok(Self::Cbor),
            other => Err(StorageError::Decode(format!("unknown encoding tag {other}"))),
        }
    }
}

impl std::str::FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bincode" => Ok(Self::Bincode),
            "cbor" => Ok(Self::Cbor),
            other => Err(format!("unknown encoding '{other}' (expected bincode or cbor)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadKind {
    Document,
    SearchPhrase,
    CorpusIndex,
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Document => "document",
            Self::SearchPhrase => "search phrase",
            Self::CorpusIndex => "corpus index",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub version: String,
    pub model: String,
    pub kind: PayloadKind,
    pub checksum: [u8; 32],
}

fn checksum(payload: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hasher.finalize().into()
}

fn encode_payload<T: Serialize>(value: &T, encoding: Encoding) -> Result<Vec<u8>> {
    match encoding {
        Encoding::Bincode => bincode::serialize(value).map_err(|e| StorageError::Encode(e.to_string())),
        Encoding::Cbor => {
            let mut bytes = Vec::new();
            ciborium::ser::into_writer(value, &mut bytes).map_err(|e| StorageError::Encode(e.to_string()))?;
            Ok(bytes)
        }
    }
}

fn decode_payload<T: DeserializeOwned>(bytes: &[u8], encoding: Encoding) -> Result<T> {
    match encoding {
        Encoding::Bincode => bincode::deserialize(bytes).map_err(|e| StorageError::Decode(e.to_string())),
        Encoding::Cbor => ciborium::de::from_reader(bytes).map_err(|e| StorageError::Decode(e.to_string())),
    }
}

/// Wraps a value in an envelope.
pub fn seal<T: Serialize>(kind: PayloadKind, model: &str, value: &T, encoding: Encoding) -> Result<Vec<u8>> {
    let payload = encode_payload(value, encoding)?;
    let header = Header {
        version: FORMAT_VERSION.to_string(),
        model: model.to_string(),
        kind,
        checksum: checksum(&payload),
    };
    let header_bytes = bincode::serialize(&header).map_err(|e| StorageError::Encode(e.to_string()))?;

    let mut result = Vec::with_capacity(MAGIC.len() + 1 + 4 + header_bytes.len() + 8 + payload.len());
    result.extend_from_slice(MAGIC);
    result.push(encoding.tag());
    result.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
    result.extend_from_slice(&header_bytes);
    result.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    result.extend_from_slice(&payload);
    tracing::trace!(%kind, model, bytes = result.len(), "sealed envelope");
    Ok(result)
}

struct Parts<'a> {
    encoding: Encoding,
    header: Header,
    payload: &'a [u8],
}

fn take<'a>(bytes: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8]> {
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| StorageError::Decode("envelope is truncated".to_string()))?;
    let slice = &bytes[*offset..end];
    *offset = end;
    Ok(slice)
}

fn split(bytes: &[u8]) -> Result<Parts<'_>> {
    let mut offset = 0;
    if take(bytes, &mut offset, MAGIC.len())? != MAGIC {
        return Err(StorageError::Decode("not a semgraph envelope".to_string()));
    }
    let encoding = Encoding::from_tag(take(bytes, &mut offset, 1)?[0])?;
    let mut header_len = [0u8; 4];
    header_len.copy_from_slice(take(bytes, &mut offset, 4)?);
    let header_bytes = take(bytes, &mut offset, u32::from_le_bytes(header_len) as usize)?;
    let header: Header = bincode::deserialize(header_bytes).map_err(|e| StorageError::Decode(e.to_string()))?;
    let mut payload_len = [0u8; 8];
    payload_len.copy_from_slice(take(bytes, &mut offset, 8)?);
    let payload_len = usize::try_from(u64::from_le_bytes(payload_len))
        .map_err(|_| StorageError::Decode("payload length overflows".to_string()))?;
    let payload = take(bytes, &mut offset, payload_len)?;
    Ok(Parts {
        encoding,
        header,
        payload,
    })
}

/// Reads the header without checking or decoding the payload.
pub fn peek_header(bytes: &[u8]) -> Result<Header> {
    Ok(split(bytes)?.header)
}

/// Unwraps a value, checking version, kind, model and checksum in that
/// order.
pub fn open<T: DeserializeOwned>(bytes: &[u8], kind: PayloadKind, model: &str) -> Result<T> {
    let parts = split(bytes)?;
    let header = &parts.header;
    if header.version != FORMAT_VERSION {
        return Err(StorageError::WrongVersion {
            found: header.version.clone(),
            expected: FORMAT_VERSION.to_string(),
        });
    }
    if header.kind != kind {
        return Err(StorageError::WrongKind {
            found: header.kind,
            expected: kind,
        });
    }
    if header.model != model {
        return Err(StorageError::WrongModel {
            found: header.model.clone(),
            expected: model.to_string(),
        });
    }
    if checksum(parts.payload) != header.checksum {
        return Err(StorageError::ChecksumMismatch);
    }
    decode_payload(parts.payload, parts.encoding)
}
