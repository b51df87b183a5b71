//! Typed persistence of Semgraph values.
//!
//! Single values are stored as one envelope. A corpus is stored as an
//! archive: a sequence of `len: u32 | envelope` records, one per labelled
//! document, so that documents can be appended without rewriting the file.

use crate::envelope::{open, seal, Encoding, PayloadKind};
use crate::error::{Result, StorageError};
use semgraph_graph::SemanticDocument;
use semgraph_matching::{CorpusIndex, Matcher, SearchPhrase};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

// ============================================================================
// Single values
// ============================================================================

/// Documents carry the name of the model that normalized them.
pub fn serialize_document(doc: &SemanticDocument, encoding: Encoding) -> Result<Vec<u8>> {
    seal(PayloadKind::Document, &doc.model, doc, encoding)
}

pub fn deserialize_document(bytes: &[u8], model: &str) -> Result<SemanticDocument> {
    open(bytes, PayloadKind::Document, model)
}

pub fn serialize_search_phrase(phrase: &SearchPhrase, encoding: Encoding) -> Result<Vec<u8>> {
    seal(PayloadKind::SearchPhrase, &phrase.doc.model, phrase, encoding)
}

pub fn deserialize_search_phrase(bytes: &[u8], model: &str) -> Result<SearchPhrase> {
    open(bytes, PayloadKind::SearchPhrase, model)
}

pub fn serialize_index(index: &CorpusIndex, model: &str, encoding: Encoding) -> Result<Vec<u8>> {
    seal(PayloadKind::CorpusIndex, model, index, encoding)
}

pub fn deserialize_index(bytes: &[u8], model: &str) -> Result<CorpusIndex> {
    open(bytes, PayloadKind::CorpusIndex, model)
}

// ============================================================================
// Document archives
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledDocument {
    pub label: String,
    pub document: SemanticDocument,
}

/// Appends labelled documents to an archive file.
pub struct ArchiveWriter {
    file: BufWriter<File>,
    encoding: Encoding,
    written: usize,
}

impl ArchiveWriter {
    /// Opens an archive for appending, creating it when missing.
    pub fn open(path: &Path, encoding: Encoding) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: BufWriter::new(file),
            encoding,
            written: 0,
        })
    }

    pub fn append(&mut self, label: &str, document: &SemanticDocument) -> Result<()> {
        let record = LabeledDocument {
            label: label.to_string(),
            document: document.clone(),
        };
        let data = seal(PayloadKind::Document, &document.model, &record, self.encoding)?;
        let len = u32::try_from(data.len())
            .map_err(|_| StorageError::Encode(format!("document '{label}' is too large for an archive record")))?;
        self.file.write_all(&len.to_le_bytes())?;
        self.file.write_all(&data)?;
        self.written += 1;
        Ok(())
    }

    /// Flushes buffered records and returns how many were written.
    pub fn finish(mut self) -> Result<usize> {
        self.file.flush()?;
        self.file.get_ref().sync_data()?;
        Ok(self.written)
    }
}

/// Reads every record of an archive, checking each against `model`.
pub fn read_archive(path: &Path, model: &str) -> Result<Vec<LabeledDocument>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut documents = Vec::new();
    loop {
        let mut len_bytes = [0u8; 4];
        match reader.read_exact(&mut len_bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }
        let len = u32::from_le_bytes(len_bytes) as usize;
        let mut data = vec![0u8; len];
        reader
            .read_exact(&mut data)
            .map_err(|_| StorageError::Decode(format!("archive record {} is truncated", documents.len())))?;
        documents.push(open(&data, PayloadKind::Document, model)?);
    }
    tracing::debug!(path = %path.display(), documents = documents.len(), "read archive");
    Ok(documents)
}

/// Writes every document registered with a matcher to a new archive.
pub fn save_documents(matcher: &Matcher, path: &Path, encoding: Encoding) -> Result<usize> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    let mut writer = ArchiveWriter::open(path, encoding)?;
    for (label, doc) in matcher.documents() {
        writer.append(label, doc)?;
    }
    let written = writer.finish()?;
    tracing::info!(path = %path.display(), documents = written, "saved documents");
    Ok(written)
}

/// Registers every document of an archive with a matcher. Documents must
/// have been normalized by the matcher's adapter.
pub fn load_documents(matcher: &mut Matcher, path: &Path) -> Result<Vec<String>> {
    let model = matcher.helper().adapter().name().to_string();
    let mut labels = Vec::new();
    for record in read_archive(path, &model)? {
        matcher
            .register_normalized_document(&record.label, record.document)
            .map_err(|e| StorageError::Decode(e.to_string()))?;
        labels.push(record.label);
    }
    tracing::info!(path = %path.display(), documents = labels.len(), "loaded documents");
    Ok(labels)
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)?;
    Ok(())
}

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    Ok(std::fs::read(path)?)
}
