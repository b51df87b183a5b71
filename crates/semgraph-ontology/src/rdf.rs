//! Turtle, N-Triples and RDF/XML loading through sophia.

use crate::error::{OntologyError, Result};
use crate::graph::Triple;
use sophia::api::prelude::*;
use sophia::api::triple::Triple as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    RdfXml,
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct OntologySinkError {
    message: String,
}

fn iri_of(display: &str) -> Option<String> {
    display
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .map(str::to_string)
}

fn push_triple(
    out: &mut Vec<Triple>,
    subject: String,
    predicate: String,
    object: String,
) -> std::result::Result<(), OntologySinkError> {
    // Blank nodes and literals carry no hierarchy information.
    if let (Some(s), Some(p), Some(o)) = (iri_of(&subject), iri_of(&predicate), iri_of(&object)) {
        out.push(Triple::new(s, p, o));
    }
    Ok(())
}

fn parse_error(message: String) -> OntologyError {
    OntologyError::Parse { line: 0, message }
}

pub fn parse_rdf_bytes(bytes: &[u8], format: RdfFormat) -> Result<Vec<Triple>> {
    let cursor = std::io::Cursor::new(bytes);
    let reader = std::io::BufReader::new(cursor);
    let mut out: Vec<Triple> = Vec::new();

    match format {
        RdfFormat::NTriples => {
            let mut parser = sophia::turtle::parser::nt::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| {
                    push_triple(&mut out, t.s().to_string(), t.p().to_string(), t.o().to_string())
                })
                .map_err(|e| parse_error(format!("failed to parse N-Triples: {e}")))?;
        }
        RdfFormat::Turtle => {
            let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| {
                    push_triple(&mut out, t.s().to_string(), t.p().to_string(), t.o().to_string())
                })
                .map_err(|e| parse_error(format!("failed to parse Turtle: {e}")))?;
        }
        RdfFormat::RdfXml => {
            let mut parser = sophia::xml::parser::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| {
                    push_triple(&mut out, t.s().to_string(), t.p().to_string(), t.o().to_string())
                })
                .map_err(|e| parse_error(format!("failed to parse RDF/XML: {e}")))?;
        }
    }
    tracing::debug!(triples = out.len(), ?format, "parsed RDF resource");
    Ok(out)
}
