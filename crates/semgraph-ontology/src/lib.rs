//! Semgraph ontologies
//!
//! Loads small, hand-built concept hierarchies (OWL classes, individuals,
//! `subClassOf` and `equivalentClass` relations) and answers the question
//! the matcher asks: does a document word specialize, equal or instantiate
//! a search word, and at how many hyponym hops?
//!
//! Resources:
//! - N-Triples, with the prefixed-name conveniences of hand-written files
//!   (always available, see `loader`)
//! - Turtle and RDF/XML (feature `rdf`, via sophia)

pub mod config;
pub mod error;
pub mod graph;
pub mod loader;
pub mod ontology;
#[cfg(feature = "rdf")]
pub mod rdf;

pub use config::OntologyConfig;
pub use error::{OntologyError, Result};
pub use graph::{NodeId, OntologyGraph, Triple};
pub use ontology::{parse_resource, Entry, Ontology, OntologyFormat};
