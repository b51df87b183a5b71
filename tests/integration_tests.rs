//! Integration tests for the complete Semgraph pipeline
//!
//! These tests run across crates:
//! - raw parse → normalizer (English adapter) → structural matching
//! - ontology resource → ontology strategy → match dictionaries
//! - matcher → storage archive → restored matcher
//!
//! Run with: cargo test --test integration_tests

use semgraph_graph::{DerivationalDictionary, MatchingConfig, RawDocument, RawDocumentBuilder};
use semgraph_lang_en::EnglishAdapter;
use semgraph_matching::{MatchError, Matcher, SearchPhraseError, WordMatchType};
use semgraph_ontology::{Ontology, OntologyConfig, OntologyFormat};
use std::sync::Arc;
use tempfile::tempdir;

fn english_matcher() -> Matcher {
    Matcher::new(Arc::new(EnglishAdapter::new()), MatchingConfig::default()).unwrap()
}

fn passive_chase() -> RawDocument {
    RawDocumentBuilder::new()
        .token("The", "the", "DET", "DT", "det", 1)
        .token("cat", "cat", "NOUN", "NN", "nsubjpass", 3)
        .token("was", "be", "AUX", "VBD", "auxpass", 3)
        .token("chased", "chase", "VERB", "VBN", "ROOT", 3)
        .token("by", "by", "ADP", "IN", "agent", 3)
        .token("the", "the", "DET", "DT", "det", 6)
        .token("dog", "dog", "NOUN", "NN", "pobj", 4)
        .build()
}

fn a_dog_chases_something() -> RawDocument {
    RawDocumentBuilder::new()
        .token("A", "a", "DET", "DT", "det", 1)
        .token("dog", "dog", "NOUN", "NN", "nsubj", 2)
        .token("chases", "chase", "VERB", "VBZ", "ROOT", 2)
        .token("something", "something", "PRON", "NN", "dobj", 2)
        .build()
}

// ============================================================================
// Normalization → structural matching
// ============================================================================

#[test]
fn test_active_phrase_matches_passive_document() {
    let mut matcher = english_matcher();
    matcher.register_document("passive", &passive_chase()).unwrap();

    let doc = matcher.document("passive").unwrap();
    let edge_to_dog = doc.word(3).labeled_children().find(|e| e.child == 6).unwrap();
    assert_eq!(edge_to_dog.label.to_string(), "pobjb");

    matcher
        .register_search_phrase("dog chases something", &a_dog_chases_something())
        .unwrap();
    let matches = matcher.match_all().unwrap();
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert!(!m.is_uncertain);
    assert!(!m.is_negated);
    let dog = m.word_matches.iter().find(|w| w.document_index == 6).unwrap();
    assert_eq!(dog.word_match_type, WordMatchType::Direct);
    assert_eq!(dog.search_phrase_word, "dog");
}

#[test]
fn test_negated_search_phrase_is_rejected() {
    let mut matcher = english_matcher();
    let result = matcher.register_search_phrase(
        "did not arrive",
        &RawDocumentBuilder::new()
            .token("The", "the", "DET", "DT", "det", 1)
            .token("train", "train", "NOUN", "NN", "nsubj", 4)
            .token("did", "do", "AUX", "VBD", "aux", 4)
            .token("not", "not", "PART", "RB", "neg", 4)
            .token("arrive", "arrive", "VERB", "VB", "ROOT", 4)
            .build(),
    );
    assert!(matches!(
        result,
        Err(MatchError::SearchPhrase(SearchPhraseError::ContainsNegation(_)))
    ));
    assert!(matcher.search_phrases().is_empty());
}

#[test]
fn test_derivation_preferred_over_direct() {
    let adapter = EnglishAdapter::new().with_derivational_dictionary(DerivationalDictionary::parse(
        "nationalize, nationalization, nationalisation",
    ));
    let mut matcher = Matcher::new(Arc::new(adapter), MatchingConfig::default()).unwrap();
    matcher
        .register_document(
            "d",
            &RawDocumentBuilder::new()
                .token("They", "they", "PRON", "PRP", "nsubj", 1)
                .token("nationalize", "nationalize", "VERB", "VBP", "ROOT", 1)
                .token("banks", "bank", "NOUN", "NNS", "dobj", 1)
                .build(),
        )
        .unwrap();
    matcher
        .register_search_phrase(
            "nationalization",
            &RawDocumentBuilder::new()
                .token("The", "the", "DET", "DT", "det", 1)
                .token("nationalization", "nationalization", "NOUN", "NN", "ROOT", 1)
                .build(),
        )
        .unwrap();
    let matches = matcher.match_all().unwrap();
    assert_eq!(matches.len(), 1);
    let word_match = &matches[0].word_matches[0];
    assert_eq!(word_match.word_match_type, WordMatchType::Derivation);
    assert_eq!(word_match.document_word, "nationalize");
}

// ============================================================================
// Ontology
// ============================================================================

const VEHICLES: &str = r#"
@prefix ex: <http://example.org/vehicles#> .
ex:Vehicle a owl:Class .
ex:Car a owl:Class .
ex:Car rdfs:subClassOf ex:Vehicle .
"#;

#[test]
fn test_vehicle_phrase_matches_car_through_ontology() {
    let ontology = Ontology::parse_str(VEHICLES, OntologyFormat::NTriples, OntologyConfig::default()).unwrap();
    let mut matcher =
        Matcher::with_ontology(Arc::new(EnglishAdapter::new()), MatchingConfig::default(), ontology).unwrap();
    matcher
        .register_document(
            "d",
            &RawDocumentBuilder::new()
                .token("The", "the", "DET", "DT", "det", 1)
                .token("car", "car", "NOUN", "NN", "nsubj", 2)
                .token("moved", "move", "VERB", "VBD", "ROOT", 2)
                .build(),
        )
        .unwrap();
    matcher
        .register_search_phrase(
            "vehicle moves",
            &RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 1)
                .token("vehicle", "vehicle", "NOUN", "NN", "nsubj", 2)
                .token("moves", "move", "VERB", "VBZ", "ROOT", 2)
                .build(),
        )
        .unwrap();

    let dictionaries = matcher.match_returning_dictionaries().unwrap();
    assert_eq!(dictionaries.len(), 1);
    let car = dictionaries[0]
        .word_matches
        .iter()
        .find(|w| w.document_token_index == 1)
        .unwrap();
    assert_eq!(car.match_type, WordMatchType::Ontology);
    assert_eq!(car.depth, 1);
    assert_eq!(car.explanation, "Is a child of VEHICLE in the ontology.");
}

// ============================================================================
// Storage
// ============================================================================

#[test]
fn test_archived_corpus_matches_like_the_original() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corpus.sgra");

    let mut original = english_matcher();
    original.register_document("passive", &passive_chase()).unwrap();
    semgraph_storage::save_documents(&original, &path, semgraph_storage::Encoding::Cbor).unwrap();

    let mut restored = english_matcher();
    let labels = semgraph_storage::load_documents(&mut restored, &path).unwrap();
    assert_eq!(labels, vec!["passive".to_string()]);

    for matcher in [&mut original, &mut restored] {
        matcher
            .register_search_phrase("dog chases something", &a_dog_chases_something())
            .unwrap();
    }
    assert_eq!(original.match_all().unwrap(), restored.match_all().unwrap());
}
