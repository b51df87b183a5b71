//! Ontology loading and matching.

use semgraph_ontology::{Ontology, OntologyConfig, OntologyError, OntologyFormat};

const ANIMALS: &str = r#"
@prefix ex: <http://example.org/animals#> .
ex:Animal a owl:Class .
ex:Mammal a owl:Class .
ex:Mammal rdfs:subClassOf ex:Animal .
ex:Dog a owl:Class .
ex:Dog rdfs:subClassOf ex:Mammal .
ex:Hound a owl:Class .
ex:Hound owl:equivalentClass ex:Dog .
ex:Cat a owl:Class .
ex:Cat rdfs:subClassOf ex:Mammal .
ex:Lassie a owl:NamedIndividual .
ex:Lassie rdf:type ex:Dog .
ex:Sports_car a owl:Class .
ex:Vehicle a owl:Class .
ex:Sports_car rdfs:subClassOf ex:Vehicle .
"#;

fn load(symmetric: bool) -> Ontology {
    Ontology::parse_str(
        ANIMALS,
        OntologyFormat::NTriples,
        OntologyConfig::new().with_symmetric_matching(symmetric),
    )
    .unwrap()
}

#[test]
fn hyponym_matches_with_positive_depth() {
    let ontology = load(false);
    let entry = ontology.matches("animal", &["dog"]).unwrap();
    assert_eq!(entry.word, "Dog");
    assert_eq!(entry.depth, 2);
    assert!(!entry.is_individual);
    assert_eq!(ontology.matches("Mammal", &["CAT"]).unwrap().depth, 1);
}

#[test]
fn hypernym_needs_symmetric_matching() {
    assert!(load(false).matches("dog", &["animal"]).is_none());
    let entry = load(true).matches("dog", &["animal"]).unwrap();
    assert_eq!(entry.depth, -2);
}

#[test]
fn synonyms_share_depth_and_subtree() {
    let ontology = load(false);
    assert_eq!(ontology.matches("dog", &["hound"]).unwrap().depth, 0);
    assert_eq!(ontology.matches("hound", &["dog"]).unwrap().depth, 0);
    let lassie = ontology.matches("hound", &["lassie"]).unwrap();
    assert_eq!(lassie.depth, 1);
    assert!(lassie.is_individual);
}

#[test]
fn symmetric_matching_never_descends_into_siblings() {
    let ontology = load(true);
    assert!(ontology.matches("dog", &["cat"]).is_none());
    assert_eq!(ontology.matches("dog", &["mammal"]).unwrap().depth, -1);
    assert_eq!(ontology.matches("lassie", &["dog"]).unwrap().depth, -1);
}

#[test]
fn first_candidate_that_matches_is_returned() {
    let ontology = load(false);
    let entry = ontology.matches("mammal", &["table", "cat", "dog"]).unwrap();
    assert_eq!(entry.word, "Cat");
    assert!(ontology.matches("unknown", &["dog"]).is_none());
    assert!(ontology.get_matching_entries("unknown").is_empty());
}

#[test]
fn most_general_hypernym_ancestor() {
    let ontology = load(false);
    assert_eq!(ontology.get_most_general_hypernym_ancestor("dog"), "Animal");
    assert_eq!(ontology.get_most_general_hypernym_ancestor("Lassie"), "Animal");
    assert_eq!(ontology.get_most_general_hypernym_ancestor("animal"), "animal");
    assert_eq!(ontology.get_most_general_hypernym_ancestor("Table"), "Table");
    // cached path
    assert_eq!(ontology.get_most_general_hypernym_ancestor("Table"), "Table");
}

#[test]
fn words_and_multiwords() {
    let ontology = load(false);
    assert!(ontology.contains_word("Dog"));
    assert!(ontology.contains_word("sports car"));
    assert!(ontology.contains_multiword("Sports Car"));
    assert!(!ontology.contains_multiword("dog"));
    assert!(!ontology.contains_word("table"));
}

#[test]
fn derived_forms_extend_reprs_and_keys() {
    let mut ontology = Ontology::parse_str(
        r#"
<http://x#Decision> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .
<http://x#Choice> <http://www.w3.org/2002/07/owl#equivalentClass> <http://x#Decision> .
"#,
        OntologyFormat::NTriples,
        OntologyConfig::default(),
    )
    .unwrap();
    ontology.update_with_derived_forms(|word| match word {
        "decision" => "decide".to_string(),
        "choice" => "choose".to_string(),
        other => other.to_string(),
    });
    assert_eq!(ontology.matches("decision", &["choose"]).unwrap().word, "Choice");
    assert_eq!(ontology.matches("decide", &["choice"]).unwrap().word, "Choice");
    assert!(ontology.contains_word("choose"));
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("animals.nt");
    std::fs::write(&path, ANIMALS).unwrap();
    let ontology = Ontology::load(&path, OntologyConfig::default()).unwrap();
    assert!(ontology.matches("vehicle", &["sports car"]).is_some());
}

#[test]
fn unknown_extension_is_rejected() {
    let err = Ontology::load("ontology.csv", OntologyConfig::default()).unwrap_err();
    assert!(matches!(err, OntologyError::UnsupportedFormat(ext) if ext == "csv"));
    let err = Ontology::load("missing.nt", OntologyConfig::default()).unwrap_err();
    assert!(matches!(err, OntologyError::Io { .. }));
}

#[cfg(feature = "rdf")]
#[test]
fn turtle_through_sophia() {
    let turtle = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://example.org/v#> .
ex:Vehicle a owl:Class .
ex:Car a owl:Class ; rdfs:subClassOf ex:Vehicle .
"#;
    let ontology =
        Ontology::parse_str(turtle, OntologyFormat::Turtle, OntologyConfig::default()).unwrap();
    assert_eq!(ontology.matches("vehicle", &["car"]).unwrap().depth, 1);
}
