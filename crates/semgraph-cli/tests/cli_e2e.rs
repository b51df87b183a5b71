use semgraph_graph::{RawDocument, RawDocumentBuilder};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn semgraph_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_semgraph"))
}

fn run(args: &[&str]) -> Output {
    let output = Command::new(semgraph_bin())
        .args(args)
        .output()
        .expect("run semgraph");
    assert!(
        output.status.success(),
        "semgraph {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn sentence(subject: &str, object: &str) -> RawDocument {
    RawDocumentBuilder::new()
        .token("The", "the", "DET", "DT", "det", 1)
        .token(subject, subject, "NOUN", "NN", "nsubj", 2)
        .token("chased", "chase", "VERB", "VBD", "ROOT", 2)
        .token("the", "the", "DET", "DT", "det", 4)
        .token(object, object, "NOUN", "NN", "dobj", 2)
        .build()
}

fn write_parses(dir: &Path, name: &str, parses: &[(&str, RawDocument)]) -> PathBuf {
    let map: BTreeMap<_, _> = parses.iter().cloned().collect();
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(&map).unwrap()).unwrap();
    path
}

fn fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let documents = write_parses(
        dir,
        "documents.json",
        &[("a", sentence("dog", "cat")), ("b", sentence("cat", "dog"))],
    );
    let phrases = write_parses(
        dir,
        "phrases.json",
        &[(
            "dog chases",
            RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 1)
                .token("dog", "dog", "NOUN", "NN", "nsubj", 2)
                .token("chases", "chase", "VERB", "VBZ", "ROOT", 2)
                .build(),
        )],
    );
    (documents, phrases)
}

#[test]
fn test_match_writes_dictionaries() {
    let dir = tempfile::tempdir().unwrap();
    let (documents, phrases) = fixtures(dir.path());
    let out = dir.path().join("matches.json");
    run(&[
        "match",
        "--phrases",
        phrases.to_str().unwrap(),
        "--documents",
        documents.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);
    let matches: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let matches = matches.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["document"], "a");
    assert_eq!(matches[0]["search_phrase_label"], "dog chases");
}

#[test]
fn test_index_then_match_from_archive() {
    let dir = tempfile::tempdir().unwrap();
    let (documents, phrases) = fixtures(dir.path());
    let archive = dir.path().join("corpus.sgra");
    let index = dir.path().join("corpus.sgix");
    run(&[
        "index",
        documents.to_str().unwrap(),
        "--out",
        archive.to_str().unwrap(),
        "--index-out",
        index.to_str().unwrap(),
        "--encoding",
        "cbor",
    ]);
    assert!(index.exists());

    let output = run(&[
        "match",
        "--phrases",
        phrases.to_str().unwrap(),
        "--archive",
        archive.to_str().unwrap(),
        "--json",
    ]);
    let matches: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(matches.as_array().unwrap().len(), 1);
}

#[test]
fn test_normalize_and_phraselets() {
    let dir = tempfile::tempdir().unwrap();
    let (documents, _) = fixtures(dir.path());
    let output = run(&["normalize", documents.to_str().unwrap()]);
    let normalized: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(normalized["a"]["words"][2]["lemma"], "chase");

    let output = run(&["phraselets", documents.to_str().unwrap(), "--weighted"]);
    let phraselets: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(phraselets["a"]["predicate-patient: chase-cat"].is_object());
    assert!(phraselets["b"]["predicate-actor: chase-cat"].is_object());
}

#[test]
fn test_ontology_query() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("animals.nt");
    fs::write(
        &path,
        "<http://example.org/animal> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .\n\
         <http://example.org/dog> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .\n\
         <http://example.org/dog> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.org/animal> .\n",
    )
    .unwrap();
    let output = run(&["ontology", path.to_str().unwrap(), "dog", "--ancestor"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "animal");

    let output = run(&["ontology", path.to_str().unwrap(), "animal"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("dog"));
}

#[test]
fn test_missing_documents_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (_, phrases) = fixtures(dir.path());
    let output = Command::new(semgraph_bin())
        .args(["match", "--phrases", phrases.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
