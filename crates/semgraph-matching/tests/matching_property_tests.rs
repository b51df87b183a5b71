use proptest::prelude::*;
use semgraph_graph::{MatchingConfig, RawDocument, RawDocumentBuilder};
use semgraph_lang_en::EnglishAdapter;
use semgraph_matching::Matcher;
use std::sync::Arc;

const NOUNS: &[&str] = &["dog", "cat", "horse", "mouse"];

fn clause(subject: &str, object: &str) -> RawDocument {
    RawDocumentBuilder::new()
        .token("The", "the", "DET", "DT", "det", 1)
        .token(subject, subject, "NOUN", "NN", "nsubj", 2)
        .token("chased", "chase", "VERB", "VBD", "ROOT", 2)
        .token("the", "the", "DET", "DT", "det", 4)
        .token(object, object, "NOUN", "NN", "dobj", 2)
        .build()
}

fn dog_chases() -> RawDocument {
    RawDocumentBuilder::new()
        .token("A", "a", "DET", "DT", "det", 1)
        .token("dog", "dog", "NOUN", "NN", "nsubj", 2)
        .token("chases", "chase", "VERB", "VBZ", "ROOT", 2)
        .build()
}

fn corpus() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..NOUNS.len(), 0..NOUNS.len()), 1..8)
}

fn matched_labels(documents: &[(String, RawDocument)]) -> Vec<String> {
    let mut matcher = Matcher::new(Arc::new(EnglishAdapter::new()), MatchingConfig::default()).unwrap();
    matcher.register_documents(documents).unwrap();
    matcher.register_search_phrase("dog chases", &dog_chases()).unwrap();
    let mut labels: Vec<String> = matcher
        .match_all()
        .unwrap()
        .into_iter()
        .map(|m| m.document_label)
        .collect();
    labels.sort();
    labels
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 48, failure_persistence: None, ..ProptestConfig::default() })]

    #[test]
    fn prop_matches_follow_subjects(pairs in corpus()) {
        let documents: Vec<(String, RawDocument)> = pairs
            .iter()
            .enumerate()
            .map(|(i, &(s, o))| (format!("doc{i:02}"), clause(NOUNS[s], NOUNS[o])))
            .collect();
        let expected: Vec<String> = pairs
            .iter()
            .enumerate()
            .filter(|(_, &(s, _))| NOUNS[s] == "dog")
            .map(|(i, _)| format!("doc{i:02}"))
            .collect();
        prop_assert_eq!(matched_labels(&documents), expected);
    }

    #[test]
    fn prop_registration_order_is_irrelevant(pairs in corpus(), seed in any::<u64>()) {
        let documents: Vec<(String, RawDocument)> = pairs
            .iter()
            .enumerate()
            .map(|(i, &(s, o))| (format!("doc{i:02}"), clause(NOUNS[s], NOUNS[o])))
            .collect();
        let mut rotated = documents.clone();
        let shift = (seed as usize) % rotated.len();
        rotated.rotate_left(shift);
        rotated.reverse();
        prop_assert_eq!(matched_labels(&documents), matched_labels(&rotated));
    }
}
