use approx::assert_relative_eq;
use proptest::prelude::*;
use semgraph_graph::{LanguageAdapter, Lexicon};
use semgraph_lang_en::morphology::{derived_lemma, normalize_hyphens};
use semgraph_lang_en::EnglishAdapter;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn derived_lemma_is_total(lemma in "\\PC{0,16}") {
        let lexicon = Lexicon::new().with_words(["sing", "happy"]);
        let derived = derived_lemma(&lexicon, None, &lemma);
        prop_assert!(derived.len() <= lemma.len() + 2);
    }

    #[test]
    fn hyphen_normalization_is_idempotent(word in "[a-z-]{0,12}") {
        let once = normalize_hyphens(&word);
        prop_assert_eq!(normalize_hyphens(&once), once.clone());
    }
}

#[test]
fn entity_embedding_similarity() {
    let adapter = EnglishAdapter::new().with_lexicon(
        Lexicon::new()
            .with_vector("person", vec![1.0, 0.0])
            .with_vector("place", vec![0.0, 1.0]),
    );
    let vector: &[f32] = &[3.0, 4.0];
    let similarity = adapter.token_matches_ent_type(Some(vector), &["PERSON", "GPE"], 0.7);
    assert_relative_eq!(similarity, 0.8, epsilon = 1e-6);
    let none = adapter.token_matches_ent_type(Some(vector), &["PERSON"], 0.9);
    assert_eq!(none, 0.0);
}
