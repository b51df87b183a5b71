//! Matching scenarios through the `Matcher` facade.

use approx::assert_relative_eq;
use semgraph_graph::{DerivationalDictionary, Lexicon, MatchingConfig, RawDocument, RawDocumentBuilder};
use semgraph_lang_en::EnglishAdapter;
use semgraph_matching::{Match, Matcher, WordMatchType};
use semgraph_ontology::{Ontology, OntologyConfig, OntologyFormat};
use std::sync::Arc;

fn matcher(config: MatchingConfig) -> Matcher {
    Matcher::new(Arc::new(EnglishAdapter::new()), config).unwrap()
}

fn clause(subject: &str, verb: (&str, &str), object: &str) -> RawDocument {
    RawDocumentBuilder::new()
        .token("The", "the", "DET", "DT", "det", 1)
        .token(subject, subject, "NOUN", "NN", "nsubj", 2)
        .token(verb.0, verb.1, "VERB", "VBD", "ROOT", 2)
        .token("the", "the", "DET", "DT", "det", 4)
        .token(object, object, "NOUN", "NN", "dobj", 2)
        .build()
}

fn phrase(subject: &str, verb: (&str, &str)) -> RawDocument {
    RawDocumentBuilder::new()
        .token("A", "a", "DET", "DT", "det", 1)
        .token(subject, subject, "NOUN", "NN", "nsubj", 2)
        .token(verb.0, verb.1, "VERB", "VBZ", "ROOT", 2)
        .build()
}

fn a_decision() -> RawDocument {
    RawDocumentBuilder::new()
        .token("A", "a", "DET", "DT", "det", 1)
        .token("decision", "decision", "NOUN", "NN", "ROOT", 1)
        .build()
}

fn they_decided() -> RawDocument {
    RawDocumentBuilder::new()
        .token("They", "they", "PRON", "PRP", "nsubj", 1)
        .token("decided", "decide", "VERB", "VBD", "ROOT", 1)
        .build()
}

fn word_match_types(m: &Match) -> Vec<WordMatchType> {
    m.word_matches.iter().map(|w| w.word_match_type).collect()
}

#[test]
fn direct_match_respects_direction() {
    let mut matcher = matcher(MatchingConfig::default());
    matcher.register_document("forward", &clause("dog", ("chased", "chase"), "cat")).unwrap();
    matcher.register_document("backward", &clause("cat", ("chased", "chase"), "dog")).unwrap();
    matcher.register_search_phrase("dog chases", &phrase("dog", ("chases", "chase"))).unwrap();

    let matches = matcher.match_all().unwrap();
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!(m.document_label, "forward");
    assert_eq!(m.index_within_document, 2);
    assert_eq!(word_match_types(m), vec![WordMatchType::Direct, WordMatchType::Direct]);
    assert!(!m.is_negated);
    assert!(!m.is_uncertain);
    assert!(!m.involves_coreference());
    assert_relative_eq!(m.overall_similarity_measure, 1.0);
}

#[test]
fn negated_document_yields_negated_match() {
    let mut matcher = matcher(MatchingConfig::default());
    matcher
        .register_document(
            "negated",
            &RawDocumentBuilder::new()
                .token("The", "the", "DET", "DT", "det", 1)
                .token("dog", "dog", "NOUN", "NN", "nsubj", 4)
                .token("did", "do", "AUX", "VBD", "aux", 4)
                .token("not", "not", "PART", "RB", "neg", 4)
                .token("chase", "chase", "VERB", "VB", "ROOT", 4)
                .build(),
        )
        .unwrap();
    matcher.register_search_phrase("dog chases", &phrase("dog", ("chases", "chase"))).unwrap();
    let matches = matcher.match_all().unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].is_negated);
    let dictionaries = matcher.build_match_dictionaries(&matches);
    assert!(dictionaries[0].negated);
}

#[test]
fn derivation_links_noun_and_verb() {
    let dictionary = DerivationalDictionary::parse("decide, decision");
    let mut matcher = Matcher::new(
        Arc::new(EnglishAdapter::new().with_derivational_dictionary(dictionary.clone())),
        MatchingConfig::default(),
    )
    .unwrap();
    matcher.register_document("d", &they_decided()).unwrap();
    matcher.register_search_phrase("a decision", &a_decision()).unwrap();
    let matches = matcher.match_all().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(word_match_types(&matches[0]), vec![WordMatchType::Derivation]);

    let mut without = Matcher::new(
        Arc::new(EnglishAdapter::new().with_derivational_dictionary(dictionary)),
        MatchingConfig::default().with_derivational_morphology(false),
    )
    .unwrap();
    without.register_document("d", &they_decided()).unwrap();
    without.register_search_phrase("a decision", &a_decision()).unwrap();
    assert!(without.match_all().unwrap().is_empty());
}

const VEHICLES: &str = r#"
<http://example.org/vehicle> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .
<http://example.org/car> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .
<http://example.org/car> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.org/vehicle> .
"#;

#[test]
fn ontology_hyponym_matches_with_depth() {
    let ontology = Ontology::parse_str(VEHICLES, OntologyFormat::NTriples, OntologyConfig::default()).unwrap();
    let mut matcher =
        Matcher::with_ontology(Arc::new(EnglishAdapter::new()), MatchingConfig::default(), ontology).unwrap();
    matcher.register_document("d", &clause("car", ("hit", "hit"), "wall")).unwrap();
    matcher.register_search_phrase("vehicle hits", &phrase("vehicle", ("hits", "hit"))).unwrap();

    let matches = matcher.match_all().unwrap();
    assert_eq!(matches.len(), 1);
    let subject = matches[0]
        .word_matches
        .iter()
        .find(|w| w.document_index == 1)
        .unwrap();
    assert_eq!(subject.word_match_type, WordMatchType::Ontology);
    assert_eq!(subject.depth, 1);

    let dictionaries = matcher.build_match_dictionaries(&matches);
    let explanation = &dictionaries[0]
        .word_matches
        .iter()
        .find(|w| w.document_token_index == 1)
        .unwrap()
        .explanation;
    assert_eq!(explanation, "Is a child of VEHICLE in the ontology.");
}

#[test]
fn coreference_reaches_antecedent() {
    let raw = RawDocumentBuilder::new()
        .token("The", "the", "DET", "DT", "det", 1)
        .token("dog", "dog", "NOUN", "NN", "nsubj", 2)
        .token("barked", "bark", "VERB", "VBD", "ROOT", 2)
        .no_space()
        .token(".", ".", "PUNCT", ".", "punct", 2)
        .token("It", "it", "PRON", "PRP", "nsubj", 5)
        .token("chased", "chase", "VERB", "VBD", "ROOT", 5)
        .token("the", "the", "DET", "DT", "det", 7)
        .token("cat", "cat", "NOUN", "NN", "dobj", 5)
        .coreference_chain(&[&[1], &[4]], 0)
        .build();

    let mut matcher = matcher(MatchingConfig::default());
    matcher.register_document("d", &raw).unwrap();
    matcher.register_search_phrase("dog chases", &phrase("dog", ("chases", "chase"))).unwrap();
    let matches = matcher.match_all().unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].involves_coreference());
    let dog = matches[0]
        .word_matches
        .iter()
        .find(|w| w.document_index == 1)
        .unwrap();
    assert_eq!(dog.structurally_matched_document_index, 4);

    let mut without = self::matcher(MatchingConfig::default().with_coreference_resolution(false));
    without.register_document("d", &raw).unwrap();
    without.register_search_phrase("dog chases", &phrase("dog", ("chases", "chase"))).unwrap();
    assert!(without.match_all().unwrap().is_empty());
}

#[test]
fn embeddings_match_similar_words() {
    let lexicon = Lexicon::new()
        .with_vector("dog", vec![1.0, 0.2, 0.0])
        .with_vector("hound", vec![0.9, 0.3, 0.0])
        .with_vector("cat", vec![0.0, 0.1, 1.0]);
    let config = MatchingConfig::default().with_overall_similarity_threshold(0.9);
    let mut matcher = Matcher::new(Arc::new(EnglishAdapter::new().with_lexicon(lexicon)), config).unwrap();
    matcher.register_document("hound", &clause("hound", ("chased", "chase"), "ball")).unwrap();
    matcher.register_document("cat", &clause("cat", ("chased", "chase"), "ball")).unwrap();
    matcher.register_search_phrase("dog chases", &phrase("dog", ("chases", "chase"))).unwrap();

    let matches = matcher.match_all().unwrap();
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!(m.document_label, "hound");
    assert!(word_match_types(m).contains(&WordMatchType::Embedding));
    assert!(m.overall_similarity_measure < 1.0);
    assert!(m.overall_similarity_measure > 0.9);
}

#[test]
fn entity_placeholder_matches_named_entity() {
    let mut matcher = matcher(MatchingConfig::default());
    matcher
        .register_document(
            "d",
            &RawDocumentBuilder::new()
                .token("Richard", "Richard", "PROPN", "NNP", "compound", 1)
                .entity("PERSON")
                .token("Hudson", "Hudson", "PROPN", "NNP", "nsubj", 2)
                .entity("PERSON")
                .token("sings", "sing", "VERB", "VBZ", "ROOT", 2)
                .build(),
        )
        .unwrap();
    matcher
        .register_search_phrase(
            "person sings",
            &RawDocumentBuilder::new()
                .token("An", "an", "DET", "DT", "det", 1)
                .token("ENTITYPERSON", "ENTITYPERSON", "PROPN", "NNP", "nsubj", 2)
                .token("sings", "sing", "VERB", "VBZ", "ROOT", 2)
                .build(),
        )
        .unwrap();
    let matches = matcher.match_all().unwrap();
    assert_eq!(matches.len(), 1);
    assert!(word_match_types(&matches[0]).contains(&WordMatchType::Entity));
}

#[test]
fn question_phraselet_finds_answer() {
    let config = MatchingConfig::default().with_initial_question_words(true);
    let mut matcher = matcher(config);
    matcher
        .register_document(
            "d",
            &RawDocumentBuilder::new()
                .token("Peter", "Peter", "PROPN", "NNP", "nsubj", 1)
                .entity("PERSON")
                .token("chased", "chase", "VERB", "VBD", "ROOT", 1)
                .token("the", "the", "DET", "DT", "det", 3)
                .token("cat", "cat", "NOUN", "NN", "dobj", 1)
                .build(),
        )
        .unwrap();
    let question = matcher
        .normalizer()
        .normalize(
            &RawDocumentBuilder::new()
                .token("Who", "who", "PRON", "WP", "nsubj", 1)
                .token("chased", "chase", "VERB", "VBD", "ROOT", 1)
                .token("the", "the", "DET", "DT", "det", 3)
                .token("cat", "cat", "NOUN", "NN", "dobj", 1)
                .no_space()
                .token("?", "?", "PUNCT", ".", "punct", 1)
                .build(),
        )
        .unwrap();
    assert!(question.word(0).is_initial_question_word);

    let infos = matcher.phraselet_infos(&question, false);
    assert!(infos.contains_key("head-WHsubj: chase-who"));
    let phrases: Vec<_> = matcher
        .phraselet_search_phrases(infos.values(), None)
        .unwrap()
        .into_values()
        .collect();
    let matches = matcher.match_search_phrases(&phrases, &Default::default());
    let answer = matches
        .iter()
        .find(|m| m.search_phrase_label == "head-WHsubj: chase-who")
        .unwrap();
    assert!(answer
        .word_matches
        .iter()
        .any(|w| w.word_match_type == WordMatchType::Question && w.document_index == 0));
}

#[test]
fn document_label_filter_restricts_matching() {
    let mut matcher = matcher(MatchingConfig::default());
    matcher.register_document("news/1", &clause("dog", ("chased", "chase"), "cat")).unwrap();
    matcher.register_document("blog/1", &clause("dog", ("chased", "chase"), "cat")).unwrap();
    matcher.register_search_phrase("dog chases", &phrase("dog", ("chases", "chase"))).unwrap();
    assert_eq!(matcher.match_all().unwrap().len(), 2);

    let options = semgraph_matching::MatchOptions::new().with_document_label_filter("news/");
    let matches = matcher.match_with_options(&options).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].document_label, "news/1");
}
