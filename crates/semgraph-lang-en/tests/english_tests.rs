use semgraph_graph::{
    LanguageAdapter, Normalizer, RawDocument, RawDocumentBuilder, SemanticDocument, Word,
};
use semgraph_lang_en::EnglishAdapter;
use std::sync::Arc;

fn normalizer() -> Normalizer {
    Normalizer::new(Arc::new(EnglishAdapter::new()))
}

fn normalize(raw: &RawDocument) -> SemanticDocument {
    normalizer().normalize(raw).unwrap()
}

fn edge(doc: &SemanticDocument, parent: usize, child: usize) -> Option<(String, bool)> {
    doc.word(parent)
        .labeled_children()
        .find(|e| e.child == child)
        .map(|e| (e.label.to_string(), e.is_uncertain))
}

fn search_word(lemma: &str, tag: &str) -> Word {
    Word::from_parse(0, lemma, lemma, "PRON", tag, "nsubj", 0)
}

#[test]
fn passive_agent_becomes_pobjb() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("The", "the", "DET", "DT", "det", 1)
            .token("cat", "cat", "NOUN", "NN", "nsubjpass", 3)
            .token("was", "be", "AUX", "VBD", "auxpass", 3)
            .token("chased", "chase", "VERB", "VBN", "ROOT", 3)
            .token("by", "by", "ADP", "IN", "agent", 3)
            .token("the", "the", "DET", "DT", "det", 6)
            .token("dog", "dog", "NOUN", "NN", "pobj", 4)
            .build(),
    );
    assert_eq!(edge(&doc, 3, 1), Some(("nsubjpass".into(), false)));
    assert_eq!(edge(&doc, 3, 6), Some(("pobjb".into(), false)));
    assert!(!doc.word(4).is_matchable);
    assert!(!doc.word(2).is_matchable);
    assert!(doc.word(3).is_matchable);
}

#[test]
fn auxpass_relabels_subject() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("Cats", "cat", "NOUN", "NNS", "nsubj", 2)
            .token("are", "be", "AUX", "VBP", "auxpass", 2)
            .token("fed", "feed", "VERB", "VBN", "ROOT", 2)
            .build(),
    );
    assert_eq!(edge(&doc, 2, 0), Some(("nsubjpass".into(), false)));
}

#[test]
fn negation_reaches_dependents() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("The", "the", "DET", "DT", "det", 1)
            .token("dog", "dog", "NOUN", "NN", "nsubj", 4)
            .token("did", "do", "AUX", "VBD", "aux", 4)
            .token("not", "not", "PART", "RB", "neg", 4)
            .token("bark", "bark", "VERB", "VB", "ROOT", 4)
            .build(),
    );
    assert!(doc.word(4).is_negated);
    assert!(doc.word(1).is_negated);
    // "did" is not a modal, so the subject stays certain
    assert_eq!(edge(&doc, 4, 1), Some(("nsubj".into(), false)));
}

#[test]
fn no_longer_negates() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("He", "he", "PRON", "PRP", "nsubj", 1)
            .token("works", "work", "VERB", "VBZ", "ROOT", 1)
            .token("no", "no", "DET", "DT", "det", 3)
            .token("longer", "longer", "ADV", "RBR", "advmod", 1)
            .build(),
    );
    assert!(doc.word(1).is_negated);
}

#[test]
fn modal_makes_arguments_uncertain() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("Dogs", "dog", "NOUN", "NNS", "nsubj", 2)
            .token("might", "might", "AUX", "MD", "aux", 2)
            .token("bark", "bark", "VERB", "VB", "ROOT", 2)
            .build(),
    );
    assert_eq!(edge(&doc, 2, 0), Some(("nsubj".into(), true)));
    assert_eq!(edge(&doc, 2, 1), Some(("aux".into(), false)));
}

#[test]
fn relative_pronoun_redirects_to_antecedent() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("the", "the", "DET", "DT", "det", 1)
            .token("dog", "dog", "NOUN", "NN", "ROOT", 1)
            .token("that", "that", "PRON", "WDT", "nsubj", 3)
            .token("chased", "chase", "VERB", "VBD", "relcl", 1)
            .token("the", "the", "DET", "DT", "det", 5)
            .token("cat", "cat", "NOUN", "NN", "dobj", 3)
            .build(),
    );
    assert_eq!(edge(&doc, 3, 1), Some(("nsubj".into(), false)));
    assert_eq!(edge(&doc, 3, 2), None);
    assert_eq!(doc.word(2).redirect_target(), Some(1));
    assert_eq!(edge(&doc, 3, 5), Some(("dobj".into(), false)));
}

#[test]
fn relative_clause_without_pronoun_uses_relant() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("the", "the", "DET", "DT", "det", 1)
            .token("man", "man", "NOUN", "NN", "ROOT", 1)
            .token("I", "I", "PRON", "PRP", "nsubj", 3)
            .token("saw", "see", "VERB", "VBD", "relcl", 1)
            .build(),
    );
    assert_eq!(edge(&doc, 3, 1), Some(("relant".into(), false)));
    assert_eq!(edge(&doc, 3, 2), Some(("nsubj".into(), false)));
}

#[test]
fn whose_links_possessed_noun_to_antecedent() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("the", "the", "DET", "DT", "det", 1)
            .token("man", "man", "NOUN", "NN", "ROOT", 1)
            .token("whose", "whose", "PRON", "WP$", "poss", 3)
            .token("dog", "dog", "NOUN", "NN", "nsubj", 4)
            .token("barked", "bark", "VERB", "VBD", "relcl", 1)
            .build(),
    );
    assert_eq!(edge(&doc, 3, 1), Some(("poss".into(), false)));
    assert_eq!(edge(&doc, 3, 2), None);
    assert_eq!(doc.word(2).redirect_target(), Some(1));
}

#[test]
fn control_verb_shares_subject() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("He", "he", "PRON", "PRP", "nsubj", 1)
            .token("decided", "decide", "VERB", "VBD", "ROOT", 1)
            .token("to", "to", "PART", "TO", "aux", 3)
            .token("leave", "leave", "VERB", "VB", "xcomp", 1)
            .build(),
    );
    assert_eq!(edge(&doc, 3, 0), Some(("nsubj".into(), true)));
}

#[test]
fn was_going_to_is_uncertain() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("She", "she", "PRON", "PRP", "nsubj", 2)
            .token("was", "be", "AUX", "VBD", "aux", 2)
            .token("going", "go", "VERB", "VBG", "ROOT", 2)
            .token("to", "to", "PART", "TO", "aux", 4)
            .token("leave", "leave", "VERB", "VB", "xcomp", 2)
            .build(),
    );
    assert_eq!(doc.word(2).redirect_target(), Some(4));
    assert_eq!(edge(&doc, 4, 0), Some(("nsubj".into(), true)));
}

#[test]
fn phrasal_verb_absorbs_particle() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("He", "he", "PRON", "PRP", "nsubj", 1)
            .token("got", "get", "VERB", "VBD", "ROOT", 1)
            .token("up", "up", "ADP", "RP", "prt", 1)
            .build(),
    );
    assert_eq!(doc.word(1).lemma, "get up");
    assert!(!doc.word(2).is_matchable);
    assert_eq!(edge(&doc, 1, 2), None);
}

#[test]
fn participle_modifier_gets_subject() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("a", "a", "DET", "DT", "det", 1)
            .token("dog", "dog", "NOUN", "NN", "ROOT", 1)
            .token("chasing", "chase", "VERB", "VBG", "acl", 1)
            .token("cats", "cat", "NOUN", "NNS", "dobj", 2)
            .build(),
    );
    assert_eq!(edge(&doc, 2, 1), Some(("nsubj".into(), false)));
}

#[test]
fn derived_lemmas_are_set_during_normalization() {
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("The", "the", "DET", "DT", "det", 1)
            .token("nationalization", "nationalization", "NOUN", "NN", "ROOT", 1)
            .build(),
    );
    assert_eq!(doc.word(1).derived_lemma, "nationalize");
    assert_eq!(
        doc.word(1).derivation_matching_reprs,
        Some(vec!["nationalize".to_string()])
    );
}

#[test]
fn question_words_match_expected_answers() {
    let adapter = EnglishAdapter::new();
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("Peter", "Peter", "PROPN", "NNP", "nsubj", 1)
            .entity("PERSON")
            .token("left", "leave", "VERB", "VBD", "ROOT", 1)
            .token("in", "in", "ADP", "IN", "prep", 1)
            .token("June", "June", "PROPN", "NNP", "pobj", 2)
            .entity("DATE")
            .token("because", "because", "SCONJ", "IN", "prep", 1)
            .build(),
    );
    let matches = |lemma: &str, tag: &str, index: usize| {
        adapter.question_word_matches(&search_word(lemma, tag), &doc, index, None, None, 0.5)
    };
    assert!(matches("who", "WP", 0));
    assert!(!matches("who", "WP", 3));
    assert!(matches("what", "WP", 3));
    assert!(!matches("where", "WRB", 2));
    assert!(!matches("when", "WRB", 2));
    assert!(matches("when", "WRB", 3));
    assert!(matches("why", "WRB", 4));
    assert!(!matches("how", "WRB", 2));
}

#[test]
fn gendered_coreferent_answers_who() {
    let adapter = EnglishAdapter::new();
    let doc = normalize(
        &RawDocumentBuilder::new()
            .token("The", "the", "DET", "DT", "det", 1)
            .token("doctor", "doctor", "NOUN", "NN", "nsubj", 2)
            .token("said", "say", "VERB", "VBD", "ROOT", 2)
            .token("she", "she", "PRON", "PRP", "nsubj", 4)
            .morph("Gender", "Fem")
            .token("would", "would", "AUX", "MD", "aux", 5)
            .token("come", "come", "VERB", "VB", "ccomp", 2)
            .coreference_chain(&[&[1], &[3]], 0)
            .build(),
    );
    let who = search_word("who", "WP");
    assert!(adapter.question_word_matches(&who, &doc, 1, None, None, 0.5));
}

#[test]
fn every_template_normalizes_to_its_relation() {
    let templates = normalizer().phraselet_templates().unwrap();
    assert_eq!(templates.len(), 19);
    for template in &templates {
        let Some(child) = template.child_index() else {
            assert_eq!(template.label(), "word");
            continue;
        };
        let parent = template.template_doc.word(template.parent_index());
        let label = parent
            .label_of_dependency_with_child_index(child)
            .unwrap_or_default();
        assert!(
            template.accepts_dependency(label),
            "{}: {label}",
            template.label()
        );
    }
}
