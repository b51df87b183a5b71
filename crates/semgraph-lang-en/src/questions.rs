//! Which document words can answer an English question word.

use semgraph_graph::{LanguageAdapter, SemanticDocument, Word};

const PERSON_ENTITY_LABELS: &[&str] = &["PERSON", "NORP", "ORG", "GPE"];

const TEMPORAL_ENTITY_LABELS: &[&str] = &["DATE", "TIME"];

const LOCATIVE_PREPOSITIONS: &[&str] = &[
    "above", "across", "against", "along", "among", "amongst", "around", "at", "behind", "below",
    "beneath", "beside", "between", "beyond", "by", "close", "down", "in", "into", "near", "next",
    "off", "on", "onto", "opposite", "out", "outside", "round", "through", "under", "underneath",
    "up",
];

const TEMPORAL_PREPOSITIONS: &[&str] = &["after", "before", "by", "for", "since", "till", "until"];

const INSTRUMENTAL_PREPOSITIONS: &[&str] = &["by", "with"];

fn has_gender(word: &Word) -> bool {
    word.morph
        .get("Gender")
        .and_then(|gender| gender.split(',').next())
        .is_some_and(|gender| matches!(gender, "Masc" | "Fem"))
}

pub(crate) fn question_word_matches<A: LanguageAdapter + ?Sized>(
    adapter: &A,
    search_word: &Word,
    doc: &SemanticDocument,
    document_index: usize,
    document_vector: Option<&[f32]>,
    threshold: f32,
) -> bool {
    let word = doc.word(document_index);
    let is_preposition = word.tag == "IN";
    match search_word.lemma.as_str() {
        lemma if lemma.starts_with("who") => {
            PERSON_ENTITY_LABELS.contains(&word.ent_type.as_str())
                || adapter.token_matches_ent_type(document_vector, PERSON_ENTITY_LABELS, threshold)
                    > 0.0
                || word
                    .token_and_coreference_chain_indexes
                    .iter()
                    .any(|&index| has_gender(doc.word(index)))
        }
        "what" => true,
        "where" => {
            !TEMPORAL_ENTITY_LABELS.contains(&word.ent_type.as_str())
                && !word
                    .labeled_children()
                    .any(|edge| TEMPORAL_ENTITY_LABELS.contains(&doc.word(edge.child).ent_type.as_str()))
                && is_preposition
                && LOCATIVE_PREPOSITIONS.contains(&word.lemma.as_str())
        }
        "when" if is_preposition => TEMPORAL_PREPOSITIONS.contains(&word.lemma.as_str()),
        "when" => TEMPORAL_ENTITY_LABELS.contains(&word.ent_type.as_str()),
        "how" => is_preposition && INSTRUMENTAL_PREPOSITIONS.contains(&word.lemma.as_str()),
        "why" => answers_why(doc, word),
        _ => false,
    }
}

fn answers_why(doc: &SemanticDocument, word: &Word) -> bool {
    if word.tag == "IN" {
        // "in order to"
        if word.lemma == "in" {
            return word
                .labeled_children()
                .any(|edge| doc.word(edge.child).lemma == "order");
        }
        return word.lemma == "because";
    }
    let text = word.lowercase_text();
    if matches!(word.dep.as_str(), "advcl" | "prep") && text == "owing" {
        return true;
    }
    if word.dep == "npadvmod" && text == "thanks" {
        return true;
    }
    // Syntactic children, so that subject-predicate phrases are handled.
    matches!(word.dep.as_str(), "advmod" | "advcl" | "acomp")
        && word.syntactic_children.iter().any(|&child| {
            let child = doc.word(child);
            child.lemma == "because" || child.tag == "TO"
        })
}
