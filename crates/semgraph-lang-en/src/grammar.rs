//! Grammar corrections applied to English semantic graphs.
//!
//! Each function rewrites the edges around one word and is called once per
//! word by the normalizer, in document order.

use crate::profile::{INTERROGATIVE_TAGS, NEGATION_LEMMAS, NON_MODAL_AUXILIARY_LEMMAS};
use semgraph_graph::{Edge, SemanticDocument};

fn children_with_label(doc: &SemanticDocument, index: usize, label: &str) -> Vec<usize> {
    doc.word(index)
        .labeled_children()
        .filter(|edge| edge.label == label)
        .map(|edge| edge.child)
        .collect()
}

fn relabel_children(doc: &mut SemanticDocument, index: usize, from: &str, to: &str) {
    for edge in &mut doc.words[index].children {
        if let Edge::Labeled { label, .. } = edge {
            if label == from {
                *label = to.to_string();
            }
        }
    }
}

fn is_interrogative(doc: &SemanticDocument, index: usize) -> bool {
    INTERROGATIVE_TAGS.contains(&doc.word(index).tag.as_str())
}

fn is_noun_like(doc: &SemanticDocument, index: usize) -> bool {
    let word = doc.word(index);
    word.tag.starts_with("NN") || word.is_involved_in_coreference()
}

/// Whether a syntactic child negates its head.
pub fn is_negation_trigger(doc: &SemanticDocument, child: usize) -> bool {
    let word = doc.word(child);
    if NEGATION_LEMMAS.contains(&word.lemma.as_str()) || word.dep == "neg" {
        return true;
    }
    // "no more", "no longer"
    matches!(word.lemma.as_str(), "more" | "longer")
        && word
            .syntactic_children
            .iter()
            .any(|&grandchild| doc.word(grandchild).lemma == "no")
}

// ============================================================================
// Auxiliaries and passives
// ============================================================================

pub fn correct_auxiliaries_and_passives(doc: &mut SemanticDocument, index: usize) {
    if doc.word(index).has_dependency_with_label("auxpass") {
        relabel_children(doc, index, "nsubj", "nsubjpass");
    }

    for child in children_with_label(doc, index, "xcomp") {
        let word = doc.word(index);
        let has_object = word.has_dependency_with_label("dobj");
        if word.lemma == "use" && word.tag == "VBD" && !has_object {
            // "he used to ..." but not "he used it to ..."
            doc.move_information_between_tokens(index, child);
        } else if word.lemma == "go" {
            // "was going to" is uncertain, "is going to" is not
            let uncertain = word.labeled_children().any(|edge| {
                let aux = doc.word(edge.child);
                edge.label == "aux" && aux.lemma == "be" && aux.tag == "VBD"
            });
            doc.move_information_between_tokens(index, child);
            if uncertain {
                doc.words[child].mark_children_uncertain();
            }
        } else {
            // "she told him to close the contract", "he decided to close it"
            let arguments: Vec<usize> = word
                .labeled_children()
                .filter(|edge| {
                    matches!(edge.label, "dobj" | "nsubjpass")
                        || (edge.label == "nsubj" && !has_object)
                })
                .map(|edge| edge.child)
                .collect();
            let label = if doc.word(child).has_dependency_with_label("auxpass") {
                "nsubjpass"
            } else {
                "nsubj"
            };
            for argument in arguments {
                if !doc.word(child).has_dependency_with_child_index(argument) && child > argument {
                    doc.add_edge(child, argument, label, true);
                }
            }
        }
    }
}

// ============================================================================
// Relative clauses
// ============================================================================

pub fn handle_relative_constructions(doc: &mut SemanticDocument, index: usize) {
    if doc.word(index).dep != "relcl" {
        return;
    }
    let Some((child, label)) = doc
        .word(index)
        .labeled_children()
        .next()
        .map(|edge| (edge.child, edge.label.to_string()))
    else {
        return;
    };

    let whose = doc
        .word(child)
        .labeled_children()
        .filter(|edge| edge.label == "poss")
        .map(|edge| edge.child)
        .find(|&grandchild| doc.word(grandchild).tag == "WP$");
    if let Some(whose) = whose {
        resolve_whose(doc, index, child, whose);
        return;
    }

    let head = doc.word(index).head;
    let working_label = if is_interrogative(doc, child) {
        // "that", "which"
        doc.set_redirect(child, head);
        label
    } else {
        // "the man I saw yesterday"
        "relant".to_string()
    };

    let predicates = doc.token_and_righthand_siblings(index);
    let Some(&last_predicate) = predicates.last() else {
        return;
    };
    let prepositions: Vec<usize> = children_with_label(doc, last_predicate, "prep")
        .into_iter()
        .filter(|&preposition| doc.word(preposition).is_matchable)
        .collect();
    for &preposition in &prepositions {
        let complementizers: Vec<usize> = doc
            .word(preposition)
            .labeled_children()
            .map(|edge| edge.child)
            .filter(|&grandchild| is_interrogative(doc, grandchild))
            .collect();
        for complementizer in complementizers {
            doc.words[preposition].remove_dependency_with_child_index(complementizer);
            doc.set_redirect(complementizer, head);
        }
    }
    let displaced_preposition = prepositions
        .into_iter()
        .find(|&preposition| doc.word(preposition).children.is_empty());

    let antecedents = doc.token_and_righthand_siblings(doc.word(head).token_or_lefthand_sibling_index);
    match displaced_preposition {
        Some(preposition) => {
            // "the house that he lived in"
            for &antecedent in antecedents.iter().filter(|&&a| a != preposition) {
                doc.add_edge(preposition, antecedent, "pobj", antecedent != head);
            }
            for &predicate in &predicates {
                if !doc.word(predicate).has_dependency_with_child_index(preposition)
                    && predicate != preposition
                {
                    doc.add_edge(predicate, preposition, "prep", true);
                }
                if working_label != "relant" {
                    doc.words[predicate].remove_dependency_with_child_index(child);
                }
            }
        }
        None => {
            for &antecedent in &antecedents {
                for &predicate in predicates.iter().filter(|&&p| p != antecedent) {
                    doc.add_edge(predicate, antecedent, &working_label, antecedent != head);
                    if working_label != "relant" {
                        doc.words[predicate].remove_dependency_with_child_index(child);
                    }
                }
            }
        }
    }
}

/// "the man whose dog barked": the possessed noun gains a `poss` edge to the
/// antecedent and "whose" redirects onto it.
fn resolve_whose(doc: &mut SemanticDocument, predicate: usize, possessed: usize, whose: usize) {
    let sentence_start = doc.sentence_of(predicate).start;
    let Some(antecedent) = (sentence_start..=whose)
        .rev()
        .find(|&candidate| doc.word(candidate).has_dependency_with_label("relcl"))
    else {
        return;
    };
    let possessors = doc.token_and_righthand_siblings(possessed);
    let antecedents =
        doc.token_and_righthand_siblings(doc.word(antecedent).token_or_lefthand_sibling_index);
    for sibling in antecedents {
        for &possessor in possessors.iter().filter(|&&p| p != sibling) {
            doc.add_edge(possessor, sibling, "poss", sibling != antecedent);
            doc.words[possessor].remove_dependency_with_child_index(whose);
        }
    }
    doc.set_redirect(whose, antecedent);
}

// ============================================================================
// Remaining English constructions
// ============================================================================

pub fn perform_language_specific_tasks(doc: &mut SemanticDocument, index: usize) {
    detach_particle(doc, index);
    mark_modal_arguments_uncertain(doc, index);
    if matches!(doc.word(index).dep.as_str(), "aux" | "auxpass") {
        doc.words[index].is_matchable = false;
    }
    add_prepositional_object_dependencies(doc, index);
    add_possible_prepositional_object_dependencies(doc, index);
    add_participle_dependencies(doc, index);
    add_compound_participle_dependencies(doc, index);
    add_prepositional_complement_subjects(doc, index);
    add_tough_movement_arguments(doc, index);
}

/// Phrasal verb particles are part of the verb lemma.
fn detach_particle(doc: &mut SemanticDocument, index: usize) {
    if doc.word(index).tag == "RP" {
        let head = doc.word(index).head;
        doc.words[head].remove_dependency_with_child_index(index);
        doc.words[index].is_matchable = false;
    }
}

fn mark_modal_arguments_uncertain(doc: &mut SemanticDocument, index: usize) {
    if doc.word(index).pos != "VERB" {
        return;
    }
    let modal = children_with_label(doc, index, "aux").into_iter().any(|aux| {
        let aux = doc.word(aux);
        matches!(aux.pos.as_str(), "VERB" | "AUX")
            && !NON_MODAL_AUXILIARY_LEMMAS.contains(&aux.lemma.as_str())
    });
    if modal {
        for edge in &mut doc.words[index].children {
            if let Edge::Labeled {
                label,
                is_uncertain,
                ..
            } = edge
            {
                if label != "aux" {
                    *is_uncertain = true;
                }
            }
        }
    }
}

/// Edges spanning "by", "of", "to" and other prepositions let deverbal noun
/// phrases match verb phrases.
fn add_prepositional_object_dependencies(doc: &mut SemanticDocument, index: usize) {
    let prepositions: Vec<(usize, String, bool)> = doc
        .word(index)
        .labeled_children()
        .filter(|edge| matches!(edge.label, "prep" | "agent" | "dative"))
        .map(|edge| (edge.child, edge.label.to_string(), edge.is_uncertain))
        .collect();
    for (preposition, dependency, uncertain) in prepositions {
        let label = match doc.word(preposition).lemma.as_str() {
            "by" => "pobjb",
            "of" => "pobjo",
            "to" if dependency == "dative" => "dative",
            "to" => "pobjt",
            _ => "pobjp",
        };
        if label != "pobjp" {
            doc.words[preposition].is_matchable = false;
        }
        let objects: Vec<(usize, bool)> = doc
            .word(preposition)
            .labeled_children()
            .filter(|edge| edge.label == "pobj" && edge.child != index)
            .map(|edge| (edge.child, edge.is_uncertain))
            .collect();
        for (object, object_uncertain) in objects {
            doc.add_edge(index, object, label, uncertain || object_uncertain);
        }
    }
}

fn add_possible_prepositional_object_dependencies(doc: &mut SemanticDocument, index: usize) {
    for preposition in children_with_label(doc, index, "prepposs") {
        if !doc.word(preposition).is_matchable {
            continue;
        }
        let objects: Vec<usize> = children_with_label(doc, preposition, "pobj")
            .into_iter()
            .filter(|&object| object != index)
            .collect();
        for object in objects {
            doc.add_edge(index, object, "pobjp", true);
        }
    }
}

/// "the dog chasing the cat", "the cat chased by the dog"
fn add_participle_dependencies(doc: &mut SemanticDocument, index: usize) {
    let word = doc.word(index);
    if word.dep != "acl" {
        return;
    }
    let label = match word.tag.as_str() {
        "VBG" => "nsubj",
        "VBN" => "dobj",
        _ => return,
    };
    let head = doc.word(word.head).token_or_lefthand_sibling_index;
    for antecedent in doc.token_and_righthand_siblings(head) {
        if antecedent != index {
            doc.add_edge(index, antecedent, label, false);
        }
    }
}

/// "cat-eating dog", "dog-eaten cat"
fn add_compound_participle_dependencies(doc: &mut SemanticDocument, index: usize) {
    let word = doc.word(index);
    if word.dep != "amod" || word.pos != "VERB" {
        return;
    }
    let (modifier_label, noun_label) = match word.tag.as_str() {
        "VBG" => ("advmodobj", "advmodsubj"),
        "VBN" => ("advmodsubj", "advmodobj"),
        _ => return,
    };
    let head = word.head;
    let Some(edge) = doc.words[index]
        .children
        .iter_mut()
        .find(|edge| edge.label() == Some("npadvmod"))
    else {
        return;
    };
    if let Edge::Labeled { label, .. } = edge {
        *label = modifier_label.to_string();
    }
    for noun in doc.token_and_righthand_siblings(head) {
        if noun != index {
            doc.add_edge(index, noun, noun_label, noun != head);
        }
    }
}

/// "he is thinking about singing", "he keeps on singing"
fn add_prepositional_complement_subjects(doc: &mut SemanticDocument, index: usize) {
    let word = doc.word(index);
    if word.pos != "VERB" || word.dep != "pcomp" {
        return;
    }
    let label = if word.has_dependency_with_label("auxpass") {
        "nsubjpass"
    } else {
        "nsubj"
    };
    if word.has_dependency_with_label(label) {
        return;
    }
    let sentence_start = doc.sentence_of(index).start;
    let Some(subject) = (sentence_start..index)
        .rev()
        .find(|&candidate| matches!(doc.word(candidate).dep.as_str(), "nsubj" | "nsubjpass"))
    else {
        return;
    };
    // Climb out of relative clauses to the noun phrase.
    let mut working = subject;
    while !is_noun_like(doc, working) {
        if doc.word(working).is_root() {
            return;
        }
        working = doc.word(working).head;
    }
    let sources = doc.token_and_righthand_siblings(working);
    for target in doc.token_and_righthand_siblings(index) {
        for &source in sources.iter().filter(|&&s| s != target) {
            doc.add_edge(target, source, label, true);
        }
    }
}

/// "he is easy to find": the noun could be subject or object of the verb.
fn add_tough_movement_arguments(doc: &mut SemanticDocument, index: usize) {
    if !is_noun_like(doc, index) {
        return;
    }
    let adjectives: Vec<usize> = children_with_label(doc, index, "amod")
        .into_iter()
        .filter(|&adjective| doc.word(adjective).pos == "ADJ")
        .collect();
    for adjective in adjectives {
        let verbs: Vec<usize> = children_with_label(doc, adjective, "xcomp")
            .into_iter()
            .filter(|&verb| doc.word(verb).pos == "VERB")
            .collect();
        for verb in verbs {
            doc.add_edge(verb, index, "arg", true);
        }
    }
}
