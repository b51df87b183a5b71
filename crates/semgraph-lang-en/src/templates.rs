//! English phraselet templates with the parses of their example sentences.

use semgraph_graph::{RawDocumentBuilder, TemplateDefinition};

const NOUN_TAGS: &[&str] = &["FW", "NN", "NNP", "NNPS", "NNS"];

const VERB_TAGS: &[&str] = &["VB", "VBD", "VBG", "VBN", "VBP", "VBZ"];

const NOUN_AND_VERB_TAGS: &[&str] = &[
    "FW", "NN", "NNP", "NNPS", "NNS", "VB", "VBD", "VBG", "VBN", "VBP", "VBZ",
];

const MODIFIER_TAGS: &[&str] = &["JJ", "JJR", "JJS", "VBN", "RB", "RBR", "RBS"];

pub fn english_templates() -> Vec<TemplateDefinition> {
    vec![
        TemplateDefinition::new(
            "predicate-actor",
            "A thing does",
            RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 1)
                .token("thing", "thing", "NOUN", "NN", "nsubj", 2)
                .token("does", "do", "VERB", "VBZ", "ROOT", 2)
                .build(),
            2,
        )
        .with_child(1)
        .with_dependency_labels(&["nsubj", "csubj", "pobjb", "advmodsubj"])
        .with_parent_tags(NOUN_AND_VERB_TAGS)
        .with_child_tags(NOUN_TAGS),
        TemplateDefinition::new(
            "predicate-patient",
            "Somebody does a thing",
            RawDocumentBuilder::new()
                .token("Somebody", "somebody", "PRON", "NN", "nsubj", 1)
                .token("does", "do", "VERB", "VBZ", "ROOT", 1)
                .token("a", "a", "DET", "DT", "det", 3)
                .token("thing", "thing", "NOUN", "NN", "dobj", 1)
                .build(),
            1,
        )
        .with_child(3)
        .with_dependency_labels(&["dobj", "relant", "advmodobj", "xcomp"])
        .with_parent_tags(NOUN_AND_VERB_TAGS)
        .with_child_tags(NOUN_AND_VERB_TAGS),
        TemplateDefinition::new(
            "word-ofword",
            "A thing of a thing",
            RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 1)
                .token("thing", "thing", "NOUN", "NN", "ROOT", 1)
                .token("of", "of", "ADP", "IN", "prep", 1)
                .token("a", "a", "DET", "DT", "det", 4)
                .token("thing", "thing", "NOUN", "NN", "pobj", 2)
                .build(),
            1,
        )
        .with_child(4)
        .with_dependency_labels(&["pobjo", "poss"])
        .with_parent_tags(NOUN_AND_VERB_TAGS)
        .with_child_tags(NOUN_AND_VERB_TAGS),
        TemplateDefinition::new(
            "predicate-toughmovedargument",
            "A thing is easy to do",
            RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 1)
                .token("thing", "thing", "NOUN", "NN", "nsubj", 2)
                .token("is", "be", "AUX", "VBZ", "ROOT", 2)
                .token("easy", "easy", "ADJ", "JJ", "acomp", 2)
                .token("to", "to", "PART", "TO", "aux", 5)
                .token("do", "do", "VERB", "VB", "xcomp", 3)
                .build(),
            5,
        )
        .with_child(1)
        .with_dependency_labels(&["arg"])
        .with_parent_tags(NOUN_AND_VERB_TAGS)
        .with_child_tags(NOUN_TAGS),
        TemplateDefinition::new(
            "predicate-passivesubject",
            "A thing is done",
            RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 1)
                .token("thing", "thing", "NOUN", "NN", "nsubjpass", 3)
                .token("is", "be", "AUX", "VBZ", "auxpass", 3)
                .token("done", "do", "VERB", "VBN", "ROOT", 3)
                .build(),
            3,
        )
        .with_child(1)
        .with_dependency_labels(&["nsubjpass", "csubjpass"])
        .with_parent_tags(NOUN_AND_VERB_TAGS)
        .with_child_tags(NOUN_TAGS),
        TemplateDefinition::new(
            "be-attribute",
            "Something is a thing",
            RawDocumentBuilder::new()
                .token("Something", "something", "PRON", "NN", "nsubj", 1)
                .token("is", "be", "AUX", "VBZ", "ROOT", 1)
                .token("a", "a", "DET", "DT", "det", 3)
                .token("thing", "thing", "NOUN", "NN", "attr", 1)
                .build(),
            1,
        )
        .with_child(3)
        .with_dependency_labels(&["attr"])
        .with_parent_tags(VERB_TAGS)
        .with_child_tags(NOUN_TAGS)
        .reverse_only(),
        TemplateDefinition::new(
            "predicate-recipient",
            "Somebody gives a thing something",
            RawDocumentBuilder::new()
                .token("Somebody", "somebody", "PRON", "NN", "nsubj", 1)
                .token("gives", "give", "VERB", "VBZ", "ROOT", 1)
                .token("a", "a", "DET", "DT", "det", 3)
                .token("thing", "thing", "NOUN", "NN", "dative", 1)
                .token("something", "something", "PRON", "NN", "dobj", 1)
                .build(),
            1,
        )
        .with_child(3)
        .with_dependency_labels(&["dative", "pobjt"])
        .with_parent_tags(NOUN_AND_VERB_TAGS)
        .with_child_tags(NOUN_TAGS),
        TemplateDefinition::new(
            "governor-adjective",
            "A big thing",
            RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 2)
                .token("big", "big", "ADJ", "JJ", "amod", 2)
                .token("thing", "thing", "NOUN", "NN", "ROOT", 2)
                .build(),
            2,
        )
        .with_child(1)
        .with_dependency_labels(&["acomp", "amod", "advmod", "npmod", "advcl", "dobj"])
        .with_parent_tags(NOUN_AND_VERB_TAGS)
        .with_child_tags(MODIFIER_TAGS),
        TemplateDefinition::new(
            "noun-noun",
            "A thing thing",
            RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 2)
                .token("thing", "thing", "NOUN", "NN", "compound", 2)
                .token("thing", "thing", "NOUN", "NN", "ROOT", 2)
                .build(),
            2,
        )
        .with_child(1)
        .with_dependency_labels(&["nmod", "appos", "compound", "nounmod"])
        .with_parent_tags(NOUN_TAGS)
        .with_child_tags(NOUN_TAGS),
        TemplateDefinition::new(
            "number-noun",
            "Seven things",
            RawDocumentBuilder::new()
                .token("Seven", "seven", "NUM", "CD", "nummod", 1)
                .token("things", "thing", "NOUN", "NNS", "ROOT", 1)
                .build(),
            1,
        )
        .with_child(0)
        .with_dependency_labels(&["nummod"])
        .with_parent_tags(NOUN_TAGS)
        .with_child_tags(&["CD"]),
        TemplateDefinition::new(
            "prepgovernor-noun",
            "A thing in a thing",
            RawDocumentBuilder::new()
                .token("A", "a", "DET", "DT", "det", 1)
                .token("thing", "thing", "NOUN", "NN", "ROOT", 1)
                .token("in", "in", "ADP", "IN", "prep", 1)
                .token("a", "a", "DET", "DT", "det", 4)
                .token("thing", "thing", "NOUN", "NN", "pobj", 2)
                .build(),
            1,
        )
        .with_child(4)
        .with_dependency_labels(&["pobjp"])
        .with_parent_tags(NOUN_AND_VERB_TAGS)
        .with_child_tags(NOUN_TAGS),
        TemplateDefinition::new(
            "prep-noun",
            "in a thing",
            RawDocumentBuilder::new()
                .token("in", "in", "ADP", "IN", "ROOT", 0)
                .token("a", "a", "DET", "DT", "det", 2)
                .token("thing", "thing", "NOUN", "NN", "pobj", 0)
                .build(),
            0,
        )
        .with_child(2)
        .with_dependency_labels(&["pobj", "pcomp"])
        .with_parent_tags(&["IN"])
        .with_child_tags(NOUN_TAGS)
        .reverse_only(),
        TemplateDefinition::new(
            "head-WHattr",
            "what is this?",
            RawDocumentBuilder::new()
                .token("what", "what", "PRON", "WP", "attr", 1)
                .token("is", "be", "AUX", "VBZ", "ROOT", 1)
                .token("this", "this", "PRON", "DT", "nsubj", 1)
                .no_space()
                .token("?", "?", "PUNCT", ".", "punct", 1)
                .build(),
            1,
        )
        .with_child(0)
        .with_dependency_labels(&["attr"])
        .with_parent_tags(VERB_TAGS)
        .with_child_tags(&["WP"])
        .question(),
        TemplateDefinition::new(
            "head-WHsubj",
            "who came?",
            RawDocumentBuilder::new()
                .token("who", "who", "PRON", "WP", "nsubj", 1)
                .token("came", "come", "VERB", "VBD", "ROOT", 1)
                .no_space()
                .token("?", "?", "PUNCT", ".", "punct", 1)
                .build(),
            1,
        )
        .with_child(0)
        .with_dependency_labels(&["nsubj", "nsubjpass", "pobjb"])
        .with_parent_tags(VERB_TAGS)
        .with_child_tags(&["WP"])
        .question(),
        TemplateDefinition::new(
            "head-WHobj",
            "who did you see?",
            RawDocumentBuilder::new()
                .token("who", "who", "PRON", "WP", "dobj", 3)
                .token("did", "do", "AUX", "VBD", "aux", 3)
                .token("you", "you", "PRON", "PRP", "nsubj", 3)
                .token("see", "see", "VERB", "VB", "ROOT", 3)
                .no_space()
                .token("?", "?", "PUNCT", ".", "punct", 3)
                .build(),
            3,
        )
        .with_child(0)
        .with_dependency_labels(&["dobj", "pobjo"])
        .with_parent_tags(VERB_TAGS)
        .with_child_tags(&["WP"])
        .question(),
        TemplateDefinition::new(
            "head-WHadv",
            "where did you go?",
            RawDocumentBuilder::new()
                .token("where", "where", "ADV", "WRB", "advmod", 3)
                .token("did", "do", "AUX", "VBD", "aux", 3)
                .token("you", "you", "PRON", "PRP", "nsubj", 3)
                .token("go", "go", "VERB", "VB", "ROOT", 3)
                .no_space()
                .token("?", "?", "PUNCT", ".", "punct", 3)
                .build(),
            3,
        )
        .with_child(0)
        .with_dependency_labels(&["advmod"])
        .with_parent_tags(NOUN_AND_VERB_TAGS)
        .with_child_tags(&["WRB"])
        .question()
        .with_assigned_dependency_label("wh_wildcard"),
        TemplateDefinition::new(
            "headprep-WH",
            "what did you put it in?",
            RawDocumentBuilder::new()
                .token("what", "what", "PRON", "WP", "pobj", 5)
                .token("did", "do", "AUX", "VBD", "aux", 3)
                .token("you", "you", "PRON", "PRP", "nsubj", 3)
                .token("put", "put", "VERB", "VB", "ROOT", 3)
                .token("it", "it", "PRON", "PRP", "dobj", 3)
                .token("in", "in", "ADP", "IN", "prep", 3)
                .no_space()
                .token("?", "?", "PUNCT", ".", "punct", 3)
                .build(),
            3,
        )
        .with_child(0)
        .with_dependency_labels(&["pobjp"])
        .with_parent_tags(NOUN_AND_VERB_TAGS)
        .with_child_tags(&["WP"])
        .question(),
        TemplateDefinition::new(
            "headprepto-WH",
            "who did you say it to?",
            RawDocumentBuilder::new()
                .token("who", "who", "PRON", "WP", "pobj", 5)
                .token("did", "do", "AUX", "VBD", "aux", 3)
                .token("you", "you", "PRON", "PRP", "nsubj", 3)
                .token("say", "say", "VERB", "VB", "ROOT", 3)
                .token("it", "it", "PRON", "PRP", "dobj", 3)
                .token("to", "to", "ADP", "IN", "prep", 3)
                .no_space()
                .token("?", "?", "PUNCT", ".", "punct", 3)
                .build(),
            3,
        )
        .with_child(0)
        .with_dependency_labels(&["pobjt"])
        .with_parent_tags(NOUN_AND_VERB_TAGS)
        .with_child_tags(&["WP"])
        .question(),
        TemplateDefinition::new(
            "word",
            "thing",
            RawDocumentBuilder::new()
                .token("thing", "thing", "NOUN", "NN", "ROOT", 0)
                .build(),
            0,
        )
        .with_parent_tags(NOUN_TAGS),
    ]
}
