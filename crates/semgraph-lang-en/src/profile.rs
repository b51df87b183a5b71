use semgraph_graph::AdapterProfile;

pub static ENGLISH_PROFILE: AdapterProfile = AdapterProfile {
    noun_pos: &["NOUN", "PROPN"],
    predicate_head_pos: &["VERB", "AUX"],
    matchable_pos: &[
        "ADJ", "ADP", "ADV", "NOUN", "NUM", "PROPN", "VERB", "AUX", "X", "INTJ",
    ],

    // "is" and "dog" in "The dog is tired"
    adjectival_predicate_head_pos: &["VERB", "AUX"],
    adjectival_predicate_subject_pos: &["NOUN", "PROPN", "PRON"],
    adjectival_predicate_subject_dep: "nsubj",
    adjectival_predicate_predicate_dep: "acomp",
    adjectival_predicate_predicate_pos: "ADJ",
    modifier_dep: "amod",

    parser_noun_to_preposition_dep: "prep",
    parser_verb_to_preposition_dep: "prep",
    semantic_noun_to_preposition_dep: "prepposs",
    semantic_verb_to_preposition_dep: "prepposs",

    conjunction_deps: &["conj", "appos", "cc"],
    sibling_marker_deps: &["conj", "appos"],
    or_lemma: "or",
    mark_child_dependencies_copied_to_siblings_as_uncertain: true,

    interrogative_pronoun_tags: &["WDT", "WP", "WRB"],
    semantic_dependency_excluded_tags: &["DT"],
    generic_pronoun_lemmas: &["something", "somebody", "someone"],
    whose_lemma: "whose",

    maximum_mentions_in_coreference_chain: 3,
    maximum_word_distance_in_coreference_chain: 300,

    preposition_deps: &["prep"],
    permissible_embedding_pos: &["NOUN", "PROPN", "ADJ", "ADV"],
    minimum_embedding_match_word_length: 3,
    noun_kernel_dep: &["nmod", "compound", "appos", "nummod"],
    preferred_phraselet_pos: &["NOUN", "PROPN"],
    entity_defined_multiword_pos: &["NOUN", "PROPN"],
    entity_defined_multiword_entity_types: &["PERSON", "ORG", "GPE", "WORK_OF_ART"],
    question_answer_blacklist_deps: &["conj", "appos", "cc", "punct"],
    question_answer_final_blacklist_deps: &["case"],
    topic_matching_phraselet_stop_lemmas: &["then", "therefore", "so"],
    topic_matching_phraselet_stop_tags: &["PRP", "PRP$"],
    topic_matching_reverse_only_parent_lemmas: &[
        ("be", "VERB"),
        ("be", "AUX"),
        ("have", "VERB"),
        ("have", "AUX"),
        ("do", "VERB"),
        ("say", "VERB"),
        ("go", "VERB"),
        ("get", "VERB"),
        ("make", "VERB"),
    ],
};

/// Words whose vectors stand for each entity label.
pub const ENTITY_LABELS_TO_LEXEMES: &[(&str, &str)] = &[
    ("PERSON", "person"),
    ("NORP", "group"),
    ("FAC", "building"),
    ("ORG", "organization"),
    ("GPE", "place"),
    ("LOC", "place"),
    ("PRODUCT", "product"),
    ("EVENT", "event"),
    ("WORK_OF_ART", "artwork"),
    ("LAW", "law"),
    ("LANGUAGE", "language"),
    ("DATE", "date"),
    ("TIME", "time"),
    ("PERCENT", "percent"),
    ("MONEY", "money"),
    ("QUANTITY", "quantity"),
    ("ORDINAL", "number"),
    ("CARDINAL", "number"),
];

pub const NEGATION_LEMMAS: &[&str] = &[
    "nobody", "nothing", "nowhere", "noone", "neither", "nor", "no", "not",
];

pub const INTERROGATIVE_TAGS: &[&str] = &["WP", "WRB", "WDT"];

/// Auxiliaries that do not make a verb's arguments uncertain.
pub const NON_MODAL_AUXILIARY_LEMMAS: &[&str] =
    &["be", "have", "do", "go", "use", "will", "shall"];
