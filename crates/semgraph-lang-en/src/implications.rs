//! Which English document dependencies satisfy which search-phrase
//! dependencies.

use semgraph_graph::{ImplicationError, ImplicationTable, MatchImplication};

const SUBJECT_LIKE: &[&str] = &["nsubj", "csubj", "poss", "pobjb", "advmodsubj"];

const ADJECTIVE_REVERSE: &[&str] = &["acomp", "amod"];

fn joined(lists: &[&[&'static str]]) -> Vec<&'static str> {
    lists.iter().flat_map(|list| list.iter().copied()).collect()
}

pub fn english_implications() -> Result<ImplicationTable, ImplicationError> {
    let modified = joined(&[
        SUBJECT_LIKE,
        &[
            "dobj", "pobjo", "relant", "nsubjpass", "csubjpass", "advmodobj", "dative", "arg",
        ],
    ]);
    ImplicationTable::new([
        MatchImplication::new("nsubj", &["csubj", "poss", "pobjb", "pobjo", "advmodsubj", "arg"])
            .with_reverse(ADJECTIVE_REVERSE),
        MatchImplication::new("acomp", &["amod", "advmod", "npmod", "advcl"])
            .with_reverse(&joined(&[&modified, &["compound"]])),
        MatchImplication::new(
            "advcl",
            &[
                "pobjo", "poss", "relant", "nsubjpass", "csubjpass", "compound", "advmodobj", "arg",
                "dobj", "xcomp",
            ],
        ),
        // "compound" is a normal-polarity implication here, so it is left out
        // of the reverse list.
        MatchImplication::new("amod", &["acomp", "advmod", "npmod", "advcl", "compound"])
            .with_reverse(&modified),
        MatchImplication::new("advmod", &["acomp", "amod", "npmod", "advcl"]),
        MatchImplication::new(
            "arg",
            &joined(&[
                SUBJECT_LIKE,
                &[
                    "dobj", "pobjo", "relant", "nsubjpass", "csubjpass", "compound", "advmodobj",
                    "dative", "pobjp",
                ],
            ]),
        )
        .with_reverse(ADJECTIVE_REVERSE),
        MatchImplication::new(
            "compound",
            &joined(&[
                &["nmod", "appos", "nounmod"],
                SUBJECT_LIKE,
                &[
                    "dobj", "pobjo", "relant", "pobjp", "nsubjpass", "csubjpass", "arg",
                    "advmodobj", "dative", "amod",
                ],
            ]),
        )
        .with_reverse(&["acomp"]),
        MatchImplication::new("dative", &["pobjt", "relant", "nsubjpass"])
            .with_reverse(ADJECTIVE_REVERSE),
        MatchImplication::new("pobjt", &["dative", "relant"]).with_reverse(ADJECTIVE_REVERSE),
        MatchImplication::new(
            "nsubjpass",
            &[
                "dobj", "pobjo", "poss", "relant", "csubjpass", "compound", "advmodobj", "arg",
                "dative",
            ],
        )
        .with_reverse(ADJECTIVE_REVERSE),
        MatchImplication::new(
            "dobj",
            &[
                "pobjo", "poss", "relant", "nsubjpass", "csubjpass", "compound", "advmodobj", "arg",
                "xcomp", "advcl",
            ],
        )
        .with_reverse(ADJECTIVE_REVERSE),
        MatchImplication::new("nmod", &["appos", "compound", "nummod"]),
        MatchImplication::new(
            "poss",
            &[
                "pobjo", "nsubj", "csubj", "pobjb", "advmodsubj", "arg", "relant", "nsubjpass",
                "csubjpass", "compound", "advmodobj", "det",
            ],
        )
        .with_reverse(ADJECTIVE_REVERSE),
        MatchImplication::new(
            "pobjo",
            &[
                "poss", "dobj", "relant", "nsubjpass", "csubjpass", "compound", "advmodobj", "arg",
                "xcomp", "nsubj", "csubj", "advmodsubj",
            ],
        )
        .with_reverse(ADJECTIVE_REVERSE),
        MatchImplication::new("pobjb", &["nsubj", "csubj", "poss", "advmodsubj", "arg"])
            .with_reverse(ADJECTIVE_REVERSE),
        MatchImplication::new("pobjp", &["compound"]),
        MatchImplication::new("pobj", &["pcomp"]),
        MatchImplication::new("pcomp", &["pobj"]),
        MatchImplication::new("prep", &["prepposs"]),
        MatchImplication::new(
            "wh_wildcard",
            &["advmod", "advcl", "npadvmod", "prep", "pobjp"],
        ),
        MatchImplication::new(
            "xcomp",
            &[
                "pobjo", "poss", "relant", "nsubjpass", "csubjpass", "compound", "advmodobj", "arg",
                "dobj", "advcl",
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_valid() {
        let table = english_implications().unwrap();
        assert_eq!(table.len(), 21);
    }

    #[test]
    fn test_passive_agent_satisfies_subject() {
        let table = english_implications().unwrap();
        assert!(table.dependency_labels_match("nsubj", "pobjb", false));
        assert!(table.dependency_labels_match("pobjb", "nsubj", false));
        assert!(!table.dependency_labels_match("dobj", "nsubj", false));
    }

    #[test]
    fn test_adjective_reverse_matching() {
        let table = english_implications().unwrap();
        assert!(table.dependency_labels_match("amod", "nsubj", true));
        assert!(table.dependency_labels_match("nsubj", "amod", true));
        assert!(!table.dependency_labels_match("amod", "compound", true));
        assert!(table.dependency_labels_match("amod", "compound", false));
    }
}
