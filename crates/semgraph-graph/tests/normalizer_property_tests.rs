mod common;

use common::PlainAdapter;
use proptest::prelude::*;
use semgraph_graph::{Normalizer, RawDocument, RawDocumentBuilder};
use std::sync::Arc;

/// Random trees rooted at word 0; every other word points at an earlier one.
fn tree_strategy() -> impl Strategy<Value = RawDocument> {
    (1usize..14)
        .prop_flat_map(|n| {
            let heads: Vec<BoxedStrategy<usize>> =
                (1..n).map(|i| (0..i).boxed()).collect();
            (heads, prop::collection::vec(any::<bool>(), n))
        })
        .prop_map(|(heads, triggers)| {
            let mut builder = RawDocumentBuilder::new();
            for (index, trigger) in triggers.iter().enumerate() {
                let (text, dep) = if *trigger { ("not", "neg") } else { ("word", "dep") };
                if index == 0 {
                    builder = builder.token(text, text, "VERB", "VB", "ROOT", 0);
                } else {
                    builder = builder.token(text, text, "NOUN", "NN", dep, heads[index - 1]);
                }
            }
            builder.build()
        })
}

/// "N1 (or|and) N2 ... V1 and V2 ... O1 and O2 ..." with conjuncts to the right.
fn conjunction_strategy() -> impl Strategy<Value = RawDocument> {
    (1usize..4, 1usize..4, 0usize..4, any::<bool>()).prop_map(|(subjects, verbs, objects, or)| {
        let mut builder = RawDocumentBuilder::new();
        let first_verb = subjects + 1;
        builder = builder.token("n0", "n0", "NOUN", "NN", "nsubj", first_verb);
        let conjunction = if or { "or" } else { "and" };
        builder = builder.token(conjunction, conjunction, "CCONJ", "CC", "cc", 0);
        for _ in 1..subjects {
            builder = builder.token("n", "n", "NOUN", "NN", "conj", 0);
        }
        builder = builder.token("v0", "v0", "VERB", "VBZ", "ROOT", first_verb);
        for _ in 1..verbs {
            builder = builder.token("v", "v", "VERB", "VBZ", "conj", first_verb);
        }
        let first_object = first_verb + verbs;
        for i in 0..objects {
            if i == 0 {
                builder = builder.token("o0", "o0", "NOUN", "NN", "dobj", first_verb);
            } else {
                builder = builder.token("o", "o", "NOUN", "NN", "conj", first_object);
            }
        }
        builder.build()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn negation_is_trigger_or_inherited_from_head(raw in tree_strategy()) {
        let normalizer = Normalizer::new(Arc::new(PlainAdapter::default()));
        let doc = normalizer.normalize(&raw).unwrap();
        for word in &doc.words {
            let triggered = word
                .syntactic_children
                .iter()
                .any(|&c| doc.word(c).dep == "neg");
            let inherited = !word.is_root() && doc.word(word.head).is_negated;
            prop_assert_eq!(word.is_negated, triggered || inherited);
        }
    }

    #[test]
    fn sibling_propagation_is_idempotent(raw in conjunction_strategy()) {
        let normalizer = Normalizer::new(Arc::new(PlainAdapter::default()));
        let doc = normalizer.normalize(&raw).unwrap();
        let mut again = doc.clone();
        for index in 0..again.len() {
            normalizer.copy_any_sibling_info(&mut again, index);
        }
        for (before, after) in doc.words.iter().zip(&again.words) {
            prop_assert_eq!(&before.children, &after.children);
            prop_assert!(before.labeled_children().all(|e| e.child != e.parent));
        }
    }
}
