//! Lemma rules: phrasal verbs, derived base forms and hyphens.

use semgraph_graph::{Lexicon, SemanticDocument, Word};

/// Lemma of a word in context. Phrasal verbs take their particle into the
/// lemma ("get up").
pub fn semantic_lemma(doc: &SemanticDocument, index: usize) -> String {
    let word = doc.word(index);
    if word.pos == "VERB" {
        if let Some(particle) = word
            .syntactic_children
            .iter()
            .map(|&child| doc.word(child))
            .find(|child| child.tag == "RP")
        {
            return format!(
                "{} {}",
                word.raw_lemma.to_lowercase(),
                particle.raw_lemma.to_lowercase()
            );
        }
    }
    word.raw_lemma.to_lowercase()
}

fn is_noun_or_bare(word: Option<&Word>) -> bool {
    word.map_or(true, |w| w.pos == "NOUN")
}

fn has_tag_or_bare(word: Option<&Word>, tag: &str) -> bool {
    word.map_or(true, |w| w.tag == tag)
}

/// Replaces a trailing 'i' with 'y' ("happi" -> "happy").
fn restore_final_y(stem: &str) -> String {
    match stem.strip_suffix('i') {
        Some(rest) => format!("{rest}y"),
        None => stem.to_string(),
    }
}

/// Nominalizations in -isation/-ization/-ication/-ation.
fn deverbal_base(lexicon: &Lexicon, lemma: &str) -> Option<String> {
    let mut candidate: Option<(String, String)> = None;
    if let Some(stem) = lemma
        .strip_suffix("isation")
        .or_else(|| lemma.strip_suffix("ization"))
    {
        // Only American spellings are in the vocabulary.
        let infix = &lemma[stem.len()..stem.len() + 2];
        let possible = format!("{stem}{infix}e");
        candidate = Some((possible, format!("{stem}ize")));
    } else if let Some(stem) = lemma.strip_suffix("ication") {
        let possible = format!("{stem}y");
        candidate = Some((possible.clone(), possible));
    }
    let usable = candidate
        .as_ref()
        .is_some_and(|(_, test)| lexicon.contains(test));
    if !usable {
        if let Some(stem) = lemma.strip_suffix("ation") {
            let possible = format!("{stem}ate");
            candidate = Some((possible.clone(), possible));
        }
    }
    candidate
        .filter(|(_, test)| lexicon.contains(test))
        .map(|(possible, _)| possible)
}

/// "singing" -> "sing", "running" -> "run", "making" -> "make".
fn verbal_noun_base(lexicon: &Lexicon, stem: &str) -> Option<String> {
    if lexicon.contains(stem) {
        return Some(stem.to_string());
    }
    let chars: Vec<char> = stem.chars().collect();
    if let [.., a, b] = chars.as_slice() {
        if a == b && !"aeiou".contains(*b) {
            let undoubled: String = chars[..chars.len() - 1].iter().collect();
            if lexicon.contains(&undoubled) {
                return Some(undoubled);
            }
        }
    }
    let with_e = format!("{stem}e");
    lexicon.contains(&with_e).then_some(with_e)
}

/// Derived base form from English word-formation heuristics, or `lemma`
/// unchanged. `word` is `None` for bare lemmas, which may be of any class.
pub fn derived_lemma(lexicon: &Lexicon, word: Option<&Word>, lemma: &str) -> String {
    let length = lemma.chars().count();
    if is_noun_or_bare(word) && length >= 10 {
        if let Some(base) = deverbal_base(lexicon, lemma) {
            return base;
        }
    }
    // Deadjectival nouns in -ness.
    if is_noun_or_bare(word) && length >= 7 {
        if let Some(stem) = lemma.strip_suffix("ness") {
            let base = restore_final_y(stem);
            return if lexicon.contains(&base) {
                base
            } else {
                lemma.to_string()
            };
        }
    }
    if has_tag_or_bare(word, "RB") {
        if let Some(stem) = lemma.strip_suffix("ically") {
            return format!("{stem}ic");
        }
        if let Some(stem) = lemma
            .strip_suffix("ably")
            .or_else(|| lemma.strip_suffix("ibly"))
        {
            let infix = &lemma[stem.len()..stem.len() + 2];
            return format!("{stem}{infix}le");
        }
        if let Some(stem) = lemma.strip_suffix("ly") {
            if !stem.is_empty() {
                return restore_final_y(stem);
            }
        }
    }
    if has_tag_or_bare(word, "NN") {
        if let Some(stem) = lemma.strip_suffix("ing") {
            if let Some(base) = verbal_noun_base(lexicon, stem) {
                return base;
            }
        }
    }
    lemma.to_string()
}

/// Hyphens become spaces unless the word starts or ends with one.
pub fn normalize_hyphens(word: &str) -> String {
    if word.trim().starts_with('-') || word.ends_with('-') {
        word.to_string()
    } else {
        word.replace('-', " ")
    }
}
