//! Language-aware queries shared by the strategies, the search phrase
//! compiler, the phraselet extractor and the structural matcher.

use ahash::AHashMap;
use semgraph_graph::{
    AdapterProfile, LanguageAdapter, MatchingConfig, MultiwordSpan, SemanticDocument, Subword, Word,
};
use semgraph_ontology::Ontology;
use std::sync::Arc;

const ENTITY_PREFIX: &str = "ENTITY";

/// Placeholder standing for any noun.
pub const ENTITY_NOUN: &str = "ENTITYNOUN";

/// Adapter, optional ontology and configuration, plus the tables derived
/// from them at construction time.
pub struct MatchingHelper {
    adapter: Arc<dyn LanguageAdapter>,
    ontology: Option<Arc<Ontology>>,
    /// Derived form of an ontology word -> the ontology words yielding it.
    ontology_reverse_derivational_dict: AHashMap<String, Vec<String>>,
    config: MatchingConfig,
}

impl std::fmt::Debug for MatchingHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingHelper")
            .field("adapter", &self.adapter.name())
            .field("ontology", &self.ontology.as_ref().map(|o| o.len()))
            .field("config", &self.config)
            .finish()
    }
}

impl MatchingHelper {
    pub fn new(adapter: Arc<dyn LanguageAdapter>, config: MatchingConfig) -> Self {
        Self {
            adapter,
            ontology: None,
            ontology_reverse_derivational_dict: AHashMap::new(),
            config,
        }
    }

    /// Attaches an ontology, first adding the adapter's derived forms to its
    /// entries.
    pub fn with_ontology(mut self, mut ontology: Ontology) -> Self {
        let adapter = Arc::clone(&self.adapter);
        ontology.update_with_derived_forms(|word| adapter.potential_derived_lemma(word));
        self.ontology_reverse_derivational_dict =
            build_ontology_reverse_derivational_dict(adapter.as_ref(), &ontology);
        tracing::debug!(
            entries = ontology.len(),
            derived = self.ontology_reverse_derivational_dict.len(),
            "attached ontology"
        );
        self.ontology = Some(Arc::new(ontology));
        self
    }

    pub fn adapter(&self) -> &Arc<dyn LanguageAdapter> {
        &self.adapter
    }

    pub fn profile(&self) -> &AdapterProfile {
        self.adapter.profile()
    }

    pub fn ontology(&self) -> Option<&Arc<Ontology>> {
        self.ontology.as_ref()
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// First ontology word whose derived form is `derived`.
    pub fn ontology_word_for_derived_form(&self, derived: &str) -> Option<&str> {
        self.ontology_reverse_derivational_dict
            .get(derived)
            .and_then(|words| words.first())
            .map(String::as_str)
    }

    pub fn ontology_words_for_derived_form(&self, derived: &str) -> &[String] {
        self.ontology_reverse_derivational_dict
            .get(derived)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn dependency_labels_match(
        &self,
        search_phrase_label: &str,
        document_label: &str,
        inverse_polarity: bool,
    ) -> bool {
        self.adapter.match_implications().dependency_labels_match(
            search_phrase_label,
            document_label,
            inverse_polarity,
        )
    }

    // ------------------------------------------------------------------------
    // Entity placeholders and multiwords
    // ------------------------------------------------------------------------

    /// `ENTITYPERSON`, `ENTITYNOUN` etc. when a search word is a placeholder.
    pub fn entity_placeholder<'a>(&self, word: &'a Word) -> Option<&'a str> {
        [word.text.as_str(), word.lemma.as_str()]
            .into_iter()
            .find(|s| s.len() > ENTITY_PREFIX.len() && s.starts_with(ENTITY_PREFIX))
    }

    /// Whether a document word satisfies an entity placeholder.
    pub fn entity_placeholder_matches(&self, placeholder: &str, word: &Word) -> bool {
        let label = &placeholder[ENTITY_PREFIX.len()..];
        (word.ent_type == label && !word.lemma.trim().is_empty())
            || (placeholder == ENTITY_NOUN && self.profile().is_noun_pos(&word.pos))
    }

    fn belongs_to_entity_defined_multiword(&self, word: &Word) -> bool {
        let profile = self.profile();
        profile.entity_defined_multiword_pos.contains(&word.pos.as_str())
            && profile
                .entity_defined_multiword_entity_types
                .contains(&word.ent_type.as_str())
    }

    /// The named-entity span headed by a word, e.g. "Richard Paul Hudson".
    pub fn entity_defined_multiword(&self, doc: &SemanticDocument, index: usize) -> Option<MultiwordSpan> {
        let word = &doc.words[index];
        if !self.belongs_to_entity_defined_multiword(word)
            || (!word.is_root() && self.belongs_to_entity_defined_multiword(&doc.words[word.head]))
            || word.ent_type.is_empty()
            || word.left_edge == word.right_edge
        {
            return None;
        }
        let mut texts = Vec::new();
        let mut indexes = Vec::new();
        for member in &doc.words[word.left_edge..=word.right_edge] {
            if !self.belongs_to_entity_defined_multiword(member) || member.ent_type != word.ent_type {
                if texts.is_empty() {
                    continue;
                }
                return None;
            }
            texts.push(member.text.as_str());
            indexes.push(member.index);
        }
        if texts.len() < 2 {
            return None;
        }
        let text = texts.join(" ");
        let lowercase = text.to_lowercase();
        Some(MultiwordSpan::new(&text, &lowercase, &lowercase, &lowercase, indexes))
    }

    /// The first multiword span of a word that names an ontology entry.
    pub fn ontology_defined_multiword<'a>(
        &self,
        doc: &'a SemanticDocument,
        index: usize,
    ) -> Option<&'a MultiwordSpan> {
        let ontology = self.ontology.as_ref()?;
        doc.words[index].multiword_spans.iter().find(|span| {
            span.direct_matching_reprs
                .iter()
                .chain(span.derivation_matching_reprs.iter().flatten())
                .any(|repr| ontology.contains_multiword(repr))
        })
    }

    // ------------------------------------------------------------------------
    // Embeddings
    // ------------------------------------------------------------------------

    /// Very short words and closed-class words are never compared by
    /// embedding.
    pub fn embedding_matching_permitted(&self, word: &Word) -> bool {
        let profile = self.profile();
        let working_lemma = if word.lemma.split_whitespace().count() > 1 {
            word.raw_lemma.as_str()
        } else {
            word.lemma.as_str()
        };
        profile.permissible_embedding_pos.contains(&word.pos.as_str())
            && working_lemma.chars().count() >= profile.minimum_embedding_match_word_length
    }

    pub fn embedding_matching_permitted_for_subword(&self, subword: &Subword) -> bool {
        subword.lemma.chars().count() >= self.profile().minimum_embedding_match_word_length
    }

    // ------------------------------------------------------------------------
    // Display helpers
    // ------------------------------------------------------------------------

    /// Most specific term for a document word in its coreference chain, or
    /// `document_word` itself.
    pub fn extracted_word(&self, doc: &SemanticDocument, index: usize, document_word: &str) -> String {
        if !self.config.perform_coreference_resolution {
            return document_word.to_string();
        }
        let word = &doc.words[index];
        let Some(most_specific) = word.most_specific_coreferring_term_index else {
            return document_word.to_string();
        };
        let most_specific = &doc.words[most_specific];
        if most_specific.lemma == word.lemma {
            return document_word.to_string();
        }
        match most_specific.multiword_spans.first() {
            Some(span) => span.text.clone(),
            None => most_specific.lowercase_text(),
        }
    }

    /// The part of a word's subtree that answers a question: everything up
    /// to the first conjunction-like word, without a trailing case marker.
    pub fn subtree_for_question_answer(&self, doc: &SemanticDocument, index: usize) -> Vec<usize> {
        let profile = self.profile();
        let mut answer = Vec::new();
        for working in doc.syntactic_subtree(index) {
            let word = &doc.words[working];
            if working == index
                || !profile.question_answer_blacklist_deps.contains(&word.dep.as_str())
                || word.text == "-"
            {
                answer.push(working);
            } else {
                return if answer.is_empty() { vec![index] } else { answer };
            }
        }
        if answer.len() > 1 {
            if let Some(&last) = answer.last() {
                if profile
                    .question_answer_final_blacklist_deps
                    .contains(&doc.words[last].dep.as_str())
                {
                    answer.pop();
                }
            }
        }
        answer
    }

    /// Text of a matched word: the subword text, or for nouns the noun
    /// kernel around the word.
    pub fn dependent_phrase(&self, doc: &SemanticDocument, index: usize, subword: Option<usize>) -> String {
        let word = &doc.words[index];
        if let Some(subword) = subword.and_then(|s| word.subwords.get(s)) {
            return subword.text.clone();
        }
        let profile = self.profile();
        if !profile.is_noun_pos(&word.pos) {
            return word.text.clone();
        }
        let mut texts: Vec<&str> = Vec::new();
        for pointer in word.left_edge..=word.right_edge {
            let member = &doc.words[pointer];
            if pointer > index
                && !profile.is_noun_pos(&member.pos)
                && !profile.noun_kernel_dep.contains(&member.dep.as_str())
            {
                break;
            }
            texts.push(member.text.as_str());
        }
        texts.join(" ")
    }
}

/// For every ontology word whose derived form differs from the word itself,
/// maps the derived form back to the word. Lists are sorted.
fn build_ontology_reverse_derivational_dict(
    adapter: &dyn LanguageAdapter,
    ontology: &Ontology,
) -> AHashMap<String, Vec<String>> {
    let mut dict: AHashMap<String, Vec<String>> = AHashMap::new();
    for ontology_word in ontology.words() {
        let derived = adapter
            .normalize_hyphens(ontology_word)
            .split_whitespace()
            .map(|word| adapter.derived_lemma(None, &word.to_lowercase()))
            .collect::<Vec<_>>()
            .join(" ");
        if derived != ontology_word {
            dict.entry(derived).or_default().push(ontology_word.to_string());
        }
    }
    for words in dict.values_mut() {
        words.sort();
    }
    dict
}
