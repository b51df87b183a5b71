use serde::{Deserialize, Serialize};

pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
pub const OWL_NAMED_INDIVIDUAL: &str = "http://www.w3.org/2002/07/owl#NamedIndividual";
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

/// Relation IRIs and matching options for an ontology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OntologyConfig {
    pub class_type: String,
    pub individual_type: String,
    pub type_link: String,
    pub synonym_type: String,
    pub hyponym_type: String,
    /// Character that separates words in an IRI local name.
    pub word_delimiter: char,
    /// Also match search words to their hypernyms, at negative depth.
    pub symmetric_matching: bool,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            class_type: OWL_CLASS.to_string(),
            individual_type: OWL_NAMED_INDIVIDUAL.to_string(),
            type_link: RDF_TYPE.to_string(),
            synonym_type: OWL_EQUIVALENT_CLASS.to_string(),
            hyponym_type: RDFS_SUBCLASS_OF.to_string(),
            word_delimiter: '_',
            symmetric_matching: false,
        }
    }
}

impl OntologyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symmetric_matching(mut self, symmetric: bool) -> Self {
        self.symmetric_matching = symmetric;
        self
    }

    pub fn with_word_delimiter(mut self, delimiter: char) -> Self {
        self.word_delimiter = delimiter;
        self
    }

    /// Human-readable entry word of an IRI, case preserved.
    ///
    /// Uses the fragment when there is one, otherwise the last path segment.
    pub fn entry_word(&self, iri: &str) -> String {
        let local = match iri.rsplit_once('#') {
            Some((_, fragment)) => fragment,
            None => iri.rsplit('/').next().unwrap_or(iri),
        };
        local.replace(self.word_delimiter, " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_word() {
        let config = OntologyConfig::default();
        assert_eq!(config.entry_word("http://example.org/o#Sports_car"), "Sports car");
        assert_eq!(config.entry_word("http://example.org/animals/Dog"), "Dog");
        let config = config.with_word_delimiter('-');
        assert_eq!(config.entry_word("http://example.org/o#ice-cream"), "ice cream");
    }

    #[test]
    fn test_partial_json_keeps_owl_defaults() {
        let config: OntologyConfig = serde_json::from_str(r#"{"symmetric_matching": true}"#).unwrap();
        assert!(config.symmetric_matching);
        assert_eq!(config.hyponym_type, RDFS_SUBCLASS_OF);
        assert_eq!(config.word_delimiter, '_');
    }
}
