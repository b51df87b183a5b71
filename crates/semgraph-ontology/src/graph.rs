//! Arena graph of ontology resources.
//!
//! Each resource IRI is interned once as a [`NodeId`]; relations are stored
//! as adjacency lists in both directions, in triple order.

use crate::config::OntologyConfig;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// An IRI-only RDF statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub iri: String,
    /// Entry word with case preserved.
    pub word: String,
    pub is_class: bool,
    pub is_individual: bool,
    /// `?x subClassOf self`
    pub hyponyms: Vec<NodeId>,
    /// `?x type self`
    pub instances: Vec<NodeId>,
    /// `self subClassOf ?x`
    pub hypernyms: Vec<NodeId>,
    /// `self type ?x`, excluding the class and individual marker types
    pub types: Vec<NodeId>,
    /// `self equivalentClass ?x` and `?x equivalentClass self`
    pub synonyms: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    nodes: Vec<Node>,
    by_iri: AHashMap<String, NodeId>,
    by_word: AHashMap<String, Vec<NodeId>>,
}

impl OntologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_triples<'a>(
        triples: impl IntoIterator<Item = &'a Triple>,
        config: &OntologyConfig,
    ) -> Self {
        let mut graph = Self::new();
        for triple in triples {
            graph.add_triple(triple, config);
        }
        graph
    }

    fn intern(&mut self, iri: &str, config: &OntologyConfig) -> NodeId {
        if let Some(&id) = self.by_iri.get(iri) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        let word = config.entry_word(iri);
        self.by_word.entry(word.to_lowercase()).or_default().push(id);
        self.nodes.push(Node {
            iri: iri.to_string(),
            word,
            ..Node::default()
        });
        self.by_iri.insert(iri.to_string(), id);
        id
    }

    pub fn add_triple(&mut self, triple: &Triple, config: &OntologyConfig) {
        let Triple {
            subject,
            predicate,
            object,
        } = triple;
        if *predicate == config.type_link {
            if *object == config.class_type {
                let s = self.intern(subject, config);
                self.nodes[s.index()].is_class = true;
            } else if *object == config.individual_type {
                let s = self.intern(subject, config);
                self.nodes[s.index()].is_individual = true;
            } else {
                let s = self.intern(subject, config);
                let o = self.intern(object, config);
                self.nodes[o.index()].instances.push(s);
                self.nodes[s.index()].types.push(o);
            }
        } else if *predicate == config.hyponym_type {
            let s = self.intern(subject, config);
            let o = self.intern(object, config);
            self.nodes[o.index()].hyponyms.push(s);
            self.nodes[s.index()].hypernyms.push(o);
        } else if *predicate == config.synonym_type {
            let s = self.intern(subject, config);
            let o = self.intern(object, config);
            self.nodes[s.index()].synonyms.push(o);
            self.nodes[o.index()].synonyms.push(s);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn lookup(&self, iri: &str) -> Option<NodeId> {
        self.by_iri.get(iri).copied()
    }

    /// Nodes whose lower-cased entry word is `word`.
    pub fn nodes_for_word(&self, word: &str) -> &[NodeId] {
        self.by_word.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OWL_CLASS, OWL_EQUIVALENT_CLASS, RDFS_SUBCLASS_OF, RDF_TYPE};

    #[test]
    fn test_adjacency_in_both_directions() {
        let config = OntologyConfig::default();
        let triples = vec![
            Triple::new("http://x#Animal", RDF_TYPE, OWL_CLASS),
            Triple::new("http://x#Dog", RDFS_SUBCLASS_OF, "http://x#Animal"),
            Triple::new("http://x#Hound", OWL_EQUIVALENT_CLASS, "http://x#Dog"),
            Triple::new("http://x#Rex", RDF_TYPE, "http://x#Dog"),
        ];
        let graph = OntologyGraph::from_triples(&triples, &config);
        assert_eq!(graph.len(), 4);
        let animal = graph.lookup("http://x#Animal").unwrap();
        let dog = graph.lookup("http://x#Dog").unwrap();
        let hound = graph.lookup("http://x#Hound").unwrap();
        let rex = graph.lookup("http://x#Rex").unwrap();
        assert!(graph.node(animal).is_class);
        assert_eq!(graph.node(animal).hyponyms, vec![dog]);
        assert_eq!(graph.node(dog).hypernyms, vec![animal]);
        assert_eq!(graph.node(dog).synonyms, vec![hound]);
        assert_eq!(graph.node(hound).synonyms, vec![dog]);
        assert_eq!(graph.node(dog).instances, vec![rex]);
        assert_eq!(graph.nodes_for_word("hound"), &[hound]);
    }
}
