//! Ontology matching.
//!
//! A search word matches its synonyms, hyponyms and individuals, and with
//! symmetric matching also its hypernyms. Each match carries the number of
//! hyponym hops between the two words: positive below the search word,
//! negative above it, zero for synonyms.

use crate::config::OntologyConfig;
use crate::error::{OntologyError, Result};
use crate::graph::{NodeId, OntologyGraph, Triple};
use ahash::AHashSet;
use dashmap::DashMap;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// Entries
// ============================================================================

/// A word related to a search word through the ontology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Entry word with case preserved.
    pub word: String,
    pub depth: i32,
    pub is_individual: bool,
    /// Lower-cased forms a document word may take to match this entry.
    pub reprs: Vec<String>,
}

impl Entry {
    pub fn new(word: &str, depth: i32, is_individual: bool) -> Self {
        Self {
            word: word.to_string(),
            depth,
            is_individual,
            reprs: vec![word.to_lowercase()],
        }
    }

    fn sort_key(&self) -> (i32, bool, &str) {
        (self.depth.abs(), self.depth < 0, &self.word)
    }
}

#[derive(Debug, Clone, Copy)]
struct Visit {
    node: NodeId,
    depth: i32,
    is_individual: bool,
    is_hypernym: bool,
}

// ============================================================================
// Formats
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OntologyFormat {
    NTriples,
    Turtle,
    RdfXml,
}

impl OntologyFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        match ext.to_ascii_lowercase().as_str() {
            "nt" | "ntriples" => Ok(Self::NTriples),
            "ttl" | "turtle" => Ok(Self::Turtle),
            "owl" | "rdf" | "xml" => Ok(Self::RdfXml),
            _ => Err(OntologyError::UnsupportedFormat(ext.to_string())),
        }
    }
}

#[cfg(feature = "rdf")]
fn parse_rich(bytes: &[u8], format: OntologyFormat) -> Result<Vec<Triple>> {
    use crate::rdf::{parse_rdf_bytes, RdfFormat};
    let format = match format {
        OntologyFormat::NTriples => RdfFormat::NTriples,
        OntologyFormat::Turtle => RdfFormat::Turtle,
        OntologyFormat::RdfXml => RdfFormat::RdfXml,
    };
    parse_rdf_bytes(bytes, format)
}

#[cfg(not(feature = "rdf"))]
fn parse_rich(_bytes: &[u8], _format: OntologyFormat) -> Result<Vec<Triple>> {
    Err(OntologyError::FeatureNotEnabled)
}

/// Parses an ontology resource into triples.
///
/// N-Triples always go through the built-in line loader, which also accepts
/// prefixed names; Turtle and RDF/XML need the `rdf` feature.
pub fn parse_resource(bytes: &[u8], format: OntologyFormat) -> Result<Vec<Triple>> {
    match format {
        OntologyFormat::NTriples => {
            let content = std::str::from_utf8(bytes).map_err(|e| OntologyError::Parse {
                line: 0,
                message: format!("resource is not UTF-8: {e}"),
            })?;
            crate::loader::parse_triples(content)
        }
        OntologyFormat::Turtle | OntologyFormat::RdfXml => parse_rich(bytes, format),
    }
}

// ============================================================================
// Ontology
// ============================================================================

/// A loaded ontology with its per-word match cache.
///
/// The cache is filled for every class and individual at construction time
/// and is only extended afterwards through [`Ontology::add_to_dictionary`],
/// so an `Ontology` can be shared between matching threads.
#[derive(Debug)]
pub struct Ontology {
    graph: OntologyGraph,
    config: OntologyConfig,
    match_cache: DashMap<String, Arc<Vec<Entry>>>,
    ancestor_cache: DashMap<String, Option<String>>,
    words: AHashSet<String>,
    multiwords: AHashSet<String>,
}

impl Ontology {
    pub fn from_triples(triples: &[Triple], config: OntologyConfig) -> Self {
        let graph = OntologyGraph::from_triples(triples, &config);
        let mut ontology = Self {
            graph,
            config,
            match_cache: DashMap::new(),
            ancestor_cache: DashMap::new(),
            words: AHashSet::new(),
            multiwords: AHashSet::new(),
        };
        ontology.precompute();
        ontology.refresh_words();
        tracing::debug!(
            nodes = ontology.graph.len(),
            keys = ontology.match_cache.len(),
            symmetric = ontology.config.symmetric_matching,
            "loaded ontology"
        );
        ontology
    }

    pub fn parse_str(content: &str, format: OntologyFormat, config: OntologyConfig) -> Result<Self> {
        let triples = parse_resource(content.as_bytes(), format)?;
        Ok(Self::from_triples(&triples, config))
    }

    pub fn load(path: impl AsRef<Path>, config: OntologyConfig) -> Result<Self> {
        Self::load_paths(&[path.as_ref()], config)
    }

    /// Loads several resources into a single ontology.
    pub fn load_paths<P: AsRef<Path>>(paths: &[P], config: OntologyConfig) -> Result<Self> {
        let mut triples = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let format = OntologyFormat::from_path(path)?;
            let bytes = std::fs::read(path).map_err(|source| OntologyError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            triples.extend(parse_resource(&bytes, format)?);
        }
        Ok(Self::from_triples(&triples, config))
    }

    pub fn config(&self) -> &OntologyConfig {
        &self.config
    }

    pub fn graph(&self) -> &OntologyGraph {
        &self.graph
    }

    fn precompute(&self) {
        for (_, node) in self.graph.iter() {
            if node.is_class || node.is_individual {
                self.add_to_dictionary(&node.word);
            }
        }
    }

    /// Returns the match set of a search word, computing and caching it on
    /// first use. Words that name no class or individual have no entries.
    pub fn add_to_dictionary(&self, word: &str) -> Arc<Vec<Entry>> {
        let key = word.to_lowercase();
        if let Some(entries) = self.match_cache.get(&key) {
            return Arc::clone(entries.value());
        }
        let is_known = self.graph.nodes_for_word(&key).iter().any(|&id| {
            let node = self.graph.node(id);
            node.is_class || node.is_individual
        });
        if !is_known {
            return Arc::new(Vec::new());
        }
        let entries = Arc::new(self.collect_entries(&key, self.config.symmetric_matching));
        Arc::clone(self.match_cache.entry(key).or_insert(entries).value())
    }

    fn collect_entries(&self, key: &str, symmetric: bool) -> Vec<Entry> {
        let mut entries: Vec<Entry> = Vec::new();
        let starts = self.graph.nodes_for_word(key);
        let classes = starts.iter().filter(|&&id| self.graph.node(id).is_class);
        let individuals = starts.iter().filter(|&&id| self.graph.node(id).is_individual);
        for (&start, is_individual) in classes
            .map(|id| (id, false))
            .chain(individuals.map(|id| (id, true)))
        {
            for entry in self.traverse(start, key, is_individual, symmetric) {
                match entries.iter_mut().find(|e| e.word == entry.word) {
                    Some(existing) if entry.depth.abs() < existing.depth.abs() => *existing = entry,
                    Some(_) => {}
                    None => entries.push(entry),
                }
            }
        }
        entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        entries
    }

    /// Breadth-first walk from one start node. Synonym hops cost nothing, so
    /// every node is reached first along a path of minimal absolute depth.
    /// Hypernym walks never turn downwards again.
    fn traverse(&self, start: NodeId, key: &str, is_individual: bool, symmetric: bool) -> Vec<Entry> {
        let mut entries = Vec::new();
        // Downward and upward walks keep separate visited sets so that a
        // node first reached from below can still lead further up.
        let mut visited_down = RoaringBitmap::new();
        let mut visited_up = RoaringBitmap::new();
        let mut queue = VecDeque::from([Visit {
            node: start,
            depth: 0,
            is_individual,
            is_hypernym: false,
        }]);
        while let Some(visit) = queue.pop_front() {
            let visited = if visit.is_hypernym {
                &mut visited_up
            } else {
                &mut visited_down
            };
            if !visited.insert(visit.node.0) {
                continue;
            }
            let node = self.graph.node(visit.node);
            if !node.word.is_empty() && node.word.to_lowercase() != key {
                entries.push(Entry::new(&node.word, visit.depth, visit.is_individual));
            }
            for &synonym in &node.synonyms {
                queue.push_front(Visit {
                    node: synonym,
                    depth: visit.depth,
                    is_individual: false,
                    is_hypernym: visit.is_hypernym,
                });
            }
            if !visit.is_hypernym {
                for &hyponym in &node.hyponyms {
                    queue.push_back(Visit {
                        node: hyponym,
                        depth: visit.depth + 1,
                        is_individual: false,
                        is_hypernym: false,
                    });
                }
                for &instance in &node.instances {
                    queue.push_back(Visit {
                        node: instance,
                        depth: visit.depth + 1,
                        is_individual: true,
                        is_hypernym: false,
                    });
                }
            }
            if symmetric && visit.depth <= 0 {
                let upwards = node.hypernyms.iter().chain(
                    node.types
                        .iter()
                        .filter(|_| visit.is_individual),
                );
                for &hypernym in upwards {
                    queue.push_back(Visit {
                        node: hypernym,
                        depth: visit.depth - 1,
                        is_individual: false,
                        is_hypernym: true,
                    });
                }
            }
        }
        entries
    }

    /// Rebuilds the word sets from the match cache keys and entry reprs.
    fn refresh_words(&mut self) {
        self.words.clear();
        self.multiwords.clear();
        for item in self.match_cache.iter() {
            let reprs = std::iter::once(item.key()).chain(item.value().iter().flat_map(|e| &e.reprs));
            for repr in reprs {
                if repr.contains(' ') {
                    self.multiwords.insert(repr.clone());
                }
                self.words.insert(repr.clone());
            }
        }
    }

    /// Adds derived forms to every entry and derived aliases for every key.
    ///
    /// `derive` maps a lower-cased, possibly multiword form to its derived
    /// form; a form without one maps to itself.
    pub fn update_with_derived_forms(&mut self, derive: impl Fn(&str) -> String) {
        let keys: Vec<String> = self.match_cache.iter().map(|item| item.key().clone()).collect();
        for key in &keys {
            if let Some(mut item) = self.match_cache.get_mut(key) {
                let updated: Vec<Entry> = item
                    .value()
                    .iter()
                    .map(|entry| {
                        let mut entry = entry.clone();
                        let derived = derive(&entry.word.to_lowercase());
                        if !entry.reprs.contains(&derived) {
                            entry.reprs.push(derived);
                        }
                        entry
                    })
                    .collect();
                *item.value_mut() = Arc::new(updated);
            }
        }
        for key in &keys {
            let derived_key = derive(key);
            if self.match_cache.contains_key(&derived_key) {
                continue;
            }
            let entries = self.match_cache.get(key).map(|item| Arc::clone(item.value()));
            if let Some(entries) = entries {
                self.match_cache.insert(derived_key, entries);
            }
        }
        self.refresh_words();
    }

    /// First entry of `search_word`'s match set one of whose reprs equals a
    /// candidate, compared case-insensitively.
    pub fn matches<S: AsRef<str>>(&self, search_word: &str, candidates: &[S]) -> Option<Entry> {
        let entries = self.get_matching_entries(search_word);
        let candidates: Vec<String> = candidates.iter().map(|c| c.as_ref().to_lowercase()).collect();
        entries
            .iter()
            .find(|entry| candidates.iter().any(|c| entry.reprs.contains(c)))
            .cloned()
    }

    pub fn get_matching_entries(&self, search_word: &str) -> Arc<Vec<Entry>> {
        match self.match_cache.get(&search_word.to_lowercase()) {
            Some(entries) => Arc::clone(entries.value()),
            None => Arc::new(Vec::new()),
        }
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn contains_multiword(&self, multiword: &str) -> bool {
        self.multiwords.contains(&multiword.to_lowercase())
    }

    /// Every key and entry representation, lower-cased.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Number of search words with a match set.
    pub fn len(&self) -> usize {
        self.match_cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.match_cache.is_empty()
    }

    /// The most general hypernym of `word`, preferring the alphabetically
    /// first among equally general ones; `word` itself when it has none.
    pub fn get_most_general_hypernym_ancestor(&self, word: &str) -> String {
        let key = word.to_lowercase();
        if let Some(cached) = self.ancestor_cache.get(&key) {
            return cached.value().clone().unwrap_or_else(|| word.to_string());
        }
        let ancestor = self
            .collect_entries(&key, true)
            .into_iter()
            .filter(|entry| entry.depth < 0)
            .min_by(|a, b| (a.depth, &a.word).cmp(&(b.depth, &b.word)))
            .map(|entry| entry.word);
        self.ancestor_cache.insert(key, ancestor.clone());
        ancestor.unwrap_or_else(|| word.to_string())
    }
}
