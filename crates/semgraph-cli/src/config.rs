//! Loading of the optional JSON configuration and of the resources the
//! commands share: adapter, ontology and input parses.

use anyhow::{Context, Result};
use semgraph_graph::{DerivationalDictionary, Lexicon, MatchingConfig, RawDocument};
use semgraph_lang_en::EnglishAdapter;
use semgraph_matching::Matcher;
use semgraph_ontology::{Ontology, OntologyConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Contents of a `--config` file. Missing sections take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub matching: MatchingConfig,
    pub ontology: OntologyConfig,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .matching
            .validate()
            .with_context(|| format!("validating config {}", path.display()))?;
        Ok(config)
    }
}

/// Resources shared by the adapter-dependent commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ResourceArgs {
    /// JSON configuration file (`matching` and `ontology` sections)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON object mapping lemmas to word vectors
    #[arg(long)]
    pub vectors: Option<PathBuf>,

    /// Derivational dictionary: one comma-separated word family per line
    #[arg(long)]
    pub derivations: Option<PathBuf>,

    /// Ontology file (.nt, .ttl, .owl/.rdf)
    #[arg(long)]
    pub ontology: Option<PathBuf>,
}

impl ResourceArgs {
    pub fn adapter(&self) -> Result<EnglishAdapter> {
        let mut adapter = EnglishAdapter::new();
        if let Some(path) = &self.vectors {
            let vectors: BTreeMap<String, Vec<f32>> = read_json(path)?;
            let lexicon = vectors
                .into_iter()
                .fold(Lexicon::new(), |lexicon, (lemma, vector)| lexicon.with_vector(&lemma, vector));
            adapter = adapter.with_lexicon(lexicon);
        }
        if let Some(path) = &self.derivations {
            let dictionary = DerivationalDictionary::load(path)
                .with_context(|| format!("reading derivations {}", path.display()))?;
            adapter = adapter.with_derivational_dictionary(dictionary);
        }
        Ok(adapter)
    }

    pub fn load_ontology(&self, config: &CliConfig) -> Result<Option<Ontology>> {
        self.ontology
            .as_ref()
            .map(|path| {
                Ontology::load(path, config.ontology.clone())
                    .with_context(|| format!("loading ontology {}", path.display()))
            })
            .transpose()
    }

    pub fn matcher(&self) -> Result<Matcher> {
        let config = CliConfig::load(self.config.as_deref())?;
        let adapter = Arc::new(self.adapter()?);
        let matcher = match self.load_ontology(&config)? {
            Some(ontology) => Matcher::with_ontology(adapter, config.matching, ontology)?,
            None => Matcher::new(adapter, config.matching)?,
        };
        Ok(matcher)
    }
}

pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// A single parse, or an object mapping labels to parses.
pub fn read_labeled_parses(path: &Path) -> Result<BTreeMap<String, RawDocument>> {
    let value: serde_json::Value = read_json(path)?;
    if value.get("tokens").is_some() {
        let label = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
            .to_string();
        let raw: RawDocument =
            serde_json::from_value(value).with_context(|| format!("parsing {}", path.display()))?;
        return Ok(BTreeMap::from([(label, raw)]));
    }
    serde_json::from_value(value).with_context(|| format!("parsing labelled parses in {}", path.display()))
}

pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => std::fs::write(path, text).with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_take_defaults() {
        let config: CliConfig =
            serde_json::from_str(r#"{"matching": {"overall_similarity_threshold": 0.85}}"#).unwrap();
        assert_eq!(config.matching.overall_similarity_threshold, 0.85);
        assert!(config.matching.perform_coreference_resolution);
        assert_eq!(config.ontology, OntologyConfig::default());
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"matching": {"overall_similarity_threshold": 1.5}}"#).unwrap();
        assert!(CliConfig::load(Some(&path)).is_err());
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }
}
