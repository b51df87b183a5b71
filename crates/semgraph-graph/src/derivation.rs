//! Derivational dictionary.
//!
//! Each line lists a family of derivationally related words separated by
//! commas. Every member maps to the first word of its line:
//!
//! ```text
//! decide, decision
//! nationalize, nationalization, nationalisation
//! ```

use ahash::AHashMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct DerivationalDictionary {
    entries: AHashMap<String, String>,
}

impl DerivationalDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the comma-separated family format; blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Self {
        let mut entries = AHashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let words: Vec<&str> = line
                .split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .collect();
            let Some(first) = words.first() else {
                continue;
            };
            for word in &words {
                entries.insert(word.to_string(), first.to_string());
            }
        }
        Self { entries }
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
