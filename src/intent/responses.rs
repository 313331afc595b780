//! Intent → canned response table.

use std::collections::HashMap;
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::ArtifactError;

/// A response entry: a fixed reply, or alternatives picked at random.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResponseEntry {
    Single(String),
    Alternatives(Vec<String>),
}

impl ResponseEntry {
    /// Pick the reply text.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        match self {
            Self::Single(text) => text.as_str(),
            // Alternatives are non-empty once validated by the table.
            Self::Alternatives(options) => options.choose(rng).map(String::as_str).unwrap_or(""),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.trim().is_empty(),
            Self::Alternatives(options) => {
                options.is_empty() || options.iter().any(|o| o.trim().is_empty())
            }
        }
    }
}

/// Immutable mapping from intent label to response.
#[derive(Debug, Clone, Default)]
pub struct ResponseTable {
    entries: HashMap<String, ResponseEntry>,
}

impl ResponseTable {
    /// Build a table, rejecting empty responses.
    pub fn new(entries: HashMap<String, ResponseEntry>) -> Result<Self, ArtifactError> {
        if let Some((intent, _)) = entries.iter().find(|(_, entry)| entry.is_empty()) {
            return Err(ArtifactError::EmptyResponse {
                intent: intent.clone(),
            });
        }
        Ok(Self { entries })
    }

    /// Load a JSON object of `intent: reply | [replies]`.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let entries: HashMap<String, ResponseEntry> = crate::artifacts::read_json(path)?;
        Self::new(entries)
    }

    pub fn get(&self, intent: &str) -> Option<&ResponseEntry> {
        self.entries.get(intent)
    }

    pub fn contains(&self, intent: &str) -> bool {
        self.entries.contains_key(intent)
    }

    /// Reply for `intent`, choosing among alternatives with `rng`.
    pub fn reply_with<R: Rng + ?Sized>(&self, intent: &str, rng: &mut R) -> Option<String> {
        self.get(intent).map(|entry| entry.pick(rng).to_string())
    }

    /// Reply for `intent` using the thread-local RNG.
    pub fn reply(&self, intent: &str) -> Option<String> {
        self.reply_with(intent, &mut rand::thread_rng())
    }

    /// Labels from `labels` that have no entry, sorted.
    pub fn missing<'a, I>(&self, labels: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut missing: Vec<String> = labels
            .into_iter()
            .filter(|label| !self.contains(label))
            .map(str::to_string)
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ResponseEntry)> for ResponseTable {
    /// Collects without validation; intended for code-built tables.
    fn from_iter<T: IntoIterator<Item = (K, ResponseEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
