//! Text normalization shared by the sentiment scorer and the intent classifier.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::ArtifactError;

/// Letters and digits; everything else (whitespace, punctuation) separates tokens.
pub const DEFAULT_TOKEN_PATTERN: &str = r"[\p{L}\p{N}]+";

/// On-disk form of the tokenizer artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerSpec {
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

/// Regex-driven tokenizer.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    lowercase: bool,
    token_re: Regex,
}

impl Tokenizer {
    /// Build a tokenizer from its artifact description.
    pub fn from_spec(spec: &TokenizerSpec) -> Result<Self, ArtifactError> {
        let token_re =
            Regex::new(&spec.token_pattern).map_err(|source| ArtifactError::InvalidPattern {
                name: "tokenizer.token_pattern".to_string(),
                source,
            })?;
        Ok(Self {
            lowercase: spec.lowercase,
            token_re,
        })
    }

    /// Load a tokenizer artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let spec: TokenizerSpec = crate::artifacts::read_json(path)?;
        Self::from_spec(&spec)
    }

    /// Split text into tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        self.token_re
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Tokens joined by a single space.
    pub fn normalize(&self, text: &str) -> String {
        self.tokenize(text).join(" ")
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            lowercase: true,
            token_re: Regex::new(DEFAULT_TOKEN_PATTERN).expect("default token pattern is valid"),
        }
    }
}
