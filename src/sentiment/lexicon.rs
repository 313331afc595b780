//! Positive/negative word lists.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::ArtifactError;

const BUILTIN_POSITIVE: &[&str] = &[
    "happy", "joy", "joyful", "cheerful", "delighted", "pleased", "blessed", "thrilled",
    "excited", "pumped", "stoked", "eager", "enthusiastic", "proud", "accomplished", "success",
    "won", "victory", "grateful", "thankful", "appreciate", "lucky", "fortunate", "relieved",
    "relief", "loved", "appreciated", "valued", "cherished", "supported", "hopeful",
    "optimistic", "confident", "good", "great", "awesome", "amazing", "love", "wonderful",
    "fantastic", "excellent", "glad", "nice", "better", "calm", "fine",
];

const BUILTIN_NEGATIVE: &[&str] = &[
    "sad", "depressed", "unhappy", "miserable", "crying", "heartbroken", "gloomy", "tears",
    "angry", "mad", "furious", "rage", "annoyed", "irritated", "frustrated", "anxious",
    "worried", "nervous", "stressed", "overwhelmed", "panic", "tense", "lonely", "isolated",
    "abandoned", "guilty", "ashamed", "regret", "jealous", "envious", "disappointed", "failed",
    "upset", "hurt", "betrayed", "scared", "afraid", "terrified", "confused", "tired",
    "exhausted", "drained", "hopeless", "pointless", "insecure", "inadequate", "worthless",
    "bad", "terrible", "awful", "hate", "horrible", "worse", "sick", "pain",
];

/// On-disk form of a lexicon artifact.
#[derive(Debug, Deserialize)]
struct LexiconFile {
    positive: Vec<String>,
    negative: Vec<String>,
}

/// Two disjoint sets of sentiment-bearing terms.
#[derive(Debug, Clone)]
pub struct SentimentWordList {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl SentimentWordList {
    /// Build a word list. Terms are lower-cased and trimmed; blanks are dropped.
    ///
    /// Fails if any term appears in both sets.
    pub fn new<P, N>(positive: P, negative: N) -> Result<Self, ArtifactError>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let positive = normalize_terms(positive);
        let negative = normalize_terms(negative);

        let mut overlap: Vec<String> = positive.intersection(&negative).cloned().collect();
        if !overlap.is_empty() {
            overlap.sort();
            return Err(ArtifactError::LexiconOverlap { terms: overlap });
        }

        Ok(Self { positive, negative })
    }

    /// The lexicon compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            positive: normalize_terms(BUILTIN_POSITIVE),
            negative: normalize_terms(BUILTIN_NEGATIVE),
        }
    }

    /// Load a `{"positive": [...], "negative": [...]}` artifact.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let file: LexiconFile = crate::artifacts::read_json(path)?;
        Self::new(file.positive, file.negative)
    }

    /// Weight of a single (already normalized) token: +1, -1 or 0.
    pub fn weight(&self, token: &str) -> i32 {
        if self.positive.contains(token) {
            1
        } else if self.negative.contains(token) {
            -1
        } else {
            0
        }
    }

    pub fn positive_len(&self) -> usize {
        self.positive.len()
    }

    pub fn negative_len(&self) -> usize {
        self.negative.len()
    }
}

fn normalize_terms<I>(terms: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
