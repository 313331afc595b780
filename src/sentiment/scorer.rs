//! Lexicon scorer and conversation-level summaries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::lexicon::SentimentWordList;
use crate::tokenizer::Tokenizer;

/// Sentiment label of a message or conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Label for an additive lexicon score.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s > 0 => Self::Positive,
            s if s < 0 => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        };
        write!(f, "{s}")
    }
}

/// Detailed result of scoring one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentAnalysis {
    pub label: Sentiment,
    /// Sum of token weights.
    pub score: i32,
    pub positive_hits: usize,
    pub negative_hits: usize,
}

/// Number of most recent turns inspected for a negative streak.
pub const RECENT_WINDOW: usize = 5;

/// Negative turns within [`RECENT_WINDOW`] that mark a sustained low mood.
pub const NEGATIVE_STREAK: usize = 3;

/// Sentiment across a whole conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub turns: usize,
    pub average_score: f64,
    pub label: Sentiment,
    /// Negative turns among the last [`RECENT_WINDOW`].
    pub recent_negative: usize,
    /// Set once `recent_negative` reaches [`NEGATIVE_STREAK`].
    pub sustained_negative: bool,
}

impl SentimentSummary {
    /// Average the per-message scores; the sign of the average is the label.
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let scores: Vec<i32> = scores.into_iter().collect();
        let turns = scores.len();
        let total: i64 = scores.iter().map(|&s| i64::from(s)).sum();
        let recent_negative = scores
            .iter()
            .rev()
            .take(RECENT_WINDOW)
            .filter(|&&s| s < 0)
            .count();

        if turns == 0 {
            return Self {
                turns: 0,
                average_score: 0.0,
                label: Sentiment::Neutral,
                recent_negative: 0,
                sustained_negative: false,
            };
        }

        let average_score = total as f64 / turns as f64;
        let label = if average_score > 0.0 {
            Sentiment::Positive
        } else if average_score < 0.0 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };

        Self {
            turns,
            average_score,
            label,
            recent_negative,
            sustained_negative: recent_negative >= NEGATIVE_STREAK,
        }
    }
}

/// Maps text to a sentiment by summing per-token lexicon weights.
pub struct LexiconScorer {
    lexicon: Arc<SentimentWordList>,
    tokenizer: Arc<Tokenizer>,
}

impl LexiconScorer {
    pub fn new(lexicon: Arc<SentimentWordList>, tokenizer: Arc<Tokenizer>) -> Self {
        Self { lexicon, tokenizer }
    }

    /// Score a message. Never fails; text with no lexicon terms is `Neutral`.
    pub fn score(&self, text: &str) -> Sentiment {
        self.analyze(text).label
    }

    /// Score a message and report the contributing hits.
    pub fn analyze(&self, text: &str) -> SentimentAnalysis {
        let mut positive_hits = 0;
        let mut negative_hits = 0;

        for token in self.tokenizer.tokenize(text) {
            match self.lexicon.weight(&token) {
                1 => positive_hits += 1,
                -1 => negative_hits += 1,
                _ => {}
            }
        }

        let score = positive_hits as i32 - negative_hits as i32;
        SentimentAnalysis {
            label: Sentiment::from_score(score),
            score,
            positive_hits,
            negative_hits,
        }
    }

    /// Summarize a batch of messages as one conversation.
    pub fn summarize<'a, I>(&self, messages: I) -> SentimentSummary
    where
        I: IntoIterator<Item = &'a str>,
    {
        SentimentSummary::from_scores(messages.into_iter().map(|m| self.analyze(m).score))
    }
}
