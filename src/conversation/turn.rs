//! A single recorded exchange.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::sentiment::Sentiment;

/// One user message, its sentiment, the matched intent and the bot reply.
///
/// Created once per handled message and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub id: Uuid,
    pub message: String,
    pub sentiment: Sentiment,
    /// Raw lexicon score behind `sentiment`.
    pub score: i32,
    pub intent: String,
    pub confidence: f32,
    pub reply: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(
        message: impl Into<String>,
        sentiment: Sentiment,
        score: i32,
        intent: impl Into<String>,
        confidence: f32,
        reply: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            sentiment,
            score,
            intent: intent.into(),
            confidence,
            reply: reply.into(),
            timestamp: Utc::now(),
        }
    }
}
