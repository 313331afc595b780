//! The classifier capability.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ClassifierError;

/// How a prediction was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionMethod {
    /// A declared intent matched the message.
    Rule,
    /// Nothing matched; the classifier's fallback label was used.
    Fallback,
}

/// Output of a single classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentPrediction {
    pub label: String,
    pub confidence: f32,
    pub method: PredictionMethod,
}

impl IntentPrediction {
    pub fn new(label: impl Into<String>, confidence: f32, method: PredictionMethod) -> Self {
        Self {
            label: label.into(),
            confidence,
            method,
        }
    }
}

/// Anything that can map a message to an intent label.
///
/// Implementations may be local (rule tables) or remote services; callers
/// bound each `predict` call with a timeout.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Every label this classifier can emit.
    fn labels(&self) -> Vec<String>;

    /// Classify one message.
    async fn predict(&self, text: &str) -> Result<IntentPrediction, ClassifierError>;
}
