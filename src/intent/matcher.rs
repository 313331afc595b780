//! Pairs classifier output with a canned reply.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, warn};

use super::classifier::IntentClassifier;
use super::responses::ResponseTable;
use crate::error::{ArtifactError, ClassifierError, IntentError};

/// Default upper bound on one classifier call.
pub const DEFAULT_CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(2);

/// A classified message and its reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedIntent {
    pub intent: String,
    pub confidence: f32,
    pub reply: String,
}

/// Classifies messages and looks their intent up in the response table.
#[derive(Clone)]
pub struct IntentMatcher {
    classifier: Arc<dyn IntentClassifier>,
    responses: Arc<ResponseTable>,
    timeout: Duration,
}

impl IntentMatcher {
    pub fn new(classifier: Arc<dyn IntentClassifier>, responses: Arc<ResponseTable>) -> Self {
        Self {
            classifier,
            responses,
            timeout: DEFAULT_CLASSIFIER_TIMEOUT,
        }
    }

    /// Override the classifier timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that every label the classifier can emit has a response.
    pub fn verify_coverage(&self) -> Result<(), ArtifactError> {
        let labels = self.classifier.labels();
        let missing = self.responses.missing(labels.iter().map(String::as_str));
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ArtifactError::MissingResponses { labels: missing })
        }
    }

    /// Classify `text` and return the reply for its intent.
    ///
    /// A label absent from the response table is an error, never a fallback.
    pub async fn respond(&self, text: &str) -> Result<MatchedIntent, IntentError> {
        let prediction = tokio::time::timeout(self.timeout, self.classifier.predict(text))
            .await
            .map_err(|_| {
                warn!(
                    classifier = self.classifier.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Classifier timed out"
                );
                ClassifierError::Timeout {
                    name: self.classifier.name().to_string(),
                    timeout: self.timeout,
                }
            })??;

        debug!(
            intent = %prediction.label,
            confidence = prediction.confidence,
            method = ?prediction.method,
            "Message classified"
        );

        let reply = self.responses.reply(&prediction.label).ok_or_else(|| {
            error!(intent = %prediction.label, "Classifier emitted intent with no response");
            IntentError::UnknownIntent {
                label: prediction.label.clone(),
            }
        })?;

        Ok(MatchedIntent {
            intent: prediction.label,
            confidence: prediction.confidence,
            reply,
        })
    }
}
