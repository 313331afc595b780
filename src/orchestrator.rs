//! Response orchestrator — composes scoring, intent matching and tracking.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::artifacts::Artifacts;
use crate::config::ChatConfig;
use crate::conversation::{ConversationHistory, Turn};
use crate::error::{ArtifactError, IntentError};
use crate::intent::{IntentMatcher, personalize};
use crate::sentiment::{LexiconScorer, Sentiment, SentimentSummary};

/// What the web layer gets back for one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub reply: String,
    pub sentiment: Sentiment,
    pub score: i32,
    pub intent: String,
}

/// Handles one incoming message end to end.
pub struct ResponseOrchestrator {
    scorer: LexiconScorer,
    matcher: IntentMatcher,
}

impl ResponseOrchestrator {
    pub fn new(scorer: LexiconScorer, matcher: IntentMatcher) -> Self {
        Self { scorer, matcher }
    }

    /// Wire the loaded artifacts together and check that every intent the
    /// classifier can emit has a response.
    pub fn from_artifacts(
        artifacts: Artifacts,
        classifier_timeout: Duration,
    ) -> Result<Self, ArtifactError> {
        let scorer = LexiconScorer::new(artifacts.lexicon, Arc::clone(&artifacts.tokenizer));
        let matcher = IntentMatcher::new(artifacts.classifier, artifacts.responses)
            .with_timeout(classifier_timeout);
        matcher.verify_coverage()?;
        Ok(Self::new(scorer, matcher))
    }

    /// Load the artifacts named by `config` and build from them.
    pub fn from_config(config: &ChatConfig) -> crate::error::Result<Self> {
        let artifacts = Artifacts::load(&config.artifacts)?;
        Ok(Self::from_artifacts(artifacts, config.classifier_timeout)?)
    }

    /// Score `text`, match its intent, and record the turn in `history`.
    ///
    /// If matching fails nothing is recorded.
    pub async fn handle(
        &self,
        history: &mut ConversationHistory,
        text: &str,
    ) -> Result<Reply, IntentError> {
        debug!(message = %text, "Handling message");

        let analysis = self.scorer.analyze(text);
        let matched = self.matcher.respond(text).await?;
        let reply = personalize(&matched.reply, text);

        info!(
            intent = %matched.intent,
            confidence = matched.confidence,
            sentiment = %analysis.label,
            score = analysis.score,
            "Message handled"
        );

        history.record(Turn::new(
            text,
            analysis.label,
            analysis.score,
            matched.intent.clone(),
            matched.confidence,
            reply.clone(),
        ));

        Ok(Reply {
            reply,
            sentiment: analysis.label,
            score: analysis.score,
            intent: matched.intent,
        })
    }

    /// Conversation-level sentiment for a history.
    pub fn summarize(&self, history: &ConversationHistory) -> SentimentSummary {
        history.summary()
    }
}
