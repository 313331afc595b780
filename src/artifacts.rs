//! Loading of the serialized artifacts consumed at process start.
//!
//! Every artifact is read once and shared read-only afterwards. Any failure
//! here is an [`ArtifactError`] and aborts startup.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::ArtifactPaths;
use crate::error::ArtifactError;
use crate::intent::{ResponseTable, RuleClassifier};
use crate::sentiment::SentimentWordList;
use crate::tokenizer::Tokenizer;

/// Read and deserialize a JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Everything loaded from disk.
pub struct Artifacts {
    pub tokenizer: Arc<Tokenizer>,
    pub classifier: Arc<RuleClassifier>,
    pub responses: Arc<ResponseTable>,
    pub lexicon: Arc<SentimentWordList>,
}

impl Artifacts {
    /// Load all artifacts named by `paths`.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let tokenizer = Arc::new(Tokenizer::load(&paths.tokenizer)?);
        let classifier = Arc::new(RuleClassifier::load(
            &paths.intent_model,
            Arc::clone(&tokenizer),
        )?);
        let responses = Arc::new(ResponseTable::load(&paths.responses)?);
        let lexicon = Arc::new(match &paths.lexicon {
            Some(path) => SentimentWordList::load(path)?,
            None => SentimentWordList::builtin(),
        });

        info!(
            intents = classifier.intent_count(),
            responses = responses.len(),
            positive_terms = lexicon.positive_len(),
            negative_terms = lexicon.negative_len(),
            custom_lexicon = paths.lexicon.is_some(),
            "Artifacts loaded"
        );

        Ok(Self {
            tokenizer,
            classifier,
            responses,
            lexicon,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    /// Write the three required artifacts into `dir`.
    pub fn write_artifacts(dir: &Path) {
        std::fs::write(
            dir.join("tokenizer.json"),
            r#"{"lowercase": true, "token_pattern": "[\\p{L}\\p{N}]+"}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("intent_model.json"),
            r#"{
                "fallback": "general",
                "intents": [
                    {"label": "greeting", "keywords": ["hi", "hello"]},
                    {"label": "bye", "keywords": ["bye", "see you"], "confidence": 0.9}
                ]
            }"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("responses.json"),
            r#"{
                "greeting": "Hi! What's on your mind today?",
                "bye": ["Take care!", "See you later!"],
                "general": "I'm listening. Tell me more?"
            }"#,
        )
        .unwrap();
    }
}
