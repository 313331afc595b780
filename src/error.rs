//! Error types for the chat companion.

use std::path::PathBuf;
use std::time::Duration;

use uuid::Uuid;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Intent error: {0}")]
    Intent(#[from] IntentError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures while loading the serialized artifacts at startup.
///
/// All of these are fatal to process start.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid pattern for {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Lexicon terms are both positive and negative: {}", terms.join(", "))]
    LexiconOverlap { terms: Vec<String> },

    #[error("Response for intent {intent} is empty")]
    EmptyResponse { intent: String },

    #[error("Invalid intent model: {0}")]
    InvalidModel(String),

    #[error("Response table has no entry for intents: {}", labels.join(", "))]
    MissingResponses { labels: Vec<String> },
}

/// Errors raised by an intent classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Classifier {name} timed out after {timeout:?}")]
    Timeout { name: String, timeout: Duration },

    #[error("Classifier {name} failed: {reason}")]
    Failed { name: String, reason: String },
}

/// Errors from matching a message to a reply.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("Classifier returned intent {label} which has no response")]
    UnknownIntent { label: String },

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Session lookup errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session {id} not found")]
    NotFound { id: Uuid },

    #[error("Invalid session id: {0}")]
    InvalidId(String),
}

/// Result type alias for the chat companion.
pub type Result<T> = std::result::Result<T, Error>;
