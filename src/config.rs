//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// How the process talks to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// HTTP server with the chat page and JSON API.
    Web,
    /// Terminal REPL over stdin/stdout.
    Cli,
}

/// Locations of the serialized artifacts loaded at startup.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub intent_model: PathBuf,
    pub tokenizer: PathBuf,
    pub responses: PathBuf,
    /// `None` means the built-in lexicon.
    pub lexicon: Option<PathBuf>,
}

impl ArtifactPaths {
    /// Default file names inside an artifacts directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            intent_model: dir.join("intent_model.json"),
            tokenizer: dir.join("tokenizer.json"),
            responses: dir.join("responses.json"),
            lexicon: None,
        }
    }
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub mode: RunMode,
    pub bind_addr: String,
    pub port: u16,
    pub artifacts: ArtifactPaths,
    /// Upper bound on a single classifier call.
    pub classifier_timeout: Duration,
    /// Retention cap per session history (`None` = unbounded).
    pub max_history_turns: Option<usize>,
    /// Sessions idle longer than this are pruned.
    pub session_idle_timeout: Duration,
    /// Directory for the rolling log file, if file logging is wanted.
    pub log_dir: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Web,
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            artifacts: ArtifactPaths::in_dir("./artifacts"),
            classifier_timeout: Duration::from_millis(2000),
            max_history_turns: Some(200),
            session_idle_timeout: Duration::from_secs(3600), // 1 hour
            log_dir: None,
        }
    }
}

impl ChatConfig {
    /// Build the configuration from `CHAT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mode = match lookup("CHAT_MODE").as_deref().map(str::trim) {
            None | Some("") | Some("web") => RunMode::Web,
            Some("cli") => RunMode::Cli,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "CHAT_MODE".to_string(),
                    message: format!("expected 'web' or 'cli', got '{other}'"),
                });
            }
        };

        let bind_addr = lookup("CHAT_BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port: u16 = parse_or(&lookup, "CHAT_PORT", defaults.port)?;

        let mut artifacts = match lookup("CHAT_ARTIFACTS_DIR") {
            Some(dir) => ArtifactPaths::in_dir(dir),
            None => defaults.artifacts,
        };
        if let Some(path) = lookup("CHAT_INTENT_MODEL_PATH") {
            artifacts.intent_model = PathBuf::from(path);
        }
        if let Some(path) = lookup("CHAT_TOKENIZER_PATH") {
            artifacts.tokenizer = PathBuf::from(path);
        }
        if let Some(path) = lookup("CHAT_RESPONSES_PATH") {
            artifacts.responses = PathBuf::from(path);
        }
        artifacts.lexicon = lookup("CHAT_LEXICON_PATH").map(PathBuf::from);

        let timeout_ms: u64 = parse_or(&lookup, "CHAT_CLASSIFIER_TIMEOUT_MS", 2000)?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "CHAT_CLASSIFIER_TIMEOUT_MS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        // 0 disables the cap.
        let max_turns: usize = parse_or(&lookup, "CHAT_MAX_HISTORY_TURNS", 200)?;
        let idle_secs: u64 = parse_or(&lookup, "CHAT_SESSION_IDLE_SECS", 3600)?;

        Ok(Self {
            mode,
            bind_addr,
            port,
            artifacts,
            classifier_timeout: Duration::from_millis(timeout_ms),
            max_history_turns: (max_turns > 0).then_some(max_turns),
            session_idle_timeout: Duration::from_secs(idle_secs),
            log_dir: lookup("CHAT_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{raw}': {e}"),
        }),
        None => Ok(default),
    }
}
