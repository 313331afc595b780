//! Keyword-rule intent classifier loaded from a JSON model artifact.
//!
//! Intents are evaluated in declaration order, so higher-priority intents
//! (e.g. `self_harm`) must come first in the model. Keywords are normalized
//! with the shared tokenizer and only match on whole-token boundaries, so
//! `"hi"` matches "Hi there!" but not "this".

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::classifier::{IntentClassifier, IntentPrediction, PredictionMethod};
use crate::error::{ArtifactError, ClassifierError};
use crate::tokenizer::Tokenizer;

/// On-disk form of the intent model.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentModel {
    /// Label returned when no rule matches.
    pub fallback: String,
    #[serde(default = "default_fallback_confidence")]
    pub fallback_confidence: f32,
    pub intents: Vec<IntentRuleSpec>,
}

/// One intent and the keywords that trigger it.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentRuleSpec {
    pub label: String,
    pub keywords: Vec<String>,
    #[serde(default = "default_rule_confidence")]
    pub confidence: f32,
}

fn default_fallback_confidence() -> f32 {
    0.3
}

fn default_rule_confidence() -> f32 {
    1.0
}

/// A compiled intent rule.
#[derive(Debug, Clone)]
struct IntentRule {
    label: String,
    regex: Regex,
    confidence: f32,
}

/// Classifier that matches normalized messages against keyword rules.
pub struct RuleClassifier {
    rules: Vec<IntentRule>,
    fallback: String,
    fallback_confidence: f32,
    tokenizer: Arc<Tokenizer>,
}

impl RuleClassifier {
    /// Compile a model. Keywords are normalized with `tokenizer`.
    pub fn from_model(model: IntentModel, tokenizer: Arc<Tokenizer>) -> Result<Self, ArtifactError> {
        if model.fallback.trim().is_empty() {
            return Err(ArtifactError::InvalidModel(
                "fallback label is empty".to_string(),
            ));
        }
        check_confidence("fallback", model.fallback_confidence)?;

        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(model.intents.len());

        for spec in model.intents {
            let label = spec.label.trim().to_string();
            if label.is_empty() {
                return Err(ArtifactError::InvalidModel(
                    "intent with empty label".to_string(),
                ));
            }
            if !seen.insert(label.clone()) {
                return Err(ArtifactError::InvalidModel(format!(
                    "duplicate intent label: {label}"
                )));
            }
            check_confidence(&label, spec.confidence)?;

            let alternatives: Vec<String> = spec
                .keywords
                .iter()
                .map(|k| tokenizer.normalize(k))
                .filter(|k| !k.is_empty())
                .map(|k| regex::escape(&k))
                .collect();
            if alternatives.is_empty() {
                return Err(ArtifactError::InvalidModel(format!(
                    "intent {label} has no usable keywords"
                )));
            }

            let pattern = format!("(?:^| )(?:{})(?: |$)", alternatives.join("|"));
            let regex = Regex::new(&pattern).map_err(|source| ArtifactError::InvalidPattern {
                name: format!("intent.{label}"),
                source,
            })?;

            rules.push(IntentRule {
                label,
                regex,
                confidence: spec.confidence,
            });
        }

        Ok(Self {
            rules,
            fallback: model.fallback.trim().to_string(),
            fallback_confidence: model.fallback_confidence,
            tokenizer,
        })
    }

    /// Load and compile a model artifact.
    pub fn load(path: &Path, tokenizer: Arc<Tokenizer>) -> Result<Self, ArtifactError> {
        let model: IntentModel = crate::artifacts::read_json(path)?;
        Self::from_model(model, tokenizer)
    }

    /// Number of declared intents (excluding the fallback).
    pub fn intent_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluate the rules against a message.
    pub fn classify(&self, text: &str) -> IntentPrediction {
        let normalized = self.tokenizer.normalize(text);

        for rule in &self.rules {
            if rule.regex.is_match(&normalized) {
                debug!(intent = %rule.label, "Message matched intent rule");
                return IntentPrediction::new(&rule.label, rule.confidence, PredictionMethod::Rule);
            }
        }

        debug!(intent = %self.fallback, "No intent rule matched, using fallback");
        IntentPrediction::new(
            &self.fallback,
            self.fallback_confidence,
            PredictionMethod::Fallback,
        )
    }
}

fn check_confidence(label: &str, confidence: f32) -> Result<(), ArtifactError> {
    if (0.0..=1.0).contains(&confidence) {
        Ok(())
    } else {
        Err(ArtifactError::InvalidModel(format!(
            "confidence for {label} must be within 0..=1, got {confidence}"
        )))
    }
}

#[async_trait]
impl IntentClassifier for RuleClassifier {
    fn name(&self) -> &str {
        "rules"
    }

    fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.rules.iter().map(|r| r.label.clone()).collect();
        if !labels.contains(&self.fallback) {
            labels.push(self.fallback.clone());
        }
        labels
    }

    async fn predict(&self, text: &str) -> Result<IntentPrediction, ClassifierError> {
        Ok(self.classify(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_model(json: &str) -> IntentModel {
        serde_json::from_str(json).unwrap()
    }

    fn classifier() -> RuleClassifier {
        let model = make_model(
            r#"{
                "fallback": "general",
                "intents": [
                    {"label": "self_harm", "keywords": ["kill myself", "don't want to live"]},
                    {"label": "greeting", "keywords": ["hi", "hello", "good morning"]},
                    {"label": "thanks", "keywords": ["thanks", "thank you"]},
                    {"label": "exam", "keywords": ["exam", "midterm"], "confidence": 0.7}
                ]
            }"#,
        );
        RuleClassifier::from_model(model, Arc::new(Tokenizer::default())).unwrap()
    }

    #[test]
    fn matches_single_keyword() {
        let p = classifier().classify("Hello there!");
        assert_eq!(p.label, "greeting");
        assert_eq!(p.method, PredictionMethod::Rule);
        assert_eq!(p.confidence, 1.0);
    }

    #[test]
    fn matches_phrase_across_punctuation() {
        assert_eq!(classifier().classify("Thank-you so much").label, "thanks");
        assert_eq!(
            classifier().classify("I just don't want to live anymore").label,
            "self_harm"
        );
    }

    #[test]
    fn keywords_match_whole_tokens_only() {
        // "this" contains "hi", "thanksgiving" contains "thanks"
        let p = classifier().classify("this thanksgiving was long");
        assert_eq!(p.label, "general");
        assert_eq!(p.method, PredictionMethod::Fallback);
    }

    #[test]
    fn declaration_order_is_priority() {
        assert_eq!(classifier().classify("hi, I want to kill myself").label, "self_harm");
        assert_eq!(classifier().classify("hi, thanks").label, "greeting");
    }

    #[test]
    fn per_intent_confidence() {
        let p = classifier().classify("my midterm is tomorrow");
        assert_eq!(p.label, "exam");
        assert_eq!(p.confidence, 0.7);
    }

    #[test]
    fn fallback_confidence_default() {
        let p = classifier().classify("");
        assert_eq!(p.label, "general");
        assert_eq!(p.confidence, 0.3);
    }

    #[test]
    fn labels_include_fallback() {
        let labels = classifier().labels();
        assert_eq!(labels, vec!["self_harm", "greeting", "thanks", "exam", "general"]);
    }

    #[test]
    fn keyword_metacharacters_are_literal() {
        let model = make_model(
            r#"{"fallback": "general", "intents": [{"label": "plus", "keywords": ["c++"]}]}"#,
        );
        let spec = crate::tokenizer::TokenizerSpec {
            lowercase: true,
            token_pattern: r"[\w+]+".to_string(),
        };
        let tokenizer = Arc::new(Tokenizer::from_spec(&spec).unwrap());
        let classifier = RuleClassifier::from_model(model, tokenizer).unwrap();
        assert_eq!(classifier.classify("I love C++").label, "plus");
        assert_eq!(classifier.classify("I love C").label, "general");
    }

    #[test]
    fn rejects_duplicate_labels() {
        let model = make_model(
            r#"{"fallback": "general", "intents": [
                {"label": "bye", "keywords": ["bye"]},
                {"label": "bye", "keywords": ["later"]}
            ]}"#,
        );
        let err = RuleClassifier::from_model(model, Arc::new(Tokenizer::default())).err();
        assert!(matches!(err, Some(ArtifactError::InvalidModel(_))));
    }

    #[test]
    fn rejects_intent_without_keywords() {
        let model = make_model(
            r#"{"fallback": "general", "intents": [{"label": "bye", "keywords": ["!!"]}]}"#,
        );
        let err = RuleClassifier::from_model(model, Arc::new(Tokenizer::default())).err();
        assert!(matches!(err, Some(ArtifactError::InvalidModel(_))));
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let model = make_model(
            r#"{"fallback": "general", "intents": [{"label": "bye", "keywords": ["bye"], "confidence": 1.5}]}"#,
        );
        let err = RuleClassifier::from_model(model, Arc::new(Tokenizer::default())).err();
        assert!(matches!(err, Some(ArtifactError::InvalidModel(_))));
    }

    #[tokio::test]
    async fn predict_delegates_to_rules() {
        let prediction = classifier().predict("good morning!").await.unwrap();
        assert_eq!(prediction.label, "greeting");
    }
}
