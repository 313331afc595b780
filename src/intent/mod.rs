//! Intent classification and canned-response lookup.
//!
//! The classifier is an injected capability ([`IntentClassifier`]); the
//! matcher pairs whatever label it returns with a reply from the
//! [`ResponseTable`], failing loudly when the two disagree.

pub mod classifier;
pub mod matcher;
pub mod names;
pub mod responses;
pub mod rules;

pub use classifier::{IntentClassifier, IntentPrediction, PredictionMethod};
pub use matcher::{IntentMatcher, MatchedIntent};
pub use names::{extract_name, personalize};
pub use responses::{ResponseEntry, ResponseTable};
pub use rules::RuleClassifier;
