//! Rule-based sentiment scoring.
//!
//! A message is tokenized and every token found in the positive or negative
//! word list adds +1 or -1 to its score. The sign of the total is the label.

pub mod lexicon;
pub mod scorer;

pub use lexicon::SentimentWordList;
pub use scorer::{LexiconScorer, Sentiment, SentimentAnalysis, SentimentSummary};
