//! Append-only, ordered conversation history with a retention cap.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::debug;

use super::turn::Turn;
use crate::sentiment::SentimentSummary;

/// Default retention cap per session.
pub const DEFAULT_MAX_TURNS: usize = 200;

/// Ordered record of a session's turns.
///
/// Turns are kept in arrival order. Below the cap every `record` grows the
/// history by one; at the cap the oldest turn is evicted.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationHistory {
    turns: VecDeque<Turn>,
    #[serde(skip)]
    max_turns: Option<usize>,
    total_recorded: u64,
}

impl ConversationHistory {
    /// History capped at [`DEFAULT_MAX_TURNS`].
    pub fn new() -> Self {
        Self::with_capacity_limit(Some(DEFAULT_MAX_TURNS))
    }

    /// History with an explicit cap (`None` = unbounded). A cap of 0 is treated as 1.
    pub fn with_capacity_limit(max_turns: Option<usize>) -> Self {
        Self {
            turns: VecDeque::new(),
            max_turns: max_turns.map(|m| m.max(1)),
            total_recorded: 0,
        }
    }

    /// Append a turn.
    pub fn record(&mut self, turn: Turn) {
        if let Some(max) = self.max_turns {
            while self.turns.len() >= max {
                if let Some(evicted) = self.turns.pop_front() {
                    debug!(turn_id = %evicted.id, max_turns = max, "Evicted oldest turn");
                }
            }
        }
        self.turns.push_back(turn);
        self.total_recorded += 1;
    }

    /// Read-only view of the turns in arrival order.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &Turn> + DoubleEndedIterator {
        self.turns.iter()
    }

    /// Most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.back()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turns ever recorded, including evicted ones.
    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    pub fn max_turns(&self) -> Option<usize> {
        self.max_turns
    }

    /// The user side of the conversation.
    pub fn user_messages(&self) -> Vec<&str> {
        self.turns.iter().map(|t| t.message.as_str()).collect()
    }

    /// Average sentiment over the retained turns.
    pub fn summary(&self) -> SentimentSummary {
        SentimentSummary::from_scores(self.turns.iter().map(|t| t.score))
    }

    /// Owned copy of the turns, for rendering.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::Sentiment;

    fn make_turn(message: &str, score: i32) -> Turn {
        Turn::new(
            message,
            Sentiment::from_score(score),
            score,
            "general",
            0.3,
            "I'm listening.",
        )
    }

    #[test]
    fn record_appends_last() {
        let mut history = ConversationHistory::new();
        assert!(history.is_empty());

        let turn = make_turn("hello", 0);
        history.record(turn.clone());
        assert_eq!(history.len(), 1);
        assert_eq!(history.last(), Some(&turn));

        let second = make_turn("again", 1);
        history.record(second.clone());
        assert_eq!(history.len(), 2);
        assert_eq!(history.last(), Some(&second));
    }

    #[test]
    fn preserves_arrival_order() {
        let mut history = ConversationHistory::new();
        for msg in ["one", "two", "three"] {
            history.record(make_turn(msg, 0));
        }
        assert_eq!(history.user_messages(), vec!["one", "two", "three"]);
        let messages: Vec<&str> = history.history().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
    }

    #[test]
    fn cap_evicts_oldest() {
        let mut history = ConversationHistory::with_capacity_limit(Some(2));
        for msg in ["one", "two", "three"] {
            history.record(make_turn(msg, 0));
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.user_messages(), vec!["two", "three"]);
        assert_eq!(history.total_recorded(), 3);
    }

    #[test]
    fn unbounded_history_keeps_everything() {
        let mut history = ConversationHistory::with_capacity_limit(None);
        for i in 0..(DEFAULT_MAX_TURNS + 10) {
            history.record(make_turn(&format!("msg {i}"), 0));
        }
        assert_eq!(history.len(), DEFAULT_MAX_TURNS + 10);
    }

    #[test]
    fn zero_cap_keeps_latest_turn() {
        let mut history = ConversationHistory::with_capacity_limit(Some(0));
        history.record(make_turn("one", 0));
        history.record(make_turn("two", 0));
        assert_eq!(history.user_messages(), vec!["two"]);
    }

    #[test]
    fn summary_over_turns() {
        let mut history = ConversationHistory::new();
        assert_eq!(history.summary().label, Sentiment::Neutral);

        history.record(make_turn("great", 2));
        history.record(make_turn("meh", -1));
        let summary = history.summary();
        assert_eq!(summary.turns, 2);
        assert_eq!(summary.average_score, 0.5);
        assert_eq!(summary.label, Sentiment::Positive);
    }
}
