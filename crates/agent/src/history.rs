//! Bounded conversation history
//!
//! Stores user/assistant turn pairs and evicts the oldest pair once the
//! configured window is exceeded.

use support_agent_core::{Turn, TurnRole};

/// Rough token estimate for a conversation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenEstimate {
    pub turns: usize,
    pub approx_tokens: usize,
}

/// Bounded conversation history.
///
/// Turns are always appended as a user/assistant pair, so the stored
/// length is always even and eviction removes whole pairs.
#[derive(Debug)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
    max_pairs: usize,
}

impl ConversationHistory {
    /// Create a history bounded to `max_pairs` user/assistant pairs
    pub fn new(max_pairs: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_pairs,
        }
    }

    /// Append a completed exchange, evicting the oldest pairs if needed
    pub fn append(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        self.turns.push(Turn::user(user_text));
        self.turns.push(Turn::assistant(assistant_text));

        while self.turns.len() > self.max_pairs * 2 {
            self.turns.drain(..2);
        }
    }

    /// The most recent `pairs` exchanges, in chronological order
    pub fn recent(&self, pairs: usize) -> &[Turn] {
        let keep = (pairs * 2).min(self.turns.len());
        &self.turns[self.turns.len() - keep..]
    }

    /// All stored turns, in chronological order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Remove every stored turn. Safe to call on an empty history.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Human-readable summary of the stored exchanges
    pub fn summary(&self) -> String {
        if self.turns.is_empty() {
            return "No conversation history.".to_string();
        }

        let divider = "=".repeat(60);
        let mut lines = vec!["Conversation History:".to_string(), divider.clone()];

        for (index, pair) in self.turns.chunks(2).enumerate() {
            lines.push(format!("\nTurn {}:", index + 1));
            for turn in pair {
                match turn.role {
                    TurnRole::User => lines.push(format!("User: {}", turn.content)),
                    TurnRole::Assistant => lines.push(format!("Assistant: {}", turn.content)),
                }
            }
        }

        lines.push(divider);
        lines.join("\n")
    }

    /// Estimate prompt cost of the stored history (4 chars per token, rough)
    pub fn token_estimate(&self) -> TokenEstimate {
        let chars: usize = self.turns.iter().map(|turn| turn.content.chars().count()).sum();
        TokenEstimate {
            turns: self.turns.len() / 2,
            approx_tokens: chars / 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_stores_pairs() {
        let mut history = ConversationHistory::new(10);
        history.append("hi", "hello");

        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].role, TurnRole::User);
        assert_eq!(history.turns()[1].role, TurnRole::Assistant);
    }

    #[test]
    fn test_eviction_drops_oldest_pair() {
        let mut history = ConversationHistory::new(2);
        history.append("q1", "a1");
        history.append("q2", "a2");
        history.append("q3", "a3");

        assert_eq!(history.len(), 4);
        assert_eq!(history.turns()[0].content, "q2");
        assert_eq!(history.turns()[3].content, "a3");
    }

    #[test]
    fn test_length_stays_even_after_eviction() {
        let mut history = ConversationHistory::new(1);
        for i in 0..5 {
            history.append(format!("q{i}"), format!("a{i}"));
        }

        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].content, "q4");
    }

    #[test]
    fn test_recent_returns_chronological_tail() {
        let mut history = ConversationHistory::new(10);
        history.append("q1", "a1");
        history.append("q2", "a2");
        history.append("q3", "a3");

        let window = history.recent(2);
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].content, "q2");
        assert_eq!(window[3].content, "a3");
    }

    #[test]
    fn test_recent_larger_than_stored() {
        let mut history = ConversationHistory::new(10);
        history.append("q1", "a1");

        assert_eq!(history.recent(5).len(), 2);
    }

    #[test]
    fn test_summary_empty() {
        let history = ConversationHistory::new(10);
        assert_eq!(history.summary(), "No conversation history.");
    }

    #[test]
    fn test_summary_numbers_turns() {
        let mut history = ConversationHistory::new(10);
        history.append("hi", "hello");
        history.append("bye", "goodbye");

        let summary = history.summary();
        assert!(summary.starts_with("Conversation History:"));
        assert!(summary.contains("Turn 1:"));
        assert!(summary.contains("Turn 2:"));
        assert!(summary.contains("User: bye"));
        assert!(summary.contains("Assistant: goodbye"));
        assert!(summary.contains(&"=".repeat(60)));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut history = ConversationHistory::new(10);
        history.append("hi", "hello");
        history.clear();
        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.summary(), "No conversation history.");
    }

    #[test]
    fn test_token_estimate() {
        let mut history = ConversationHistory::new(10);
        history.append("abcd", "efghijkl");

        let estimate = history.token_estimate();
        assert_eq!(estimate.turns, 1);
        assert_eq!(estimate.approx_tokens, 3);
    }
}
