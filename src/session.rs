//! In-memory chat transcript — append-only, session-scoped.
//!
//! Turns are never mutated after creation and never persisted; the
//! transcript's lifetime is bound to the console session. A render cap
//! bounds how many recent turns get interpolated into prompts so long
//! sessions don't grow the prompt without bound.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Human,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Human => "Human",
            Role::Assistant => "Assistant",
        }
    }
}

/// One chat turn: role tag + text content, stamped at append time.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// Ordered list of turns for one session.
#[derive(Debug)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
    render_cap: usize,
}

impl Transcript {
    /// `render_cap` is the number of most-recent turns [`render`](Self::render)
    /// includes; the full transcript is kept in memory regardless.
    pub fn new(render_cap: usize) -> Self {
        Self { turns: Vec::new(), render_cap }
    }

    pub fn push_human(&mut self, content: impl Into<String>) {
        self.push(Role::Human, content.into());
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Role::Assistant, content.into());
    }

    fn push(&mut self, role: Role, content: String) {
        self.turns.push(ChatTurn { role, content, at: Utc::now() });
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render the most recent turns as prompt text, one `Role: content`
    /// line-block per turn. Empty transcript renders empty.
    pub fn render(&self) -> String {
        let start = self.turns.len().saturating_sub(self.render_cap);
        self.turns[start..]
            .iter()
            .map(|t| format!("{}: {}", t.role.as_str(), t.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_append_in_order() {
        let mut t = Transcript::new(10);
        t.push_human("hi");
        t.push_assistant("hello");
        assert_eq!(t.len(), 2);
        assert_eq!(t.turns()[0].role, Role::Human);
        assert_eq!(t.turns()[1].role, Role::Assistant);
    }

    #[test]
    fn render_formats_roles() {
        let mut t = Transcript::new(10);
        t.push_human("what is rust?");
        t.push_assistant("a language");
        assert_eq!(t.render(), "Human: what is rust?\nAssistant: a language");
    }

    #[test]
    fn render_caps_to_recent_turns() {
        let mut t = Transcript::new(2);
        t.push_human("one");
        t.push_assistant("two");
        t.push_human("three");
        let rendered = t.render();
        assert!(!rendered.contains("one"));
        assert!(rendered.contains("two"));
        assert!(rendered.contains("three"));
        // full transcript untouched
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn empty_transcript_renders_empty() {
        let t = Transcript::new(5);
        assert!(t.is_empty());
        assert_eq!(t.render(), "");
    }

    #[test]
    fn timestamps_are_monotone_per_push() {
        let mut t = Transcript::new(5);
        t.push_human("a");
        t.push_assistant("b");
        assert!(t.turns()[0].at <= t.turns()[1].at);
    }
}
