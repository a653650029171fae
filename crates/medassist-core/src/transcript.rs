//! Append-only consultation transcript.

use medassist_types::agent::{AgentMetadata, HistoryMessage};
use medassist_types::turn::ChatTurn;

/// Ordered log of user and agent turns for one consultation.
///
/// Turns are only ever appended. Chronological order is the only ordering
/// used when looking up the latest agent metadata.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript opened by an agent greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut transcript = Self::new();
        transcript.append(ChatTurn::agent_notice(greeting));
        transcript
    }

    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
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

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    /// Metadata of the newest agent turn that carries any.
    ///
    /// Agent turns without metadata (transport errors, acknowledgments) are
    /// skipped, so a failed dispatch does not discard an open form.
    pub fn latest_agent_metadata(&self) -> Option<&AgentMetadata> {
        self.turns
            .iter()
            .rev()
            .filter(|turn| turn.is_agent())
            .find_map(|turn| turn.metadata.as_ref())
    }

    /// All turns re-expressed as role/content pairs for the JSON chat endpoint.
    pub fn history(&self) -> Vec<HistoryMessage> {
        self.turns
            .iter()
            .map(|turn| HistoryMessage {
                role: turn.speaker.history_role(),
                content: turn.text.clone(),
            })
            .collect()
    }
}
