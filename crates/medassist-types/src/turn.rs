//! Transcript turn types.
//!
//! A consultation transcript is an ordered list of [`ChatTurn`]s. Agent turns
//! may carry [`AgentMetadata`]; user turns never do.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::agent::{AgentMetadata, HistoryRole};

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Agent,
}

impl Speaker {
    /// Role used when re-expressing the turn as chat history.
    pub fn history_role(self) -> HistoryRole {
        match self {
            Speaker::User => HistoryRole::User,
            Speaker::Agent => HistoryRole::Assistant,
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "user"),
            Speaker::Agent => write!(f, "agent"),
        }
    }
}

impl FromStr for Speaker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Speaker::User),
            "agent" => Ok(Speaker::Agent),
            other => Err(format!("invalid speaker: '{other}'")),
        }
    }
}

/// One entry in the consultation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub speaker: Speaker,
    pub text: String,
    /// Structured metadata from the agent (agent turns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AgentMetadata>,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    fn new(speaker: Speaker, text: String, metadata: Option<AgentMetadata>) -> Self {
        Self {
            id: Uuid::now_v7(),
            speaker,
            text,
            metadata,
            created_at: Utc::now(),
        }
    }

    /// A turn typed (or synthesized) on the user's side.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text.into(), None)
    }

    /// An agent reply carrying structured metadata.
    pub fn agent(text: impl Into<String>, metadata: AgentMetadata) -> Self {
        Self::new(Speaker::Agent, text.into(), Some(metadata))
    }

    /// An agent-authored turn without metadata (errors, greetings, canned acknowledgments).
    pub fn agent_notice(text: impl Into<String>) -> Self {
        Self::new(Speaker::Agent, text.into(), None)
    }

    pub fn is_agent(&self) -> bool {
        self.speaker == Speaker::Agent
    }
}
