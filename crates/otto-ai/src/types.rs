//! Plan and chat types for planner interactions

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Chat message roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single chat message sent to or received from the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A single command in a plan, tagged by kind on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Invoke a named action with JSON parameters
    #[serde(rename = "DO")]
    Do {
        action: String,
        #[serde(default)]
        parameters: serde_json::Value,
        /// Some models attach commentary to DO commands; kept so a
        /// degraded delivery can still surface it
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<String>,
    },
    /// Deliver a textual response to the user
    #[serde(rename = "SAY")]
    Say { response: String },
}

impl Command {
    /// Create a DO command
    pub fn act(action: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self::Do {
            action: action.into(),
            parameters,
            response: None,
        }
    }

    /// Create a SAY command
    pub fn say(response: impl Into<String>) -> Self {
        Self::Say {
            response: response.into(),
        }
    }

    /// Check if this is a SAY command
    pub fn is_say(&self) -> bool {
        matches!(self, Self::Say { .. })
    }

    /// The user-facing text carried by this command, if any
    pub fn response_text(&self) -> Option<&str> {
        match self {
            Self::Say { response } => Some(response),
            Self::Do { response, .. } => response.as_deref(),
        }
    }
}

/// An ordered command sequence produced by the planner for one
/// reasoning turn. Plans are ephemeral and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Plan {
    /// Create a plan from commands
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// Whether the plan carries no commands at all
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The SAY response in second position, if present.
    ///
    /// The planner is prompted to emit a DO preamble followed by a SAY,
    /// so a well-formed answer puts the user-facing text at index 1.
    pub fn matched_say(&self) -> Option<&str> {
        if self.commands.len() > 1 {
            self.commands[1].response_text().filter(|_| self.commands[1].is_say())
        } else {
            None
        }
    }

    /// The first SAY command's response anywhere in the plan
    pub fn first_say(&self) -> Option<&str> {
        self.commands
            .iter()
            .find(|c| c.is_say())
            .and_then(|c| c.response_text())
    }

    /// The first command's response text, regardless of kind
    pub fn first_response(&self) -> Option<&str> {
        self.commands.first().and_then(|c| c.response_text())
    }
}

/// Parse a plan out of raw model output.
///
/// Models wrap the JSON in code fences or prose often enough that we
/// extract the outermost object before deserializing.
pub fn parse_plan(text: &str) -> Result<Plan> {
    let start = text
        .find('{')
        .ok_or_else(|| Error::MalformedPlan(format!("no JSON object in output: {text:.80}")))?;
    let end = text
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| Error::MalformedPlan(format!("unterminated JSON object: {text:.80}")))?;

    let raw = &text[start..=end];
    serde_json::from_str::<Plan>(raw)
        .map_err(|e| Error::MalformedPlan(format!("{e}: {raw:.120}")))
}
