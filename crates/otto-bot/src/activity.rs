//! Turn context and the activity delivery seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

/// An outgoing activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Activity {
    /// A text message for the user
    Message { text: String },
    /// Typing indicator
    Typing,
    /// A pause before the next activity, in milliseconds
    Delay { milliseconds: u64 },
}

/// An incoming activity from the hosting channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingActivity {
    /// A user message
    Message { text: String },
    /// Reactions added to an earlier message
    ReactionsAdded { from: String, reactions: Vec<String> },
}

/// Delivery seam: where outgoing activities go.
///
/// The hosting channel (console, web socket, test recorder) implements
/// this; the bot core never talks to a transport directly.
#[async_trait]
pub trait ActivitySink: Send + Sync {
    /// Deliver one activity to the user
    async fn send(&self, activity: Activity) -> Result<()>;
}

/// Handle for one conversational exchange.
///
/// Owns the incoming activity and the sink for responses; cheap to pass
/// by reference through actions and the planner.
pub struct TurnContext {
    conversation_id: String,
    activity: IncomingActivity,
    sink: Arc<dyn ActivitySink>,
}

impl TurnContext {
    /// Create a turn context for an arbitrary incoming activity
    pub fn new(
        conversation_id: impl Into<String>,
        activity: IncomingActivity,
        sink: Arc<dyn ActivitySink>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            activity,
            sink,
        }
    }

    /// Create a turn context for a plain user message
    pub fn message(
        conversation_id: impl Into<String>,
        text: impl Into<String>,
        sink: Arc<dyn ActivitySink>,
    ) -> Self {
        Self::new(
            conversation_id,
            IncomingActivity::Message { text: text.into() },
            sink,
        )
    }

    /// Conversation this turn belongs to
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// The incoming activity being handled
    pub fn activity(&self) -> &IncomingActivity {
        &self.activity
    }

    /// The user's message text, when this turn carries one
    pub fn message_text(&self) -> Option<&str> {
        match &self.activity {
            IncomingActivity::Message { text } => Some(text),
            _ => None,
        }
    }

    /// Deliver a text message
    pub async fn send_activity(&self, text: impl Into<String>) -> Result<()> {
        self.sink
            .send(Activity::Message { text: text.into() })
            .await
    }

    /// Deliver an arbitrary activity
    pub async fn send(&self, activity: Activity) -> Result<()> {
        self.sink.send(activity).await
    }
}
