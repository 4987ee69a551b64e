//! Conversation storage seam

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::{error::Result, state::ConversationState};

/// Conversation-state persistence, keyed by conversation id.
///
/// The bot loads state at the start of a turn and saves it at the end;
/// implementations only need point reads and writes.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the state for a conversation, defaulting when absent
    async fn load(&self, conversation_id: &str) -> Result<ConversationState>;

    /// Persist the state for a conversation
    async fn save(&self, conversation_id: &str, state: &ConversationState) -> Result<()>;

    /// Remove any stored state for a conversation
    async fn delete(&self, conversation_id: &str) -> Result<()>;
}

/// In-process storage for development and tests
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, ConversationState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self, conversation_id: &str) -> Result<ConversationState> {
        Ok(self
            .entries
            .lock()
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, conversation_id: &str, state: &ConversationState) -> Result<()> {
        self.entries
            .lock()
            .insert(conversation_id.to_string(), state.clone());
        Ok(())
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        self.entries.lock().remove(conversation_id);
        Ok(())
    }
}
