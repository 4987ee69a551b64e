//! Unread-mail count action

use async_trait::async_trait;

use crate::{
    action::{Action, ActionOutcome},
    activity::TurnContext,
    ai::Ai,
    error::Result,
    graph::DirectoryHandle,
    state::ConversationState,
};

/// Fetches the user's unread-message count into state.
///
/// Same lazy-slot pattern as `getUserInfo`.
pub struct GetUserUnreadEmails {
    directory: DirectoryHandle,
}

impl GetUserUnreadEmails {
    pub fn new(directory: DirectoryHandle) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Action for GetUserUnreadEmails {
    fn name(&self) -> &str {
        "getUserUnreadEmails"
    }

    fn description(&self) -> &str {
        "Count the unread emails in the user's inbox"
    }

    async fn execute(
        &self,
        ctx: &TurnContext,
        state: &mut ConversationState,
        _parameters: serde_json::Value,
        ai: &Ai,
    ) -> Result<ActionOutcome> {
        if state.unread_emails.is_some() {
            return Ok(ActionOutcome::Feedback(String::new()));
        }

        let count = self.directory.get()?.unread_email_count().await?;
        tracing::debug!(count, "fetched unread email count");
        state.unread_emails = Some(count);

        ai.deliver_from_planner(ctx, state).await?;
        Ok(ActionOutcome::Stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDirectory, MockPlanner, ctx_for};
    use otto_ai::{Command, Plan};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fills_slot_and_answers() {
        let handle = DirectoryHandle::new();
        handle.set(Arc::new(FakeDirectory {
            unread: 7,
            ..FakeDirectory::sample()
        }));

        let planner = Arc::new(MockPlanner::new(vec![Plan::new(vec![
            Command::act("getUserUnreadEmails", serde_json::json!({})),
            Command::say("You have 7 unread emails."),
        ])]));
        let ai = Ai::new(planner, vec![]);
        let (ctx, sink) = ctx_for("how many unread emails do I have?");
        let mut state = ConversationState::default();

        let action = GetUserUnreadEmails::new(handle);
        let outcome = action
            .execute(&ctx, &mut state, serde_json::json!({}), &ai)
            .await
            .unwrap();

        assert_eq!(outcome, ActionOutcome::Stop);
        assert_eq!(state.unread_emails, Some(7));
        assert_eq!(sink.texts(), vec!["You have 7 unread emails."]);
    }

    #[tokio::test]
    async fn test_filled_slot_returns_feedback() {
        let handle = DirectoryHandle::new();
        handle.set(Arc::new(FakeDirectory::sample()));

        let planner = Arc::new(MockPlanner::new(vec![]));
        let ai = Ai::new(planner.clone(), vec![]);
        let (ctx, _sink) = ctx_for("unread mail?");
        let mut state = ConversationState {
            unread_emails: Some(3),
            ..Default::default()
        };

        let action = GetUserUnreadEmails::new(handle);
        let outcome = action
            .execute(&ctx, &mut state, serde_json::json!({}), &ai)
            .await
            .unwrap();

        assert_eq!(outcome, ActionOutcome::Feedback(String::new()));
        assert_eq!(state.unread_emails, Some(3), "slot must not be overwritten");
        assert_eq!(planner.continue_calls(), 0);
    }
}
