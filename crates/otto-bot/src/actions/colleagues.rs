//! Colleague listing action

use async_trait::async_trait;

use crate::{
    action::{Action, ActionOutcome},
    activity::TurnContext,
    ai::Ai,
    error::Result,
    graph::DirectoryHandle,
    state::ConversationState,
};

/// Fetches the names of people the user works with into state.
///
/// Same lazy-slot pattern as `getUserInfo`.
pub struct GetUserColleagues {
    directory: DirectoryHandle,
}

impl GetUserColleagues {
    pub fn new(directory: DirectoryHandle) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Action for GetUserColleagues {
    fn name(&self) -> &str {
        "getUserColleagues"
    }

    fn description(&self) -> &str {
        "List the colleagues the user works with most"
    }

    async fn execute(
        &self,
        ctx: &TurnContext,
        state: &mut ConversationState,
        _parameters: serde_json::Value,
        ai: &Ai,
    ) -> Result<ActionOutcome> {
        if state.colleagues.is_some() {
            return Ok(ActionOutcome::Feedback(String::new()));
        }

        let people = self.directory.get()?.people().await?;
        let names: Vec<String> = people
            .into_iter()
            .filter_map(|p| p.display_name)
            .collect();
        tracing::debug!(count = names.len(), "fetched colleagues");
        state.colleagues = Some(names);

        ai.deliver_from_planner(ctx, state).await?;
        Ok(ActionOutcome::Stop)
    }
}
