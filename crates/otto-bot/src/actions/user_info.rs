//! Profile lookup action

use async_trait::async_trait;

use crate::{
    action::{Action, ActionOutcome},
    activity::TurnContext,
    ai::Ai,
    error::Result,
    graph::DirectoryHandle,
    state::{ConversationState, UserInfo},
};

/// Fetches the signed-in user's profile into conversation state.
///
/// The slot is filled at most once per conversation. On the filling
/// call the planner is asked to phrase an answer from the new facts;
/// once filled, the action returns feedback so the planner answers from
/// state without another Graph round-trip.
pub struct GetUserInfo {
    directory: DirectoryHandle,
}

impl GetUserInfo {
    pub fn new(directory: DirectoryHandle) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Action for GetUserInfo {
    fn name(&self) -> &str {
        "getUserInfo"
    }

    fn description(&self) -> &str {
        "Look up the user's own profile (name and email address)"
    }

    async fn execute(
        &self,
        ctx: &TurnContext,
        state: &mut ConversationState,
        _parameters: serde_json::Value,
        ai: &Ai,
    ) -> Result<ActionOutcome> {
        if state.user_info.is_some() {
            return Ok(ActionOutcome::Feedback(String::new()));
        }

        let user = self.directory.get()?.me().await?;
        tracing::debug!(name = ?user.display_name, "fetched user profile");
        state.user_info = Some(UserInfo {
            mail: user.mail,
            name: user.display_name,
        });

        ai.deliver_from_planner(ctx, state).await?;
        Ok(ActionOutcome::Stop)
    }
}
