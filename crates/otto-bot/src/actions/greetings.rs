//! Welcome-message action

use async_trait::async_trait;

use crate::{
    action::{Action, ActionOutcome},
    activity::TurnContext,
    ai::Ai,
    error::{Error, Result},
    state::ConversationState,
};

/// Asks the planner for a welcome message and delivers it.
///
/// Runs on first sign-in and after a `/reset`.
pub struct Greetings;

#[async_trait]
impl Action for Greetings {
    fn name(&self) -> &str {
        "greetings"
    }

    fn description(&self) -> &str {
        "Greet the user and explain what you can help with"
    }

    async fn execute(
        &self,
        ctx: &TurnContext,
        state: &mut ConversationState,
        _parameters: serde_json::Value,
        ai: &Ai,
    ) -> Result<ActionOutcome> {
        let plan = ai.begin(ctx, state).await?;

        // The welcome is the plan's first SAY; a DO preamble may or may
        // not precede it. A plan with no text at all is a planner bug.
        let Some(text) = plan.first_say().or_else(|| plan.first_response()) else {
            return Err(Error::NoPlannerResponse { attempts: 1 });
        };

        ctx.send_activity(text).await?;
        Ok(ActionOutcome::Stop)
    }
}
