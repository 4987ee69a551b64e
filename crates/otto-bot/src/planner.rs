//! Planner seam and the LLM-backed action planner

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use otto_ai::{ChatClient, ChatMessage, ChatRequest, Plan, parse_plan};

use crate::{
    action::ActionSpec,
    activity::TurnContext,
    error::Result,
    state::ConversationState,
};

/// Produces plans for the bot.
///
/// `begin_task` starts a reasoning turn and `continue_task` asks for
/// the next step given updated state; both return a fresh [`Plan`].
#[async_trait]
pub trait Planner: Send + Sync {
    /// Start a new reasoning turn
    async fn begin_task(&self, ctx: &TurnContext, state: &ConversationState) -> Result<Plan>;

    /// Request the next step given prior state
    async fn continue_task(&self, ctx: &TurnContext, state: &ConversationState) -> Result<Plan>;
}

/// Planner backed by a chat-completion model.
///
/// The model is prompted with the registered action manifest and the
/// facts accumulated in conversation state, and is expected to answer
/// with a DO/SAY plan as JSON.
pub struct ActionPlanner {
    client: ChatClient,
    specs: Vec<ActionSpec>,
    max_tokens: Option<u32>,
}

impl ActionPlanner {
    pub fn new(client: ChatClient, specs: Vec<ActionSpec>) -> Self {
        Self {
            client,
            specs,
            max_tokens: Some(800),
        }
    }

    /// Override the completion token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[async_trait]
impl Planner for ActionPlanner {
    async fn begin_task(&self, ctx: &TurnContext, state: &ConversationState) -> Result<Plan> {
        // Starting and resuming a task are the same request shape; the
        // state facts are what make continuation calls differ.
        self.continue_task(ctx, state).await
    }

    async fn continue_task(&self, ctx: &TurnContext, state: &ConversationState) -> Result<Plan> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage::system(render_system_prompt(&self.specs, state, Utc::now())),
                ChatMessage::user(ctx.message_text().unwrap_or_default()),
            ],
            max_tokens: self.max_tokens,
            temperature: None,
        };

        let output = self.client.complete(&request).await.map_err(crate::error::Error::Ai)?;
        tracing::debug!(len = output.len(), "planner output received");
        Ok(parse_plan(&output)?)
    }
}

/// Render the planner system prompt from the action manifest and state
fn render_system_prompt(
    specs: &[ActionSpec],
    state: &ConversationState,
    now: DateTime<Utc>,
) -> String {
    let mut prompt = String::from(
        "You are a workplace assistant. Respond ONLY with a JSON plan of the form \
         {\"type\":\"plan\",\"commands\":[...]}. Each command is either \
         {\"type\":\"DO\",\"action\":\"<name>\",\"parameters\":{...}} to invoke an action, or \
         {\"type\":\"SAY\",\"response\":\"<text>\"} to answer the user. \
         When an action is needed, emit the DO command first and follow it with a SAY command.\n\n\
         Available actions:\n",
    );

    for spec in specs {
        prompt.push_str(&format!(
            "- {}: {} (parameters: {})\n",
            spec.name, spec.description, spec.parameters
        ));
    }

    prompt.push_str(&format!("\nThe current date is {}.\n", now.format("%Y-%m-%d")));

    let facts = state.facts();
    if !facts.is_empty() {
        prompt.push_str("\nKnown facts:\n");
        for fact in facts {
            prompt.push_str(&format!("- {fact}\n"));
        }
    }

    prompt
}
