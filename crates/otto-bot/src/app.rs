//! App assembly and turn handling

use std::sync::Arc;

use otto_graph::GraphClient;

use crate::{
    action::BoxedAction,
    activity::{Activity, IncomingActivity, TurnContext},
    ai::Ai,
    error::{Error, Result},
    graph::DirectoryHandle,
    moderation::{Moderator, NoopModerator},
    planner::Planner,
    storage::{MemoryStorage, Storage},
};

/// Pause before the first greeting, in milliseconds
const GREETING_DELAY_MS: u64 = 2000;

/// The assembled bot: planner-driven reasoning, moderated input and
/// output, per-conversation state.
pub struct App {
    ai: Ai,
    storage: Arc<dyn Storage>,
    moderator: Arc<dyn Moderator>,
    directory: DirectoryHandle,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App").finish_non_exhaustive()
    }
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::default()
    }

    /// Install (or refresh) the Graph client after a sign-in.
    ///
    /// The first successful sign-in greets the user; later calls only
    /// swap in the refreshed token.
    pub async fn handle_sign_in(&self, ctx: &TurnContext, token: &str) -> Result<()> {
        let client = match GraphClient::new(token) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "sign-in failed");
                ctx.send_activity("Failed to log in").await?;
                return Ok(());
            }
        };

        let first_sign_in = !self.directory.is_set();
        self.directory.set(Arc::new(client));
        tracing::info!(first_sign_in, "directory client installed");

        if first_sign_in {
            ctx.send(Activity::Typing).await?;
            ctx.send(Activity::Delay {
                milliseconds: GREETING_DELAY_MS,
            })
            .await?;
            self.run_greeting(ctx).await?;
        }
        Ok(())
    }

    /// Handle one incoming activity end to end
    pub async fn run(&self, ctx: &TurnContext) -> Result<()> {
        match ctx.activity() {
            IncomingActivity::ReactionsAdded { from, reactions } => {
                ctx.send_activity(format!(
                    "I see {from} reacted to a message with {}",
                    reactions.join(", ")
                ))
                .await
            }
            IncomingActivity::Message { text } if text.trim() == "/reset" => {
                self.reset_conversation(ctx).await
            }
            IncomingActivity::Message { text } => self.run_message(ctx, text).await,
        }
    }

    async fn run_message(&self, ctx: &TurnContext, text: &str) -> Result<()> {
        let mut state = self.storage.load(ctx.conversation_id()).await?;

        let verdict = self.moderator.review_input(text).await?;
        if verdict.is_flagged() {
            ctx.send_activity(format!(
                "I'm sorry your message was flagged: {}",
                verdict.describe()
            ))
            .await?;
            return Ok(());
        }

        let plan = self.ai.begin(ctx, &state).await?;

        let verdict = self.moderator.review_output(&plan).await?;
        if verdict.is_flagged() {
            ctx.send_activity("I'm not allowed to talk about such things.")
                .await?;
            ctx.send_activity(format!(
                "I'm sorry the output message was flagged: {}",
                verdict.describe()
            ))
            .await?;
            return Ok(());
        }

        self.ai.run_plan(ctx, &mut state, plan).await?;
        self.storage.save(ctx.conversation_id(), &state).await
    }

    async fn reset_conversation(&self, ctx: &TurnContext) -> Result<()> {
        tracing::info!(conversation = ctx.conversation_id(), "resetting conversation");
        self.storage.delete(ctx.conversation_id()).await?;
        self.run_greeting(ctx).await
    }

    async fn run_greeting(&self, ctx: &TurnContext) -> Result<()> {
        let mut state = self.storage.load(ctx.conversation_id()).await?;
        self.ai
            .do_action(ctx, &mut state, "greetings", serde_json::json!({}))
            .await?;
        self.storage.save(ctx.conversation_id(), &state).await
    }
}

/// Assembles an [`App`] from its injected pieces.
///
/// A planner is required; storage defaults to [`MemoryStorage`] and
/// moderation to [`NoopModerator`].
#[derive(Default)]
pub struct AppBuilder {
    planner: Option<Arc<dyn Planner>>,
    storage: Option<Arc<dyn Storage>>,
    moderator: Option<Arc<dyn Moderator>>,
    actions: Vec<BoxedAction>,
    directory: Option<DirectoryHandle>,
    max_retries: Option<u32>,
}

impl AppBuilder {
    pub fn planner(mut self, planner: Arc<dyn Planner>) -> Self {
        self.planner = Some(planner);
        self
    }

    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn moderator(mut self, moderator: Arc<dyn Moderator>) -> Self {
        self.moderator = Some(moderator);
        self
    }

    pub fn actions(mut self, actions: Vec<BoxedAction>) -> Self {
        self.actions = actions;
        self
    }

    /// The handle the Graph-backed actions share; sign-in fills it
    pub fn directory(mut self, directory: DirectoryHandle) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn build(self) -> Result<App> {
        let planner = self
            .planner
            .ok_or_else(|| Error::Config("no planner configured".into()))?;

        let mut ai = Ai::new(planner, self.actions);
        if let Some(max_retries) = self.max_retries {
            ai = ai.with_max_retries(max_retries);
        }

        Ok(App {
            ai,
            storage: self
                .storage
                .unwrap_or_else(|| Arc::new(MemoryStorage::new())),
            moderator: self.moderator.unwrap_or_else(|| Arc::new(NoopModerator)),
            directory: self.directory.unwrap_or_default(),
        })
    }
}
