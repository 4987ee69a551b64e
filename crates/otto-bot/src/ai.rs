//! Plan dispatch and the plan-continuation retry loop

use std::collections::VecDeque;
use std::sync::Arc;

use otto_ai::{Command, Plan};

use crate::{
    action::{ActionOutcome, ActionRegistry, BoxedAction},
    activity::TurnContext,
    error::{Error, Result},
    planner::Planner,
    state::ConversationState,
};

/// Default number of continuation calls before falling back
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Upper bound on commands dispatched for one incoming message,
/// counting commands from feedback-triggered continuations
const MAX_PLAN_STEPS: u32 = 8;

/// How a planner-driven delivery concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerDelivery {
    /// A well-formed DO/SAY plan matched; its SAY text was delivered
    Delivered(String),
    /// The retry budget ran out; the last plan's first response was
    /// delivered as a best effort
    Fallback(String),
}

impl PlannerDelivery {
    /// The text that reached the user
    pub fn text(&self) -> &str {
        match self {
            Self::Delivered(text) | Self::Fallback(text) => text,
        }
    }
}

/// The planning side of the app: a planner plus the actions its plans
/// can invoke.
pub struct Ai {
    planner: Arc<dyn Planner>,
    actions: ActionRegistry,
    max_retries: u32,
}

impl Ai {
    /// Create an Ai from a planner and a set of actions
    pub fn new(planner: Arc<dyn Planner>, actions: Vec<BoxedAction>) -> Self {
        let mut registry = ActionRegistry::new();
        for action in actions {
            registry.register(action);
        }
        Self {
            planner,
            actions: registry,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the continuation retry budget (minimum 1)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// The registered actions
    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Start a reasoning turn
    pub async fn begin(&self, ctx: &TurnContext, state: &ConversationState) -> Result<Plan> {
        self.planner.begin_task(ctx, state).await
    }

    /// Invoke a registered action by name, validating its arguments.
    ///
    /// Validation failures are returned to the planner as feedback
    /// rather than aborting the turn.
    pub async fn do_action(
        &self,
        ctx: &TurnContext,
        state: &mut ConversationState,
        name: &str,
        parameters: serde_json::Value,
    ) -> Result<ActionOutcome> {
        let Some(action) = self.actions.get(name) else {
            return Err(Error::UnknownAction(name.to_string()));
        };

        if let Some(message) = self.actions.validate(name, &parameters) {
            tracing::warn!(action = name, %message, "invalid action arguments");
            return Ok(ActionOutcome::Feedback(message));
        }

        tracing::debug!(action = name, "executing action");
        action.clone().execute(ctx, state, parameters, self).await
    }

    /// Execute a plan's commands in order.
    ///
    /// SAY commands are delivered directly; DO commands run actions.
    /// An action returning feedback hands control back to the planner
    /// for a continuation plan, bounded by a total step limit.
    pub async fn run_plan(
        &self,
        ctx: &TurnContext,
        state: &mut ConversationState,
        plan: Plan,
    ) -> Result<()> {
        let mut queue: VecDeque<Command> = plan.commands.into();
        let mut steps = 0u32;

        while let Some(command) = queue.pop_front() {
            steps += 1;
            if steps > MAX_PLAN_STEPS {
                tracing::warn!(steps, "plan step limit reached, stopping dispatch");
                return Ok(());
            }

            match command {
                Command::Say { response } => {
                    ctx.send_activity(response).await?;
                }
                Command::Do { action, parameters, .. } => {
                    match self.do_action(ctx, state, &action, parameters).await? {
                        ActionOutcome::Stop => return Ok(()),
                        ActionOutcome::Feedback(feedback) => {
                            if !feedback.is_empty() {
                                tracing::debug!(action = %action, %feedback, "action feedback");
                            }
                            let next = self.planner.continue_task(ctx, state).await?;
                            queue = next.commands.into();
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Obtain a user-facing response from a multi-step plan, retrying
    /// continuation calls until a DO/SAY match appears or the budget is
    /// exhausted.
    ///
    /// A well-formed answer is a plan whose second command is a SAY
    /// (the planner emits a DO preamble first); its text is delivered
    /// and reported as [`PlannerDelivery::Delivered`]. After
    /// `max_retries` unmatched plans the first command's response text
    /// of the last plan is delivered as [`PlannerDelivery::Fallback`].
    /// A final plan with no deliverable text (including an empty plan)
    /// is an error; empty plans mid-budget simply count as failed
    /// attempts.
    pub async fn deliver_from_planner(
        &self,
        ctx: &TurnContext,
        state: &mut ConversationState,
    ) -> Result<PlannerDelivery> {
        let mut attempts = 0u32;

        loop {
            let plan = self.planner.continue_task(ctx, state).await?;

            if let Some(text) = plan.matched_say() {
                let text = text.to_string();
                ctx.send_activity(text.clone()).await?;
                return Ok(PlannerDelivery::Delivered(text));
            }

            attempts += 1;
            if attempts >= self.max_retries {
                let Some(text) = plan.first_response().map(str::to_string) else {
                    return Err(Error::NoPlannerResponse { attempts });
                };
                tracing::warn!(attempts, "no say command matched, delivering fallback");
                ctx.send_activity(text.clone()).await?;
                return Ok(PlannerDelivery::Fallback(text));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::testing::{MockPlanner, ctx_for};
    use async_trait::async_trait;
    use otto_ai::Command;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn do_cmd(action: &str) -> Command {
        Command::act(action, serde_json::json!({}))
    }

    fn matched_plan(text: &str) -> Plan {
        Plan::new(vec![do_cmd("getUserInfo"), Command::say(text)])
    }

    // ===== deliver_from_planner =====

    #[tokio::test]
    async fn test_first_call_match_delivers_say() {
        let planner = Arc::new(MockPlanner::new(vec![matched_plan(
            "Your email is a@b.com",
        )]));
        let ai = Ai::new(planner.clone(), vec![]);
        let (ctx, sink) = ctx_for("what's my email?");
        let mut state = ConversationState::default();

        let delivery = ai.deliver_from_planner(&ctx, &mut state).await.unwrap();

        assert_eq!(
            delivery,
            PlannerDelivery::Delivered("Your email is a@b.com".into())
        );
        assert_eq!(planner.continue_calls(), 1);
        assert_eq!(sink.texts(), vec!["Your email is a@b.com"]);
    }

    #[tokio::test]
    async fn test_exhausted_budget_delivers_fallback_from_last_plan() {
        // Three plans, none with a SAY in second position; the third
        // carries response text on its first command.
        let planner = Arc::new(MockPlanner::new(vec![
            Plan::new(vec![do_cmd("a")]),
            Plan::new(vec![do_cmd("b")]),
            Plan::new(vec![Command::Do {
                action: "c".into(),
                parameters: serde_json::json!({}),
                response: Some("best effort answer".into()),
            }]),
        ]));
        let ai = Ai::new(planner.clone(), vec![]);
        let (ctx, sink) = ctx_for("hello");
        let mut state = ConversationState::default();

        let delivery = ai.deliver_from_planner(&ctx, &mut state).await.unwrap();

        assert_eq!(
            delivery,
            PlannerDelivery::Fallback("best effort answer".into())
        );
        assert_eq!(planner.continue_calls(), 3);
        assert_eq!(sink.texts(), vec!["best effort answer"]);
    }

    #[tokio::test]
    async fn test_budget_never_exceeded() {
        for budget in 1..=4u32 {
            let misses = (0..6).map(|_| Plan::new(vec![do_cmd("x")])).collect();
            let planner = Arc::new(MockPlanner::new(misses));
            let ai = Ai::new(planner.clone(), vec![]).with_max_retries(budget);
            let (ctx, _sink) = ctx_for("hi");
            let mut state = ConversationState::default();

            // Plans carry no response text, so exhaustion errors out;
            // the call count is what matters here.
            let _ = ai.deliver_from_planner(&ctx, &mut state).await;
            assert_eq!(planner.continue_calls(), budget);
        }
    }

    #[tokio::test]
    async fn test_match_on_second_attempt_stops_early() {
        let planner = Arc::new(MockPlanner::new(vec![
            Plan::new(vec![do_cmd("a")]),
            matched_plan("found it"),
            matched_plan("never reached"),
        ]));
        let ai = Ai::new(planner.clone(), vec![]);
        let (ctx, sink) = ctx_for("hi");
        let mut state = ConversationState::default();

        let delivery = ai.deliver_from_planner(&ctx, &mut state).await.unwrap();

        assert_eq!(delivery, PlannerDelivery::Delivered("found it".into()));
        assert_eq!(planner.continue_calls(), 2);
        assert_eq!(sink.texts(), vec!["found it"]);
    }

    #[tokio::test]
    async fn test_lone_say_plan_does_not_match() {
        // A single SAY has no DO preamble, so it is not a structural
        // match; with budget 1 it becomes the fallback text instead.
        let planner = Arc::new(MockPlanner::new(vec![Plan::new(vec![Command::say(
            "solo say",
        )])]));
        let ai = Ai::new(planner.clone(), vec![]).with_max_retries(1);
        let (ctx, _sink) = ctx_for("hi");
        let mut state = ConversationState::default();

        let delivery = ai.deliver_from_planner(&ctx, &mut state).await.unwrap();
        assert_eq!(delivery, PlannerDelivery::Fallback("solo say".into()));
    }

    #[tokio::test]
    async fn test_empty_plans_error_after_budget() {
        let planner = Arc::new(MockPlanner::new(vec![
            Plan::default(),
            Plan::default(),
            Plan::default(),
        ]));
        let ai = Ai::new(planner.clone(), vec![]);
        let (ctx, sink) = ctx_for("hi");
        let mut state = ConversationState::default();

        let err = ai.deliver_from_planner(&ctx, &mut state).await.unwrap_err();

        assert!(matches!(err, Error::NoPlannerResponse { attempts: 3 }));
        assert_eq!(planner.continue_calls(), 3);
        assert!(sink.texts().is_empty(), "error path must deliver nothing");
    }

    #[tokio::test]
    async fn test_empty_plan_mid_budget_counts_as_retry() {
        let planner = Arc::new(MockPlanner::new(vec![
            Plan::default(),
            matched_plan("recovered"),
        ]));
        let ai = Ai::new(planner.clone(), vec![]);
        let (ctx, _sink) = ctx_for("hi");
        let mut state = ConversationState::default();

        let delivery = ai.deliver_from_planner(&ctx, &mut state).await.unwrap();
        assert_eq!(delivery, PlannerDelivery::Delivered("recovered".into()));
        assert_eq!(planner.continue_calls(), 2);
    }

    #[tokio::test]
    async fn test_planner_error_propagates_without_consuming_budget() {
        // An exhausted script makes the mock return an error.
        let planner = Arc::new(MockPlanner::new(vec![]).erroring());
        let ai = Ai::new(planner.clone(), vec![]);
        let (ctx, sink) = ctx_for("hi");
        let mut state = ConversationState::default();

        let err = ai.deliver_from_planner(&ctx, &mut state).await.unwrap_err();
        assert!(matches!(err, Error::Ai(_)));
        assert!(sink.texts().is_empty());
    }

    // ===== run_plan / do_action =====

    /// Counts executions; optionally stops or hands back feedback.
    struct CountingAction {
        action_name: String,
        outcome: ActionOutcome,
        calls: Arc<AtomicU32>,
    }

    impl CountingAction {
        fn new(name: &str, outcome: ActionOutcome) -> (Arc<Self>, Arc<AtomicU32>) {
            let calls = Arc::new(AtomicU32::new(0));
            (
                Arc::new(Self {
                    action_name: name.to_string(),
                    outcome,
                    calls: calls.clone(),
                }),
                calls,
            )
        }
    }

    #[async_trait]
    impl Action for CountingAction {
        fn name(&self) -> &str {
            &self.action_name
        }
        fn description(&self) -> &str {
            "counts calls"
        }
        async fn execute(
            &self,
            _ctx: &TurnContext,
            _state: &mut ConversationState,
            _parameters: serde_json::Value,
            _ai: &Ai,
        ) -> Result<ActionOutcome> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.outcome.clone())
        }
    }

    #[tokio::test]
    async fn test_run_plan_delivers_says_in_order() {
        let planner = Arc::new(MockPlanner::new(vec![]));
        let ai = Ai::new(planner, vec![]);
        let (ctx, sink) = ctx_for("hi");
        let mut state = ConversationState::default();

        let plan = Plan::new(vec![Command::say("one"), Command::say("two")]);
        ai.run_plan(&ctx, &mut state, plan).await.unwrap();

        assert_eq!(sink.texts(), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_run_plan_stop_halts_dispatch() {
        let (action, calls) = CountingAction::new("halt", ActionOutcome::Stop);
        let planner = Arc::new(MockPlanner::new(vec![]));
        let ai = Ai::new(planner, vec![action]);
        let (ctx, sink) = ctx_for("hi");
        let mut state = ConversationState::default();

        let plan = Plan::new(vec![do_cmd("halt"), Command::say("unreachable")]);
        ai.run_plan(&ctx, &mut state, plan).await.unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert!(sink.texts().is_empty());
    }

    #[tokio::test]
    async fn test_run_plan_feedback_continues_with_new_plan() {
        let (action, calls) =
            CountingAction::new("refresh", ActionOutcome::Feedback(String::new()));
        // The continuation after feedback answers directly.
        let planner = Arc::new(MockPlanner::new(vec![Plan::new(vec![Command::say(
            "from continuation",
        )])]));
        let ai = Ai::new(planner.clone(), vec![action]);
        let (ctx, sink) = ctx_for("hi");
        let mut state = ConversationState::default();

        let plan = Plan::new(vec![do_cmd("refresh")]);
        ai.run_plan(&ctx, &mut state, plan).await.unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(planner.continue_calls(), 1);
        assert_eq!(sink.texts(), vec!["from continuation"]);
    }

    #[tokio::test]
    async fn test_run_plan_unknown_action_errors() {
        let planner = Arc::new(MockPlanner::new(vec![]));
        let ai = Ai::new(planner, vec![]);
        let (ctx, _sink) = ctx_for("hi");
        let mut state = ConversationState::default();

        let plan = Plan::new(vec![do_cmd("ghost")]);
        let err = ai.run_plan(&ctx, &mut state, plan).await.unwrap_err();
        assert!(matches!(err, Error::UnknownAction(name) if name == "ghost"));
    }

    #[tokio::test]
    async fn test_run_plan_step_limit_bounds_feedback_loops() {
        let (action, calls) =
            CountingAction::new("spin", ActionOutcome::Feedback(String::new()));
        // Every continuation re-issues the same DO, forever.
        let spins = (0..32).map(|_| Plan::new(vec![do_cmd("spin")])).collect();
        let planner = Arc::new(MockPlanner::new(spins));
        let ai = Ai::new(planner, vec![action]);
        let (ctx, _sink) = ctx_for("hi");
        let mut state = ConversationState::default();

        ai.run_plan(&ctx, &mut state, Plan::new(vec![do_cmd("spin")]))
            .await
            .unwrap();

        assert!(calls.load(Ordering::Relaxed) <= MAX_PLAN_STEPS);
    }

    #[tokio::test]
    async fn test_do_action_validation_failure_becomes_feedback() {
        struct StrictAction;

        #[async_trait]
        impl Action for StrictAction {
            fn name(&self) -> &str {
                "strict"
            }
            fn description(&self) -> &str {
                "requires a name"
            }
            fn parameters_schema(&self) -> serde_json::Value {
                serde_json::json!({
                    "type": "object",
                    "properties": { "name": { "type": "string" } },
                    "required": ["name"]
                })
            }
            async fn execute(
                &self,
                _ctx: &TurnContext,
                _state: &mut ConversationState,
                _parameters: serde_json::Value,
                _ai: &Ai,
            ) -> Result<ActionOutcome> {
                panic!("must not execute with invalid arguments");
            }
        }

        let planner = Arc::new(MockPlanner::new(vec![]));
        let ai = Ai::new(planner, vec![Arc::new(StrictAction)]);
        let (ctx, _sink) = ctx_for("hi");
        let mut state = ConversationState::default();

        let outcome = ai
            .do_action(&ctx, &mut state, "strict", serde_json::json!({}))
            .await
            .unwrap();
        assert!(matches!(outcome, ActionOutcome::Feedback(msg) if msg.contains("validation")));
    }
}
