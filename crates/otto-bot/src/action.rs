//! Action trait and registry

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{activity::TurnContext, ai::Ai, error::Result, state::ConversationState};

/// What an action tells the dispatcher to do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action answered the user itself; stop executing the plan
    Stop,
    /// Hand control back to the planner. The text (possibly empty) is
    /// the action's feedback; state changes are the real signal.
    Feedback(String),
}

/// Trait for plan-executable actions
#[async_trait]
pub trait Action: Send + Sync {
    /// Action name (referenced by DO commands)
    fn name(&self) -> &str;

    /// Description for the planner prompt
    fn description(&self) -> &str;

    /// JSON Schema for parameters
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object", "properties": {}})
    }

    /// Execute the action for the current turn
    async fn execute(
        &self,
        ctx: &TurnContext,
        state: &mut ConversationState,
        parameters: serde_json::Value,
        ai: &Ai,
    ) -> Result<ActionOutcome>;
}

/// Type alias for a boxed action
pub type BoxedAction = Arc<dyn Action>;

/// A prompt-facing snapshot of one action
#[derive(Debug, Clone)]
pub struct ActionSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Registered actions plus their compiled argument validators
#[derive(Default)]
pub struct ActionRegistry {
    actions: Vec<BoxedAction>,
    schema_cache: HashMap<String, Arc<jsonschema::Validator>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action, compiling and caching its schema validator
    pub fn register(&mut self, action: BoxedAction) {
        let schema = action.parameters_schema();
        match jsonschema::validator_for(&schema) {
            Ok(validator) => {
                self.schema_cache
                    .insert(action.name().to_string(), Arc::new(validator));
            }
            Err(e) => {
                tracing::warn!(
                    "Invalid parameter schema for action '{}', skipping validation: {}",
                    action.name(),
                    e
                );
            }
        }
        self.actions.push(action);
    }

    /// Look up an action by name
    pub fn get(&self, name: &str) -> Option<&BoxedAction> {
        self.actions.iter().find(|a| a.name() == name)
    }

    /// Registered action names
    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    /// Prompt-facing specs for all registered actions
    pub fn specs(&self) -> Vec<ActionSpec> {
        self.actions
            .iter()
            .map(|a| ActionSpec {
                name: a.name().to_string(),
                description: a.description().to_string(),
                parameters: a.parameters_schema(),
            })
            .collect()
    }

    /// Validate arguments for a named action.
    ///
    /// Returns `Some(error_message)` if validation fails, `None` when
    /// valid or no validator is cached.
    pub fn validate(&self, name: &str, arguments: &serde_json::Value) -> Option<String> {
        let validator = self.schema_cache.get(name)?;
        let errors: Vec<String> = validator
            .iter_errors(arguments)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", path, e)
                }
            })
            .collect();

        if errors.is_empty() {
            None
        } else {
            Some(format!(
                "Action argument validation failed:\n{}",
                errors.join("\n")
            ))
        }
    }
}
