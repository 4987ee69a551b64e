//! Bot runtime: planner-driven plans, actions over Microsoft Graph,
//! moderated turn handling.
//!
//! The seams (`Planner`, `Moderator`, `Directory`, `ActivitySink`,
//! `Storage`) are traits so hosts and tests can swap implementations;
//! [`App`] wires them together.

pub mod action;
pub mod actions;
pub mod activity;
pub mod ai;
pub mod app;
pub mod error;
pub mod graph;
pub mod moderation;
pub mod planner;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use action::{Action, ActionOutcome, ActionRegistry, ActionSpec, BoxedAction};
pub use actions::default_actions;
pub use activity::{Activity, ActivitySink, IncomingActivity, TurnContext};
pub use ai::{Ai, PlannerDelivery};
pub use app::{App, AppBuilder};
pub use error::{Error, Result};
pub use graph::{Directory, DirectoryHandle, SharedDirectory};
pub use moderation::{ContentSafetyModerator, Moderator, NoopModerator, Verdict};
pub use planner::{ActionPlanner, Planner};
pub use state::{ConversationState, UserInfo};
pub use storage::{MemoryStorage, Storage};
