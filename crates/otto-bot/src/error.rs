//! Error types for otto-bot

use thiserror::Error;

/// Result type alias using otto-bot Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during bot operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the planner/moderation client layer
    #[error(transparent)]
    Ai(#[from] otto_ai::Error),

    /// An error from the Graph client
    #[error(transparent)]
    Graph(#[from] otto_graph::Error),

    /// The retry budget was exhausted and the final plan carried no
    /// deliverable text
    #[error("planner produced no deliverable response after {attempts} attempts")]
    NoPlannerResponse { attempts: u32 },

    /// A plan referenced an action that is not registered
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// A Graph-backed action ran before any sign-in completed
    #[error("not signed in")]
    NotSignedIn,

    /// Activity delivery failed
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Conversation storage failed
    #[error("storage error: {0}")]
    Storage(String),

    /// The app was assembled with missing or invalid pieces
    #[error("configuration error: {0}")]
    Config(String),
}
