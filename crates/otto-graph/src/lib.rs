//! otto-graph: thin Microsoft Graph client
//!
//! Wraps the handful of Graph operations the bot needs: the signed-in
//! user's profile, their people list, their unread-mail count, person
//! search, and meeting-time suggestions. Authentication and token
//! exchange happen elsewhere; this crate only carries a bearer token.

pub mod client;
pub mod error;
pub mod types;

pub use client::GraphClient;
pub use error::{Error, Result};
pub use types::*;
