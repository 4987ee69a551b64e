//! otto-ai: chat-completion client and plan types
//!
//! This crate provides the HTTP layer under the bot's planner: a
//! non-streaming chat-completion client for OpenAI and Azure OpenAI,
//! the DO/SAY plan model those completions are parsed into, and a
//! client for the Azure Content Safety moderation API.

pub mod client;
pub mod error;
pub mod moderation;
pub mod types;

pub use client::{ChatClient, ChatEndpoint, ChatRequest};
pub use error::{Error, Result};
pub use moderation::{CategoryScore, ContentSafetyClient, Severity};
pub use types::*;
