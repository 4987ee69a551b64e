//! Directory seam over the Graph client

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use otto_graph::{GraphClient, MeetingTimeOptions, MeetingTimeSuggestion, Person, User};

use crate::error::{Error, Result};

/// The Graph operations the actions depend on.
///
/// Kept as a trait so actions can be exercised without network access;
/// the real implementation is [`GraphClient`].
#[async_trait]
pub trait Directory: Send + Sync {
    /// The signed-in user's profile
    async fn me(&self) -> Result<User>;

    /// People relevant to the signed-in user
    async fn people(&self) -> Result<Vec<Person>>;

    /// Number of unread messages in the user's mailbox
    async fn unread_email_count(&self) -> Result<u64>;

    /// Meeting-time suggestions for the user and a colleague
    async fn find_meeting_times(
        &self,
        options: &MeetingTimeOptions,
    ) -> Result<Vec<MeetingTimeSuggestion>>;
}

#[async_trait]
impl Directory for GraphClient {
    async fn me(&self) -> Result<User> {
        Ok(self.get_me().await?)
    }

    async fn people(&self) -> Result<Vec<Person>> {
        Ok(self.get_my_people().await?)
    }

    async fn unread_email_count(&self) -> Result<u64> {
        Ok(self.get_my_unread_emails().await?)
    }

    async fn find_meeting_times(
        &self,
        options: &MeetingTimeOptions,
    ) -> Result<Vec<MeetingTimeSuggestion>> {
        Ok(GraphClient::find_meeting_times(self, options).await?)
    }
}

/// Shared directory reference
pub type SharedDirectory = Arc<dyn Directory>;

/// Slot holding the current directory client.
///
/// Empty until the first successful sign-in; replaced wholesale when a
/// refreshed token produces a new client.
#[derive(Clone, Default)]
pub struct DirectoryHandle {
    inner: Arc<RwLock<Option<SharedDirectory>>>,
}

impl DirectoryHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a sign-in has installed a client
    pub fn is_set(&self) -> bool {
        self.inner.read().is_some()
    }

    /// Install or replace the directory client
    pub fn set(&self, directory: SharedDirectory) {
        *self.inner.write() = Some(directory);
    }

    /// Get the current client, failing when nobody signed in yet
    pub fn get(&self) -> Result<SharedDirectory> {
        self.inner.read().clone().ok_or(Error::NotSignedIn)
    }
}
