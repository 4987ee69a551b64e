//! In-memory doubles shared across the crate's unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use otto_ai::Plan;
use otto_graph::{MeetingTimeOptions, MeetingTimeSuggestion, Person, User};

use crate::{
    activity::{Activity, ActivitySink, TurnContext},
    error::{Error, Result},
    graph::Directory,
    planner::Planner,
    state::ConversationState,
};

/// Sink that records every delivered activity
#[derive(Default)]
pub struct RecordingSink {
    activities: Mutex<Vec<Activity>>,
}

impl RecordingSink {
    /// Everything delivered so far, in order
    pub fn activities(&self) -> Vec<Activity> {
        self.activities.lock().clone()
    }

    /// Just the message texts, in delivery order
    pub fn texts(&self) -> Vec<String> {
        self.activities()
            .into_iter()
            .filter_map(|a| match a {
                Activity::Message { text } => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ActivitySink for RecordingSink {
    async fn send(&self, activity: Activity) -> Result<()> {
        self.activities.lock().push(activity);
        Ok(())
    }
}

/// Build a message turn wired to a fresh recording sink
pub fn ctx_for(text: &str) -> (TurnContext, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let ctx = TurnContext::message("test-conversation", text, sink.clone());
    (ctx, sink)
}

/// Planner that replays a scripted sequence of plans.
///
/// Both `begin_task` and `continue_task` consume from the same script.
/// When the script runs out, an empty plan is returned, or an error if
/// [`erroring`](Self::erroring) was set.
pub struct MockPlanner {
    script: Mutex<VecDeque<Plan>>,
    begin_calls: AtomicU32,
    continue_calls: AtomicU32,
    error_when_exhausted: bool,
}

impl MockPlanner {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self {
            script: Mutex::new(plans.into()),
            begin_calls: AtomicU32::new(0),
            continue_calls: AtomicU32::new(0),
            error_when_exhausted: false,
        }
    }

    /// Fail instead of returning empty plans once the script runs out
    pub fn erroring(mut self) -> Self {
        self.error_when_exhausted = true;
        self
    }

    pub fn begin_calls(&self) -> u32 {
        self.begin_calls.load(Ordering::Relaxed)
    }

    pub fn continue_calls(&self) -> u32 {
        self.continue_calls.load(Ordering::Relaxed)
    }

    fn next_plan(&self) -> Result<Plan> {
        match self.script.lock().pop_front() {
            Some(plan) => Ok(plan),
            None if self.error_when_exhausted => Err(Error::Ai(
                otto_ai::Error::UnexpectedResponse("mock planner script exhausted".into()),
            )),
            None => Ok(Plan::default()),
        }
    }
}

#[async_trait]
impl Planner for MockPlanner {
    async fn begin_task(&self, _ctx: &TurnContext, _state: &ConversationState) -> Result<Plan> {
        self.begin_calls.fetch_add(1, Ordering::Relaxed);
        self.next_plan()
    }

    async fn continue_task(&self, _ctx: &TurnContext, _state: &ConversationState) -> Result<Plan> {
        self.continue_calls.fetch_add(1, Ordering::Relaxed);
        self.next_plan()
    }
}

/// Directory backed by canned data
#[derive(Default)]
pub struct FakeDirectory {
    pub me: User,
    pub people: Vec<Person>,
    pub unread: u64,
    pub suggestions: Vec<MeetingTimeSuggestion>,
    /// When set, colleague lookups behave as if nobody matched
    pub unknown_colleagues: bool,
}

impl FakeDirectory {
    /// A directory populated with a small, plausible org
    pub fn sample() -> Self {
        Self {
            me: User {
                display_name: Some("Ada Lovelace".into()),
                mail: Some("ada@contoso.com".into()),
            },
            people: vec![
                Person {
                    display_name: Some("Grace Hopper".into()),
                },
                Person {
                    display_name: Some("Edsger Dijkstra".into()),
                },
            ],
            unread: 4,
            suggestions: vec![],
            unknown_colleagues: false,
        }
    }
}

#[async_trait]
impl Directory for FakeDirectory {
    async fn me(&self) -> Result<User> {
        Ok(self.me.clone())
    }

    async fn people(&self) -> Result<Vec<Person>> {
        Ok(self.people.clone())
    }

    async fn unread_email_count(&self) -> Result<u64> {
        Ok(self.unread)
    }

    async fn find_meeting_times(
        &self,
        _options: &MeetingTimeOptions,
    ) -> Result<Vec<MeetingTimeSuggestion>> {
        if self.unknown_colleagues {
            return Ok(vec![]);
        }
        Ok(self.suggestions.clone())
    }
}
