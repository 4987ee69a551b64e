//! Built-in actions the planner can invoke

mod colleagues;
mod greetings;
mod meeting_times;
mod unread_emails;
mod user_info;

pub use colleagues::GetUserColleagues;
pub use greetings::Greetings;
pub use meeting_times::FindMeetingTimes;
pub use unread_emails::GetUserUnreadEmails;
pub use user_info::GetUserInfo;

use std::sync::Arc;

use crate::{action::BoxedAction, graph::DirectoryHandle};

/// The standard action set, wired to a shared directory handle
pub fn default_actions(directory: DirectoryHandle) -> Vec<BoxedAction> {
    vec![
        Arc::new(Greetings),
        Arc::new(GetUserInfo::new(directory.clone())),
        Arc::new(GetUserColleagues::new(directory.clone())),
        Arc::new(GetUserUnreadEmails::new(directory.clone())),
        Arc::new(FindMeetingTimes::new(directory)),
    ]
}
