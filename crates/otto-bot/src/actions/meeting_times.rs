//! Meeting-time search action

use async_trait::async_trait;
use chrono::NaiveDateTime;

use otto_graph::{MeetingTimeOptions, MeetingTimeSuggestion};

use crate::{
    action::{Action, ActionOutcome},
    activity::TurnContext,
    ai::Ai,
    error::Result,
    graph::DirectoryHandle,
    state::ConversationState,
};

/// Finds meeting times with a named colleague and reports them.
///
/// Unlike the lazy-slot actions this one answers directly: suggestions
/// are time-sensitive, so nothing is cached in conversation state.
pub struct FindMeetingTimes {
    directory: DirectoryHandle,
}

impl FindMeetingTimes {
    pub fn new(directory: DirectoryHandle) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Action for FindMeetingTimes {
    fn name(&self) -> &str {
        "findMeetingTimes"
    }

    fn description(&self) -> &str {
        "Find times when the user and a colleague can meet"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "colleague": {
                    "type": "string",
                    "description": "Display name of the colleague to meet with"
                },
                "startTime": {
                    "type": "string",
                    "description": "ISO-8601 start of the search window"
                },
                "endTime": {
                    "type": "string",
                    "description": "ISO-8601 end of the search window"
                },
                "duration": {
                    "type": "number",
                    "description": "Meeting duration in minutes"
                }
            }
        })
    }

    async fn execute(
        &self,
        ctx: &TurnContext,
        _state: &mut ConversationState,
        parameters: serde_json::Value,
        _ai: &Ai,
    ) -> Result<ActionOutcome> {
        let options: MeetingTimeOptions = match serde_json::from_value(parameters) {
            Ok(options) => options,
            Err(e) => return Ok(ActionOutcome::Feedback(format!("Invalid arguments: {e}"))),
        };

        if options.colleague.trim().is_empty() {
            ctx.send_activity("You need to specify a colleague to find meeting times with.")
                .await?;
            return Ok(ActionOutcome::Stop);
        }

        let suggestions = self.directory.get()?.find_meeting_times(&options).await?;
        let text = if suggestions.is_empty() {
            format!("No meeting times found with {}.", options.colleague)
        } else {
            format_suggestions(&options.colleague, &suggestions)
        };

        ctx.send_activity(text).await?;
        Ok(ActionOutcome::Stop)
    }
}

/// Render confident suggestions as a readable list.
///
/// Graph reports confidence as a percentage; only slots every attendee
/// can make (100%) are shown.
fn format_suggestions(colleague: &str, suggestions: &[MeetingTimeSuggestion]) -> String {
    let mut lines = vec![format!("Here are some times that work with {colleague}:")];

    for suggestion in suggestions {
        if suggestion.confidence.unwrap_or(0.0) < 100.0 {
            continue;
        }
        let Some(slot) = &suggestion.meeting_time_slot else {
            continue;
        };
        let (Some(start), Some(end)) = (
            parse_graph_datetime(&slot.start.date_time),
            parse_graph_datetime(&slot.end.date_time),
        ) else {
            tracing::warn!(start = %slot.start.date_time, "unparseable suggestion slot");
            continue;
        };

        lines.push(format!(
            "- {} from {} to {}",
            start.format("%A, %B %-d"),
            start.format("%H:%M"),
            end.format("%H:%M"),
        ));
    }

    if lines.len() == 1 {
        return format!("No meeting times found with {colleague}.");
    }
    lines.join("\n")
}

/// Graph emits local times like `2026-08-24T09:00:00.0000000`
fn parse_graph_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}
