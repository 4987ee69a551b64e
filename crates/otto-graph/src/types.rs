//! Graph wire types
//!
//! Only the fields the bot actually reads are modeled; everything else
//! in the Graph payloads is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// A directory user (from `/me` or `/users`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
}

/// A relevant person (from `/me/people`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Generic Graph collection envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// Present when the request asked for `$count=true`
    #[serde(rename = "@odata.count", default)]
    pub odata_count: Option<u64>,
}

/// Options for a meeting-time search, as supplied by the planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetingTimeOptions {
    /// Display name of the colleague to meet with
    pub colleague: String,
    /// ISO-8601 start of the search window; defaults to now
    pub start_time: Option<String>,
    /// ISO-8601 end of the search window; defaults to two days out
    pub end_time: Option<String>,
    /// Meeting duration in minutes; defaults to 30
    pub duration: Option<u32>,
}

/// A date-time with an explicit time zone
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone {
    pub date_time: String,
    pub time_zone: String,
}

/// A candidate meeting slot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start: DateTimeTimeZone,
    pub end: DateTimeTimeZone,
}

/// One suggestion returned by `findMeetingTimes`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingTimeSuggestion {
    /// Percentage chance all attendees can make it
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub meeting_time_slot: Option<TimeSlot>,
}

/// Envelope for the `findMeetingTimes` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingTimeSuggestionsResult {
    #[serde(default)]
    pub empty_suggestions_reason: Option<String>,
    #[serde(default)]
    pub meeting_time_suggestions: Vec<MeetingTimeSuggestion>,
}

// -- findMeetingTimes request body --

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddress {
    pub address: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email_address: EmailAddress,
    #[serde(rename = "type")]
    pub attendee_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeConstraint {
    pub timeslots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMeetingTimesRequest {
    pub attendees: Vec<Attendee>,
    pub time_constraint: TimeConstraint,
    /// ISO-8601 duration, e.g. `PT30M`
    pub meeting_duration: String,
    pub return_suggestion_reasons: bool,
    pub minimum_attendee_percentage: u32,
}
