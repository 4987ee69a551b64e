//! Graph REST client

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::{Error, Result},
    types::{
        Attendee, Collection, DateTimeTimeZone, EmailAddress, FindMeetingTimesRequest,
        MeetingTimeOptions, MeetingTimeSuggestion, MeetingTimeSuggestionsResult, Person,
        TimeConstraint, TimeSlot, User,
    },
};

const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Time zone the meeting search is anchored to
const MEETING_TIME_ZONE: &str = "Central European Standard Time";

/// Default meeting duration in minutes
const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Microsoft Graph client bound to one user's access token
pub struct GraphClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GraphClient {
    /// Create a client from a bearer token. Blank tokens are rejected.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::InvalidToken);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: GRAPH_BASE_URL.to_string(),
            token,
        })
    }

    /// Override the base URL (for tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The signed-in user's profile
    pub async fn get_me(&self) -> Result<User> {
        self.get_json(&format!("{}/me", self.base_url), &[]).await
    }

    /// People relevant to the signed-in user
    pub async fn get_my_people(&self) -> Result<Vec<Person>> {
        let page: Collection<Person> = self
            .get_json(&format!("{}/me/people", self.base_url), &[])
            .await?;
        Ok(page.value)
    }

    /// Number of unread messages in the signed-in user's mailbox
    pub async fn get_my_unread_emails(&self) -> Result<u64> {
        let page: Collection<serde_json::Value> = self
            .get_json(
                &format!("{}/me/messages", self.base_url),
                &[
                    ("$filter", "isRead ne true"),
                    ("$count", "true"),
                    ("$top", "5"),
                ],
            )
            .await?;
        page.odata_count
            .ok_or_else(|| Error::UnexpectedResponse("message page had no @odata.count".into()))
    }

    /// Look up a user by display-name prefix
    pub async fn get_person(&self, display_name: &str) -> Result<Option<User>> {
        let filter = format!(
            "startswith(displayName, '{}')",
            escape_odata_literal(display_name)
        );
        let page: Collection<User> = self
            .get_json(
                &format!("{}/users", self.base_url),
                &[("$filter", filter.as_str()), ("$select", "displayName,mail")],
            )
            .await?;
        Ok(page.value.into_iter().next())
    }

    /// Suggest meeting times with the colleague named in `options`.
    ///
    /// Returns an empty list when the colleague cannot be resolved or
    /// the service reports a reason for having no suggestions.
    pub async fn find_meeting_times(
        &self,
        options: &MeetingTimeOptions,
    ) -> Result<Vec<MeetingTimeSuggestion>> {
        let Some(attendee) = self.get_person(&options.colleague).await? else {
            tracing::info!(colleague = %options.colleague, "no directory match for colleague");
            return Ok(vec![]);
        };

        let body = build_meeting_request(&attendee, options, Utc::now());

        let response = self
            .client
            .post(format!("{}/me/findMeetingTimes", self.base_url))
            .bearer_auth(&self.token)
            .header("Prefer", format!("outlook.timezone=\"{MEETING_TIME_ZONE}\""))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), text));
        }

        let result: MeetingTimeSuggestionsResult = response.json().await?;
        if let Some(reason) = result.empty_suggestions_reason.filter(|r| !r.is_empty()) {
            tracing::info!(%reason, "no meeting times available");
            return Ok(vec![]);
        }

        Ok(result.meeting_time_suggestions)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), text));
        }

        Ok(response.json().await?)
    }
}

/// Escape a string literal for use inside an OData filter expression
fn escape_odata_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Assemble the `findMeetingTimes` request body.
///
/// Window defaults: start now, end two days out. Duration defaults to
/// 30 minutes and is encoded as an ISO-8601 duration.
fn build_meeting_request(
    attendee: &User,
    options: &MeetingTimeOptions,
    now: DateTime<Utc>,
) -> FindMeetingTimesRequest {
    let start_time = options
        .start_time
        .clone()
        .unwrap_or_else(|| now.to_rfc3339());
    let end_time = options
        .end_time
        .clone()
        .unwrap_or_else(|| (now + Duration::days(2)).to_rfc3339());
    let duration = options.duration.unwrap_or(DEFAULT_DURATION_MINUTES);

    FindMeetingTimesRequest {
        attendees: vec![Attendee {
            email_address: EmailAddress {
                address: attendee.mail.clone().unwrap_or_default(),
                name: attendee.display_name.clone().unwrap_or_default(),
            },
            attendee_type: "required".to_string(),
        }],
        time_constraint: TimeConstraint {
            timeslots: vec![TimeSlot {
                start: DateTimeTimeZone {
                    date_time: start_time,
                    time_zone: MEETING_TIME_ZONE.to_string(),
                },
                end: DateTimeTimeZone {
                    date_time: end_time,
                    time_zone: MEETING_TIME_ZONE.to_string(),
                },
            }],
        },
        meeting_duration: format!("PT{duration}M"),
        return_suggestion_reasons: true,
        minimum_attendee_percentage: 100,
    }
}
