//! Conversation state: lazily populated Graph facts

use serde::{Deserialize, Serialize};

/// The signed-in user's identity, cached after the first lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub mail: Option<String>,
    pub name: Option<String>,
}

/// Per-conversation state.
///
/// Each slot is populated at most once per conversation (until a
/// reset); once a slot is filled the planner answers from the prompt
/// instead of re-fetching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationState {
    pub user_info: Option<UserInfo>,
    pub colleagues: Option<Vec<String>>,
    pub unread_emails: Option<u64>,
}

impl ConversationState {
    /// Clear every slot (the `/reset` command)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Render the populated slots as prompt lines for the planner
    pub fn facts(&self) -> Vec<String> {
        let mut facts = Vec::new();
        if let Some(info) = &self.user_info {
            if let Some(name) = &info.name {
                facts.push(format!("The user's name is {name}."));
            }
            if let Some(mail) = &info.mail {
                facts.push(format!("The user's email address is {mail}."));
            }
        }
        if let Some(colleagues) = &self.colleagues {
            facts.push(format!(
                "The user collaborates with {} people: {}.",
                colleagues.len(),
                colleagues.join(", ")
            ));
        }
        if let Some(unread) = self.unread_emails {
            facts.push(format!("The user has {unread} unread emails."));
        }
        facts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facts_empty_state() {
        assert!(ConversationState::default().facts().is_empty());
    }

    #[test]
    fn test_facts_render_populated_slots() {
        let state = ConversationState {
            user_info: Some(UserInfo {
                mail: Some("ada@contoso.com".into()),
                name: Some("Ada Lovelace".into()),
            }),
            colleagues: Some(vec!["Grace".into(), "Edsger".into()]),
            unread_emails: Some(4),
        };

        let facts = state.facts();
        assert_eq!(facts.len(), 4);
        assert!(facts[0].contains("Ada Lovelace"));
        assert!(facts[1].contains("ada@contoso.com"));
        assert!(facts[2].contains("2 people: Grace, Edsger"));
        assert!(facts[3].contains("4 unread emails"));
    }

    #[test]
    fn test_reset_clears_slots() {
        let mut state = ConversationState {
            unread_emails: Some(9),
            ..Default::default()
        };
        state.reset();
        assert!(state.unread_emails.is_none());
        assert!(state.facts().is_empty());
    }
}
