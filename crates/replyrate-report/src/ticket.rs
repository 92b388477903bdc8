use replyrate_core::value_path::{lookup_bool, lookup_str};
use serde::Deserialize;
use serde_json::Value;

/// Display name used when neither a user nor a team assignee is present.
pub const UNASSIGNED: &str = "Unassigned";

/// One support conversation as delivered by the upstream API.
///
/// Fields the pipeline only ever reads through tolerant lookups stay as raw
/// [`Value`]s; unknown upstream keys are ignored. Replies are attached after
/// construction by a second retrieval step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ticket {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_activity_at: Option<String>,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub labels: Vec<Value>,
    #[serde(default)]
    pub current_user_assignee: Value,
    #[serde(default)]
    pub current_team_assignee: Value,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Ticket {
    /// Renders the opaque identifier for display. Upstream sends numbers
    /// today, but the report never does arithmetic on the id.
    pub fn id_display(&self) -> String {
        match &self.id {
            Value::String(text) => text.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    pub fn description(&self) -> &str {
        lookup_str(&self.content, &["text"], "")
    }

    /// Label entries may be `{name: …}` records or bare strings; both resolve
    /// to their display string. An empty label list renders as `""`.
    pub fn label_display(&self) -> String {
        self.labels
            .iter()
            .map(|entry| match entry {
                Value::String(name) => name.as_str(),
                other => lookup_str(other, &["name"], ""),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Assignee resolution order: user-level name, then team-level name, then
    /// [`UNASSIGNED`].
    pub fn assignee_display(&self) -> String {
        let user = lookup_str(&self.current_user_assignee, &["name"], "");
        if !user.trim().is_empty() {
            return user.to_string();
        }
        let team = lookup_str(&self.current_team_assignee, &["name"], "");
        if !team.trim().is_empty() {
            return team.to_string();
        }
        UNASSIGNED.to_string()
    }
}

/// One message within a ticket's thread.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub agent_responder: Option<bool>,
    #[serde(default)]
    pub replier: Value,
}

impl Reply {
    /// Canonical role resolution: the top-level `agent_responder` flag wins,
    /// then `replier.agent`. A reply carrying neither signal is a customer
    /// reply; there is no unknown-responder state.
    pub fn is_agent(&self) -> bool {
        self.agent_responder == Some(true) || lookup_bool(&self.replier, &["agent"])
    }

    pub fn body(&self) -> &str {
        lookup_str(&self.content, &["text"], "")
    }

    /// Chronological sort key. Upstream timestamps share the fixed-width UTC
    /// `Z` layout, so the raw string orders correctly; a missing timestamp
    /// sorts first via the empty key.
    pub fn sort_key(&self) -> &str {
        self.created_at.as_deref().unwrap_or("")
    }
}
