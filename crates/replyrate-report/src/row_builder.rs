use chrono::{DateTime, Utc};
use replyrate_core::time_parse::{format_report_date, hours_between, parse_utc_timestamp};

use crate::reply_sequence::sequence;
use crate::ticket::Ticket;

/// Display value used when `last_activity_at` is absent or unparseable.
pub const DATE_NOT_AVAILABLE: &str = "N/A";

/// The flattened, export-ready representation of one ticket.
///
/// Metric fields are `None` when their anchors are missing; they are never a
/// textual placeholder. Every row in a run carries the same column set.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRow {
    pub ticket_id: String,
    pub date: String,
    pub labels: String,
    pub ticket_description: String,
    pub assignee: String,
    pub first_response_hours: Option<f64>,
    pub average_response_hours: Option<f64>,
    pub transcript: String,
}

/// Flattens one ticket into its export row with a single forward pass over
/// the ordered, classified reply sequence.
///
/// Total by construction: every extraction path has a default, so malformed
/// data degrades this ticket's row instead of aborting the run. A ticket with
/// zero replies yields null metrics and an empty transcript.
pub fn build_row(ticket: &Ticket) -> DerivedRow {
    let created_at = ticket.created_at.as_deref().and_then(parse_utc_timestamp);

    // Interval basis is "time since the previous message of either role",
    // anchored at ticket creation when that instant is known.
    let mut previous_message_time = created_at;
    let mut first_agent_reply_time: Option<DateTime<Utc>> = None;
    let mut first_agent_seen = false;
    let mut agent_intervals: Vec<f64> = Vec::new();
    let mut transcript_lines: Vec<String> = Vec::new();

    for entry in sequence(&ticket.replies) {
        let reply_time = entry
            .reply
            .created_at
            .as_deref()
            .and_then(parse_utc_timestamp);
        if entry.is_agent {
            if let (Some(previous), Some(current)) = (previous_message_time, reply_time) {
                agent_intervals.push(hours_between(previous, current).max(0.0));
            }
            if !first_agent_seen {
                first_agent_seen = true;
                first_agent_reply_time = reply_time;
            }
        }
        let role = if entry.is_agent { "agent" } else { "customer" };
        transcript_lines.push(format!("{role}: {}", entry.reply.body()));
        if reply_time.is_some() {
            previous_message_time = reply_time;
        }
    }

    let first_response_hours = match (created_at, first_agent_reply_time) {
        (Some(created), Some(first_reply)) => Some(hours_between(created, first_reply).max(0.0)),
        _ => None,
    };
    let average_response_hours = if agent_intervals.is_empty() {
        None
    } else {
        Some(agent_intervals.iter().sum::<f64>() / agent_intervals.len() as f64)
    };

    DerivedRow {
        ticket_id: ticket.id_display(),
        date: report_date(ticket.last_activity_at.as_deref()),
        labels: ticket.label_display(),
        ticket_description: ticket.description().to_string(),
        assignee: ticket.assignee_display(),
        first_response_hours,
        average_response_hours,
        transcript: transcript_lines.join("\n"),
    }
}

fn report_date(raw: Option<&str>) -> String {
    raw.and_then(parse_utc_timestamp)
        .map(format_report_date)
        .unwrap_or_else(|| DATE_NOT_AVAILABLE.to_string())
}
