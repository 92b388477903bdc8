use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::row_builder::{build_row, DerivedRow};
use crate::ticket::{Reply, Ticket};

/// Retrieval seam for the upstream ticketing API.
///
/// The pipeline only depends on this trait; the HTTP client lives in a
/// separate crate. Both operations are fallible, but only a ticket-list
/// failure aborts the run.
#[async_trait]
pub trait TicketSource: Send + Sync {
    /// Tickets active in the inclusive `[since, until]` range, in the order
    /// the upstream delivers them.
    async fn fetch_tickets(&self, since: &str, until: &str) -> Result<Vec<Ticket>>;

    /// The full reply thread for one ticket.
    async fn fetch_replies(&self, ticket_id: &str) -> Result<Vec<Reply>>;
}

/// Outcome of one reporting run.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// One derived row per fetched ticket, in fetch order.
    Rows(Vec<DerivedRow>),
    /// The range matched no tickets; callers should report "no data" instead
    /// of writing an empty file.
    NoTickets,
}

/// Runs the full pipeline: fetch tickets, attach each ticket's replies, and
/// derive one row per ticket.
///
/// A failed reply fetch is logged and degrades that ticket to an empty
/// thread; the run continues. Row order always matches ticket fetch order.
pub async fn collect_report(
    source: &dyn TicketSource,
    since: &str,
    until: &str,
) -> Result<ReportOutcome> {
    let mut tickets = source.fetch_tickets(since, until).await?;
    if tickets.is_empty() {
        return Ok(ReportOutcome::NoTickets);
    }

    let mut rows = Vec::with_capacity(tickets.len());
    for ticket in &mut tickets {
        let ticket_id = ticket.id_display();
        match source.fetch_replies(&ticket_id).await {
            Ok(replies) => ticket.replies = replies,
            Err(error) => {
                warn!("failed to fetch replies for ticket {ticket_id}: {error:#}");
                ticket.replies = Vec::new();
            }
        }
        rows.push(build_row(ticket));
    }
    Ok(ReportOutcome::Rows(rows))
}
