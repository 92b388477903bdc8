//! HTTP ticket source for the support CSV report.
//!
//! Implements the report pipeline's `TicketSource` trait against a
//! SupportBee-style REST API: paginated ticket listing, per-ticket reply
//! retrieval, and bounded retry with backoff on transient failures.

pub mod supportbee;

pub use supportbee::{SupportBeeClient, SupportBeeConfig};
