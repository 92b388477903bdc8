//! Ticket aggregation and metrics derivation for the support CSV report.
//!
//! This crate holds the whole per-ticket pipeline: reply classification and
//! chronological sequencing, first/average response-time derivation, row
//! flattening, and CSV serialization. Retrieval of tickets and replies lives
//! behind the [`TicketSource`] trait so the HTTP client stays out of the core.

pub mod csv_export;
pub mod reply_sequence;
pub mod report_run;
pub mod row_builder;
pub mod ticket;

pub use csv_export::{write_rows, CSV_HEADER};
pub use reply_sequence::{sequence, SequencedReply};
pub use report_run::{collect_report, ReportOutcome, TicketSource};
pub use row_builder::{build_row, DerivedRow, DATE_NOT_AVAILABLE};
pub use ticket::{Reply, Ticket, UNASSIGNED};
