//! Foundational low-level utilities shared across Replyrate crates.
//!
//! Provides tolerant JSON path lookups and upstream-timestamp parsing used by
//! the report pipeline and the ticket source client.

pub mod time_parse;
pub mod value_path;

pub use time_parse::{format_report_date, hours_between, parse_utc_timestamp};
pub use value_path::{lookup, lookup_bool, lookup_str};
