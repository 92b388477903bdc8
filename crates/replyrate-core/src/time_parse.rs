use chrono::{DateTime, NaiveDateTime, Utc};

/// Fixed-width layout the upstream API uses for every timestamp field.
const UPSTREAM_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parses an upstream UTC timestamp. Tries the fixed `YYYY-MM-DDTHH:MM:SSZ`
/// layout first and falls back to a general RFC 3339 parse.
pub fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, UPSTREAM_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Fractional hours elapsed from `earlier` to `later`.
pub fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_seconds() as f64 / 3600.0
}

/// Formats a timestamp for report display as `MM-DD-YYYY`.
pub fn format_report_date(instant: DateTime<Utc>) -> String {
    instant.format("%m-%d-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_report_date, hours_between, parse_utc_timestamp};

    #[test]
    fn unit_parse_utc_timestamp_accepts_the_fixed_upstream_layout() {
        let parsed = parse_utc_timestamp("2024-03-05T10:00:00Z").expect("parse");
        assert_eq!(parsed.to_rfc3339(), "2024-03-05T10:00:00+00:00");
    }

    #[test]
    fn functional_parse_utc_timestamp_falls_back_to_rfc3339_offsets() {
        let parsed = parse_utc_timestamp("2024-03-05T12:00:00+02:00").expect("parse");
        assert_eq!(parsed.to_rfc3339(), "2024-03-05T10:00:00+00:00");
    }

    #[test]
    fn regression_parse_utc_timestamp_rejects_garbage_without_panicking() {
        assert!(parse_utc_timestamp("").is_none());
        assert!(parse_utc_timestamp("   ").is_none());
        assert!(parse_utc_timestamp("not-a-date").is_none());
        assert!(parse_utc_timestamp("2024-13-99T99:99:99Z").is_none());
    }

    #[test]
    fn unit_hours_between_scales_seconds_to_fractional_hours() {
        let start = parse_utc_timestamp("2024-03-05T10:00:00Z").expect("parse");
        let end = parse_utc_timestamp("2024-03-05T11:30:00Z").expect("parse");
        assert_eq!(hours_between(start, end), 1.5);
        assert_eq!(hours_between(start, start), 0.0);
    }

    #[test]
    fn unit_format_report_date_uses_month_day_year() {
        let instant = parse_utc_timestamp("2024-03-05T10:00:00Z").expect("parse");
        assert_eq!(format_report_date(instant), "03-05-2024");
    }
}
