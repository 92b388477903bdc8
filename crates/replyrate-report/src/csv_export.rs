use std::io::Write;

use anyhow::{Context, Result};

use crate::row_builder::DerivedRow;

/// Column order for the report; every row carries exactly this set.
pub const CSV_HEADER: [&str; 8] = [
    "ticket_id",
    "date",
    "labels",
    "ticket_description",
    "assignee",
    "first_response_time_hours",
    "average_response_time_hours",
    "transcript",
];

/// Serializes derived rows as UTF-8 CSV with a header row.
///
/// Quoting follows standard CSV rules via the `csv` crate, so descriptions
/// and transcripts containing commas, quotes, or newlines round-trip. Null
/// metrics serialize as empty fields, never a textual placeholder.
pub fn write_rows<W: Write>(writer: W, rows: &[DerivedRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(CSV_HEADER)
        .context("failed to write csv header")?;
    for row in rows {
        let first_response = format_metric(row.first_response_hours);
        let average_response = format_metric(row.average_response_hours);
        csv_writer
            .write_record([
                row.ticket_id.as_str(),
                row.date.as_str(),
                row.labels.as_str(),
                row.ticket_description.as_str(),
                row.assignee.as_str(),
                first_response.as_str(),
                average_response.as_str(),
                row.transcript.as_str(),
            ])
            .context("failed to write csv row")?;
    }
    csv_writer.flush().context("failed to flush csv output")?;
    Ok(())
}

fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(hours) => hours.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{write_rows, CSV_HEADER};
    use crate::row_builder::DerivedRow;

    fn sample_row() -> DerivedRow {
        DerivedRow {
            ticket_id: "42".to_string(),
            date: "03-05-2024".to_string(),
            labels: "bug, urgent".to_string(),
            ticket_description: "subject says \"urgent\", body has\nnewlines".to_string(),
            assignee: "Tier2".to_string(),
            first_response_hours: Some(1.0),
            average_response_hours: None,
            transcript: "agent: one\ncustomer: two, with comma".to_string(),
        }
    }

    #[test]
    fn unit_write_rows_emits_header_first() {
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &[]).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(text.lines().next().unwrap(), CSV_HEADER.join(","));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn integration_rows_round_trip_through_csv_parsing() {
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &[sample_row()]).expect("write");

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let headers = reader.headers().expect("headers").clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADER.to_vec());

        let record = reader
            .records()
            .next()
            .expect("one record")
            .expect("valid record");
        assert_eq!(&record[0], "42");
        assert_eq!(&record[2], "bug, urgent");
        assert_eq!(&record[3], "subject says \"urgent\", body has\nnewlines");
        assert_eq!(&record[7], "agent: one\ncustomer: two, with comma");
    }

    #[test]
    fn unit_null_metrics_serialize_as_empty_fields() {
        let mut row = sample_row();
        row.first_response_hours = None;
        row.average_response_hours = None;
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &[row]).expect("write");

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let record = reader
            .records()
            .next()
            .expect("one record")
            .expect("valid record");
        assert_eq!(&record[5], "");
        assert_eq!(&record[6], "");
        let text = String::from_utf8(buffer).expect("utf8");
        assert!(!text.contains("None"));
        assert!(!text.contains("null"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn functional_metric_fields_render_as_plain_decimals() {
        let mut row = sample_row();
        row.first_response_hours = Some(0.75);
        row.average_response_hours = Some(2.0);
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &[row]).expect("write");

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let record = reader
            .records()
            .next()
            .expect("one record")
            .expect("valid record");
        assert_eq!(&record[5], "0.75");
        assert_eq!(&record[6], "2");
    }
}
