//! Stats table output and console diagnostics.
//!
//! The aggregated tables are written as CSV for whatever renders them next
//! (a spreadsheet, a plotting script). Column names follow the short forms
//! used throughout: `chats`, `msg`, `chr`, `media_sec`.

use crate::table::MessageRow;

#[cfg(feature = "csv-output")]
use crate::error::Result;
#[cfg(feature = "csv-output")]
use crate::stats::{SentReceivedRow, StatBucket, StatRow};
#[cfg(feature = "csv-output")]
use std::fs::File;

/// Period key format in CSV output.
#[cfg(feature = "csv-output")]
const PERIOD_FORMAT: &str = "%Y-%m-%d";

#[cfg(feature = "csv-output")]
fn bucket_fields(bucket: Option<&StatBucket>) -> [String; 4] {
    // An absent side stays empty in the CSV, it is not the same as zero
    match bucket {
        Some(b) => [
            b.chats.to_string(),
            b.messages.to_string(),
            b.chars.to_string(),
            b.media_seconds.to_string(),
        ],
        None => [String::new(), String::new(), String::new(), String::new()],
    }
}

/// Writes a single aggregated table as CSV.
///
/// Columns: `period;chats;msg;chr;media_sec`.
#[cfg(feature = "csv-output")]
pub fn write_stats_csv(rows: &[StatRow], output_path: &str) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(file);

    writer.write_record(["period", "chats", "msg", "chr", "media_sec"])?;

    for row in rows {
        let mut record = vec![row.period.format(PERIOD_FORMAT).to_string()];
        record.extend(bucket_fields(Some(&row.bucket)));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the merged sent/received table as CSV.
///
/// Columns: `period` followed by the four aggregates suffixed `_sent`, then
/// `_received`. Sides absent under an outer join serialize as empty fields.
#[cfg(feature = "csv-output")]
pub fn write_sent_received_csv(rows: &[SentReceivedRow], output_path: &str) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(file);

    writer.write_record([
        "period",
        "chats_sent",
        "msg_sent",
        "chr_sent",
        "media_sec_sent",
        "chats_received",
        "msg_received",
        "chr_received",
        "media_sec_received",
    ])?;

    for row in rows {
        let mut record = vec![row.period.format(PERIOD_FORMAT).to_string()];
        record.extend(bucket_fields(row.sent.as_ref()));
        record.extend(bucket_fields(row.received.as_ref()));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Formats the first `limit` rows of the flat table for console preview.
///
/// A debugging aid, not a stable format.
pub fn preview_rows(rows: &[MessageRow], limit: usize) -> String {
    let mut out = String::new();
    out.push_str("date                 chat_id      chat_type      from_id  fwd  text\n");

    for row in rows.iter().take(limit) {
        let mut text: String = row.text.chars().take(40).collect();
        if row.text.chars().count() > 40 {
            text.push('…');
        }
        out.push_str(&format!(
            "{}  {:>11}  {:>13}  {:>7}  {:>3}  {}\n",
            row.date.format("%Y-%m-%d %H:%M:%S"),
            row.chat_id,
            row.chat_type,
            row.from_id,
            if row.forwarded { "yes" } else { "no" },
            text,
        ));
    }

    if rows.len() > limit {
        out.push_str(&format!("… {} more rows\n", rows.len() - limit));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::takeout::ChatType;

    #[cfg(feature = "csv-output")]
    use crate::config::StatsConfig;
    #[cfg(feature = "csv-output")]
    use crate::stats::{Frequency, JoinPolicy, aggregate, sent_received};
    #[cfg(feature = "csv-output")]
    use std::fs;

    fn sample_row(text: &str) -> MessageRow {
        MessageRow {
            chat_id: 100,
            chat_name: "Alice".into(),
            chat_type: ChatType::PersonalChat,
            id: 1,
            date: "2024-01-15T10:30:00".parse().unwrap(),
            from_id: 42,
            text: text.into(),
            forwarded: false,
            media_type: None,
            duration_seconds: None,
            file: None,
        }
    }

    #[test]
    fn test_preview_contains_row_fields() {
        let rows = vec![sample_row("hello there")];
        let preview = preview_rows(&rows, 15);
        assert!(preview.contains("2024-01-15 10:30:00"));
        assert!(preview.contains("personal_chat"));
        assert!(preview.contains("hello there"));
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let rows = vec![sample_row(&"x".repeat(100))];
        let preview = preview_rows(&rows, 15);
        assert!(preview.contains('…'));
        assert!(!preview.contains(&"x".repeat(50)));
    }

    #[test]
    fn test_preview_limits_row_count() {
        let rows: Vec<_> = (0..20).map(|_| sample_row("m")).collect();
        let preview = preview_rows(&rows, 15);
        assert!(preview.contains("… 5 more rows"));
    }

    #[cfg(feature = "csv-output")]
    fn two_sender_table() -> Vec<MessageRow> {
        let mut own = sample_row("four");
        own.from_id = 1;
        let mut theirs = sample_row("others words");
        theirs.from_id = 2;
        theirs.duration_seconds = Some(12);
        vec![own, theirs]
    }

    #[cfg(feature = "csv-output")]
    #[test]
    fn test_write_stats_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        let stats = aggregate(&two_sender_table(), &StatsConfig::new());

        write_stats_csv(&stats, path.to_str().unwrap()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), "period;chats;msg;chr;media_sec");
        assert_eq!(lines.next().unwrap(), "2024-01-01;1;2;16;12");
    }

    #[cfg(feature = "csv-output")]
    #[test]
    fn test_write_sent_received_csv_empty_side() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sr.csv");

        let mut rows = two_sender_table();
        // Drop the owner's row so the sent side is empty under outer join
        rows.remove(0);
        let merged = sent_received(&rows, 1, Frequency::Monthly, JoinPolicy::Outer);

        write_sent_received_csv(&merged, path.to_str().unwrap()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let data_line = content.lines().nth(1).unwrap();
        // Absent sent side serializes as empty fields, not zeros
        assert_eq!(data_line, "2024-01-01;;;;;1;1;12;12");
    }

    #[cfg(feature = "csv-output")]
    #[test]
    fn test_write_sent_received_csv_both_sides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sr.csv");
        let merged = sent_received(&two_sender_table(), 1, Frequency::Monthly, JoinPolicy::Inner);

        write_sent_received_csv(&merged, path.to_str().unwrap()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(
            "period;chats_sent;msg_sent;chr_sent;media_sec_sent;chats_received;msg_received;chr_received;media_sec_received"
        ));
        assert!(content.contains("2024-01-01;1;1;4;0;1;1;12;12"));
    }
}
