//! Flatten extracted chats into one row per message.
//!
//! [`build_table`] explodes every retained message out of its parent chat and
//! joins the chat's allow-listed fields onto it, producing the flat
//! [`MessageRow`] table the aggregator consumes. Service records and chats
//! outside the accepted type set are dropped; rows whose values cannot be
//! coerced to their column types are skipped and counted, never fatal.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::config::TableConfig;
use crate::error::{Result, TgstatError};
use crate::takeout::{ChatType, MediaType, MessageKind, RawChat, RawMessage};
use crate::text::normalize_text;

/// Tag prefix on sender references. A takeout writes user senders as
/// `user<id>`; anything else (channels, missing tags) is malformed here.
pub const SENDER_PREFIX: &str = "user";

/// One message joined with its parent chat's fields.
///
/// The invariant of the table: every row carries the identifier, name, and
/// type of its *parent chat*, never its own. A row with no parent chat match
/// is never produced, because chats are filtered before flattening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRow {
    /// Parent chat identifier
    pub chat_id: i64,
    /// Parent chat display name ("" for deleted accounts)
    pub chat_name: String,
    /// Parent chat type
    pub chat_type: ChatType,
    /// Message identifier, unique within the chat
    pub id: i64,
    /// Message timestamp
    pub date: NaiveDateTime,
    /// Numeric sender id, derived from the tagged reference
    pub from_id: u64,
    /// Normalized text, possibly empty
    pub text: String,
    /// Whether the message carries a forwarded-from marker
    pub forwarded: bool,
    /// Media attachment type
    pub media_type: Option<MediaType>,
    /// Media duration in seconds
    pub duration_seconds: Option<u64>,
    /// Attached file reference
    pub file: Option<String>,
}

/// Counters for a table build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Rows that made it into the table
    pub produced: usize,
    /// Message records dropped by a row-level coercion failure
    pub skipped: usize,
}

impl TableStats {
    /// Message records considered (produced + skipped).
    pub fn total(&self) -> usize {
        self.produced + self.skipped
    }
}

/// Derives the numeric sender id from a tagged reference.
///
/// Strips the literal `user` prefix and parses the remainder as an unsigned
/// integer.
///
/// # Errors
///
/// [`TgstatError::MalformedSender`] when the prefix is absent or the
/// remainder is not numeric.
///
/// # Examples
///
/// ```
/// use tgstat::table::parse_sender_id;
///
/// assert_eq!(parse_sender_id("user12345").unwrap(), 12345);
/// assert!(parse_sender_id("12345").is_err());
/// assert!(parse_sender_id("channel42").is_err());
/// ```
pub fn parse_sender_id(token: &str) -> Result<u64> {
    let digits = token
        .strip_prefix(SENDER_PREFIX)
        .ok_or_else(|| TgstatError::malformed_sender(token))?;
    digits
        .parse::<u64>()
        .map_err(|_| TgstatError::malformed_sender(token))
}

/// Builds the flat message table from extracted chats.
///
/// Keeps only records of kind `message` whose parent chat type is in the
/// accepted set. Text is normalized, the sender tag is resolved to a numeric
/// id, and optional fields are coerced to their column types. A row that
/// fails coercion is dropped and counted in the returned [`TableStats`].
pub fn build_table<'a>(
    chats: impl IntoIterator<Item = &'a RawChat>,
    config: &TableConfig,
) -> (Vec<MessageRow>, TableStats) {
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for chat in chats {
        if !config.accepts(chat.chat_type) {
            continue;
        }
        for msg in &chat.messages {
            if msg.kind != MessageKind::Message {
                continue;
            }
            match flatten_message(chat, msg, config) {
                Ok(row) => rows.push(row),
                Err(_) => skipped += 1,
            }
        }
    }

    let stats = TableStats {
        produced: rows.len(),
        skipped,
    };
    (rows, stats)
}

fn flatten_message(chat: &RawChat, msg: &RawMessage, config: &TableConfig) -> Result<MessageRow> {
    let token = msg.from_id.as_deref().ok_or_else(|| {
        TgstatError::type_coercion("from_id", msg.id, "missing sender token")
    })?;
    let from_id = parse_sender_id(token)?;

    let duration_seconds = match msg.duration_seconds {
        None => None,
        Some(d) => Some(u64::try_from(d).map_err(|_| {
            TgstatError::type_coercion(
                "duration_seconds",
                msg.id,
                format!("negative value {d}"),
            )
        })?),
    };

    Ok(MessageRow {
        chat_id: chat.id,
        chat_name: chat.name.clone().unwrap_or_default(),
        chat_type: chat.chat_type,
        id: msg.id,
        date: msg.date,
        from_id,
        text: normalize_text(&msg.text, config.replace_links),
        forwarded: msg.forwarded_from.is_some(),
        media_type: msg.media_type,
        duration_seconds,
        file: msg.file.clone(),
    })
}

/// Parses a `YYYY-MM-DD` filter date.
///
/// # Errors
///
/// [`TgstatError::InvalidDate`] if the format is invalid.
pub fn parse_filter_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| TgstatError::invalid_date(date_str))
}

/// Restricts the table to an inclusive calendar date range.
///
/// `None` bounds leave that side open. Operates on whole days: a row dated
/// anywhere within `before` is kept.
pub fn filter_by_date(
    rows: Vec<MessageRow>,
    after: Option<NaiveDate>,
    before: Option<NaiveDate>,
) -> Vec<MessageRow> {
    if after.is_none() && before.is_none() {
        return rows;
    }

    rows.into_iter()
        .filter(|row| {
            let day = row.date.date();
            if after.is_some_and(|a| day < a) {
                return false;
            }
            if before.is_some_and(|b| day > b) {
                return false;
            }
            true
        })
        .collect()
}
