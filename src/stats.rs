//! Time-bucketed aggregation over the flat message table.
//!
//! Rows are partitioned into calendar periods (month or quarter) keyed by the
//! first day of the period, and each bucket carries four scalars: distinct
//! chats, message count, total characters, total media seconds. The
//! sent/received view runs the aggregation twice (once for the archive
//! owner's rows with forwarded messages excluded, once for everyone else's
//! without exclusion) and merges the two tables on the period key.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::table::MessageRow;

/// Length of an aggregation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Calendar months
    Monthly,
    /// Calendar quarters (Jan/Apr/Jul/Oct starts)
    Quarterly,
}

impl Frequency {
    /// Truncates a timestamp to the first day of its period.
    pub fn period_start(self, ts: NaiveDateTime) -> NaiveDate {
        let date = ts.date();
        let month = match self {
            Frequency::Monthly => date.month(),
            Frequency::Quarterly => (date.month() - 1) / 3 * 3 + 1,
        };
        // The first of a real month is always representable
        NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap()
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Quarterly => write!(f, "quarterly"),
        }
    }
}

/// How the sent and received tables are merged on their period key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinPolicy {
    /// Keep only periods present on both sides
    #[default]
    Inner,
    /// Keep all periods; a side with no rows stays absent, never zero
    Outer,
}

/// Aggregates for one time period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBucket {
    /// Distinct parent-chat identifiers
    pub chats: u64,
    /// Number of rows
    pub messages: u64,
    /// Sum of normalized-text character counts
    pub chars: u64,
    /// Sum of media durations, absent durations counting as zero
    pub media_seconds: u64,
}

/// One period of the aggregated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatRow {
    /// First day of the period
    pub period: NaiveDate,
    /// The period's aggregates
    #[serde(flatten)]
    pub bucket: StatBucket,
}

/// One period of the merged sent/received table.
///
/// With [`JoinPolicy::Inner`] both sides are always present; with
/// [`JoinPolicy::Outer`] a period seen on only one side keeps the other side
/// `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SentReceivedRow {
    /// First day of the period
    pub period: NaiveDate,
    /// Aggregates over the owner's rows, forwarded messages excluded
    pub sent: Option<StatBucket>,
    /// Aggregates over everyone else's rows
    pub received: Option<StatBucket>,
}

#[derive(Default)]
struct BucketAccum {
    chat_ids: HashSet<i64>,
    messages: u64,
    chars: u64,
    media_seconds: u64,
}

impl BucketAccum {
    fn add(&mut self, row: &MessageRow) {
        self.chat_ids.insert(row.chat_id);
        self.messages += 1;
        self.chars += row.text.chars().count() as u64;
        self.media_seconds += row.duration_seconds.unwrap_or(0);
    }

    fn finish(self) -> StatBucket {
        StatBucket {
            chats: self.chat_ids.len() as u64,
            messages: self.messages,
            chars: self.chars,
            media_seconds: self.media_seconds,
        }
    }
}

/// Groups rows into time buckets and computes per-bucket aggregates.
///
/// Buckets appear only for periods actually present in the input; empty
/// periods are never synthesized. The result is sorted by period.
pub fn aggregate<'a>(
    rows: impl IntoIterator<Item = &'a MessageRow>,
    config: &StatsConfig,
) -> Vec<StatRow> {
    let mut buckets: BTreeMap<NaiveDate, BucketAccum> = BTreeMap::new();

    for row in rows {
        if config.exclude_forwarded && row.forwarded {
            continue;
        }
        let period = config.frequency.period_start(row.date);
        buckets.entry(period).or_default().add(row);
    }

    buckets
        .into_iter()
        .map(|(period, accum)| StatRow {
            period,
            bucket: accum.finish(),
        })
        .collect()
}

/// Builds the merged sent/received statistics table.
///
/// Sent buckets aggregate rows whose sender equals `owner_id`, with forwarded
/// messages excluded; received buckets aggregate all other rows with no
/// exclusion. The two tables are merged on the period key according to
/// `join`.
pub fn sent_received(
    rows: &[MessageRow],
    owner_id: u64,
    frequency: Frequency,
    join: JoinPolicy,
) -> Vec<SentReceivedRow> {
    let sent_config = StatsConfig::new()
        .with_frequency(frequency)
        .with_exclude_forwarded(true);
    let received_config = StatsConfig::new().with_frequency(frequency);

    let sent = aggregate(
        rows.iter().filter(|r| r.from_id == owner_id),
        &sent_config,
    );
    let received = aggregate(
        rows.iter().filter(|r| r.from_id != owner_id),
        &received_config,
    );

    merge_on_period(sent, received, join)
}

fn merge_on_period(
    sent: Vec<StatRow>,
    received: Vec<StatRow>,
    join: JoinPolicy,
) -> Vec<SentReceivedRow> {
    let mut merged: BTreeMap<NaiveDate, (Option<StatBucket>, Option<StatBucket>)> =
        BTreeMap::new();

    for row in sent {
        merged.entry(row.period).or_default().0 = Some(row.bucket);
    }
    for row in received {
        merged.entry(row.period).or_default().1 = Some(row.bucket);
    }

    merged
        .into_iter()
        .filter(|(_, (sent, received))| match join {
            JoinPolicy::Inner => sent.is_some() && received.is_some(),
            JoinPolicy::Outer => true,
        })
        .map(|(period, (sent, received))| SentReceivedRow {
            period,
            sent,
            received,
        })
        .collect()
}
