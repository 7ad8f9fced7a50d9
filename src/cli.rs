//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Freq`] - aggregation frequency options
//! - [`Join`] - sent/received merge policy options
//!
//! The `ValueEnum` types convert into their library counterparts in
//! [`crate::stats`], so the library itself stays free of CLI dependencies.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::stats::{Frequency, JoinPolicy};
use crate::takeout::ChatType;

/// Flatten a Telegram takeout archive into a message table and write
/// time-bucketed sent/received statistics as CSV.
#[derive(Parser, Debug, Clone)]
#[command(name = "tgstat")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    tgstat result.json
    tgstat result.json -o stats.csv --freq quarter
    tgstat result.json --after 2021-01-01 --before 2023-12-31
    tgstat result.json --chat-type personal_chat --chat-type saved_messages
    tgstat result.json --totals --exclude-forwarded
    tgstat result.json --preview")]
pub struct Args {
    /// Path to the takeout archive (result.json)
    pub input: String,

    /// Path to the output CSV
    #[arg(short, long, default_value = "tg_stats.csv")]
    pub output: String,

    /// Aggregation bucket length
    #[arg(short, long, value_enum, default_value = "month")]
    pub freq: Freq,

    /// How sent and received buckets are merged on their period
    #[arg(short, long, value_enum, default_value = "inner")]
    pub join: Join,

    /// Write one combined table instead of the sent/received split
    #[arg(long)]
    pub totals: bool,

    /// Drop forwarded messages before aggregating (combined table only;
    /// the sent side of the split always excludes them)
    #[arg(long)]
    pub exclude_forwarded: bool,

    /// Keep only messages on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Keep only messages on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Chat types to retain (repeatable; default: personal_chat,
    /// private_group)
    #[arg(long = "chat-type", value_name = "TYPE")]
    pub chat_types: Vec<ChatType>,

    /// Keep link URLs verbatim instead of the placeholder token
    #[arg(long)]
    pub keep_links: bool,

    /// Print the first rows of the flat table before aggregating
    #[arg(short, long)]
    pub preview: bool,
}

/// Aggregation frequency options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freq {
    /// Calendar months
    #[value(alias = "m")]
    Month,

    /// Calendar quarters
    #[value(alias = "q")]
    Quarter,
}

impl std::fmt::Display for Freq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Freq::Month => write!(f, "month"),
            Freq::Quarter => write!(f, "quarter"),
        }
    }
}

impl From<Freq> for Frequency {
    fn from(freq: Freq) -> Frequency {
        match freq {
            Freq::Month => Frequency::Monthly,
            Freq::Quarter => Frequency::Quarterly,
        }
    }
}

/// Sent/received merge policy options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Join {
    /// Keep only periods with traffic on both sides
    Inner,

    /// Keep all periods, leaving the silent side empty
    Outer,
}

impl std::fmt::Display for Join {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Join::Inner => write!(f, "inner"),
            Join::Outer => write!(f, "outer"),
        }
    }
}

impl From<Join> for JoinPolicy {
    fn from(join: Join) -> JoinPolicy {
        match join {
            Join::Inner => JoinPolicy::Inner,
            Join::Outer => JoinPolicy::Outer,
        }
    }
}
