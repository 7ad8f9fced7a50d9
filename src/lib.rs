//! # tgstat
//!
//! A Rust library and CLI for turning Telegram takeout archives into
//! time-bucketed messaging statistics.
//!
//! ## Overview
//!
//! Telegram Desktop's "Export Telegram data" produces a single `result.json`
//! with the account's personal information and full chat history. tgstat
//! reads that archive, flattens the retained chats into one row per message,
//! and aggregates the rows into monthly or quarterly buckets (message
//! counts, character counts, distinct chats, media seconds), optionally split
//! into sent vs received by comparing each sender against the archive owner.
//!
//! The pipeline is a synchronous, in-memory batch transform:
//!
//! ```text
//! result.json → Takeout → build_table → Vec<MessageRow> → aggregate /
//! sent_received → CSV
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tgstat::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let takeout = Takeout::from_path("result.json".as_ref())?;
//!     let owner = takeout.owner_id()?;
//!
//!     let extract = ExtractConfig::new();
//!     let (rows, stats) = build_table(takeout.chats(&extract), &TableConfig::new());
//!     eprintln!("{} rows, {} skipped", stats.produced, stats.skipped);
//!
//!     let merged = sent_received(&rows, owner, Frequency::Monthly, JoinPolicy::Inner);
//!     for row in &merged {
//!         println!("{}: sent {:?}", row.period, row.sent.map(|b| b.messages));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`takeout`] - archive model and record extractor
//!   ([`Takeout`](takeout::Takeout), [`ChatType`](takeout::ChatType))
//! - [`text`] - text normalization ([`normalize_text`](text::normalize_text),
//!   [`TextValue`](text::TextValue))
//! - [`table`] - flat message table ([`MessageRow`](table::MessageRow),
//!   [`build_table`](table::build_table))
//! - [`stats`] - time-bucketed aggregation
//!   ([`aggregate`](stats::aggregate), [`sent_received`](stats::sent_received))
//! - [`output`] - CSV writers and console preview
//! - [`config`] - pipeline configuration types
//! - [`cli`] - CLI types (feature `cli`)
//! - [`error`] - unified error types ([`TgstatError`], [`Result`])
//! - [`prelude`] - convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod stats;
pub mod table;
pub mod takeout;
pub mod text;

// Re-export the main types at the crate root for convenience
pub use error::{Result, TgstatError};
pub use table::MessageRow;
pub use takeout::Takeout;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use tgstat::prelude::*;
/// ```
pub mod prelude {
    // Archive and extraction
    pub use crate::takeout::{ChatType, MediaType, MessageKind, Takeout};

    // Error types
    pub use crate::error::{Result, TgstatError};

    // Configuration
    pub use crate::config::{ExtractConfig, StatsConfig, TableConfig};

    // Text normalization
    pub use crate::text::{LINK_PLACEHOLDER, TextValue, normalize_text};

    // Flat table
    pub use crate::table::{
        MessageRow, TableStats, build_table, filter_by_date, parse_filter_date, parse_sender_id,
    };

    // Aggregation
    pub use crate::stats::{
        Frequency, JoinPolicy, SentReceivedRow, StatBucket, StatRow, aggregate, sent_received,
    };

    // Output
    #[cfg(feature = "csv-output")]
    pub use crate::output::{write_sent_received_csv, write_stats_csv};
    pub use crate::output::preview_rows;
}
