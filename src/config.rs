//! Configuration types for the extraction and aggregation pipeline.
//!
//! The original takeout format hardwires which chat types matter and how
//! statistics are bucketed; these structs make those choices explicit and
//! injectable, without any CLI framework dependencies.
//!
//! # Example
//!
//! ```rust
//! use tgstat::config::{ExtractConfig, StatsConfig};
//! use tgstat::stats::Frequency;
//! use tgstat::takeout::ChatType;
//!
//! let extract = ExtractConfig::new().with_chat_type(ChatType::SavedMessages);
//! let stats = StatsConfig::new()
//!     .with_frequency(Frequency::Quarterly)
//!     .with_exclude_forwarded(true);
//! ```

use serde::{Deserialize, Serialize};

use crate::stats::Frequency;
use crate::takeout::ChatType;

/// Chat types retained by default: one-on-one chats and private groups,
/// matching what a personal-usage analysis cares about.
pub const DEFAULT_CHAT_TYPES: [ChatType; 2] = [ChatType::PersonalChat, ChatType::PrivateGroup];

/// Configuration for the record extractor.
///
/// Chats whose type is not in `chat_types` are dropped entirely, along with
/// all their messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Accepted chat types (default: personal chats and private groups)
    pub chat_types: Vec<ChatType>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            chat_types: DEFAULT_CHAT_TYPES.to_vec(),
        }
    }
}

impl ExtractConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the accepted chat-type set.
    #[must_use]
    pub fn with_chat_types(mut self, types: impl IntoIterator<Item = ChatType>) -> Self {
        self.chat_types = types.into_iter().collect();
        self
    }

    /// Adds a single chat type to the accepted set.
    #[must_use]
    pub fn with_chat_type(mut self, chat_type: ChatType) -> Self {
        if !self.chat_types.contains(&chat_type) {
            self.chat_types.push(chat_type);
        }
        self
    }

    /// Returns `true` if the given chat type is accepted.
    pub fn accepts(&self, chat_type: ChatType) -> bool {
        self.chat_types.contains(&chat_type)
    }
}

/// Configuration for the table builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Accepted chat types, re-checked when flattening (default: same as
    /// [`ExtractConfig`])
    pub chat_types: Vec<ChatType>,

    /// Replace link spans with a placeholder token (default: true)
    pub replace_links: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            chat_types: DEFAULT_CHAT_TYPES.to_vec(),
            replace_links: true,
        }
    }
}

impl TableConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the accepted chat-type set.
    #[must_use]
    pub fn with_chat_types(mut self, types: impl IntoIterator<Item = ChatType>) -> Self {
        self.chat_types = types.into_iter().collect();
        self
    }

    /// Sets whether link spans are replaced by the placeholder.
    #[must_use]
    pub fn with_replace_links(mut self, replace: bool) -> Self {
        self.replace_links = replace;
        self
    }

    /// Returns `true` if the given chat type is accepted.
    pub fn accepts(&self, chat_type: ChatType) -> bool {
        self.chat_types.contains(&chat_type)
    }
}

/// Configuration for the aggregator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Length of the time bucket (default: monthly)
    pub frequency: Frequency,

    /// Drop rows carrying a forwarded-from marker before bucketing
    /// (default: false)
    pub exclude_forwarded: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::Monthly,
            exclude_forwarded: false,
        }
    }
}

impl StatsConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bucket length.
    #[must_use]
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets whether forwarded messages are excluded.
    #[must_use]
    pub fn with_exclude_forwarded(mut self, exclude: bool) -> Self {
        self.exclude_forwarded = exclude;
        self
    }
}
