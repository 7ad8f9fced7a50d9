//! Telegram takeout archive model and record extractor.
//!
//! A takeout archive (`result.json` from Telegram Desktop's "Export Telegram
//! data") has this shape:
//!
//! ```json
//! {
//!   "personal_information": { "user_id": 111, ... },
//!   "chats": {
//!     "list": [
//!       {
//!         "id": 123, "name": "Alice", "type": "personal_chat",
//!         "messages": [
//!           {
//!             "id": 1, "type": "message", "date": "2024-01-15T10:30:00",
//!             "from_id": "user222",
//!             "text": "Hello" | ["Hello ", {"type": "link", "text": "url"}],
//!             "forwarded_from": "Somebody",
//!             "media_type": "voice_message", "duration_seconds": 4,
//!             "file": "voice_messages/msg.ogg"
//!           }
//!         ]
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! Deserialization is the allow-list: only the fields declared on [`RawChat`]
//! and [`RawMessage`] are retained, everything else the exporter writes is
//! dropped. The whole archive is read in one forward pass and held in memory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ExtractConfig;
use crate::error::{Result, TgstatError};
use crate::text::TextValue;

/// Chat types as written by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatType {
    PersonalChat,
    PrivateGroup,
    BotChat,
    PublicSupergroup,
    PrivateSupergroup,
    SavedMessages,
    PrivateChannel,
    PublicChannel,
    /// Any type this version doesn't know about
    #[serde(other)]
    Unknown,
}

impl ChatType {
    /// Returns the exporter's snake_case name for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatType::PersonalChat => "personal_chat",
            ChatType::PrivateGroup => "private_group",
            ChatType::BotChat => "bot_chat",
            ChatType::PublicSupergroup => "public_supergroup",
            ChatType::PrivateSupergroup => "private_supergroup",
            ChatType::SavedMessages => "saved_messages",
            ChatType::PrivateChannel => "private_channel",
            ChatType::PublicChannel => "public_channel",
            ChatType::Unknown => "unknown",
        }
    }

    /// Returns all recognized type names.
    pub fn all_names() -> &'static [&'static str] {
        &[
            "personal_chat",
            "private_group",
            "bot_chat",
            "public_supergroup",
            "private_supergroup",
            "saved_messages",
            "private_channel",
            "public_channel",
        ]
    }
}

impl std::fmt::Display for ChatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChatType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "personal_chat" => Ok(ChatType::PersonalChat),
            "private_group" => Ok(ChatType::PrivateGroup),
            "bot_chat" => Ok(ChatType::BotChat),
            "public_supergroup" => Ok(ChatType::PublicSupergroup),
            "private_supergroup" => Ok(ChatType::PrivateSupergroup),
            "saved_messages" => Ok(ChatType::SavedMessages),
            "private_channel" => Ok(ChatType::PrivateChannel),
            "public_channel" => Ok(ChatType::PublicChannel),
            _ => Err(format!(
                "Unknown chat type: '{}'. Expected one of: {}",
                s,
                ChatType::all_names().join(", ")
            )),
        }
    }
}

/// Record kinds inside a chat's `messages` array.
///
/// Only [`Message`](MessageKind::Message) survives the table build; service
/// records (pins, calls, group actions) are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Message,
    Service,
    #[serde(other)]
    Unknown,
}

/// Media attachment types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    VoiceMessage,
    VideoMessage,
    VideoFile,
    AudioFile,
    Animation,
    Sticker,
    #[serde(other)]
    Unknown,
}

impl MediaType {
    /// Returns the exporter's snake_case name for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::VoiceMessage => "voice_message",
            MediaType::VideoMessage => "video_message",
            MediaType::VideoFile => "video_file",
            MediaType::AudioFile => "audio_file",
            MediaType::Animation => "animation",
            MediaType::Sticker => "sticker",
            MediaType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat restricted to the allow-listed fields, with its reduced messages.
#[derive(Debug, Clone, Deserialize)]
pub struct RawChat {
    /// Chat identifier
    pub id: i64,
    /// Display name; absent for deleted accounts
    #[serde(default)]
    pub name: Option<String>,
    /// Chat type
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    /// Message records, allow-list reduced
    #[serde(default)]
    pub messages: Vec<RawMessage>,
}

/// A message record restricted to the allow-listed fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    /// Message identifier, unique within its chat
    pub id: i64,
    /// Local timestamp as exported (no zone information)
    pub date: NaiveDateTime,
    /// Record kind
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Tagged sender reference, e.g. "user12345"
    #[serde(default)]
    pub from_id: Option<String>,
    /// Plain string or span sequence
    #[serde(default)]
    pub text: TextValue,
    /// Present iff the message was forwarded; the value is not interpreted
    #[serde(default)]
    pub forwarded_from: Option<Value>,
    /// Media attachment type
    #[serde(default)]
    pub media_type: Option<MediaType>,
    /// Media duration; validated non-negative during the table build
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    /// Attached file reference
    #[serde(default)]
    pub file: Option<String>,
}

// Raw top-level shape. Both sections are optional here so that a missing
// section surfaces as MissingField, not as a serde error.

#[derive(Debug, Deserialize)]
struct RawArchive {
    #[serde(default)]
    personal_information: Option<PersonalInformation>,
    #[serde(default)]
    chats: Option<ChatsSection>,
}

#[derive(Debug, Deserialize)]
struct PersonalInformation {
    #[serde(default)]
    user_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ChatsSection {
    #[serde(default)]
    list: Vec<RawChat>,
}

/// A parsed takeout archive.
///
/// # Example
///
/// ```no_run
/// use tgstat::config::ExtractConfig;
/// use tgstat::takeout::Takeout;
///
/// # fn main() -> tgstat::Result<()> {
/// let takeout = Takeout::from_path("result.json".as_ref())?;
/// let owner = takeout.owner_id()?;
/// for chat in takeout.chats(&ExtractConfig::new()) {
///     println!("{}: {} messages", chat.id, chat.messages.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Takeout {
    owner_id: Option<u64>,
    chats: Vec<RawChat>,
}

impl Takeout {
    /// Reads and parses an archive file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, Some(path.to_path_buf()))
    }

    /// Parses an archive from an in-memory JSON string.
    pub fn parse_str(content: &str) -> Result<Self> {
        Self::parse(content, None)
    }

    fn parse(content: &str, path: Option<PathBuf>) -> Result<Self> {
        let raw: RawArchive =
            serde_json::from_str(content).map_err(|e| TgstatError::parse(e, path))?;

        let chats = raw
            .chats
            .ok_or_else(|| TgstatError::missing_field("chats.list"))?
            .list;

        Ok(Self {
            owner_id: raw.personal_information.and_then(|p| p.user_id),
            chats,
        })
    }

    /// Returns the archive owner's numeric id.
    ///
    /// # Errors
    ///
    /// [`TgstatError::MissingField`] when the `personal_information.user_id`
    /// section is absent (single-chat exports).
    pub fn owner_id(&self) -> Result<u64> {
        self.owner_id
            .ok_or_else(|| TgstatError::missing_field("personal_information.user_id"))
    }

    /// Iterates over chats whose type is in the accepted set.
    ///
    /// Chats of other types are skipped entirely, along with all their
    /// messages.
    pub fn chats<'a>(&'a self, config: &'a ExtractConfig) -> impl Iterator<Item = &'a RawChat> {
        self.chats
            .iter()
            .filter(move |chat| config.accepts(chat.chat_type))
    }

    /// Total number of chats in the archive, before type filtering.
    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }
}
