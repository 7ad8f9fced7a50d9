//! Integration tests for the full extraction → table → aggregation pipeline.

use tgstat::prelude::*;

/// A small archive: the owner (user 1) talks to Alice in a personal chat and
/// sits in one private group; a public channel is present but never retained.
const ARCHIVE: &str = r#"{
  "personal_information": {"user_id": 1, "first_name": "Owner"},
  "chats": {"list": [
    {"id": 100, "name": "Alice", "type": "personal_chat", "messages": [
      {"id": 1, "type": "message", "date": "2024-01-10T09:00:00",
       "from_id": "user1", "text": "good morning"},
      {"id": 2, "type": "message", "date": "2024-01-10T09:05:00",
       "from_id": "user2", "text": ["look: ", {"type": "link", "text": "https://example.com/a/very/long/url"}]},
      {"id": 3, "type": "message", "date": "2024-02-02T18:00:00",
       "from_id": "user1", "text": "",
       "media_type": "voice_message", "duration_seconds": 21,
       "file": "voice_messages/msg3.ogg"},
      {"id": 4, "type": "service", "date": "2024-02-02T18:01:00",
       "action": "phone_call", "text": ""}
    ]},
    {"id": 200, "name": "Weekend plans", "type": "private_group", "messages": [
      {"id": 1, "type": "message", "date": "2024-01-20T12:00:00",
       "from_id": "user3", "text": "who is in?"},
      {"id": 2, "type": "message", "date": "2024-01-20T12:30:00",
       "from_id": "user1", "text": "me", "forwarded_from": "Somebody Else"}
    ]},
    {"id": 300, "name": "Big News", "type": "public_channel", "messages": [
      {"id": 1, "type": "message", "date": "2024-01-01T00:00:00",
       "from_id": "channel300", "text": "broadcast"}
    ]}
  ]}
}"#;

fn pipeline(archive: &str) -> (Vec<MessageRow>, TableStats) {
    let takeout = Takeout::parse_str(archive).unwrap();
    build_table(takeout.chats(&ExtractConfig::new()), &TableConfig::new())
}

#[test]
fn archive_parses_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.json");
    std::fs::write(&path, ARCHIVE).unwrap();

    let takeout = Takeout::from_path(&path).unwrap();
    assert_eq!(takeout.owner_id().unwrap(), 1);
    assert_eq!(takeout.chat_count(), 3);
}

#[test]
fn channel_chats_never_reach_the_table() {
    let (rows, _) = pipeline(ARCHIVE);
    assert!(rows.iter().all(|r| r.chat_id != 300));
}

#[test]
fn every_row_carries_its_parent_chat() {
    let (rows, stats) = pipeline(ARCHIVE);
    assert_eq!(stats.produced, 5);
    assert_eq!(stats.skipped, 0);

    for row in &rows {
        match row.chat_id {
            100 => {
                assert_eq!(row.chat_name, "Alice");
                assert_eq!(row.chat_type, ChatType::PersonalChat);
            }
            200 => {
                assert_eq!(row.chat_name, "Weekend plans");
                assert_eq!(row.chat_type, ChatType::PrivateGroup);
            }
            other => panic!("unexpected chat id {other}"),
        }
    }
}

#[test]
fn link_spans_become_placeholders_in_the_table() {
    let (rows, _) = pipeline(ARCHIVE);
    let linked = rows
        .iter()
        .find(|r| r.chat_id == 100 && r.id == 2)
        .unwrap();
    assert_eq!(linked.text, format!("look:  {LINK_PLACEHOLDER}"));
    assert!(!linked.text.contains("example.com"));
}

#[test]
fn media_fields_survive_flattening() {
    let (rows, _) = pipeline(ARCHIVE);
    let voice = rows
        .iter()
        .find(|r| r.chat_id == 100 && r.id == 3)
        .unwrap();
    assert_eq!(voice.media_type, Some(MediaType::VoiceMessage));
    assert_eq!(voice.duration_seconds, Some(21));
    assert_eq!(voice.file.as_deref(), Some("voice_messages/msg3.ogg"));
}

#[test]
fn monthly_totals_match_row_counts() {
    let (rows, _) = pipeline(ARCHIVE);
    let stats = aggregate(&rows, &StatsConfig::new());

    assert_eq!(stats.len(), 2);

    let january = &stats[0];
    assert_eq!(january.period.to_string(), "2024-01-01");
    assert_eq!(january.bucket.messages, 4);
    assert_eq!(january.bucket.chats, 2);
    let expected_chars: u64 = rows
        .iter()
        .filter(|r| r.date.date().to_string().starts_with("2024-01"))
        .map(|r| r.text.chars().count() as u64)
        .sum();
    assert_eq!(january.bucket.chars, expected_chars);

    let february = &stats[1];
    assert_eq!(february.period.to_string(), "2024-02-01");
    assert_eq!(february.bucket.messages, 1);
    assert_eq!(february.bucket.media_seconds, 21);
}

#[test]
fn quarterly_aggregation_collapses_months() {
    let (rows, _) = pipeline(ARCHIVE);
    let stats = aggregate(&rows, &StatsConfig::new().with_frequency(Frequency::Quarterly));
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].period.to_string(), "2024-01-01");
    assert_eq!(stats[0].bucket.messages, 5);
}

#[test]
fn exclude_forwarded_shrinks_the_count() {
    let (rows, _) = pipeline(ARCHIVE);
    let all = aggregate(&rows, &StatsConfig::new());
    let own = aggregate(&rows, &StatsConfig::new().with_exclude_forwarded(true));

    let all_msgs: u64 = all.iter().map(|s| s.bucket.messages).sum();
    let own_msgs: u64 = own.iter().map(|s| s.bucket.messages).sum();
    assert_eq!(all_msgs, 5);
    assert_eq!(own_msgs, 4);
}

/// One personal chat, owner id 1, three messages in the same month: two from
/// the owner (one forwarded), one from the other side. The sent table must
/// count 1 (forwarded excluded) and the received table 1.
#[test]
fn sent_received_end_to_end() {
    let archive = r#"{
      "personal_information": {"user_id": 1},
      "chats": {"list": [
        {"id": 7, "name": "Friend", "type": "personal_chat", "messages": [
          {"id": 1, "type": "message", "date": "2024-03-01T10:00:00",
           "from_id": "user1", "text": "typed by me"},
          {"id": 2, "type": "message", "date": "2024-03-05T11:00:00",
           "from_id": "user1", "text": "passed along", "forwarded_from": "News"},
          {"id": 3, "type": "message", "date": "2024-03-09T12:00:00",
           "from_id": "user2", "text": "reply"}
        ]}
      ]}
    }"#;

    let takeout = Takeout::parse_str(archive).unwrap();
    let owner = takeout.owner_id().unwrap();
    let (rows, _) = build_table(takeout.chats(&ExtractConfig::new()), &TableConfig::new());

    let merged = sent_received(&rows, owner, Frequency::Monthly, JoinPolicy::Inner);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].period.to_string(), "2024-03-01");
    assert_eq!(merged[0].sent.unwrap().messages, 1);
    assert_eq!(merged[0].received.unwrap().messages, 1);
}

#[test]
fn inner_join_hides_received_only_months() {
    let (rows, _) = pipeline(ARCHIVE);
    // Owner wrote in January (chat 100) and January (group); February has
    // only the owner's voice message, so the received side is silent there.
    let inner = sent_received(&rows, 1, Frequency::Monthly, JoinPolicy::Inner);
    assert_eq!(inner.len(), 1);
    assert_eq!(inner[0].period.to_string(), "2024-01-01");

    let outer = sent_received(&rows, 1, Frequency::Monthly, JoinPolicy::Outer);
    assert_eq!(outer.len(), 2);
    let february = outer
        .iter()
        .find(|r| r.period.to_string() == "2024-02-01")
        .unwrap();
    assert!(february.received.is_none());
    assert_eq!(february.sent.unwrap().messages, 1);
}

#[test]
fn date_filter_restricts_the_pipeline() {
    let (rows, _) = pipeline(ARCHIVE);
    let rows = filter_by_date(
        rows,
        Some(parse_filter_date("2024-02-01").unwrap()),
        None,
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 3);
}

#[test]
fn missing_owner_aborts_sent_received_path() {
    let archive = r#"{"chats": {"list": []}}"#;
    let takeout = Takeout::parse_str(archive).unwrap();
    assert!(takeout.owner_id().unwrap_err().is_missing_field());
}

#[test]
fn widened_chat_types_bring_channels_in() {
    let takeout = Takeout::parse_str(ARCHIVE).unwrap();
    let extract = ExtractConfig::new().with_chat_type(ChatType::PublicChannel);
    let table = TableConfig::new().with_chat_types(extract.chat_types.clone());
    let (rows, stats) = build_table(takeout.chats(&extract), &table);

    // The channel's message has a channel-tagged sender, so it still drops
    // out, but now as a counted row-level skip, not a chat-type filter.
    assert!(rows.iter().all(|r| r.chat_id != 300));
    assert_eq!(stats.skipped, 1);
}
