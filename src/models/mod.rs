use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Message identifier as the host emits it: numeric for ordinary messages,
/// string for injected/system ones. Never compare variants directly; go
/// through [`MessageId::normalized`] at every boundary.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub(crate) enum MessageId {
    Num(u64),
    Text(String),
}

impl MessageId {
    pub fn normalized(&self) -> String {
        match self {
            MessageId::Num(n) => n.to_string(),
            MessageId::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum MessageRole {
    User,
    System,
    Character,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ChatKind {
    Private,
    Group,
}

/// One saved message reference. Snapshot fields (`sender`, `role`,
/// `timestamp`) are captured at favorite-time and never re-linked.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct FavoriteItem {
    /// Opaque, unique, never reused.
    pub id: String,
    /// Normalized form of the source message id.
    pub message_id: String,
    pub sender: String,
    pub role: MessageRole,
    /// Message send time, epoch ms. Display sort key.
    pub timestamp: i64,
    #[serde(default)]
    pub note: String,
}

/// Per-conversation favorites bucket.
///
/// `count` mirrors `items.len()`; it is persisted for older blobs that relied
/// on it, and backfilled on write when the two diverge.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ChatFavorites {
    pub kind: ChatKind,
    /// Last-known display name of the owning character/group.
    pub name: String,
    #[serde(default)]
    pub character_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub items: Vec<FavoriteItem>,
}

/// Settings root: conversation id -> favorites. BTreeMap keeps the persisted
/// JSON stable across saves.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub(crate) struct FavoritesSettings {
    #[serde(default)]
    pub chats: BTreeMap<String, ChatFavorites>,
}

/// Live message as exposed by the host chat surface.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ChatMessage {
    pub id: MessageId,
    pub sender: String,
    pub text: String,
    #[serde(default)]
    pub is_user: bool,
    #[serde(default)]
    pub is_system: bool,
    /// Send time, epoch ms.
    pub sent_ms: i64,
}

impl ChatMessage {
    /// Author-kind flags collapse into a role; system wins over user.
    pub fn role(&self) -> MessageRole {
        if self.is_system {
            MessageRole::System
        } else if self.is_user {
            MessageRole::User
        } else {
            MessageRole::Character
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Character {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Group {
    pub id: String,
    pub name: String,
    pub member_ids: Vec<String>,
}

/// Resolved identity of the currently open conversation.
/// Exactly one of `character_id`/`group_id` is set, matching `kind`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ChatContext {
    pub chat_id: String,
    pub kind: ChatKind,
    pub name: String,
    pub character_id: Option<String>,
    pub group_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_id_accepts_numbers_and_strings() {
        let n: MessageId = serde_json::from_str("7").expect("numeric id should parse");
        let s: MessageId = serde_json::from_str("\"7\"").expect("string id should parse");
        assert_eq!(n.normalized(), "7");
        assert_eq!(s.normalized(), "7");
        assert_eq!(n.normalized(), s.normalized());
    }

    #[test]
    fn message_id_normalization_trims() {
        let s = MessageId::Text("  m-42 ".to_string());
        assert_eq!(s.normalized(), "m-42");
    }

    #[test]
    fn chat_favorites_tolerates_missing_items_and_count() {
        // Older blobs may lack both fields entirely.
        let json = r#"{"kind":"private","name":"Aria","character_id":"aria"}"#;
        let parsed: ChatFavorites = serde_json::from_str(json).expect("entry should parse");
        assert_eq!(parsed.count, 0);
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.character_id.as_deref(), Some("aria"));
        assert!(parsed.group_id.is_none());
    }

    #[test]
    fn settings_root_roundtrip() {
        let mut settings = FavoritesSettings::default();
        settings.chats.insert(
            "aria-main".to_string(),
            ChatFavorites {
                kind: ChatKind::Private,
                name: "Aria".to_string(),
                character_id: Some("aria".to_string()),
                group_id: None,
                count: 1,
                items: vec![FavoriteItem {
                    id: "fav_1".to_string(),
                    message_id: "3".to_string(),
                    sender: "Aria".to_string(),
                    role: MessageRole::Character,
                    timestamp: 1_700_000_000_000,
                    note: String::new(),
                }],
            },
        );

        let json = serde_json::to_string(&settings).expect("should serialize");
        let back: FavoritesSettings = serde_json::from_str(&json).expect("should deserialize");
        let chat = back.chats.get("aria-main").expect("entry should survive");
        assert_eq!(chat.count, 1);
        assert_eq!(chat.items[0].message_id, "3");
        assert_eq!(chat.items[0].role, MessageRole::Character);
    }

    #[test]
    fn role_flags_collapse_system_over_user() {
        let m = ChatMessage {
            id: MessageId::Num(1),
            sender: "narrator".to_string(),
            text: String::new(),
            is_user: true,
            is_system: true,
            sent_ms: 0,
        };
        assert_eq!(m.role(), MessageRole::System);
    }
}
