use crate::models::{Character, ChatContext, ChatKind, ChatMessage, Group, MessageId};
use leptos::prelude::*;

/// One conversation as the host tracks it: a stable id, the owning character
/// or group, and the ordered message log.
#[derive(Clone, Debug)]
pub(crate) struct HostChat {
    pub id: String,
    pub character_id: Option<String>,
    pub group_id: Option<String>,
    pub messages: Vec<ChatMessage>,
}

/// Narrow surface of the host chat application. The extension reads the
/// roster, the active conversation and its live messages through here, and
/// nothing else. Signals stand in for the host's "chat updated" /
/// "character loaded" notifications: anything derived from them re-renders
/// when the host switches conversations.
#[derive(Clone, Copy)]
pub(crate) struct HostContext {
    pub characters: RwSignal<Vec<Character>>,
    pub groups: RwSignal<Vec<Group>>,
    pub chats: RwSignal<Vec<HostChat>>,
    pub active_chat_id: RwSignal<Option<String>>,
}

impl HostContext {
    /// Tracked read of the active conversation's message log.
    pub fn live_messages(&self) -> Vec<ChatMessage> {
        let Some(active) = self.active_chat_id.get() else {
            return Vec::new();
        };
        self.chats.with(|chats| {
            chats
                .iter()
                .find(|c| c.id == active)
                .map(|c| c.messages.clone())
                .unwrap_or_default()
        })
    }

    /// Resolve a live message by normalized id. Untracked; used from event
    /// handlers, not render paths.
    pub fn find_message(&self, chat_id: &str, message_id: &str) -> Option<ChatMessage> {
        self.chats.with_untracked(|chats| {
            chats.iter().find(|c| c.id == chat_id).and_then(|c| {
                c.messages
                    .iter()
                    .find(|m| m.id.normalized() == message_id.trim())
                    .cloned()
            })
        })
    }

    /// Untracked snapshot of one conversation's message ids, normalized.
    pub fn chat_message_ids(&self, chat_id: &str) -> Vec<String> {
        self.chats.with_untracked(|chats| {
            chats
                .iter()
                .find(|c| c.id == chat_id)
                .map(|c| c.messages.iter().map(|m| m.id.normalized()).collect())
                .unwrap_or_default()
        })
    }

    pub fn character_name(&self, id: &str) -> Option<String> {
        self.characters
            .with(|cs| cs.iter().find(|c| c.id == id).map(|c| c.name.clone()))
    }

    pub fn group_name(&self, id: &str) -> Option<String> {
        self.groups
            .with(|gs| gs.iter().find(|g| g.id == id).map(|g| g.name.clone()))
    }

    pub fn open_chat(&self, chat_id: &str) {
        self.active_chat_id.set(Some(chat_id.to_string()));
    }

    /// Host-side message deletion; favorites referencing the message become
    /// invalid and show the deleted placeholder until cleared.
    pub fn delete_message(&self, chat_id: &str, message_id: &str) {
        self.chats.update(|chats| {
            if let Some(chat) = chats.iter_mut().find(|c| c.id == chat_id) {
                chat.messages.retain(|m| m.id.normalized() != message_id.trim());
            }
        });
    }

    /// Map the current conversation to its identity. `None` with no active
    /// conversation; also `None` (logged) when the owner is not resolvable
    /// from the roster, which callers treat as unrecoverable for this call.
    pub fn resolve_chat_context(&self) -> Option<ChatContext> {
        let chat_id = self.active_chat_id.get_untracked()?;
        let chat = self.chats.with_untracked(|chats| {
            chats
                .iter()
                .find(|c| c.id == chat_id)
                .map(|c| (c.character_id.clone(), c.group_id.clone()))
        })?;

        match chat {
            (Some(char_id), _) => {
                let name = self.characters.with_untracked(|cs| {
                    cs.iter().find(|c| c.id == char_id).map(|c| c.name.clone())
                });
                match name {
                    Some(name) => Some(ChatContext {
                        chat_id,
                        kind: ChatKind::Private,
                        name,
                        character_id: Some(char_id),
                        group_id: None,
                    }),
                    None => {
                        leptos::logging::error!(
                            "favorites: chat {chat_id} references unknown character {char_id}"
                        );
                        None
                    }
                }
            }
            (None, Some(group_id)) => {
                let name = self.groups.with_untracked(|gs| {
                    gs.iter().find(|g| g.id == group_id).map(|g| g.name.clone())
                });
                match name {
                    Some(name) => Some(ChatContext {
                        chat_id,
                        kind: ChatKind::Group,
                        name,
                        character_id: None,
                        group_id: Some(group_id),
                    }),
                    None => {
                        leptos::logging::error!(
                            "favorites: chat {chat_id} references unknown group {group_id}"
                        );
                        None
                    }
                }
            }
            (None, None) => {
                leptos::logging::error!(
                    "favorites: chat {chat_id} has neither character nor group owner"
                );
                None
            }
        }
    }

    /// Tracked variant of [`Self::resolve_chat_context`] for render paths:
    /// subscribes to the active chat and roster signals, so views re-run on
    /// conversation switches and roster changes.
    pub fn resolve_chat_context_reactive(&self) -> Option<ChatContext> {
        self.active_chat_id.track();
        self.chats.track();
        self.characters.track();
        self.groups.track();
        self.resolve_chat_context()
    }

    /// Deterministic demo roster and chat logs so the app renders without a
    /// backend. Message ids deliberately mix numeric and string forms.
    pub fn demo() -> Self {
        let characters = vec![
            Character {
                id: "aria".to_string(),
                name: "Aria".to_string(),
            },
            Character {
                id: "brook".to_string(),
                name: "Brook".to_string(),
            },
            Character {
                id: "celia".to_string(),
                name: "Celia".to_string(),
            },
        ];

        let groups = vec![Group {
            id: "study".to_string(),
            name: "Study Group".to_string(),
            member_ids: vec!["aria".to_string(), "brook".to_string()],
        }];

        let base = 1_756_000_000_000_i64;
        let mut chats = Vec::new();

        let aria_main: Vec<ChatMessage> = (0..14)
            .map(|i| demo_message(i, "Aria", base + i as i64 * 60_000))
            .collect();
        chats.push(HostChat {
            id: "aria-main".to_string(),
            character_id: Some("aria".to_string()),
            group_id: None,
            messages: aria_main,
        });

        let brook_main: Vec<ChatMessage> = (0..6)
            .map(|i| demo_message(i, "Brook", base + 3_600_000 + i as i64 * 45_000))
            .collect();
        chats.push(HostChat {
            id: "brook-main".to_string(),
            character_id: Some("brook".to_string()),
            group_id: None,
            messages: brook_main,
        });

        let mut study: Vec<ChatMessage> = (0..8)
            .map(|i| demo_message(i, if i % 3 == 0 { "Aria" } else { "Brook" }, base + 7_200_000 + i as i64 * 30_000))
            .collect();
        // A host-injected system note with a string id.
        study.push(ChatMessage {
            id: MessageId::Text("sys-welcome".to_string()),
            sender: "System".to_string(),
            text: "Group chat created.".to_string(),
            is_user: false,
            is_system: true,
            sent_ms: base + 7_199_000,
        });
        chats.push(HostChat {
            id: "study-2026-08".to_string(),
            character_id: None,
            group_id: Some("study".to_string()),
            messages: study,
        });

        Self {
            characters: RwSignal::new(characters),
            groups: RwSignal::new(groups),
            active_chat_id: RwSignal::new(chats.first().map(|c| c.id.clone())),
            chats: RwSignal::new(chats),
        }
    }
}

fn demo_message(i: u64, partner: &str, sent_ms: i64) -> ChatMessage {
    let is_user = i % 2 == 0;
    ChatMessage {
        id: MessageId::Num(i),
        sender: if is_user { "You".to_string() } else { partner.to_string() },
        text: if is_user {
            format!("Quick thought #{i}: let's revisit the outline before Friday.")
        } else {
            format!("{partner}: noted #{i} — I'll fold that into the next draft and flag anything odd.")
        },
        is_user,
        is_system: false,
        sent_ms,
    }
}

/// Host confirmation/input primitives. Cancellation maps to `None`/`false`
/// and is always a clean abort for callers.
pub(crate) mod prompts {
    /// Multi-line-capable free-text prompt, pre-filled. `None` = cancelled.
    pub(crate) fn prompt_text(message: &str, prefill: &str) -> Option<String> {
        let window = web_sys::window()?;
        window
            .prompt_with_message_and_default(message, prefill)
            .ok()
            .flatten()
    }

    pub(crate) fn confirm(message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    pub(crate) fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_roster_is_consistent() {
        let host = HostContext::demo();
        let chats = host.chats.get_untracked();
        let characters = host.characters.get_untracked();
        let groups = host.groups.get_untracked();

        assert!(!chats.is_empty());
        for chat in &chats {
            // Exactly one owner per conversation.
            assert!(chat.character_id.is_some() != chat.group_id.is_some());
            if let Some(cid) = &chat.character_id {
                assert!(characters.iter().any(|c| &c.id == cid));
            }
            if let Some(gid) = &chat.group_id {
                assert!(groups.iter().any(|g| &g.id == gid));
            }
        }
    }

    #[test]
    fn resolver_prefers_character_and_reports_kind() {
        let host = HostContext::demo();
        host.active_chat_id.set(Some("aria-main".to_string()));
        let ctx = host.resolve_chat_context().expect("should resolve");
        assert_eq!(ctx.kind, ChatKind::Private);
        assert_eq!(ctx.name, "Aria");
        assert_eq!(ctx.character_id.as_deref(), Some("aria"));
        assert!(ctx.group_id.is_none());

        host.active_chat_id.set(Some("study-2026-08".to_string()));
        let ctx = host.resolve_chat_context().expect("should resolve");
        assert_eq!(ctx.kind, ChatKind::Group);
        assert_eq!(ctx.name, "Study Group");
    }

    #[test]
    fn reactive_resolver_follows_chat_switches() {
        let host = HostContext::demo();
        let h = host.clone();
        let name = Memo::new(move |_| h.resolve_chat_context_reactive().map(|c| c.name));

        host.open_chat("aria-main");
        assert_eq!(name.get_untracked().as_deref(), Some("Aria"));

        host.open_chat("study-2026-08");
        assert_eq!(name.get_untracked().as_deref(), Some("Study Group"));

        host.active_chat_id.set(None);
        assert!(name.get_untracked().is_none());
    }

    #[test]
    fn resolver_signals_no_active_conversation() {
        let host = HostContext::demo();
        host.active_chat_id.set(None);
        assert!(host.resolve_chat_context().is_none());
    }

    #[test]
    fn resolver_fails_on_unresolvable_owner() {
        let host = HostContext::demo();
        host.chats.update(|chats| {
            chats.push(HostChat {
                id: "orphan".to_string(),
                character_id: Some("ghost".to_string()),
                group_id: None,
                messages: Vec::new(),
            });
        });
        host.active_chat_id.set(Some("orphan".to_string()));
        assert!(host.resolve_chat_context().is_none());
    }

    #[test]
    fn find_message_normalizes_string_ids() {
        let host = HostContext::demo();
        let found = host.find_message("study-2026-08", "sys-welcome");
        assert!(found.is_some());
        assert!(found.unwrap().is_system);

        assert!(host.find_message("study-2026-08", "0").is_some());
        assert!(host.find_message("study-2026-08", "999").is_none());
    }

    #[test]
    fn delete_message_removes_from_live_log() {
        let host = HostContext::demo();
        assert!(host.find_message("aria-main", "3").is_some());
        host.delete_message("aria-main", "3");
        assert!(host.find_message("aria-main", "3").is_none());
    }
}
