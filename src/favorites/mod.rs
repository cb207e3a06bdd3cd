use crate::models::{ChatContext, ChatFavorites, ChatMessage, FavoriteItem, FavoritesSettings};
use crate::util::new_favorite_id;
use std::collections::HashSet;

pub(crate) mod paging;

/// Identifier comparison at the store boundary: trimmed string equality.
/// Stored ids are normalized at creation, but blobs may predate that.
fn same_message_id(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

pub(crate) enum AddOutcome {
    Added,
    AlreadyFavorited,
}

pub(crate) fn is_favorited(settings: &FavoritesSettings, chat_id: &str, message_id: &str) -> bool {
    settings
        .chats
        .get(chat_id)
        .map(|c| c.items.iter().any(|i| same_message_id(&i.message_id, message_id)))
        .unwrap_or(false)
}

pub(crate) fn favorite_count(settings: &FavoritesSettings, chat_id: &str) -> usize {
    settings.chats.get(chat_id).map(|c| c.items.len()).unwrap_or(0)
}

/// Append a favorite for `message` under the conversation `ctx` describes.
///
/// Creates the conversation entry on first favorite. An existing entry gets
/// its identity refreshed as a merge: name only when the context carries a
/// non-empty one, owner ids only when present. Diverged `count` is repaired
/// before the mutation applies.
pub(crate) fn add_favorite(
    settings: &mut FavoritesSettings,
    ctx: &ChatContext,
    message: &ChatMessage,
) -> AddOutcome {
    let entry = settings
        .chats
        .entry(ctx.chat_id.clone())
        .or_insert_with(|| ChatFavorites {
            kind: ctx.kind,
            name: ctx.name.clone(),
            character_id: ctx.character_id.clone(),
            group_id: ctx.group_id.clone(),
            count: 0,
            items: Vec::new(),
        });

    entry.kind = ctx.kind;
    if !ctx.name.trim().is_empty() {
        entry.name = ctx.name.clone();
    }
    if ctx.character_id.is_some() {
        entry.character_id = ctx.character_id.clone();
    }
    if ctx.group_id.is_some() {
        entry.group_id = ctx.group_id.clone();
    }
    entry.count = entry.items.len();

    let message_id = message.id.normalized();
    if entry.items.iter().any(|i| same_message_id(&i.message_id, &message_id)) {
        leptos::logging::warn!(
            "favorites: message {message_id} already favorited in {}",
            ctx.chat_id
        );
        return AddOutcome::AlreadyFavorited;
    }

    entry.items.push(FavoriteItem {
        id: new_favorite_id(),
        message_id,
        sender: message.sender.clone(),
        role: message.role(),
        timestamp: message.sent_ms,
        note: String::new(),
    });
    entry.count = entry.items.len();

    AddOutcome::Added
}

/// Remove one favorite by its own id. Drops the whole conversation entry when
/// it would be left empty. Returns false when nothing matched.
pub(crate) fn remove_by_fav_id(
    settings: &mut FavoritesSettings,
    chat_id: &str,
    fav_id: &str,
) -> bool {
    let Some(chat) = settings.chats.get_mut(chat_id) else {
        return false;
    };

    let before = chat.items.len();
    chat.items.retain(|i| i.id != fav_id);
    if chat.items.len() == before {
        return false;
    }

    chat.count = chat.items.len();
    if chat.items.is_empty() {
        settings.chats.remove(chat_id);
    }
    true
}

/// Favorite id holding `message_id` in `chat_id`, if any. The only place a
/// message id is matched against stored favorites.
pub(crate) fn find_fav_id_by_message_id(
    settings: &FavoritesSettings,
    chat_id: &str,
    message_id: &str,
) -> Option<String> {
    settings
        .chats
        .get(chat_id)?
        .items
        .iter()
        .find(|i| same_message_id(&i.message_id, message_id))
        .map(|i| i.id.clone())
}

/// Resolve a message id to its favorite and remove it, returning the removed
/// favorite's id. A missing match is a valid no-op (toggling an unfavorited
/// message), not a failure.
pub(crate) fn remove_by_message_id(
    settings: &mut FavoritesSettings,
    chat_id: &str,
    message_id: &str,
) -> Option<String> {
    let fav_id = find_fav_id_by_message_id(settings, chat_id, message_id)?;
    remove_by_fav_id(settings, chat_id, &fav_id).then_some(fav_id)
}

/// Replace a favorite's note with the trimmed text. Empty input clears the
/// note; cancellation is the caller's concern and never reaches here.
pub(crate) fn set_note(
    settings: &mut FavoritesSettings,
    chat_id: &str,
    fav_id: &str,
    note: &str,
) -> bool {
    let Some(item) = settings
        .chats
        .get_mut(chat_id)
        .and_then(|c| c.items.iter_mut().find(|i| i.id == fav_id))
    else {
        return false;
    };

    item.note = note.trim().to_string();
    true
}

/// Favorite ids whose message id is absent from the live conversation.
pub(crate) fn invalid_favorite_ids(chat: &ChatFavorites, live_ids: &HashSet<String>) -> Vec<String> {
    chat.items
        .iter()
        .filter(|i| !live_ids.contains(i.message_id.trim()))
        .map(|i| i.id.clone())
        .collect()
}
