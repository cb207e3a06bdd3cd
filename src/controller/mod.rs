use crate::favorites::{self, paging};
use crate::models::{ChatContext, ChatMessage};
use crate::state::AppContext;
use crate::storage::save_settings;
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::{window_event_listener, WindowListenerHandle};
use wasm_bindgen::JsCast;

/// Single writer over the favorites settings root.
///
/// Responsibilities:
/// - applying store mutations to the settings signal
/// - requesting persistence (debounced, plus a pagehide flush)
/// - popup session bookkeeping (page fallback after removals)
///
/// Re-rendering the popup and overview is not a responsibility here: both
/// derive from the settings signal and update on every mutation.
#[derive(Clone, Copy)]
pub(crate) struct FavoritesController {
    app_state: AppContext,

    persist_ms: i32,
    persist_timer: RwSignal<Option<i32>>,

    /// Keep the pagehide listener alive for the app lifetime.
    _pagehide_handle: StoredValue<Option<WindowListenerHandle>>,
}

impl FavoritesController {
    pub fn new(app_state: AppContext) -> Self {
        let s = Self {
            app_state,
            persist_ms: 800,
            persist_timer: RwSignal::new(None),
            _pagehide_handle: StoredValue::new(None),
        };

        // A tab hidden inside the debounce window must not lose the last
        // mutation.
        let s2 = s.clone();
        let pagehide =
            window_event_listener(ev::pagehide, move |_ev: web_sys::PageTransitionEvent| {
                s2.flush_pending_persist();
            });
        s._pagehide_handle.set_value(Some(pagehide));

        s
    }

    /// Store a favorite for `message` in the conversation `ctx` describes.
    /// Absent context or message data fails silently (logged); an already
    /// favorited message is a warned no-op inside the store.
    pub fn add_favorite(&self, ctx: Option<&ChatContext>, message: Option<&ChatMessage>) {
        let (Some(ctx), Some(message)) = (ctx, message) else {
            leptos::logging::warn!("favorites: add skipped, missing chat context or message");
            return;
        };

        let mut added = false;
        self.app_state.0.settings.update(|s| {
            added = matches!(
                favorites::add_favorite(s, ctx, message),
                favorites::AddOutcome::Added
            );
        });

        if added {
            self.schedule_persist();
        }
    }

    /// Remove by favorite id. On success, persists and pulls the open popup
    /// back onto the last valid page when its current one disappeared.
    pub fn remove_favorite_by_id(&self, chat_id: &str, fav_id: &str) -> bool {
        let mut removed = false;
        self.app_state.0.settings.update(|s| {
            removed = favorites::remove_by_fav_id(s, chat_id, fav_id);
        });
        if !removed {
            leptos::logging::log!("favorites: nothing to remove for id {fav_id}");
            return false;
        }

        self.after_removal(chat_id);
        true
    }

    /// Remove by message id; a miss is a valid no-op (toggling an
    /// unfavorited message), not a failure.
    pub fn remove_favorite_by_message_id(&self, chat_id: &str, message_id: &str) -> bool {
        let mut removed = None;
        self.app_state.0.settings.update(|s| {
            removed = favorites::remove_by_message_id(s, chat_id, message_id);
        });

        match removed {
            Some(_) => {
                self.after_removal(chat_id);
                true
            }
            None => {
                leptos::logging::log!(
                    "favorites: message {message_id} not favorited in {chat_id}, nothing to do"
                );
                false
            }
        }
    }

    /// Bookkeeping shared by every removal path: persist, then pull the open
    /// popup back onto the last valid page when its current one disappeared.
    fn after_removal(&self, chat_id: &str) {
        self.schedule_persist();

        let app = &self.app_state.0;
        if app.popup_chat_id.get_untracked().as_deref() == Some(chat_id) {
            let count = app
                .settings
                .with_untracked(|s| favorites::favorite_count(s, chat_id));
            let page = app.popup_page.get_untracked();
            let next = paging::page_after_removal(count, page, paging::POPUP_PAGE_SIZE);
            if next != page {
                app.popup_page.set(next);
            }
        }
    }

    /// Remove a batch (clear-invalid). Each removal runs the full per-item
    /// bookkeeping; returns how many actually went away.
    pub fn remove_favorites_by_ids(&self, chat_id: &str, fav_ids: &[String]) -> usize {
        fav_ids
            .iter()
            .filter(|id| self.remove_favorite_by_id(chat_id, id))
            .count()
    }

    pub fn set_note(&self, chat_id: &str, fav_id: &str, note: &str) -> bool {
        let mut changed = false;
        self.app_state.0.settings.update(|s| {
            changed = favorites::set_note(s, chat_id, fav_id, note);
        });
        if changed {
            self.schedule_persist();
        }
        changed
    }

    /// Open (or re-bind) the single popup instance on `chat_id`, page 1.
    pub fn open_popup(&self, chat_id: &str) {
        let app = &self.app_state.0;
        app.popup_chat_id.set(Some(chat_id.to_string()));
        app.popup_page.set(1);
        app.popup_open.set(true);
    }

    pub fn set_popup_page(&self, page: usize) {
        self.app_state.0.popup_page.set(page);
    }

    // --- persistence ---------------------------------------------------

    /// Fire-and-forget persistence request; writes are debounced so bursts
    /// of mutations collapse into one flush.
    fn schedule_persist(&self) {
        let Some(win) = web_sys::window() else {
            return;
        };

        if let Some(tid) = self.persist_timer.get_untracked() {
            win.clear_timeout_with_handle(tid);
        }

        let s2 = self.clone();
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            s2.flush_persist();
        });

        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                self.persist_ms,
            )
            .unwrap_or(0);
        self.persist_timer.set(Some(tid));
    }

    fn flush_persist(&self) {
        self.persist_timer.set(None);
        self.app_state.0.settings.with_untracked(save_settings);
    }

    fn flush_pending_persist(&self) {
        if self.persist_timer.get_untracked().is_none() {
            return;
        }
        if let (Some(win), Some(tid)) = (web_sys::window(), self.persist_timer.get_untracked()) {
            win.clear_timeout_with_handle(tid);
        }
        self.flush_persist();
    }
}
