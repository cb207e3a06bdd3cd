use crate::host::HostContext;
use crate::models::FavoritesSettings;
use crate::storage::load_settings;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    /// Narrow host surface (roster, active chat, live messages).
    pub host: HostContext,

    /// Settings root, mirrored to localStorage with a debounced flush.
    /// In-memory state is the source of truth between flushes.
    pub settings: RwSignal<FavoritesSettings>,

    /// Favorites popup session: single reused instance, shown/hidden via
    /// `popup_open`, bound to `popup_chat_id` at open time. `popup_page` is
    /// 1-based and clamped by the renderer.
    pub popup_open: RwSignal<bool>,
    pub popup_chat_id: RwSignal<Option<String>>,
    pub popup_page: RwSignal<usize>,

    /// Overview pagination (1-based).
    pub overview_page: RwSignal<usize>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            host: HostContext::demo(),
            settings: RwSignal::new(load_settings()),
            popup_open: RwSignal::new(false),
            popup_chat_id: RwSignal::new(None),
            popup_page: RwSignal::new(1),
            overview_page: RwSignal::new(1),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
