use crate::models::FavoritesSettings;
use serde::{Deserialize, Serialize};

/// Per-extension settings namespace in localStorage.
pub(crate) const SETTINGS_KEY: &str = "favmarks_settings";

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, &json);
        }
    }
}

/// Settings root at startup. A missing blob starts empty; a corrupt one is
/// logged and discarded rather than taking the extension down.
pub(crate) fn load_settings() -> FavoritesSettings {
    let raw = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(SETTINGS_KEY).ok().flatten());

    let Some(json) = raw else {
        return FavoritesSettings::default();
    };

    match serde_json::from_str(&json) {
        Ok(settings) => settings,
        Err(e) => {
            leptos::logging::warn!("favorites: discarding unreadable settings blob: {e}");
            FavoritesSettings::default()
        }
    }
}

pub(crate) fn save_settings(settings: &FavoritesSettings) {
    save_json_to_storage(SETTINGS_KEY, settings);
}

pub(crate) fn clear_settings() {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.remove_item(SETTINGS_KEY);
    }
}
