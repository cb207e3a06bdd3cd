use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) const PREVIEW_MAX_CHARS: usize = 80;

static COUNTER: AtomicUsize = AtomicUsize::new(1);

pub(crate) fn now_ms() -> i64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().round() as i64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Fresh favorite-item id. Hashing (counter, now_ms) keeps ids unique within
/// a page load and across loads of the same persisted blob.
pub(crate) fn new_favorite_id() -> String {
    let mut hasher = DefaultHasher::new();
    COUNTER.fetch_add(1, Ordering::SeqCst).hash(&mut hasher);
    now_ms().hash(&mut hasher);
    format!("fav_{:016x}", hasher.finish())
}

/// Local-time "YYYY-MM-DD HH:MM" for list rows (browser runtime).
pub(crate) fn format_timestamp(ms: i64) -> String {
    let d = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(ms as f64));
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        d.get_full_year(),
        d.get_month() + 1,
        d.get_date(),
        d.get_hours(),
        d.get_minutes()
    )
}

/// Cap a message excerpt at [`PREVIEW_MAX_CHARS`] characters, appending an
/// ellipsis only when something was actually cut.
pub(crate) fn truncate_preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favorite_ids_are_unique_and_prefixed() {
        let a = new_favorite_id();
        let b = new_favorite_id();
        assert!(a.starts_with("fav_"));
        assert_ne!(a, b);
    }

    #[test]
    fn short_text_passes_through_untruncated() {
        assert_eq!(truncate_preview("hello"), "hello");
    }

    #[test]
    fn exact_length_text_gets_no_ellipsis() {
        let s = "x".repeat(PREVIEW_MAX_CHARS);
        assert_eq!(truncate_preview(&s), s);
    }

    #[test]
    fn long_text_is_capped_with_ellipsis() {
        let s = "y".repeat(PREVIEW_MAX_CHARS + 5);
        let out = truncate_preview(&s);
        assert!(out.ends_with('…'));
        assert_eq!(out.chars().count(), PREVIEW_MAX_CHARS + 1);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Multi-byte characters must not be split.
        let s = "é".repeat(PREVIEW_MAX_CHARS + 1);
        let out = truncate_preview(&s);
        assert_eq!(out.chars().count(), PREVIEW_MAX_CHARS + 1);
    }
}
