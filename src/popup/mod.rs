use crate::components::ui::{Badge, Button, ButtonSize, ButtonVariant, Modal, Muted, Row, RowList};
use crate::controller::FavoritesController;
use crate::favorites::{self, paging};
use crate::host::prompts;
use crate::state::AppContext;
use crate::util::{format_timestamp, truncate_preview};
use icons::{ChevronLeft, ChevronRight, Pencil, Trash2};
use leptos::prelude::*;
use std::collections::HashSet;

/// Paginated favorites list for one conversation.
///
/// Created once and reused: opening re-binds `popup_chat_id` and resets the
/// page to 1 (see `FavoritesController::open_popup`); show/hide lives on the
/// `popup_open` signal.
#[component]
pub fn FavoritesPopup() -> impl IntoView {
    let app = expect_context::<AppContext>();
    let controller = expect_context::<FavoritesController>();
    let host = app.0.host.clone();

    let settings = app.0.settings;
    let popup_open = app.0.popup_open;
    let popup_chat_id = app.0.popup_chat_id;
    let popup_page = app.0.popup_page;
    let active_chat_id = host.active_chat_id;

    let chat_favorites = Memo::new(move |_| {
        let chat_id = popup_chat_id.get()?;
        settings.with(|s| s.chats.get(&chat_id).cloned())
    });

    let count = move || chat_favorites.get().map(|c| c.items.len()).unwrap_or(0);
    let total = move || paging::total_pages(count(), paging::POPUP_PAGE_SIZE);

    let is_active = Memo::new(move |_| {
        let bound = popup_chat_id.get();
        bound.is_some() && bound == active_chat_id.get()
    });

    // Out-of-range requests (including pages emptied by removals elsewhere)
    // settle on the nearest valid page, and the clamped value sticks.
    Effect::new(move |_| {
        let t = total();
        let p = popup_page.get();
        let clamped = paging::clamp_page(p, t);
        if clamped != p {
            popup_page.set(clamped);
        }
    });

    let page_ids = Memo::new(move |_| {
        let Some(chat) = chat_favorites.get() else {
            return Vec::new();
        };
        let sorted = paging::sorted_by_timestamp(&chat.items);
        let page = paging::clamp_page(
            popup_page.get(),
            paging::total_pages(sorted.len(), paging::POPUP_PAGE_SIZE),
        );
        paging::page_slice(&sorted, page, paging::POPUP_PAGE_SIZE)
            .iter()
            .map(|i| i.id.clone())
            .collect::<Vec<String>>()
    });

    let title = move || {
        let name = chat_favorites
            .get()
            .map(|c| c.name)
            .or_else(|| popup_chat_id.get())
            .unwrap_or_default();
        format!("Favorites — {} ({})", name, count())
    };

    let on_prev = {
        let controller = controller.clone();
        move |_: leptos::ev::MouseEvent| {
            let p = popup_page.get_untracked();
            if p > 1 {
                controller.set_popup_page(p - 1);
            }
        }
    };
    let on_next = {
        let controller = controller.clone();
        move |_: leptos::ev::MouseEvent| {
            controller.set_popup_page(popup_page.get_untracked() + 1);
        }
    };

    // Validity clearing needs the live message list, so it only works while
    // the bound conversation is the active one.
    let on_clear_invalid = {
        let controller = controller.clone();
        let host = host.clone();
        move |_: leptos::ev::MouseEvent| {
            let Some(chat_id) = popup_chat_id.get_untracked() else {
                return;
            };

            let live: HashSet<String> = host.chat_message_ids(&chat_id).into_iter().collect();
            let flagged = settings.with_untracked(|s| {
                s.chats
                    .get(&chat_id)
                    .map(|c| favorites::invalid_favorite_ids(c, &live))
                    .unwrap_or_default()
            });

            if flagged.is_empty() {
                prompts::alert("No invalid favorites found.");
                return;
            }
            if !prompts::confirm(&format!(
                "Remove {} favorite(s) whose message no longer exists?",
                flagged.len()
            )) {
                return;
            }

            let removed = controller.remove_favorites_by_ids(&chat_id, &flagged);
            prompts::alert(&format!("Removed {removed} invalid favorite(s)."));
        }
    };

    view! {
        <Modal open=popup_open class="max-w-xl">
            <div class="flex flex-col gap-1">
                <h2 class="text-base font-semibold leading-none">{title}</h2>
                <Show when=move || !is_active.get() fallback=|| ().into_view()>
                    <Muted>"Not the active chat: previews unavailable."</Muted>
                </Show>
            </div>

            <Show
                when=move || { count() > 0 }
                fallback=move || view! {
                    <Muted>"No favorites in this chat yet. Use the star next to a message."</Muted>
                }
            >
                <RowList>
                    <For
                        each=move || page_ids.get()
                        key=|id| id.clone()
                        children=move |fav_id| view! { <FavoriteRow fav_id=fav_id /> }
                    />
                </RowList>

                <div class="flex items-center justify-between gap-2 pt-1">
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Icon
                        attr:aria-label="Previous page"
                        attr:disabled=move || { popup_page.get() <= 1 }
                        on:click=on_prev.clone()
                    >
                        <ChevronLeft />
                    </Button>
                    <Muted>
                        {move || format!("page {} / {}", popup_page.get(), total())}
                    </Muted>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Icon
                        attr:aria-label="Next page"
                        attr:disabled=move || { popup_page.get() >= total() }
                        on:click=on_next.clone()
                    >
                        <ChevronRight />
                    </Button>
                </div>
            </Show>

            <div class="flex items-center justify-end border-t pt-3">
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    attr:disabled=move || !is_active.get() || count() == 0
                    on:click=on_clear_invalid.clone()
                >
                    "Clear invalid"
                </Button>
            </div>
        </Modal>
    }
}

/// One list row. Looks its item up reactively, so a note edit patches just
/// this row; the row disappears on its own when the item is removed.
#[component]
fn FavoriteRow(fav_id: String) -> impl IntoView {
    let app = expect_context::<AppContext>();
    let controller = expect_context::<FavoritesController>();
    let host = app.0.host.clone();

    let settings = app.0.settings;
    let popup_chat_id = app.0.popup_chat_id;
    let active_chat_id = host.active_chat_id;

    let item = {
        let fav_id = fav_id.clone();
        Memo::new(move |_| {
            let chat_id = popup_chat_id.get()?;
            settings.with(|s| {
                s.chats
                    .get(&chat_id)
                    .and_then(|c| c.items.iter().find(|i| i.id == fav_id).cloned())
            })
        })
    };

    let is_active = Memo::new(move |_| {
        let bound = popup_chat_id.get();
        bound.is_some() && bound == active_chat_id.get()
    });

    // Preview against the live log; only the active chat has one.
    let preview = {
        let host = host.clone();
        move || {
            let Some(item) = item.get() else {
                return (String::new(), true);
            };
            if !is_active.get() {
                return ("Switch to this chat to see the message.".to_string(), true);
            }
            let found = host
                .live_messages()
                .into_iter()
                .find(|m| m.id.normalized() == item.message_id);
            match found {
                Some(m) => (truncate_preview(&m.text), false),
                None => ("This message was deleted.".to_string(), true),
            }
        }
    };

    let on_edit_note = {
        let controller = controller.clone();
        let fav_id = fav_id.clone();
        move |_| {
            let Some(chat_id) = popup_chat_id.get_untracked() else {
                return;
            };
            let current = settings.with_untracked(|s| {
                s.chats
                    .get(&chat_id)
                    .and_then(|c| c.items.iter().find(|i| i.id == fav_id))
                    .map(|i| i.note.clone())
            });
            let Some(current) = current else {
                return;
            };

            // Cancel leaves the note untouched; an empty result clears it.
            if let Some(text) = prompts::prompt_text("Note for this favorite:", &current) {
                controller.set_note(&chat_id, &fav_id, &text);
            }
        }
    };

    let on_delete = {
        let controller = controller.clone();
        let fav_id = fav_id.clone();
        move |_| {
            let Some(chat_id) = popup_chat_id.get_untracked() else {
                return;
            };
            if !prompts::confirm("Remove this favorite?") {
                return;
            }
            // Message-list stars re-sync from the store, so the live icon
            // reverts on its own when this was the active chat.
            controller.remove_favorite_by_id(&chat_id, &fav_id);
        }
    };

    view! {
        <Row class="flex-col gap-1">
            {move || {
                item.get()
                    .map(|it| {
                        let (preview_text, is_placeholder) = preview();
                        let note = it.note.clone();
                        view! {
                            <div class="flex w-full items-center gap-2">
                                <span class="text-sm font-medium">{it.sender.clone()}</span>
                                <Badge>{it.role.to_string()}</Badge>
                                <Muted>{format_timestamp(it.timestamp)}</Muted>
                                <span class="grow" />
                                <Button
                                    variant=ButtonVariant::Ghost
                                    size=ButtonSize::Icon
                                    attr:aria-label="Edit note"
                                    on:click=on_edit_note.clone()
                                >
                                    <Pencil />
                                </Button>
                                <Button
                                    variant=ButtonVariant::Ghost
                                    size=ButtonSize::Icon
                                    attr:aria-label="Delete favorite"
                                    on:click=on_delete.clone()
                                >
                                    <Trash2 />
                                </Button>
                            </div>
                            {(!note.is_empty())
                                .then(|| view! { <p class="text-xs italic text-amber-700">{note.clone()}</p> })}
                            <p class=if is_placeholder {
                                "text-xs italic text-muted-foreground"
                            } else {
                                "text-xs text-foreground/80"
                            }>{preview_text}</p>
                        }
                    })
            }}
        </Row>
    }
}
