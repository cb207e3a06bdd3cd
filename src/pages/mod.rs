use crate::components::ui::{
    Badge, Button, ButtonSize, ButtonVariant, Muted, Panel, PanelBody, PanelHeader, PanelTitle,
    RowList,
};
use crate::controller::FavoritesController;
use crate::favorites;
use crate::host::prompts;
use crate::models::ChatMessage;
use crate::overview::OverviewPanel;
use crate::popup::FavoritesPopup;
use crate::state::AppContext;
use crate::util::format_timestamp;
use icons::{Star, X};
use leptos::prelude::*;

/// Host chat screen plus the two extension mount points: the sidebar action
/// area (favorites button) and the settings area (overview panel). The
/// favorites popup is instantiated once here and reused.
#[component]
pub fn ChatWorkspace() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-background text-foreground">
            <div class="mx-auto flex w-full max-w-[1200px] items-start gap-4 px-4 py-6">
                <aside class="flex w-60 shrink-0 flex-col gap-4">
                    <ChatSidebar />
                </aside>
                <main class="min-w-0 grow">
                    <MessagePane />
                </main>
                <aside class="w-80 shrink-0">
                    <ExtensionSettingsArea />
                </aside>
            </div>
            <FavoritesPopup />
        </div>
    }
}

#[component]
fn ChatSidebar() -> impl IntoView {
    let app = expect_context::<AppContext>();
    let controller = expect_context::<FavoritesController>();
    let host = app.0.host.clone();

    let active_chat_id = host.active_chat_id;

    let chat_rows = {
        let host = host.clone();
        Memo::new(move |_| {
            host.chats.with(|chats| {
                chats
                    .iter()
                    .map(|c| {
                        let owner = match (&c.character_id, &c.group_id) {
                            (Some(cid), _) => host.character_name(cid),
                            (None, Some(gid)) => host.group_name(gid),
                            (None, None) => None,
                        };
                        (c.id.clone(), owner.unwrap_or_else(|| "?".to_string()))
                    })
                    .collect::<Vec<_>>()
            })
        })
    };

    // Sidebar action area: open the popup on whatever chat is current now.
    let on_open_favorites = {
        let controller = controller.clone();
        let host = host.clone();
        move |_| {
            let Some(ctx) = host.resolve_chat_context() else {
                prompts::alert("Favorites: no active chat to show favorites for.");
                return;
            };
            controller.open_popup(&ctx.chat_id);
        }
    };

    view! {
        <Panel>
            <PanelHeader>
                <PanelTitle>"Chats"</PanelTitle>
            </PanelHeader>
            <PanelBody>
                <For
                    each=move || chat_rows.get()
                    key=|(id, _)| id.clone()
                    children=move |(id, owner)| {
                        let host = expect_context::<AppContext>().0.host.clone();
                        let id_for_click = id.clone();
                        let id_for_class = id.clone();
                        view! {
                            <button
                                type="button"
                                class=move || {
                                    if active_chat_id.get().as_deref() == Some(id_for_class.as_str()) {
                                        "flex flex-col items-start rounded-md border bg-accent px-3 py-1.5 text-left"
                                    } else {
                                        "flex flex-col items-start rounded-md border px-3 py-1.5 text-left hover:bg-accent"
                                    }
                                }
                                on:click=move |_| host.open_chat(&id_for_click)
                            >
                                <span class="text-sm font-medium">{owner}</span>
                                <span class="text-xs text-muted-foreground">{id}</span>
                            </button>
                        }
                    }
                />
            </PanelBody>
        </Panel>

        <Panel>
            <PanelBody>
                <Button variant=ButtonVariant::Outline on:click=on_open_favorites>
                    <Star />
                    "Favorites of this chat"
                </Button>
            </PanelBody>
        </Panel>
    }
}

#[component]
fn MessagePane() -> impl IntoView {
    let app = expect_context::<AppContext>();
    let host = app.0.host.clone();

    let active_chat_id = host.active_chat_id;

    let header = {
        let host = host.clone();
        move || {
            host.resolve_chat_context_reactive()
                .map(|ctx| (ctx.name, ctx.kind.to_string()))
        }
    };

    // Rows are keyed per conversation: demo chats reuse numeric message ids,
    // and keyed reconciliation would otherwise retain the previous chat's
    // rows across a switch.
    let messages = {
        let host = host.clone();
        Memo::new(move |_| {
            let chat_id = active_chat_id.get().unwrap_or_default();
            host.live_messages()
                .into_iter()
                .map(|m| (message_row_key(&chat_id, &m), m))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <Panel>
            <PanelHeader>
                {move || match header() {
                    Some((name, kind)) => view! {
                        <div class="flex items-center gap-2">
                            <PanelTitle>{name}</PanelTitle>
                            <Badge>{kind}</Badge>
                        </div>
                    }
                    .into_any(),
                    None => view! { <PanelTitle>"No chat open"</PanelTitle> }.into_any(),
                }}
                <Muted>{move || active_chat_id.get().unwrap_or_default()}</Muted>
            </PanelHeader>
            <PanelBody>
                <Show
                    when=move || !messages.with(|m| m.is_empty())
                    fallback=|| view! { <Muted>"This chat has no messages."</Muted> }
                >
                    <RowList>
                        <For
                            each=move || messages.get()
                            key=|(key, _): &(String, ChatMessage)| key.clone()
                            children=move |(_, m)| view! { <MessageRow message=m /> }
                        />
                    </RowList>
                </Show>
            </PanelBody>
        </Panel>
    }
}

/// List key for one rendered message. Scoped to the conversation so a chat
/// switch rebuilds every row even when message ids collide across chats.
fn message_row_key(chat_id: &str, message: &ChatMessage) -> String {
    format!("{chat_id}:{}", message.id.normalized())
}

#[component]
fn MessageRow(message: ChatMessage) -> impl IntoView {
    let app = expect_context::<AppContext>();
    let host = app.0.host.clone();

    let message_id = message.id.normalized();
    let sent = format_timestamp(message.sent_ms);

    let on_host_delete = {
        let host = host.clone();
        let message_id = message_id.clone();
        move |_| {
            let Some(chat_id) = host.active_chat_id.get_untracked() else {
                return;
            };
            host.delete_message(&chat_id, &message_id);
        }
    };

    view! {
        <li class="flex items-start gap-2 rounded-md border px-3 py-2">
            <div class="min-w-0 grow">
                <div class="flex items-center gap-2">
                    <span class="text-sm font-medium">{message.sender.clone()}</span>
                    <Muted>{sent}</Muted>
                </div>
                <p class="text-sm text-foreground/90">{message.text.clone()}</p>
            </div>
            <div class="flex shrink-0 items-center gap-1">
                <FavoriteToggle message=message.clone() />
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    attr:aria-label="Delete message"
                    attr:title="Delete message (host)"
                    on:click=on_host_delete
                >
                    <X class="size-3 text-muted-foreground" />
                </Button>
            </div>
        </li>
    }
}

/// Per-message favorite star.
///
/// The visual state is its own signal and is the source of truth for toggle
/// direction: a click flips it first (optimistic), then the data operation
/// commits or the flip is reverted. An effect reconciles it with the store
/// whenever the active chat or the settings root changes.
#[component]
fn FavoriteToggle(message: ChatMessage) -> impl IntoView {
    let app = expect_context::<AppContext>();
    let controller = expect_context::<FavoritesController>();
    let host = app.0.host.clone();

    let settings = app.0.settings;
    let active_chat_id = host.active_chat_id;
    let message_id = message.id.normalized();

    let starred = RwSignal::new(false);

    {
        let message_id = message_id.clone();
        Effect::new(move |_| {
            let chat = active_chat_id.get();
            let fav = settings.with(|s| {
                chat.as_deref()
                    .map(|c| favorites::is_favorited(s, c, &message_id))
                    .unwrap_or(false)
            });
            starred.set(fav);
        });
    }

    let on_toggle = {
        let controller = controller.clone();
        let host = host.clone();
        let message_id = message_id.clone();
        move |_| {
            let Some(ctx) = host.resolve_chat_context() else {
                prompts::alert("Favorites: could not resolve the current chat.");
                return;
            };

            let was = starred.get_untracked();
            starred.set(!was);

            if !was {
                // Re-resolve the full message; the log may have moved on.
                match host.find_message(&ctx.chat_id, &message_id) {
                    Some(live) => controller.add_favorite(Some(&ctx), Some(&live)),
                    None => {
                        starred.set(was);
                        prompts::alert("Favorites: this message is no longer available.");
                    }
                }
            } else {
                controller.remove_favorite_by_message_id(&ctx.chat_id, &message_id);
            }
        }
    };

    view! {
        <button
            type="button"
            class="rounded-sm p-1 hover:bg-accent"
            title=move || {
                if starred.get() {
                    "Remove favorite"
                } else {
                    "Add favorite"
                }
            }
            on:click=on_toggle
        >
            <Show
                when=move || starred.get()
                fallback=|| view! { <Star class="size-4 text-muted-foreground" /> }
            >
                <Star class="size-4 fill-amber-400 text-amber-500" />
            </Show>
        </button>
    }
}

#[component]
fn ExtensionSettingsArea() -> impl IntoView {
    view! {
        <div class="flex flex-col gap-4">
            <Panel>
                <PanelHeader>
                    <PanelTitle>"Favorites extension"</PanelTitle>
                </PanelHeader>
                <PanelBody>
                    <Muted>
                        "Star messages in any chat; browse them per chat or across all chats below."
                    </Muted>
                </PanelBody>
            </Panel>
            <OverviewPanel />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostContext;

    #[test]
    fn row_keys_are_disjoint_across_conversations() {
        let host = HostContext::demo();

        host.open_chat("aria-main");
        let aria: Vec<String> = host
            .live_messages()
            .iter()
            .map(|m| message_row_key("aria-main", m))
            .collect();

        host.open_chat("brook-main");
        let brook: Vec<String> = host
            .live_messages()
            .iter()
            .map(|m| message_row_key("brook-main", m))
            .collect();

        // Both chats number their messages 0..N; the keys must still never
        // collide, or a chat switch would keep the previous chat's rows.
        assert!(!aria.is_empty() && !brook.is_empty());
        assert!(aria.iter().all(|k| !brook.contains(k)));
    }

    #[test]
    fn row_keys_distinguish_messages_within_a_conversation() {
        let host = HostContext::demo();
        host.open_chat("study-2026-08");

        let mut keys: Vec<String> = host
            .live_messages()
            .iter()
            .map(|m| message_row_key("study-2026-08", m))
            .collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }
}
