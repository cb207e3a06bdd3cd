use crate::components::ui::{Button, ButtonSize, ButtonVariant, Muted, Panel, PanelBody, PanelHeader, PanelTitle};
use crate::controller::FavoritesController;
use crate::favorites::paging::{self, OverviewEntry, OverviewRow};
use crate::state::AppContext;
use icons::{ChevronLeft, ChevronRight};
use leptos::prelude::*;

/// Cross-conversation favorites listing: conversations grouped under their
/// character/group label, flattened into a paged stream of titles and rows.
/// Lives in the extension settings area; clicking a row drills down into the
/// popup bound to that conversation.
#[component]
pub fn OverviewPanel() -> impl IntoView {
    let app = expect_context::<AppContext>();
    let controller = expect_context::<FavoritesController>();
    let host = app.0.host.clone();

    let settings = app.0.settings;
    let overview_page = app.0.overview_page;

    // Labels prefer the live roster name; conversations whose owner left the
    // roster fall back to the stored snapshot. Recomputed on every mutation,
    // so the listing follows adds, removals and batch clears.
    let entries = {
        let host = host.clone();
        Memo::new(move |_| {
            let rows = settings.with(|s| {
                s.chats
                    .iter()
                    .map(|(chat_id, chat)| {
                        let label = match (&chat.character_id, &chat.group_id) {
                            (Some(cid), _) => host
                                .character_name(cid)
                                .unwrap_or_else(|| chat.name.clone()),
                            (None, Some(gid)) => {
                                host.group_name(gid).unwrap_or_else(|| chat.name.clone())
                            }
                            (None, None) => chat.name.clone(),
                        };
                        OverviewRow {
                            chat_id: chat_id.clone(),
                            label,
                            name: chat_id.clone(),
                            count: chat.items.len(),
                        }
                    })
                    .collect::<Vec<_>>()
            });
            paging::overview_entries(rows)
        })
    };

    let total = move || paging::total_pages(entries.with(|e| e.len()), paging::OVERVIEW_PAGE_SIZE);

    Effect::new(move |_| {
        let t = total();
        let p = overview_page.get();
        let clamped = paging::clamp_page(p, t);
        if clamped != p {
            overview_page.set(clamped);
        }
    });

    let page_entries = Memo::new(move |_| {
        entries.with(|e| {
            let page = paging::clamp_page(
                overview_page.get(),
                paging::total_pages(e.len(), paging::OVERVIEW_PAGE_SIZE),
            );
            paging::page_slice(e, page, paging::OVERVIEW_PAGE_SIZE).to_vec()
        })
    });

    let on_prev = move |_| {
        let p = overview_page.get_untracked();
        if p > 1 {
            overview_page.set(p - 1);
        }
    };
    let on_next = move |_: leptos::ev::MouseEvent| {
        overview_page.set(overview_page.get_untracked() + 1);
    };

    view! {
        <Panel>
            <PanelHeader>
                <PanelTitle>"All favorites"</PanelTitle>
                <Muted>
                    {move || format!("page {} / {}", overview_page.get(), total())}
                </Muted>
            </PanelHeader>
            <PanelBody>
                <Show
                    when=move || !entries.with(|e| e.is_empty())
                    fallback=|| view! { <Muted>"No favorites anywhere yet."</Muted> }
                >
                    <div class="flex flex-col gap-1">
                        {
                            let controller = controller.clone();
                            move || {
                                let controller = controller.clone();
                                page_entries
                                    .get()
                                    .into_iter()
                                    .map(move |entry| match entry {
                                        OverviewEntry::GroupTitle(label) => view! {
                                            <div class="pt-1 text-xs font-semibold uppercase tracking-wide text-muted-foreground">
                                                {label}
                                            </div>
                                        }
                                        .into_any(),
                                        OverviewEntry::ChatRow { chat_id, name, count } => {
                                            let controller = controller.clone();
                                            view! {
                                                <button
                                                    type="button"
                                                    class="flex items-center justify-between rounded-md border px-3 py-1.5 text-left text-sm hover:bg-accent"
                                                    on:click=move |_| controller.open_popup(&chat_id)
                                                >
                                                    <span>{name}</span>
                                                    <span class="text-xs text-muted-foreground">{count}</span>
                                                </button>
                                            }
                                            .into_any()
                                        }
                                    })
                                    .collect_view()
                            }
                        }
                    </div>

                    <Show when=move || { total() > 1 } fallback=|| ().into_view()>
                        <div class="flex items-center justify-between pt-2">
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Icon
                                attr:aria-label="Previous page"
                                attr:disabled=move || { overview_page.get() <= 1 }
                                on:click=on_prev
                            >
                                <ChevronLeft />
                            </Button>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Icon
                                attr:aria-label="Next page"
                                attr:disabled=move || { overview_page.get() >= total() }
                                on:click=on_next
                            >
                                <ChevronRight />
                            </Button>
                        </div>
                    </Show>
                </Show>
            </PanelBody>
        </Panel>
    }
}
