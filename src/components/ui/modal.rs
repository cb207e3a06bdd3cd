use icons::X;
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Signal-driven modal. The caller owns the `open` signal; content stays in
/// the tree and is shown/hidden, so a single instance can be reused across
/// openings without re-creating its state.
#[component]
pub fn Modal(
    open: RwSignal<bool>,
    children: ChildrenFn,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "fixed top-1/2 left-1/2 z-50 flex w-full max-w-2xl -translate-x-1/2 -translate-y-1/2 flex-col gap-4 rounded-2xl border bg-background p-6 shadow-lg max-h-[85vh] overflow-y-auto",
        class
    );

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <div
                class="fixed inset-0 z-40 bg-black/50"
                data-name="ModalBackdrop"
                on:click=move |_| open.set(false)
            />
            <div class=merged_class.clone() data-name="ModalContent">
                <button
                    type="button"
                    class="absolute top-4 right-4 rounded-sm p-1 hover:bg-accent [&_svg:not([class*='size-'])]:size-4"
                    aria-label="Close"
                    on:click=move |_| open.set(false)
                >
                    <X />
                </button>
                {children()}
            </div>
        </Show>
    }
}
