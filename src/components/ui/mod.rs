pub mod button;
pub mod modal;

pub use button::*;
pub use modal::*;

use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Panel, div, "bg-card text-card-foreground flex flex-col rounded-xl border shadow-sm"}
    clx! {PanelHeader, div, "flex items-center justify-between gap-2 border-b px-4 py-3"}
    clx! {PanelTitle, h2, "text-sm font-semibold leading-none"}
    clx! {PanelBody, div, "flex flex-col gap-2 px-4 py-3"}
    clx! {RowList, ul, "flex flex-col gap-2"}
    clx! {Row, li, "flex items-start gap-2 rounded-md border px-3 py-2 [&_svg:not([class*='size-'])]:size-4"}
    clx! {Muted, p, "text-muted-foreground text-xs"}
    clx! {Badge, span, "inline-flex items-center rounded-full border px-2 py-0.5 text-[10px] font-medium uppercase tracking-wide"}
}

#[allow(unused_imports)]
pub use components::*;
