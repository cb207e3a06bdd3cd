use crate::controller::FavoritesController;
use crate::pages::ChatWorkspace;
use crate::state::{AppContext, AppState};
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();
    provide_context(AppContext(state.clone()));
    // The controller is the single writer for the favorites store; every
    // component reaches it through context.
    provide_context(FavoritesController::new(AppContext(state)));

    view! { <ChatWorkspace /> }
}
