use axum::{
    debug_handler,
    extract::State,
    http::Uri,
    response::{Html, IntoResponse, Redirect, Response},
};
use maud::PreEscaped;

use crate::{AppState, pages::SearchParams, render::render_route, resolver::Resolution, shell};

/// Every path that is not an asset or API call goes through the route table.
#[debug_handler(state = AppState)]
pub(crate) async fn page(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();

    let route = match state.resolver.resolve(path) {
        Resolution::Redirect { to } => return Redirect::to(to).into_response(),
        Resolution::Render(route) => route,
    };

    let query = SearchParams::parse(uri.query());
    let menu = state.registry.menu(uri.query());

    match render_route(&route, path, &query, state.source.as_ref()).await {
        Ok(view) => {
            let markup = shell::document(&view.title, &menu, path, PreEscaped(view.body));
            Html(markup.into_string()).into_response()
        }
        Err(display) => (
            display.status(),
            Html(shell::document(display.title(), &menu, path, display.render()).into_string()),
        )
            .into_response(),
    }
}
