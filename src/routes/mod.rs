mod api;
mod page;

use axum::{Router, routing::get};
use tower::ServiceBuilder;

use crate::{AppState, middleware, res};

pub fn router(state: AppState) -> Router {
    let layers = ServiceBuilder::new()
        .layer(axum::middleware::from_fn(middleware::trace::middleware))
        .layer(middleware::panic::middleware());

    Router::new()
        .route("/assets/style.css", get(res::stylesheet))
        .nest("/api", api::router())
        .fallback(page::page)
        .layer(layers)
        .with_state(state)
}
