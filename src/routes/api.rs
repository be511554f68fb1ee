use std::sync::Arc;

use axum::{Json, Router, debug_handler, extract::{RawQuery, State}, routing::get};
use tower_http::cors::CorsLayer;

use crate::{AppState, registry::{MenuItem, Registry}, resolver::{Resolver, RouteSummary}};

/// Read-only models for clients that draw their own menu.
pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/pages", get(pages))
        .route("/routes", get(routes))
        .layer(CorsLayer::permissive())
}

#[debug_handler(state = AppState)]
pub(crate) async fn pages(
    State(registry): State<&'static Registry>,
    RawQuery(query): RawQuery,
) -> Json<Vec<MenuItem>> {
    Json(registry.menu(query.as_deref()))
}

#[debug_handler(state = AppState)]
pub(crate) async fn routes(State(resolver): State<Arc<Resolver>>) -> Json<Vec<RouteSummary>> {
    Json(resolver.summary())
}
