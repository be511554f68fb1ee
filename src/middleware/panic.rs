use std::any::Any;

use axum::response::{Html, IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{
    boundary::{ErrorDisplay, Failure},
    registry::Registry,
    shell,
};

/// Last line of defense for panics outside a route boundary: the shell
/// and menu are still served.
fn handle_panic(_error: Box<dyn Any + Send + 'static>) -> Response {
    let display = ErrorDisplay {
        route: String::new(),
        failure: Failure::Panic,
        message: "Internal Server Error".to_owned(),
    };
    let menu = Registry::builtin().menu(None);
    (
        display.status(),
        Html(shell::document(display.title(), &menu, "", display.render()).into_string()),
    )
        .into_response()
}

pub fn middleware() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(handle_panic)
}
