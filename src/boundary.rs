use std::{any::Any, future::Future, panic::AssertUnwindSafe};

use axum::http::StatusCode;
use futures_util::FutureExt;
use maud::{Markup, html};
use thiserror::Error;
use tracing::warn;

use crate::{loader::LoadError, pages::RenderError};

#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Load,
    Render,
    Panic,
}

/// What the user sees in place of a route that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDisplay {
    pub route: String,
    pub failure: Failure,
    pub message: String,
}

impl ErrorDisplay {
    pub fn status(&self) -> StatusCode {
        match self.failure {
            Failure::Load => StatusCode::BAD_GATEWAY,
            Failure::Render | Failure::Panic => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.failure {
            Failure::Load => "Could not load data",
            Failure::Render | Failure::Panic => "Something went wrong",
        }
    }

    pub fn render(&self) -> Markup {
        html! {
            section class="route-error" {
                h1 { (self.title()) }
                p { "This page could not be shown. The rest of the site still works." }
                pre class="route-error-message" { (self.message) }
                p class="route-error-route" { (self.route) }
                a href="/dashboard" { "Back to the dashboard" }
            }
        }
    }
}

impl From<(&str, &RouteError)> for ErrorDisplay {
    fn from((route, err): (&str, &RouteError)) -> Self {
        ErrorDisplay {
            route: route.to_owned(),
            failure: match err {
                RouteError::Load(_) => Failure::Load,
                RouteError::Render(_) => Failure::Render,
            },
            message: err.to_string(),
        }
    }
}

/// Runs one route's preparation and rendering. Errors and panics inside
/// `work` stop here and come back as an [`ErrorDisplay`].
pub async fn guard<T, F>(route: &str, work: F) -> Result<T, ErrorDisplay>
where
    F: Future<Output = Result<T, RouteError>>,
{
    match AssertUnwindSafe(work).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            warn!(route, %err, "route failed");
            Err(ErrorDisplay::from((route, &err)))
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            warn!(route, %message, "route panicked");
            Err(ErrorDisplay {
                route: route.to_owned(),
                failure: Failure::Panic,
                message,
            })
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}
