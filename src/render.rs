use serde_json::Value;

use crate::{
    boundary::{self, ErrorDisplay, RouteError},
    loader::RecordSource,
    pages::{PageContext, PageKind, RenderError, SearchParams},
    resolver::{Loader, PROFILE_PARAM, Route, RouteParams},
};

/// A rendered page body, before the shell is put around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub kind: PageKind,
    pub title: String,
    pub body: String,
}

/// Loads and renders a matched route inside its boundary.
pub async fn render_route(
    route: &Route,
    path: &str,
    query: &SearchParams,
    source: &dyn RecordSource,
) -> Result<View, ErrorDisplay> {
    boundary::guard(path, prepare(route, path, query, source)).await
}

async fn prepare(
    route: &Route,
    path: &str,
    query: &SearchParams,
    source: &dyn RecordSource,
) -> Result<View, RouteError> {
    let record = match route.loader {
        Some(loader) => Some(load(loader, &route.params, source).await?),
        None => None,
    };

    let page = route.renderable.get();
    let body = page.render(&PageContext {
        path,
        params: &route.params,
        query,
        record: record.as_ref(),
    })?;

    Ok(View {
        kind: route.kind(),
        title: page.title().to_owned(),
        body,
    })
}

async fn load(
    loader: Loader,
    params: &RouteParams,
    source: &dyn RecordSource,
) -> Result<Value, RouteError> {
    match loader {
        Loader::GtfsRoute => {
            let id = params
                .get(PROFILE_PARAM)
                .ok_or(RenderError::MissingParam(PROFILE_PARAM))?;
            Ok(source.fetch_route(id).await?)
        }
    }
}
